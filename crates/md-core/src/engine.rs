//! The narrow step/inspect interface the host consumes from an engine.

use crate::{AudioConfig, FrameOutput, VideoConfig};

/// One profiled instruction, as reported by an instrumented engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileEntry {
    /// Instruction address.
    pub address: u32,
    /// Times the instruction was executed.
    pub hits: u64,
    /// Total cycles spent at this address.
    pub cycles: u64,
}

/// A cycle-stepped 68000/VDP emulation core, seen from the host side.
///
/// The host drives the engine one frame at a time and inspects it
/// between frames. Execution control (breakpoints, single-step) is
/// cooperative: the host plants triggers, the engine honours them at
/// instruction boundaries and reports the result through [`halted`].
///
/// Inspection methods are valid in any run state; they return the
/// engine's last-known values.
///
/// [`halted`]: Engine::halted
pub trait Engine {
    /// Video output configuration.
    fn video_config(&self) -> VideoConfig;

    /// Audio output configuration.
    fn audio_config(&self) -> AudioConfig;

    /// Load a ROM image and prepare it for execution.
    fn load_rom(&mut self, data: &[u8]) -> Result<(), String>;

    /// Hard reset: reinitialise registers and peripheral state.
    fn reset(&mut self);

    /// Soft reset, as triggered by the console's reset button.
    /// Engines without a distinct soft-reset path may fall back to
    /// [`reset`](Engine::reset).
    fn soft_reset(&mut self) {
        self.reset();
    }

    /// Run one frame of emulation, writing pixels, palette and sound
    /// samples into `out`. Execution may stop short of a full frame if
    /// a breakpoint or watchpoint trips; the engine then reports
    /// `halted() == true`.
    fn step_frame(&mut self, out: &mut FrameOutput);

    /// Set the controller bit state for a pad port (active-low).
    fn set_pad(&mut self, port: usize, state: u16);

    // -----------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------

    /// Program counter of the next instruction.
    fn pc(&self) -> u32;

    /// Data register D0..D7.
    fn data_register(&self, index: usize) -> u32;

    /// Address register A0..A7.
    fn addr_register(&self, index: usize) -> u32;

    /// Status register.
    fn status_register(&self) -> u16;

    /// Read one byte from the 68000 address space.
    fn read_byte(&self, address: u32) -> u8;

    /// CRAM palette entry as packed 0x00RRGGBB.
    fn color(&self, index: usize) -> u32;

    /// VDP register value.
    fn vdp_register(&self, index: usize) -> u8;

    // -----------------------------------------------------------------
    // Execution control
    // -----------------------------------------------------------------

    /// Plant a breakpoint at an instruction address.
    fn set_breakpoint(&mut self, address: u32);

    /// Remove all planted breakpoints.
    fn clear_breakpoints(&mut self);

    /// Plant a watchpoint on the half-open address range `[from, to)`.
    fn set_watchpoint(&mut self, from: u32, to: u32);

    /// Remove all planted watchpoints.
    fn clear_watchpoints(&mut self);

    /// Execute exactly one instruction, then halt.
    fn step_instruction(&mut self);

    /// Leave the halted state and run freely.
    fn resume(&mut self);

    /// Request a halt at the next instruction boundary. Asynchronous;
    /// the halt is observed through [`halted`](Engine::halted).
    fn request_break(&mut self);

    /// Whether execution is currently halted.
    fn halted(&self) -> bool;

    // -----------------------------------------------------------------
    // Profiling (present only in instrumented builds of an engine)
    // -----------------------------------------------------------------

    /// Per-instruction execution counts, empty without instrumentation.
    fn profiler_counts(&self) -> Vec<ProfileEntry> {
        Vec::new()
    }

    /// Cycles recorded for one instruction address, 0 without
    /// instrumentation.
    fn profiler_cycles(&self, _address: u32) -> u64 {
        0
    }
}
