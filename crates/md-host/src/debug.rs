//! Run/halt state machine and trigger tables.
//!
//! The engine consults its own copies of the breakpoint and watchpoint
//! tables each instruction and halts itself when one trips; this module
//! owns the authoritative host-side state and keeps it in sync by
//! polling the engine's halt sense once per scheduler update.

use std::collections::BTreeSet;

use md_core::Engine;

/// Execution state as seen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// The scheduler steps the engine when frames fall due.
    Running,
    /// Frame stepping is suspended at an instruction boundary.
    Halted,
}

/// Breakpoint/watchpoint tables plus the two-state run machine.
///
/// Tables are unbounded; adding a trigger always succeeds.
pub struct DebugControl {
    state: RunState,
    breakpoints: BTreeSet<u32>,
    watchpoints: BTreeSet<(u32, u32)>,
}

impl DebugControl {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RunState::Running,
            breakpoints: BTreeSet::new(),
            watchpoints: BTreeSet::new(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// True iff execution is suspended.
    #[must_use]
    pub const fn is_debugging(&self) -> bool {
        matches!(self.state, RunState::Halted)
    }

    /// Return to the initial state for a freshly loaded program:
    /// running, with no triggers planted on either side.
    pub fn reset(&mut self, engine: &mut dyn Engine) {
        self.state = RunState::Running;
        self.breakpoints.clear();
        self.watchpoints.clear();
        engine.clear_breakpoints();
        engine.clear_watchpoints();
    }

    /// Plant a breakpoint. Duplicate addresses collapse to one entry.
    pub fn add_breakpoint(&mut self, engine: &mut dyn Engine, address: u32) {
        if self.breakpoints.insert(address) {
            engine.set_breakpoint(address);
        }
    }

    pub fn clear_breakpoints(&mut self, engine: &mut dyn Engine) {
        self.breakpoints.clear();
        engine.clear_breakpoints();
    }

    /// Plant a watchpoint on the half-open range `[from, to)`.
    pub fn add_watchpoint(&mut self, engine: &mut dyn Engine, from: u32, to: u32) {
        if self.watchpoints.insert((from, to)) {
            engine.set_watchpoint(from, to);
        }
    }

    pub fn clear_watchpoints(&mut self, engine: &mut dyn Engine) {
        self.watchpoints.clear();
        engine.clear_watchpoints();
    }

    #[must_use]
    pub fn breakpoints(&self) -> &BTreeSet<u32> {
        &self.breakpoints
    }

    #[must_use]
    pub fn watchpoints(&self) -> &BTreeSet<(u32, u32)> {
        &self.watchpoints
    }

    /// Execute exactly one instruction and suspend.
    ///
    /// From `Halted` this is a single-step; from `Running` it is a
    /// request to halt after the next instruction.
    pub fn step_into(&mut self, engine: &mut dyn Engine) {
        engine.step_instruction();
        self.state = RunState::Halted;
    }

    /// Halted -> Running. A no-op while already running.
    pub fn resume(&mut self, engine: &mut dyn Engine) {
        if self.state == RunState::Halted {
            engine.resume();
            self.state = RunState::Running;
        }
    }

    /// Ask the engine to halt at the next instruction boundary. The
    /// transition lands later, through [`sync`](DebugControl::sync).
    pub fn request_break(&mut self, engine: &mut dyn Engine) {
        if self.state == RunState::Running {
            engine.request_break();
        }
    }

    /// Mirror the engine's halt sense bit into the host state. Called
    /// once per scheduler update; this is how breakpoint hits and
    /// honoured break requests become visible.
    pub fn sync(&mut self, engine_halted: bool) {
        self.state = if engine_halted {
            RunState::Halted
        } else {
            RunState::Running
        };
    }
}

impl Default for DebugControl {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use md_core::{AudioConfig, FrameOutput, VideoConfig};

    /// Minimal engine double tracking the calls DebugControl makes.
    #[derive(Default)]
    struct ProbeEngine {
        halted: bool,
        break_requested: bool,
        steps: u32,
        resumes: u32,
        breakpoints: Vec<u32>,
        watchpoints: Vec<(u32, u32)>,
    }

    impl Engine for ProbeEngine {
        fn video_config(&self) -> VideoConfig {
            VideoConfig {
                width: 320,
                height: 240,
            }
        }
        fn audio_config(&self) -> AudioConfig {
            AudioConfig {
                sample_rate: 44100,
                channels: 2,
                samples_per_frame: 735,
            }
        }
        fn load_rom(&mut self, _data: &[u8]) -> Result<(), String> {
            Ok(())
        }
        fn reset(&mut self) {}
        fn step_frame(&mut self, _out: &mut FrameOutput) {}
        fn set_pad(&mut self, _port: usize, _state: u16) {}
        fn pc(&self) -> u32 {
            0
        }
        fn data_register(&self, _index: usize) -> u32 {
            0
        }
        fn addr_register(&self, _index: usize) -> u32 {
            0
        }
        fn status_register(&self) -> u16 {
            0
        }
        fn read_byte(&self, _address: u32) -> u8 {
            0
        }
        fn color(&self, _index: usize) -> u32 {
            0
        }
        fn vdp_register(&self, _index: usize) -> u8 {
            0
        }
        fn set_breakpoint(&mut self, address: u32) {
            self.breakpoints.push(address);
        }
        fn clear_breakpoints(&mut self) {
            self.breakpoints.clear();
        }
        fn set_watchpoint(&mut self, from: u32, to: u32) {
            self.watchpoints.push((from, to));
        }
        fn clear_watchpoints(&mut self) {
            self.watchpoints.clear();
        }
        fn step_instruction(&mut self) {
            self.steps += 1;
            self.halted = true;
        }
        fn resume(&mut self) {
            self.halted = false;
            self.resumes += 1;
        }
        fn request_break(&mut self) {
            self.break_requested = true;
        }
        fn halted(&self) -> bool {
            self.halted
        }
    }

    #[test]
    fn resume_is_a_noop_while_running() {
        let mut debug = DebugControl::new();
        let mut engine = ProbeEngine::default();
        assert_eq!(debug.state(), RunState::Running);
        debug.resume(&mut engine);
        assert_eq!(debug.state(), RunState::Running);
        assert_eq!(engine.resumes, 0);
    }

    #[test]
    fn step_into_runs_one_instruction_and_halts() {
        let mut debug = DebugControl::new();
        let mut engine = ProbeEngine::default();

        debug.step_into(&mut engine);
        assert_eq!(engine.steps, 1);
        assert!(debug.is_debugging());

        debug.step_into(&mut engine);
        assert_eq!(engine.steps, 2);
        assert!(debug.is_debugging());
    }

    #[test]
    fn resume_leaves_the_halted_state() {
        let mut debug = DebugControl::new();
        let mut engine = ProbeEngine::default();
        debug.step_into(&mut engine);
        debug.resume(&mut engine);
        assert_eq!(debug.state(), RunState::Running);
        assert_eq!(engine.resumes, 1);
    }

    #[test]
    fn break_lands_through_sync() {
        let mut debug = DebugControl::new();
        let mut engine = ProbeEngine::default();

        debug.request_break(&mut engine);
        assert!(engine.break_requested);
        // Still running until the engine honours the request.
        assert!(!debug.is_debugging());

        engine.halted = true;
        debug.sync(engine.halted());
        assert!(debug.is_debugging());
    }

    #[test]
    fn breakpoints_are_unique_and_forwarded() {
        let mut debug = DebugControl::new();
        let mut engine = ProbeEngine::default();

        debug.add_breakpoint(&mut engine, 0x2A6A4);
        debug.add_breakpoint(&mut engine, 0x2A6A4);
        debug.add_breakpoint(&mut engine, 0x400);
        assert_eq!(debug.breakpoints().len(), 2);
        assert_eq!(engine.breakpoints, vec![0x2A6A4, 0x400]);

        debug.clear_breakpoints(&mut engine);
        assert!(debug.breakpoints().is_empty());
        assert!(engine.breakpoints.is_empty());
    }

    #[test]
    fn reset_clears_state_and_both_tables() {
        let mut debug = DebugControl::new();
        let mut engine = ProbeEngine::default();

        debug.add_breakpoint(&mut engine, 0x100);
        debug.add_watchpoint(&mut engine, 0xFF0000, 0xFF0004);
        debug.step_into(&mut engine);

        debug.reset(&mut engine);
        assert_eq!(debug.state(), RunState::Running);
        assert!(debug.breakpoints().is_empty());
        assert!(debug.watchpoints().is_empty());
        assert!(engine.watchpoints.is_empty());
    }
}
