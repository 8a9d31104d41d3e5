//! The host context: one engine, one clock, one debug machine, one pad
//! translation table, explicitly owned and passed around by reference.

use std::fs;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use md_core::{Engine, FrameOutput, PALETTE_ENTRIES, ProfileEntry, Region, VideoConfig};

use crate::audio::AudioOutput;
use crate::clock::FrameClock;
use crate::debug::{DebugControl, RunState};
use crate::input::{Button, InputMap, PAD_RELEASED};
use crate::ring::AudioRingBuffer;
use crate::surface::{NullSurface, PresentationSurface};

/// Safety margin subtracted from every scheduler sleep so the host wakes
/// before the frame actually falls due.
const SLEEP_MARGIN_MICROS: u64 = 1_000;

/// Longest single scheduler sleep (the 50 Hz period), so input and debug
/// polling stay responsive even under a slow target rate.
const MAX_SLEEP_MICROS: u64 = 1_000_000 / 50;

/// Number of VDP registers exposed for inspection.
const VDP_REGISTERS: usize = 24;

/// Host construction parameters.
pub struct HostConfig {
    /// Console region; sets the target refresh rate.
    pub region: Region,
    /// Ring buffer capacity in frames of audio, on top of one extra
    /// frame of device-buffer allowance.
    pub sound_segments: usize,
    /// Whether to open an audio device at all.
    pub sound: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            region: Region::Japan,
            sound_segments: 8,
            sound: true,
        }
    }
}

/// The emulation host.
///
/// Owns the engine and all real-time plumbing around it. Every
/// operation is serial on the caller's thread; the only other thread in
/// the system is the audio-device callback, which shares nothing but
/// the ring buffer.
///
/// Operations on a host with no engine attached return safe defaults
/// (0, `false`, empty) rather than faulting — the debugger frontend
/// polls speculatively and must never bring the process down.
pub struct Host {
    // Field order is teardown order: quiesce the audio callback before
    // the ring it drains, release the surface before the engine.
    audio: Option<AudioOutput>,
    ring: Option<Arc<AudioRingBuffer>>,
    surface: Box<dyn PresentationSurface>,
    engine: Option<Box<dyn Engine>>,
    frame: Option<FrameOutput>,
    clock: FrameClock,
    debug: DebugControl,
    input: InputMap,
    pads: [u16; 2],
    config: HostConfig,
    epoch: Instant,
}

impl Host {
    #[must_use]
    pub fn new(config: HostConfig) -> Self {
        Self {
            audio: None,
            ring: None,
            surface: Box::new(NullSurface),
            engine: None,
            frame: None,
            clock: FrameClock::new(config.region.refresh_hz()),
            debug: DebugControl::new(),
            input: InputMap::new(),
            pads: [PAD_RELEASED; 2],
            config,
            epoch: Instant::now(),
        }
    }

    /// Attach the emulation engine, sizing the frame store and the
    /// audio ring from its reported configuration and opening the audio
    /// device. A missing device is reported and the run continues
    /// silently; the ring still accepts writes that are never consumed.
    pub fn attach_engine(&mut self, mut engine: Box<dyn Engine>) {
        let video = engine.video_config();
        let audio_config = engine.audio_config();

        self.frame = Some(FrameOutput::new(&video, &audio_config));

        let capacity = (self.config.sound_segments + 1) * audio_config.frame_bytes();
        let ring = Arc::new(AudioRingBuffer::new(capacity));
        if self.config.sound {
            self.audio = AudioOutput::new(&audio_config, Arc::clone(&ring));
            if self.audio.is_none() {
                eprintln!("warning: no audio device available, sound disabled");
            }
        }
        self.ring = Some(ring);

        engine.set_pad(0, PAD_RELEASED);
        engine.set_pad(1, PAD_RELEASED);
        self.engine = Some(engine);
        self.clock.restart(self.now_micros());
    }

    /// Attach the presentation surface the scheduler presents into.
    pub fn attach_surface(&mut self, surface: Box<dyn PresentationSurface>) {
        self.surface = surface;
    }

    #[must_use]
    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    /// Load a ROM image from disk into the engine, reset the debug
    /// state, show the surface and unpause audio.
    pub fn load_rom(&mut self, path: &str) -> Result<(), String> {
        let data =
            fs::read(path).map_err(|err| format!("failed to read ROM image {path}: {err}"))?;
        self.load_rom_image(&data)
    }

    /// [`load_rom`](Self::load_rom) for an image already in memory.
    pub fn load_rom_image(&mut self, data: &[u8]) -> Result<(), String> {
        let Some(engine) = self.engine.as_mut() else {
            return Err("no engine attached".into());
        };
        engine.load_rom(data)?;
        self.debug.reset(engine.as_mut());
        self.surface.show();
        if let Some(audio) = &self.audio {
            audio.play();
        }
        self.clock.restart(self.epoch.elapsed().as_micros() as u64);
        Ok(())
    }

    /// Hard reset: engine registers and debug state.
    pub fn reset(&mut self) -> bool {
        let Some(engine) = self.engine.as_mut() else {
            return false;
        };
        engine.reset();
        self.debug.reset(engine.as_mut());
        true
    }

    /// Console reset button.
    pub fn soft_reset(&mut self) -> bool {
        let Some(engine) = self.engine.as_mut() else {
            return false;
        };
        engine.soft_reset();
        true
    }

    // -----------------------------------------------------------------
    // Scheduler
    // -----------------------------------------------------------------

    /// Reset the pacing reference to an explicit time. Companion to
    /// [`update_at`](Self::update_at) for deterministic stepping.
    pub fn restart_clock(&mut self, now_micros: u64) {
        self.clock.restart(now_micros);
    }

    /// One scheduler tick against the host's own wall clock.
    pub fn update(&mut self) -> bool {
        let now = self.now_micros();
        self.update_at(now)
    }

    /// One scheduler tick at an explicit time, for deterministic
    /// stepping and tests. `now_micros` must be monotonic across calls.
    ///
    /// At most one emulated frame is executed per call no matter how
    /// many fell due: catch-up beyond one frame is dropped, trading
    /// emulated-time accuracy for host responsiveness.
    pub fn update_at(&mut self, now_micros: u64) -> bool {
        let (Some(engine), Some(frame), Some(ring)) = (
            self.engine.as_mut(),
            self.frame.as_mut(),
            self.ring.as_ref(),
        ) else {
            return false;
        };

        // Queued key transitions become pad bits before anything runs.
        self.input.drain_into(&mut self.pads[0]);
        engine.set_pad(0, self.pads[0]);
        engine.set_pad(1, self.pads[1]);

        // Pick up halts the engine reached on its own (breakpoint,
        // watchpoint, honoured break request).
        self.debug.sync(engine.halted());

        let frames_due = self.clock.advance(now_micros);
        if frames_due == 0 {
            // Nothing due yet; relax the CPU until the next frame, but
            // wake early enough to keep polling events.
            let remaining = u64::from(self.clock.micros_to_next_frame());
            if remaining > SLEEP_MARGIN_MICROS {
                let sleep = remaining.min(MAX_SLEEP_MICROS) - SLEEP_MARGIN_MICROS;
                thread::sleep(Duration::from_micros(sleep));
            }
        } else if self.debug.state() == RunState::Running {
            engine.step_frame(frame);
            ring.write(&frame.samples);
            // The frame may have stopped short at a trigger.
            self.debug.sync(engine.halted());
        }
        // When halted no emulation work happens, but the last produced
        // frame is still presented.

        self.surface.present();
        true
    }

    // -----------------------------------------------------------------
    // Debug control
    // -----------------------------------------------------------------

    pub fn add_breakpoint(&mut self, address: u32) -> bool {
        let Some(engine) = self.engine.as_mut() else {
            return false;
        };
        self.debug.add_breakpoint(engine.as_mut(), address);
        true
    }

    pub fn clear_breakpoints(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            self.debug.clear_breakpoints(engine.as_mut());
        }
    }

    pub fn add_watchpoint(&mut self, from: u32, to: u32) -> bool {
        let Some(engine) = self.engine.as_mut() else {
            return false;
        };
        self.debug.add_watchpoint(engine.as_mut(), from, to);
        true
    }

    pub fn clear_watchpoints(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            self.debug.clear_watchpoints(engine.as_mut());
        }
    }

    /// Execute exactly one instruction, then halt.
    pub fn step_into(&mut self) -> bool {
        let Some(engine) = self.engine.as_mut() else {
            return false;
        };
        self.debug.step_into(engine.as_mut());
        true
    }

    /// Leave the halted state; a no-op while running.
    pub fn resume(&mut self) -> bool {
        let Some(engine) = self.engine.as_mut() else {
            return false;
        };
        self.debug.resume(engine.as_mut());
        true
    }

    /// Ask for a halt at the next instruction boundary.
    pub fn request_break(&mut self) -> bool {
        let Some(engine) = self.engine.as_mut() else {
            return false;
        };
        self.debug.request_break(engine.as_mut());
        true
    }

    /// True iff execution is suspended.
    #[must_use]
    pub fn is_debugging(&self) -> bool {
        self.debug.is_debugging()
    }

    // -----------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------

    #[must_use]
    pub fn d_reg(&self, index: usize) -> u32 {
        match &self.engine {
            Some(engine) if index < 8 => engine.data_register(index),
            _ => 0,
        }
    }

    #[must_use]
    pub fn a_reg(&self, index: usize) -> u32 {
        match &self.engine {
            Some(engine) if index < 8 => engine.addr_register(index),
            _ => 0,
        }
    }

    #[must_use]
    pub fn sr(&self) -> u32 {
        self.engine
            .as_ref()
            .map_or(0, |engine| u32::from(engine.status_register()))
    }

    #[must_use]
    pub fn pc(&self) -> u32 {
        self.engine.as_ref().map_or(0, |engine| engine.pc())
    }

    #[must_use]
    pub fn read_byte(&self, address: u32) -> u8 {
        self.engine
            .as_ref()
            .map_or(0, |engine| engine.read_byte(address))
    }

    /// Big-endian word at `address`, as the 68000 sees it.
    #[must_use]
    pub fn read_word(&self, address: u32) -> u16 {
        u16::from(self.read_byte(address)) << 8 | u16::from(self.read_byte(address.wrapping_add(1)))
    }

    /// Big-endian long word at `address`.
    #[must_use]
    pub fn read_long(&self, address: u32) -> u32 {
        u32::from(self.read_word(address)) << 16
            | u32::from(self.read_word(address.wrapping_add(2)))
    }

    /// Raw memory dump of `size` bytes starting at `address`.
    #[must_use]
    pub fn read_memory(&self, address: u32, size: usize) -> Vec<u8> {
        (0..size)
            .map(|offset| self.read_byte(address.wrapping_add(offset as u32)))
            .collect()
    }

    /// CRAM palette entry as packed 0x00RRGGBB.
    #[must_use]
    pub fn color(&self, index: usize) -> u32 {
        match &self.engine {
            Some(engine) if index < PALETTE_ENTRIES => engine.color(index),
            _ => 0,
        }
    }

    /// VDP register value.
    #[must_use]
    pub fn vdp_register(&self, index: usize) -> u8 {
        match &self.engine {
            Some(engine) if index < VDP_REGISTERS => engine.vdp_register(index),
            _ => 0,
        }
    }

    /// Per-instruction profile, empty when the engine carries no
    /// instrumentation.
    #[must_use]
    pub fn profiler_results(&self) -> Vec<ProfileEntry> {
        self.engine
            .as_ref()
            .map_or_else(Vec::new, |engine| engine.profiler_counts())
    }

    /// Cycles recorded at one instruction address, 0 without
    /// instrumentation.
    #[must_use]
    pub fn instruction_cycle_count(&self, address: u32) -> u64 {
        self.engine
            .as_ref()
            .map_or(0, |engine| engine.profiler_cycles(address))
    }

    // -----------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------

    /// Bind a physical key code to a logical button (last write wins).
    pub fn set_input_mapping(&mut self, button: Button, key: u32) {
        self.input.set_mapping(button, key);
    }

    /// Current binding for a logical button.
    #[must_use]
    pub fn input_mapping(&self, button: Button) -> Option<u32> {
        self.input.mapping(button)
    }

    /// Queue a physical key transition; applied on the next update.
    pub fn key_event(&mut self, key: u32, pressed: bool) {
        self.input.push_event(key, pressed);
    }

    /// Set a logical button directly, bypassing the key mapping. Used
    /// for gamepads, which arrive pre-translated.
    pub fn set_button(&mut self, port: usize, button: Button, pressed: bool) {
        if port >= self.pads.len() {
            return;
        }
        if pressed {
            self.pads[port] &= !button.mask();
        } else {
            self.pads[port] |= button.mask();
        }
    }

    /// Current active-low bit state of a pad port.
    #[must_use]
    pub fn pad_state(&self, port: usize) -> u16 {
        self.pads.get(port).copied().unwrap_or(PAD_RELEASED)
    }

    // -----------------------------------------------------------------
    // Presentation passthrough
    // -----------------------------------------------------------------

    pub fn show(&mut self) {
        self.surface.show();
    }

    pub fn hide(&mut self) {
        self.surface.hide();
    }

    pub fn set_window_position(&mut self, x: i32, y: i32) {
        self.surface.set_position(x, y);
    }

    pub fn bring_to_front(&mut self) {
        self.surface.bring_to_front();
    }

    /// Pixels of the most recently produced frame.
    #[must_use]
    pub fn frame_pixels(&self) -> Option<&[u8]> {
        self.frame.as_ref().map(|frame| frame.pixels.as_slice())
    }

    /// Video configuration of the attached engine.
    #[must_use]
    pub fn video_config(&self) -> Option<VideoConfig> {
        self.engine.as_ref().map(|engine| engine.video_config())
    }

    /// Shared handle to the sample ring, for consumers other than the
    /// built-in audio device (capture, tests).
    #[must_use]
    pub fn audio_ring(&self) -> Option<Arc<AudioRingBuffer>> {
        self.ring.as_ref().map(Arc::clone)
    }

    fn now_micros(&self) -> u64 {
        self.epoch.elapsed().as_micros() as u64
    }
}
