//! End-to-end host behaviour against a scripted engine.

use std::cell::Cell;
use std::rc::Rc;

use md_core::{AudioConfig, Engine, FrameOutput, VideoConfig};
use md_host::{Button, Host, HostConfig, Region};

const WIDTH: u32 = 320;
const HEIGHT: u32 = 240;
const SAMPLES_PER_FRAME: usize = 735;
const FRAME_SAMPLE_BYTES: usize = SAMPLES_PER_FRAME * 2 * 2;

/// Instructions executed per full frame of the scripted program.
const INSTRUCTIONS_PER_FRAME: u32 = 16;

/// Engine double running a fake linear program: the PC advances by two
/// per instruction, honours breakpoints and break requests at
/// instruction boundaries, and emits one frame of counter-pattern
/// sample bytes per full or partial frame.
struct ScriptedEngine {
    pc: u32,
    halted: bool,
    break_requested: bool,
    breakpoints: Vec<u32>,
    watchpoints: Vec<(u32, u32)>,
    rom: Vec<u8>,
    pads: [u16; 2],
    frames: Rc<Cell<u64>>,
}

impl ScriptedEngine {
    fn new(frames: Rc<Cell<u64>>) -> Self {
        Self {
            pc: 0,
            halted: false,
            break_requested: false,
            breakpoints: Vec::new(),
            watchpoints: Vec::new(),
            rom: Vec::new(),
            pads: [0xFFF; 2],
            frames,
        }
    }

    /// Advance one instruction, honouring pending triggers. Returns
    /// false when execution halted.
    fn execute_instruction(&mut self) -> bool {
        if self.break_requested {
            self.break_requested = false;
            self.halted = true;
            return false;
        }
        self.pc = self.pc.wrapping_add(2);
        if self.breakpoints.contains(&self.pc) {
            self.halted = true;
            return false;
        }
        true
    }
}

impl Engine for ScriptedEngine {
    fn video_config(&self) -> VideoConfig {
        VideoConfig {
            width: WIDTH,
            height: HEIGHT,
        }
    }

    fn audio_config(&self) -> AudioConfig {
        AudioConfig {
            sample_rate: 44100,
            channels: 2,
            samples_per_frame: SAMPLES_PER_FRAME,
        }
    }

    fn load_rom(&mut self, data: &[u8]) -> Result<(), String> {
        if data.is_empty() {
            return Err("empty ROM image".into());
        }
        self.rom = data.to_vec();
        self.pc = 0x200;
        self.halted = false;
        Ok(())
    }

    fn reset(&mut self) {
        self.pc = 0x200;
        self.halted = false;
    }

    fn step_frame(&mut self, out: &mut FrameOutput) {
        let frame = self.frames.get();
        self.frames.set(frame + 1);

        for _ in 0..INSTRUCTIONS_PER_FRAME {
            if !self.execute_instruction() {
                break;
            }
        }

        out.pixels.fill(frame as u8);
        out.samples.clear();
        out.samples
            .extend((0..FRAME_SAMPLE_BYTES).map(|i| (frame as usize + i) as u8));
    }

    fn set_pad(&mut self, port: usize, state: u16) {
        if let Some(pad) = self.pads.get_mut(port) {
            *pad = state;
        }
    }

    fn pc(&self) -> u32 {
        self.pc
    }

    fn data_register(&self, index: usize) -> u32 {
        0xD000_0000 | index as u32
    }

    fn addr_register(&self, index: usize) -> u32 {
        0xA000_0000 | index as u32
    }

    fn status_register(&self) -> u16 {
        0x2700
    }

    fn read_byte(&self, address: u32) -> u8 {
        self.rom.get(address as usize).copied().unwrap_or(0)
    }

    fn color(&self, index: usize) -> u32 {
        0x0000_0E00 | index as u32
    }

    fn vdp_register(&self, index: usize) -> u8 {
        0x80 | index as u8
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
        self.halted = false;
        self.execute_instruction();
        self.halted = true;
    }

    fn resume(&mut self) {
        self.halted = false;
    }

    fn request_break(&mut self) {
        self.break_requested = true;
    }

    fn halted(&self) -> bool {
        self.halted
    }
}

fn silent_host() -> (Host, Rc<Cell<u64>>) {
    let frames = Rc::new(Cell::new(0));
    let mut host = Host::new(HostConfig {
        region: Region::Japan,
        sound_segments: 8,
        sound: false,
    });
    host.attach_engine(Box::new(ScriptedEngine::new(Rc::clone(&frames))));
    (host, frames)
}

fn loaded_host() -> (Host, Rc<Cell<u64>>) {
    let (mut host, frames) = silent_host();
    host.load_rom_image(&[0x4E, 0x71, 0x4E, 0x71]).unwrap();
    host.restart_clock(0);
    (host, frames)
}

#[test]
fn update_without_engine_returns_failure() {
    let mut host = Host::new(HostConfig::default());
    assert!(!host.update());
    assert!(!host.is_debugging());
    assert_eq!(host.d_reg(0), 0);
    assert_eq!(host.read_long(0), 0);
    assert_eq!(host.pc(), 0);
}

#[test]
fn sixty_paced_updates_step_sixty_frames() {
    let (mut host, frames) = loaded_host();
    let ring = host.audio_ring().unwrap();

    let mut drained = 0usize;
    let mut out = vec![0u8; ring.capacity()];
    for i in 1..=60u64 {
        assert!(host.update_at(i * 16_667));
        drained += ring.read_into(&mut out);
    }

    assert_eq!(frames.get(), 60);
    assert_eq!(drained, 60 * FRAME_SAMPLE_BYTES);
}

#[test]
fn one_frame_per_update_even_when_behind() {
    let (mut host, frames) = loaded_host();

    // 100 ms elapsed is six frames due; only one may run.
    host.update_at(100_000);
    assert_eq!(frames.get(), 1);
}

#[test]
fn no_frame_steps_while_halted() {
    let (mut host, frames) = loaded_host();

    host.update_at(16_667);
    assert_eq!(frames.get(), 1);

    host.step_into();
    assert!(host.is_debugging());

    host.update_at(2 * 16_667);
    host.update_at(3 * 16_667);
    assert_eq!(frames.get(), 1);

    host.resume();
    host.update_at(4 * 16_667);
    assert_eq!(frames.get(), 2);
}

#[test]
fn breakpoint_suspends_frame_stepping() {
    let (mut host, frames) = loaded_host();

    // Mid-way through the second frame of the scripted program.
    let target = 0x200 + 0x20 + 0x10;
    assert!(host.add_breakpoint(target));

    host.update_at(16_667);
    assert!(!host.is_debugging());

    host.update_at(2 * 16_667);
    assert!(host.is_debugging());
    assert_eq!(host.pc(), target);
    let frames_at_halt = frames.get();

    // Halted: updates present but do not execute.
    host.update_at(3 * 16_667);
    assert_eq!(frames.get(), frames_at_halt);

    host.resume();
    host.update_at(4 * 16_667);
    assert!(frames.get() > frames_at_halt);
}

#[test]
fn break_request_lands_at_instruction_boundary() {
    let (mut host, _frames) = loaded_host();

    host.update_at(16_667);
    host.request_break();
    assert!(!host.is_debugging());

    host.update_at(2 * 16_667);
    assert!(host.is_debugging());
}

#[test]
fn step_into_advances_exactly_one_instruction() {
    let (mut host, _frames) = loaded_host();
    host.step_into();
    let pc = host.pc();
    host.step_into();
    assert_eq!(host.pc(), pc + 2);
    assert!(host.is_debugging());
}

#[test]
fn memory_reads_compose_big_endian() {
    let (mut host, _frames) = silent_host();
    host.load_rom_image(&[0x12, 0x34, 0x56, 0x78, 0x9A]).unwrap();

    assert_eq!(host.read_byte(0), 0x12);
    assert_eq!(host.read_word(0), 0x1234);
    assert_eq!(host.read_word(1), 0x3456);
    assert_eq!(host.read_long(0), 0x1234_5678);
    assert_eq!(host.read_memory(2, 4), vec![0x56, 0x78, 0x9A, 0x00]);
}

#[test]
fn out_of_range_inspection_returns_defaults() {
    let (host, _frames) = silent_host();
    assert_eq!(host.d_reg(8), 0);
    assert_eq!(host.a_reg(12), 0);
    assert_eq!(host.color(64), 0);
    assert_eq!(host.vdp_register(24), 0);
    // In-range requests pass through.
    assert_eq!(host.d_reg(3), 0xD000_0003);
    assert_eq!(host.sr(), 0x2700);
}

#[test]
fn profiler_defaults_to_empty_without_instrumentation() {
    let (host, _frames) = silent_host();
    assert!(host.profiler_results().is_empty());
    assert_eq!(host.instruction_cycle_count(0x200), 0);
}

#[test]
fn load_rom_resets_debug_state() {
    let (mut host, _frames) = loaded_host();
    host.add_breakpoint(0x300);
    host.step_into();
    assert!(host.is_debugging());

    host.load_rom_image(&[0x4E, 0x71]).unwrap();
    assert!(!host.is_debugging());

    // The old breakpoint is gone: the program runs straight past it.
    host.restart_clock(0);
    for i in 1..=30u64 {
        host.update_at(i * 16_667);
    }
    assert!(!host.is_debugging());
}

#[test]
fn load_rom_failure_propagates() {
    let (mut host, _frames) = silent_host();
    assert!(host.load_rom_image(&[]).is_err());
    assert!(host.load_rom("/nonexistent/image.bin").is_err());
}

#[test]
fn key_events_reach_the_pad_on_update() {
    let (mut host, _frames) = loaded_host();
    host.set_input_mapping(Button::Start, 40);
    host.key_event(40, true);
    host.update_at(16_667);
    assert_eq!(host.pad_state(0) & Button::Start.mask(), 0);

    host.key_event(40, false);
    host.update_at(2 * 16_667);
    assert_eq!(host.pad_state(0) & Button::Start.mask(), Button::Start.mask());
}

#[test]
fn audio_attempt_without_device_does_not_fault() {
    // Same scenario as the paced test but with the audio device path
    // enabled; must run to completion whether or not a device exists.
    let frames = Rc::new(Cell::new(0));
    let mut host = Host::new(HostConfig::default());
    host.attach_engine(Box::new(ScriptedEngine::new(Rc::clone(&frames))));
    host.load_rom_image(&[0x4E, 0x71]).unwrap();
    host.restart_clock(0);
    for i in 1..=10u64 {
        host.update_at(i * 16_667);
    }
    assert_eq!(frames.get(), 10);
}
