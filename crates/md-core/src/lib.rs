//! Engine-facing traits and shared types for the Mega Drive debug host.
//!
//! The host never looks inside the emulated machine. Everything it needs
//! goes through the [`Engine`] trait: step one frame, inspect registers
//! and memory, plant breakpoints. Concrete 68000/VDP cores live in their
//! own crates and implement `Engine`.

mod config;
mod engine;
mod frame;

pub use config::{AudioConfig, Region, VideoConfig};
pub use engine::{Engine, ProfileEntry};
pub use frame::{FrameOutput, PALETTE_ENTRIES};
