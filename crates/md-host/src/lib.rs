//! Real-time emulation host for a 68000/VDP engine.
//!
//! Four pieces, composed by [`Host`]:
//!
//! - [`FrameClock`] paces emulated frames to wall-clock time and absorbs
//!   host jitter.
//! - [`AudioRingBuffer`] carries sample bytes from the frame-synchronous
//!   producer to the asynchronous audio-device callback.
//! - [`DebugControl`] owns the run/halt state machine and the
//!   breakpoint/watchpoint tables.
//! - [`InputMap`] translates opaque physical key codes into active-low
//!   controller bits.
//!
//! The emulated machine itself is an external collaborator behind
//! [`md_core::Engine`]; the host never reaches past that trait.

mod audio;
mod clock;
mod debug;
mod host;
mod input;
mod ring;
mod surface;

pub use md_core::Region;

pub use audio::AudioOutput;
pub use clock::FrameClock;
pub use debug::{DebugControl, RunState};
pub use host::{Host, HostConfig};
pub use input::{Button, InputMap, PAD_RELEASED};
pub use ring::AudioRingBuffer;
pub use surface::{NullSurface, PresentationSurface};
