//! Window, framebuffer and input shell for the emulation host.
//!
//! Provides the winit window, pixels framebuffer upload and gamepad
//! polling around an [`md_host::Host`]. Everything algorithmic lives in
//! `md-host`; this crate only moves events in and pixels out.
//!
//! # Example
//!
//! ```ignore
//! use md_runner::{run, RunnerConfig};
//!
//! fn main() {
//!     let engine = my_engine_crate::Engine::new();
//!     run(engine, RunnerConfig {
//!         title: "Mega Drive".into(),
//!         rom_path: Some("game.bin".into()),
//!         ..RunnerConfig::default()
//!     });
//! }
//! ```

pub mod keys;
mod runner;
mod surface;

pub use runner::{Runner, RunnerConfig, run};
pub use surface::WindowSurface;
