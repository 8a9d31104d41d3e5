//! Per-frame output buffers the engine writes into.

use crate::{AudioConfig, VideoConfig};

/// Number of CRAM palette entries on the VDP.
pub const PALETTE_ENTRIES: usize = 64;

/// One frame of engine output: pixels, palette and sound samples.
///
/// The host allocates this once at engine attach time and hands it to
/// [`Engine::step_frame`](crate::Engine::step_frame) every frame. The
/// engine overwrites `pixels` and `palette` and replaces the contents
/// of `samples` with the frame's interleaved 16-bit LE sample bytes.
pub struct FrameOutput {
    /// RGBA pixel data, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
    /// Current CRAM palette as packed 0x00RRGGBB values.
    pub palette: [u32; PALETTE_ENTRIES],
    /// Interleaved 16-bit LE sample bytes for this frame.
    pub samples: Vec<u8>,
}

impl FrameOutput {
    /// Allocate buffers sized for the given engine configuration.
    #[must_use]
    pub fn new(video: &VideoConfig, audio: &AudioConfig) -> Self {
        Self {
            pixels: vec![0; video.frame_bytes()],
            palette: [0; PALETTE_ENTRIES],
            samples: Vec::with_capacity(audio.frame_bytes()),
        }
    }
}
