//! Video, audio and region configuration reported by an engine.

/// Console region. Drives the target refresh rate and the region flag
/// the engine exposes to the running program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Japan,
    Americas,
    Europe,
}

impl Region {
    /// Target refresh rate in frames per second.
    #[must_use]
    pub const fn refresh_hz(self) -> u32 {
        match self {
            Self::Japan | Self::Americas => 60,
            Self::Europe => 50,
        }
    }

    /// Whether this region uses PAL video timing.
    #[must_use]
    pub const fn is_pal(self) -> bool {
        matches!(self, Self::Europe)
    }
}

/// Video output configuration for an engine.
#[derive(Debug, Clone, Copy)]
pub struct VideoConfig {
    /// Native display width in pixels.
    pub width: u32,
    /// Native display height in pixels.
    pub height: u32,
}

impl VideoConfig {
    /// Size of one RGBA frame in bytes.
    #[must_use]
    pub const fn frame_bytes(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Audio output configuration for an engine.
#[derive(Debug, Clone, Copy)]
pub struct AudioConfig {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Interleaved output channels (2 for the Mega Drive mixer).
    pub channels: u16,
    /// Samples per channel produced by one frame of emulation.
    pub samples_per_frame: usize,
}

impl AudioConfig {
    /// Bytes of interleaved 16-bit samples produced by one frame.
    #[must_use]
    pub const fn frame_bytes(&self) -> usize {
        self.samples_per_frame * self.channels as usize * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_refresh_rates() {
        assert_eq!(Region::Japan.refresh_hz(), 60);
        assert_eq!(Region::Americas.refresh_hz(), 60);
        assert_eq!(Region::Europe.refresh_hz(), 50);
        assert!(Region::Europe.is_pal());
        assert!(!Region::Japan.is_pal());
    }

    #[test]
    fn frame_byte_sizes() {
        let video = VideoConfig {
            width: 320,
            height: 240,
        };
        assert_eq!(video.frame_bytes(), 320 * 240 * 4);

        let audio = AudioConfig {
            sample_rate: 44100,
            channels: 2,
            samples_per_frame: 735,
        };
        assert_eq!(audio.frame_bytes(), 735 * 4);
    }
}
