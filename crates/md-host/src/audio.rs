//! Audio device output.
//!
//! Opens the default cpal output device and drains the shared
//! [`AudioRingBuffer`] from the device callback. The callback thread
//! only ever calls `read_into`, which zero-fills on underrun, so a
//! starved device plays silence instead of stalling.

use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleRate, Stream, StreamConfig};

use crate::ring::AudioRingBuffer;
use md_core::AudioConfig;

/// Owns the cpal stream for the lifetime of the host.
///
/// Dropping this stops the callback, which is why the host tears it
/// down before the ring buffer.
pub struct AudioOutput {
    stream: Stream,
}

impl AudioOutput {
    /// Open the default output device and start draining `ring`.
    ///
    /// Returns `None` if no device is available; the caller is expected
    /// to continue without sound.
    #[must_use]
    pub fn new(config: &AudioConfig, ring: Arc<AudioRingBuffer>) -> Option<Self> {
        let host = cpal::default_host();
        let device = host.default_output_device()?;

        let stream_config = StreamConfig {
            channels: config.channels,
            sample_rate: SampleRate(config.sample_rate),
            buffer_size: BufferSize::Default,
        };

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                    // The ring stores the same interleaved 16-bit LE
                    // bytes the engine produced.
                    let bytes: &mut [u8] = bytemuck::cast_slice_mut(data);
                    ring.read_into(bytes);
                },
                |err| eprintln!("audio stream error: {err}"),
                None,
            )
            .ok()?;

        stream.play().ok()?;

        Some(Self { stream })
    }

    /// Resume playback after a pause.
    pub fn play(&self) {
        if let Err(err) = self.stream.play() {
            eprintln!("audio stream failed to resume: {err}");
        }
    }

    /// Stop invoking the device callback until [`play`](Self::play).
    pub fn pause(&self) {
        if let Err(err) = self.stream.pause() {
            eprintln!("audio stream failed to pause: {err}");
        }
    }
}
