//! Cross-thread sample buffer between the scheduler and the audio device.
//!
//! The producer (frame scheduler) and consumer (audio callback) run at
//! independent cadences, so neither side may ever block the other:
//! writing past capacity drops the oldest stored bytes, reading past
//! the stored count fills the rest of the output with silence. Glitches
//! under sustained mismatch are the accepted cost of a best-effort
//! real-time path.

use std::sync::{Mutex, MutexGuard};

struct Ring {
    buf: Box<[u8]>,
    start: usize,
    stored: usize,
}

/// Fixed-capacity byte ring shared between exactly two threads.
///
/// All access goes through a single mutex held only for the duration of
/// one `write` or `read_into`.
pub struct AudioRingBuffer {
    capacity: usize,
    inner: Mutex<Ring>,
}

impl AudioRingBuffer {
    /// Create a ring holding at most `capacity` bytes.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(Ring {
                buf: vec![0; capacity].into_boxed_slice(),
                start: 0,
                stored: 0,
            }),
        }
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes currently stored.
    #[must_use]
    pub fn stored(&self) -> usize {
        self.lock().stored
    }

    /// Append sample bytes, dropping the oldest data on overflow.
    ///
    /// An input longer than the whole ring keeps only its trailing
    /// `capacity` bytes. Returns the number of bytes accepted, always
    /// `min(bytes.len(), capacity)`. Never blocks beyond the lock.
    pub fn write(&self, bytes: &[u8]) -> usize {
        if self.capacity == 0 {
            return 0;
        }
        let src = if bytes.len() > self.capacity {
            &bytes[bytes.len() - self.capacity..]
        } else {
            bytes
        };

        let mut guard = self.lock();
        let ring = &mut *guard;
        let overflow = (ring.stored + src.len()).saturating_sub(self.capacity);
        if overflow > 0 {
            ring.start = (ring.start + overflow) % self.capacity;
            ring.stored -= overflow;
        }

        let pos = (ring.start + ring.stored) % self.capacity;
        let first = (self.capacity - pos).min(src.len());
        ring.buf[pos..pos + first].copy_from_slice(&src[..first]);
        ring.buf[..src.len() - first].copy_from_slice(&src[first..]);
        ring.stored += src.len();

        bytes.len().min(self.capacity)
    }

    /// Fill `out` from the ring, zero-filling whatever is not available.
    ///
    /// Returns the number of bytes that came from the ring; the rest of
    /// `out` is silence. Never blocks beyond the lock.
    pub fn read_into(&self, out: &mut [u8]) -> usize {
        if self.capacity == 0 {
            out.fill(0);
            return 0;
        }

        let mut guard = self.lock();
        let ring = &mut *guard;
        let n = out.len().min(ring.stored);
        let first = (self.capacity - ring.start).min(n);
        out[..first].copy_from_slice(&ring.buf[ring.start..ring.start + first]);
        out[first..n].copy_from_slice(&ring.buf[..n - first]);
        ring.start = (ring.start + n) % self.capacity;
        ring.stored -= n;

        out[n..].fill(0);
        n
    }

    fn lock(&self) -> MutexGuard<'_, Ring> {
        // A poisoned lock only means a panic elsewhere; the byte ring is
        // valid in every state, so keep serving audio.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
