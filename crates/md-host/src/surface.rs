//! Presentation-surface seam.
//!
//! The host never talks to a window system directly; it asks the
//! attached surface to present the current frame and passes window
//! chrome requests straight through. `md-runner` supplies a winit
//! implementation.

/// Where finished frames go, plus thin window chrome passthrough.
pub trait PresentationSurface {
    /// A new frame is ready in the host's frame store.
    fn present(&mut self);

    fn show(&mut self);

    fn hide(&mut self);

    fn set_position(&mut self, x: i32, y: i32);

    fn bring_to_front(&mut self);
}

/// Surface that discards everything. Used headless and in tests.
pub struct NullSurface;

impl PresentationSurface for NullSurface {
    fn present(&mut self) {}
    fn show(&mut self) {}
    fn hide(&mut self) {}
    fn set_position(&mut self, _x: i32, _y: i32) {}
    fn bring_to_front(&mut self) {}
}
