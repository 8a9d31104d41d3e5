//! Winit-backed presentation surface.

use std::sync::Arc;

use md_host::PresentationSurface;
use winit::dpi::PhysicalPosition;
use winit::window::Window;

/// Forwards the host's surface chrome requests to a winit window and
/// turns frame presentation into redraw requests.
pub struct WindowSurface {
    window: Arc<Window>,
}

impl WindowSurface {
    #[must_use]
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }
}

impl PresentationSurface for WindowSurface {
    fn present(&mut self) {
        self.window.request_redraw();
    }

    fn show(&mut self) {
        self.window.set_visible(true);
    }

    fn hide(&mut self) {
        self.window.set_visible(false);
    }

    fn set_position(&mut self, x: i32, y: i32) {
        self.window.set_outer_position(PhysicalPosition::new(x, y));
    }

    fn bring_to_front(&mut self) {
        self.window.focus_window();
    }
}
