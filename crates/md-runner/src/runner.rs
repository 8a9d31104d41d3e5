//! Main loop: window, framebuffer upload, keyboard and gamepads.

use std::path::PathBuf;
use std::sync::Arc;

use gilrs::{Axis, Button as PadButton, Event, GamepadId, Gilrs};
use md_core::{Engine, Region};
use md_host::{Button, Host, HostConfig};
use pixels::{Pixels, SurfaceTexture};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::keys;
use crate::surface::WindowSurface;

/// Configuration for the runner.
pub struct RunnerConfig {
    /// Window title.
    pub title: String,
    /// Integer scale factor for sharp pixels.
    pub scale: u32,
    /// Console region; sets the scheduler's target refresh rate.
    pub region: Region,
    /// ROM image loaded once the window exists.
    pub rom_path: Option<PathBuf>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            title: "Mega Drive".to_string(),
            scale: 2,
            region: Region::Japan,
            rom_path: None,
        }
    }
}

/// Run an engine under the host with the given configuration.
pub fn run<E: Engine + 'static>(engine: E, config: RunnerConfig) {
    let event_loop = EventLoop::new().expect("failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut runner = Runner::new(engine, config);
    event_loop.run_app(&mut runner).expect("event loop error");
}

/// Application handler wiring winit events into the host.
pub struct Runner {
    host: Host,
    config: RunnerConfig,
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    gilrs: Option<Gilrs>,
    active_gamepad: Option<GamepadId>,
    /// Pressed-mask of gamepad buttons from the previous poll, so only
    /// transitions are applied and keyboard input is not overwritten.
    gamepad_pressed: u16,
}

impl Runner {
    /// Create a runner around a fresh host for the given engine.
    pub fn new<E: Engine + 'static>(engine: E, config: RunnerConfig) -> Self {
        let mut host = Host::new(HostConfig {
            region: config.region,
            ..HostConfig::default()
        });
        host.attach_engine(Box::new(engine));
        keys::install_default_bindings(&mut host);

        let gilrs = match Gilrs::new() {
            Ok(gilrs) => Some(gilrs),
            Err(err) => {
                eprintln!("warning: gamepad support unavailable: {err}");
                None
            }
        };

        Self {
            host,
            config,
            window: None,
            pixels: None,
            gilrs,
            active_gamepad: None,
            gamepad_pressed: 0,
        }
    }

    /// Host access for embedders that drive debugging themselves.
    pub fn host_mut(&mut self) -> &mut Host {
        &mut self.host
    }

    /// Current pressed-mask of the active gamepad, in pad-bit layout.
    fn poll_gamepad(&mut self) -> u16 {
        let Some(gilrs) = self.gilrs.as_mut() else {
            return 0;
        };
        while let Some(Event { id, .. }) = gilrs.next_event() {
            self.active_gamepad = Some(id);
        }
        let Some(gamepad) = self.active_gamepad.and_then(|id| gilrs.connected_gamepad(id)) else {
            return 0;
        };

        const AXIS_THRESHOLD: f32 = 0.5;
        let axis = |axis: Axis| gamepad.axis_data(axis).map_or(0.0, |data| data.value());

        let mut pressed = 0u16;
        let mut press = |button: Button, is_pressed: bool| {
            if is_pressed {
                pressed |= button.mask();
            }
        };

        press(
            Button::Up,
            gamepad.is_pressed(PadButton::DPadUp) || axis(Axis::LeftStickY) > AXIS_THRESHOLD,
        );
        press(
            Button::Down,
            gamepad.is_pressed(PadButton::DPadDown) || axis(Axis::LeftStickY) < -AXIS_THRESHOLD,
        );
        press(
            Button::Left,
            gamepad.is_pressed(PadButton::DPadLeft) || axis(Axis::LeftStickX) < -AXIS_THRESHOLD,
        );
        press(
            Button::Right,
            gamepad.is_pressed(PadButton::DPadRight) || axis(Axis::LeftStickX) > AXIS_THRESHOLD,
        );
        press(Button::A, gamepad.is_pressed(PadButton::West));
        press(Button::B, gamepad.is_pressed(PadButton::South));
        press(Button::C, gamepad.is_pressed(PadButton::East));
        press(Button::X, gamepad.is_pressed(PadButton::LeftTrigger));
        press(Button::Y, gamepad.is_pressed(PadButton::North));
        press(Button::Z, gamepad.is_pressed(PadButton::RightTrigger));
        press(Button::Start, gamepad.is_pressed(PadButton::Start));
        press(Button::Mode, gamepad.is_pressed(PadButton::Select));

        pressed
    }

    fn apply_gamepad_transitions(&mut self) {
        let pressed = self.poll_gamepad();
        let changed = pressed ^ self.gamepad_pressed;
        if changed != 0 {
            for button in Button::ALL {
                if changed & button.mask() != 0 {
                    self.host
                        .set_button(0, button, pressed & button.mask() != 0);
                }
            }
        }
        self.gamepad_pressed = pressed;
    }

    fn handle_debug_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::F5 => {
                self.host.resume();
            }
            KeyCode::F6 => {
                self.host.request_break();
            }
            KeyCode::F10 => {
                self.host.step_into();
                println!("stepped to ${:06X}", self.host.pc());
            }
            _ => {}
        }
    }
}

impl ApplicationHandler for Runner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let video = self
            .host
            .video_config()
            .expect("engine attached before run");
        let scaled_width = video.width * self.config.scale;
        let scaled_height = video.height * self.config.scale;

        let window = Arc::new(
            event_loop
                .create_window(
                    Window::default_attributes()
                        .with_title(&self.config.title)
                        .with_inner_size(LogicalSize::new(scaled_width, scaled_height)),
                )
                .expect("failed to create window"),
        );

        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width, size.height, Arc::clone(&window));
        let pixels =
            Pixels::new(video.width, video.height, surface).expect("failed to create pixels");

        self.host
            .attach_surface(Box::new(WindowSurface::new(Arc::clone(&window))));

        self.window = Some(window);
        // SAFETY: pixels lifetime is tied to window which lives for the
        // program duration
        self.pixels = Some(unsafe { std::mem::transmute(pixels) });

        if let Some(path) = self.config.rom_path.take() {
            if let Err(err) = self.host.load_rom(&path.to_string_lossy()) {
                eprintln!("{err}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    if let Some(pixels) = &mut self.pixels {
                        pixels.resize_surface(size.width, size.height).ok();
                    }
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    let pressed = event.state == ElementState::Pressed;
                    if pressed && !event.repeat {
                        self.handle_debug_key(keycode);
                        if keycode == KeyCode::Escape {
                            event_loop.exit();
                            return;
                        }
                    }
                    if let Some(code) = keys::from_winit(keycode) {
                        if !event.repeat {
                            self.host.key_event(code, pressed);
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if let (Some(pixels), Some(frame)) = (&mut self.pixels, self.host.frame_pixels()) {
                    pixels.frame_mut().copy_from_slice(frame);
                    if pixels.render().is_err() {
                        event_loop.exit();
                    }
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            return;
        }

        self.apply_gamepad_transitions();
        self.host.update();
    }
}
