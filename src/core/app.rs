//! Windowed runner: drives engine ticks from a winit event loop

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::core::engine::Engine;
use crate::core::error::EngineError;
use crate::input::WindowInput;

/// Redraw continuously while running; sleep until the next event while paused
fn control_flow(engine: &Engine) -> ControlFlow {
    if engine.is_running() {
        ControlFlow::Poll
    } else {
        ControlFlow::Wait
    }
}

/// Window host around an [`Engine`]
struct App {
    engine: Engine,
    /// Event side of the engine's input device
    input: WindowInput,
    window: Option<Arc<Window>>,
    /// First fatal error; ends the event loop
    error: Option<EngineError>,
}

impl App {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: EngineError) {
        log::error!("Shutting down: {err}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if !self.engine.is_running() {
            return;
        }
        match self.engine.tick() {
            Ok(report) => log::trace!(
                "Frame {}: {} fixed steps, {} draws",
                report.frame,
                report.fixed_steps,
                report.draw_calls
            ),
            Err(err) => {
                self.fail(event_loop, err);
                return;
            }
        }

        if self.engine.should_quit() {
            log::info!("Quit requested, shutting down");
            event_loop.exit();
            return;
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let config = self.engine.config();
        let window_attrs = Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(PhysicalSize::new(config.width, config.height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                self.fail(event_loop, EngineError::Window(err.to_string()));
                return;
            }
        };
        let size = window.inner_size();
        self.engine.resize(size.width, size.height);
        self.window = Some(window);

        self.engine.start();
        log::info!("Window created ({}x{})", size.width, size.height);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, shutting down");
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if new_size.width > 0 && new_size.height > 0 {
                    self.engine.resize(new_size.width, new_size.height);
                }
            }

            WindowEvent::Focused(focused) => {
                if focused {
                    self.engine.start();
                } else {
                    self.input.release_all();
                    self.engine.stop();
                }
                event_loop.set_control_flow(control_flow(&self.engine));
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    self.input.process_keyboard(key_code, event.state);
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.input.process_mouse_button(button, state);
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.input
                    .process_cursor_moved(glam::Vec2::new(position.x as f32, position.y as f32));
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if !self.engine.is_running() {
            return;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl Engine {
    /// Open a window and run until it is closed or a behaviour quits.
    ///
    /// Input comes from window events; any input device set on the builder is
    /// replaced. The engine pauses while the window is unfocused.
    ///
    /// # Errors
    ///
    /// Returns the event loop or window error, or the hook failures that
    /// halted the engine.
    pub fn run(mut self) -> Result<(), EngineError> {
        if env_logger::try_init().is_err() {
            log::debug!("Logger already initialized");
        }
        log::info!("Starting engine: {}", self.config().title);

        let input = WindowInput::new();
        self.set_input_device(input.clone());

        let event_loop = EventLoop::new().map_err(|e| EngineError::EventLoop(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App {
            engine: self,
            input,
            window: None,
            error: None,
        };
        event_loop
            .run_app(&mut app)
            .map_err(|e| EngineError::EventLoop(e.to_string()))?;

        match app.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paused_engine_waits_for_events() {
        let mut engine = Engine::builder().build().unwrap();
        assert_eq!(control_flow(&engine), ControlFlow::Wait);

        engine.start();
        assert_eq!(control_flow(&engine), ControlFlow::Poll);

        engine.stop();
        assert_eq!(control_flow(&engine), ControlFlow::Wait);
    }
}
