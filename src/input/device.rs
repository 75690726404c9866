//! Raw input sources

use std::cell::RefCell;
use std::hash::Hash;
use std::rc::Rc;

use glam::Vec2;
use rustc_hash::FxHashSet;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

/// Something the engine polls once per frame for raw button state
pub trait InputDevice {
    /// Keys pressed right now
    fn poll_keys(&mut self) -> FxHashSet<KeyCode>;

    /// Mouse buttons pressed right now
    fn poll_mouse_buttons(&mut self) -> FxHashSet<MouseButton>;

    /// Cursor position in client coordinates, y down
    fn cursor_position(&self) -> Vec2;
}

#[derive(Debug, Default)]
struct ScriptedState {
    keys: FxHashSet<KeyCode>,
    mouse_buttons: FxHashSet<MouseButton>,
    cursor: Vec2,
}

/// Input device driven by code, for tests and headless runs.
///
/// Clones share the same state, so a test can keep one clone and hand the
/// other to the engine.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    state: Rc<RefCell<ScriptedState>>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press_key(&self, key: KeyCode) {
        self.state.borrow_mut().keys.insert(key);
    }

    pub fn release_key(&self, key: KeyCode) {
        self.state.borrow_mut().keys.remove(&key);
    }

    pub fn press_mouse_button(&self, button: MouseButton) {
        self.state.borrow_mut().mouse_buttons.insert(button);
    }

    pub fn release_mouse_button(&self, button: MouseButton) {
        self.state.borrow_mut().mouse_buttons.remove(&button);
    }

    pub fn set_cursor(&self, position: Vec2) {
        self.state.borrow_mut().cursor = position;
    }

    /// Release everything
    pub fn release_all(&self) {
        let mut state = self.state.borrow_mut();
        state.keys.clear();
        state.mouse_buttons.clear();
    }
}

impl InputDevice for ScriptedInput {
    fn poll_keys(&mut self) -> FxHashSet<KeyCode> {
        self.state.borrow().keys.clone()
    }

    fn poll_mouse_buttons(&mut self) -> FxHashSet<MouseButton> {
        self.state.borrow().mouse_buttons.clone()
    }

    fn cursor_position(&self) -> Vec2 {
        self.state.borrow().cursor
    }
}

/// Held buttons plus taps that started and ended between two polls
#[derive(Debug)]
struct Latch<T> {
    held: FxHashSet<T>,
    /// Pressed since the last poll
    fresh: FxHashSet<T>,
    /// Pressed and released since the last poll
    taps: FxHashSet<T>,
}

impl<T> Default for Latch<T> {
    fn default() -> Self {
        Self {
            held: FxHashSet::default(),
            fresh: FxHashSet::default(),
            taps: FxHashSet::default(),
        }
    }
}

impl<T: Copy + Eq + Hash> Latch<T> {
    fn handle(&mut self, button: T, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.held.insert(button) {
                    self.fresh.insert(button);
                }
            }
            ElementState::Released => {
                self.held.remove(&button);
                if self.fresh.remove(&button) {
                    self.taps.insert(button);
                }
            }
        }
    }

    fn poll(&mut self) -> FxHashSet<T> {
        let mut pressed = self.held.clone();
        pressed.extend(self.taps.drain());
        self.fresh.clear();
        pressed
    }

    fn clear(&mut self) {
        self.held.clear();
        self.fresh.clear();
        self.taps.clear();
    }
}

#[derive(Debug, Default)]
struct WindowState {
    keys: Latch<KeyCode>,
    mouse_buttons: Latch<MouseButton>,
    cursor: Vec2,
}

/// Input device fed by window events.
///
/// The window host forwards keyboard, mouse and cursor events; the engine
/// polls the accumulated state once per frame. A key pressed and released
/// between two polls is still reported as pressed on the next poll.
#[derive(Debug, Clone, Default)]
pub struct WindowInput {
    state: Rc<RefCell<WindowState>>,
}

impl WindowInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a keyboard event
    pub fn process_keyboard(&self, key: KeyCode, state: ElementState) {
        self.state.borrow_mut().keys.handle(key, state);
    }

    /// Process a mouse button event
    pub fn process_mouse_button(&self, button: MouseButton, state: ElementState) {
        self.state.borrow_mut().mouse_buttons.handle(button, state);
    }

    /// Process cursor movement, in client coordinates
    pub fn process_cursor_moved(&self, position: Vec2) {
        self.state.borrow_mut().cursor = position;
    }

    /// Forget every pressed button, e.g. when the window loses focus
    pub fn release_all(&self) {
        let mut state = self.state.borrow_mut();
        state.keys.clear();
        state.mouse_buttons.clear();
    }
}

impl InputDevice for WindowInput {
    fn poll_keys(&mut self) -> FxHashSet<KeyCode> {
        self.state.borrow_mut().keys.poll()
    }

    fn poll_mouse_buttons(&mut self) -> FxHashSet<MouseButton> {
        self.state.borrow_mut().mouse_buttons.poll()
    }

    fn cursor_position(&self) -> Vec2 {
        self.state.borrow().cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_clones_share_state() {
        let script = ScriptedInput::new();
        let mut device = script.clone();

        script.press_key(KeyCode::Space);
        assert!(device.poll_keys().contains(&KeyCode::Space));

        script.release_key(KeyCode::Space);
        assert!(device.poll_keys().is_empty());
    }

    #[test]
    fn test_window_input_reports_held_keys() {
        let events = WindowInput::new();
        let mut device = events.clone();

        events.process_keyboard(KeyCode::KeyA, ElementState::Pressed);
        assert!(device.poll_keys().contains(&KeyCode::KeyA));
        assert!(device.poll_keys().contains(&KeyCode::KeyA));

        events.process_keyboard(KeyCode::KeyA, ElementState::Released);
        assert!(device.poll_keys().is_empty());
    }

    #[test]
    fn test_window_input_latches_taps() {
        let events = WindowInput::new();
        let mut device = events.clone();

        events.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        events.process_mouse_button(MouseButton::Left, ElementState::Released);

        assert!(device.poll_mouse_buttons().contains(&MouseButton::Left));
        assert!(device.poll_mouse_buttons().is_empty());
    }

    #[test]
    fn test_key_repeat_is_not_a_tap() {
        let events = WindowInput::new();
        let mut device = events.clone();

        events.process_keyboard(KeyCode::KeyS, ElementState::Pressed);
        device.poll_keys();
        events.process_keyboard(KeyCode::KeyS, ElementState::Pressed);
        events.process_keyboard(KeyCode::KeyS, ElementState::Released);
        assert!(device.poll_keys().is_empty());
    }

    #[test]
    fn test_cursor_and_release_all() {
        let events = WindowInput::new();
        let mut device = events.clone();

        events.process_cursor_moved(Vec2::new(5.0, 6.0));
        events.process_keyboard(KeyCode::KeyQ, ElementState::Pressed);
        events.release_all();

        assert_eq!(device.cursor_position(), Vec2::new(5.0, 6.0));
        assert!(device.poll_keys().is_empty());
    }
}
