//! Edge-tracked input state

use std::hash::Hash;

use glam::Vec2;
use rustc_hash::{FxHashMap, FxHashSet};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

use super::device::InputDevice;

/// Tracked state of one key or button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonState {
    /// Seen pressed on the latest poll
    pub pressed: bool,
    /// First poll it was seen pressed
    pub is_down: bool,
    /// First poll it was seen released
    pub is_up: bool,
}

/// Per-button edge tracker.
///
/// An entry is created on the first poll a button is seen pressed and removed
/// on the poll after its release was reported, so every press-release cycle
/// yields exactly one down edge and one up edge.
#[derive(Debug, Clone)]
pub struct ButtonStates<T> {
    entries: FxHashMap<T, ButtonState>,
}

impl<T> Default for ButtonStates<T> {
    fn default() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }
}

impl<T: Copy + Eq + Hash> ButtonStates<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance every entry by one poll, given the buttons currently pressed
    pub fn update(&mut self, pressed: &FxHashSet<T>) {
        self.entries.retain(|button, state| {
            if pressed.contains(button) {
                // a press right after a reported release starts a new cycle
                *state = ButtonState {
                    pressed: true,
                    is_down: state.is_up,
                    is_up: false,
                };
                true
            } else if state.is_up {
                false
            } else {
                *state = ButtonState {
                    pressed: false,
                    is_down: false,
                    is_up: true,
                };
                true
            }
        });

        for button in pressed {
            self.entries.entry(*button).or_insert(ButtonState {
                pressed: true,
                is_down: true,
                is_up: false,
            });
        }
    }

    /// Pressed on this poll and not on the one before
    pub fn is_down(&self, button: T) -> bool {
        self.entries.get(&button).is_some_and(|state| state.is_down)
    }

    /// Between its down edge and its up edge, both included
    pub fn is_held(&self, button: T) -> bool {
        self.entries.contains_key(&button)
    }

    /// Released on this poll
    pub fn is_up(&self, button: T) -> bool {
        self.entries.get(&button).is_some_and(|state| state.is_up)
    }

    /// Raw entry, if the button is tracked
    pub fn state(&self, button: T) -> Option<ButtonState> {
        self.entries.get(&button).copied()
    }

    /// Number of tracked buttons
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Keyboard, mouse button and cursor state for the current frame
#[derive(Debug, Default)]
pub struct Input {
    keys: ButtonStates<KeyCode>,
    mouse_buttons: ButtonStates<MouseButton>,
    /// Cursor in client coordinates, y down
    cursor: Vec2,
}

impl Input {
    /// Create an input state with nothing pressed
    pub fn new() -> Self {
        Self::default()
    }

    /// Poll `device` once and advance the edge trackers
    pub fn poll(&mut self, device: &mut dyn InputDevice) {
        self.keys.update(&device.poll_keys());
        self.mouse_buttons.update(&device.poll_mouse_buttons());
        self.cursor = device.cursor_position();
    }

    /// Check if a key went down this frame
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.is_down(key)
    }

    /// Check if a key is held, including its down and up frames
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys.is_held(key)
    }

    /// Check if a key was released this frame
    pub fn is_key_up(&self, key: KeyCode) -> bool {
        self.keys.is_up(key)
    }

    /// Check if a mouse button went down this frame
    pub fn is_mouse_button_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons.is_down(button)
    }

    /// Check if a mouse button is held
    pub fn is_mouse_button_held(&self, button: MouseButton) -> bool {
        self.mouse_buttons.is_held(button)
    }

    /// Check if a mouse button was released this frame
    pub fn is_mouse_button_up(&self, button: MouseButton) -> bool {
        self.mouse_buttons.is_up(button)
    }

    /// Key tracker
    pub fn keys(&self) -> &ButtonStates<KeyCode> {
        &self.keys
    }

    /// Mouse button tracker
    pub fn mouse_buttons(&self) -> &ButtonStates<MouseButton> {
        &self.mouse_buttons
    }

    /// Cursor position in client coordinates (y down)
    pub fn cursor_position(&self) -> Vec2 {
        self.cursor
    }

    /// Cursor position with y flipped to point up
    pub fn cursor_world(&self) -> Vec2 {
        Vec2::new(self.cursor.x, -self.cursor.y)
    }
}
