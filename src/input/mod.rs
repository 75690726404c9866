//! Input handling module
//!
//! Raw devices are polled once per frame; [`Input`] turns the polled state
//! into down/held/up edges.

mod device;
mod state;

pub use device::{InputDevice, ScriptedInput, WindowInput};
pub use state::{ButtonState, ButtonStates, Input};
