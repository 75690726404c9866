//! Rendering hand-off
//!
//! The engine collects one [`DrawRequest`] per visible object each frame and
//! passes them to a [`RenderBackend`]. Drawing itself is up to the backend.

mod headless;
mod sprite;

use std::path::Path;

use glam::Vec2;

pub use headless::{FrameLog, HeadlessRenderer, PresentedFrame};
pub use sprite::{Sprite, SpriteHandle, SpriteLibrary};

use crate::core::EngineError;
use crate::ecs::Color;

/// One sprite to draw this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRequest {
    pub sprite: SpriteHandle,
    /// World position of the object
    pub position: Vec2,
    /// World rotation in degrees
    pub rotation: f32,
    pub scale: Vec2,
    pub tint: Color,
    /// Depth hint, passed through unsorted
    pub depth: i32,
}

/// Diagnostics text drawn on top of the frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugOverlay {
    /// Lines, top to bottom
    pub lines: Vec<String>,
}

/// Backend the engine hands its draw list to
pub trait RenderBackend {
    /// Load a sprite from disk
    ///
    /// # Errors
    ///
    /// [`EngineError::AssetNotFound`] if the file cannot be loaded.
    fn load_sprite(&mut self, path: &Path) -> Result<SpriteHandle, EngineError>;

    /// Queue a draw for the current frame
    fn submit(&mut self, request: DrawRequest);

    /// Draw everything submitted since the last call, then forget it
    fn present(&mut self, overlay: Option<&DebugOverlay>);

    /// The target surface changed size
    fn resize(&mut self, _width: u32, _height: u32) {}
}
