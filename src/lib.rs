//! A small 2D game engine built in Rust
//!
//! This engine provides:
//! - A frame scheduler with fixed and variable rate phases
//! - Game objects with transform, renderer, rigidbody and collider components
//! - Edge-tracked keyboard and mouse input
//! - A draw-list hand-off to a pluggable render backend

pub mod core;
pub mod ecs;
pub mod input;
pub mod math;
pub mod physics;
pub mod renderer;

// Re-exports for convenience
pub use glam;
pub use hecs;
pub use winit;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::core::{
        Engine, EngineConfig, EngineContext, EngineError, FixedStepMode, HookErrorPolicy,
        HookResult,
    };
    pub use crate::ecs::{
        Behaviour, Collider, ColliderShape, Color, ObjectHandle, ObjectId, Renderer, Rigidbody,
        Transform,
    };
    pub use crate::input::Input;
    pub use crate::math::{DOWN, LEFT, RIGHT, UP, Vec2Ext};
    pub use crate::renderer::SpriteHandle;
    pub use glam::Vec2;
    pub use winit::event::MouseButton;
    pub use winit::keyboard::KeyCode;
}
