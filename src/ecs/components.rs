//! Components owned by every game object

use glam::Vec2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::world::ObjectHandle;
use crate::math::DOWN;
use crate::renderer::SpriteHandle;

/// Integer identity of a game object.
///
/// Unique among live objects. IDs released by `destroy` are handed out again
/// before new ones are minted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl ObjectId {
    /// Placeholder for an object whose identity could not be read
    pub const UNKNOWN: Self = Self(u32::MAX);
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity and flags of a game object
#[derive(Debug, Clone)]
pub struct GameObject {
    /// Registry-issued ID
    pub(crate) id: ObjectId,
    /// Spawn catalog tag this object was built from
    pub(crate) type_tag: String,
    /// Whether the object takes part in FixedUpdate/PhysicsUpdate/Update/Draw
    pub(crate) enabled: bool,
    /// Display name, defaults to the type tag
    pub name: String,
    /// Free-form grouping tag
    pub tag: String,
    /// Tag other colliders filter on
    pub collider_tag: String,
}

impl GameObject {
    pub(crate) fn new(id: ObjectId, type_tag: &str) -> Self {
        Self {
            id,
            type_tag: type_tag.to_string(),
            enabled: true,
            name: type_tag.to_string(),
            tag: String::new(),
            collider_tag: String::new(),
        }
    }

    /// Registry-issued ID
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Spawn catalog tag
    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    /// Whether the object is enabled
    pub fn enabled(&self) -> bool {
        self.enabled
    }
}

/// Position, rotation and scale of a game object.
///
/// `position` and `rotation` are always world values. For a parented object
/// they are recomputed from the local values before drawing, so move it
/// through `local_position` and `local_rotation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in world space
    pub position: Vec2,
    /// Position relative to the parent; only used when `parent` is set
    pub local_position: Vec2,
    /// Scale factor
    pub scale: Vec2,
    /// Rotation in world space, in degrees, counter-clockwise
    pub rotation: f32,
    /// Rotation relative to the parent; only used when `parent` is set
    pub local_rotation: f32,
    /// Parent used to resolve the local values into `position` and `rotation`
    pub(crate) parent: Option<ObjectHandle>,
}

impl Transform {
    /// Create a transform at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transform with a position and rotation
    pub fn from_position_rotation(position: Vec2, rotation: f32) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Parent handle, if any
    pub fn parent(&self) -> Option<ObjectHandle> {
        self.parent
    }

    /// Translate by a delta. Moves the local position of parented transforms.
    pub fn translate(&mut self, delta: Vec2) {
        if self.parent.is_some() {
            self.local_position += delta;
        } else {
            self.position += delta;
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            local_position: Vec2::ZERO,
            scale: Vec2::ONE,
            rotation: 0.0,
            local_rotation: 0.0,
            parent: None,
        }
    }
}

/// RGBA tint color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    /// Opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with alpha
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// How a game object is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Renderer {
    /// Draw this object
    pub enabled: bool,
    /// Sprite to draw; `None` draws nothing
    pub sprite: Option<SpriteHandle>,
    /// Tint applied to the sprite
    pub tint: Color,
    /// Depth hint (negative = closer). Passed through to the backend, not sorted on.
    pub draw_depth: i32,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            enabled: true,
            sprite: None,
            tint: Color::WHITE,
            draw_depth: 0,
        }
    }
}

/// Simple velocity/gravity body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rigidbody {
    /// Integrate this body during PhysicsUpdate
    pub enabled: bool,
    /// Apply `gravity` each fixed step
    pub gravity_enabled: bool,
    /// Acceleration applied when gravity is enabled
    pub gravity: Vec2,
    /// Current velocity
    pub velocity: Vec2,
}

impl Default for Rigidbody {
    fn default() -> Self {
        Self {
            enabled: false,
            gravity_enabled: false,
            gravity: DOWN * 1024.0,
            velocity: Vec2::ZERO,
        }
    }
}

/// Collision shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    /// Axis-aligned box of the given full size, centered on the position
    Box(Vec2),
    /// Circle of the given radius
    Circle(f32),
}

/// Collision filter and shape. Detection only; nothing resolves contacts.
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    /// Take part in overlap checks
    pub enabled: bool,
    /// Shape
    pub shape: ColliderShape,
    /// Collider tags this collider reacts to; empty means every tag
    pub collides_with: SmallVec<[String; 4]>,
}

impl Default for Collider {
    fn default() -> Self {
        Self {
            enabled: false,
            shape: ColliderShape::Box(Vec2::ZERO),
            collides_with: SmallVec::new(),
        }
    }
}

impl Collider {
    /// Whether this collider reacts to objects carrying `collider_tag`
    pub fn accepts(&self, collider_tag: &str) -> bool {
        self.collides_with.is_empty() || self.collides_with.iter().any(|t| t == collider_tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_defaults() {
        let transform = Transform::default();
        assert_eq!(transform.scale, Vec2::ONE);
        assert!(transform.parent().is_none());

        let renderer = Renderer::default();
        assert!(renderer.enabled);
        assert!(renderer.sprite.is_none());

        let body = Rigidbody::default();
        assert!(!body.enabled);
        assert_eq!(body.gravity, Vec2::new(0.0, -1024.0));
    }

    #[test]
    fn test_game_object_name_defaults_to_type() {
        let object = GameObject::new(ObjectId(7), "Player");
        assert_eq!(object.name, "Player");
        assert_eq!(object.type_tag(), "Player");
        assert!(object.enabled());
    }

    #[test]
    fn test_collider_accepts() {
        let mut collider = Collider::default();
        assert!(collider.accepts("Enemy"));

        collider.collides_with.push("Wall".to_string());
        assert!(collider.accepts("Wall"));
        assert!(!collider.accepts("Enemy"));
    }

    #[test]
    fn test_translate_moves_local_when_parented() {
        let mut world = hecs::World::new();
        let parent = ObjectHandle(world.spawn(()));

        let mut transform = Transform::default();
        transform.translate(Vec2::X);
        assert_eq!(transform.position, Vec2::X);

        transform.parent = Some(parent);
        transform.translate(Vec2::Y);
        assert_eq!(transform.local_position, Vec2::Y);
        assert_eq!(transform.position, Vec2::X);
    }
}
