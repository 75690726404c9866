//! 2D vector helpers
//!
//! The engine uses [`glam::Vec2`] as its vector type. Angles in the public API
//! are in degrees, counter-clockwise from the positive X axis.

use glam::Vec2;

/// Unit vector pointing up (+Y)
pub const UP: Vec2 = Vec2::Y;
/// Unit vector pointing down (-Y)
pub const DOWN: Vec2 = Vec2::NEG_Y;
/// Unit vector pointing left (-X)
pub const LEFT: Vec2 = Vec2::NEG_X;
/// Unit vector pointing right (+X)
pub const RIGHT: Vec2 = Vec2::X;

/// Degree-based helpers for [`Vec2`]
pub trait Vec2Ext {
    /// Angle of the vector in degrees, in `(-180, 180]`
    fn angle_degrees(self) -> f32;

    /// Rotate the vector counter-clockwise by `degrees`
    #[must_use]
    fn rotate_degrees(self, degrees: f32) -> Self;

    /// Unit vector for an angle in degrees
    fn from_angle_degrees(degrees: f32) -> Self;
}

impl Vec2Ext for Vec2 {
    fn angle_degrees(self) -> f32 {
        self.y.atan2(self.x).to_degrees()
    }

    fn rotate_degrees(self, degrees: f32) -> Self {
        if degrees == 0.0 {
            return self;
        }
        Vec2::from_angle(degrees.to_radians()).rotate(self)
    }

    fn from_angle_degrees(degrees: f32) -> Self {
        Vec2::from_angle(degrees.to_radians())
    }
}
