//! Velocity and gravity integration

use crate::ecs::{Rigidbody, Transform};

/// Advance one body by `dt` seconds.
///
/// Gravity is added to the velocity first, then the velocity moves the
/// transform (semi-implicit Euler). Parented transforms move their local
/// position.
pub fn integrate(body: &mut Rigidbody, transform: &mut Transform, dt: f32) {
    if !body.enabled {
        return;
    }
    if body.gravity_enabled {
        body.velocity += body.gravity * dt;
    }
    transform.translate(body.velocity * dt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn falling_body() -> Rigidbody {
        Rigidbody {
            enabled: true,
            gravity_enabled: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_gravity_from_rest() {
        let mut body = falling_body();
        let mut transform = Transform::default();
        integrate(&mut body, &mut transform, 0.006);

        assert!((body.velocity - Vec2::new(0.0, -6.144)).length() < 1e-5);
        assert!((transform.position.y - -6.144 * 0.006).abs() < 1e-6);
    }

    #[test]
    fn test_disabled_body_does_not_move() {
        let mut body = Rigidbody {
            velocity: Vec2::X,
            ..Default::default()
        };
        let mut transform = Transform::default();
        integrate(&mut body, &mut transform, 1.0);
        assert_eq!(transform.position, Vec2::ZERO);
    }

    #[test]
    fn test_velocity_without_gravity() {
        let mut body = Rigidbody {
            enabled: true,
            velocity: Vec2::new(2.0, 0.0),
            ..Default::default()
        };
        let mut transform = Transform::default();
        integrate(&mut body, &mut transform, 0.5);
        assert_eq!(body.velocity, Vec2::new(2.0, 0.0));
        assert_eq!(transform.position, Vec2::new(1.0, 0.0));
    }
}
