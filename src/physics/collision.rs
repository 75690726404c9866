//! Overlap tests between colliders
//!
//! Detection only. Boxes are axis-aligned and ignore rotation; nothing here
//! separates or resolves contacts.

use glam::Vec2;

use crate::core::EngineError;
use crate::ecs::{ColliderShape, ObjectHandle, ObjectManager};

/// Shape scaled and placed in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedShape {
    pub shape: ColliderShape,
    pub center: Vec2,
}

impl PlacedShape {
    /// Place `shape` at `center`, scaled by `scale`
    pub fn new(shape: ColliderShape, center: Vec2, scale: Vec2) -> Self {
        let scale = scale.abs();
        let shape = match shape {
            ColliderShape::Box(size) => ColliderShape::Box(size * scale),
            ColliderShape::Circle(radius) => ColliderShape::Circle(radius * scale.max_element()),
        };
        Self { shape, center }
    }
}

/// Check whether two placed shapes touch or overlap
pub fn shapes_overlap(a: &PlacedShape, b: &PlacedShape) -> bool {
    match (a.shape, b.shape) {
        (ColliderShape::Box(size_a), ColliderShape::Box(size_b)) => {
            let reach = (size_a + size_b) * 0.5;
            let gap = (a.center - b.center).abs();
            gap.x <= reach.x && gap.y <= reach.y
        }
        (ColliderShape::Circle(ra), ColliderShape::Circle(rb)) => {
            a.center.distance_squared(b.center) <= (ra + rb) * (ra + rb)
        }
        (ColliderShape::Box(size), ColliderShape::Circle(radius)) => {
            box_circle(a.center, size, b.center, radius)
        }
        (ColliderShape::Circle(radius), ColliderShape::Box(size)) => {
            box_circle(b.center, size, a.center, radius)
        }
    }
}

fn box_circle(box_center: Vec2, size: Vec2, circle_center: Vec2, radius: f32) -> bool {
    let half = size * 0.5;
    let closest = circle_center.clamp(box_center - half, box_center + half);
    closest.distance_squared(circle_center) <= radius * radius
}

fn placed(
    objects: &ObjectManager,
    handle: ObjectHandle,
) -> Result<Option<PlacedShape>, EngineError> {
    let collider = objects.collider(handle)?;
    if !collider.enabled {
        return Ok(None);
    }
    let pose = objects.world_pose(handle)?;
    Ok(Some(PlacedShape::new(collider.shape, pose.position, pose.scale)))
}

/// Whether two live objects' colliders overlap.
///
/// Both colliders must be enabled and each must accept the other's collider
/// tag.
///
/// # Errors
///
/// [`EngineError::StaleHandle`] if either object is gone.
pub fn overlaps(
    objects: &ObjectManager,
    a: ObjectHandle,
    b: ObjectHandle,
) -> Result<bool, EngineError> {
    if a == b {
        return Ok(false);
    }
    {
        let (collider_a, collider_b) = (objects.collider(a)?, objects.collider(b)?);
        let (object_a, object_b) = (objects.object(a)?, objects.object(b)?);
        if !collider_a.accepts(&object_b.collider_tag)
            || !collider_b.accepts(&object_a.collider_tag)
        {
            return Ok(false);
        }
    }
    match (placed(objects, a)?, placed(objects, b)?) {
        (Some(shape_a), Some(shape_b)) => Ok(shapes_overlap(&shape_a, &shape_b)),
        _ => Ok(false),
    }
}

/// Live objects whose colliders overlap `handle`, in registration order
///
/// # Errors
///
/// [`EngineError::StaleHandle`] if `handle` is gone.
pub fn overlapping(
    objects: &ObjectManager,
    handle: ObjectHandle,
) -> Result<Vec<ObjectHandle>, EngineError> {
    if !objects.contains(handle) {
        return Err(EngineError::StaleHandle);
    }
    let mut hits = Vec::new();
    for other in objects.iter() {
        if other != handle && overlaps(objects, handle, other)? {
            hits.push(other);
        }
    }
    Ok(hits)
}
