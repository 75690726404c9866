//! Parent chain resolution
//!
//! A transform may name a parent. The parent is a back-reference only; it
//! does not own the child. World poses are resolved by walking the chain
//! iteratively with a visited set, so a cycle is reported instead of looping.

use glam::Vec2;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use super::components::{GameObject, Transform};
use super::world::{ObjectHandle, World};
use crate::core::EngineError;
use crate::math::Vec2Ext;

/// World-space position, rotation and scale of an object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPose {
    /// Position in world space
    pub position: Vec2,
    /// Rotation in degrees
    pub rotation: f32,
    /// Accumulated scale
    pub scale: Vec2,
}

impl WorldPose {
    /// Pose of a transform with no parent
    #[must_use]
    pub fn of_root(transform: &Transform) -> Self {
        Self {
            position: transform.position,
            rotation: transform.rotation,
            scale: transform.scale,
        }
    }

    /// Pose of a child transform under this pose
    #[must_use]
    pub fn child(&self, local: &Transform) -> Self {
        Self {
            position: self.position
                + (local.local_position * self.scale).rotate_degrees(self.rotation),
            rotation: self.rotation + local.local_rotation,
            scale: self.scale * local.scale,
        }
    }

    /// Express a world position relative to this pose
    #[must_use]
    pub fn to_local(&self, world_position: Vec2) -> Vec2 {
        let unscale = Vec2::new(
            if self.scale.x == 0.0 { 1.0 } else { self.scale.x },
            if self.scale.y == 0.0 { 1.0 } else { self.scale.y },
        );
        (world_position - self.position).rotate_degrees(-self.rotation) / unscale
    }
}

fn object_id(world: &World, handle: ObjectHandle) -> Result<super::ObjectId, EngineError> {
    world
        .get::<GameObject>(handle)
        .map(|object| object.id())
        .map_err(|_| EngineError::StaleHandle)
}

/// Resolve the world pose of `handle` by walking its parent chain.
///
/// A parent that no longer exists ends the chain.
///
/// # Errors
///
/// [`EngineError::StaleHandle`] if `handle` is gone,
/// [`EngineError::CyclicParent`] if the chain loops.
pub fn world_pose(world: &World, handle: ObjectHandle) -> Result<WorldPose, EngineError> {
    let mut chain: SmallVec<[Transform; 8]> = SmallVec::new();
    let mut visited = FxHashSet::default();
    let mut current = Some(handle);

    while let Some(link) = current {
        if !visited.insert(link) {
            return Err(EngineError::CyclicParent(object_id(world, handle)?));
        }
        let transform = *world
            .get::<Transform>(link)
            .map_err(|_| EngineError::StaleHandle)?;
        current = transform.parent.filter(|parent| world.contains(*parent));
        chain.push(transform);
    }

    // chain is [handle, parent, ..., root]
    let mut links = chain.iter().rev();
    let Some(root) = links.next() else {
        return Err(EngineError::StaleHandle);
    };
    Ok(links.fold(WorldPose::of_root(root), |pose, local| pose.child(local)))
}

/// Whether making `parent` the parent of `child` would close a loop
pub(crate) fn would_cycle(world: &World, child: ObjectHandle, parent: ObjectHandle) -> bool {
    let mut visited = FxHashSet::default();
    let mut current = Some(parent);
    while let Some(link) = current {
        if link == child || !visited.insert(link) {
            return true;
        }
        current = world
            .get::<Transform>(link)
            .ok()
            .and_then(|transform| transform.parent);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::ObjectId;

    fn spawn_at(world: &mut World, id: u32, position: Vec2) -> ObjectHandle {
        world.spawn(
            GameObject::new(ObjectId(id), "Node"),
            Transform::from_position_rotation(position, 0.0),
        )
    }

    fn link(world: &mut World, child: ObjectHandle, parent: ObjectHandle, local: Vec2) {
        let transform = world.get_mut::<Transform>(child).unwrap();
        transform.parent = Some(parent);
        transform.local_position = local;
    }

    #[test]
    fn test_root_pose_is_own_transform() {
        let mut world = World::new();
        let root = spawn_at(&mut world, 0, Vec2::new(3.0, 4.0));
        let pose = world_pose(&world, root).unwrap();
        assert_eq!(pose.position, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_chain_accumulates_offsets() {
        let mut world = World::new();
        let root = spawn_at(&mut world, 0, Vec2::new(10.0, 0.0));
        let middle = spawn_at(&mut world, 1, Vec2::ZERO);
        let leaf = spawn_at(&mut world, 2, Vec2::ZERO);
        link(&mut world, middle, root, Vec2::new(0.0, 5.0));
        link(&mut world, leaf, middle, Vec2::new(1.0, 1.0));

        let pose = world_pose(&world, leaf).unwrap();
        assert!((pose.position - Vec2::new(11.0, 6.0)).length() < 1e-5);
    }

    #[test]
    fn test_parent_rotation_and_scale_apply_to_children() {
        let mut world = World::new();
        let root = spawn_at(&mut world, 0, Vec2::ZERO);
        {
            let transform = world.get_mut::<Transform>(root).unwrap();
            transform.rotation = 90.0;
            transform.scale = Vec2::splat(2.0);
        }
        let child = spawn_at(&mut world, 1, Vec2::ZERO);
        link(&mut world, child, root, Vec2::new(1.0, 0.0));

        world.get_mut::<Transform>(child).unwrap().local_rotation = 15.0;

        let pose = world_pose(&world, child).unwrap();
        assert!((pose.position - Vec2::new(0.0, 2.0)).length() < 1e-4);
        assert!((pose.rotation - 105.0).abs() < 1e-4);

        let root_pose = world_pose(&world, root).unwrap();
        assert!((root_pose.to_local(pose.position) - Vec2::new(1.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_cycle_is_reported() {
        let mut world = World::new();
        let a = spawn_at(&mut world, 0, Vec2::ZERO);
        let b = spawn_at(&mut world, 1, Vec2::ZERO);
        link(&mut world, a, b, Vec2::ZERO);
        link(&mut world, b, a, Vec2::ZERO);

        assert!(matches!(
            world_pose(&world, a),
            Err(EngineError::CyclicParent(ObjectId(0)))
        ));
        assert!(would_cycle(&world, a, b));
    }

    #[test]
    fn test_would_cycle_detects_ancestor() {
        let mut world = World::new();
        let root = spawn_at(&mut world, 0, Vec2::ZERO);
        let child = spawn_at(&mut world, 1, Vec2::ZERO);
        link(&mut world, child, root, Vec2::ZERO);

        assert!(would_cycle(&world, root, child));
        assert!(would_cycle(&world, root, root));
        assert!(!would_cycle(&world, child, root));
    }

    #[test]
    fn test_missing_parent_ends_chain() {
        let mut world = World::new();
        let parent = spawn_at(&mut world, 0, Vec2::ZERO);
        let child = spawn_at(&mut world, 1, Vec2::new(7.0, 7.0));
        link(&mut world, child, parent, Vec2::ZERO);
        world.despawn(parent).unwrap();

        let pose = world_pose(&world, child).unwrap();
        assert_eq!(pose.position, Vec2::new(7.0, 7.0));
    }
}
