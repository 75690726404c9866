//! Object registry
//!
//! Owns the component world, the behaviours and the ID bookkeeping. Objects
//! are kept in registration order; that order is the dispatch order of every
//! phase and the order lookups return results in.

use std::collections::VecDeque;

use glam::Vec2;
use rustc_hash::FxHashMap;

use super::behaviour::{Behaviour, SpawnCatalog};
use super::components::{Collider, GameObject, ObjectId, Renderer, Rigidbody, Transform};
use super::hierarchy::{self, WorldPose};
use super::world::{ObjectHandle, World};
use crate::core::EngineError;

/// Why an object is waiting to be reaped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Release {
    /// `destroy`: the ID goes back on the free list
    Destroyed,
    /// `clear_all`: the ID is retired for good
    Cleared,
}

/// Per-object state that lives outside the component world
struct Slot {
    /// Taken out while one of its hooks runs
    behaviour: Option<Box<dyn Behaviour>>,
    awoken: bool,
    started: bool,
    pending: Option<Release>,
}

/// Creates, looks up and destroys game objects
pub struct ObjectManager {
    world: World,
    catalog: SpawnCatalog,
    /// Registration order
    order: Vec<ObjectHandle>,
    slots: FxHashMap<ObjectHandle, Slot>,
    ids: FxHashMap<ObjectId, ObjectHandle>,
    free_ids: VecDeque<ObjectId>,
    next_id: u32,
    /// Marked for destroy, in marking order
    doomed: Vec<ObjectHandle>,
}

impl ObjectManager {
    /// Create an empty registry that builds objects from `catalog`
    pub fn new(catalog: SpawnCatalog) -> Self {
        Self {
            world: World::new(),
            catalog,
            order: Vec::new(),
            slots: FxHashMap::default(),
            ids: FxHashMap::default(),
            free_ids: VecDeque::new(),
            next_id: 0,
            doomed: Vec::new(),
        }
    }

    /// Create an object of the registered type `type_tag`.
    ///
    /// The object is registered immediately; its Awake and Start hooks run at
    /// the beginning of the next frame.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownType`] if `type_tag` is not in the spawn catalog.
    pub fn instantiate(
        &mut self,
        type_tag: &str,
        position: Vec2,
        rotation: f32,
    ) -> Result<ObjectHandle, EngineError> {
        self.instantiate_inner(type_tag, position, rotation, None)
    }

    /// Create an object parented to `parent`.
    ///
    /// `position` and `rotation` are world values; the local offset is derived
    /// from the parent's current pose.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownType`] for an unregistered tag,
    /// [`EngineError::StaleHandle`] if `parent` is gone.
    pub fn instantiate_child(
        &mut self,
        type_tag: &str,
        position: Vec2,
        rotation: f32,
        parent: ObjectHandle,
    ) -> Result<ObjectHandle, EngineError> {
        self.instantiate_inner(type_tag, position, rotation, Some(parent))
    }

    fn instantiate_inner(
        &mut self,
        type_tag: &str,
        position: Vec2,
        rotation: f32,
        parent: Option<ObjectHandle>,
    ) -> Result<ObjectHandle, EngineError> {
        let behaviour = self
            .catalog
            .spawn(type_tag)
            .ok_or_else(|| EngineError::UnknownType(type_tag.to_string()))?;

        let mut transform = Transform::from_position_rotation(position, rotation);
        if let Some(parent) = parent {
            if !self.contains(parent) {
                return Err(EngineError::StaleHandle);
            }
            let pose = hierarchy::world_pose(&self.world, parent)?;
            transform.parent = Some(parent);
            transform.local_position = pose.to_local(position);
            transform.local_rotation = rotation - pose.rotation;
        }

        let id = self.allocate_id()?;
        let handle = self.world.spawn(GameObject::new(id, type_tag), transform);
        self.ids.insert(id, handle);
        self.order.push(handle);
        self.slots.insert(
            handle,
            Slot {
                behaviour: Some(behaviour),
                awoken: false,
                started: false,
                pending: None,
            },
        );

        log::debug!("Instantiated `{type_tag}` as object {id}");
        Ok(handle)
    }

    /// Next ID: oldest freed one first, else a fresh one
    fn allocate_id(&mut self) -> Result<ObjectId, EngineError> {
        let id = match self.free_ids.pop_front() {
            Some(id) => id,
            None => {
                let id = ObjectId(self.next_id);
                self.next_id += 1;
                id
            }
        };
        if self.ids.contains_key(&id) {
            return Err(EngineError::DuplicateId(id));
        }
        Ok(id)
    }

    /// Mark an object for destruction.
    ///
    /// The object stops taking part in dispatch and lookups at once and is
    /// reaped after the current phase. Destroying an object that is already
    /// marked does nothing.
    ///
    /// # Errors
    ///
    /// [`EngineError::StaleHandle`] if the object was already reaped.
    pub fn destroy(&mut self, handle: ObjectHandle) -> Result<(), EngineError> {
        let slot = self.slots.get_mut(&handle).ok_or(EngineError::StaleHandle)?;
        if slot.pending.is_none() {
            slot.pending = Some(Release::Destroyed);
            self.doomed.push(handle);
        }
        Ok(())
    }

    /// Mark every object for destruction.
    ///
    /// IDs of cleared objects are never handed out again. IDs freed before the
    /// clear stay reusable and the ID counter keeps counting.
    pub fn clear_all(&mut self) {
        log::info!("Clearing {} objects", self.order.len());
        for handle in &self.order {
            if let Some(slot) = self.slots.get_mut(handle) {
                match slot.pending {
                    None => {
                        slot.pending = Some(Release::Cleared);
                        self.doomed.push(*handle);
                    }
                    Some(Release::Destroyed) => slot.pending = Some(Release::Cleared),
                    Some(Release::Cleared) => {}
                }
            }
        }
    }

    /// Live object with `id`
    pub fn get_by_id(&self, id: ObjectId) -> Option<ObjectHandle> {
        self.ids
            .get(&id)
            .copied()
            .filter(|handle| self.contains(*handle))
    }

    /// Live objects whose tag is `tag`, in registration order
    pub fn get_by_tag(&self, tag: &str) -> Vec<ObjectHandle> {
        self.filter_objects(|object| object.tag == tag)
    }

    /// Live objects whose collider tag is `collider_tag`, in registration order
    pub fn get_by_collider_tag(&self, collider_tag: &str) -> Vec<ObjectHandle> {
        self.filter_objects(|object| object.collider_tag == collider_tag)
    }

    /// Live objects named `name`, in registration order
    pub fn get_by_name(&self, name: &str) -> Vec<ObjectHandle> {
        self.filter_objects(|object| object.name == name)
    }

    fn filter_objects(&self, predicate: impl Fn(&GameObject) -> bool) -> Vec<ObjectHandle> {
        self.iter()
            .filter(|handle| {
                self.world
                    .get::<GameObject>(*handle)
                    .is_ok_and(|object| predicate(&object))
            })
            .collect()
    }

    /// Live objects in registration order
    pub fn iter(&self) -> impl Iterator<Item = ObjectHandle> + '_ {
        self.order
            .iter()
            .copied()
            .filter(|handle| self.contains(*handle))
    }

    /// Whether `handle` is alive and not marked for destruction
    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.slots
            .get(&handle)
            .is_some_and(|slot| slot.pending.is_none())
    }

    /// Whether `handle` is marked for destruction but not reaped yet
    pub fn is_pending_destroy(&self, handle: ObjectHandle) -> bool {
        self.slots
            .get(&handle)
            .is_some_and(|slot| slot.pending.is_some())
    }

    /// Whether the object takes part in per-frame phases
    pub fn is_active(&self, handle: ObjectHandle) -> bool {
        self.contains(handle)
            && self
                .world
                .get::<GameObject>(handle)
                .is_ok_and(|object| object.enabled)
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether there are no live objects
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enable or disable an object. Takes effect for the next phase dispatched.
    ///
    /// # Errors
    ///
    /// [`EngineError::StaleHandle`] if the object is gone.
    pub fn set_enabled(&mut self, handle: ObjectHandle, enabled: bool) -> Result<(), EngineError> {
        self.object_mut(handle)?.enabled = enabled;
        Ok(())
    }

    /// Set or clear the parent of `child`, keeping its world pose.
    ///
    /// # Errors
    ///
    /// [`EngineError::StaleHandle`] if either object is gone,
    /// [`EngineError::CyclicParent`] if `parent` is `child` or one of its
    /// descendants.
    pub fn set_parent(
        &mut self,
        child: ObjectHandle,
        parent: Option<ObjectHandle>,
    ) -> Result<(), EngineError> {
        if !self.contains(child) {
            return Err(EngineError::StaleHandle);
        }
        let pose = hierarchy::world_pose(&self.world, child)?;

        let parent_pose = match parent {
            Some(parent) => {
                if !self.contains(parent) {
                    return Err(EngineError::StaleHandle);
                }
                if hierarchy::would_cycle(&self.world, child, parent) {
                    return Err(EngineError::CyclicParent(self.object(child)?.id()));
                }
                Some(hierarchy::world_pose(&self.world, parent)?)
            }
            None => None,
        };

        let transform = self.transform_mut(child)?;
        transform.parent = parent;
        transform.position = pose.position;
        transform.rotation = pose.rotation;
        match parent_pose {
            Some(parent_pose) => {
                transform.local_position = parent_pose.to_local(pose.position);
                transform.local_rotation = pose.rotation - parent_pose.rotation;
            }
            None => {
                transform.local_position = Vec2::ZERO;
                transform.local_rotation = 0.0;
            }
        }
        Ok(())
    }

    /// World pose of an object, resolved through its parent chain
    ///
    /// # Errors
    ///
    /// [`EngineError::StaleHandle`] or [`EngineError::CyclicParent`].
    pub fn world_pose(&self, handle: ObjectHandle) -> Result<WorldPose, EngineError> {
        if !self.contains(handle) {
            return Err(EngineError::StaleHandle);
        }
        hierarchy::world_pose(&self.world, handle)
    }

    /// Read-only access to the component world
    pub fn world(&self) -> &World {
        &self.world
    }

    fn component<T: hecs::Component>(
        &self,
        handle: ObjectHandle,
    ) -> Result<hecs::Ref<'_, T>, EngineError> {
        if !self.contains(handle) {
            return Err(EngineError::StaleHandle);
        }
        self.world.get::<T>(handle).map_err(|_| EngineError::StaleHandle)
    }

    fn component_mut<T: hecs::Component>(
        &mut self,
        handle: ObjectHandle,
    ) -> Result<&mut T, EngineError> {
        if !self.contains(handle) {
            return Err(EngineError::StaleHandle);
        }
        self.world
            .get_mut::<T>(handle)
            .map_err(|_| EngineError::StaleHandle)
    }

    /// Identity and flags of an object
    pub fn object(&self, handle: ObjectHandle) -> Result<hecs::Ref<'_, GameObject>, EngineError> {
        self.component(handle)
    }

    /// Mutable identity of an object (name, tag, collider tag)
    pub fn object_mut(&mut self, handle: ObjectHandle) -> Result<&mut GameObject, EngineError> {
        self.component_mut(handle)
    }

    pub fn transform(&self, handle: ObjectHandle) -> Result<hecs::Ref<'_, Transform>, EngineError> {
        self.component(handle)
    }

    pub fn transform_mut(&mut self, handle: ObjectHandle) -> Result<&mut Transform, EngineError> {
        self.component_mut(handle)
    }

    pub fn renderer(&self, handle: ObjectHandle) -> Result<hecs::Ref<'_, Renderer>, EngineError> {
        self.component(handle)
    }

    pub fn renderer_mut(&mut self, handle: ObjectHandle) -> Result<&mut Renderer, EngineError> {
        self.component_mut(handle)
    }

    pub fn rigidbody(&self, handle: ObjectHandle) -> Result<hecs::Ref<'_, Rigidbody>, EngineError> {
        self.component(handle)
    }

    pub fn rigidbody_mut(&mut self, handle: ObjectHandle) -> Result<&mut Rigidbody, EngineError> {
        self.component_mut(handle)
    }

    pub fn collider(&self, handle: ObjectHandle) -> Result<hecs::Ref<'_, Collider>, EngineError> {
        self.component(handle)
    }

    pub fn collider_mut(&mut self, handle: ObjectHandle) -> Result<&mut Collider, EngineError> {
        self.component_mut(handle)
    }

    // Scheduler plumbing

    /// Live objects whose Awake has not run yet
    pub(crate) fn awake_pending(&self) -> Vec<ObjectHandle> {
        self.iter()
            .filter(|handle| self.slots.get(handle).is_some_and(|slot| !slot.awoken))
            .collect()
    }

    /// Live objects that are awoken but not started
    pub(crate) fn start_pending(&self) -> Vec<ObjectHandle> {
        self.iter()
            .filter(|handle| {
                self.slots
                    .get(handle)
                    .is_some_and(|slot| slot.awoken && !slot.started)
            })
            .collect()
    }

    pub(crate) fn is_started(&self, handle: ObjectHandle) -> bool {
        self.slots.get(&handle).is_some_and(|slot| slot.started)
    }

    pub(crate) fn mark_awoken(&mut self, handle: ObjectHandle) {
        if let Some(slot) = self.slots.get_mut(&handle) {
            slot.awoken = true;
        }
    }

    pub(crate) fn mark_started(&mut self, handle: ObjectHandle) {
        if let Some(slot) = self.slots.get_mut(&handle) {
            slot.started = true;
        }
    }

    /// Copy of the registration order, safe to iterate while hooks mutate
    /// the registry
    pub(crate) fn snapshot(&self) -> Vec<ObjectHandle> {
        self.order.clone()
    }

    /// Take the behaviour out of its slot for the duration of a hook call
    pub(crate) fn take_behaviour(&mut self, handle: ObjectHandle) -> Option<Box<dyn Behaviour>> {
        self.slots.get_mut(&handle)?.behaviour.take()
    }

    /// Put a behaviour back after its hook returned
    pub(crate) fn restore_behaviour(
        &mut self,
        handle: ObjectHandle,
        behaviour: Box<dyn Behaviour>,
    ) {
        if let Some(slot) = self.slots.get_mut(&handle) {
            slot.behaviour = Some(behaviour);
        }
    }

    /// Hand over the objects marked for destruction since the last call
    pub(crate) fn take_doomed(&mut self) -> Vec<ObjectHandle> {
        std::mem::take(&mut self.doomed)
    }

    /// Remove a marked object for good.
    ///
    /// Children are detached and keep their last world pose. The ID returns
    /// to the free list unless the object was cleared.
    pub(crate) fn release(&mut self, handle: ObjectHandle) {
        let Some(slot) = self.slots.remove(&handle) else {
            return;
        };

        let children: Vec<ObjectHandle> = self
            .order
            .iter()
            .copied()
            .filter(|other| {
                *other != handle
                    && self
                        .world
                        .get::<Transform>(*other)
                        .is_ok_and(|transform| transform.parent == Some(handle))
            })
            .collect();
        for child in children {
            let pose = hierarchy::world_pose(&self.world, child).ok();
            if let Ok(transform) = self.world.get_mut::<Transform>(child) {
                transform.parent = None;
                transform.local_position = Vec2::ZERO;
                transform.local_rotation = 0.0;
                if let Some(pose) = pose {
                    transform.position = pose.position;
                    transform.rotation = pose.rotation;
                }
            }
        }

        let id = self.world.get::<GameObject>(handle).map(|object| object.id()).ok();
        if let Err(err) = self.world.despawn(handle) {
            log::warn!("Released object was missing from the world: {err}");
        }
        self.order.retain(|other| *other != handle);

        if let Some(id) = id {
            self.ids.remove(&id);
            if slot.pending == Some(Release::Destroyed) {
                self.free_ids.push_back(id);
            }
            log::debug!("Released object {id}");
        }
    }

    /// Mutable component world for the built-in physics step
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

impl std::fmt::Debug for ObjectManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectManager")
            .field("objects", &self.order.len())
            .field("pending_destroy", &self.doomed.len())
            .field("free_ids", &self.free_ids)
            .field("next_id", &self.next_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Inert;

    fn manager() -> ObjectManager {
        let mut catalog = SpawnCatalog::new();
        catalog.register_default::<Inert>("Player");
        catalog.register_default::<Inert>("Crate");
        ObjectManager::new(catalog)
    }

    fn reap(objects: &mut ObjectManager) {
        for handle in objects.take_doomed() {
            objects.release(handle);
        }
    }

    fn id_of(objects: &ObjectManager, handle: ObjectHandle) -> ObjectId {
        objects.object(handle).unwrap().id()
    }

    #[test]
    fn test_instantiate_assigns_sequential_ids() {
        let mut objects = manager();
        let a = objects.instantiate("Crate", Vec2::ZERO, 0.0).unwrap();
        let b = objects.instantiate("Crate", Vec2::ZERO, 0.0).unwrap();

        assert_eq!(id_of(&objects, a), ObjectId(0));
        assert_eq!(id_of(&objects, b), ObjectId(1));
        assert_eq!(objects.get_by_id(ObjectId(1)), Some(b));
        assert_eq!(objects.len(), 2);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let mut objects = manager();
        let result = objects.instantiate("Ghost", Vec2::ZERO, 0.0);
        assert!(matches!(result, Err(EngineError::UnknownType(tag)) if tag == "Ghost"));
        assert!(objects.is_empty());
    }

    #[test]
    fn test_player_lookup_by_name() {
        let mut objects = manager();
        let player = objects.instantiate("Player", Vec2::ZERO, 0.0).unwrap();
        objects.instantiate("Crate", Vec2::ONE, 0.0).unwrap();

        let found = objects.get_by_name("Player");
        assert_eq!(found, vec![player]);
        assert_eq!(objects.transform(player).unwrap().position, Vec2::ZERO);

        objects.set_enabled(player, false).unwrap();
        assert!(!objects.is_active(player));
        assert_eq!(objects.get_by_id(ObjectId(0)), Some(player));
    }

    #[test]
    fn test_lookups_follow_registration_order() {
        let mut objects = manager();
        let first = objects.instantiate("Crate", Vec2::ZERO, 0.0).unwrap();
        let second = objects.instantiate("Crate", Vec2::ZERO, 0.0).unwrap();
        let third = objects.instantiate("Crate", Vec2::ZERO, 0.0).unwrap();
        for handle in [first, third] {
            let object = objects.object_mut(handle).unwrap();
            object.tag = "Loot".to_string();
            object.collider_tag = "Pickup".to_string();
        }
        objects.object_mut(second).unwrap().tag = "Junk".to_string();

        assert_eq!(objects.get_by_tag("Loot"), vec![first, third]);
        assert_eq!(objects.get_by_collider_tag("Pickup"), vec![first, third]);
        assert!(objects.get_by_tag("Nothing").is_empty());
    }

    #[test]
    fn test_destroy_is_deferred_and_idempotent() {
        let mut objects = manager();
        let handle = objects.instantiate("Crate", Vec2::ZERO, 0.0).unwrap();

        objects.destroy(handle).unwrap();
        objects.destroy(handle).unwrap();
        assert!(objects.is_pending_destroy(handle));
        assert!(objects.get_by_id(ObjectId(0)).is_none());
        assert!(objects.world().contains(handle));

        reap(&mut objects);
        assert!(!objects.world().contains(handle));
        assert!(matches!(objects.destroy(handle), Err(EngineError::StaleHandle)));
        assert!(matches!(objects.transform(handle), Err(EngineError::StaleHandle)));
    }

    #[test]
    fn test_freed_id_is_reused_once() {
        let mut objects = manager();
        let a = objects.instantiate("Crate", Vec2::ZERO, 0.0).unwrap();
        objects.instantiate("Crate", Vec2::ZERO, 0.0).unwrap();
        objects.destroy(a).unwrap();
        reap(&mut objects);

        let c = objects.instantiate("Crate", Vec2::ZERO, 0.0).unwrap();
        let d = objects.instantiate("Crate", Vec2::ZERO, 0.0).unwrap();
        assert_eq!(id_of(&objects, c), ObjectId(0));
        assert_eq!(id_of(&objects, d), ObjectId(2));
        assert_ne!(a, c);
    }

    #[test]
    fn test_clear_all_never_reissues_old_ids() {
        let mut objects = manager();
        let mut issued = Vec::new();
        for _ in 0..3 {
            let handle = objects.instantiate("Crate", Vec2::ZERO, 0.0).unwrap();
            issued.push(id_of(&objects, handle));
        }
        let freed = objects.get_by_id(ObjectId(1)).unwrap();
        objects.destroy(freed).unwrap();
        reap(&mut objects);

        objects.clear_all();
        reap(&mut objects);
        assert!(objects.is_empty());

        // ID 1 was freed before the clear and may come back; 0 and 2 may not
        let first = objects.instantiate("Crate", Vec2::ZERO, 0.0).unwrap();
        let second = objects.instantiate("Crate", Vec2::ZERO, 0.0).unwrap();
        assert_eq!(id_of(&objects, first), ObjectId(1));
        assert_eq!(id_of(&objects, second), ObjectId(3));
    }

    #[test]
    fn test_clear_retires_ids_marked_by_destroy() {
        let mut objects = manager();
        let a = objects.instantiate("Crate", Vec2::ZERO, 0.0).unwrap();
        objects.destroy(a).unwrap();
        objects.clear_all();
        reap(&mut objects);

        let b = objects.instantiate("Crate", Vec2::ZERO, 0.0).unwrap();
        assert_eq!(id_of(&objects, b), ObjectId(1));
    }

    #[test]
    fn test_child_keeps_world_position_when_parent_is_released() {
        let mut objects = manager();
        let parent = objects.instantiate("Crate", Vec2::new(10.0, 0.0), 0.0).unwrap();
        let child = objects
            .instantiate_child("Crate", Vec2::new(12.0, 3.0), 0.0, parent)
            .unwrap();
        assert_eq!(objects.transform(child).unwrap().local_position, Vec2::new(2.0, 3.0));

        objects.transform_mut(parent).unwrap().position.x = 20.0;
        assert_eq!(objects.world_pose(child).unwrap().position, Vec2::new(22.0, 3.0));

        objects.destroy(parent).unwrap();
        reap(&mut objects);
        let transform = objects.transform(child).unwrap();
        assert!(transform.parent().is_none());
        assert_eq!(transform.position, Vec2::new(22.0, 3.0));
    }

    #[test]
    fn test_child_of_rotated_parent_keeps_world_rotation() {
        let mut objects = manager();
        let parent = objects.instantiate("Crate", Vec2::ZERO, 90.0).unwrap();
        let child = objects
            .instantiate_child("Crate", Vec2::new(0.0, 5.0), 30.0, parent)
            .unwrap();
        {
            let transform = objects.transform(child).unwrap();
            assert_eq!(transform.rotation, 30.0);
            assert_eq!(transform.local_rotation, -60.0);
            assert!((transform.local_position - Vec2::new(5.0, 0.0)).length() < 1e-4);
        }
        assert!((objects.world_pose(child).unwrap().rotation - 30.0).abs() < 1e-4);

        objects.transform_mut(parent).unwrap().rotation = 180.0;
        assert!((objects.world_pose(child).unwrap().rotation - 120.0).abs() < 1e-4);

        objects.set_parent(child, None).unwrap();
        let transform = objects.transform(child).unwrap();
        assert!((transform.rotation - 120.0).abs() < 1e-4);
        assert_eq!(transform.local_rotation, 0.0);
    }

    #[test]
    fn test_set_parent_rejects_cycles() {
        let mut objects = manager();
        let a = objects.instantiate("Crate", Vec2::ZERO, 0.0).unwrap();
        let b = objects.instantiate("Crate", Vec2::ZERO, 0.0).unwrap();
        objects.set_parent(b, Some(a)).unwrap();

        assert!(matches!(
            objects.set_parent(a, Some(b)),
            Err(EngineError::CyclicParent(ObjectId(0)))
        ));
        assert!(matches!(
            objects.set_parent(a, Some(a)),
            Err(EngineError::CyclicParent(_))
        ));

        objects.set_parent(b, None).unwrap();
        objects.set_parent(a, Some(b)).unwrap();
    }

    #[test]
    fn test_stale_parent_is_rejected() {
        let mut objects = manager();
        let parent = objects.instantiate("Crate", Vec2::ZERO, 0.0).unwrap();
        objects.destroy(parent).unwrap();
        let result = objects.instantiate_child("Crate", Vec2::ZERO, 0.0, parent);
        assert!(matches!(result, Err(EngineError::StaleHandle)));
    }

    #[test]
    fn test_awake_and_start_pending() {
        let mut objects = manager();
        let a = objects.instantiate("Crate", Vec2::ZERO, 0.0).unwrap();
        assert_eq!(objects.awake_pending(), vec![a]);
        assert!(objects.start_pending().is_empty());

        objects.mark_awoken(a);
        assert!(objects.awake_pending().is_empty());
        assert_eq!(objects.start_pending(), vec![a]);

        objects.mark_started(a);
        assert!(objects.start_pending().is_empty());
    }
}
