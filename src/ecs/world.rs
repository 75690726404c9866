//! World wrapper around hecs

use hecs::Entity;

use super::components::{Collider, GameObject, Renderer, Rigidbody, Transform};

/// Generational handle to a game object.
///
/// Once the object is reaped the handle stays stale forever, even if its slot
/// and its [`ObjectId`](super::ObjectId) are reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectHandle(pub(crate) Entity);

/// Component storage for all game objects.
///
/// Every entity in here carries exactly one [`GameObject`], [`Transform`],
/// [`Renderer`], [`Rigidbody`] and [`Collider`]; components are never added
/// or removed individually.
pub struct World {
    /// The underlying hecs world
    inner: hecs::World,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self {
            inner: hecs::World::new(),
        }
    }

    /// Spawn a game object with default components
    pub(crate) fn spawn(&mut self, object: GameObject, transform: Transform) -> ObjectHandle {
        ObjectHandle(self.inner.spawn((
            object,
            transform,
            Renderer::default(),
            Rigidbody::default(),
            Collider::default(),
        )))
    }

    /// Despawn a game object
    pub(crate) fn despawn(&mut self, handle: ObjectHandle) -> Result<(), hecs::NoSuchEntity> {
        self.inner.despawn(handle.0)
    }

    /// Get a reference to a component
    pub fn get<T: hecs::Component>(
        &self,
        handle: ObjectHandle,
    ) -> Result<hecs::Ref<'_, T>, hecs::ComponentError> {
        self.inner.get::<&T>(handle.0)
    }

    /// Get a mutable reference to a component
    pub fn get_mut<T: hecs::Component>(
        &mut self,
        handle: ObjectHandle,
    ) -> Result<&mut T, hecs::QueryOneError> {
        self.inner.query_one_mut::<&mut T>(handle.0)
    }

    /// Borrow the rigidbody and transform of one object together
    pub fn body_and_transform_mut(
        &mut self,
        handle: ObjectHandle,
    ) -> Option<(&mut Rigidbody, &mut Transform)> {
        self.inner
            .query_one_mut::<(&mut Rigidbody, &mut Transform)>(handle.0)
            .ok()
    }

    /// Check if an object exists
    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.inner.contains(handle.0)
    }

    /// Get the number of objects
    pub fn len(&self) -> u32 {
        self.inner.len()
    }

    /// Check if the world is empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
