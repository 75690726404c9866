//! Game object model
//!
//! Built on top of the hecs ECS library. Each game object is one hecs entity
//! carrying a fixed set of components, plus a [`Behaviour`] owned by the
//! [`ObjectManager`].

mod behaviour;
mod components;
mod hierarchy;
mod registry;
mod world;

pub use behaviour::{Behaviour, Inert, SpawnCatalog};
pub use components::{
    Collider, ColliderShape, Color, GameObject, ObjectId, Renderer, Rigidbody, Transform,
};
pub use hierarchy::{WorldPose, world_pose};
pub use registry::ObjectManager;
pub use world::{ObjectHandle, World};
