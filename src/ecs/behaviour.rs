//! Per-object game logic and the spawn catalog

use rustc_hash::FxHashMap;

use super::world::ObjectHandle;
use crate::core::{EngineContext, HookResult};

/// Game logic attached to a game object.
///
/// Every hook has a no-op default, so a type only implements what it needs.
/// Hooks receive the engine context and the handle of the object they belong
/// to; components are reached through `ctx.objects`.
///
/// # Example
///
/// ```ignore
/// #[derive(Default)]
/// struct Spinner;
///
/// impl Behaviour for Spinner {
///     fn update(&mut self, ctx: &mut EngineContext, this: ObjectHandle) -> HookResult {
///         let dt = ctx.time.delta_seconds();
///         ctx.objects.transform_mut(this)?.rotation += 90.0 * dt;
///         Ok(())
///     }
/// }
/// ```
pub trait Behaviour: 'static {
    /// Runs once, on the first frame after the object was instantiated
    fn awake(&mut self, _ctx: &mut EngineContext, _this: ObjectHandle) -> HookResult {
        Ok(())
    }

    /// Runs once, after every Awake of the same frame
    fn start(&mut self, _ctx: &mut EngineContext, _this: ObjectHandle) -> HookResult {
        Ok(())
    }

    /// Runs on every fixed step while the object is enabled
    fn fixed_update(&mut self, _ctx: &mut EngineContext, _this: ObjectHandle) -> HookResult {
        Ok(())
    }

    /// Runs every frame while the object is enabled
    fn update(&mut self, _ctx: &mut EngineContext, _this: ObjectHandle) -> HookResult {
        Ok(())
    }

    /// Runs when the object is reaped, before its components are released.
    ///
    /// The object is already gone from lookups; its components can still be
    /// read through `ctx.objects.world()`.
    fn on_destroy(&mut self, _ctx: &mut EngineContext, _this: ObjectHandle) -> HookResult {
        Ok(())
    }
}

/// Behaviour with no hooks, for plain sprite objects
#[derive(Debug, Default)]
pub struct Inert;

impl Behaviour for Inert {}

type Spawner = Box<dyn Fn() -> Box<dyn Behaviour>>;

/// Closed mapping from type tag to behaviour constructor.
///
/// Filled while building the engine; the registry only reads it afterwards.
#[derive(Default)]
pub struct SpawnCatalog {
    spawners: FxHashMap<String, Spawner>,
}

impl SpawnCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under `tag`, replacing any previous one
    pub fn register<F, B>(&mut self, tag: impl Into<String>, constructor: F)
    where
        F: Fn() -> B + 'static,
        B: Behaviour,
    {
        let tag = tag.into();
        log::info!("Registered spawnable type `{tag}`");
        if self
            .spawners
            .insert(
                tag.clone(),
                Box::new(move || Box::new(constructor()) as Box<dyn Behaviour>),
            )
            .is_some()
        {
            log::warn!("Spawnable type `{tag}` was registered twice; keeping the last one");
        }
    }

    /// Register a [`Default`]-constructible behaviour under `tag`
    pub fn register_default<B: Behaviour + Default>(&mut self, tag: impl Into<String>) {
        self.register(tag, B::default);
    }

    /// Build a fresh behaviour for `tag`
    pub(crate) fn spawn(&self, tag: &str) -> Option<Box<dyn Behaviour>> {
        self.spawners.get(tag).map(|spawner| spawner())
    }

    /// Whether `tag` is registered
    pub fn contains(&self, tag: &str) -> bool {
        self.spawners.contains_key(tag)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.spawners.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.spawners.is_empty()
    }
}

impl std::fmt::Debug for SpawnCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.spawners.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Marker;

    impl Behaviour for Marker {}

    #[test]
    fn test_register_and_spawn() {
        let mut catalog = SpawnCatalog::new();
        catalog.register_default::<Inert>("Crate");
        catalog.register_default::<Marker>("Marker");

        assert!(catalog.contains("Crate"));
        assert!(catalog.contains("Marker"));
        assert!(!catalog.contains("Ghost"));
        assert_eq!(catalog.len(), 2);

        assert!(catalog.spawn("Marker").is_some());
        assert!(catalog.spawn("Ghost").is_none());
    }

    #[test]
    fn test_each_spawn_runs_the_constructor() {
        let built = Rc::new(Cell::new(0));
        let counter = Rc::clone(&built);

        let mut catalog = SpawnCatalog::new();
        catalog.register("Crate", move || {
            counter.set(counter.get() + 1);
            Inert
        });

        catalog.spawn("Crate");
        catalog.spawn("Crate");
        assert_eq!(built.get(), 2);
    }
}
