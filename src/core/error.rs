//! Engine error types

use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use super::config::ConfigError;
use super::phase::Phase;
use crate::ecs::ObjectId;

/// Error type returned by lifecycle hooks.
///
/// Any `std::error::Error + Send + Sync` converts into it with `?`, and the
/// original value can be recovered with `downcast_ref`.
pub type HookError = Box<dyn StdError + Send + Sync + 'static>;

/// Result type returned by lifecycle hooks
pub type HookResult = Result<(), HookError>;

/// Errors surfaced by the engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// `instantiate` was given a type tag the spawn catalog does not know
    #[error("unknown object type `{0}`")]
    UnknownType(String),

    /// An ID was about to be issued while already mapped to a live object
    #[error("object id {0} is already in use")]
    DuplicateId(ObjectId),

    /// A handle refers to an object that no longer exists
    #[error("stale object handle")]
    StaleHandle,

    /// The render backend could not find a sprite
    #[error("sprite not found: {}", .0.display())]
    AssetNotFound(PathBuf),

    /// A parent chain loops back on itself
    #[error("cyclic parent chain at object {0}")]
    CyclicParent(ObjectId),

    /// `tick` was called while the engine is stopped
    #[error("engine is not running")]
    NotRunning,

    /// One or more lifecycle hooks failed
    #[error(transparent)]
    Hooks(#[from] HookFailures),

    /// Configuration could not be loaded or is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The window event loop failed
    #[error("event loop error: {0}")]
    EventLoop(String),

    /// The window could not be created
    #[error("failed to create window: {0}")]
    Window(String),
}

/// A lifecycle hook that returned an error
#[derive(Debug, Error)]
#[error("{phase} hook of object {id} (`{name}`) failed: {source}")]
pub struct HookFailure {
    /// Phase the hook ran in
    pub phase: Phase,
    /// ID of the object whose hook failed
    pub id: ObjectId,
    /// Name of the object at the time of the failure
    pub name: String,
    /// The error the hook returned, unchanged
    #[source]
    pub source: HookError,
}

/// All hook failures of one phase. Never empty.
#[derive(Debug)]
pub struct HookFailures(Vec<HookFailure>);

impl HookFailures {
    pub(crate) fn new(failures: Vec<HookFailure>) -> Option<Self> {
        if failures.is_empty() {
            None
        } else {
            Some(Self(failures))
        }
    }

    /// The individual failures, in dispatch order
    pub fn failures(&self) -> &[HookFailure] {
        &self.0
    }

    /// Take ownership of the individual failures
    pub fn into_inner(self) -> Vec<HookFailure> {
        self.0
    }
}

impl fmt::Display for HookFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} lifecycle hook(s) failed", self.0.len())?;
        if let Some(first) = self.0.first() {
            write!(f, "; first: {first}")?;
        }
        Ok(())
    }
}

impl StdError for HookFailures {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.first().map(|failure| failure as &(dyn StdError + 'static))
    }
}
