//! Frame phases

use std::fmt;

/// A stage of the frame sequence, in dispatch order.
///
/// `Destroy` is not part of the fixed order; it runs whenever deferred
/// destruction is reaped between phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// One-time setup, first frame an object is seen
    Awake,
    /// One-time setup, after every Awake of the frame
    Start,
    /// Fixed-rate behaviour logic
    FixedUpdate,
    /// Built-in rigidbody integration
    PhysicsUpdate,
    /// Variable-rate behaviour logic
    Update,
    /// Draw request collection
    Draw,
    /// Teardown of destroyed objects
    Destroy,
}

impl Phase {
    /// Name used in logs and error messages
    pub const fn name(self) -> &'static str {
        match self {
            Phase::Awake => "Awake",
            Phase::Start => "Start",
            Phase::FixedUpdate => "FixedUpdate",
            Phase::PhysicsUpdate => "PhysicsUpdate",
            Phase::Update => "Update",
            Phase::Draw => "Draw",
            Phase::Destroy => "Destroy",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
