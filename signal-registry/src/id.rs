//! Identity types for observers and strategies
//!
//! Every entity that can be attached to a subject or queued in a manager
//! carries an [`Id`]. Ids come from a process-wide counter unless the
//! application assigns one explicitly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Numeric identity used as the key in every registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Id(u64);

impl Id {
    /// Wraps an externally assigned value
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Allocates the next value from the process-wide counter
    ///
    /// Safe to call concurrently; each call observes a distinct value.
    pub fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Id {
    fn from(value: u64) -> Self {
        Id::new(value)
    }
}

impl From<Id> for u64 {
    fn from(id: Id) -> Self {
        id.0
    }
}

/// Capability: "has a stable identity"
pub trait Identified {
    fn id(&self) -> Id;
}

/// Identity cell that can be re-assigned after construction
///
/// Strategies are usually built before the application knows which ids it
/// wants them to carry, so the id can be replaced through a shared
/// reference. Re-assigning an id while the entity is attached somewhere is
/// the caller's responsibility: registries keep the id they saw at attach
/// time.
#[derive(Debug)]
pub struct Identity(AtomicU64);

impl Identity {
    /// Creates an identity from the process-wide counter
    pub fn new() -> Self {
        Self::with_id(Id::next())
    }

    pub fn with_id(id: Id) -> Self {
        Self(AtomicU64::new(id.value()))
    }

    pub fn get(&self) -> Id {
        Id(self.0.load(Ordering::Acquire))
    }

    pub fn set(&self, id: Id) {
        self.0.store(id.value(), Ordering::Release);
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::new()
    }
}

impl Identified for Identity {
    fn id(&self) -> Id {
        self.get()
    }
}
