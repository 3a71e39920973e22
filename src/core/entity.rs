//! Physical card identity.
//!
//! Every physical card in a match gets a unique `EntityId` when the match is
//! built. Two copies of the same definition share a `CardId` but never an
//! `EntityId`, so selection requests and continuations can refer to "this
//! exact card" no matter which zone it has moved to.
//!
//! ```
//! use mindbug_engine::core::EntityId;
//!
//! let mut next = EntityId::FIRST;
//! let a = next.bump();
//! let b = next.bump();
//! assert_ne!(a, b);
//! assert_eq!(b.raw(), a.raw() + 1);
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for one physical card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// First id handed out by a fresh match.
    pub const FIRST: EntityId = EntityId(1);

    /// Create an entity ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Return the current id and advance this counter to the next one.
    pub fn bump(&mut self) -> EntityId {
        let id = *self;
        self.0 += 1;
        id
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
