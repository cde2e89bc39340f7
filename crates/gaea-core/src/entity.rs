use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier shared by every component that belongs to one world object.
///
/// Ids are allocated by the [`World`](crate::world::World) arena and are never
/// reused within a world, so a stale id simply resolves to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl EntityId {
    /// The raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
