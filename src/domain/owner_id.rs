//! Identifier of the account that owns a set of vaccine records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Owning account identifier.
///
/// Every read and write on vaccine records is scoped by an `OwnerId`.
/// The same identifier keys the baby profile and the contact address
/// used by the reminder scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(uuid::Uuid);

impl OwnerId {
    /// Creates a new random `OwnerId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates an `OwnerId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for OwnerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OwnerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<uuid::Uuid>().map(Self)
    }
}

impl From<uuid::Uuid> for OwnerId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}
