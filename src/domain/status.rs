//! Soft-delete lifecycle marker shared by users and orders

use serde::{Deserialize, Serialize};

/// Lifecycle status of a stored record
///
/// Deleted records stay in storage. Every lookup path must filter on
/// `Active` explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    #[default]
    Active,
    Deleted,
}

impl RecordStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Deleted => "deleted",
        }
    }

    /// Parse the stored representation. Unknown values are treated as deleted
    /// so a corrupted row never becomes visible.
    pub fn from_stored(value: &str) -> Self {
        match value {
            "active" => Self::Active,
            _ => Self::Deleted,
        }
    }
}
