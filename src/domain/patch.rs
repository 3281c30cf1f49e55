//! Tri-state field for partial updates

use serde::{Deserialize, Deserializer};

/// A field of a partial-update body.
///
/// Distinguishes a field that was left out of the body (`Missing`) from one
/// that was sent as `null` (`Null`) and one that carries a value. Struct
/// fields of this type need `#[serde(default)]` so that absence maps to
/// `Missing`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Patch<T> {
    #[default]
    Missing,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Self::Missing => Patch::Missing,
            Self::Null => Patch::Null,
            Self::Value(v) => Patch::Value(v),
        }
    }

    /// Resolve a field that cannot be cleared: `Missing` means no change,
    /// `Null` is rejected with `field` named in the error.
    pub fn required(self, field: &str) -> Result<Option<T>, String> {
        match self {
            Self::Missing => Ok(None),
            Self::Null => Err(format!("{} cannot be null", field)),
            Self::Value(v) => Ok(Some(v)),
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Self::Value(value),
            None => Self::Null,
        })
    }
}
