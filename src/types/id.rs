// ABOUTME: Phantom-typed identifiers for provider resources.
// ABOUTME: A MappingId cannot be passed where a QueueArn is expected, and so on.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Marker types for phantom type parameters.
/// Empty enums cannot be instantiated and need no trait bounds.
pub enum MappingMarker {}
pub enum QueueMarker {}
pub enum RoleMarker {}
pub enum LayerMarker {}

/// An opaque provider identifier tagged with the kind of resource it names.
///
/// Mapping identifiers are assigned by the provider and only ever used to
/// address an existing event-source mapping; queue, role, and layer ARNs are
/// supplied by the caller. Keeping them as distinct types stops a mapping ID
/// from being sent where a queue ARN belongs.
#[must_use = "identifiers reference remote resources and should not be ignored"]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_inner(self) -> String {
        self.value
    }
}

// T is only a marker, so these are written by hand to avoid `T: Trait` bounds.

impl<T> std::fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Id").field(&self.value).finish()
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> std::fmt::Display for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> From<&str> for Id<T> {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        if value.trim().is_empty() {
            return Err(serde::de::Error::custom("identifier cannot be empty"));
        }
        Ok(Self::new(value))
    }
}

/// Provider-assigned identifier of an event-source mapping.
pub type MappingId = Id<MappingMarker>;
/// Queue the event-source mapping reads from.
pub type QueueArn = Id<QueueMarker>;
/// Execution role the function assumes.
pub type RoleArn = Id<RoleMarker>;
/// Layer version attached to the function.
pub type LayerArn = Id<LayerMarker>;
