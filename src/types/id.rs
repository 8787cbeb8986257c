// ABOUTME: Phantom-typed ARNs and the per-deployment unique identifier.
// ABOUTME: Prevents accidental swapping of task, task definition, and cluster ARNs.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use ulid::Ulid;

/// Marker types for phantom type parameters.
/// Using empty enums prevents instantiation and requires no trait bounds.
pub enum TaskDefinitionMarker {}
pub enum TaskMarker {}
pub enum ClusterMarker {}

/// A type-safe resource identifier.
///
/// Using phantom types, this ensures you can't accidentally pass a `TaskArn`
/// where a `TaskDefinitionArn` is expected, catching bugs at compile time.
#[must_use = "ARNs reference resources and should not be ignored"]
pub struct Arn<T> {
    value: String,
    _marker: PhantomData<T>,
}

impl<T> Arn<T> {
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

// Manual trait implementations that don't require T to implement the trait.

impl<T> std::fmt::Debug for Arn<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Arn").field(&self.value).finish()
    }
}

impl<T> Clone for Arn<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T> PartialEq for Arn<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Arn<T> {}

impl<T> Hash for Arn<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> std::fmt::Display for Arn<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> Serialize for Arn<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Arn<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::new(value))
    }
}

pub type TaskDefinitionArn = Arn<TaskDefinitionMarker>;
pub type TaskArn = Arn<TaskMarker>;
pub type ClusterArn = Arn<ClusterMarker>;

/// Unique identity of one deployment attempt, used as the promoted image tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeploymentId(Ulid);

impl DeploymentId {
    /// Generate a fresh, monotonic-random identifier.
    pub fn generate() -> Self {
        Self(Ulid::new())
    }

    pub fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }

    pub fn as_tag(&self) -> String {
        self.0.to_string()
    }
}

impl std::fmt::Display for DeploymentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deployment_ids_are_unique_valid_tags() {
        let a = DeploymentId::generate();
        let b = DeploymentId::generate();
        assert_ne!(a, b);
        // ULIDs are 26 Crockford base32 characters, a valid image tag
        assert_eq!(a.as_tag().len(), 26);
        assert!(a.as_tag().chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
