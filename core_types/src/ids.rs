//! Identifiers for services and resources

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a service
///
/// Ids are assigned by the deployment mechanism when the service is created
/// and never change afterwards. The textual form is what remote callers see
/// through the `id` property, so it is kept exactly as given.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(String);

impl ServiceId {
    /// Creates a service ID from an externally assigned value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks whether the id is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServiceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ServiceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifier of an execution resource (a device, an edge node, a server)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Creates a resource ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks whether the id is empty
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_id_display_is_verbatim() {
        let id = ServiceId::new("simpleSource-1");
        assert_eq!(id.to_string(), "simpleSource-1");
        assert_eq!(id.as_str(), "simpleSource-1");
    }

    #[test]
    fn test_service_id_serializes_transparently() {
        let id = ServiceId::new("svc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"svc\"");

        let decoded: ServiceId = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, id);
    }

    #[test]
    fn test_resource_id_empty() {
        assert!(ResourceId::new("").is_empty());
        assert!(ResourceId::new("  ").is_empty());
        assert!(!ResourceId::new("edge-1").is_empty());
    }
}
