//! Immutable service metadata

use crate::ServiceVersion;
use core_types::ServiceId;
use lifecycle::ServiceKind;
use serde::{Deserialize, Serialize};

/// Metadata fixed when a service is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub id: ServiceId,
    pub name: String,
    pub version: ServiceVersion,
    pub description: String,
    pub kind: ServiceKind,
    /// Whether the service may be relocated to another resource
    pub deployable: bool,
}

impl ServiceInfo {
    /// Creates metadata for a deployable service with an empty description
    pub fn new(
        id: ServiceId,
        name: impl Into<String>,
        version: ServiceVersion,
        kind: ServiceKind,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            version,
            description: String::new(),
            kind,
            deployable: true,
        }
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Pins the service to its resource
    pub fn pinned(mut self) -> Self {
        self.deployable = false;
        self
    }
}
