//! Runtime effects behind a managed service

use crate::{ConfigValues, RuntimeError};
use core_types::{ResourceId, ServiceId};
use serde::{Deserialize, Serialize};

/// A fetched service implementation, ready to be started
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Where the artifact was fetched from
    pub location: String,
}

impl Artifact {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }
}

/// Executes the side effects of lifecycle operations
///
/// [`ManagedService`](crate::ManagedService) decides which transitions are
/// allowed and in which order effects happen; the runtime performs them
/// (process control, artifact download, network handover). Calls are
/// serialised per service, so implementations need not be reentrant.
pub trait ServiceRuntime: Send {
    /// Fetches an implementation from a location without installing it
    fn fetch(&mut self, location: &str) -> Result<Artifact, RuntimeError>;

    /// Starts the service from an artifact
    fn start(&mut self, service: &ServiceId, artifact: &Artifact) -> Result<(), RuntimeError>;

    /// Stops the running service
    fn stop(&mut self, service: &ServiceId) -> Result<(), RuntimeError>;

    /// Suspends processing while keeping resources
    fn suspend(&mut self, service: &ServiceId) -> Result<(), RuntimeError>;

    /// Resumes a suspended service
    fn resume(&mut self, service: &ServiceId) -> Result<(), RuntimeError>;

    /// Moves the service's execution to a resource
    fn relocate(&mut self, service: &ServiceId, resource: &ResourceId)
        -> Result<(), RuntimeError>;

    /// Transfers in-flight state and work from one service to another
    fn handover(&mut self, from: &ServiceId, to: &ServiceId) -> Result<(), RuntimeError>;

    /// Starts another service, the target of a switch
    fn start_target(&mut self, target: &ServiceId) -> Result<(), RuntimeError>;

    /// Applies a complete configuration to the running service
    fn apply_configuration(
        &mut self,
        service: &ServiceId,
        values: &ConfigValues,
    ) -> Result<(), RuntimeError>;
}
