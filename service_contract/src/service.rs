//! The administrative service contract

use crate::{ServiceError, ServiceVersion};
use core_types::{ResourceId, ServiceId};
use lifecycle::{ServiceKind, ServiceState};
use serde_json::Value;
use std::collections::BTreeMap;

/// Name to value mapping passed to `reconfigure`
///
/// Values are primitives or structures conforming to the service's
/// parameter descriptor.
pub type ConfigValues = BTreeMap<String, Value>;

/// An administrative service
///
/// Accessors must be free of side effects: they may be called concurrently
/// and any number of times. Mutating operations take `&self` because a
/// service is shared with the remote registrar; implementations serialise
/// them internally so two concurrent calls never interleave.
///
/// Every mutating operation has a default body returning
/// [`ServiceError::NotImplemented`]. A kind of service that does not
/// support an operation simply does not override it.
pub trait Service: Send + Sync {
    /// Returns the unique id of the service
    fn id(&self) -> &ServiceId;

    /// Returns the name of the service
    fn name(&self) -> &str;

    /// Returns the version of the service
    fn version(&self) -> &ServiceVersion;

    /// Returns the description of the service
    fn description(&self) -> &str;

    /// Returns the current lifecycle state
    fn state(&self) -> ServiceState;

    /// Returns whether the service can be relocated or is pinned to its resource
    fn is_deployable(&self) -> bool;

    /// Returns the service kind
    fn kind(&self) -> ServiceKind;

    /// Replaces the current state unconditionally
    fn set_state(&self, state: ServiceState) -> Result<(), ServiceError> {
        let _ = state;
        Err(ServiceError::NotImplemented("setState"))
    }

    /// Relocates the service (and, if needed, its artifact) to a resource
    fn migrate_service(&self, resource: &ResourceId) -> Result<(), ServiceError> {
        let _ = resource;
        Err(ServiceError::NotImplemented("migrate"))
    }

    /// Replaces the implementation by the one found at `location`
    ///
    /// Stops the running instance if needed, fetches the replacement and
    /// starts it. Either the replacement ends up serving or the service is
    /// left as it was.
    fn update_service(&self, location: &str) -> Result<(), ServiceError> {
        let _ = location;
        Err(ServiceError::NotImplemented("update"))
    }

    /// Switches to an interface-compatible service
    ///
    /// Stops this service, hands over in-flight work if both sides support
    /// it and starts the target.
    fn switch_to_service(&self, target: &ServiceId) -> Result<(), ServiceError> {
        let _ = target;
        Err(ServiceError::NotImplemented("switchTo"))
    }

    /// Wakes the service up from passivation
    fn activate(&self) -> Result<(), ServiceError> {
        Err(ServiceError::NotImplemented("activate"))
    }

    /// Puts the service to sleep
    fn passivate(&self) -> Result<(), ServiceError> {
        Err(ServiceError::NotImplemented("passivate"))
    }

    /// Applies configuration changes validated against the service's
    /// parameter descriptor
    fn reconfigure(&self, values: &ConfigValues) -> Result<(), ServiceError> {
        let _ = values;
        Err(ServiceError::NotImplemented("reconfigure"))
    }
}
