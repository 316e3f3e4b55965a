//! Service error types

use crate::ParameterType;
use core_types::{ResourceId, ServiceId};
use lifecycle::{LifecycleError, ServiceState};
use thiserror::Error;

/// Errors reported by services
#[derive(Debug, Error, PartialEq)]
pub enum ServiceError {
    /// The service does not provide this capability
    #[error("Operation '{0}' is not implemented by this service")]
    NotImplemented(&'static str),

    #[error("Cannot {operation} service '{service}' in state {state}")]
    InvalidState {
        service: ServiceId,
        operation: &'static str,
        state: ServiceState,
    },

    #[error("Service cannot be created in state {0}; expected AVAILABLE, DEPLOYING or CREATED")]
    InvalidInitialState(ServiceState),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Service '{0}' is pinned to its resource and cannot be migrated")]
    NotDeployable(ServiceId),

    #[error("Service '{target}' is not interface-compatible with '{service}'")]
    Incompatible { service: ServiceId, target: ServiceId },

    /// A running service without a recorded artifact cannot be restarted
    #[error("Cannot {operation} service '{service}': no installed artifact to fall back to")]
    NoArtifact {
        service: ServiceId,
        operation: &'static str,
    },

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("Failed to {operation} service: {source}")]
    Runtime {
        operation: &'static str,
        #[source]
        source: RuntimeError,
    },
}

impl ServiceError {
    /// Checks whether this error describes a rejected request rather than a
    /// defect in the service implementation
    ///
    /// Recoverable errors leave the service unchanged and are reported back
    /// to the caller; `NotImplemented` is not recoverable.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ServiceError::NotImplemented(_))
    }

    pub(crate) fn runtime(operation: &'static str, source: RuntimeError) -> Self {
        ServiceError::Runtime { operation, source }
    }
}

/// Errors raised by a service runtime while carrying out an operation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Resource '{0}' is unreachable")]
    Unreachable(ResourceId),

    #[error("Cannot fetch artifact from '{location}': {reason}")]
    Fetch { location: String, reason: String },

    #[error("{action} failed: {reason}")]
    Failed { action: &'static str, reason: String },
}

/// Errors from validating values against a parameter descriptor
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("Unknown parameter '{0}'")]
    UnknownParameter(String),

    #[error("Parameter '{name}' expects {expected}, got {found}")]
    TypeMismatch {
        name: String,
        expected: ParameterType,
        found: &'static str,
    },
}
