//! # Service Contract
//!
//! The capability set every administrative service implements.
//!
//! ## Philosophy
//!
//! - **One trait, many kinds**: Source, transformation, sink and probe
//!   services are implementations of [`Service`] told apart by
//!   [`Service::kind`], not by a type hierarchy.
//! - **Unimplemented is loud**: Mutating operations default to
//!   [`ServiceError::NotImplemented`], which callers treat as an
//!   integration defect rather than a runtime condition.
//! - **All or nothing**: A failed operation leaves the service as it was.
//!
//! ## Structure
//!
//! - [`Service`]: The contract
//! - [`ManagedService`]: A reference implementation that enforces the
//!   lifecycle over a pluggable [`ServiceRuntime`]
//! - [`ParameterDescriptor`]: Per-service schema for `reconfigure`

pub mod descriptor;
pub mod error;
pub mod info;
pub mod managed;
pub mod runtime;
pub mod service;
pub mod version;

pub use descriptor::{ParameterDescriptor, ParameterType};
pub use error::{DescriptorError, RuntimeError, ServiceError};
pub use info::ServiceInfo;
pub use managed::{ManagedService, StateListener};
pub use runtime::{Artifact, ServiceRuntime};
pub use service::{ConfigValues, Service};
pub use version::{ServiceVersion, VersionError};

pub use core_types::{ResourceId, ServiceId};
pub use lifecycle::{ServiceKind, ServiceState};
