//! # Core Types
//!
//! This crate defines the identifiers shared by every crate of the service
//! administration layer.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: Service and resource ids are distinct types
//!   and cannot be confused with each other or with plain names.
//! - **Externally assigned**: Ids come from the deployment mechanism and are
//!   carried verbatim; they are never re-encoded.
//!
//! ## Key Types
//!
//! - [`ServiceId`]: Stable, unique identifier of a service instance
//! - [`ResourceId`]: Identifier of a resource a service can be migrated to

pub mod ids;

pub use ids::{ResourceId, ServiceId};
