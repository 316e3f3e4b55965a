//! # Services Manager
//!
//! Keeps track of deployed services and of the names each one occupies in
//! the submodel.
//!
//! ## Philosophy
//!
//! Deployment and exposure go together: a service is known to the manager
//! exactly when its properties and operations are registered. A failed
//! deployment leaves no names behind.

pub mod manager;

pub use manager::{ManagerError, ServiceManager};
