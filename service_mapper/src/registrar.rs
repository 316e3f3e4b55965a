//! The registrar collaborator
//!
//! A registrar is the submodel builder of the remote data-point model. The
//! mapper defines properties and operations on it; the registrar later calls
//! back into them when a remote caller reads or invokes.

use crate::{MapperError, OperationResult};
use serde_json::Value;
use thiserror::Error;

/// Reads a property value
pub type PropertyGetter = Box<dyn Fn() -> String + Send + Sync>;

/// Writes a property value
pub type PropertySetter = Box<dyn Fn(String) + Send + Sync>;

/// Handles an operation invocation with its positional parameters
pub type OperationHandler =
    Box<dyn Fn(&[Value]) -> Result<OperationResult, MapperError> + Send + Sync>;

/// Errors raised by registrars
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrarError {
    #[error("Name '{0}' is already registered")]
    DuplicateName(String),

    #[error("Name '{0}' is not registered")]
    UnknownName(String),

    #[error("Property '{0}' is read-only")]
    ReadOnly(String),
}

/// Builder of the remote data-point model
pub trait Registrar {
    /// Defines a property; a `None` setter makes it read-only
    fn define_property(
        &mut self,
        name: String,
        getter: PropertyGetter,
        setter: Option<PropertySetter>,
    ) -> Result<(), RegistrarError>;

    /// Defines an operation
    fn define_operation(
        &mut self,
        name: String,
        handler: OperationHandler,
    ) -> Result<(), RegistrarError>;
}

/// A registrar that can forget names again
pub trait Unregister: Registrar {
    fn unregister(&mut self, name: &str) -> Result<(), RegistrarError>;
}
