//! # Submodel Registry
//!
//! An in-memory registrar holding the properties and operations of one
//! submodel.
//!
//! ## Philosophy
//!
//! Names are the only addressing scheme. A name is either a property or an
//! operation, never both, and is defined at most once. Remote callers read
//! properties and invoke operations by name; the registry just dispatches.

use serde_json::Value;
use service_mapper::{
    MapperError, OperationHandler, OperationResult, PropertyGetter, PropertySetter, Registrar,
    RegistrarError, ServiceMapping, Unregister, NAME_SUBMODEL,
};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Errors from invoking an operation through the registry
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error(transparent)]
    Registrar(#[from] RegistrarError),

    #[error(transparent)]
    Mapper(#[from] MapperError),
}

struct Property {
    getter: PropertyGetter,
    setter: Option<PropertySetter>,
}

/// Registry of named properties and operations
pub struct SubmodelRegistry {
    name: String,
    properties: BTreeMap<String, Property>,
    operations: BTreeMap<String, OperationHandler>,
}

impl SubmodelRegistry {
    /// Creates an empty registry for the submodel `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
            operations: BTreeMap::new(),
        }
    }

    /// Returns the submodel name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Checks whether a property or operation is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name) || self.operations.contains_key(name)
    }

    /// Reads a property
    pub fn read_property(&self, name: &str) -> Result<String, RegistrarError> {
        self.properties
            .get(name)
            .map(|property| (property.getter)())
            .ok_or_else(|| RegistrarError::UnknownName(name.to_string()))
    }

    /// Writes a property through its setter
    pub fn write_property(&self, name: &str, value: String) -> Result<(), RegistrarError> {
        let property = self
            .properties
            .get(name)
            .ok_or_else(|| RegistrarError::UnknownName(name.to_string()))?;
        let setter = property
            .setter
            .as_ref()
            .ok_or_else(|| RegistrarError::ReadOnly(name.to_string()))?;
        setter(value);
        Ok(())
    }

    /// Invokes an operation with positional parameters
    pub fn invoke(&self, name: &str, params: &[Value]) -> Result<OperationResult, InvokeError> {
        let handler = self
            .operations
            .get(name)
            .ok_or_else(|| RegistrarError::UnknownName(name.to_string()))?;
        debug!(submodel = %self.name, operation = name, "invoking");
        Ok(handler(params)?)
    }

    /// Removes a property or operation
    pub fn unregister(&mut self, name: &str) -> Result<(), RegistrarError> {
        if self.properties.remove(name).is_some() || self.operations.remove(name).is_some() {
            debug!(submodel = %self.name, name, "unregistered");
            Ok(())
        } else {
            Err(RegistrarError::UnknownName(name.to_string()))
        }
    }

    /// Removes every name of a service mapping, skipping names already gone
    ///
    /// Returns the number of names removed.
    pub fn unregister_all(&mut self, mapping: &ServiceMapping) -> usize {
        mapping
            .names()
            .iter()
            .filter(|name| self.unregister(name.as_str()).is_ok())
            .count()
    }

    /// Lists property names in sorted order
    pub fn property_names(&self) -> Vec<String> {
        self.properties.keys().cloned().collect()
    }

    /// Lists operation names in sorted order
    pub fn operation_names(&self) -> Vec<String> {
        self.operations.keys().cloned().collect()
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    fn ensure_free(&self, name: &str) -> Result<(), RegistrarError> {
        if self.contains(name) {
            return Err(RegistrarError::DuplicateName(name.to_string()));
        }
        Ok(())
    }
}

impl Default for SubmodelRegistry {
    fn default() -> Self {
        Self::new(NAME_SUBMODEL)
    }
}

impl Registrar for SubmodelRegistry {
    fn define_property(
        &mut self,
        name: String,
        getter: PropertyGetter,
        setter: Option<PropertySetter>,
    ) -> Result<(), RegistrarError> {
        self.ensure_free(&name)?;
        self.properties.insert(name, Property { getter, setter });
        Ok(())
    }

    fn define_operation(
        &mut self,
        name: String,
        handler: OperationHandler,
    ) -> Result<(), RegistrarError> {
        self.ensure_free(&name)?;
        self.operations.insert(name, handler);
        Ok(())
    }
}

impl Unregister for SubmodelRegistry {
    fn unregister(&mut self, name: &str) -> Result<(), RegistrarError> {
        SubmodelRegistry::unregister(self, name)
    }
}
