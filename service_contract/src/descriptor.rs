//! Parameter descriptors for service reconfiguration

use crate::{ConfigValues, DescriptorError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Type of a reconfigurable parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterType {
    Boolean,
    Integer,
    Float,
    String,
    /// Any JSON structure; the service interprets it
    Structured,
}

impl ParameterType {
    /// Checks whether a value conforms to this type
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ParameterType::Boolean => value.is_boolean(),
            ParameterType::Integer => value.is_i64() || value.is_u64(),
            ParameterType::Float => value.is_number(),
            ParameterType::String => value.is_string(),
            ParameterType::Structured => !value.is_null(),
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParameterType::Boolean => "a boolean",
            ParameterType::Integer => "an integer",
            ParameterType::Float => "a number",
            ParameterType::String => "a string",
            ParameterType::Structured => "a structure",
        };
        f.write_str(name)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.is_f64() => "a number",
        Value::Number(_) => "an integer",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Declares which parameters a service accepts in `reconfigure`
///
/// Uses a BTreeMap so listings are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    parameters: BTreeMap<String, ParameterType>,
}

impl ParameterDescriptor {
    /// Creates an empty descriptor (accepts no parameters)
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a parameter
    pub fn with_parameter(mut self, name: impl Into<String>, ty: ParameterType) -> Self {
        self.parameters.insert(name.into(), ty);
        self
    }

    /// Returns the declared type of a parameter
    pub fn parameter(&self, name: &str) -> Option<ParameterType> {
        self.parameters.get(name).copied()
    }

    /// Iterates over declared parameters in name order
    pub fn parameters(&self) -> impl Iterator<Item = (&str, ParameterType)> {
        self.parameters.iter().map(|(name, ty)| (name.as_str(), *ty))
    }

    /// Returns the number of declared parameters
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Checks if no parameters are declared
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Validates every value before any of them is applied
    pub fn validate(&self, values: &ConfigValues) -> Result<(), DescriptorError> {
        for (name, value) in values {
            let ty = self
                .parameter(name)
                .ok_or_else(|| DescriptorError::UnknownParameter(name.clone()))?;
            if !ty.accepts(value) {
                return Err(DescriptorError::TypeMismatch {
                    name: name.clone(),
                    expected: ty,
                    found: json_type_name(value),
                });
            }
        }
        Ok(())
    }
}
