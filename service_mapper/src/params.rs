//! Parameter vector validation
//!
//! Remote callers pass untyped positional values. Each operation declares a
//! schema that is checked before the typed contract method is called.

use serde_json::Value;
use thiserror::Error;

/// Expected type of one positional parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// A plain string; numbers and booleans are accepted in their text form
    Text,
    /// A structured value, either inline or as serialized text
    Serialized,
}

impl ParamKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            ParamKind::Text => matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_)),
            ParamKind::Serialized => !value.is_null(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            ParamKind::Text => "a text value",
            ParamKind::Serialized => "a structured value",
        }
    }
}

/// Shape of the parameter vector of one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSchema {
    /// Parameters are not inspected
    Ignored,
    /// Exactly these parameters, in order
    Exact(&'static [ParamKind]),
    /// One or more `(name, value)` pairs flattened into the vector
    Pairs,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParamError {
    #[error("Operation '{operation}' expects {expected} parameter(s), got {found}")]
    Arity {
        operation: String,
        expected: String,
        found: usize,
    },

    #[error("Operation '{operation}' expects {expected} at position {index}")]
    Type {
        operation: String,
        index: usize,
        expected: &'static str,
    },
}

impl ParamSchema {
    /// Checks a parameter vector against this schema
    pub fn validate(&self, operation: &str, params: &[Value]) -> Result<(), ParamError> {
        match self {
            ParamSchema::Ignored => Ok(()),
            ParamSchema::Exact(kinds) => {
                if params.len() != kinds.len() {
                    return Err(ParamError::Arity {
                        operation: operation.to_string(),
                        expected: kinds.len().to_string(),
                        found: params.len(),
                    });
                }
                for (index, (kind, value)) in kinds.iter().zip(params).enumerate() {
                    if !kind.accepts(value) {
                        return Err(ParamError::Type {
                            operation: operation.to_string(),
                            index,
                            expected: kind.describe(),
                        });
                    }
                }
                Ok(())
            }
            ParamSchema::Pairs => {
                if params.is_empty() || params.len() % 2 != 0 {
                    return Err(ParamError::Arity {
                        operation: operation.to_string(),
                        expected: "a non-zero even number of".to_string(),
                        found: params.len(),
                    });
                }
                for (pair, chunk) in params.chunks(2).enumerate() {
                    let index = pair * 2;
                    if !chunk[0].is_string() {
                        return Err(ParamError::Type {
                            operation: operation.to_string(),
                            index,
                            expected: "a parameter name",
                        });
                    }
                    if !ParamKind::Serialized.accepts(&chunk[1]) {
                        return Err(ParamError::Type {
                            operation: operation.to_string(),
                            index: index + 1,
                            expected: ParamKind::Serialized.describe(),
                        });
                    }
                }
                Ok(())
            }
        }
    }
}

/// Returns the text form of a validated `Text` parameter
pub(crate) fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
