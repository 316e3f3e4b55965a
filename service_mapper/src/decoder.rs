//! Decoding of serialized structures in remote parameters

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Cannot decode structured value: {0}")]
pub struct DecodeError(pub String);

/// Turns the serialized text of a structured parameter into a value
pub trait StructuredDecoder: Send + Sync {
    fn decode(&self, text: &str) -> Result<Value, DecodeError>;
}

/// Decodes JSON text
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl StructuredDecoder for JsonDecoder {
    fn decode(&self, text: &str) -> Result<Value, DecodeError> {
        serde_json::from_str(text).map_err(|e| DecodeError(e.to_string()))
    }
}
