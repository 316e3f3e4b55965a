//! Operation result envelope

use serde::{Deserialize, Serialize};

/// Outcome of a remotely invoked operation
///
/// Serialised as `{"success": bool, "errorMessage": string|null}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
    pub success: bool,
    pub error_message: Option<String>,
}

impl OperationResult {
    /// A successful outcome without error payload
    pub fn success() -> Self {
        compose_result(true, None)
    }

    /// A failed outcome with a human-readable reason
    pub fn failure(message: impl Into<String>) -> Self {
        compose_result(false, Some(message.into()))
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

/// Builds a result envelope from a success flag and an optional message
pub fn compose_result(success: bool, error_message: Option<String>) -> OperationResult {
    OperationResult {
        success,
        error_message,
    }
}
