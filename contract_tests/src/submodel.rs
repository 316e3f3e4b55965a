//! Submodel contract tests
//!
//! These tests define the stable names a mapped service occupies and the
//! shape of the result envelope every operation returns.

use service_mapper::OperationResult;

// ===== Submodel Name =====
pub const SUBMODEL: &str = "service";

// ===== Property Names =====
pub const PROPERTIES: [&str; 7] = [
    "id",
    "name",
    "version",
    "description",
    "state",
    "kind",
    "deployable",
];

// ===== Operation Names =====
pub const OPERATIONS: [&str; 7] = [
    "activate",
    "passivate",
    "setState",
    "migrate",
    "update",
    "switchTo",
    "reconfigure",
];

/// Envelope as the remote side decodes it
pub fn envelope(success: bool, error_message: Option<&str>) -> OperationResult {
    service_mapper::compose_result(success, error_message.map(str::to_string))
}
