//! # Contract Tests
//!
//! "Golden" tests for everything the remote platform sees, so that names,
//! ordinals and payload shapes don't drift accidentally over time.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: Every externally visible name is spelled
//!   out here once more, independently of the code that defines it
//! - **Testability first**: Contract tests fail when interfaces change
//! - **Mechanism not policy**: Define what must be stable, not how to use it
//!
//! ## Structure
//!
//! - [`vocabulary`]: Lifecycle state and service kind names and ordinals
//! - [`submodel`]: Registered property/operation names and the result
//!   envelope
//! - [`configuration`]: Mapper configuration file format

pub mod configuration;
pub mod submodel;
pub mod vocabulary;

/// Common test helpers for contract validation
pub mod test_helpers {
    use serde::Serialize;
    use serde_json::Value;

    /// Verifies the JSON form of a value against a golden value
    pub fn verify_json_contract<T: Serialize>(value: &T, expected: Value) {
        let actual = serde_json::to_value(value).expect("value must serialize");
        assert_eq!(
            actual, expected,
            "JSON contract changed: expected {}, got {}",
            expected, actual
        );
    }

    /// Verifies a list of names against a golden list, in order
    pub fn verify_names(kind: &str, actual: &[&str], expected: &[&str]) {
        assert_eq!(
            actual, expected,
            "{} names changed: expected {:?}, got {:?}",
            kind, expected, actual
        );
    }
}
