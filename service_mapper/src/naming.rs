//! Qualification of registered names
//!
//! Several services may share one registry. A qualifier turns a logical
//! name such as `state` into the name actually registered.

use core_types::ServiceId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Maps a logical property/operation name to its registered name
pub trait NameQualifier: Send + Sync {
    fn qualify(&self, name: &str, service: &ServiceId) -> String;
}

/// Registers names as they are
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityQualifier;

impl NameQualifier for IdentityQualifier {
    fn qualify(&self, name: &str, _service: &ServiceId) -> String {
        name.to_string()
    }
}

/// Prefixes names with the service id, e.g. `src-1_state`
#[derive(Debug, Clone)]
pub struct ServiceIdPrefixQualifier {
    separator: String,
}

impl ServiceIdPrefixQualifier {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl Default for ServiceIdPrefixQualifier {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

impl NameQualifier for ServiceIdPrefixQualifier {
    fn qualify(&self, name: &str, service: &ServiceId) -> String {
        format!("{}{}{}", service, self.separator, name)
    }
}

const DEFAULT_SEPARATOR: &str = "_";

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

/// Configurable choice of qualifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum NamingStrategy {
    #[default]
    Identity,
    ServiceIdPrefix {
        #[serde(default = "default_separator")]
        separator: String,
    },
}

impl NamingStrategy {
    /// Builds the qualifier for this strategy
    pub fn qualifier(&self) -> Arc<dyn NameQualifier> {
        match self {
            NamingStrategy::Identity => Arc::new(IdentityQualifier),
            NamingStrategy::ServiceIdPrefix { separator } => {
                Arc::new(ServiceIdPrefixQualifier::new(separator.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_qualifier() {
        let id = ServiceId::new("src-1");
        assert_eq!(IdentityQualifier.qualify("state", &id), "state");
    }

    #[test]
    fn test_prefix_qualifier() {
        let id = ServiceId::new("src-1");
        assert_eq!(
            ServiceIdPrefixQualifier::default().qualify("state", &id),
            "src-1_state"
        );
        assert_eq!(
            ServiceIdPrefixQualifier::new("/").qualify("setState", &id),
            "src-1/setState"
        );
    }

    #[test]
    fn test_strategy_builds_qualifier() {
        let id = ServiceId::new("svc");
        let strategy = NamingStrategy::ServiceIdPrefix {
            separator: ".".to_string(),
        };
        assert_eq!(strategy.qualifier().qualify("kind", &id), "svc.kind");
        assert_eq!(
            NamingStrategy::default().qualifier().qualify("kind", &id),
            "kind"
        );
    }

    #[test]
    fn test_strategy_json() {
        let strategy: NamingStrategy =
            serde_json::from_str(r#"{"strategy": "service_id_prefix"}"#).unwrap();
        assert_eq!(
            strategy,
            NamingStrategy::ServiceIdPrefix {
                separator: "_".to_string()
            }
        );

        let identity: NamingStrategy = serde_json::from_str(r#"{"strategy": "identity"}"#).unwrap();
        assert_eq!(identity, NamingStrategy::Identity);
    }
}
