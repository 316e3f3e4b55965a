//! Mapper configuration contract tests
//!
//! Configuration files are written by operators; the accepted format must
//! not change without a version bump.

// ===== Configuration Format Version =====
pub const CONFIG_VERSION: u32 = 1;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use serde_json::json;
    use service_mapper::{MapperConfig, NamingStrategy};

    #[test]
    fn test_config_version_contract() {
        assert_eq!(MapperConfig::CURRENT_VERSION, CONFIG_VERSION);
    }

    #[test]
    fn test_default_config_contract() {
        verify_json_contract(
            &MapperConfig::default(),
            json!({"version": 1, "naming": {"strategy": "identity"}}),
        );
    }

    #[test]
    fn test_prefix_config_contract() {
        let config = MapperConfig::new(NamingStrategy::ServiceIdPrefix {
            separator: "_".to_string(),
        });
        verify_json_contract(
            &config,
            json!({"version": 1, "naming": {"strategy": "service_id_prefix", "separator": "_"}}),
        );
    }

    #[test]
    fn test_operator_file_accepted() {
        let text = r#"{
            "version": 1,
            "naming": { "strategy": "service_id_prefix", "separator": "." }
        }"#;
        let config = MapperConfig::from_json(text.as_bytes()).unwrap();
        assert_eq!(
            config.naming,
            NamingStrategy::ServiceIdPrefix {
                separator: ".".to_string()
            }
        );
    }
}
