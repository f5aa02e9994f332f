//! Lifts generator configuration flags into wildcard options.

use crate::document::EntityTargets;
use crate::model::JdlObject;

const SERVER_OPTIONS: &[&str] = &["skipClient", "skipServer", "skipUserManagement"];

/// Reads the server flags of a generator configuration object and records
/// the truthy ones as options covering every entity.
pub fn parse_server_options(config: &serde_json::Value, existing: Option<JdlObject>) -> JdlObject {
    let mut object = existing.unwrap_or_default();
    for &name in SERVER_OPTIONS {
        if config.get(name).and_then(serde_json::Value::as_bool) == Some(true) {
            object.add_unary_option(
                name,
                EntityTargets {
                    list: vec!["*".to_string()],
                    excluded: Vec::new(),
                },
            );
        }
    }
    object
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::JdlEntity;
    use serde_json::json;

    #[test]
    fn test_true_flags_become_wildcard_options() {
        let config = json!({
            "skipClient": true,
            "skipUserManagement": true,
            "databaseType": "sql"
        });
        let object = parse_server_options(&config, None);
        assert!(object.has_unary_option("skipClient"));
        assert!(object.has_unary_option("skipUserManagement"));
        assert!(!object.has_unary_option("skipServer"));
        assert_eq!(object.options.unary["skipClient"].list, vec!["*"]);
    }

    #[test]
    fn test_false_and_missing_flags_are_ignored() {
        let object = parse_server_options(&json!({"skipServer": false}), None);
        assert!(object.options.unary.is_empty());
    }

    #[test]
    fn test_existing_object_is_extended() {
        let mut existing = JdlObject::default();
        existing.add_entity(JdlEntity {
            name: "Car".to_string(),
            ..JdlEntity::default()
        });
        let object = parse_server_options(&json!({"skipClient": true}), Some(existing));
        assert!(object.entities.contains_key("Car"));
        assert!(object.has_unary_option("skipClient"));
    }
}
