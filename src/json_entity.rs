//! The per-entity JSON shape consumed by the generator layer. Serialization
//! must match that contract byte-for-byte, so renames and skip rules live
//! here and nowhere else.
//!
//! Defaults mirror what the generator assumes when a member is absent:
//! `dto`/`pagination`/`service` are `"no"`, `fluentMethods` is on,
//! `searchEngine` is `false`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JsonEntity {
    pub name: String,
    pub fields: Vec<JsonField>,
    pub relationships: Vec<JsonRelationship>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub javadoc: Option<String>,
    pub entity_table_name: String,
    pub dto: String,
    pub pagination: String,
    pub service: String,
    pub jpa_metamodel_filtering: bool,
    pub fluent_methods: bool,
    pub client_root_folder: String,
    pub applications: Applications,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changelog_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub microservice_name: Option<String>,
    /// Either `false` or the search engine name.
    pub search_engine: serde_json::Value,
    #[serde(rename = "angularJSSuffix", skip_serializing_if = "Option::is_none")]
    pub angular_js_suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_client: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_server: Option<bool>,
}

impl Default for JsonEntity {
    fn default() -> JsonEntity {
        JsonEntity {
            name: String::new(),
            fields: Vec::new(),
            relationships: Vec::new(),
            javadoc: None,
            entity_table_name: String::new(),
            dto: "no".to_string(),
            pagination: "no".to_string(),
            service: "no".to_string(),
            jpa_metamodel_filtering: false,
            fluent_methods: true,
            client_root_folder: String::new(),
            applications: Applications::default(),
            changelog_date: None,
            microservice_name: None,
            search_engine: serde_json::Value::Bool(false),
            angular_js_suffix: None,
            skip_client: None,
            skip_server: None,
        }
    }
}

/// `"*"` when no application blocks exist, otherwise the list of owning
/// application base names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Applications {
    Wildcard(String),
    List(Vec<String>),
}

impl Applications {
    pub fn wildcard() -> Applications {
        Applications::Wildcard("*".to_string())
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Applications::Wildcard(_))
    }

    pub fn push(&mut self, name: &str) {
        if let Applications::List(list) = self {
            list.push(name.to_string());
        }
    }
}

impl Default for Applications {
    fn default() -> Applications {
        Applications::List(Vec::new())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JsonField {
    pub field_name: String,
    pub field_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_type_blob_content: Option<String>,
    /// Comma-joined enum literals, custom values kept as `NAME (literal)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_values: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub javadoc: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub field_validate_rules: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_validate_rules_min: Option<serde_json::Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_validate_rules_max: Option<serde_json::Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_validate_rules_minlength: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_validate_rules_maxlength: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_validate_rules_minbytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_validate_rules_maxbytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_validate_rules_pattern: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JsonRelationship {
    pub relationship_type: String,
    pub relationship_name: String,
    pub other_entity_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_entity_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_side: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_entity_relationship_name: Option<String>,
    /// `"required"` when the side was declared required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_validate_rules: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub javadoc: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_on_deserialize() {
        let entity: JsonEntity =
            serde_json::from_str(r#"{"name": "Foo", "entityTableName": "foo"}"#).unwrap();
        assert_eq!(entity.dto, "no");
        assert_eq!(entity.pagination, "no");
        assert_eq!(entity.service, "no");
        assert!(entity.fluent_methods);
        assert!(!entity.jpa_metamodel_filtering);
        assert_eq!(entity.search_engine, serde_json::Value::Bool(false));
        assert_eq!(entity.applications, Applications::List(Vec::new()));
        assert_eq!(entity.skip_client, None);
    }

    #[test]
    fn test_applications_shapes() {
        let entity: JsonEntity =
            serde_json::from_str(r#"{"name": "Foo", "applications": "*"}"#).unwrap();
        assert!(entity.applications.is_wildcard());
        let entity: JsonEntity =
            serde_json::from_str(r#"{"name": "Foo", "applications": ["shop", "store"]}"#).unwrap();
        assert_eq!(
            entity.applications,
            Applications::List(vec!["shop".to_string(), "store".to_string()])
        );
    }

    #[test]
    fn test_serialized_member_names() {
        let entity = JsonEntity {
            name: "Foo".to_string(),
            entity_table_name: "foo".to_string(),
            angular_js_suffix: Some("mySuffix".to_string()),
            ..JsonEntity::default()
        };
        let value = serde_json::to_value(&entity).unwrap();
        assert_eq!(value["entityTableName"], "foo");
        assert_eq!(value["angularJSSuffix"], "mySuffix");
        assert_eq!(value["fluentMethods"], true);
        // Absent optionals are skipped entirely.
        assert!(value.get("changelogDate").is_none());
        assert!(value.get("microserviceName").is_none());
        assert!(value.get("skipClient").is_none());
    }

    #[test]
    fn test_field_validation_member_names() {
        let field = JsonField {
            field_name: "name".to_string(),
            field_type: "String".to_string(),
            field_validate_rules: vec!["required".to_string(), "maxlength".to_string()],
            field_validate_rules_maxlength: Some(50),
            ..JsonField::default()
        };
        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(value["fieldValidateRules"][1], "maxlength");
        assert_eq!(value["fieldValidateRulesMaxlength"], 50);
        assert!(value.get("fieldValidateRulesMinlength").is_none());
    }

    #[test]
    fn test_relationship_round_trip() {
        let relationship = JsonRelationship {
            relationship_type: "many-to-one".to_string(),
            relationship_name: "owner".to_string(),
            other_entity_name: "user".to_string(),
            other_entity_field: Some("login".to_string()),
            ..JsonRelationship::default()
        };
        let text = serde_json::to_string(&relationship).unwrap();
        let back: JsonRelationship = serde_json::from_str(&text).unwrap();
        assert_eq!(back, relationship);
    }
}
