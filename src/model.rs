//! The validated domain graph produced by the compiler and consumed by the
//! normalizer. Unlike [`crate::document`] everything in here has passed the
//! semantic checks: names are not reserved words, field types exist for the
//! active backend, relationship endpoints are declared.

use indexmap::IndexMap;

pub use crate::document::Cardinality;
use crate::document::{ConfigValue, EntityTargets, Options};

/// The built-in user entity managed by the surrounding toolchain.
pub const USER_ENTITY: &str = "User";
pub const USER_TABLE: &str = "jhi_user";

pub fn is_user(name: &str) -> bool {
    name.eq_ignore_ascii_case(USER_ENTITY)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    Sql,
    Mongodb,
    Cassandra,
    Couchbase,
    Neo4j,
    No,
}

impl DatabaseType {
    pub const ALL: &'static [DatabaseType] = &[
        DatabaseType::Sql,
        DatabaseType::Mongodb,
        DatabaseType::Cassandra,
        DatabaseType::Couchbase,
        DatabaseType::Neo4j,
        DatabaseType::No,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DatabaseType::Sql => "sql",
            DatabaseType::Mongodb => "mongodb",
            DatabaseType::Cassandra => "cassandra",
            DatabaseType::Couchbase => "couchbase",
            DatabaseType::Neo4j => "neo4j",
            DatabaseType::No => "no",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sql" => Some(DatabaseType::Sql),
            "mongodb" => Some(DatabaseType::Mongodb),
            "cassandra" => Some(DatabaseType::Cassandra),
            "couchbase" => Some(DatabaseType::Couchbase),
            "neo4j" => Some(DatabaseType::Neo4j),
            "no" => Some(DatabaseType::No),
            _ => None,
        }
    }

    /// Only SQL-family and MongoDB backends support entity relationships.
    pub fn supports_relationships(self) -> bool {
        matches!(self, DatabaseType::Sql | DatabaseType::Mongodb)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationType {
    Monolith,
    Microservice,
    Gateway,
}

impl ApplicationType {
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationType::Monolith => "monolith",
            ApplicationType::Microservice => "microservice",
            ApplicationType::Gateway => "gateway",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "monolith" => Some(ApplicationType::Monolith),
            "microservice" => Some(ApplicationType::Microservice),
            "gateway" => Some(ApplicationType::Gateway),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JdlObject {
    pub applications: Vec<JdlApplication>,
    pub deployments: Vec<JdlDeployment>,
    pub entities: IndexMap<String, JdlEntity>,
    pub enums: IndexMap<String, JdlEnum>,
    pub relationships: Vec<JdlRelationship>,
    pub options: Options,
}

impl JdlObject {
    pub fn add_entity(&mut self, entity: JdlEntity) {
        self.entities.insert(entity.name.clone(), entity);
    }

    pub fn add_enum(&mut self, decl: JdlEnum) {
        self.enums.insert(decl.name.clone(), decl);
    }

    pub fn add_relationship(&mut self, relationship: JdlRelationship) {
        self.relationships.push(relationship);
    }

    pub fn add_unary_option(&mut self, name: &str, targets: EntityTargets) {
        let bucket = self.options.unary.entry(name.to_string()).or_default();
        bucket.list.extend(targets.list);
        bucket.excluded.extend(targets.excluded);
    }

    pub fn add_binary_option(&mut self, name: &str, value: &str, targets: EntityTargets) {
        let bucket = self
            .options
            .binary
            .entry(name.to_string())
            .or_default()
            .entry(value.to_string())
            .or_default();
        bucket.list.extend(targets.list);
        bucket.excluded.extend(targets.excluded);
    }

    pub fn has_unary_option(&self, name: &str) -> bool {
        self.options.unary.contains_key(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JdlEntity {
    pub name: String,
    pub table_name: String,
    pub javadoc: Option<String>,
    pub fields: IndexMap<String, JdlField>,
}

impl JdlEntity {
    pub fn add_field(&mut self, field: JdlField) {
        self.fields.insert(field.name.clone(), field);
    }

    /// The synthesized built-in user entity.
    pub fn user() -> Self {
        JdlEntity {
            name: USER_ENTITY.to_string(),
            table_name: USER_TABLE.to_string(),
            javadoc: None,
            fields: IndexMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JdlField {
    pub name: String,
    pub field_type: String,
    pub javadoc: Option<String>,
    pub validations: IndexMap<String, JdlValidation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JdlValidation {
    pub name: String,
    pub value: Option<JdlValidationValue>,
}

/// Validation values after constant substitution.
#[derive(Debug, Clone, PartialEq)]
pub enum JdlValidationValue {
    Integer(i64),
    Decimal(f64),
    Pattern(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JdlEnum {
    pub name: String,
    pub javadoc: Option<String>,
    pub values: Vec<JdlEnumValue>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JdlEnumValue {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JdlRelationship {
    pub cardinality: Cardinality,
    pub from: JdlRelationshipSide,
    pub to: JdlRelationshipSide,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JdlRelationshipSide {
    pub entity: String,
    pub injected_field: Option<String>,
    pub display_field: Option<String>,
    pub required: bool,
    pub javadoc: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JdlApplication {
    pub base_name: String,
    pub application_type: ApplicationType,
    pub database_type: DatabaseType,
    /// Entity names after wildcard and exclusion resolution, in declaration
    /// order.
    pub entities: Vec<String>,
    pub config: IndexMap<String, ConfigValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JdlDeployment {
    pub deployment_type: String,
    pub config: IndexMap<String, ConfigValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_type_round_trip() {
        for db in DatabaseType::ALL {
            assert_eq!(DatabaseType::from_name(db.as_str()), Some(*db));
        }
        assert_eq!(DatabaseType::from_name("mysql"), None);
    }

    #[test]
    fn test_relationship_support() {
        assert!(DatabaseType::Sql.supports_relationships());
        assert!(DatabaseType::Mongodb.supports_relationships());
        assert!(!DatabaseType::Cassandra.supports_relationships());
        assert!(!DatabaseType::Couchbase.supports_relationships());
    }

    #[test]
    fn test_is_user() {
        assert!(is_user("User"));
        assert!(is_user("USER"));
        assert!(is_user("user"));
        assert!(!is_user("Users"));
    }

    #[test]
    fn test_option_buckets_accumulate() {
        let mut object = JdlObject::default();
        object.add_binary_option(
            "dto",
            "mapstruct",
            EntityTargets {
                list: vec!["A".to_string()],
                excluded: vec![],
            },
        );
        object.add_binary_option(
            "dto",
            "mapstruct",
            EntityTargets {
                list: vec!["B".to_string()],
                excluded: vec![],
            },
        );
        assert_eq!(object.options.binary["dto"]["mapstruct"].list, vec!["A", "B"]);
    }
}
