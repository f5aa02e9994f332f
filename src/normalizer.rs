//! Flattens a validated [`JdlObject`] into the per-entity JSON records the
//! generator consumes. Option buckets are expanded onto their target
//! entities, fields and validations are flattened, and every relationship is
//! resolved in both directions so each record is navigable on its own.

use cruet::Inflector;
use indexmap::{IndexMap, IndexSet};

use crate::changelog::{DEFAULT_BASE, Timestamp};
use crate::document::EntityTargets;
use crate::error::CompileError;
use crate::field_types::{
    self, MAX, MAXBYTES, MAXLENGTH, MIN, MINBYTES, MINLENGTH, PATTERN, REQUIRED, UNIQUE,
};
use crate::json_entity::{Applications, JsonEntity, JsonField, JsonRelationship};
use crate::model::{
    ApplicationType, Cardinality, DatabaseType, JdlField, JdlObject, JdlRelationship,
    JdlValidationValue, is_user,
};

#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    pub database_type: DatabaseType,
    pub application_type: Option<ApplicationType>,
    /// `yyyyMMddHHmmss` base for changelog dates; the first entity gets the
    /// second after it.
    pub base_changelog_date: Option<String>,
}

impl NormalizeOptions {
    pub fn new(database_type: DatabaseType) -> NormalizeOptions {
        NormalizeOptions {
            database_type,
            application_type: None,
            base_changelog_date: None,
        }
    }
}

pub fn normalize(
    object: &JdlObject,
    options: &NormalizeOptions,
) -> Result<IndexMap<String, JsonEntity>, CompileError> {
    let gateway = options.application_type == Some(ApplicationType::Gateway);
    if !gateway && !options.database_type.supports_relationships() && !object.relationships.is_empty()
    {
        return Err(CompileError::IllegalAssociation(format!(
            "the {} database does not support relationships",
            options.database_type.as_str()
        )));
    }
    let mut normalizer = Normalizer {
        object,
        options,
        records: IndexMap::new(),
        explicit_service: IndexSet::new(),
    };
    normalizer.initialize_records()?;
    normalizer.apply_options();
    normalizer.flatten_fields()?;
    normalizer.resolve_relationships();
    normalizer.assign_applications();
    Ok(normalizer.records)
}

struct Normalizer<'a> {
    object: &'a JdlObject,
    options: &'a NormalizeOptions,
    records: IndexMap<String, JsonEntity>,
    /// Entities given a `service` option directly; `filter` only defaults
    /// the service of the others.
    explicit_service: IndexSet<String>,
}

impl Normalizer<'_> {
    fn initialize_records(&mut self) -> Result<(), CompileError> {
        let base = self
            .options
            .base_changelog_date
            .as_deref()
            .unwrap_or(DEFAULT_BASE);
        let mut timestamp = Timestamp::parse(base)?;
        for (name, entity) in &self.object.entities {
            if is_user(name) {
                log::warn!(
                    "the User entity is handled by the toolchain, \
                     its fields and relationships are not generated"
                );
                continue;
            }
            timestamp = timestamp.next_second();
            self.records.insert(
                name.clone(),
                JsonEntity {
                    name: name.clone(),
                    entity_table_name: entity.table_name.clone(),
                    javadoc: entity.javadoc.clone(),
                    changelog_date: Some(timestamp.to_string()),
                    ..JsonEntity::default()
                },
            );
        }
        Ok(())
    }

    /// Wildcards expand to every emitted entity; exclusions and the built-in
    /// user never receive an option.
    fn expand_targets(&self, targets: &EntityTargets) -> Vec<String> {
        let mut list: Vec<String> = if targets.list.iter().any(|name| name == "*") {
            self.records.keys().cloned().collect()
        } else {
            targets.list.clone()
        };
        list.retain(|name| {
            !targets.excluded.contains(name) && !is_user(name) && self.records.contains_key(name)
        });
        list
    }

    fn apply_options(&mut self) {
        let object = self.object;
        for (name, values) in &object.options.binary {
            for (value, targets) in values {
                let expanded = self.expand_targets(targets);
                for entity in &expanded {
                    let Some(record) = self.records.get_mut(entity) else {
                        continue;
                    };
                    match name.as_str() {
                        "dto" => record.dto = value.clone(),
                        "paginate" => record.pagination = value.clone(),
                        "service" => {
                            record.service = value.clone();
                            self.explicit_service.insert(entity.clone());
                        }
                        "search" => {
                            record.search_engine = serde_json::Value::String(value.clone());
                        }
                        "microservice" => record.microservice_name = Some(value.clone()),
                        "angularSuffix" => record.angular_js_suffix = Some(value.clone()),
                        "clientRootFolder" => record.client_root_folder = value.clone(),
                        _ => {}
                    }
                }
                if name == "search" {
                    // Excluded entities opt out of search explicitly.
                    for excluded in &targets.excluded {
                        if let Some(record) = self.records.get_mut(excluded) {
                            record.search_engine = serde_json::Value::Bool(false);
                        }
                    }
                }
            }
        }
        for (name, targets) in &object.options.unary {
            let expanded = self.expand_targets(targets);
            for entity in &expanded {
                let Some(record) = self.records.get_mut(entity) else {
                    continue;
                };
                match name.as_str() {
                    "skipClient" => record.skip_client = Some(true),
                    "skipServer" => record.skip_server = Some(true),
                    "noFluentMethod" => record.fluent_methods = false,
                    "filter" => {
                        record.jpa_metamodel_filtering = true;
                        if !self.explicit_service.contains(entity) {
                            record.service = "serviceClass".to_string();
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    fn flatten_fields(&mut self) -> Result<(), CompileError> {
        let object = self.object;
        for (name, entity) in &object.entities {
            if !self.records.contains_key(name) {
                continue;
            }
            let mut fields = Vec::with_capacity(entity.fields.len());
            for field in entity.fields.values() {
                fields.push(self.flatten_field(name, field)?);
            }
            if let Some(record) = self.records.get_mut(name) {
                record.fields = fields;
            }
        }
        Ok(())
    }

    fn flatten_field(&self, entity: &str, field: &JdlField) -> Result<JsonField, CompileError> {
        let mut json = JsonField {
            field_name: field.name.to_camel_case(),
            javadoc: field.javadoc.clone(),
            ..JsonField::default()
        };
        if let Some(decl) = self.object.enums.get(&field.field_type) {
            json.field_type = decl.name.clone();
            json.field_values = Some(
                decl.values
                    .iter()
                    .map(|value| match &value.value {
                        Some(literal) => format!("{} ({literal})", value.name),
                        None => value.name.clone(),
                    })
                    .collect::<Vec<_>>()
                    .join(","),
            );
        } else {
            let gateway = self.options.application_type == Some(ApplicationType::Gateway);
            if !gateway && !field_types::is_type(self.options.database_type, &field.field_type) {
                return Err(CompileError::WrongType(format!(
                    "the type '{}' of field '{}' in entity '{entity}' can not be resolved \
                     for the {} database",
                    field.field_type,
                    field.name,
                    self.options.database_type.as_str()
                )));
            }
            match field_types::blob_content(&field.field_type) {
                Some(content) => {
                    json.field_type = "byte[]".to_string();
                    json.field_type_blob_content = Some(content.to_string());
                }
                None => json.field_type = field.field_type.clone(),
            }
        }
        for validation in field.validations.values() {
            json.field_validate_rules.push(validation.name.clone());
            match validation.name.as_str() {
                REQUIRED | UNIQUE => {}
                MIN => json.field_validate_rules_min = validation_number(&validation.value),
                MAX => json.field_validate_rules_max = validation_number(&validation.value),
                MINLENGTH => {
                    json.field_validate_rules_minlength = validation_integer(&validation.value);
                }
                MAXLENGTH => {
                    json.field_validate_rules_maxlength = validation_integer(&validation.value);
                }
                MINBYTES => {
                    json.field_validate_rules_minbytes = validation_integer(&validation.value);
                }
                MAXBYTES => {
                    json.field_validate_rules_maxbytes = validation_integer(&validation.value);
                }
                PATTERN => {
                    if let Some(JdlValidationValue::Pattern(source)) = &validation.value {
                        json.field_validate_rules_pattern = Some(source.clone());
                    }
                }
                _ => {}
            }
        }
        Ok(json)
    }

    fn resolve_relationships(&mut self) {
        let object = self.object;
        for relationship in &object.relationships {
            self.resolve_relationship(relationship);
        }
    }

    /// Emits the declaring side's record and, when the destination declares
    /// an injected field, its mirror. A unidirectional one-to-many gets a
    /// synthesized inverse many-to-one so the target stays navigable.
    fn resolve_relationship(&mut self, relationship: &JdlRelationship) {
        let from = &relationship.from;
        let to = &relationship.to;
        let declared_inverse = to.injected_field.is_some();
        let relationship_name = from
            .injected_field
            .as_deref()
            .unwrap_or(to.entity.as_str())
            .to_camel_case();
        let inverse_name = to
            .injected_field
            .as_deref()
            .unwrap_or(from.entity.as_str())
            .to_camel_case();
        let from_field = from.display_field.clone().unwrap_or_else(|| "id".to_string());
        let to_field = to.display_field.clone().unwrap_or_else(|| "id".to_string());
        let from_required = from.required.then(|| "required".to_string());
        let to_required = to.required.then(|| "required".to_string());
        let forward = relationship.cardinality.json_name();

        let (from_record, to_record) = match relationship.cardinality {
            Cardinality::OneToOne => (
                JsonRelationship {
                    relationship_type: forward.to_string(),
                    relationship_name: relationship_name.clone(),
                    other_entity_name: to.entity.to_camel_case(),
                    other_entity_field: Some(from_field),
                    owner_side: Some(true),
                    other_entity_relationship_name: Some(inverse_name.clone()),
                    relationship_validate_rules: from_required,
                    javadoc: from.javadoc.clone(),
                },
                declared_inverse.then(|| JsonRelationship {
                    relationship_type: forward.to_string(),
                    relationship_name: inverse_name,
                    other_entity_name: from.entity.to_camel_case(),
                    other_entity_field: None,
                    owner_side: Some(false),
                    other_entity_relationship_name: Some(relationship_name),
                    relationship_validate_rules: to_required,
                    javadoc: to.javadoc.clone(),
                }),
            ),
            Cardinality::OneToMany => (
                JsonRelationship {
                    relationship_type: forward.to_string(),
                    relationship_name: relationship_name.clone(),
                    other_entity_name: to.entity.to_camel_case(),
                    other_entity_field: None,
                    owner_side: None,
                    other_entity_relationship_name: Some(inverse_name.clone()),
                    relationship_validate_rules: from_required,
                    javadoc: from.javadoc.clone(),
                },
                Some(JsonRelationship {
                    relationship_type: Cardinality::ManyToOne.json_name().to_string(),
                    relationship_name: inverse_name,
                    other_entity_name: from.entity.to_camel_case(),
                    other_entity_field: Some(to_field),
                    owner_side: None,
                    other_entity_relationship_name: Some(relationship_name),
                    relationship_validate_rules: declared_inverse.then_some(to_required).flatten(),
                    javadoc: declared_inverse.then(|| to.javadoc.clone()).flatten(),
                }),
            ),
            Cardinality::ManyToOne => (
                JsonRelationship {
                    relationship_type: forward.to_string(),
                    relationship_name: relationship_name.clone(),
                    other_entity_name: to.entity.to_camel_case(),
                    other_entity_field: Some(from_field),
                    owner_side: None,
                    other_entity_relationship_name: declared_inverse
                        .then(|| inverse_name.clone()),
                    relationship_validate_rules: from_required,
                    javadoc: from.javadoc.clone(),
                },
                declared_inverse.then(|| JsonRelationship {
                    relationship_type: Cardinality::OneToMany.json_name().to_string(),
                    relationship_name: inverse_name,
                    other_entity_name: from.entity.to_camel_case(),
                    other_entity_field: None,
                    owner_side: None,
                    other_entity_relationship_name: Some(relationship_name),
                    relationship_validate_rules: to_required,
                    javadoc: to.javadoc.clone(),
                }),
            ),
            Cardinality::ManyToMany => (
                JsonRelationship {
                    relationship_type: forward.to_string(),
                    relationship_name: relationship_name.clone(),
                    other_entity_name: to.entity.to_camel_case(),
                    other_entity_field: Some(from_field),
                    owner_side: Some(true),
                    other_entity_relationship_name: declared_inverse
                        .then(|| inverse_name.clone()),
                    relationship_validate_rules: from_required,
                    javadoc: from.javadoc.clone(),
                },
                declared_inverse.then(|| JsonRelationship {
                    relationship_type: forward.to_string(),
                    relationship_name: inverse_name,
                    other_entity_name: from.entity.to_camel_case(),
                    other_entity_field: Some(to_field),
                    owner_side: Some(false),
                    other_entity_relationship_name: Some(relationship_name),
                    relationship_validate_rules: to_required,
                    javadoc: to.javadoc.clone(),
                }),
            ),
        };
        if let Some(record) = self.records.get_mut(&from.entity) {
            record.relationships.push(from_record);
        }
        if let Some(to_record) = to_record
            && let Some(record) = self.records.get_mut(&to.entity)
        {
            record.relationships.push(to_record);
        }
    }

    fn assign_applications(&mut self) {
        if self.object.applications.is_empty() {
            for record in self.records.values_mut() {
                record.applications = Applications::wildcard();
            }
            return;
        }
        let object = self.object;
        for application in &object.applications {
            for name in &application.entities {
                if let Some(record) = self.records.get_mut(name) {
                    record.applications.push(&application.base_name);
                }
            }
        }
    }
}

fn validation_number(value: &Option<JdlValidationValue>) -> Option<serde_json::Number> {
    match value {
        Some(JdlValidationValue::Integer(i)) => Some(serde_json::Number::from(*i)),
        Some(JdlValidationValue::Decimal(f)) => serde_json::Number::from_f64(*f),
        _ => None,
    }
}

fn validation_integer(value: &Option<JdlValidationValue>) -> Option<i64> {
    match value {
        Some(JdlValidationValue::Integer(i)) => Some(*i),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{CompileOptions, compile};
    use crate::document::Document;
    use crate::parser::Parser;

    fn object(text: &str) -> JdlObject {
        let cst = Parser::new(text).unwrap().parse().unwrap();
        let document = Document::from_cst(&cst);
        let options = CompileOptions {
            database_type: Some(DatabaseType::Sql),
            ..CompileOptions::default()
        };
        compile(&document, &options).unwrap()
    }

    fn entities(text: &str) -> IndexMap<String, JsonEntity> {
        normalize(&object(text), &NormalizeOptions::new(DatabaseType::Sql)).unwrap()
    }

    #[test]
    fn test_changelog_dates_follow_declaration_order() {
        let records = entities("entity B entity A");
        assert_eq!(records["B"].changelog_date.as_deref(), Some("20200101000001"));
        assert_eq!(records["A"].changelog_date.as_deref(), Some("20200101000002"));
    }

    #[test]
    fn test_changelog_base_is_configurable() {
        let options = NormalizeOptions {
            base_changelog_date: Some("20191231235959".to_string()),
            ..NormalizeOptions::new(DatabaseType::Sql)
        };
        let records = normalize(&object("entity A"), &options).unwrap();
        assert_eq!(records["A"].changelog_date.as_deref(), Some("20200101000000"));
    }

    #[test]
    fn test_user_entity_is_skipped() {
        let records = entities("entity Car relationship ManyToOne { Car{owner} to User }");
        assert!(!records.contains_key("User"));
        assert_eq!(records["Car"].relationships[0].other_entity_name, "user");
    }

    #[test]
    fn test_wildcard_option_minus_exclusions_minus_user() {
        let records = entities(
            r#"
            entity Car entity Driver
            relationship ManyToOne { Car{owner} to User }
            dto mapstruct for * except Driver
            "#,
        );
        assert_eq!(records["Car"].dto, "mapstruct");
        assert_eq!(records["Driver"].dto, "no");
    }

    #[test]
    fn test_filter_defaults_service_class() {
        let records = entities("entity A entity B service serviceImpl for B filter A, B");
        assert!(records["A"].jpa_metamodel_filtering);
        assert_eq!(records["A"].service, "serviceClass");
        // An explicit service option is never overridden.
        assert_eq!(records["B"].service, "serviceImpl");
    }

    #[test]
    fn test_search_exclusions_disable_search() {
        let records = entities("entity A entity B search elasticsearch for * except B");
        assert_eq!(
            records["A"].search_engine,
            serde_json::Value::String("elasticsearch".to_string())
        );
        assert_eq!(records["B"].search_engine, serde_json::Value::Bool(false));
    }

    #[test]
    fn test_skip_flags_and_fluent_methods() {
        let records = entities("entity A skipClient A skipServer A noFluentMethod A");
        assert_eq!(records["A"].skip_client, Some(true));
        assert_eq!(records["A"].skip_server, Some(true));
        assert!(!records["A"].fluent_methods);
    }

    #[test]
    fn test_microservice_suffix_and_client_root_folder() {
        let records = entities(
            r#"
            entity A
            microservice store for A
            angularSuffix mySuffix for A
            clientRootFolder shop for A
            "#,
        );
        assert_eq!(records["A"].microservice_name.as_deref(), Some("store"));
        assert_eq!(records["A"].angular_js_suffix.as_deref(), Some("mySuffix"));
        assert_eq!(records["A"].client_root_folder, "shop");
    }

    #[test]
    fn test_field_flattening() {
        let records = entities(
            r#"
            MAX_LEN = 50
            entity A {
                /** the name */
                name String required maxlength(MAX_LEN)
                photo ImageBlob
                rating Double min(0.5)
            }
            "#,
        );
        let fields = &records["A"].fields;
        assert_eq!(fields[0].field_name, "name");
        assert_eq!(fields[0].field_validate_rules, vec!["required", "maxlength"]);
        assert_eq!(fields[0].field_validate_rules_maxlength, Some(50));
        assert_eq!(fields[0].javadoc.as_deref(), Some("the name"));
        assert_eq!(fields[1].field_type, "byte[]");
        assert_eq!(fields[1].field_type_blob_content.as_deref(), Some("image"));
        assert_eq!(
            fields[2].field_validate_rules_min,
            serde_json::Number::from_f64(0.5)
        );
    }

    #[test]
    fn test_enum_field_values() {
        let records = entities(
            r#"
            enum Language { FRENCH (french), ENGLISH }
            entity A { tongue Language required }
            "#,
        );
        let field = &records["A"].fields[0];
        assert_eq!(field.field_type, "Language");
        assert_eq!(field.field_values.as_deref(), Some("FRENCH (french),ENGLISH"));
        assert_eq!(field.field_validate_rules, vec!["required"]);
    }

    #[test]
    fn test_bidirectional_one_to_many() {
        let records = entities(
            "entity Foo entity Bar relationship OneToMany { Foo{bars} to Bar{foo} }",
        );
        let from = &records["Foo"].relationships[0];
        assert_eq!(from.relationship_type, "one-to-many");
        assert_eq!(from.relationship_name, "bars");
        assert_eq!(from.other_entity_name, "bar");
        assert_eq!(from.other_entity_field, None);
        assert_eq!(from.other_entity_relationship_name.as_deref(), Some("foo"));
        let to = &records["Bar"].relationships[0];
        assert_eq!(to.relationship_type, "many-to-one");
        assert_eq!(to.relationship_name, "foo");
        assert_eq!(to.other_entity_name, "foo");
        assert_eq!(to.other_entity_field.as_deref(), Some("id"));
        assert_eq!(to.other_entity_relationship_name.as_deref(), Some("bars"));
    }

    #[test]
    fn test_unidirectional_one_to_many_synthesizes_inverse() {
        let records = entities("entity Foo entity Bar relationship OneToMany { Foo{bars} to Bar }");
        let from = &records["Foo"].relationships[0];
        assert_eq!(from.other_entity_relationship_name.as_deref(), Some("foo"));
        let inverse = &records["Bar"].relationships[0];
        assert_eq!(inverse.relationship_type, "many-to-one");
        assert_eq!(inverse.relationship_name, "foo");
        assert_eq!(inverse.other_entity_field.as_deref(), Some("id"));
        assert_eq!(inverse.relationship_validate_rules, None);
        assert_eq!(inverse.other_entity_relationship_name.as_deref(), Some("bars"));
    }

    #[test]
    fn test_unidirectional_many_to_one_has_no_inverse() {
        let records =
            entities("entity Car entity Person relationship ManyToOne { Car{owner} to Person }");
        let from = &records["Car"].relationships[0];
        assert_eq!(from.relationship_type, "many-to-one");
        assert_eq!(from.other_entity_relationship_name, None);
        assert!(records["Person"].relationships.is_empty());
    }

    #[test]
    fn test_one_to_one_owner_side() {
        let records = entities(
            "entity Citizen entity Passport \
             relationship OneToOne { Citizen{passport} to Passport{citizen} }",
        );
        let owner = &records["Citizen"].relationships[0];
        assert_eq!(owner.owner_side, Some(true));
        assert_eq!(owner.other_entity_field.as_deref(), Some("id"));
        let inverse = &records["Passport"].relationships[0];
        assert_eq!(inverse.owner_side, Some(false));
        assert_eq!(inverse.other_entity_field, None);
        assert_eq!(inverse.other_entity_relationship_name.as_deref(), Some("passport"));
    }

    #[test]
    fn test_many_to_many_records() {
        let records = entities(
            "entity Car entity Driver \
             relationship ManyToMany { Car{drivers(name)} to Driver{cars} }",
        );
        let from = &records["Car"].relationships[0];
        assert_eq!(from.relationship_type, "many-to-many");
        assert_eq!(from.owner_side, Some(true));
        assert_eq!(from.other_entity_field.as_deref(), Some("name"));
        let to = &records["Driver"].relationships[0];
        assert_eq!(to.owner_side, Some(false));
        assert_eq!(to.relationship_name, "cars");
        assert_eq!(to.other_entity_relationship_name.as_deref(), Some("drivers"));
    }

    #[test]
    fn test_required_relationship_sides() {
        let records = entities(
            "entity Car entity Driver \
             relationship OneToOne { Car{driver required} to Driver{car} }",
        );
        let from = &records["Car"].relationships[0];
        assert_eq!(from.relationship_validate_rules.as_deref(), Some("required"));
        let to = &records["Driver"].relationships[0];
        assert_eq!(to.relationship_validate_rules, None);
    }

    #[test]
    fn test_applications_wildcard_and_list() {
        let records = entities("entity A");
        assert!(records["A"].applications.is_wildcard());
        let records = normalize(
            &object("entity A entity B application { config { baseName shop } entities A }"),
            &NormalizeOptions::new(DatabaseType::Sql),
        )
        .unwrap();
        assert_eq!(
            records["A"].applications,
            Applications::List(vec!["shop".to_string()])
        );
        assert_eq!(records["B"].applications, Applications::List(Vec::new()));
    }

    #[test]
    fn test_nosql_with_relationships_is_rejected() {
        let text = "entity A entity B relationship OneToMany { A{b} to B }";
        let compiled = {
            let cst = Parser::new(text).unwrap().parse().unwrap();
            let document = Document::from_cst(&cst);
            let options = CompileOptions {
                database_type: Some(DatabaseType::Cassandra),
                ..CompileOptions::default()
            };
            compile(&document, &options).unwrap()
        };
        let err = normalize(&compiled, &NormalizeOptions::new(DatabaseType::Cassandra)).unwrap_err();
        assert!(matches!(err, CompileError::IllegalAssociation(_)));
        // A gateway only routes, so the same object is acceptable there.
        let options = NormalizeOptions {
            application_type: Some(ApplicationType::Gateway),
            ..NormalizeOptions::new(DatabaseType::Cassandra)
        };
        assert!(normalize(&compiled, &options).is_ok());
    }

    #[test]
    fn test_unresolvable_type_is_reported() {
        let compiled = object("entity A { photo TextBlob }");
        let err = normalize(&compiled, &NormalizeOptions::new(DatabaseType::Cassandra)).unwrap_err();
        match err {
            CompileError::WrongType(message) => {
                assert!(message.contains("TextBlob"));
                assert!(message.contains("photo"));
                assert!(message.contains('A'));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
