//! Rebuilds a [`JdlObject`] from already generated entity configuration.
//!
//! Every relationship record is matched against the destination entity's own
//! list, so a bidirectional pair is stored once, from the canonical side.

use cruet::Inflector;
use indexmap::{IndexMap, IndexSet};

use crate::document::EntityTargets;
use crate::error::CompileError;
use crate::field_types::{MAX, MAXBYTES, MAXLENGTH, MIN, MINBYTES, MINLENGTH, PATTERN};
use crate::json_entity::{JsonEntity, JsonField, JsonRelationship};
use crate::model::{
    Cardinality, JdlEntity, JdlEnum, JdlEnumValue, JdlField, JdlObject, JdlRelationship,
    JdlRelationshipSide, JdlValidation, JdlValidationValue, is_user,
};

/// Reconstructs a domain model from a map of entity configuration objects,
/// extending `existing` when one is given. A relationship target missing
/// from the map is dropped unless `strict` is set, in which case it is an
/// error.
pub fn parse_entities(
    entities: &IndexMap<String, JsonEntity>,
    existing: Option<JdlObject>,
    strict: bool,
) -> Result<JdlObject, CompileError> {
    let mut converter = Converter {
        entities,
        strict,
        object: existing.unwrap_or_default(),
        visited: IndexSet::new(),
    };
    converter.check_user_entity()?;
    converter.convert_entities();
    converter.convert_relationships()?;
    converter.convert_options();
    Ok(converter.object)
}

struct Converter<'a> {
    entities: &'a IndexMap<String, JsonEntity>,
    strict: bool,
    object: JdlObject,
    /// Relationship records already consumed as the inverse of a pair.
    visited: IndexSet<(&'a str, usize)>,
}

impl<'a> Converter<'a> {
    /// The built-in user is referenced through a sentinel, so a literal
    /// `User` entry is only legal once user management is skipped.
    fn check_user_entity(&self) -> Result<(), CompileError> {
        if self.object.has_unary_option("skipUserManagement") {
            return Ok(());
        }
        if let Some(name) = self.entities.keys().find(|name| is_user(name)) {
            return Err(CompileError::IllegalName(format!(
                "the entity name '{name}' is reserved for the built-in user, \
                 set the skipUserManagement option to declare it"
            )));
        }
        Ok(())
    }

    fn convert_entities(&mut self) {
        let entities = self.entities;
        for (name, json) in entities {
            let table_name = if json.entity_table_name.is_empty() {
                name.to_snake_case()
            } else {
                json.entity_table_name.clone()
            };
            let mut entity = JdlEntity {
                name: name.clone(),
                table_name,
                javadoc: json.javadoc.clone(),
                fields: IndexMap::new(),
            };
            for field in &json.fields {
                entity.add_field(self.convert_field(field));
            }
            self.object.add_entity(entity);
        }
    }

    fn convert_field(&mut self, json: &JsonField) -> JdlField {
        let mut field_type = json.field_type.clone();
        if let Some(values) = &json.field_values {
            self.register_enum(&field_type, values);
        } else if json.field_type == "byte[]" {
            field_type = match json.field_type_blob_content.as_deref() {
                Some("image") => "ImageBlob".to_string(),
                Some("text") => "TextBlob".to_string(),
                _ => "AnyBlob".to_string(),
            };
        }
        let mut validations = IndexMap::new();
        for rule in &json.field_validate_rules {
            let value = match rule.as_str() {
                MIN => number_value(json.field_validate_rules_min.as_ref()),
                MAX => number_value(json.field_validate_rules_max.as_ref()),
                MINLENGTH => json.field_validate_rules_minlength.map(JdlValidationValue::Integer),
                MAXLENGTH => json.field_validate_rules_maxlength.map(JdlValidationValue::Integer),
                MINBYTES => json.field_validate_rules_minbytes.map(JdlValidationValue::Integer),
                MAXBYTES => json.field_validate_rules_maxbytes.map(JdlValidationValue::Integer),
                PATTERN => json
                    .field_validate_rules_pattern
                    .clone()
                    .map(JdlValidationValue::Pattern),
                _ => None,
            };
            validations.insert(
                rule.clone(),
                JdlValidation {
                    name: rule.clone(),
                    value,
                },
            );
        }
        JdlField {
            name: json.field_name.clone(),
            field_type,
            javadoc: json.javadoc.clone(),
            validations,
        }
    }

    fn register_enum(&mut self, name: &str, values: &str) {
        if name.is_empty() || self.object.enums.contains_key(name) {
            return;
        }
        let mut decl = JdlEnum {
            name: name.to_string(),
            javadoc: None,
            values: Vec::new(),
        };
        for part in values.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let (value_name, literal) = match part.split_once(" (") {
                Some((head, tail)) => (head, tail.strip_suffix(')').map(str::to_string)),
                None => (part, None),
            };
            decl.values.push(JdlEnumValue {
                name: value_name.to_string(),
                value: literal,
            });
        }
        self.object.add_enum(decl);
    }

    fn convert_relationships(&mut self) -> Result<(), CompileError> {
        let entities = self.entities;
        for (name, json) in entities {
            for (index, record) in json.relationships.iter().enumerate() {
                if self.visited.contains(&(name.as_str(), index)) {
                    continue;
                }
                self.convert_relationship(name, index, record)?;
            }
        }
        Ok(())
    }

    fn convert_relationship(
        &mut self,
        source: &str,
        index: usize,
        record: &JsonRelationship,
    ) -> Result<(), CompileError> {
        let Some(cardinality) = Cardinality::from_json_name(&record.relationship_type) else {
            return Err(CompileError::InvalidObject(format!(
                "unknown relationship type '{}' on entity '{source}'",
                record.relationship_type
            )));
        };
        // Symmetric cardinalities are recorded from their owning side only,
        // the inverse record is consumed as the counterpart.
        if matches!(cardinality, Cardinality::OneToOne | Cardinality::ManyToMany)
            && record.owner_side != Some(true)
        {
            return Ok(());
        }
        let target = record.other_entity_name.to_pascal_case();
        let entry = self.entities.get_key_value(&target);
        if entry.is_none() {
            if is_user(&target) && !self.object.has_unary_option("skipUserManagement") {
                // The built-in user is never part of the set, substitute it.
                self.object.add_relationship(JdlRelationship {
                    cardinality,
                    from: converted_side(source, record),
                    to: bare_side(&target),
                    options: Vec::new(),
                });
                return Ok(());
            }
            if self.strict {
                return Err(CompileError::UndeclaredEntity(format!(
                    "in the {} relationship of '{source}', the '{target}' entity \
                     is not part of the set",
                    record.relationship_type
                )));
            }
            log::debug!(
                "dropping the '{}' relationship of '{source}', \
                 the '{target}' entity is not part of the set",
                record.relationship_name
            );
            return Ok(());
        }
        let counterpart = entry.and_then(|(key, json)| {
            let skip = (target == source).then_some(index);
            find_counterpart(json, source, &record.relationship_name, skip)
                .map(|(position, inverse)| (key.as_str(), position, inverse))
        });
        let relationship = match counterpart {
            Some((key, position, inverse)) => {
                self.visited.insert((key, position));
                match cardinality {
                    // The collection side declares the canonical direction.
                    Cardinality::ManyToOne => JdlRelationship {
                        cardinality: Cardinality::OneToMany,
                        from: converted_side(&target, inverse),
                        to: converted_side(source, record),
                        options: Vec::new(),
                    },
                    _ => JdlRelationship {
                        cardinality,
                        from: converted_side(source, record),
                        to: converted_side(&target, inverse),
                        options: Vec::new(),
                    },
                }
            }
            None => JdlRelationship {
                cardinality,
                from: converted_side(source, record),
                to: bare_side(&target),
                options: Vec::new(),
            },
        };
        self.object.add_relationship(relationship);
        Ok(())
    }

    fn convert_options(&mut self) {
        let entities = self.entities;
        for (name, json) in entities {
            let targets = || EntityTargets {
                list: vec![name.clone()],
                excluded: Vec::new(),
            };
            if json.dto != "no" {
                self.object.add_binary_option("dto", &json.dto, targets());
            }
            if json.pagination != "no" {
                self.object
                    .add_binary_option("paginate", &json.pagination, targets());
            }
            if json.service != "no" {
                self.object
                    .add_binary_option("service", &json.service, targets());
            }
            if let serde_json::Value::String(engine) = &json.search_engine {
                self.object.add_binary_option("search", engine, targets());
            }
            if let Some(value) = &json.microservice_name {
                self.object
                    .add_binary_option("microservice", value, targets());
            }
            if let Some(value) = &json.angular_js_suffix {
                self.object
                    .add_binary_option("angularSuffix", value, targets());
            }
            if !json.client_root_folder.is_empty() {
                self.object
                    .add_binary_option("clientRootFolder", &json.client_root_folder, targets());
            }
            if json.jpa_metamodel_filtering {
                self.object.add_unary_option("filter", targets());
            }
            if !json.fluent_methods {
                self.object.add_unary_option("noFluentMethod", targets());
            }
            if json.skip_client == Some(true) {
                self.object.add_unary_option("skipClient", targets());
            }
            if json.skip_server == Some(true) {
                self.object.add_unary_option("skipServer", targets());
            }
        }
    }
}

/// Scans `json` for the inverse of a relationship declared by `source`
/// under `name`. `skip` masks the record's own index on self-references.
fn find_counterpart<'e>(
    json: &'e JsonEntity,
    source: &str,
    name: &str,
    skip: Option<usize>,
) -> Option<(usize, &'e JsonRelationship)> {
    let back_reference = source.to_camel_case();
    json.relationships
        .iter()
        .enumerate()
        .find(|(index, candidate)| {
            Some(*index) != skip
                && candidate.other_entity_name == back_reference
                && candidate.other_entity_relationship_name.as_deref() == Some(name)
        })
}

fn converted_side(entity: &str, record: &JsonRelationship) -> JdlRelationshipSide {
    JdlRelationshipSide {
        entity: entity.to_string(),
        injected_field: Some(record.relationship_name.clone()),
        display_field: record.other_entity_field.clone().filter(|field| field != "id"),
        required: record.relationship_validate_rules.as_deref() == Some("required"),
        javadoc: record.javadoc.clone(),
    }
}

fn bare_side(entity: &str) -> JdlRelationshipSide {
    JdlRelationshipSide {
        entity: entity.to_string(),
        ..JdlRelationshipSide::default()
    }
}

fn number_value(number: Option<&serde_json::Number>) -> Option<JdlValidationValue> {
    let number = number?;
    match number.as_i64() {
        Some(value) => Some(JdlValidationValue::Integer(value)),
        None => number.as_f64().map(JdlValidationValue::Decimal),
    }
}
