//! Turns a parsed [`Document`] into a validated [`JdlObject`]. This is where
//! names meet the reserved word lists, field types meet the backend tables
//! and relationship endpoints must resolve.
//!
//! All context is carried by an explicit [`CompileOptions`] value per call;
//! there is no shared state between compilations.

use cruet::Inflector;
use indexmap::{IndexMap, IndexSet};

use crate::document::{
    self, BINARY_OPTIONS, ConfigValue, Document, EntityTargets, UNARY_OPTIONS,
};
use crate::error::CompileError;
use crate::model::{
    ApplicationType, DatabaseType, JdlApplication, JdlDeployment, JdlEntity, JdlEnum, JdlEnumValue,
    JdlField, JdlObject, JdlRelationship, JdlRelationshipSide, JdlValidation, JdlValidationValue,
    USER_ENTITY, is_user,
};
use crate::{field_types, reserved};

pub const DEPLOYMENT_TYPES: &[&str] = &["docker-compose", "kubernetes", "openshift"];

/// Per-call compilation context. `database_type` selects single-application
/// mode; when the document declares application blocks it is ignored and
/// every entity is checked against the applications that own it.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    pub database_type: Option<DatabaseType>,
    pub application_type: Option<ApplicationType>,
    pub application_name: Option<String>,
    pub generator_version: Option<String>,
}

pub fn compile(document: &Document, options: &CompileOptions) -> Result<JdlObject, CompileError> {
    if document.applications.is_empty() && options.database_type.is_none() {
        return Err(CompileError::MissingInput("database type"));
    }
    let mut compiler = Compiler {
        document,
        options,
        object: JdlObject::default(),
        owners: IndexMap::new(),
    };
    compiler.register_applications()?;
    compiler.register_deployments()?;
    compiler.register_enums()?;
    compiler.register_entities()?;
    compiler.register_relationships()?;
    compiler.compile_options()?;
    compiler.add_implicit_microservice_option();
    Ok(compiler.object)
}

/// How field types are checked for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeResolver {
    /// Against one backend's type table.
    For(DatabaseType),
    /// Against the union of every backend, for entities owned by no
    /// application.
    Union,
    /// Everything passes; gateways only route to entities living elsewhere.
    Any,
}

impl TypeResolver {
    fn allows(self, type_name: &str) -> bool {
        match self {
            TypeResolver::For(db) => field_types::is_type(db, type_name),
            TypeResolver::Union => field_types::is_any_type(type_name),
            TypeResolver::Any => true,
        }
    }
}

struct Compiler<'a> {
    document: &'a Document,
    options: &'a CompileOptions,
    object: JdlObject,
    /// Entity name to the indices of the applications that own it, in
    /// application declaration order.
    owners: IndexMap<String, Vec<usize>>,
}

impl Compiler<'_> {
    fn register_applications(&mut self) -> Result<(), CompileError> {
        for application in &self.document.applications {
            let base_name = application
                .config
                .get("baseName")
                .and_then(ConfigValue::as_str)
                .ok_or(CompileError::MissingInput("application base name"))?
                .to_string();
            let application_type = match application.config.get("applicationType") {
                None => ApplicationType::Monolith,
                Some(value) => value
                    .as_str()
                    .and_then(ApplicationType::from_name)
                    .ok_or_else(|| {
                        CompileError::InvalidObject(format!(
                            "unknown application type in application '{base_name}'"
                        ))
                    })?,
            };
            let database_type = match application.config.get("databaseType") {
                None => DatabaseType::Sql,
                Some(value) => value
                    .as_str()
                    .and_then(DatabaseType::from_name)
                    .ok_or_else(|| {
                        CompileError::InvalidObject(format!(
                            "unknown database type in application '{base_name}'"
                        ))
                    })?,
            };
            let entities = self.resolve_application_entities(&application.entities)?;
            let mut config = application.config.clone();
            if let Some(version) = &self.options.generator_version {
                config
                    .entry("jhipsterVersion".to_string())
                    .or_insert_with(|| ConfigValue::Str(version.clone()));
            }
            let index = self.object.applications.len();
            for entity in &entities {
                self.owners.entry(entity.clone()).or_default().push(index);
            }
            self.object.applications.push(JdlApplication {
                base_name,
                application_type,
                database_type,
                entities,
                config,
            });
        }
        Ok(())
    }

    fn resolve_application_entities(
        &self,
        targets: &EntityTargets,
    ) -> Result<Vec<String>, CompileError> {
        let mut resolved: IndexSet<String> = IndexSet::new();
        if targets.list.iter().any(|name| name == "*") {
            resolved.extend(self.document.entities.iter().map(|e| e.name.clone()));
        } else {
            let missing: Vec<&str> = targets
                .list
                .iter()
                .filter(|name| !self.document.entities.iter().any(|e| &e.name == *name))
                .map(String::as_str)
                .collect();
            if !missing.is_empty() {
                return Err(CompileError::UndeclaredEntity(format!(
                    "the application entity list references undeclared entities: {}",
                    missing.join(", ")
                )));
            }
            resolved.extend(targets.list.iter().cloned());
        }
        Ok(resolved
            .into_iter()
            .filter(|name| !targets.excluded.contains(name))
            .collect())
    }

    fn register_deployments(&mut self) -> Result<(), CompileError> {
        for deployment in &self.document.deployments {
            let deployment_type = deployment
                .config
                .get("deploymentType")
                .and_then(ConfigValue::as_str)
                .ok_or_else(|| {
                    CompileError::InvalidObject("a deployment needs a deploymentType".to_string())
                })?;
            if !DEPLOYMENT_TYPES.contains(&deployment_type) {
                return Err(CompileError::InvalidObject(format!(
                    "unknown deployment type '{deployment_type}'"
                )));
            }
            self.object.deployments.push(JdlDeployment {
                deployment_type: deployment_type.to_string(),
                config: deployment.config.clone(),
            });
        }
        Ok(())
    }

    fn register_enums(&mut self) -> Result<(), CompileError> {
        for decl in &self.document.enums {
            if reserved::is_reserved_class_name(&decl.name) {
                return Err(CompileError::IllegalName(format!(
                    "the name '{}' is reserved and can not be used as an enum name",
                    decl.name
                )));
            }
            self.object.add_enum(JdlEnum {
                name: decl.name.clone(),
                javadoc: decl.javadoc.clone(),
                values: decl
                    .values
                    .iter()
                    .map(|value| JdlEnumValue {
                        name: value.name.clone(),
                        value: value.value.clone(),
                    })
                    .collect(),
            });
        }
        Ok(())
    }

    fn register_entities(&mut self) -> Result<(), CompileError> {
        for entity in &self.document.entities {
            if reserved::is_reserved_class_name(&entity.name) {
                return Err(CompileError::IllegalName(format!(
                    "the name '{}' is reserved and can not be used as an entity name",
                    entity.name
                )));
            }
            let (resolver, databases) = self.entity_context(&entity.name)?;
            let table_name = entity
                .table_name
                .clone()
                .unwrap_or_else(|| entity.name.to_snake_case());
            for database_type in &databases {
                if reserved::is_reserved_table_name(&table_name, *database_type) {
                    return Err(CompileError::IllegalName(format!(
                        "the table name '{}' of entity '{}' is reserved for the {} database",
                        table_name,
                        entity.name,
                        database_type.as_str()
                    )));
                }
            }
            let mut compiled = JdlEntity {
                name: entity.name.clone(),
                table_name,
                javadoc: entity.javadoc.clone(),
                fields: IndexMap::new(),
            };
            for field in &entity.fields {
                if let Some(field) = self.compile_field(&entity.name, field, resolver)? {
                    compiled.add_field(field);
                }
            }
            self.object.add_entity(compiled);
        }
        // The built-in user entity is a valid relationship destination even
        // when never declared.
        let targets_user = self
            .document
            .relationships
            .iter()
            .any(|relationship| is_user(&relationship.to.name));
        if targets_user && !self.object.entities.keys().any(|name| is_user(name)) {
            self.object.add_entity(JdlEntity::user());
        }
        Ok(())
    }

    /// Resolves how one entity's types and table name are checked. In
    /// multi-application mode the first declared owning application wins a
    /// database type disagreement; the others are only warned about.
    fn entity_context(
        &self,
        name: &str,
    ) -> Result<(TypeResolver, Vec<DatabaseType>), CompileError> {
        if self.document.applications.is_empty() {
            let database_type = self
                .options
                .database_type
                .ok_or(CompileError::MissingInput("database type"))?;
            let resolver = if self.options.application_type == Some(ApplicationType::Gateway) {
                TypeResolver::Any
            } else {
                TypeResolver::For(database_type)
            };
            return Ok((resolver, vec![database_type]));
        }
        let Some((first, rest)) = self.owners.get(name).and_then(|o| o.split_first()) else {
            return Ok((TypeResolver::Union, Vec::new()));
        };
        let first = &self.object.applications[*first];
        let chosen = first.database_type;
        let mut databases = vec![chosen];
        for index in rest {
            let other = self.object.applications[*index].database_type;
            if other != chosen {
                log::warn!(
                    "applications disagree on the database type for entity '{name}' \
                     ({} and {}), using {}",
                    chosen.as_str(),
                    other.as_str(),
                    chosen.as_str()
                );
            }
            if !databases.contains(&other) {
                databases.push(other);
            }
        }
        let resolver = if first.application_type == ApplicationType::Gateway {
            TypeResolver::Any
        } else {
            TypeResolver::For(chosen)
        };
        Ok((resolver, databases))
    }

    fn compile_field(
        &self,
        entity: &str,
        field: &document::Field,
        resolver: TypeResolver,
    ) -> Result<Option<JdlField>, CompileError> {
        if field.name == "id" {
            // The primary key is implicit; a declared one is dropped.
            log::debug!("ignoring the declared 'id' field of entity '{entity}'");
            return Ok(None);
        }
        if reserved::is_reserved_field_name(&field.name) {
            return Err(CompileError::IllegalName(format!(
                "the name '{}' is reserved and can not be used as a field name (entity '{entity}')",
                field.name
            )));
        }
        let is_enum = self.object.enums.contains_key(&field.field_type);
        if !is_enum && !resolver.allows(&field.field_type) {
            return Err(CompileError::WrongType(format!(
                "the type '{}' of field '{}' in entity '{entity}' is not supported",
                field.field_type, field.name
            )));
        }
        let mut validations = IndexMap::new();
        for validation in &field.validations {
            let applicable = if is_enum {
                field_types::ENUM_VALIDATIONS.contains(&validation.name.as_str())
            } else {
                field_types::has_validation(&field.field_type, &validation.name)
            };
            if !applicable {
                return Err(CompileError::WrongValidation(format!(
                    "the validation '{}' does not apply to the type '{}' (field '{}' of entity '{entity}')",
                    validation.name, field.field_type, field.name
                )));
            }
            let value = validation
                .value
                .as_ref()
                .map(|value| self.resolve_validation_value(&validation.name, value))
                .transpose()?;
            validations.insert(
                validation.name.clone(),
                JdlValidation {
                    name: validation.name.clone(),
                    value,
                },
            );
        }
        Ok(Some(JdlField {
            name: field.name.clone(),
            field_type: field.field_type.clone(),
            javadoc: field.javadoc.clone(),
            validations,
        }))
    }

    fn resolve_validation_value(
        &self,
        validation: &str,
        value: &document::ValidationValue,
    ) -> Result<JdlValidationValue, CompileError> {
        match value {
            document::ValidationValue::Pattern(source) => {
                Ok(JdlValidationValue::Pattern(source.clone()))
            }
            document::ValidationValue::Number(text) if text.contains('.') => text
                .parse::<f64>()
                .map(JdlValidationValue::Decimal)
                .map_err(|_| {
                    CompileError::WrongValidation(format!(
                        "'{text}' is not a valid value for '{validation}'"
                    ))
                }),
            document::ValidationValue::Number(text) => text
                .parse::<i64>()
                .map(JdlValidationValue::Integer)
                .map_err(|_| {
                    CompileError::WrongValidation(format!(
                        "'{text}' is not a valid value for '{validation}'"
                    ))
                }),
            document::ValidationValue::Constant(name) => self
                .document
                .constants
                .get(name)
                .copied()
                .map(JdlValidationValue::Integer)
                .ok_or_else(|| {
                    CompileError::WrongValidation(format!(
                        "'{validation}' references the undeclared constant '{name}'"
                    ))
                }),
        }
    }

    fn register_relationships(&mut self) -> Result<(), CompileError> {
        let mut missing: Vec<&str> = Vec::new();
        for relationship in &self.document.relationships {
            if is_user(&relationship.from.name) {
                return Err(CompileError::IllegalAssociation(format!(
                    "relationships from the built-in User entity are not supported \
                     ('{}' to '{}')",
                    relationship.from.name, relationship.to.name
                )));
            }
            for end in [&relationship.from, &relationship.to] {
                if !self.is_declared(&end.name) && !missing.contains(&end.name.as_str()) {
                    missing.push(&end.name);
                }
            }
        }
        if !missing.is_empty() {
            return Err(CompileError::UndeclaredEntity(format!(
                "the entities {} are used in relationships but never declared",
                missing.join(", ")
            )));
        }
        for relationship in &self.document.relationships {
            let compiled = JdlRelationship {
                cardinality: relationship.cardinality,
                from: self.compile_side(&relationship.from),
                to: self.compile_side(&relationship.to),
                options: relationship.options.clone(),
            };
            self.object.add_relationship(compiled);
        }
        Ok(())
    }

    fn is_declared(&self, name: &str) -> bool {
        self.object.entities.contains_key(name)
            || (is_user(name) && self.object.entities.contains_key(USER_ENTITY))
    }

    fn compile_side(&self, end: &document::RelationshipEnd) -> JdlRelationshipSide {
        // Lowercase spellings of the built-in user resolve to its canonical
        // entry.
        let entity = if self.object.entities.contains_key(&end.name) {
            end.name.clone()
        } else {
            USER_ENTITY.to_string()
        };
        JdlRelationshipSide {
            entity,
            injected_field: end.injected_field.clone(),
            display_field: end.display_field.clone(),
            required: end.required,
            javadoc: end.javadoc.clone(),
        }
    }

    fn compile_options(&mut self) -> Result<(), CompileError> {
        let document = self.document;
        let global_in_microservice = document.applications.is_empty()
            && self.options.application_type == Some(ApplicationType::Microservice);
        self.apply_options(&document.options, global_in_microservice)?;
        for (index, application) in document.applications.iter().enumerate() {
            let inside_microservice =
                self.object.applications[index].application_type == ApplicationType::Microservice;
            self.apply_options(&application.options, inside_microservice)?;
        }
        Ok(())
    }

    fn apply_options(
        &mut self,
        options: &document::Options,
        inside_microservice: bool,
    ) -> Result<(), CompileError> {
        for (name, targets) in &options.unary {
            if !UNARY_OPTIONS.contains(&name.as_str()) {
                return Err(CompileError::InvalidObject(format!(
                    "unknown option '{name}'"
                )));
            }
            if targets.list.is_empty() {
                return Err(CompileError::InvalidObject(format!(
                    "the option '{name}' has an empty entity list"
                )));
            }
            self.object.add_unary_option(name, targets.clone());
        }
        for (name, values) in &options.binary {
            if !BINARY_OPTIONS.contains(&name.as_str()) {
                return Err(CompileError::InvalidObject(format!(
                    "unknown option '{name}'"
                )));
            }
            if name == "clientRootFolder" && inside_microservice {
                log::warn!("the option 'clientRootFolder' is ignored inside a microservice");
                continue;
            }
            for (value, targets) in values {
                if let Some(allowed) = known_option_values(name)
                    && !allowed.contains(&value.as_str())
                {
                    return Err(CompileError::InvalidObject(format!(
                        "unknown value '{value}' for option '{name}'"
                    )));
                }
                if targets.list.is_empty() {
                    return Err(CompileError::InvalidObject(format!(
                        "the option '{name}' has an empty entity list"
                    )));
                }
                if name == "paginate" {
                    self.check_pagination(targets)?;
                }
                self.object.add_binary_option(name, value, targets.clone());
            }
        }
        Ok(())
    }

    fn check_pagination(&self, targets: &EntityTargets) -> Result<(), CompileError> {
        if self.document.applications.is_empty() {
            if self.options.database_type == Some(DatabaseType::Cassandra) {
                return Err(CompileError::IllegalOption(
                    "pagination is not supported for the Cassandra database".to_string(),
                ));
            }
            return Ok(());
        }
        for name in self.pagination_targets(targets) {
            let database_type = self
                .owners
                .get(&name)
                .and_then(|owners| owners.first())
                .map(|index| self.object.applications[*index].database_type);
            if database_type == Some(DatabaseType::Cassandra) {
                return Err(CompileError::IllegalOption(format!(
                    "pagination is not supported for entity '{name}' backed by Cassandra"
                )));
            }
        }
        Ok(())
    }

    fn pagination_targets(&self, targets: &EntityTargets) -> Vec<String> {
        let mut list: Vec<String> = if targets.list.iter().any(|name| name == "*") {
            self.document.entities.iter().map(|e| e.name.clone()).collect()
        } else {
            targets.list.clone()
        };
        list.retain(|name| !targets.excluded.contains(name));
        list
    }

    /// Entities of a microservice application carry its name even without a
    /// declared `microservice` option.
    fn add_implicit_microservice_option(&mut self) {
        if self.object.options.binary.contains_key("microservice") {
            return;
        }
        if self.document.applications.is_empty() {
            if self.options.application_type == Some(ApplicationType::Microservice)
                && let Some(name) = self.options.application_name.clone()
            {
                self.object.add_binary_option(
                    "microservice",
                    &name,
                    EntityTargets {
                        list: vec!["*".to_string()],
                        excluded: Vec::new(),
                    },
                );
            }
            return;
        }
        let implicit: Vec<(String, Vec<String>)> = self
            .object
            .applications
            .iter()
            .filter(|application| application.application_type == ApplicationType::Microservice)
            .map(|application| (application.base_name.clone(), application.entities.clone()))
            .collect();
        for (name, entities) in implicit {
            if entities.is_empty() {
                continue;
            }
            self.object.add_binary_option(
                "microservice",
                &name,
                EntityTargets {
                    list: entities,
                    excluded: Vec::new(),
                },
            );
        }
    }
}

fn known_option_values(name: &str) -> Option<&'static [&'static str]> {
    match name {
        "dto" => Some(&["mapstruct", "no"]),
        "paginate" => Some(&["pagination", "pager", "infinite-scroll", "no"]),
        "service" => Some(&["serviceClass", "serviceImpl", "no"]),
        "search" => Some(&["elasticsearch", "no"]),
        // The remaining binary options take free-form values.
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn parse(text: &str) -> Document {
        let cst = Parser::new(text).unwrap().parse().unwrap();
        Document::from_cst(&cst)
    }

    fn sql() -> CompileOptions {
        CompileOptions {
            database_type: Some(DatabaseType::Sql),
            ..CompileOptions::default()
        }
    }

    #[test]
    fn test_single_mode_requires_database_type() {
        let document = parse("entity A");
        let err = compile(&document, &CompileOptions::default()).unwrap_err();
        assert!(matches!(err, CompileError::MissingInput("database type")));
    }

    #[test]
    fn test_compiles_entity_with_default_table_name() {
        let document = parse("entity OrderItem { quantity Integer }");
        let object = compile(&document, &sql()).unwrap();
        let entity = &object.entities["OrderItem"];
        assert_eq!(entity.table_name, "order_item");
        assert_eq!(entity.fields["quantity"].field_type, "Integer");
    }

    #[test]
    fn test_explicit_table_name_is_kept() {
        let document = parse("entity Person (people) { name String }");
        let object = compile(&document, &sql()).unwrap();
        assert_eq!(object.entities["Person"].table_name, "people");
    }

    #[test]
    fn test_declared_id_field_is_dropped() {
        let document = parse("entity A { id Long name String }");
        let object = compile(&document, &sql()).unwrap();
        let entity = &object.entities["A"];
        assert!(!entity.fields.contains_key("id"));
        assert!(entity.fields.contains_key("name"));
    }

    #[test]
    fn test_reserved_entity_name() {
        let document = parse("entity Account { name String }");
        let err = compile(&document, &sql()).unwrap_err();
        assert!(matches!(err, CompileError::IllegalName(_)));
    }

    #[test]
    fn test_reserved_field_name() {
        let document = parse("entity A { private String }");
        let err = compile(&document, &sql()).unwrap_err();
        assert!(matches!(err, CompileError::IllegalName(_)));
    }

    #[test]
    fn test_reserved_table_name_depends_on_database() {
        let document = parse("entity A (analyze) { name String }");
        assert!(matches!(
            compile(&document, &sql()).unwrap_err(),
            CompileError::IllegalName(_)
        ));
        let mongo = CompileOptions {
            database_type: Some(DatabaseType::Mongodb),
            ..CompileOptions::default()
        };
        assert!(compile(&document, &mongo).is_ok());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let document = parse("entity A { name Varchar }");
        let err = compile(&document, &sql()).unwrap_err();
        assert!(matches!(err, CompileError::WrongType(_)));
    }

    #[test]
    fn test_enum_type_is_resolved() {
        let document = parse("enum Color { RED, GREEN } entity A { color Color required }");
        let object = compile(&document, &sql()).unwrap();
        assert_eq!(object.entities["A"].fields["color"].field_type, "Color");
    }

    #[test]
    fn test_validation_must_match_type() {
        let document = parse("entity A { name String min(3) }");
        let err = compile(&document, &sql()).unwrap_err();
        assert!(matches!(err, CompileError::WrongValidation(_)));
    }

    #[test]
    fn test_constant_substitution() {
        let document = parse("MAX_LEN = 50 entity A { name String maxlength(MAX_LEN) }");
        let object = compile(&document, &sql()).unwrap();
        let validation = &object.entities["A"].fields["name"].validations["maxlength"];
        assert_eq!(validation.value, Some(JdlValidationValue::Integer(50)));
    }

    #[test]
    fn test_undeclared_constant() {
        let document = parse("entity A { name String maxlength(MAX_LEN) }");
        let err = compile(&document, &sql()).unwrap_err();
        assert!(matches!(err, CompileError::WrongValidation(_)));
    }

    #[test]
    fn test_user_is_synthesized_as_target() {
        let document = parse("entity Car relationship ManyToOne { Car{owner} to User }");
        let object = compile(&document, &sql()).unwrap();
        assert_eq!(object.entities["User"].table_name, "jhi_user");
        assert_eq!(object.relationships[0].to.entity, "User");
    }

    #[test]
    fn test_lowercase_user_target_is_canonicalized() {
        let document = parse("entity Car relationship ManyToOne { Car{owner} to user }");
        let object = compile(&document, &sql()).unwrap();
        assert_eq!(object.relationships[0].to.entity, "User");
    }

    #[test]
    fn test_relationship_from_user_is_rejected() {
        let document = parse("entity Car relationship OneToMany { User{car} to Car }");
        let err = compile(&document, &sql()).unwrap_err();
        assert!(matches!(err, CompileError::IllegalAssociation(_)));
    }

    #[test]
    fn test_undeclared_relationship_entities_are_listed() {
        let document = parse("entity A relationship OneToMany { A{b} to B }");
        let err = compile(&document, &sql()).unwrap_err();
        match err {
            CompileError::UndeclaredEntity(message) => assert!(message.contains('B')),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_pagination_rejected_for_cassandra() {
        let document = parse("entity A paginate pagination for A");
        let cassandra = CompileOptions {
            database_type: Some(DatabaseType::Cassandra),
            ..CompileOptions::default()
        };
        assert!(matches!(
            compile(&document, &cassandra).unwrap_err(),
            CompileError::IllegalOption(_)
        ));
        assert!(compile(&document, &sql()).is_ok());
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let document = parse("@readOnly entity A");
        let err = compile(&document, &sql()).unwrap_err();
        assert!(matches!(err, CompileError::InvalidObject(_)));
    }

    #[test]
    fn test_unknown_option_value_is_rejected() {
        let document = parse("entity A dto dozer for A");
        let err = compile(&document, &sql()).unwrap_err();
        assert!(matches!(err, CompileError::InvalidObject(_)));
    }

    #[test]
    fn test_client_root_folder_ignored_in_microservice() {
        let document = parse("entity A clientRootFolder shop for A");
        let options = CompileOptions {
            database_type: Some(DatabaseType::Sql),
            application_type: Some(ApplicationType::Microservice),
            application_name: Some("store".to_string()),
            ..CompileOptions::default()
        };
        let object = compile(&document, &options).unwrap();
        assert!(!object.options.binary.contains_key("clientRootFolder"));
        let object = compile(&document, &sql()).unwrap();
        assert!(object.options.binary.contains_key("clientRootFolder"));
    }

    #[test]
    fn test_implicit_microservice_option() {
        let document = parse("entity A entity B");
        let options = CompileOptions {
            database_type: Some(DatabaseType::Sql),
            application_type: Some(ApplicationType::Microservice),
            application_name: Some("store".to_string()),
            ..CompileOptions::default()
        };
        let object = compile(&document, &options).unwrap();
        assert_eq!(object.options.binary["microservice"]["store"].list, vec!["*"]);
    }

    #[test]
    fn test_declared_microservice_option_wins() {
        let document = parse("entity A microservice billing for A");
        let options = CompileOptions {
            database_type: Some(DatabaseType::Sql),
            application_type: Some(ApplicationType::Microservice),
            application_name: Some("store".to_string()),
            ..CompileOptions::default()
        };
        let object = compile(&document, &options).unwrap();
        assert!(!object.options.binary["microservice"].contains_key("store"));
        assert_eq!(object.options.binary["microservice"]["billing"].list, vec!["A"]);
    }

    #[test]
    fn test_application_base_name_is_required() {
        let document = parse(r#"application { config { packageName "com.shop" } }"#);
        let err = compile(&document, &CompileOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            CompileError::MissingInput("application base name")
        ));
    }

    #[test]
    fn test_application_defaults() {
        let document = parse("entity A entity B application { config { baseName shop } }");
        let object = compile(&document, &CompileOptions::default()).unwrap();
        let application = &object.applications[0];
        assert_eq!(application.application_type, ApplicationType::Monolith);
        assert_eq!(application.database_type, DatabaseType::Sql);
        assert_eq!(application.entities, vec!["A", "B"]);
    }

    #[test]
    fn test_application_entity_list_must_be_declared() {
        let document = parse("application { config { baseName shop } entities A }");
        let err = compile(&document, &CompileOptions::default()).unwrap_err();
        assert!(matches!(err, CompileError::UndeclaredEntity(_)));
    }

    #[test]
    fn test_first_application_wins_database_disagreement() {
        let document = parse(
            r#"
            application { config { baseName shop } entities A }
            application { config { baseName billing databaseType cassandra } entities A }
            entity A { created LocalDate }
            "#,
        );
        // LocalDate is valid for sql, the first owner, so this compiles.
        assert!(compile(&document, &CompileOptions::default()).is_ok());
        let document = parse(
            r#"
            application { config { baseName billing databaseType cassandra } entities A }
            application { config { baseName shop } entities A }
            entity A { created LocalDate }
            "#,
        );
        assert!(matches!(
            compile(&document, &CompileOptions::default()).unwrap_err(),
            CompileError::WrongType(_)
        ));
    }

    #[test]
    fn test_unowned_entity_checked_against_type_union() {
        let document = parse(
            r#"
            application { config { baseName shop } entities A }
            entity A entity B { created Date }
            "#,
        );
        // Date only exists for Cassandra, which is enough for an entity no
        // application owns.
        assert!(compile(&document, &CompileOptions::default()).is_ok());
    }

    #[test]
    fn test_generator_version_lands_in_application_config() {
        let document = parse("application { config { baseName shop } }");
        let options = CompileOptions {
            generator_version: Some("6.0.1".to_string()),
            ..CompileOptions::default()
        };
        let object = compile(&document, &options).unwrap();
        let version = object.applications[0].config.get("jhipsterVersion");
        assert_eq!(version.and_then(ConfigValue::as_str), Some("6.0.1"));
    }

    #[test]
    fn test_deployment_type_is_validated() {
        let document = parse("deployment { deploymentType docker-compose }");
        let object = compile(&document, &sql()).unwrap();
        assert_eq!(object.deployments[0].deployment_type, "docker-compose");
        let document = parse("deployment { deploymentType rancher }");
        assert!(matches!(
            compile(&document, &sql()).unwrap_err(),
            CompileError::InvalidObject(_)
        ));
    }
}
