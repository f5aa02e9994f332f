//! Parser and compiler for the JHipster Domain Language.
//!
//! JDL text is parsed into a [`Document`], compiled into a validated
//! [`JdlObject`], and normalized into the per-entity configuration records
//! the generator layer consumes. The [`json`] module walks the other way
//! and reconstructs a [`JdlObject`] from existing configuration.

pub mod changelog;
pub mod compiler;
pub mod document;
pub mod error;
pub mod field_types;
pub mod grammar;
pub mod json;
pub mod json_entity;
pub mod lexer;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod reserved;

use indexmap::IndexMap;

pub use compiler::{CompileOptions, compile};
pub use document::Document;
pub use error::{CompileError, JdlError};
pub use json_entity::JsonEntity;
pub use model::JdlObject;
pub use normalizer::{NormalizeOptions, normalize};
pub use parser::ParseError;

/// Parse JDL source into its document form.
pub fn parse(source: &str) -> Result<Document, ParseError> {
    let cst = parser::Parser::new(source)?.parse()?;
    Ok(Document::from_cst(&cst))
}

/// Compile JDL source all the way down to per-entity configuration records.
pub fn generate_entities(
    source: &str,
    options: &CompileOptions,
) -> Result<IndexMap<String, JsonEntity>, JdlError> {
    let document = parse(source)?;
    let object = compile(&document, options)?;
    let database_type = options
        .database_type
        .or_else(|| {
            object
                .applications
                .first()
                .map(|application| application.database_type)
        })
        .ok_or(CompileError::MissingInput("database type"))?;
    let application_type = options.application_type.or_else(|| {
        object
            .applications
            .first()
            .map(|application| application.application_type)
    });
    let normalize_options = NormalizeOptions {
        database_type,
        application_type,
        base_changelog_date: None,
    };
    Ok(normalize(&object, &normalize_options)?)
}
