//! Semantic errors raised while compiling a parsed document into a domain
//! model, or while normalizing one. Structural (syntax) errors live next to
//! the lexer and parser.

use thiserror::Error;

use crate::parser::ParseError;

/// Any failure of the text-to-configuration pipeline, syntactic or semantic.
#[derive(Debug, Error)]
pub enum JdlError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// Every compile-stage failure aborts the whole compilation of its input;
/// nothing here is recoverable or retried.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A required input was absent (document, database type, base name).
    #[error("Missing input: {0}")]
    MissingInput(&'static str),

    /// A reserved keyword was used as an entity, enum, field or table name,
    /// or "User" was declared where the built-in entity is in force.
    #[error("Illegal name: {0}")]
    IllegalName(String),

    /// A field's type is neither a declared enum nor valid for the active
    /// database type.
    #[error("Wrong type: {0}")]
    WrongType(String),

    /// A validation rule is not applicable to the field's resolved type.
    #[error("Wrong validation: {0}")]
    WrongValidation(String),

    /// A relationship originates from the built-in User entity, or
    /// relationships exist where the backend cannot support them.
    #[error("Illegal association: {0}")]
    IllegalAssociation(String),

    /// A relationship references an entity the document never declares.
    #[error("Undeclared entity: {0}")]
    UndeclaredEntity(String),

    /// A semantically invalid option combination.
    #[error("Illegal option: {0}")]
    IllegalOption(String),

    /// An option's internal shape failed self-validation (unknown option
    /// name, unknown value, empty target list).
    #[error("Invalid object: {0}")]
    InvalidObject(String),
}
