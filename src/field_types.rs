//! Field types per database backend and which validations apply to which
//! type. These tables drive `WrongType` and `WrongValidation` rejection in
//! the compiler.

use crate::model::DatabaseType;

/// Types shared by the SQL family, MongoDB, Couchbase and Neo4j.
pub const COMMON_TYPES: &[&str] = &[
    "String",
    "Integer",
    "Long",
    "BigDecimal",
    "Float",
    "Double",
    "Boolean",
    "LocalDate",
    "ZonedDateTime",
    "Instant",
    "Duration",
    "UUID",
    "Blob",
    "AnyBlob",
    "ImageBlob",
    "TextBlob",
];

/// Cassandra swaps the local date and blob types for a plain `Date`.
pub const CASSANDRA_TYPES: &[&str] = &[
    "String",
    "Integer",
    "Long",
    "BigDecimal",
    "Float",
    "Double",
    "Boolean",
    "Date",
    "UUID",
    "Instant",
];

pub const REQUIRED: &str = "required";
pub const UNIQUE: &str = "unique";
pub const MIN: &str = "min";
pub const MAX: &str = "max";
pub const MINLENGTH: &str = "minlength";
pub const MAXLENGTH: &str = "maxlength";
pub const MINBYTES: &str = "minbytes";
pub const MAXBYTES: &str = "maxbytes";
pub const PATTERN: &str = "pattern";

/// Validations applicable to fields typed with a declared enum.
pub const ENUM_VALIDATIONS: &[&str] = &[REQUIRED, UNIQUE];

pub fn supported_types(database_type: DatabaseType) -> &'static [&'static str] {
    match database_type {
        DatabaseType::Cassandra => CASSANDRA_TYPES,
        _ => COMMON_TYPES,
    }
}

pub fn is_type(database_type: DatabaseType, name: &str) -> bool {
    supported_types(database_type).contains(&name)
}

/// Whether the type is valid for at least one backend.
pub fn is_any_type(name: &str) -> bool {
    DatabaseType::ALL.iter().any(|db| is_type(*db, name))
}

pub fn supported_validations(type_name: &str) -> &'static [&'static str] {
    match type_name {
        "String" => &[REQUIRED, UNIQUE, MINLENGTH, MAXLENGTH, PATTERN],
        "Integer" | "Long" | "BigDecimal" | "Float" | "Double" => {
            &[REQUIRED, UNIQUE, MIN, MAX]
        }
        "Blob" | "AnyBlob" | "ImageBlob" | "TextBlob" => {
            &[REQUIRED, UNIQUE, MINBYTES, MAXBYTES]
        }
        "Boolean" | "LocalDate" | "ZonedDateTime" | "Instant" | "Duration" | "Date" | "UUID" => {
            &[REQUIRED, UNIQUE]
        }
        _ => &[],
    }
}

pub fn has_validation(type_name: &str, validation: &str) -> bool {
    supported_validations(type_name).contains(&validation)
}

pub fn is_blob(type_name: &str) -> bool {
    blob_content(type_name).is_some()
}

/// The `fieldTypeBlobContent` discriminator used when a blob type is
/// flattened to `byte[]`.
pub fn blob_content(type_name: &str) -> Option<&'static str> {
    match type_name {
        "ImageBlob" => Some("image"),
        "Blob" | "AnyBlob" => Some("any"),
        "TextBlob" => Some("text"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_types_per_backend() {
        assert!(is_type(DatabaseType::Sql, "LocalDate"));
        assert!(is_type(DatabaseType::Mongodb, "TextBlob"));
        assert!(!is_type(DatabaseType::Cassandra, "LocalDate"));
        assert!(!is_type(DatabaseType::Cassandra, "Blob"));
        assert!(is_type(DatabaseType::Cassandra, "Date"));
        assert!(!is_type(DatabaseType::Sql, "Date"));
        assert!(!is_type(DatabaseType::Sql, "varchar"));
    }

    #[test]
    fn test_union_membership() {
        assert!(is_any_type("Date"));
        assert!(is_any_type("ImageBlob"));
        assert!(!is_any_type("Timestamp"));
    }

    #[test]
    fn test_string_validations() {
        for v in [REQUIRED, UNIQUE, MINLENGTH, MAXLENGTH, PATTERN] {
            assert!(has_validation("String", v));
        }
        assert!(!has_validation("String", MIN));
        assert!(!has_validation("String", MINBYTES));
    }

    #[test]
    fn test_numeric_validations() {
        for t in ["Integer", "Long", "BigDecimal", "Float", "Double"] {
            assert!(has_validation(t, MIN));
            assert!(has_validation(t, MAX));
            assert!(!has_validation(t, MINLENGTH));
            assert!(!has_validation(t, PATTERN));
        }
    }

    #[test]
    fn test_blob_validations_and_content() {
        for t in ["Blob", "AnyBlob", "ImageBlob", "TextBlob"] {
            assert!(has_validation(t, MINBYTES));
            assert!(has_validation(t, MAXBYTES));
            assert!(is_blob(t));
        }
        assert_eq!(blob_content("ImageBlob"), Some("image"));
        assert_eq!(blob_content("AnyBlob"), Some("any"));
        assert_eq!(blob_content("Blob"), Some("any"));
        assert_eq!(blob_content("TextBlob"), Some("text"));
        assert_eq!(blob_content("String"), None);
    }

    #[test]
    fn test_boolean_supports_only_required_unique() {
        assert_eq!(supported_validations("Boolean"), &[REQUIRED, UNIQUE]);
        assert!(!has_validation("Boolean", MIN));
    }

    #[test]
    fn test_unknown_type_supports_nothing() {
        assert!(supported_validations("Widget").is_empty());
    }
}
