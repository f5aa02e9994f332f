//! Reserved word lists per target backend and framework. All lookups are
//! case-insensitive; the lists store the uppercase form.
//!
//! Class names are checked against every frontend and backend language at
//! once since generated code names the entity in all of them. Table names
//! are only checked against the active database.

use crate::model::DatabaseType;

/// Page routes and generator concepts claimed by the toolchain itself.
const JHIPSTER: &[&str] = &[
    "ACCOUNT",
    "ADMIN",
    "APPLICATION",
    "CONFIG",
    "CONFIGURATION",
    "DEPLOYMENT",
    "DOCS",
    "ENTITY",
    "ENUM",
    "GATEWAY",
    "HEALTH",
    "LOGIN",
    "LOGOUT",
    "LOGS",
    "METRICS",
    "MICROSERVICE",
    "PASSWORD",
    "REGISTER",
    "RELATIONSHIP",
    "SESSIONS",
    "SETTINGS",
];

const JAVA: &[&str] = &[
    "ABSTRACT",
    "ASSERT",
    "BOOLEAN",
    "BREAK",
    "BYTE",
    "CASE",
    "CATCH",
    "CHAR",
    "CLASS",
    "CONST",
    "CONTINUE",
    "DEFAULT",
    "DO",
    "DOUBLE",
    "ELSE",
    "ENUM",
    "EXTENDS",
    "FALSE",
    "FINAL",
    "FINALLY",
    "FLOAT",
    "FOR",
    "GOTO",
    "IF",
    "IMPLEMENTS",
    "IMPORT",
    "INSTANCEOF",
    "INT",
    "INTERFACE",
    "LONG",
    "NATIVE",
    "NEW",
    "NULL",
    "PACKAGE",
    "PRIVATE",
    "PROTECTED",
    "PUBLIC",
    "RETURN",
    "SHORT",
    "STATIC",
    "STRICTFP",
    "SUPER",
    "SWITCH",
    "SYNCHRONIZED",
    "THIS",
    "THROW",
    "THROWS",
    "TRANSIENT",
    "TRUE",
    "TRY",
    "VOID",
    "VOLATILE",
    "WHILE",
];

const ANGULAR: &[&str] = &[
    "CONSTRUCTOR",
    "DELETE",
    "DOCUMENT",
    "EVAL",
    "LENGTH",
    "NAME",
    "PROTOTYPE",
    "UNDEFINED",
    "VALUEOF",
    "WINDOW",
];

const TYPESCRIPT: &[&str] = &[
    "ANY",
    "AS",
    "BOOLEAN",
    "BREAK",
    "CASE",
    "CATCH",
    "CLASS",
    "CONST",
    "CONTINUE",
    "DEBUGGER",
    "DECLARE",
    "DEFAULT",
    "DELETE",
    "DO",
    "ELSE",
    "ENUM",
    "EXPORT",
    "EXTENDS",
    "FALSE",
    "FINALLY",
    "FOR",
    "FROM",
    "FUNCTION",
    "GET",
    "IF",
    "IMPLEMENTS",
    "IMPORT",
    "IN",
    "INSTANCEOF",
    "INTERFACE",
    "LET",
    "MODULE",
    "NEW",
    "NULL",
    "NUMBER",
    "OF",
    "PACKAGE",
    "PRIVATE",
    "PROTECTED",
    "PUBLIC",
    "REQUIRE",
    "RETURN",
    "SET",
    "STATIC",
    "STRING",
    "SUPER",
    "SWITCH",
    "SYMBOL",
    "THIS",
    "THROW",
    "TRUE",
    "TRY",
    "TYPE",
    "TYPEOF",
    "VAR",
    "VOID",
    "WHILE",
    "WITH",
    "YIELD",
];

const MYSQL: &[&str] = &[
    "ADD",
    "ALL",
    "ALTER",
    "ANALYZE",
    "AND",
    "AS",
    "ASC",
    "BEFORE",
    "BETWEEN",
    "BIGINT",
    "BINARY",
    "BLOB",
    "BOTH",
    "BY",
    "CALL",
    "CASCADE",
    "CASE",
    "CHANGE",
    "CHAR",
    "CHECK",
    "COLLATE",
    "COLUMN",
    "CONDITION",
    "CONSTRAINT",
    "CONTINUE",
    "CONVERT",
    "CREATE",
    "CROSS",
    "CURSOR",
    "DATABASE",
    "DECIMAL",
    "DECLARE",
    "DEFAULT",
    "DELETE",
    "DESC",
    "DESCRIBE",
    "DISTINCT",
    "DIV",
    "DOUBLE",
    "DROP",
    "EACH",
    "ELSE",
    "EXISTS",
    "EXPLAIN",
    "FALSE",
    "FETCH",
    "FLOAT",
    "FOR",
    "FORCE",
    "FOREIGN",
    "FROM",
    "GRANT",
    "GROUP",
    "HAVING",
    "IF",
    "IGNORE",
    "IN",
    "INDEX",
    "INNER",
    "INSERT",
    "INT",
    "INTEGER",
    "INTERVAL",
    "INTO",
    "IS",
    "JOIN",
    "KEY",
    "KEYS",
    "KILL",
    "LEADING",
    "LEFT",
    "LIKE",
    "LIMIT",
    "LOCK",
    "LONG",
    "MATCH",
    "NOT",
    "NULL",
    "ON",
    "OPTION",
    "OR",
    "ORDER",
    "OUT",
    "OUTER",
    "PRIMARY",
    "PROCEDURE",
    "RANGE",
    "READ",
    "REFERENCES",
    "REGEXP",
    "RENAME",
    "REPEAT",
    "REPLACE",
    "REQUIRE",
    "RESTRICT",
    "RETURN",
    "REVOKE",
    "RIGHT",
    "SCHEMA",
    "SELECT",
    "SET",
    "SHOW",
    "TABLE",
    "THEN",
    "TO",
    "TRIGGER",
    "TRUE",
    "UNION",
    "UNIQUE",
    "UPDATE",
    "USAGE",
    "USE",
    "USING",
    "VALUES",
    "VARCHAR",
    "WHEN",
    "WHERE",
    "WHILE",
    "WITH",
    "WRITE",
];

const POSTGRESQL: &[&str] = &[
    "ALL",
    "ANALYSE",
    "ANALYZE",
    "AND",
    "ANY",
    "ARRAY",
    "AS",
    "ASC",
    "ASYMMETRIC",
    "AUTHORIZATION",
    "BINARY",
    "BOTH",
    "CASE",
    "CAST",
    "CHECK",
    "COLLATE",
    "COLUMN",
    "CONSTRAINT",
    "CREATE",
    "CROSS",
    "CURRENT_DATE",
    "CURRENT_ROLE",
    "CURRENT_TIME",
    "CURRENT_TIMESTAMP",
    "CURRENT_USER",
    "DEFAULT",
    "DEFERRABLE",
    "DESC",
    "DISTINCT",
    "DO",
    "ELSE",
    "END",
    "EXCEPT",
    "FALSE",
    "FOR",
    "FOREIGN",
    "FREEZE",
    "FROM",
    "FULL",
    "GRANT",
    "GROUP",
    "HAVING",
    "ILIKE",
    "IN",
    "INITIALLY",
    "INNER",
    "INTERSECT",
    "INTO",
    "IS",
    "ISNULL",
    "JOIN",
    "LEADING",
    "LEFT",
    "LIKE",
    "LIMIT",
    "LOCALTIME",
    "LOCALTIMESTAMP",
    "NATURAL",
    "NOT",
    "NOTNULL",
    "NULL",
    "OFFSET",
    "ON",
    "ONLY",
    "OR",
    "ORDER",
    "OUTER",
    "OVERLAPS",
    "PLACING",
    "PRIMARY",
    "REFERENCES",
    "RETURNING",
    "RIGHT",
    "SELECT",
    "SESSION_USER",
    "SIMILAR",
    "SOME",
    "SYMMETRIC",
    "TABLE",
    "THEN",
    "TO",
    "TRAILING",
    "TRUE",
    "UNION",
    "UNIQUE",
    "USER",
    "USING",
    "VERBOSE",
    "WHEN",
    "WHERE",
    "WITH",
];

const ORACLE: &[&str] = &[
    "ACCESS",
    "ADD",
    "ALL",
    "ALTER",
    "AND",
    "ANY",
    "AS",
    "ASC",
    "AUDIT",
    "BETWEEN",
    "BY",
    "CHAR",
    "CHECK",
    "CLUSTER",
    "COLUMN",
    "COMMENT",
    "COMPRESS",
    "CONNECT",
    "CREATE",
    "CURRENT",
    "DATE",
    "DECIMAL",
    "DEFAULT",
    "DELETE",
    "DESC",
    "DISTINCT",
    "DROP",
    "ELSE",
    "EXCLUSIVE",
    "EXISTS",
    "FILE",
    "FLOAT",
    "FOR",
    "FROM",
    "GRANT",
    "GROUP",
    "HAVING",
    "IDENTIFIED",
    "IMMEDIATE",
    "IN",
    "INCREMENT",
    "INDEX",
    "INITIAL",
    "INSERT",
    "INTEGER",
    "INTERSECT",
    "INTO",
    "IS",
    "LEVEL",
    "LIKE",
    "LOCK",
    "LONG",
    "MINUS",
    "MODE",
    "MODIFY",
    "NOT",
    "NOWAIT",
    "NULL",
    "NUMBER",
    "OF",
    "OFFLINE",
    "ON",
    "ONLINE",
    "OPTION",
    "OR",
    "ORDER",
    "PRIOR",
    "PUBLIC",
    "RAW",
    "RENAME",
    "RESOURCE",
    "REVOKE",
    "ROW",
    "ROWID",
    "ROWNUM",
    "ROWS",
    "SELECT",
    "SESSION",
    "SET",
    "SHARE",
    "SIZE",
    "SMALLINT",
    "START",
    "SYNONYM",
    "SYSDATE",
    "TABLE",
    "THEN",
    "TO",
    "TRIGGER",
    "UID",
    "UNION",
    "UNIQUE",
    "UPDATE",
    "USER",
    "VALIDATE",
    "VALUES",
    "VARCHAR",
    "VARCHAR2",
    "VIEW",
    "WHENEVER",
    "WHERE",
    "WITH",
];

const MSSQL: &[&str] = &[
    "ADD",
    "ALL",
    "ALTER",
    "AND",
    "ANY",
    "AS",
    "ASC",
    "AUTHORIZATION",
    "BACKUP",
    "BEGIN",
    "BETWEEN",
    "BREAK",
    "BROWSE",
    "BULK",
    "BY",
    "CASCADE",
    "CASE",
    "CHECK",
    "CHECKPOINT",
    "CLOSE",
    "CLUSTERED",
    "COLUMN",
    "COMMIT",
    "CONSTRAINT",
    "CONTAINS",
    "CONTINUE",
    "CONVERT",
    "CREATE",
    "CROSS",
    "CURRENT",
    "CURSOR",
    "DATABASE",
    "DECLARE",
    "DEFAULT",
    "DELETE",
    "DENY",
    "DESC",
    "DISTINCT",
    "DOUBLE",
    "DROP",
    "ELSE",
    "END",
    "ESCAPE",
    "EXCEPT",
    "EXEC",
    "EXECUTE",
    "EXISTS",
    "EXIT",
    "EXTERNAL",
    "FETCH",
    "FILE",
    "FOR",
    "FOREIGN",
    "FROM",
    "FULL",
    "FUNCTION",
    "GOTO",
    "GRANT",
    "GROUP",
    "HAVING",
    "IDENTITY",
    "IF",
    "IN",
    "INDEX",
    "INNER",
    "INSERT",
    "INTERSECT",
    "INTO",
    "IS",
    "JOIN",
    "KEY",
    "KILL",
    "LEFT",
    "LIKE",
    "MERGE",
    "NOT",
    "NULL",
    "OF",
    "OFF",
    "ON",
    "OPEN",
    "OPTION",
    "OR",
    "ORDER",
    "OUTER",
    "OVER",
    "PERCENT",
    "PIVOT",
    "PLAN",
    "PRIMARY",
    "PROC",
    "PROCEDURE",
    "PUBLIC",
    "READ",
    "REPLICATION",
    "RESTORE",
    "RESTRICT",
    "RETURN",
    "REVOKE",
    "RIGHT",
    "ROLLBACK",
    "RULE",
    "SAVE",
    "SCHEMA",
    "SELECT",
    "SET",
    "SHUTDOWN",
    "SOME",
    "TABLE",
    "THEN",
    "TO",
    "TOP",
    "TRAN",
    "TRANSACTION",
    "TRIGGER",
    "TRUNCATE",
    "UNION",
    "UNIQUE",
    "UPDATE",
    "USE",
    "USER",
    "VALUES",
    "VIEW",
    "WAITFOR",
    "WHEN",
    "WHERE",
    "WHILE",
    "WITH",
];

/// Database names MongoDB claims for itself.
const MONGODB: &[&str] = &["ADMIN", "CONFIG", "LOCAL"];

const CASSANDRA: &[&str] = &[
    "ADD",
    "AGGREGATE",
    "ALL",
    "ALLOW",
    "ALTER",
    "AND",
    "ANY",
    "APPLY",
    "AS",
    "ASC",
    "AUTHORIZE",
    "BATCH",
    "BEGIN",
    "BY",
    "COLUMNFAMILY",
    "CREATE",
    "DELETE",
    "DESC",
    "DROP",
    "ENTRIES",
    "FROM",
    "FULL",
    "GRANT",
    "IF",
    "IN",
    "INDEX",
    "INFINITY",
    "INSERT",
    "INTO",
    "IS",
    "KEYSPACE",
    "LIMIT",
    "MATERIALIZED",
    "MODIFY",
    "NAN",
    "NORECURSIVE",
    "NOT",
    "NULL",
    "OF",
    "ON",
    "OR",
    "ORDER",
    "PARTITION",
    "PASSWORD",
    "PER",
    "PRIMARY",
    "RENAME",
    "REVOKE",
    "SCHEMA",
    "SELECT",
    "SET",
    "TABLE",
    "TIME",
    "TO",
    "TOKEN",
    "TRUNCATE",
    "UNLOGGED",
    "UPDATE",
    "USE",
    "USING",
    "VIEW",
    "WHERE",
    "WITH",
];

fn contains(list: &[&str], name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    list.contains(&upper.as_str())
}

pub fn is_reserved_class_name(name: &str) -> bool {
    contains(JHIPSTER, name)
        || contains(JAVA, name)
        || contains(ANGULAR, name)
        || contains(TYPESCRIPT, name)
}

pub fn is_reserved_field_name(name: &str) -> bool {
    contains(JAVA, name) || contains(ANGULAR, name) || contains(TYPESCRIPT, name)
}

pub fn is_reserved_table_name(name: &str, database_type: DatabaseType) -> bool {
    match database_type {
        // `sql` covers every dialect the generated project might target.
        DatabaseType::Sql => {
            contains(MYSQL, name)
                || contains(POSTGRESQL, name)
                || contains(ORACLE, name)
                || contains(MSSQL, name)
        }
        DatabaseType::Mongodb => contains(MONGODB, name),
        DatabaseType::Cassandra => contains(CASSANDRA, name),
        DatabaseType::Couchbase | DatabaseType::Neo4j | DatabaseType::No => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jhipster_route_names_are_reserved_class_names() {
        assert!(is_reserved_class_name("Account"));
        assert!(is_reserved_class_name("ACCOUNT"));
        assert!(is_reserved_class_name("settings"));
        assert!(!is_reserved_class_name("Customer"));
    }

    #[test]
    fn test_java_keywords_are_reserved_everywhere() {
        assert!(is_reserved_class_name("class"));
        assert!(is_reserved_field_name("private"));
        assert!(is_reserved_field_name("PACKAGE"));
        assert!(!is_reserved_field_name("firstName"));
    }

    #[test]
    fn test_jhipster_names_are_not_reserved_fields() {
        // Only class names collide with page routes.
        assert!(!is_reserved_field_name("account"));
        assert!(is_reserved_class_name("account"));
    }

    #[test]
    fn test_table_names_depend_on_database() {
        assert!(is_reserved_table_name("user", DatabaseType::Sql));
        assert!(is_reserved_table_name("ANALYZE", DatabaseType::Sql));
        assert!(!is_reserved_table_name("user", DatabaseType::Mongodb));
        assert!(is_reserved_table_name("local", DatabaseType::Mongodb));
        assert!(is_reserved_table_name("keyspace", DatabaseType::Cassandra));
        assert!(!is_reserved_table_name("keyspace", DatabaseType::Sql));
        assert!(!is_reserved_table_name("user", DatabaseType::Couchbase));
    }
}
