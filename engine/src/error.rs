//! Error types for the tenant load-and-transform pipeline.
//!
//! - [`ConfigError`] - Tenant configuration loading and validation
//! - [`TemplateError`] - Query template loading and parsing
//! - [`RenderError`] - Per-tenant template rendering
//! - [`CsvError`] - CSV input reading
//! - [`IdentifierError`] - SQL identifier checks
//! - [`InitError`] - Tenant database initialization
//! - [`QueryError`] - Rendered query execution
//! - [`RunError`] - Top-level orchestration errors
//!
//! Lower-level errors convert into [`RunError`] through `From`, so `?`
//! works across module boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading the tenant configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("Cannot read tenant configuration '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration document is not valid JSON or lacks required fields.
    #[error("Malformed tenant configuration: {0}")]
    Parse(#[source] serde_json::Error),

    /// Same as [`ConfigError::Parse`], for a document read from `path`.
    #[error("Malformed tenant configuration '{path}': {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A tenant's `vars` has no string `table` entry.
    #[error("Tenant '{0}' has no string 'table' entry in vars")]
    MissingTable(String),

    /// Two tenants share an id.
    #[error("Duplicate tenant id: {0}")]
    DuplicateTenant(String),

    /// Two tenants point at the same database file.
    #[error("Tenants '{first}' and '{second}' share database file {path}")]
    SharedDatabase {
        first: String,
        second: String,
        path: PathBuf,
    },

    /// `--tenant` named an id that is not configured.
    #[error("Unknown tenant: {0}")]
    UnknownTenant(String),
}

// =============================================================================
// Template Errors
// =============================================================================

/// Errors while loading or parsing the query template.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template file could not be read.
    #[error("Cannot read query template '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A `{{` or `{#` tag was never closed.
    #[error("Unterminated '{tag}' at byte {offset}")]
    Unterminated { tag: &'static str, offset: usize },

    /// `{% ... %}` statement blocks are not supported.
    #[error("Unsupported block tag at byte {0}")]
    UnsupportedBlock(usize),

    /// Placeholder content is not a plain variable name.
    #[error("Invalid placeholder '{{{{ {name} }}}}' at byte {offset}")]
    InvalidPlaceholder { name: String, offset: usize },
}

// =============================================================================
// Rendering Errors
// =============================================================================

/// Errors while rendering a template with a tenant's variables.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template references a variable absent from `vars`.
    #[error("Undefined template variable: {0}")]
    Undefined(String),

    /// Variable is an array or object.
    #[error("Template variable '{0}' is not a scalar value")]
    NonScalar(String),
}

// =============================================================================
// CSV Errors
// =============================================================================

/// Errors while reading a tenant's CSV input.
#[derive(Debug, Error)]
pub enum CsvError {
    /// File could not be opened or read.
    #[error("Cannot read CSV '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No header row.
    #[error("CSV file '{0}' is empty")]
    EmptyFile(PathBuf),

    /// Malformed record (wrong field count, invalid UTF-8, ...).
    #[error("Invalid CSV '{path}' at line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: u64,
        message: String,
    },
}

// =============================================================================
// Identifier Errors
// =============================================================================

/// Rejected SQL identifiers.
#[derive(Debug, Error)]
pub enum IdentifierError {
    /// Table name fails the allow-list pattern.
    #[error("Invalid table name '{0}'")]
    InvalidTable(String),

    /// Column name fails the allow-list pattern.
    #[error("Invalid column name '{0}'")]
    InvalidColumn(String),

    /// Header repeats a column name.
    #[error("Duplicate column name '{0}'")]
    DuplicateColumn(String),
}

// =============================================================================
// Database Errors
// =============================================================================

/// Errors during tenant database initialization.
#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Csv(#[from] CsvError),

    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    /// Parent directory could not be created.
    #[error("Cannot create directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Database open/write failure.
    #[error("Database error on '{path}': {source}")]
    Sqlite {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Progress output failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Errors while executing a rendered query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Database could not be opened or closed.
    #[error("Cannot open database '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Statement failed to prepare, execute, or fetch.
    #[error("Query failed: {0}")]
    Execute(#[from] rusqlite::Error),

    /// Rendered query holds more than one statement.
    #[error("Rendered query contains more than one statement")]
    MultipleStatements,
}

// =============================================================================
// Run Errors (top-level)
// =============================================================================

/// Top-level error returned by the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// Rendering failed for a tenant.
    #[error("Render error for tenant '{tenant}': {source}")]
    Render {
        tenant: String,
        #[source]
        source: RenderError,
    },

    /// Initialization failed for a tenant.
    #[error("Initialization failed for tenant '{tenant}': {source}")]
    Init {
        tenant: String,
        #[source]
        source: InitError,
    },

    /// Query execution failed for a tenant.
    #[error("Query failed for tenant '{tenant}': {source}")]
    Query {
        tenant: String,
        #[source]
        source: QueryError,
    },

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for database initialization.
pub type InitResult<T> = Result<T, InitError>;

/// Result type for query execution.
pub type QueryResult<T> = Result<T, QueryError>;

/// Result type for runner operations.
pub type RunResult<T> = Result<T, RunError>;
