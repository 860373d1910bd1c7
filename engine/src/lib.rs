//! # tenantload - per-tenant CSV loading and templated queries
//!
//! Each tenant owns a private SQLite file. On first use the file is built
//! from the tenant's CSV (one TEXT column per header entry); afterwards a
//! single SQL template is rendered with the tenant's variables and run
//! against it.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ tenants.json │────▶│ Initializer  │────▶│   Template   │────▶│    Query     │
//! │  + CSV files │     │ (CSV→SQLite) │     │  (per vars)  │     │ (print rows) │
//! └──────────────┘     └──────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Runner configuration
//! - [`models`] - Tenant descriptors
//! - [`parser`] - CSV reading
//! - [`validation`] - SQL identifier checks
//! - [`template`] - Query template rendering
//! - [`db`] - Database initialization and query execution
//! - [`runner`] - Pipeline orchestration
//! - [`report`] - Progress output

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Inputs
pub mod parser;
pub mod template;
pub mod validation;

// Storage
pub mod db;

// Orchestration
pub mod report;
pub mod runner;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{RunnerConfig, DEFAULT_CONFIG_PATH, DEFAULT_TEMPLATE_PATH};

pub use error::{
    ConfigError, CsvError, IdentifierError, InitError, QueryError, RenderError, RunError,
    RunResult, TemplateError,
};

pub use models::{select_tenants, TenantConfig, TenantDescriptor, TABLE_VAR};

pub use parser::{read_csv, read_csv_file, CsvTable};

pub use template::QueryTemplate;

pub use validation::{is_valid_identifier, IdentifierPolicy};

pub use db::{ensure_ready, format_row, rebuild, run_query, InitOutcome, QueryOutput};

pub use report::{LogEntry, LogLevel, Reporter};

pub use runner::{RunSummary, Runner};
