//! Runner configuration.
//!
//! Source locations are passed to the runner explicitly instead of being
//! read from fixed paths. The CLI fills this from flags and environment
//! variables (`TENANTLOAD_CONFIG`, `TENANTLOAD_TEMPLATE`,
//! `TENANTLOAD_ALLOW_RAW_IDENTIFIERS`), with `.env` support.

use std::path::{Path, PathBuf};

use crate::validation::IdentifierPolicy;

/// Default tenant configuration document.
pub const DEFAULT_CONFIG_PATH: &str = "config/tenants.json";

/// Default query template.
pub const DEFAULT_TEMPLATE_PATH: &str = "templates/transformation.sql.j2";

/// Where to read inputs from and how to treat identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    /// Tenant configuration document (JSON)
    pub tenants_path: PathBuf,
    /// Query template
    pub template_path: PathBuf,
    /// Table/column name handling
    pub identifier_policy: IdentifierPolicy,
}

impl RunnerConfig {
    pub fn new(tenants_path: impl AsRef<Path>, template_path: impl AsRef<Path>) -> Self {
        Self {
            tenants_path: tenants_path.as_ref().to_path_buf(),
            template_path: template_path.as_ref().to_path_buf(),
            identifier_policy: IdentifierPolicy::default(),
        }
    }

    pub fn with_identifier_policy(mut self, policy: IdentifierPolicy) -> Self {
        self.identifier_policy = policy;
        self
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_PATH, DEFAULT_TEMPLATE_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunnerConfig::default();
        assert_eq!(config.tenants_path, PathBuf::from("config/tenants.json"));
        assert_eq!(
            config.template_path,
            PathBuf::from("templates/transformation.sql.j2")
        );
        assert_eq!(config.identifier_policy, IdentifierPolicy::Strict);
    }

    #[test]
    fn test_builder() {
        let config = RunnerConfig::new("a.json", "b.sql").with_identifier_policy(IdentifierPolicy::Raw);
        assert_eq!(config.tenants_path, PathBuf::from("a.json"));
        assert_eq!(config.identifier_policy, IdentifierPolicy::Raw);
    }
}
