//! Tenant configuration models.
//!
//! The configuration document is JSON:
//!
//! ```json
//! {
//!   "tenants": [
//!     {
//!       "id": "acme",
//!       "db_path": "db/acme.db",
//!       "input_csv": "data/acme/orders.csv",
//!       "vars": { "table": "orders", "min_amount": 10 }
//!     }
//!   ]
//! }
//! ```

use serde::Deserialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};

/// Name of the `vars` entry holding the destination table.
pub const TABLE_VAR: &str = "table";

/// One tenant: its database file, CSV source, and template variables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TenantDescriptor {
    /// Unique, human-readable identifier
    pub id: String,
    /// Dedicated database file
    pub db_path: PathBuf,
    /// Source CSV (first row is the header)
    pub input_csv: PathBuf,
    /// Template variables; always contains a string `table`
    pub vars: HashMap<String, Value>,
}

impl TenantDescriptor {
    /// Destination table name from `vars.table`.
    ///
    /// Descriptors coming out of [`TenantConfig::load`] are guaranteed to
    /// have one.
    pub fn table(&self) -> ConfigResult<&str> {
        self.vars
            .get(TABLE_VAR)
            .and_then(Value::as_str)
            .ok_or_else(|| ConfigError::MissingTable(self.id.clone()))
    }
}

/// The whole configuration document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TenantConfig {
    pub tenants: Vec<TenantDescriptor>,
}

impl TenantConfig {
    /// Read, parse and validate a configuration file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|e| match e {
            ConfigError::Parse(source) => ConfigError::Malformed {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parse and validate a configuration document.
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: TenantConfig = serde_json::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants serde cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        let mut ids = HashSet::new();
        let mut db_paths: HashMap<&Path, &str> = HashMap::new();

        for tenant in &self.tenants {
            tenant.table()?;

            if !ids.insert(tenant.id.as_str()) {
                return Err(ConfigError::DuplicateTenant(tenant.id.clone()));
            }

            if let Some(first) = db_paths.insert(tenant.db_path.as_path(), &tenant.id) {
                return Err(ConfigError::SharedDatabase {
                    first: first.to_string(),
                    second: tenant.id.clone(),
                    path: tenant.db_path.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Tenants to process: all of them, or only `id` when given.
pub fn select_tenants<'a>(
    tenants: &'a [TenantDescriptor],
    id: Option<&str>,
) -> ConfigResult<Vec<&'a TenantDescriptor>> {
    match id {
        None => Ok(tenants.iter().collect()),
        Some(id) => tenants
            .iter()
            .find(|t| t.id == id)
            .map(|t| vec![t])
            .ok_or_else(|| ConfigError::UnknownTenant(id.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TWO_TENANTS: &str = r#"{
        "tenants": [
            {"id": "t1", "db_path": "db/t1.db", "input_csv": "t1.csv", "vars": {"table": "orders"}},
            {"id": "t2", "db_path": "db/t2.db", "input_csv": "t2.csv", "vars": {"table": "sales", "region": "eu"}}
        ]
    }"#;

    #[test]
    fn test_parse_tenants_in_order() {
        let config = TenantConfig::from_json(TWO_TENANTS).unwrap();
        let ids: Vec<_> = config.tenants.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2"]);
        assert_eq!(config.tenants[1].table().unwrap(), "sales");
        assert_eq!(config.tenants[1].vars["region"], "eu");
    }

    #[test]
    fn test_missing_tenants_key_is_malformed() {
        let err = TenantConfig::from_json(r#"{"clients": []}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("Malformed tenant configuration: "));
        assert!(!err.to_string().contains("''"));
    }

    #[test]
    fn test_missing_required_field_is_malformed() {
        let json = r#"{"tenants": [{"id": "t1", "db_path": "a.db", "vars": {"table": "x"}}]}"#;
        let err = TenantConfig::from_json(json).unwrap_err();
        assert!(err.to_string().contains("input_csv"));
    }

    #[test]
    fn test_missing_table_var() {
        let json = r#"{"tenants": [{"id": "t1", "db_path": "a.db", "input_csv": "a.csv", "vars": {}}]}"#;
        let err = TenantConfig::from_json(json).unwrap_err();
        assert!(matches!(err, ConfigError::MissingTable(id) if id == "t1"));
    }

    #[test]
    fn test_non_string_table_var() {
        let json = r#"{"tenants": [{"id": "t1", "db_path": "a.db", "input_csv": "a.csv", "vars": {"table": 3}}]}"#;
        assert!(matches!(
            TenantConfig::from_json(json),
            Err(ConfigError::MissingTable(_))
        ));
    }

    #[test]
    fn test_duplicate_tenant_id() {
        let json = r#"{"tenants": [
            {"id": "t1", "db_path": "a.db", "input_csv": "a.csv", "vars": {"table": "x"}},
            {"id": "t1", "db_path": "b.db", "input_csv": "b.csv", "vars": {"table": "y"}}
        ]}"#;
        assert!(matches!(
            TenantConfig::from_json(json),
            Err(ConfigError::DuplicateTenant(id)) if id == "t1"
        ));
    }

    #[test]
    fn test_shared_database_file() {
        let json = r#"{"tenants": [
            {"id": "t1", "db_path": "same.db", "input_csv": "a.csv", "vars": {"table": "x"}},
            {"id": "t2", "db_path": "same.db", "input_csv": "b.csv", "vars": {"table": "y"}}
        ]}"#;
        let err = TenantConfig::from_json(json).unwrap_err();
        assert!(matches!(err, ConfigError::SharedDatabase { .. }));
    }

    #[test]
    fn test_select_unknown_tenant() {
        let config = TenantConfig::from_json(TWO_TENANTS).unwrap();
        assert_eq!(select_tenants(&config.tenants, None).unwrap().len(), 2);
        assert_eq!(select_tenants(&config.tenants, Some("t2")).unwrap()[0].id, "t2");
        assert!(matches!(
            select_tenants(&config.tenants, Some("nope")),
            Err(ConfigError::UnknownTenant(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = TenantConfig::load(&dir.path().join("tenants.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_reports_path_on_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tenants.json");
        fs::write(&path, "{ not json").unwrap();
        match TenantConfig::load(&path).unwrap_err() {
            ConfigError::Malformed { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}
