//! Tenant database initialization.
//!
//! A tenant database is materialized from its CSV the first time it is
//! needed. After that, the presence of the file is taken as proof that it
//! is populated: [`ensure_ready`] never looks inside an existing file, so
//! a CSV edited after the first run is not picked up until the database
//! file is removed (or rebuilt with [`rebuild`]).

use rusqlite::{params_from_iter, Connection};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::error::{InitError, InitResult};
use crate::models::TenantDescriptor;
use crate::parser::{read_csv_file, CsvTable};
use crate::report::Reporter;
use crate::validation::{check_columns, check_table, IdentifierPolicy};

/// What [`ensure_ready`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    /// Database file already existed; nothing was touched.
    AlreadyPresent,
    /// Table was (re)created and loaded.
    Initialized { table: String, rows: usize },
}

/// Make sure the tenant's database exists, loading it from CSV if not.
pub fn ensure_ready<W: Write>(
    tenant: &TenantDescriptor,
    policy: IdentifierPolicy,
    reporter: &mut Reporter<W>,
) -> InitResult<InitOutcome> {
    if tenant.db_path.exists() {
        return Ok(InitOutcome::AlreadyPresent);
    }
    load(tenant, policy, reporter)
}

/// Drop and reload the tenant's table whether or not the file exists.
pub fn rebuild<W: Write>(
    tenant: &TenantDescriptor,
    policy: IdentifierPolicy,
    reporter: &mut Reporter<W>,
) -> InitResult<InitOutcome> {
    load(tenant, policy, reporter)
}

fn load<W: Write>(
    tenant: &TenantDescriptor,
    policy: IdentifierPolicy,
    reporter: &mut Reporter<W>,
) -> InitResult<InitOutcome> {
    let table = tenant.table()?;
    let csv = read_csv_file(&tenant.input_csv)?;

    check_table(table, policy)?;
    check_columns(&csv.headers, policy)?;

    create_parent_dir(&tenant.db_path)?;

    let existed = tenant.db_path.exists();
    if let Err(source) = write_table(&tenant.db_path, table, &csv) {
        // Leave no half-built file behind; it would pass the existence check
        if !existed {
            discard_partial(&tenant.db_path, reporter)?;
        }
        return Err(InitError::Sqlite {
            path: tenant.db_path.clone(),
            source,
        });
    }

    reporter.success(format!(
        "Database initialized: {} -> {} ({} records)",
        tenant.id,
        table,
        csv.row_count()
    ))?;

    Ok(InitOutcome::Initialized {
        table: table.to_string(),
        rows: csv.row_count(),
    })
}

/// Remove a database file left by a failed load. A failed removal is
/// reported, since the leftover file will be taken as populated.
fn discard_partial<W: Write>(db_path: &Path, reporter: &mut Reporter<W>) -> io::Result<()> {
    match fs::remove_file(db_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => reporter.warning(format!(
            "Could not remove partial database {}: {}. Delete it before the next run.",
            db_path.display(),
            e
        )),
    }
}

fn create_parent_dir(db_path: &Path) -> InitResult<()> {
    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| InitError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

fn write_table(db_path: &Path, table: &str, csv: &CsvTable) -> rusqlite::Result<()> {
    let mut conn = Connection::open(db_path)?;

    let tx = conn.transaction()?;
    tx.execute(&format!("DROP TABLE IF EXISTS {}", table), [])?;
    tx.execute(&create_table_sql(table, &csv.headers), [])?;
    {
        let mut stmt = tx.prepare(&insert_sql(table, csv.headers.len()))?;
        for row in &csv.rows {
            stmt.execute(params_from_iter(row.iter()))?;
        }
    }
    tx.commit()?;

    conn.close().map_err(|(_, e)| e)
}

/// `CREATE TABLE` with one TEXT column per header entry.
pub(crate) fn create_table_sql(table: &str, columns: &[String]) -> String {
    let columns = columns
        .iter()
        .map(|c| format!("{} TEXT", c))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE {} ({})", table, columns)
}

/// Positional `INSERT` with `count` bound values.
pub(crate) fn insert_sql(table: &str, count: usize) -> String {
    let placeholders = vec!["?"; count].join(", ");
    format!("INSERT INTO {} VALUES ({})", table, placeholders)
}
