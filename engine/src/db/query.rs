//! Executing rendered queries against a tenant database.

use rusqlite::types::Value;
use rusqlite::{Batch, Connection};
use std::path::Path;

use crate::error::{QueryError, QueryResult};

/// All rows fetched by one statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutput {
    pub rows: Vec<Vec<Value>>,
}

/// Open the database, run `sql`, fetch every row, and close the connection.
///
/// `sql` must hold at most one statement. A blank or comment-only query
/// yields no rows.
pub fn run_query(db_path: &Path, sql: &str) -> QueryResult<QueryOutput> {
    let conn = Connection::open(db_path).map_err(|source| QueryError::Open {
        path: db_path.to_path_buf(),
        source,
    })?;

    let output = fetch_all(&conn, sql)?;

    conn.close().map_err(|(_, source)| QueryError::Open {
        path: db_path.to_path_buf(),
        source,
    })?;
    Ok(output)
}

fn fetch_all(conn: &Connection, sql: &str) -> QueryResult<QueryOutput> {
    // Batch skips empty statements, so a trailing ';' or comment is fine
    let mut batch = Batch::new(conn, sql);
    let Some(mut stmt) = batch.next()? else {
        return Ok(QueryOutput::default());
    };
    if batch.next()?.is_some() {
        return Err(QueryError::MultipleStatements);
    }

    let width = stmt.column_count();
    let mut rows = Vec::new();
    let mut cursor = stmt.query([])?;
    while let Some(row) = cursor.next()? {
        let values = (0..width)
            .map(|i| row.get::<_, Value>(i))
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.push(values);
    }

    Ok(QueryOutput { rows })
}

/// Format a row as a tuple: `('1', '10')`, `(3,)`, `(None, 2.5)`.
pub fn format_row(row: &[Value]) -> String {
    let values: Vec<String> = row.iter().map(format_value).collect();
    match values.len() {
        1 => format!("({},)", values[0]),
        _ => format!("({})", values.join(", ")),
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => format!("{:?}", f),
        Value::Text(s) => quote_text(s),
        Value::Blob(b) => format!("<blob {} bytes>", b.len()),
    }
}

/// Single quotes, unless the text has a `'` and no `"`.
fn quote_text(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
