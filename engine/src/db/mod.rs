//! Tenant database access.
//!
//! - `initializer`: materialize a tenant database from its CSV
//! - `query`: run a rendered query and format the rows
//!
//! Every operation opens its own connection and closes it before
//! returning; nothing is pooled or shared between tenants.

pub mod initializer;
pub mod query;

pub use initializer::{ensure_ready, rebuild, InitOutcome};
pub use query::{format_row, run_query, QueryOutput};
