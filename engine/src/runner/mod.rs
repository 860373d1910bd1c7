//! Transformation runner.
//!
//! ```text
//! load tenants ─▶ load template ─▶ for each tenant, in order:
//!                                   ensure db ─▶ render ─▶ execute ─▶ print rows
//! ```
//!
//! Tenants run one after another. The first error stops the run; tenants
//! after the failing one are not processed.
//!
//! # Example
//!
//! ```rust,ignore
//! use tenantload::{Reporter, Runner, RunnerConfig};
//!
//! let runner = Runner::new(RunnerConfig::default());
//! runner.run(None, &mut Reporter::stdout())?;
//! ```

use std::io::Write;

use crate::config::RunnerConfig;
use crate::db::{ensure_ready, format_row, rebuild, run_query, InitOutcome, QueryOutput};
use crate::error::{RunError, RunResult};
use crate::models::{select_tenants, TenantConfig, TenantDescriptor};
use crate::report::Reporter;
use crate::template::QueryTemplate;

/// Summary of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Tenants processed
    pub tenants: usize,
    /// Tenants whose database was created during this run
    pub initialized: usize,
    /// Result rows printed, over all tenants
    pub rows: usize,
}

/// Runs the load-and-transform pipeline for configured tenants.
pub struct Runner {
    config: RunnerConfig,
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Read and validate the tenant list.
    pub fn load_tenants(&self) -> RunResult<Vec<TenantDescriptor>> {
        Ok(TenantConfig::load(&self.config.tenants_path)?.tenants)
    }

    /// Read and parse the query template.
    pub fn load_template(&self) -> RunResult<QueryTemplate> {
        Ok(QueryTemplate::load(&self.config.template_path)?)
    }

    /// Initialize if needed, render, execute, and print the results for one tenant.
    pub fn execute_transformation<W: Write>(
        &self,
        tenant: &TenantDescriptor,
        template: &QueryTemplate,
        reporter: &mut Reporter<W>,
    ) -> RunResult<(InitOutcome, QueryOutput)> {
        let outcome = ensure_ready(tenant, self.config.identifier_policy, reporter).map_err(
            |source| RunError::Init {
                tenant: tenant.id.clone(),
                source,
            },
        )?;

        let sql = render_for(tenant, template)?;

        reporter.blank()?;
        reporter.info(format!("Processing: {}", tenant.id))?;
        reporter.info(format!("SQL: {}", sql.trim()))?;

        let output = run_query(&tenant.db_path, &sql).map_err(|source| RunError::Query {
            tenant: tenant.id.clone(),
            source,
        })?;

        reporter.info("Results:")?;
        for row in &output.rows {
            reporter.info_indent(format_row(row), 1)?;
        }

        Ok((outcome, output))
    }

    /// Full pipeline over every tenant, or only `only` when given.
    pub fn run<W: Write>(
        &self,
        only: Option<&str>,
        reporter: &mut Reporter<W>,
    ) -> RunResult<RunSummary> {
        let tenants = self.load_tenants()?;
        let template = self.load_template()?;
        let selected = select_tenants(&tenants, only)?;

        reporter.info("Multi-Tenant Transformation Engine Starting...")?;

        let mut summary = RunSummary::default();
        for tenant in selected {
            let (outcome, output) = self.execute_transformation(tenant, &template, reporter)?;
            summary.tenants += 1;
            summary.rows += output.rows.len();
            if matches!(outcome, InitOutcome::Initialized { .. }) {
                summary.initialized += 1;
            }
        }

        reporter.blank()?;
        reporter.success("Transformation complete!")?;
        Ok(summary)
    }

    /// Initialize tenant databases without running the query.
    ///
    /// With `force`, existing databases are dropped and reloaded.
    pub fn initialize<W: Write>(
        &self,
        only: Option<&str>,
        force: bool,
        reporter: &mut Reporter<W>,
    ) -> RunResult<Vec<(String, InitOutcome)>> {
        let tenants = self.load_tenants()?;
        let selected = select_tenants(&tenants, only)?;
        let policy = self.config.identifier_policy;

        let mut outcomes = Vec::new();
        for tenant in selected {
            let result = if force {
                rebuild(tenant, policy, reporter)
            } else {
                ensure_ready(tenant, policy, reporter)
            };
            let outcome = result.map_err(|source| RunError::Init {
                tenant: tenant.id.clone(),
                source,
            })?;

            if outcome == InitOutcome::AlreadyPresent {
                reporter.warning(format!(
                    "Database already present: {} ({})",
                    tenant.id,
                    tenant.db_path.display()
                ))?;
            }
            outcomes.push((tenant.id.clone(), outcome));
        }

        Ok(outcomes)
    }

    /// Print each tenant's rendered query without touching any database.
    pub fn render<W: Write>(
        &self,
        only: Option<&str>,
        reporter: &mut Reporter<W>,
    ) -> RunResult<Vec<(String, String)>> {
        let tenants = self.load_tenants()?;
        let template = self.load_template()?;
        let selected = select_tenants(&tenants, only)?;

        let mut rendered = Vec::new();
        for tenant in selected {
            let sql = render_for(tenant, &template)?;
            reporter.info(format!("-- {}", tenant.id))?;
            reporter.info(sql.trim())?;
            rendered.push((tenant.id.clone(), sql));
        }

        Ok(rendered)
    }

    /// Print the configured tenants.
    pub fn list_tenants<W: Write>(&self, reporter: &mut Reporter<W>) -> RunResult<usize> {
        let tenants = self.load_tenants()?;

        reporter.info(format!("Configured tenants ({}):", tenants.len()))?;
        for tenant in &tenants {
            reporter.blank()?;
            reporter.info_indent(&tenant.id, 1)?;
            reporter.info_indent(format!("Database: {}", tenant.db_path.display()), 2)?;
            reporter.info_indent(format!("CSV: {}", tenant.input_csv.display()), 2)?;
            reporter.info_indent(format!("Table: {}", tenant.table()?), 2)?;
            let state = if tenant.db_path.exists() { "present" } else { "not initialized" };
            reporter.info_indent(format!("State: {}", state), 2)?;
        }

        Ok(tenants.len())
    }
}

fn render_for(tenant: &TenantDescriptor, template: &QueryTemplate) -> RunResult<String> {
    template.render(&tenant.vars).map_err(|source| RunError::Render {
        tenant: tenant.id.clone(),
        source,
    })
}
