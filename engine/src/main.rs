//! tenantload CLI - load tenant CSVs into SQLite and run a templated query
//!
//! ```bash
//! tenantload                          # Full pipeline (same as `run`)
//! tenantload run --tenant acme        # Only one tenant
//! tenantload init --force             # Rebuild every tenant database
//! tenantload render                   # Show rendered queries
//! tenantload tenants                  # List configured tenants
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tenantload::{
    IdentifierPolicy, InitOutcome, LogEntry, Reporter, RunError, Runner, RunnerConfig,
    DEFAULT_CONFIG_PATH, DEFAULT_TEMPLATE_PATH,
};

#[derive(Parser)]
#[command(name = "tenantload")]
#[command(about = "Load per-tenant CSV data into SQLite and run a templated query", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct GlobalArgs {
    /// Tenant configuration file (JSON)
    #[arg(long, global = true, env = "TENANTLOAD_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Query template file
    #[arg(long, global = true, env = "TENANTLOAD_TEMPLATE", default_value = DEFAULT_TEMPLATE_PATH)]
    template: PathBuf,

    /// Interpolate table and column names without validating them
    #[arg(long, global = true, env = "TENANTLOAD_ALLOW_RAW_IDENTIFIERS")]
    allow_raw_identifiers: bool,
}

impl GlobalArgs {
    fn runner_config(&self) -> RunnerConfig {
        let policy = if self.allow_raw_identifiers {
            IdentifierPolicy::Raw
        } else {
            IdentifierPolicy::Strict
        };
        RunnerConfig::new(&self.config, &self.template).with_identifier_policy(policy)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize missing databases and run the query for each tenant
    Run {
        /// Only process this tenant
        #[arg(short, long)]
        tenant: Option<String>,
    },

    /// Initialize tenant databases without running the query
    Init {
        /// Only initialize this tenant
        #[arg(short, long)]
        tenant: Option<String>,

        /// Drop and reload even if the database file exists
        #[arg(short, long)]
        force: bool,
    },

    /// Print the rendered query for each tenant
    Render {
        /// Only render for this tenant
        #[arg(short, long)]
        tenant: Option<String>,
    },

    /// List configured tenants
    Tenants,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let runner = Runner::new(cli.global.runner_config());
    let mut reporter = Reporter::stdout();

    let result = match cli.command.unwrap_or(Commands::Run { tenant: None }) {
        Commands::Run { tenant } => runner.run(tenant.as_deref(), &mut reporter).map(|_| ()),

        Commands::Init { tenant, force } => {
            cmd_init(&runner, tenant.as_deref(), force, &mut reporter)
        }

        Commands::Render { tenant } => runner.render(tenant.as_deref(), &mut reporter).map(|_| ()),

        Commands::Tenants => runner.list_tenants(&mut reporter).map(|_| ()),
    };

    if let Err(e) = result {
        eprintln!("{}", LogEntry::error(format!("Error: {}", e)).render());
        std::process::exit(1);
    }
}

fn cmd_init(
    runner: &Runner,
    tenant: Option<&str>,
    force: bool,
    reporter: &mut Reporter,
) -> Result<(), RunError> {
    let outcomes = runner.initialize(tenant, force, reporter)?;
    let built = outcomes
        .iter()
        .filter(|(_, o)| matches!(o, InitOutcome::Initialized { .. }))
        .count();
    reporter.info(format!(
        "{} of {} tenant databases initialized",
        built,
        outcomes.len()
    ))?;
    Ok(())
}
