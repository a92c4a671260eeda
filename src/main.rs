//! Employee Tracker CLI Entry Point
//!
//! Resolves the connection (config file, then flags/environment), checks the
//! store is reachable, optionally creates the schema and sample data, then
//! hands the terminal to the interactive menu.
//!
//! Tables and messages go to stdout. Logs go to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use employee_tracker::config::{load_config, ConnectionOverrides};
use employee_tracker::logging::init_tracing;
use employee_tracker::seed::seed_sample_data;
use employee_tracker::{
    ConnectionConfig, Controller, DatabaseType, Store, TerminalPrompter, TrackerConfig,
};

/// Employee Tracker - manage departments, roles, and employees
#[derive(Parser, Debug)]
#[command(name = "employee-tracker")]
#[command(about = "Interactive workforce database manager for PostgreSQL and SQLite")]
#[command(version)]
struct Cli {
    /// Config file (default: .employee-tracker/config.json, then the user config dir)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long)]
    debug: bool,

    /// Create the tables if they do not exist
    #[arg(long)]
    init_schema: bool,

    /// Insert sample data into an empty database
    #[arg(long)]
    seed: bool,

    /// Database engine (postgres or sqlite)
    #[arg(long = "db-engine", env = "TRACKER_DB_ENGINE")]
    engine: Option<DatabaseType>,

    /// PostgreSQL host
    #[arg(long = "db-host", env = "TRACKER_DB_HOST")]
    host: Option<String>,

    /// PostgreSQL port
    #[arg(long = "db-port", env = "TRACKER_DB_PORT")]
    port: Option<u16>,

    /// PostgreSQL user
    #[arg(long = "db-user", env = "TRACKER_DB_USER")]
    user: Option<String>,

    /// PostgreSQL password
    #[arg(long = "db-password", env = "TRACKER_DB_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// PostgreSQL database name
    #[arg(long = "db-name", env = "TRACKER_DB_NAME")]
    database: Option<String>,

    /// SQLite database file (`:memory:` for a throwaway database)
    #[arg(long = "db-file", env = "TRACKER_DB_FILE", value_name = "PATH")]
    file: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> ConnectionOverrides {
        ConnectionOverrides {
            engine: self.engine,
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
            file: self.file.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    let (file_config, source) = load_config(cli.config.as_deref())?;
    tracing::debug!(%source, "configuration loaded");

    let overrides = cli.overrides();
    if !overrides.is_empty() {
        tracing::debug!("applying connection overrides from flags/environment");
    }
    let connection = file_config.resolve(&overrides)?;
    tracing::info!(connection = %connection.describe(), "resolved connection");

    match connection.engine {
        DatabaseType::Postgres => run_postgres(&connection, &file_config, &cli).await,
        DatabaseType::SQLite => run_sqlite(&connection, &file_config, &cli).await,
    }
}

#[cfg(feature = "postgres")]
async fn run_postgres(connection: &ConnectionConfig, config: &TrackerConfig, cli: &Cli) -> Result<()> {
    let store = employee_tracker::PostgresStore::new(connection)?;
    run(store, connection, config, cli).await
}

#[cfg(not(feature = "postgres"))]
async fn run_postgres(_: &ConnectionConfig, _: &TrackerConfig, _: &Cli) -> Result<()> {
    anyhow::bail!("PostgreSQL support not compiled in (enable the 'postgres' feature)")
}

#[cfg(feature = "sqlite")]
async fn run_sqlite(connection: &ConnectionConfig, config: &TrackerConfig, cli: &Cli) -> Result<()> {
    let store = employee_tracker::SqliteStore::open(connection)?;
    run(store, connection, config, cli).await
}

#[cfg(not(feature = "sqlite"))]
async fn run_sqlite(_: &ConnectionConfig, _: &TrackerConfig, _: &Cli) -> Result<()> {
    anyhow::bail!("SQLite support not compiled in (enable the 'sqlite' feature)")
}

async fn run<S: Store>(
    store: S,
    connection: &ConnectionConfig,
    config: &TrackerConfig,
    cli: &Cli,
) -> Result<()> {
    store
        .ping()
        .await
        .with_context(|| format!("Could not connect to {}", connection.describe()))?;
    tracing::info!(engine = %store.engine(), "store reachable");

    if cli.init_schema || config.init_schema {
        store.init_schema().await.context("Could not create schema")?;
        tracing::info!("schema ready");
    }

    if cli.seed {
        let summary = seed_sample_data(&store).await.context("Could not insert sample data")?;
        if summary.is_empty() {
            println!("Database already has data; sample data not inserted.");
        } else {
            println!(
                "Inserted sample data: {} departments, {} roles, {} employees.",
                summary.departments, summary.roles, summary.employees
            );
        }
    }

    let mut controller = Controller::new(store, TerminalPrompter::new(), std::io::stdout());
    controller.run().await?;
    Ok(())
}
