// ABOUTME: CLI entry point for warehouse-sync
// ABOUTME: Parses commands and routes to appropriate handlers

use anyhow::Result;
use clap::{Parser, Subcommand};
use warehouse_sync::commands;

#[derive(Parser)]
#[command(name = "warehouse-sync")]
#[command(about = "Incremental sales ETL from a MySQL store to a PostgreSQL warehouse", long_about = None)]
#[command(version)]
struct Cli {
    /// Set the log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the warehouse star schema and seed the dimension tables
    Init {
        /// Warehouse PostgreSQL URL (falls back to the saved target)
        #[arg(long, env = "WAREHOUSE_URL")]
        warehouse: Option<String>,
        /// First year covered by the date dimension
        #[arg(long, default_value_t = 2020)]
        start_year: i32,
        /// Last year covered by the date dimension
        #[arg(long, default_value_t = 2030)]
        end_year: i32,
    },
    /// Run incremental synchronization (one cycle unless --interval is set)
    Sync {
        /// Source MySQL URL for the sales_data table
        #[arg(long, env = "SOURCE_URL")]
        source: String,
        /// Warehouse PostgreSQL URL (falls back to the saved target)
        #[arg(long, env = "WAREHOUSE_URL")]
        warehouse: Option<String>,
        /// Seconds between cycles; runs continuously until Ctrl+C
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Check that source and warehouse are ready for synchronization
    Validate {
        #[arg(long, env = "SOURCE_URL")]
        source: String,
        #[arg(long, env = "WAREHOUSE_URL")]
        warehouse: Option<String>,
    },
    /// Show warehouse contents, watermark, and source lag
    Status {
        /// Source MySQL URL; when given, lag against the source is reported
        #[arg(long, env = "SOURCE_URL")]
        source: Option<String>,
        #[arg(long, env = "WAREHOUSE_URL")]
        warehouse: Option<String>,
    },
    /// Manage the warehouse database URL
    Target {
        #[command(flatten)]
        args: commands::target::TargetArgs,
    },
}

fn resolve_warehouse(warehouse: Option<String>) -> Result<String> {
    let state = warehouse_sync::state::load()?;
    warehouse.or(state.warehouse_url).ok_or_else(|| {
        anyhow::anyhow!(
            "Warehouse database URL not provided and not set in state. \
             Use `--warehouse` or `warehouse-sync target set`."
        )
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over --log; default is "info".
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log.clone()));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Init {
            warehouse,
            start_year,
            end_year,
        } => {
            let warehouse = resolve_warehouse(warehouse)?;
            commands::init(&warehouse, start_year, end_year).await
        }
        Commands::Sync {
            source,
            warehouse,
            interval,
        } => {
            let warehouse = resolve_warehouse(warehouse)?;
            commands::sync(&source, &warehouse, interval).await
        }
        Commands::Validate { source, warehouse } => {
            let warehouse = resolve_warehouse(warehouse)?;
            commands::validate(&source, &warehouse).await
        }
        Commands::Status { source, warehouse } => {
            let warehouse = resolve_warehouse(warehouse)?;
            commands::status(source.as_deref(), &warehouse).await
        }
        Commands::Target { args } => commands::target(args).await,
    }
}
