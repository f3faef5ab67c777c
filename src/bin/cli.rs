use anyhow::Context;
use clap::{Parser, Subcommand};
use std::{path::PathBuf, sync::Arc};
use user_stats_report::{
    codec::ExchangeFormat, config::AppConfig, db, repositories::SqliteUserStatsRepository,
    services::ReportService,
};

#[derive(Parser)]
#[command(name = "user-stats-cli")]
#[command(about = "Export, import and inspect user statistics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the full report to a file
    Export {
        /// Output format (csv or xlsx)
        #[arg(short, long, default_value = "csv")]
        format: ExchangeFormat,

        /// Destination file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Load rows from a CSV or XLSX file
    Import {
        /// Input format (csv or xlsx)
        #[arg(short, long, default_value = "csv")]
        format: ExchangeFormat,

        /// File to import
        path: PathBuf,
    },

    /// Print all stored records
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "user_stats_report=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    let config = AppConfig::from_env()?;
    let pool = db::connect_and_migrate(&config.database_url).await?;
    let service = ReportService::new(Arc::new(SqliteUserStatsRepository::new(pool)));

    match cli.command {
        Commands::Export { format, output } => {
            let bytes = service.export(format).await?;
            std::fs::write(&output, &bytes)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("Wrote {} bytes to {}", bytes.len(), output.display());
        }
        Commands::Import { format, path } => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let rows = service.import(format, &bytes).await?;
            println!("Imported {} rows from {}", rows, path.display());
        }
        Commands::List => {
            let records = service.list().await?;
            if records.is_empty() {
                println!("No user statistics recorded.");
            }
            for record in records {
                println!(
                    "{:>6}  {:<20}  {:>6}  {}  {}",
                    record.user_id,
                    record.user_name,
                    record.login_count,
                    record.last_login_rfc3339(),
                    if record.active { "active" } else { "inactive" }
                );
            }
        }
    }

    Ok(())
}
