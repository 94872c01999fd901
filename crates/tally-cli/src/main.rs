//! CLI application for scanning receipts and tracking expenses.

mod commands;
mod vision;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, expense, insights, scan};

/// tally - Scan receipts and keep track of where your money goes
#[derive(Parser)]
#[command(name = "tally")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a receipt and extract store, amount and items
    Scan(scan::ScanArgs),

    /// Record an expense
    Add(expense::AddArgs),

    /// List recorded expenses
    List(expense::ListArgs),

    /// Edit a recorded expense
    Edit(expense::EditArgs),

    /// Delete a recorded expense
    Delete(expense::DeleteArgs),

    /// Show spending insights
    Insights(insights::InsightsArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Scan(args) => scan::run(args, config_path).await,
        Commands::Add(args) => expense::add(args, config_path),
        Commands::List(args) => expense::list(args, config_path),
        Commands::Edit(args) => expense::edit(args, config_path),
        Commands::Delete(args) => expense::delete(args, config_path),
        Commands::Insights(args) => insights::run(args, config_path),
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
