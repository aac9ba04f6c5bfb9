use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "patscan")]
#[command(about = "Find wildcard byte signatures in process memory dumps")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a memory dump for a pattern or a signature set
    Scan(commands::scan::ScanArgs),
    /// Parse a pattern and print its normalized form
    Check {
        /// Pattern such as "48 8D 0D ?? ?? ?? ??"
        #[arg(short, long)]
        pattern: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("patscan=info".parse()?)
                .add_directive("patscan_core=info".parse()?),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Command::Scan(scan_args) => commands::scan::run(scan_args).await,
        Command::Check { pattern } => commands::check::run(&pattern),
    }
}
