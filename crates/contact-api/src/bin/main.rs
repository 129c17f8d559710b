//! Contact relay server entry point

use clap::{Parser, Subcommand};
use contact_api::{init_tracing, serve, ServeArgs};

#[derive(Parser)]
#[command(name = "contact-relay")]
#[command(about = "Contact form relay - stores submissions and notifies the site operator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            let config = args.into_config()?;
            init_tracing(config.log_format);
            tracing::info!(version = env!("CARGO_PKG_VERSION"), "Configuration loaded");
            serve(config).await?;
        }
    }

    Ok(())
}
