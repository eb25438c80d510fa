#![warn(clippy::all, clippy::pedantic)]

use affilink::Config;
use affilink::channels;
use affilink::cli::{Cli, Commands};
use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();
    let config = Config::load_or_init()?;

    match cli.command {
        Commands::Start => {
            config.validate()?;
            channels::start_channels(&config).await
        }
        Commands::Doctor => channels::doctor_channels(&config).await,
        Commands::Config => {
            println!("config file: {}", config.config_path.display());
            match config.validate() {
                Ok(()) => println!("status: ready"),
                Err(e) => println!("status: {e}"),
            }
            Ok(())
        }
    }
}
