use clap::{Parser, Subcommand};

mod config;
mod seed;
mod token;

use config::ConfigCommands;
use seed::SeedCommands;

#[derive(Debug, Parser)]
#[command(name = "content-api-cli")]
#[command(about = "Content API command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Catalog seed files
    Seed {
        #[command(subcommand)]
        command: SeedCommands,
    },
    /// Environment configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate a random bearer token for `CONTENT_API_TOKEN`
    Token {
        /// Number of random bytes; the token is twice as many hex characters
        #[arg(long, default_value = "32")]
        bytes: usize,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let fallback_level =
        std::env::var("CONTENT_API_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Seed { command }) => seed::run(command)?,
        Some(Commands::Config { command }) => config::run(&command)?,
        Some(Commands::Token { bytes }) => println!("{}", token::generate(bytes)?),
        None => println!("content-api-cli ready; run with --help for commands"),
    }

    Ok(())
}
