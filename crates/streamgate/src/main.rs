//! streamgate CLI binary.
//!
//! Offline tooling around the link pipeline:
//! - Print the effective configuration
//! - Compute the token for a file
//! - Verify an issued link against a file

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, print_token, show_config, verify_link};

    // Parse command-line arguments
    let cli = Cli::parse();

    streamgate::init_tracing(cli.verbose, cli.json_logs)?;

    // Execute the requested command
    match cli.command {
        Commands::Config { overrides } => {
            show_config(cli.config.as_deref(), overrides).await?;
        }

        Commands::Token { file, hash_length } => {
            print_token(&file, hash_length)?;
        }

        Commands::Verify {
            url,
            file,
            hash_length,
        } => {
            verify_link(&url, &file, hash_length)?;
        }
    }

    Ok(())
}
