//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use streamgate::{ConfigOverrides, FileDescriptor, FileDescriptorBuilder, FileLocation};

/// streamgate - access-controlled stream links for files shared with a chat bot
#[derive(Parser, Debug)]
#[command(name = "streamgate")]
#[command(about = "Access-controlled stream links for files shared with a chat bot", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file (defaults to ./streamgate.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load and print the effective configuration
    Config {
        /// Command-line overrides
        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Print the full and short hash for a file
    Token {
        /// File to hash
        #[command(flatten)]
        file: DescriptorArgs,

        /// Characters of the digest to print (clamped to 5..=32)
        #[arg(long)]
        hash_length: Option<i64>,
    },

    /// Check a link's hash against a file
    Verify {
        /// Issued link
        #[arg(long)]
        url: String,

        /// File the link should point at
        #[command(flatten)]
        file: DescriptorArgs,

        /// Hash length the link was issued with (defaults to the link's)
        #[arg(long)]
        hash_length: Option<i64>,
    },
}

/// Configuration values that override file and environment.
#[derive(Args, Debug, Default)]
pub struct OverrideArgs {
    /// Archive channel ID
    #[arg(long, allow_hyphen_values = true)]
    pub archive_channel: Option<i64>,

    /// Public base URL of the streaming server
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port
    #[arg(long)]
    pub port: Option<u16>,

    /// Channel users must join before receiving links
    #[arg(long)]
    pub force_sub_channel: Option<String>,

    /// Characters of the digest placed in links
    #[arg(long)]
    pub hash_length: Option<i64>,

    /// Detect the public address when no host is set
    #[arg(long)]
    pub use_public_ip: bool,

    /// Development mode
    #[arg(long)]
    pub dev: bool,
}

impl From<OverrideArgs> for ConfigOverrides {
    fn from(args: OverrideArgs) -> Self {
        ConfigOverrides {
            archive_channel: args.archive_channel,
            host: args.host,
            port: args.port,
            force_sub_channel: args.force_sub_channel,
            hash_length: args.hash_length,
            use_public_ip: args.use_public_ip.then_some(true),
            dev: args.dev.then_some(true),
        }
    }
}

/// Identity fields of a file.
#[derive(Args, Debug)]
pub struct DescriptorArgs {
    /// Protocol file ID
    #[arg(long, allow_hyphen_values = true)]
    pub id: i64,

    /// File name
    #[arg(long, default_value = "")]
    pub name: String,

    /// Size in bytes
    #[arg(long)]
    pub size: u64,

    /// MIME type
    #[arg(long)]
    pub mime: String,
}

impl DescriptorArgs {
    /// Build a descriptor; the location does not take part in the hash.
    pub fn to_descriptor(&self) -> Result<FileDescriptor, Box<dyn std::error::Error>> {
        let descriptor = FileDescriptorBuilder::default()
            .id(self.id)
            .name(self.name.clone())
            .size(self.size)
            .mime_type(self.mime.clone())
            .location(FileLocation::Document {
                id: self.id,
                access_hash: 0,
                file_reference: Vec::new(),
                thumb_size: String::new(),
            })
            .build()?;
        Ok(descriptor)
    }
}
