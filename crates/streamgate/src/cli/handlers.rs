//! Command handlers.

use crate::cli::{DescriptorArgs, OverrideArgs};
use std::path::Path;
use streamgate::{
    ConfigOverrides, HashLength, LinkToken, ParsedLink, StreamgateConfig, verify_token,
};
use tracing::{info, instrument};

/// Load the configuration from every source and print it as JSON.
#[instrument(skip(overrides))]
pub async fn show_config(
    path: Option<&Path>,
    overrides: OverrideArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let overrides = ConfigOverrides::from(overrides);
    let config = StreamgateConfig::load(path, &overrides)?
        .with_resolved_host()
        .await;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

/// Print the full and short hash for a file.
pub fn print_token(
    file: &DescriptorArgs,
    hash_length: Option<i64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let length = hash_length.map(HashLength::clamped).unwrap_or_default();
    let token = LinkToken::for_file(&file.to_descriptor()?, length);
    println!("full:  {}", token.full());
    println!("short: {}", token.short());
    Ok(())
}

/// Check an issued link against a file.
///
/// # Errors
///
/// Fails when the URL is not a stream link or the hash does not match.
#[instrument(skip(file))]
pub fn verify_link(
    url: &str,
    file: &DescriptorArgs,
    hash_length: Option<i64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let link = ParsedLink::parse(url).ok_or_else(|| format!("Not a stream link: {}", url))?;
    let length = HashLength::clamped(hash_length.unwrap_or(link.hash.len() as i64));

    verify_token(
        link.stable_message_id,
        &file.to_descriptor()?,
        &link.hash,
        length,
    )?;

    info!(stable_message_id = link.stable_message_id, "Link matches file");
    println!("ok: message {} matches", link.stable_message_id);
    Ok(())
}
