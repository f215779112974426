//! Layered configuration.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. `streamgate.toml` in the working directory, or an explicit file
//! 3. `STREAMGATE_*` environment variables (after loading `streamgate.env`)
//! 4. command-line overrides

use config::{Config, Environment, File};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::net::UdpSocket;
use std::path::Path;
use std::time::Duration;
use streamgate_core::HashLength;
use streamgate_error::{ConfigError, StreamgateResult};
use tracing::{debug, error, info, instrument, warn};

const ENV_PREFIX: &str = "STREAMGATE";
const ENV_FILE: &str = "streamgate.env";
const CONFIG_NAME: &str = "streamgate";
const PUBLIC_IP_URL: &str = "https://api.ipify.org?format=text";

/// Runtime configuration of the bot.
///
/// # Examples
///
/// ```
/// use streamgate_bot::{ConfigOverrides, StreamgateConfig};
/// use std::collections::HashMap;
///
/// let overrides = ConfigOverrides::default()
///     .with_archive_channel(-1001234567890)
///     .with_host("https://files.example.com/".to_string());
/// let config = StreamgateConfig::load_with_env(None, Some(HashMap::new()), &overrides).unwrap();
///
/// assert_eq!(*config.archive_channel(), 1234567890);
/// assert_eq!(config.base_url(), "https://files.example.com");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, derive_getters::Getters)]
pub struct StreamgateConfig {
    /// Archive channel ID, without the `-100` marker
    archive_channel: i64,
    /// Port the streaming server listens on
    #[serde(default = "default_port")]
    port: u16,
    /// Public base URL of the streaming server
    #[serde(default)]
    host: Option<String>,
    /// Detect the public address instead of the local one
    #[serde(default)]
    use_public_ip: bool,
    /// Users allowed to talk to the bot; empty allows everyone
    #[serde(default, deserialize_with = "deserialize_user_list")]
    allowed_users: Vec<i64>,
    /// Channel users must join before receiving links
    #[serde(default)]
    force_sub_channel: Option<String>,
    /// Characters of the digest placed in links
    #[serde(default)]
    hash_length: HashLength,
    /// Seconds the protocol client may take to start
    #[serde(default = "default_bootstrap_timeout")]
    bootstrap_timeout_secs: u64,
    /// Seconds a single upstream call may take
    #[serde(default = "default_request_timeout")]
    request_timeout_secs: u64,
    /// Development mode; failed link replies carry the error detail
    #[serde(default)]
    dev: bool,
}

fn default_port() -> u16 {
    8080
}

fn default_bootstrap_timeout() -> u64 {
    120
}

fn default_request_timeout() -> u64 {
    30
}

/// Values given on the command line.
#[derive(Debug, Clone, Default, derive_setters::Setters)]
#[setters(prefix = "with_", strip_option)]
pub struct ConfigOverrides {
    /// Archive channel ID
    pub archive_channel: Option<i64>,
    /// Public base URL
    pub host: Option<String>,
    /// Listen port
    pub port: Option<u16>,
    /// Force-subscription channel
    pub force_sub_channel: Option<String>,
    /// Raw hash length, clamped on load
    pub hash_length: Option<i64>,
    /// Detect the public address
    pub use_public_ip: Option<bool>,
    /// Development mode
    pub dev: Option<bool>,
}

impl StreamgateConfig {
    /// Load configuration from every source.
    ///
    /// `path` replaces the optional `streamgate.toml` lookup and must exist.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be read, a value has the
    /// wrong type, or `archive_channel` is missing.
    pub fn load(path: Option<&Path>, overrides: &ConfigOverrides) -> StreamgateResult<Self> {
        match dotenvy::from_filename(ENV_FILE) {
            Ok(env_path) => debug!(path = %env_path.display(), "Loaded environment file"),
            Err(e) if e.not_found() => debug!("No {} file found", ENV_FILE),
            Err(e) => warn!(error = %e, "Failed to parse {}", ENV_FILE),
        }
        Self::load_with_env(path, None, overrides)
    }

    /// Load configuration with an explicit environment.
    ///
    /// `env` replaces the process environment when given; keys keep the
    /// `STREAMGATE_` prefix. The environment file is not read.
    #[instrument(skip(env, overrides))]
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
        overrides: &ConfigOverrides,
    ) -> StreamgateResult<Self> {
        debug!("Loading configuration with precedence: CLI > environment > file > defaults");

        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(CONFIG_NAME).required(false),
        };

        let builder = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true).source(env))
            .set_override_option("archive_channel", overrides.archive_channel)
            .and_then(|b| b.set_override_option("host", overrides.host.clone()))
            .and_then(|b| b.set_override_option("port", overrides.port.map(i64::from)))
            .and_then(|b| {
                b.set_override_option("force_sub_channel", overrides.force_sub_channel.clone())
            })
            .and_then(|b| b.set_override_option("hash_length", overrides.hash_length))
            .and_then(|b| b.set_override_option("use_public_ip", overrides.use_public_ip))
            .and_then(|b| b.set_override_option("dev", overrides.dev))
            .map_err(|e| ConfigError::new(format!("Invalid command-line override: {}", e)))?;

        let mut config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to read configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;

        config.archive_channel = strip_channel_prefix(config.archive_channel)?;
        config.host = config
            .host
            .take()
            .map(|host| host.trim().trim_end_matches('/').to_string())
            .filter(|host| !host.is_empty());
        config.force_sub_channel = config
            .force_sub_channel
            .take()
            .filter(|channel| !channel.trim().is_empty());

        info!(
            archive_channel = config.archive_channel,
            port = config.port,
            hash_length = %config.hash_length,
            allowed_users = config.allowed_users.len(),
            force_sub = config.force_sub_channel.is_some(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Fill in `host` from the machine's address when it was not configured.
    ///
    /// Uses the local outbound address, or the public address when
    /// `use_public_ip` is set. Falls back to `localhost`.
    #[instrument(skip(self))]
    pub async fn with_resolved_host(mut self) -> Self {
        if self.host.is_some() {
            return self;
        }

        let ip = if self.use_public_ip {
            match public_ip(self.request_timeout()).await {
                Ok(ip) => {
                    warn!("Using a public IP exposes this machine; set a host name instead");
                    ip
                }
                Err(e) => {
                    error!(error = %e, "Failed to detect public IP");
                    "localhost".to_string()
                }
            }
        } else {
            local_ip().unwrap_or_else(|| "localhost".to_string())
        };

        let host = format!("http://{}:{}", ip, self.port);
        info!(host = %host, "Host not set, using detected address");
        self.host = Some(host);
        self
    }

    /// Base URL that issued links start with.
    pub fn base_url(&self) -> String {
        self.host
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.port))
    }

    /// Deadline for a single upstream call.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Deadline for the protocol client to start.
    pub fn bootstrap_timeout(&self) -> Duration {
        Duration::from_secs(self.bootstrap_timeout_secs)
    }
}

/// Remove the `-100` marker the protocol puts in front of channel IDs.
///
/// Plain negative IDs lose their sign; positive IDs are returned as is.
///
/// # Errors
///
/// Returns `ConfigError` for a zero ID or a bare `-100`.
///
/// # Examples
///
/// ```
/// use streamgate_bot::strip_channel_prefix;
///
/// assert_eq!(strip_channel_prefix(-1001234567890).unwrap(), 1234567890);
/// assert_eq!(strip_channel_prefix(1234567890).unwrap(), 1234567890);
/// assert!(strip_channel_prefix(0).is_err());
/// ```
pub fn strip_channel_prefix(raw: i64) -> Result<i64, ConfigError> {
    if raw == 0 {
        return Err(ConfigError::new("archive_channel must be set"));
    }
    let text = raw.to_string();
    match text.strip_prefix("-100") {
        Some(rest) => rest
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| ConfigError::new(format!("Invalid archive channel ID {}", raw))),
        None => Ok(raw.abs()),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UserList {
    List(Vec<i64>),
    One(i64),
    Text(String),
}

fn deserialize_user_list<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match UserList::deserialize(deserializer)? {
        UserList::List(ids) => Ok(ids),
        UserList::One(id) => Ok(vec![id]),
        UserList::Text(text) => text
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<i64>().map_err(|e| {
                    serde::de::Error::custom(format!("invalid user ID '{}': {}", part, e))
                })
            })
            .collect(),
    }
}

fn local_ip() -> Option<String> {
    // No packets are sent; connecting a UDP socket only selects a route.
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    socket.local_addr().ok().map(|addr| addr.ip().to_string())
}

async fn public_ip(timeout: Duration) -> Result<String, reqwest::Error> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let body = client
        .get(PUBLIC_IP_URL)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_channel_prefix() {
        assert_eq!(strip_channel_prefix(-1001001).unwrap(), 1001);
        assert_eq!(strip_channel_prefix(-12345).unwrap(), 12345);
        assert!(strip_channel_prefix(-100).is_err());
    }

    #[test]
    fn test_user_list_from_text() {
        let value = serde_json::json!({ "archive_channel": 5, "allowed_users": "1, 2,3" });
        let config: StreamgateConfig = serde_json::from_value(value).unwrap();
        assert_eq!(config.allowed_users, vec![1, 2, 3]);
    }

    #[test]
    fn test_defaults() {
        let value = serde_json::json!({ "archive_channel": 5 });
        let config: StreamgateConfig = serde_json::from_value(value).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.hash_length, HashLength::DEFAULT);
        assert_eq!(config.bootstrap_timeout(), Duration::from_secs(120));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(!config.dev);
        assert_eq!(config.base_url(), "http://localhost:8080");
    }
}
