//! Configuration management

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Prefix for environment overrides (OTB_PORT, OTB_OWNTONE__HOST, ...)
const ENV_PREFIX: &str = "OTB";

/// `OTB_*` variables handled outside the environment source: the port has its
/// own precedence rules and the config dir locates the file itself
const ENV_EXCLUDED: &[&str] = &["OTB_PORT", "OTB_CONFIG_DIR"];

const APP_DIR_NAME: &str = "owntone-bridge";

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub owntone: OwnToneConfig,
}

fn default_port() -> u16 {
    8089
}

#[derive(Debug, Deserialize)]
pub struct OwnToneConfig {
    #[serde(default = "default_owntone_host")]
    pub host: String,
    #[serde(default = "default_owntone_port")]
    pub port: u16,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OwnToneConfig {
    fn default() -> Self {
        Self {
            host: default_owntone_host(),
            port: default_owntone_port(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl OwnToneConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }
}

fn default_owntone_host() -> String {
    "localhost".to_string()
}

fn default_owntone_port() -> u16 {
    3689
}

fn default_timeout_secs() -> u64 {
    10
}

/// Get config directory (OTB_CONFIG_DIR, XDG_CONFIG_HOME or platform default)
pub fn get_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("OTB_CONFIG_DIR") {
        return PathBuf::from(dir);
    }

    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library/Application Support")
                .join(APP_DIR_NAME);
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join(APP_DIR_NAME);
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".config").join(APP_DIR_NAME);
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join(APP_DIR_NAME);
        }
    }

    // Fallback to current directory
    PathBuf::from(".")
}

/// Parse a port env var, ignoring unset or invalid values
fn port_from_env(name: &str) -> Option<u16> {
    std::env::var(name).ok().and_then(|p| p.parse::<u16>().ok())
}

/// `OTB_*` variables fed to the environment source
fn prefixed_env() -> ::config::Map<String, String> {
    let prefix = format!("{}_", ENV_PREFIX);
    std::env::vars()
        .filter(|(key, _)| key.starts_with(&prefix) && !ENV_EXCLUDED.contains(&key.as_str()))
        .collect()
}

pub fn load_config() -> Result<Config> {
    let config_dir = get_config_dir();

    let mut builder = ::config::Config::builder()
        // Start with defaults
        .set_default("port", default_port() as i64)?
        // Load from config file if it exists
        .add_source(
            ::config::File::with_name(&config_dir.join("config").to_string_lossy())
                .required(false),
        )
        // Override with environment variables (OTB_PORT, OTB_OWNTONE__HOST, etc.)
        .add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(Some(prefixed_env())),
        );

    // Explicit precedence: OTB_PORT > PORT > config > default (invalid values skipped)
    if let Some(port) = port_from_env("OTB_PORT") {
        builder = builder.set_override("port", port as i64)?;
    } else if let Some(port) = port_from_env("PORT") {
        builder = builder.set_override("port", port as i64)?;
    }

    // Shorthands matching OwnTone's own docker images
    if let Ok(host) = std::env::var("OWNTONE_HOST") {
        builder = builder.set_override("owntone.host", host)?;
    }
    if let Some(port) = port_from_env("OWNTONE_PORT") {
        builder = builder.set_override("owntone.port", port as i64)?;
    }

    let config = builder.build()?;

    Ok(config.try_deserialize()?)
}
