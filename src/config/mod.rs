mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;
use storefront_common::paths::normalize_extension;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    parse_config(&content).with_context(|| format!("Invalid config file: {:?}", path))
}

/// Parse, normalize, and validate configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config> {
    let mut config: Config = toml::from_str(content).context("Failed to parse config")?;

    normalize_config(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./config.toml",
        "./storefront.toml",
        "~/.config/storefront/config.toml",
        "/etc/storefront/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

fn normalize_config(config: &mut Config) {
    let storage = &mut config.storage;

    storage.allowed_extensions = storage
        .allowed_extensions
        .iter()
        .map(|ext| normalize_extension(ext))
        .filter(|ext| !ext.is_empty())
        .collect();
    storage.allowed_extensions.dedup();

    storage.base_url = storage.base_url.trim().trim_end_matches('/').to_string();
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.server.max_upload_bytes == 0 {
        anyhow::bail!("server.max_upload_bytes cannot be 0");
    }

    if config.storage.base_url.is_empty() {
        anyhow::bail!("storage.base_url cannot be empty");
    }

    if config.storage.allowed_extensions.is_empty() {
        anyhow::bail!("storage.allowed_extensions must list at least one extension");
    }

    if config.storage.upload_dir.as_os_str().is_empty() {
        anyhow::bail!("storage.upload_dir cannot be empty");
    }

    if config.storage.upload_dir.is_file() {
        anyhow::bail!(
            "storage.upload_dir {:?} exists and is not a directory",
            config.storage.upload_dir
        );
    }

    Ok(())
}
