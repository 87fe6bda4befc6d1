mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variables that override credentials and paths from the file.
pub const ENV_PLEX_URL: &str = "POSTDROP_PLEX_URL";
pub const ENV_PLEX_TOKEN: &str = "POSTDROP_PLEX_TOKEN";
pub const ENV_TARGET_ROOT: &str = "POSTDROP_TARGET_ROOT";

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    apply_env_overrides(&mut config);
    expand_paths(&mut config);

    Ok(config)
}

/// Load config from default locations or return default config
///
/// The result is not validated; commands that touch files or the media
/// server call [`validate_config`] before doing anything.
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./postdrop.toml",
        "~/.config/postdrop/config.toml",
        "/etc/postdrop/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    let mut config = Config::default();
    apply_env_overrides(&mut config);
    expand_paths(&mut config);
    Ok(config)
}

fn apply_env_overrides(config: &mut Config) {
    if let Some(url) = non_empty_env(ENV_PLEX_URL) {
        config.plex.url = url;
    }
    if let Some(token) = non_empty_env(ENV_PLEX_TOKEN) {
        config.plex.token = token;
    }
    if let Some(root) = non_empty_env(ENV_TARGET_ROOT) {
        config.library.target_root = PathBuf::from(root);
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn expand_paths(config: &mut Config) {
    let expand = |p: &Path| PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).as_ref());

    config.library.target_root = expand(&config.library.target_root);
    if let Some(ref file) = config.logging.file {
        config.logging.file = Some(expand(file));
    }
    if let Some(ref path) = config.engine.path {
        config.engine.path = Some(expand(path));
    }
}

/// Validate configuration
///
/// Every missing required setting is named in a single error.
pub fn validate_config(config: &Config) -> postdrop_common::Result<()> {
    let mut missing = Vec::new();
    if config.plex.url.trim().is_empty() {
        missing.push("plex.url");
    }
    if config.plex.token.trim().is_empty() {
        missing.push("plex.token");
    }
    if config.library.target_root.as_os_str().is_empty() {
        missing.push("library.target_root");
    }
    if !missing.is_empty() {
        return Err(postdrop_common::Error::config(format!(
            "missing required settings: {}",
            missing.join(", ")
        )));
    }

    let url = config.plex.url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(postdrop_common::Error::config(format!(
            "plex.url must start with http:// or https://, got {:?}",
            url
        )));
    }

    if config.plex.retry_attempts == 0 {
        return Err(postdrop_common::Error::config(
            "plex.retry_attempts must be at least 1",
        ));
    }

    if !config.library.target_root.exists() {
        tracing::warn!(
            "Target root does not exist yet: {:?}",
            config.library.target_root
        );
    }

    Ok(())
}
