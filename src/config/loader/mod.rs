use crate::config::Config;
use crate::utils::{ensure_dir, get_agribid_home};
use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// (config field, env var) pairs applied on top of the file.
pub const ENV_OVERRIDES: &[(&str, &str)] = &[("api.baseUrl", "AGRIBID_API_BASE_URL")];

pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_agribid_home()?.join("config.json"))
}

pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let default_path = get_config_path().unwrap_or_else(|_| PathBuf::from("config.json"));
    let path = config_path.unwrap_or(default_path.as_path());

    let mut config = if path.exists() {
        // Shared lock on the same sibling file save_config() locks
        // exclusively: readers run together, a writer excludes them.
        let lock_file = open_lock_file(path)?;
        lock_file
            .lock_shared()
            .with_context(|| "Failed to acquire shared lock on config lock file")?;

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config JSON from {}", path.display()))?;
        debug!("loaded config from {}", path.display());
        config
    } else {
        Config::default()
    };

    apply_env_overrides(&mut config, |var| std::env::var(var).ok());

    config
        .validate()
        .with_context(|| "Configuration validation failed")?;
    Ok(config)
}

/// Apply environment overrides. Set, non-empty variables win over the file.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for (field, var) in ENV_OVERRIDES {
        let Some(val) = lookup(var).filter(|v| !v.is_empty()) else {
            continue;
        };
        match *field {
            "api.baseUrl" => config.api.base_url = val,
            other => warn!("no config field for env override {other}"),
        }
        debug!("{field} overridden by {var}");
    }
}

/// Sibling `config.json.lock`. Locks live here rather than on the config
/// itself because `atomic_write` replaces the config inode.
fn open_lock_file(config_path: &Path) -> Result<fs::File> {
    let lock_path = config_path.with_extension("json.lock");
    fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .with_context(|| format!("Failed to create lock file at {}", lock_path.display()))
}

pub fn save_config(config: &Config, config_path: Option<&Path>) -> Result<()> {
    let default_path = get_config_path().unwrap_or_else(|_| PathBuf::from("config.json"));
    let path = config_path.unwrap_or(default_path.as_path());

    ensure_dir(path.parent().context("Config path has no parent")?)?;

    let lock_file = open_lock_file(path)?;
    lock_file
        .lock_exclusive()
        .with_context(|| "Failed to acquire exclusive lock on config lock file")?;

    let content = serde_json::to_string_pretty(config)?;
    crate::utils::atomic_write(path, &content)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    crate::utils::restrict_permissions(path);

    Ok(())
}
