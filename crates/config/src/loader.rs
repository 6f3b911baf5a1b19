use std::path::{Path, PathBuf};

use {secrecy::Secret, tracing::{debug, warn}};

use crate::{env_subst::substitute_env, schema::YumiConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["yumi.toml", "yumi.yaml", "yumi.yml", "yumi.json"];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<YumiConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./yumi.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/yumi/yumi.{toml,yaml,yml,json}` (user-global)
///
/// Falls back to `YumiConfig::default()` when no file is found, then applies
/// the environment overrides in either case.
pub fn discover_and_load() -> YumiConfig {
    let mut config = match find_config_file() {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            match load_config(&path) {
                Ok(cfg) => cfg,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                    YumiConfig::default()
                },
            }
        },
        None => {
            debug!("no config file found, using defaults");
            YumiConfig::default()
        },
    };
    apply_env_overrides(&mut config);
    config
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    // Project-local
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    // User-global: ~/.config/yumi/
    if let Some(dir) = config_dir() {
        for name in CONFIG_FILENAMES {
            let p = dir.join(name);
            if p.exists() {
                return Some(p);
            }
        }
    }

    None
}

/// Returns the user-global config directory (`~/.config/yumi/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "yumi").map(|d| d.config_dir().to_path_buf())
}

/// Fill in secrets from the environment when the config file left them unset.
fn apply_env_overrides(config: &mut YumiConfig) {
    apply_overrides_from(config, |name| std::env::var(name).ok());
}

fn apply_overrides_from(config: &mut YumiConfig, get: impl Fn(&str) -> Option<String>) {
    let env_secret = |names: &[&str]| {
        names
            .iter()
            .find_map(|n| get(n))
            .filter(|v| !v.is_empty())
            .map(Secret::new)
    };

    if config.discord.token.is_none() {
        config.discord.token = env_secret(&["DISCORD_BOT_TOKEN", "BOT_TOKEN"]);
    }
    if config.weather.api_key.is_none() {
        config.weather.api_key = env_secret(&["WEATHER_API_KEY"]);
    }
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<YumiConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
