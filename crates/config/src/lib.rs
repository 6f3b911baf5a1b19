//! Configuration loading and env substitution.
//!
//! Config files: `yumi.toml`, `yumi.yaml`, or `yumi.json`,
//! searched in `./` then `~/.config/yumi/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values. API keys and
//! the bot token may also come straight from the environment, so an empty
//! (or absent) config file is perfectly valid.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{config_dir, discover_and_load, load_config},
    schema::{ChatConfig, DiscordConfig, ProviderEntry, ProvidersConfig, WeatherConfig, YumiConfig},
};
