//! Configuration loading.
//!
//! Values come from an optional `config/default.toml` overlaid with
//! `CHATHUB_`-prefixed environment variables, where `__` separates nested
//! keys (`CHATHUB_SERVER__PORT=9000`). Anything left unset falls back to
//! `Settings::default()`.

mod settings;

use config::{Config, Environment, File};

pub use settings::{
    HubSettings, LogSettings, PartialHubSettings, PartialLogSettings, PartialServerSettings,
    PartialSettings, ServerSettings, Settings,
};

use crate::utils::Result;

pub fn load_config() -> Result<Settings> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            Environment::with_prefix("CHATHUB")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;
    let partial: PartialSettings = config.try_deserialize()?;

    Ok(partial.merge(Settings::default()))
}

#[cfg(test)]
mod tests;
