use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_FILE: &str = "server";
const ENV_PREFIX: &str = "RSVP";

#[rsvp_derive::rsvp_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads layered configuration into `T`.
///
/// 1. **File**: `path` (or `server` in the working directory); the extension
///    is optional, so `server` picks up `server.toml`. A missing file is not an
///    error, every section falls back to its defaults.
/// 2. **Environment**: variables prefixed with `RSVP__`, nested with double
///    underscores (`RSVP__DATABASE__URL` maps to `database.url`).
///
/// # Errors
/// Returns [`ConfigError::Config`] when the file is malformed or a value does
/// not fit the target type.
///
/// # Example
/// ```rust
/// use rsvp_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: Option<u16>,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_FILE), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .convert_case(config::Case::Snake),
        );

    info!("Loading config from {}", effective_path.display());

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
