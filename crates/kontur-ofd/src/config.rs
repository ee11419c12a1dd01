//! Configuration loading and credential resolution.
//!
//! TOML profiles layered with `KONTUR_OFD_*` environment variables via
//! figment, then CLI flags on top. Secrets read from the file are wrapped
//! in `SecretString` as soon as they are resolved.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use kontur_ofd_api::auth::{DEFAULT_API_URL, DEFAULT_AUTH_URL};
use kontur_ofd_api::{Credentials, Endpoints, TlsMode, TransportConfig};

use crate::cli::GlobalOpts;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no {field} configured for profile '{profile}'")]
    MissingField {
        field: &'static str,
        profile: String,
    },

    #[error("profile '{name}' not found in configuration")]
    ProfileNotFound { name: String, available: String },

    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named account profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Defaults {
    /// Request timeout in seconds; unset keeps the HTTP client default.
    pub timeout: Option<u64>,
}

/// A named account profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Account login (without the `testlogin@` prefix).
    pub login: Option<String>,

    /// Password (plaintext -- prefer the env var).
    pub password: Option<String>,

    /// API key (plaintext -- prefer `api_key_env`).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// Override the data API base URL.
    pub api_url: Option<String>,

    /// Override the auth endpoint URL.
    pub auth_url: Option<String>,

    /// Path to an extra CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("ru", "kontur", "kontur-ofd").map_or_else(
        || PathBuf::from(".kontur-ofd.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
///
/// A missing file is not an error; the defaults and environment still apply.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("KONTUR_OFD_").split("__"));

    Ok(figment.extract()?)
}

// ── Resolution ──────────────────────────────────────────────────────

/// Everything needed to build a client and authenticate.
#[derive(Debug)]
pub struct Settings {
    pub credentials: Credentials,
    pub endpoints: Endpoints,
    pub transport: TransportConfig,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Merge CLI flags over the active profile.
///
/// Flags win over profile values. A profile named explicitly with
/// `--profile` must exist; the implicit default profile may be absent when
/// every credential comes from flags or the environment.
pub fn resolve(global: &GlobalOpts, config: &Config) -> Result<Settings, ConfigError> {
    let name = active_profile_name(global, config);
    let fallback = Profile::default();
    let profile = match config.profiles.get(&name) {
        Some(profile) => profile,
        None if global.profile.is_some() => {
            let mut available: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
            available.sort_unstable();
            return Err(ConfigError::ProfileNotFound {
                name,
                available: available.join(", "),
            });
        }
        None => &fallback,
    };

    let login = pick(global.login.as_ref(), profile.login.as_ref())
        .ok_or_else(|| missing("login", &name))?;
    let password = pick(global.password.as_ref(), profile.password.as_ref())
        .ok_or_else(|| missing("password", &name))?;
    let api_key = resolve_api_key(global, profile).ok_or_else(|| missing("api_key", &name))?;

    let auth_url = pick(global.auth_url.as_ref(), profile.auth_url.as_ref())
        .unwrap_or_else(|| DEFAULT_AUTH_URL.into());
    let api_url = pick(global.api_url.as_ref(), profile.api_url.as_ref())
        .unwrap_or_else(|| DEFAULT_API_URL.into());
    let endpoints = Endpoints::new(&auth_url, &api_url).map_err(|e| ConfigError::Validation {
        field: "endpoint URL",
        reason: e.to_string(),
    })?;

    let timeout = global
        .timeout
        .or(profile.timeout)
        .or(config.defaults.timeout)
        .map(Duration::from_secs);
    let tls = profile
        .ca_cert
        .clone()
        .map_or(TlsMode::System, TlsMode::CustomCa);

    Ok(Settings {
        credentials: Credentials::new(
            login,
            SecretString::from(password),
            SecretString::from(api_key),
        ),
        endpoints,
        transport: TransportConfig { tls, timeout },
    })
}

fn pick(flag: Option<&String>, profile: Option<&String>) -> Option<String> {
    flag.or(profile).cloned()
}

fn missing(field: &'static str, profile: &str) -> ConfigError {
    ConfigError::MissingField {
        field,
        profile: profile.to_owned(),
    }
}

/// API key precedence: flag, profile plaintext, then the profile's env var.
fn resolve_api_key(global: &GlobalOpts, profile: &Profile) -> Option<String> {
    pick(global.api_key.as_ref(), profile.api_key.as_ref()).or_else(|| {
        profile
            .api_key_env
            .as_ref()
            .and_then(|var| std::env::var(var).ok())
    })
}
