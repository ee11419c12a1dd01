//! CLI error types with miette diagnostics.
//!
//! Maps API and config errors into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use crate::config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the OFD service")]
    #[diagnostic(
        code(kontur_ofd::connection_failed),
        help("Check network access to {url}, or override it with --api-url / --auth-url.")
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: kontur_ofd_api::Error,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(kontur_ofd::timeout),
        help("Increase the timeout with --timeout or retry later.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(kontur_ofd::auth_failed),
        help(
            "Verify the login, password and API key.\n\
             Set them with --login / --password / --api-key or KONTUR_OFD_* variables."
        )
    )]
    AuthFailed { message: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("OFD API error (HTTP {status}): {message}")]
    #[diagnostic(code(kontur_ofd::api_error))]
    ApiError { status: u16, message: String },

    #[error("Unexpected response from the OFD API")]
    #[diagnostic(
        code(kontur_ofd::bad_response),
        help("The service answered with data in an unknown shape. Re-run with -vv for details.")
    )]
    BadResponse {
        #[source]
        source: kontur_ofd_api::Error,
    },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(kontur_ofd::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No {field} configured for profile '{profile}'")]
    #[diagnostic(
        code(kontur_ofd::no_credentials),
        help(
            "Pass it as a flag, set the KONTUR_OFD_* environment variable,\n\
             or add it to the profile in {path}"
        )
    )]
    NoCredentials {
        field: &'static str,
        profile: String,
        path: String,
    },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(kontur_ofd::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(kontur_ofd::config))]
    Config(Box<figment::Error>),

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::ProfileNotFound { .. }
            | Self::NoCredentials { .. }
            | Self::Validation { .. }
            | Self::Config(_) => exit_code::USAGE,
            Self::ApiError { .. } | Self::BadResponse { .. } | Self::Io(_) => exit_code::GENERAL,
        }
    }

    /// Attach the config file path to errors whose help text points at it.
    pub fn from_config(err: ConfigError, path: &std::path::Path) -> Self {
        match err {
            ConfigError::MissingField { field, profile } => Self::NoCredentials {
                field,
                profile,
                path: path.display().to_string(),
            },
            other => other.into(),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingField { field, profile } => Self::NoCredentials {
                field,
                profile,
                path: String::new(),
            },
            ConfigError::ProfileNotFound { name, available } => {
                Self::ProfileNotFound { name, available }
            }
            ConfigError::Validation { field, reason } => Self::Validation {
                field: field.into(),
                reason,
            },
            ConfigError::Figment(err) => Self::Config(err),
        }
    }
}

// ── API Error → CliError mapping ─────────────────────────────────────

impl From<kontur_ofd_api::Error> for CliError {
    fn from(err: kontur_ofd_api::Error) -> Self {
        use kontur_ofd_api::Error as ApiErr;

        if err.is_timeout() {
            return Self::Timeout;
        }

        let url = match &err {
            ApiErr::Transport(e) => e.url().map(ToString::to_string),
            _ => None,
        };

        match err {
            ApiErr::Authentication { message } | ApiErr::Api {
                status: 401 | 403,
                message,
            } => Self::AuthFailed { message },
            ApiErr::Api { status, message } => Self::ApiError { status, message },
            ApiErr::Transport(_) => Self::ConnectionFailed {
                url: url.unwrap_or_else(|| "(unknown)".into()),
                source: err,
            },
            ApiErr::Tls(reason) => Self::Validation {
                field: "ca_cert".into(),
                reason,
            },
            ApiErr::InvalidUrl(e) => Self::Validation {
                field: "endpoint URL".into(),
                reason: e.to_string(),
            },
            ApiErr::InvalidHeader { name, message } => Self::Validation {
                field: format!("{name} header"),
                reason: message,
            },
            ApiErr::Deserialization { .. } => Self::BadResponse { source: err },
        }
    }
}
