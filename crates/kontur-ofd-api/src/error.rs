use thiserror::Error;

/// Top-level error type for the `kontur-ofd-api` crate.
///
/// Every failure anywhere in a traversal surfaces as exactly one of these.
/// None of them is retried by the client; the caller decides remediation.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The auth endpoint rejected the credentials or returned no session id.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// API key or session id cannot be sent as an HTTP header value.
    #[error("Invalid {name} header value: {message}")]
    InvalidHeader { name: &'static str, message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup error (unreadable or invalid CA certificate).
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// An authenticated endpoint answered with a non-success status.
    /// The body is not decoded as data; a short preview lands in `message`.
    #[error("OFD API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the remote side refused our credentials or session,
    /// so re-authenticating (or fixing the credentials) might resolve it.
    pub fn is_auth_rejected(&self) -> bool {
        match self {
            Self::Authentication { .. } => true,
            Self::Api { status, .. } => matches!(status, 401 | 403),
            _ => false,
        }
    }

    /// Returns `true` if this is a transient transport error.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}

/// Truncate a response body for inclusion in an error message.
pub(crate) fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
