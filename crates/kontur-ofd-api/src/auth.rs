// Session authentication
//
// Password login against the Kontur auth service. The returned session id
// is wrapped in a `Session` value and threaded explicitly into every data
// call; the client itself stays stateless.

use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};
use url::Url;

use crate::client::{OfdClient, decode};
use crate::error::{Error, preview};
use crate::models::AuthResponse;

/// Prefix the auth endpoint expects in front of the account login.
///
/// The remote API identifies password logins as `testlogin@<login>`. This is
/// an upstream convention, not an email-composition rule.
pub const LOGIN_PREFIX: &str = "testlogin@";

/// Default authentication endpoint.
pub const DEFAULT_AUTH_URL: &str = "https://api.kontur.ru/auth/authenticate-by-pass";

/// Default base URL for the OFD data API.
pub const DEFAULT_API_URL: &str = "https://ofd-api.kontur.ru";

/// Header carrying the account API key on every authenticated request.
pub const API_KEY_HEADER: &str = "ofd_api_key";

/// Header carrying the session id on every authenticated request.
pub const SESSION_HEADER: &str = "auth.sid";

/// Account credentials supplied by the caller.
///
/// Immutable for the duration of a traversal. Secrets are redacted from
/// `Debug` output.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub login: String,
    pub password: SecretString,
    pub api_key: SecretString,
}

impl Credentials {
    pub fn new(
        login: impl Into<String>,
        password: impl Into<SecretString>,
        api_key: impl Into<SecretString>,
    ) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
            api_key: api_key.into(),
        }
    }

    /// The login string in the form the auth endpoint expects.
    pub fn prefixed_login(&self) -> String {
        format!("{LOGIN_PREFIX}{}", self.login)
    }
}

/// An authenticated session: the result of a successful login.
///
/// Carries everything an authenticated request needs. Sessions are never
/// refreshed; authenticate again to get a new one.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) api_key: SecretString,
    pub(crate) sid: SecretString,
}

impl Session {
    /// Build a session from an already-known session id.
    pub fn new(api_key: SecretString, sid: SecretString) -> Self {
        Self { api_key, sid }
    }
}

/// Remote endpoints the client talks to.
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// Full URL of the password authentication endpoint.
    pub auth_url: Url,
    /// Base URL of the data API; `/v2/...` paths are appended to it.
    pub api_url: Url,
}

impl Endpoints {
    pub fn new(auth_url: &str, api_url: &str) -> Result<Self, Error> {
        Ok(Self {
            auth_url: Url::parse(auth_url)?,
            api_url: Url::parse(api_url)?,
        })
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_AUTH_URL, DEFAULT_API_URL).expect("default endpoints are valid URLs")
    }
}

impl OfdClient {
    /// Exchange the account password for a session.
    ///
    /// `POST {auth_url}?login=testlogin@<login>` with the raw password as a
    /// `text/plain` body; the response carries `{"Sid": "..."}`. Login and
    /// password are forwarded as-is. Nothing is retried: any failure means
    /// "not authenticated".
    ///
    /// Only the endpoint and the response status are logged; the login and
    /// every secret stay out of the log.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Session, Error> {
        let url = self.endpoints().auth_url.clone();
        debug!("authenticating at {}", url);

        let resp = self
            .http()
            .post(url)
            .query(&[("login", credentials.prefixed_login())])
            .header(CONTENT_TYPE, "text/plain")
            .body(credentials.password.expose_secret().to_owned())
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            warn!(%status, "authentication rejected");
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {}", preview(&body)),
            });
        }

        let auth: AuthResponse = decode(body)?;
        if auth.sid.is_empty() {
            return Err(Error::Authentication {
                message: "response carried no session id".into(),
            });
        }

        debug!("authentication successful");
        Ok(Session {
            api_key: credentials.api_key.clone(),
            sid: SecretString::from(auth.sid),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_gets_upstream_prefix() {
        let creds = Credentials::new("shop@example.ru", "pw".to_string(), "key".to_string());
        assert_eq!(creds.prefixed_login(), "testlogin@shop@example.ru");
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let creds = Credentials::new("shop", "hunter2".to_string(), "k-123".to_string());
        let shown = format!("{creds:?}");
        assert!(shown.contains("shop"));
        assert!(!shown.contains("hunter2"));
        assert!(!shown.contains("k-123"));
        assert_eq!(creds.password.expose_secret(), "hunter2");
    }

    #[test]
    fn default_endpoints_point_at_kontur() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.auth_url.host_str(), Some("api.kontur.ru"));
        assert_eq!(endpoints.api_url.host_str(), Some("ofd-api.kontur.ru"));
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        let result = Endpoints::new("not a url", DEFAULT_API_URL);
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
