// OFD API HTTP client
//
// Wraps `reqwest::Client` with OFD-specific URL construction, the two
// authentication headers, and status/JSON handling. Endpoint groups
// (auth, organizations, cashboxes, receipts) are implemented as inherent
// methods in separate files to keep this module focused on transport
// mechanics.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::{API_KEY_HEADER, Endpoints, SESSION_HEADER, Session};
use crate::error::{Error, preview};
use crate::models::ListEnvelope;
use crate::transport::TransportConfig;

/// HTTP client for the Kontur OFD API.
///
/// Holds no session state: authenticate to obtain a [`Session`] and pass it
/// to every data call.
#[derive(Debug, Clone)]
pub struct OfdClient {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl OfdClient {
    /// Create a client for the given endpoints from a `TransportConfig`.
    pub fn new(endpoints: Endpoints, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, endpoints })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, endpoints: Endpoints) -> Self {
        Self { http, endpoints }
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The endpoints this client talks to.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a data API URL from path segments and query pairs.
    ///
    /// Segments are percent-encoded individually, so ids containing `/` or
    /// spaces cannot change the path shape.
    pub fn api_url(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, Error> {
        let mut url = self.endpoints.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send an authenticated GET and return the raw response.
    ///
    /// Adds the API key and session id headers. Status codes are not
    /// inspected here; transport failures propagate unchanged.
    pub async fn get(&self, session: &Session, url: Url) -> Result<reqwest::Response, Error> {
        debug!("GET {}", url);

        let headers = session_headers(session)?;
        let resp = self.http.get(url).headers(headers).send().await?;
        Ok(resp)
    }

    /// Send an authenticated GET for a list endpoint.
    pub(crate) async fn get_list<T: DeserializeOwned>(
        &self,
        session: &Session,
        url: Url,
    ) -> Result<Vec<T>, Error> {
        let resp = self.get(session, url).await?;
        let body = read_body(resp).await?;
        decode_list(body)
    }
}

// ── Header construction ──────────────────────────────────────────────

fn session_headers(session: &Session) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::with_capacity(2);
    headers.insert(
        HeaderName::from_static(API_KEY_HEADER),
        sensitive_value(API_KEY_HEADER, &session.api_key)?,
    );
    headers.insert(
        HeaderName::from_static(SESSION_HEADER),
        sensitive_value(SESSION_HEADER, &session.sid)?,
    );
    Ok(headers)
}

fn sensitive_value(name: &'static str, secret: &SecretString) -> Result<HeaderValue, Error> {
    let mut value =
        HeaderValue::from_str(secret.expose_secret()).map_err(|e| Error::InvalidHeader {
            name,
            message: e.to_string(),
        })?;
    value.set_sensitive(true);
    Ok(value)
}

// ── Response handling ────────────────────────────────────────────────

/// Read a response body in full; non-2xx becomes `Error::Api` and the body
/// is never decoded.
async fn read_body(resp: reqwest::Response) -> Result<String, Error> {
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        return Err(Error::Api {
            status: status.as_u16(),
            message: preview(&body).to_owned(),
        });
    }

    Ok(body)
}

/// Decode a list body: a bare JSON array, or the same array wrapped as
/// `{ "data": [...] }`.
///
/// The shape is picked from the first non-blank character, so a bad element
/// reports its own field error instead of a generic shape mismatch.
fn decode_list<T: DeserializeOwned>(body: String) -> Result<Vec<T>, Error> {
    if body.trim_start().starts_with('{') {
        decode::<ListEnvelope<T>>(body).map(|envelope| envelope.data)
    } else {
        decode(body)
    }
}

pub(crate) fn decode<T: DeserializeOwned>(body: String) -> Result<T, Error> {
    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body,
    })
}
