//! Connection handle for a hosted Supabase project.
//!
//! The handle is a [`reqwest::Client`] preconfigured with the project's
//! `apikey` and bearer headers, bound to the project's `/rest/v1` root.
//! Connecting performs no network I/O; it fails only on bad inputs.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Url;

/// Query timeout, matching the hosted client library's default.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(120);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for connection setup failures. Fatal for a run.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("Supabase URL must not be empty")]
    EmptyUrl,

    #[error("Supabase key must not be empty")]
    EmptyKey,

    #[error("Invalid Supabase URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Supabase key contains characters not allowed in an HTTP header")]
    InvalidKey,

    /// The HTTP client could not be constructed (TLS backend, etc.).
    #[error("HTTP client setup failed: {0}")]
    Client(#[from] reqwest::Error),
}

// ---------------------------------------------------------------------------
// SupabaseClient
// ---------------------------------------------------------------------------

/// Opaque handle used by [`fetch_contacts`](crate::fetch_contacts).
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    rest_url: Url,
}

impl SupabaseClient {
    /// Root of the project's REST interface, e.g. `https://x.supabase.co/rest/v1`.
    pub fn rest_url(&self) -> &Url {
        &self.rest_url
    }

    /// URL of `table` under the REST root, with `table` as one path segment.
    pub fn table_url(&self, table: &str) -> Url {
        let mut url = self.rest_url.clone();
        // The root is always an http(s) URL, so it can carry path segments.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(table);
        }
        url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

/// Validate the project URL and key and build a client handle.
///
/// Failures are logged here before being returned.
pub fn connect(url: &str, key: &str) -> Result<SupabaseClient, ConnectionError> {
    match build_client(url, key) {
        Ok(client) => {
            tracing::info!(rest_url = %client.rest_url, "Supabase connection established");
            Ok(client)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to Supabase");
            Err(e)
        }
    }
}

fn build_client(url: &str, key: &str) -> Result<SupabaseClient, ConnectionError> {
    let url = url.trim();
    let key = key.trim();

    if url.is_empty() {
        return Err(ConnectionError::EmptyUrl);
    }
    if key.is_empty() {
        return Err(ConnectionError::EmptyKey);
    }

    let rest_url = parse_rest_url(url)?;

    let mut apikey = HeaderValue::from_str(key).map_err(|_| ConnectionError::InvalidKey)?;
    apikey.set_sensitive(true);
    let mut bearer =
        HeaderValue::from_str(&format!("Bearer {key}")).map_err(|_| ConnectionError::InvalidKey)?;
    bearer.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert("apikey", apikey);
    headers.insert(AUTHORIZATION, bearer);

    let http = reqwest::Client::builder()
        .timeout(QUERY_TIMEOUT)
        .default_headers(headers)
        .build()?;

    Ok(SupabaseClient { http, rest_url })
}

/// Parse the project URL and derive its `/rest/v1` root.
fn parse_rest_url(url: &str) -> Result<Url, ConnectionError> {
    let invalid = |reason: String| ConnectionError::InvalidUrl {
        url: url.to_string(),
        reason,
    };

    let mut parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid("query strings and fragments are not allowed".to_string()));
    }

    parsed
        .path_segments_mut()
        .map_err(|()| invalid("URL cannot be a base".to_string()))?
        .pop_if_empty()
        .extend(["rest", "v1"]);
    Ok(parsed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
