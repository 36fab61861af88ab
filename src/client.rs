//! Client factory for the NetWitness REST API.
//!
//! `NwClient` bundles the HTTP transport with the base URL, the credentials
//! and the protocol version sent on data calls. It holds no mutable state:
//! tokens are fetched per call by [`crate::auth`] and never cached here, so a
//! single client (or a single `reqwest::Client` pool shared by several
//! `NwClient`s) can be used from concurrent tasks without locking.
//!
//! Inputs are not validated at construction time. A malformed base URL only
//! fails when an operation tries to build its endpoint URL.

use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::error::{NwError, Result};

/// Value of the `NetWitness-Version` header sent on data calls.
pub const DEFAULT_VERSION: &str = "1.0";

/// Connect timeout for the default transport. Covers TCP + TLS only.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Overall request timeout for the default transport, body included.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Builds the transport used when the caller does not supply one.
fn build_http_client() -> Result<Client> {
    Ok(Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .build()?)
}

/// Client for the NetWitness REST API.
///
/// Credentials are immutable for the lifetime of the client. The
/// `reqwest::Client` inside is reference-counted, so cloning an `NwClient`
/// shares its connection pool.
#[derive(Clone)]
pub struct NwClient {
    http: Client,
    base_url: String,
    username: String,
    password: String,
    version: String,
}

impl NwClient {
    /// Creates a client with a default transport (10s connect, 60s total
    /// timeout).
    ///
    /// # Errors
    ///
    /// - `NwError::Request`: the TLS backend could not be initialised.
    pub fn new(base_url: &str, username: &str, password: &str) -> Result<Self> {
        Ok(Self::with_http_client(
            build_http_client()?,
            base_url,
            username,
            password,
        ))
    }

    /// Creates a client on top of a caller-supplied transport.
    ///
    /// Used to share one connection pool between clients, to apply custom
    /// timeouts or proxies, and by tests to shorten timeouts.
    pub fn with_http_client(http: Client, base_url: &str, username: &str, password: &str) -> Self {
        NwClient {
            http,
            base_url: base_url.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            version: DEFAULT_VERSION.to_string(),
        }
    }

    /// Overrides the value sent in the `NetWitness-Version` header.
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// The base URL exactly as configured.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The username used for authentication.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The protocol version sent on data calls.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Appends `endpoint` (which starts with `/`) to the base URL's path.
    ///
    /// A trailing slash on the base path is dropped first, so `http://h`,
    /// `http://h/` and `http://h/nw/` all produce single-slash paths. Any
    /// query or fragment on the base URL is discarded.
    pub(crate) fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        let invalid = |source| NwError::InvalidUrl {
            url: self.base_url.clone(),
            source,
        };

        let mut url = Url::parse(&self.base_url).map_err(invalid)?;
        if url.cannot_be_a_base() {
            return Err(invalid(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }

        let path = format!("{}{}", url.path().trim_end_matches('/'), endpoint);
        url.set_path(&path);
        url.set_query(None);
        url.set_fragment(None);
        Ok(url)
    }
}
