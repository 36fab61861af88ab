//! Username/password authentication against the NetWitness REST API.
//!
//! `POST {base}/rest/api/auth/userpass` with a form-encoded body returns a
//! JWT pair. Nothing is cached: every call performs a fresh round trip, and
//! [`crate::incidents::list_incidents`] calls [`authenticate`] each time.
//!
//! Status handling on this endpoint is stricter than on data calls:
//! - 500 → `NwError::AuthRejected` with the raw body (bad credentials land here).
//! - any other non-200 → `NwError::Status`.

use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::client::NwClient;
use crate::error::{NwError, Result};
use crate::incidents::{ErrorResponse, null_as_default};

/// Path of the username/password auth endpoint, relative to the base URL.
pub const AUTH_PATH: &str = "/rest/api/auth/userpass";

/// Form body sent to the auth endpoint.
/// Serialized as `application/x-www-form-urlencoded` by reqwest's `.form()`.
#[derive(Serialize)]
pub struct TokenRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Decoded auth endpoint response.
///
/// Only `access_token` is needed for data calls; the rest is kept for
/// callers of [`request_token`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Identifier of the authenticated principal.
    #[serde(default)]
    pub id: Option<String>,
    /// Roles granted to the principal.
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: Vec<String>,
    /// Short-lived token sent in the `NetWitness-Token` header.
    #[serde(default, deserialize_with = "null_as_default")]
    pub access_token: String,
    /// Token that could be used to renew the access token.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Authenticates and returns the full decoded token response.
///
/// # Errors
///
/// - `NwError::InvalidUrl`: the base URL could not be parsed.
/// - `NwError::Network`: transport failure or unreadable body.
/// - `NwError::AuthRejected`: the endpoint answered 500.
/// - `NwError::Status`: the endpoint answered any other non-200 status.
/// - `NwError::Parse`: the 200 body was not valid JSON.
#[instrument(skip(client), fields(username = %client.username()))]
pub async fn request_token(client: &NwClient) -> Result<TokenResponse> {
    let url = client.endpoint_url(AUTH_PATH)?;
    let form = TokenRequest {
        username: client.username(),
        password: client.password(),
    };

    debug!(%url, "requesting access token");
    let response = client
        .http()
        .post(url)
        .header(ACCEPT, "application/json")
        .form(&form)
        .send()
        .await?;

    // Read the body before looking at the status so a 500 can carry it.
    let status = response.status();
    let body = response.text().await?;

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        if let Ok(details) = serde_json::from_str::<ErrorResponse>(&body) {
            for e in &details.errors {
                warn!(field = ?e.field, message = %e.message, "auth endpoint reported an error");
            }
        }
        return Err(NwError::AuthRejected { body });
    }

    if status != StatusCode::OK {
        return Err(NwError::Status { status });
    }

    let token: TokenResponse = serde_json::from_str(&body)?;
    debug!(roles = ?token.roles, "access token acquired");
    Ok(token)
}

/// Authenticates and returns only the access token.
///
/// The token is returned verbatim; an empty `accessToken` is not an error.
/// See [`request_token`] for the error cases.
pub async fn authenticate(client: &NwClient) -> Result<String> {
    Ok(request_token(client).await?.access_token)
}
