//! Incident listing for the NetWitness REST API.
//!
//! [`list_incidents`] authenticates, then issues
//! `GET {base}/rest/api/incidents?since=..&pageSize=..&pageNumber=..`
//! and decodes one page. Paging is left to the caller: inspect
//! [`IncidentsResponse::has_next`] (or use [`IncidentsResponse::next_page`])
//! and call again.
//!
//! Every field of the response types defaults when absent or `null`; these
//! are view objects with no invariants of their own. Timestamps are kept as
//! the ISO 8601 strings the server sends.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, instrument, warn};

use crate::auth::authenticate;
use crate::client::NwClient;
use crate::error::{NwError, Result};

/// Path of the incidents endpoint, relative to the base URL.
pub const INCIDENTS_PATH: &str = "/rest/api/incidents";

/// Header carrying the access token on data calls.
pub const TOKEN_HEADER: &str = "NetWitness-Token";

/// Header carrying the protocol version on data calls.
pub const VERSION_HEADER: &str = "NetWitness-Version";

const JSON: &str = "application/json";

/// Deserializes `null` the same way as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ── Response types ─────────────────────────────────────────────────────

/// A security incident as returned by the incidents endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Incident identifier (e.g. `"INC-1042"`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Short human-readable title.
    #[serde(default)]
    pub title: Option<String>,
    /// Free-text summary.
    #[serde(default)]
    pub summary: Option<String>,
    /// `Low`, `Medium`, `High` or `Critical`.
    #[serde(default)]
    pub priority: Option<String>,
    /// Risk score from 0 to 100.
    #[serde(default, deserialize_with = "null_as_default")]
    pub risk_score: i64,
    /// Workflow status, e.g. `New`, `Assigned`, `InProgress`, `Closed`.
    #[serde(default)]
    pub status: Option<String>,
    /// Number of alerts grouped into the incident.
    #[serde(default, deserialize_with = "null_as_default")]
    pub alert_count: i64,
    /// Mean risk score of the grouped alerts.
    #[serde(default, deserialize_with = "null_as_default")]
    pub average_alert_risk_score: i64,
    /// Sealed incidents accept no further alerts.
    #[serde(default, deserialize_with = "null_as_default")]
    pub sealed: bool,
    /// Remediation tasks ever opened.
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_remediation_task_count: i64,
    /// Remediation tasks not yet closed.
    #[serde(default, deserialize_with = "null_as_default")]
    pub open_remediation_task_count: i64,
    /// Creation time (ISO 8601).
    #[serde(default)]
    pub created: Option<String>,
    /// Last modification time (ISO 8601).
    #[serde(default)]
    pub last_updated: Option<String>,
    /// User who last modified the incident.
    #[serde(default)]
    pub last_updated_by: Option<String>,
    /// `None` while the incident is unassigned.
    #[serde(default)]
    pub assignee: Option<String>,
    /// Components that produced the alerts.
    #[serde(default, deserialize_with = "null_as_default")]
    pub sources: Vec<String>,
    /// Identifier of the aggregation rule that created the incident.
    #[serde(default)]
    pub rule_id: Option<String>,
    /// Time of the earliest alert (ISO 8601).
    #[serde(default)]
    pub first_alert_time: Option<String>,
    /// Categories assigned by analysts or rules.
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<Category>,
    /// Analyst notes, oldest first.
    #[serde(default, deserialize_with = "null_as_default")]
    pub journal_entries: Vec<JournalEntry>,
    /// Rule or user that created the incident.
    #[serde(default)]
    pub created_by: Option<String>,
    /// Alerts removed from the incident.
    #[serde(default, deserialize_with = "null_as_default")]
    pub deleted_alert_count: i64,
    /// Number of raw events behind the alerts.
    #[serde(default, deserialize_with = "null_as_default")]
    pub event_count: i64,
    /// Network endpoints seen across the alerts.
    #[serde(default, deserialize_with = "null_as_default")]
    pub alert_meta: AlertMeta,
}

/// A category attached to an incident.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Category identifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Parent category name.
    #[serde(default)]
    pub parent: Option<String>,
    /// Category name.
    #[serde(default)]
    pub name: Option<String>,
}

/// An analyst note recorded on an incident.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    /// Entry identifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// User who wrote the entry.
    #[serde(default)]
    pub author: Option<String>,
    /// Entry text.
    #[serde(default)]
    pub notes: Option<String>,
    /// Creation time (ISO 8601).
    #[serde(default)]
    pub created: Option<String>,
    /// Last modification time (ISO 8601).
    #[serde(default)]
    pub last_updated: Option<String>,
    /// Investigation milestone, e.g. `Containment`.
    #[serde(default)]
    pub milestone: Option<String>,
}

/// Network endpoints seen across the incident's alerts.
///
/// The server uses PascalCase keys here (`SourceIp`, `DestinationIp`),
/// unlike the rest of the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertMeta {
    /// Source IP addresses.
    #[serde(rename = "SourceIp", default, deserialize_with = "null_as_default")]
    pub source_ip: Vec<String>,
    /// Destination IP addresses.
    #[serde(rename = "DestinationIp", default, deserialize_with = "null_as_default")]
    pub destination_ip: Vec<String>,
}

/// One page of incidents plus pagination metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentsResponse {
    /// Incidents on this page.
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Incident>,
    /// Zero-based index of this page.
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_number: u32,
    /// Maximum number of items per page.
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_size: u32,
    /// Number of pages at the current page size.
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_pages: u32,
    /// Number of incidents across all pages.
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_items: u64,
    /// Whether a following page exists.
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_next: bool,
    /// Whether a preceding page exists.
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_previous: bool,
}

impl IncidentsResponse {
    /// Page number to request next, or `None` on the last page.
    pub fn next_page(&self) -> Option<u32> {
        if self.has_next {
            self.page_number.checked_add(1)
        } else {
            None
        }
    }
}

/// Error payload returned by the REST API on failures.
///
/// Only used to log field/message pairs from a failed authentication; the
/// error returned to the caller carries the raw body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status code echoed by the server.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: u16,
    /// Time of the failure (ISO 8601).
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Individual failures.
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<FieldError>,
}

/// One entry of [`ErrorResponse::errors`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// Human-readable description.
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    /// Name of the offending request field, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ── Request types ──────────────────────────────────────────────────────

/// Query string of the incidents endpoint.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IncidentsQuery<'a> {
    since: &'a str,
    page_size: u32,
    page_number: u32,
}

// ── Endpoint functions ─────────────────────────────────────────────────

/// Fetches one page of incidents created since `since`.
///
/// A fresh token is obtained through [`authenticate`] on every call.
/// `since` is passed through untouched (not validated as a date).
///
/// `until` is accepted but never sent: the request carries exactly
/// `since`, `pageSize` and `pageNumber`.
///
/// The response status is not checked here. A non-success status is logged
/// and the body is decoded anyway, so an error page surfaces as
/// `NwError::Parse`.
///
/// # Errors
///
/// - `NwError::Authentication`: obtaining the token failed; wraps the cause.
/// - `NwError::InvalidUrl`: the base URL could not be parsed.
/// - `NwError::Request`: the token was not a valid header value.
/// - `NwError::Network`: transport failure or unreadable body.
/// - `NwError::Parse`: the body was not a valid incidents page.
#[instrument(skip(client), fields(base_url = %client.base_url()))]
pub async fn list_incidents(
    client: &NwClient,
    since: &str,
    until: &str,
    page_size: u32,
    page_number: u32,
) -> Result<IncidentsResponse> {
    let token = authenticate(client)
        .await
        .map_err(|e| NwError::Authentication(Box::new(e)))?;

    let url = client.endpoint_url(INCIDENTS_PATH)?;
    if !until.is_empty() {
        debug!(until, "until is not sent to the incidents endpoint");
    }
    let query = IncidentsQuery {
        since,
        page_size,
        page_number,
    };

    debug!(%url, "requesting incidents page");
    let response = client
        .http()
        .get(url)
        .query(&query)
        .header(TOKEN_HEADER, token)
        .header(VERSION_HEADER, client.version())
        .header(ACCEPT, JSON)
        .header(CONTENT_TYPE, JSON)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        warn!(%status, "incidents endpoint returned a non-success status");
    }

    let body = response.text().await?;
    let page: IncidentsResponse = serde_json::from_str(&body)?;
    debug!(
        items = page.items.len(),
        page_number = page.page_number,
        total_pages = page.total_pages,
        has_next = page.has_next,
        "decoded incidents page"
    );
    Ok(page)
}
