//! Async Rust client library for the NetWitness incidents REST API.
//!
//! Authenticates with a username/password pair to obtain an access token,
//! then issues a single paginated "list incidents" query with that token.
//!
//! # Modules
//!
//! - [`auth`]: Username/password token acquisition.
//! - [`client`]: Client factory holding the transport, base URL and credentials.
//! - [`error`]: Typed error hierarchy (`NwError`) for all library operations.
//! - [`incidents`]: Incident types and the paginated list operation.
//!
//! # Quick Start
//!
//! ```ignore
//! use nw_incidents::client::NwClient;
//! use nw_incidents::incidents::list_incidents;
//!
//! let client = NwClient::new("https://nw.example.com", "analyst", "secret")?;
//! let page = list_incidents(&client, "2024-01-01T00:00:00Z", "", 100, 0).await?;
//! for incident in &page.items {
//!     println!("{} {}", incident.id, incident.title.as_deref().unwrap_or(""));
//! }
//! ```
//!
//! Every call is a fresh round trip: `list_incidents` re-authenticates each
//! time and never follows `hasNext` on its own. Cancellation is done by
//! dropping the returned future (e.g. with `tokio::time::timeout`).

#![warn(missing_docs)]

pub mod auth;
pub mod client;
pub mod error;
pub mod incidents;
