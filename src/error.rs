//! Typed error hierarchy for the nw-incidents crate.
//!
//! Every variant maps to one failure boundary of a request round trip:
//! building the URL, building the request, the transport, the status check
//! on the auth endpoint, and JSON decoding. `Authentication` wraps whatever
//! went wrong while `list_incidents` was fetching its token, so callers can
//! tell the two steps apart while still reaching the cause via `source()`.

use reqwest::StatusCode;

/// Unified error type for all nw-incidents library operations.
#[derive(Debug, thiserror::Error)]
pub enum NwError {
    /// The configured base URL could not be parsed, or cannot carry a path.
    #[error("invalid base URL {url:?}: {source}")]
    InvalidUrl {
        /// The base URL exactly as it was given to the client.
        url: String,
        /// Why the URL was rejected.
        #[source]
        source: url::ParseError,
    },

    /// The HTTP request could not be constructed (e.g. a header value with
    /// bytes that are not allowed in HTTP headers).
    #[error("failed to build request: {0}")]
    Request(#[source] reqwest::Error),

    /// Transport failure: DNS, TCP, TLS, timeout, or reading the body.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The auth endpoint answered `500 Internal Server Error`.
    ///
    /// NetWitness reports bad credentials this way, so the raw body is kept.
    #[error("authentication rejected (500): {body}")]
    AuthRejected {
        /// The raw response body text.
        body: String,
    },

    /// The auth endpoint answered a status other than 200 or 500.
    #[error("unexpected status code {status}")]
    Status {
        /// The HTTP status code returned.
        status: StatusCode,
    },

    /// A response body was not the JSON shape we expected.
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Fetching the access token failed while listing incidents.
    #[error("authentication failed: {0}")]
    Authentication(#[source] Box<NwError>),
}

impl From<reqwest::Error> for NwError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            NwError::Request(err)
        } else {
            NwError::Network(err)
        }
    }
}

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, NwError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn auth_rejected_displays_body() {
        let err = NwError::AuthRejected {
            body: r#"{"status":500,"errors":[{"message":"Bad credentials"}]}"#.to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Bad credentials"), "got: {msg}");
        assert!(msg.contains("500"), "got: {msg}");
    }

    #[test]
    fn status_error_names_code() {
        let err = NwError::Status {
            status: StatusCode::FORBIDDEN,
        };
        assert!(err.to_string().contains("403"));
    }

    #[test]
    fn invalid_url_keeps_input_and_source() {
        let source = url::Url::parse("not a url").unwrap_err();
        let err = NwError::InvalidUrl {
            url: "not a url".to_string(),
            source,
        };
        assert!(err.to_string().contains("not a url"));
        assert!(err.source().is_some());
    }

    #[test]
    fn parse_error_wraps_serde_json() {
        let json_err = serde_json::from_str::<String>("{{bad json}}").unwrap_err();
        let err = NwError::from(json_err);
        assert!(matches!(err, NwError::Parse(_)));
        assert!(err.to_string().contains("failed to parse response"));
        assert!(err.source().is_some());
    }

    #[test]
    fn authentication_chains_to_inner_error() {
        let inner = NwError::Status {
            status: StatusCode::UNAUTHORIZED,
        };
        let err = NwError::Authentication(Box::new(inner));
        let msg = err.to_string();
        assert!(msg.starts_with("authentication failed"), "got: {msg}");
        assert!(msg.contains("401"), "got: {msg}");

        let source = err.source().expect("should chain to the auth failure");
        assert!(source.to_string().contains("401"));
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NwError>();
    }
}
