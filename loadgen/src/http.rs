//! Contains the HTTP target that scheduled requests are sent to.

use std::error::Error as _;
use std::fmt::Write as _;
use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

use crate::replay::Outcome;

/// Errors raised while constructing an [`HttpTarget`].
#[derive(Debug, Error)]
pub enum TargetError {
    /// The host, port and path do not form a valid URL.
    #[error("invalid target URL `{url}`: {reason}")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
        /// Parser error message.
        reason: String,
    },

    /// The HTTP client could not be initialized.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// A remote endpoint receiving one empty `POST` request per dispatch.
#[derive(Clone, Debug)]
pub struct HttpTarget {
    /// The HTTP client used to talk to the target.
    client: reqwest::Client,
    /// Full URL of the endpoint.
    url: Url,
}

impl HttpTarget {
    /// Creates a target for `http://{host}:{port}/{path}`.
    ///
    /// Every request is aborted after `timeout`.
    pub fn new(host: &str, port: u16, path: &str, timeout: Duration) -> Result<Self, TargetError> {
        let path = path.trim_start_matches('/');
        Self::from_url(&format!("http://{host}:{port}/{path}"), timeout)
    }

    /// Creates a target from a full URL.
    pub fn from_url(url: &str, timeout: Duration) -> Result<Self, TargetError> {
        let url = Url::parse(url).map_err(|err| TargetError::InvalidUrl {
            url: url.to_owned(),
            reason: err.to_string(),
        })?;

        let client = reqwest::Client::builder()
            .user_agent(concat!("loadgen/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self { client, url })
    }

    /// The full URL requests are sent to.
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// The path component of the target URL.
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Sends a single request and captures the response or the transport failure.
    pub(crate) async fn dispatch(&self) -> Outcome {
        let response = match self.client.post(self.url.clone()).send().await {
            Ok(response) => response,
            Err(err) => return Outcome::failed(&err),
        };

        let status = response.status().as_u16();
        match response.text().await {
            Ok(body) => Outcome::Response { status, body },
            Err(err) => Outcome::failed(&err),
        }
    }
}

impl Outcome {
    fn failed(err: &reqwest::Error) -> Self {
        // reqwest keeps the interesting part (refused, timed out, ...) in the source chain.
        let mut error = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            write!(error, ": {cause}").ok();
            source = cause.source();
        }

        Outcome::Failed { error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_url_from_parts() {
        let timeout = Duration::from_secs(1);

        let target = HttpTarget::new("localhost", 8080, "heavywork", timeout).unwrap();
        assert_eq!(target.url(), "http://localhost:8080/heavywork");
        assert_eq!(target.path(), "/heavywork");

        let target = HttpTarget::new("127.0.0.1", 80, "/lightwork", timeout).unwrap();
        assert_eq!(target.url(), "http://127.0.0.1/lightwork");
    }

    #[test]
    fn rejects_invalid_host() {
        let err = HttpTarget::new("not a host", 80, "x", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, TargetError::InvalidUrl { .. }), "{err}");
    }
}
