//! Errors raised while talking to the remote APIs.

use std::io::Write;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("{status} for {endpoint}{}", body_suffix(.body))]
    Status {
        status: StatusCode,
        endpoint: String,
        body: String,
    },

    /// DNS, connect, timeout or body read failure. The URL is stripped
    /// because it carries the API key.
    #[error("{0}")]
    Request(reqwest::Error),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

fn body_suffix(body: &str) -> String {
    if body.is_empty() { String::new() } else { format!(": {body}") }
}

impl ApiError {
    pub(crate) fn request(err: reqwest::Error) -> Self {
        Self::Request(err.without_url())
    }

    /// Whether this is an HTTP status error as opposed to a transport one.
    pub fn is_http(&self) -> bool {
        matches!(self, Self::Status { .. })
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Console prefix for the error tier.
    pub fn prefix(&self) -> &'static str {
        if self.is_http() { "HTTP error" } else { "Request error" }
    }

    /// Write a one-line diagnostic to `out` and log it.
    pub fn report(&self, out: &mut impl Write) {
        tracing::warn!(error = %self, http = self.is_http(), "request failed");
        // Best effort.
        let _ = writeln!(out, "{}: {}", self.prefix(), self);
    }
}
