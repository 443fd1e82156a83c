// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for httpsession
//!
//! Every failure is returned to the caller. Nothing is retried internally;
//! retry and backoff are the caller's concern.

use thiserror::Error;

/// Result type alias for httpsession operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for httpsession
#[derive(Error, Debug)]
pub enum Error {
    /// URL parsing failed (session init or `set_url`)
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The outgoing request could not be constructed
    #[error("Invalid request: {0}")]
    RequestBuild(String),

    /// DNS, connect, TLS or timeout failure while dispatching
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Reading the response body failed
    #[error("Failed to read response body: {0}")]
    Read(#[source] reqwest::Error),

    /// The transport backend could not be initialized
    #[error("Client configuration error: {0}")]
    Client(#[source] reqwest::Error),

    /// I/O error (runtime setup for the blocking facade)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new request build error
    pub fn request_build<S: Into<String>>(msg: S) -> Self {
        Error::RequestBuild(msg.into())
    }

    /// Classify an error returned by `reqwest` while sending a request.
    ///
    /// Builder failures (bad header, unsupported URL) are the caller's fault
    /// and never reached the network.
    pub(crate) fn from_send(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Error::RequestBuild(err.to_string())
        } else {
            Error::Network(err)
        }
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Network(e) | Error::Read(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Check if this is a network error
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_))
    }

    /// Check if this is a URL parse error
    pub fn is_url(&self) -> bool {
        matches!(self, Error::Url(_))
    }

    /// Check if this is a request build error
    pub fn is_request_build(&self) -> bool {
        matches!(self, Error::RequestBuild(_))
    }
}
