// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP response types

use reqwest::header::{HeaderMap, SET_COOKIE};
use reqwest::StatusCode;
use url::Url;

use crate::error::{Error, Result};

/// Response whose body has not been read yet.
///
/// The body is consumed by [`Response::body`] (or [`get_body`]), which takes
/// the response by value: it can be read once, and the underlying stream is
/// released when the read finishes or fails.
#[derive(Debug)]
pub struct Response {
    inner: reqwest::Response,
}

impl Response {
    pub(crate) fn new(inner: reqwest::Response) -> Self {
        Self { inner }
    }

    /// Response status code
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    /// Response headers
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Final URL (after redirects)
    pub fn url(&self) -> &Url {
        self.inner.url()
    }

    /// Get Set-Cookie headers
    pub fn set_cookies(&self) -> Vec<&str> {
        self.headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    /// Read the entire body as text.
    ///
    /// Invalid UTF-8 is replaced lossily. On failure nothing of the body is
    /// returned.
    pub async fn body(self) -> Result<String> {
        let bytes = self.inner.bytes().await.map_err(Error::Read)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Read the whole body of `response` into a string
pub async fn get_body(response: Response) -> Result<String> {
    response.body().await
}
