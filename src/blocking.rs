// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Blocking session API
//!
//! Mirrors [`crate::Session`] for callers without an async runtime. Each
//! session owns a current-thread Tokio runtime that drives its requests and
//! the body reads of the responses it hands out.
//!
//! These types must not be created, used or dropped from inside an async
//! context.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use tokio::runtime::{Builder, Runtime};
use url::Url;

use crate::error::Result;
use crate::http::{self, Cookie, CookieJar, HeaderList, HttpClient};

/// Blocking request builder bound to a cookie jar and a shared client
#[derive(Debug)]
pub struct Session {
    inner: http::Session,
    runtime: Arc<Runtime>,
}

impl Session {
    /// Start a session against `url` with a fresh jar and a default client
    pub fn new(url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            inner: http::Session::new(url)?,
            runtime: Arc::new(runtime()?),
        })
    }

    /// Start a session with a fresh jar bound onto `client`
    pub fn with_client(url: impl AsRef<str>, client: &HttpClient) -> Result<Self> {
        Ok(Self {
            inner: http::Session::with_client(url, client)?,
            runtime: Arc::new(runtime()?),
        })
    }

    /// Replace the target URL. On error the previous URL is kept.
    pub fn set_url(&mut self, url: impl AsRef<str>) -> Result<()> {
        self.inner.set_url(url)
    }

    /// Per-call timeout; zero falls back to the client's timeout
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.inner.set_timeout(timeout);
    }

    /// Append a header value. Validated at dispatch.
    pub fn add_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.add_header(key, value);
    }

    /// Attach a cookie to every subsequent request, independent of the jar
    pub fn add_cookie(&mut self, cookie: Cookie) {
        self.inner.add_cookie(cookie);
    }

    /// Append an `Authorization: Basic` header
    pub fn set_basic_auth(&mut self, username: &str, password: &str) {
        self.inner.set_basic_auth(username, password);
    }

    /// Append an `Authorization: Bearer` header
    pub fn set_bearer_auth(&mut self, token: &str) {
        self.inner.set_bearer_auth(token);
    }

    /// Swap the transport, re-binding this session's jar onto it
    pub fn set_client(&mut self, client: &HttpClient) -> Result<()> {
        self.inner.set_client(client)
    }

    /// Current target URL
    pub fn url(&self) -> &Url {
        self.inner.url()
    }

    /// Per-call timeout (zero = client timeout)
    pub fn timeout(&self) -> Duration {
        self.inner.timeout()
    }

    /// Headers sent with every request
    pub fn headers(&self) -> &HeaderList {
        self.inner.headers()
    }

    /// Explicitly attached cookies
    pub fn cookies(&self) -> &[Cookie] {
        self.inner.cookies()
    }

    /// The session's cookie jar
    pub fn jar(&self) -> &Arc<CookieJar> {
        self.inner.jar()
    }

    /// The client requests are dispatched through
    pub fn client(&self) -> &HttpClient {
        self.inner.client()
    }

    /// Send a GET request, blocking until the response headers arrive
    pub fn get<I, K, V>(&mut self, params: I) -> Result<Response>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let response = self.runtime.block_on(self.inner.get(params))?;
        Ok(self.wrap(response))
    }

    /// Send a POST request, blocking until the response headers arrive
    pub fn post(&self, content_type: &str, body: impl Into<String>) -> Result<Response> {
        let response = self.runtime.block_on(self.inner.post(content_type, body))?;
        Ok(self.wrap(response))
    }

    fn wrap(&self, inner: http::Response) -> Response {
        Response {
            inner,
            runtime: Arc::clone(&self.runtime),
        }
    }
}

/// Blocking response whose body has not been read yet
#[derive(Debug)]
pub struct Response {
    inner: http::Response,
    runtime: Arc<Runtime>,
}

impl Response {
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

    /// `Set-Cookie` header values of this response
    pub fn set_cookies(&self) -> Vec<&str> {
        self.inner.set_cookies()
    }

    /// Read the entire body as text, consuming the response
    pub fn body(self) -> Result<String> {
        let Self { inner, runtime } = self;
        runtime.block_on(inner.body())
    }
}

/// Read the whole body of `response` into a string
pub fn get_body(response: Response) -> Result<String> {
    response.body()
}

fn runtime() -> Result<Runtime> {
    Ok(Builder::new_current_thread().enable_all().build()?)
}
