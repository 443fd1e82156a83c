// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Session-scoped request builder
//!
//! A [`Session`] accumulates the target URL, headers, explicitly attached
//! cookies and a per-call timeout. Every `get`/`post` turns that state into
//! a fresh wire request and dispatches it through the session's client.
//! Cookies ride on the client's cookie provider rather than on the request,
//! so explicit and jar cookies are recomputed on every redirect hop.

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, COOKIE};
use reqwest::Method;
use tracing::debug;
use url::{form_urlencoded, Url};

use super::client::{ClientConfig, HttpClient};
use super::cookie::{Cookie, CookieJar, SessionCookies};
use super::header_list::HeaderList;
use super::response::Response;
use super::DEFAULT_CONTENT_TYPE;
use crate::error::{Error, Result};

/// Empty parameter set for [`Session::get`]
pub const NO_PARAMS: [(&str, &str); 0] = [];

/// Request builder bound to a cookie jar and a shared client
#[derive(Debug)]
pub struct Session {
    url: Url,
    timeout: Duration,
    headers: HeaderList,
    /// Sent on every request regardless of scope
    cookies: Vec<Cookie>,
    /// Explicit cookies plus the jar, installed on `client`
    cookie_store: Arc<SessionCookies>,
    client: HttpClient,
}

impl Session {
    /// Start a session against `url` with a fresh cookie jar and a default
    /// client (keep-alive, compression and TLS verification on, no timeout).
    pub fn new(url: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(url.as_ref())?;
        let cookie_store = Arc::new(SessionCookies::new(Arc::new(CookieJar::new())));
        let client =
            HttpClient::assemble(ClientConfig::default(), Some(Arc::clone(&cookie_store)))?;
        Ok(Self::assemble(url, cookie_store, client))
    }

    /// Start a session with a fresh cookie jar bound onto `client`
    pub fn with_client(url: impl AsRef<str>, client: &HttpClient) -> Result<Self> {
        let url = Url::parse(url.as_ref())?;
        let cookie_store = Arc::new(SessionCookies::new(Arc::new(CookieJar::new())));
        let client = client.with_cookies(Arc::clone(&cookie_store))?;
        Ok(Self::assemble(url, cookie_store, client))
    }

    fn assemble(url: Url, cookie_store: Arc<SessionCookies>, client: HttpClient) -> Self {
        Self {
            url,
            timeout: Duration::ZERO,
            headers: HeaderList::new(),
            cookies: Vec::new(),
            cookie_store,
            client,
        }
    }

    /// Replace the target URL. On error the previous URL is kept.
    pub fn set_url(&mut self, url: impl AsRef<str>) -> Result<()> {
        self.url = Url::parse(url.as_ref())?;
        Ok(())
    }

    /// Per-call timeout; zero falls back to the client's timeout
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Append a header value. Validated at dispatch.
    ///
    /// `Cookie` values are sent through the cookie provider, ahead of the
    /// explicit and jar cookies attached after them.
    pub fn add_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        if key.eq_ignore_ascii_case(COOKIE.as_str()) {
            self.cookie_store.push(value.clone());
        }
        self.headers.add(key, value);
    }

    /// Attach a cookie to every subsequent request, independent of the jar
    pub fn add_cookie(&mut self, cookie: Cookie) {
        self.cookie_store.push(cookie.to_header_value());
        self.cookies.push(cookie);
    }

    /// Append an `Authorization: Basic` header
    pub fn set_basic_auth(&mut self, username: &str, password: &str) {
        let encoded = STANDARD.encode(format!("{}:{}", username, password));
        self.add_header(AUTHORIZATION.as_str(), format!("Basic {}", encoded));
    }

    /// Append an `Authorization: Bearer` header
    pub fn set_bearer_auth(&mut self, token: &str) {
        self.add_header(AUTHORIZATION.as_str(), format!("Bearer {}", token));
    }

    /// Swap the transport, re-binding this session's jar onto it
    pub fn set_client(&mut self, client: &HttpClient) -> Result<()> {
        self.client = client.with_cookies(Arc::clone(&self.cookie_store))?;
        Ok(())
    }

    /// Current target URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Per-call timeout (zero = client timeout)
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Headers sent with every request
    pub fn headers(&self) -> &HeaderList {
        &self.headers
    }

    /// Explicitly attached cookies
    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    /// The session's cookie jar
    pub fn jar(&self) -> &Arc<CookieJar> {
        self.cookie_store.jar()
    }

    /// The client requests are dispatched through
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Send a GET request.
    ///
    /// Non-empty `params` are appended to the URL's query (existing keys are
    /// kept, duplicates accumulate) and the rewritten query stays on the
    /// session.
    pub async fn get<I, K, V>(&mut self, params: I) -> Result<Response>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = params.into_iter().peekable();
        if params.peek().is_some() {
            let mut pairs = parse_query(self.url.query().unwrap_or(""))?;
            pairs.extend(params.map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string())));
            self.url.query_pairs_mut().clear().extend_pairs(&pairs);
        }

        let headers = self.wire_headers()?;
        self.send(Method::GET, headers, None).await
    }

    /// Send a POST request with `body` as the literal payload.
    ///
    /// An empty `content_type` means `text/html; charset=UTF-8`. The given
    /// content type replaces any `Content-Type` added with `add_header`.
    pub async fn post(&self, content_type: &str, body: impl Into<String>) -> Result<Response> {
        let content_type = if content_type.is_empty() {
            DEFAULT_CONTENT_TYPE
        } else {
            content_type
        };

        let mut headers = self.wire_headers()?;
        let value = HeaderValue::from_str(content_type)
            .map_err(|e| Error::request_build(format!("invalid content type: {}", e)))?;
        headers.insert(CONTENT_TYPE, value);

        self.send(Method::POST, headers, Some(Bytes::from(body.into())))
            .await
    }

    /// Builder headers for the wire. `Cookie` is left to the cookie provider,
    /// which the transport only consults when the request carries none.
    fn wire_headers(&self) -> Result<HeaderMap> {
        let mut headers = self.headers.to_header_map()?;
        headers.remove(COOKIE);
        self.cookie_store.header(&self.url)?;
        Ok(headers)
    }

    async fn send(
        &self,
        method: Method,
        headers: HeaderMap,
        body: Option<Bytes>,
    ) -> Result<Response> {
        debug!(
            %method,
            url = %self.url,
            headers = headers.len(),
            explicit_cookies = self.cookie_store.explicit_len(),
            "dispatching request"
        );

        let mut builder = self
            .client
            .inner()
            .request(method, self.url.clone())
            .headers(headers);

        if let Some(body) = body {
            builder = builder.body(body);
        }

        if !self.timeout.is_zero() {
            builder = builder.timeout(self.timeout);
        }

        let response = builder.send().await.map_err(Error::from_send)?;
        debug!(status = %response.status(), url = %response.url(), "response received");

        Ok(Response::new(response))
    }
}

/// Parse a raw query string, rejecting what a strict parser would reject:
/// `;` separators and malformed percent-escapes.
fn parse_query(raw: &str) -> Result<Vec<(String, String)>> {
    if raw.contains(';') {
        return Err(Error::request_build("invalid semicolon separator in query"));
    }

    let bytes = raw.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .map_or(false, |hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return Err(Error::request_build(format!(
                    "invalid percent-escape in query at byte {}",
                    i
                )));
            }
        }
    }

    Ok(form_urlencoded::parse(bytes).into_owned().collect())
}
