// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client implementation

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use super::cookie::{CookieJar, SessionCookies};
use crate::error::{Error, Result};

/// HTTP client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Close connections after each request instead of pooling them
    pub disable_keep_alive: bool,
    /// Do not advertise or decode gzip/brotli responses
    pub disable_compression: bool,
    /// Accept invalid certificates (dangerous!)
    pub skip_tls_verify: bool,
    /// Timeout for the whole request lifecycle (zero = unbounded)
    pub timeout: Duration,
}

/// Shared transport handle.
///
/// Clones share the connection pool and the bound cookie jar. The jar is
/// installed as the transport's cookie provider, so every hop (redirects
/// included) reads from and writes to it.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: ClientConfig,
    cookies: Option<Arc<SessionCookies>>,
}

/// Build a client with the given transport toggles and no cookie jar.
pub fn init_client(
    disable_keep_alive: bool,
    disable_compression: bool,
    skip_tls_verify: bool,
    timeout: Duration,
) -> Result<HttpClient> {
    HttpClient::with_config(ClientConfig {
        disable_keep_alive,
        disable_compression,
        skip_tls_verify,
        timeout,
    })
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::assemble(config, None)
    }

    /// Rebuild this client with `jar` as its cookie store.
    ///
    /// The configuration is kept; the connection pool is not.
    pub fn with_jar(&self, jar: Arc<CookieJar>) -> Result<Self> {
        self.with_cookies(Arc::new(SessionCookies::new(jar)))
    }

    /// Rebuild this client around a session's cookie provider
    pub(crate) fn with_cookies(&self, cookies: Arc<SessionCookies>) -> Result<Self> {
        Self::assemble(self.config.clone(), Some(cookies))
    }

    pub(crate) fn assemble(
        config: ClientConfig,
        cookies: Option<Arc<SessionCookies>>,
    ) -> Result<Self> {
        let client = build(&config, cookies.as_ref())?;
        Ok(Self {
            client,
            config,
            cookies,
        })
    }

    /// Get the bound cookie jar, if any
    pub fn cookie_jar(&self) -> Option<&Arc<CookieJar>> {
        self.cookies.as_deref().map(SessionCookies::jar)
    }

    /// Get client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn inner(&self) -> &Client {
        &self.client
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_cookie_jar", &self.cookies.is_some())
            .finish()
    }
}

fn build(config: &ClientConfig, cookies: Option<&Arc<SessionCookies>>) -> Result<Client> {
    if config.skip_tls_verify {
        warn!("TLS certificate verification is disabled");
    }

    let mut builder = Client::builder()
        .danger_accept_invalid_certs(config.skip_tls_verify)
        .gzip(!config.disable_compression)
        .brotli(!config.disable_compression);

    if config.disable_keep_alive {
        builder = builder.pool_max_idle_per_host(0);
    }

    if !config.timeout.is_zero() {
        builder = builder.timeout(config.timeout);
    }

    if let Some(cookies) = cookies {
        builder = builder.cookie_provider(Arc::clone(cookies));
    }

    debug!(?config, with_jar = cookies.is_some(), "building HTTP client");
    builder.build().map_err(Error::Client)
}
