// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # httpsession - Session-oriented HTTP requests
//!
//! A small request builder that keeps cookies flowing between calls.
//!
//! ## Features
//!
//! - Session builder: target URL, ordered multi-value headers, explicit cookies
//! - Cookie jar: domain/path scoped, public-suffix aware, updated on every hop
//! - Shared client: keep-alive, compression and TLS verification toggles
//! - Auth helpers: Basic and Bearer `Authorization` headers
//! - Per-call timeout override on top of the client timeout
//! - Blocking facade for callers without an async runtime
//!
//! ## Example
//!
//! ```rust,no_run
//! use httpsession::{get_body, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = Session::new("https://example.com/login")?;
//!     session.set_basic_auth("user", "secret");
//!
//!     // Cookies set here are sent with the next request.
//!     let response = session.post("application/x-www-form-urlencoded", "remember=1").await?;
//!     println!("{}", get_body(response).await?);
//!
//!     session.set_url("https://example.com/account")?;
//!     let response = session.get([("tab", "profile")]).await?;
//!     println!("{}", get_body(response).await?);
//!
//!     Ok(())
//! }
//! ```

pub mod blocking;
pub mod error;
pub mod http;

// Errors
pub use error::{Error, Result};

// HTTP
pub use http::{get_body, init_client, ClientConfig, HttpClient, Response, Session, NO_PARAMS};
pub use http::{Cookie, CookieJar, HeaderList, SameSite};
pub use http::DEFAULT_CONTENT_TYPE;

/// httpsession version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
