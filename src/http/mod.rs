// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer for httpsession
//!
//! Provides a session-scoped request builder on top of a shared client,
//! with a public-suffix-aware cookie jar carrying cookies between calls.

mod client;
mod cookie;
mod header_list;
pub mod public_suffix;
mod request;
mod response;

pub use client::{init_client, ClientConfig, HttpClient};
pub use cookie::{Cookie, CookieJar, SameSite};
pub use header_list::HeaderList;
pub use request::{Session, NO_PARAMS};
pub use response::{get_body, Response};

/// Content type sent by `post` when the caller passes none
pub const DEFAULT_CONTENT_TYPE: &str = "text/html; charset=UTF-8";
