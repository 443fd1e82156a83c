// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

#![allow(dead_code)]

use wiremock::{Request, Respond, ResponseTemplate};

pub const FIRST: &str = "First Call!";
pub const SECOND: &str = "Second Call!";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Values of every `Cookie` header on the request, split into `name=value`
pub fn request_cookies(request: &Request) -> Vec<String> {
    request
        .headers
        .get_all("cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}

/// First call sets `myCustomCookie=1`; a call presenting it gets the second
/// reply and an extra cookie.
pub struct CookieHandshake;

impl Respond for CookieHandshake {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        if request_cookies(request).iter().any(|c| c == "myCustomCookie=1") {
            ResponseTemplate::new(200)
                .append_header("set-cookie", "mySecondCookie=1")
                .set_body_string(SECOND)
        } else {
            ResponseTemplate::new(200)
                .append_header("set-cookie", "myCustomCookie=1")
                .set_body_string(FIRST)
        }
    }
}

/// Replies with the request body unchanged
pub struct Echo;

impl Respond for Echo {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_bytes(request.body.clone())
    }
}
