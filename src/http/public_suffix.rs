// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Public Suffix List helpers for cookie domain scoping.
//!
//! Cookies must never cross a registrable-domain boundary: `a.co.uk` and
//! `b.co.uk` are different sites even though they share a suffix.

use std::net::IpAddr;

use psl::{List, Psl};

/// Check if a domain is a public suffix (e.g. "com", "co.uk").
///
/// Single labels missing from the list (e.g. "test") count too, following
/// the list's default `*` rule.
pub fn is_public_suffix(domain: &str) -> bool {
    let domain = normalize(domain);
    List.suffix(domain.as_bytes())
        .map_or(false, |suffix| suffix.as_bytes() == domain.as_bytes())
}

/// Get the registrable domain (eTLD+1) of a host.
///
/// Returns `None` for IP addresses and for hosts that are themselves a
/// public suffix.
pub fn registrable_domain(host: &str) -> Option<String> {
    let host = normalize(host);
    if is_ip(&host) {
        return None;
    }
    psl::domain(host.as_bytes())
        .and_then(|d| std::str::from_utf8(d.as_bytes()).ok())
        .map(str::to_string)
}

/// Key under which cookies for `host` are stored.
///
/// Hosts sharing a registrable domain share a key, so a lookup only has to
/// scan the cookies that could possibly match.
pub fn jar_key(host: &str) -> String {
    registrable_domain(host).unwrap_or_else(|| normalize(host))
}

/// Whether `host` is an IP literal (v4 or bracketed/unbracketed v6).
pub fn is_ip(host: &str) -> bool {
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<IpAddr>()
        .is_ok()
}

/// RFC 6265 domain-match: `host` equals `domain` or is a subdomain of it.
pub fn domain_match(host: &str, domain: &str) -> bool {
    if host == domain {
        return true;
    }
    !is_ip(host)
        && host.len() > domain.len()
        && host.ends_with(domain)
        && host.as_bytes()[host.len() - domain.len() - 1] == b'.'
}

fn normalize(domain: &str) -> String {
    domain.trim_start_matches('.').trim_end_matches('.').to_lowercase()
}
