// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookie jar implementation for persistent cookie storage
//!
//! The jar is scoped by registrable domain and path. A session wraps it,
//! together with its explicit cookies, in the transport's cookie provider,
//! so `Set-Cookie` headers are stored and `Cookie` headers attached on every
//! hop without the caller's involvement.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;
use tracing::trace;
use url::Url;

use super::public_suffix;
use crate::error::{Error, Result};

/// A single HTTP cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Domain the cookie belongs to
    pub domain: String,
    /// Path the cookie is valid for
    pub path: String,
    /// Expiration time (None = session cookie)
    pub expires: Option<DateTime<Utc>>,
    /// Secure flag (HTTPS only)
    pub secure: bool,
    /// HttpOnly flag (not accessible via JavaScript)
    pub http_only: bool,
    /// SameSite attribute
    pub same_site: SameSite,
    /// Only sent to the exact host that set it (no `Domain` attribute)
    pub host_only: bool,
}

/// SameSite cookie attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    /// Cookie sent with all requests
    #[default]
    None,
    /// Cookie sent with same-site and top-level navigations
    Lax,
    /// Cookie only sent with same-site requests
    Strict,
}

impl Cookie {
    /// Create a new cookie
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: String::new(),
            path: String::new(),
            expires: None,
            secure: false,
            http_only: false,
            same_site: SameSite::default(),
            host_only: false,
        }
    }

    /// Check if the cookie is expired
    pub fn is_expired(&self) -> bool {
        self.expires.map_or(false, |exp| exp <= Utc::now())
    }

    /// Check if a stored cookie should be sent to the given URL
    pub fn matches(&self, url: &Url) -> bool {
        let host = match url.host_str() {
            Some(host) => host.to_lowercase(),
            None => return false,
        };

        let domain_ok = if self.host_only {
            host == self.domain
        } else {
            public_suffix::domain_match(&host, &self.domain)
        };

        domain_ok
            && path_match(url.path(), &self.path)
            && (!self.secure || is_secure_scheme(url))
            && !self.is_expired()
    }

    /// Parse a Set-Cookie header value.
    ///
    /// Attributes are returned as written; scoping against the request URL
    /// happens when the cookie is stored in a [`CookieJar`].
    pub fn parse(header: &str) -> Option<Self> {
        let mut parts = header.split(';');
        let (name, value) = parts.next()?.trim().split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);
        let mut cookie = Cookie::new(name, value);

        // Max-Age wins over Expires regardless of order.
        let mut max_age_seen = false;

        for part in parts {
            let part = part.trim();
            let (attr, val) = part.split_once('=').unwrap_or((part, ""));
            let val = val.trim();
            match attr.trim().to_lowercase().as_str() {
                "domain" => cookie.domain = val.trim_start_matches('.').to_lowercase(),
                "path" => cookie.path = val.to_string(),
                "expires" if !max_age_seen => {
                    if let Some(dt) = parse_expires(val) {
                        cookie.expires = Some(dt);
                    }
                }
                "max-age" => {
                    if let Ok(secs) = val.parse::<i64>() {
                        max_age_seen = true;
                        cookie.expires = Some(if secs <= 0 {
                            DateTime::<Utc>::MIN_UTC
                        } else {
                            chrono::Duration::try_seconds(secs)
                                .and_then(|d| Utc::now().checked_add_signed(d))
                                .unwrap_or(DateTime::<Utc>::MAX_UTC)
                        });
                    }
                }
                "samesite" => {
                    cookie.same_site = match val.to_lowercase().as_str() {
                        "strict" => SameSite::Strict,
                        "lax" => SameSite::Lax,
                        _ => SameSite::None,
                    };
                }
                "secure" => cookie.secure = true,
                "httponly" => cookie.http_only = true,
                _ => {}
            }
        }

        Some(cookie)
    }

    /// Convert to cookie header format
    pub fn to_header_value(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

fn parse_expires(val: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc2822(val) {
        return Some(dt.with_timezone(&Utc));
    }
    // Netscape draft format: "Wed, 21-Oct-2015 07:28:00 GMT"
    NaiveDateTime::parse_from_str(val, "%a, %d-%b-%Y %H:%M:%S GMT")
        .ok()
        .map(|naive| naive.and_utc())
}

fn is_secure_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "https" | "wss")
}

/// RFC 6265 path-match
fn path_match(request_path: &str, cookie_path: &str) -> bool {
    if request_path == cookie_path {
        return true;
    }
    request_path.starts_with(cookie_path)
        && (cookie_path.ends_with('/')
            || request_path.as_bytes().get(cookie_path.len()) == Some(&b'/'))
}

/// RFC 6265 default-path: the directory of the request path
fn default_path(request_path: &str) -> String {
    if !request_path.starts_with('/') {
        return "/".to_string();
    }
    match request_path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(i) => request_path[..i].to_string(),
    }
}

#[derive(Debug, Clone)]
struct Entry {
    cookie: Cookie,
    /// Insertion sequence, kept across overwrites so send order is stable
    seq: u64,
}

/// Thread-safe, public-suffix-aware cookie storage
#[derive(Debug, Default)]
pub struct CookieJar {
    /// Cookies stored by registrable domain
    cookies: DashMap<String, Vec<Entry>>,
    next_seq: AtomicU64,
}

impl CookieJar {
    /// Create a new empty cookie jar
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a cookie received from `url`.
    ///
    /// The cookie's domain and path are resolved against the URL. Returns
    /// `false` when the cookie was rejected because its `Domain` attribute
    /// points outside the request host's registrable domain.
    pub fn insert(&self, mut cookie: Cookie, url: &Url) -> bool {
        let host = match url.host_str() {
            Some(host) => host.to_lowercase(),
            None => return false,
        };

        if cookie.domain.is_empty() {
            cookie.host_only = true;
            cookie.domain = host.clone();
        } else {
            let domain = cookie.domain.trim_start_matches('.').to_lowercase();
            if public_suffix::is_ip(&host) {
                if domain != host {
                    trace!(cookie = %cookie.name, %domain, %host, "rejecting cookie: domain on IP host");
                    return false;
                }
                cookie.host_only = true;
            } else if public_suffix::is_public_suffix(&domain) {
                if domain != host {
                    trace!(cookie = %cookie.name, %domain, "rejecting cookie: public suffix domain");
                    return false;
                }
                cookie.host_only = true;
            } else if !public_suffix::domain_match(&host, &domain) {
                trace!(cookie = %cookie.name, %domain, %host, "rejecting cookie: domain mismatch");
                return false;
            } else {
                cookie.host_only = false;
            }
            cookie.domain = domain;
        }

        if !cookie.path.starts_with('/') {
            cookie.path = default_path(url.path());
        }

        let key = public_suffix::jar_key(&cookie.domain);
        let same_scope = |e: &Entry| {
            e.cookie.name == cookie.name
                && e.cookie.domain == cookie.domain
                && e.cookie.path == cookie.path
        };

        if cookie.is_expired() {
            let emptied = match self.cookies.get_mut(&key) {
                Some(mut entries) => {
                    if entries.iter().any(|e| same_scope(e)) {
                        trace!(cookie = %cookie.name, domain = %cookie.domain, "deleting cookie");
                    }
                    entries.retain(|e| !same_scope(e) && !e.cookie.is_expired());
                    entries.is_empty()
                }
                None => false,
            };
            if emptied {
                self.cookies.remove_if(&key, |_, entries| entries.is_empty());
            }
            return true;
        }

        let mut entries = self.cookies.entry(key).or_default();
        entries.retain(|e| !e.cookie.is_expired());
        let existing = entries.iter().position(|e| same_scope(e));

        trace!(cookie = %cookie.name, domain = %cookie.domain, path = %cookie.path, "storing cookie");
        match existing {
            Some(i) => entries[i].cookie = cookie,
            None => {
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                entries.push(Entry { cookie, seq });
            }
        }
        true
    }

    /// Add a cookie from a Set-Cookie header
    pub fn add_from_header(&self, header: &str, url: &Url) -> bool {
        match Cookie::parse(header) {
            Some(cookie) => self.insert(cookie, url),
            None => false,
        }
    }

    /// Get all cookies that should be sent to a URL.
    ///
    /// Longer paths come first, then older cookies.
    pub fn get_cookies(&self, url: &Url) -> Vec<Cookie> {
        let host = match url.host_str() {
            Some(host) => host.to_lowercase(),
            None => return Vec::new(),
        };

        let Some(mut entries) = self.cookies.get_mut(&public_suffix::jar_key(&host)) else {
            return Vec::new();
        };
        entries.retain(|e| !e.cookie.is_expired());

        let mut matched: Vec<&Entry> = entries.iter().filter(|e| e.cookie.matches(url)).collect();
        matched.sort_by(|a, b| {
            b.cookie
                .path
                .len()
                .cmp(&a.cookie.path.len())
                .then(a.seq.cmp(&b.seq))
        });
        matched.into_iter().map(|e| e.cookie.clone()).collect()
    }

    /// Get Cookie header value for a URL
    pub fn get_cookie_header(&self, url: &Url) -> Option<String> {
        let cookies = self.get_cookies(url);
        if cookies.is_empty() {
            return None;
        }

        Some(
            cookies
                .iter()
                .map(|c| c.to_header_value())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Number of unexpired cookies. Expired ones are dropped on the way.
    pub fn len(&self) -> usize {
        self.cookies.retain(|_, entries| {
            entries.retain(|e| !e.cookie.is_expired());
            !entries.is_empty()
        });
        self.cookies.iter().map(|e| e.value().len()).sum()
    }

    /// Check if jar is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cookie provider installed on a session's transport.
///
/// Explicit cookies go out on every hop, redirects included, ahead of the
/// jar's cookies for that hop's URL. `Set-Cookie` headers land in the jar.
#[derive(Debug)]
pub(crate) struct SessionCookies {
    jar: Arc<CookieJar>,
    /// `name=value` pairs in the order they were attached
    explicit: RwLock<Vec<String>>,
}

impl SessionCookies {
    pub(crate) fn new(jar: Arc<CookieJar>) -> Self {
        Self {
            jar,
            explicit: RwLock::new(Vec::new()),
        }
    }

    pub(crate) fn jar(&self) -> &Arc<CookieJar> {
        &self.jar
    }

    /// Attach a raw `Cookie` header fragment sent on every request
    pub(crate) fn push(&self, pair: impl Into<String>) {
        self.explicit.write().push(pair.into());
    }

    pub(crate) fn explicit_len(&self) -> usize {
        self.explicit.read().len()
    }

    /// `Cookie` header for `url`: explicit cookies first, then the jar's
    pub(crate) fn header(&self, url: &Url) -> Result<Option<HeaderValue>> {
        let mut parts = self.explicit.read().clone();
        if let Some(jar_cookies) = self.jar.get_cookie_header(url) {
            parts.push(jar_cookies);
        }
        if parts.is_empty() {
            return Ok(None);
        }

        HeaderValue::from_str(&parts.join("; "))
            .map(Some)
            .map_err(|e| Error::request_build(format!("invalid cookie: {}", e)))
    }
}

impl CookieStore for SessionCookies {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        for header in cookie_headers {
            if let Ok(header) = header.to_str() {
                self.jar.add_from_header(header, url);
            }
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.header(url).ok().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_cookie_parsing() {
        let header = "session=abc123; Domain=.Example.com; Path=/; Secure; HttpOnly; SameSite=Lax";
        let cookie = Cookie::parse(header).unwrap();

        assert_eq!(cookie.name, "session");
        assert_eq!(cookie.value, "abc123");
        assert_eq!(cookie.domain, "example.com");
        assert_eq!(cookie.path, "/");
        assert!(cookie.secure);
        assert!(cookie.http_only);
        assert_eq!(cookie.same_site, SameSite::Lax);
    }

    #[test]
    fn test_cookie_parsing_rejects_nameless() {
        assert!(Cookie::parse("=value").is_none());
        assert!(Cookie::parse("novalue").is_none());
    }

    #[test]
    fn test_max_age_beats_expires() {
        let cookie =
            Cookie::parse("a=1; Max-Age=3600; Expires=Thu, 01 Jan 1970 00:00:00 GMT").unwrap();
        assert!(!cookie.is_expired());

        let cookie = Cookie::parse("a=1; Max-Age=0").unwrap();
        assert!(cookie.is_expired());
    }

    #[test]
    fn test_expires_formats() {
        let rfc = Cookie::parse("a=1; Expires=Wed, 21 Oct 2015 07:28:00 GMT").unwrap();
        let netscape = Cookie::parse("a=1; Expires=Wed, 21-Oct-2015 07:28:00 GMT").unwrap();
        assert!(rfc.expires.is_some());
        assert_eq!(rfc.expires, netscape.expires);
    }

    #[test]
    fn test_cookie_jar() {
        let jar = CookieJar::new();
        let origin = url("https://example.com/path");

        assert!(jar.add_from_header("test=value", &origin));
        assert_eq!(jar.len(), 1);

        let cookies = jar.get_cookies(&origin);
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].name, "test");
        assert!(cookies[0].host_only);
    }

    #[test]
    fn test_overwrite_same_scope() {
        let jar = CookieJar::new();
        let origin = url("http://example.com/");

        jar.add_from_header("a=1", &origin);
        jar.add_from_header("a=2", &origin);

        assert_eq!(jar.len(), 1);
        assert_eq!(jar.get_cookie_header(&origin).as_deref(), Some("a=2"));
    }

    #[test]
    fn test_deletion_via_max_age() {
        let jar = CookieJar::new();
        let origin = url("http://example.com/");

        jar.add_from_header("a=1", &origin);
        jar.add_from_header("a=; Max-Age=0", &origin);

        assert!(jar.is_empty());
        assert!(jar.get_cookie_header(&origin).is_none());
    }

    #[test]
    fn test_host_only_not_sent_to_subdomain() {
        let jar = CookieJar::new();
        jar.add_from_header("a=1", &url("http://example.com/"));

        assert!(jar.get_cookies(&url("http://www.example.com/")).is_empty());
        assert_eq!(jar.get_cookies(&url("http://example.com/")).len(), 1);
    }

    #[test]
    fn test_domain_cookie_shared_across_subdomains() {
        let jar = CookieJar::new();
        jar.add_from_header("a=1; Domain=example.com", &url("http://a.example.com/"));

        assert_eq!(jar.get_cookies(&url("http://b.example.com/")).len(), 1);
        assert_eq!(jar.get_cookies(&url("http://example.com/")).len(), 1);
        assert!(jar.get_cookies(&url("http://example.org/")).is_empty());
        assert!(jar.get_cookies(&url("http://notexample.com/")).is_empty());
    }

    #[test]
    fn test_public_suffix_domain_rejected() {
        let jar = CookieJar::new();
        let origin = url("http://foo.co.uk/");

        assert!(!jar.add_from_header("a=1; Domain=co.uk", &origin));
        assert!(jar.add_from_header("b=1", &origin));

        assert!(jar.get_cookies(&url("http://bar.co.uk/")).is_empty());
        assert_eq!(jar.get_cookies(&origin).len(), 1);
    }

    #[test]
    fn test_foreign_domain_rejected() {
        let jar = CookieJar::new();
        assert!(!jar.add_from_header("a=1; Domain=evil.com", &url("http://example.com/")));
        assert!(jar.is_empty());
    }

    #[test]
    fn test_ip_host() {
        let jar = CookieJar::new();
        let origin = url("http://127.0.0.1:8080/");

        assert!(jar.add_from_header("a=1", &origin));
        assert!(!jar.add_from_header("b=1; Domain=0.0.1", &origin));
        assert_eq!(jar.get_cookie_header(&origin).as_deref(), Some("a=1"));
    }

    #[test]
    fn test_secure_only_over_https() {
        let jar = CookieJar::new();
        jar.add_from_header("s=1; Secure", &url("https://example.com/"));

        assert!(jar.get_cookies(&url("http://example.com/")).is_empty());
        assert_eq!(jar.get_cookies(&url("https://example.com/")).len(), 1);
    }

    #[test]
    fn test_path_scoping_and_order() {
        let jar = CookieJar::new();
        let origin = url("http://example.com/app/login");

        jar.add_from_header("root=1; Path=/", &origin);
        jar.add_from_header("dir=1", &origin);

        assert_eq!(
            jar.get_cookie_header(&url("http://example.com/app/page")).as_deref(),
            Some("dir=1; root=1")
        );
        assert_eq!(
            jar.get_cookie_header(&url("http://example.com/application")).as_deref(),
            Some("root=1")
        );
    }

    #[test]
    fn test_default_path() {
        assert_eq!(default_path(""), "/");
        assert_eq!(default_path("/"), "/");
        assert_eq!(default_path("/login"), "/");
        assert_eq!(default_path("/app/login"), "/app");
    }

    #[test]
    fn test_expired_cookie_leaves_no_trace() {
        let jar = CookieJar::new();
        let origin = url("http://example.com/");

        assert!(jar.add_from_header("gone=1; Max-Age=0", &origin));
        assert!(jar.cookies.is_empty());
        assert_eq!(jar.len(), 0);

        jar.add_from_header("a=1", &origin);
        jar.add_from_header("a=; Expires=Thu, 01 Jan 1970 00:00:00 GMT", &origin);
        assert!(jar.cookies.is_empty());
    }

    #[test]
    fn test_len_skips_cookies_that_expired_in_place() {
        let jar = CookieJar::new();
        let origin = url("http://example.com/");

        let mut short = Cookie::new("short", "1");
        short.expires = Some(Utc::now() + chrono::Duration::milliseconds(50));
        assert!(jar.insert(short, &origin));
        jar.add_from_header("long=1", &origin);
        assert_eq!(jar.len(), 2);

        std::thread::sleep(std::time::Duration::from_millis(100));
        assert_eq!(jar.len(), 1);
        assert_eq!(jar.get_cookie_header(&origin).as_deref(), Some("long=1"));
    }

    #[test]
    fn test_default_rule_suffix_domain_rejected() {
        let jar = CookieJar::new();
        let origin = url("http://foo.test/");

        assert!(!jar.add_from_header("a=1; Domain=test", &origin));
        assert!(jar.add_from_header("b=1; Domain=foo.test", &origin));

        assert!(jar.get_cookies(&url("http://bar.test/")).is_empty());
        assert_eq!(jar.get_cookie_header(&origin).as_deref(), Some("b=1"));
    }

    #[test]
    fn test_session_cookies_hooks() {
        let jar = Arc::new(CookieJar::new());
        let store = SessionCookies::new(Arc::clone(&jar));
        let origin = url("http://example.com/");
        let headers = [
            HeaderValue::from_static("a=1"),
            HeaderValue::from_static("b=2; Path=/"),
        ];

        assert!(CookieStore::cookies(&store, &origin).is_none());

        store.set_cookies(&mut headers.iter(), &origin);
        assert_eq!(jar.len(), 2);

        store.push("explicit=x");
        let header = CookieStore::cookies(&store, &origin).unwrap();
        assert_eq!(header.to_str().unwrap(), "explicit=x; a=1; b=2");

        // Explicit cookies ignore scope.
        let header = CookieStore::cookies(&store, &url("http://other.org/")).unwrap();
        assert_eq!(header.to_str().unwrap(), "explicit=x");
    }

    #[test]
    fn test_session_cookies_rejects_invalid_value() {
        let store = SessionCookies::new(Arc::new(CookieJar::new()));
        store.push("bad=\nvalue");

        let err = store.header(&url("http://example.com/")).unwrap_err();
        assert!(err.is_request_build());
        assert!(CookieStore::cookies(&store, &url("http://example.com/")).is_none());
    }
}
