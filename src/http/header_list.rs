// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Ordered header multi-map
//!
//! Keys compare case-insensitively and keep the spelling of their first
//! insertion. Values under a key keep insertion order; key order is not
//! significant on the wire.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::{Error, Result};

/// Header name to ordered list of values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderList {
    entries: Vec<(String, Vec<String>)>,
}

impl HeaderList {
    /// Create an empty header list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under `key`
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(i) => self.entries[i].1.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// First value stored under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).first().map(String::as_str)
    }

    /// Every value stored under `key`, in insertion order
    pub fn get_all(&self, key: &str) -> &[String] {
        match self.position(key) {
            Some(i) => &self.entries[i].1,
            None => &[],
        }
    }

    /// Iterate over `(name, value)` pairs, one per value
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no header was added
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert into a transport header map.
    ///
    /// Names and values are only validated here, so a malformed header
    /// surfaces as a request build error at dispatch time.
    pub fn to_header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();
        for (name, value) in self.iter() {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::request_build(format!("invalid header name {:?}: {}", name, e)))?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                Error::request_build(format!("invalid value for header {:?}: {}", name, e))
            })?;
            map.append(header_name, header_value);
        }
        Ok(map)
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_value_order() {
        let mut headers = HeaderList::new();
        headers.add("X-Token", "first");
        headers.add("accept", "*/*");
        headers.add("x-token", "second");

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("X-TOKEN"), Some("first"));
        assert_eq!(headers.get_all("x-token"), ["first", "second"]);
        assert!(headers.get_all("missing").is_empty());
    }

    #[test]
    fn test_to_header_map() {
        let mut headers = HeaderList::new();
        headers.add("X-Token", "first");
        headers.add("X-Token", "second");

        let map = headers.to_header_map().unwrap();
        let values: Vec<_> = map
            .get_all("x-token")
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(values, ["first", "second"]);
    }

    #[test]
    fn test_invalid_header_fails_at_conversion() {
        let mut headers = HeaderList::new();
        headers.add("bad header", "value");
        assert!(headers.to_header_map().unwrap_err().is_request_build());

        let mut headers = HeaderList::new();
        headers.add("x-ok", "line\nbreak");
        assert!(headers.to_header_map().unwrap_err().is_request_build());
    }
}
