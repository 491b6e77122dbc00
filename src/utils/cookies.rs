// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookie helpers over a domain-indexed cookie jar
//!
//! [`DocumentCookies`] plays the role of `document.cookie` for one document
//! URL: assignments go through the same `name=value; attr=...` syntax and
//! reads only see cookies scripts are allowed to see.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;

use crate::error::Result;

/// Format used by `expires=` attributes
const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// A single cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
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
    /// HttpOnly flag (not accessible via scripts)
    pub http_only: bool,
}

impl Cookie {
    /// Create a new session cookie on path `/`
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: String::new(),
            path: "/".to_string(),
            expires: None,
            secure: false,
            http_only: false,
        }
    }

    /// Set the domain
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Set the path
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set http_only flag
    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Set expiration time
    pub fn expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Check if the cookie is expired
    pub fn is_expired(&self) -> bool {
        self.expires.map_or(false, |exp| exp <= Utc::now())
    }

    /// Check if the cookie matches the given URL
    pub fn matches(&self, url: &Url) -> bool {
        let host = url.host_str().unwrap_or("");
        if !self.domain_matches(host) {
            return false;
        }

        if !url.path().starts_with(&self.path) {
            return false;
        }

        if self.secure && url.scheme() != "https" {
            return false;
        }

        !self.is_expired()
    }

    fn domain_matches(&self, host: &str) -> bool {
        if self.domain.is_empty() {
            return true;
        }

        let domain = self.domain.trim_start_matches('.');
        host == domain || host.ends_with(&format!(".{}", domain))
    }

    /// Parse a cookie assignment (`document.cookie = ...` or Set-Cookie)
    pub fn parse(header: &str, url: &Url) -> Option<Self> {
        let mut parts = header.split(';');
        let first = parts.next()?.trim();

        let (name, value) = first.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let mut cookie = Cookie::new(name, value.trim());

        // Default domain to the document host
        cookie.domain = url.host_str().unwrap_or("").to_string();

        for part in parts {
            let part = part.trim();
            if let Some((attr, val)) = part.split_once('=') {
                let val = val.trim();
                match attr.trim().to_lowercase().as_str() {
                    "domain" => cookie.domain = val.trim_start_matches('.').to_string(),
                    "path" => cookie.path = val.to_string(),
                    "expires" => {
                        if let Some(dt) = parse_expires(val) {
                            cookie.expires = Some(dt);
                        }
                    }
                    "max-age" => {
                        if let Ok(secs) = val.parse::<i64>() {
                            cookie.expires = Some(expiry_after_seconds(secs));
                        }
                    }
                    _ => {}
                }
            } else {
                match part.to_lowercase().as_str() {
                    "secure" => cookie.secure = true,
                    "httponly" => cookie.http_only = true,
                    _ => {}
                }
            }
        }

        Some(cookie)
    }

    /// `name=value` pair as sent in a Cookie header
    pub fn to_header_value(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

/// `now + secs`, saturating at the ends of the representable range
fn expiry_after_seconds(secs: i64) -> DateTime<Utc> {
    Duration::try_seconds(secs)
        .and_then(|delta| Utc::now().checked_add_signed(delta))
        .unwrap_or(if secs < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
}

fn parse_expires(val: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc2822(val) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(val, EXPIRES_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Thread-safe cookie storage
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    /// Cookies stored by domain
    cookies: Arc<DashMap<String, Vec<Cookie>>>,
}

impl CookieJar {
    /// Create a new empty cookie jar
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cookie, replacing one with the same name and path.
    /// An already expired cookie only removes its predecessor.
    pub fn add(&self, cookie: Cookie) {
        let mut entry = self.cookies.entry(cookie.domain.clone()).or_default();
        entry.retain(|c| c.name != cookie.name || c.path != cookie.path);
        if !cookie.is_expired() {
            entry.push(cookie);
        }
    }

    /// Add a cookie from an assignment string
    pub fn add_from_header(&self, header: &str, url: &Url) -> bool {
        match Cookie::parse(header, url) {
            Some(cookie) => {
                self.add(cookie);
                true
            }
            None => false,
        }
    }

    /// Get all cookies for a URL
    pub fn get_cookies(&self, url: &Url) -> Vec<Cookie> {
        let mut result = Vec::new();
        for entry in self.cookies.iter() {
            for cookie in entry.value().iter() {
                if cookie.matches(url) {
                    result.push(cookie.clone());
                }
            }
        }

        self.remove_expired();
        result
    }

    /// Get all non-HttpOnly cookies for script access
    pub fn get_js_accessible_cookies(&self, url: &Url) -> Vec<Cookie> {
        self.get_cookies(url)
            .into_iter()
            .filter(|c| !c.http_only)
            .collect()
    }

    /// Remove a specific cookie
    pub fn remove(&self, name: &str, domain: &str, path: &str) {
        if let Some(mut cookies) = self.cookies.get_mut(domain) {
            cookies.retain(|c| c.name != name || c.path != path);
        }
    }

    /// Clear all cookies
    pub fn clear(&self) {
        self.cookies.clear();
    }

    fn remove_expired(&self) {
        for mut entry in self.cookies.iter_mut() {
            entry.value_mut().retain(|c| !c.is_expired());
        }
    }

    /// Get total cookie count
    pub fn len(&self) -> usize {
        self.cookies.iter().map(|e| e.value().len()).sum()
    }

    /// Check if jar is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `document.cookie` for one document
#[derive(Debug, Clone)]
pub struct DocumentCookies {
    url: Url,
    jar: CookieJar,
}

impl DocumentCookies {
    /// Cookies of the document at `url`, backed by a fresh jar
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self::with_jar(Url::parse(url)?, CookieJar::new()))
    }

    /// Cookies of the document at `url`, backed by a shared jar
    pub fn with_jar(url: Url, jar: CookieJar) -> Self {
        Self { url, jar }
    }

    /// Underlying jar
    pub fn jar(&self) -> &CookieJar {
        &self.jar
    }

    /// The `document.cookie` getter
    pub fn cookie_string(&self) -> String {
        self.jar
            .get_js_accessible_cookies(&self.url)
            .iter()
            .map(Cookie::to_header_value)
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// The `document.cookie` setter; malformed assignments are ignored
    pub fn assign(&self, assignment: &str) {
        if !self.jar.add_from_header(assignment, &self.url) {
            tracing::debug!(assignment = %assignment, "Ignoring malformed cookie assignment");
        }
    }

    /// Set a cookie on path `/`, expiring after `days` days when given and non-zero.
    ///
    /// A date that cannot be represented leaves a session cookie, as an
    /// invalid `expires` attribute would.
    pub fn set_cookie(&self, name: &str, value: &str, days: Option<i64>) {
        let expires = days
            .filter(|days| *days != 0)
            .and_then(Duration::try_days)
            .and_then(|delta| Utc::now().checked_add_signed(delta))
            .map(|date| format!("; expires={}", date.format(EXPIRES_FORMAT)))
            .unwrap_or_default();
        self.assign(&format!("{}={}{}; path=/", name, value, expires));
    }

    /// Value of a script-visible cookie
    pub fn get_cookie(&self, name: &str) -> Option<String> {
        self.jar
            .get_js_accessible_cookies(&self.url)
            .into_iter()
            .find(|c| c.name == name)
            .map(|c| c.value)
    }

    /// Erase a cookie by expiring it
    pub fn erase_cookie(&self, name: &str) {
        self.assign(&format!("{}=; Max-Age=-99999999;", name));
    }
}
