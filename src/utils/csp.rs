// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Content Security Policy nonce extraction
//!
//! Pages that ship their policy in a `<meta http-equiv>` tag expose the
//! script nonce to anything that can read the markup. Scripts injected by
//! launcher modules need that nonce to pass a nonce-based policy.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref META_TAG: Regex = Regex::new(r"(?i)<meta\b[^>]*>").expect("valid meta regex");
    static ref ATTRIBUTE: Regex = Regex::new(
        r#"(?i)([a-z][a-z0-9-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#
    )
    .expect("valid attribute regex");
    static ref NONCE: Regex =
        Regex::new(r"nonce-([a-zA-Z0-9+/=]+)").expect("valid nonce regex");
}

/// Attribute value of a single tag
fn attribute<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    ATTRIBUTE.captures_iter(tag).find_map(|c| {
        if !c[1].eq_ignore_ascii_case(name) {
            return None;
        }
        c.get(2)
            .or_else(|| c.get(3))
            .or_else(|| c.get(4))
            .map(|m| m.as_str())
    })
}

/// Policy string from a `<meta http-equiv="Content-Security-Policy">` tag
pub fn extract_csp_from_html(html: &str) -> Option<String> {
    META_TAG.find_iter(html).find_map(|tag| {
        let tag = tag.as_str();
        let is_csp = attribute(tag, "http-equiv")
            .map_or(false, |v| v.trim().eq_ignore_ascii_case("Content-Security-Policy"));
        if is_csp {
            attribute(tag, "content").map(String::from)
        } else {
            None
        }
    })
}

/// First nonce source in a policy
pub fn nonce_from_policy(policy: &str) -> Option<String> {
    NONCE.captures(policy).map(|c| c[1].to_string())
}

/// Script nonce declared by the page's meta policy
pub fn nonce_from_html(html: &str) -> Option<String> {
    extract_csp_from_html(html).and_then(|policy| nonce_from_policy(&policy))
}
