// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! URL query decomposition

use std::collections::BTreeMap;

use url::form_urlencoded;
use url::Url;

/// Query part of `url`: everything after the first `?`, up to a `#`
fn query_part(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once('?')?;
    Some(rest.split('#').next().unwrap_or(rest))
}

/// All query parameters of `url`. On duplicate keys the last value wins.
pub fn query_params(url: &str) -> BTreeMap<String, String> {
    query_part(url)
        .map(|query| {
            form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        })
        .unwrap_or_default()
}

/// First value of the query parameter `name` in `url`
pub fn query_variable(url: &str, name: &str) -> Option<String> {
    let query = query_part(url)?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

/// First value of the query parameter `name` of the current location
pub fn query_variable_from_location(location: &Url, name: &str) -> Option<String> {
    location
        .query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params() {
        let params = query_params("https://example.com/cb?code=abc&state=x%20y#frag");
        assert_eq!(params.get("code").map(String::as_str), Some("abc"));
        assert_eq!(params.get("state").map(String::as_str), Some("x y"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_no_query() {
        assert!(query_params("https://example.com/").is_empty());
        assert_eq!(query_variable("https://example.com/", "a"), None);
    }

    #[test]
    fn test_duplicates() {
        let url = "https://example.com/?tag=a&tag=b&flag";
        assert_eq!(query_params(url).get("tag").map(String::as_str), Some("b"));
        assert_eq!(query_variable(url, "tag").as_deref(), Some("a"));
        assert_eq!(query_variable(url, "flag").as_deref(), Some(""));
    }

    #[test]
    fn test_location() {
        let location = Url::parse("https://app.example.com/login?next=%2Fhome").unwrap();
        assert_eq!(
            query_variable_from_location(&location, "next").as_deref(),
            Some("/home")
        );
        assert_eq!(query_variable_from_location(&location, "missing"), None);
    }
}
