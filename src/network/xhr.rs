// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! XMLHttpRequest with a patchable, shared `setRequestHeader`
//!
//! Every request created from the same [`XhrPrototype`] assigns headers
//! through one slot, the way every `XMLHttpRequest` in a page shares
//! `XMLHttpRequest.prototype.setRequestHeader`. Patching the slot changes
//! header assignment for requests created before and after the patch.

use std::fmt;
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use url::Url;

use crate::error::{Error, Result};
use crate::slot::OverrideSlot;

/// Header assignment implementation: `(request, name, value)`
pub type HeaderSetter = Arc<dyn Fn(&XmlHttpRequest, &str, &str) -> Result<()> + Send + Sync>;

lazy_static! {
    static ref GLOBAL_PROTOTYPE: Arc<XhrPrototype> = Arc::new(XhrPrototype::new());
}

/// Methods shared by every request created from it
pub struct XhrPrototype {
    set_request_header: OverrideSlot<HeaderSetter>,
}

impl Default for XhrPrototype {
    fn default() -> Self {
        Self::new()
    }
}

impl XhrPrototype {
    /// Create a prototype holding the native header setter
    pub fn new() -> Self {
        Self {
            set_request_header: OverrideSlot::new(native_set_request_header()),
        }
    }

    /// The process-wide prototype
    pub fn global() -> Arc<XhrPrototype> {
        GLOBAL_PROTOTYPE.clone()
    }

    /// Slot holding the current `setRequestHeader`
    pub fn set_request_header_slot(&self) -> &OverrideSlot<HeaderSetter> {
        &self.set_request_header
    }
}

impl fmt::Debug for XhrPrototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XhrPrototype")
            .field("set_request_header", &self.set_request_header)
            .finish()
    }
}

/// Unpatched header assignment.
///
/// Requires an opened request. Assigning a header twice combines the values
/// with `", "`.
pub fn native_set_request_header() -> HeaderSetter {
    Arc::new(|request: &XmlHttpRequest, name: &str, value: &str| -> Result<()> {
        request.append_header(name, value)
    })
}

/// Request lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    /// Created, `open` not called yet
    Unsent,
    /// `open` called, headers may be assigned
    Opened,
    /// Response received
    Done,
}

struct RequestState {
    ready_state: ReadyState,
    method: Method,
    url: Option<Url>,
    headers: HeaderMap,
}

/// Browser-style request object
pub struct XmlHttpRequest {
    prototype: Arc<XhrPrototype>,
    state: RwLock<RequestState>,
}

impl Default for XmlHttpRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlHttpRequest {
    /// Create a request bound to the global prototype
    pub fn new() -> Self {
        Self::with_prototype(XhrPrototype::global())
    }

    /// Create a request bound to `prototype`
    pub fn with_prototype(prototype: Arc<XhrPrototype>) -> Self {
        Self {
            prototype,
            state: RwLock::new(RequestState {
                ready_state: ReadyState::Unsent,
                method: Method::GET,
                url: None,
                headers: HeaderMap::new(),
            }),
        }
    }

    /// Prototype this request dispatches through
    pub fn prototype(&self) -> &Arc<XhrPrototype> {
        &self.prototype
    }

    /// Initialize the request. Resets previously assigned headers.
    pub fn open(&self, method: &str, url: &str) -> Result<()> {
        let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
            .map_err(|_| Error::other(format!("Invalid HTTP method: {}", method)))?;
        let url = Url::parse(url)?;

        let mut state = self.state.write();
        state.ready_state = ReadyState::Opened;
        state.method = method;
        state.url = Some(url);
        state.headers.clear();
        Ok(())
    }

    /// Assign a request header through the prototype's current setter
    pub fn set_request_header(&self, name: &str, value: &str) -> Result<()> {
        let setter = self.prototype.set_request_header.current();
        setter(self, name, value)
    }

    /// Current lifecycle state
    pub fn ready_state(&self) -> ReadyState {
        self.state.read().ready_state
    }

    /// Value assigned to a header, if any
    pub fn request_header(&self, name: &str) -> Option<String> {
        self.state
            .read()
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    }

    /// All assigned headers, names lowercased
    pub fn request_headers(&self) -> Vec<(String, String)> {
        self.state
            .read()
            .headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect()
    }

    fn append_header(&self, name: &str, value: &str) -> Result<()> {
        let mut state = self.state.write();
        if state.ready_state != ReadyState::Opened {
            return Err(Error::InvalidState(
                "setRequestHeader requires an opened request".to_string(),
            ));
        }

        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::invalid_header(name, e.to_string()))?;

        let combined = match state.headers.get(&header_name).and_then(|v| v.to_str().ok()) {
            Some(existing) => format!("{}, {}", existing, value),
            None => value.to_string(),
        };
        let header_value = HeaderValue::from_str(&combined)
            .map_err(|e| Error::invalid_header(name, e.to_string()))?;

        state.headers.insert(header_name, header_value);
        Ok(())
    }

    /// Build the outgoing request carrying every assigned header
    pub fn build(&self, client: &Client, body: Option<String>) -> Result<reqwest::Request> {
        let state = self.state.read();
        let url = match (&state.url, state.ready_state) {
            (Some(url), ReadyState::Opened) => url.clone(),
            _ => {
                return Err(Error::InvalidState(
                    "send requires an opened request".to_string(),
                ))
            }
        };

        let mut builder = client
            .request(state.method.clone(), url)
            .headers(state.headers.clone());
        if let Some(body) = body {
            builder = builder.body(body);
        }
        Ok(builder.build()?)
    }

    /// Send the request and read the full response
    pub async fn send(&self, client: &Client, body: Option<String>) -> Result<XhrResponse> {
        let request = self.build(client, body)?;
        tracing::debug!(method = %request.method(), url = %request.url(), "XHR send");

        let response = client.execute(request).await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();
        let body = response.text().await?;

        self.state.write().ready_state = ReadyState::Done;

        Ok(XhrResponse {
            status,
            headers,
            body,
        })
    }
}

impl fmt::Debug for XmlHttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("XmlHttpRequest")
            .field("ready_state", &state.ready_state)
            .field("method", &state.method)
            .field("url", &state.url.as_ref().map(Url::as_str))
            .finish_non_exhaustive()
    }
}

/// Response of a sent request
#[derive(Debug, Clone)]
pub struct XhrResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers, names lowercased
    pub headers: Vec<(String, String)>,
    /// Response body as text
    pub body: String,
}

impl XhrResponse {
    /// First value of a response header (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
