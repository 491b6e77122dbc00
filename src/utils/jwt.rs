// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! JWT payload decoding
//!
//! Only the payload segment is decoded; signatures are not verified.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde_json::Value;

use crate::error::{Error, Result};

/// Padding is optional in tokens, as it is for `atob`
const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// Decode the payload (second segment) of a JWT into JSON.
///
/// Accepts base64url and standard base64 (as issued by some older servers),
/// each with or without padding. Anything malformed is an error.
pub fn decode_payload(token: &str) -> Result<Value> {
    let token = token.trim();
    let token = token.strip_prefix("Bearer ").unwrap_or(token);

    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next()) {
        (Some(_), Some(payload)) if !payload.is_empty() => payload,
        _ => return Err(Error::token("expected header.payload[.signature]")),
    };

    let bytes = URL_SAFE_LENIENT
        .decode(payload)
        .or_else(|_| STANDARD_LENIENT.decode(payload))
        .map_err(|e| Error::token(format!("payload is not base64: {}", e)))?;

    let text = String::from_utf8(bytes).map_err(|_| Error::token("payload is not valid UTF-8"))?;

    serde_json::from_str(&text).map_err(|e| Error::token(format!("payload is not JSON: {}", e)))
}
