// src/data_uri.rs
//! `data:` URIs carrying base64 image payloads.

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;

/// Encode bytes as `data:<media_type>;base64,<payload>`.
pub fn encode(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, B64.encode(bytes))
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataUri {
    pub media_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl DataUri {
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| anyhow::anyhow!("Not a data URI"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| anyhow::anyhow!("Data URI has no payload separator"))?;

        let mut params = header.split(';');
        let media_type = params
            .next()
            .filter(|m| !m.is_empty())
            .map(|m| m.to_string());
        if !params.any(|p| p.eq_ignore_ascii_case("base64")) {
            anyhow::bail!("Only base64 data URIs are supported");
        }

        let bytes = B64
            .decode(payload.trim())
            .context("Failed to decode data URI payload")?;

        Ok(Self { media_type, bytes })
    }

    /// Media type from the header without decoding the payload.
    pub fn media_type_of(uri: &str) -> Option<String> {
        let header = uri.strip_prefix("data:")?.split(',').next()?;
        header
            .split(';')
            .next()
            .filter(|m| !m.is_empty())
            .map(|m| m.to_string())
    }
}
