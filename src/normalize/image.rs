//! Inline image extraction from executor text output.
//!
//! Some execution environments print an image as a Python-flavored dict
//! literal mixed into stdout, e.g.
//! `{'type': 'image', 'format': 'png', 'base64_data': '...'}`. This module
//! pulls the first such blob out of a text payload so clients get a proper
//! image field instead of a wall of base64.

use std::sync::OnceLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use regex::Regex;

/// An image found inline in a text payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedImage {
    /// `data:image/png;base64,<payload>` for direct embedding.
    pub data_uri: String,
    /// The text with the image blob removed and trimmed.
    pub remaining: String,
}

fn blob_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{[^{}]*'type': 'image'[^{}]*'base64_data':[^{}]*\}")
            .unwrap_or_else(|e| panic!("invalid image blob pattern: {e}"))
    })
}

fn format_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"'format': '([^']*)'")
            .unwrap_or_else(|e| panic!("invalid format pattern: {e}"))
    })
}

fn payload_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"'base64_data': '([^']*)'")
            .unwrap_or_else(|e| panic!("invalid payload pattern: {e}"))
    })
}

/// Extract the first inline PNG image from `content`.
///
/// Returns `None` when there is no image-shaped blob, when the declared
/// format is not `png`, or when the payload is not valid base64; malformed
/// blobs are left in the text untouched.
pub fn extract_inline_image(content: &str) -> Option<ExtractedImage> {
    if !content.contains("'type': 'image'") {
        return None;
    }

    let blob = blob_regex().find(content)?;
    let blob_text = blob.as_str();

    let format = format_regex().captures(blob_text)?.get(1)?.as_str();
    if format != "png" {
        return None;
    }

    let payload = payload_regex().captures(blob_text)?.get(1)?.as_str();
    if STANDARD.decode(payload).is_err() {
        return None;
    }

    Some(ExtractedImage {
        data_uri: format!("data:image/png;base64,{}", payload),
        remaining: content.replacen(blob_text, "", 1).trim().to_string(),
    })
}
