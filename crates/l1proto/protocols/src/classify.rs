//! Sub-protocol classification of decoded inscriptions.
//!
//! These are pure helpers over an inscription's content type and body (or, for
//! CAT-21, the transaction lock time). They never fail; data that matches no
//! protocol is reported as [`Protocol::Plain`] or [`Protocol::Unknown`].

use std::fmt;

use serde::Serialize;

/// Lock time that marks a CAT-21 mint transaction.
pub const CAT21_LOCK_TIME: u32 = 21;

/// Protocol tag attached to an inscription or transaction.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum Protocol {
    /// SRC-20 token operation, a JSON body with `"p": "src-20"`.
    #[serde(rename = "src-20")]
    Src20,

    /// CAT-21 mint, identified by the transaction lock time.
    #[serde(rename = "cat-21")]
    Cat21,

    /// Regular inscription with a declared content type.
    #[serde(rename = "plain")]
    Plain,

    /// No content type and no recognizable payload.
    #[serde(rename = "unknown")]
    Unknown,
}

impl Protocol {
    /// Returns the label used in serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Src20 => "src-20",
            Self::Cat21 => "cat-21",
            Self::Plain => "plain",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies an inscription by its content type and body.
pub fn classify(content_type: Option<&str>, body: &[u8]) -> Protocol {
    let may_be_json = content_type.is_none_or(is_textual_content_type);

    if may_be_json && is_src20(body) {
        return Protocol::Src20;
    }

    if content_type.is_some() {
        Protocol::Plain
    } else {
        Protocol::Unknown
    }
}

/// Classifies a transaction as a whole. Only CAT-21 is decided at this level.
pub fn classify_transaction(lock_time: u32) -> Option<Protocol> {
    is_cat21_mint(lock_time).then_some(Protocol::Cat21)
}

/// Returns whether a transaction with this lock time is a CAT-21 mint.
pub fn is_cat21_mint(lock_time: u32) -> bool {
    lock_time == CAT21_LOCK_TIME
}

/// Returns whether the body is an SRC-20 JSON document.
pub fn is_src20(body: &[u8]) -> bool {
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();

    if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(trimmed) {
        return parsed
            .as_object()
            .and_then(|obj| obj.get("p"))
            .and_then(|p| p.as_str())
            .is_some_and(|p| matches!(p.to_lowercase().as_str(), "src-20" | "src20"));
    }

    // Malformed but recognizable JSON.
    let lower = trimmed.to_lowercase();
    lower.contains(r#""p":"src-20""#) || lower.contains(r#""p":"src20""#)
}

fn is_textual_content_type(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    media_type.starts_with("text/") || media_type == "application/json"
}
