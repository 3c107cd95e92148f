//! Extract-then-parse for loosely structured model output.
//!
//! Generation models wrap their JSON payload in prose more often than not.
//! The extraction step slices from the first opening bracket to the last
//! closing one, parses that substring, and falls back to parsing the whole
//! response. The result is tagged rather than an error so each caller
//! applies its own degradation policy exactly once.

use serde::de::DeserializeOwned;

/// Result of extracting a typed value from free text.
///
/// `Unparsed` keeps the raw response so the failure can be logged verbatim.
#[derive(Debug, Clone)]
pub enum Extracted<T> {
    Parsed(T),
    Unparsed { raw: String, error: String },
}

impl<T> Extracted<T> {
    /// The parsed value, or `None` on failure.
    pub fn ok(self) -> Option<T> {
        match self {
            Extracted::Parsed(value) => Some(value),
            Extracted::Unparsed { .. } => None,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, Extracted::Parsed(_))
    }
}

/// Extract a JSON object (`{...}`) embedded in free text.
pub fn json_object<T: DeserializeOwned>(text: &str) -> Extracted<T> {
    extract_delimited(text, '{', '}')
}

/// Extract a JSON array (`[...]`) embedded in free text.
pub fn json_array<T: DeserializeOwned>(text: &str) -> Extracted<T> {
    extract_delimited(text, '[', ']')
}

fn extract_delimited<T: DeserializeOwned>(text: &str, open: char, close: char) -> Extracted<T> {
    let candidate = match (text.find(open), text.rfind(close)) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => text,
    };

    match serde_json::from_str(candidate) {
        Ok(value) => Extracted::Parsed(value),
        // The slice failed; the payload may be the whole response.
        Err(slice_err) => match serde_json::from_str(text) {
            Ok(value) => Extracted::Parsed(value),
            Err(_) => Extracted::Unparsed {
                raw: text.to_string(),
                error: slice_err.to_string(),
            },
        },
    }
}
