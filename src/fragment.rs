//! Caller-supplied text fragments.
//!
//! A chunked fragment carries an optional component label and the statement it
//! belongs to; fragments sharing `(source, statement_ID)` form one statement.
//! Unchunked fragments are plain text awaiting inference.
use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder used in CSV files for a missing component label.
pub const MISSING_LABEL: &str = "NA";

/// A labeled (training-time) text fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkedFragment {
    pub source: String,
    pub text: String,
    #[serde(default, deserialize_with = "deserialize_label")]
    pub component: Option<String>,
    #[serde(rename = "statement_ID")]
    pub statement_id: String,
}

/// An unlabeled (inference-time) text fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnchunkedFragment {
    pub source: String,
    pub text: String,
}

impl ChunkedFragment {
    pub fn new(source: &str, text: &str, component: Option<&str>, statement_id: &str) -> Self {
        Self {
            source: source.to_string(),
            text: text.to_string(),
            component: component.and_then(|c| normalize_label(c.to_string())),
            statement_id: statement_id.to_string(),
        }
    }

    /// Key of the statement this fragment belongs to.
    #[must_use]
    pub fn statement_key(&self) -> (&str, &str) {
        (&self.source, &self.statement_id)
    }
}

impl UnchunkedFragment {
    pub fn new(source: &str, text: &str) -> Self {
        Self {
            source: source.to_string(),
            text: text.to_string(),
        }
    }
}

impl From<&ChunkedFragment> for UnchunkedFragment {
    fn from(fragment: &ChunkedFragment) -> Self {
        Self {
            source: fragment.source.clone(),
            text: fragment.text.clone(),
        }
    }
}

/// Map blank and `NA` labels to `None`.
pub fn normalize_label(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == MISSING_LABEL {
        None
    } else if trimmed.len() == raw.len() {
        Some(raw)
    } else {
        Some(trimmed.to_string())
    }
}

fn deserialize_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(normalize_label))
}
