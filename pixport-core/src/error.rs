/// Structured error types for pixport-core.
///
/// Uses `thiserror` for the article-level parse errors; the batch pipeline
/// and binary crate use `anyhow` for file-level plumbing.
use thiserror::Error;

/// Why a single article could not be normalized. One of these skips the
/// article, never the batch.
#[derive(Error, Debug)]
pub enum ParseError {
    /// A field required for derivation is absent from the header
    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },

    /// The `date` header field did not parse under any accepted layout
    #[error("invalid date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },

    /// The `tags` header field is not a readable tag list
    #[error("malformed tag list '{raw}': {reason}")]
    TagList { raw: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ParseError>;

impl ParseError {
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    pub fn invalid_date(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn tag_list(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::TagList {
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    /// Stable tag for structured diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "missing-field",
            Self::InvalidDate { .. } => "invalid-date",
            Self::TagList { .. } => "tag-list",
        }
    }
}
