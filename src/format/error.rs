//! Error types for document decoding.

use thiserror::Error;

/// Why an element record (or an array of them) could not be decoded.
///
/// `index` is the element's position in the document array, or `None` when a
/// single record was decoded on its own.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A base or variant-required attribute is absent
    #[error("missing required field `{field}`{}", location(.index))]
    MissingRequiredField {
        /// Name of the absent field
        field: String,
        /// Position of the element in the document
        index: Option<usize>,
    },

    /// The `type` tag names no known element variant
    #[error("unknown element type '{tag}'{}", location(.index))]
    UnknownVariant {
        /// The unrecognized tag
        tag: String,
        /// Position of the element in the document
        index: Option<usize>,
    },

    /// A field is present but holds the wrong kind of value
    #[error("malformed field `{field}`{}: expected {expected}", location(.index))]
    MalformedValue {
        /// Name of the offending field
        field: String,
        /// Position of the element in the document
        index: Option<usize>,
        /// Description of the accepted values
        expected: &'static str,
    },
}

fn location(index: &Option<usize>) -> String {
    match index {
        Some(index) => format!(" in element {index}"),
        None => String::new(),
    }
}

impl DecodeError {
    /// Create a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            field: field.into(),
            index: None,
        }
    }

    /// Create an unknown variant error.
    pub fn unknown_variant(tag: impl Into<String>) -> Self {
        Self::UnknownVariant {
            tag: tag.into(),
            index: None,
        }
    }

    /// Create a malformed value error.
    pub fn malformed(field: impl Into<String>, expected: &'static str) -> Self {
        Self::MalformedValue {
            field: field.into(),
            index: None,
            expected,
        }
    }

    /// Attach the element's position within the document.
    pub fn at(mut self, element_index: usize) -> Self {
        match &mut self {
            Self::MissingRequiredField { index, .. }
            | Self::UnknownVariant { index, .. }
            | Self::MalformedValue { index, .. } => *index = Some(element_index),
        }
        self
    }

    /// Position of the failing element, if known.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::MissingRequiredField { index, .. }
            | Self::UnknownVariant { index, .. }
            | Self::MalformedValue { index, .. } => *index,
        }
    }
}

/// Errors that can occur when reading or writing a whole document file.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Input is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An element could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Invalid envelope structure or content
    #[error("Invalid format: {message}")]
    InvalidFormat {
        /// Description of the format error
        message: String,
    },
}

impl FormatError {
    /// Create an invalid format error with a message.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }
}
