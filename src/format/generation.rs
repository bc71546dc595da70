//! Format generations and their detection.
//!
//! Documents do not carry a reliable version number for their element
//! schema, so the generation is inferred from which fields the records use.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields that first appeared after the v1 generation.
pub const CURRENT_ONLY_FIELDS: [&str; 2] = ["updated", "locked"];

/// Element schema generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FormatGeneration {
    /// Legacy records without `updated` and `locked`
    V1,
    /// Current records
    #[default]
    Current,
}

impl FormatGeneration {
    /// Short name, as accepted by [`FormatGeneration::parse`].
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatGeneration::V1 => "v1",
            FormatGeneration::Current => "current",
        }
    }

    /// Parse a generation name (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "v1" | "legacy" => Some(FormatGeneration::V1),
            "current" | "v2" => Some(FormatGeneration::Current),
            _ => None,
        }
    }

    /// Whether records of this generation carry `field`.
    pub fn supports_field(&self, field: &str) -> bool {
        match self {
            FormatGeneration::V1 => !CURRENT_ONLY_FIELDS.iter().any(|f| *f == field),
            FormatGeneration::Current => true,
        }
    }
}

impl std::fmt::Display for FormatGeneration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the generation of one element record by field presence.
pub fn detect_generation(record: &Map<String, Value>) -> FormatGeneration {
    if CURRENT_ONLY_FIELDS.iter().any(|f| record.contains_key(*f)) {
        FormatGeneration::Current
    } else {
        FormatGeneration::V1
    }
}

/// Detect the generation of a document array.
///
/// A document is current as soon as one of its records is; an empty document
/// (or anything that is not an array of records) counts as current.
pub fn detect_document_generation(raw: &Value) -> FormatGeneration {
    let Some(records) = raw.as_array() else {
        return FormatGeneration::Current;
    };
    if records.is_empty() {
        return FormatGeneration::Current;
    }

    let any_current = records
        .iter()
        .filter_map(Value::as_object)
        .any(|record| detect_generation(record) == FormatGeneration::Current);

    if any_current {
        FormatGeneration::Current
    } else {
        FormatGeneration::V1
    }
}
