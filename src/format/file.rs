//! The `.excalidraw` file envelope.
//!
//! A saved document wraps the element array in an object:
//!
//! ```json
//! {
//!   "type": "excalidraw",
//!   "version": 2,
//!   "source": "https://excalidraw.com",
//!   "elements": [ ... ],
//!   "appState": { ... },
//!   "files": { ... }
//! }
//! ```
//!
//! `appState` and `files` belong to the editor and are carried as opaque
//! JSON. A bare element array (no envelope) is also accepted on read.

use std::str::FromStr;

use serde_json::{Map, Value};

use crate::constants::{CLIPBOARD_TYPE, CURRENT_FILE_VERSION, DEFAULT_SOURCE, DOCUMENT_TYPE};
use crate::format::codec::{decode_document, encode_document};
use crate::format::error::FormatError;
use crate::format::generation::{FormatGeneration, detect_document_generation};
use crate::format::options::EncodeOptions;
use crate::schema::{Element, ElementType};

/// Envelope keys handled explicitly; everything else lands in `extra`.
const ENVELOPE_KEYS: [&str; 6] = ["type", "version", "source", "elements", "appState", "files"];

/// A whole document file.
#[derive(Debug, Clone, PartialEq)]
pub struct ExcalidrawFile {
    /// Envelope `type`; `None` for files without one (bare arrays, old exports).
    pub kind: Option<String>,

    /// Envelope format version.
    pub version: Option<u64>,

    /// Application that wrote the file.
    pub source: Option<String>,

    /// Elements in file order.
    pub elements: Vec<Element>,

    /// Editor state, kept as-is.
    pub app_state: Option<Value>,

    /// Binary files referenced by image elements, kept as-is.
    pub files: Option<Value>,

    /// Unrecognized top-level keys.
    pub extra: Map<String, Value>,

    /// Generation of the element records as read.
    generation: FormatGeneration,
}

impl ExcalidrawFile {
    /// An empty document with a current envelope.
    pub fn new() -> Self {
        Self::with_elements(Vec::new())
    }

    /// A current envelope around the given elements.
    pub fn with_elements(elements: Vec<Element>) -> Self {
        Self {
            kind: Some(DOCUMENT_TYPE.to_string()),
            version: Some(CURRENT_FILE_VERSION),
            source: Some(DEFAULT_SOURCE.to_string()),
            elements,
            app_state: None,
            files: None,
            extra: Map::new(),
            generation: FormatGeneration::Current,
        }
    }

    /// Decode a file from parsed JSON.
    pub fn from_value(raw: &Value) -> Result<Self, FormatError> {
        match raw {
            Value::Array(_) => Ok(Self {
                kind: None,
                version: None,
                source: None,
                elements: decode_document(raw)?,
                app_state: None,
                files: None,
                extra: Map::new(),
                generation: detect_document_generation(raw),
            }),
            Value::Object(envelope) => Self::from_envelope(envelope),
            _ => Err(FormatError::invalid_format(
                "expected an envelope object or an element array",
            )),
        }
    }

    fn from_envelope(envelope: &Map<String, Value>) -> Result<Self, FormatError> {
        let kind = match envelope.get("type") {
            None | Some(Value::Null) => None,
            Some(Value::String(kind)) if kind == DOCUMENT_TYPE || kind == CLIPBOARD_TYPE => {
                Some(kind.clone())
            }
            Some(other) => {
                return Err(FormatError::invalid_format(format!(
                    "not an excalidraw document (type {other})"
                )));
            }
        };

        let version = match envelope.get("version") {
            None | Some(Value::Null) => None,
            Some(value) => Some(value.as_u64().ok_or_else(|| {
                FormatError::invalid_format("version must be a non-negative integer")
            })?),
        };

        let source = match envelope.get("source") {
            None | Some(Value::Null) => None,
            Some(Value::String(source)) => Some(source.clone()),
            Some(_) => return Err(FormatError::invalid_format("source must be a string")),
        };

        let raw_elements = envelope
            .get("elements")
            .ok_or_else(|| FormatError::invalid_format("missing elements array"))?;
        let elements = decode_document(raw_elements)?;

        let extra = envelope
            .iter()
            .filter(|(key, _)| !ENVELOPE_KEYS.iter().any(|k| *k == key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self {
            kind,
            version,
            source,
            elements,
            app_state: opaque(envelope.get("appState")),
            files: opaque(envelope.get("files")),
            extra,
            generation: detect_document_generation(raw_elements),
        })
    }

    /// Decode a file from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, FormatError> {
        let raw: Value = serde_json::from_slice(bytes)?;
        Self::from_value(&raw)
    }

    /// Encode the envelope with elements of the given generation.
    ///
    /// A file read without envelope is written with one.
    pub fn to_value(&self, generation: FormatGeneration) -> Value {
        let mut envelope = Map::new();
        envelope.insert(
            "type".to_string(),
            Value::from(self.kind.as_deref().unwrap_or(DOCUMENT_TYPE)),
        );
        envelope.insert(
            "version".to_string(),
            Value::from(self.version.unwrap_or(CURRENT_FILE_VERSION)),
        );
        if let Some(source) = &self.source {
            envelope.insert("source".to_string(), Value::from(source.clone()));
        }
        envelope.insert(
            "elements".to_string(),
            encode_document(&self.elements, generation),
        );
        if let Some(app_state) = &self.app_state {
            envelope.insert("appState".to_string(), app_state.clone());
        }
        if let Some(files) = &self.files {
            envelope.insert("files".to_string(), files.clone());
        }
        for (key, value) in &self.extra {
            if !envelope.contains_key(key) {
                envelope.insert(key.clone(), value.clone());
            }
        }
        Value::Object(envelope)
    }

    /// Encode to bytes according to `options`.
    pub fn to_vec(&self, options: &EncodeOptions) -> Result<Vec<u8>, FormatError> {
        let value = self.to_value(options.generation);
        let bytes = if options.pretty {
            serde_json::to_vec_pretty(&value)?
        } else {
            serde_json::to_vec(&value)?
        };
        Ok(bytes)
    }

    /// Generation of the element records when the file was read.
    pub fn generation(&self) -> FormatGeneration {
        self.generation
    }

    /// Whether the envelope version is one this crate understands.
    ///
    /// Newer files are still decoded; callers should warn.
    pub fn is_version_supported(&self) -> bool {
        self.version.is_none_or(|v| v <= CURRENT_FILE_VERSION)
    }

    /// Whether this is a clipboard payload rather than a saved document.
    pub fn is_clipboard(&self) -> bool {
        self.kind.as_deref() == Some(CLIPBOARD_TYPE)
    }

    /// Elements that are not soft-deleted.
    pub fn live_elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| !e.is_deleted())
    }

    /// Number of live elements per type tag, in tag declaration order.
    pub fn count_by_type(&self) -> Vec<(ElementType, usize)> {
        ElementType::ALL
            .into_iter()
            .map(|t| (t, self.live_elements().filter(|e| e.element_type() == t).count()))
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

impl Default for ExcalidrawFile {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for ExcalidrawFile {
    type Err = FormatError;

    fn from_str(json: &str) -> Result<Self, Self::Err> {
        let raw: Value = serde_json::from_str(json)?;
        Self::from_value(&raw)
    }
}

fn opaque(value: Option<&Value>) -> Option<Value> {
    match value {
        None | Some(Value::Null) => None,
        Some(value) => Some(value.clone()),
    }
}
