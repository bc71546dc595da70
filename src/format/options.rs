//! Options for writing documents.

use crate::format::generation::FormatGeneration;

/// Options for encode operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Element schema generation to write.
    pub generation: FormatGeneration,

    /// Whether to pretty-print the JSON output.
    pub pretty: bool,
}

impl EncodeOptions {
    /// Create new encode options with defaults (current generation, pretty).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target generation.
    pub fn generation(mut self, generation: FormatGeneration) -> Self {
        self.generation = generation;
        self
    }

    /// Set pretty printing.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            generation: FormatGeneration::Current,
            pretty: true,
        }
    }
}
