//! Global constants for excalidoc

/// Extension of document files (without the dot)
pub const FILE_EXTENSION: &str = "excalidraw";

/// Envelope `type` of a saved document
pub const DOCUMENT_TYPE: &str = "excalidraw";

/// Envelope `type` of a clipboard payload
pub const CLIPBOARD_TYPE: &str = "excalidraw/clipboard";

/// Newest envelope `version` this crate understands
pub const CURRENT_FILE_VERSION: u64 = 2;

/// Envelope `source` written for new documents
pub const DEFAULT_SOURCE: &str = "excalidoc";

/// Stem of newly created documents ("Untitled", "Untitled 1", ...)
pub const UNTITLED_STEM: &str = "Untitled";

/// Give up looking for a free file name after this many attempts
pub const MAX_NAME_ATTEMPTS: u32 = 10_000;

/// Default debounce before reloading a changed document, in milliseconds
pub const DEFAULT_RELOAD_DEBOUNCE_MS: u64 = 250;
