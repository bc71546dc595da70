//! excalidoc - Excalidraw document schema, codec and document store
//!
//! Reads and writes `.excalidraw` documents with a typed element model,
//! migrating older files on the way in and writing either schema generation
//! on the way out.

pub mod config;
pub mod constants;
pub mod format;
pub mod schema;
pub mod store;

pub use format::{DecodeError, EncodeOptions, ExcalidrawFile, FormatError, FormatGeneration};
pub use schema::{Element, ElementBase, ElementType};
pub use store::{DocumentSession, DocumentStore, StoreError};
