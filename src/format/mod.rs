//! Document codec.
//!
//! Translates between the typed [`crate::schema`] and the JSON interchange
//! format, in both schema generations.
//!
//! ## Generations
//!
//! - **v1**: records without `updated` and `locked`
//! - **current**: records that may carry both
//!
//! Reading accepts either (and migrates older spellings); writing targets the
//! generation the caller picks.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use excalidoc::format::{ExcalidrawFile, EncodeOptions, FormatGeneration};
//!
//! let file: ExcalidrawFile = json.parse()?;
//! let bytes = file.to_vec(&EncodeOptions::new().generation(FormatGeneration::V1))?;
//! ```

mod codec;
mod error;
mod file;
mod generation;
mod options;
mod record;
pub mod validate;

#[cfg(test)]
mod tests;

pub use codec::{decode_document, decode_element, encode_document, encode_element};
pub use error::{DecodeError, FormatError};
pub use file::ExcalidrawFile;
pub use generation::{
    CURRENT_ONLY_FIELDS, FormatGeneration, detect_document_generation, detect_generation,
};
pub use options::EncodeOptions;
pub use validate::{DanglingReference, dangling_references, duplicate_ids};
