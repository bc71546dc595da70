//! Document storage.
//!
//! [`DocumentStore`] is the handle through which documents are read from and
//! written to an asset directory. [`DocumentSession`] holds the open document
//! on top of a store and reloads it when its file changes on disk, paced by a
//! [`ReloadScheduler`]. It also keeps the store's document list current. Watching the file system is left to the caller, which
//! reports changes through [`DocumentSession::file_changed`].

mod document_store;
mod error;
mod reload;
mod session;

pub use document_store::{DocumentStore, is_document_path};
pub use error::StoreError;
pub use reload::ReloadScheduler;
pub use session::DocumentSession;
