//! The currently open document.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::format::ExcalidrawFile;
use crate::store::document_store::DocumentStore;
use crate::store::error::StoreError;
use crate::store::reload::ReloadScheduler;

/// An open document and the path it was read from.
#[derive(Debug, Clone)]
struct OpenDocument {
    path: PathBuf,
    file: ExcalidrawFile,
}

/// Holds at most one open document and keeps it in sync with its file.
///
/// The session also keeps the list of documents in the store's root, which
/// is refreshed after changes anywhere below the root.
///
/// Failed opens and reloads never disturb the document already held.
#[derive(Debug)]
pub struct DocumentSession {
    store: DocumentStore,
    current: Option<OpenDocument>,
    reload: ReloadScheduler,
    documents: Vec<PathBuf>,
    listing: ReloadScheduler,
}

impl DocumentSession {
    /// Create a session with no open document.
    pub fn new(store: DocumentStore) -> Self {
        Self {
            store,
            current: None,
            reload: ReloadScheduler::new(),
            documents: Vec::new(),
            listing: ReloadScheduler::new(),
        }
    }

    /// Set the debounce delay for reloads and listing refreshes after
    /// external changes.
    pub fn with_reload_debounce(mut self, delay: Duration) -> Self {
        self.reload = ReloadScheduler::new().with_debounce_delay(delay);
        self.listing = ReloadScheduler::new().with_debounce_delay(delay);
        self
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Path of the open document.
    pub fn path(&self) -> Option<&Path> {
        self.current.as_ref().map(|doc| doc.path.as_path())
    }

    /// The open document.
    pub fn document(&self) -> Option<&ExcalidrawFile> {
        self.current.as_ref().map(|doc| &doc.file)
    }

    /// The open document, for editing before [`DocumentSession::save`].
    pub fn document_mut(&mut self) -> Option<&mut ExcalidrawFile> {
        self.current.as_mut().map(|doc| &mut doc.file)
    }

    pub fn reload_scheduler(&self) -> &ReloadScheduler {
        &self.reload
    }

    /// Documents in the store's root as of the last refresh, sorted by name.
    ///
    /// Empty until [`DocumentSession::refresh_documents`] or a due
    /// [`DocumentSession::poll_documents`] has run.
    pub fn documents(&self) -> &[PathBuf] {
        &self.documents
    }

    /// Re-read the document list now. On failure the previous list is kept.
    pub fn refresh_documents(&mut self) -> Result<&[PathBuf], StoreError> {
        self.documents = self.store.list_documents()?;
        Ok(&self.documents)
    }

    /// Open a document, replacing the current one on success.
    ///
    /// On failure the previous document and path stay as they were.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<&ExcalidrawFile, StoreError> {
        let path = self.store.resolve(path);
        let file = self.store.load(&path)?;

        self.reload.reset();
        let doc = self.current.insert(OpenDocument { path, file });
        Ok(&doc.file)
    }

    /// Close the open document, if any.
    pub fn close(&mut self) {
        if let Some(doc) = self.current.take() {
            log::debug!("Closed {:?}", doc.path);
        }
        self.reload.reset();
    }

    /// Write the open document back to its path.
    pub fn save(&mut self) -> Result<&Path, StoreError> {
        let doc = self.current.as_ref().ok_or(StoreError::NoDocument)?;
        self.store.save(&doc.path, &doc.file)?;
        Ok(&doc.path)
    }

    /// Feed a change notification for `path`.
    ///
    /// Any change below the store's root, including the root itself, marks
    /// the document list stale. Returns whether the change concerned the
    /// open document (and so scheduled a reload).
    pub fn file_changed(&mut self, path: impl AsRef<Path>) -> bool {
        let changed = self.store.resolve(path);
        if changed.starts_with(self.store.root()) {
            self.listing.mark_changed();
        }

        let Some(doc) = &self.current else {
            return false;
        };
        if doc.path != changed {
            log::trace!("Change to {:?} is not the open document", changed);
            return false;
        }

        self.reload.mark_changed();
        true
    }

    /// Reload the open document if a reload is due.
    ///
    /// Returns `None` when nothing was done, otherwise the outcome of the
    /// reload. A failed reload keeps the document that was open.
    pub fn poll_reload(&mut self) -> Option<Result<(), StoreError>> {
        let path = self.current.as_ref()?.path.clone();
        if !self.reload.begin_reload() {
            return None;
        }

        let result = self.store.load(&path);
        self.reload.finish_reload(result.is_ok());

        Some(match result {
            Ok(file) => {
                if let Some(doc) = self.current.as_mut() {
                    doc.file = file;
                }
                log::info!("Reloaded {:?} after external change", path);
                Ok(())
            }
            Err(e) => {
                log::warn!("Failed to reload {:?}: {}", path, e);
                Err(e)
            }
        })
    }

    /// Refresh the document list if a refresh is due.
    ///
    /// Returns `None` when nothing was done, otherwise the outcome of the
    /// refresh. A failed refresh keeps the previous list.
    pub fn poll_documents(&mut self) -> Option<Result<(), StoreError>> {
        if !self.listing.begin_reload() {
            return None;
        }

        let result = self.store.list_documents();
        self.listing.finish_reload(result.is_ok());

        Some(match result {
            Ok(documents) => {
                log::debug!(
                    "Document list refreshed: {} -> {} documents",
                    self.documents.len(),
                    documents.len()
                );
                self.documents = documents;
                Ok(())
            }
            Err(e) => {
                log::warn!("Failed to list {:?}: {}", self.store.root(), e);
                Err(e)
            }
        })
    }
}
