//! Documents in an asset directory.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::constants::{FILE_EXTENSION, MAX_NAME_ATTEMPTS, UNTITLED_STEM};
use crate::format::{EncodeOptions, ExcalidrawFile};
use crate::store::error::StoreError;

/// Check if a path has the document extension (case-insensitive).
pub fn is_document_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(FILE_EXTENSION))
}

/// Reads and writes documents below one root directory.
///
/// Relative paths passed to any method are resolved against the root;
/// absolute paths are used as they are.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
    options: EncodeOptions,
}

impl DocumentStore {
    /// Create a store over `root` with default encode options.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            options: EncodeOptions::default(),
        }
    }

    /// Set the options used by [`DocumentStore::save`].
    pub fn with_options(mut self, options: EncodeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Resolve a path against the root.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Read the raw bytes of a document.
    pub fn read_document(&self, path: impl AsRef<Path>) -> Result<Vec<u8>, StoreError> {
        let path = self.resolve(path);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound { path }),
            Err(e) => Err(e.into()),
        }
    }

    /// Write raw bytes to a document, creating parent directories as needed.
    pub fn write_document(&self, path: impl AsRef<Path>, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.resolve(path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, bytes)?;
        log::debug!("Wrote {} bytes to {:?}", bytes.len(), path);
        Ok(())
    }

    /// Document files directly inside the root, sorted by name.
    pub fn list_documents(&self) -> Result<Vec<PathBuf>, StoreError> {
        let mut documents: Vec<PathBuf> = std::fs::read_dir(&self.root)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_document_path(path))
            .collect();

        documents.sort();

        log::debug!(
            "Found {} documents in {:?}",
            documents.len(),
            self.root
        );
        Ok(documents)
    }

    /// Read and decode a document.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<ExcalidrawFile, StoreError> {
        let path = path.as_ref();
        let bytes = self.read_document(path)?;
        let file = ExcalidrawFile::from_slice(&bytes)?;

        if !file.is_version_supported() {
            log::warn!(
                "Document {:?} has version {:?}, newer than supported; content may be lost on save",
                path,
                file.version
            );
        }

        log::info!(
            "Loaded {:?}: {} elements ({} format)",
            path,
            file.elements.len(),
            file.generation()
        );
        Ok(file)
    }

    /// Encode a document with the store's options and write it.
    pub fn save(&self, path: impl AsRef<Path>, file: &ExcalidrawFile) -> Result<(), StoreError> {
        let path = path.as_ref();
        let bytes = file.to_vec(&self.options)?;
        self.write_document(path, &bytes)?;
        log::info!(
            "Saved {:?}: {} elements ({} format)",
            path,
            file.elements.len(),
            self.options.generation
        );
        Ok(())
    }

    /// Create an empty document under the first free "Untitled" name.
    pub fn new_file(&self) -> Result<PathBuf, StoreError> {
        let bytes = ExcalidrawFile::new().to_vec(&self.options)?;
        let path = self.write_new(UNTITLED_STEM, &bytes)?;
        log::info!("Created {:?}", path);
        Ok(path)
    }

    /// Copy an external document into the root under a free name.
    ///
    /// The source is decoded first; anything that is not a readable document
    /// is rejected and nothing is written. The copy keeps the source bytes.
    pub fn import_file(&self, source: impl AsRef<Path>) -> Result<PathBuf, StoreError> {
        let source = source.as_ref();
        if !is_document_path(source) {
            return Err(StoreError::UnsupportedFile {
                path: source.to_path_buf(),
            });
        }

        let bytes = match std::fs::read(source) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound {
                    path: source.to_path_buf(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        ExcalidrawFile::from_slice(&bytes)?;

        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(UNTITLED_STEM);
        let path = self.write_new(stem, &bytes)?;
        log::info!("Imported {:?} as {:?}", source, path);
        Ok(path)
    }

    /// Write bytes to `<stem>.excalidraw`, or `<stem> N.excalidraw` for the
    /// first N that is free. Never overwrites an existing file.
    fn write_new(&self, stem: &str, bytes: &[u8]) -> Result<PathBuf, StoreError> {
        std::fs::create_dir_all(&self.root)?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                format!("{stem}.{FILE_EXTENSION}")
            } else {
                format!("{stem} {attempt}.{FILE_EXTENSION}")
            };
            let path = self.root.join(name);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    fill_new_file(&path, file, bytes)?;
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(StoreError::Io(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free file name for {stem:?} in {:?}", self.root),
        )))
    }
}

/// Write the contents of a file this store just created.
///
/// On failure the file is removed again, so no empty or truncated document
/// is left behind.
fn fill_new_file(path: &Path, mut file: impl Write, bytes: &[u8]) -> std::io::Result<()> {
    let result = file.write_all(bytes).and_then(|()| file.flush());
    drop(file);

    if let Err(e) = result {
        if let Err(remove_err) = std::fs::remove_file(path) {
            log::warn!("Failed to remove partial file {:?}: {}", path, remove_err);
        }
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FormatGeneration;
    use crate::schema::{Element, ElementBase, GenericElement};

    fn sample_file() -> ExcalidrawFile {
        ExcalidrawFile::with_elements(vec![Element::Rectangle(GenericElement::new(
            ElementBase::new("box").with_size(40.0, 30.0),
        ))])
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());

        store.save("drawing.excalidraw", &sample_file()).unwrap();
        assert!(dir.path().join("drawing.excalidraw").is_file());

        let loaded = store.load("drawing.excalidraw").unwrap();
        assert_eq!(loaded.elements, sample_file().elements);
    }

    #[test]
    fn test_save_uses_store_options() {
        let dir = tempfile::tempdir().unwrap();
        let options = EncodeOptions::new()
            .generation(FormatGeneration::V1)
            .pretty(false);
        let store = DocumentStore::new(dir.path()).with_options(options);

        let mut file = sample_file();
        if let Element::Rectangle(rect) = &mut file.elements[0] {
            rect.base.updated = Some(1);
        }
        store.save("v1.excalidraw", &file).unwrap();

        let text = String::from_utf8(store.read_document("v1.excalidraw").unwrap()).unwrap();
        assert!(!text.contains('\n'));
        assert!(!text.contains("updated"));
    }

    #[test]
    fn test_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());
        assert!(matches!(
            store.load("nope.excalidraw"),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_list_documents_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());
        store.write_document("b.excalidraw", b"[]").unwrap();
        store.write_document("a.excalidraw", b"[]").unwrap();
        store.write_document("notes.txt", b"hello").unwrap();
        std::fs::create_dir(dir.path().join("sub.excalidraw")).unwrap();

        let names: Vec<String> = store
            .list_documents()
            .unwrap()
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(String::from))
            .collect();
        assert_eq!(names, vec!["a.excalidraw", "b.excalidraw"]);
    }

    #[test]
    fn test_new_file_picks_first_free_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());

        let first = store.new_file().unwrap();
        let second = store.new_file().unwrap();
        std::fs::remove_file(&first).unwrap();
        let third = store.new_file().unwrap();

        assert_eq!(first.file_name().unwrap(), "Untitled.excalidraw");
        assert_eq!(second.file_name().unwrap(), "Untitled 1.excalidraw");
        assert_eq!(third, first);

        let created = store.load(&second).unwrap();
        assert!(created.elements.is_empty());
        assert_eq!(created.kind.as_deref(), Some("excalidraw"));
    }

    #[test]
    fn test_import_copies_under_free_name() {
        let source_dir = tempfile::tempdir().unwrap();
        let target_dir = tempfile::tempdir().unwrap();
        let source = source_dir.path().join("plan.excalidraw");
        let bytes = sample_file()
            .to_vec(&EncodeOptions::default())
            .unwrap();
        std::fs::write(&source, &bytes).unwrap();

        let store = DocumentStore::new(target_dir.path());
        let first = store.import_file(&source).unwrap();
        let second = store.import_file(&source).unwrap();

        assert_eq!(first.file_name().unwrap(), "plan.excalidraw");
        assert_eq!(second.file_name().unwrap(), "plan 1.excalidraw");
        assert_eq!(std::fs::read(&first).unwrap(), bytes);
    }

    #[test]
    fn test_import_rejects_malformed_and_foreign_files() {
        let source_dir = tempfile::tempdir().unwrap();
        let target_dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(target_dir.path());

        let broken = source_dir.path().join("broken.excalidraw");
        std::fs::write(&broken, r#"{"type":"excalidraw","elements":[{"type":"sticker"}]}"#)
            .unwrap();
        assert!(matches!(
            store.import_file(&broken),
            Err(StoreError::Format(_))
        ));

        let text = source_dir.path().join("notes.txt");
        std::fs::write(&text, "[]").unwrap();
        assert!(matches!(
            store.import_file(&text),
            Err(StoreError::UnsupportedFile { .. })
        ));

        assert!(store.list_documents().unwrap().is_empty());
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_write_removes_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Untitled.excalidraw");
        std::fs::write(&path, b"").unwrap();

        let result = fill_new_file(&path, FailingWriter, b"[]");
        assert!(result.is_err());
        assert!(!path.exists());

        let store = DocumentStore::new(dir.path());
        assert!(store.list_documents().unwrap().is_empty());
    }

    #[test]
    fn test_new_file_is_complete() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());
        let path = store.new_file().unwrap();

        let expected = ExcalidrawFile::new().to_vec(store.options()).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), expected);
    }

    #[test]
    fn test_is_document_path() {
        assert!(is_document_path(Path::new("a/b.excalidraw")));
        assert!(is_document_path(Path::new("B.EXCALIDRAW")));
        assert!(!is_document_path(Path::new("b.excalidraw.json")));
        assert!(!is_document_path(Path::new("excalidraw")));
    }
}
