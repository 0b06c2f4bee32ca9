//! Annotation document JSON reader.
//!
//! Documents look like:
//!
//! ```json
//! {
//!   "info": { "name": "book_001" },
//!   "images": [ { "id": 1, "file_name": "book_001.jpg" } ],
//!   "annotations": [
//!     { "image_id": 1, "bbox": [10, 20, 30, 40], "text": "hello" }
//!   ]
//! }
//! ```
//!
//! Any other keys (image sizes, licenses, per-box attributes) are ignored.
//! Missing `images` or `annotations`, a `bbox` that is not four numbers, or
//! a non-string `text` make the whole document invalid.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::model::AnnotationDocument;
use crate::error::KortextError;

/// Reads an annotation document from a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be opened or is not a valid document.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use kortext::document::io_json::read_document;
///
/// let doc = read_document(Path::new("train_labels/book_001.json"))?;
/// # Ok::<(), kortext::KortextError>(())
/// ```
pub fn read_document(path: &Path) -> Result<AnnotationDocument, KortextError> {
    let file = File::open(path).map_err(KortextError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| KortextError::DocumentParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads an annotation document from a JSON string.
///
/// Useful for testing without file I/O.
pub fn from_document_str(json: &str) -> Result<AnnotationDocument, serde_json::Error> {
    serde_json::from_str(json)
}

/// Reads an annotation document from a JSON byte slice.
///
/// Useful for fuzzing and processing raw bytes without UTF-8 validation overhead.
pub fn from_document_slice(bytes: &[u8]) -> Result<AnnotationDocument, serde_json::Error> {
    serde_json::from_slice(bytes)
}
