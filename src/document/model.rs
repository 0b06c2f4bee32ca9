//! Annotation document model.
//!
//! One document describes a single source image: its canonical name, the
//! image records it lists (possibly with duplicates or unrelated variants),
//! and the text boxes annotated on it.

use serde::{Deserialize, Serialize};

use super::bbox::BBoxXYWH;
use super::ids::ImageId;

/// Extension appended to `info.name` to form the canonical image file name.
pub const CANONICAL_IMAGE_EXTENSION: &str = ".jpg";

/// A parsed per-image annotation document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AnnotationDocument {
    /// Document metadata. A missing block behaves like an empty name.
    #[serde(default)]
    pub info: DocumentInfo,

    /// Image records in source order.
    pub images: Vec<ImageRecord>,

    /// Text box annotations in source order.
    pub annotations: Vec<AnnotationRecord>,
}

impl AnnotationDocument {
    /// The image file name this document declares as its own.
    pub fn expected_file_name(&self) -> String {
        format!("{}{}", self.info.name, CANONICAL_IMAGE_EXTENSION)
    }
}

/// The `info` block of a document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Canonical image base name, without extension.
    #[serde(default)]
    pub name: String,
}

/// An image listed by a document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: ImageId,
    pub file_name: String,
}

impl ImageRecord {
    pub fn new(id: impl Into<ImageId>, file_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
        }
    }
}

/// A transcribed text box.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub image_id: ImageId,
    pub bbox: BBoxXYWH,
    pub text: String,
}

impl AnnotationRecord {
    pub fn new(image_id: impl Into<ImageId>, bbox: BBoxXYWH, text: impl Into<String>) -> Self {
        Self {
            image_id: image_id.into(),
            bbox,
            text: text.into(),
        }
    }
}
