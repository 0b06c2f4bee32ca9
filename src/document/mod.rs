//! Annotation documents for the Korean text OCR corpus.
//!
//! Each source label file is one [`AnnotationDocument`]: an `info` block
//! naming the canonical image, the image records it lists, and the text boxes
//! transcribed on them. Boxes are kept in their native `[x, y, w, h]` form;
//! [`BBoxXYWH::corners`] produces the quadrilateral used by ground-truth files.
//!
//! # Example
//!
//! ```
//! use kortext::document::{AnnotationDocument, AnnotationRecord, BBoxXYWH, DocumentInfo, ImageRecord};
//!
//! let doc = AnnotationDocument {
//!     info: DocumentInfo { name: "book_001".into() },
//!     images: vec![ImageRecord::new(1u64, "book_001.jpg")],
//!     annotations: vec![AnnotationRecord::new(
//!         1u64,
//!         BBoxXYWH::new(10, 20, 30, 40),
//!         "hello",
//!     )],
//! };
//! assert_eq!(doc.expected_file_name(), "book_001.jpg");
//! ```

mod bbox;
mod ids;
pub mod io_json;
mod model;

pub use bbox::{BBoxXYWH, Coord, Quad, Scalar};
pub use ids::ImageId;
pub use model::{
    AnnotationDocument, AnnotationRecord, DocumentInfo, ImageRecord, CANONICAL_IMAGE_EXTENSION,
};
