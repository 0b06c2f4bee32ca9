//! Annotation document to ground-truth conversion.
//!
//! A document may list several image records, some sharing an id, some
//! belonging to other images entirely. Conversion therefore first settles
//! which record each id stands for ([`select_images`]), then turns every
//! resolvable annotation into a quadrilateral line ([`build_ground_truth`]),
//! and finally writes one file per listed image ([`GroundTruthWriter`]).
//!
//! # Image selection
//!
//! 1. The record whose `file_name` equals `info.name + ".jpg"` wins outright;
//!    it is the only record placed in the index.
//! 2. Without such a record, every record is indexed by id with the first
//!    occurrence of each id winning, and a
//!    [`IssueCode::FallbackSelection`] warning is emitted.
//!
//! # Output guarantee
//!
//! Every record in `images` gets a ground-truth file, whether or not it was
//! selected or annotated. Images without annotations get an empty file.

mod ground_truth;
mod report;

pub use ground_truth::{
    format_coord, render_lines, GroundTruthEntry, GroundTruthLine, GroundTruthSet,
    GroundTruthWriter, TextEncoding, WriteStats, GROUND_TRUTH_SUFFIX,
};
pub use report::{
    BatchSummary, ConvertedDocument, Diagnostic, DiagnosticReport, DiagnosticSink,
    FailedDocument, IssueCode, LogSink, Severity,
};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::document::io_json::read_document;
use crate::document::{AnnotationDocument, ImageId, ImageRecord};
use crate::error::KortextError;

const DOCUMENT_EXTENSION: &str = "json";

/// Options for ground-truth conversion.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConvertOptions {
    pub encoding: TextEncoding,
}

/// Image records selected to represent each id of a document.
#[derive(Clone, Debug, Default)]
pub struct ImageIndex<'a> {
    by_id: BTreeMap<ImageId, &'a ImageRecord>,
    fallback: bool,
}

impl<'a> ImageIndex<'a> {
    pub fn get(&self, id: &ImageId) -> Option<&'a ImageRecord> {
        self.by_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// True if no record matched the canonical file name.
    pub fn used_fallback(&self) -> bool {
        self.fallback
    }
}

/// Resolves which image record stands for each id in the document.
pub fn select_images<'a>(
    document: &'a AnnotationDocument,
    sink: &mut dyn DiagnosticSink,
) -> ImageIndex<'a> {
    let expected = document.expected_file_name();

    if let Some(canonical) = document.images.iter().find(|img| img.file_name == expected) {
        let mut by_id = BTreeMap::new();
        by_id.insert(canonical.id.clone(), canonical);
        return ImageIndex {
            by_id,
            fallback: false,
        };
    }

    sink.warn(
        IssueCode::FallbackSelection,
        format!(
            "expected image {} not found, falling back to first image for each id",
            expected
        ),
    );

    let mut by_id = BTreeMap::new();
    for image in &document.images {
        by_id.entry(image.id.clone()).or_insert(image);
    }
    ImageIndex {
        by_id,
        fallback: true,
    }
}

/// Builds the in-memory ground truth for one document.
///
/// Lines follow annotation order. Annotations whose `image_id` is not in the
/// selected index are skipped with a [`IssueCode::MissingImageMapping`]
/// warning. Every listed image ends up with an entry, empty or not.
pub fn build_ground_truth(
    document: &AnnotationDocument,
    sink: &mut dyn DiagnosticSink,
) -> GroundTruthSet {
    let index = select_images(document, sink);
    let mut set = GroundTruthSet::new();

    for annotation in &document.annotations {
        let Some(image) = index.get(&annotation.image_id) else {
            sink.warn(
                IssueCode::MissingImageMapping,
                format!(
                    "no image info for image_id {}, skipping annotation",
                    annotation.image_id
                ),
            );
            set.annotations_skipped += 1;
            continue;
        };

        set.push_line(
            &image.file_name,
            GroundTruthLine {
                quad: annotation.bbox.corners(),
                text: annotation.text.clone(),
            },
        );
    }

    for image in &document.images {
        if set.ensure_file(&image.file_name) {
            sink.debug(
                IssueCode::EmptyGroundTruth,
                format!(
                    "{} has no annotations, creating an empty ground-truth file",
                    image.file_name
                ),
            );
        }
    }

    set
}

/// Converts a parsed document into ground-truth files under `output_dir`.
///
/// The output directory is created if needed. Existing ground-truth files for
/// this document's images are replaced, so repeated runs are idempotent.
pub fn convert_document(
    document: &AnnotationDocument,
    output_dir: &Path,
    opts: &ConvertOptions,
    sink: &mut dyn DiagnosticSink,
) -> Result<ConvertedDocument, KortextError> {
    let mut writer = GroundTruthWriter::new(output_dir, opts.encoding);
    convert_with_writer(document, &mut writer, sink)
}

/// Converts a document through an existing writer.
///
/// Sharing a writer across documents makes later documents append to files
/// that earlier ones already produced.
pub fn convert_with_writer(
    document: &AnnotationDocument,
    writer: &mut GroundTruthWriter,
    sink: &mut dyn DiagnosticSink,
) -> Result<ConvertedDocument, KortextError> {
    let set = build_ground_truth(document, sink);
    let stats = writer.write(&set, sink)?;

    Ok(ConvertedDocument {
        files_written: stats.files,
        lines_written: stats.lines,
        annotations_skipped: set.annotations_skipped,
    })
}

/// Reads and converts one document file.
pub fn convert_file(
    path: &Path,
    writer: &mut GroundTruthWriter,
    sink: &mut dyn DiagnosticSink,
) -> Result<ConvertedDocument, KortextError> {
    let document = read_document(path)?;
    convert_with_writer(&document, writer, sink)
}

/// Lists annotation documents (`*.json`) directly inside `label_dir`, sorted.
pub fn discover_documents(label_dir: &Path) -> Result<Vec<PathBuf>, KortextError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(label_dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|source| KortextError::DirectoryTraversal {
            path: label_dir.to_path_buf(),
            message: source.to_string(),
        })?;

        let is_document = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(DOCUMENT_EXTENSION));

        if entry.file_type().is_file() && is_document {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// Converts every document in `label_dir` into `output_dir`.
///
/// Documents are processed one at a time in path order. A document that
/// fails is recorded in the summary and reported as
/// [`IssueCode::DocumentFailed`]; the rest still run. A missing `label_dir`
/// yields an empty summary and a [`IssueCode::MissingLabelDir`] warning.
pub fn convert_dir(
    label_dir: &Path,
    output_dir: &Path,
    opts: &ConvertOptions,
    sink: &mut dyn DiagnosticSink,
) -> Result<BatchSummary, KortextError> {
    let mut summary = BatchSummary::default();

    if !label_dir.is_dir() {
        sink.warn(
            IssueCode::MissingLabelDir,
            format!("label directory {} does not exist", label_dir.display()),
        );
        return Ok(summary);
    }

    let documents = discover_documents(label_dir)?;
    summary.documents = documents.len();
    log::debug!(
        "{} annotation document(s) found in {}",
        documents.len(),
        label_dir.display()
    );

    let mut writer = GroundTruthWriter::new(output_dir, opts.encoding);
    for path in documents {
        match convert_file(&path, &mut writer, sink) {
            Ok(converted) => summary.record(&converted),
            Err(err) => {
                sink.warn(
                    IssueCode::DocumentFailed,
                    format!("skipping {}: {}", path.display(), err),
                );
                summary.failed.push(FailedDocument {
                    path,
                    message: err.to_string(),
                });
            }
        }
    }

    Ok(summary)
}
