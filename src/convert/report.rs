//! Diagnostics and summaries for ground-truth conversion.
//!
//! Recoverable problems (an annotation pointing at an unknown image, a
//! document whose canonical image is missing) never abort a conversion.
//! They are handed to a [`DiagnosticSink`] supplied by the caller, so the CLI
//! can forward them to the log while tests collect them in a
//! [`DiagnosticReport`].

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Receiver for conversion diagnostics.
pub trait DiagnosticSink {
    /// Record a warning-level issue.
    fn warn(&mut self, code: IssueCode, message: String);

    /// Record a debug-level note.
    fn debug(&mut self, code: IssueCode, message: String);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn warn(&mut self, code: IssueCode, message: String) {
        (**self).warn(code, message);
    }

    fn debug(&mut self, code: IssueCode, message: String) {
        (**self).debug(code, message);
    }
}

/// Forwards diagnostics to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn warn(&mut self, code: IssueCode, message: String) {
        log::warn!("[{}] {}", code, message);
    }

    fn debug(&mut self, code: IssueCode, message: String) {
        log::debug!("[{}] {}", code, message);
    }
}

/// Collects diagnostics in memory.
#[derive(Clone, Debug, Default, Serialize)]
pub struct DiagnosticReport {
    pub issues: Vec<Diagnostic>,
}

impl DiagnosticReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count of warning-level issues.
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    /// Count of issues carrying `code`.
    pub fn count(&self, code: IssueCode) -> usize {
        self.issues.iter().filter(|i| i.code == code).count()
    }

    pub fn has(&self, code: IssueCode) -> bool {
        self.count(code) > 0
    }
}

impl DiagnosticSink for DiagnosticReport {
    fn warn(&mut self, code: IssueCode, message: String) {
        self.issues.push(Diagnostic {
            severity: Severity::Warning,
            code,
            message,
        });
    }

    fn debug(&mut self, code: IssueCode, message: String) {
        self.issues.push(Diagnostic {
            severity: Severity::Debug,
            code,
            message,
        });
    }
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let warnings = self.warning_count();
        if warnings == 0 {
            return writeln!(f, "No warnings.");
        }

        writeln!(f, "Warnings ({}):", warnings)?;
        for issue in self
            .issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
        {
            writeln!(f, "  - [{}] {}", issue.code, issue.message)?;
        }
        Ok(())
    }
}

/// A single recorded diagnostic.
#[derive(Clone, Debug, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: IssueCode,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Debug,
}

/// Stable issue codes for programmatic consumption.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// An annotation references an image id absent from the selected index.
    MissingImageMapping,
    /// No image matched the canonical file name; first-seen-per-id was used.
    FallbackSelection,
    /// An image had no annotations and received an empty ground-truth file.
    EmptyGroundTruth,
    /// A ground-truth file was already written earlier in the same batch.
    DuplicateOutput,
    /// A label directory passed to the batch driver does not exist.
    MissingLabelDir,
    /// A document could not be converted and was skipped by the batch driver.
    DocumentFailed,
}

impl IssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::MissingImageMapping => "missing_image_mapping",
            IssueCode::FallbackSelection => "fallback_selection",
            IssueCode::EmptyGroundTruth => "empty_ground_truth",
            IssueCode::DuplicateOutput => "duplicate_output",
            IssueCode::MissingLabelDir => "missing_label_dir",
            IssueCode::DocumentFailed => "document_failed",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of converting one document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConvertedDocument {
    /// Ground-truth files written (including empty ones).
    pub files_written: usize,
    /// Lines written across all files.
    pub lines_written: usize,
    /// Annotations dropped because their image id did not resolve.
    pub annotations_skipped: usize,
}

/// Totals for a batch of documents.
#[derive(Clone, Debug, Default, Serialize)]
pub struct BatchSummary {
    /// Documents discovered.
    pub documents: usize,
    /// Documents converted successfully.
    pub converted: usize,
    /// Documents that failed, with the error message.
    pub failed: Vec<FailedDocument>,
    pub files_written: usize,
    pub lines_written: usize,
    pub annotations_skipped: usize,
}

impl BatchSummary {
    /// Folds one converted document into the totals.
    pub fn record(&mut self, converted: &ConvertedDocument) {
        self.converted += 1;
        self.files_written += converted.files_written;
        self.lines_written += converted.lines_written;
        self.annotations_skipped += converted.annotations_skipped;
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  {} document(s), {} converted, {} failed",
            self.documents,
            self.converted,
            self.failed.len()
        )?;
        writeln!(
            f,
            "  {} ground-truth file(s), {} line(s), {} annotation(s) skipped",
            self.files_written, self.lines_written, self.annotations_skipped
        )?;
        for failure in &self.failed {
            writeln!(f, "  - {}: {}", failure.path.display(), failure.message)?;
        }
        Ok(())
    }
}

/// A document the batch driver could not convert.
#[derive(Clone, Debug, Serialize)]
pub struct FailedDocument {
    pub path: PathBuf,
    pub message: String,
}
