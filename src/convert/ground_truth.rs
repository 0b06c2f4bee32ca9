//! Ground-truth accumulation, rendering and writing.
//!
//! A [`GroundTruthSet`] holds every line destined for every output file of
//! one document, in order. Nothing touches the disk until
//! [`GroundTruthWriter::write`] renders each entry and writes it in one go,
//! so converting the same document twice produces the same files.

use std::collections::{HashMap, HashSet};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use super::report::{DiagnosticSink, IssueCode};
use crate::document::{Quad, Scalar};
use crate::error::KortextError;

/// Suffix appended to an image file name to form its ground-truth file name.
pub const GROUND_TRUTH_SUFFIX: &str = ".txt";

/// How transcriptions are written into the comma-separated line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextEncoding {
    /// CSV quoting: text containing `,`, `"` or a line break is wrapped in
    /// double quotes with inner quotes doubled. Plain text is unchanged.
    #[default]
    Quoted,
    /// Text is written verbatim. Delimiters or newlines inside a
    /// transcription will corrupt the line structure.
    Raw,
}

/// One text region in a ground-truth file.
#[derive(Clone, Debug, PartialEq)]
pub struct GroundTruthLine {
    pub quad: Quad,
    pub text: String,
}

/// All lines destined for one ground-truth file.
#[derive(Clone, Debug, PartialEq)]
pub struct GroundTruthEntry {
    /// Image file name; the output file is `<file_name>.txt`.
    pub file_name: String,
    pub lines: Vec<GroundTruthLine>,
}

/// Ordered per-file accumulator for a single document.
#[derive(Clone, Debug, Default)]
pub struct GroundTruthSet {
    entries: Vec<GroundTruthEntry>,
    positions: HashMap<String, usize>,
    /// Annotations dropped because their image id did not resolve.
    pub annotations_skipped: usize,
}

impl GroundTruthSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a line to the entry for `file_name`, creating it if needed.
    pub fn push_line(&mut self, file_name: &str, line: GroundTruthLine) {
        let idx = self.entry_index(file_name);
        self.entries[idx].lines.push(line);
    }

    /// Ensures an entry exists for `file_name`. Returns true if it was created.
    pub fn ensure_file(&mut self, file_name: &str) -> bool {
        let before = self.entries.len();
        self.entry_index(file_name);
        self.entries.len() > before
    }

    /// Entries in first-encounter order.
    pub fn entries(&self) -> &[GroundTruthEntry] {
        &self.entries
    }

    pub fn get(&self, file_name: &str) -> Option<&GroundTruthEntry> {
        self.positions.get(file_name).map(|&idx| &self.entries[idx])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of lines across all entries.
    pub fn line_count(&self) -> usize {
        self.entries.iter().map(|e| e.lines.len()).sum()
    }

    fn entry_index(&mut self, file_name: &str) -> usize {
        if let Some(&idx) = self.positions.get(file_name) {
            return idx;
        }
        let idx = self.entries.len();
        self.entries.push(GroundTruthEntry {
            file_name: file_name.to_string(),
            lines: Vec::new(),
        });
        self.positions.insert(file_name.to_string(), idx);
        idx
    }
}

/// Formats a coordinate the way it appears in ground-truth lines.
///
/// Integers print without a fraction and floats always keep one, so a `10.0`
/// in the label file comes back out as `10.0`.
pub fn format_coord(value: Scalar) -> String {
    value.to_string()
}

/// Renders the lines of one file, each terminated by `\n`.
pub fn render_lines(
    lines: &[GroundTruthLine],
    encoding: TextEncoding,
) -> Result<String, csv::Error> {
    match encoding {
        TextEncoding::Raw => {
            let mut out = String::new();
            for line in lines {
                for value in line.quad.to_flat() {
                    out.push_str(&format_coord(value));
                    out.push(',');
                }
                out.push_str(&line.text);
                out.push('\n');
            }
            Ok(out)
        }
        TextEncoding::Quoted => render_quoted(lines),
    }
}

fn render_quoted(lines: &[GroundTruthLine]) -> Result<String, csv::Error> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for line in lines {
        let mut record: Vec<String> = line.quad.to_flat().into_iter().map(format_coord).collect();
        record.push(line.text.clone());
        wtr.write_record(&record)?;
    }

    let bytes = wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| csv::Error::from(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Writes ground-truth sets into an output directory.
///
/// The first write of a file within one writer's lifetime truncates it.
/// Any later write to the same path appends and emits a
/// [`IssueCode::DuplicateOutput`] warning.
#[derive(Debug)]
pub struct GroundTruthWriter {
    output_dir: PathBuf,
    encoding: TextEncoding,
    claimed: HashSet<PathBuf>,
}

/// Counts from one [`GroundTruthWriter::write`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteStats {
    pub files: usize,
    pub lines: usize,
}

impl GroundTruthWriter {
    pub fn new(output_dir: impl Into<PathBuf>, encoding: TextEncoding) -> Self {
        Self {
            output_dir: output_dir.into(),
            encoding,
            claimed: HashSet::new(),
        }
    }

    /// Path of the ground-truth file for an image file name.
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}{}", file_name, GROUND_TRUTH_SUFFIX))
    }

    /// Writes every entry of `set`, empty entries included.
    ///
    /// An empty entry for a file that was already written in this run leaves
    /// that file untouched.
    pub fn write(
        &mut self,
        set: &GroundTruthSet,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<WriteStats, KortextError> {
        fs::create_dir_all(&self.output_dir).map_err(KortextError::Io)?;

        let mut stats = WriteStats::default();
        for entry in set.entries() {
            let path = self.path_for(&entry.file_name);
            let content = render_lines(&entry.lines, self.encoding).map_err(|source| {
                KortextError::GroundTruthWrite {
                    path: path.clone(),
                    message: source.to_string(),
                }
            })?;

            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(KortextError::Io)?;
            }

            if self.claimed.contains(&path) {
                if entry.lines.is_empty() {
                    continue;
                }
                sink.warn(
                    IssueCode::DuplicateOutput,
                    format!(
                        "{} was already written in this run, appending {} line(s)",
                        path.display(),
                        entry.lines.len()
                    ),
                );
                let mut file = OpenOptions::new()
                    .append(true)
                    .open(&path)
                    .map_err(KortextError::Io)?;
                file.write_all(content.as_bytes())
                    .map_err(KortextError::Io)?;
            } else {
                fs::write(&path, content.as_bytes()).map_err(KortextError::Io)?;
                self.claimed.insert(path);
            }

            stats.files += 1;
            stats.lines += entry.lines.len();
        }

        Ok(stats)
    }
}
