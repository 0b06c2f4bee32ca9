//! Fuzz target for annotation document parsing and ground-truth rendering.
//!
//! Run with:
//!   cargo +nightly fuzz run document_json_parse

#![no_main]

use kortext::convert::{build_ground_truth, render_lines, DiagnosticReport, TextEncoding};
use kortext::document::io_json::from_document_slice;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // 10MB is generous for a single-image label file.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(document) = from_document_slice(data) else {
        return;
    };

    let set = build_ground_truth(&document, &mut DiagnosticReport::new());
    for entry in set.entries() {
        let _ = render_lines(&entry.lines, TextEncoding::Quoted);
    }
});
