#![allow(dead_code)]

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

pub fn write_json(path: &Path, value: &Value) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, serde_json::to_vec_pretty(value).expect("serialize json"))
        .expect("write json file");
}

/// A document in the shape of the Korean text corpus labels.
pub fn book_document() -> Value {
    json!({
        "info": { "name": "book_001", "date_created": "2020-11-02" },
        "images": [
            { "id": 1, "file_name": "book_001.jpg", "width": 800, "height": 1200 },
            { "id": 1, "file_name": "other.jpg", "width": 800, "height": 1200 }
        ],
        "annotations": [
            { "id": 10, "image_id": 1, "bbox": [10, 20, 30, 40], "text": "hello" },
            { "id": 11, "image_id": 1, "bbox": [0, 0, 5.5, 2], "text": "세계" },
            { "id": 12, "image_id": 7, "bbox": [1, 1, 1, 1], "text": "ghost" }
        ]
    })
}

pub fn signboard_document(name: &str, texts: &[&str]) -> Value {
    let annotations: Vec<Value> = texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let x = i as i64 * 10;
            json!({ "image_id": 3, "bbox": [x, 5, 8, 4], "text": text })
        })
        .collect();

    json!({
        "info": { "name": name },
        "images": [ { "id": 3, "file_name": format!("{name}.jpg") } ],
        "annotations": annotations
    })
}

pub fn touch(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, bytes).expect("write file");
}
