use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

mod common;
use common::{book_document, signboard_document, touch, write_json};

fn kortext() -> Command {
    let mut cmd = Command::cargo_bin("kortext").unwrap();
    cmd.env_remove("RUST_LOG").env_remove("KORTEXT_ROOT");
    cmd
}

#[test]
fn runs() {
    kortext().assert().success();
}

#[test]
fn outputs_tool_name() {
    kortext()
        .arg("-V")
        .assert()
        .success()
        .stdout(format!("kortext {}\n", env!("CARGO_PKG_VERSION")));
}

// Convert subcommand tests

#[test]
fn convert_uses_root_defaults() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let root = temp.path();
    write_json(&root.join("train_labels/book_001.json"), &book_document());
    write_json(
        &root.join("test_labels/sign_01.json"),
        &signboard_document("sign_01", &["출구"]),
    );

    kortext()
        .args(["convert", "--root"])
        .arg(root)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 document(s), 1 converted, 0 failed"))
        .stderr(predicate::str::contains("missing_image_mapping"));

    assert_eq!(
        fs::read_to_string(root.join("train_gts/book_001.jpg.txt")).unwrap(),
        "10,20,40,20,40,60,10,60,hello\n0,0,5.5,0,5.5,2,0,2,세계\n"
    );
    assert!(root.join("train_gts/other.jpg.txt").is_file());
    assert_eq!(
        fs::read_to_string(root.join("test_gts/sign_01.jpg.txt")).unwrap(),
        "0,5,8,5,8,9,0,9,출구\n"
    );
}

#[test]
fn convert_reads_root_from_env() {
    let temp = tempfile::tempdir().expect("create temp dir");
    write_json(
        &temp.path().join("train_labels/sign_02.json"),
        &signboard_document("sign_02", &["입구"]),
    );

    kortext()
        .env("KORTEXT_ROOT", temp.path())
        .arg("convert")
        .assert()
        .success();

    assert!(temp.path().join("train_gts/sign_02.jpg.txt").is_file());
}

#[test]
fn convert_json_output_reports_totals() {
    let temp = tempfile::tempdir().expect("create temp dir");
    write_json(&temp.path().join("train_labels/book_001.json"), &book_document());

    kortext()
        .args(["convert", "--output", "json", "--root"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"annotations_skipped\": 1"))
        .stdout(predicate::str::contains("\"files_written\": 2"));
}

#[test]
fn convert_with_broken_document_fails_after_processing_rest() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let root = temp.path();
    touch(&root.join("train_labels/a_broken.json"), b"{ not json");
    write_json(
        &root.join("train_labels/b_sign.json"),
        &signboard_document("b_sign", &["약국"]),
    );

    kortext()
        .args(["convert", "--root"])
        .arg(root)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Conversion failed for 1 of 2 document(s)"));

    assert!(root.join("train_gts/b_sign.jpg.txt").is_file());
}

#[test]
fn convert_explicit_paths_override_root() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let labels = temp.path().join("custom_labels");
    let out = temp.path().join("custom_out");
    write_json(&labels.join("sign_03.json"), &signboard_document("sign_03", &["a,b"]));

    kortext()
        .args(["convert", "--raw-text", "--train-label-path"])
        .arg(&labels)
        .arg("--train-output-dir")
        .arg(&out)
        .arg("--root")
        .arg(temp.path())
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(out.join("sign_03.jpg.txt")).unwrap(),
        "0,5,8,5,8,9,0,9,a,b\n"
    );
}

// List subcommand tests

#[test]
fn list_writes_both_manifests() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let root = temp.path();
    touch(&root.join("train_images/b.jpg"), b"");
    touch(&root.join("train_images/a.PNG"), b"");
    touch(&root.join("train_images/a.json"), b"{}");
    touch(&root.join("test_images/c.jpeg"), b"");

    kortext()
        .args(["list", "--root"])
        .arg(root)
        .assert()
        .success()
        .stdout(predicate::str::contains("Listed 2 training image(s)"));

    assert_eq!(
        fs::read_to_string(root.join("train_list.txt")).unwrap(),
        "a.PNG\nb.jpg\n"
    );
    assert_eq!(fs::read_to_string(root.join("test_list.txt")).unwrap(), "c.jpeg\n");
}

#[test]
fn list_missing_image_dir_fails() {
    let temp = tempfile::tempdir().expect("create temp dir");
    kortext()
        .args(["list", "--root"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("image directory does not exist"));
}

// Split subcommand tests

#[test]
fn split_copies_images_and_labels() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let root = temp.path();
    for i in 0..8 {
        touch(&root.join(format!("origin_images/img_{i}.jpg")), b"jpg");
        if i != 3 {
            touch(&root.join(format!("origin_labels/img_{i}.json")), b"{}");
        }
    }

    kortext()
        .args(["split", "--root"])
        .arg(root)
        .assert()
        .success()
        .stdout(predicate::str::contains("Split 8 image(s): 6 train, 2 test"))
        .stdout(predicate::str::contains("Copied 7 label(s), 1 missing"))
        .stderr(predicate::str::contains("img_3.json"));

    let train = fs::read_dir(root.join("train_images")).unwrap().count();
    let test = fs::read_dir(root.join("test_images")).unwrap().count();
    assert_eq!((train, test), (6, 2));
}

#[test]
fn split_rejects_invalid_test_size() {
    let temp = tempfile::tempdir().expect("create temp dir");
    touch(&temp.path().join("origin_images/a.jpg"), b"");

    kortext()
        .args(["split", "--test-size", "1.5", "--root"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid split parameters"));
}
