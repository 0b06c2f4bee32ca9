//! Image list manifests.
//!
//! A manifest is a plain text file naming every image of a directory, one
//! file name per line. Training scripts read `train_list.txt` and
//! `test_list.txt` to know which images belong to which split.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::KortextError;

/// Extensions (case-insensitive) that count as images.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Returns true if `path` has one of the [`IMAGE_EXTENSIONS`].
pub fn is_image_file(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    IMAGE_EXTENSIONS
        .iter()
        .any(|allowed| ext.eq_ignore_ascii_case(allowed))
}

/// File names of the images directly inside `dir`, sorted.
pub fn list_images(dir: &Path) -> Result<Vec<String>, KortextError> {
    if !dir.is_dir() {
        return Err(KortextError::ManifestFailed {
            path: dir.to_path_buf(),
            message: "image directory does not exist".to_string(),
        });
    }

    let mut names = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|source| KortextError::DirectoryTraversal {
            path: dir.to_path_buf(),
            message: source.to_string(),
        })?;

        if entry.file_type().is_file() && is_image_file(entry.path()) {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    names.sort();
    Ok(names)
}

/// Writes the manifest for `image_dir` to `manifest_path`.
///
/// Returns the number of images listed.
pub fn write_manifest(image_dir: &Path, manifest_path: &Path) -> Result<usize, KortextError> {
    let names = list_images(image_dir)?;

    if let Some(parent) = manifest_path.parent() {
        fs::create_dir_all(parent).map_err(KortextError::Io)?;
    }

    let mut content = String::new();
    for name in &names {
        content.push_str(name);
        content.push('\n');
    }
    fs::write(manifest_path, content).map_err(KortextError::Io)?;

    log::debug!(
        "wrote {} image name(s) from {} to {}",
        names.len(),
        image_dir.display(),
        manifest_path.display()
    );
    Ok(names.len())
}
