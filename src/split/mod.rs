//! Train/test splitting of the raw image + label corpus.
//!
//! The origin corpus keeps images in one directory and their JSON labels in
//! another, paired by file stem (`간판_001.jpg` ↔ `간판_001.json`). Splitting
//! shuffles the images with a fixed seed, cuts off the test share, and copies
//! each image with its label into the matching train or test directories.
//! Copies run in parallel; a missing label is a warning, not an error.

use std::fs;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

use crate::error::KortextError;

const LABEL_EXTENSION: &str = "json";

/// Split options.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitOptions {
    /// Fraction of images assigned to the test split, in `(0.0, 1.0)`.
    pub test_size: f64,
    /// Seed for the shuffle.
    pub seed: u64,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            test_size: 0.25,
            seed: 42,
        }
    }
}

/// Source and destination directories for a split.
#[derive(Clone, Debug)]
pub struct SplitLayout {
    pub origin_image_dir: PathBuf,
    pub origin_label_dir: PathBuf,
    pub train_image_dir: PathBuf,
    pub train_label_dir: PathBuf,
    pub test_image_dir: PathBuf,
    pub test_label_dir: PathBuf,
}

/// Images assigned to each side of the split, each sorted by path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SplitPlan {
    pub train: Vec<PathBuf>,
    pub test: Vec<PathBuf>,
}

/// What a split actually copied.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SplitReport {
    pub train_images: usize,
    pub test_images: usize,
    pub labels_copied: usize,
    pub missing_labels: Vec<PathBuf>,
    pub failures: Vec<CopyFailure>,
}

/// A file that could not be copied.
#[derive(Clone, Debug, Serialize)]
pub struct CopyFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Validate split options before running.
pub fn validate_split_options(opts: &SplitOptions) -> Result<(), KortextError> {
    if !(opts.test_size.is_finite() && 0.0 < opts.test_size && opts.test_size < 1.0) {
        return Err(KortextError::InvalidSplitParams {
            message: "--test-size must be in the interval (0.0, 1.0)".to_string(),
        });
    }
    Ok(())
}

/// Regular files directly inside `dir`, sorted by path.
pub fn collect_origin_images(dir: &Path) -> Result<Vec<PathBuf>, KortextError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|source| KortextError::DirectoryTraversal {
            path: dir.to_path_buf(),
            message: source.to_string(),
        })?;

        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// Number of test images for a corpus of `total`.
pub fn test_count(total: usize, test_size: f64) -> usize {
    ((total as f64 * test_size).ceil() as usize).min(total)
}

/// Shuffles `files` with the seeded RNG and cuts off the test share.
///
/// The result only depends on the set of input paths and the options, not
/// on the order `files` arrive in.
pub fn plan_split(files: &[PathBuf], opts: &SplitOptions) -> Result<SplitPlan, KortextError> {
    validate_split_options(opts)?;

    if files.is_empty() {
        return Err(KortextError::SplitFailed {
            message: "no origin images to split".to_string(),
        });
    }

    let n_test = test_count(files.len(), opts.test_size);
    let n_train = files.len() - n_test;
    if n_train == 0 || n_test == 0 {
        return Err(KortextError::SplitFailed {
            message: format!(
                "{} image(s) with test size {} leaves an empty split ({} train, {} test)",
                files.len(),
                opts.test_size,
                n_train,
                n_test
            ),
        });
    }

    let mut shuffled = files.to_vec();
    shuffled.sort();
    let mut rng = StdRng::seed_from_u64(opts.seed);
    shuffled.shuffle(&mut rng);

    let mut test = shuffled.split_off(n_train);
    let mut train = shuffled;
    train.sort();
    test.sort();

    Ok(SplitPlan { train, test })
}

enum CopyOutcome {
    Copied { label: bool },
    LabelMissing(PathBuf),
    Failed(CopyFailure),
}

/// Copies planned images and their labels into the layout's target dirs.
pub fn copy_split(plan: &SplitPlan, layout: &SplitLayout) -> Result<SplitReport, KortextError> {
    for dir in [
        &layout.train_image_dir,
        &layout.train_label_dir,
        &layout.test_image_dir,
        &layout.test_label_dir,
    ] {
        fs::create_dir_all(dir).map_err(KortextError::Io)?;
    }

    let jobs: Vec<(&PathBuf, &Path, &Path)> = plan
        .train
        .iter()
        .map(|img| (img, layout.train_image_dir.as_path(), layout.train_label_dir.as_path()))
        .chain(
            plan.test
                .iter()
                .map(|img| (img, layout.test_image_dir.as_path(), layout.test_label_dir.as_path())),
        )
        .collect();

    let outcomes: Vec<Vec<CopyOutcome>> = jobs
        .into_par_iter()
        .map(|(image, image_dir, label_dir)| {
            copy_pair(image, &layout.origin_label_dir, image_dir, label_dir)
        })
        .collect();

    let mut report = SplitReport {
        train_images: plan.train.len(),
        test_images: plan.test.len(),
        ..Default::default()
    };
    for outcome in outcomes.into_iter().flatten() {
        match outcome {
            CopyOutcome::Copied { label: true } => report.labels_copied += 1,
            CopyOutcome::Copied { label: false } => {}
            CopyOutcome::LabelMissing(path) => report.missing_labels.push(path),
            CopyOutcome::Failed(failure) => report.failures.push(failure),
        }
    }

    Ok(report)
}

fn copy_pair(
    image: &Path,
    origin_label_dir: &Path,
    image_dir: &Path,
    label_dir: &Path,
) -> Vec<CopyOutcome> {
    let mut outcomes = Vec::with_capacity(2);

    let Some(image_name) = image.file_name() else {
        outcomes.push(CopyOutcome::Failed(CopyFailure {
            path: image.to_path_buf(),
            message: "path has no file name".to_string(),
        }));
        return outcomes;
    };

    let dest_image = image_dir.join(image_name);
    log::debug!("copying {} to {}", image.display(), dest_image.display());
    if let Err(err) = fs::copy(image, &dest_image) {
        outcomes.push(CopyOutcome::Failed(CopyFailure {
            path: image.to_path_buf(),
            message: err.to_string(),
        }));
        return outcomes;
    }
    outcomes.push(CopyOutcome::Copied { label: false });

    let Some(stem) = image.file_stem() else {
        return outcomes;
    };
    let mut label_name = stem.to_os_string();
    label_name.push(".");
    label_name.push(LABEL_EXTENSION);
    let label = origin_label_dir.join(&label_name);

    if !label.is_file() {
        log::warn!("label file {} not found", label.display());
        outcomes.push(CopyOutcome::LabelMissing(label));
        return outcomes;
    }

    let dest_label = label_dir.join(&label_name);
    log::debug!("copying {} to {}", label.display(), dest_label.display());
    match fs::copy(&label, &dest_label) {
        Ok(_) => outcomes.push(CopyOutcome::Copied { label: true }),
        Err(err) => outcomes.push(CopyOutcome::Failed(CopyFailure {
            path: label,
            message: err.to_string(),
        })),
    }

    outcomes
}

/// Plans and performs a split of the origin corpus.
///
/// All copies are attempted; if any failed, the failures are logged and a
/// [`KortextError::SplitFailed`] is returned afterwards.
pub fn split_dataset(layout: &SplitLayout, opts: &SplitOptions) -> Result<SplitReport, KortextError> {
    validate_split_options(opts)?;

    let files = collect_origin_images(&layout.origin_image_dir)?;
    log::debug!("{} origin image file(s) loaded", files.len());

    let plan = plan_split(&files, opts)?;
    log::debug!(
        "train files: {}, test files: {}",
        plan.train.len(),
        plan.test.len()
    );

    let report = copy_split(&plan, layout)?;
    if !report.failures.is_empty() {
        for failure in &report.failures {
            log::error!("failed to copy {}: {}", failure.path.display(), failure.message);
        }
        return Err(KortextError::SplitFailed {
            message: format!("{} file(s) could not be copied", report.failures.len()),
        });
    }

    Ok(report)
}
