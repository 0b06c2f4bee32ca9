#![allow(dead_code)]

use kortext::document::{
    AnnotationDocument, AnnotationRecord, BBoxXYWH, DocumentInfo, ImageRecord, Scalar,
};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// File names drawn from a small pool so duplicates and canonical hits are common.
pub fn arb_file_name() -> BoxedStrategy<String> {
    (0usize..5).prop_map(|i| format!("img_{i}.jpg")).boxed()
}

/// Integer and float components, including whole-number floats like `3.0`.
pub fn arb_coord() -> BoxedStrategy<Scalar> {
    prop_oneof![
        (-500i64..500).prop_map(Scalar::from),
        (-500i32..500).prop_map(|v| Scalar::Float(f64::from(v))),
        (-500.0f64..500.0).prop_map(Scalar::Float),
    ]
    .boxed()
}

pub fn arb_bbox() -> BoxedStrategy<BBoxXYWH> {
    (arb_coord(), arb_coord(), arb_coord(), arb_coord())
        .prop_map(|(x, y, w, h)| BBoxXYWH::new(x, y, w, h))
        .boxed()
}

pub fn arb_image() -> BoxedStrategy<ImageRecord> {
    (0u64..4, arb_file_name())
        .prop_map(|(id, name)| ImageRecord::new(id, name))
        .boxed()
}

pub fn arb_annotation() -> BoxedStrategy<AnnotationRecord> {
    (0u64..5, arb_bbox(), "[가-힣a-z ]{0,8}")
        .prop_map(|(id, bbox, text)| AnnotationRecord::new(id, bbox, text))
        .boxed()
}

pub fn arb_document(max_images: usize, max_annotations: usize) -> BoxedStrategy<AnnotationDocument> {
    (
        prop_oneof![Just("img_0".to_string()), Just("img_3".to_string()), Just("absent".to_string())],
        prop::collection::vec(arb_image(), 0..=max_images),
        prop::collection::vec(arb_annotation(), 0..=max_annotations),
    )
        .prop_map(|(name, images, annotations)| AnnotationDocument {
            info: DocumentInfo { name },
            images,
            annotations,
        })
        .boxed()
}
