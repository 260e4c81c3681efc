use anyhow::{format_err, Result};
use approx::assert_abs_diff_eq;
use bbox::prelude::*;
use noisy_float::prelude::*;
use ssd_dl::{
    dataset::{FileDataset, GenericDataset, KittiDataset, SanitizedDataset},
    processor::SampleLoader,
};
use std::path::{Path, PathBuf};

fn dataset_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("kitti_dataset")
}

#[tokio::test]
async fn sanitized_kitti_dataset_test() -> Result<()> {
    let dir = dataset_dir();
    let dataset = KittiDataset::load(&dir, dir.join("classes.txt"), None).await?;

    let num_boxes: usize = dataset
        .records()
        .iter()
        .map(|record| record.bboxes.len())
        .sum();
    assert_eq!(num_boxes, 3);

    let sanitized = SanitizedDataset::new(dataset, r64(0.0), r64(0.0))?;
    assert_eq!(sanitized.classes().len(), 3);
    assert_eq!(sanitized.records().len(), 2);

    // the fixture boxes lie within the frames, so none are dropped
    let num_boxes: usize = sanitized
        .records()
        .iter()
        .map(|record| record.bboxes.len())
        .sum();
    assert_eq!(num_boxes, 3);

    Ok(())
}

#[tokio::test]
async fn sample_loader_letterbox_test() -> Result<()> {
    let dir = dataset_dir();
    let dataset = KittiDataset::load(&dir, dir.join("classes.txt"), None).await?;

    // the 8x6 image gets one pixel of padding above and below
    let record = dataset
        .records()
        .iter()
        .find(|record| record.path.ends_with("000001.png"))
        .cloned()
        .ok_or_else(|| format_err!("the fixture record is missing"))?;

    let loader = SampleLoader::new(8, 3, None).await?;
    let (image, bboxes) = loader
        .load(&record.path, &record.size, &record.bboxes)
        .await?;

    assert_eq!(image.size3()?, (3, 8, 8));
    assert_eq!(bboxes.len(), 1);

    let [cx, cy, w, h] = bboxes[0].rect.cxcywh();
    assert_abs_diff_eq!(cx.raw(), 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(cy.raw(), 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(w.raw(), 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(h.raw(), 0.5, epsilon = 1e-6);

    Ok(())
}

#[tokio::test]
async fn sample_loader_unit_frame_test() -> Result<()> {
    let dir = dataset_dir();
    let dataset = KittiDataset::load(&dir, dir.join("classes.txt"), None).await?;
    let loader = SampleLoader::new(8, 3, None).await?;

    for record in dataset.records() {
        let (image, bboxes) = loader
            .load(&record.path, &record.size, &record.bboxes)
            .await?;
        assert_eq!(image.size3()?, (3, 8, 8));

        for label in bboxes {
            let [l, t, r, b] = label.rect.to_ltrb().ltrb();
            assert!(l.raw() >= 0.0 && r.raw() <= 1.0 && l < r);
            assert!(t.raw() >= 0.0 && b.raw() <= 1.0 && t < b);
        }
    }

    Ok(())
}
