use super::*;
use crate::{common::*, label::PixelLabel};
use bbox::{prelude::*, Label, Size};

/// The dataset that filters out bad boxes.
#[derive(Debug)]
pub struct SanitizedDataset<D>
where
    D: FileDataset,
{
    dataset: D,
    records: Vec<Arc<FileRecord>>,
}

impl<D> SanitizedDataset<D>
where
    D: FileDataset,
{
    pub fn new(dataset: D, out_of_bound_tolerance: R64, min_bbox_size: R64) -> Result<Self> {
        ensure!(
            out_of_bound_tolerance.raw() >= 0.0,
            "out_of_bound_tolerance must be non-negative"
        );
        ensure!(
            (0.0..=1.0).contains(&min_bbox_size.raw()),
            "min_bbox_size must be within [0, 1]"
        );

        let mut filtered_bbox_count = 0;

        let records: Vec<_> = dataset
            .records()
            .iter()
            .map(|record| -> Result<_> {
                let FileRecord {
                    ref path,
                    ref size,
                    bboxes: ref orig_bboxes,
                } = *record.as_ref();

                ensure!(
                    size.h() > 0 && size.w() > 0,
                    "image height and width must be positive"
                );
                let frame: Size<R64> = size.clone().cast();

                let range_w = (-out_of_bound_tolerance)..(out_of_bound_tolerance + frame.w());
                let range_h = (-out_of_bound_tolerance)..(out_of_bound_tolerance + frame.h());

                let bboxes: Vec<PixelLabel> = orig_bboxes
                    .iter()
                    .map(|bbox| -> Result<_> {
                        let Label { ref rect, class } = *bbox;

                        // out of bound check with tolerance
                        ensure!(
                            range_w.contains(&rect.l())
                                && range_w.contains(&rect.r())
                                && range_h.contains(&rect.t())
                                && range_h.contains(&rect.b()),
                            "bbox {:?} range out of bound with out_of_bound_tolerance {}",
                            rect,
                            out_of_bound_tolerance
                        );

                        // crop out the out of bound parts
                        let sanitized = rect.clamp_to_size(&frame);

                        // kick out small bboxes
                        if sanitized.w() / frame.w() <= min_bbox_size
                            || sanitized.h() / frame.h() <= min_bbox_size
                        {
                            return Ok(None);
                        }

                        Ok(Some(Label {
                            rect: sanitized,
                            class,
                        }))
                    })
                    .filter_map(|result| result.transpose())
                    .try_collect()
                    .with_context(|| format!("failed to sanitize '{}'", path.display()))?;

                filtered_bbox_count += orig_bboxes.len() - bboxes.len();

                Ok(Arc::new(FileRecord {
                    path: path.clone(),
                    size: size.clone(),
                    bboxes,
                }))
            })
            .try_collect()?;

        if filtered_bbox_count > 0 {
            warn!(
                "filtered out {} bad objects in the data set",
                filtered_bbox_count
            );
        }

        Ok(Self { dataset, records })
    }
}

impl<D> GenericDataset for SanitizedDataset<D>
where
    D: FileDataset,
{
    fn input_channels(&self) -> usize {
        self.dataset.input_channels()
    }

    fn classes(&self) -> &IndexSet<String> {
        self.dataset.classes()
    }
}

impl<D> FileDataset for SanitizedDataset<D>
where
    D: FileDataset,
{
    fn records(&self) -> &[Arc<FileRecord>] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bbox::LTRB;

    #[derive(Debug)]
    struct StubDataset {
        classes: IndexSet<String>,
        records: Vec<Arc<FileRecord>>,
    }

    impl GenericDataset for StubDataset {
        fn input_channels(&self) -> usize {
            3
        }

        fn classes(&self) -> &IndexSet<String> {
            &self.classes
        }
    }

    impl FileDataset for StubDataset {
        fn records(&self) -> &[Arc<FileRecord>] {
            &self.records
        }
    }

    fn stub_dataset(bboxes: Vec<PixelLabel>) -> StubDataset {
        StubDataset {
            classes: ["car".to_owned()].into_iter().collect(),
            records: vec![Arc::new(FileRecord {
                path: PathBuf::from("stub.png"),
                size: Size::from_hw([100, 200]),
                bboxes,
            })],
        }
    }

    #[test]
    fn clamps_out_of_bound_boxes() {
        let dataset = stub_dataset(vec![Label {
            rect: LTRB::from_ltrb([r64(-1.0), r64(10.0), r64(50.0), r64(102.0)]),
            class: 0,
        }]);

        let sanitized = SanitizedDataset::new(dataset, r64(5.0), r64(0.0)).unwrap();
        let bboxes = &sanitized.records()[0].bboxes;
        assert_eq!(bboxes.len(), 1);
        assert_eq!(
            bboxes[0].rect,
            LTRB::from_ltrb([r64(0.0), r64(10.0), r64(50.0), r64(100.0)])
        );
    }

    #[test]
    fn rejects_boxes_beyond_tolerance() {
        let dataset = stub_dataset(vec![Label {
            rect: LTRB::from_ltrb([r64(-30.0), r64(0.0), r64(50.0), r64(50.0)]),
            class: 0,
        }]);

        assert!(SanitizedDataset::new(dataset, r64(5.0), r64(0.0)).is_err());
    }

    #[test]
    fn drops_tiny_boxes() {
        let dataset = stub_dataset(vec![Label {
            rect: LTRB::from_ltrb([r64(10.0), r64(10.0), r64(11.0), r64(11.0)]),
            class: 0,
        }]);

        let sanitized = SanitizedDataset::new(dataset, r64(0.0), r64(0.05)).unwrap();
        assert!(sanitized.records()[0].bboxes.is_empty());
    }
}
