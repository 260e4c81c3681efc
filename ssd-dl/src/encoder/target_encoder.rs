use super::PriorBoxes;
use crate::{common::*, label::RatioLabel};
use bbox::{prelude::*, LTRB};

#[derive(Debug, Clone)]
pub struct TargetEncoderInit {
    pub priors: PriorBoxes,
    pub iou_threshold: R64,
    pub variances: [R64; 2],
}

impl TargetEncoderInit {
    pub fn build(self) -> Result<TargetEncoder> {
        let Self {
            priors,
            iou_threshold,
            variances,
        } = self;

        ensure!(
            (0.0..=1.0).contains(&iou_threshold.raw()),
            "iou_threshold must be within [0, 1]"
        );
        ensure!(
            variances.iter().all(|variance| variance.raw() > 0.0),
            "variances must be positive"
        );
        ensure!(priors.num_priors() > 0, "the prior set must not be empty");

        Ok(TargetEncoder {
            prior_corners: priors.boxes.iter().map(LTRB::from).collect(),
            priors,
            iou_threshold: iou_threshold.raw(),
            variances: variances.map(R64::raw),
        })
    }
}

/// The encoder that matches ground-truth boxes against prior boxes and
/// produces fixed-size training targets.
#[derive(Debug, Clone)]
pub struct TargetEncoder {
    priors: PriorBoxes,
    prior_corners: Vec<LTRB<R64>>,
    iou_threshold: f64,
    variances: [f64; 2],
}

impl TargetEncoder {
    pub fn num_priors(&self) -> usize {
        self.priors.num_priors()
    }

    /// Encode labeled boxes in ratio units into per-prior location offsets
    /// and class targets.
    ///
    /// Class 0 marks background; object classes are shifted by one. The
    /// output length equals `num_priors()` regardless of the input.
    pub fn encode(&self, bboxes: &[RatioLabel]) -> (Vec<[f32; 4]>, Vec<i64>) {
        let num_priors = self.num_priors();
        let mut loc_targets = vec![[0f32; 4]; num_priors];
        let mut cls_targets = vec![0i64; num_priors];

        let ground_truths: Vec<_> = bboxes
            .iter()
            .filter(|label| {
                let keep = label.rect.w().raw() > 0.0 && label.rect.h().raw() > 0.0;
                if !keep {
                    warn!("skipped the degenerate bounding box {:?}", label.rect);
                }
                keep
            })
            .collect();
        if ground_truths.is_empty() {
            return (loc_targets, cls_targets);
        }

        let epsilon = r64(1e-8);

        // per prior, the ground truth with the highest overlap
        let mut best_gt: Vec<Option<(usize, f64)>> = vec![None; num_priors];

        for (gt_index, gt) in ground_truths.iter().enumerate() {
            let gt_corners = gt.rect.to_ltrb();
            let mut best_prior: Option<(usize, f64)> = None;

            for (prior_index, prior_corners) in self.prior_corners.iter().enumerate() {
                let iou = prior_corners.iou_with(&gt_corners, epsilon).raw();

                if best_gt[prior_index].map_or(true, |(_, best_iou)| iou > best_iou) {
                    best_gt[prior_index] = Some((gt_index, iou));
                }
                if best_prior.map_or(true, |(_, best_iou)| iou > best_iou) {
                    best_prior = Some((prior_index, iou));
                }
            }

            // every ground truth claims its best prior unconditionally
            if let Some((prior_index, _)) = best_prior {
                best_gt[prior_index] = Some((gt_index, f64::INFINITY));
            }
        }

        for (prior_index, assignment) in best_gt.into_iter().enumerate() {
            let (gt_index, iou) = match assignment {
                Some(assignment) => assignment,
                None => continue,
            };
            if iou < self.iou_threshold {
                continue;
            }

            let gt = ground_truths[gt_index];
            let [gt_cx, gt_cy, gt_w, gt_h] = gt.rect.cxcywh().map(R64::raw);
            let [prior_cx, prior_cy, prior_w, prior_h] =
                self.priors.boxes[prior_index].cxcywh().map(R64::raw);
            let [var_center, var_size] = self.variances;

            loc_targets[prior_index] = [
                ((gt_cx - prior_cx) / prior_w / var_center) as f32,
                ((gt_cy - prior_cy) / prior_h / var_center) as f32,
                ((gt_w / prior_w).ln() / var_size) as f32,
                ((gt_h / prior_h).ln() / var_size) as f32,
            ];
            cls_targets[prior_index] = (gt.class + 1) as i64;
        }

        (loc_targets, cls_targets)
    }

    /// Encode into `(loc, cls)` tensors of shapes `[num_priors, 4]` and
    /// `[num_priors]`.
    pub fn encode_to_tensors(
        &self,
        bboxes: &[RatioLabel],
        device: Device,
    ) -> Result<(Tensor, Tensor)> {
        let (loc_targets, cls_targets) = self.encode(bboxes);
        let num_priors = self.num_priors() as i64;

        let loc_flat: Vec<f32> = loc_targets
            .iter()
            .flat_map(|row| row.iter().copied())
            .collect();
        let loc_tensor = Tensor::of_slice(&loc_flat)
            .view([num_priors, 4])
            .to_device(device);
        let cls_tensor = Tensor::of_slice(&cls_targets).to_device(device);

        Ok((loc_tensor, cls_tensor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use bbox::{CxCyWH, Label};

    fn toy_encoder() -> TargetEncoder {
        let priors = PriorBoxes {
            boxes: vec![
                CxCyWH::from_cxcywh([r64(0.25), r64(0.25), r64(0.5), r64(0.5)]),
                CxCyWH::from_cxcywh([r64(0.75), r64(0.75), r64(0.5), r64(0.5)]),
            ],
        };
        TargetEncoderInit {
            priors,
            iou_threshold: r64(0.5),
            variances: [r64(0.1), r64(0.2)],
        }
        .build()
        .unwrap()
    }

    #[test]
    fn empty_ground_truth_is_all_background() {
        let encoder = toy_encoder();
        let (loc, cls) = encoder.encode(&[]);
        assert_eq!(loc, vec![[0.0; 4]; 2]);
        assert_eq!(cls, vec![0, 0]);
    }

    #[test]
    fn perfect_match_has_zero_offsets() {
        let encoder = toy_encoder();
        let bboxes = vec![Label {
            rect: CxCyWH::from_cxcywh([r64(0.25), r64(0.25), r64(0.5), r64(0.5)]),
            class: 1,
        }];

        let (loc, cls) = encoder.encode(&bboxes);
        assert_eq!(cls, vec![2, 0]);
        for value in loc[0] {
            assert_abs_diff_eq!(value, 0.0, epsilon = 1e-5);
        }
        assert_eq!(loc[1], [0.0; 4]);
    }

    #[test]
    fn every_ground_truth_claims_a_prior() {
        let encoder = toy_encoder();
        // low overlap with every prior, still matched by the forced
        // assignment
        let bboxes = vec![Label {
            rect: CxCyWH::from_cxcywh([r64(0.25), r64(0.25), r64(0.05), r64(0.05)]),
            class: 0,
        }];

        let (_loc, cls) = encoder.encode(&bboxes);
        assert_eq!(cls, vec![1, 0]);
    }

    #[test]
    fn offset_encoding() {
        let encoder = toy_encoder();
        let bboxes = vec![Label {
            rect: CxCyWH::from_cxcywh([r64(0.3), r64(0.25), r64(0.25), r64(0.5)]),
            class: 2,
        }];

        let (loc, cls) = encoder.encode(&bboxes);
        assert_eq!(cls[0], 3);
        assert_abs_diff_eq!(loc[0][0], ((0.3 - 0.25) / 0.5 / 0.1) as f32, epsilon = 1e-5);
        assert_abs_diff_eq!(loc[0][1], 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(loc[0][2], ((0.25f64 / 0.5).ln() / 0.2) as f32, epsilon = 1e-5);
        assert_abs_diff_eq!(loc[0][3], 0.0, epsilon = 1e-5);
    }

    #[test]
    fn degenerate_boxes_are_skipped() {
        let encoder = toy_encoder();
        let bboxes = vec![Label {
            rect: CxCyWH::from_cxcywh([r64(0.25), r64(0.25), r64(0.0), r64(0.5)]),
            class: 0,
        }];

        let (loc, cls) = encoder.encode(&bboxes);
        assert_eq!(loc, vec![[0.0; 4]; 2]);
        assert_eq!(cls, vec![0, 0]);
    }
}
