use crate::common::*;
use bbox::{prelude::*, CxCyWH};

/// SSD prior box configuration.
///
/// All per-feature-map lists must have the same length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriorBoxConfig {
    /// The canonical frame size in pixels.
    pub image_size: usize,
    /// The grid resolution of each feature map.
    pub feature_sizes: Vec<usize>,
    /// The pixel stride of each feature map.
    pub steps: Vec<usize>,
    /// The small prior size of each feature map, in pixels.
    pub min_sizes: Vec<R64>,
    /// The large prior size of each feature map, in pixels.
    pub max_sizes: Vec<R64>,
    /// Extra aspect ratios of each feature map; the reciprocal of every
    /// ratio is added as well.
    pub aspect_ratios: Vec<Vec<R64>>,
    /// If set, clip prior coordinates into the unit frame.
    pub clip: bool,
}

impl PriorBoxConfig {
    pub fn build(&self) -> Result<PriorBoxes> {
        let Self {
            image_size,
            ref feature_sizes,
            ref steps,
            ref min_sizes,
            ref max_sizes,
            ref aspect_ratios,
            clip,
        } = *self;

        ensure!(image_size > 0, "image_size must be positive");
        let num_maps = feature_sizes.len();
        ensure!(num_maps > 0, "feature_sizes must not be empty");
        ensure!(
            steps.len() == num_maps
                && min_sizes.len() == num_maps
                && max_sizes.len() == num_maps
                && aspect_ratios.len() == num_maps,
            "feature_sizes, steps, min_sizes, max_sizes and aspect_ratios must have equal lengths"
        );
        ensure!(
            min_sizes
                .iter()
                .zip_eq(max_sizes)
                .all(|(min, max)| min.raw() > 0.0 && min <= max),
            "min_sizes must be positive and must not exceed max_sizes"
        );
        ensure!(
            aspect_ratios
                .iter()
                .flatten()
                .all(|ratio| ratio.raw() > 0.0),
            "aspect ratios must be positive"
        );

        let image_size = r64(image_size as f64);
        let clamp = |value: R64| {
            if clip {
                value.max(r64(0.0)).min(r64(1.0))
            } else {
                value
            }
        };

        let boxes: Vec<_> = izip!(feature_sizes, steps, min_sizes, max_sizes, aspect_ratios)
            .flat_map(|(&feature_size, &step, &min_size, &max_size, ratios)| {
                let small = min_size / image_size;
                let large = r64((small * max_size / image_size).raw().sqrt());

                iproduct!(0..feature_size, 0..feature_size)
                    .flat_map(move |(row, col)| {
                        let cy = (r64(row as f64) + 0.5) * step as f64 / image_size;
                        let cx = (r64(col as f64) + 0.5) * step as f64 / image_size;

                        let scales = [[small, small], [large, large]]
                            .into_iter()
                            .chain(ratios.iter().flat_map(move |&ratio| {
                                let sqrt_ratio = r64(ratio.raw().sqrt());
                                [
                                    [small * sqrt_ratio, small / sqrt_ratio],
                                    [small / sqrt_ratio, small * sqrt_ratio],
                                ]
                            }));

                        scales.map(move |[w, h]| {
                            CxCyWH::from_cxcywh([
                                clamp(cx),
                                clamp(cy),
                                clamp(w),
                                clamp(h),
                            ])
                        })
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        Ok(PriorBoxes { boxes })
    }
}

/// The fixed set of prior boxes in ratio units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorBoxes {
    pub boxes: Vec<CxCyWH<R64>>,
}

impl PriorBoxes {
    pub fn num_priors(&self) -> usize {
        self.boxes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn toy_config() -> PriorBoxConfig {
        PriorBoxConfig {
            image_size: 4,
            feature_sizes: vec![2],
            steps: vec![2],
            min_sizes: vec![r64(1.0)],
            max_sizes: vec![r64(4.0)],
            aspect_ratios: vec![vec![r64(2.0)]],
            clip: false,
        }
    }

    #[test]
    fn prior_count() {
        let priors = toy_config().build().unwrap();
        // 2x2 cells, 2 square priors + 2 ratio priors each
        assert_eq!(priors.num_priors(), 16);
    }

    #[test]
    fn first_cell_priors() {
        let priors = toy_config().build().unwrap();
        let [cx, cy, w, h] = priors.boxes[0].cxcywh();
        assert_abs_diff_eq!(cx.raw(), 0.25);
        assert_abs_diff_eq!(cy.raw(), 0.25);
        assert_abs_diff_eq!(w.raw(), 0.25);
        assert_abs_diff_eq!(h.raw(), 0.25);

        let [_, _, w, h] = priors.boxes[1].cxcywh();
        assert_abs_diff_eq!(w.raw(), 0.5);
        assert_abs_diff_eq!(h.raw(), 0.5);
    }

    #[test]
    fn mismatched_lengths_rejected() {
        let config = PriorBoxConfig {
            steps: vec![2, 4],
            ..toy_config()
        };
        assert!(config.build().is_err());
    }
}
