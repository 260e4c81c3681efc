use crate::{common::*, label::RatioLabel};
use bbox::{prelude::*, CxCyWH, Label};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RandomFlipInit {
    pub horizontal_prob: Option<R64>,
    pub vertical_prob: Option<R64>,
}

impl RandomFlipInit {
    pub fn build(self) -> Result<RandomFlip> {
        let Self {
            horizontal_prob,
            vertical_prob,
        } = self;

        let horizontal_prob = horizontal_prob
            .map(|prob| {
                ensure!(
                    (0.0..=1.0).contains(&prob.raw()),
                    "horizontal_prob must be within [0, 1]"
                );
                Ok(prob.raw())
            })
            .transpose()?;
        let vertical_prob = vertical_prob
            .map(|prob| {
                ensure!(
                    (0.0..=1.0).contains(&prob.raw()),
                    "vertical_prob must be within [0, 1]"
                );
                Ok(prob.raw())
            })
            .transpose()?;

        Ok(RandomFlip {
            horizontal_prob,
            vertical_prob,
        })
    }
}

impl Default for RandomFlipInit {
    fn default() -> Self {
        Self {
            horizontal_prob: None,
            vertical_prob: None,
        }
    }
}

/// Random horizontal/vertical flipping applied jointly to an image and its
/// boxes in ratio units.
#[derive(Debug, Clone)]
pub struct RandomFlip {
    horizontal_prob: Option<f64>,
    vertical_prob: Option<f64>,
}

impl RandomFlip {
    pub fn forward(
        &self,
        orig_image: &Tensor,
        orig_bboxes: &[RatioLabel],
    ) -> Result<(Tensor, Vec<RatioLabel>)> {
        tch::no_grad(|| {
            orig_image.size3()?;

            let mut rng = StdRng::from_entropy();
            let flip_h = self
                .horizontal_prob
                .map(|prob| rng.gen_bool(prob))
                .unwrap_or(false);
            let flip_v = self
                .vertical_prob
                .map(|prob| rng.gen_bool(prob))
                .unwrap_or(false);

            let mut new_image = orig_image.shallow_clone();
            if flip_h {
                new_image = new_image.flip(&[2]);
            }
            if flip_v {
                new_image = new_image.flip(&[1]);
            }

            let new_bboxes: Vec<_> = orig_bboxes
                .iter()
                .map(|label| {
                    let [cx, cy, w, h] = label.rect.cxcywh();
                    let cx = if flip_h { r64(1.0) - cx } else { cx };
                    let cy = if flip_v { r64(1.0) - cy } else { cy };
                    Label {
                        rect: CxCyWH::from_cxcywh([cx, cy, w, h]),
                        class: label.class,
                    }
                })
                .collect();

            Ok((new_image, new_bboxes))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirrors_boxes_horizontally() {
        let init = RandomFlipInit {
            horizontal_prob: Some(r64(1.0)),
            vertical_prob: None,
        };
        let flip = init.build().unwrap();

        let image = Tensor::zeros(&[3, 4, 4], tch::kind::FLOAT_CPU);
        let bboxes = vec![Label {
            rect: CxCyWH::from_cxcywh([r64(0.25), r64(0.5), r64(0.1), r64(0.2)]),
            class: 1,
        }];

        let (_new_image, new_bboxes) = flip.forward(&image, &bboxes).unwrap();
        let [cx, cy, w, h] = new_bboxes[0].rect.cxcywh();
        assert_eq!(cx, r64(0.75));
        assert_eq!(cy, r64(0.5));
        assert_eq!(w, r64(0.1));
        assert_eq!(h, r64(0.2));
    }

    #[test]
    fn rejects_bad_probability() {
        let init = RandomFlipInit {
            horizontal_prob: Some(r64(1.5)),
            vertical_prob: None,
        };
        assert!(init.build().is_err());
    }
}
