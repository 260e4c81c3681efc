//! The random color distortion algorithm.

use crate::common::*;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColorJitterInit {
    pub brightness_shift: Option<R64>,
    pub contrast_shift: Option<R64>,
    pub saturation_shift: Option<R64>,
}

impl ColorJitterInit {
    pub fn build(self) -> Result<ColorJitter> {
        let Self {
            brightness_shift,
            contrast_shift,
            saturation_shift,
        } = self;

        let check_shift = |shift: Option<R64>, name: &str| {
            shift
                .map(|shift| {
                    ensure!(shift.raw() > 0.0, "{} must be positive", name);
                    Ok(shift.raw())
                })
                .transpose()
        };

        Ok(ColorJitter {
            max_brightness_shift: check_shift(brightness_shift, "brightness_shift")?,
            max_contrast_shift: check_shift(contrast_shift, "contrast_shift")?,
            max_saturation_shift: check_shift(saturation_shift, "saturation_shift")?,
        })
    }
}

/// Random brightness, contrast and saturation distortion.
///
/// The image-only half of the augmentation step; boxes are unaffected.
#[derive(Debug, Clone)]
pub struct ColorJitter {
    max_brightness_shift: Option<f64>,
    max_contrast_shift: Option<f64>,
    max_saturation_shift: Option<f64>,
}

impl ColorJitter {
    pub fn forward(&self, rgb: &Tensor) -> Result<Tensor> {
        tch::no_grad(|| -> Result<_> {
            let (channels, _height, _width) = rgb.size3()?;
            ensure!(
                channels == 3,
                "channel size must be 3, but get {}",
                channels
            );

            let mut rng = StdRng::from_entropy();
            let mut image = rgb.shallow_clone();

            if let Some(max_shift) = self.max_brightness_shift {
                let shift = rng.gen_range((-max_shift)..max_shift);
                image = (image * (1.0 + shift)).clamp(0.0, 1.0);
            }

            if let Some(max_shift) = self.max_contrast_shift {
                let shift = rng.gen_range((-max_shift)..max_shift);
                let mean = image.mean(Kind::Float);
                image = ((image - &mean) * (1.0 + shift) + &mean).clamp(0.0, 1.0);
            }

            if let Some(max_shift) = self.max_saturation_shift {
                let shift = rng.gen_range((-max_shift)..max_shift);
                let weights = Tensor::of_slice(&[0.299f32, 0.587, 0.114])
                    .view([3, 1, 1])
                    .to_device(image.device());
                let gray = (&image * &weights).sum_dim_intlist(&[0], true, Kind::Float);
                image = ((image - &gray) * (1.0 + shift) + &gray).clamp(0.0, 1.0);
            }

            Ok(image)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_shift() {
        let init = ColorJitterInit {
            brightness_shift: Some(r64(0.0)),
            contrast_shift: None,
            saturation_shift: None,
        };
        assert!(init.build().is_err());
    }

    #[test]
    fn distorts_within_unit_range() -> Result<()> {
        let jitter = ColorJitterInit {
            brightness_shift: Some(r64(0.3)),
            contrast_shift: Some(r64(0.3)),
            saturation_shift: Some(r64(0.3)),
        }
        .build()?;

        let image = Tensor::rand(&[3, 4, 4], tch::kind::FLOAT_CPU);
        let output = jitter.forward(&image)?;

        assert_eq!(output.size3()?, (3, 4, 4));
        assert!(bool::from(&output.ge(0.0).all()));
        assert!(bool::from(&output.le(1.0).all()));

        Ok(())
    }
}
