use crate::common::*;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizeInit {
    pub mean: [R64; 3],
    pub std: [R64; 3],
}

impl NormalizeInit {
    pub fn build(self) -> Result<Normalize> {
        let Self { mean, std } = self;
        ensure!(
            std.iter().all(|value| value.raw() > 0.0),
            "std must be positive"
        );

        Ok(Normalize {
            mean: mean.map(|value| value.raw() as f32),
            std: std.map(|value| value.raw() as f32),
        })
    }
}

/// Per-channel mean/std image normalization.
#[derive(Debug, Clone)]
pub struct Normalize {
    mean: [f32; 3],
    std: [f32; 3],
}

impl Normalize {
    pub fn forward(&self, image: &Tensor) -> Result<Tensor> {
        tch::no_grad(|| -> Result<_> {
            let (channels, _height, _width) = image.size3()?;
            ensure!(
                channels == 3,
                "channel size must be 3, but get {}",
                channels
            );

            let mean = Tensor::of_slice(&self.mean)
                .view([3, 1, 1])
                .to_device(image.device());
            let std = Tensor::of_slice(&self.std)
                .view([3, 1, 1])
                .to_device(image.device());

            Ok((image - &mean) / &std)
        })
    }
}
