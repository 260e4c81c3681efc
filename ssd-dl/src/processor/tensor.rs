use crate::common::*;

pub trait TensorExt {
    /// Resize a CHW image to the exact size, without keeping the aspect
    /// ratio.
    fn resize2d_exact(&self, new_height: i64, new_width: i64) -> Result<Tensor>;
}

impl TensorExt for Tensor {
    fn resize2d_exact(&self, new_height: i64, new_width: i64) -> Result<Tensor> {
        tch::no_grad(|| match (self.kind(), self.size().as_slice()) {
            (Kind::Uint8, &[_channels, _height, _width]) => {
                let resized = vision::image::resize(self, new_width, new_height)?;
                Ok(resized)
            }
            (Kind::Float, &[_channels, _height, _width]) => {
                let resized = vision::image::resize(
                    &(self * 255.0).to_kind(Kind::Uint8),
                    new_width,
                    new_height,
                )?
                .to_kind(Kind::Float)
                    / 255.0;
                Ok(resized)
            }
            (_, &[_channels, _height, _width]) => bail!("unsupported data kind"),
            _ => bail!("invalid shape: expect three dimensions"),
        })
    }
}
