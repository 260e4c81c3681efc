//! The image loading and letterboxing implementation.

use super::TensorExt as _;
use crate::{
    common::*,
    label::{PixelLabel, RatioLabel},
};
use bbox::{prelude::*, Label, Size, Transform, LTRB};

/// Sample loading processor.
///
/// It decodes an image file, letterbox-resizes it to the square canonical
/// frame and maps the paired boxes into ratio units of that frame.
#[derive(Debug, Clone)]
pub struct SampleLoader {
    image_size: usize,
    image_channels: usize,
    device: Device,
}

impl SampleLoader {
    /// Build a new sample loading processor.
    ///
    /// * `image_size` - The outcome image size in pixels.
    /// * `image_channels` - The expected number of image channels.
    /// * `device` - The outcome image device. It defaults to CPU if set to `None`.
    pub async fn new(
        image_size: usize,
        image_channels: usize,
        device: impl Into<Option<Device>>,
    ) -> Result<Self> {
        ensure!(image_size > 0, "image_size must be positive");
        ensure!(image_channels > 0, "image_channels must be positive");

        let loader = Self {
            image_size,
            image_channels,
            device: device.into().unwrap_or(Device::Cpu),
        };

        Ok(loader)
    }

    /// Load an image and its boxes.
    pub async fn load(
        &self,
        image_path: impl AsRef<async_std::path::Path>,
        orig_size: &Size<usize>,
        bboxes: impl IntoIterator<Item = impl Borrow<PixelLabel>>,
    ) -> Result<(Tensor, Vec<RatioLabel>)> {
        let Self {
            image_size,
            image_channels,
            device,
            ..
        } = *self;
        let image_path = image_path.as_ref();
        let [orig_h, orig_w] = orig_size.hw();

        ensure!(
            image_channels == 3,
            "image_channels other than 3 is not supported"
        );

        // compute the letterboxed size
        let resize_ratio =
            (image_size as f64 / orig_h as f64).min(image_size as f64 / orig_w as f64);
        let inner_h = (orig_h as f64 * resize_ratio) as usize;
        let inner_w = (orig_w as f64 * resize_ratio) as usize;

        // load and resize on a blocking thread
        let inner_image = {
            let image_path = image_path.to_owned();
            async_std::task::spawn_blocking(move || -> Result<_> {
                tch::no_grad(|| -> Result<_> {
                    let image = vision::image::load(image_path)?;
                    {
                        let shape = image.size3()?;
                        let expect_shape = (image_channels as i64, orig_h as i64, orig_w as i64);
                        ensure!(
                            shape == expect_shape,
                            "image size does not match, expect {:?}, but get {:?}",
                            expect_shape,
                            shape
                        );
                    }
                    let image = image
                        .resize2d_exact(inner_h as i64, inner_w as i64)?
                        .to_device(device)
                        .to_kind(Kind::Float)
                        .g_div_scalar(255.0)
                        .set_requires_grad(false);

                    Ok(image)
                })
            })
            .await?
        };

        // pad to the square frame
        let top_pad = (image_size - inner_h) / 2;
        let bottom_pad = image_size - inner_h - top_pad;
        let left_pad = (image_size - inner_w) / 2;
        let right_pad = image_size - inner_w - left_pad;

        let output_image = tch::no_grad(|| {
            inner_image
                .view([1, image_channels as i64, inner_h as i64, inner_w as i64])
                .zero_pad2d(
                    left_pad as i64,
                    right_pad as i64,
                    top_pad as i64,
                    bottom_pad as i64,
                )
                .view([image_channels as i64, image_size as i64, image_size as i64])
                .set_requires_grad(false)
        });

        // map boxes into ratio units of the letterboxed frame
        let transform = {
            let src = LTRB::from_ltwh([r64(0.0), r64(0.0), r64(orig_w as f64), r64(orig_h as f64)]);
            let tgt = LTRB::from_ltwh([
                r64(left_pad as f64),
                r64(top_pad as f64),
                r64(inner_w as f64),
                r64(inner_h as f64),
            ]);
            let to_frame = Transform::from_rects(&src, &tgt);

            let scale = r64(1.0 / image_size as f64);
            let to_ratio = Transform {
                sx: scale,
                sy: scale,
                tx: r64(0.0),
                ty: r64(0.0),
            };

            &to_ratio * &to_frame
        };

        let output_bboxes: Vec<RatioLabel> = bboxes
            .into_iter()
            .map(|orig_label| {
                let mapped = &transform * orig_label.borrow();
                Label {
                    rect: mapped.rect.to_cxcywh(),
                    class: mapped.class,
                }
            })
            .collect();

        Ok((output_image, output_bboxes))
    }
}
