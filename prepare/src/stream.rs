//! Asynchronous sample preparation stream.

use crate::{common::*, config};
use ssd_dl::{
    dataset::{
        DataRecord, GenericDataset, KittiDataset, OnDemandDataset, RandomAccessDataset,
        SanitizedDataset,
    },
    encoder::{TargetEncoder, TargetEncoderInit},
    processor::{ColorJitter, ColorJitterInit, NormalizeInit, RandomFlipInit},
};

/// The stream of batched training samples.
#[derive(Debug)]
pub struct SampleStream {
    batch_size: usize,
    preprocessor_config: config::PreprocessorConfig,
    encoder: Arc<TargetEncoder>,
    dataset: Arc<dyn RandomAccessDataset + Sync>,
}

impl SampleStream {
    pub async fn new(config: &config::Config) -> Result<Self> {
        let config::Config {
            dataset:
                config::DatasetConfig {
                    ref dataset_dir,
                    ref classes_file,
                    ref class_whitelist,
                    image_size,
                },
            preprocessor: ref preprocessor_config,
            encoder: ref encoder_config,
            output: config::OutputConfig { batch_size, .. },
        } = *config;

        ensure!(
            encoder_config.prior_boxes.image_size == image_size.get(),
            "the prior box image size {} does not match the dataset image size {}",
            encoder_config.prior_boxes.image_size,
            image_size
        );

        let dataset =
            KittiDataset::load(dataset_dir, classes_file, class_whitelist.clone()).await?;
        info!(
            "loaded {} samples of {} classes",
            dataset.records.len(),
            dataset.classes().len()
        );

        let dataset = SanitizedDataset::new(
            dataset,
            preprocessor_config.out_of_bound_tolerance,
            preprocessor_config.min_bbox_size,
        )?;
        let dataset =
            OnDemandDataset::new(dataset, image_size.get(), preprocessor_config.device).await?;

        let encoder = TargetEncoderInit {
            priors: encoder_config.prior_boxes.build()?,
            iou_threshold: encoder_config.iou_threshold,
            variances: encoder_config.variances,
        }
        .build()?;

        Ok(Self {
            batch_size: batch_size.get(),
            preprocessor_config: preprocessor_config.clone(),
            encoder: Arc::new(encoder),
            dataset: Arc::new(dataset),
        })
    }

    pub fn classes(&self) -> &IndexSet<String> {
        self.dataset.classes()
    }

    pub fn num_records(&self) -> usize {
        self.dataset.num_records()
    }

    pub fn num_priors(&self) -> usize {
        self.encoder.num_priors()
    }

    pub fn stream(
        &self,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<TrainingBatch>> + Send>>> {
        let Self {
            batch_size,
            ref preprocessor_config,
            ref encoder,
            ref dataset,
        } = *self;
        let encoder = encoder.clone();
        let dataset = dataset.clone();
        let device = preprocessor_config.device;

        // parallel stream config
        let par_config: par_stream::ParParams = {
            let buf_size: par_stream::BufSize = preprocessor_config
                .worker_buf_size
                .map(|buf_size| Some(buf_size).into())
                .unwrap_or(2.0.into());

            Some(par_stream::ParParamsConfig::Manual {
                num_workers: par_stream::NumWorkers::Default,
                buf_size,
            })
            .into()
        };

        // build processors
        let random_flip = Arc::new(
            RandomFlipInit {
                horizontal_prob: preprocessor_config.horizontal_flip_prob,
                vertical_prob: preprocessor_config.vertical_flip_prob,
            }
            .build()?,
        );
        let color_jitter: Option<(f64, Arc<ColorJitter>)> =
            match preprocessor_config.color_jitter_prob {
                Some(prob) => {
                    ensure!(
                        (0.0..=1.0).contains(&prob.raw()),
                        "color_jitter_prob must be within [0, 1]"
                    );
                    let jitter = ColorJitterInit {
                        brightness_shift: preprocessor_config.brightness_shift,
                        contrast_shift: preprocessor_config.contrast_shift,
                        saturation_shift: preprocessor_config.saturation_shift,
                    }
                    .build()?;
                    Some((prob.raw(), Arc::new(jitter)))
                }
                None => None,
            };
        let normalize = match (preprocessor_config.mean, preprocessor_config.std) {
            (Some(mean), Some(std)) => Some(Arc::new(NormalizeInit { mean, std }.build()?)),
            (None, None) => None,
            _ => bail!("the mean and std options must be given together"),
        };

        // enumerate epochs of shuffled record indexes
        let stream = {
            let num_records = dataset.num_records();

            stream::iter(0..).flat_map(move |epoch: usize| {
                let mut rng = StdRng::from_entropy();
                let mut indexes = (0..num_records).collect_vec();
                indexes.shuffle(&mut rng);

                let args_vec = indexes
                    .into_iter()
                    .map(move |record_index| (epoch, record_index))
                    .collect_vec();
                stream::iter(args_vec)
            })
        };

        // add step count
        let stream = stream
            .enumerate()
            .map(|(step, (epoch, record_index))| (step, epoch, record_index));

        // start of unordered ops
        let stream = stream.enumerate();

        // load samples
        let stream = {
            let dataset = dataset.clone();
            let par_config = par_config.clone();

            stream
                .map(Ok)
                .try_par_then_unordered(par_config, move |(index, args)| {
                    let dataset = dataset.clone();

                    async move {
                        let (step, epoch, record_index) = args;
                        let DataRecord { image, bboxes } = dataset.nth(record_index).await?;
                        Fallible::Ok((index, (step, epoch, image, bboxes)))
                    }
                })
        };

        // augmentation
        let stream = stream.try_par_map_unordered(par_config.clone(), move |(index, args)| {
            let random_flip = random_flip.clone();
            let color_jitter = color_jitter.clone();

            move || {
                let (step, epoch, image, bboxes) = args;

                let (image, bboxes) = random_flip.forward(&image, &bboxes)?;
                let image = match &color_jitter {
                    Some((prob, jitter)) => {
                        let mut rng = StdRng::from_entropy();
                        if rng.gen_bool(*prob) {
                            jitter.forward(&image)?
                        } else {
                            image
                        }
                    }
                    None => image,
                };

                Fallible::Ok((index, (step, epoch, image, bboxes)))
            }
        });

        // normalization and target encoding
        let stream = stream.try_par_map_unordered(par_config.clone(), move |(index, args)| {
            let encoder = encoder.clone();
            let normalize = normalize.clone();

            move || {
                let (step, epoch, image, bboxes) = args;

                let image = match &normalize {
                    Some(normalize) => normalize.forward(&image)?,
                    None => image,
                };
                let (loc_targets, cls_targets) = encoder.encode_to_tensors(&bboxes, device)?;

                Fallible::Ok((index, (step, epoch, image, loc_targets, cls_targets)))
            }
        });

        // reorder records
        let stream = stream.try_reorder_enumerated();

        // group into chunks
        let stream = stream
            .chunks(batch_size)
            .enumerate()
            .par_map_unordered(par_config.clone(), |(index, results)| {
                move || {
                    let chunk: Vec<_> = results.into_iter().try_collect()?;
                    Fallible::Ok((index, chunk))
                }
            });

        // convert to batched type
        let stream = stream.try_par_map_unordered(par_config, |(index, chunk)| {
            move || {
                let mut min_step = usize::MAX;
                let mut min_epoch = usize::MAX;
                let mut image_vec = vec![];
                let mut loc_vec = vec![];
                let mut cls_vec = vec![];

                chunk
                    .into_iter()
                    .for_each(|(step, epoch, image, loc_targets, cls_targets)| {
                        min_step = min_step.min(step);
                        min_epoch = min_epoch.min(epoch);
                        image_vec.push(image);
                        loc_vec.push(loc_targets);
                        cls_vec.push(cls_targets);
                    });
                ensure!(!image_vec.is_empty(), "the batch must not be empty");

                let batch = TrainingBatch {
                    step: min_step,
                    epoch: min_epoch,
                    image: Tensor::stack(&image_vec, 0).set_requires_grad(false),
                    loc_targets: Tensor::stack(&loc_vec, 0),
                    cls_targets: Tensor::stack(&cls_vec, 0),
                };

                Fallible::Ok((index, batch))
            }
        });

        // reorder batches
        let stream = stream.try_reorder_enumerated().boxed();

        Ok(stream)
    }
}

/// The batch that is accepted by the training worker.
#[derive(Debug, TensorLike)]
pub struct TrainingBatch {
    pub epoch: usize,
    pub step: usize,
    pub image: Tensor,
    pub loc_targets: Tensor,
    pub cls_targets: Tensor,
}
