//! Preparation program configuration format.

use crate::common::*;
use ssd_dl::encoder::PriorBoxConfig;

/// The main preparation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub preprocessor: PreprocessorConfig,
    pub encoder: EncoderConfig,
    pub output: OutputConfig,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = std::fs::read_to_string(path)?;
        let config = json5::from_str(&text)?;
        Ok(config)
    }
}

/// Dataset options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// The directory containing the `image` and `json` sub-directories.
    pub dataset_dir: PathBuf,
    /// The file of class names, one name per line.
    pub classes_file: PathBuf,
    /// Optional list of whitelisted classes.
    pub class_whitelist: Option<HashSet<String>>,
    /// The square canonical image size in pixels.
    pub image_size: NonZeroUsize,
}

/// Data preprocessing options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessorConfig {
    /// The maximum number of waiting data records per preprocessing stage.
    pub worker_buf_size: Option<usize>,
    /// The factor that tolerates out-of-image boundary bounding boxes.
    pub out_of_bound_tolerance: R64,
    /// The minimum bounding box size in ratio unit.
    pub min_bbox_size: R64,
    /// The probability to apply horizontal flip.
    pub horizontal_flip_prob: Option<R64>,
    /// The probability to apply vertical flip.
    pub vertical_flip_prob: Option<R64>,
    /// The probability to apply color jitter.
    pub color_jitter_prob: Option<R64>,
    /// The maximum relative brightness shift.
    pub brightness_shift: Option<R64>,
    /// The maximum relative contrast shift.
    pub contrast_shift: Option<R64>,
    /// The maximum relative saturation shift.
    pub saturation_shift: Option<R64>,
    /// The per-channel pixel mean used in normalization.
    pub mean: Option<[R64; 3]>,
    /// The per-channel pixel standard deviation used in normalization.
    pub std: Option<[R64; 3]>,
    /// The device where the preprocessor works on.
    #[serde(with = "tch_serde::serde_device")]
    pub device: Device,
}

/// Target encoding options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// The prior box layout.
    pub prior_boxes: PriorBoxConfig,
    /// The minimum IoU for a prior box to be matched to a ground truth.
    pub iou_threshold: R64,
    /// The center and size variances of the offset encoding.
    pub variances: [R64; 2],
}

/// Output stream options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// The batch size.
    pub batch_size: NonZeroUsize,
    /// The number of batches to produce. It defaults to one epoch.
    pub num_steps: Option<NonZeroUsize>,
}
