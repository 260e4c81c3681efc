use super::*;
use crate::{common::*, label::PixelLabel};
use bbox::{prelude::*, Label, Size, LTRB};

/// The KITTI-style detection dataset.
///
/// The dataset directory holds an `image/` directory and a `json/` directory
/// whose files pair up by file stem. Every image must come with an
/// annotation file; a missing one fails the load immediately.
#[derive(Debug, Clone)]
pub struct KittiDataset {
    pub classes: IndexSet<String>,
    pub pairs: Vec<SamplePair>,
    pub records: Vec<Arc<FileRecord>>,
}

impl GenericDataset for KittiDataset {
    fn input_channels(&self) -> usize {
        3
    }

    fn classes(&self) -> &IndexSet<String> {
        &self.classes
    }
}

impl FileDataset for KittiDataset {
    fn records(&self) -> &[Arc<FileRecord>] {
        &self.records
    }
}

impl KittiDataset {
    pub async fn load(
        dataset_dir: impl AsRef<Path>,
        classes_file: impl AsRef<Path>,
        class_whitelist: Option<HashSet<String>>,
    ) -> Result<Self> {
        let dataset_dir = dataset_dir.as_ref();
        let classes_file = classes_file.as_ref();

        let classes = load_classes_file(classes_file).await?;

        // pair up image and annotation files
        let pairs = {
            let dataset_dir = dataset_dir.to_owned();
            tokio::task::spawn_blocking(move || list_sample_pairs(&dataset_dir)).await??
        };

        // parse annotation files
        let (classes, records) = {
            let pairs = pairs.clone();

            tokio::task::spawn_blocking(move || -> Result<_> {
                let records: Vec<_> = pairs
                    .iter()
                    .map(|pair| -> Result<_> {
                        let record = load_sample_record(pair, &classes, &class_whitelist)
                            .with_context(|| {
                                format!(
                                    "failed to load annotation file '{}'",
                                    pair.json_file.display()
                                )
                            })?;
                        Ok(Arc::new(record))
                    })
                    .try_collect()?;
                Ok((classes, records))
            })
            .await??
        };

        Ok(Self {
            classes,
            pairs,
            records,
        })
    }
}

/// An image file and its paired annotation file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SamplePair {
    pub image_file: PathBuf,
    pub json_file: PathBuf,
}

/// The on-disk annotation format.
#[derive(Debug, Clone, Deserialize)]
struct Annotation {
    objects: Vec<ObjectEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct ObjectEntry {
    label: usize,
    /// Corner box in `[x1, y1, x2, y2]` pixel order.
    bbox: [f64; 4],
}

/// Enumerate the `image/` directory recursively and match each image with
/// its annotation file by stem.
///
/// The image extension is taken from the first image file found, so a
/// dataset must not mix image formats.
pub fn list_sample_pairs(dataset_dir: &Path) -> Result<Vec<SamplePair>> {
    let image_dir = dataset_dir.join("image");
    let json_dir = dataset_dir.join("json");
    ensure!(
        image_dir.is_dir(),
        "the image directory '{}' does not exist",
        image_dir.display()
    );
    ensure!(
        json_dir.is_dir(),
        "the annotation directory '{}' does not exist",
        json_dir.display()
    );

    let extension = {
        let first_file = glob::glob(&format!("{}/**/*.*", image_dir.display()))?
            .filter_map(|path| path.ok())
            .filter(|path| path.is_file())
            .sorted()
            .next()
            .ok_or_else(|| format_err!("no image files found in '{}'", image_dir.display()))?;
        first_file
            .extension()
            .and_then(|ext| ext.to_str())
            .map(ToOwned::to_owned)
            .ok_or_else(|| {
                format_err!(
                    "cannot tell the image extension from '{}'",
                    first_file.display()
                )
            })?
    };

    let pairs: Vec<_> = glob::glob(&format!("{}/**/*.{}", image_dir.display(), extension))?
        .filter_map(|path| path.ok())
        .filter(|path| path.is_file())
        .sorted()
        .map(|image_file| -> Result<_> {
            let json_file = json_dir
                .join(image_file.strip_prefix(&image_dir)?)
                .with_extension("json");
            ensure!(
                json_file.is_file(),
                "the annotation file '{}' paired with '{}' does not exist",
                json_file.display(),
                image_file.display()
            );
            Ok(SamplePair {
                image_file,
                json_file,
            })
        })
        .try_collect()?;

    Ok(pairs)
}

fn load_sample_record(
    pair: &SamplePair,
    classes: &IndexSet<String>,
    class_whitelist: &Option<HashSet<String>>,
) -> Result<FileRecord> {
    let SamplePair {
        image_file,
        json_file,
    } = pair;

    let size = {
        let imagesize::ImageSize { height, width } = imagesize::size(image_file)?;
        Size::try_from_hw([height, width])?
    };

    let text = std::fs::read_to_string(json_file)?;
    let annotation: Annotation = serde_json::from_str(&text)?;

    let bboxes: Vec<PixelLabel> = annotation
        .objects
        .iter()
        .map(|object| -> Result<_> {
            let ObjectEntry { label, bbox } = *object;
            let class_name = classes.get_index(label).ok_or_else(|| {
                format_err!(
                    "the class index {} is out of range, {} classes are defined",
                    label,
                    classes.len()
                )
            })?;

            if let Some(whitelist) = class_whitelist {
                if whitelist.get(class_name).is_none() {
                    return Ok(None);
                }
            }

            ensure!(
                bbox.iter().all(|value| value.is_finite()),
                "the bbox {:?} has non-finite values",
                bbox
            );
            let [x1, y1, x2, y2] = bbox;
            let rect = LTRB::try_from_ltrb([r64(x1), r64(y1), r64(x2), r64(y2)])?;

            Ok(Some(Label { rect, class: label }))
        })
        .filter_map(|result| result.transpose())
        .try_collect()?;

    Ok(FileRecord {
        path: image_file.clone(),
        size,
        bboxes,
    })
}
