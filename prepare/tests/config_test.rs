use anyhow::Result;
use prepare::config::Config;
use std::path::{Path, PathBuf};

fn config_file() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("cfg")
        .join("prepare.json5")
}

#[test]
fn prepare_config_test() -> Result<()> {
    let config = Config::open(config_file())?;

    assert_eq!(config.dataset.image_size.get(), 300);
    assert_eq!(config.output.batch_size.get(), 8);
    assert!(config.preprocessor.vertical_flip_prob.is_none());

    // the canonical SSD300 layout yields 8732 priors
    let priors = config.encoder.prior_boxes.build()?;
    assert_eq!(priors.num_priors(), 8732);

    Ok(())
}
