//! The batch preparation program for the ssd-dl project.

pub mod common;
pub mod config;
pub mod stream;

use crate::{common::*, stream::SampleStream};

/// The entry of the preparation program.
pub async fn start(config: Arc<config::Config>) -> Result<()> {
    info!("loading dataset");
    let stream = SampleStream::new(&config).await?;
    info!(
        "producing batches of {} priors over {} classes",
        stream.num_priors(),
        stream.classes().len()
    );

    let num_steps = config
        .output
        .num_steps
        .map(NonZeroUsize::get)
        .unwrap_or_else(|| {
            let batch_size = config.output.batch_size.get();
            (stream.num_records() + batch_size - 1) / batch_size
        });

    let mut batches = stream.stream()?;
    let mut count = 0;

    while let Some(result) = batches.next().await {
        let batch = result?;
        let num_anchors = batch.cls_targets.numel();
        let num_positive = i64::from(&batch.cls_targets.ne(0).sum(Kind::Int64));
        info!(
            "step {}\tepoch {}\timage {:?}\tpositive anchors {}/{}",
            batch.step,
            batch.epoch,
            batch.image.size(),
            num_positive,
            num_anchors
        );

        count += 1;
        if count >= num_steps {
            break;
        }
    }

    Ok(())
}
