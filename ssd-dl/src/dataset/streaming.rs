use super::*;
use crate::common::*;

/// Adapter that walks a random access dataset record by record.
#[derive(Debug)]
pub struct RandomAccessStream<D>
where
    D: 'static + RandomAccessDataset + Sync,
{
    dataset: Arc<D>,
}

impl<D> RandomAccessStream<D>
where
    D: RandomAccessDataset + Sync,
{
    pub fn new(dataset: D) -> Self {
        Self {
            dataset: Arc::new(dataset),
        }
    }
}

impl<D> GenericDataset for RandomAccessStream<D>
where
    D: 'static + RandomAccessDataset + Sync,
{
    fn input_channels(&self) -> usize {
        self.dataset.input_channels()
    }

    fn classes(&self) -> &IndexSet<String> {
        self.dataset.classes()
    }
}

impl<D> StreamingDataset for RandomAccessStream<D>
where
    D: 'static + RandomAccessDataset + Sync,
{
    fn stream(&self) -> Result<Pin<Box<dyn Stream<Item = Result<DataRecord>> + Send>>> {
        let dataset = self.dataset.clone();
        let num_records = dataset.num_records();

        let stream = stream::try_unfold(0, move |index| {
            let dataset = dataset.clone();

            async move {
                let output = if index < num_records {
                    let record = dataset.nth(index).await?;
                    Some((record, index + 1))
                } else {
                    None
                };
                Result::<_, Error>::Ok(output)
            }
        });

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct StubDataset {
        classes: IndexSet<String>,
        num_records: usize,
    }

    impl GenericDataset for StubDataset {
        fn input_channels(&self) -> usize {
            3
        }

        fn classes(&self) -> &IndexSet<String> {
            &self.classes
        }
    }

    impl RandomAccessDataset for StubDataset {
        fn num_records(&self) -> usize {
            self.num_records
        }

        fn nth(&self, index: usize) -> Pin<Box<dyn Future<Output = Result<DataRecord>> + Send>> {
            let num_records = self.num_records;

            Box::pin(async move {
                ensure!(index < num_records, "invalid index {}", index);
                Ok(DataRecord {
                    image: Tensor::of_slice(&[index as i64]),
                    bboxes: vec![],
                })
            })
        }
    }

    #[tokio::test]
    async fn streams_records_in_order() -> Result<()> {
        let dataset = StubDataset {
            classes: ["object".to_owned()].into_iter().collect(),
            num_records: 5,
        };
        let streaming = RandomAccessStream::new(dataset);

        let records: Vec<_> = streaming.stream()?.try_collect().await?;
        assert_eq!(records.len(), 5);
        records.iter().enumerate().for_each(|(index, record)| {
            assert_eq!(i64::from(&record.image), index as i64);
            assert!(record.bboxes.is_empty());
        });

        Ok(())
    }

    #[tokio::test]
    async fn streams_nothing_from_empty_dataset() -> Result<()> {
        let dataset = StubDataset {
            classes: ["object".to_owned()].into_iter().collect(),
            num_records: 0,
        };
        let streaming = RandomAccessStream::new(dataset);

        let records: Vec<_> = streaming.stream()?.try_collect().await?;
        assert!(records.is_empty());

        Ok(())
    }
}
