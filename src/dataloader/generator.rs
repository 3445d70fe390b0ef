use ndarray::ArrayD;
use tracing::debug;

use super::dataset::Dataset;
use super::error::Result;

/// Pair of single-pass item sources, drained into a [`Dataset`] on demand.
pub struct DatasetGenerator<I, L> {
    inputs: I,
    labels: L,
    class_count: usize,
    size: Option<usize>,
}

impl<I, L> DatasetGenerator<I, L>
where
    I: Iterator<Item = ArrayD<f32>>,
    L: Iterator<Item = ArrayD<i64>>,
{
    pub fn new<IS, LS>(inputs: IS, labels: LS, class_count: usize) -> Self
    where
        IS: IntoIterator<IntoIter = I, Item = ArrayD<f32>>,
        LS: IntoIterator<IntoIter = L, Item = ArrayD<i64>>,
    {
        DatasetGenerator {
            inputs: inputs.into_iter(),
            labels: labels.into_iter(),
            class_count,
            size: None,
        }
    }

    /// Expected item count, used only to size buffers.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn size(&self) -> Option<usize> {
        self.size
    }

    pub fn class_count(&self) -> usize {
        self.class_count
    }

    pub fn into_dataset(self) -> Result<Dataset> {
        let hint = self.size.unwrap_or(0);

        let mut inputs = Vec::with_capacity(capped_capacity(hint, &self.inputs));
        inputs.extend(self.inputs);
        let mut labels = Vec::with_capacity(capped_capacity(hint, &self.labels));
        labels.extend(self.labels);

        debug!(
            inputs = inputs.len(),
            labels = labels.len(),
            "materialized dataset generator"
        );

        Dataset::from_samples(inputs, labels, self.class_count)
    }
}

impl Dataset {
    pub fn from_generator<I, L>(generator: DatasetGenerator<I, L>) -> Result<Dataset>
    where
        I: Iterator<Item = ArrayD<f32>>,
        L: Iterator<Item = ArrayD<i64>>,
    {
        generator.into_dataset()
    }
}

// The size hint is caller supplied; never reserve past what the source can yield
fn capped_capacity<T: Iterator>(hint: usize, source: &T) -> usize {
    let (lower, upper) = source.size_hint();
    hint.min(upper.unwrap_or(lower))
}
