use std::iter::FusedIterator;

use ndarray::{ArrayD, Axis};
use tracing::trace;

use super::dataset::Dataset;

/// `batch_size` consecutive items stacked along axis 0.
#[derive(Clone, Debug, PartialEq)]
pub struct Batch {
    pub inputs: ArrayD<f32>,
    pub labels: ArrayD<i64>,
    pub batch_number: usize,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.inputs.len_of(Axis(0))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_parts(self) -> (ArrayD<f32>, ArrayD<i64>) {
        (self.inputs, self.labels)
    }
}

/// Lazy pass over the full batches of a dataset, see [`Dataset::batches`].
pub struct Batches<'a> {
    dataset: &'a Dataset,
    batch_size: usize,
    cursor: usize,
}

impl<'a> Batches<'a> {
    pub(crate) fn new(dataset: &'a Dataset, batch_size: usize) -> Self {
        Batches {
            dataset,
            batch_size,
            cursor: 0,
        }
    }
}

impl Iterator for Batches<'_> {
    type Item = Batch;

    fn next(&mut self) -> Option<Self::Item> {
        let end = self.cursor + self.batch_size;
        if end > self.dataset.len() {
            return None;
        }

        let batch = self.dataset.batch(self.cursor, self.batch_size);
        self.cursor = end;

        trace!(batch_number = batch.batch_number, "produced batch");
        Some(batch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.dataset.len().saturating_sub(self.cursor) / self.batch_size;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Batches<'_> {}

impl FusedIterator for Batches<'_> {}
