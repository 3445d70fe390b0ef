use tracing::{debug, trace};

use super::config::ReaderConfig;
use super::data_batch::Batch;
use super::dataset::Dataset;
use super::error::Result;
use super::info::DatasetInfo;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReaderState {
    Ready,
    Exhausted,
}

/// Epoch cursor over a borrowed [`Dataset`].
///
/// Batches are sequential and non-overlapping. Once fewer than `batch_size`
/// items remain the epoch is over: [`MiniBatchReader::next_batch`] returns
/// `None` until [`MiniBatchReader::reset`] is called. The tail is dropped.
pub struct MiniBatchReader<'a> {
    dataset: &'a mut Dataset,
    batch_size: usize,
    batch_count: usize,
    cursor: usize,
    state: ReaderState,
}

impl<'a> MiniBatchReader<'a> {
    pub fn new(dataset: &'a mut Dataset, batch_size: usize) -> Result<Self> {
        Self::with_config(
            dataset,
            ReaderConfig {
                batch_size,
                ..Default::default()
            },
        )
    }

    pub fn with_config(dataset: &'a mut Dataset, config: ReaderConfig) -> Result<Self> {
        let config = config.build()?;

        if let Some(seed) = config.shuffle_seed {
            dataset.set_seed(seed);
        }

        let batch_count = dataset.len() / config.batch_size;
        debug!(
            items = dataset.len(),
            batch_size = config.batch_size,
            batch_count,
            dropped = dataset.len() % config.batch_size,
            "created mini-batch reader"
        );

        Ok(MiniBatchReader {
            dataset,
            batch_size: config.batch_size,
            batch_count,
            cursor: 0,
            state: ReaderState::Ready,
        })
    }

    /// Returns the next `batch_size` items, or `None` once the epoch is over.
    pub fn next_batch(&mut self) -> Option<Batch> {
        let end = self.cursor + self.batch_size;
        if end > self.dataset.len() {
            if self.state == ReaderState::Ready {
                debug!(cursor = self.cursor, "epoch finished");
            }
            self.state = ReaderState::Exhausted;
            return None;
        }

        let batch = self.dataset.batch(self.cursor, self.batch_size);
        self.cursor = end;

        trace!(batch_number = batch.batch_number, "read batch");
        Some(batch)
    }

    /// Rewinds to the first batch, reshuffling the dataset with its current
    /// generator stream first when `shuffle` is set.
    pub fn reset(&mut self, shuffle: bool) {
        if shuffle {
            self.dataset.shuffle();
        }
        self.cursor = 0;
        self.state = ReaderState::Ready;
    }

    pub fn iter(&mut self) -> ReaderIter<'_, 'a> {
        ReaderIter { reader: self }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn batch_count(&self) -> usize {
        self.batch_count
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == ReaderState::Exhausted
    }

    pub fn dataset(&self) -> &Dataset {
        &*self.dataset
    }

    pub fn info(&self) -> DatasetInfo {
        DatasetInfo::new(&*self.dataset, Some(self.batch_size))
    }
}

/// Drains the reader's current epoch. Iterating again needs a reset.
pub struct ReaderIter<'r, 'a> {
    reader: &'r mut MiniBatchReader<'a>,
}

impl Iterator for ReaderIter<'_, '_> {
    type Item = Batch;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next_batch()
    }
}

impl<'r, 'a> IntoIterator for &'r mut MiniBatchReader<'a> {
    type Item = Batch;
    type IntoIter = ReaderIter<'r, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
