use super::error::{DatasetError, Result};

/// Seed used when a dataset is built without an explicit one.
pub const DEFAULT_SEED: u64 = 51;

pub struct DatasetConfig {
    pub seed: u64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self { seed: DEFAULT_SEED }
    }
}

// TODO: Make a zero batch size unrepresentable with NonZeroUsize once callers stop passing raw usize
pub struct ReaderConfig {
    pub batch_size: usize,
    /// Reseeds the dataset generator when the reader is created, so that
    /// reshuffling epochs is reproducible regardless of earlier use.
    pub shuffle_seed: Option<u64>,
}

impl ReaderConfig {
    pub fn build(self) -> Result<Self> {
        check_batch_size(self.batch_size)?;

        Ok(self)
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            batch_size: 32,
            shuffle_seed: None,
        }
    }
}

pub(crate) fn check_batch_size(batch_size: usize) -> Result<()> {
    if batch_size == 0 {
        return Err(DatasetError::InvalidArgument(
            "batch size must be greater than zero".into(),
        ));
    }
    Ok(())
}
