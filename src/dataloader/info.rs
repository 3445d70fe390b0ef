use std::fmt;

use super::dataset::Dataset;

/// Summary of a dataset and, optionally, how it splits into batches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetInfo {
    pub size: usize,
    pub input_shape: Option<Vec<usize>>,
    pub label_shape: Option<Vec<usize>>,
    pub class_count: usize,
    pub batch_size: Option<usize>,
}

impl DatasetInfo {
    pub fn new(dataset: &Dataset, batch_size: Option<usize>) -> Self {
        DatasetInfo {
            size: dataset.len(),
            input_shape: dataset.input_shape().ok(),
            label_shape: dataset.label_shape().ok(),
            class_count: dataset.class_count(),
            batch_size,
        }
    }

    pub fn batch_count(&self) -> Option<usize> {
        self.batch_size
            .filter(|&bs| bs > 0)
            .map(|bs| self.size / bs)
    }

    /// Items left over after the last full batch.
    pub fn dropped_items(&self) -> Option<usize> {
        self.batch_size
            .filter(|&bs| bs > 0)
            .map(|bs| self.size % bs)
    }
}

impl fmt::Display for DatasetInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dataset Information:")?;
        writeln!(f, "-------------------")?;
        writeln!(f, "Size: {}", self.size)?;
        writeln!(f, "Classes: {}", self.class_count)?;
        match &self.input_shape {
            Some(shape) => writeln!(f, "Input shape: {:?}", shape)?,
            None => writeln!(f, "Input shape: -")?,
        }
        match &self.label_shape {
            Some(shape) => writeln!(f, "Label shape: {:?}", shape)?,
            None => writeln!(f, "Label shape: -")?,
        }
        if let (Some(batch_size), Some(batches), Some(dropped)) =
            (self.batch_size, self.batch_count(), self.dropped_items())
        {
            writeln!(f, "Batch size: {}", batch_size)?;
            writeln!(f, "Batches: {}", batches)?;
            writeln!(f, "Dropped items: {}", dropped)?;
        }
        Ok(())
    }
}
