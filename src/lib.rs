//! In-memory paired datasets and mini-batch reading for training loops.
//!
//! A [`Dataset`] holds inputs and labels as arrays whose first axis indexes
//! items. It can be shuffled reproducibly and unshuffled back, sliced, joined,
//! split and mapped. A [`MiniBatchReader`] walks a dataset in fixed-size,
//! non-overlapping batches, one epoch at a time.

pub mod dataloader;

pub use dataloader::config::{DatasetConfig, ReaderConfig, DEFAULT_SEED};
pub use dataloader::data_batch::{Batch, Batches};
pub use dataloader::dataset::{Dataset, Items};
pub use dataloader::error::{DatasetError, Result};
pub use dataloader::generator::DatasetGenerator;
pub use dataloader::info::DatasetInfo;
pub use dataloader::minibatch_reader::{MiniBatchReader, ReaderIter, ReaderState};
pub use dataloader::storage::{load_dataset, save_dataset};
