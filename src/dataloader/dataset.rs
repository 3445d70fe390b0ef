use std::ops::{Bound, RangeBounds};

use ndarray::iter::AxisIter;
use ndarray::{concatenate, stack, ArrayD, ArrayViewD, Axis, IxDyn, Slice};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use super::config::{check_batch_size, DatasetConfig, DEFAULT_SEED};
use super::data_batch::{Batch, Batches};
use super::error::{DatasetError, Result};
use super::info::DatasetInfo;

/// Items of a dataset in current order, as borrowed `(input, label)` views.
pub type Items<'a> = std::iter::Zip<AxisIter<'a, f32, IxDyn>, AxisIter<'a, i64, IxDyn>>;

/// Paired inputs and labels held in memory.
///
/// Axis 0 of both arrays is the item axis. `permutation[k]` is the position
/// item `k` had before any shuffle, which is what [`Dataset::unshuffle`]
/// scatters back to.
#[derive(Clone, Debug)]
pub struct Dataset {
    inputs: ArrayD<f32>,
    labels: ArrayD<i64>,
    class_count: usize,
    permutation: Vec<usize>,
    seed: u64,
    rng: StdRng,
}

impl Dataset {
    pub fn new(inputs: ArrayD<f32>, labels: ArrayD<i64>, class_count: usize) -> Result<Self> {
        Self::with_seed(inputs, labels, class_count, DEFAULT_SEED)
    }

    pub fn with_config(
        inputs: ArrayD<f32>,
        labels: ArrayD<i64>,
        class_count: usize,
        config: DatasetConfig,
    ) -> Result<Self> {
        Self::with_seed(inputs, labels, class_count, config.seed)
    }

    /// Builds a dataset from bulk arrays whose first axis indexes items.
    ///
    /// # Errors
    /// [`DatasetError::ShapeMismatch`] if the arrays hold a different number of
    /// items, [`DatasetError::InvalidArgument`] if either array has no item axis.
    pub fn with_seed(
        inputs: ArrayD<f32>,
        labels: ArrayD<i64>,
        class_count: usize,
        seed: u64,
    ) -> Result<Self> {
        if inputs.ndim() == 0 || labels.ndim() == 0 {
            return Err(DatasetError::InvalidArgument(
                "inputs and labels need an item axis".into(),
            ));
        }

        let input_count = inputs.len_of(Axis(0));
        let label_count = labels.len_of(Axis(0));
        if input_count != label_count {
            return Err(DatasetError::ShapeMismatch {
                inputs: input_count,
                labels: label_count,
            });
        }

        Ok(Self {
            inputs,
            labels,
            class_count,
            permutation: (0..input_count).collect(),
            seed,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Stacks per-item arrays into a dataset. Every input must have the same
    /// shape, and so must every label.
    pub fn from_samples(
        inputs: Vec<ArrayD<f32>>,
        labels: Vec<ArrayD<i64>>,
        class_count: usize,
    ) -> Result<Self> {
        if inputs.len() != labels.len() {
            return Err(DatasetError::ShapeMismatch {
                inputs: inputs.len(),
                labels: labels.len(),
            });
        }

        Self::new(stack_items(&inputs)?, stack_items(&labels)?, class_count)
    }

    pub fn len(&self) -> usize {
        self.permutation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Owned copy of the `(input, label)` pair at `index`.
    pub fn item(&self, index: usize) -> Result<(ArrayD<f32>, ArrayD<i64>)> {
        if index >= self.len() {
            return Err(DatasetError::InvalidArgument(format!(
                "index {} out of range for dataset of size {}",
                index,
                self.len()
            )));
        }

        Ok((
            self.inputs.index_axis(Axis(0), index).to_owned(),
            self.labels.index_axis(Axis(0), index).to_owned(),
        ))
    }

    pub fn iter(&self) -> Items<'_> {
        self.inputs
            .axis_iter(Axis(0))
            .zip(self.labels.axis_iter(Axis(0)))
    }

    /// New dataset holding the items of `range` in current order. Bounds are
    /// clamped to `[0, len]`; a start past the end yields an empty dataset.
    pub fn slice<R: RangeBounds<usize>>(&self, range: R) -> Dataset {
        let (start, end) = clamp_range(&range, self.len());
        let slice = Slice::from(start..end);

        self.derive(
            self.inputs.slice_axis(Axis(0), slice).to_owned(),
            self.labels.slice_axis(Axis(0), slice).to_owned(),
        )
    }

    /// New dataset gathering `indices` in the given order. Repeats are allowed.
    pub fn subset(&self, indices: &[usize]) -> Result<Dataset> {
        if let Some(&index) = indices.iter().find(|&&i| i >= self.len()) {
            return Err(DatasetError::InvalidArgument(format!(
                "subset index {} out of range for dataset of size {}",
                index,
                self.len()
            )));
        }

        Ok(self.derive(
            self.inputs.select(Axis(0), indices),
            self.labels.select(Axis(0), indices),
        ))
    }

    pub fn input_shape(&self) -> Result<Vec<usize>> {
        if self.is_empty() {
            return Err(DatasetError::EmptyDataset);
        }
        Ok(self.inputs.shape()[1..].to_vec())
    }

    pub fn label_shape(&self) -> Result<Vec<usize>> {
        if self.is_empty() {
            return Err(DatasetError::EmptyDataset);
        }
        Ok(self.labels.shape()[1..].to_vec())
    }

    pub fn class_count(&self) -> usize {
        self.class_count
    }

    pub fn permutation(&self) -> &[usize] {
        &self.permutation
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Reseeds the generator. The current order is left alone.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Reorders every item by a uniformly random permutation drawn from the
    /// dataset's own generator.
    pub fn shuffle(&mut self) {
        if self.is_empty() {
            return;
        }

        let mut order: Vec<usize> = (0..self.len()).collect();
        order.shuffle(&mut self.rng);
        self.reorder(&order);

        debug!(items = self.len(), seed = self.seed, "shuffled dataset");
    }

    pub fn shuffle_with_seed(&mut self, seed: u64) {
        self.set_seed(seed);
        self.shuffle();
    }

    /// Moves every item back to the position it had before shuffling.
    pub fn unshuffle(&mut self) {
        if self.is_empty() {
            return;
        }

        let mut order = vec![0; self.len()];
        for (position, &original) in self.permutation.iter().enumerate() {
            order[original] = position;
        }
        self.reorder(&order);

        debug!(items = self.len(), "restored original dataset order");
    }

    /// Concatenates `a` then `b`.
    ///
    /// # Errors
    /// [`DatasetError::ClassCountMismatch`] if the class counts differ,
    /// [`DatasetError::SampleShapeMismatch`] if item shapes differ.
    pub fn join(a: &Dataset, b: &Dataset) -> Result<Dataset> {
        if a.class_count != b.class_count {
            return Err(DatasetError::ClassCountMismatch {
                left: a.class_count,
                right: b.class_count,
            });
        }

        Ok(a.derive(
            concat_items(&a.inputs, &b.inputs)?,
            concat_items(&a.labels, &b.labels)?,
        ))
    }

    /// Returns the items in `start..end` and, joined, everything outside it.
    pub fn split(&self, start: usize, end: usize) -> Result<(Dataset, Dataset)> {
        let inner = self.slice(start..end);
        let outer = Dataset::join(&self.slice(..start), &self.slice(end..))?;
        Ok((inner, outer))
    }

    /// Consecutive full batches in current order. A tail shorter than
    /// `batch_size` is never emitted.
    pub fn batches(&self, batch_size: usize) -> Result<Batches<'_>> {
        check_batch_size(batch_size)?;
        Ok(Batches::new(self, batch_size))
    }

    pub fn map_inputs<F>(&self, mut f: F) -> Result<Dataset>
    where
        F: FnMut(ArrayViewD<'_, f32>) -> ArrayD<f32>,
    {
        if self.is_empty() {
            return Ok(self.derive(self.inputs.clone(), self.labels.clone()));
        }

        let mapped: Vec<ArrayD<f32>> = self.inputs.axis_iter(Axis(0)).map(&mut f).collect();
        Ok(self.derive(stack_items(&mapped)?, self.labels.clone()))
    }

    pub fn map_labels<F>(&self, mut f: F) -> Result<Dataset>
    where
        F: FnMut(ArrayViewD<'_, i64>) -> ArrayD<i64>,
    {
        if self.is_empty() {
            return Ok(self.derive(self.inputs.clone(), self.labels.clone()));
        }

        let mapped: Vec<ArrayD<i64>> = self.labels.axis_iter(Axis(0)).map(&mut f).collect();
        Ok(self.derive(self.inputs.clone(), stack_items(&mapped)?))
    }

    pub fn inputs(&self) -> &ArrayD<f32> {
        &self.inputs
    }

    pub fn labels(&self) -> &ArrayD<i64> {
        &self.labels
    }

    pub fn unpack(&self) -> (&ArrayD<f32>, &ArrayD<i64>) {
        (&self.inputs, &self.labels)
    }

    pub fn into_parts(self) -> (ArrayD<f32>, ArrayD<i64>) {
        (self.inputs, self.labels)
    }

    pub fn info(&self) -> DatasetInfo {
        DatasetInfo::new(self, None)
    }

    pub(crate) fn batch(&self, start: usize, batch_size: usize) -> Batch {
        let (inputs, labels) = self.slice(start..start + batch_size).into_parts();
        Batch {
            inputs,
            labels,
            batch_number: start / batch_size,
        }
    }

    // inputs, labels and permutation must always move together
    fn reorder(&mut self, order: &[usize]) {
        self.inputs = self.inputs.select(Axis(0), order);
        self.labels = self.labels.select(Axis(0), order);
        self.permutation = order.iter().map(|&i| self.permutation[i]).collect();
    }

    fn derive(&self, inputs: ArrayD<f32>, labels: ArrayD<i64>) -> Dataset {
        let len = inputs.len_of(Axis(0));
        Dataset {
            inputs,
            labels,
            class_count: self.class_count,
            permutation: (0..len).collect(),
            seed: self.seed,
            rng: StdRng::seed_from_u64(self.seed),
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = (ArrayViewD<'a, f32>, ArrayViewD<'a, i64>);
    type IntoIter = Items<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn clamp_range<R: RangeBounds<usize>>(range: &R, len: usize) -> (usize, usize) {
    let start = match range.start_bound() {
        Bound::Included(&s) => s,
        Bound::Excluded(&s) => s.saturating_add(1),
        Bound::Unbounded => 0,
    }
    .min(len);

    let end = match range.end_bound() {
        Bound::Included(&e) => e.saturating_add(1),
        Bound::Excluded(&e) => e,
        Bound::Unbounded => len,
    }
    .min(len);

    (start, end.max(start))
}

fn stack_items<A: Clone>(items: &[ArrayD<A>]) -> Result<ArrayD<A>> {
    let Some(first) = items.first() else {
        return Ok(ArrayD::from_shape_vec(IxDyn(&[0]), Vec::new())?);
    };

    if let Some(item) = items.iter().find(|item| item.shape() != first.shape()) {
        return Err(DatasetError::SampleShapeMismatch {
            expected: first.shape().to_vec(),
            found: item.shape().to_vec(),
        });
    }

    let views: Vec<ArrayViewD<'_, A>> = items.iter().map(|item| item.view()).collect();
    Ok(stack(Axis(0), &views)?)
}

fn concat_items<A: Clone>(a: &ArrayD<A>, b: &ArrayD<A>) -> Result<ArrayD<A>> {
    // Stacking zero samples gives shape [0], which carries no item shape
    if is_shapeless_empty(b) {
        return Ok(a.clone());
    }
    if is_shapeless_empty(a) {
        return Ok(b.clone());
    }

    if a.shape()[1..] != b.shape()[1..] {
        return Err(DatasetError::SampleShapeMismatch {
            expected: a.shape()[1..].to_vec(),
            found: b.shape()[1..].to_vec(),
        });
    }

    Ok(concatenate(Axis(0), &[a.view(), b.view()])?)
}

fn is_shapeless_empty<A>(items: &ArrayD<A>) -> bool {
    items.ndim() == 1 && items.is_empty()
}

#[cfg(test)]
mod tests {
    use ndarray::{arr1, arr2};

    use super::*;

    fn counting(n: usize) -> Dataset {
        let inputs = ArrayD::from_shape_fn(IxDyn(&[n, 2]), |ix| (ix[0] * 10 + ix[1]) as f32);
        let labels = arr1(&(0..n as i64).collect::<Vec<_>>()).into_dyn();
        Dataset::new(inputs, labels, n.max(1)).unwrap()
    }

    #[test]
    fn clamp_range_follows_slice_bounds() {
        assert_eq!(clamp_range(&(1..3), 5), (1, 3));
        assert_eq!(clamp_range(&(..), 5), (0, 5));
        assert_eq!(clamp_range(&(2..=3), 5), (2, 4));
        assert_eq!(clamp_range(&(3..9), 5), (3, 5));
        assert_eq!(clamp_range(&(7..9), 5), (5, 5));
        assert_eq!(clamp_range(&(4..2), 5), (4, 4));
    }

    #[test]
    fn reorder_moves_all_sequences_together() {
        let mut ds = counting(4);
        ds.reorder(&[2, 0, 3, 1]);

        assert_eq!(ds.permutation(), &[2, 0, 3, 1]);
        for (k, (x, y)) in ds.iter().enumerate() {
            let original = ds.permutation()[k];
            assert_eq!(y.sum(), original as i64);
            assert_eq!(x[0], (original * 10) as f32);
        }
    }

    #[test]
    fn derived_datasets_start_from_identity() {
        let mut ds = counting(6);
        ds.shuffle();
        let half = ds.slice(..3);
        assert_eq!(half.permutation(), &[0, 1, 2]);
        assert_eq!(half.seed(), ds.seed());
    }

    #[test]
    fn stacking_rejects_ragged_samples() {
        let samples = vec![arr1(&[1.0f32, 2.0]).into_dyn(), arr1(&[1.0f32]).into_dyn()];
        let err = stack_items(&samples).unwrap_err();
        assert!(matches!(err, DatasetError::SampleShapeMismatch { .. }));
    }

    #[test]
    fn join_with_empty_side_keeps_other_side() {
        let empty = Dataset::from_samples(Vec::new(), Vec::new(), 3).unwrap();
        let ds = Dataset::new(
            arr2(&[[1.0f32, 2.0], [3.0, 4.0]]).into_dyn(),
            arr1(&[0i64, 2]).into_dyn(),
            3,
        )
        .unwrap();

        let joined = Dataset::join(&empty, &ds).unwrap();
        assert_eq!(joined.inputs(), ds.inputs());
        assert_eq!(joined.labels(), ds.labels());
    }
}
