// Tests for MiniBatchReader: epochs, exhaustion, reset

use minibatch::{Dataset, DatasetError, MiniBatchReader, ReaderConfig, ReaderState};
use ndarray::{arr1, Array2};

fn toy(n: usize) -> Dataset {
    let inputs = Array2::from_shape_fn((n, 3), |(i, j)| (i * 3 + j) as f32).into_dyn();
    let labels = arr1(&(0..n as i64).collect::<Vec<_>>()).into_dyn();
    Dataset::new(inputs, labels, n.max(1)).unwrap()
}

fn label_rows(batches: &[minibatch::Batch]) -> Vec<Vec<i64>> {
    batches.iter().map(|b| b.labels.iter().copied().collect()).collect()
}

#[test]
fn test_ten_items_batch_of_three() {
    let mut ds = toy(10);
    let mut reader = MiniBatchReader::new(&mut ds, 3).unwrap();
    assert_eq!(reader.batch_count(), 3);
    assert_eq!(reader.state(), ReaderState::Ready);

    let mut batches = Vec::new();
    for _ in 0..3 {
        batches.push(reader.next_batch().expect("batch"));
    }
    assert_eq!(
        label_rows(&batches),
        vec![vec![0, 1, 2], vec![3, 4, 5], vec![6, 7, 8]]
    );
    assert_eq!(batches[2].inputs.shape(), &[3, 3]);
    assert_eq!(reader.cursor(), 9);
    assert!(!reader.is_exhausted());

    assert!(reader.next_batch().is_none());
    assert_eq!(reader.state(), ReaderState::Exhausted);
    assert!(reader.next_batch().is_none());
}

#[test]
fn test_batch_count_matches_floor() {
    for n in [0usize, 1, 5, 12, 17] {
        for b in [1usize, 2, 4, 5, 20] {
            let mut ds = toy(n);
            let mut reader = MiniBatchReader::new(&mut ds, b).unwrap();
            let batches: Vec<_> = reader.iter().collect();

            assert_eq!(batches.len(), n / b);
            assert!(batches.iter().all(|batch| batch.len() == b));
            assert!(batches.len() * b <= n);
            assert!(reader.is_exhausted());
        }
    }
}

#[test]
fn test_zero_batch_size_rejected() {
    let mut ds = toy(4);
    assert!(matches!(
        MiniBatchReader::new(&mut ds, 0),
        Err(DatasetError::InvalidArgument(_))
    ));
}

#[test]
fn test_empty_epoch_when_batch_larger_than_dataset() {
    let mut ds = toy(3);
    let mut reader = MiniBatchReader::new(&mut ds, 4).unwrap();
    assert_eq!(reader.batch_count(), 0);
    assert!(reader.next_batch().is_none());
    assert!(reader.is_exhausted());
}

#[test]
fn test_iter_is_not_restartable() {
    let mut ds = toy(6);
    let mut reader = MiniBatchReader::new(&mut ds, 2).unwrap();
    assert_eq!(reader.iter().count(), 3);
    assert_eq!(reader.iter().count(), 0);

    reader.reset(false);
    assert_eq!((&mut reader).into_iter().count(), 3);
}

#[test]
fn test_reset_without_shuffle_repeats_batches() {
    let mut ds = toy(11);
    ds.shuffle();
    let mut reader = MiniBatchReader::new(&mut ds, 4).unwrap();

    let first: Vec<_> = reader.iter().collect();
    reader.reset(false);
    assert_eq!(reader.cursor(), 0);
    assert_eq!(reader.state(), ReaderState::Ready);
    let second: Vec<_> = reader.iter().collect();

    assert_eq!(first, second);
}

#[test]
fn test_partial_epoch_then_reset() {
    let mut ds = toy(8);
    let mut reader = MiniBatchReader::new(&mut ds, 2).unwrap();
    reader.next_batch();
    reader.next_batch();
    reader.reset(false);

    let batch = reader.next_batch().unwrap();
    assert_eq!(batch.batch_number, 0);
    assert_eq!(batch.labels.iter().copied().collect::<Vec<_>>(), vec![0, 1]);
}

#[test]
fn test_reset_with_shuffle_reorders_dataset() {
    let mut ds = toy(30);
    let mut reader = MiniBatchReader::new(&mut ds, 5).unwrap();
    let first: Vec<_> = reader.iter().collect();

    reader.reset(true);
    assert_ne!(reader.dataset().permutation(), (0..30).collect::<Vec<_>>().as_slice());
    let second: Vec<_> = reader.iter().collect();
    assert_eq!(second.len(), 6);
    assert_ne!(first, second);

    // Every item still appears exactly once per epoch
    let mut labels: Vec<i64> = second.iter().flat_map(|b| b.labels.iter().copied()).collect();
    labels.sort_unstable();
    assert_eq!(labels, (0..30).collect::<Vec<_>>());
}

#[test]
fn test_shuffled_epochs_are_reproducible() {
    let epochs = |seed: u64| {
        let mut ds = toy(16);
        let config = ReaderConfig {
            batch_size: 4,
            shuffle_seed: Some(seed),
        };
        let mut reader = MiniBatchReader::with_config(&mut ds, config).unwrap();
        let mut seen = Vec::new();
        for _ in 0..3 {
            reader.reset(true);
            seen.extend(reader.iter());
        }
        seen
    };

    assert_eq!(epochs(5), epochs(5));
    assert_ne!(epochs(5), epochs(6));
}

#[test]
fn test_reader_does_not_touch_order_without_reset() {
    let mut ds = toy(9);
    {
        let mut reader = MiniBatchReader::new(&mut ds, 3).unwrap();
        assert_eq!(reader.iter().count(), 3);
    }
    assert_eq!(ds.permutation(), (0..9).collect::<Vec<_>>().as_slice());
}

#[test]
fn test_reader_info() {
    let mut ds = toy(10);
    let reader = MiniBatchReader::new(&mut ds, 4).unwrap();
    let info = reader.info();
    assert_eq!(info.batch_size, Some(4));
    assert_eq!(info.batch_count(), Some(2));
    assert_eq!(info.dropped_items(), Some(2));
    assert!(info.to_string().contains("Dropped items: 2"));
}
