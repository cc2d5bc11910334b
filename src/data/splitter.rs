// ============================================================
// Layer 4: Train/Validation Splitter
// ============================================================
// Shuffles a dataset with a fixed seed and splits it into two
// disjoint views:
//   - Training set:   used to update model weights
//   - Validation set: used to measure reconstruction loss on
//                     images the optimiser never saw
//
// The default fraction reproduces the usual MNIST 55 000 / 5 000
// split of the 60 000 training images.
//
// No samples are copied: both halves are PartialDataset windows
// over one shared, shuffled index permutation.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

use std::sync::Arc;

use burn::data::dataset::{
    transform::{PartialDataset, ShuffledDataset},
    Dataset,
};

/// Fraction of MNIST training images kept for training
pub const MNIST_TRAIN_FRACTION: f64 = 55_000.0 / 60_000.0;

/// One half of a split dataset
pub type SplitDataset<D, I> = PartialDataset<Arc<ShuffledDataset<D, I>>, I>;

/// Index at which `total` items are cut for a given training fraction.
/// Rounded to the nearest item and clamped to [0, total].
pub fn split_point(total: usize, train_fraction: f64) -> usize {
    let split_at = ((total as f64) * train_fraction).round();
    if split_at <= 0.0 {
        0
    } else {
        (split_at as usize).min(total)
    }
}

/// Deterministically shuffle `dataset` and split it into (train, validation).
///
/// # Arguments
/// * `dataset`        - Any Burn dataset (consumed by this function)
/// * `train_fraction` - Proportion for training, e.g. 0.9
/// * `seed`           - Shuffle seed; the same seed gives the same split
pub fn split_train_val<D, I>(
    dataset:        D,
    train_fraction: f64,
    seed:           u64,
) -> (SplitDataset<D, I>, SplitDataset<D, I>)
where
    D: Dataset<I>,
    I: Clone + Send + Sync,
{
    let total    = dataset.len();
    let split_at = split_point(total, train_fraction);

    let shuffled = Arc::new(ShuffledDataset::with_seed(dataset, seed));
    let train    = PartialDataset::new(shuffled.clone(), 0, split_at);
    let valid    = PartialDataset::new(shuffled, split_at, total);

    tracing::debug!(
        "Dataset split: {} training, {} validation",
        train.len(),
        valid.len(),
    );

    (train, valid)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::data::dataset::InMemDataset;

    fn numbers(n: usize) -> InMemDataset<usize> {
        InMemDataset::new((0..n).collect())
    }

    #[test]
    fn test_split_point() {
        assert_eq!(split_point(100, 0.8), 80);
        assert_eq!(split_point(60_000, MNIST_TRAIN_FRACTION), 55_000);
        assert_eq!(split_point(10, 1.5), 10);
        assert_eq!(split_point(10, -0.5), 0);
        assert_eq!(split_point(0, 0.8), 0);
    }

    #[test]
    fn test_correct_split_sizes() {
        let (train, val) = split_train_val(numbers(100), 0.8, 7);
        assert_eq!(train.len(), 80);
        assert_eq!(val.len(),   20);
    }

    #[test]
    fn test_all_items_preserved_once() {
        let (train, val) = split_train_val(numbers(50), 0.7, 7);
        let mut seen: Vec<usize> = train.iter().chain(val.iter()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_split() {
        let (a, _) = split_train_val(numbers(30), 0.5, 42);
        let (b, _) = split_train_val(numbers(30), 0.5, 42);
        assert_eq!(a.iter().collect::<Vec<_>>(), b.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_dataset() {
        let (train, val) = split_train_val(numbers(0), 0.8, 1);
        assert!(train.is_empty());
        assert!(val.is_empty());
    }
}
