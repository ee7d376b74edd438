//! In-memory train/val/test container.

use anyhow::Result;
use std::slice::Chunks;

/// Fractions of records held out for validation and test; the rest is train.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitFractions {
    val: f64,
    test: f64,
}

impl SplitFractions {
    /// Both fractions must be in `[0, 1)` and sum to less than 1.
    pub fn new(val: f64, test: f64) -> Result<Self> {
        for (name, f) in [("val", val), ("test", test)] {
            if !(0.0..1.0).contains(&f) {
                anyhow::bail!("{} fraction must be in [0, 1), got {}", name, f);
            }
        }
        if val + test >= 1.0 {
            anyhow::bail!(
                "val + test fractions must leave room for training data, got {} + {}",
                val,
                test
            );
        }
        Ok(Self { val, test })
    }

    pub fn val(&self) -> f64 {
        self.val
    }

    pub fn test(&self) -> f64 {
        self.test
    }
}

/// Records materialized in memory and split into train, val, and test.
#[derive(Debug, Clone)]
pub struct SplitDataset<T> {
    train: Vec<T>,
    val: Vec<T>,
    test: Vec<T>,
}

impl<T> SplitDataset<T> {
    /// Splits `records` in order: train first, then val, then test.
    /// Held-out sizes are `floor(n * fraction)`.
    pub fn split(mut records: Vec<T>, fractions: SplitFractions) -> Self {
        let n = records.len();
        let n_val = (n as f64 * fractions.val).floor() as usize;
        let n_test = (n as f64 * fractions.test).floor() as usize;
        let n_train = n - n_val - n_test;

        let mut val = records.split_off(n_train);
        let test = val.split_off(n_val);
        Self {
            train: records,
            val,
            test,
        }
    }

    pub fn train(&self) -> &[T] {
        &self.train
    }

    pub fn val(&self) -> &[T] {
        &self.val
    }

    pub fn test(&self) -> &[T] {
        &self.test
    }

    /// (train, val, test) record counts.
    pub fn sizes(&self) -> (usize, usize, usize) {
        (self.train.len(), self.val.len(), self.test.len())
    }

    /// Training records in batches of `batch_size`; the last batch may be short.
    ///
    /// # Panics
    ///
    /// Panics if `batch_size` is 0.
    pub fn train_batches(&self, batch_size: usize) -> Chunks<'_, T> {
        self.train.chunks(batch_size)
    }

    pub fn num_train_batches(&self, batch_size: usize) -> usize {
        self.train.len().div_ceil(batch_size)
    }
}
