//! Splitting payload lists into submission batches.

use crate::error::{Error, Result};
use std::slice::Chunks;

/// A restartable partition of a slice into chunks of at most `size` items.
///
/// Iterating is lazy and can be repeated; each pass yields the same chunks.
#[derive(Debug)]
pub struct Batches<'a, T> {
    items: &'a [T],
    size: usize,
}

impl<T> Clone for Batches<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Batches<'_, T> {}

impl<'a, T> Batches<'a, T> {
    /// Partition `items` into batches of at most `size`.
    pub fn new(items: &'a [T], size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidBatchSize(size));
        }
        Ok(Self { items, size })
    }

    /// Iterate over the batches from the start.
    pub fn iter(&self) -> Chunks<'a, T> {
        self.items.chunks(self.size)
    }

    /// Number of batches.
    pub fn len(&self) -> usize {
        self.items.len().div_ceil(self.size)
    }

    /// Check if there are no batches.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maximum batch size.
    pub fn size(&self) -> usize {
        self.size
    }
}

impl<'a, T> IntoIterator for Batches<'a, T> {
    type Item = &'a [T];
    type IntoIter = Chunks<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, 'b, T> IntoIterator for &'b Batches<'a, T> {
    type Item = &'a [T];
    type IntoIter = Chunks<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Partition `items` into batches of at most `size`.
pub fn batches<T>(items: &[T], size: usize) -> Result<Batches<'_, T>> {
    Batches::new(items, size)
}
