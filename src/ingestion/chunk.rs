//! Chunking - split the city index space into fixed-size ranges

use crate::ingestion::types::ChunkBounds;

/// Select `collection[start..end]`, clamping both bounds to the collection.
/// Never panics; an empty or inverted range yields an empty slice.
pub fn chunk_of<T>(collection: &[T], start: usize, end: usize) -> &[T] {
    let end = end.min(collection.len());
    let start = start.min(end);
    &collection[start..end]
}

/// Lazy sequence of `[lower, lower + size), [lower + size, lower + 2 * size), ...`
/// for every chunk that starts below `upper`.
///
/// The last chunk keeps its full width and may reach past `upper` by up to
/// `size - 1`; [`chunk_of`] clamps it against the real collection.
pub fn chunk_bounds(lower: usize, upper: usize, size: usize) -> ChunkBoundsIter {
    assert!(size > 0, "chunk size must be positive");
    ChunkBoundsIter {
        next_start: lower,
        upper,
        size,
    }
}

#[derive(Debug, Clone)]
pub struct ChunkBoundsIter {
    next_start: usize,
    upper: usize,
    size: usize,
}

impl Iterator for ChunkBoundsIter {
    type Item = ChunkBounds;

    fn next(&mut self) -> Option<ChunkBounds> {
        if self.next_start >= self.upper {
            return None;
        }
        let start = self.next_start;
        let end = start.saturating_add(self.size);
        self.next_start = end;
        Some(ChunkBounds { start, end })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .upper
            .saturating_sub(self.next_start)
            .div_ceil(self.size);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ChunkBoundsIter {}
