// Folds N binary deltas, applied in order to build up successive revisions,
// into a single delta against the first revision. Folding pairwise along a
// balanced binary tree costs O(m + n log n) total combine work instead of
// the O(N*m) a left-to-right fold would pay walking every earlier delta
// again for each new one.

use super::compose::combine;
use super::decoder::{self, DecodeError};
use super::fragment::Fragment;

#[derive(Debug, thiserror::Error)]
pub enum FoldError {
    #[error("delta {index} failed to decode: {source}")]
    Decode { index: usize, #[source] source: DecodeError },
}

fn fold_range<'a>(deltas: &[&'a [u8]], start: usize, end: usize) -> Result<Vec<Fragment<'a>>, FoldError> {
    if start + 1 == end {
        return decoder::decode(deltas[start]).map_err(|source| FoldError::Decode { index: start, source });
    }

    let mid = start + (end - start) / 2;
    let left = fold_range(deltas, start, mid)?;
    let right = fold_range(deltas, mid, end)?;
    Ok(combine(left, right))
}

/// Fold an ordered sequence of deltas (`deltas[0]` applied first) into one
/// delta equivalent to applying them all in sequence. `deltas` must be
/// non-empty.
pub fn fold<'a>(deltas: &[&'a [u8]]) -> Result<Vec<Fragment<'a>>, FoldError> {
    debug_assert!(!deltas.is_empty());
    fold_range(deltas, 0, deltas.len())
}
