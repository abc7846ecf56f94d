// Public entry points tying the line splitter, equivalence index, match
// finder and delta codec together: `bdiff`, `blocks`, `patches`,
// `patchedsize` and `fixws`.

use crate::delta::{self, Fragment};
use crate::equivalence::AllocError;
use crate::line::Lines;
use crate::matcher::{self, Hunk};
use crate::ws;

#[derive(Debug, thiserror::Error)]
pub enum BdiffError {
    #[error(transparent)]
    Alloc(#[from] AllocError),
    #[error(transparent)]
    Encode(#[from] delta::EncodeError),
}

#[derive(Debug, thiserror::Error)]
pub enum PatchesError {
    #[error("delta {index}: {source}")]
    Decode {
        index: usize,
        #[source]
        source: delta::DecodeError,
    },
    #[error(transparent)]
    Fold(#[from] delta::FoldError),
    #[error(transparent)]
    Invalid(#[from] delta::InvalidPatch),
}

#[derive(Debug, thiserror::Error)]
pub enum PatchedSizeError {
    #[error(transparent)]
    Decode(#[from] delta::DecodeError),
}

/// Compute the matching-block list between `a` and `b`.
///
/// Exposed directly for callers that want the block structure itself (e.g.
/// to render a human-readable diff) rather than the encoded byte delta.
pub fn blocks(a: &[u8], b: &[u8]) -> Result<Vec<Hunk>, AllocError> {
    let la = Lines::split(a);
    let lb = Lines::split(b);
    matcher::blocks(&la, &lb)
}

/// Compute the binary delta transforming `a` into `b`.
pub fn bdiff(a: &[u8], b: &[u8]) -> Result<Vec<u8>, BdiffError> {
    let la = Lines::split(a);
    let lb = Lines::split(b);
    let hunks = matcher::blocks(&la, &lb)?;
    log::debug!("bdiff: {} bytes -> {} bytes, {} hunks", a.len(), b.len(), hunks.len());
    let out = delta::encode(&la, &lb, &hunks)?;
    Ok(out)
}

/// Apply an ordered sequence of deltas to `original`, folding them into a
/// single composed delta before applying. `deltas[0]` is applied first.
pub fn patches(original: &[u8], deltas: &[&[u8]]) -> Result<Vec<u8>, PatchesError> {
    if deltas.is_empty() {
        return Ok(original.to_vec());
    }
    if deltas.len() == 1 {
        let frags = delta::decode(deltas[0]).map_err(|source| PatchesError::Decode { index: 0, source })?;
        return Ok(delta::apply(original, &frags)?);
    }

    let frags = delta::fold(deltas)?;
    log::debug!("patches: folded {} deltas into {} fragments", deltas.len(), frags.len());
    Ok(delta::apply(original, &frags)?)
}

/// Compute the size of the buffer produced by applying a single (already
/// folded) `delta` to an original of length `original_len`, without
/// materialising the result. Trusts the decoded records' ranges rather than
/// validating them against `original_len` — only decoding can fail here.
pub fn patchedsize(original_len: usize, delta_bytes: &[u8]) -> Result<usize, PatchedSizeError> {
    let frags: Vec<Fragment<'_>> = delta::decode(delta_bytes)?;
    Ok(delta::patchedsize(original_len, &frags))
}

/// Normalize whitespace in `s`, dropping it entirely when `all_ws` is set
/// or collapsing runs to a single space otherwise.
pub fn fixws(s: &[u8], all_ws: bool) -> Vec<u8> {
    ws::fixws(s, all_ws)
}
