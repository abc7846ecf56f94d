// Applies a single decoded fragment list to its original buffer, writing
// directly into one pre-sized output buffer rather than accumulating
// intermediate copies.

use super::fragment::Fragment;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvalidPatch {
    #[error("fragment at index {index} starts at {start}, before the previous fragment's end {last}")]
    NonMonotone { index: usize, start: u32, last: u32 },
    #[error("fragment at index {index} ends at {end}, past the end of the {original_len}-byte original")]
    OutOfRange { index: usize, end: u32, original_len: usize },
}

/// Compute the length of the buffer produced by applying `frags` to an
/// original of length `original_len`, without materialising the result.
///
/// Mirrors `mpatch_patchedsize`: it sums fragment lengths and the unchanged
/// gaps between them straight off the decoded records, trusting their
/// ranges rather than validating them against `original_len`. That check is
/// `apply`'s alone — it's the only place that actually indexes into the
/// original buffer and must not run off either end.
pub fn patchedsize(original_len: usize, frags: &[Fragment<'_>]) -> usize {
    let mut out_len: i64 = 0;
    let mut last: i64 = 0;

    for f in frags {
        out_len += f.start as i64 - last;
        out_len += f.len() as i64;
        last = f.end as i64;
    }

    out_len += original_len as i64 - last;
    out_len.max(0) as usize
}

/// Validate that `frags` is monotone and stays within `original_len`,
/// returning the exact patched size. Used only by `apply`, which slices
/// into the original buffer and needs both guarantees to do so safely.
fn calcsize(original_len: usize, frags: &[Fragment<'_>]) -> Result<usize, InvalidPatch> {
    let mut out_len = 0usize;
    let mut last = 0u32;

    for (index, f) in frags.iter().enumerate() {
        if f.start < last {
            return Err(InvalidPatch::NonMonotone { index, start: f.start, last });
        }
        if f.end as usize > original_len {
            return Err(InvalidPatch::OutOfRange { index, end: f.end, original_len });
        }
        out_len += (f.start - last) as usize;
        out_len += f.len();
        last = f.end;
    }

    out_len += original_len - last as usize;
    Ok(out_len)
}

/// Apply `frags` to `original`, returning the patched buffer.
pub fn apply(original: &[u8], frags: &[Fragment<'_>]) -> Result<Vec<u8>, InvalidPatch> {
    let out_len = calcsize(original.len(), frags)?;
    let mut out = Vec::with_capacity(out_len);
    let mut last = 0u32;

    for f in frags {
        out.extend_from_slice(&original[last as usize..f.start as usize]);
        out.extend_from_slice(f.data);
        last = f.end;
    }
    out.extend_from_slice(&original[last as usize..]);

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fragment_list_is_identity() {
        let original = b"unchanged\n";
        assert_eq!(apply(original, &[]).unwrap(), original);
        assert_eq!(patchedsize(original.len(), &[]), original.len());
    }

    #[test]
    fn single_fragment_replaces_a_middle_span() {
        let original = b"a\nb\nc\n";
        let frags = vec![Fragment { start: 2, end: 4, data: b"B\n" }];
        assert_eq!(apply(original, &frags).unwrap(), b"a\nB\nc\n");
        assert_eq!(patchedsize(original.len(), &frags), 6);
    }

    #[test]
    fn fragment_ending_past_original_is_rejected() {
        let original = b"short";
        let frags = vec![Fragment { start: 0, end: 100, data: b"x" }];
        assert_eq!(
            apply(original, &frags),
            Err(InvalidPatch::OutOfRange { index: 0, end: 100, original_len: 5 })
        );
    }

    #[test]
    fn non_monotone_fragments_are_rejected() {
        let original = b"abcdef";
        let frags = vec![
            Fragment { start: 4, end: 6, data: b"x" },
            Fragment { start: 1, end: 2, data: b"y" },
        ];
        assert_eq!(
            apply(original, &frags),
            Err(InvalidPatch::NonMonotone { index: 1, start: 1, last: 6 })
        );
    }

    #[test]
    fn patchedsize_does_not_validate_fragment_ranges() {
        // Unlike `apply`/`calcsize`, `patchedsize` trusts the records as
        // given and never fails on an out-of-range or non-monotone entry —
        // it only sums lengths, matching `mpatch_patchedsize`. `apply` on
        // this same input is rejected (see `non_monotone_fragments_are_rejected`).
        let frags = vec![
            Fragment { start: 4, end: 6, data: b"x" },
            Fragment { start: 1, end: 2, data: b"y" },
        ];
        assert_eq!(patchedsize(6, &frags), 5);
    }

    #[test]
    fn growing_and_shrinking_fragments_compose_to_the_right_size() {
        let original = b"0123456789";
        let frags = vec![
            Fragment { start: 0, end: 2, data: b"AAAA" },
            Fragment { start: 5, end: 10, data: b"" },
        ];
        let out = apply(original, &frags).unwrap();
        assert_eq!(out, b"AAAA234");
    }
}
