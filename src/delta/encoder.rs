// Converts a hunk list (matching blockss) into the binary delta byte
// stream: one 12-byte big-endian header plus replacement bytes per gap
// between consecutive matches.

use crate::line::Lines;
use crate::matcher::Hunk;

/// Header record: `[orig_start: u32 BE][orig_end: u32 BE][replacement_length: u32 BE]`.
const HEADER_LEN: usize = 12;

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("input exceeds the maximum encodable size of {} bytes", u32::MAX)]
    InputTooLarge,
}

/// Encode the delta transforming `a` into `b`, given the matching-block
/// list `hunks` (as produced by [`crate::matcher::blocks`], sentinel
/// included).
pub fn encode(a: &Lines<'_>, b: &Lines<'_>, hunks: &[Hunk]) -> Result<Vec<u8>, EncodeError> {
    if a.buf().len() > u32::MAX as usize || b.buf().len() > u32::MAX as usize {
        return Err(EncodeError::InputTooLarge);
    }

    // Pre-compute output length so we allocate exactly once.
    let mut out_len = 0usize;
    let mut la = 0usize;
    let mut lb = 0usize;
    for h in hunks {
        if h.a1 != la || h.b1 != lb {
            out_len += HEADER_LEN + (b.offset(h.b1) - b.offset(lb));
        }
        la = h.a2;
        lb = h.b2;
    }

    let mut out = Vec::with_capacity(out_len);
    la = 0;
    lb = 0;
    for h in hunks {
        if h.a1 != la || h.b1 != lb {
            let orig_start = a.offset(la) as u32;
            let orig_end = a.offset(h.a1) as u32;
            let replacement = &b.buf()[b.offset(lb)..b.offset(h.b1)];

            out.extend_from_slice(&orig_start.to_be_bytes());
            out.extend_from_slice(&orig_end.to_be_bytes());
            out.extend_from_slice(&(replacement.len() as u32).to_be_bytes());
            out.extend_from_slice(replacement);
        }
        la = h.a2;
        lb = h.b2;
    }

    Ok(out)
}
