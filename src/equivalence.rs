// Equivalence-class hashing: groups identical lines across the A and B
// sides so the match finder can compare two lines in O(1) instead of
// memcmp-ing their bytes.
//
// The table is open-addressed (linear probing), sized as the smallest
// power of two strictly greater than the number of B-side lines, scaled up
// 4x when allocation permits (falling back to 2x, then 1x). It is built
// once from the B side, queried once for the A side, then discarded —
// everything downstream refers to lines by `eq_class` slot index.

use crate::line::Lines;

/// One bucket in the open-addressed table.
#[derive(Debug, Clone, Copy)]
struct Entry {
    /// Index (into B's lines) of the most recently inserted line in this
    /// slot's chain, or `None` if the slot has never been used.
    first_pos: Option<u32>,
    /// Number of B-lines that landed in this slot (popularity).
    count: u32,
}

/// Allocation failure while sizing the equivalence table.
///
/// Mirrors the original's `malloc` fallback: scale 4, then 2, then 1; if
/// even a 1x table cannot be allocated the whole diff fails.
#[derive(Debug, thiserror::Error)]
#[error("failed to allocate equivalence table for {b_lines} lines")]
pub struct AllocError {
    b_lines: usize,
}

/// The result of indexing both sides against the equivalence table.
///
/// All four vectors are dense and addressed by line index (never by
/// sentinel index — the sentinel line is never hashed).
pub struct Equivalence {
    /// `a_eq_class[i]` is the table slot line `A[i]` landed in.
    pub a_eq_class: Vec<u32>,
    /// `a_chain_head[i]` is the most recent B-index byte-equal to `A[i]`,
    /// or `None` if that line's equivalence class is too popular to chase
    /// (or empty, which cannot happen since the slot was just created for
    /// it during the A-side probe).
    pub a_chain_head: Vec<Option<u32>>,
    /// `b_eq_class[j]` is the table slot line `B[j]` landed in.
    pub b_eq_class: Vec<u32>,
    /// `b_chain_next[j]` is the previous (lower-index) B-line byte-equal to
    /// `B[j]`, or `None` if `B[j]` is the oldest line in its class.
    pub b_chain_next: Vec<Option<u32>>,
}

/// Popularity threshold above which a line is never chased by the match
/// finder. Asymmetric by design: permissive for small inputs, strict for
/// large ones, so that a pathological file of mostly-blank lines doesn't
/// blow up search time.
fn popularity_threshold(bn: usize) -> u32 {
    if bn >= 31000 {
        (bn / 1000) as u32
    } else {
        (1_000_000 / (bn + 1)) as u32
    }
}

fn try_alloc_table(buckets: usize) -> Result<(Vec<Entry>, usize), ()> {
    for scale in [4usize, 2, 1] {
        let size = buckets * scale;
        let mut table: Vec<Entry> = Vec::new();
        if table.try_reserve_exact(size).is_ok() {
            table.resize(
                size,
                Entry {
                    first_pos: None,
                    count: 0,
                },
            );
            return Ok((table, size - 1));
        }
    }
    Err(())
}

/// Build the equivalence index from `a` and `b`'s line arrays.
pub fn build(a: &Lines<'_>, b: &Lines<'_>) -> Result<Equivalence, AllocError> {
    let an = a.len();
    let bn = b.len();

    let mut buckets = 1usize;
    while buckets < bn + 1 {
        buckets *= 2;
    }

    let (mut table, mask) = try_alloc_table(buckets).map_err(|_| AllocError { b_lines: bn })?;

    let mut b_eq_class = vec![0u32; bn];
    let mut b_chain_next: Vec<Option<u32>> = vec![None; bn];

    for i in 0..bn {
        let mut slot = (b.span(i).hash as usize) & mask;
        while let Some(head) = table[slot].first_pos {
            if Lines::bytes_equal(b, i, b, head as usize) {
                break;
            }
            slot = (slot + 1) & mask;
        }
        b_chain_next[i] = table[slot].first_pos;
        b_eq_class[i] = slot as u32;
        table[slot].first_pos = Some(i as u32);
        table[slot].count += 1;
    }

    let threshold = popularity_threshold(bn);

    let mut a_eq_class = vec![0u32; an];
    let mut a_chain_head: Vec<Option<u32>> = vec![None; an];

    for i in 0..an {
        let mut slot = (a.span(i).hash as usize) & mask;
        while let Some(head) = table[slot].first_pos {
            if Lines::bytes_equal(a, i, b, head as usize) {
                break;
            }
            slot = (slot + 1) & mask;
        }
        a_eq_class[i] = slot as u32;
        a_chain_head[i] = if table[slot].count <= threshold {
            table[slot].first_pos
        } else {
            None
        };
    }

    Ok(Equivalence {
        a_eq_class,
        a_chain_head,
        b_eq_class,
        b_chain_next,
    })
}
