// Longest-common-run search (MatchFinder) and the recursive block-list
// generator (BlockRecursor) built on top of it.
//
// The match finder walks B-side chains memoized in `pos`, a buffer shared
// across the *entire* recursion — not reset between calls. A run found
// while searching one window can be absorbed for free when a later window
// revisits the same B-index, which is what keeps the whole divide-and-
// conquer within practical bounds on large, mostly-similar inputs.

use crate::equivalence::Equivalence;
use crate::line::Lines;

/// A matching block: `A[a1..a2] == B[b1..b2]`, byte for byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hunk {
    pub a1: usize,
    pub a2: usize,
    pub b1: usize,
    pub b2: usize,
}

/// Window beyond which the outer search loop is clamped to the last 30000
/// lines, bounding worst-case cost on pathological inputs. Reducing the
/// window can only omit matches, never invent them — correctness holds
/// because the recursion continues regardless of what this call finds.
const MAX_SEARCH_WINDOW: usize = 30000;

#[derive(Clone, Copy)]
struct PosEntry {
    /// `i` such that this B-index was last visited while extending a run
    /// ending at A-position `i`. Defaults to 0, matching a zeroed scratch
    /// buffer: an unwritten entry can only cause a spurious zero-length
    /// absorption, which is harmless (see `longest_match`).
    pos: i64,
    len: usize,
}

struct MatchCtx<'a> {
    a: &'a Lines<'a>,
    b: &'a Lines<'a>,
    eq: &'a Equivalence,
    memo: Vec<PosEntry>,
}

/// Find the longest common run within the window `[a1,a2) x [b1,b2)`.
///
/// Returns `(start_in_a, start_in_b, len)`; `len == 0` means no common line
/// exists in the window.
fn longest_match(ctx: &mut MatchCtx<'_>, a1: usize, a2: usize, b1: usize, b2: usize) -> (usize, usize, usize) {
    let search_a1 = if a2 - a1 > MAX_SEARCH_WINDOW {
        a2 - MAX_SEARCH_WINDOW
    } else {
        a1
    };
    let half = (search_a1 + a2) / 2;

    let mut mi = search_a1;
    let mut mj = b1;
    let mut mk: usize = 0;

    for i in search_a1..a2 {
        let mut j_opt = ctx.eq.a_chain_head[i];
        while let Some(j) = j_opt {
            if (j as usize) < b2 {
                break;
            }
            j_opt = ctx.eq.b_chain_next[j as usize];
        }

        while let Some(j_u32) = j_opt {
            let j = j_u32 as usize;
            if j < b1 {
                break;
            }

            let mut k: usize = 1;
            loop {
                if j < b1 + k || i < search_a1 + k {
                    break;
                }
                let jk = j - k;
                let ik = i - k;
                if ctx.memo[jk].pos == ik as i64 {
                    k += ctx.memo[jk].len;
                    break;
                }
                if ctx.eq.a_eq_class[ik] != ctx.eq.b_eq_class[jk] {
                    break;
                }
                k += 1;
            }

            ctx.memo[j].pos = i as i64;
            ctx.memo[j].len = k;

            if k > mk || (k == mk && (i <= mi || i < half)) {
                mi = i;
                mj = j;
                mk = k;
            }

            j_opt = ctx.eq.b_chain_next[j];
        }
    }

    if mk > 0 {
        mi = mi - mk + 1;
        mj = mj - mk + 1;
    }

    while mi + mk < a2 && mj + mk < b2 && ctx.eq.a_eq_class[mi + mk] == ctx.eq.b_eq_class[mj + mk] {
        mk += 1;
    }

    (mi, mj, mk)
}

/// Recursively bisect around the best match in `[a1,a2) x [b1,b2)`,
/// appending matching hunks to `out` in strictly monotone order. The right
/// half of the recursion is iterative (a loop with updated bounds); only
/// the left half recurses, matching the source algorithm's tail-call shape.
fn recurse(ctx: &mut MatchCtx<'_>, mut a1: usize, a2: usize, mut b1: usize, b2: usize, out: &mut Vec<Hunk>) {
    loop {
        let (i, j, k) = longest_match(ctx, a1, a2, b1, b2);
        if k == 0 {
            return;
        }

        recurse(ctx, a1, i, b1, j, out);

        out.push(Hunk {
            a1: i,
            a2: i + k,
            b1: j,
            b2: j + k,
        });

        a1 = i + k;
        b1 = j + k;
    }
}

/// Shift adjacent hunk boundaries rightward wherever the line at the end of
/// one hunk equals the line at the start of the gap-free next hunk. This
/// canonicalises delta placement toward end-of-file, keeping successive
/// diffs of slowly-growing files stable.
fn normalize(hunks: &mut [Hunk], eq: &Equivalence, an: usize, bn: usize) {
    for idx in 0..hunks.len().saturating_sub(1) {
        let (left, right) = hunks.split_at_mut(idx + 1);
        let curr = &mut left[idx];
        let next = &mut right[0];

        if curr.a2 != next.a1 && curr.b2 != next.b1 {
            continue;
        }

        while curr.a2 < an
            && curr.b2 < bn
            && next.a1 < next.a2
            && next.b1 < next.b2
            && eq.a_eq_class[curr.a2] == eq.b_eq_class[curr.b2]
        {
            curr.a2 += 1;
            next.a1 += 1;
            curr.b2 += 1;
            next.b1 += 1;
        }
    }
}

/// Compute the matching-block list between `a` and `b`, including the
/// terminal sentinel `(|a|, |a|, |b|, |b|)`.
pub fn blocks(a: &Lines<'_>, b: &Lines<'_>) -> Result<Vec<Hunk>, crate::equivalence::AllocError> {
    let eq = crate::equivalence::build(a, b)?;
    let an = a.len();
    let bn = b.len();

    // Shared across the whole recursion; never reset between calls (see
    // module docs). Must be at least length 1 even when bn == 0 so the
    // memo is always addressable, though it is then never indexed.
    let mut memo_buf: Vec<PosEntry> = Vec::new();
    let _ = memo_buf.try_reserve_exact(bn.max(1));
    memo_buf.resize(bn.max(1), PosEntry { pos: 0, len: 0 });

    let mut ctx = MatchCtx {
        a,
        b,
        eq: &eq,
        memo: memo_buf,
    };

    let mut hunks = Vec::new();
    recurse(&mut ctx, 0, an, 0, bn, &mut hunks);
    hunks.push(Hunk {
        a1: an,
        a2: an,
        b1: bn,
        b2: bn,
    });

    normalize(&mut hunks, &eq, an, bn);

    Ok(hunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(a: &[u8], b: &[u8]) -> Vec<Hunk> {
        let la = Lines::split(a);
        let lb = Lines::split(b);
        blocks(&la, &lb).unwrap()
    }

    #[test]
    fn identical_inputs_yield_one_full_match_plus_sentinel() {
        let hunks = run(b"a\nb\nc\n", b"a\nb\nc\n");
        assert_eq!(hunks.len(), 2);
        assert_eq!(hunks[0], Hunk { a1: 0, a2: 3, b1: 0, b2: 3 });
        assert_eq!(hunks[1], Hunk { a1: 3, a2: 3, b1: 3, b2: 3 });
    }

    #[test]
    fn totally_different_inputs_yield_only_the_sentinel() {
        let hunks = run(b"x\n", b"y\n");
        assert_eq!(hunks, vec![Hunk { a1: 1, a2: 1, b1: 1, b2: 1 }]);
    }

    #[test]
    fn empty_inputs_yield_only_the_sentinel() {
        let hunks = run(b"", b"");
        assert_eq!(hunks, vec![Hunk { a1: 0, a2: 0, b1: 0, b2: 0 }]);
    }

    #[test]
    fn hunks_are_strictly_monotone_and_match_byte_for_byte() {
        let a = b"one\ntwo\nthree\nfour\nfive\n";
        let b = b"zero\ntwo\nthree\nfour\nsix\n";
        let la = Lines::split(a);
        let lb = Lines::split(b);
        let hunks = blocks(&la, &lb).unwrap();

        let mut prev_a = 0;
        let mut prev_b = 0;
        for h in &hunks {
            assert!(h.a1 >= prev_a);
            assert!(h.b1 >= prev_b);
            if h.a1 < h.a2 {
                assert_eq!(la.bytes(h.a1), lb.bytes(h.b1));
                for off in 0..(h.a2 - h.a1) {
                    assert_eq!(la.bytes(h.a1 + off), lb.bytes(h.b1 + off));
                }
            }
            prev_a = h.a2;
            prev_b = h.b2;
        }
        let last = *hunks.last().unwrap();
        assert_eq!(last, Hunk { a1: a_line_count(a), a2: a_line_count(a), b1: a_line_count(b), b2: a_line_count(b) });
    }

    fn a_line_count(buf: &[u8]) -> usize {
        Lines::split(buf).len()
    }

    #[test]
    fn window_clamp_path_handles_many_identical_lines() {
        let data = "same\n".repeat(40_000);
        let a = data.as_bytes();
        let mut b_owned = data.clone();
        b_owned.push_str("tail\n");
        let hunks = run(a, b_owned.as_bytes());
        // Must still terminate and produce a monotone, sentinel-terminated list.
        assert!(hunks.last().unwrap().a2 == a_line_count(a));
    }

    #[test]
    fn popular_line_dominated_input_still_diffs() {
        let mut a = "pad\n".repeat(5000);
        a.push_str("unique-a\n");
        let mut b = "pad\n".repeat(5000);
        b.push_str("unique-b\n");
        let hunks = run(a.as_bytes(), b.as_bytes());
        assert!(hunks.len() >= 2);
    }
}
