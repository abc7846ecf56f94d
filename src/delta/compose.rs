// Merges two fragment lists into one: given A-delta (X0 -> X1) and B-delta
// (X1 -> X2), produces a delta patching X0 -> X2 directly, without ever
// materialising X1.
//
// `gather` and `discard` sweep left to right through the A-delta, tracking
// a running `offset` = (X1 position) - (X0 position) induced by the
// A-fragments consumed so far. A B-fragment's [start, end) range is always
// expressed in X1 coordinates; subtracting the offset rewrites it back to
// X0 coordinates.

use super::fragment::Fragment;

/// A forward-only cursor over a fragment slice that supports splitting the
/// current head fragment in place — the Rust analogue of the source's
/// `head`/`tail` pointer pair into a mutable array.
struct Cursor<'d, 'a> {
    rest: &'d [Fragment<'a>],
    head: Option<Fragment<'a>>,
}

impl<'d, 'a> Cursor<'d, 'a> {
    fn new(frags: &'d [Fragment<'a>]) -> Self {
        Self { rest: frags, head: None }
    }

    fn peek(&self) -> Option<Fragment<'a>> {
        self.head.or_else(|| self.rest.first().copied())
    }

    /// Consume whatever `peek` currently returns — a pending split head if
    /// one is set, otherwise `rest[0]` — advancing past it.
    fn take(&mut self) -> Option<Fragment<'a>> {
        if let Some(h) = self.head.take() {
            return Some(h);
        }
        let (first, tail) = self.rest.split_first()?;
        self.rest = tail;
        Some(*first)
    }

    fn advance(&mut self) {
        self.take();
    }

    /// Replace the current fragment (head or `rest[0]`) with `remaining`,
    /// the still-unconsumed tail left after splitting it at a cut point.
    /// Must consume the current fragment first, whichever of `head`/`rest`
    /// it was shadowing, or that fragment reappears whole on the next peek.
    fn split_head(&mut self, remaining: Fragment<'a>) {
        self.take();
        self.head = Some(remaining);
    }

    /// Remaining untouched fragments, including a still-pending split head.
    fn drain_into(&mut self, out: &mut Vec<Fragment<'a>>) {
        if let Some(h) = self.head.take() {
            out.push(h);
        }
        out.extend_from_slice(self.rest);
        self.rest = &[];
    }
}

/// Move fragments from `src` whose post-A-image ends at or before `cut`
/// into `dest`, splitting the final straddling fragment if needed. Returns
/// the updated offset.
fn gather<'a>(dest: &mut Vec<Fragment<'a>>, src: &mut Cursor<'_, 'a>, cut: i64, mut offset: i64) -> i64 {
    loop {
        let Some(s) = src.peek() else { break };
        if s.start as i64 + offset >= cut {
            break;
        }

        let postend = offset + s.start as i64 + s.len() as i64;
        if postend <= cut {
            offset += s.start as i64 + s.len() as i64 - s.end as i64;
            dest.push(s);
            src.advance();
        } else {
            let mut c = cut - offset;
            if (s.end as i64) < c {
                c = s.end as i64;
            }
            let mut l = cut - offset - s.start as i64;
            if (s.len() as i64) < l {
                l = s.len() as i64;
            }
            offset += s.start as i64 + l - c;

            dest.push(Fragment {
                start: s.start,
                end: c as u32,
                data: &s.data[..l as usize],
            });
            src.split_head(Fragment {
                start: c as u32,
                end: s.end,
                data: &s.data[l as usize..],
            });
            break;
        }
    }
    offset
}

/// Like `gather`, but discards rather than collecting — used to skip A
/// fragments whose post-image is wholly replaced by a B fragment.
fn discard<'a>(src: &mut Cursor<'_, 'a>, cut: i64, mut offset: i64) -> i64 {
    loop {
        let Some(s) = src.peek() else { break };
        if s.start as i64 + offset >= cut {
            break;
        }

        let postend = offset + s.start as i64 + s.len() as i64;
        if postend <= cut {
            offset += s.start as i64 + s.len() as i64 - s.end as i64;
            src.advance();
        } else {
            let mut c = cut - offset;
            if (s.end as i64) < c {
                c = s.end as i64;
            }
            let mut l = cut - offset - s.start as i64;
            if (s.len() as i64) < l {
                l = s.len() as i64;
            }
            offset += s.start as i64 + l - c;
            src.split_head(Fragment {
                start: c as u32,
                end: s.end,
                data: &s.data[l as usize..],
            });
            break;
        }
    }
    offset
}

/// Compose `a` (X0 -> X1) followed by `b` (X1 -> X2) into a single delta
/// (X0 -> X2). Applying the result to X0 yields exactly X2.
pub fn combine<'a>(a: Vec<Fragment<'a>>, b: Vec<Fragment<'a>>) -> Vec<Fragment<'a>> {
    let mut out = Vec::with_capacity(2 * (a.len() + b.len()).max(1));
    let mut a_cursor = Cursor::new(&a);
    let mut offset: i64 = 0;

    for bh in &b {
        offset = gather(&mut out, &mut a_cursor, bh.start as i64, offset);
        let post = discard(&mut a_cursor, bh.end as i64, offset);

        out.push(Fragment {
            start: (bh.start as i64 - offset) as u32,
            end: (bh.end as i64 - post) as u32,
            data: bh.data,
        });

        offset = post;
    }

    a_cursor.drain_into(&mut out);
    out
}
