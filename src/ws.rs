// Whitespace normalization applied before diffing when callers want changes
// in indentation or line-ending style to disappear from the result.
//
// A run of space/tab/CR bytes is either dropped outright (`all_ws = true`)
// or collapsed to a single space (`all_ws = false`) — except a run sitting
// directly before a newline is always dropped, so trailing whitespace never
// survives either mode.

#[inline]
fn is_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r')
}

/// Normalize whitespace in `s`. `all_ws = true` strips space/tab/CR runs
/// entirely; `all_ws = false` collapses them to a single space, still
/// dropping a run immediately preceding `\n`.
pub fn fixws(s: &[u8], all_ws: bool) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    let mut i = 0usize;

    while i < s.len() {
        let c = s[i];
        if is_ws(c) {
            let mut j = i;
            while j < s.len() && is_ws(s[j]) {
                j += 1;
            }
            let next = s.get(j).copied();
            if !all_ws && next != Some(b'\n') {
                out.push(b' ');
            }
            i = j;
            continue;
        }

        out.push(c);
        i += 1;
    }

    out
}
