#![no_main]
use bdelta::delta;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The decoder must never panic on arbitrary bytes — only return errors.
    if let Ok(frags) = delta::decode(data) {
        // A decoded fragment list with a wildly out-of-range original
        // length must fail cleanly in apply/patchedsize, not panic.
        let _ = delta::patchedsize(data.len(), &frags);
        let _ = delta::apply(data, &frags);
    }
});
