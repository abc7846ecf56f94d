#![no_main]
use bdelta::engine;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    let a = data[0] as usize % data.len();
    let b = data[1] as usize % data.len();
    let mut cuts = [a, b];
    cuts.sort_unstable();
    let (r0, rest) = data.split_at(cuts[0]);
    let (r1, r2) = rest.split_at(cuts[1] - cuts[0]);

    let Ok(d1) = engine::bdiff(r0, r1) else { return };
    let Ok(d2) = engine::bdiff(r1, r2) else { return };

    let folded = engine::patches(r0, &[&d1, &d2]).expect("folded composition must apply cleanly");
    assert_eq!(folded, r2, "composed delta diverged from sequential application");
});
