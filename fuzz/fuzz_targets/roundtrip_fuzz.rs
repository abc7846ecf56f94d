#![no_main]
use bdelta::engine;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let split = data[0] as usize % data.len();
    let (source, target) = data.split_at(split);

    let Ok(delta) = engine::bdiff(source, target) else {
        return;
    };

    let patched = engine::patches(source, &[&delta]).expect("a delta produced by bdiff must always apply");
    assert_eq!(patched, target, "bdiff/patches roundtrip mismatch");
});
