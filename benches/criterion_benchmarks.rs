use bdelta::engine::{bdiff, patches};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn gen_lines(lines: usize, avg_len: usize, seed: u64) -> Vec<u8> {
    let mut s = seed;
    let mut out = Vec::with_capacity(lines * (avg_len + 1));
    for _ in 0..lines {
        for _ in 0..avg_len {
            s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
            let byte = b'a' + ((s >> 33) % 26) as u8;
            out.push(byte);
        }
        out.push(b'\n');
    }
    out
}

fn mutate_lines(base: &[u8], every: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(base.len());
    let mut line_no = 0usize;
    for line in base.split_inclusive(|&b| b == b'\n') {
        line_no += 1;
        if line_no % every.max(1) == 0 {
            out.extend_from_slice(b"CHANGED\n");
        } else {
            out.extend_from_slice(line);
        }
    }
    out
}

fn bench_diff_speed(c: &mut Criterion) {
    let mut g = c.benchmark_group("bdiff_speed_mb_s");
    for lines in [1_000usize, 10_000, 100_000] {
        let source = gen_lines(lines, 24, 1);
        let target = mutate_lines(&source, 37);
        g.throughput(Throughput::Bytes(source.len() as u64));
        g.bench_with_input(BenchmarkId::from_parameter(lines), &lines, |b, _| {
            b.iter(|| {
                let delta = bdiff(black_box(&source), black_box(&target)).unwrap();
                black_box(delta);
            });
        });
    }
    g.finish();
}

fn bench_patch_speed(c: &mut Criterion) {
    let mut g = c.benchmark_group("patch_speed_vs_delta_size");
    for lines in [1_000usize, 10_000, 100_000] {
        let source = gen_lines(lines, 24, 2);
        let target = mutate_lines(&source, 53);
        let delta = bdiff(&source, &target).unwrap();
        g.throughput(Throughput::Bytes(delta.len() as u64));
        g.bench_with_input(BenchmarkId::from_parameter(lines), &lines, |b, _| {
            b.iter(|| {
                let out = patches(black_box(&source), black_box(&[delta.as_slice()])).unwrap();
                black_box(out);
            });
        });
    }
    g.finish();
}

fn bench_fold_vs_sequential(c: &mut Criterion) {
    let mut g = c.benchmark_group("fold_vs_sequential_patching");

    let r0 = gen_lines(5_000, 20, 3);
    let mut revisions = vec![r0.clone()];
    for i in 1..16 {
        let prev = revisions.last().unwrap();
        revisions.push(mutate_lines(prev, 41 + i));
    }
    let deltas: Vec<Vec<u8>> = revisions.windows(2).map(|w| bdiff(&w[0], &w[1]).unwrap()).collect();
    let delta_refs: Vec<&[u8]> = deltas.iter().map(|d| d.as_slice()).collect();

    g.bench_function("tree_fold", |b| {
        b.iter(|| {
            let out = patches(black_box(&r0), black_box(&delta_refs)).unwrap();
            black_box(out);
        });
    });

    g.bench_function("sequential_left_fold", |b| {
        b.iter(|| {
            let mut cur = r0.clone();
            for d in &delta_refs {
                cur = patches(&cur, &[d]).unwrap();
            }
            black_box(cur);
        });
    });

    g.finish();
}

/// Unlike `mutate_lines` (deterministic, every-Nth-line edits), this scatters
/// edits at random line positions and random line lengths, closer to the
/// shape of a real commit touching scattered, unrelated spots in a file.
fn mutate_lines_randomly(base: &[u8], edit_fraction: f64, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(base.len());
    for line in base.split_inclusive(|&b| b == b'\n') {
        if rng.random_bool(edit_fraction) {
            let len = rng.random_range(1..40);
            for _ in 0..len {
                out.push(b'a' + rng.random_range(0..26u8));
            }
            out.push(b'\n');
        } else {
            out.extend_from_slice(line);
        }
    }
    out
}

fn bench_randomized_edits(c: &mut Criterion) {
    let mut g = c.benchmark_group("bdiff_speed_randomized_edits");
    for lines in [1_000usize, 10_000, 100_000] {
        let source = gen_lines(lines, 24, 5);
        let target = mutate_lines_randomly(&source, 0.05, 99);
        g.throughput(Throughput::Bytes(source.len() as u64));
        g.bench_with_input(BenchmarkId::from_parameter(lines), &lines, |b, _| {
            b.iter(|| {
                let delta = bdiff(black_box(&source), black_box(&target)).unwrap();
                black_box(delta);
            });
        });
    }
    g.finish();
}

fn bench_popularity_and_window_clamp(c: &mut Criterion) {
    let mut g = c.benchmark_group("matcher_edge_cases");

    let mut popular_a = "pad\n".repeat(20_000);
    let mut popular_b = "pad\n".repeat(20_000);
    popular_a.push_str("left\n");
    popular_b.push_str("right\n");
    g.bench_function("popularity_dominated", |b| {
        b.iter(|| {
            let d = bdiff(black_box(popular_a.as_bytes()), black_box(popular_b.as_bytes())).unwrap();
            black_box(d);
        });
    });

    let mut clamp_a = "same\n".repeat(50_000);
    let mut clamp_b = clamp_a.clone();
    clamp_a.push_str("old\n");
    clamp_b.push_str("new\n");
    g.bench_function("window_clamp", |b| {
        b.iter(|| {
            let d = bdiff(black_box(clamp_a.as_bytes()), black_box(clamp_b.as_bytes())).unwrap();
            black_box(d);
        });
    });

    g.finish();
}

fn bench_real_world_scenarios(c: &mut Criterion) {
    let mut g = c.benchmark_group("real_world_scenarios");
    let scenarios = [
        ("source_file_small_edit", 2_000usize, 40usize),
        ("config_file_versioning", 200usize, 10usize),
        ("log_file_append_heavy", 50_000usize, 500usize),
        ("large_source_tree_merge", 300_000usize, 1000usize),
    ];

    for (name, lines, stride) in scenarios {
        let source = gen_lines(lines, 30, lines as u64);
        let target = mutate_lines(&source, stride);
        g.throughput(Throughput::Bytes(source.len() as u64));
        g.bench_function(name, |b| {
            b.iter(|| {
                let delta = bdiff(&source, &target).unwrap();
                let out = patches(&source, &[&delta]).unwrap();
                black_box(out);
            });
        });
    }
    g.finish();
}

criterion_group!(
    benches,
    bench_diff_speed,
    bench_patch_speed,
    bench_fold_vs_sequential,
    bench_randomized_edits,
    bench_popularity_and_window_clamp,
    bench_real_world_scenarios
);
criterion_main!(benches);
