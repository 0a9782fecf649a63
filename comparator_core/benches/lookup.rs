use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

use comparator_core::{CalibrationSet, CalibrationTable, WorkpieceKind};

// Generate a deterministic sweep of probe positions across (and beyond) the
// stage travel band.
fn probe_positions(n: usize, seed: u32) -> Vec<f32> {
    // tiny PRNG
    let mut state = seed.max(1);
    let mut next_f32 = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        (x as f32) / (u32::MAX as f32 + 1.0)
    };
    (0..n).map(|_| next_f32() * 240.0 - 120.0).collect()
}

// A dense synthetic response curve to measure how the scan scales with the
// number of control points.
fn dense_table(points: usize) -> CalibrationTable {
    let pts: Vec<(f32, f32)> = (0..points)
        .map(|i| {
            let pos = -55.0 + 110.0 * (i as f32) / (points.max(2) as f32 - 1.0);
            (pos, (pos / 100.0).sin() * 0.5)
        })
        .collect();
    CalibrationTable::from_points_mm(&pts).expect("dense table")
}

pub fn bench_nearest_lookup(c: &mut Criterion) {
    let mut g = c.benchmark_group("nearest_lookup");
    // Allow quick tweaking without CLI flags (Criterion 0.5):
    //   BENCH_SAMPLE_SIZE=10 BENCH_MEAS_MS=50 cargo bench -p comparator_core --bench lookup
    if let Ok(ss) = std::env::var("BENCH_SAMPLE_SIZE") {
        if let Ok(n) = ss.parse::<usize>() {
            g.sample_size(n.max(1));
        }
    } else {
        g.sample_size(50);
    }
    if let Ok(ms) = std::env::var("BENCH_MEAS_MS")
        && let Ok(ms_u64) = ms.parse::<u64>()
    {
        g.measurement_time(std::time::Duration::from_millis(ms_u64));
    }

    let probes = probe_positions(10_000, 0xC0FFEE);

    let set = CalibrationSet::default();
    g.bench_function("stock_wp3", |b| {
        b.iter_batched(
            || probes.clone(),
            |ps| {
                let mut acc = 0i64;
                for p in ps {
                    acc += set.deviation_um_at(WorkpieceKind::Wp3, black_box(p)) as i64;
                }
                black_box(acc);
            },
            BatchSize::SmallInput,
        )
    });

    for &n in &[16usize, 128, 1024] {
        let table = dense_table(n);
        g.bench_function(format!("dense_{n}_points"), |b| {
            b.iter_batched(
                || probes.clone(),
                |ps| {
                    let mut acc = 0i64;
                    for p in ps {
                        acc += table.deviation_um_at(black_box(p)) as i64;
                    }
                    black_box(acc);
                },
                BatchSize::SmallInput,
            )
        });
    }
    g.finish();
}

criterion_group!(lookup, bench_nearest_lookup);
criterion_main!(lookup);
