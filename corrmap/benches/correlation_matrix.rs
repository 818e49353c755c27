use corrmap::{Sample, SeriesBySymbol, build_correlation_matrix};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use smol_str::SmolStr;

/// `symbols` series of `points` samples on a shared 10s grid
fn series_by_symbol(symbols: usize, points: i64) -> SeriesBySymbol {
    (0..symbols)
        .map(|k| {
            let symbol = SmolStr::new(format!("SYM{k}"));
            let series = (0..points)
                .map(|i| {
                    let price = 100.0 + ((i as f64 / 10.0) + k as f64).sin() * (k + 1) as f64;
                    Sample::new(symbol.clone(), price, i * 10_000)
                })
                .collect();
            (symbol, series)
        })
        .collect()
}

fn bench_correlation_matrix(c: &mut Criterion) {
    // 8 symbols: 5 minute and 4 hour windows at 10s sampling
    let short = series_by_symbol(8, 30);
    let long = series_by_symbol(8, 1_440);

    c.bench_function("correlation_matrix_8x30", |b| {
        b.iter(|| build_correlation_matrix(black_box(&short)))
    });
    c.bench_function("correlation_matrix_8x1440", |b| {
        b.iter(|| build_correlation_matrix(black_box(&long)))
    });
}

criterion_group!(benches, bench_correlation_matrix);
criterion_main!(benches);
