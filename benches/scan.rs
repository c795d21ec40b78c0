use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use sheet_quality::{Cell, Dataset, QualityScanner};

/// Contact-list style grid with a sprinkling of every issue kind
fn contact_grid(rows: usize) -> Dataset {
    let header = ["Name", "Email", "Age", "City", "Score"].map(Cell::from);
    let data = (0..rows).map(|i| {
        let email = match i % 17 {
            0 => Cell::Empty,
            1 => Cell::from("not-an-email"),
            _ => Cell::from(format!("user{}@example.com", i)),
        };
        let age = if i % 23 == 0 { -5.0 } else { (20 + i % 50) as f64 };
        vec![
            Cell::from(format!("Person {}", i % (rows / 2).max(1))),
            email,
            Cell::Number(age),
            Cell::from(["Leeds", "York", "Bath"][i % 3]),
            Cell::Number(i as f64 * 0.5),
        ]
    });
    Dataset::from_rows(header, data)
}

fn bench_scan(c: &mut Criterion) {
    let scanner = QualityScanner::new();
    let mut group = c.benchmark_group("scan");

    for rows in [100, 1_000, 10_000] {
        let dataset = contact_grid(rows);
        group.throughput(Throughput::Elements((rows * 5) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &dataset, |b, dataset| {
            b.iter(|| scanner.scan(Some(black_box(dataset))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scan);
criterion_main!(benches);
