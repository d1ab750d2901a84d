//! Performance benchmarks for gentk-query
//!
//! Run with: cargo bench
//!
//! All fixtures are synthetic: a tiled structure of fixed-width segments and
//! a gene set scattered across it.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gentk_query::core::{
    decode_unmapped, parse_range_expression, slice_indices, CoordinateResolver, DatasetInterval,
    Gene, MemoryRepository, Segment, Structure,
};

const INTERVAL: u64 = 400_000;

/// Repository with `segments` segments and `genes` evenly spread genes
fn create_repository(segments: u64, genes: u64) -> MemoryRepository {
    let mut repo = MemoryRepository::new("bench", DatasetInterval::new(INTERVAL).unwrap());
    repo.insert_structure(Structure {
        id: 0,
        segments: (1..=segments)
            .map(|segid| Segment {
                segid,
                startid: (segid - 1) * INTERVAL + 1,
                endid: segid * INTERVAL,
                length: INTERVAL,
                start: [0.0; 3],
                end: [0.0; 3],
            })
            .collect(),
    });

    let span = segments * INTERVAL;
    for i in 0..genes {
        let start = i * span / genes + 1;
        let length = 1_000 + (i * 7_919) % 200_000;
        repo.insert_gene(Gene {
            name: format!("gene{:06}", i),
            start,
            end: start + length,
            length,
            gid: String::new(),
            gene_type: "protein_coding".to_string(),
        });
    }
    repo
}

/// Benchmark range expression parsing
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_range_expression");

    for tokens in [1usize, 10, 100, 1_000].iter() {
        let expr = (0..*tokens)
            .map(|i| if i % 2 == 0 { format!("{}", i) } else { format!("{} - {}", i, i + 5) })
            .collect::<Vec<_>>()
            .join(", ");

        group.throughput(Throughput::Elements(*tokens as u64));
        group.bench_with_input(BenchmarkId::from_parameter(tokens), &expr, |b, expr| {
            b.iter(|| parse_range_expression(black_box(expr)).unwrap())
        });
    }

    group.finish();
}

/// Benchmark segment -> gene resolution
fn bench_genes_for_segments(c: &mut Criterion) {
    let mut group = c.benchmark_group("genes_for_segments");

    for genes in [1_000u64, 20_000, 100_000].iter() {
        let repo = create_repository(500, *genes);
        let resolver = CoordinateResolver::new(&repo);

        group.bench_with_input(BenchmarkId::from_parameter(genes), genes, |b, _| {
            b.iter(|| {
                resolver
                    .genes_for_segments(0, black_box("7,8-10,100-120,400"))
                    .unwrap()
            })
        });
    }

    group.finish();
}

/// Benchmark gene -> segment resolution
fn bench_segments_for_genes(c: &mut Criterion) {
    let repo = create_repository(5_000, 20_000);
    let resolver = CoordinateResolver::new(&repo);
    let names = (0..50)
        .map(|i| format!("gene{:06}", i * 397))
        .collect::<Vec<_>>()
        .join(",");

    c.bench_function("segments_for_genes_50", |b| {
        b.iter(|| resolver.segments_for_genes(0, black_box(&names)).unwrap())
    });
}

/// Benchmark unmapped mask decoding
fn bench_decode_unmapped(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_unmapped");

    for segments in [1_000usize, 10_000, 100_000].iter() {
        let encoded = format!(
            "[{}]",
            (0..*segments / 10)
                .map(|i| format!("[{},{}]", i * 10 + 1, i * 10 + 3))
                .collect::<Vec<_>>()
                .join(",")
        );

        group.throughput(Throughput::Elements(*segments as u64));
        group.bench_with_input(BenchmarkId::from_parameter(segments), &encoded, |b, encoded| {
            b.iter(|| decode_unmapped(*segments, black_box(encoded)).unwrap())
        });
    }

    group.finish();
}

fn bench_slice_indices(c: &mut Criterion) {
    let interval = DatasetInterval::new(INTERVAL).unwrap();
    c.bench_function("slice_indices", |b| {
        b.iter(|| slice_indices(black_box(2_800_000), black_box(3_200_000), interval))
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_genes_for_segments,
    bench_segments_for_genes,
    bench_decode_unmapped,
    bench_slice_indices,
);

criterion_main!(benches);
