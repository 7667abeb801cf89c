// Per-byte throughput comparison of the engine variants
//
// Streams a synthetic corpus through each compiled engine one byte at a
// time, which is the framework's actual operating mode. Dictionary sizes
// are swept so the dense-table, sparse, and skip trade-offs show up.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use multimatch::{EngineKind, MatchEngine, PatternId};
use std::hint::black_box;

fn make_dictionary(size: usize) -> Vec<Vec<u8>> {
    // Deterministic pseudo-words over a small alphabet
    (0..size)
        .map(|i| {
            let len = 3 + (i * 7) % 10;
            (0..len)
                .map(|j| b'a' + ((i * 31 + j * 17) % 6) as u8)
                .collect()
        })
        .collect()
}

fn make_stream(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| {
            if i % 13 == 0 {
                b' '
            } else {
                b'a' + ((i * 11) % 6) as u8
            }
        })
        .collect()
}

fn compiled_engine(kind: EngineKind, dictionary: &[Vec<u8>]) -> Box<dyn MatchEngine> {
    let mut engine = kind.instantiate(None);
    for (i, pattern) in dictionary.iter().enumerate() {
        engine.add_pattern(pattern, PatternId(i as u64)).unwrap();
    }
    engine.compile().unwrap();
    engine
}

fn bench_streaming(c: &mut Criterion) {
    let stream = make_stream(64 * 1024);

    let mut group = c.benchmark_group("streaming");
    group.throughput(Throughput::Bytes(stream.len() as u64));

    for dict_size in [16, 256] {
        let dictionary = make_dictionary(dict_size);
        for kind in EngineKind::ALL {
            let mut engine = compiled_engine(kind, &dictionary);
            group.bench_with_input(
                BenchmarkId::new(kind.name(), dict_size),
                &stream,
                |b, stream| {
                    b.iter(|| {
                        engine.reset().unwrap();
                        let mut hits = 0u64;
                        for &byte in stream.iter() {
                            if engine.read_char(byte).unwrap().is_some() {
                                hits += 1;
                            }
                        }
                        black_box(hits)
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_compile(c: &mut Criterion) {
    let dictionary = make_dictionary(512);

    let mut group = c.benchmark_group("compile");
    for kind in EngineKind::ALL {
        group.bench_function(kind.name(), |b| {
            b.iter(|| black_box(compiled_engine(kind, &dictionary)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_streaming, bench_compile);
criterion_main!(benches);
