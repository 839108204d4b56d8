use bytering::{ByteRing, RingFlags};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

const BULK: usize = 4096;

fn bench_bulk(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk");
    group.throughput(Throughput::Bytes(BULK as u64));

    group.bench_function("write_read_4k", |b| {
        let ring = ByteRing::new(1 << 16);
        let data = vec![0xA5u8; BULK];
        let mut out = vec![0u8; BULK];
        b.iter(|| {
            ring.write(black_box(&data), false);
            ring.read(black_box(&mut out), false);
        });
    });

    // Large enough to split into multiple lock holds.
    const CHUNKED_BULK: usize = 32 * 1024;
    group.throughput(Throughput::Bytes(CHUNKED_BULK as u64));
    group.bench_function("write_read_32k_chunked", |b| {
        let ring = ByteRing::new(1 << 16);
        ring.set_flags(RingFlags::USE_MAX_CHUNK_RW);
        let data = vec![0xA5u8; CHUNKED_BULK];
        let mut out = vec![0u8; CHUNKED_BULK];
        b.iter(|| {
            ring.write(black_box(&data), false);
            ring.read(black_box(&mut out), false);
        });
    });

    group.throughput(Throughput::Bytes(BULK as u64));

    group.bench_function("write_read_4k_modulo_len", |b| {
        // Non-power-of-two length exercises the modulo fallback.
        let ring = ByteRing::new((1 << 16) - 24);
        let data = vec![0xA5u8; BULK];
        let mut out = vec![0u8; BULK];
        b.iter(|| {
            ring.write(black_box(&data), false);
            ring.read(black_box(&mut out), false);
        });
    });

    group.finish();
}

fn bench_byte(c: &mut Criterion) {
    let mut group = c.benchmark_group("byte");
    group.throughput(Throughput::Elements(1));

    group.bench_function("write_read_byte", |b| {
        let ring = ByteRing::new(256);
        b.iter(|| {
            ring.write_byte(black_box(b'x'), false);
            black_box(ring.read_byte(false));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_bulk, bench_byte);
criterion_main!(benches);
