use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fcbin::leb128::LebCodec;
use fcbin::Decoder;

fn encoded_values() -> Vec<([u8; 16], usize)> {
    vec![
        1,
        0x0000_0000_0000_0080,
        0x0000_0000_0000_8000,
        0x0000_0000_0080_0000,
        0x0000_0000_8000_0000,
        0x0000_0080_0000_0000,
        0x8000_0000_0000_0000,
    ]
    .into_iter()
    .map(|value: u64| {
        let mut buffer: [u8; 16] = [0u8; 16];
        let len = value.encode_leb128(&mut buffer.as_mut_slice());
        (buffer, len)
    })
    .collect()
}

fn leb128_decoding_single(c: &mut Criterion) {
    let values = encoded_values();

    let mut group = c.benchmark_group("decoding_single");
    for (data, len) in &values {
        group.bench_with_input(BenchmarkId::new("fcbin", len), &data, |b, data| {
            b.iter(|| {
                let value = u64::decode_leb128(&data[..]);
                std::hint::black_box(value)
            })
        });
        group.bench_with_input(BenchmarkId::new("leb128 crate", len), &data, |b, data| {
            b.iter(|| {
                let mut reader = &data[..];
                let value = leb128::read::unsigned(&mut reader);
                std::hint::black_box(value)
            })
        });
    }
}

fn leb128_decoding_signed(c: &mut Criterion) {
    let values: Vec<_> = [0i64, -1, 63, -65, -123_456, i64::MIN]
        .into_iter()
        .map(|value| {
            let mut buffer = Vec::new();
            value.encode_leb128(&mut buffer);
            buffer
        })
        .collect();

    let mut group = c.benchmark_group("decoding_signed");
    for data in &values {
        group.bench_with_input(BenchmarkId::new("fcbin", data.len()), data, |b, data| {
            b.iter(|| {
                let value = i64::decode_leb128(data);
                std::hint::black_box(value)
            })
        });
    }
}

fn leb128_decoding_many(c: &mut Criterion) {
    let values = encoded_values();
    let mut stream = Vec::new();
    for (data, len) in &values {
        stream.extend_from_slice(&data[..*len]);
    }

    let mut group = c.benchmark_group("decoding_many");
    group.bench_with_input(
        BenchmarkId::new("fcbin", values.len()),
        &stream,
        |b, stream| {
            b.iter(|| {
                let mut decoder = Decoder::new(stream);
                while decoder.has_remaining() {
                    let value = decoder.read_uvarint64();
                    std::hint::black_box(value);
                }
            });
        },
    );
}

criterion_group!(
    decoding,
    leb128_decoding_single,
    leb128_decoding_signed,
    leb128_decoding_many
);

criterion_main!(decoding);
