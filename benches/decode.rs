use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use fcbin::codec::Varuint32;
use fcbin::from_slice;

#[derive(Debug, Default, fcbin::Decode)]
struct Action {
    account: u64,
    name: u64,
    authorization: Vec<PermissionLevel>,
    data: Vec<u8>,
}

#[derive(Debug, Default, fcbin::Decode)]
struct PermissionLevel {
    actor: u64,
    permission: u64,
}

#[derive(Debug, Default, fcbin::Decode)]
struct Transaction {
    expiration: u32,
    ref_block_num: u16,
    ref_block_prefix: u32,
    max_net_usage_words: Varuint32,
    max_cpu_usage_ms: u8,
    delay_sec: Varuint32,
    context_free_actions: Vec<Action>,
    actions: Vec<Action>,
    #[bin(binary_extension)]
    extensions: Vec<u8>,
}

fn encode_action(buf: &mut Vec<u8>, payload: usize) {
    buf.extend_from_slice(&0x5530_ea03_3482_a600u64.to_le_bytes());
    buf.extend_from_slice(&0xcdcd_3c2d_57d5_d000u64.to_le_bytes());
    buf.push(1);
    buf.extend_from_slice(&0x1111_2222_3333_4444u64.to_le_bytes());
    buf.extend_from_slice(&0x0000_0000_a726_ab80u64.to_le_bytes());
    // Payload lengths stay below 128, a single varint byte.
    buf.push(u8::try_from(payload).unwrap());
    buf.extend(std::iter::repeat(0xab).take(payload));
}

fn encode_transaction(actions: u8) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&1_700_000_000u32.to_le_bytes());
    buf.extend_from_slice(&0x1234u16.to_le_bytes());
    buf.extend_from_slice(&0xdead_beefu32.to_le_bytes());
    buf.push(0);
    buf.push(0);
    buf.push(0);
    buf.push(0);
    buf.push(actions);
    for _ in 0..actions {
        encode_action(&mut buf, 64);
    }
    buf
}

fn decode_transaction(c: &mut Criterion) {
    let mut group = c.benchmark_group("transaction");
    for actions in [1u8, 8, 64] {
        let data = encode_transaction(actions);
        group.throughput(Throughput::Bytes(u64::try_from(data.len()).unwrap()));
        group.bench_function(format!("actions_{actions}"), |b| {
            b.iter(|| {
                let tx: Transaction = from_slice(std::hint::black_box(&data)).unwrap();
                std::hint::black_box(tx)
            })
        });
    }
}

criterion_group!(benches, decode_transaction);
criterion_main!(benches);
