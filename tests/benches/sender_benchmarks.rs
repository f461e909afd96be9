//! # Pending-Sender Benchmarks
//!
//! Hot paths of a broadcast and a cancellation:
//!
//! | Path | Work |
//! |------|------|
//! | Legacy transaction signing | RLP + keccak256 + secp256k1 recoverable sign |
//! | Amount parsing | decimal text to base units |
//! | Calldata | ERC-20 `transfer(address,uint256)` encoding |
//! | Replacement fee | fee escalation policy |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ps_02_pending_tracker::replacement_fee;
use ps_04_eth_rpc::{erc20_transfer_calldata, LegacyTransaction};
use shared_types::{parse_units, Address, SigningSecret, TransferRequest, U256};
use std::time::Duration;

const KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

fn bench_signing(c: &mut Criterion) {
    let mut group = c.benchmark_group("ps-04-signing");
    group.measurement_time(Duration::from_secs(5));

    let key = SigningSecret::parse(KEY)
        .and_then(|secret| secret.to_signing_key())
        .expect("fixture key");
    let token = LegacyTransaction::from_request(
        &TransferRequest {
            to: Address::repeat_byte(0xda),
            value: U256::zero(),
            data: erc20_transfer_calldata(Address::repeat_byte(0x42), U256::from(1_000_000u64)),
            nonce: 9,
            gas_price: U256::from(20_000_000_000u64),
            gas_limit: 100_000,
        },
        1,
    );
    let cancel = LegacyTransaction::from_request(
        &TransferRequest::replacement(
            Address::repeat_byte(0x11),
            9,
            U256::from(40_000_000_000u64),
            21_000,
        ),
        1,
    );

    group.bench_function("token_transfer", |b| {
        b.iter(|| black_box(token.sign(&key).is_ok()))
    });
    group.bench_function("replacement", |b| {
        b.iter(|| black_box(cancel.sign(&key).is_ok()))
    });
    group.finish();
}

fn bench_units(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared-types-units");
    for (text, decimals) in [("1", 6u8), ("1234.567891", 6), ("0.000000000000000001", 18)] {
        group.bench_with_input(BenchmarkId::new("parse_units", text), &text, |b, text| {
            b.iter(|| black_box(parse_units(text, decimals).is_ok()))
        });
    }
    group.finish();
}

fn bench_encoding(c: &mut Criterion) {
    c.bench_function("erc20_transfer_calldata", |b| {
        b.iter(|| {
            black_box(erc20_transfer_calldata(
                black_box(Address::repeat_byte(0x42)),
                black_box(U256::from(123_456_789u64)),
            ))
        })
    });
    c.bench_function("replacement_fee", |b| {
        b.iter(|| {
            black_box(replacement_fee(
                black_box(U256::from(30_000_000_000u64)),
                black_box(U256::from(25_000_000_000u64)),
            ))
        })
    });
}

criterion_group!(benches, bench_signing, bench_units, bench_encoding);
criterion_main!(benches);
