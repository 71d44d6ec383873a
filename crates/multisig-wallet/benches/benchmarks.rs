//! Multisig wallet benchmarks
//!
//! - Governance payload encode/decode
//! - Confirmation throughput by owner count
//! - Full submit / confirm / execute round
//! - Audit replay

use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use multisig_common::{Address, GovernanceOp};
use multisig_wallet::{AcceptAllDispatcher, AuditSettings, MultiSigWallet, WalletConfig, WalletState};
use tokio::runtime::Runtime;

fn owners(n: u64) -> Vec<Address> {
    (1..=n).map(Address::from_low_u64).collect()
}

fn wallet(n: u64, required: u32) -> MultiSigWallet {
    let config = WalletConfig {
        wallet_address: Address::from_low_u64(0xFFFF),
        owners: owners(n),
        required,
        initial_balance: u128::MAX / 2,
        audit: AuditSettings {
            echo_to_tracing: false,
        },
    };
    MultiSigWallet::new(&config, Arc::new(AcceptAllDispatcher)).unwrap()
}

// ============ GOVERNANCE CODEC ============

fn bench_governance_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("governance_codec");

    let ops = [
        GovernanceOp::AddOwner {
            owner: Address::from_low_u64(42),
        },
        GovernanceOp::RemoveOwner {
            owner: Address::from_low_u64(42),
        },
        GovernanceOp::ChangeRequirement { required: 3 },
    ];

    group.bench_function("encode", |b| {
        b.iter(|| {
            for op in &ops {
                black_box(op.encode());
            }
        });
    });

    let payloads: Vec<Vec<u8>> = ops.iter().map(GovernanceOp::encode).collect();
    group.bench_function("decode", |b| {
        b.iter(|| {
            for payload in &payloads {
                black_box(GovernanceOp::decode(black_box(payload)).unwrap());
            }
        });
    });

    group.finish();
}

// ============ CONFIRMATION BENCHMARKS ============

fn bench_confirmations(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("confirm");
    group.measurement_time(Duration::from_secs(5));

    for n in [3u64, 10, 50].iter() {
        group.throughput(Throughput::Elements(*n));
        group.bench_with_input(BenchmarkId::new("all_owners", n), n, |b, &n| {
            let wallet = wallet(n, 1);
            let owners = owners(n);
            b.iter(|| {
                rt.block_on(async {
                    let id = wallet
                        .submit_transaction(owners[0], Address::from_low_u64(0x99), 0, vec![])
                        .await
                        .unwrap();
                    for owner in &owners {
                        wallet.confirm_transaction(*owner, id).await.unwrap();
                    }
                })
            });
        });
    }

    group.finish();
}

// ============ EXECUTION BENCHMARKS ============

fn bench_execution(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("execute");

    for (required, total) in [(2u32, 3u64), (3, 5), (7, 10)].iter() {
        group.bench_with_input(
            BenchmarkId::new("transfer", format!("{}_of_{}", required, total)),
            &(*required, *total),
            |b, &(required, total)| {
                let wallet = wallet(total, required);
                let owners = owners(total);
                b.iter(|| {
                    rt.block_on(async {
                        let id = wallet
                            .submit_transaction(owners[0], Address::from_low_u64(0x99), 1, vec![])
                            .await
                            .unwrap();
                        for owner in owners.iter().take(required as usize) {
                            wallet.confirm_transaction(*owner, id).await.unwrap();
                        }
                        wallet.execute_transaction(owners[0], id).await.unwrap();
                    })
                });
            },
        );
    }

    group.finish();
}

// ============ REPLAY BENCHMARKS ============

fn bench_replay(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("replay");

    for txs in [10usize, 100, 1000].iter() {
        let wallet = wallet(3, 2);
        let owners = owners(3);
        rt.block_on(async {
            for _ in 0..*txs {
                let id = wallet
                    .submit_transaction(owners[0], Address::from_low_u64(0x99), 1, vec![])
                    .await
                    .unwrap();
                wallet.confirm_transaction(owners[0], id).await.unwrap();
                wallet.confirm_transaction(owners[1], id).await.unwrap();
                wallet.execute_transaction(owners[2], id).await.unwrap();
            }
        });
        let records = wallet.audit().records();

        group.throughput(Throughput::Elements(records.len() as u64));
        group.bench_with_input(BenchmarkId::new("records", txs), &records, |b, records| {
            b.iter(|| black_box(WalletState::replay(black_box(records)).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(codec, bench_governance_codec);

criterion_group!(engine, bench_confirmations, bench_execution);

criterion_group!(audit, bench_replay);

criterion_main!(codec, engine, audit);
