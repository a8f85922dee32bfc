//! # QC-01 Discovery Benchmarks
//!
//! - Ping frame build and decode
//! - Peer string parsing (bootstrap entries)
//! - End-to-end loop throughput against a no-op host

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use qc_01_discovery::testing::make_peer;
use qc_01_discovery::{
    construct_p2p_message, decode_p2p_message, DiscoveryLifecycle, DiscoveryService,
    MessageCategory, NoOpPeerHost, Peer, PingMessage,
};

pub fn ping_framing(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-01/ping_framing");
    group.measurement_time(Duration::from_secs(5));

    let me = make_peer(7).with_public_key(vec![0xAB; 33]);

    group.bench_function("encode_and_frame", |b| {
        b.iter(|| {
            let body = PingMessage::new(black_box(me.clone())).encode().unwrap();
            black_box(construct_p2p_message(MessageCategory::Ping, &body))
        })
    });

    let frame = construct_p2p_message(
        MessageCategory::Ping,
        &PingMessage::new(me.clone()).encode().unwrap(),
    );
    group.bench_function("decode_frame", |b| {
        b.iter(|| {
            let (_, body) = decode_p2p_message(black_box(&frame)).unwrap();
            black_box(PingMessage::decode(body).unwrap())
        })
    });

    group.finish();
}

pub fn peer_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-01/peer_parsing");

    let with_id = format!("{}@10.0.0.1:9000", make_peer(1).peer_id);
    group.bench_function("hex_id_and_addr", |b| {
        b.iter(|| black_box(with_id.parse::<Peer>().unwrap()))
    });
    group.bench_function("addr_only_derived_id", |b| {
        b.iter(|| black_box("10.0.0.1:9000".parse::<Peer>().unwrap()))
    });

    group.finish();
}

pub fn loop_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-01/loop_throughput");
    group.measurement_time(Duration::from_secs(10));
    let rt = Runtime::new().unwrap();

    for count in [100usize, 1_000] {
        let peers: Vec<Peer> = (0..count).map(|i| make_peer((i % 250) as u8 + 1)).collect();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("peers", count), &peers, |b, peers| {
            b.iter(|| {
                rt.block_on(async {
                    let host = Arc::new(NoOpPeerHost::new(make_peer(0)));
                    let (peer_tx, peer_rx) = mpsc::channel(128);
                    let (staking_tx, mut staking_rx) = mpsc::channel(128);
                    let mut service = DiscoveryService::new(host, "bench", peer_rx, staking_tx);
                    service.start().unwrap();

                    let producer = tokio::spawn({
                        let peers = peers.clone();
                        async move {
                            for peer in peers {
                                peer_tx.send(peer).await.unwrap();
                            }
                        }
                    });

                    let mut forwarded = 0usize;
                    while forwarded < peers.len() {
                        staking_rx.recv().await.unwrap();
                        forwarded += 1;
                    }
                    producer.await.unwrap();
                    service.stop().await.unwrap();
                    black_box(forwarded)
                })
            })
        });
    }

    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    ping_framing(c);
    peer_parsing(c);
    loop_throughput(c);
}
