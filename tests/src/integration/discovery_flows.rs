//! # Discovery Integration Flows
//!
//! Drives `qc-01-discovery` only through its public API:
//!
//! 1. **Ordered pipeline**: many peers from several producers are registered,
//!    pinged and forwarded in arrival order
//! 2. **Config-driven wiring**: a TOML file selects the label, capacities and
//!    forward policy
//! 3. **Two-node handshake**: node A pings bootstrap node B over loopback UDP,
//!    B feeds the ping sender into its own loop and pings A back

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use tokio::sync::mpsc;
    use tokio::time::{sleep, timeout};

    use qc_01_discovery::testing::{make_peer, HostCall, RecordingHost};
    use qc_01_discovery::{
        decode_p2p_message, DiscoveryError, DiscoveryLifecycle, DiscoveryService, ForwardPolicy,
        LoopExit, MessageCategory, NoOpPeerHost, Peer, PeerHost, PeerId, PingMessage,
        TomlConfigProvider, UdpPeerHost,
    };

    const WAIT: Duration = Duration::from_secs(5);

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    async fn recv(rx: &mut mpsc::Receiver<Peer>) -> Peer {
        timeout(WAIT, rx.recv())
            .await
            .expect("timed out waiting for forward")
            .expect("forward channel closed")
    }

    /// Polls a UDP host until a ping arrives.
    async fn recv_ping(host: &UdpPeerHost) -> PingMessage {
        let deadline = Instant::now() + WAIT;
        let mut buf = [0u8; 2048];
        loop {
            if let Some((n, _from)) = host.try_recv(&mut buf).unwrap() {
                let (category, body) = decode_p2p_message(&buf[..n]).unwrap();
                assert_eq!(category, MessageCategory::Ping);
                return PingMessage::decode(body).unwrap();
            }
            assert!(Instant::now() < deadline, "no ping arrived");
            sleep(Duration::from_millis(5)).await;
        }
    }

    /// Waits for the loop to end on its own so `stop` cannot win the race.
    async fn wait_for_exit<H: PeerHost>(service: &DiscoveryService<H>) {
        timeout(WAIT, async {
            while service.is_running() {
                sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .expect("loop did not exit");
    }

    fn udp_host(id: u8) -> Arc<UdpPeerHost> {
        Arc::new(
            UdpPeerHost::bind("127.0.0.1:0".parse().unwrap(), PeerId::new([id; 32]), vec![id])
                .unwrap(),
        )
    }

    // =============================================================================
    // ORDERED PIPELINE
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_many_peers_are_processed_in_arrival_order() {
        let host = Arc::new(RecordingHost::new(make_peer(0)));
        let (peer_tx, peer_rx) = mpsc::channel(4);
        let (staking_tx, mut staking_rx) = mpsc::channel(4);
        let mut service = DiscoveryService::new(Arc::clone(&host), "shard-0", peer_rx, staking_tx);
        service.start().unwrap();

        let consumer = tokio::spawn(async move {
            let mut seen = Vec::new();
            while let Some(peer) = staking_rx.recv().await {
                seen.push(peer.peer_id);
            }
            seen
        });

        let expected: Vec<PeerId> = (1..=200u8).map(|v| make_peer(v).peer_id).collect();
        for val in 1..=200u8 {
            peer_tx.send(make_peer(val)).await.unwrap();
        }
        drop(peer_tx);

        // Inbound close ends the loop, which drops the forward sender.
        let forwarded = timeout(WAIT, consumer).await.unwrap().unwrap();
        assert_eq!(forwarded, expected);
        assert_eq!(host.added_peers(), expected);
        assert_eq!(
            host.sent_messages()
                .into_iter()
                .map(|(target, _)| target)
                .collect::<Vec<_>>(),
            expected
        );
        assert_eq!(service.stop().await, Ok(LoopExit::InboundClosed));

        let stats = service.stats();
        assert_eq!(stats.peers_received, 200);
        assert_eq!(stats.peers_forwarded, 200);
        assert_eq!(stats.ping_failures, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_producers_each_keep_their_order() {
        let host = Arc::new(RecordingHost::new(make_peer(0)));
        let (peer_tx, peer_rx) = mpsc::channel(8);
        let (staking_tx, mut staking_rx) = mpsc::channel(16);
        let mut service = DiscoveryService::new(host, "shard-0", peer_rx, staking_tx);
        service.start().unwrap();

        let producers: Vec<_> = [1u8, 101u8]
            .into_iter()
            .map(|start| {
                let tx = peer_tx.clone();
                tokio::spawn(async move {
                    for val in start..start + 50 {
                        tx.send(make_peer(val)).await.unwrap();
                    }
                })
            })
            .collect();
        drop(peer_tx);

        // Drain while the producers run; 100 peers exceed both buffers.
        let consumer = tokio::spawn(async move {
            let mut forwarded = Vec::new();
            for _ in 0..100 {
                forwarded.push(recv(&mut staking_rx).await.peer_id.as_bytes()[0]);
            }
            forwarded
        });
        for producer in producers {
            timeout(WAIT, producer)
                .await
                .expect("producer stalled")
                .unwrap();
        }
        let forwarded = timeout(WAIT, consumer).await.unwrap().unwrap();
        wait_for_exit(&service).await;
        let low: Vec<u8> = forwarded.iter().copied().filter(|v| *v < 101).collect();
        let high: Vec<u8> = forwarded.iter().copied().filter(|v| *v >= 101).collect();
        assert_eq!(low, (1..51).collect::<Vec<_>>());
        assert_eq!(high, (101..151).collect::<Vec<_>>());

        assert_eq!(service.stop().await, Ok(LoopExit::InboundClosed));
    }

    #[tokio::test]
    async fn test_stop_without_traffic_leaves_host_untouched() {
        let host = Arc::new(RecordingHost::new(make_peer(0)));
        let (_peer_tx, peer_rx) = mpsc::channel(1);
        let (staking_tx, mut staking_rx) = mpsc::channel(1);
        let mut service = DiscoveryService::new(Arc::clone(&host), "shard-0", peer_rx, staking_tx);

        service.start().unwrap();
        assert_eq!(service.stop().await, Ok(LoopExit::Stopped));
        assert_eq!(service.stop().await, Err(DiscoveryError::NotRunning));

        assert!(host.calls().is_empty());
        // Loop task dropped the forward sender on exit.
        assert_eq!(staking_rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_noop_host_still_forwards() {
        let host = Arc::new(NoOpPeerHost::new(make_peer(0)));
        let (peer_tx, peer_rx) = mpsc::channel(2);
        let (staking_tx, mut staking_rx) = mpsc::channel(2);
        let mut service = DiscoveryService::new(host, "shard-0", peer_rx, staking_tx);
        service.start().unwrap();

        peer_tx.send(make_peer(9)).await.unwrap();
        assert_eq!(recv(&mut staking_rx).await, make_peer(9));
        assert_eq!(service.stats().pings_sent, 1);
        assert_eq!(service.stop().await, Ok(LoopExit::Stopped));
    }

    // =============================================================================
    // CONFIG-DRIVEN WIRING
    // =============================================================================

    #[tokio::test]
    async fn test_service_built_from_toml_config() {
        let config = TomlConfigProvider::parse(
            r#"
[discovery]
rendezvous = "shard-42"
inbound_capacity = 2
forward_capacity = 1
forward_timeout_ms = 10

[bootstrap]
peers = ["10.0.0.1:9000", "10.0.0.2:9000"]
"#,
        )
        .unwrap();
        let discovery = config.discovery_config();
        assert_eq!(
            discovery.forward_policy,
            ForwardPolicy::DropAfter(Duration::from_millis(10))
        );

        let host = Arc::new(RecordingHost::new(make_peer(0)));
        let (peer_tx, peer_rx) = mpsc::channel(discovery.inbound_capacity);
        let (staking_tx, mut staking_rx) = mpsc::channel(discovery.forward_capacity);
        let mut service =
            DiscoveryService::from_config(Arc::clone(&host), discovery, peer_rx, staking_tx);
        assert_eq!(service.rendezvous().as_str(), "shard-42");
        service.start().unwrap();

        // Nobody reads staking: the second bootstrap peer is dropped after 10ms.
        for peer in config.bootstrap_peers() {
            peer_tx.send(peer.clone()).await.unwrap();
        }
        drop(peer_tx);
        wait_for_exit(&service).await;
        assert_eq!(service.stop().await, Ok(LoopExit::InboundClosed));

        let stats = service.stats();
        assert_eq!(stats.peers_registered, 2);
        assert_eq!(stats.peers_forwarded, 1);
        assert_eq!(stats.forwards_dropped, 1);
        assert_eq!(recv(&mut staking_rx).await, config.bootstrap_peers()[0]);
        assert_eq!(
            host.calls().first(),
            Some(&HostCall::AddPeer(config.bootstrap_peers()[0].peer_id))
        );
    }

    // =============================================================================
    // TWO-NODE HANDSHAKE OVER UDP
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_two_nodes_discover_each_other_over_udp() {
        let host_a = udp_host(0xA1);
        let host_b = udp_host(0xB2);

        let (a_tx, a_rx) = mpsc::channel(4);
        let (a_staking_tx, mut a_staking_rx) = mpsc::channel(4);
        let mut node_a = DiscoveryService::new(Arc::clone(&host_a), "shard-1", a_rx, a_staking_tx);

        let (b_tx, b_rx) = mpsc::channel(4);
        let (b_staking_tx, mut b_staking_rx) = mpsc::channel(4);
        let mut node_b = DiscoveryService::new(Arc::clone(&host_b), "shard-1", b_rx, b_staking_tx);

        node_a.start().unwrap();
        node_b.start().unwrap();

        // A learns about B out of band (bootstrap).
        let b_peer = host_b.get_self_peer();
        a_tx.send(b_peer.clone()).await.unwrap();
        assert_eq!(recv(&mut a_staking_rx).await, b_peer);
        assert!(host_a.contains(&b_peer.peer_id));

        // B hears A's ping and feeds the sender into its own loop.
        let ping_at_b = recv_ping(&host_b).await;
        assert_eq!(ping_at_b.node, host_a.get_self_peer());
        b_tx.send(ping_at_b.node.clone()).await.unwrap();
        assert_eq!(recv(&mut b_staking_rx).await, host_a.get_self_peer());
        assert!(host_b.contains(&host_a.get_self_peer().peer_id));

        // B's ping reaches A.
        let ping_at_a = recv_ping(&host_a).await;
        assert_eq!(ping_at_a.node, b_peer);
        assert_eq!(ping_at_a.node.public_key, vec![0xB2]);

        assert_eq!(node_a.stop().await, Ok(LoopExit::Stopped));
        assert_eq!(node_b.stop().await, Ok(LoopExit::Stopped));
        assert_eq!(node_a.stats().pings_sent, 1);
        assert_eq!(node_b.stats().pings_sent, 1);
    }

    #[tokio::test]
    async fn test_advertised_address_travels_in_ping() {
        let host_a = udp_host(1);
        let host_b = udp_host(2);
        let public = "203.0.113.9:30303".parse().unwrap();
        host_a.advertise(public);

        let (a_tx, a_rx) = mpsc::channel(1);
        let (a_staking_tx, mut a_staking_rx) = mpsc::channel(1);
        let mut node_a = DiscoveryService::new(Arc::clone(&host_a), "shard-1", a_rx, a_staking_tx);
        node_a.start().unwrap();

        a_tx.send(host_b.get_self_peer()).await.unwrap();
        recv(&mut a_staking_rx).await;

        let ping = recv_ping(&host_b).await;
        assert_eq!(ping.node.addr, public);
        assert_eq!(node_a.stop().await, Ok(LoopExit::Stopped));
    }
}
