//! Integration tests for the tracker bridge.
//!
//! These tests exercise the complete flows over real loopback sockets:
//! - Datagram peer → transport → decode → handoff → scene
//! - Lifecycle timing: first-data timeout, stop latency, reconnect
//! - Stream peer (newline-delimited JSON) end to end
//!
//! Run with: `cargo test --test tracker_integration`

use std::time::{Duration, Instant};

use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, UdpSocket};

use trackbridge::scene::{SceneConsumer, TrackedScene};
use trackbridge::tracker::{LifecycleState, Listener, ListenerConfig};

// ============================================================================
// Test Helpers
// ============================================================================

/// Tight timing for lifecycle tests: 20ms quantum, sub-second timeouts.
fn fast_datagram_config(port: u16) -> ListenerConfig {
    ListenerConfig {
        first_data_timeout: Duration::from_millis(300),
        inactivity_timeout: Duration::from_millis(300),
        reconnect_delay: Duration::from_millis(100),
        poll_quantum: Duration::from_millis(20),
        ..ListenerConfig::datagram(port)
    }
}

fn fast_stream_config(port: u16) -> ListenerConfig {
    ListenerConfig {
        first_data_timeout: Duration::from_millis(300),
        inactivity_timeout: Duration::from_millis(300),
        reconnect_delay: Duration::from_millis(100),
        poll_quantum: Duration::from_millis(20),
        ..ListenerConfig::stream(port)
    }
}

/// Send one UDP datagram to the listener's port.
async fn send_datagram(port: u16, payload: &[u8]) {
    let sender = UdpSocket::bind("127.0.0.1:0").await.expect("bind sender");
    sender
        .send_to(payload, ("127.0.0.1", port))
        .await
        .expect("send datagram");
}

/// Poll the listener status until it matches, or panic after `limit`.
async fn wait_for_state(listener: &Listener, expected: LifecycleState, limit: Duration) {
    let started = Instant::now();
    while listener.status() != expected {
        assert!(
            started.elapsed() < limit,
            "state did not reach {expected} within {limit:?} (still {})",
            listener.status()
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// JSON array payload with `count` objects on a circle, like the demo
/// sender peers produce.
fn circle_payload(count: usize) -> Vec<u8> {
    let records: Vec<String> = (0..count)
        .map(|i| {
            let angle = (i as f64) * 36.0_f64.to_radians();
            format!(
                r#"{{"id":"obj_{i}","x":{:.4},"y":{:.4},"z":0.0}}"#,
                angle.cos() * 5.0,
                angle.sin() * 5.0
            )
        })
        .collect();
    format!("[{}]", records.join(",")).into_bytes()
}

// ============================================================================
// Lifecycle Timing
// ============================================================================

/// No peer ever sends: the session must reach `Stopped` within
/// `first_data_timeout` plus one poll quantum (and slack), and stay
/// there with reconnect disabled.
#[tokio::test]
async fn test_first_data_timeout_reaches_stopped() {
    let mut listener = Listener::new();
    let started = Instant::now();
    let _rx = listener
        .start(fast_datagram_config(47101))
        .expect("fresh listener accepts start");

    // start() publishes Connecting synchronously, so the Stopped wait
    // below cannot match the pre-session value.
    assert_eq!(listener.status(), LifecycleState::Connecting);

    wait_for_state(&listener, LifecycleState::Stopped, Duration::from_secs(2)).await;
    // 300ms timeout + 20ms quantum + scheduling slack.
    assert!(started.elapsed() < Duration::from_millis(800));

    // Reconnect is disabled: still Stopped well after a reconnect delay.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(listener.status(), LifecycleState::Stopped);
}

/// A stop request lands within one poll quantum, even while the
/// session is mid-connection.
#[tokio::test]
async fn test_stop_latency_is_bounded() {
    let port = 47102;
    let mut listener = Listener::new();
    let _rx = listener.start(fast_datagram_config(port)).unwrap();

    send_datagram(port, br#"[{"id":"a","x":1,"y":0,"z":0}]"#).await;
    wait_for_state(&listener, LifecycleState::Running, Duration::from_secs(2)).await;

    let stop_at = Instant::now();
    listener.stop().await;
    assert!(stop_at.elapsed() < Duration::from_millis(500));
    assert_eq!(listener.status(), LifecycleState::Stopped);
}

/// With reconnect enabled, a refused stream connection is retried
/// indefinitely until a stop request arrives; the stop is honored
/// immediately even if it lands during the retry delay.
#[tokio::test]
async fn test_reconnect_retries_until_stop() {
    // Get a port nobody listens on.
    let probe = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = probe.local_addr().unwrap().port();
    drop(probe);

    let mut listener = Listener::new();
    let _rx = listener
        .start(fast_stream_config(port).with_reconnect(true))
        .unwrap();

    // Several failure/retry cycles pass; the session never gives up.
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(listener.status(), LifecycleState::Connecting);

    let stop_at = Instant::now();
    listener.stop().await;
    assert!(stop_at.elapsed() < Duration::from_millis(500));
    assert_eq!(listener.status(), LifecycleState::Stopped);

    // No further attempt after stop.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(listener.status(), LifecycleState::Stopped);
}

/// An inactive peer (one frame, then silence) terminates the session
/// via the inactivity timeout; with reconnect enabled the supervisor
/// goes back to `Connecting`.
#[tokio::test]
async fn test_inactivity_triggers_reconnect() {
    let port = 47103;
    let mut listener = Listener::new();
    let _rx = listener
        .start(fast_datagram_config(port).with_reconnect(true))
        .unwrap();

    send_datagram(port, br#"[{"id":"a","x":1,"y":0,"z":0}]"#).await;
    wait_for_state(&listener, LifecycleState::Running, Duration::from_secs(2)).await;

    // Peer goes silent: Running → (inactivity) → Connecting again.
    wait_for_state(&listener, LifecycleState::Connecting, Duration::from_secs(2)).await;

    listener.stop().await;
}

// ============================================================================
// Datagram End to End
// ============================================================================

/// Full datagram flow: start, one datagram with 10 records shortly
/// after, state walks Stopped → Connecting → Running and all 10
/// entities appear with the supplied coordinates in one drain cycle.
#[tokio::test]
async fn test_datagram_end_to_end() {
    let port = 47104;
    let config = ListenerConfig {
        first_data_timeout: Duration::from_secs(3),
        poll_quantum: Duration::from_millis(20),
        ..ListenerConfig::datagram(port)
    };

    let mut listener = Listener::new();
    assert_eq!(listener.status(), LifecycleState::Stopped);
    let mut rx = listener.start(config).unwrap();

    wait_for_state(&listener, LifecycleState::Connecting, Duration::from_secs(1)).await;

    tokio::time::sleep(Duration::from_millis(100)).await;
    let payload = circle_payload(10);
    send_datagram(port, &payload).await;

    wait_for_state(&listener, LifecycleState::Running, Duration::from_secs(2)).await;

    // One consumer tick.
    let batch = rx.recv().await.expect("one batch delivered");
    let mut scene = TrackedScene::new();
    scene.apply_batch(&batch);

    assert_eq!(scene.len(), 10);
    let (x, _, z) = scene.entity("obj_0").expect("obj_0 created");
    assert!((x - 5.0).abs() < 0.001);
    assert_eq!(z, 0.0);
    assert!(scene.entity("obj_9").is_some());

    listener.stop().await;
}

/// Batches survive drain-granularity differences: whether the consumer
/// drains after each batch or once for both, entity "a" ends at the
/// position from the later batch.
#[tokio::test]
async fn test_last_batch_wins_regardless_of_drain_granularity() {
    let port = 47105;
    let mut listener = Listener::new();
    let mut rx = listener.start(fast_datagram_config(port)).unwrap();

    send_datagram(port, br#"[{"id":"a","x":1,"y":0,"z":0}]"#).await;
    let first = rx.recv().await.expect("first batch");
    send_datagram(port, br#"[{"id":"a","x":2,"y":0,"z":0}]"#).await;
    let second = rx.recv().await.expect("second batch");

    // One drain per batch.
    let mut scene_incremental = TrackedScene::new();
    scene_incremental.apply_batch(&first);
    scene_incremental.apply_batch(&second);
    assert_eq!(scene_incremental.entity("a"), Some((2.0, 0.0, 0.0)));

    // One drain for both.
    let mut scene_bulk = TrackedScene::new();
    for batch in [&first, &second] {
        scene_bulk.apply_batch(batch);
    }
    assert_eq!(scene_bulk.entity("a"), Some((2.0, 0.0, 0.0)));

    listener.stop().await;
}

/// A malformed record inside a frame is dropped without disturbing the
/// valid records or the connection.
#[tokio::test]
async fn test_malformed_record_recovered_locally() {
    let port = 47106;
    let mut listener = Listener::new();
    let mut rx = listener.start(fast_datagram_config(port)).unwrap();

    send_datagram(
        port,
        br#"[{"id":"good_1","x":1,"y":1,"z":1},{"x":"bad"},{"id":"good_2","x":2,"y":2,"z":2}]"#,
    )
    .await;

    let batch = rx.recv().await.expect("partial batch delivered");
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0].id, "good_1");
    assert_eq!(batch[1].id, "good_2");
    assert_eq!(listener.status(), LifecycleState::Running);

    listener.stop().await;
}

// ============================================================================
// Stream End to End
// ============================================================================

/// Full stream flow: a line-oriented TCP peer sends single-object
/// frames; ids default to the fixed target when omitted.
#[tokio::test]
async fn test_stream_end_to_end() {
    let server = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = server.local_addr().unwrap().port();

    let peer = tokio::spawn(async move {
        let (mut conn, _) = server.accept().await.expect("bridge connects");
        conn.write_all(b"{\"id\":1,\"x\":1.0,\"y\":0.0,\"z\":0.0}\n")
            .await
            .unwrap();
        conn.write_all(b"{\"x\":0.5,\"y\":-0.5,\"z\":2.0}\n")
            .await
            .unwrap();
        conn.flush().await.unwrap();
        // Hold the connection open while the bridge reads.
        tokio::time::sleep(Duration::from_millis(300)).await;
    });

    let mut listener = Listener::new();
    let mut rx = listener.start(fast_stream_config(port)).unwrap();

    wait_for_state(&listener, LifecycleState::Running, Duration::from_secs(2)).await;

    let first = rx.recv().await.expect("first frame");
    let second = rx.recv().await.expect("second frame");

    let mut scene = TrackedScene::new();
    scene.apply_batch(&first);
    scene.apply_batch(&second);

    assert_eq!(scene.entity("Tracker_1"), Some((1.0, 0.0, 0.0)));
    assert_eq!(scene.entity("TrackerEmpty"), Some((0.5, -0.5, 2.0)));

    listener.stop().await;
    peer.await.unwrap();
}
