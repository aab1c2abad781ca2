//! WebSocket protocol integration tests.
//!
//! Drives the coordinator through real WebSocket connections: selection
//! conflicts, room isolation, join snapshots, expiry and disconnect cleanup.

mod fixtures;

use std::time::Duration;

use fixtures::{TestServer, WsClient};
use serde_json::json;

const QUIET: Duration = Duration::from_millis(300);

#[tokio::test]
async fn test_select_conflict_deselect_reselect() {
    // テスト項目: A が選択 → B に seat_locked → B の選択は ALREADY_HELD →
    //             A が解除 → B に seat_unlocked → B の再選択は成功
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut a, _) = WsClient::connect_in(&server, "E1").await;
    let (mut b, _) = WsClient::connect_in(&server, "E1").await;

    // when (操作): A selects A-1
    let before = seatlock_shared::time::now_millis();
    a.select("E1", "A-1").await;

    // then (期待する結果):
    let confirmed = a.recv().await;
    assert_eq!(confirmed["type"], "seat_lock_confirmed");
    assert_eq!(confirmed["seat_id"], "A-1");
    let expires_at = confirmed["expires_at"].as_i64().unwrap();
    assert!(expires_at >= before + 1_800_000);
    assert!(expires_at <= seatlock_shared::time::now_millis() + 1_800_000);
    assert_eq!(
        b.recv().await,
        json!({"type": "seat_locked", "event_id": "E1", "seat_id": "A-1"})
    );

    // when (操作): B selects A-1
    b.select("E1", "A-1").await;

    // then (期待する結果):
    assert_eq!(
        b.recv().await,
        json!({"type": "seat_lock_failed", "event_id": "E1", "seat_id": "A-1", "reason": "ALREADY_HELD"})
    );
    assert!(a.recv_within(QUIET).await.is_none());

    // when (操作): A deselects A-1
    a.deselect("E1", "A-1").await;

    // then (期待する結果):
    assert_eq!(
        a.recv().await,
        json!({"type": "seat_deselect_confirmed", "event_id": "E1", "seat_id": "A-1"})
    );
    assert_eq!(
        b.recv().await,
        json!({"type": "seat_unlocked", "event_id": "E1", "seat_id": "A-1"})
    );

    // when (操作): B selects A-1 again
    b.select("E1", "A-1").await;

    // then (期待する結果):
    assert_eq!(b.recv().await["type"], "seat_lock_confirmed");
    assert_eq!(a.recv().await["type"], "seat_locked");
}

#[tokio::test]
async fn test_concurrent_selects_have_single_winner() {
    // テスト項目: 同じ座席への同時選択は 1 セッションだけが成功する
    // given (前提条件):
    let server = TestServer::start().await;
    let mut clients = Vec::new();
    for _ in 0..8 {
        clients.push(WsClient::connect_in(&server, "E1").await.0);
    }

    // when (操作):
    for client in clients.iter_mut() {
        client.select("E1", "A-3").await;
    }

    // then (期待する結果):
    let mut confirmed = 0;
    let mut rejected = 0;
    for client in clients.iter_mut() {
        loop {
            let message = client.recv().await;
            match message["type"].as_str() {
                Some("seat_lock_confirmed") => {
                    confirmed += 1;
                    break;
                }
                Some("seat_lock_failed") => {
                    assert_eq!(message["reason"], "ALREADY_HELD");
                    rejected += 1;
                    break;
                }
                // broadcasts of the winner's hold
                Some("seat_locked") => continue,
                other => panic!("unexpected message: {other:?}"),
            }
        }
    }
    assert_eq!(confirmed, 1);
    assert_eq!(rejected, 7);
}

#[tokio::test]
async fn test_broadcasts_are_isolated_per_event() {
    // テスト項目: 別イベントのルームにはブロードキャストが届かない
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut e1_viewer, _) = WsClient::connect_in(&server, "E1").await;
    let (mut e2_viewer, _) = WsClient::connect_in(&server, "E2").await;
    let (mut holder, _) = WsClient::connect_in(&server, "E1").await;

    // when (操作):
    holder.select("E1", "A-1").await;

    // then (期待する結果):
    assert_eq!(holder.recv().await["type"], "seat_lock_confirmed");
    assert_eq!(e1_viewer.recv().await["type"], "seat_locked");
    assert!(e2_viewer.recv_within(QUIET).await.is_none());
}

#[tokio::test]
async fn test_join_snapshot_contains_live_holds() {
    // テスト項目: 後から参加したセッションに保持中の座席のタイマーが届く
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut holder, _) = WsClient::connect_in(&server, "E1").await;
    for seat in ["A-1", "A-2"] {
        holder.select("E1", seat).await;
        assert_eq!(holder.recv().await["type"], "seat_lock_confirmed");
    }

    // when (操作):
    let (_late, snapshot) = WsClient::connect_in(&server, "E1").await;

    // then (期待する結果):
    assert_eq!(snapshot["event_id"], "E1");
    let mut seats: Vec<(String, u64)> = snapshot["seats"]
        .as_array()
        .unwrap()
        .iter()
        .map(|timer| {
            (
                timer["seat_id"].as_str().unwrap().to_string(),
                timer["remaining_seconds"].as_u64().unwrap(),
            )
        })
        .collect();
    seats.sort();
    assert_eq!(seats.len(), 2);
    assert_eq!(seats[0].0, "A-1");
    assert_eq!(seats[1].0, "A-2");
    assert!(seats.iter().all(|(_, remaining)| *remaining <= 1800 && *remaining > 1790));
}

#[tokio::test]
async fn test_expired_hold_is_reported_once() {
    // テスト項目: TTL 経過後にホールドが回収され、seat_expired が一度だけ届く
    // given (前提条件): TTL 1 秒、スイープ間隔 100ms
    let server = TestServer::start_with(Duration::from_secs(1), Duration::from_millis(100)).await;
    let (mut holder, _) = WsClient::connect_in(&server, "E1").await;
    let (mut viewer, _) = WsClient::connect_in(&server, "E1").await;
    holder.select("E1", "A-4").await;
    assert_eq!(holder.recv().await["type"], "seat_lock_confirmed");
    assert_eq!(viewer.recv().await["type"], "seat_locked");

    // when (操作):
    tokio::time::sleep(Duration::from_millis(1500)).await;

    // then (期待する結果):
    let expired = json!({"type": "seat_expired", "event_id": "E1", "seat_id": "A-4"});
    assert_eq!(viewer.recv().await, expired);
    assert_eq!(holder.recv().await, expired);
    assert!(viewer.recv_within(QUIET).await.is_none());

    // 回収後は再び選択できる
    viewer.select("E1", "A-4").await;
    assert_eq!(viewer.recv().await["type"], "seat_lock_confirmed");
}

#[tokio::test]
async fn test_disconnect_releases_holds() {
    // テスト項目: 切断したセッションのホールドは即座に解放される
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut holder, _) = WsClient::connect_in(&server, "E1").await;
    let (mut viewer, _) = WsClient::connect_in(&server, "E1").await;
    holder.select("E1", "A-2").await;
    assert_eq!(holder.recv().await["type"], "seat_lock_confirmed");
    assert_eq!(viewer.recv().await["type"], "seat_locked");

    // when (操作):
    holder.close().await;

    // then (期待する結果):
    assert_eq!(
        viewer.recv().await,
        json!({"type": "seat_unlocked", "event_id": "E1", "seat_id": "A-2"})
    );
    viewer.select("E1", "A-2").await;
    assert_eq!(viewer.recv().await["type"], "seat_lock_confirmed");
}

#[tokio::test]
async fn test_protocol_errors_go_to_sender_only() {
    // テスト項目: 不正なメッセージやルーム外の操作は送信者にのみ返される
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut sender, _) = WsClient::connect_in(&server, "E1").await;
    let (mut viewer, _) = WsClient::connect_in(&server, "E1").await;

    // when (操作):
    sender.send_raw("not json".to_string()).await;
    sender.select("E2", "A-1").await;
    sender
        .send(json!({"type": "join_event", "event_id": "NOPE"}))
        .await;

    // then (期待する結果):
    let malformed = sender.recv().await;
    assert_eq!(malformed["type"], "error");
    assert_eq!(malformed["code"], "MALFORMED_MESSAGE");
    assert_eq!(
        sender.recv().await,
        json!({"type": "seat_lock_failed", "event_id": "E2", "seat_id": "A-1", "reason": "NOT_IN_ROOM"})
    );
    let unknown = sender.recv().await;
    assert_eq!(unknown["type"], "error");
    assert_eq!(unknown["code"], "UNKNOWN_EVENT");
    assert!(viewer.recv_within(QUIET).await.is_none());
}
