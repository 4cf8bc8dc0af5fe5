//! End-to-end flows for the space lifecycle and synchronization protocol
//!
//! Drives the coordinator the way the WebSocket layer does, with a recording
//! broadcaster standing in for the transport.

use probespaces_core::coordinator::{SpaceCoordinator, SyncInput};
use probespaces_core::protocol::{ClientEvent, CloseReason, ServerEvent};
use probespaces_core::space::types::{ConnectionId, SpaceId, COLOR_PALETTE};
use probespaces_core::test_utils::RecordingBroadcaster;
use serde_json::json;
use std::sync::Arc;

fn setup() -> (Arc<RecordingBroadcaster>, SpaceCoordinator) {
    let broadcaster = Arc::new(RecordingBroadcaster::new());
    let coordinator = SpaceCoordinator::new(broadcaster.clone());
    (broadcaster, coordinator)
}

/// Create a space for Alice and join Bob into it, returning
/// (alice_conn, bob_conn, space_id).
async fn space_with_two(
    broadcaster: &RecordingBroadcaster,
    coordinator: &SpaceCoordinator,
) -> (ConnectionId, ConnectionId, SpaceId) {
    let alice = ConnectionId::generate();
    let bob = ConnectionId::generate();

    let created = coordinator
        .create_space(alice, Some("Alice".to_string()))
        .await;
    let joined = coordinator
        .join_space(bob, &created.space_id, Some("Bob".to_string()))
        .await;
    assert!(joined.success);

    broadcaster.clear();
    (alice, bob, created.space_id)
}

#[tokio::test]
async fn test_create_space_reply_has_single_host() {
    let (_, coordinator) = setup();
    let conn = ConnectionId::generate();

    let reply = coordinator
        .create_space(conn, Some("Alice".to_string()))
        .await;

    assert!(reply.success);
    assert_eq!(reply.participants.len(), 1);
    let host = &reply.participants[0];
    assert!(host.is_host);
    assert_eq!(host.name, "Alice");
    assert_eq!(host.user_id, reply.user_id);
    assert!(COLOR_PALETTE.contains(&host.color.as_str()));
    assert_eq!(
        reply.invite_link,
        format!("probe://space/{}", reply.space_id)
    );
}

#[tokio::test]
async fn test_join_unknown_space_is_rejected_without_broadcast() {
    let (broadcaster, coordinator) = setup();

    let reply = coordinator
        .join_space(
            ConnectionId::generate(),
            &SpaceId::from("deadbeef"),
            Some("Bob".to_string()),
        )
        .await;

    assert!(!reply.success);
    assert_eq!(reply.error.as_deref(), Some("Space not found"));
    assert!(reply.user_id.is_none());
    assert!(broadcaster.records().is_empty());
}

#[tokio::test]
async fn test_join_notifies_existing_members_and_returns_roster() {
    let (broadcaster, coordinator) = setup();
    let alice = ConnectionId::generate();
    let bob = ConnectionId::generate();

    let created = coordinator
        .create_space(alice, Some("Alice".to_string()))
        .await;
    let joined = coordinator
        .join_space(bob, &created.space_id, Some("Bob".to_string()))
        .await;

    // Bob's reply lists Alice (host) then Bob, in join order.
    let participants = joined.participants.unwrap();
    assert_eq!(participants.len(), 2);
    assert_eq!(participants[0].name, "Alice");
    assert!(participants[0].is_host);
    assert_eq!(participants[1].name, "Bob");
    assert!(!participants[1].is_host);
    assert_eq!(joined.state.unwrap().current_url, "");

    // Alice alone observes user-joined{Bob}.
    let records = broadcaster.records_for(&created.space_id);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].recipients, vec![alice]);
    match &records[0].event {
        ServerEvent::UserJoined { user } => {
            assert_eq!(user.name, "Bob");
            assert!(!user.is_host);
        }
        other => panic!("expected user-joined, got {:?}", other),
    }
}

#[tokio::test]
async fn test_url_sync_excludes_sender_and_updates_state() {
    let (broadcaster, coordinator) = setup();
    let (alice, bob, space_id) = space_with_two(&broadcaster, &coordinator).await;

    coordinator
        .sync(
            bob,
            SyncInput::Url {
                url: "https://x".to_string(),
            },
        )
        .await;

    let records = broadcaster.records_for(&space_id);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].recipients, vec![alice]);
    match &records[0].event {
        ServerEvent::UrlChanged { url, user_name, .. } => {
            assert_eq!(url, "https://x");
            assert_eq!(user_name, "Bob");
        }
        other => panic!("expected url-changed, got {:?}", other),
    }

    let info = coordinator.space_info(&space_id).await;
    assert_eq!(info.space.unwrap().state.current_url, "https://x");
}

#[tokio::test]
async fn test_host_disconnect_closes_space() {
    let (broadcaster, coordinator) = setup();
    let (alice, bob, space_id) = space_with_two(&broadcaster, &coordinator).await;

    coordinator.leave(alice).await;

    // Bob observes user-left, then space-closed with the host reason.
    let records = broadcaster.records_for(&space_id);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].recipients, vec![bob]);
    match &records[0].event {
        ServerEvent::UserLeft { user_name, .. } => assert_eq!(user_name, "Alice"),
        other => panic!("expected user-left, got {:?}", other),
    }
    assert_eq!(records[1].recipients, vec![bob]);
    assert_eq!(
        records[1].event,
        ServerEvent::SpaceClosed {
            reason: CloseReason::HostLeft
        }
    );

    let info = coordinator.space_info(&space_id).await;
    assert!(!info.success);
    assert_eq!(coordinator.active_space_count().await, 0);
}

#[tokio::test]
async fn test_sole_participant_leaving_removes_space() {
    let (broadcaster, coordinator) = setup();
    let alice = ConnectionId::generate();

    let created = coordinator
        .create_space(alice, Some("Alice".to_string()))
        .await;
    broadcaster.clear();

    coordinator.leave(alice).await;

    // Both notifications go out to an empty room.
    let records = broadcaster.records_for(&created.space_id);
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.recipients.is_empty()));
    assert_eq!(coordinator.active_space_count().await, 0);
}

#[tokio::test]
async fn test_non_host_departure_keeps_space_open() {
    let (broadcaster, coordinator) = setup();
    let (_alice, bob, space_id) = space_with_two(&broadcaster, &coordinator).await;

    coordinator.leave(bob).await;

    let records = broadcaster.records_for(&space_id);
    assert_eq!(records.len(), 1);
    assert!(matches!(records[0].event, ServerEvent::UserLeft { .. }));

    let info = coordinator.space_info(&space_id).await;
    assert!(info.success);
    assert_eq!(info.space.unwrap().participants.len(), 1);
}

#[tokio::test]
async fn test_roster_count_matches_join_leave_history() {
    let (broadcaster, coordinator) = setup();
    let (_, _, space_id) = space_with_two(&broadcaster, &coordinator).await;

    let carol = ConnectionId::generate();
    let dave = ConnectionId::generate();
    coordinator
        .join_space(carol, &space_id, Some("Carol".to_string()))
        .await;
    coordinator
        .join_space(dave, &space_id, Some("Dave".to_string()))
        .await;
    coordinator.leave(carol).await;
    // Double-leave must not go negative or emit anything extra.
    coordinator.leave(carol).await;

    let info = coordinator.space_info(&space_id).await;
    // 1 create + 3 joins accepted - 2 leaves processed (second is a no-op)
    assert_eq!(info.space.unwrap().participants.len(), 3);
}

#[tokio::test]
async fn test_ephemeral_state_tracks_roster() {
    let (broadcaster, coordinator) = setup();
    let (alice, bob, space_id) = space_with_two(&broadcaster, &coordinator).await;

    coordinator
        .sync(alice, SyncInput::Cursor { x: 1.0, y: 1.0 })
        .await;
    coordinator
        .sync(bob, SyncInput::Cursor { x: 2.0, y: 2.0 })
        .await;
    coordinator
        .sync(
            bob,
            SyncInput::Selection {
                text: "hello".to_string(),
                range: json!({ "start": 0, "end": 5 }),
            },
        )
        .await;

    let snapshot = coordinator.space_info(&space_id).await.space.unwrap();
    assert_eq!(snapshot.state.cursors.len(), 2);
    assert_eq!(snapshot.state.selections.len(), 1);

    coordinator.leave(bob).await;

    // Every remaining cursor/selection key belongs to a rostered participant.
    let snapshot = coordinator.space_info(&space_id).await.space.unwrap();
    let roster_ids: Vec<_> = snapshot
        .participants
        .iter()
        .map(|p| p.user_id.clone())
        .collect();
    assert!(snapshot
        .state
        .cursors
        .keys()
        .all(|id| roster_ids.contains(id)));
    assert!(snapshot
        .state
        .selections
        .keys()
        .all(|id| roster_ids.contains(id)));
    assert_eq!(snapshot.state.cursors.len(), 1);
    assert!(snapshot.state.selections.is_empty());
}

#[tokio::test]
async fn test_space_info_is_idempotent() {
    let (broadcaster, coordinator) = setup();
    let (_, bob, space_id) = space_with_two(&broadcaster, &coordinator).await;

    coordinator
        .sync(
            bob,
            SyncInput::Scroll { x: 10.0, y: 500.0 },
        )
        .await;

    let first = coordinator.space_info(&space_id).await;
    let second = coordinator.space_info(&space_id).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_cursor_sync_never_echoes_to_sender() {
    let (broadcaster, coordinator) = setup();
    let (alice, bob, space_id) = space_with_two(&broadcaster, &coordinator).await;

    coordinator
        .sync(bob, SyncInput::Cursor { x: 5.0, y: 6.0 })
        .await;

    let records = broadcaster.records_for(&space_id);
    assert_eq!(records.len(), 1);
    assert!(!records[0].recipients.contains(&bob));
    assert_eq!(records[0].recipients, vec![alice]);
    match &records[0].event {
        ServerEvent::CursorMoved {
            user_name, color, ..
        } => {
            assert_eq!(user_name, "Bob");
            assert!(COLOR_PALETTE.contains(&color.as_str()));
        }
        other => panic!("expected cursor-moved, got {:?}", other),
    }
}

#[tokio::test]
async fn test_click_is_broadcast_but_stateless() {
    let (broadcaster, coordinator) = setup();
    let (_, bob, space_id) = space_with_two(&broadcaster, &coordinator).await;

    let before = coordinator.space_info(&space_id).await.space.unwrap().state;
    coordinator
        .sync(
            bob,
            SyncInput::Click {
                x: 3.0,
                y: 4.0,
                element: "button#submit".to_string(),
            },
        )
        .await;
    let after = coordinator.space_info(&space_id).await.space.unwrap().state;

    assert_eq!(before, after);
    let records = broadcaster.records_for(&space_id);
    assert_eq!(records.len(), 1);
    assert!(matches!(
        records[0].event,
        ServerEvent::ClickOccurred { .. }
    ));
}

#[tokio::test]
async fn test_selection_range_passes_through_unmodified() {
    let (broadcaster, coordinator) = setup();
    let (_, bob, space_id) = space_with_two(&broadcaster, &coordinator).await;

    let range = json!({ "start": { "node": 3, "offset": 1 }, "end": { "node": 3, "offset": 9 } });
    coordinator
        .sync(
            bob,
            SyncInput::Selection {
                text: "selected".to_string(),
                range: range.clone(),
            },
        )
        .await;

    let records = broadcaster.records_for(&space_id);
    match &records[0].event {
        ServerEvent::SelectionChanged {
            range: sent, text, ..
        } => {
            assert_eq!(sent, &range);
            assert_eq!(text, "selected");
        }
        other => panic!("expected selection-changed, got {:?}", other),
    }

    let snapshot = coordinator.space_info(&space_id).await.space.unwrap();
    let stored = snapshot.state.selections.values().next().unwrap();
    assert_eq!(stored.range, range);
}

#[tokio::test]
async fn test_sync_after_space_closed_is_ignored() {
    let (broadcaster, coordinator) = setup();
    let (alice, bob, _) = space_with_two(&broadcaster, &coordinator).await;

    // Host leaves; the space closes while Bob is still bound to it.
    coordinator.leave(alice).await;
    broadcaster.clear();

    coordinator
        .sync(
            bob,
            SyncInput::Url {
                url: "https://late".to_string(),
            },
        )
        .await;

    assert!(broadcaster.records().is_empty());
}

#[tokio::test]
async fn test_creating_second_space_detaches_from_first() {
    let (broadcaster, coordinator) = setup();
    let alice = ConnectionId::generate();
    let bob = ConnectionId::generate();

    let first = coordinator
        .create_space(alice, Some("Alice".to_string()))
        .await;
    coordinator
        .join_space(bob, &first.space_id, Some("Bob".to_string()))
        .await;
    broadcaster.clear();

    // Alice hosts a new space; her old one closes behind her.
    let second = coordinator
        .create_space(alice, Some("Alice".to_string()))
        .await;

    assert_eq!(coordinator.active_space_count().await, 1);
    assert!(!coordinator.space_info(&first.space_id).await.success);
    assert!(coordinator.space_info(&second.space_id).await.success);

    let records = broadcaster.records_for(&first.space_id);
    assert_eq!(records.len(), 2);
    assert!(matches!(records[0].event, ServerEvent::UserLeft { .. }));
    assert_eq!(
        records[1].event,
        ServerEvent::SpaceClosed {
            reason: CloseReason::HostLeft
        }
    );
}

#[tokio::test]
async fn test_handle_event_routes_replies() {
    let (_, coordinator) = setup();
    let alice = ConnectionId::generate();

    let reply = coordinator
        .handle_event(
            alice,
            ClientEvent::CreateSpace {
                user_name: Some("Alice".to_string()),
            },
        )
        .await;
    let space_id = match reply {
        Some(ServerEvent::SpaceCreated(created)) => {
            assert!(created.success);
            created.space_id
        }
        other => panic!("expected space-created reply, got {:?}", other),
    };

    let info = coordinator
        .handle_event(
            alice,
            ClientEvent::GetSpaceInfo {
                space_id: space_id.as_str().to_string(),
            },
        )
        .await;
    assert!(matches!(
        info,
        Some(ServerEvent::SpaceInfo(reply)) if reply.success
    ));

    // Sync events expect no reply.
    let none = coordinator
        .handle_event(
            alice,
            ClientEvent::SyncScroll { x: 0.0, y: 10.0 },
        )
        .await;
    assert!(none.is_none());
}

#[tokio::test]
async fn test_default_names_for_missing_user_name() {
    let (_, coordinator) = setup();
    let alice = ConnectionId::generate();
    let bob = ConnectionId::generate();

    let created = coordinator.create_space(alice, None).await;
    assert_eq!(created.participants[0].name, "Host");

    let joined = coordinator
        .join_space(bob, &created.space_id, Some("   ".to_string()))
        .await;
    let participants = joined.participants.unwrap();
    assert_eq!(participants[1].name, "Guest");
}
