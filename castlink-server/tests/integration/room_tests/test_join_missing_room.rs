use castlink_core::{RoomKey, ServerMessage};

use crate::integration::{create_test_service, init_tracing};
use crate::utils::TestConn;

#[tokio::test]
async fn join_of_unknown_key_errors_and_mutates_nothing() {
    init_tracing();
    let service = create_test_service();

    let mut joiner = TestConn::connect(&service);
    joiner.join_room(&service, "ghost").await;

    assert_eq!(
        joiner.recv().await,
        ServerMessage::Error("room not found".into())
    );
    joiner.assert_silent();

    assert_eq!(service.registry().room_count().await, 0);
    assert!(!service.registry().contains_room(&RoomKey::from("ghost")).await);
}

#[tokio::test]
async fn room_keys_are_exact_matches() {
    init_tracing();
    let service = create_test_service();

    let mut host = TestConn::connect(&service);
    let mut joiner = TestConn::connect(&service);

    host.create_room(&service, "den").await;
    joiner.join_room(&service, "Den").await;

    assert_eq!(
        joiner.recv().await,
        ServerMessage::Error("room not found".into())
    );
    host.assert_silent();
}
