use castlink_core::ServerMessage;

use crate::integration::{create_test_service, init_tracing};
use crate::utils::TestConn;

#[tokio::test]
async fn overwrite_is_silent_for_the_discarded_room() {
    init_tracing();
    let service = create_test_service();

    let mut old_host = TestConn::connect(&service);
    let mut old_viewer = TestConn::connect(&service);
    let mut new_host = TestConn::connect(&service);

    old_host.create_room(&service, "den").await;
    old_viewer.join_room(&service, "den").await;
    assert_eq!(
        old_host.recv().await,
        ServerMessage::ViewerJoined(old_viewer.id)
    );

    new_host.create_room(&service, "den").await;

    // Nobody hears about the replacement; in particular no spurious
    // host-disconnected for the discarded room.
    old_host.assert_silent();
    old_viewer.assert_silent();
    new_host.assert_silent();
}

#[tokio::test]
async fn joins_after_overwrite_reach_the_new_host() {
    init_tracing();
    let service = create_test_service();

    let mut old_host = TestConn::connect(&service);
    let mut new_host = TestConn::connect(&service);
    let viewer = TestConn::connect(&service);

    old_host.create_room(&service, "den").await;
    new_host.create_room(&service, "den").await;
    viewer.join_room(&service, "den").await;

    assert_eq!(new_host.recv().await, ServerMessage::ViewerJoined(viewer.id));
    old_host.assert_silent();
}

#[tokio::test]
async fn recreating_own_room_drops_its_viewers() {
    init_tracing();
    let service = create_test_service();

    let mut host = TestConn::connect(&service);
    let viewer = TestConn::connect(&service);

    host.create_room(&service, "den").await;
    viewer.join_room(&service, "den").await;
    assert_eq!(host.recv().await, ServerMessage::ViewerJoined(viewer.id));

    host.create_room(&service, "den").await;

    // Fresh room, prior viewer list discarded: the old viewer's disconnect
    // no longer concerns the host.
    viewer.disconnect(&service).await;
    host.assert_silent();
}
