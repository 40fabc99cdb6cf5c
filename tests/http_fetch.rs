//! End-to-end fetches against a local mock server.

mod common;

use common::mock_server::{MockResponse, MockServer};
use common::{closed_port_addr, http_controller, limits, png_bytes, wait_settled};
use imageloader::fetch::{
    CancelPolicy, FetchError, FetchStatus, HttpTransport, Transport, TransportLimits,
};
use std::time::Duration;

#[tokio::test]
async fn valid_png_goes_idle_loading_success() {
    let server = MockServer::start().await;
    server
        .route("/valid.png", MockResponse::png(png_bytes(20, 10)))
        .await;

    let controller = http_controller(CancelPolicy::Abort, limits(5));
    assert_eq!(controller.current_status(), FetchStatus::Idle);

    let mut rx = controller.subscribe();
    controller.start_fetch(server.url("/valid.png"));
    assert_eq!(controller.current_status(), FetchStatus::Loading);

    let status = wait_settled(&mut rx).await;
    let image = status.image().expect("expected a decoded image");
    assert_eq!((image.width(), image.height()), (20, 10));
}

#[tokio::test]
async fn not_found_yields_error() {
    let server = MockServer::start().await;
    let controller = http_controller(CancelPolicy::Abort, limits(5));
    let mut rx = controller.subscribe();

    controller.start_fetch(server.url("/404"));
    assert_eq!(wait_settled(&mut rx).await, FetchStatus::Error);
}

#[tokio::test]
async fn server_error_yields_error() {
    let server = MockServer::start().await;
    server
        .route("/boom.png", MockResponse::error(500, "internal"))
        .await;
    let controller = http_controller(CancelPolicy::Abort, limits(5));
    let mut rx = controller.subscribe();

    controller.start_fetch(server.url("/boom.png"));
    assert_eq!(wait_settled(&mut rx).await, FetchStatus::Error);
}

#[tokio::test]
async fn non_image_payload_yields_error() {
    let server = MockServer::start().await;
    server
        .route("/page", MockResponse::text("<html>hello</html>"))
        .await;
    let controller = http_controller(CancelPolicy::Abort, limits(5));
    let mut rx = controller.subscribe();

    controller.start_fetch(server.url("/page"));
    assert_eq!(wait_settled(&mut rx).await, FetchStatus::Error);
}

#[tokio::test]
async fn unreachable_host_yields_error() {
    let controller = http_controller(CancelPolicy::Abort, limits(5));
    let mut rx = controller.subscribe();

    controller.start_fetch(format!("http://{}/image.png", closed_port_addr()));
    assert_eq!(wait_settled(&mut rx).await, FetchStatus::Error);
}

#[tokio::test]
async fn malformed_url_yields_error() {
    let controller = http_controller(CancelPolicy::Abort, limits(5));
    let mut rx = controller.subscribe();

    controller.start_fetch("definitely not a url");
    assert_eq!(wait_settled(&mut rx).await, FetchStatus::Error);
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    server
        .route(
            "/slow.png",
            MockResponse::png(png_bytes(4, 4)).with_delay(3000),
        )
        .await;

    let transport = HttpTransport::new(limits(1)).unwrap();
    let err = transport.fetch(&server.url("/slow.png")).await.unwrap_err();
    assert!(matches!(err, FetchError::Timeout { duration: 1 }));

    let controller = http_controller(CancelPolicy::Abort, limits(1));
    let mut rx = controller.subscribe();
    controller.start_fetch(server.url("/slow.png"));
    assert_eq!(wait_settled(&mut rx).await, FetchStatus::Error);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = MockServer::start().await;
    server
        .route("/big.png", MockResponse::png(png_bytes(64, 64)))
        .await;

    let transport = HttpTransport::new(TransportLimits {
        max_bytes: 16,
        ..limits(5)
    })
    .unwrap();
    let err = transport.fetch(&server.url("/big.png")).await.unwrap_err();
    assert!(matches!(err, FetchError::TooLarge { limit: 16, .. }));
}

#[tokio::test]
async fn empty_body_is_rejected() {
    let server = MockServer::start().await;
    server.route("/empty.png", MockResponse::png(Vec::new())).await;

    let transport = HttpTransport::new(limits(5)).unwrap();
    let err = transport.fetch(&server.url("/empty.png")).await.unwrap_err();
    assert!(matches!(err, FetchError::EmptyPayload { .. }));
}

#[tokio::test]
async fn newer_fetch_wins_over_slower_superseded_one() {
    let server = MockServer::start().await;
    server
        .route(
            "/slow.png",
            MockResponse::png(png_bytes(8, 8)).with_delay(500),
        )
        .await;
    server
        .route("/fast.png", MockResponse::png(png_bytes(2, 3)))
        .await;

    for policy in [CancelPolicy::Abort, CancelPolicy::Detach] {
        let controller = http_controller(policy, limits(5));
        let mut rx = controller.subscribe();

        controller.start_fetch(server.url("/slow.png"));
        controller.start_fetch(server.url("/fast.png"));

        let status = wait_settled(&mut rx).await;
        assert_eq!(status.image().map(|i| i.width()), Some(2), "{:?}", policy);

        // Give the superseded fetch time to finish if it is still running.
        tokio::time::sleep(Duration::from_millis(800)).await;
        let image = controller.current_status();
        assert_eq!(
            image.image().map(|i| (i.width(), i.height())),
            Some((2, 3)),
            "{:?}",
            policy
        );
    }
}

#[tokio::test]
async fn newer_failure_wins_over_older_success() {
    let server = MockServer::start().await;
    server
        .route(
            "/valid.png",
            MockResponse::png(png_bytes(8, 8)).with_delay(300),
        )
        .await;

    let controller = http_controller(CancelPolicy::Detach, limits(5));
    let mut rx = controller.subscribe();

    controller.start_fetch(server.url("/valid.png"));
    controller.start_fetch(server.url("/404"));
    assert_eq!(wait_settled(&mut rx).await, FetchStatus::Error);

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(controller.current_status(), FetchStatus::Error);
}
