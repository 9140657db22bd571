//! Integration tests for album and file listings

use std::time::Duration;

use camsync_core::domain::Slot;
use camsync_core::ports::{DeviceError, IDeviceClient};
use camsync_device::DeviceClient;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn test_list_albums_parses_newline_separated_names() {
    let (server, client) = common::setup_device_mock().await;
    common::mount_albums(&server, 0, &["100CANON", "101CANON"]).await;

    let albums = client
        .list_albums(Slot::new(0))
        .await
        .expect("album listing failed");

    assert_eq!(albums, vec!["100CANON", "101CANON"]);
}

#[tokio::test]
async fn test_list_albums_handles_crlf_and_blank_lines() {
    let (server, client) = common::setup_device_mock().await;
    Mock::given(method("GET"))
        .and(path("/DCIM/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("100CANON\r\n\r\n101CANON\r\n"))
        .mount(&server)
        .await;

    let albums = client.list_albums(Slot::new(1)).await.unwrap();
    assert_eq!(albums, vec!["100CANON", "101CANON"]);
}

#[tokio::test]
async fn test_list_albums_empty_body_is_empty_listing() {
    let (server, client) = common::setup_device_mock().await;
    Mock::given(method("GET"))
        .and(path("/DCIM/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;

    let albums = client.list_albums(Slot::new(0)).await.unwrap();
    assert!(albums.is_empty());
}

#[tokio::test]
async fn test_list_albums_404_is_not_found() {
    let (server, client) = common::setup_device_mock().await;
    common::mount_albums_status(&server, 1, 404).await;

    let err = client.list_albums(Slot::new(1)).await.unwrap_err();
    assert_eq!(err, DeviceError::NotFound);
}

#[tokio::test]
async fn test_list_albums_server_error_is_status() {
    let (server, client) = common::setup_device_mock().await;
    common::mount_albums_status(&server, 0, 500).await;

    let err = client.list_albums(Slot::new(0)).await.unwrap_err();
    assert_eq!(err, DeviceError::Status(500));
}

#[tokio::test]
async fn test_list_files_sends_paging_parameters() {
    let (server, client) = common::setup_device_mock().await;
    common::mount_files_page(&server, "101CANON", 1, 2, 4, &["IMG_5.JPG", "IMG_6.JPG"]).await;

    let page = client
        .list_files(&common::album("101CANON", 1), 2, 4)
        .await
        .expect("file page failed");

    assert_eq!(page, vec!["IMG_5.JPG", "IMG_6.JPG"]);
}

#[tokio::test]
async fn test_list_files_404_is_not_found() {
    let (server, client) = common::setup_device_mock().await;
    Mock::given(method("GET"))
        .and(path("/DCIM/101CANON/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client
        .list_files(&common::album("101CANON", 0), 1000, 0)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_slow_device_times_out_as_unreachable() {
    let (server, _) = common::setup_device_mock().await;
    Mock::given(method("GET"))
        .and(path("/DCIM/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("100CANON\n")
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = DeviceClient::new(&server.uri(), common::STORAGE, Duration::from_millis(50))
        .unwrap();
    let err = client.list_albums(Slot::new(0)).await.unwrap_err();
    assert!(
        matches!(err, DeviceError::Unreachable(_)),
        "expected Unreachable, got {err:?}"
    );
}

#[tokio::test]
async fn test_refused_connection_is_unreachable() {
    // Nothing listens on the reserved tcpmux port.
    let client =
        DeviceClient::new("http://127.0.0.1:1", common::STORAGE, Duration::from_millis(500))
            .unwrap();

    let err = client.list_albums(Slot::new(0)).await.unwrap_err();
    assert!(
        matches!(err, DeviceError::Unreachable(_)),
        "expected Unreachable, got {err:?}"
    );
}
