//! Shared test helpers for device adapter integration tests
//!
//! Each helper mounts one adapter endpoint on a wiremock server. Listing
//! bodies are newline-separated names, exactly as the adapter serves them.

use std::time::Duration;

use camsync_core::domain::{Album, RemoteFile, Slot};
use camsync_device::DeviceClient;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Storage root used by every test
pub const STORAGE: &str = "DCIM";

/// Starts a mock adapter and returns a client pointing at it with a
/// generous timeout.
pub async fn setup_device_mock() -> (MockServer, DeviceClient) {
    let server = MockServer::start().await;
    let client = DeviceClient::new(&server.uri(), STORAGE, Duration::from_secs(2))
        .expect("mock server URI is a valid host");
    (server, client)
}

pub fn album(name: &str, slot: u8) -> Album {
    Album::new(STORAGE, name, Slot::new(slot)).expect("valid album")
}

pub fn file(album_name: &str, slot: u8, name: &str) -> RemoteFile {
    RemoteFile::new(album(album_name, slot), name).expect("valid file")
}

/// Joins names into an adapter listing body
pub fn listing(names: &[&str]) -> String {
    let mut body = names.join("\n");
    body.push('\n');
    body
}

/// Mounts the album listing of `slot`.
pub async fn mount_albums(server: &MockServer, slot: u8, names: &[&str]) {
    Mock::given(method("GET"))
        .and(path(format!("/{STORAGE}/")))
        .and(query_param("slot", slot.to_string()))
        .and(query_param("quick", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing(names)))
        .mount(server)
        .await;
}

/// Mounts a bare status for the album listing of `slot`.
pub async fn mount_albums_status(server: &MockServer, slot: u8, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/{STORAGE}/")))
        .and(query_param("slot", slot.to_string()))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Mounts one page of the file listing of `album_name`.
pub async fn mount_files_page(
    server: &MockServer,
    album_name: &str,
    slot: u8,
    limit: u32,
    start: u32,
    names: &[&str],
) {
    Mock::given(method("GET"))
        .and(path(format!("/{STORAGE}/{album_name}/")))
        .and(query_param("image", "1"))
        .and(query_param("limit", limit.to_string()))
        .and(query_param("start", start.to_string()))
        .and(query_param("slot", slot.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing(names)))
        .mount(server)
        .await;
}

/// Mounts a file download endpoint.
pub async fn mount_download(
    server: &MockServer,
    album_name: &str,
    slot: u8,
    name: &str,
    content: &[u8],
) {
    Mock::given(method("GET"))
        .and(path(format!("/{STORAGE}/{album_name}/{name}")))
        .and(query_param("slot", slot.to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(content.to_vec())
                .append_header("Content-Type", "image/jpeg"),
        )
        .mount(server)
        .await;
}
