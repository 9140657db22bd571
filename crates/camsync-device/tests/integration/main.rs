//! Integration tests for camsync-device
//!
//! Uses wiremock to simulate the camera adapter's plain-text HTTP API and
//! verifies URL construction, listing parsing, downloads and the mapping of
//! statuses and transport failures onto `DeviceError`.

mod common;

mod test_listing;
