//! Shared test utilities.

#![allow(dead_code, unused_imports)]

pub mod mock_server;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageloader::fetch::{
    CancelPolicy, FetchStatus, HttpImageFetchController, HttpTransport, ImageCrateDecoder,
    ImageFetchController, TransportLimits,
};
use std::io::Cursor;
use std::net::TcpListener;
use std::time::Duration;
use tokio::sync::watch;

/// Encode a solid-colour PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut out, ImageFormat::Png)
        .expect("Failed to encode PNG");
    out.into_inner()
}

/// A local address nothing is listening on.
pub fn closed_port_addr() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind to free port");
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr.to_string()
}

pub fn limits(request_secs: u64) -> TransportLimits {
    TransportLimits {
        connect: Duration::from_secs(2),
        request: Duration::from_secs(request_secs),
        max_bytes: 1024 * 1024,
    }
}

/// Controller wired to real HTTP and the `image` decoder.
pub fn http_controller(policy: CancelPolicy, limits: TransportLimits) -> HttpImageFetchController {
    let transport = HttpTransport::new(limits).expect("Failed to build transport");
    ImageFetchController::new(transport, ImageCrateDecoder, policy)
}

/// Wait for the status to reach Success or Error.
pub async fn wait_settled(rx: &mut watch::Receiver<FetchStatus>) -> FetchStatus {
    tokio::time::timeout(Duration::from_secs(10), rx.wait_for(|s| s.is_settled()))
        .await
        .expect("status did not settle")
        .expect("controller dropped")
        .clone()
}
