//! Bytes to pixels.

use image::ImageFormat;

use crate::fetch::error::FetchError;
use crate::fetch::status::DecodedImage;

/// Turns a fetched payload into a [`DecodedImage`].
///
/// Called from tokio's blocking pool, so implementations may be CPU heavy.
pub trait ImageDecoder: Send + Sync + 'static {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, FetchError>;
}

/// Decoder backed by the `image` crate.
///
/// The format is sniffed from the payload's magic bytes; the server's
/// `Content-Type` is not consulted.
#[derive(Debug, Clone, Default)]
pub struct ImageCrateDecoder;

impl ImageCrateDecoder {
    const SUPPORTED: [ImageFormat; 4] = [
        ImageFormat::Png,
        ImageFormat::Jpeg,
        ImageFormat::Gif,
        ImageFormat::WebP,
    ];
}

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, FetchError> {
        if bytes.is_empty() {
            return Err(FetchError::Decode("empty payload".to_string()));
        }

        let format = image::guess_format(bytes)
            .map_err(|e| FetchError::Decode(format!("unrecognised format: {}", e)))?;
        if !Self::SUPPORTED.contains(&format) {
            return Err(FetchError::Decode(format!(
                "unsupported format: {:?}",
                format
            )));
        }

        let decoded = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(DecodedImage::new(decoded))
    }
}
