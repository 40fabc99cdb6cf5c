//! Image fetching: one cancellable fetch-and-decode at a time.
//!
//! ```text
//! start_fetch(url) ──→ Transport ──→ ImageDecoder ──→ generation check ──→ FetchStatus
//! ```

pub mod controller;
pub mod decode;
pub mod error;
pub mod status;
pub mod transport;

pub use controller::{CancelPolicy, ImageFetchController};
pub use decode::{ImageCrateDecoder, ImageDecoder};
pub use error::FetchError;
pub use status::{DecodedImage, FetchStatus, Generation};
pub use transport::{HttpTransport, Transport, TransportLimits};

/// Controller wired to the production transport and decoder.
pub type HttpImageFetchController = ImageFetchController<HttpTransport, ImageCrateDecoder>;
