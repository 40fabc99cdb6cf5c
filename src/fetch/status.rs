//! Observable state of the fetch controller.

use std::fmt;
use std::sync::Arc;

use image::DynamicImage;

/// Monotonically increasing tag assigned to each started fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A decoded image shared read-only with observers.
///
/// Cloning only bumps a reference count. A new fetch replaces the whole
/// value; the pixels are never mutated after publication.
#[derive(Clone)]
pub struct DecodedImage {
    pixels: Arc<DynamicImage>,
}

impl DecodedImage {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            pixels: Arc::new(image),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// Identity comparison: two images are equal only if they are the same
/// published buffer.
impl PartialEq for DecodedImage {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

impl Eq for DecodedImage {}

/// Externally observable projection of the controller state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchStatus {
    /// Nothing requested yet, or the last fetch was cancelled.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The latest fetch produced an image.
    Success(DecodedImage),
    /// The latest fetch failed at the network or decode stage.
    Error,
}

impl FetchStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchStatus::Loading)
    }

    /// True once the latest fetch has produced a terminal outcome.
    pub fn is_settled(&self) -> bool {
        matches!(self, FetchStatus::Success(_) | FetchStatus::Error)
    }

    pub fn image(&self) -> Option<&DecodedImage> {
        match self {
            FetchStatus::Success(image) => Some(image),
            _ => None,
        }
    }

    /// Short name used in log fields.
    pub fn label(&self) -> &'static str {
        match self {
            FetchStatus::Idle => "idle",
            FetchStatus::Loading => "loading",
            FetchStatus::Success(_) => "success",
            FetchStatus::Error => "error",
        }
    }
}
