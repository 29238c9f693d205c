//! Tile payloads and the tile-level failure type

use std::sync::Arc;
use std::time::Duration;

use crate::core::constants::{PLACEHOLDER_DATA_URI, PLACEHOLDER_PNG};
use crate::core::geo::TileAddress;

/// The one error kind of the tile layer. It is recovered by retry, parent
/// fallback or the placeholder and never reaches the embedding application.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TileLoadFailure {
    #[error("asset not found")]
    Missing,

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(String),

    #[error("undecodable tile body: {0}")]
    Decode(String),

    #[error("no response within {0:?}")]
    TimedOut(Duration),
}

/// A successfully loaded tile body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileData {
    pub bytes: Arc<Vec<u8>>,
    pub width: u32,
    pub height: u32,
}

impl TileData {
    pub fn new(bytes: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            bytes: Arc::new(bytes),
            width,
            height,
        }
    }

    /// Decode `bytes` as an image, the way an image element would before
    /// firing its load event. A body that does not decode is a failed load.
    pub fn decode(bytes: Vec<u8>) -> Result<Self, TileLoadFailure> {
        let image = image::load_from_memory(&bytes)
            .map_err(|e| TileLoadFailure::Decode(e.to_string()))?;
        Ok(Self::new(bytes, image.width(), image.height()))
    }
}

/// What ends up in a tile slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileImage {
    /// Real content, possibly from a coarser ancestor of the requested tile
    Loaded { address: TileAddress, data: TileData },
    /// Built-in neutral tile shown once every fallback tier failed
    Placeholder,
}

impl TileImage {
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Loaded { data, .. } => data.bytes.as_slice(),
            Self::Placeholder => PLACEHOLDER_PNG,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Loaded { data, .. } => (data.width, data.height),
            Self::Placeholder => (1, 1),
        }
    }

    /// Address the pixels were loaded from; `None` for the placeholder
    pub fn source_address(&self) -> Option<TileAddress> {
        match self {
            Self::Loaded { address, .. } => Some(*address),
            Self::Placeholder => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }

    /// `data:` URI for the placeholder, for hosts that take image sources as strings
    pub fn placeholder_uri() -> &'static str {
        PLACEHOLDER_DATA_URI
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_decodes_as_one_pixel() {
        let data = TileData::decode(PLACEHOLDER_PNG.to_vec()).unwrap();
        assert_eq!((data.width, data.height), (1, 1));
        assert_eq!(TileImage::Placeholder.dimensions(), (1, 1));
        assert_eq!(TileImage::Placeholder.bytes(), PLACEHOLDER_PNG);
    }

    #[test]
    fn test_garbage_body_is_a_decode_failure() {
        let err = TileData::decode(b"<html>404</html>".to_vec()).unwrap_err();
        assert!(matches!(err, TileLoadFailure::Decode(_)));
    }

    #[test]
    fn test_loaded_image_reports_its_source() {
        let address = TileAddress::new(1, 0, 1);
        let image = TileImage::Loaded {
            address,
            data: TileData::new(vec![1, 2, 3], 256, 256),
        };
        assert_eq!(image.source_address(), Some(address));
        assert_eq!(image.bytes(), &[1, 2, 3]);
        assert!(!image.is_placeholder());
        assert!(TileImage::placeholder_uri().starts_with("data:image/png;base64,"));
    }
}
