use crate::core::constants::DEFAULT_URL_TEMPLATE;
use crate::core::geo::TileAddress;
use crate::{Error, Result};

/// Trait representing anything that can produce tile URLs for a given address.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `address`. Pure and deterministic.
    fn url(&self, address: TileAddress) -> String;

    /// The tile to fall back to when `address` is unavailable
    fn parent_of(&self, address: TileAddress) -> Option<TileAddress> {
        address.parent()
    }
}

/// Static tile assets laid out as `{z}/{x}_{y}.png` under a path prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTileSource {
    template: String,
}

impl AssetTileSource {
    pub fn new() -> Self {
        Self {
            template: DEFAULT_URL_TEMPLATE.to_string(),
        }
    }

    /// Use a custom template with `{z}`, `{x}` (column) and `{y}` (row) placeholders
    pub fn with_template(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if ["{z}", "{x}", "{y}"].iter().any(|p| !template.contains(p)) {
            return Err(Error::Config(format!(
                "tile url template {:?} needs {{z}}, {{x}} and {{y}}",
                template
            )));
        }
        Ok(Self { template })
    }

    pub fn template(&self) -> &str {
        &self.template
    }
}

impl Default for AssetTileSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TileSource for AssetTileSource {
    fn url(&self, address: TileAddress) -> String {
        self.template
            .replace("{z}", &address.zoom.to_string())
            .replace("{x}", &address.column.to_string())
            .replace("{y}", &address.row.to_string())
    }
}
