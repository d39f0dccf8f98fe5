use serde::{Deserialize, Serialize};

use crate::view::Size;

/// Measurements the renderer reuses between layout passes. Numeric fields hold
/// [`SizeCache::UNSET`] until measured.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizeCache {
    /// Client size of the view across the percentage axis.
    pub view: f64,
    /// Client size of the container along the percentage axis.
    pub viewport: f64,
    /// Last extent published with `set_container_size`.
    pub container: f64,
    /// Shared item size when every item has the same size.
    pub item: Option<Size>,
}

impl Default for SizeCache {
    fn default() -> Self {
        Self {
            view: Self::UNSET,
            viewport: Self::UNSET,
            container: Self::UNSET,
            item: None,
        }
    }
}

impl SizeCache {
    pub const UNSET: f64 = -1.0;

    /// Everything measured against the previous viewport is stale.
    pub fn for_viewport(viewport: f64) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_viewport_resets_dependent_sizes() {
        let cache = SizeCache::for_viewport(640.0);
        assert_eq!(cache.viewport, 640.0);
        assert_eq!(cache.view, SizeCache::UNSET);
        assert_eq!(cache.container, SizeCache::UNSET);
        assert_eq!(cache.item, None);
    }

    #[test]
    fn serializes_with_field_names() {
        let json = serde_json::to_value(SizeCache::default()).unwrap();
        assert_eq!(json["viewport"], -1.0);
        assert!(json["item"].is_null());
    }
}
