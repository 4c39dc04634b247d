//! Tunables for placement, normalization and connector routing.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::Viewport;

pub const DEFAULT_PADDING: f64 = 0.15;
pub const DEFAULT_SPIRAL_MAX_RADIUS: i32 = 10;
pub const MAX_SPIRAL_RADIUS: i32 = 1024;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Fraction of each axis reserved as margin on both sides.
    pub padding: f64,
    /// Largest ring searched when a cell is already taken.
    pub spiral_max_radius: i32,
    /// Offset applied when the spiral search finds nothing.
    pub fallback_offset: (i32, i32),
    pub viewport: Viewport,
    pub router: RouterConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            spiral_max_radius: DEFAULT_SPIRAL_MAX_RADIUS,
            fallback_offset: (10, 0),
            viewport: Viewport::default(),
            router: RouterConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub marker_diameter: f64,
    /// Obstacle search radius around the edge midpoint, as a share of edge length.
    pub obstacle_search_ratio: f64,
    /// Perpendicular jitter of the control points, as a share of edge length.
    pub wobble: f64,
    pub avoidance_strength: f64,
    /// Cap on total control-point displacement, as a share of edge length.
    pub max_bend_ratio: f64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            marker_diameter: 24.0,
            obstacle_search_ratio: 0.8,
            wobble: 0.12,
            avoidance_strength: 0.6,
            max_bend_ratio: 0.45,
        }
    }
}

impl RouterConfig {
    pub fn marker_radius(&self) -> f64 {
        self.marker_diameter / 2.0
    }
}

impl LayoutConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..0.5).contains(&self.padding) {
            let reason = format!("{} is outside [0, 0.5)", self.padding);
            return Err(ConfigError::invalid("padding", reason));
        }
        if !(1..=MAX_SPIRAL_RADIUS).contains(&self.spiral_max_radius) {
            let reason = format!("{} is outside [1, {MAX_SPIRAL_RADIUS}]", self.spiral_max_radius);
            return Err(ConfigError::invalid("spiral_max_radius", reason));
        }
        if self.fallback_offset == (0, 0) {
            return Err(ConfigError::invalid("fallback_offset", "must move away from the target"));
        }
        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            return Err(ConfigError::invalid("viewport", "width and height must be positive"));
        }
        let router = &self.router;
        let non_negative = [
            ("router.marker_diameter", router.marker_diameter),
            ("router.obstacle_search_ratio", router.obstacle_search_ratio),
            ("router.wobble", router.wobble),
            ("router.avoidance_strength", router.avoidance_strength),
            ("router.max_bend_ratio", router.max_bend_ratio),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                let reason = format!("{value} must be a finite non-negative number");
                return Err(ConfigError::invalid(field, reason));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_document_yields_defaults() {
        let config = LayoutConfig::from_toml_str("").expect("empty config is valid");
        assert_eq!(config, LayoutConfig::default());
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let config = LayoutConfig::from_toml_str(
            r#"
            padding = 0.1

            [router]
            marker_diameter = 30.0
            "#,
        )
        .expect("partial config is valid");

        assert_eq!(config.padding, 0.1);
        assert_eq!(config.router.marker_diameter, 30.0);
        assert_eq!(config.router.obstacle_search_ratio, 0.8);
        assert_eq!(config.spiral_max_radius, DEFAULT_SPIRAL_MAX_RADIUS);
    }

    #[test]
    fn rejects_padding_that_leaves_no_usable_span() {
        let err = LayoutConfig::from_toml_str("padding = 0.5").expect_err("padding 0.5 is invalid");
        assert!(matches!(err, ConfigError::Invalid { field: "padding", .. }), "{err}");
    }

    #[test]
    fn rejects_unbounded_ring_search() {
        let err = LayoutConfig::from_toml_str("spiral_max_radius = 2147483647")
            .expect_err("radius past the cap is invalid");
        assert!(matches!(err, ConfigError::Invalid { field: "spiral_max_radius", .. }), "{err}");
    }

    #[test]
    fn rejects_negative_router_values() {
        let err = LayoutConfig::from_toml_str("[router]\nwobble = -0.2")
            .expect_err("negative wobble is invalid");
        assert!(err.to_string().contains("router.wobble"), "{err}");
    }

    #[test]
    fn reports_parse_errors() {
        let err = LayoutConfig::from_toml_str("padding = \"wide\"").expect_err("type mismatch");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("layout.toml");
        fs::write(&path, "spiral_max_radius = 4\n[viewport]\nwidth = 1024.0\nheight = 768.0\n")
            .expect("write config");

        let config = LayoutConfig::load(&path).expect("load config");
        assert_eq!(config.spiral_max_radius, 4);
        assert_eq!(config.viewport, Viewport { width: 1024.0, height: 768.0 });

        let missing = LayoutConfig::load(&dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
