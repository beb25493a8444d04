//! Shared configuration for the flipbook
//!
//! This crate provides the single source of truth for window dimensions,
//! book geometry, camera and light settings and the feel tuning of the
//! turning core. Everything has a default; a JSON file and a couple of
//! environment variables can override it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use turning::{BookSpec, LayoutMode, PageGeometry, TurningConfig};

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;

/// Default window width in pixels
pub const DEFAULT_WIDTH: u32 = 1280;

/// Default window height in pixels
pub const DEFAULT_HEIGHT: u32 = 900;

/// Default scale factor (1.0 = no scaling)
pub const DEFAULT_SCALE: f32 = 1.0;

/// Path of a JSON file with a full or partial [`FlipbookConfig`]
pub const CONFIG_ENV: &str = "FLIPBOOK_CONFIG";

/// Overrides [`BookSettings::layout`] (`horizontal` or `vertical`)
pub const LAYOUT_ENV: &str = "FLIPBOOK_LAYOUT";

/// Overrides [`BookSettings::inner_pages`]
pub const PAGES_ENV: &str = "FLIPBOOK_PAGES";

/// Errors raised while loading the configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
    #[error("Invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: f32 },
}

/// Display configuration for window and rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct DisplayConfig {
    /// Window width in logical pixels
    pub width: u32,
    /// Window height in logical pixels
    pub height: u32,
    /// Scale factor for DPI scaling
    pub scale: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            scale: DEFAULT_SCALE,
        }
    }
}

/// Book geometry, in scene units (one unit per source pixel)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookSettings {
    /// Inner leaves between the covers
    pub inner_pages: usize,
    pub page_width: f32,
    pub page_height: f32,
    /// Thickness of an inner page at its free edge
    pub page_thickness: f32,
    /// Thickness of an inner page at the spine
    pub page_root_thickness: f32,
    /// `0` builds a book without covers
    pub cover_thickness: f32,
    /// How far the covers reach past the pages on each side
    pub cover_margin: f32,
    pub layout: LayoutMode,
}

impl Default for BookSettings {
    fn default() -> Self {
        Self {
            inner_pages: 8,
            page_width: 445.0,
            page_height: 720.0,
            page_thickness: 2.0,
            page_root_thickness: 4.0,
            cover_thickness: 10.0,
            cover_margin: 8.0,
            layout: LayoutMode::Horizontal,
        }
    }
}

impl BookSettings {
    pub fn page_geometry(&self) -> PageGeometry {
        PageGeometry {
            width: self.page_width,
            height: self.page_height,
            thickness: self.page_thickness,
            root_thickness: self.page_root_thickness,
        }
    }

    /// Covers are rigid: same thickness at the spine and at the edge.
    pub fn cover_geometry(&self) -> Option<PageGeometry> {
        (self.cover_thickness > 0.0).then(|| PageGeometry {
            width: self.page_width + self.cover_margin,
            height: self.page_height + self.cover_margin * 2.0,
            thickness: self.cover_thickness,
            root_thickness: self.cover_thickness,
        })
    }

    pub fn book_spec(&self) -> BookSpec {
        BookSpec {
            inner_pages: self.inner_pages,
            page: self.page_geometry(),
            cover: self.cover_geometry(),
            layout: self.layout,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("page_width", self.page_width),
            ("page_height", self.page_height),
            ("page_thickness", self.page_thickness),
            ("page_root_thickness", self.page_root_thickness),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        if !(self.cover_thickness >= 0.0) || !(self.cover_margin >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "cover",
                value: self.cover_thickness.min(self.cover_margin),
            });
        }
        Ok(())
    }
}

/// Perspective camera looking down at the book
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Vertical field of view in degrees
    pub angle: f32,
    pub distance: f32,
    pub near_clip: f32,
    pub far_clip: f32,
    /// Horizontal camera travel between viewing the left and the right
    /// page in the vertical layout, as a fraction of the page width
    pub shift_fraction: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            angle: 20.0,
            distance: 2500.0,
            near_clip: 0.1,
            far_clip: 3000.0,
            shift_fraction: 0.5,
        }
    }
}

/// Shadow-casting spot light above the book
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightSettings {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub near_clip: f32,
    pub far_clip: f32,
    /// Shadow map resolution
    pub map_size: usize,
    pub intensity: f32,
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 2500.0,
            near_clip: 100.0,
            far_clip: 5000.0,
            map_size: 2048,
            intensity: 4.0e9,
        }
    }
}

/// Full flipbook configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct FlipbookConfig {
    pub display: DisplayConfig,
    pub book: BookSettings,
    pub camera: CameraSettings,
    pub light: LightSettings,
    pub turning: TurningConfig,
}

impl FlipbookConfig {
    /// Parse a JSON document. Missing fields keep their defaults.
    pub fn from_json(json: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.book.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json, path)
    }

    /// Load from the file named by `FLIPBOOK_CONFIG` (defaults when unset),
    /// then apply the single-value overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_overrides(
            std::env::var(LAYOUT_ENV).ok().as_deref(),
            std::env::var(PAGES_ENV).ok().as_deref(),
        )?;
        Ok(config)
    }

    fn apply_overrides(
        &mut self,
        layout: Option<&str>,
        pages: Option<&str>,
    ) -> Result<(), ConfigError> {
        if let Some(layout) = layout {
            self.book.layout = match layout.trim() {
                "horizontal" => LayoutMode::Horizontal,
                "vertical" => LayoutMode::Vertical,
                other => {
                    return Err(ConfigError::InvalidEnv {
                        name: LAYOUT_ENV,
                        value: other.to_string(),
                    });
                }
            };
        }
        if let Some(pages) = pages {
            self.book.inner_pages =
                pages.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                    name: PAGES_ENV,
                    value: pages.to_string(),
                })?;
        }
        Ok(())
    }
}
