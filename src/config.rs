//! Render settings shared by the frame renderer, the projector and the viewer

use std::f32::consts::PI;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::raycast::{GridDda, MarchAlgorithm, RayCaster, StepMarcher};

/// Tunable render parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Number of rays (screen columns) per frame
    pub screen_width: usize,
    /// Screen height in pixels
    pub screen_height: usize,
    /// Pixels per column when rasterizing
    pub column_width: usize,
    /// World units per grid cell
    pub tile_size: f32,
    /// Horizontal field of view in radians
    pub fov: f32,
    /// Rays give up beyond this distance (world units)
    pub max_distance: f32,
    /// March increment for the step marcher (world units)
    pub step_size: f32,
    /// Shade lost per world unit of distance
    pub falloff_rate: f32,
    /// Scale wall distance by cos(offset) before projecting
    pub fisheye_correction: bool,
    /// Draw columns whose ray found no wall (short, dark slices)
    pub draw_misses: bool,
    pub algorithm: MarchAlgorithm,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            screen_width: 320,
            screen_height: 400,
            column_width: 2,
            tile_size: 64.0,
            fov: PI / 3.0,
            max_distance: 2000.0,
            step_size: 0.5,
            falloff_rate: 0.4,
            fisheye_correction: true,
            draw_misses: true,
            algorithm: MarchAlgorithm::Step,
        }
    }
}

impl RenderConfig {
    /// Load and validate settings from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config = Self::from_json(&contents)?;
        log::info!("Loaded render config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate settings from a JSON string; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.screen_width == 0 || self.screen_height == 0 || self.column_width == 0 {
            return invalid("screen dimensions must be non-zero");
        }
        if !(self.tile_size > 0.0) {
            return invalid("tile_size must be positive");
        }
        if !(self.fov > 0.0 && self.fov < PI) {
            return invalid("fov must be in (0, π)");
        }
        if !(self.step_size > 0.0) {
            return invalid("step_size must be positive");
        }
        if !(self.max_distance >= self.step_size) {
            return invalid("max_distance must be at least step_size");
        }
        if !(self.falloff_rate >= 0.0) {
            return invalid("falloff_rate must be non-negative");
        }
        Ok(())
    }

    /// Window width in pixels
    pub fn pixel_width(&self) -> usize {
        self.screen_width * self.column_width
    }

    /// Build the caster selected by `algorithm`
    pub fn caster(&self) -> Box<dyn RayCaster> {
        match self.algorithm {
            MarchAlgorithm::Step => {
                Box::new(StepMarcher::new(self.tile_size, self.step_size, self.max_distance))
            }
            MarchAlgorithm::Dda => Box::new(GridDda::new(self.tile_size, self.max_distance)),
        }
    }
}

/// Configuration error type
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// File I/O error
    Io(String),
    /// JSON parsing error
    Parse(String),
    /// Value out of range
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "IO error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
