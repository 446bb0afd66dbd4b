//! Renderer configuration, loadable from a TOML file.

use std::path::Path;

use serde::Deserialize;

use crate::camera::OrbitCamera;

/// Side length of the square render target in pixels.
pub const DEFAULT_TARGET_SIZE: u32 = 1024;

/// Everything the renderer needs before `init`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Side length of the square render target; independent of the surface size
    pub target_size: u32,
    /// Worker threads for the per-pixel loop, 0 for one per core
    pub threads: usize,
    /// Initial camera placement
    pub camera: OrbitCamera,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            threads: 0,
            camera: OrbitCamera::default(),
        }
    }
}

impl RenderConfig {
    /// Read a config file. Missing keys take their default values.
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        let config = Self::from_toml(&text)
            .map_err(|e| format!("invalid config at {}: {e}", path.display()))?;
        config
            .camera
            .validate()
            .map_err(|e| format!("invalid config at {}: {e}", path.display()))?;
        Ok(config)
    }

    /// Parse a config from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
