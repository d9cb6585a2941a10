//! Renderer configuration
//!
//! Each key is optional; leaving one out disables the matching subsystem.
//!
//! ```json
//! {
//!     "sky": "assets/textures/sky.jpg",
//!     "postprocess": "assets/shaders/postprocess/crash.frag",
//!     "energyPostProcess": "assets/shaders/postprocess/boost.frag"
//! }
//! ```

use crate::error::{RendererError, RendererResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Vertex shader of the fullscreen post-process triangle
pub const FULLSCREEN_VERTEX_SHADER: &str = "assets/shaders/fullscreen.vert";
/// Shader pair used to draw the sky sphere
pub const TEXTURED_VERTEX_SHADER: &str = "assets/shaders/textured.vert";
pub const TEXTURED_FRAGMENT_SHADER: &str = "assets/shaders/textured.frag";

/// Optional renderer subsystems
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RendererConfig {
    /// Sky texture; enables the sky sphere
    pub sky: Option<PathBuf>,
    /// Crash effect fragment shader; enables post-processing
    pub postprocess: Option<PathBuf>,
    /// Boost effect fragment shader; only used together with `postprocess`
    pub energy_post_process: Option<PathBuf>,
}

impl RendererConfig {
    pub fn from_json_str(json: &str) -> RendererResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_value(value: serde_json::Value) -> RendererResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> RendererResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| RendererError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn with_sky(mut self, texture: impl Into<PathBuf>) -> Self {
        self.sky = Some(texture.into());
        self
    }

    pub fn with_postprocess(mut self, fragment_shader: impl Into<PathBuf>) -> Self {
        self.postprocess = Some(fragment_shader.into());
        self
    }

    pub fn with_energy_postprocess(mut self, fragment_shader: impl Into<PathBuf>) -> Self {
        self.energy_post_process = Some(fragment_shader.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_keys() {
        let config = RendererConfig::from_json_str(
            r#"{
                "sky": "sky.jpg",
                "postprocess": "crash.frag",
                "energyPostProcess": "boost.frag"
            }"#,
        )
        .unwrap();
        assert_eq!(config.sky, Some(PathBuf::from("sky.jpg")));
        assert_eq!(config.postprocess, Some(PathBuf::from("crash.frag")));
        assert_eq!(config.energy_post_process, Some(PathBuf::from("boost.frag")));
    }

    #[test]
    fn missing_keys_disable_subsystems() {
        let config = RendererConfig::from_json_str("{}").unwrap();
        assert_eq!(config, RendererConfig::default());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config = RendererConfig::from_json_value(serde_json::json!({
            "sky": "sky.png",
            "clearColor": [0, 0, 0, 1]
        }))
        .unwrap();
        assert_eq!(config.sky, Some(PathBuf::from("sky.png")));
        assert!(config.postprocess.is_none());
    }

    #[test]
    fn wrong_type_is_a_config_error() {
        let err = RendererConfig::from_json_str(r#"{ "sky": 3 }"#).unwrap_err();
        assert!(matches!(err, RendererError::Config(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = RendererConfig::from_file("no/such/config.json").unwrap_err();
        assert!(matches!(err, RendererError::Io { .. }));
    }
}
