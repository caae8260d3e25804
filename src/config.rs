use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Key identifiers bound to each shuttle command.
///
/// Identifiers use the `KeyboardEvent.key` spelling (`" "`, `"ArrowLeft"`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyBindings {
    pub play_pause: Vec<String>,
    pub shuttle_backward: Vec<String>,
    pub shuttle_forward: Vec<String>,
    pub frame_backward: Vec<String>,
    pub frame_forward: Vec<String>,
    pub mark_in: Vec<String>,
    pub mark_out: Vec<String>,
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            play_pause: keys(&[" ", "k"]),
            shuttle_backward: keys(&["j"]),
            shuttle_forward: keys(&["l"]),
            frame_backward: keys(&["ArrowLeft"]),
            frame_forward: keys(&["ArrowRight"]),
            mark_in: keys(&["i"]),
            mark_out: keys(&["o"]),
        }
    }
}

/// Shuttle controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShuttleConfig {
    pub keys: KeyBindings,
    /// Frame-step multiplier while shift is held
    pub shift_magnification: f64,
    /// Target frame rate; the tick period is `1 / fps`
    pub fps: f64,
    pub playback_rates: Vec<f64>,
    pub in_time: Option<f64>,
    pub out_time: Option<f64>,
}

impl Default for ShuttleConfig {
    fn default() -> Self {
        Self {
            keys: KeyBindings::default(),
            shift_magnification: 10.0,
            fps: 30.0,
            playback_rates: vec![-10.0, -5.0, -2.0, -1.0, -0.5, 0.5, 1.0, 2.0, 5.0, 10.0],
            in_time: None,
            out_time: None,
        }
    }
}

impl ShuttleConfig {
    /// Duration of one frame in seconds
    pub fn frame_time(&self) -> f64 {
        1.0 / self.fps
    }

    /// Tick period for the shuttle clock
    pub fn frame_period(&self) -> Duration {
        Duration::from_secs_f64(self.frame_time())
    }

    /// Default config location (`<config dir>/shuttle-controls/config.json`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("shuttle-controls").join("config.json"))
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a config file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if !config.fps.is_finite() || config.fps <= 0.0 {
            return Err(ConfigError::InvalidFps {
                path: path.to_path_buf(),
                fps: config.fps,
            });
        }
        Ok(config)
    }

    /// Load from `path` (or the default location), falling back to defaults
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) if p.exists() => p,
                _ => {
                    debug!("No config file found, using defaults");
                    return Self::default();
                }
            },
        };

        match Self::load(&path) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ShuttleConfig::default();
        assert_eq!(config.fps, 30.0);
        assert_eq!(config.shift_magnification, 10.0);
        assert_eq!(config.playback_rates.len(), 10);
        assert_eq!(config.keys.play_pause, vec![" ".to_string(), "k".to_string()]);
        assert!(config.in_time.is_none());
        assert!(config.out_time.is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ShuttleConfig::from_json(
            r#"{ "fps": 25, "inTime": 3.5, "keys": { "markIn": ["["] } }"#,
        )
        .unwrap();

        assert_eq!(config.fps, 25.0);
        assert_eq!(config.in_time, Some(3.5));
        assert_eq!(config.keys.mark_in, vec!["[".to_string()]);
        assert_eq!(config.keys.mark_out, vec!["o".to_string()]);
        assert_eq!(config.shift_magnification, 10.0);
    }

    #[test]
    fn test_frame_period() {
        let config = ShuttleConfig { fps: 50.0, ..Default::default() };
        assert_eq!(config.frame_period(), Duration::from_millis(20));
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let path = Path::new("/nonexistent/shuttle-controls.json");
        assert!(matches!(ShuttleConfig::load(path), Err(ConfigError::Io { .. })));
        assert_eq!(ShuttleConfig::load_or_default(Some(path)), ShuttleConfig::default());
    }

    #[test]
    fn test_load_invalid_json() {
        let path = std::env::temp_dir().join("shuttle-controls-invalid-config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(ShuttleConfig::load(&path), Err(ConfigError::Parse { .. })));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_non_positive_fps() {
        let path = std::env::temp_dir().join("shuttle-controls-zero-fps.json");
        fs::write(&path, r#"{ "fps": 0, "shiftMagnification": 4 }"#).unwrap();

        assert!(matches!(
            ShuttleConfig::load(&path),
            Err(ConfigError::InvalidFps { fps, .. }) if fps == 0.0
        ));
        let config = ShuttleConfig::load_or_default(Some(&path));
        assert_eq!(config, ShuttleConfig::default());
        assert_eq!(config.frame_period(), Duration::from_secs_f64(1.0 / 30.0));
        let _ = fs::remove_file(&path);
    }
}
