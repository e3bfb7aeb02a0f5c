//! Application configuration, loaded from RON.
//!
//! Every section is `#[serde(default)]`, so a file only needs the fields it
//! changes:
//!
//! ```ron
//! (
//!     gesture: (cooldown_ms: 250, repeat: Once),
//!     grid:    (cell_size: 1.0),
//!     start_mode: City,
//! )
//! ```

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use build_world::{zone, GridConfig, Mode, Zone, ZoneError};
use hand_gesture::{smoothing, ExtractorConfig, PinchConfig, RepeatPolicy, SmoothingError};
use serde::{Deserialize, Serialize};

use crate::camera::CameraConfig;

// ════════════════════════════════════════════════════════════════════════════
// ConfigError
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
    Serialize(ron::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<ron::Error> for ConfigError {
    fn from(e: ron::Error) -> Self {
        ConfigError::Serialize(e)
    }
}

impl From<ZoneError> for ConfigError {
    fn from(e: ZoneError) -> Self {
        ConfigError::Invalid(e.to_string())
    }
}

impl From<SmoothingError> for ConfigError {
    fn from(e: SmoothingError) -> Self {
        ConfigError::Invalid(e.to_string())
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e)        => write!(f, "IO error: {}", e),
            ConfigError::Parse(e)     => write!(f, "Parse error: {}", e),
            ConfigError::Serialize(e) => write!(f, "Serialize error: {}", e),
            ConfigError::Invalid(e)   => write!(f, "Invalid configuration: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e)        => Some(e),
            ConfigError::Parse(e)     => Some(e),
            ConfigError::Serialize(e) => Some(e),
            ConfigError::Invalid(_)   => None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureConfig
// ════════════════════════════════════════════════════════════════════════════

/// Pinch, spread and cursor tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub pinch_threshold:  f32,
    pub cooldown_ms:      u64,
    pub repeat:           RepeatPolicy,
    pub spread_scale:     f32,
    pub size_min:         f32,
    pub size_max:         f32,
    pub cursor_alpha:     f32,
    /// World-unit width of the area the fingertip sweeps across.
    pub workspace_extent: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        let pinch = PinchConfig::default();
        let extract = ExtractorConfig::default();
        GestureConfig {
            pinch_threshold:  pinch.threshold,
            cooldown_ms:      pinch.cooldown.as_millis() as u64,
            repeat:           pinch.repeat,
            spread_scale:     extract.spread_scale,
            size_min:         extract.size_min,
            size_max:         extract.size_max,
            cursor_alpha:     0.15,
            workspace_extent: 30.0,
        }
    }
}

impl GestureConfig {
    pub fn pinch(&self) -> PinchConfig {
        PinchConfig {
            threshold: self.pinch_threshold,
            cooldown:  Duration::from_millis(self.cooldown_ms),
            repeat:    self.repeat,
        }
    }

    pub fn extractor(&self) -> ExtractorConfig {
        ExtractorConfig {
            spread_scale: self.spread_scale,
            size_min:     self.size_min,
            size_max:     self.size_max,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gesture:    GestureConfig,
    pub grid:       GridConfig,
    pub camera:     CameraConfig,
    pub zones:      Vec<Zone>,
    pub start_mode: Mode,
    /// Controller ticks per second.
    pub tick_hz:    u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            gesture:    GestureConfig::default(),
            grid:       GridConfig::default(),
            camera:     CameraConfig::default(),
            zones:      zone::default_zones(),
            start_mode: Mode::default(),
            tick_hz:    30,
        }
    }
}

fn ordered(name: &str, (lo, hi): (f32, f32), strict: bool) -> Result<(), ConfigError> {
    let ok = lo.is_finite() && hi.is_finite() && if strict { lo < hi } else { lo <= hi };
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{} ({}, {}) is not an increasing range", name, lo, hi)))
    }
}

fn positive(name: &str, v: f32) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{} must be positive, got {}", name, v)))
    }
}

impl AppConfig {
    /// Read and validate a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    pub fn from_ron(s: &str) -> Result<Self, ConfigError> {
        let cfg: AppConfig = ron::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let pretty = ron::ser::PrettyConfig::new().indentor("    ".to_string());
        fs::write(path, ron::ser::to_string_pretty(self, pretty)?)?;
        Ok(())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_hz.max(1) as f64)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.gesture;
        positive("gesture.pinch_threshold", g.pinch_threshold)?;
        positive("gesture.spread_scale", g.spread_scale)?;
        positive("gesture.size_min", g.size_min)?;
        ordered("gesture size range", (g.size_min, g.size_max), false)?;
        positive("gesture.workspace_extent", g.workspace_extent)?;
        smoothing::check_alpha(g.cursor_alpha)?;

        positive("grid.cell_size", self.grid.cell_size)?;

        let c = &self.camera;
        ordered("camera.yaw_range", c.yaw_range, true)?;
        ordered("camera.pitch_range", c.pitch_range, true)?;
        ordered("camera.separation_range", c.separation_range, true)?;
        ordered("camera.distance_map", c.distance_map, false)?;
        ordered("camera.distance_bounds", c.distance_bounds, false)?;
        positive("camera.distance_bounds.0", c.distance_bounds.0)?;
        smoothing::check_alpha(c.alpha)?;

        zone::validate(&self.zones)?;

        if self.tick_hz == 0 {
            return Err(ConfigError::Invalid("tick_hz must be at least 1".into()));
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use build_world::Rounding;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let cfg = AppConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.gesture.pinch().cooldown, Duration::from_millis(400));
        assert_eq!(cfg.zones.len(), 9);
        assert_eq!(cfg.start_mode, Mode::Parts);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg = AppConfig::from_ron(
            "(gesture: (cooldown_ms: 250, repeat: Once), grid: (rounding: HalfToEven), start_mode: City)",
        ).unwrap();
        assert_eq!(cfg.gesture.cooldown_ms, 250);
        assert_eq!(cfg.gesture.repeat, RepeatPolicy::Once);
        assert_eq!(cfg.gesture.pinch_threshold, 0.05);
        assert_eq!(cfg.grid.rounding, Rounding::HalfToEven);
        assert_eq!(cfg.grid.cell_size, 2.0);
        assert_eq!(cfg.start_mode, Mode::City);
        assert_eq!(cfg.tick_hz, 30);
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("builder.ron");
        let mut cfg = AppConfig::default();
        cfg.tick_hz = 60;
        cfg.gesture.cursor_alpha = 0.3;
        cfg.save(&path).unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), cfg);
    }

    #[test]
    fn load_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "(tick_hz: \"fast\")").unwrap();
        assert!(matches!(AppConfig::load(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(AppConfig::load(dir.path().join("nope.ron")), Err(ConfigError::Io(_))));
    }

    #[test]
    fn rejects_bad_values() {
        let mut cfg = AppConfig::default();
        cfg.grid.cell_size = 0.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = AppConfig::default();
        cfg.camera.alpha = 1.5;
        assert!(cfg.validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.camera.distance_bounds = (25.0, 5.0);
        assert!(cfg.validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.tick_hz = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.zones.clear();
        assert!(cfg.validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.zones.push(cfg.zones[0].clone());
        assert!(cfg.validate().is_err());
    }
}
