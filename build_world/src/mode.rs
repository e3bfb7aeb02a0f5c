//! Build modes and per-mode selection.
//!
//! [`Mode`] decides *what* a place event builds.  It changes only on explicit
//! commands and is independent of how many hands are in view.

use std::fmt;
use std::str::FromStr;

use log::info;
use serde::{Deserialize, Serialize};

use crate::catalog::{
    BuildingPart, CatalogKey, CityAsset, Color, ObjectSize, Shape, SolarObject, VisualSpec,
};
use glam::Vec3;

// ════════════════════════════════════════════════════════════════════════════
// Mode
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Cubes sized by hand spread.
    Free,
    /// Walls, windows, roofs …
    #[default]
    Parts,
    /// Roads, houses, street furniture.
    City,
    /// Planets.
    Solar,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Free, Mode::Parts, Mode::City, Mode::Solar];

    pub fn name(self) -> &'static str {
        match self {
            Mode::Free  => "Free Build",
            Mode::Parts => "Building Blocks",
            Mode::City  => "City Builder",
            Mode::Solar => "Solar System",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Mode::Free  => "free",
            Mode::Parts => "parts",
            Mode::City  => "city",
            Mode::Solar => "solar",
        }
    }
}

impl FromStr for Mode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free"                => Ok(Mode::Free),
            "parts" | "building"  => Ok(Mode::Parts),
            "city"                => Ok(Mode::City),
            "solar"               => Ok(Mode::Solar),
            other => Err(format!("unknown build mode '{}'", other)),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Free-form parameters
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FreeformParams {
    /// Cube edge length in world units.
    pub size:  f32,
    pub color: Color,
}

impl Default for FreeformParams {
    fn default() -> Self {
        FreeformParams { size: 1.0, color: Color::CYAN }
    }
}

impl FreeformParams {
    pub fn spec(&self) -> VisualSpec {
        VisualSpec {
            name:  "Cube",
            shape: Shape::Cube,
            size:  ObjectSize::Extents(Vec3::splat(self.size)),
            color: self.color,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Selection errors
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectError {
    /// The key belongs to another mode's catalog.
    WrongFamily { mode: Mode, key: CatalogKey },
    /// The string is not a key of the active mode's catalog.
    UnknownKey { mode: Mode, key: String },
    /// Free mode has no catalog to select from.
    NoCatalog,
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectError::WrongFamily { mode, key } => write!(
                f, "{} belongs to the {} catalog, not {}", key, key.family(), mode
            ),
            SelectError::UnknownKey { mode, key } => {
                write!(f, "'{}' is not available in {}", key, mode)
            }
            SelectError::NoCatalog => write!(f, "free build has no catalog"),
        }
    }
}

impl std::error::Error for SelectError {}

// ════════════════════════════════════════════════════════════════════════════
// ModeController
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct ModeController {
    mode:     Mode,
    part:     BuildingPart,
    city:     CityAsset,
    solar:    SolarObject,
    freeform: FreeformParams,
    /// Free-form size bounds, shared with the gesture extractor.
    size_range: (f32, f32),
}

impl Default for ModeController {
    fn default() -> Self {
        ModeController::new(Mode::default(), (0.5, 5.0))
    }
}

impl ModeController {
    pub fn new(mode: Mode, size_range: (f32, f32)) -> Self {
        ModeController {
            mode,
            part:     BuildingPart::Wall,
            city:     CityAsset::Road,
            solar:    SolarObject::Earth,
            freeform: FreeformParams::default(),
            size_range,
        }
    }

    pub fn mode(&self)     -> Mode           { self.mode }
    pub fn freeform(&self) -> FreeformParams { self.freeform }

    /// Switch mode.  Selections, zone, level and world are left alone.
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        if self.mode == mode {
            return false;
        }
        info!("mode: {} → {}", self.mode, mode);
        self.mode = mode;
        true
    }

    /// Active selection, `None` in free mode.
    pub fn current_key(&self) -> Option<CatalogKey> {
        match self.mode {
            Mode::Free  => None,
            Mode::Parts => Some(CatalogKey::Part(self.part)),
            Mode::City  => Some(CatalogKey::City(self.city)),
            Mode::Solar => Some(CatalogKey::Solar(self.solar)),
        }
    }

    /// Select `key` in the active mode's catalog.
    ///
    /// Returns `Ok(true)` if the selection changed.  On error the previous
    /// selection is kept.
    pub fn select(&mut self, key: CatalogKey) -> Result<bool, SelectError> {
        let changed = match (self.mode, key) {
            (Mode::Parts, CatalogKey::Part(p))  => replace(&mut self.part, p),
            (Mode::City,  CatalogKey::City(c))  => replace(&mut self.city, c),
            (Mode::Solar, CatalogKey::Solar(s)) => replace(&mut self.solar, s),
            (Mode::Free, _) => return Err(SelectError::NoCatalog),
            (mode, key)     => return Err(SelectError::WrongFamily { mode, key }),
        };
        if changed {
            info!("selected {}", key.spec().name);
        }
        Ok(changed)
    }

    /// Parse `raw` as a key of the active mode's catalog and select it.
    pub fn select_str(&mut self, raw: &str) -> Result<bool, SelectError> {
        let unknown = |mode| SelectError::UnknownKey { mode, key: raw.to_string() };
        let key = match self.mode {
            Mode::Free  => return Err(SelectError::NoCatalog),
            Mode::Parts => raw.parse().map(CatalogKey::Part).map_err(|_| unknown(self.mode))?,
            Mode::City  => raw.parse().map(CatalogKey::City).map_err(|_| unknown(self.mode))?,
            Mode::Solar => raw.parse().map(CatalogKey::Solar).map_err(|_| unknown(self.mode))?,
        };
        self.select(key)
    }

    /// Step the active catalog forward (`true`) or back, wrapping.
    pub fn cycle(&mut self, forward: bool) -> Option<CatalogKey> {
        let key = match self.current_key()? {
            CatalogKey::Part(p)  => CatalogKey::Part(if forward { p.next() } else { p.prev() }),
            CatalogKey::City(c)  => CatalogKey::City(if forward { c.next() } else { c.prev() }),
            CatalogKey::Solar(s) => CatalogKey::Solar(if forward { s.next() } else { s.prev() }),
        };
        self.select(key).ok()?;
        Some(key)
    }

    pub fn set_freeform_size(&mut self, size: f32) {
        let (lo, hi) = self.size_range;
        self.freeform.size = size.clamp(lo, hi);
    }

    pub fn set_freeform_color(&mut self, color: Color) -> bool {
        if self.freeform.color == color {
            return false;
        }
        self.freeform.color = color;
        true
    }

    /// Visual attributes of what a place event would build right now.
    pub fn current_spec(&self) -> VisualSpec {
        match self.current_key() {
            Some(key) => key.spec(),
            None      => self.freeform.spec(),
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_parts_with_wall() {
        let m = ModeController::default();
        assert_eq!(m.mode(), Mode::Parts);
        assert_eq!(m.current_key(), Some(CatalogKey::Part(BuildingPart::Wall)));
    }

    #[test]
    fn set_mode_reports_change() {
        let mut m = ModeController::default();
        assert!(m.set_mode(Mode::Solar));
        assert!(!m.set_mode(Mode::Solar));
    }

    #[test]
    fn selection_survives_mode_round_trip() {
        let mut m = ModeController::default();
        m.set_mode(Mode::City);
        assert_eq!(m.select(CatalogKey::City(CityAsset::Fountain)), Ok(true));
        m.set_mode(Mode::Solar);
        m.set_mode(Mode::City);
        assert_eq!(m.current_key(), Some(CatalogKey::City(CityAsset::Fountain)));
    }

    #[test]
    fn foreign_key_is_rejected_and_selection_kept() {
        let mut m = ModeController::default();
        let err = m.select(CatalogKey::Solar(SolarObject::Mars)).unwrap_err();
        assert!(matches!(err, SelectError::WrongFamily { mode: Mode::Parts, .. }));
        assert_eq!(m.current_key(), Some(CatalogKey::Part(BuildingPart::Wall)));
    }

    #[test]
    fn unknown_string_is_rejected() {
        let mut m = ModeController::default();
        m.set_mode(Mode::Solar);
        let err = m.select_str("pluto").unwrap_err();
        assert_eq!(err, SelectError::UnknownKey { mode: Mode::Solar, key: "pluto".into() });
        assert_eq!(m.current_key(), Some(CatalogKey::Solar(SolarObject::Earth)));
        assert_eq!(m.select_str("Saturn"), Ok(true));
    }

    #[test]
    fn free_mode_has_no_catalog() {
        let mut m = ModeController::new(Mode::Free, (0.5, 5.0));
        assert_eq!(m.select_str("wall"), Err(SelectError::NoCatalog));
        assert_eq!(m.cycle(true), None);
        assert_eq!(m.current_spec().shape, Shape::Cube);
    }

    #[test]
    fn freeform_size_is_clamped_and_drives_spec() {
        let mut m = ModeController::new(Mode::Free, (0.5, 5.0));
        m.set_freeform_size(9.0);
        assert_eq!(m.freeform().size, 5.0);
        m.set_freeform_size(2.0);
        assert_eq!(m.current_spec().size, ObjectSize::Extents(Vec3::splat(2.0)));
    }

    #[test]
    fn cycle_walks_the_catalog() {
        let mut m = ModeController::default();
        assert_eq!(m.cycle(true), Some(CatalogKey::Part(BuildingPart::Window)));
        assert_eq!(m.cycle(false), Some(CatalogKey::Part(BuildingPart::Wall)));
        assert_eq!(m.cycle(false), Some(CatalogKey::Part(BuildingPart::Balcony)));
    }

    #[test]
    fn spec_follows_mode() {
        let mut m = ModeController::default();
        assert_eq!(m.current_spec().name, "Wall");
        m.set_mode(Mode::Solar);
        assert_eq!(m.current_spec().name, "Earth");
        assert_eq!(m.current_spec().shape, Shape::Sphere);
    }

    #[test]
    fn mode_parses() {
        assert_eq!("building".parse::<Mode>(), Ok(Mode::Parts));
        assert_eq!("SOLAR".parse::<Mode>(), Ok(Mode::Solar));
        assert!("space".parse::<Mode>().is_err());
    }
}
