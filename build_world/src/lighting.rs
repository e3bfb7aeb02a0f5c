//! Lighting diagnostics for the renderer and HUD.

use std::fmt;

use glam::Vec3;

use crate::catalog::{CatalogKey, CityAsset};
use crate::world::WorldModel;

/// Placed suns beyond this many do not light the scene.
pub const MAX_SUN_LIGHTS: usize = 7;

pub const POOR_BRIGHTNESS: f32 = 50.0;
pub const GOOD_BRIGHTNESS: f32 = 100.0;

/// Positions of the placed city suns that act as point lights, oldest first.
pub fn sun_lights(world: &WorldModel) -> Vec<Vec3> {
    world.records().iter()
        .filter(|r| r.catalog_key() == Some(CatalogKey::City(CityAsset::Sun)))
        .take(MAX_SUN_LIGHTS)
        .map(|r| r.position)
        .collect()
}

/// How usable the camera image is for hand detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightingQuality { Unknown, Poor, Fair, Good }

impl LightingQuality {
    /// Classify mean frame luminance (0–255).
    pub fn classify(brightness: Option<f32>) -> Self {
        match brightness {
            None                           => LightingQuality::Unknown,
            Some(b) if b < POOR_BRIGHTNESS => LightingQuality::Poor,
            Some(b) if b < GOOD_BRIGHTNESS => LightingQuality::Fair,
            Some(_)                        => LightingQuality::Good,
        }
    }
}

impl fmt::Display for LightingQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LightingQuality::Unknown => "Unknown",
            LightingQuality::Poor    => "Poor - add light",
            LightingQuality::Fair    => "Fair",
            LightingQuality::Good    => "Good",
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SolarObject;
    use crate::mode::Mode;
    use crate::world::{PlacedItem, PlacementRecord};

    fn record(key: CatalogKey, x: f32) -> PlacementRecord {
        PlacementRecord {
            position: Vec3::new(x, 0.0, 0.0),
            mode:     Mode::City,
            item:     PlacedItem::Catalog(key),
            spec:     key.spec(),
            zone:     "zone1".into(),
        }
    }

    #[test]
    fn only_city_suns_are_lights() {
        let mut w = WorldModel::new();
        w.place(record(CatalogKey::City(CityAsset::Sun), 1.0));
        w.place(record(CatalogKey::Solar(SolarObject::Sun), 2.0));
        w.place(record(CatalogKey::City(CityAsset::Tree), 3.0));
        assert_eq!(sun_lights(&w), vec![Vec3::new(1.0, 0.0, 0.0)]);
    }

    #[test]
    fn sun_lights_are_capped() {
        let mut w = WorldModel::new();
        for i in 0..10 {
            w.place(record(CatalogKey::City(CityAsset::Sun), i as f32));
        }
        let lights = sun_lights(&w);
        assert_eq!(lights.len(), MAX_SUN_LIGHTS);
        assert_eq!(lights[0].x, 0.0);
    }

    #[test]
    fn brightness_thresholds() {
        assert_eq!(LightingQuality::classify(None), LightingQuality::Unknown);
        assert_eq!(LightingQuality::classify(Some(20.0)), LightingQuality::Poor);
        assert_eq!(LightingQuality::classify(Some(50.0)), LightingQuality::Fair);
        assert_eq!(LightingQuality::classify(Some(100.0)), LightingQuality::Good);
    }
}
