//! Placement grid: smoothed cursor → snapped, levelled, zone-offset position.
//!
//! Resolution runs in a fixed order:
//!
//! 1. snap X and Z to the nearest multiple of the cell size (if enabled);
//! 2. set Y to `level × cell size`;
//! 3. add the current zone's offset.
//!
//! The same [`PlacementGrid::resolve`] call produces both the live preview and
//! the authoritative placement position.

use glam::Vec3;
use log::info;
use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// Rounding
// ════════════════════════════════════════════════════════════════════════════

/// Tie-break for a coordinate exactly halfway between two cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rounding {
    /// 2.5 → 3, -2.5 → -3.
    #[default]
    HalfAwayFromZero,
    /// 2.5 → 2, 3.5 → 4.
    HalfToEven,
}

impl Rounding {
    pub fn round(self, v: f32) -> f32 {
        match self {
            Rounding::HalfAwayFromZero => v.round(),
            Rounding::HalfToEven       => v.round_ties_even(),
        }
    }
}

/// Nearest multiple of `cell` to `v`.
pub fn snap_coord(v: f32, cell: f32, rounding: Rounding) -> f32 {
    rounding.round(v / cell) * cell
}

// ════════════════════════════════════════════════════════════════════════════
// GridConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Edge length of one cell; also the height of one level.
    pub cell_size: f32,
    pub max_level: u32,
    pub rounding:  Rounding,
    /// Snapping state at start-up.
    pub snap:      bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            cell_size: 2.0,
            max_level: 10,
            rounding:  Rounding::HalfAwayFromZero,
            snap:      true,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PlacementGrid
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct PlacementGrid {
    config:  GridConfig,
    snap:    bool,
    level:   u32,
    visible: bool,
    /// Zone floor lines, drawn under the placement grid.
    floor:   bool,
}

impl Default for PlacementGrid {
    fn default() -> Self {
        PlacementGrid::new(GridConfig::default())
    }
}

impl PlacementGrid {
    pub fn new(config: GridConfig) -> Self {
        PlacementGrid { snap: config.snap, config, level: 0, visible: true, floor: true }
    }

    pub fn config(&self)       -> &GridConfig { &self.config }
    pub fn snap_enabled(&self) -> bool        { self.snap }
    pub fn level(&self)        -> u32         { self.level }
    pub fn is_visible(&self)   -> bool        { self.visible }
    pub fn floor_visible(&self) -> bool       { self.floor }
    pub fn cell_size(&self)    -> f32         { self.config.cell_size }

    /// Height of the current level in world units.
    pub fn elevation(&self) -> f32 {
        self.level as f32 * self.config.cell_size
    }

    /// Snap the horizontal components of `p`.  Y passes through.
    pub fn snap(&self, p: Vec3) -> Vec3 {
        let c = self.config.cell_size;
        let r = self.config.rounding;
        Vec3::new(snap_coord(p.x, c, r), p.y, snap_coord(p.z, c, r))
    }

    /// Zone-local cell for a smoothed cursor position.
    pub fn local(&self, cursor: Vec3) -> Vec3 {
        let horizontal = if self.snap { self.snap(cursor) } else { cursor };
        Vec3::new(horizontal.x, self.elevation(), horizontal.z)
    }

    /// World position for a smoothed cursor in the zone at `zone_offset`.
    pub fn resolve(&self, cursor: Vec3, zone_offset: Vec3) -> Vec3 {
        self.local(cursor) + zone_offset
    }

    pub fn toggle_snap(&mut self) -> bool {
        self.snap = !self.snap;
        info!("grid snap {}", if self.snap { "on" } else { "off" });
        self.snap
    }

    pub fn toggle_visible(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn toggle_floor(&mut self) -> bool {
        self.floor = !self.floor;
        self.floor
    }

    /// One level up, clamped at `max_level`.  Returns whether the level moved.
    pub fn raise(&mut self) -> bool {
        if self.level >= self.config.max_level {
            return false;
        }
        self.level += 1;
        info!("height level {} ({} m)", self.level, self.elevation());
        true
    }

    /// One level down, clamped at 0.  Returns whether the level moved.
    pub fn lower(&mut self) -> bool {
        if self.level == 0 {
            return false;
        }
        self.level -= 1;
        info!("height level {} ({} m)", self.level, self.elevation());
        true
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_a_snaps_to_nearest_cell() {
        let g = PlacementGrid::default();
        let p = g.resolve(Vec3::new(4.3, 7.7, -1.2), Vec3::ZERO);
        assert_eq!(p, Vec3::new(4.0, 0.0, -2.0));
    }

    #[test]
    fn ties_round_away_from_zero_by_default() {
        assert_eq!(snap_coord(3.0, 2.0, Rounding::HalfAwayFromZero), 4.0);
        assert_eq!(snap_coord(-3.0, 2.0, Rounding::HalfAwayFromZero), -4.0);
        assert_eq!(snap_coord(1.0, 2.0, Rounding::HalfAwayFromZero), 2.0);
    }

    #[test]
    fn ties_round_to_even_when_configured() {
        assert_eq!(snap_coord(3.0, 2.0, Rounding::HalfToEven), 4.0);
        assert_eq!(snap_coord(1.0, 2.0, Rounding::HalfToEven), 0.0);
        assert_eq!(snap_coord(-1.0, 2.0, Rounding::HalfToEven), 0.0);
    }

    #[test]
    fn snap_is_idempotent() {
        for rounding in [Rounding::HalfAwayFromZero, Rounding::HalfToEven] {
            for &cell in &[0.5_f32, 1.0, 2.0, 2.5] {
                let g = PlacementGrid::new(GridConfig { cell_size: cell, rounding, ..GridConfig::default() });
                let mut v = -37.3_f32;
                while v < 37.3 {
                    let p = Vec3::new(v, 1.0, -v * 0.7);
                    let once = g.snap(p);
                    assert_eq!(g.snap(once), once, "cell {} at {}", cell, v);
                    v += 0.37;
                }
            }
        }
    }

    #[test]
    fn snap_disabled_keeps_horizontal_but_levels_y() {
        let mut g = PlacementGrid::default();
        g.toggle_snap();
        g.raise();
        let p = g.resolve(Vec3::new(4.3, 9.0, -1.2), Vec3::ZERO);
        assert_eq!(p, Vec3::new(4.3, 2.0, -1.2));
    }

    #[test]
    fn zone_offset_is_added_last() {
        let mut g = PlacementGrid::default();
        g.raise();
        g.raise();
        let p = g.resolve(Vec3::new(4.3, 0.0, -1.2), Vec3::new(25.0, 0.0, -25.0));
        assert_eq!(p, Vec3::new(29.0, 4.0, -27.0));
    }

    #[test]
    fn height_clamps_at_both_ends() {
        let mut g = PlacementGrid::default();
        assert!(!g.lower());
        assert_eq!(g.level(), 0);
        let moved = (0..25).filter(|_| g.raise()).count();
        assert_eq!(moved, 10);
        assert_eq!(g.level(), 10);
        assert!(!g.raise());
        for _ in 0..25 { g.lower(); }
        assert_eq!(g.level(), 0);
    }

    #[test]
    fn visibility_toggles() {
        let mut g = PlacementGrid::default();
        assert!(g.is_visible());
        assert!(!g.toggle_visible());
        assert!(g.toggle_visible());
    }

    #[test]
    fn floor_toggles_independently() {
        let mut g = PlacementGrid::default();
        assert!(g.floor_visible());
        assert!(!g.toggle_floor());
        assert!(g.is_visible());
        assert!(!g.toggle_visible());
        assert!(!g.floor_visible());
    }
}
