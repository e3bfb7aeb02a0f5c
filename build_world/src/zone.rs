//! Named zones and teleporting between them.

use std::fmt;

use glam::Vec3;
use log::info;
use serde::{Deserialize, Serialize};

/// A named area of the world with a fixed offset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id:     String,
    pub name:   String,
    pub offset: Vec3,
}

impl Zone {
    pub fn new(id: &str, name: &str, offset: Vec3) -> Self {
        Zone { id: id.to_string(), name: name.to_string(), offset }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ZoneError {
    Empty,
    Duplicate(String),
    Unknown(String),
}

impl fmt::Display for ZoneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneError::Empty         => write!(f, "zone table is empty"),
            ZoneError::Duplicate(id) => write!(f, "zone '{}' is defined twice", id),
            ZoneError::Unknown(id)   => write!(f, "no zone called '{}'", id),
        }
    }
}

impl std::error::Error for ZoneError {}

/// Spacing between neighbouring zones in the default layout.
pub const ZONE_SPACING: f32 = 25.0;

/// Nine zones on a 3×3 layout, `zone1` at the origin.
///
/// ```text
/// zone7 (-25, 25)   zone4 (0, 25)   zone6 (25, 25)
/// zone2 (-25,  0)   zone1 (0,  0)   zone3 (25,  0)
/// zone9 (-25,-25)   zone5 (0,-25)   zone8 (25,-25)
/// ```
pub fn default_zones() -> Vec<Zone> {
    let s = ZONE_SPACING;
    vec![
        Zone::new("zone1", "Central Plaza",   Vec3::new(0.0, 0.0, 0.0)),
        Zone::new("zone2", "West District",   Vec3::new(-s, 0.0, 0.0)),
        Zone::new("zone3", "East District",   Vec3::new(s, 0.0, 0.0)),
        Zone::new("zone4", "North Park",      Vec3::new(0.0, 0.0, s)),
        Zone::new("zone5", "South Beach",     Vec3::new(0.0, 0.0, -s)),
        Zone::new("zone6", "NE Industrial",   Vec3::new(s, 0.0, s)),
        Zone::new("zone7", "NW Residential",  Vec3::new(-s, 0.0, s)),
        Zone::new("zone8", "SE Harbor",       Vec3::new(s, 0.0, -s)),
        Zone::new("zone9", "SW Mountain",     Vec3::new(-s, 0.0, -s)),
    ]
}

// ════════════════════════════════════════════════════════════════════════════
// ZoneMap — the table plus the current zone
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct ZoneMap {
    zones:   Vec<Zone>,
    current: usize,
}

impl Default for ZoneMap {
    fn default() -> Self {
        ZoneMap { zones: default_zones(), current: 0 }
    }
}

impl ZoneMap {
    /// Build from a table; the first zone is current.
    pub fn new(zones: Vec<Zone>) -> Result<Self, ZoneError> {
        validate(&zones)?;
        Ok(ZoneMap { zones, current: 0 })
    }

    pub fn zones(&self)   -> &[Zone] { &self.zones }
    pub fn current(&self) -> &Zone   { &self.zones[self.current] }
    pub fn offset(&self)  -> Vec3    { self.current().offset }

    pub fn get(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    /// Make `id` the current zone.  Unknown ids leave the current zone alone.
    pub fn teleport(&mut self, id: &str) -> Result<&Zone, ZoneError> {
        let idx = self.zones.iter().position(|z| z.id == id)
            .ok_or_else(|| ZoneError::Unknown(id.to_string()))?;
        self.current = idx;
        let zone = &self.zones[idx];
        info!("teleported to {} ({}) at {:?}", zone.name, zone.id, zone.offset);
        Ok(zone)
    }

    /// Id of the zone after the current one in table order, wrapping.
    pub fn next_id(&self) -> &str {
        &self.zones[(self.current + 1) % self.zones.len()].id
    }
}

pub fn validate(zones: &[Zone]) -> Result<(), ZoneError> {
    if zones.is_empty() {
        return Err(ZoneError::Empty);
    }
    for (i, z) in zones.iter().enumerate() {
        if zones[..i].iter().any(|o| o.id == z.id) {
            return Err(ZoneError::Duplicate(z.id.clone()));
        }
    }
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
