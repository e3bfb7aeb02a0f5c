//! # build_world
//!
//! Everything that decides *what* gets built and *where*:
//!
//! * [`catalog`] — closed catalogs of building parts, city assets and solar
//!   objects, each with a static visual spec table.
//! * [`mode`] — the build [`Mode`] and per-mode selection ([`ModeController`]).
//! * [`zone`] — named zones with world offsets and teleporting ([`ZoneMap`]).
//! * [`grid`] — cursor → snapped, levelled, zone-offset position
//!   ([`PlacementGrid`]).
//! * [`world`] — the append-only [`WorldModel`].
//! * [`lighting`] — sun lights and camera-image lighting quality.
//!
//! ```rust
//! use glam::Vec3;
//! use build_world::{PlacementGrid, ZoneMap};
//!
//! let grid  = PlacementGrid::default();          // 2-unit cells, snap on
//! let mut zones = ZoneMap::default();
//! zones.teleport("zone3").unwrap();             // offset (25, 0, 0)
//! let p = grid.resolve(Vec3::new(4.3, 0.0, -1.2), zones.offset());
//! assert_eq!(p, Vec3::new(29.0, 0.0, -2.0));
//! ```

pub mod catalog;
pub mod mode;
pub mod zone;
pub mod grid;
pub mod world;
pub mod lighting;

pub use catalog::{
    BuildingPart, CatalogKey, CityAsset, Color, ObjectSize, Shape, SolarObject, UnknownKey,
    VisualSpec,
};
pub use mode::{FreeformParams, Mode, ModeController, SelectError};
pub use zone::{default_zones, Zone, ZoneError, ZoneMap, ZONE_SPACING};
pub use grid::{GridConfig, PlacementGrid, Rounding};
pub use world::{PlacedItem, PlacementRecord, WorldModel};
pub use lighting::{sun_lights, LightingQuality};
