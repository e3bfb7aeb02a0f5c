//! The authoritative, append-only record of everything placed.

use glam::Vec3;
use log::info;

use crate::catalog::{CatalogKey, VisualSpec};
use crate::mode::{FreeformParams, Mode};

/// What was built: a catalog entry or a free-form cube.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlacedItem {
    Catalog(CatalogKey),
    Freeform(FreeformParams),
}

/// One placed object.  Never mutated after creation.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementRecord {
    /// Snapped, levelled, zone-offset world position.
    pub position: Vec3,
    pub mode:     Mode,
    pub item:     PlacedItem,
    pub spec:     VisualSpec,
    /// Id of the zone that was current at placement time.
    pub zone:     String,
}

impl PlacementRecord {
    pub fn catalog_key(&self) -> Option<CatalogKey> {
        match self.item {
            PlacedItem::Catalog(k)  => Some(k),
            PlacedItem::Freeform(_) => None,
        }
    }
}

/// Ordered placement records.  Only [`WorldModel::clear`] ever removes any.
#[derive(Clone, Debug, Default)]
pub struct WorldModel {
    records: Vec<PlacementRecord>,
}

impl WorldModel {
    pub fn new() -> Self {
        WorldModel::default()
    }

    /// Append a record and return its index.
    pub fn place(&mut self, record: PlacementRecord) -> usize {
        info!(
            "placed {} at ({:.1}, {:.1}, {:.1}) in {}",
            record.spec.name, record.position.x, record.position.y, record.position.z, record.zone
        );
        self.records.push(record);
        self.records.len() - 1
    }

    /// Remove everything.  Returns how many records were dropped.
    pub fn clear(&mut self) -> usize {
        let n = self.records.len();
        self.records.clear();
        info!("scene cleared ({} objects)", n);
        n
    }

    pub fn records(&self) -> &[PlacementRecord] { &self.records }
    pub fn len(&self)      -> usize             { self.records.len() }
    pub fn is_empty(&self) -> bool              { self.records.is_empty() }

    pub fn in_zone<'a>(&'a self, zone: &'a str) -> impl Iterator<Item = &'a PlacementRecord> + 'a {
        self.records.iter().filter(move |r| r.zone == zone)
    }

    pub fn count_in_zone(&self, zone: &str) -> usize {
        self.in_zone(zone).count()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
