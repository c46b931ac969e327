//! Entity identifiers.
//!
//! Ships and scheduler processes get stable slotmap keys (cheap to copy,
//! safe against reuse after removal). Trucks are short-lived and never
//! looked up by ID after creation, so they get a plain incrementing counter
//! instead of an arena slot.

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies a ship in the simulation's ship arena. Stable for the
    /// ship's whole lifetime, from `arrive` through `finalize`.
    pub struct ShipId;

    /// Identifies a running scheduler process (ship, truck, generator, or
    /// monitor). Internal to the scheduler; never exposed in result tables.
    pub struct ProcessId;
}

/// Which kind of truck produced a [`TruckId`], used to render the
/// human-readable `truck_label` field on warehouse event rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TruckKind {
    Ordinary,
    Dedicated,
    WarehouseLoading,
}

impl TruckKind {
    fn prefix(self) -> &'static str {
        match self {
            TruckKind::Ordinary => "ordinary",
            TruckKind::Dedicated => "dedicated",
            TruckKind::WarehouseLoading => "warehouse",
        }
    }
}

/// Identifies a truck for logging purposes. Cheap to copy; sequence numbers
/// are assigned per-kind by [`crate::simulation::Simulation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TruckId {
    pub kind: TruckKind,
    pub sequence: u64,
}

impl TruckId {
    pub fn new(kind: TruckKind, sequence: u64) -> Self {
        Self { kind, sequence }
    }

    /// Render as e.g. `"dedicated-7"`, for the `truck_label` field of a
    /// warehouse event row.
    pub fn label(self) -> String {
        format!("{}-{}", self.kind.prefix(), self.sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truck_label_format() {
        let id = TruckId::new(TruckKind::Dedicated, 7);
        assert_eq!(id.label(), "dedicated-7");
    }

    #[test]
    fn truck_label_format_ordinary() {
        let id = TruckId::new(TruckKind::Ordinary, 42);
        assert_eq!(id.label(), "ordinary-42");
    }

    #[test]
    fn truck_label_format_warehouse() {
        let id = TruckId::new(TruckKind::WarehouseLoading, 3);
        assert_eq!(id.label(), "warehouse-3");
    }

    #[test]
    fn truck_id_equality_and_copy() {
        let a = TruckId::new(TruckKind::Ordinary, 1);
        let b = a; // Copy
        assert_eq!(a, b);
        let c = TruckId::new(TruckKind::Ordinary, 2);
        assert_ne!(a, c);
    }

    #[test]
    fn ship_id_slotmap_roundtrip() {
        let mut map: slotmap::SlotMap<ShipId, u32> = slotmap::SlotMap::with_key();
        let key = map.insert(100);
        assert_eq!(map[key], 100);
    }
}
