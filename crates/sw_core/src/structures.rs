//! Structures owned by a faction.
//!
//! Structures are external simulation objects; this module only models
//! the facts the superweapon and power passes read from them.

use serde::{Deserialize, Serialize};

/// Unique identifier for entities (structures and units).
pub type EntityId = u64;

/// Unique identifier for structure types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StructureTypeId(pub u32);

impl StructureTypeId {
    /// Create a new structure type ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Activity a structure is currently performing or has queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mission {
    /// No activity.
    #[default]
    Sleep,
    /// Idle but alert.
    Guard,
    /// Being built up after placement.
    Construction,
    /// Being sold back.
    Selling,
    /// Being repaired.
    Repair,
    /// Releasing produced units.
    Unload,
}

impl Mission {
    /// Whether this activity prevents granted superweapons from charging.
    #[must_use]
    pub const fn blocks_charging(self) -> bool {
        matches!(self, Self::Construction | Self::Selling)
    }
}

/// An upgrade installed onto a structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Upgrade {
    /// The upgrade's structure type.
    pub type_id: StructureTypeId,
    /// Raw superweapon slots granted by the upgrade (`-1` = none).
    pub superweapons: Vec<i32>,
}

/// A structure owned by a faction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Structure {
    /// Entity identifier.
    pub id: EntityId,
    /// Structure type.
    pub type_id: StructureTypeId,
    /// Not destroyed.
    pub alive: bool,
    /// Temporarily removed from the map.
    pub in_limbo: bool,
    /// Receives power from the faction grid.
    pub has_power: bool,
    /// Switched off by its owner.
    pub powered_down: bool,
    /// Disabled by an EMP effect.
    pub emp_disabled: bool,
    /// Being removed by a warp effect.
    pub warping_out: bool,
    /// Crew or pilot requirements are met.
    pub operated: bool,
    /// Current activity.
    pub current_mission: Mission,
    /// Activity queued after the current one.
    pub queued_mission: Mission,
    /// Raw superweapon slots granted by the structure itself (`-1` = none).
    pub superweapons: Vec<i32>,
    /// Installed upgrades, in installation order.
    pub upgrades: Vec<Upgrade>,
}

impl Structure {
    /// Create a live, powered, operated structure with no activity.
    #[must_use]
    pub fn new(id: EntityId, type_id: StructureTypeId, superweapons: Vec<i32>) -> Self {
        Self {
            id,
            type_id,
            alive: true,
            in_limbo: false,
            has_power: true,
            powered_down: false,
            emp_disabled: false,
            warping_out: false,
            operated: true,
            current_mission: Mission::Guard,
            queued_mission: Mission::Sleep,
            superweapons,
            upgrades: Vec::new(),
        }
    }

    /// Whether the structure is on the map and alive.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.alive && !self.in_limbo
    }

    /// Whether the structure's power feed is switched on and supplied.
    #[must_use]
    pub const fn is_power_online(&self) -> bool {
        self.has_power && !self.powered_down
    }

    /// Whether the structure can power-source the superweapons it grants.
    #[must_use]
    pub const fn sources_superweapon_power(&self) -> bool {
        self.has_power && !self.emp_disabled && self.operated
    }

    /// Whether the structure lets powered superweapons accumulate charge.
    #[must_use]
    pub const fn allows_charging(&self) -> bool {
        !self.warping_out
            && !self.current_mission.blocks_charging()
            && !self.queued_mission.blocks_charging()
    }

    /// Whether the structure keeps dependent units running.
    #[must_use]
    pub const fn supplies_unit_power(&self) -> bool {
        self.alive
            && !self.warping_out
            && !self.emp_disabled
            && self.operated
            && self.is_power_online()
    }

    /// Install an upgrade.
    pub fn add_upgrade(&mut self, upgrade: Upgrade) {
        self.upgrades.push(upgrade);
    }
}
