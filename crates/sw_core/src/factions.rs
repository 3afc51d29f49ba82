//! Faction definitions and identifiers.

use serde::{Deserialize, Serialize};

use crate::structures::{EntityId, Structure};
use crate::superweapons::{Superweapon, SuperweaponType};

/// Unique identifier for factions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FactionId(pub u32);

/// A faction taking part in the simulation.
///
/// Owns one [`Superweapon`] per registered type, in slot order, and its
/// structures in a stable order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Faction {
    /// Faction identifier.
    pub id: FactionId,
    /// Display name.
    pub name: String,
    /// Superweapons indexed by slot.
    pub superweapons: Vec<Superweapon>,
    /// Owned structures.
    pub structures: Vec<Structure>,
    /// Eliminated from the match.
    pub defeated: bool,
    /// Power output covers demand.
    pub full_power: bool,
    /// Faction-wide charge-drain toggle.
    pub drain_active: bool,
    /// Buildable options must be re-evaluated.
    pub recheck_tech_tree: bool,
}

impl Faction {
    /// Create a faction with an ungranted superweapon for every type.
    #[must_use]
    pub fn new<'a>(
        id: FactionId,
        name: impl Into<String>,
        superweapon_types: impl IntoIterator<Item = &'a SuperweaponType>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            superweapons: superweapon_types
                .into_iter()
                .map(|kind| Superweapon::new(kind.clone(), id))
                .collect(),
            structures: Vec::new(),
            defeated: false,
            full_power: true,
            drain_active: false,
            recheck_tech_tree: false,
        }
    }

    /// Get the superweapon in `slot`.
    #[must_use]
    pub fn superweapon(&self, slot: usize) -> Option<&Superweapon> {
        self.superweapons.get(slot)
    }

    /// Get the superweapon in `slot` mutably.
    pub fn superweapon_mut(&mut self, slot: usize) -> Option<&mut Superweapon> {
        self.superweapons.get_mut(slot)
    }

    /// Get a structure by entity ID.
    #[must_use]
    pub fn structure(&self, id: EntityId) -> Option<&Structure> {
        self.structures.iter().find(|s| s.id == id)
    }

    /// Get a structure by entity ID mutably.
    pub fn structure_mut(&mut self, id: EntityId) -> Option<&mut Structure> {
        self.structures.iter_mut().find(|s| s.id == id)
    }

    /// Take ownership of a structure.
    pub fn add_structure(&mut self, structure: Structure) {
        self.structures.push(structure);
    }

    /// Remove structures that are no longer alive.
    pub fn remove_dead_structures(&mut self) -> Vec<EntityId> {
        let dead: Vec<EntityId> = self
            .structures
            .iter()
            .filter(|s| !s.alive)
            .map(|s| s.id)
            .collect();
        self.structures.retain(|s| s.alive);
        dead
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::StructureTypeId;
    use crate::superweapons::SuperweaponTypeId;

    fn types() -> Vec<SuperweaponType> {
        (0..3)
            .map(|i| SuperweaponType::new(SuperweaponTypeId(i), format!("sw{i}"), 100))
            .collect()
    }

    #[test]
    fn test_new_faction_has_one_weapon_per_type() {
        let types = types();
        let faction = Faction::new(FactionId(7), "Allies", &types);

        assert_eq!(faction.superweapons.len(), 3);
        for (slot, sw) in faction.superweapons.iter().enumerate() {
            assert_eq!(sw.slot(), slot);
            assert_eq!(sw.owner, FactionId(7));
            assert!(!sw.granted);
        }
    }

    #[test]
    fn test_remove_dead_structures() {
        let mut faction = Faction::new(FactionId(1), "Allies", &types());
        faction.add_structure(Structure::new(1, StructureTypeId(0), vec![]));
        faction.add_structure(Structure::new(2, StructureTypeId(0), vec![]));
        faction.structure_mut(1).unwrap().alive = false;

        assert_eq!(faction.remove_dead_structures(), vec![1]);
        assert!(faction.structure(1).is_none());
        assert!(faction.structure(2).is_some());
    }
}
