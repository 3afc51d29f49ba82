//! Structure contribution scan.
//!
//! Walks a faction's live structures and their upgrades and folds every
//! granted slot into a fresh status vector.

use crate::factions::Faction;
use crate::status::{apply_contribution, Contribution, SuperweaponStatus};
use crate::structures::Structure;
use crate::superweapons::slot_from_raw;

/// Resolve a raw slot granted by a structure.
///
/// The sentinel and out-of-range indices resolve to `None`.
#[must_use]
pub fn resolve_structure_slot(faction: &Faction, raw: i32) -> Option<usize> {
    let slot = slot_from_raw(raw)?;
    if slot < faction.superweapons.len() {
        Some(slot)
    } else {
        tracing::trace!(faction = faction.id.0, slot, "Ignoring out-of-range superweapon slot");
        None
    }
}

/// Resolve a raw slot granted by an upgrade.
///
/// Upgrades additionally respect the weapon type's faction restrictions.
#[must_use]
pub fn resolve_upgrade_slot(faction: &Faction, raw: i32) -> Option<usize> {
    let slot = resolve_structure_slot(faction, raw)?;
    faction.superweapons[slot]
        .kind
        .allows(faction.id)
        .then_some(slot)
}

/// Every slot a structure grants to `faction`, upgrades first.
pub fn granted_slots<'a>(
    faction: &'a Faction,
    structure: &'a Structure,
) -> impl Iterator<Item = usize> + 'a {
    let from_upgrades = structure
        .upgrades
        .iter()
        .flat_map(|upgrade| upgrade.superweapons.iter())
        .filter_map(move |&raw| resolve_upgrade_slot(faction, raw));
    let own = structure
        .superweapons
        .iter()
        .filter_map(move |&raw| resolve_structure_slot(faction, raw));
    from_upgrades.chain(own)
}

/// Collect per-slot contributions from a faction's structures.
///
/// A defeated faction contributes nothing. The result has one entry per
/// superweapon the faction holds.
#[must_use]
pub fn scan_contributions(faction: &Faction) -> Vec<SuperweaponStatus> {
    let mut statuses = vec![SuperweaponStatus::NONE; faction.superweapons.len()];

    if faction.defeated {
        return statuses;
    }

    for structure in faction.structures.iter().filter(|s| s.is_present()) {
        let contribution = Contribution::from_structure(structure);
        for slot in granted_slots(faction, structure) {
            apply_contribution(&mut statuses[slot], contribution);
        }
    }

    statuses
}
