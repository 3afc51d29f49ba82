//! Faction-wide status overrides.
//!
//! Applies match policy and the faction's power economy on top of the
//! structure scan, producing the final statuses for one evaluation.

use crate::context::GameSettings;
use crate::factions::Faction;
use crate::scanner::scan_contributions;
use crate::status::SuperweaponStatus;

/// Apply policy and power overrides to scanned statuses.
///
/// Shell-disabled weapons lose every flag. Powered weapons lose
/// `power_sourced` while the faction is short on power; `charging` is left
/// as scanned and must be read through
/// [`SuperweaponStatus::effective_charging`].
pub fn apply_faction_overrides(
    faction: &Faction,
    settings: &GameSettings,
    statuses: &mut [SuperweaponStatus],
) {
    let shell_disabled = settings.shell_disables_superweapons();

    for weapon in &faction.superweapons {
        let Some(status) = statuses.get_mut(weapon.slot()) else {
            continue;
        };

        if shell_disabled && weapon.kind.disableable_from_shell {
            *status = SuperweaponStatus::NONE;
        }

        if weapon.is_powered() {
            status.power_sourced &= faction.full_power;
        }

        #[cfg(feature = "debug-validation")]
        debug_assert!(
            status.is_consistent(),
            "inconsistent status for slot {}: {status:?}",
            weapon.slot()
        );
    }
}

/// Compute the final per-slot statuses for a faction.
#[must_use]
pub fn superweapon_statuses(faction: &Faction, settings: &GameSettings) -> Vec<SuperweaponStatus> {
    let mut statuses = scan_contributions(faction);
    if !faction.defeated {
        apply_faction_overrides(faction, settings, &mut statuses);
    }
    statuses
}
