//! Superweapon lifecycle passes.
//!
//! Two entry points run once per faction each tick:
//!
//! - [`update_superweapons_owned`] reconciles granted weapons with the
//!   fresh statuses: revoke, hold or release.
//! - [`update_superweapons_unavailable`] grants ungranted and one-time
//!   weapons whose slot has become available.
//!
//! Both recompute the status vector themselves. Sidebar side effects are
//! reported as [`SuperweaponEvent`]s only when a weapon actually changed.

use serde::{Deserialize, Serialize};

use crate::aggregator::superweapon_statuses;
use crate::charge_drain::{lose, set_on_hold};
use crate::context::SimContext;
use crate::factions::{Faction, FactionId};
use crate::status::SuperweaponStatus;
use crate::superweapons::Superweapon;
use crate::timer::Frame;

/// Events generated by the superweapon passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuperweaponEvent {
    /// A weapon was granted.
    Granted {
        /// Owning faction.
        faction: FactionId,
        /// Weapon slot.
        slot: usize,
        /// Whether the owner should be told.
        announce: bool,
        /// Whether it starts on hold.
        on_hold: bool,
    },
    /// A weapon was revoked.
    Lost {
        /// Owning faction.
        faction: FactionId,
        /// Weapon slot.
        slot: usize,
    },
    /// A weapon was put on hold or released.
    HoldChanged {
        /// Owning faction.
        faction: FactionId,
        /// Weapon slot.
        slot: usize,
        /// New hold state.
        on_hold: bool,
    },
    /// A weapon finished charging.
    Charged {
        /// Owning faction.
        faction: FactionId,
        /// Weapon slot.
        slot: usize,
    },
    /// The observer's sidebar tab for a slot must be repainted.
    RepaintTab {
        /// Weapon slot.
        slot: usize,
    },
    /// The slot's icon must be added to the observer's sidebar.
    AddIcon {
        /// Weapon slot.
        slot: usize,
    },
    /// A faction's charge-drain toggle changed.
    DrainToggled {
        /// Owning faction.
        faction: FactionId,
        /// New toggle state.
        active: bool,
    },
}

/// What the owned-weapon ladder did to one weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LadderOutcome {
    Unchanged,
    Lost,
    Held(bool),
}

/// Run the five-branch ladder for one granted weapon.
fn run_ladder(
    weapon: &mut Superweapon,
    status: SuperweaponStatus,
    defeated: bool,
    drain_active: &mut bool,
    now: Frame,
) -> LadderOutcome {
    let hold = |weapon: &mut Superweapon, drain_active: &mut bool, on_hold: bool| {
        if set_on_hold(weapon, on_hold, drain_active, now) {
            LadderOutcome::Held(on_hold)
        } else {
            LadderOutcome::Unchanged
        }
    };

    if !status.available || defeated {
        if lose(weapon, drain_active) {
            LadderOutcome::Lost
        } else {
            LadderOutcome::Unchanged
        }
    } else if status.charging && !weapon.is_powered() {
        if weapon.is_on_hold {
            hold(weapon, drain_active, false)
        } else {
            LadderOutcome::Unchanged
        }
    } else if !status.charging && !weapon.is_powered() {
        if weapon.is_on_hold {
            LadderOutcome::Unchanged
        } else {
            hold(weapon, drain_active, true)
        }
    } else if !status.power_sourced {
        if weapon.is_powered() {
            hold(weapon, drain_active, true)
        } else {
            LadderOutcome::Unchanged
        }
    } else {
        hold(weapon, drain_active, false)
    }
}

/// Reconcile a faction's granted superweapons with their fresh statuses.
///
/// Single-shot weapons are skipped unless the faction is defeated.
pub fn update_superweapons_owned(
    faction: &mut Faction,
    ctx: &mut SimContext,
) -> Vec<SuperweaponEvent> {
    let statuses = superweapon_statuses(faction, &ctx.settings);
    let mut events = Vec::new();

    let Faction {
        id,
        superweapons,
        defeated,
        drain_active,
        recheck_tech_tree,
        ..
    } = faction;
    let (id, defeated) = (*id, *defeated);
    let is_observer = ctx.is_observer(id);

    for weapon in superweapons.iter_mut().filter(|w| w.granted) {
        if weapon.is_single_shot() && !defeated {
            continue;
        }
        let slot = weapon.slot();
        let Some(&status) = statuses.get(slot) else {
            continue;
        };

        let update = match run_ladder(weapon, status, defeated, drain_active, ctx.frame) {
            LadderOutcome::Unchanged => false,
            LadderOutcome::Lost => {
                events.push(SuperweaponEvent::Lost { faction: id, slot });
                ctx.has_observer()
            }
            LadderOutcome::Held(on_hold) => {
                events.push(SuperweaponEvent::HoldChanged {
                    faction: id,
                    slot,
                    on_hold,
                });
                true
            }
        };

        if update {
            if is_observer {
                if ctx.current_tab == Some(slot) {
                    ctx.current_tab = None;
                }
                events.push(SuperweaponEvent::RepaintTab { slot });
            }
            *recheck_tech_tree = true;
        }
    }

    events
}

/// Grant ungranted and one-time superweapons whose slot is available.
///
/// Does nothing for a defeated faction.
pub fn update_superweapons_unavailable(
    faction: &mut Faction,
    ctx: &SimContext,
) -> Vec<SuperweaponEvent> {
    let mut events = Vec::new();
    if faction.defeated {
        return events;
    }

    let statuses = superweapon_statuses(faction, &ctx.settings);
    let id = faction.id;
    let is_observer = ctx.is_observer(id);

    for weapon in faction
        .superweapons
        .iter_mut()
        .filter(|w| !w.granted || w.one_time)
    {
        let slot = weapon.slot();
        let Some(status) = statuses.get(slot) else {
            continue;
        };
        if !status.available {
            continue;
        }

        let on_hold = !status.power_sourced;
        if !weapon.grant(false, is_observer, on_hold, ctx.frame) {
            continue;
        }
        events.push(SuperweaponEvent::Granted {
            faction: id,
            slot,
            announce: is_observer,
            on_hold: weapon.is_on_hold,
        });

        if is_observer && (weapon.kind.show_icon || !weapon.kind.auto_fire) {
            events.push(SuperweaponEvent::AddIcon { slot });
            events.push(SuperweaponEvent::RepaintTab { slot });
        }
    }

    events
}
