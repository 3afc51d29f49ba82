//! Hold handling and the charge-drain linkage.
//!
//! Charge-drain weapons tie their readiness to a faction-wide toggle
//! (`Faction::drain_active`). Every path that changes such a weapon's hold
//! state, fires it, lets its timer run out or loses it must leave the
//! toggle in sync; all of those paths live here.

use crate::superweapons::{ChargeDrainState, Superweapon};
use crate::timer::Frame;

/// Put a weapon on hold or release it.
///
/// No-op returning `false` unless the weapon is granted, not one-time,
/// able to hold, and `on_hold` differs from its current hold state.
pub fn set_on_hold(
    weapon: &mut Superweapon,
    on_hold: bool,
    drain_active: &mut bool,
    now: Frame,
) -> bool {
    if !weapon.granted || weapon.one_time || !weapon.can_hold || on_hold == weapon.is_on_hold {
        return false;
    }

    if on_hold || weapon.kind.manual_control {
        weapon.recharge_timer.pause(now);
    } else {
        weapon.recharge_timer.resume(now);
    }

    weapon.is_on_hold = on_hold;

    if weapon.kind.use_charge_drain {
        if on_hold {
            *drain_active = false;
            weapon.charge_drain_state = ChargeDrainState::None;
        } else {
            weapon.charge_drain_state = ChargeDrainState::Charging;
            weapon.recharge_timer.start(weapon.kind.recharge_time, now);
        }
    }

    tracing::debug!(
        faction = weapon.owner.0,
        slot = weapon.slot(),
        on_hold,
        "Superweapon hold changed"
    );
    true
}

/// Revoke a weapon, clearing the faction toggle for charge-drain types.
pub fn lose(weapon: &mut Superweapon, drain_active: &mut bool) -> bool {
    let lost = weapon.lose();
    if lost && weapon.kind.use_charge_drain {
        *drain_active = false;
    }
    lost
}

/// Outcome of advancing a weapon's timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeProgress {
    /// Nothing happened.
    Unchanged,
    /// The weapon finished recharging.
    Charged,
    /// A charge-drain weapon's active period ran out.
    DrainEnded,
}

/// Check a weapon's timer for expiry.
pub fn progress(weapon: &mut Superweapon, drain_active: &mut bool, now: Frame) -> ChargeProgress {
    if !weapon.granted || weapon.is_on_hold || !weapon.recharge_timer.expired(now) {
        return ChargeProgress::Unchanged;
    }

    if weapon.kind.use_charge_drain {
        match weapon.charge_drain_state {
            ChargeDrainState::Charging => {
                weapon.charge_drain_state = ChargeDrainState::Ready;
                weapon.ready = true;
                *drain_active = false;
                ChargeProgress::Charged
            }
            ChargeDrainState::Draining => {
                *drain_active = false;
                weapon.charge_drain_state = ChargeDrainState::Charging;
                weapon.recharge_timer.start(weapon.kind.recharge_time, now);
                ChargeProgress::DrainEnded
            }
            ChargeDrainState::None | ChargeDrainState::Ready => ChargeProgress::Unchanged,
        }
    } else if !weapon.ready {
        weapon.ready = true;
        ChargeProgress::Charged
    } else {
        ChargeProgress::Unchanged
    }
}

/// Fire a weapon, or cut an active charge-drain weapon short.
///
/// Returns `false` if the weapon cannot be fired right now.
pub fn launch(weapon: &mut Superweapon, drain_active: &mut bool, now: Frame) -> bool {
    if !weapon.granted {
        return false;
    }

    if weapon.kind.use_charge_drain && weapon.charge_drain_state == ChargeDrainState::Draining {
        *drain_active = false;
        weapon.charge_drain_state = ChargeDrainState::Charging;
        weapon.recharge_timer.start(weapon.kind.recharge_time, now);
        return true;
    }

    if !weapon.ready {
        return false;
    }

    weapon.ready = false;
    if weapon.kind.use_charge_drain {
        *drain_active = true;
        weapon.charge_drain_state = ChargeDrainState::Draining;
        weapon.recharge_timer.start(weapon.kind.drain_time, now);
    } else if weapon.one_time {
        lose(weapon, drain_active);
    } else {
        weapon.recharge_timer.start(weapon.kind.recharge_time, now);
    }

    tracing::debug!(faction = weapon.owner.0, slot = weapon.slot(), "Superweapon launched");
    true
}
