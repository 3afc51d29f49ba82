//! Superweapon types and per-faction superweapon instances.
//!
//! A [`SuperweaponType`] is the data-driven descriptor shared by every
//! faction; a [`Superweapon`] is one faction's copy of it, carrying the
//! persistent `granted` / `on hold` / charge-drain state that the
//! lifecycle passes mutate.

use serde::{Deserialize, Serialize};

use crate::factions::FactionId;
use crate::math::{ratio, Fixed};
use crate::timer::{Frame, RechargeTimer};

/// Stable identifier of a superweapon type.
///
/// The identifier doubles as the slot index into every faction's
/// superweapon collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SuperweaponTypeId(pub u32);

impl SuperweaponTypeId {
    /// Create a new superweapon type ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Slot index of this type in a faction's collection.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Raw slot value meaning "this structure grants no superweapon".
pub const NO_SLOT: i32 = -1;

/// Convert a raw slot value from data into a slot index.
///
/// Returns `None` for [`NO_SLOT`] and any other negative value.
#[must_use]
pub fn slot_from_raw(raw: i32) -> Option<usize> {
    usize::try_from(raw).ok()
}

/// Capability descriptor for a superweapon type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SuperweaponType {
    /// Type identifier (and slot index).
    pub id: SuperweaponTypeId,
    /// Display name.
    pub name: String,
    /// Requires the owning faction to be at full power.
    pub powered: bool,
    /// Readiness is tied to the faction-wide charge-drain toggle.
    pub use_charge_drain: bool,
    /// Removed when superweapons are disabled from the game shell.
    pub disableable_from_shell: bool,
    /// Recharge can be put on hold.
    pub can_hold: bool,
    /// Timer is paused even when released from hold; the player fires it.
    pub manual_control: bool,
    /// Frames to fully recharge.
    pub recharge_time: u32,
    /// Frames a charge-drain weapon stays active once fired.
    pub drain_time: u32,
    /// Icon stays visible even for auto-firing weapons.
    pub show_icon: bool,
    /// Fires on its own once charged.
    pub auto_fire: bool,
    /// Factions an upgrade may grant this weapon to. Empty means all.
    pub allowed_factions: Vec<FactionId>,
}

impl SuperweaponType {
    /// Create a holdable, unpowered superweapon type with the given recharge time.
    #[must_use]
    pub fn new(id: SuperweaponTypeId, name: impl Into<String>, recharge_time: u32) -> Self {
        Self {
            id,
            name: name.into(),
            powered: false,
            use_charge_drain: false,
            disableable_from_shell: true,
            can_hold: true,
            manual_control: false,
            recharge_time,
            drain_time: 0,
            show_icon: false,
            auto_fire: false,
            allowed_factions: Vec::new(),
        }
    }

    /// Mark the type as requiring faction power.
    #[must_use]
    pub fn with_powered(mut self, powered: bool) -> Self {
        self.powered = powered;
        self
    }

    /// Enable charge-drain semantics with the given drain duration.
    #[must_use]
    pub fn with_charge_drain(mut self, drain_time: u32) -> Self {
        self.use_charge_drain = true;
        self.drain_time = drain_time;
        self
    }

    /// Restrict which factions may receive this weapon from an upgrade.
    #[must_use]
    pub fn with_allowed_factions(mut self, factions: Vec<FactionId>) -> Self {
        self.allowed_factions = factions;
        self
    }

    /// Whether `faction` may be granted this weapon by an upgrade.
    #[must_use]
    pub fn allows(&self, faction: FactionId) -> bool {
        self.allowed_factions.is_empty() || self.allowed_factions.contains(&faction)
    }
}

/// Charge-drain sub-state of a superweapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChargeDrainState {
    /// Not participating (ungranted or on hold).
    #[default]
    None,
    /// Recharging towards ready.
    Charging,
    /// Charged and waiting to be fired.
    Ready,
    /// Fired; the faction-wide toggle is active until the drain timer expires.
    Draining,
}

/// One faction's instance of a superweapon type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Superweapon {
    /// Copy of the type descriptor.
    pub kind: SuperweaponType,
    /// Owning faction.
    pub owner: FactionId,
    /// Usable and visible to the owner.
    pub granted: bool,
    /// Single-shot grant that does not recharge.
    pub one_time: bool,
    /// Recharge can be put on hold.
    pub can_hold: bool,
    /// Recharge is paused.
    pub is_on_hold: bool,
    /// Fully charged and ready to fire.
    pub ready: bool,
    /// Charge-drain sub-state.
    pub charge_drain_state: ChargeDrainState,
    /// Recharge countdown.
    pub recharge_timer: RechargeTimer,
}

impl Superweapon {
    /// Create an ungranted instance of `kind` for `owner`.
    #[must_use]
    pub fn new(kind: SuperweaponType, owner: FactionId) -> Self {
        let can_hold = kind.can_hold;
        Self {
            kind,
            owner,
            granted: false,
            one_time: false,
            can_hold,
            is_on_hold: false,
            ready: false,
            charge_drain_state: ChargeDrainState::None,
            recharge_timer: RechargeTimer::default(),
        }
    }

    /// Slot index of this weapon.
    #[must_use]
    pub const fn slot(&self) -> usize {
        self.kind.id.index()
    }

    /// Whether the weapon depends on faction power.
    #[must_use]
    pub const fn is_powered(&self) -> bool {
        self.kind.powered
    }

    /// Whether the owner may not keep this weapon through the regular ladder.
    ///
    /// Weapons that cannot hold or were granted once are only revoked when
    /// their faction is defeated.
    #[must_use]
    pub const fn is_single_shot(&self) -> bool {
        !self.can_hold || self.one_time
    }

    /// Grant the weapon to its owner.
    ///
    /// A permanent grant replaces an outstanding one-time grant. Returns
    /// `false` if nothing changed.
    pub fn grant(&mut self, one_time: bool, announce: bool, on_hold: bool, now: Frame) -> bool {
        if self.granted && (one_time || !self.one_time) {
            return false;
        }

        self.granted = true;
        self.one_time = one_time;
        self.is_on_hold = on_hold && self.can_hold && !one_time;
        self.ready = false;
        self.recharge_timer.start(self.kind.recharge_time, now);
        if self.is_on_hold || self.kind.manual_control {
            self.recharge_timer.pause(now);
        }
        self.charge_drain_state = if self.kind.use_charge_drain && !self.is_on_hold {
            ChargeDrainState::Charging
        } else {
            ChargeDrainState::None
        };

        tracing::debug!(
            faction = self.owner.0,
            slot = self.slot(),
            one_time,
            announce,
            on_hold = self.is_on_hold,
            "Superweapon granted"
        );
        true
    }

    /// Revoke the grant.
    ///
    /// Returns `false` if the weapon was not granted.
    pub fn lose(&mut self) -> bool {
        if !self.granted {
            return false;
        }

        self.granted = false;
        self.one_time = false;
        self.is_on_hold = false;
        self.ready = false;
        self.charge_drain_state = ChargeDrainState::None;
        self.recharge_timer.stop();

        tracing::debug!(faction = self.owner.0, slot = self.slot(), "Superweapon lost");
        true
    }

    /// Charge progress in `[0, 1]`.
    #[must_use]
    pub fn charge_progress(&self, now: Frame) -> Fixed {
        if !self.granted {
            return Fixed::ZERO;
        }
        if self.ready {
            return Fixed::ONE;
        }
        let total = self.recharge_timer.total();
        ratio(total - self.recharge_timer.time_left(now).min(total), total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weapon(kind: SuperweaponType) -> Superweapon {
        Superweapon::new(kind, FactionId(1))
    }

    #[test]
    fn test_slot_from_raw_skips_sentinel() {
        assert_eq!(slot_from_raw(NO_SLOT), None);
        assert_eq!(slot_from_raw(-7), None);
        assert_eq!(slot_from_raw(0), Some(0));
        assert_eq!(slot_from_raw(3), Some(3));
    }

    #[test]
    fn test_allowed_factions() {
        let open = SuperweaponType::new(SuperweaponTypeId(0), "nuke", 100);
        assert!(open.allows(FactionId(4)));

        let restricted = open.with_allowed_factions(vec![FactionId(1)]);
        assert!(restricted.allows(FactionId(1)));
        assert!(!restricted.allows(FactionId(2)));
    }

    #[test]
    fn test_grant_starts_timer() {
        let mut sw = weapon(SuperweaponType::new(SuperweaponTypeId(2), "nuke", 100));

        assert!(sw.grant(false, true, false, 10));
        assert!(sw.granted);
        assert!(!sw.is_on_hold);
        assert_eq!(sw.recharge_timer.time_left(10), 100);
        assert_eq!(sw.charge_drain_state, ChargeDrainState::None);

        // Second grant is a no-op
        assert!(!sw.grant(false, true, true, 20));
        assert!(!sw.is_on_hold);
    }

    #[test]
    fn test_grant_on_hold_pauses_timer() {
        let mut sw = weapon(SuperweaponType::new(SuperweaponTypeId(0), "nuke", 100));

        assert!(sw.grant(false, false, true, 0));
        assert!(sw.is_on_hold);
        assert!(sw.recharge_timer.is_paused());
        assert_eq!(sw.recharge_timer.time_left(500), 100);
    }

    #[test]
    fn test_grant_charge_drain_enters_charging() {
        let kind = SuperweaponType::new(SuperweaponTypeId(0), "storm", 100).with_charge_drain(50);
        let mut sw = weapon(kind);

        sw.grant(false, false, false, 0);
        assert_eq!(sw.charge_drain_state, ChargeDrainState::Charging);
    }

    #[test]
    fn test_one_time_grant_never_holds() {
        let mut sw = weapon(SuperweaponType::new(SuperweaponTypeId(0), "drop", 10));

        sw.grant(true, false, true, 0);
        assert!(sw.one_time);
        assert!(!sw.is_on_hold);
        assert!(sw.is_single_shot());
    }

    #[test]
    fn test_permanent_grant_replaces_one_time() {
        let mut sw = weapon(SuperweaponType::new(SuperweaponTypeId(0), "nuke", 100));
        assert!(sw.grant(true, false, false, 0));

        // Another one-time grant changes nothing
        assert!(!sw.grant(true, false, false, 5));

        assert!(sw.grant(false, true, true, 10));
        assert!(sw.granted);
        assert!(!sw.one_time);
        assert!(sw.is_on_hold);
        assert_eq!(sw.recharge_timer.time_left(50), 100);

        assert!(!sw.grant(false, true, false, 20));
    }

    #[test]
    fn test_lose_resets_state() {
        let kind = SuperweaponType::new(SuperweaponTypeId(0), "storm", 100).with_charge_drain(50);
        let mut sw = weapon(kind);

        assert!(!sw.lose());

        sw.grant(false, false, true, 0);
        assert!(sw.lose());
        assert!(!sw.granted);
        assert!(!sw.is_on_hold);
        assert!(!sw.recharge_timer.is_active());
        assert_eq!(sw.charge_drain_state, ChargeDrainState::None);
    }

    #[test]
    fn test_charge_progress() {
        let mut sw = weapon(SuperweaponType::new(SuperweaponTypeId(0), "nuke", 100));
        assert_eq!(sw.charge_progress(0), Fixed::ZERO);

        sw.grant(false, false, false, 0);
        assert_eq!(sw.charge_progress(25), Fixed::from_num(0.25));
        assert_eq!(sw.charge_progress(100), Fixed::ONE);
    }
}
