//! Per-slot superweapon status.
//!
//! A status is recomputed from scratch on every evaluation and thrown away
//! afterwards. Contributions only ever set flags, so the fold over a
//! faction's structures is a monotone OR and independent of visit order.

use crate::structures::Structure;

/// Availability, power and charge eligibility of one superweapon slot.
///
/// The flags refine each other: `charging ⇒ power_sourced ⇒ available`.
/// After the faction power gate a slot may keep `charging` while
/// `power_sourced` is false; read [`effective_charging`] in that case.
///
/// [`effective_charging`]: SuperweaponStatus::effective_charging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SuperweaponStatus {
    /// A live structure or upgrade grants the slot.
    pub available: bool,
    /// The granting structure is powered, not EMP'd and operated.
    pub power_sourced: bool,
    /// The weapon may accumulate charge.
    pub charging: bool,
}

impl SuperweaponStatus {
    /// Status of a slot nothing grants.
    pub const NONE: Self = Self {
        available: false,
        power_sourced: false,
        charging: false,
    };

    /// `charging`, discounted once `power_sourced` has been gated off.
    #[must_use]
    pub const fn effective_charging(&self) -> bool {
        self.charging && self.power_sourced
    }

    /// Whether the refinement chain holds for the effective flags.
    ///
    /// `effective_charging ⇒ power_sourced` holds by construction, so only
    /// the link to `available` needs checking.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        (!self.charging || self.available) && (!self.power_sourced || self.available)
    }
}

/// Facts about one structure that decide what it contributes to a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Contribution {
    /// Powered, not EMP-disabled and operated.
    pub power_sourced: bool,
    /// Not warping out and neither current nor queued activity blocks charging.
    pub allows_charging: bool,
}

impl Contribution {
    /// Read the contribution facts from a structure.
    #[must_use]
    pub const fn from_structure(structure: &Structure) -> Self {
        Self {
            power_sourced: structure.sources_superweapon_power(),
            allows_charging: structure.allows_charging(),
        }
    }
}

/// Fold one contribution into a slot status.
///
/// Flags only go from false to true. Once a slot is charging, later
/// contributions cannot add anything beyond availability.
pub fn apply_contribution(status: &mut SuperweaponStatus, contribution: Contribution) {
    status.available = true;

    if !status.charging && contribution.power_sourced {
        status.power_sourced = true;

        if contribution.allows_charging {
            status.charging = true;
        }
    }
}
