//! Superweapon data structures for data-driven superweapon definitions.

use serde::{Deserialize, Serialize};

/// Data-driven superweapon definition.
///
/// The position of an entry in [`RulesData::superweapons`] is its slot
/// index; structures refer to superweapons by that index.
///
/// [`RulesData::superweapons`]: super::RulesData::superweapons
///
/// # Example RON
///
/// ```ron
/// SuperweaponData(
///     id: "weather_storm",
///     name: "sw.weather_storm.name",
///     recharge_time: 600,
///     powered: true,
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuperweaponData {
    /// Unique string identifier for this superweapon type.
    pub id: String,

    /// Localization key for the display name.
    pub name: String,

    /// Frames needed to fully recharge.
    pub recharge_time: u32,

    /// Requires the owning faction to be at full power.
    #[serde(default)]
    pub powered: bool,

    /// Frames the faction-wide charge-drain toggle stays active once fired.
    ///
    /// `Some` turns on charge-drain semantics for this type.
    #[serde(default)]
    pub drain_time: Option<u32>,

    /// Removed when superweapons are switched off in the game shell.
    #[serde(default = "default_true")]
    pub disableable_from_shell: bool,

    /// Recharge can be put on hold.
    #[serde(default = "default_true")]
    pub can_hold: bool,

    /// Timer stays paused; the player decides when it charges.
    #[serde(default)]
    pub manual_control: bool,

    /// Keep the sidebar icon even for auto-firing weapons.
    #[serde(default)]
    pub show_icon: bool,

    /// Fires automatically when charged.
    #[serde(default)]
    pub auto_fire: bool,

    /// Raw faction ids an upgrade may grant this weapon to. Empty means all.
    #[serde(default)]
    pub allowed_factions: Vec<u32>,
}

/// Default to true for holdable / shell-disableable weapons.
const fn default_true() -> bool {
    true
}
