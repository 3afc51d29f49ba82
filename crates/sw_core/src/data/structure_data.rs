//! Structure data structures for data-driven structure definitions.

use serde::{Deserialize, Serialize};

/// Data-driven structure definition.
///
/// Upgrades are structure types too: installing one onto a structure adds
/// the upgrade's superweapon slots to the host.
///
/// # Example RON
///
/// ```ron
/// StructureData(
///     id: "weather_controller",
///     name: "building.weather_controller.name",
///     superweapons: [1],
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureData {
    /// Unique string identifier for this structure type.
    pub id: String,

    /// Localization key for the display name.
    pub name: String,

    /// Superweapon slots granted while the structure stands (`-1` = none).
    #[serde(default)]
    pub superweapons: Vec<i32>,
}
