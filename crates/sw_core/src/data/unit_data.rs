//! Unit data structures for units that depend on powered structures.

use serde::{Deserialize, Serialize};

use crate::powered_unit::UnitKind;

/// Default frames between power scans.
pub const DEFAULT_SCAN_INTERVAL: u32 = 15;

/// Data-driven powered unit definition.
///
/// # Example RON
///
/// ```ron
/// UnitData(
///     id: "robot_tank",
///     name: "unit.robot_tank.name",
///     kind: Vehicle,
///     powered_by: ["robot_control_center"],
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitData {
    /// Unique string identifier for this unit type.
    pub id: String,

    /// Localization key for the display name.
    pub name: String,

    /// Unit classification.
    #[serde(default)]
    pub kind: UnitKind,

    /// Structure ids that can power this unit.
    pub powered_by: Vec<String>,

    /// EMP threshold. Negative values only disable the unit in the air.
    #[serde(default)]
    pub emp_threshold: i32,

    /// Frames between power scans.
    #[serde(default = "default_scan_interval")]
    pub scan_interval: u32,
}

const fn default_scan_interval() -> u32 {
    DEFAULT_SCAN_INTERVAL
}
