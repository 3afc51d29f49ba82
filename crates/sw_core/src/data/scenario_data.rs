//! Scenario data: the factions, structures and units a match starts with.

use serde::{Deserialize, Serialize};

use crate::context::GameSettings;
use crate::error::{GameError, Result};
use crate::structures::Mission;

/// Starting state of a match.
///
/// # Example RON
///
/// ```ron
/// ScenarioData(
///     settings: (observer: Some(FactionId(1))),
///     frames: 600,
///     factions: [
///         FactionSetup(
///             id: 1,
///             name: "Allies",
///             structures: [StructureSetup(type_id: "missile_silo")],
///         ),
///     ],
/// )
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioData {
    /// Match settings.
    #[serde(default)]
    pub settings: GameSettings,

    /// Frames a headless run should simulate.
    #[serde(default = "default_frames")]
    pub frames: u64,

    /// Participating factions.
    pub factions: Vec<FactionSetup>,
}

/// Default headless run length (one minute at 15 fps).
const fn default_frames() -> u64 {
    900
}

/// Starting state of one faction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactionSetup {
    /// Raw faction id.
    pub id: u32,

    /// Display name.
    pub name: String,

    /// Whether the faction's power output covers its demand.
    #[serde(default = "default_true")]
    pub full_power: bool,

    /// Starting structures.
    #[serde(default)]
    pub structures: Vec<StructureSetup>,

    /// Starting powered units.
    #[serde(default)]
    pub units: Vec<UnitSetup>,
}

/// A starting structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureSetup {
    /// Structure type id.
    pub type_id: String,

    /// Upgrade structure type ids installed at start.
    #[serde(default)]
    pub upgrades: Vec<String>,

    /// Initial activity.
    #[serde(default = "default_mission")]
    pub mission: Mission,

    /// Whether the structure receives power.
    #[serde(default = "default_true")]
    pub has_power: bool,
}

/// A starting powered unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSetup {
    /// Unit type id.
    pub type_id: String,

    /// Starts airborne.
    #[serde(default)]
    pub in_air: bool,

    /// Starts inside a factory.
    #[serde(default)]
    pub inside_structure: bool,
}

const fn default_true() -> bool {
    true
}

const fn default_mission() -> Mission {
    Mission::Guard
}

impl ScenarioData {
    /// Parse a scenario from RON text. `path` is only used for error messages.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::DataParseError`] if the text is not valid scenario RON.
    pub fn from_ron(path: &str, contents: &str) -> Result<Self> {
        ron::from_str(contents).map_err(|e| GameError::DataParseError {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}
