//! Data structures for rules and scenario configuration.
//!
//! Plain data types deserialized from RON files. This module performs no
//! IO; callers read the files and hand the text to the `from_ron`
//! constructors.

mod rules_data;
mod scenario_data;
mod structure_data;
mod superweapon_data;
mod unit_data;

pub use rules_data::RulesData;
pub use scenario_data::{FactionSetup, ScenarioData, StructureSetup, UnitSetup};
pub use structure_data::StructureData;
pub use superweapon_data::SuperweaponData;
pub use unit_data::{UnitData, DEFAULT_SCAN_INTERVAL};
