//! Rules data combining every type definition.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::structure_data::StructureData;
use super::superweapon_data::SuperweaponData;
use super::unit_data::UnitData;
use crate::error::{GameError, Result};
use crate::superweapons::NO_SLOT;

/// Complete rules definition.
///
/// Loaded from a RON file at startup and turned into a
/// [`Rules`](crate::rules::Rules) registry.
///
/// # Example RON
///
/// ```ron
/// RulesData(
///     superweapons: [...],
///     structures: [...],
///     units: [...],
/// )
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesData {
    /// Superweapon types, in slot order.
    #[serde(default)]
    pub superweapons: Vec<SuperweaponData>,

    /// Structure types, including upgrades.
    #[serde(default)]
    pub structures: Vec<StructureData>,

    /// Units that depend on powered structures.
    #[serde(default)]
    pub units: Vec<UnitData>,
}

impl RulesData {
    /// Parse rules from RON text. `path` is only used for error messages.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::DataParseError`] if the text is not valid rules RON.
    pub fn from_ron(path: &str, contents: &str) -> Result<Self> {
        ron::from_str(contents).map_err(|e| GameError::DataParseError {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Find a superweapon by its ID.
    #[must_use]
    pub fn get_superweapon(&self, id: &str) -> Option<&SuperweaponData> {
        self.superweapons.iter().find(|s| s.id == id)
    }

    /// Find a structure by its ID.
    #[must_use]
    pub fn get_structure(&self, id: &str) -> Option<&StructureData> {
        self.structures.iter().find(|s| s.id == id)
    }

    /// Find a unit by its ID.
    #[must_use]
    pub fn get_unit(&self, id: &str) -> Option<&UnitData> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Validate internal consistency of the rules.
    ///
    /// Checks for:
    /// - Duplicate ids within each table
    /// - Structure slots that are neither `-1` nor a known superweapon
    /// - Charge-drain weapons without a drain duration
    /// - Unit power sources that are not known structures
    ///
    /// Returns a list of validation errors.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        check_duplicates("superweapon", self.superweapons.iter().map(|s| &s.id), &mut errors);
        check_duplicates("structure", self.structures.iter().map(|s| &s.id), &mut errors);
        check_duplicates("unit", self.units.iter().map(|u| &u.id), &mut errors);

        for superweapon in &self.superweapons {
            if superweapon.drain_time == Some(0) {
                errors.push(format!(
                    "Superweapon '{}' uses charge drain with a zero drain time",
                    superweapon.id
                ));
            }
        }

        let slot_count = self.superweapons.len();
        for structure in &self.structures {
            for &slot in &structure.superweapons {
                let known = usize::try_from(slot).is_ok_and(|s| s < slot_count);
                if slot != NO_SLOT && !known {
                    errors.push(format!(
                        "Structure '{}' grants unknown superweapon slot {}",
                        structure.id, slot
                    ));
                }
            }
        }

        for unit in &self.units {
            if unit.powered_by.is_empty() {
                errors.push(format!("Unit '{}' has no power source", unit.id));
            }
            for structure_id in &unit.powered_by {
                if self.get_structure(structure_id).is_none() {
                    errors.push(format!(
                        "Unit '{}' powered by unknown structure '{}'",
                        unit.id, structure_id
                    ));
                }
            }
            if unit.scan_interval == 0 {
                errors.push(format!("Unit '{}' has a zero scan interval", unit.id));
            }
        }

        errors
    }
}

fn check_duplicates<'a>(
    table: &str,
    ids: impl Iterator<Item = &'a String>,
    errors: &mut Vec<String>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(format!("Duplicate {table} id '{id}'"));
        }
    }
}
