//! Type registry built from validated rules data.
//!
//! Data files refer to types by string id; the simulation works with the
//! numeric ids handed out here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data::RulesData;
use crate::error::{GameError, Result};
use crate::factions::FactionId;
use crate::powered_unit::{UnitKind, UnitTypeId};
use crate::structures::StructureTypeId;
use crate::superweapons::{SuperweaponType, SuperweaponTypeId};

/// Registered structure type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureType {
    /// Type identifier.
    pub id: StructureTypeId,
    /// String id from the data file.
    pub name: String,
    /// Raw superweapon slots granted (`-1` = none).
    pub superweapons: Vec<i32>,
}

/// Registered powered unit type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitType {
    /// Type identifier.
    pub id: UnitTypeId,
    /// String id from the data file.
    pub name: String,
    /// Unit classification.
    pub kind: UnitKind,
    /// Structure types that power this unit.
    pub powered_by: Vec<StructureTypeId>,
    /// EMP threshold.
    pub emp_threshold: i32,
    /// Frames between power scans.
    pub scan_interval: u32,
}

/// Registry of every superweapon, structure and unit type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rules {
    superweapons: Vec<SuperweaponType>,
    structures: HashMap<StructureTypeId, StructureType>,
    units: HashMap<UnitTypeId, UnitType>,
    structure_ids: HashMap<String, StructureTypeId>,
    unit_ids: HashMap<String, UnitTypeId>,
}

impl Rules {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate rules data and build the registry from it.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidRules`] listing every validation problem.
    pub fn from_data(data: &RulesData) -> Result<Self> {
        let errors = data.validate();
        if !errors.is_empty() {
            return Err(GameError::InvalidRules(errors));
        }

        let mut rules = Self::new();

        for (slot, sw) in data.superweapons.iter().enumerate() {
            let id = u32::try_from(slot)
                .map_err(|_| GameError::InvalidRules(vec!["Too many superweapons".into()]))?;
            let mut kind = SuperweaponType::new(SuperweaponTypeId(id), sw.id.clone(), sw.recharge_time)
                .with_powered(sw.powered)
                .with_allowed_factions(sw.allowed_factions.iter().copied().map(FactionId).collect());
            if let Some(drain_time) = sw.drain_time {
                kind = kind.with_charge_drain(drain_time);
            }
            kind.disableable_from_shell = sw.disableable_from_shell;
            kind.can_hold = sw.can_hold;
            kind.manual_control = sw.manual_control;
            kind.show_icon = sw.show_icon;
            kind.auto_fire = sw.auto_fire;
            rules.superweapons.push(kind);
        }

        for (index, structure) in data.structures.iter().enumerate() {
            let id = StructureTypeId(u32::try_from(index).map_err(|_| {
                GameError::InvalidRules(vec!["Too many structure types".into()])
            })?);
            rules.structure_ids.insert(structure.id.clone(), id);
            rules.structures.insert(
                id,
                StructureType {
                    id,
                    name: structure.id.clone(),
                    superweapons: structure.superweapons.clone(),
                },
            );
        }

        for (index, unit) in data.units.iter().enumerate() {
            let id = UnitTypeId(
                u32::try_from(index)
                    .map_err(|_| GameError::InvalidRules(vec!["Too many unit types".into()]))?,
            );
            let powered_by = unit
                .powered_by
                .iter()
                .map(|name| rules.structure_id(name))
                .collect::<Result<Vec<_>>>()?;
            rules.unit_ids.insert(unit.id.clone(), id);
            rules.units.insert(
                id,
                UnitType {
                    id,
                    name: unit.id.clone(),
                    kind: unit.kind,
                    powered_by,
                    emp_threshold: unit.emp_threshold,
                    scan_interval: unit.scan_interval,
                },
            );
        }

        tracing::debug!(
            superweapons = rules.superweapons.len(),
            structures = rules.structures.len(),
            units = rules.units.len(),
            "Rules loaded"
        );
        Ok(rules)
    }

    /// Superweapon types in slot order.
    #[must_use]
    pub fn superweapon_types(&self) -> &[SuperweaponType] {
        &self.superweapons
    }

    /// Get a structure type by ID.
    #[must_use]
    pub fn structure(&self, id: StructureTypeId) -> Option<&StructureType> {
        self.structures.get(&id)
    }

    /// Get a unit type by ID.
    #[must_use]
    pub fn unit(&self, id: UnitTypeId) -> Option<&UnitType> {
        self.units.get(&id)
    }

    /// Resolve a structure type's string id.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownStructureType`] if no such type is registered.
    pub fn structure_id(&self, name: &str) -> Result<StructureTypeId> {
        self.structure_ids
            .get(name)
            .copied()
            .ok_or_else(|| GameError::UnknownStructureType(name.to_string()))
    }

    /// Resolve a unit type's string id.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownUnitType`] if no such type is registered.
    pub fn unit_id(&self, name: &str) -> Result<UnitTypeId> {
        self.unit_ids
            .get(name)
            .copied()
            .ok_or_else(|| GameError::UnknownUnitType(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{StructureData, SuperweaponData, UnitData};

    fn data() -> RulesData {
        RulesData {
            superweapons: vec![SuperweaponData {
                id: "storm".to_string(),
                name: "sw.storm".to_string(),
                recharge_time: 600,
                powered: true,
                drain_time: Some(120),
                disableable_from_shell: true,
                can_hold: true,
                manual_control: false,
                show_icon: false,
                auto_fire: false,
                allowed_factions: vec![3],
            }],
            structures: vec![
                StructureData {
                    id: "reactor".to_string(),
                    name: "b.reactor".to_string(),
                    superweapons: vec![],
                },
                StructureData {
                    id: "storm_control".to_string(),
                    name: "b.storm".to_string(),
                    superweapons: vec![0],
                },
            ],
            units: vec![UnitData {
                id: "drone".to_string(),
                name: "u.drone".to_string(),
                kind: UnitKind::Aircraft,
                powered_by: vec!["reactor".to_string()],
                emp_threshold: -1,
                scan_interval: 10,
            }],
        }
    }

    #[test]
    fn test_from_data_assigns_ids() {
        let rules = Rules::from_data(&data()).unwrap();

        let storm = &rules.superweapon_types()[0];
        assert_eq!(storm.id, SuperweaponTypeId(0));
        assert!(storm.powered);
        assert!(storm.use_charge_drain);
        assert_eq!(storm.drain_time, 120);
        assert!(storm.allows(FactionId(3)));
        assert!(!storm.allows(FactionId(1)));

        let control = rules.structure_id("storm_control").unwrap();
        assert_eq!(rules.structure(control).unwrap().superweapons, vec![0]);

        let drone = rules.unit(rules.unit_id("drone").unwrap()).unwrap();
        assert_eq!(drone.powered_by, vec![rules.structure_id("reactor").unwrap()]);
        assert_eq!(drone.kind, UnitKind::Aircraft);
    }

    #[test]
    fn test_from_data_rejects_invalid_rules() {
        let mut data = data();
        data.structures[0].superweapons.push(9);

        let err = Rules::from_data(&data).unwrap_err();
        assert!(matches!(err, GameError::InvalidRules(ref errors) if errors.len() == 1));
    }

    #[test]
    fn test_unknown_ids() {
        let rules = Rules::from_data(&data()).unwrap();
        assert!(matches!(
            rules.structure_id("barracks"),
            Err(GameError::UnknownStructureType(_))
        ));
        assert!(matches!(rules.unit_id("tank"), Err(GameError::UnknownUnitType(_))));
    }
}
