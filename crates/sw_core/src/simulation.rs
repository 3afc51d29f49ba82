//! Core simulation driver.
//!
//! Owns the factions, powered units, type rules and the shared context,
//! and runs the superweapon and powered-unit passes in a fixed order each
//! tick.
//!
//! # Determinism
//!
//! - No floating-point math (charge progress uses [`Fixed`](crate::math::Fixed))
//! - Factions, structures and units are visited in insertion order
//! - Same inputs always produce same outputs
//!
//! # Example
//!
//! ```
//! use sw_core::context::GameSettings;
//! use sw_core::data::RulesData;
//! use sw_core::factions::FactionId;
//! use sw_core::rules::Rules;
//! use sw_core::simulation::Simulation;
//!
//! let data = RulesData::from_ron(
//!     "rules.ron",
//!     r#"RulesData(
//!         superweapons: [SuperweaponData(id: "nuke", name: "sw.nuke", recharge_time: 3)],
//!         structures: [StructureData(id: "silo", name: "b.silo", superweapons: [0])],
//!     )"#,
//! )?;
//! let mut sim = Simulation::new(Rules::from_data(&data)?, GameSettings::default());
//!
//! let allies = FactionId(1);
//! sim.add_faction(allies, "Allies")?;
//! let silo = sim.rules().structure_id("silo")?;
//! sim.spawn_structure(allies, silo)?;
//!
//! sim.tick();
//! assert!(sim.faction(allies).unwrap().superweapons[0].granted);
//! # Ok::<(), sw_core::error::GameError>(())
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::aggregator::superweapon_statuses;
use crate::charge_drain::{self, progress, ChargeProgress};
use crate::context::{GameSettings, SimContext};
use crate::data::ScenarioData;
use crate::error::{GameError, Result};
use crate::factions::{Faction, FactionId};
use crate::lifecycle::{update_superweapons_owned, update_superweapons_unavailable, SuperweaponEvent};
use crate::powered_unit::{powered_unit_system, PoweredUnit, PoweredUnitEvent, UnitTypeId};
use crate::rules::Rules;
use crate::status::SuperweaponStatus;
use crate::structures::{EntityId, Structure, StructureTypeId, Upgrade};
use crate::timer::Frame;

/// Events generated during a single simulation tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickEvents {
    /// Superweapon grants, losses, hold changes and sidebar requests.
    pub superweapon_events: Vec<SuperweaponEvent>,
    /// Powered unit transitions.
    pub unit_events: Vec<PoweredUnitEvent>,
}

impl TickEvents {
    /// Whether nothing observable happened.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.superweapon_events.is_empty() && self.unit_events.is_empty()
    }
}

/// The superweapon simulation.
///
/// # System Execution Order
///
/// Each tick, systems run in this order:
/// 1. **Owned superweapons** - revoke, hold or release granted weapons
/// 2. **Unavailable superweapons** - grant weapons whose slot became available
/// 3. **Timers** - recharge and charge-drain expiry
/// 4. **Powered units** - periodic power source scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    context: SimContext,
    rules: Rules,
    factions: Vec<Faction>,
    units: Vec<PoweredUnit>,
    next_entity: EntityId,
}

impl Simulation {
    /// Create a simulation at frame 0 with no factions.
    #[must_use]
    pub fn new(rules: Rules, settings: GameSettings) -> Self {
        Self {
            context: SimContext::new(settings),
            rules,
            factions: Vec::new(),
            units: Vec::new(),
            next_entity: 1,
        }
    }

    /// Build a simulation from a scenario.
    ///
    /// # Errors
    ///
    /// Returns an error if the scenario names an unknown structure or unit
    /// type, or lists the same faction twice.
    pub fn from_scenario(rules: Rules, scenario: &ScenarioData) -> Result<Self> {
        let mut sim = Self::new(rules, scenario.settings);

        for setup in &scenario.factions {
            let faction = FactionId(setup.id);
            sim.add_faction(faction, setup.name.clone())?;
            sim.require_faction_mut(faction)?.full_power = setup.full_power;

            for structure_setup in &setup.structures {
                let type_id = sim.rules.structure_id(&structure_setup.type_id)?;
                let entity = sim.spawn_structure(faction, type_id)?;
                for upgrade in &structure_setup.upgrades {
                    let upgrade_type = sim.rules.structure_id(upgrade)?;
                    sim.install_upgrade(faction, entity, upgrade_type)?;
                }

                let structure = sim
                    .require_faction_mut(faction)?
                    .structure_mut(entity)
                    .ok_or(GameError::EntityNotFound(entity))?;
                structure.current_mission = structure_setup.mission;
                structure.has_power = structure_setup.has_power;
            }

            for unit_setup in &setup.units {
                let type_id = sim.rules.unit_id(&unit_setup.type_id)?;
                let entity = sim.spawn_unit(faction, type_id)?;
                if let Some(unit) = sim.unit_mut(entity) {
                    unit.in_air = unit_setup.in_air;
                    unit.inside_structure = unit_setup.inside_structure;
                }
            }
        }

        tracing::info!(
            factions = sim.factions.len(),
            units = sim.units.len(),
            "Scenario loaded"
        );
        Ok(sim)
    }

    /// Current simulation frame.
    #[must_use]
    pub const fn frame(&self) -> Frame {
        self.context.frame
    }

    /// Shared pass context.
    #[must_use]
    pub const fn context(&self) -> &SimContext {
        &self.context
    }

    /// Open the observer's sidebar tab for `slot`, or close it.
    pub fn set_current_tab(&mut self, slot: Option<usize>) {
        self.context.current_tab = slot;
    }

    /// Type rules.
    #[must_use]
    pub const fn rules(&self) -> &Rules {
        &self.rules
    }

    /// All factions in insertion order.
    #[must_use]
    pub fn factions(&self) -> &[Faction] {
        &self.factions
    }

    /// Get a faction by ID.
    #[must_use]
    pub fn faction(&self, id: FactionId) -> Option<&Faction> {
        self.factions.iter().find(|f| f.id == id)
    }

    /// Get a faction by ID mutably.
    pub fn faction_mut(&mut self, id: FactionId) -> Option<&mut Faction> {
        self.factions.iter_mut().find(|f| f.id == id)
    }

    /// All powered units.
    #[must_use]
    pub fn units(&self) -> &[PoweredUnit] {
        &self.units
    }

    /// Get a powered unit by entity ID.
    #[must_use]
    pub fn unit(&self, id: EntityId) -> Option<&PoweredUnit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Get a powered unit by entity ID mutably.
    pub fn unit_mut(&mut self, id: EntityId) -> Option<&mut PoweredUnit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    /// Add a faction with an ungranted superweapon for every registered type.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidState`] if the faction already exists.
    pub fn add_faction(&mut self, id: FactionId, name: impl Into<String>) -> Result<()> {
        if self.faction(id).is_some() {
            return Err(GameError::InvalidState(format!(
                "Faction {} already exists",
                id.0
            )));
        }
        self.factions
            .push(Faction::new(id, name, self.rules.superweapon_types()));
        Ok(())
    }

    /// Place a structure of `type_id` for `faction`.
    ///
    /// # Errors
    ///
    /// Returns an error if the faction or structure type is unknown.
    pub fn spawn_structure(
        &mut self,
        faction: FactionId,
        type_id: StructureTypeId,
    ) -> Result<EntityId> {
        let slots = self
            .rules
            .structure(type_id)
            .ok_or_else(|| GameError::UnknownStructureType(type_id.0.to_string()))?
            .superweapons
            .clone();
        let id = self.next_entity;
        self.require_faction_mut(faction)?
            .add_structure(Structure::new(id, type_id, slots));
        self.next_entity += 1;

        tracing::debug!(faction = faction.0, structure = id, "Structure placed");
        Ok(id)
    }

    /// Install an upgrade of `upgrade_type` onto a structure.
    ///
    /// # Errors
    ///
    /// Returns an error if the faction, structure or upgrade type is unknown.
    pub fn install_upgrade(
        &mut self,
        faction: FactionId,
        structure: EntityId,
        upgrade_type: StructureTypeId,
    ) -> Result<()> {
        let superweapons = self
            .rules
            .structure(upgrade_type)
            .ok_or_else(|| GameError::UnknownStructureType(upgrade_type.0.to_string()))?
            .superweapons
            .clone();
        self.require_faction_mut(faction)?
            .structure_mut(structure)
            .ok_or(GameError::EntityNotFound(structure))?
            .add_upgrade(Upgrade {
                type_id: upgrade_type,
                superweapons,
            });
        Ok(())
    }

    /// Spawn a powered unit of `type_id` for `faction`.
    ///
    /// # Errors
    ///
    /// Returns an error if the faction or unit type is unknown.
    pub fn spawn_unit(&mut self, faction: FactionId, type_id: UnitTypeId) -> Result<EntityId> {
        if self.faction(faction).is_none() {
            return Err(GameError::UnknownFaction(faction.0));
        }
        let unit_type = self
            .rules
            .unit(type_id)
            .ok_or_else(|| GameError::UnknownUnitType(type_id.0.to_string()))?;

        let id = self.next_entity;
        let mut unit = PoweredUnit::new(
            id,
            faction,
            type_id,
            unit_type.kind,
            unit_type.powered_by.clone(),
            unit_type.scan_interval,
        );
        unit.emp_threshold = unit_type.emp_threshold;
        unit.last_scan = self.context.frame;
        self.units.push(unit);
        self.next_entity += 1;
        Ok(id)
    }

    /// Fire a superweapon, or cut an active charge-drain weapon short.
    ///
    /// Returns `Ok(false)` if the weapon is not ready.
    ///
    /// # Errors
    ///
    /// Returns an error if the faction or slot is unknown.
    pub fn launch(&mut self, faction: FactionId, slot: usize) -> Result<bool> {
        let now = self.context.frame;
        let Faction {
            superweapons,
            drain_active,
            ..
        } = self.require_faction_mut(faction)?;
        let weapon = superweapons.get_mut(slot).ok_or(GameError::InvalidSlot(slot))?;
        Ok(charge_drain::launch(weapon, drain_active, now))
    }

    /// Put a superweapon on hold or release it on the player's request.
    ///
    /// # Errors
    ///
    /// Returns an error if the faction or slot is unknown.
    pub fn set_on_hold(&mut self, faction: FactionId, slot: usize, on_hold: bool) -> Result<bool> {
        let now = self.context.frame;
        let Faction {
            superweapons,
            drain_active,
            ..
        } = self.require_faction_mut(faction)?;
        let weapon = superweapons.get_mut(slot).ok_or(GameError::InvalidSlot(slot))?;
        Ok(charge_drain::set_on_hold(weapon, on_hold, drain_active, now))
    }

    /// Current per-slot statuses for a faction.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownFaction`] if the faction is not in the simulation.
    pub fn statuses(&self, faction: FactionId) -> Result<Vec<SuperweaponStatus>> {
        let faction = self
            .faction(faction)
            .ok_or(GameError::UnknownFaction(faction.0))?;
        Ok(superweapon_statuses(faction, &self.context.settings))
    }

    /// Advance the simulation by one frame.
    ///
    /// Returns events generated during this tick for use by the host.
    pub fn tick(&mut self) -> TickEvents {
        let mut events = TickEvents::default();
        let drain_before: Vec<bool> = self.factions.iter().map(|f| f.drain_active).collect();

        // 1. Owned superweapons
        for faction in &mut self.factions {
            events
                .superweapon_events
                .extend(update_superweapons_owned(faction, &mut self.context));
        }

        // 2. Unavailable superweapons
        for faction in &mut self.factions {
            events
                .superweapon_events
                .extend(update_superweapons_unavailable(faction, &self.context));
        }

        // 3. Timers
        events.superweapon_events.extend(self.run_timer_system());

        for (faction, before) in self.factions.iter().zip(drain_before) {
            if faction.drain_active != before {
                events.superweapon_events.push(SuperweaponEvent::DrainToggled {
                    faction: faction.id,
                    active: faction.drain_active,
                });
            }
        }

        // 4. Powered units
        events.unit_events = powered_unit_system(&mut self.units, &self.factions, &self.context);
        self.units.retain(|u| u.alive);

        // 5. Cleanup
        for faction in &mut self.factions {
            for entity in faction.remove_dead_structures() {
                tracing::trace!(faction = faction.id.0, entity, "Removed destroyed structure");
            }
        }

        self.context.frame += 1;

        #[cfg(debug_assertions)]
        {
            let hash = self.state_hash();
            tracing::debug!(frame = self.context.frame, state_hash = hash, "Simulation state hash");
        }

        events
    }

    fn run_timer_system(&mut self) -> Vec<SuperweaponEvent> {
        let now = self.context.frame;
        let mut events = Vec::new();

        for faction in &mut self.factions {
            let Faction {
                id,
                superweapons,
                drain_active,
                ..
            } = faction;
            for weapon in superweapons.iter_mut() {
                if progress(weapon, drain_active, now) == ChargeProgress::Charged {
                    events.push(SuperweaponEvent::Charged {
                        faction: *id,
                        slot: weapon.slot(),
                    });
                }
            }
        }

        events
    }

    fn require_faction_mut(&mut self, id: FactionId) -> Result<&mut Faction> {
        self.faction_mut(id).ok_or(GameError::UnknownFaction(id.0))
    }

    /// Calculate a hash of the current simulation state.
    ///
    /// Two simulations with identical state produce identical hashes.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.context.hash(&mut hasher);
        self.factions.hash(&mut hasher);
        self.units.hash(&mut hasher);
        self.next_entity.hash(&mut hasher);
        hasher.finish()
    }

    /// Serialize the simulation state for snapshots.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| GameError::InvalidState(format!("Failed to serialize simulation: {e}")))
    }

    /// Deserialize simulation state from bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data)
            .map_err(|e| GameError::InvalidState(format!("Failed to deserialize simulation: {e}")))
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(Rules::new(), GameSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RulesData;
    use crate::superweapons::ChargeDrainState;

    const RULES: &str = r#"
        RulesData(
            superweapons: [
                SuperweaponData(id: "nuke", name: "sw.nuke", recharge_time: 3, powered: true),
                SuperweaponData(id: "storm", name: "sw.storm", recharge_time: 2, drain_time: Some(2)),
            ],
            structures: [
                StructureData(id: "silo", name: "b.silo", superweapons: [0]),
                StructureData(id: "tower", name: "b.tower"),
                StructureData(id: "storm_upgrade", name: "b.upgrade", superweapons: [1]),
                StructureData(id: "control_node", name: "b.node"),
            ],
            units: [
                UnitData(id: "drone", name: "u.drone", powered_by: ["control_node"], scan_interval: 1),
            ],
        )
    "#;

    const ALLIES: FactionId = FactionId(1);

    fn sim() -> Simulation {
        let data = RulesData::from_ron("rules.ron", RULES).unwrap();
        let mut sim = Simulation::new(
            Rules::from_data(&data).unwrap(),
            GameSettings {
                observer: Some(ALLIES),
                ..GameSettings::default()
            },
        );
        sim.add_faction(ALLIES, "Allies").unwrap();
        sim
    }

    fn structure_type(sim: &Simulation, name: &str) -> StructureTypeId {
        sim.rules().structure_id(name).unwrap()
    }

    #[test]
    fn test_simulation_default() {
        let mut sim = Simulation::default();
        assert_eq!(sim.frame(), 0);
        assert!(sim.tick().is_empty());
        assert_eq!(sim.frame(), 1);
    }

    #[test]
    fn test_duplicate_faction_rejected() {
        let mut sim = sim();
        assert!(matches!(
            sim.add_faction(ALLIES, "Again"),
            Err(GameError::InvalidState(_))
        ));
    }

    #[test]
    fn test_grant_then_charge() {
        let mut sim = sim();
        let silo = structure_type(&sim, "silo");
        sim.spawn_structure(ALLIES, silo).unwrap();

        let events = sim.tick();
        assert!(events.superweapon_events.contains(&SuperweaponEvent::Granted {
            faction: ALLIES,
            slot: 0,
            announce: true,
            on_hold: false,
        }));
        assert!(events
            .superweapon_events
            .contains(&SuperweaponEvent::AddIcon { slot: 0 }));

        sim.tick();
        sim.tick();
        let events = sim.tick();
        assert_eq!(
            events.superweapon_events,
            vec![SuperweaponEvent::Charged {
                faction: ALLIES,
                slot: 0
            }]
        );
        assert!(sim.launch(ALLIES, 0).unwrap());
        assert!(!sim.launch(ALLIES, 0).unwrap());
    }

    #[test]
    fn test_destroyed_structure_loses_weapon() {
        let mut sim = sim();
        let silo = structure_type(&sim, "silo");
        let entity = sim.spawn_structure(ALLIES, silo).unwrap();
        sim.tick();
        sim.set_current_tab(Some(0));

        sim.faction_mut(ALLIES)
            .unwrap()
            .structure_mut(entity)
            .unwrap()
            .alive = false;
        let events = sim.tick();

        assert_eq!(
            events.superweapon_events,
            vec![
                SuperweaponEvent::Lost {
                    faction: ALLIES,
                    slot: 0
                },
                SuperweaponEvent::RepaintTab { slot: 0 },
            ]
        );
        assert_eq!(sim.context().current_tab, None);
        assert!(sim.faction(ALLIES).unwrap().recheck_tech_tree);
    }

    #[test]
    fn test_low_power_holds_powered_weapon() {
        let mut sim = sim();
        let silo = structure_type(&sim, "silo");
        sim.spawn_structure(ALLIES, silo).unwrap();
        sim.tick();

        sim.faction_mut(ALLIES).unwrap().full_power = false;
        let events = sim.tick();
        assert!(events.superweapon_events.contains(&SuperweaponEvent::HoldChanged {
            faction: ALLIES,
            slot: 0,
            on_hold: true,
        }));
        assert!(!sim.statuses(ALLIES).unwrap()[0].power_sourced);
    }

    #[test]
    fn test_upgrade_grants_charge_drain_weapon() {
        let mut sim = sim();
        let tower = structure_type(&sim, "tower");
        let upgrade = structure_type(&sim, "storm_upgrade");
        let entity = sim.spawn_structure(ALLIES, tower).unwrap();
        sim.install_upgrade(ALLIES, entity, upgrade).unwrap();

        sim.tick();
        sim.tick();
        let events = sim.tick();
        assert!(events.superweapon_events.contains(&SuperweaponEvent::Charged {
            faction: ALLIES,
            slot: 1
        }));

        assert!(sim.launch(ALLIES, 1).unwrap());
        assert!(sim.faction(ALLIES).unwrap().drain_active);

        sim.tick();
        sim.tick();
        let events = sim.tick();
        assert!(events.superweapon_events.contains(&SuperweaponEvent::DrainToggled {
            faction: ALLIES,
            active: false
        }));
        assert_eq!(
            sim.faction(ALLIES).unwrap().superweapons[1].charge_drain_state,
            ChargeDrainState::Charging
        );
    }

    #[test]
    fn test_powered_unit_shuts_down_without_node() {
        let mut sim = sim();
        let node = structure_type(&sim, "control_node");
        let drone_type = sim.rules().unit_id("drone").unwrap();
        let node_entity = sim.spawn_structure(ALLIES, node).unwrap();
        let drone = sim.spawn_unit(ALLIES, drone_type).unwrap();

        assert!(sim.tick().unit_events.is_empty());

        sim.faction_mut(ALLIES)
            .unwrap()
            .structure_mut(node_entity)
            .unwrap()
            .emp_disabled = true;
        let events = sim.tick();
        assert_eq!(events.unit_events, vec![PoweredUnitEvent::PoweredDown { unit: drone }]);
        assert!(sim.unit(drone).unwrap().deactivated);
    }

    #[test]
    fn test_unknown_ids_are_errors() {
        let mut sim = sim();
        assert!(matches!(
            sim.spawn_structure(FactionId(9), StructureTypeId(0)),
            Err(GameError::UnknownFaction(9))
        ));
        assert!(matches!(
            sim.spawn_structure(ALLIES, StructureTypeId(99)),
            Err(GameError::UnknownStructureType(_))
        ));
        assert!(matches!(sim.launch(ALLIES, 7), Err(GameError::InvalidSlot(7))));
        assert!(matches!(sim.statuses(FactionId(4)), Err(GameError::UnknownFaction(4))));
    }

    #[test]
    fn test_serialize_roundtrip_preserves_hash() {
        let mut sim = sim();
        let silo = structure_type(&sim, "silo");
        sim.spawn_structure(ALLIES, silo).unwrap();
        sim.tick();

        let bytes = sim.serialize().unwrap();
        let restored = Simulation::deserialize(&bytes).unwrap();
        assert_eq!(restored.state_hash(), sim.state_hash());
        assert_eq!(restored.frame(), sim.frame());
    }
}
