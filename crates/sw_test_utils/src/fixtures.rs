//! Test fixtures and helpers.
//!
//! Pre-built rules, structures and factions for consistent testing.

use fixed::types::I32F32;
use sw_core::context::GameSettings;
use sw_core::data::RulesData;
use sw_core::factions::{Faction, FactionId};
use sw_core::rules::Rules;
use sw_core::simulation::Simulation;
use sw_core::structures::{EntityId, Mission, Structure, StructureTypeId, Upgrade};
use sw_core::superweapons::{SuperweaponType, SuperweaponTypeId};

/// Faction used by single-faction fixtures.
pub const PLAYER: FactionId = FactionId(1);

/// Second faction for multi-faction fixtures.
pub const ENEMY: FactionId = FactionId(2);

/// Rules shared by integration tests and benchmarks.
///
/// Slots: 0 `nuke` (powered), 1 `iron_curtain` (powered),
/// 2 `storm` (charge drain), 3 `paradrop` (cannot hold),
/// 4 `chronosphere` (upgrade-restricted to faction 1).
pub const STANDARD_RULES: &str = r#"
RulesData(
    superweapons: [
        SuperweaponData(id: "nuke", name: "sw.nuke", recharge_time: 30, powered: true),
        SuperweaponData(id: "iron_curtain", name: "sw.iron_curtain", recharge_time: 20, powered: true),
        SuperweaponData(id: "storm", name: "sw.storm", recharge_time: 20, drain_time: Some(10)),
        SuperweaponData(id: "paradrop", name: "sw.paradrop", recharge_time: 15, can_hold: false, auto_fire: true),
        SuperweaponData(id: "chronosphere", name: "sw.chronosphere", recharge_time: 25, allowed_factions: [1]),
    ],
    structures: [
        StructureData(id: "missile_silo", name: "b.missile_silo", superweapons: [0]),
        StructureData(id: "iron_curtain_device", name: "b.iron_curtain", superweapons: [1]),
        StructureData(id: "airfield", name: "b.airfield", superweapons: [3]),
        StructureData(id: "power_plant", name: "b.power_plant"),
        StructureData(id: "weather_upgrade", name: "b.weather_upgrade", superweapons: [2]),
        StructureData(id: "chrono_upgrade", name: "b.chrono_upgrade", superweapons: [-1, 4]),
        StructureData(id: "robot_control", name: "b.robot_control"),
    ],
    units: [
        UnitData(id: "robot_tank", name: "u.robot_tank", kind: Vehicle, powered_by: ["robot_control"], scan_interval: 10),
        UnitData(id: "drone", name: "u.drone", kind: Aircraft, powered_by: ["robot_control"], emp_threshold: -1, scan_interval: 5),
    ],
)
"#;

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
///
/// Note: In real simulation code, never use floats.
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// Parse and register [`STANDARD_RULES`].
///
/// # Panics
///
/// Panics if the embedded rules fail to parse or validate.
#[must_use]
pub fn standard_rules() -> Rules {
    let data = RulesData::from_ron("standard_rules.ron", STANDARD_RULES)
        .expect("standard rules should parse");
    Rules::from_data(&data).expect("standard rules should validate")
}

/// Simulation over [`STANDARD_RULES`] with [`PLAYER`] and [`ENEMY`] added.
///
/// # Panics
///
/// Panics if the standard rules are invalid.
#[must_use]
pub fn standard_simulation(settings: GameSettings) -> Simulation {
    let mut sim = Simulation::new(standard_rules(), settings);
    sim.add_faction(PLAYER, "Allies").expect("fresh faction");
    sim.add_faction(ENEMY, "Soviets").expect("fresh faction");
    sim
}

/// `count` plain superweapon types; slots listed in `powered` require power.
#[must_use]
pub fn superweapon_types(count: u32, powered: &[u32]) -> Vec<SuperweaponType> {
    (0..count)
        .map(|i| {
            SuperweaponType::new(SuperweaponTypeId(i), format!("sw{i}"), 100)
                .with_powered(powered.contains(&i))
        })
        .collect()
}

/// A faction owning one superweapon per type and no structures.
#[must_use]
pub fn faction(id: FactionId, types: &[SuperweaponType]) -> Faction {
    Faction::new(id, format!("faction{}", id.0), types)
}

/// Builder for structures in a specific state.
#[derive(Debug, Clone)]
pub struct StructureBuilder {
    structure: Structure,
}

impl StructureBuilder {
    /// Live, powered, operated, guarding structure granting `slots`.
    #[must_use]
    pub fn new(id: EntityId, slots: Vec<i32>) -> Self {
        Self {
            structure: Structure::new(id, StructureTypeId(0), slots),
        }
    }

    /// Set the structure type.
    #[must_use]
    pub fn type_id(mut self, type_id: StructureTypeId) -> Self {
        self.structure.type_id = type_id;
        self
    }

    /// Set the current activity.
    #[must_use]
    pub fn mission(mut self, mission: Mission) -> Self {
        self.structure.current_mission = mission;
        self
    }

    /// Set the queued activity.
    #[must_use]
    pub fn queued(mut self, mission: Mission) -> Self {
        self.structure.queued_mission = mission;
        self
    }

    /// Cut the structure's power.
    #[must_use]
    pub fn unpowered(mut self) -> Self {
        self.structure.has_power = false;
        self
    }

    /// Disable the structure with an EMP.
    #[must_use]
    pub fn emp(mut self) -> Self {
        self.structure.emp_disabled = true;
        self
    }

    /// Remove the crew.
    #[must_use]
    pub fn unoperated(mut self) -> Self {
        self.structure.operated = false;
        self
    }

    /// Destroy the structure.
    #[must_use]
    pub fn dead(mut self) -> Self {
        self.structure.alive = false;
        self
    }

    /// Move the structure into limbo.
    #[must_use]
    pub fn in_limbo(mut self) -> Self {
        self.structure.in_limbo = true;
        self
    }

    /// Start warping the structure out.
    #[must_use]
    pub fn warping_out(mut self) -> Self {
        self.structure.warping_out = true;
        self
    }

    /// Install an upgrade granting `slots`.
    #[must_use]
    pub fn upgrade(mut self, slots: Vec<i32>) -> Self {
        self.structure.add_upgrade(Upgrade {
            type_id: StructureTypeId(100),
            superweapons: slots,
        });
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> Structure {
        self.structure
    }
}
