//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the simulation produces
//! identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! Superweapon state must be reproducible across clients and across
//! snapshot/restore. Sources of non-determinism include:
//!
//! - **Floating-point math**: charge progress uses
//!   [`sw_core::math::Fixed`] instead.
//! - **HashMap iteration order**: per-tick passes walk factions,
//!   structures and units in insertion order, never a hash map.
//! - **Snapshot drift**: a bincode round-trip must not change the state hash.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use sw_core::simulation::Simulation;

/// Final hashes from repeated runs of the same setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// True when every run ended on the same hash.
    pub is_deterministic: bool,
    /// One final hash per run, in run order.
    pub hashes: Vec<u64>,
    /// Ticks each run advanced.
    pub ticks: u64,
}

impl DeterminismResult {
    /// Distinct final hashes, sorted.
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Fail the calling test when the runs diverged.
    ///
    /// # Panics
    ///
    /// Panics listing every hash when the runs diverged.
    pub fn assert_deterministic(&self) {
        assert!(
            self.is_deterministic,
            "{} runs of {} ticks ended on {} distinct hashes: {:?}",
            self.hashes.len(),
            self.ticks,
            self.unique_hashes().len(),
            self.hashes
        );
    }
}

/// Build `setup()` `runs` times, advance each `ticks` steps and compare the
/// final `hash`.
pub fn verify_determinism<S>(
    runs: usize,
    ticks: u64,
    setup: impl Fn() -> S,
    step: impl Fn(&mut S),
    hash: impl Fn(&S) -> u64,
) -> DeterminismResult {
    let hashes: Vec<u64> = (0..runs)
        .map(|_| {
            let mut state = setup();
            (0..ticks).for_each(|_| step(&mut state));
            hash(&state)
        })
        .collect();

    DeterminismResult {
        is_deterministic: hashes.windows(2).all(|w| w[0] == w[1]),
        hashes,
        ticks,
    }
}

/// Run a [`Simulation`] twice from identical setup and compare final hashes.
pub fn verify_simulation_determinism<F>(setup_fn: F, num_ticks: u64) -> bool
where
    F: Fn() -> Simulation,
{
    verify_determinism(
        2,
        num_ticks,
        &setup_fn,
        |sim| {
            sim.tick();
        },
        Simulation::state_hash,
    )
    .is_deterministic
}

/// Run N simulations on scoped threads and collect final hashes.
///
/// # Panics
///
/// Panics if a simulation thread panics.
pub fn run_parallel_simulations<F>(setup_fn: F, num_sims: usize, num_ticks: u64) -> Vec<u64>
where
    F: Fn() -> Simulation + Sync,
{
    thread::scope(|s| {
        let handles: Vec<_> = (0..num_sims)
            .map(|_| {
                s.spawn(|| {
                    let mut sim = setup_fn();
                    for _ in 0..num_ticks {
                        sim.tick();
                    }
                    sim.state_hash()
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

/// Compare two simulation runs tick-by-tick, finding first divergence.
///
/// Returns `None` if the runs never differ, `Some(tick)` otherwise.
pub fn find_first_divergence<F>(setup_fn: F, num_ticks: u64) -> Option<u64>
where
    F: Fn() -> Simulation,
{
    let mut sim1 = setup_fn();
    let mut sim2 = setup_fn();

    if sim1.state_hash() != sim2.state_hash() {
        return Some(0);
    }

    for tick in 1..=num_ticks {
        let events1 = sim1.tick();
        let events2 = sim2.tick();

        if events1 != events2 || sim1.state_hash() != sim2.state_hash() {
            return Some(tick);
        }
    }

    None
}

/// Verify that a snapshot round-trip preserves simulation state exactly,
/// and that the restored simulation keeps evolving identically.
pub fn verify_serialization_determinism<F>(setup_fn: F, num_ticks: u64) -> bool
where
    F: Fn() -> Simulation,
{
    let mut sim = setup_fn();
    for _ in 0..num_ticks {
        sim.tick();
    }

    let Ok(bytes) = sim.serialize() else {
        return false;
    };
    let Ok(mut restored) = Simulation::deserialize(&bytes) else {
        return false;
    };
    if restored.state_hash() != sim.state_hash() {
        return false;
    }

    for _ in 0..num_ticks {
        if sim.tick() != restored.tick() {
            return false;
        }
    }
    sim.state_hash() == restored.state_hash()
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for structures, factions and settings.
pub mod strategies {
    use proptest::prelude::*;
    use sw_core::context::GameSettings;
    use sw_core::factions::{Faction, FactionId};
    use sw_core::structures::{Mission, Structure, StructureTypeId, Upgrade};
    use sw_core::superweapons::{SuperweaponType, SuperweaponTypeId, NO_SLOT};

    /// Generate any structure activity.
    pub fn arb_mission() -> impl Strategy<Value = Mission> {
        prop_oneof![
            Just(Mission::Sleep),
            Just(Mission::Guard),
            Just(Mission::Construction),
            Just(Mission::Selling),
            Just(Mission::Repair),
            Just(Mission::Unload),
        ]
    }

    /// Generate a raw slot: mostly valid, sometimes the sentinel or out of range.
    pub fn arb_raw_slot(slot_count: u32) -> impl Strategy<Value = i32> {
        let max = i32::try_from(slot_count).unwrap_or(i32::MAX);
        prop_oneof![
            6 => 0..max.max(1),
            1 => Just(NO_SLOT),
            1 => max..max + 4,
        ]
    }

    /// Generate a structure with arbitrary state flags, slots and upgrades.
    pub fn arb_structure(slot_count: u32) -> impl Strategy<Value = Structure> {
        (
            proptest::collection::vec(arb_raw_slot(slot_count), 0..3),
            proptest::collection::vec(proptest::collection::vec(arb_raw_slot(slot_count), 0..2), 0..2),
            any::<[bool; 8]>(),
            arb_mission(),
            arb_mission(),
        )
            .prop_map(|(slots, upgrades, flags, current, queued)| {
                let mut s = Structure::new(0, StructureTypeId(0), slots);
                s.alive = flags[0] || flags[1];
                s.in_limbo = flags[2] && flags[3];
                s.has_power = flags[1] || flags[4];
                s.powered_down = flags[5] && flags[6];
                s.emp_disabled = flags[3] && flags[7];
                s.warping_out = flags[6] && flags[0];
                s.operated = !flags[2] || flags[5];
                s.current_mission = current;
                s.queued_mission = queued;
                for superweapons in upgrades {
                    s.add_upgrade(Upgrade {
                        type_id: StructureTypeId(1),
                        superweapons,
                    });
                }
                s
            })
    }

    /// Generate `slot_count` superweapon types with random capabilities.
    pub fn arb_superweapon_types(slot_count: u32) -> impl Strategy<Value = Vec<SuperweaponType>> {
        let count = slot_count as usize;
        proptest::collection::vec(any::<[bool; 4]>(), count..=count).prop_map(|flags| {
            flags
                .into_iter()
                .zip(0u32..)
                .map(|([powered, shell, hold, restricted], i)| {
                    let mut kind = SuperweaponType::new(SuperweaponTypeId(i), format!("sw{i}"), 50)
                        .with_powered(powered);
                    kind.disableable_from_shell = shell;
                    kind.can_hold = hold;
                    if restricted {
                        kind = kind.with_allowed_factions(vec![FactionId(1)]);
                    }
                    kind
                })
                .collect()
        })
    }

    /// Generate a faction with random weapon types and up to `max_structures` structures.
    pub fn arb_faction(slot_count: u32, max_structures: usize) -> impl Strategy<Value = Faction> {
        (
            1u32..3,
            arb_superweapon_types(slot_count),
            proptest::collection::vec(arb_structure(slot_count), 0..max_structures),
            any::<bool>(),
            any::<bool>(),
        )
            .prop_map(|(id, types, structures, defeated, full_power)| {
                let mut faction = Faction::new(FactionId(id), "generated", &types);
                for (entity, mut structure) in (1u64..).zip(structures) {
                    structure.id = entity;
                    faction.add_structure(structure);
                }
                faction.defeated = defeated;
                faction.full_power = full_power;
                faction
            })
    }

    /// Generate match settings.
    pub fn arb_settings() -> impl Strategy<Value = GameSettings> {
        (any::<bool>(), any::<bool>(), proptest::option::of(1u32..3)).prop_map(
            |(campaign, superweapons_allowed, observer)| GameSettings {
                campaign,
                superweapons_allowed,
                observer: observer.map(FactionId),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{standard_simulation, PLAYER};
    use proptest::prelude::*;
    use sw_core::context::GameSettings;

    fn setup_superweapon_scenario() -> Simulation {
        let mut sim = standard_simulation(GameSettings {
            observer: Some(PLAYER),
            ..GameSettings::default()
        });
        for name in ["missile_silo", "iron_curtain_device", "airfield", "robot_control"] {
            let type_id = sim.rules().structure_id(name).unwrap();
            sim.spawn_structure(PLAYER, type_id).unwrap();
        }
        let drone = sim.rules().unit_id("drone").unwrap();
        sim.spawn_unit(PLAYER, drone).unwrap();
        sim
    }

    #[test]
    fn test_verify_determinism_simple() {
        let result = verify_determinism(3, 100, || 0u64, |n| *n += 1, |n| *n);

        result.assert_deterministic();
        assert_eq!(result.hashes, vec![100, 100, 100]);
    }

    #[test]
    #[should_panic(expected = "2 distinct hashes")]
    fn test_assert_deterministic_reports_divergence() {
        let result = DeterminismResult {
            is_deterministic: false,
            hashes: vec![7, 9],
            ticks: 10,
        };
        result.assert_deterministic();
    }

    #[test]
    fn test_unique_hashes() {
        let result = DeterminismResult {
            is_deterministic: false,
            hashes: vec![3, 1, 3],
            ticks: 1,
        };
        assert_eq!(result.unique_hashes(), vec![1, 3]);
    }

    #[test]
    fn test_empty_simulation_determinism() {
        assert!(verify_simulation_determinism(Simulation::default, 100));
    }

    #[test]
    fn test_superweapon_scenario_determinism() {
        assert!(verify_simulation_determinism(setup_superweapon_scenario, 200));
        assert_eq!(find_first_divergence(setup_superweapon_scenario, 100), None);
    }

    #[test]
    fn test_parallel_simulations_match() {
        let hashes = run_parallel_simulations(setup_superweapon_scenario, 4, 120);
        assert_eq!(hashes.len(), 4);
        assert!(hashes.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_serialization_preserves_state() {
        assert!(verify_serialization_determinism(setup_superweapon_scenario, 45));
    }

    proptest! {
        /// Generated factions always hash the same way.
        #[test]
        fn prop_faction_hash_is_stable(faction in strategies::arb_faction(4, 5)) {
            prop_assert_eq!(compute_hash(&faction), compute_hash(&faction.clone()));
        }
    }
}
