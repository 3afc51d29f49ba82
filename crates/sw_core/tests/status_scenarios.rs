//! Scenario tests for superweapon statuses and the lifecycle passes.
//!
//! These drive the public passes directly on hand-built factions, plus a
//! few end-to-end runs through `Simulation`.

use sw_core::context::{GameSettings, SimContext};
use sw_core::lifecycle::{update_superweapons_owned, update_superweapons_unavailable, SuperweaponEvent};
use sw_core::powered_unit::{PoweredUnit, PoweredUnitEvent, UnitKind, UnitTypeId};
use sw_core::prelude::*;
use sw_test_utils::fixtures::{
    faction, standard_simulation, superweapon_types, StructureBuilder, ENEMY, PLAYER,
};

const NONE: SuperweaponStatus = SuperweaponStatus::NONE;

fn status(available: bool, power_sourced: bool, charging: bool) -> SuperweaponStatus {
    SuperweaponStatus {
        available,
        power_sourced,
        charging,
    }
}

// =============================================================================
// Status computation
// =============================================================================

#[test]
fn test_single_structure_grants_full_status() {
    let mut f = faction(PLAYER, &superweapon_types(4, &[]));
    f.add_structure(StructureBuilder::new(1, vec![2]).build());

    let statuses = superweapon_statuses(&f, &GameSettings::default());
    assert_eq!(statuses, vec![NONE, NONE, status(true, true, true), NONE]);
}

#[test]
fn test_selling_structure_stops_charging() {
    let mut f = faction(PLAYER, &superweapon_types(4, &[]));
    f.add_structure(StructureBuilder::new(1, vec![2]).mission(Mission::Selling).build());

    let statuses = superweapon_statuses(&f, &GameSettings::default());
    assert_eq!(statuses[2], status(true, true, false));
}

#[test]
fn test_low_power_gates_powered_slot() {
    let mut f = faction(PLAYER, &superweapon_types(4, &[2]));
    f.full_power = false;
    f.add_structure(StructureBuilder::new(1, vec![2]).build());

    let statuses = superweapon_statuses(&f, &GameSettings::default());
    assert!(statuses[2].available);
    assert!(!statuses[2].power_sourced);
    assert!(!statuses[2].effective_charging());
}

#[test]
fn test_defeated_faction_has_nothing() {
    let mut f = faction(PLAYER, &superweapon_types(3, &[]));
    f.add_structure(StructureBuilder::new(1, vec![0, 1, 2]).build());
    f.defeated = true;

    let statuses = superweapon_statuses(&f, &GameSettings::default());
    assert!(statuses.iter().all(|s| *s == NONE));
}

#[test]
fn test_second_structure_upgrades_status() {
    let mut f = faction(PLAYER, &superweapon_types(1, &[]));
    f.add_structure(StructureBuilder::new(1, vec![0]).unpowered().build());
    f.add_structure(StructureBuilder::new(2, vec![0]).mission(Mission::Construction).build());
    f.add_structure(StructureBuilder::new(3, vec![0]).build());

    let statuses = superweapon_statuses(&f, &GameSettings::default());
    assert_eq!(statuses[0], status(true, true, true));
}

#[test]
fn test_upgrade_slots_count_and_sentinels_are_skipped() {
    let mut f = faction(PLAYER, &superweapon_types(3, &[]));
    f.add_structure(
        StructureBuilder::new(1, vec![-1, 17])
            .upgrade(vec![-1, 1])
            .build(),
    );

    let statuses = superweapon_statuses(&f, &GameSettings::default());
    assert_eq!(statuses, vec![NONE, status(true, true, true), NONE]);
}

#[test]
fn test_restricted_upgrade_ignored_for_other_faction() {
    let mut types = superweapon_types(2, &[]);
    types[1] = types[1].clone().with_allowed_factions(vec![PLAYER]);

    let mut enemy = faction(ENEMY, &types);
    enemy.add_structure(StructureBuilder::new(1, vec![]).upgrade(vec![1]).build());
    assert!(!superweapon_statuses(&enemy, &GameSettings::default())[1].available);

    // The structure's own slots are not restricted
    enemy.add_structure(StructureBuilder::new(2, vec![1]).build());
    assert!(superweapon_statuses(&enemy, &GameSettings::default())[1].available);
}

#[test]
fn test_limbo_and_dead_structures_contribute_nothing() {
    let mut f = faction(PLAYER, &superweapon_types(2, &[]));
    f.add_structure(StructureBuilder::new(1, vec![0]).in_limbo().build());
    f.add_structure(StructureBuilder::new(2, vec![1]).dead().build());

    let statuses = superweapon_statuses(&f, &GameSettings::default());
    assert_eq!(statuses, vec![NONE, NONE]);
}

// =============================================================================
// Lifecycle passes
// =============================================================================

#[test]
fn test_one_time_weapon_untouched_until_defeat() {
    let mut f = faction(PLAYER, &superweapon_types(1, &[]));
    f.superweapons[0].grant(true, false, false, 0);
    let mut ctx = SimContext::new(GameSettings::default());

    // No structure grants the slot, but one-time weapons are kept
    assert!(update_superweapons_owned(&mut f, &mut ctx).is_empty());
    assert!(f.superweapons[0].granted);

    f.defeated = true;
    let events = update_superweapons_owned(&mut f, &mut ctx);
    assert_eq!(
        events,
        vec![SuperweaponEvent::Lost {
            faction: PLAYER,
            slot: 0
        }]
    );
    assert!(!f.superweapons[0].granted);
}

#[test]
fn test_grant_pass_makes_one_time_weapon_permanent() {
    let mut f = faction(PLAYER, &superweapon_types(1, &[]));
    f.superweapons[0].grant(true, false, false, 0);
    f.add_structure(StructureBuilder::new(1, vec![0]).build());
    let ctx = SimContext::new(GameSettings {
        observer: Some(PLAYER),
        ..GameSettings::default()
    });

    let events = update_superweapons_unavailable(&mut f, &ctx);
    assert_eq!(
        events,
        vec![
            SuperweaponEvent::Granted {
                faction: PLAYER,
                slot: 0,
                announce: true,
                on_hold: false,
            },
            SuperweaponEvent::AddIcon { slot: 0 },
            SuperweaponEvent::RepaintTab { slot: 0 },
        ]
    );
    assert!(f.superweapons[0].granted);
    assert!(!f.superweapons[0].one_time);

    // Now permanent, so the grant pass leaves it alone
    assert!(update_superweapons_unavailable(&mut f, &ctx).is_empty());
}

#[test]
fn test_grant_pass_starts_unpowered_weapon_on_hold() {
    let mut f = faction(PLAYER, &superweapon_types(1, &[]));
    f.add_structure(StructureBuilder::new(1, vec![0]).emp().build());
    let ctx = SimContext::new(GameSettings::default());

    let events = update_superweapons_unavailable(&mut f, &ctx);
    assert_eq!(
        events,
        vec![SuperweaponEvent::Granted {
            faction: PLAYER,
            slot: 0,
            announce: false,
            on_hold: true,
        }]
    );
    assert!(f.superweapons[0].is_on_hold);
}

#[test]
fn test_grant_pass_skips_defeated_faction() {
    let mut f = faction(PLAYER, &superweapon_types(1, &[]));
    f.add_structure(StructureBuilder::new(1, vec![0]).build());
    f.defeated = true;

    let ctx = SimContext::new(GameSettings::default());
    assert!(update_superweapons_unavailable(&mut f, &ctx).is_empty());
    assert!(!f.superweapons[0].granted);
}

#[test]
fn test_charge_drain_hold_clears_faction_toggle() {
    let types = vec![SuperweaponType::new(SuperweaponTypeId(0), "storm", 20).with_charge_drain(10)];
    let mut f = faction(PLAYER, &types);
    f.add_structure(StructureBuilder::new(1, vec![0]).build());
    let mut ctx = SimContext::new(GameSettings::default());
    update_superweapons_unavailable(&mut f, &ctx);
    f.drain_active = true;

    // Selling stops charging, which holds an unpowered weapon
    f.structures[0].current_mission = Mission::Selling;
    ctx.frame = 1;
    update_superweapons_owned(&mut f, &mut ctx);

    assert!(f.superweapons[0].is_on_hold);
    assert!(!f.drain_active);
    assert_eq!(f.superweapons[0].charge_drain_state, ChargeDrainState::None);
}

// =============================================================================
// End-to-end
// =============================================================================

#[test]
fn test_shell_disabled_match_grants_nothing() {
    let mut sim = standard_simulation(GameSettings {
        superweapons_allowed: false,
        ..GameSettings::default()
    });
    let silo = sim.rules().structure_id("missile_silo").unwrap();
    sim.spawn_structure(PLAYER, silo).unwrap();

    let events = sim.tick();
    assert!(events.superweapon_events.is_empty());
    assert!(!sim.faction(PLAYER).unwrap().superweapons[0].granted);
}

#[test]
fn test_chrono_upgrade_only_for_allowed_faction() {
    let mut sim = standard_simulation(GameSettings::default());
    let plant = sim.rules().structure_id("power_plant").unwrap();
    let upgrade = sim.rules().structure_id("chrono_upgrade").unwrap();
    for faction in [PLAYER, ENEMY] {
        let entity = sim.spawn_structure(faction, plant).unwrap();
        sim.install_upgrade(faction, entity, upgrade).unwrap();
    }

    sim.tick();
    assert!(sim.faction(PLAYER).unwrap().superweapons[4].granted);
    assert!(!sim.faction(ENEMY).unwrap().superweapons[4].granted);
}

#[test]
fn test_drone_crashes_when_control_lost_in_flight() {
    let mut sim = standard_simulation(GameSettings {
        observer: Some(PLAYER),
        ..GameSettings::default()
    });
    let control = sim.rules().structure_id("robot_control").unwrap();
    let node = sim.spawn_structure(PLAYER, control).unwrap();
    let drone_type = sim.rules().unit_id("drone").unwrap();
    let drone = sim.spawn_unit(PLAYER, drone_type).unwrap();
    sim.unit_mut(drone).unwrap().in_air = true;

    sim.faction_mut(PLAYER)
        .unwrap()
        .structure_mut(node)
        .unwrap()
        .alive = false;

    let mut crashed = Vec::new();
    for _ in 0..6 {
        crashed.extend(sim.tick().unit_events);
    }
    assert_eq!(
        crashed,
        vec![PoweredUnitEvent::Crashed {
            unit: drone,
            play_voice: true
        }]
    );
    assert!(sim.unit(drone).is_none());
}

#[test]
fn test_unit_scan_interval_gates_evaluation() {
    let f = faction(PLAYER, &[]);
    let mut unit = PoweredUnit::new(1, PLAYER, UnitTypeId(0), UnitKind::Vehicle, vec![], 10);
    let mut ctx = SimContext::new(GameSettings::default());

    ctx.frame = 5;
    assert_eq!(unit.update(&f, &ctx), None);
    assert!(!unit.deactivated);

    ctx.frame = 10;
    assert_eq!(unit.update(&f, &ctx), Some(PoweredUnitEvent::PoweredDown { unit: 1 }));
}

#[test]
fn test_infantry_inside_factory_keeps_running() {
    let f = faction(PLAYER, &[]);
    let mut unit = PoweredUnit::new(1, PLAYER, UnitTypeId(0), UnitKind::Infantry, vec![], 10);
    unit.inside_structure = true;
    let mut ctx = SimContext::new(GameSettings::default());
    ctx.frame = 10;

    assert_eq!(unit.update(&f, &ctx), None);
    assert!(!unit.deactivated);
}
