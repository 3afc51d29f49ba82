//! Headless scenario runs and their JSON report.

use serde::Serialize;
use sw_core::data::ScenarioData;
use sw_core::lifecycle::SuperweaponEvent;
use sw_core::powered_unit::PoweredUnitEvent;
use sw_core::rules::Rules;
use sw_core::simulation::{Simulation, TickEvents};

use crate::error::ToolResult;

/// Outcome of a headless run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Frames simulated.
    pub frames: u64,
    /// Final state hash, for comparing runs.
    pub state_hash: u64,
    /// Event totals over the whole run.
    pub events: EventCounts,
    /// Final per-faction state.
    pub factions: Vec<FactionReport>,
}

/// Number of events of each kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventCounts {
    /// Superweapons granted.
    pub granted: usize,
    /// Superweapons lost.
    pub lost: usize,
    /// Hold state changes.
    pub hold_changed: usize,
    /// Recharges completed.
    pub charged: usize,
    /// Charge-drain toggle flips.
    pub drain_toggled: usize,
    /// Units brought back online.
    pub powered_up: usize,
    /// Units shut down.
    pub powered_down: usize,
    /// Units crashed.
    pub crashed: usize,
}

impl EventCounts {
    /// Add one tick's events.
    pub fn record(&mut self, events: &TickEvents) {
        for event in &events.superweapon_events {
            match event {
                SuperweaponEvent::Granted { .. } => self.granted += 1,
                SuperweaponEvent::Lost { .. } => self.lost += 1,
                SuperweaponEvent::HoldChanged { .. } => self.hold_changed += 1,
                SuperweaponEvent::Charged { .. } => self.charged += 1,
                SuperweaponEvent::DrainToggled { .. } => self.drain_toggled += 1,
                SuperweaponEvent::RepaintTab { .. } | SuperweaponEvent::AddIcon { .. } => {}
            }
        }
        for event in &events.unit_events {
            match event {
                PoweredUnitEvent::PoweredUp { .. } => self.powered_up += 1,
                PoweredUnitEvent::PoweredDown { .. } => self.powered_down += 1,
                PoweredUnitEvent::Crashed { .. } => self.crashed += 1,
            }
        }
    }
}

/// Final state of one faction.
#[derive(Debug, Clone, Serialize)]
pub struct FactionReport {
    /// Raw faction id.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Charge-drain toggle.
    pub drain_active: bool,
    /// One entry per superweapon slot.
    pub superweapons: Vec<SuperweaponReport>,
}

/// Final state of one superweapon.
#[derive(Debug, Clone, Serialize)]
pub struct SuperweaponReport {
    /// Slot index.
    pub slot: usize,
    /// Type id.
    pub name: String,
    /// Granted to the faction.
    pub granted: bool,
    /// Recharge paused.
    pub on_hold: bool,
    /// Ready to fire.
    pub ready: bool,
    /// Charge progress, 0-100.
    pub charge_percent: u32,
    /// Last computed availability.
    pub available: bool,
    /// Last computed power sourcing.
    pub power_sourced: bool,
    /// Last computed charge eligibility.
    pub charging: bool,
}

/// Run a scenario headlessly.
///
/// `frames` overrides the scenario's own run length.
///
/// # Errors
///
/// Returns an error if the scenario does not fit the rules.
pub fn run_scenario(
    rules: Rules,
    scenario: &ScenarioData,
    frames: Option<u64>,
) -> ToolResult<RunReport> {
    let mut sim = Simulation::from_scenario(rules, scenario)?;
    let frames = frames.unwrap_or(scenario.frames);

    let mut events = EventCounts::default();
    for _ in 0..frames {
        events.record(&sim.tick());
    }
    tracing::info!(frames, state_hash = sim.state_hash(), "Run complete");

    let now = sim.frame();
    let mut factions = Vec::with_capacity(sim.factions().len());
    for faction in sim.factions() {
        let statuses = sim.statuses(faction.id)?;
        let superweapons = faction
            .superweapons
            .iter()
            .zip(statuses)
            .map(|(weapon, status)| SuperweaponReport {
                slot: weapon.slot(),
                name: weapon.kind.name.clone(),
                granted: weapon.granted,
                on_hold: weapon.is_on_hold,
                ready: weapon.ready,
                charge_percent: weapon
                    .charge_progress(now)
                    .saturating_mul_int(100)
                    .to_num::<u32>(),
                available: status.available,
                power_sourced: status.power_sourced,
                charging: status.effective_charging(),
            })
            .collect();

        factions.push(FactionReport {
            id: faction.id.0,
            name: faction.name.clone(),
            drain_active: faction.drain_active,
            superweapons,
        });
    }

    Ok(RunReport {
        frames,
        state_hash: sim.state_hash(),
        events,
        factions,
    })
}

/// Encode a report as JSON.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn to_json(report: &RunReport, pretty: bool) -> ToolResult<String> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    Ok(json)
}
