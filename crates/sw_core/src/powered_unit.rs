//! Units that need a powered structure to keep running.
//!
//! Each unit rescans its owner's structures on its own cadence. Losing
//! every qualifying power source deactivates the unit like an EMP would;
//! regaining one reactivates it. Aircraft that can only be disabled in
//! flight crash instead.

use serde::{Deserialize, Serialize};

use crate::context::SimContext;
use crate::factions::{Faction, FactionId};
use crate::structures::{EntityId, StructureTypeId};
use crate::timer::Frame;

/// Unique identifier for unit types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitTypeId(pub u32);

/// Broad classification of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnitKind {
    /// Foot soldiers.
    Infantry,
    /// Ground vehicles.
    #[default]
    Vehicle,
    /// Aircraft.
    Aircraft,
    /// Deployed or static defences.
    Structure,
}

impl UnitKind {
    /// Whether units of this kind can sit inside a factory.
    #[must_use]
    pub const fn can_be_inside_structure(self) -> bool {
        matches!(self, Self::Infantry | Self::Vehicle)
    }
}

/// A unit whose operation depends on a powered structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoweredUnit {
    /// Entity identifier.
    pub id: EntityId,
    /// Owning faction.
    pub owner: FactionId,
    /// Unit type.
    pub type_id: UnitTypeId,
    /// Unit classification.
    pub kind: UnitKind,
    /// Structure types that can power this unit.
    pub powered_by: Vec<StructureTypeId>,
    /// EMP threshold; negative means "only disabled while airborne".
    pub emp_threshold: i32,
    /// Frames between power scans.
    pub scan_interval: u32,
    /// Frame of the last scan.
    pub last_scan: Frame,
    /// Result of the last scan.
    pub powered: bool,
    /// Shut down.
    pub deactivated: bool,
    /// Frames of EMP effect remaining on the unit itself.
    pub emp_frames: u32,
    /// Crew requirements are met.
    pub operated: bool,
    /// Not destroyed.
    pub alive: bool,
    /// Currently flying.
    pub in_air: bool,
    /// Standing inside a structure with an interior (factory, barracks).
    pub inside_structure: bool,
}

/// Events generated by powered unit scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoweredUnitEvent {
    /// The unit came back online.
    PoweredUp {
        /// The unit entity.
        unit: EntityId,
    },
    /// The unit shut down.
    PoweredDown {
        /// The unit entity.
        unit: EntityId,
    },
    /// The unit could not be shut down in flight and crashed.
    Crashed {
        /// The unit entity.
        unit: EntityId,
        /// Play the crash voice for the observing player.
        play_voice: bool,
    },
}

impl PoweredUnit {
    /// Create an active unit that scans every `scan_interval` frames.
    #[must_use]
    pub fn new(
        id: EntityId,
        owner: FactionId,
        type_id: UnitTypeId,
        kind: UnitKind,
        powered_by: Vec<StructureTypeId>,
        scan_interval: u32,
    ) -> Self {
        Self {
            id,
            owner,
            type_id,
            kind,
            powered_by,
            emp_threshold: 0,
            scan_interval,
            last_scan: 0,
            powered: true,
            deactivated: false,
            emp_frames: 0,
            operated: true,
            alive: true,
            in_air: false,
            inside_structure: false,
        }
    }

    /// Whether the unit itself is under an EMP effect.
    #[must_use]
    pub const fn is_under_emp(&self) -> bool {
        self.emp_frames > 0
    }

    /// Whether any structure of `owner` currently powers this unit.
    #[must_use]
    pub fn is_powered_by(&self, owner: &Faction) -> bool {
        owner
            .structures
            .iter()
            .any(|s| self.powered_by.contains(&s.type_id) && s.supplies_unit_power())
    }

    /// Whether a scan is due at `frame`.
    #[must_use]
    pub fn scan_due(&self, frame: Frame) -> bool {
        frame.saturating_sub(self.last_scan) >= u64::from(self.scan_interval)
    }

    /// Rescan power sources and apply any transition.
    pub fn update(&mut self, owner: &Faction, ctx: &SimContext) -> Option<PoweredUnitEvent> {
        if !self.scan_due(ctx.frame) {
            return None;
        }

        let has_power = self.is_powered_by(owner);
        self.powered = has_power;

        let event = if has_power && self.deactivated {
            self.power_up()
        } else if !has_power && !self.deactivated {
            // Shutting down a unit inside a factory would stall its queue
            if self.kind.can_be_inside_structure() && self.inside_structure {
                None
            } else {
                self.power_down(ctx)
            }
        } else {
            None
        };

        self.last_scan = ctx.frame;
        event
    }

    fn power_up(&mut self) -> Option<PoweredUnitEvent> {
        if self.is_under_emp() || !self.operated {
            return None;
        }
        self.deactivated = false;
        tracing::debug!(unit = self.id, "Powered unit back online");
        Some(PoweredUnitEvent::PoweredUp { unit: self.id })
    }

    fn power_down(&mut self, ctx: &SimContext) -> Option<PoweredUnitEvent> {
        if !self.is_deactivation_advisable() {
            return None;
        }
        if self.try_deactivate() {
            tracing::debug!(unit = self.id, "Powered unit shut down");
            return Some(PoweredUnitEvent::PoweredDown { unit: self.id });
        }

        if self.emp_threshold < 0 && self.in_air {
            self.alive = false;
            self.in_air = false;
            let play_voice = ctx.is_observer(self.owner);
            tracing::debug!(unit = self.id, "Powered unit crashed");
            return Some(PoweredUnitEvent::Crashed {
                unit: self.id,
                play_voice,
            });
        }
        None
    }

    fn is_deactivation_advisable(&self) -> bool {
        self.alive && !self.deactivated
    }

    /// Shut the unit down. Units cannot idle in the air.
    fn try_deactivate(&mut self) -> bool {
        if self.in_air {
            return false;
        }
        self.deactivated = true;
        true
    }
}

/// Run the power scan for every live unit.
///
/// Units whose owner is missing from `factions` are skipped.
pub fn powered_unit_system(
    units: &mut [PoweredUnit],
    factions: &[Faction],
    ctx: &SimContext,
) -> Vec<PoweredUnitEvent> {
    let mut events = Vec::new();

    for unit in units.iter_mut().filter(|u| u.alive) {
        let Some(owner) = factions.iter().find(|f| f.id == unit.owner) else {
            continue;
        };
        if let Some(event) = unit.update(owner, ctx) {
            events.push(event);
        }
    }

    events
}
