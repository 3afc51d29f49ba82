//! # Superweapon Core
//!
//! Deterministic superweapon readiness and powered-unit logic for an RTS
//! simulation.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO
//! - No system randomness
//! - No floating-point math (uses fixed-point)
//!
//! Every tick the superweapon statuses of each faction are recomputed from
//! scratch out of its structures, then reconciled with the persistent
//! grant and hold state of its weapons. Powered units rescan their power
//! sources on their own cadence.
//!
//! ## Crate Structure
//!
//! - [`scanner`] - Per-structure superweapon contributions
//! - [`aggregator`] - Faction-wide policy and power overrides
//! - [`lifecycle`] - Grant, revoke and hold passes
//! - [`charge_drain`] - Hold setter and the faction-wide charge-drain toggle
//! - [`powered_unit`] - Units that need a powered structure
//! - [`simulation`] - Tick driver
//! - [`data`] / [`rules`] - RON rules and scenario definitions

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod aggregator;
pub mod charge_drain;
pub mod context;
pub mod data;
pub mod error;
pub mod factions;
pub mod lifecycle;
pub mod math;
pub mod powered_unit;
pub mod rules;
pub mod scanner;
pub mod simulation;
pub mod status;
pub mod structures;
pub mod superweapons;
pub mod timer;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::aggregator::superweapon_statuses;
    pub use crate::charge_drain::set_on_hold;
    pub use crate::context::{GameSettings, SimContext};
    pub use crate::error::{GameError, Result};
    pub use crate::factions::{Faction, FactionId};
    pub use crate::lifecycle::{
        update_superweapons_owned, update_superweapons_unavailable, SuperweaponEvent,
    };
    pub use crate::math::Fixed;
    pub use crate::powered_unit::{
        powered_unit_system, PoweredUnit, PoweredUnitEvent, UnitKind, UnitTypeId,
    };
    pub use crate::rules::Rules;
    pub use crate::simulation::{Simulation, TickEvents};
    pub use crate::status::SuperweaponStatus;
    pub use crate::structures::{EntityId, Mission, Structure, StructureTypeId, Upgrade};
    pub use crate::superweapons::{
        ChargeDrainState, Superweapon, SuperweaponType, SuperweaponTypeId, NO_SLOT,
    };
    pub use crate::timer::Frame;
}
