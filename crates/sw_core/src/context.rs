//! Process-wide simulation context.
//!
//! The current frame, the open superweapon tab and the match settings are
//! passed explicitly to every pass. The driver is the only writer between
//! passes.

use serde::{Deserialize, Serialize};

use crate::factions::FactionId;
use crate::timer::Frame;

/// Match-level settings chosen before the game starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameSettings {
    /// Single-player campaign mission.
    #[serde(default)]
    pub campaign: bool,
    /// Superweapons enabled in the game shell.
    #[serde(default = "default_true")]
    pub superweapons_allowed: bool,
    /// Faction of the local human player, if any.
    #[serde(default)]
    pub observer: Option<FactionId>,
}

/// Default to true for superweapons_allowed.
const fn default_true() -> bool {
    true
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            campaign: false,
            superweapons_allowed: true,
            observer: None,
        }
    }
}

impl GameSettings {
    /// Whether shell-disableable superweapons are removed this match.
    #[must_use]
    pub const fn shell_disables_superweapons(&self) -> bool {
        !self.campaign && !self.superweapons_allowed
    }
}

/// Mutable context shared by the per-tick passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SimContext {
    /// Current simulation frame.
    pub frame: Frame,
    /// Superweapon slot whose sidebar tab is open.
    pub current_tab: Option<usize>,
    /// Match settings.
    pub settings: GameSettings,
}

impl SimContext {
    /// Create a context at frame 0.
    #[must_use]
    pub fn new(settings: GameSettings) -> Self {
        Self {
            frame: 0,
            current_tab: None,
            settings,
        }
    }

    /// Whether a human player is watching the sidebar.
    #[must_use]
    pub const fn has_observer(&self) -> bool {
        self.settings.observer.is_some()
    }

    /// Whether `faction` belongs to the observing player.
    #[must_use]
    pub fn is_observer(&self, faction: FactionId) -> bool {
        self.settings.observer == Some(faction)
    }
}
