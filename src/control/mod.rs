//! Control-mode and turn-gating policy
//!
//! Pure functions over small enums deciding whether a human must be
//! prompted for a station's action under the current automation mode.
//! Consulted by the surrounding orchestration; nothing here reads ship
//! state beyond the numbers passed in.

use crate::stations::actions::Role;
use serde::{Deserialize, Serialize};

/// Hull fraction at or below which a prudent crew runs for it
pub const AUTO_ESCAPE_HULL_FRACTION: f32 = 0.75;

/// Who gets prompted for decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AutomationMode {
    /// No prompts; every station runs itself
    Auto,
    /// Only the captain's station prompts
    #[default]
    Captain,
    /// Prompting follows the active-role filter
    Role,
}

impl AutomationMode {
    pub fn cycle_forward(&self) -> AutomationMode {
        match self {
            AutomationMode::Auto => AutomationMode::Captain,
            AutomationMode::Captain => AutomationMode::Role,
            AutomationMode::Role => AutomationMode::Auto,
        }
    }

    pub fn cycle_back(&self) -> AutomationMode {
        match self {
            AutomationMode::Auto => AutomationMode::Role,
            AutomationMode::Captain => AutomationMode::Auto,
            AutomationMode::Role => AutomationMode::Captain,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AutomationMode::Auto => "Auto",
            AutomationMode::Captain => "Captain",
            AutomationMode::Role => "Role",
        }
    }
}

/// Which stations prompt when the mode is `Role`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ActiveRole {
    /// Every station prompts
    #[default]
    All,
    /// Only this station prompts; the rest run themselves
    Only(Role),
}

impl ActiveRole {
    const CYCLE: [ActiveRole; 6] = [
        ActiveRole::All,
        ActiveRole::Only(Role::Captain),
        ActiveRole::Only(Role::Pilot),
        ActiveRole::Only(Role::Gunner),
        ActiveRole::Only(Role::Engineer),
        ActiveRole::Only(Role::Sensors),
    ];

    pub fn cycle_forward(&self) -> ActiveRole {
        let index = Self::CYCLE.iter().position(|r| r == self).unwrap_or(0);
        Self::CYCLE[(index + 1) % Self::CYCLE.len()]
    }

    pub fn cycle_back(&self) -> ActiveRole {
        let index = Self::CYCLE.iter().position(|r| r == self).unwrap_or(0);
        Self::CYCLE[(index + Self::CYCLE.len() - 1) % Self::CYCLE.len()]
    }
}

/// Pacing between automated steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TurnPace {
    Instant,
    #[default]
    Brisk,
    Measured,
}

impl TurnPace {
    /// Delay the orchestrator inserts between automated steps
    pub fn delay_ms(&self) -> u64 {
        match self {
            TurnPace::Instant => 0,
            TurnPace::Brisk => 600,
            TurnPace::Measured => 1500,
        }
    }

    pub fn cycle_forward(&self) -> TurnPace {
        match self {
            TurnPace::Instant => TurnPace::Brisk,
            TurnPace::Brisk => TurnPace::Measured,
            TurnPace::Measured => TurnPace::Instant,
        }
    }

    pub fn cycle_back(&self) -> TurnPace {
        match self {
            TurnPace::Instant => TurnPace::Measured,
            TurnPace::Brisk => TurnPace::Instant,
            TurnPace::Measured => TurnPace::Brisk,
        }
    }
}

/// Whether the automated crew ever runs from a fight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FightMode {
    /// Break off once the hull drops to three quarters
    #[default]
    Prudent,
    /// Never disengage
    ToTheEnd,
}

impl FightMode {
    pub fn cycle_forward(&self) -> FightMode {
        match self {
            FightMode::Prudent => FightMode::ToTheEnd,
            FightMode::ToTheEnd => FightMode::Prudent,
        }
    }

    pub fn cycle_back(&self) -> FightMode {
        self.cycle_forward()
    }
}

/// Must a human be prompted before this station acts?
pub fn requires_prompt(mode: AutomationMode, active: ActiveRole, station: Role) -> bool {
    match mode {
        AutomationMode::Auto => false,
        AutomationMode::Captain => station == Role::Captain,
        AutomationMode::Role => match active {
            ActiveRole::All => true,
            ActiveRole::Only(role) => station == role,
        },
    }
}

/// Should the automated crew break off at this hull state?
pub fn auto_escape(mode: FightMode, hull: i32, max_hull: i32) -> bool {
    if mode == FightMode::ToTheEnd || max_hull <= 0 {
        return false;
    }
    (hull as f32) <= (max_hull as f32) * AUTO_ESCAPE_HULL_FRACTION
}
