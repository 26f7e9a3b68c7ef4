//! Combat phase state machine
//!
//! Each round walks the same fixed phase sequence. Advancement is
//! caller-driven: the engine never loops on its own, which keeps manual
//! stepping possible for tests and paced front-ends.

use serde::{Deserialize, Serialize};

/// Phase within a combat round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CombatPhase {
    #[default]
    Initiative,
    Manoeuvre,
    Attack,
    Reaction,
    Actions,
    Damage,
}

impl CombatPhase {
    pub const SEQUENCE: [CombatPhase; 6] = [
        CombatPhase::Initiative,
        CombatPhase::Manoeuvre,
        CombatPhase::Attack,
        CombatPhase::Reaction,
        CombatPhase::Actions,
        CombatPhase::Damage,
    ];

    /// The phase every round opens with
    pub fn first() -> CombatPhase {
        CombatPhase::Initiative
    }

    /// The following phase, or None once the round is exhausted
    pub fn next(&self) -> Option<CombatPhase> {
        let index = Self::SEQUENCE.iter().position(|phase| phase == self)?;
        Self::SEQUENCE.get(index + 1).copied()
    }

    pub fn label(&self) -> &'static str {
        match self {
            CombatPhase::Initiative => "Initiative",
            CombatPhase::Manoeuvre => "Manoeuvre",
            CombatPhase::Attack => "Attack",
            CombatPhase::Reaction => "Reaction",
            CombatPhase::Actions => "Actions",
            CombatPhase::Damage => "Damage",
        }
    }
}
