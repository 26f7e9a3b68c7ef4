//! Attack resolution value objects
//!
//! `AttackResult` is transient: returned to the caller and mirrored into
//! the published events, never stored by the engine.

use crate::rules::weapons::WeaponType;
use crate::ships::systems::SystemName;
use serde::{Deserialize, Serialize};

/// Per-source breakdown of the net attack modifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierBreakdown {
    pub fire_control: i32,
    pub gunner_skill: i32,
    pub range: i32,
    /// Negative of the defender's thrust while evasive
    pub evasive: i32,
    pub weapon: i32,
    /// Penalty for calling the shot against a named system
    pub called_shot: i32,
    /// Bonus from a held sensor lock, consumed by this attack
    pub target_lock: i32,
}

impl ModifierBreakdown {
    pub fn total(&self) -> i32 {
        self.fire_control
            + self.gunner_skill
            + self.range
            + self.evasive
            + self.weapon
            + self.called_shot
            + self.target_lock
    }
}

/// Outcome of a defender's missile intercept attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointDefenseResult {
    pub roll: i32,
    pub gunner_skill: i32,
    /// Cumulative penalty from repeated attempts this round
    pub penalty: i32,
    pub total: i32,
    pub intercepted: bool,
}

/// Caller-supplied options for one attack
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AttackOptions {
    /// Fire this weapon type instead of the mount's primary
    pub weapon: Option<WeaponType>,
    /// Which mount fires; defaults to the first
    pub turret_index: Option<usize>,
    /// Switch to missiles when the range is long and ammunition remains
    pub auto_missile: bool,
    /// Call the shot against a named system, at its penalty
    pub called_shot: Option<SystemName>,
}

/// Full record of one resolved attack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackResult {
    /// False only for precondition failures, which mutate nothing
    pub success: bool,
    pub reason: Option<String>,
    pub weapon: Option<WeaponType>,
    pub hit: bool,
    pub roll: i32,
    pub total: i32,
    pub effect: i32,
    pub modifiers: ModifierBreakdown,
    pub damage: i32,
    pub power_drain: i32,
    /// Rounds of system disruption from an ion hit
    pub ion_duration: Option<u8>,
    /// Called-shot system carried through for the caller
    pub system_damage: Option<SystemName>,
    pub destroyed: bool,
    pub point_defense: Option<PointDefenseResult>,
}

impl AttackResult {
    /// Precondition failure: no dice rolled, no state touched
    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            reason: Some(reason.into()),
            weapon: None,
            hit: false,
            roll: 0,
            total: 0,
            effect: 0,
            modifiers: ModifierBreakdown::default(),
            damage: 0,
            power_drain: 0,
            ion_duration: None,
            system_damage: None,
            destroyed: false,
            point_defense: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_total_sums_all_parts() {
        let modifiers = ModifierBreakdown {
            fire_control: 2,
            gunner_skill: 2,
            range: 0,
            evasive: -3,
            weapon: 2,
            called_shot: -4,
            target_lock: 1,
        };
        assert_eq!(modifiers.total(), 0);
    }

    #[test]
    fn test_failure_carries_reason() {
        let result = AttackResult::failure("No weapon available");
        assert!(!result.success);
        assert_eq!(result.reason.as_deref(), Some("No weapon available"));
        assert_eq!(result.damage, 0);
    }
}
