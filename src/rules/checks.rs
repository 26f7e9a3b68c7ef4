//! The single 2d6 resolution rule
//!
//! Every check in the engine - attack rolls, point defense, skill checks -
//! is 2d6 plus modifiers against a target number, succeeding on a total at
//! or above it. The margin of success is the Effect. No subsystem may
//! special-case this rule.

use crate::dice::DiceRoller;
use serde::{Deserialize, Serialize};

/// The standard target number for an average task
pub const TARGET_NUMBER: i32 = 8;

/// Outcome of a 2d6 check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Natural 2d6 result before modifiers
    pub roll: i32,
    /// Roll plus all modifiers
    pub total: i32,
    pub success: bool,
    /// Margin over the target number; zero on a failure
    pub effect: i32,
}

/// Resolve a roll against the standard target number
pub fn resolve_check(roll: i32, dm: i32) -> CheckResult {
    resolve_check_against(roll, dm, TARGET_NUMBER)
}

/// Resolve a roll against an explicit difficulty
pub fn resolve_check_against(roll: i32, dm: i32, difficulty: i32) -> CheckResult {
    let total = roll + dm;
    let success = total >= difficulty;
    CheckResult {
        roll,
        total,
        success,
        effect: if success { total - difficulty } else { 0 },
    }
}

/// Roll a skill check: 2d6 + skill + modifiers vs difficulty
pub fn skill_check(
    dice: &mut dyn DiceRoller,
    skill: i32,
    difficulty: i32,
    modifiers: &[i32],
) -> CheckResult {
    let dm = skill + modifiers.iter().sum::<i32>();
    resolve_check_against(dice.roll_2d6(), dm, difficulty)
}
