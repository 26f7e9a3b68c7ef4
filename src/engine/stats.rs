//! Running combat statistics
//!
//! Counters incremented as a side effect of resolution, for post-combat
//! reporting. Nothing in the rules reads them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CombatStats {
    pub rounds: u32,
    pub attacks: u32,
    pub hits: u32,
    pub misses: u32,
    pub damage_dealt: i64,
    pub power_drained: i64,
    pub missiles_launched: u32,
    pub point_defense_attempts: u32,
    pub point_defense_intercepts: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_start_at_zero() {
        let stats = CombatStats::default();
        assert_eq!(stats.attacks, 0);
        assert_eq!(stats.damage_dealt, 0);
    }
}
