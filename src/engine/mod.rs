pub mod attack;
pub mod combat;
pub mod phase;
pub mod stats;

pub use attack::{AttackOptions, AttackResult, ModifierBreakdown, PointDefenseResult};
pub use combat::{CombatEngine, CombatOutcome, SandcasterResult, EVASIVE_THRUST};
pub use phase::CombatPhase;
pub use stats::CombatStats;
