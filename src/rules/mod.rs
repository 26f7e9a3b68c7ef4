//! Pure rules tables and the shared resolution check

pub mod called_shot;
pub mod checks;
pub mod range;
pub mod weapons;

pub use called_shot::{called_shot_penalty, select_called_shot_target, CalledShotContext};
pub use checks::{resolve_check, resolve_check_against, skill_check, CheckResult, TARGET_NUMBER};
pub use range::{range_dm_for_label, RangeBand};
pub use weapons::WeaponType;
