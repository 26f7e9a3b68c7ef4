pub mod ship;
pub mod systems;
pub mod turret;

pub use ship::{default_systems, Ship, Skill};
pub use systems::{SystemName, SystemStatus, SYSTEM_DISABLE_HITS};
pub use turret::Turret;
