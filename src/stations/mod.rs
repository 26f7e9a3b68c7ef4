//! Crew stations: the role-action framework and its specializations

pub mod actions;
pub mod captain;
pub mod engineer;
pub mod gunner;
pub mod pilot;
pub mod sensors;

pub use actions::{
    ActionAvailability, ActionId, ActionParams, ActionResult, ActionSpec, ActionView, Role,
    StationEngine,
};
pub use gunner::reset_turrets;
