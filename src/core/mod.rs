pub mod config;
pub mod error;
pub mod types;

pub use config::EngineConfig;
pub use error::EngineError;
pub use types::{Faction, Round, ShipId};
