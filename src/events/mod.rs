pub mod bus;
pub mod event;

pub use bus::{EventBus, Handler, SubscriptionId, Topic};
pub use event::{CombatEvent, EventKind, EventPayload, InitiativeEntry};
