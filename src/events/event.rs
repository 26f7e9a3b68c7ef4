//! Combat event records
//!
//! Every state change the engine makes is announced as a `CombatEvent`.
//! The payload enum is the wire contract to rendering adapters; the
//! fieldless `EventKind` discriminant is the subscription key.

use crate::core::types::{Faction, Round, ShipId};
use crate::engine::attack::{ModifierBreakdown, PointDefenseResult};
use crate::engine::phase::CombatPhase;
use crate::rules::weapons::WeaponType;
use crate::ships::systems::SystemName;
use crate::stations::actions::{ActionId, ActionParams, Role};
use serde::{Deserialize, Serialize};

/// Immutable event record published by the bus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatEvent {
    /// Monotonic id assigned at publish time
    pub id: u64,
    pub payload: EventPayload,
    /// Wall-clock milliseconds since the Unix epoch
    pub timestamp_ms: u64,
}

impl CombatEvent {
    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }

    /// Wire form for socket bridges and log files
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Subscription key: one variant per payload type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    AttackResolved,
    DamageApplied,
    ShipDestroyed,
    SystemDamaged,
    PhaseChanged,
    RoundStarted,
    CombatEnded,
    InitiativeRolled,
    PointDefense,
    EvasiveAction,
    Sandcaster,
    StationAction,
}

/// One ship's initiative roll
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiativeEntry {
    pub ship: ShipId,
    pub name: String,
    pub roll: i32,
    pub total: i32,
}

/// Typed event payloads, one variant per event in the catalogue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    AttackResolved {
        attacker: ShipId,
        defender: ShipId,
        weapon: WeaponType,
        roll: i32,
        total_dm: i32,
        total: i32,
        effect: i32,
        damage: i32,
        power_drain: i32,
        system_damage: Option<SystemName>,
        destroyed: bool,
        point_defense: Option<PointDefenseResult>,
        modifiers: ModifierBreakdown,
    },
    DamageApplied {
        ship: ShipId,
        damage: i32,
        power_drain: i32,
        remaining_hull: i32,
        remaining_power: i32,
    },
    ShipDestroyed {
        ship: ShipId,
        killed_by: ShipId,
    },
    SystemDamaged {
        ship: ShipId,
        system: SystemName,
        hits: u8,
        disabled: bool,
    },
    PhaseChanged {
        phase: CombatPhase,
        round: Round,
    },
    RoundStarted {
        round: Round,
        ships_remaining: usize,
    },
    CombatEnded {
        winner: Faction,
        reason: String,
    },
    InitiativeRolled {
        initiatives: Vec<InitiativeEntry>,
    },
    PointDefense {
        attacker: ShipId,
        defender: ShipId,
        roll: i32,
        total: i32,
        intercepted: bool,
    },
    EvasiveAction {
        ship: ShipId,
        enabled: bool,
        penalty: i32,
    },
    Sandcaster {
        ship: ShipId,
        remaining: u32,
    },
    StationAction {
        role: Role,
        action: ActionId,
        ship: ShipId,
        params: ActionParams,
        success: bool,
        summary: String,
    },
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::AttackResolved { .. } => EventKind::AttackResolved,
            EventPayload::DamageApplied { .. } => EventKind::DamageApplied,
            EventPayload::ShipDestroyed { .. } => EventKind::ShipDestroyed,
            EventPayload::SystemDamaged { .. } => EventKind::SystemDamaged,
            EventPayload::PhaseChanged { .. } => EventKind::PhaseChanged,
            EventPayload::RoundStarted { .. } => EventKind::RoundStarted,
            EventPayload::CombatEnded { .. } => EventKind::CombatEnded,
            EventPayload::InitiativeRolled { .. } => EventKind::InitiativeRolled,
            EventPayload::PointDefense { .. } => EventKind::PointDefense,
            EventPayload::EvasiveAction { .. } => EventKind::EvasiveAction,
            EventPayload::Sandcaster { .. } => EventKind::Sandcaster,
            EventPayload::StationAction { .. } => EventKind::StationAction,
        }
    }
}
