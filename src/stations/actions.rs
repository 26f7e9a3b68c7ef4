//! Role-action framework
//!
//! Every crew station exposes the same contract: a map of declarative
//! action records with dynamically computed availability, dispatched by
//! one generic executor. The station layer decides what is legal and
//! which system to target; the combat engine owns all dice and damage.
//!
//! Illegal actions return structured failures and touch nothing. The only
//! panics here are programmer errors, never game outcomes.

use crate::core::types::ShipId;
use crate::engine::attack::AttackResult;
use crate::engine::combat::CombatEngine;
use crate::events::event::EventPayload;
use crate::rules::checks::{self, CheckResult};
use crate::ships::ship::Skill;
use crate::ships::systems::SystemName;
use crate::stations::{captain, engineer, gunner, pilot, sensors};
use serde::{Deserialize, Serialize};

/// Crew station identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Captain,
    Pilot,
    Gunner,
    Engineer,
    Sensors,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Captain,
        Role::Pilot,
        Role::Gunner,
        Role::Engineer,
        Role::Sensors,
    ];

    /// Skill consulted when a check names none explicitly
    pub fn default_skill(&self) -> Skill {
        match self {
            Role::Captain => Skill::Tactics,
            Role::Pilot => Skill::Pilot,
            Role::Gunner => Skill::Gunnery,
            Role::Engineer => Skill::Engineering,
            Role::Sensors => Skill::Electronics,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Captain => "captain",
            Role::Pilot => "pilot",
            Role::Gunner => "gunner",
            Role::Engineer => "engineer",
            Role::Sensors => "sensors",
        }
    }
}

/// Identifier of a station action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionId {
    FirePrimary,
    FireSecondary,
    FireMissiles,
    PointDefense,
    CalledShot,
    SensorSweep,
    TargetLock,
    EvasiveManoeuvre,
    BreakOff,
    DamageControl,
    ReroutePower,
    Coordinate,
}

/// Whether an action is currently legal, with the reason when it is not
pub struct ActionAvailability {
    pub available: bool,
    pub reason: Option<String>,
}

impl ActionAvailability {
    pub fn yes() -> Self {
        Self {
            available: true,
            reason: None,
        }
    }

    pub fn no(reason: impl Into<String>) -> Self {
        Self {
            available: false,
            reason: Some(reason.into()),
        }
    }
}

/// Parameters a station action may consume
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ActionParams {
    pub target: Option<ShipId>,
    pub turret_index: Option<usize>,
    pub system: Option<SystemName>,
}

impl ActionParams {
    pub fn targeting(target: ShipId) -> Self {
        Self {
            target: Some(target),
            ..Self::default()
        }
    }
}

/// Uniform result of executing a station action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    pub error: Option<String>,
    pub summary: String,
    pub attack: Option<AttackResult>,
    pub check: Option<CheckResult>,
    pub detected: Vec<ShipId>,
}

impl ActionResult {
    pub fn ok(summary: impl Into<String>) -> Self {
        Self {
            success: true,
            error: None,
            summary: summary.into(),
            attack: None,
            check: None,
            detected: Vec::new(),
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            success: false,
            summary: error.clone(),
            error: Some(error),
            attack: None,
            check: None,
            detected: Vec::new(),
        }
    }

    pub fn with_attack(mut self, attack: AttackResult) -> Self {
        self.attack = Some(attack);
        self
    }

    pub fn with_check(mut self, check: CheckResult) -> Self {
        self.check = Some(check);
        self
    }
}

/// Availability predicate: pure function of current engine and ship state
pub type CanExecuteFn = fn(&CombatEngine, ShipId) -> ActionAvailability;
/// Action body: all mutation flows through the engine it receives
pub type ExecuteFn = fn(&mut CombatEngine, ShipId, &ActionParams) -> ActionResult;

/// Declarative action record held in a station's action map
pub struct ActionSpec {
    pub id: ActionId,
    pub label: &'static str,
    pub description: &'static str,
    pub is_default: bool,
    pub can_execute: Option<CanExecuteFn>,
    pub execute: ExecuteFn,
}

/// UI-facing view of one action with freshly computed availability
#[derive(Debug, Clone)]
pub struct ActionView {
    pub id: ActionId,
    pub label: &'static str,
    pub description: &'static str,
    pub is_default: bool,
    pub available: bool,
    pub reason: Option<String>,
}

/// Generic executor shared by every station
///
/// Holds the role, the ship it controls, and the action map built once at
/// construction. Availability is never cached: every query re-evaluates
/// against current state.
pub struct StationEngine {
    pub role: Role,
    pub ship: ShipId,
    actions: Vec<ActionSpec>,
}

impl StationEngine {
    pub fn new(role: Role, ship: ShipId, actions: Vec<ActionSpec>) -> Self {
        Self {
            role,
            ship,
            actions,
        }
    }

    /// Build the station for a role with its standard action map
    pub fn for_role(role: Role, ship: ShipId) -> Self {
        let actions = match role {
            Role::Captain => captain::define_actions(),
            Role::Pilot => pilot::define_actions(),
            Role::Gunner => gunner::define_actions(),
            Role::Engineer => engineer::define_actions(),
            Role::Sensors => sensors::define_actions(),
        };
        Self::new(role, ship, actions)
    }

    /// The action a front-end should preselect
    pub fn default_action(&self) -> Option<ActionId> {
        self.actions
            .iter()
            .find(|action| action.is_default)
            .map(|action| action.id)
    }

    /// Execute an action by id
    ///
    /// Unknown or unavailable actions return a failure without side
    /// effects. Otherwise the action runs and a `StationAction` event is
    /// published, so every execution is observable uniformly.
    pub fn execute(
        &self,
        engine: &mut CombatEngine,
        id: ActionId,
        params: &ActionParams,
    ) -> ActionResult {
        let Some(spec) = self.actions.iter().find(|action| action.id == id) else {
            return ActionResult::fail(format!("Action {:?} not defined for this station", id));
        };
        if let Some(can_execute) = spec.can_execute {
            let availability = can_execute(engine, self.ship);
            if !availability.available {
                return ActionResult::fail(
                    availability
                        .reason
                        .unwrap_or_else(|| "Action not available".into()),
                );
            }
        }
        let result = (spec.execute)(engine, self.ship, params);
        engine.publish(EventPayload::StationAction {
            role: self.role,
            action: id,
            ship: self.ship,
            params: *params,
            success: result.success,
            summary: result.summary.clone(),
        });
        result
    }

    /// Every action with its current availability
    pub fn all_actions(&self, engine: &CombatEngine) -> Vec<ActionView> {
        self.actions
            .iter()
            .map(|spec| {
                let availability = spec
                    .can_execute
                    .map_or_else(ActionAvailability::yes, |can| can(engine, self.ship));
                ActionView {
                    id: spec.id,
                    label: spec.label,
                    description: spec.description,
                    is_default: spec.is_default,
                    available: availability.available,
                    reason: availability.reason,
                }
            })
            .collect()
    }

    /// Only the actions that are currently legal
    pub fn available_actions(&self, engine: &CombatEngine) -> Vec<ActionView> {
        self.all_actions(engine)
            .into_iter()
            .filter(|view| view.available)
            .collect()
    }

    /// Shared 2d6 resolution for station checks
    ///
    /// Skill lookup falls back from the ship's crew ratings to the role's
    /// default skill, then to zero for an unfilled position.
    pub fn skill_check(
        &self,
        engine: &mut CombatEngine,
        skill: Option<Skill>,
        difficulty: i32,
        modifiers: &[i32],
    ) -> CheckResult {
        let skill = skill.unwrap_or_else(|| self.role.default_skill());
        let rating = engine
            .ship(self.ship)
            .map_or(0, |ship| ship.crew_skill(skill));
        checks::skill_check(engine.dice_mut(), rating, difficulty, modifiers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::EngineConfig;
    use crate::core::types::Faction;
    use crate::dice::ScriptedDice;
    use crate::rules::range::RangeBand;
    use crate::ships::ship::Ship;

    fn engine_with(rolls: Vec<i32>) -> (CombatEngine, ShipId, ShipId) {
        let mut engine = CombatEngine::new(EngineConfig::default())
            .with_dice(Box::new(ScriptedDice::new(rolls)));
        let player = Ship::patrol_corvette("Vigilant");
        let enemy = Ship::pirate_corsair("Black Sun");
        let (p, e) = (player.id, enemy.id);
        engine.init_combat(vec![player], vec![enemy], RangeBand::Medium);
        (engine, p, e)
    }

    #[test]
    fn test_role_default_skills() {
        assert_eq!(Role::Gunner.default_skill(), Skill::Gunnery);
        assert_eq!(Role::Sensors.default_skill(), Skill::Electronics);
        assert_eq!(Role::Captain.default_skill(), Skill::Tactics);
    }

    #[test]
    fn test_unknown_action_fails_without_events() {
        let (mut engine, player, _) = engine_with(vec![]);
        let station = StationEngine::for_role(Role::Sensors, player);
        let result = station.execute(&mut engine, ActionId::FirePrimary, &ActionParams::default());
        assert!(!result.success);
        assert!(engine.replay_events(0).is_empty());
    }

    #[test]
    fn test_unavailable_action_reports_reason_and_mutates_nothing() {
        let (mut engine, player, enemy) = engine_with(vec![]);
        engine.ship_mut(player).unwrap().missiles = 0;
        let station = StationEngine::for_role(Role::Gunner, player);
        let result = station.execute(
            &mut engine,
            ActionId::FireMissiles,
            &ActionParams::targeting(enemy),
        );
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("No missiles remaining"));
        assert_eq!(engine.stats().attacks, 0);
        assert!(engine.replay_events(0).is_empty());
    }

    #[test]
    fn test_executed_action_publishes_station_event() {
        // attack roll 3+3, damage 1d (beam laser)
        let (mut engine, player, enemy) = engine_with(vec![3, 3, 4]);
        let station = StationEngine::for_role(Role::Gunner, player);
        let result = station.execute(
            &mut engine,
            ActionId::FirePrimary,
            &ActionParams::targeting(enemy),
        );
        assert!(result.success);
        let events = engine.replay_events(0);
        let station_events: Vec<_> = events
            .iter()
            .filter(|event| {
                matches!(
                    event.payload,
                    EventPayload::StationAction {
                        role: Role::Gunner,
                        action: ActionId::FirePrimary,
                        ..
                    }
                )
            })
            .collect();
        assert_eq!(station_events.len(), 1);
    }

    #[test]
    fn test_availability_is_computed_fresh() {
        let (mut engine, player, _) = engine_with(vec![]);
        let station = StationEngine::for_role(Role::Gunner, player);
        let before = station.all_actions(&engine);
        assert!(before
            .iter()
            .find(|view| view.id == ActionId::FirePrimary)
            .unwrap()
            .available);

        engine.ship_mut(player).unwrap().turrets[0].used_this_round = true;
        let after = station.all_actions(&engine);
        let view = after
            .iter()
            .find(|view| view.id == ActionId::FirePrimary)
            .unwrap();
        assert!(!view.available);
        assert!(view.reason.is_some());
    }

    #[test]
    fn test_skill_check_uses_role_alias() {
        let (mut engine, player, _) = engine_with(vec![3, 3, 3, 3]);
        let station = StationEngine::for_role(Role::Gunner, player);
        // Corvette gunnery 2: 6 + 2 = 8, success
        let check = station.skill_check(&mut engine, None, 8, &[]);
        assert!(check.success);

        // Engineering unfilled: 6 + 0 = 6, failure
        let engineer = StationEngine::for_role(Role::Engineer, player);
        let check = engineer.skill_check(&mut engine, None, 8, &[]);
        assert!(!check.success);
    }

    #[test]
    fn test_default_action_marked() {
        let station = StationEngine::for_role(Role::Gunner, ShipId::new());
        assert_eq!(station.default_action(), Some(ActionId::FirePrimary));
    }
}
