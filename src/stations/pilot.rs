//! Pilot station
//!
//! Defensive flying: evasive manoeuvres and breaking off. Escape
//! completion is the orchestrator's call; this station declares the
//! intent and rolls the handling check.

use crate::core::types::ShipId;
use crate::dice::DiceRoller;
use crate::engine::combat::CombatEngine;
use crate::rules::checks::TARGET_NUMBER;
use crate::ships::systems::SystemName;
use crate::stations::actions::{
    ActionAvailability, ActionId, ActionParams, ActionResult, ActionSpec,
};

pub fn define_actions() -> Vec<ActionSpec> {
    vec![
        ActionSpec {
            id: ActionId::EvasiveManoeuvre,
            label: "Evasive Manoeuvre",
            description: "Jink hard; attackers eat the ship's thrust as a penalty",
            is_default: true,
            can_execute: Some(can_evade),
            execute: evasive_manoeuvre,
        },
        ActionSpec {
            id: ActionId::BreakOff,
            label: "Break Off",
            description: "Turn for open space and set up an escape",
            is_default: false,
            can_execute: Some(can_break_off),
            execute: break_off,
        },
    ]
}

fn can_evade(engine: &CombatEngine, ship_id: ShipId) -> ActionAvailability {
    let Some(ship) = engine.ship(ship_id) else {
        return ActionAvailability::no("Ship not in combat");
    };
    if ship.thrust <= 0 {
        return ActionAvailability::no("No thrust available");
    }
    if ship.evasive {
        return ActionAvailability::no("Already flying evasive");
    }
    ActionAvailability::yes()
}

fn evasive_manoeuvre(
    engine: &mut CombatEngine,
    ship_id: ShipId,
    _params: &ActionParams,
) -> ActionResult {
    match engine.set_evasive(ship_id, true) {
        Ok(()) => ActionResult::ok("Flying evasive"),
        Err(err) => ActionResult::fail(err.to_string()),
    }
}

fn can_break_off(engine: &CombatEngine, ship_id: ShipId) -> ActionAvailability {
    let Some(ship) = engine.ship(ship_id) else {
        return ActionAvailability::no("Ship not in combat");
    };
    if !ship.system_operational(SystemName::MDrive) {
        return ActionAvailability::no("Manoeuvre drive disabled");
    }
    if ship.attempting_escape {
        return ActionAvailability::no("Already breaking off");
    }
    ActionAvailability::yes()
}

fn break_off(engine: &mut CombatEngine, ship_id: ShipId, _params: &ActionParams) -> ActionResult {
    let (pilot_skill, thrust) = {
        let Some(ship) = engine.ship(ship_id) else {
            return ActionResult::fail("Ship not in combat");
        };
        (ship.pilot_skill, ship.thrust)
    };
    engine.set_attempting_escape(ship_id, true);
    let roll = engine.dice_mut().roll_2d6();
    let check =
        crate::rules::checks::resolve_check_against(roll, pilot_skill + thrust, TARGET_NUMBER);
    let summary = if check.success {
        "Breaking off: escape vector plotted"
    } else {
        "Breaking off: pursuers keep pace"
    };
    ActionResult::ok(summary).with_check(check)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::EngineConfig;
    use crate::core::types::Faction;
    use crate::dice::ScriptedDice;
    use crate::events::bus::Topic;
    use crate::events::event::{EventKind, EventPayload};
    use crate::rules::range::RangeBand;
    use crate::ships::ship::Ship;
    use crate::stations::actions::{Role, StationEngine};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn solo(rolls: Vec<i32>) -> (CombatEngine, ShipId) {
        let mut engine = CombatEngine::new(EngineConfig::default())
            .with_dice(Box::new(ScriptedDice::new(rolls)));
        let mut ship = Ship::new("Runner", Faction::Player);
        ship.thrust = 3;
        ship.pilot_skill = 2;
        let id = ship.id;
        engine.init_combat(vec![ship], vec![Ship::new("X", Faction::Enemy)], RangeBand::Medium);
        (engine, id)
    }

    #[test]
    fn test_evasive_sets_flag_and_publishes() {
        let (mut engine, ship) = solo(vec![]);
        let penalties = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&penalties);
        engine.subscribe(
            Topic::Kind(EventKind::EvasiveAction),
            Box::new(move |event| {
                if let EventPayload::EvasiveAction { penalty, .. } = event.payload {
                    sink.borrow_mut().push(penalty);
                }
            }),
        );
        let station = StationEngine::for_role(Role::Pilot, ship);
        let result = station.execute(&mut engine, ActionId::EvasiveManoeuvre, &ActionParams::default());
        assert!(result.success);
        assert!(engine.ship(ship).unwrap().evasive);
        assert_eq!(*penalties.borrow(), vec![-3]);

        let again = station.execute(&mut engine, ActionId::EvasiveManoeuvre, &ActionParams::default());
        assert!(!again.success);
        assert_eq!(again.error.as_deref(), Some("Already flying evasive"));
    }

    #[test]
    fn test_break_off_sets_escape_intent() {
        // roll 4 + pilot 2 + thrust 3 = 9, success
        let (mut engine, ship) = solo(vec![2, 2]);
        let station = StationEngine::for_role(Role::Pilot, ship);
        let result = station.execute(&mut engine, ActionId::BreakOff, &ActionParams::default());
        assert!(result.success);
        assert!(result.check.unwrap().success);
        assert!(engine.ship(ship).unwrap().attempting_escape);
    }

    #[test]
    fn test_break_off_needs_working_drive() {
        let (mut engine, ship) = solo(vec![]);
        for _ in 0..3 {
            engine
                .apply_system_damage(ship, SystemName::MDrive)
                .unwrap();
        }
        let station = StationEngine::for_role(Role::Pilot, ship);
        let result = station.execute(&mut engine, ActionId::BreakOff, &ActionParams::default());
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Manoeuvre drive disabled"));
        assert!(!engine.ship(ship).unwrap().attempting_escape);
    }
}
