//! Captain station
//!
//! One job in combat: coordinate the crew. The tactics effect feeds the
//! fleet's initiative roll.

use crate::core::types::ShipId;
use crate::engine::combat::CombatEngine;
use crate::rules::checks::{skill_check, TARGET_NUMBER};
use crate::ships::ship::Skill;
use crate::stations::actions::{ActionId, ActionParams, ActionResult, ActionSpec};

pub fn define_actions() -> Vec<ActionSpec> {
    vec![ActionSpec {
        id: ActionId::Coordinate,
        label: "Coordinate",
        description: "Tactics check; the effect becomes the fleet's initiative DM",
        is_default: true,
        can_execute: None,
        execute: coordinate,
    }]
}

fn coordinate(engine: &mut CombatEngine, ship_id: ShipId, _params: &ActionParams) -> ActionResult {
    let rating = engine
        .ship(ship_id)
        .map_or(0, |ship| ship.crew_skill(Skill::Tactics));
    let check = skill_check(engine.dice_mut(), rating, TARGET_NUMBER, &[]);
    let summary = if check.success {
        format!("Fleet coordinated: initiative DM +{}", check.effect)
    } else {
        "The plan falls apart in the telling".to_string()
    };
    ActionResult::ok(summary).with_check(check)
}
