//! Engineer station
//!
//! Keeps the ship in the fight: patching damaged systems and coaxing
//! power back into the banks. Disabled systems are beyond field repair.

use crate::core::types::ShipId;
use crate::dice::DiceRoller;
use crate::engine::combat::CombatEngine;
use crate::rules::checks::{skill_check, TARGET_NUMBER};
use crate::ships::ship::Skill;
use crate::ships::systems::SystemName;
use crate::stations::actions::{
    ActionAvailability, ActionId, ActionParams, ActionResult, ActionSpec,
};

pub fn define_actions() -> Vec<ActionSpec> {
    vec![
        ActionSpec {
            id: ActionId::DamageControl,
            label: "Damage Control",
            description: "Patch hits on a damaged system",
            is_default: true,
            can_execute: Some(can_damage_control),
            execute: damage_control,
        },
        ActionSpec {
            id: ActionId::ReroutePower,
            label: "Reroute Power",
            description: "Coax drained power back into the banks",
            is_default: false,
            can_execute: Some(can_reroute_power),
            execute: reroute_power,
        },
    ]
}

/// The repairable system with the most accumulated hits
fn worst_repairable(engine: &CombatEngine, ship_id: ShipId) -> Option<SystemName> {
    let ship = engine.ship(ship_id)?;
    SystemName::DEFAULT_TRACKED
        .iter()
        .chain([SystemName::Bridge, SystemName::Cargo, SystemName::Turret].iter())
        .filter_map(|name| {
            let status = ship.system(*name)?;
            (status.hits > 0 && !status.disabled).then_some((*name, status.hits))
        })
        .max_by_key(|(_, hits)| *hits)
        .map(|(name, _)| name)
}

fn can_damage_control(engine: &CombatEngine, ship_id: ShipId) -> ActionAvailability {
    if engine.ship(ship_id).is_none() {
        return ActionAvailability::no("Ship not in combat");
    }
    if worst_repairable(engine, ship_id).is_none() {
        return ActionAvailability::no("No repairable damage");
    }
    ActionAvailability::yes()
}

fn damage_control(engine: &mut CombatEngine, ship_id: ShipId, params: &ActionParams) -> ActionResult {
    let system = match params.system.or_else(|| worst_repairable(engine, ship_id)) {
        Some(system) => system,
        None => return ActionResult::fail("No repairable damage"),
    };
    let repairable = engine
        .ship(ship_id)
        .and_then(|ship| ship.system(system))
        .map_or(false, |status| status.hits > 0 && !status.disabled);
    if !repairable {
        return ActionResult::fail(format!("{} is beyond field repair", system.label()));
    }

    let rating = engine
        .ship(ship_id)
        .map_or(0, |ship| ship.crew_skill(Skill::Engineering));
    let check = skill_check(engine.dice_mut(), rating, TARGET_NUMBER, &[]);
    if !check.success {
        return ActionResult::ok(format!("Repair crew made no progress on {}", system.label()))
            .with_check(check);
    }
    match engine.repair_system(ship_id, system) {
        Ok(status) => ActionResult::ok(format!(
            "Patched {} ({} hit(s) remain)",
            system.label(),
            status.hits
        ))
        .with_check(check),
        Err(err) => ActionResult::fail(err.to_string()),
    }
}

fn can_reroute_power(engine: &CombatEngine, ship_id: ShipId) -> ActionAvailability {
    let Some(ship) = engine.ship(ship_id) else {
        return ActionAvailability::no("Ship not in combat");
    };
    if ship.power >= ship.max_power {
        return ActionAvailability::no("Power banks are full");
    }
    ActionAvailability::yes()
}

fn reroute_power(engine: &mut CombatEngine, ship_id: ShipId, _params: &ActionParams) -> ActionResult {
    let rating = engine
        .ship(ship_id)
        .map_or(0, |ship| ship.crew_skill(Skill::Engineering));
    let check = skill_check(engine.dice_mut(), rating, TARGET_NUMBER, &[]);
    if !check.success {
        return ActionResult::ok("Power conduits refuse to cooperate").with_check(check);
    }
    let amount = engine.dice_mut().roll_1d6() + check.effect;
    let restored = engine.restore_power(ship_id, amount);
    ActionResult::ok(format!("Restored {} power", restored)).with_check(check)
}
