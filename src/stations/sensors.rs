//! Sensors station
//!
//! Detection is not the combat engine's business, so this station carries
//! its own model: scan strength (2d6 + electronics + sensor DM) against a
//! threshold built from the range band and the contact's stealth.

use crate::core::types::ShipId;
use crate::dice::DiceRoller;
use crate::engine::combat::CombatEngine;
use crate::rules::checks::TARGET_NUMBER;
use crate::rules::range::RangeBand;
use crate::ships::ship::Skill;
use crate::ships::systems::SystemName;
use crate::stations::actions::{
    ActionAvailability, ActionId, ActionParams, ActionResult, ActionSpec,
};

pub fn define_actions() -> Vec<ActionSpec> {
    vec![
        ActionSpec {
            id: ActionId::SensorSweep,
            label: "Sensor Sweep",
            description: "Sweep for hostile contacts",
            is_default: true,
            can_execute: Some(can_operate_sensors),
            execute: sensor_sweep,
        },
        ActionSpec {
            id: ActionId::TargetLock,
            label: "Target Lock",
            description: "Paint a target for the gunners",
            is_default: false,
            can_execute: Some(can_operate_sensors),
            execute: target_lock,
        },
    ]
}

/// Detection difficulty added by distance
fn range_threshold(range: RangeBand) -> i32 {
    match range {
        RangeBand::Adjacent | RangeBand::Close | RangeBand::Short => 0,
        RangeBand::Medium => 1,
        RangeBand::Long => 2,
        RangeBand::VeryLong => 3,
        RangeBand::Distant => 4,
    }
}

fn can_operate_sensors(engine: &CombatEngine, ship_id: ShipId) -> ActionAvailability {
    let Some(ship) = engine.ship(ship_id) else {
        return ActionAvailability::no("Ship not in combat");
    };
    if !ship.system_operational(SystemName::Sensors) {
        return ActionAvailability::no("Sensors disabled");
    }
    ActionAvailability::yes()
}

fn sensor_sweep(engine: &mut CombatEngine, ship_id: ShipId, _params: &ActionParams) -> ActionResult {
    let (faction, sensor_dm, skill) = {
        let Some(ship) = engine.ship(ship_id) else {
            return ActionResult::fail("Ship not in combat");
        };
        (
            ship.faction,
            ship.sensor_dm,
            ship.crew_skill(Skill::Electronics),
        )
    };

    let contacts: Vec<(ShipId, i32)> = engine
        .ships_by_faction(faction.opponent())
        .iter()
        .filter(|contact| contact.is_alive())
        .map(|contact| (contact.id, contact.stealth))
        .collect();

    let threshold_base = TARGET_NUMBER + range_threshold(engine.range());
    let mut detected = Vec::new();
    for (contact, stealth) in contacts {
        let roll = engine.dice_mut().roll_2d6();
        if roll + skill + sensor_dm >= threshold_base + stealth {
            detected.push(contact);
        }
    }

    let summary = if detected.is_empty() {
        "No contacts detected".to_string()
    } else {
        format!("Detected {} contact(s)", detected.len())
    };
    let mut result = ActionResult::ok(summary);
    result.detected = detected;
    result
}

fn target_lock(engine: &mut CombatEngine, ship_id: ShipId, params: &ActionParams) -> ActionResult {
    let Some(target) = params.target else {
        return ActionResult::fail("No target designated");
    };
    if engine.ship(target).is_none() {
        return ActionResult::fail("Target not in combat");
    }
    let (sensor_dm, skill) = {
        let Some(ship) = engine.ship(ship_id) else {
            return ActionResult::fail("Ship not in combat");
        };
        (ship.sensor_dm, ship.crew_skill(Skill::Electronics))
    };

    let roll = engine.dice_mut().roll_2d6();
    let difficulty = TARGET_NUMBER + range_threshold(engine.range());
    let check = crate::rules::checks::resolve_check_against(roll, skill + sensor_dm, difficulty);
    if check.success {
        engine.set_target_lock(ship_id, Some(target));
        ActionResult::ok("Target lock established").with_check(check)
    } else {
        let mut result = ActionResult::ok("Failed to achieve lock").with_check(check);
        result.success = false;
        result.error = Some("Lock attempt failed".into());
        result
    }
}
