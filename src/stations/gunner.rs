//! Gunner station
//!
//! Targeting and legality live here; the engine rolls the dice. Firing
//! marks the turret spent, and the per-round turret reset is this
//! station's job, not `start_round`'s.

use crate::core::types::ShipId;
use crate::dice::DiceRoller;
use crate::engine::attack::AttackOptions;
use crate::engine::combat::CombatEngine;
use crate::rules::called_shot::{select_called_shot_target, CalledShotContext};
use crate::rules::weapons::WeaponType;
use crate::stations::actions::{
    ActionAvailability, ActionId, ActionParams, ActionResult, ActionSpec,
};

pub fn define_actions() -> Vec<ActionSpec> {
    vec![
        ActionSpec {
            id: ActionId::FirePrimary,
            label: "Fire Primary",
            description: "Fire the main turret at the designated target",
            is_default: true,
            can_execute: Some(can_fire_primary),
            execute: fire_primary,
        },
        ActionSpec {
            id: ActionId::FireSecondary,
            label: "Fire Secondary",
            description: "Fire the second turret at the designated target",
            is_default: false,
            can_execute: Some(can_fire_secondary),
            execute: fire_secondary,
        },
        ActionSpec {
            id: ActionId::FireMissiles,
            label: "Fire Missiles",
            description: "Launch a missile salvo at the designated target",
            is_default: false,
            can_execute: Some(can_fire_missiles),
            execute: fire_missiles,
        },
        ActionSpec {
            id: ActionId::PointDefense,
            label: "Point Defense",
            description: "Dedicate a laser turret to intercepting missiles",
            is_default: false,
            can_execute: Some(can_point_defense),
            execute: point_defense,
        },
        ActionSpec {
            id: ActionId::CalledShot,
            label: "Called Shot",
            description: "Target a specific system on a crippled ship",
            is_default: false,
            can_execute: Some(can_called_shot),
            execute: called_shot,
        },
    ]
}

/// Per-round turret reset
///
/// Deliberately a station responsibility: `CombatEngine::start_round`
/// never clears these flags, so an orchestrator that skips this call
/// leaves the turrets spent.
pub fn reset_turrets(engine: &mut CombatEngine, ship_id: ShipId) {
    if let Some(ship) = engine.ship_mut(ship_id) {
        for turret in &mut ship.turrets {
            turret.reset_round();
        }
    }
}

fn can_fire_turret(engine: &CombatEngine, ship_id: ShipId, index: usize) -> ActionAvailability {
    let Some(ship) = engine.ship(ship_id) else {
        return ActionAvailability::no("Ship not in combat");
    };
    match ship.turrets.get(index) {
        None => ActionAvailability::no("No turret mounted"),
        Some(turret) if turret.disabled => ActionAvailability::no("Turret disabled"),
        Some(turret) if turret.used_this_round || turret.used_for_pd => {
            ActionAvailability::no("Turret already used this round")
        }
        Some(turret) if turret.weapons.is_empty() => ActionAvailability::no("No weapon fitted"),
        Some(_) => ActionAvailability::yes(),
    }
}

fn can_fire_primary(engine: &CombatEngine, ship_id: ShipId) -> ActionAvailability {
    can_fire_turret(engine, ship_id, 0)
}

fn can_fire_secondary(engine: &CombatEngine, ship_id: ShipId) -> ActionAvailability {
    can_fire_turret(engine, ship_id, 1)
}

fn fire_turret(
    engine: &mut CombatEngine,
    ship_id: ShipId,
    params: &ActionParams,
    turret_index: usize,
    opts: AttackOptions,
) -> ActionResult {
    let Some(target) = params.target else {
        return ActionResult::fail("No target designated");
    };
    let opts = AttackOptions {
        turret_index: Some(turret_index),
        ..opts
    };
    match engine.resolve_attack(ship_id, target, &opts) {
        Ok(attack) => {
            if !attack.success {
                let reason = attack
                    .reason
                    .clone()
                    .unwrap_or_else(|| "Attack could not be resolved".into());
                return ActionResult::fail(reason);
            }
            mark_turret_fired(engine, ship_id, turret_index);
            let summary = if let Some(pd) = attack.point_defense.filter(|pd| pd.intercepted) {
                format!("Salvo intercepted by point defense ({})", pd.total)
            } else if attack.hit && attack.power_drain > 0 {
                format!("Hit: {} power drained", attack.power_drain)
            } else if attack.hit {
                format!("Hit for {} damage", attack.damage)
            } else {
                format!("Missed ({} vs 8)", attack.total)
            };
            ActionResult::ok(summary).with_attack(attack)
        }
        Err(err) => ActionResult::fail(err.to_string()),
    }
}

fn mark_turret_fired(engine: &mut CombatEngine, ship_id: ShipId, turret_index: usize) {
    if let Some(ship) = engine.ship_mut(ship_id) {
        if let Some(turret) = ship.turrets.get_mut(turret_index) {
            turret.used_this_round = true;
        }
    }
}

fn fire_primary(engine: &mut CombatEngine, ship_id: ShipId, params: &ActionParams) -> ActionResult {
    fire_turret(engine, ship_id, params, 0, AttackOptions::default())
}

fn fire_secondary(
    engine: &mut CombatEngine,
    ship_id: ShipId,
    params: &ActionParams,
) -> ActionResult {
    fire_turret(engine, ship_id, params, 1, AttackOptions::default())
}

fn can_fire_missiles(engine: &CombatEngine, ship_id: ShipId) -> ActionAvailability {
    let Some(ship) = engine.ship(ship_id) else {
        return ActionAvailability::no("Ship not in combat");
    };
    if ship.missiles == 0 {
        return ActionAvailability::no("No missiles remaining");
    }
    let has_rack = ship
        .turrets
        .iter()
        .any(|turret| turret.ready() && turret.has_missile_rack());
    if !has_rack && !engine.range().is_long() {
        return ActionAvailability::no("No missile rack ready and range too short");
    }
    if ship.ready_turret().is_none() {
        return ActionAvailability::no("No ready turret");
    }
    ActionAvailability::yes()
}

fn fire_missiles(engine: &mut CombatEngine, ship_id: ShipId, params: &ActionParams) -> ActionResult {
    let Some(ship) = engine.ship(ship_id) else {
        return ActionResult::fail("Ship not in combat");
    };
    // Prefer a ready missile rack; otherwise let long range force the switch
    let rack_index = ship
        .turrets
        .iter()
        .position(|turret| turret.ready() && turret.has_missile_rack());
    let (index, opts) = match rack_index.or_else(|| ship.ready_turret()) {
        Some(index) if rack_index.is_some() => (
            index,
            AttackOptions {
                weapon: Some(WeaponType::MissileRack),
                ..AttackOptions::default()
            },
        ),
        Some(index) => (
            index,
            AttackOptions {
                auto_missile: true,
                ..AttackOptions::default()
            },
        ),
        None => return ActionResult::fail("No ready turret"),
    };
    fire_turret(engine, ship_id, params, index, opts)
}

fn can_point_defense(engine: &CombatEngine, ship_id: ShipId) -> ActionAvailability {
    let Some(ship) = engine.ship(ship_id) else {
        return ActionAvailability::no("Ship not in combat");
    };
    let ready_laser = ship
        .turrets
        .iter()
        .any(|turret| turret.has_laser() && turret.ready());
    if ready_laser {
        ActionAvailability::yes()
    } else {
        ActionAvailability::no("No laser turret ready")
    }
}

fn point_defense(engine: &mut CombatEngine, ship_id: ShipId, _params: &ActionParams) -> ActionResult {
    let Some(ship) = engine.ship_mut(ship_id) else {
        return ActionResult::fail("Ship not in combat");
    };
    let Some(index) = ship
        .turrets
        .iter()
        .position(|turret| turret.has_laser() && turret.ready())
    else {
        return ActionResult::fail("No laser turret ready");
    };
    let turret = &mut ship.turrets[index];
    turret.used_for_pd = true;
    turret.used_this_round = true;
    ActionResult::ok("Standing by for point defense")
}

fn can_called_shot(engine: &CombatEngine, ship_id: ShipId) -> ActionAvailability {
    can_fire_turret(engine, ship_id, 0)
}

fn called_shot(engine: &mut CombatEngine, ship_id: ShipId, params: &ActionParams) -> ActionResult {
    let Some(target) = params.target else {
        return ActionResult::fail("No target designated");
    };
    let Some(weapon) = engine
        .ship(ship_id)
        .and_then(|ship| ship.turrets.first())
        .and_then(|turret| turret.primary_weapon())
    else {
        return ActionResult::fail("No weapon available");
    };

    let sensor_roll = engine.dice_mut().roll_unit();
    let selection = {
        let Some(defender) = engine.ship(target) else {
            return ActionResult::fail("Target not in combat");
        };
        let context = CalledShotContext {
            weapon,
            defender_hull: defender.hull,
            defender_max_hull: defender.max_hull,
            defender_power: defender.power,
            defender_max_power: defender.max_power,
            defender_attempting_escape: defender.attempting_escape,
            defender_systems: &defender.systems,
            sensor_roll,
        };
        select_called_shot_target(&context)
    };

    // No worthwhile system: fire normally instead
    let opts = AttackOptions {
        called_shot: selection,
        ..AttackOptions::default()
    };
    let result = fire_turret(engine, ship_id, params, 0, opts);
    if let (Some(system), Some(attack)) = (selection, result.attack.as_ref()) {
        if attack.hit && attack.point_defense.map_or(true, |pd| !pd.intercepted) {
            let _ = engine.apply_system_damage(target, system);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::EngineConfig;
    use crate::core::types::Faction;
    use crate::dice::ScriptedDice;
    use crate::rules::range::RangeBand;
    use crate::ships::ship::Ship;
    use crate::ships::systems::SystemName;
    use crate::ships::turret::Turret;
    use crate::stations::actions::{Role, StationEngine};

    fn duel(rolls: Vec<i32>, units: Vec<f64>) -> (CombatEngine, ShipId, ShipId) {
        let mut engine = CombatEngine::new(EngineConfig::default())
            .with_dice(Box::new(ScriptedDice::new(rolls).with_units(units)));
        let mut attacker = Ship::new("Hunter", Faction::Player);
        attacker.fire_control = 2;
        attacker.turrets = vec![Turret::new(vec![WeaponType::PulseLaser], 2)];
        let defender = Ship::new("Prey", Faction::Enemy);
        let (a, d) = (attacker.id, defender.id);
        engine.init_combat(vec![attacker], vec![defender], RangeBand::Medium);
        (engine, a, d)
    }

    #[test]
    fn test_fire_primary_marks_turret_spent() {
        let (mut engine, attacker, defender) = duel(vec![3, 3, 2, 3], vec![]);
        let station = StationEngine::for_role(Role::Gunner, attacker);
        let result = station.execute(
            &mut engine,
            ActionId::FirePrimary,
            &ActionParams::targeting(defender),
        );
        assert!(result.success);
        assert!(engine.ship(attacker).unwrap().turrets[0].used_this_round);

        // Second shot this round is refused by availability
        let again = station.execute(
            &mut engine,
            ActionId::FirePrimary,
            &ActionParams::targeting(defender),
        );
        assert!(!again.success);
        assert_eq!(again.error.as_deref(), Some("Turret already used this round"));
    }

    #[test]
    fn test_fire_without_target_fails() {
        let (mut engine, attacker, _) = duel(vec![], vec![]);
        let station = StationEngine::for_role(Role::Gunner, attacker);
        let result = station.execute(&mut engine, ActionId::FirePrimary, &ActionParams::default());
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("No target designated"));
        assert_eq!(engine.stats().attacks, 0);
    }

    #[test]
    fn test_reset_turrets_restores_readiness() {
        let (mut engine, attacker, defender) = duel(vec![3, 3, 2, 3], vec![]);
        let station = StationEngine::for_role(Role::Gunner, attacker);
        station.execute(
            &mut engine,
            ActionId::FirePrimary,
            &ActionParams::targeting(defender),
        );
        assert!(engine.ship(attacker).unwrap().turrets[0].used_this_round);

        reset_turrets(&mut engine, attacker);
        let turret = &engine.ship(attacker).unwrap().turrets[0];
        assert!(!turret.used_this_round);
        assert!(!turret.used_for_pd);
    }

    #[test]
    fn test_point_defense_dedicates_laser_turret() {
        let (mut engine, attacker, _) = duel(vec![], vec![]);
        let station = StationEngine::for_role(Role::Gunner, attacker);
        let result = station.execute(&mut engine, ActionId::PointDefense, &ActionParams::default());
        assert!(result.success);
        let turret = &engine.ship(attacker).unwrap().turrets[0];
        assert!(turret.used_for_pd);
        assert!(turret.used_this_round);
    }

    #[test]
    fn test_called_shot_applies_system_damage_on_hit() {
        // Crippled escaping target => policy picks the jump drive (-4):
        // dm = 2 + 2 + 0 + 2 - 4 = 2, roll 10 => 12, effect 4, damage 2d
        let (mut engine, attacker, defender) = duel(vec![5, 5, 2, 3], vec![]);
        {
            let ship = engine.ship_mut(defender).unwrap();
            ship.hull = 10;
            ship.attempting_escape = true;
        }
        let station = StationEngine::for_role(Role::Gunner, attacker);
        let result = station.execute(
            &mut engine,
            ActionId::CalledShot,
            &ActionParams::targeting(defender),
        );
        assert!(result.success);
        let attack = result.attack.as_ref().unwrap();
        assert_eq!(attack.modifiers.called_shot, -4);
        assert_eq!(attack.system_damage, Some(SystemName::JDrive));
        let status = engine
            .ship(defender)
            .unwrap()
            .system(SystemName::JDrive)
            .copied()
            .unwrap();
        assert_eq!(status.hits, 1);
    }

    #[test]
    fn test_called_shot_on_healthy_target_fires_normally() {
        let (mut engine, attacker, defender) = duel(vec![5, 5, 2, 3], vec![]);
        let station = StationEngine::for_role(Role::Gunner, attacker);
        let result = station.execute(
            &mut engine,
            ActionId::CalledShot,
            &ActionParams::targeting(defender),
        );
        assert!(result.success);
        let attack = result.attack.as_ref().unwrap();
        assert_eq!(attack.modifiers.called_shot, 0);
        assert_eq!(attack.system_damage, None);
    }

    #[test]
    fn test_fire_missiles_prefers_a_ready_rack() {
        let (mut engine, attacker, defender) = duel(vec![5, 5, 1, 2, 3, 4], vec![]);
        {
            let ship = engine.ship_mut(attacker).unwrap();
            ship.turrets.push(Turret::new(vec![WeaponType::MissileRack], 1));
            ship.missiles = 3;
        }
        let station = StationEngine::for_role(Role::Gunner, attacker);
        let result = station.execute(
            &mut engine,
            ActionId::FireMissiles,
            &ActionParams::targeting(defender),
        );
        assert!(result.success);
        let attack = result.attack.as_ref().unwrap();
        assert_eq!(attack.weapon, Some(WeaponType::MissileRack));
        assert_eq!(engine.ship(attacker).unwrap().missiles, 2);
        assert!(engine.ship(attacker).unwrap().turrets[1].used_this_round);
    }
}
