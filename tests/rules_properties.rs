//! Property tests for the resolution rules and the event bus
//!
//! The invariants the rest of the system leans on, checked across the
//! whole input space rather than at hand-picked points.

use broadside::core::config::EngineConfig;
use broadside::core::types::Faction;
use broadside::dice::ScriptedDice;
use broadside::engine::attack::AttackOptions;
use broadside::engine::combat::CombatEngine;
use broadside::events::bus::{EventBus, Topic};
use broadside::events::event::EventPayload;
use broadside::rules::checks::{resolve_check, TARGET_NUMBER};
use broadside::rules::range::RangeBand;
use broadside::rules::weapons::WeaponType;
use broadside::ships::ship::Ship;
use broadside::ships::turret::Turret;
use proptest::prelude::*;

fn any_weapon() -> impl Strategy<Value = WeaponType> {
    prop_oneof![
        Just(WeaponType::PulseLaser),
        Just(WeaponType::BeamLaser),
        Just(WeaponType::MissileRack),
        Just(WeaponType::AdvancedMissileRack),
        Just(WeaponType::ParticleBeam),
        Just(WeaponType::IonCannon),
        Just(WeaponType::Railgun),
    ]
}

/// Enough scripted dice for any single attack: roll, point defense,
/// damage, ion duration
fn attack_dice() -> impl Strategy<Value = Vec<i32>> {
    proptest::collection::vec(1..=6i32, 12)
}

proptest! {
    #[test]
    fn prop_hit_iff_total_at_least_target(roll in 2..=12i32, dm in -10..=10i32) {
        let result = resolve_check(roll, dm);
        prop_assert_eq!(result.success, roll + dm >= TARGET_NUMBER);
        prop_assert_eq!(result.effect, (roll + dm - TARGET_NUMBER).max(0));
        prop_assert!(result.effect >= 0);
    }

    #[test]
    fn prop_attack_invariants(
        rolls in attack_dice(),
        weapon in any_weapon(),
        armour in 0..=20i32,
        fire_control in 0..=4i32,
        gunner_skill in 0..=4i32,
    ) {
        let mut engine = CombatEngine::new(EngineConfig::default())
            .with_dice(Box::new(ScriptedDice::new(rolls)));
        let mut attacker = Ship::new("Attacker", Faction::Player);
        attacker.fire_control = fire_control;
        attacker.turrets = vec![Turret::new(vec![weapon], gunner_skill)];
        attacker.missiles = 5;
        let mut defender = Ship::new("Defender", Faction::Enemy);
        defender.armour = armour;
        let (a, d) = (attacker.id, defender.id);
        engine.init_combat(vec![attacker], vec![defender], RangeBand::Medium);

        let (hull_before, power_before) = {
            let ship = engine.ship(d).unwrap();
            (ship.hull, ship.power)
        };
        let result = engine.resolve_attack(a, d, &AttackOptions::default()).unwrap();
        let ship = engine.ship(d).unwrap();

        // Damage and drain are never negative, hull and power never go below zero
        prop_assert!(result.damage >= 0);
        prop_assert!(result.power_drain >= 0);
        prop_assert!(ship.hull >= 0);
        prop_assert!(ship.power >= 0);

        // Ion hits never touch hull; everything else never touches power
        if weapon.is_ion() {
            prop_assert_eq!(ship.hull, hull_before);
        } else {
            prop_assert_eq!(ship.power, power_before);
        }

        // Hit classification matches the shared rule
        prop_assert_eq!(result.hit, result.total >= TARGET_NUMBER);
        if !result.hit {
            prop_assert_eq!(result.damage, 0);
            prop_assert_eq!(result.power_drain, 0);
        }

        // Destruction is exactly hull reaching zero
        prop_assert_eq!(ship.destroyed, ship.hull == 0);
    }

    #[test]
    fn prop_system_disable_exactly_at_three_hits(hits in 1..=8u32) {
        let mut engine = CombatEngine::new(EngineConfig::default());
        let defender = Ship::new("Defender", Faction::Enemy);
        let d = defender.id;
        engine.init_combat(vec![Ship::new("X", Faction::Player)], vec![defender], RangeBand::Medium);

        let mut was_disabled = false;
        for n in 1..=hits {
            let status = engine
                .apply_system_damage(d, broadside::ships::systems::SystemName::Sensors)
                .unwrap();
            prop_assert_eq!(status.hits as u32, n);
            prop_assert_eq!(status.disabled, n >= 3);
            // Monotone: once disabled, never re-enabled
            prop_assert!(!was_disabled || status.disabled);
            was_disabled = status.disabled;
        }
    }

    #[test]
    fn prop_event_log_bounded_fifo(cap in 1..=20usize, publishes in 0..=60usize) {
        let mut bus = EventBus::new(cap, false);
        for round in 0..publishes {
            bus.publish(EventPayload::RoundStarted {
                round: round as u32,
                ships_remaining: 2,
            });
        }
        prop_assert!(bus.log_len() <= cap);
        let log = bus.replay(0, None);
        prop_assert_eq!(log.len(), publishes.min(cap));
        // FIFO eviction keeps the newest ids, in ascending order
        prop_assert!(log.windows(2).all(|pair| pair[0].id < pair[1].id));
        if let Some(last) = log.last() {
            prop_assert_eq!(last.id, publishes as u64);
        }
    }

    #[test]
    fn prop_replay_respects_from_id(publishes in 1..=30usize, from in 0..=35u64) {
        let mut bus = EventBus::new(100, false);
        for round in 0..publishes {
            bus.publish(EventPayload::RoundStarted {
                round: round as u32,
                ships_remaining: 2,
            });
        }
        let replayed = bus.replay(from, None);
        prop_assert!(replayed.iter().all(|event| event.id >= from));
        prop_assert!(replayed.windows(2).all(|pair| pair[0].id < pair[1].id));
    }

    #[test]
    fn prop_resolution_is_deterministic(
        rolls in attack_dice(),
        weapon in any_weapon(),
        armour in 0..=12i32,
    ) {
        let run = |rolls: Vec<i32>| {
            let mut engine = CombatEngine::new(EngineConfig::default())
                .with_dice(Box::new(ScriptedDice::new(rolls)));
            let mut attacker = Ship::new("Attacker", Faction::Player);
            attacker.fire_control = 2;
            attacker.turrets = vec![Turret::new(vec![weapon], 2)];
            attacker.missiles = 5;
            let mut defender = Ship::new("Defender", Faction::Enemy);
            defender.armour = armour;
            let (a, d) = (attacker.id, defender.id);
            engine.init_combat(vec![attacker], vec![defender], RangeBand::Medium);
            let result = engine.resolve_attack(a, d, &AttackOptions::default()).unwrap();
            (result.hit, result.total, result.damage, result.power_drain,
             engine.ship(d).unwrap().hull, engine.ship(d).unwrap().power)
        };
        prop_assert_eq!(run(rolls.clone()), run(rolls));
    }
}

#[test]
fn test_panicking_subscriber_is_contained() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let mut bus = EventBus::new(10, false);
    bus.subscribe(Topic::All, Box::new(|_| panic!("bad renderer")));
    let delivered = Rc::new(RefCell::new(0u32));
    let sink = Rc::clone(&delivered);
    bus.subscribe(Topic::All, Box::new(move |_| *sink.borrow_mut() += 1));
    let event = bus.publish(EventPayload::RoundStarted {
        round: 1,
        ships_remaining: 2,
    });
    assert_eq!(event.id, 1);
    assert_eq!(*delivered.borrow(), 1);
}
