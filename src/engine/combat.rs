//! Combat engine
//!
//! Owns the ship roster and the phase state machine, resolves attacks and
//! damage, and announces every state change on the event bus. The engine
//! is a pure reactive state machine: phase advancement, round creation
//! and victory polling are all caller-driven, which keeps manual stepping
//! possible for tests and paced front-ends.

use crate::core::config::EngineConfig;
use crate::core::error::EngineError;
use crate::core::types::{Faction, Round, ShipId};
use crate::dice::{ChaChaDice, DiceRoller};
use crate::engine::attack::{AttackOptions, AttackResult, ModifierBreakdown, PointDefenseResult};
use crate::engine::phase::CombatPhase;
use crate::engine::stats::CombatStats;
use crate::events::bus::{EventBus, Handler, SubscriptionId, Topic};
use crate::events::event::{CombatEvent, EventKind, EventPayload, InitiativeEntry};
use crate::rules::called_shot::called_shot_penalty;
use crate::rules::checks::resolve_check;
use crate::rules::range::RangeBand;
use crate::rules::weapons::WeaponType;
use crate::ships::ship::{default_systems, Ship};
use crate::ships::systems::{SystemName, SystemStatus};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Thrust at or above which a ship jinks at long range
pub const EVASIVE_THRUST: i32 = 6;

/// Terminal result of a combat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatOutcome {
    pub winner: Faction,
    pub reason: String,
}

/// Result of a sandcaster activation attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandcasterResult {
    pub success: bool,
    pub reason: Option<String>,
    pub remaining: u32,
}

/// State machine driving one combat from initialization to its outcome
pub struct CombatEngine {
    bus: EventBus,
    dice: Box<dyn DiceRoller>,
    ships: AHashMap<ShipId, Ship>,
    /// Stable iteration order for deterministic resolution
    roster: Vec<ShipId>,
    range: RangeBand,
    round: Round,
    phase: Option<CombatPhase>,
    initialized: bool,
    combat_active: bool,
    initiative_order: Vec<ShipId>,
    stats: CombatStats,
}

impl CombatEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            bus: EventBus::new(config.max_log_size, config.debug),
            dice: Box::new(ChaChaDice::seeded(config.seed)),
            ships: AHashMap::new(),
            roster: Vec::new(),
            range: RangeBand::default(),
            round: 0,
            phase: None,
            initialized: false,
            combat_active: false,
            initiative_order: Vec::new(),
            stats: CombatStats::default(),
        }
    }

    /// Replace the dice source; tests inject a scripted roller here
    pub fn with_dice(mut self, dice: Box<dyn DiceRoller>) -> Self {
        self.dice = dice;
        self
    }

    // ===== Initialization =====

    /// Take ownership of both fleets and reset the combat state
    ///
    /// Ships are tagged with their faction, given default system trackers
    /// when they have none, and their hull/power baselines fixed.
    pub fn init_combat(&mut self, player_fleet: Vec<Ship>, enemy_fleet: Vec<Ship>, range: RangeBand) {
        self.ships.clear();
        self.roster.clear();
        self.initiative_order.clear();

        for (fleet, faction) in [(player_fleet, Faction::Player), (enemy_fleet, Faction::Enemy)] {
            for mut ship in fleet {
                ship.faction = faction;
                if ship.systems.is_empty() {
                    ship.systems = default_systems();
                }
                ship.max_hull = ship.max_hull.max(ship.hull);
                ship.max_power = ship.max_power.max(ship.power);
                ship.evasive = false;
                ship.attempting_escape = false;
                ship.pd_attempts = 0;
                ship.sandcaster_active = false;
                ship.target_lock = None;
                self.roster.push(ship.id);
                self.ships.insert(ship.id, ship);
            }
        }

        self.range = range;
        self.round = 0;
        self.phase = None;
        self.stats = CombatStats::default();
        self.initialized = true;
        self.combat_active = true;
        tracing::debug!(ships = self.roster.len(), "combat initialized");
    }

    // ===== Accessors =====

    pub fn ship(&self, id: ShipId) -> Option<&Ship> {
        self.ships.get(&id)
    }

    pub(crate) fn ship_mut(&mut self, id: ShipId) -> Option<&mut Ship> {
        self.ships.get_mut(&id)
    }

    /// Ships of one faction in roster order
    pub fn ships_by_faction(&self, faction: Faction) -> Vec<&Ship> {
        self.roster
            .iter()
            .filter_map(|id| self.ships.get(id))
            .filter(|ship| ship.faction == faction)
            .collect()
    }

    fn living_count(&self, faction: Faction) -> usize {
        self.ships_by_faction(faction)
            .iter()
            .filter(|ship| ship.is_alive())
            .count()
    }

    pub fn round(&self) -> Round {
        self.round
    }

    pub fn phase(&self) -> Option<CombatPhase> {
        self.phase
    }

    pub fn range(&self) -> RangeBand {
        self.range
    }

    pub fn set_range(&mut self, range: RangeBand) {
        self.range = range;
    }

    pub fn combat_active(&self) -> bool {
        self.combat_active
    }

    pub fn initiative_order(&self) -> &[ShipId] {
        &self.initiative_order
    }

    pub fn stats(&self) -> CombatStats {
        self.stats
    }

    pub fn dice_mut(&mut self) -> &mut dyn DiceRoller {
        self.dice.as_mut()
    }

    pub(crate) fn publish(&mut self, payload: EventPayload) -> CombatEvent {
        self.bus.publish(payload)
    }

    // ===== Rounds and phases =====

    /// Open the next round: reset per-round ship flags, enter the first
    /// phase, announce the round
    ///
    /// Turret usage flags are deliberately untouched: clearing them is the
    /// gunner station's job (`stations::gunner::reset_turrets`).
    pub fn start_round(&mut self) -> Result<Round, EngineError> {
        if !self.initialized {
            return Err(EngineError::CombatNotInitialized);
        }
        self.round += 1;
        self.stats.rounds = self.round;
        self.phase = Some(CombatPhase::first());
        for ship in self.ships.values_mut() {
            ship.pd_attempts = 0;
            ship.sandcaster_active = false;
        }
        let ships_remaining =
            self.living_count(Faction::Player) + self.living_count(Faction::Enemy);
        self.bus.publish(EventPayload::RoundStarted {
            round: self.round,
            ships_remaining,
        });
        Ok(self.round)
    }

    /// Advance one phase; None once the round is exhausted, after which
    /// the caller starts the next round
    pub fn next_phase(&mut self) -> Option<CombatPhase> {
        let next = self.phase?.next();
        match next {
            Some(phase) => {
                self.phase = Some(phase);
                self.bus.publish(EventPayload::PhaseChanged {
                    phase,
                    round: self.round,
                });
                Some(phase)
            }
            None => {
                self.phase = None;
                None
            }
        }
    }

    // ===== Initiative =====

    /// Roll 2d6 + pilot skill per living ship (the player fleet adds the
    /// captain's tactics effect) and fix this round's acting order
    pub fn roll_initiative(&mut self, tactics_dm: i32) -> Result<Vec<InitiativeEntry>, EngineError> {
        if !self.initialized {
            return Err(EngineError::CombatNotInitialized);
        }
        let mut entries = Vec::new();
        for id in self.roster.clone() {
            let Some(ship) = self.ships.get(&id) else {
                continue;
            };
            if !ship.is_alive() {
                continue;
            }
            let dm = ship.pilot_skill
                + if ship.faction == Faction::Player {
                    tactics_dm
                } else {
                    0
                };
            let name = ship.name.clone();
            let roll = self.dice.roll_2d6();
            entries.push(InitiativeEntry {
                ship: id,
                name,
                roll,
                total: roll + dm,
            });
        }
        entries.sort_by(|a, b| b.total.cmp(&a.total));
        self.initiative_order = entries.iter().map(|entry| entry.ship).collect();
        self.bus.publish(EventPayload::InitiativeRolled {
            initiatives: entries.clone(),
        });
        Ok(entries)
    }

    // ===== Attack resolution =====

    /// Resolve one attack: mount and weapon selection, the 2d6 roll with
    /// its full modifier breakdown, point defense against missiles, then
    /// damage or power drain
    pub fn resolve_attack(
        &mut self,
        attacker_id: ShipId,
        defender_id: ShipId,
        opts: &AttackOptions,
    ) -> Result<AttackResult, EngineError> {
        if !self.initialized {
            return Err(EngineError::CombatNotInitialized);
        }
        let attacker = self
            .ships
            .get(&attacker_id)
            .ok_or(EngineError::UnknownShip(attacker_id))?;
        let defender = self
            .ships
            .get(&defender_id)
            .ok_or(EngineError::UnknownShip(defender_id))?;

        // Mount resolution: explicit weapon override, else the turret's
        // primary
        let turret = attacker.turrets.get(opts.turret_index.unwrap_or(0));
        let mut weapon = match opts.weapon.or_else(|| turret.and_then(|t| t.primary_weapon())) {
            Some(weapon) => weapon,
            None => return Ok(AttackResult::failure("No weapon available")),
        };
        let gunner_skill = turret.map_or(0, |t| t.gunner_skill);
        let damage_multiple = turret.map_or(1, |t| t.damage_multiple).max(1);
        let missiles = attacker.missiles;
        let has_lock = attacker.target_lock == Some(defender_id);

        let defender_evasive = defender.evasive;
        let defender_thrust = defender.thrust;
        let defender_armour = defender.armour;

        // Switch to missiles at long range when asked and stocked
        if opts.auto_missile && missiles > 0 && self.range.is_long() {
            weapon = WeaponType::MissileRack;
        }
        if weapon.is_missile() && missiles == 0 {
            return Ok(AttackResult::failure("No missiles remaining"));
        }

        let modifiers = ModifierBreakdown {
            fire_control: attacker.fire_control,
            gunner_skill,
            range: self.range.dm(),
            evasive: if defender_evasive { -defender_thrust } else { 0 },
            weapon: weapon.attack_dm(),
            called_shot: opts.called_shot.map_or(0, called_shot_penalty),
            target_lock: if has_lock { 1 } else { 0 },
        };

        // Preconditions passed; state mutation starts here
        if weapon.is_missile() {
            if let Some(ship) = self.ships.get_mut(&attacker_id) {
                ship.missiles -= 1;
            }
            self.stats.missiles_launched += 1;
        }
        if has_lock {
            if let Some(ship) = self.ships.get_mut(&attacker_id) {
                ship.target_lock = None;
            }
        }

        let roll = self.dice.roll_2d6();
        let check = resolve_check(roll, modifiers.total());
        self.stats.attacks += 1;
        if check.success {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
        }

        let mut result = AttackResult {
            success: true,
            reason: None,
            weapon: Some(weapon),
            hit: check.success,
            roll,
            total: check.total,
            effect: check.effect,
            modifiers,
            damage: 0,
            power_drain: 0,
            ion_duration: None,
            system_damage: opts.called_shot,
            destroyed: false,
            point_defense: None,
        };

        // Missile hits face point defense before any damage roll
        if check.success && weapon.is_missile() {
            if let Some(pd) = self.roll_point_defense(defender_id)? {
                result.point_defense = Some(pd);
                self.bus.publish(EventPayload::PointDefense {
                    attacker: attacker_id,
                    defender: defender_id,
                    roll: pd.roll,
                    total: pd.total,
                    intercepted: pd.intercepted,
                });
                if pd.intercepted {
                    self.publish_attack_resolved(attacker_id, defender_id, weapon, &result);
                    return Ok(result);
                }
            }
        }

        if check.success {
            let dice_total = self.dice.roll_nd6(weapon.damage_dice());
            if weapon.is_ion() {
                // Ion weapons drain the power pool and never touch hull
                let drain = (dice_total + check.effect) * damage_multiple;
                if let Some(ship) = self.ships.get_mut(&defender_id) {
                    ship.power = (ship.power - drain).max(0);
                }
                result.power_drain = drain;
                result.ion_duration = Some(if check.effect >= 6 {
                    ((self.dice.roll_1d6() + 1) / 2) as u8
                } else {
                    1
                });
                self.stats.power_drained += drain as i64;
            } else {
                let damage = (dice_total + check.effect - defender_armour).max(0) * damage_multiple;
                result.damage = damage;
                self.stats.damage_dealt += damage as i64;
                let mut newly_destroyed = false;
                if let Some(ship) = self.ships.get_mut(&defender_id) {
                    ship.hull = (ship.hull - damage).max(0);
                    if ship.hull == 0 && !ship.destroyed {
                        ship.destroyed = true;
                        newly_destroyed = true;
                    }
                }
                if newly_destroyed {
                    result.destroyed = true;
                    self.bus.publish(EventPayload::ShipDestroyed {
                        ship: defender_id,
                        killed_by: attacker_id,
                    });
                }
            }
        }

        self.publish_attack_resolved(attacker_id, defender_id, weapon, &result);
        if result.damage > 0 || result.power_drain > 0 {
            let (remaining_hull, remaining_power) = self
                .ships
                .get(&defender_id)
                .map_or((0, 0), |ship| (ship.hull, ship.power));
            self.bus.publish(EventPayload::DamageApplied {
                ship: defender_id,
                damage: result.damage,
                power_drain: result.power_drain,
                remaining_hull,
                remaining_power,
            });
        }
        Ok(result)
    }

    fn publish_attack_resolved(
        &mut self,
        attacker: ShipId,
        defender: ShipId,
        weapon: WeaponType,
        result: &AttackResult,
    ) {
        self.bus.publish(EventPayload::AttackResolved {
            attacker,
            defender,
            weapon,
            roll: result.roll,
            total_dm: result.modifiers.total(),
            total: result.total,
            effect: result.effect,
            damage: result.damage,
            power_drain: result.power_drain,
            system_damage: result.system_damage,
            destroyed: result.destroyed,
            point_defense: result.point_defense,
            modifiers: result.modifiers,
        });
    }

    // ===== Point defense =====

    /// Attempt to intercept an incoming missile salvo
    ///
    /// Needs a working laser turret. Each attempt in a round stacks a
    /// cumulative -1: defending against repeated salvos gets harder.
    /// Returns None when no turret qualifies (the attack proceeds).
    pub fn resolve_point_defense(
        &mut self,
        defender_id: ShipId,
    ) -> Result<Option<PointDefenseResult>, EngineError> {
        self.roll_point_defense(defender_id)
    }

    fn roll_point_defense(
        &mut self,
        defender_id: ShipId,
    ) -> Result<Option<PointDefenseResult>, EngineError> {
        let defender = self
            .ships
            .get(&defender_id)
            .ok_or(EngineError::UnknownShip(defender_id))?;
        let Some(turret_index) = defender.point_defense_turret() else {
            return Ok(None);
        };
        let gunner_skill = defender.turrets[turret_index].gunner_skill;
        let attempts = defender.pd_attempts + 1;
        if let Some(ship) = self.ships.get_mut(&defender_id) {
            ship.pd_attempts = attempts;
            ship.turrets[turret_index].used_for_pd = true;
        }

        let penalty = -(attempts as i32 - 1);
        let roll = self.dice.roll_2d6();
        let check = resolve_check(roll, gunner_skill + penalty);
        self.stats.point_defense_attempts += 1;
        if check.success {
            self.stats.point_defense_intercepts += 1;
        }
        Ok(Some(PointDefenseResult {
            roll,
            gunner_skill,
            penalty,
            total: check.total,
            intercepted: check.success,
        }))
    }

    // ===== System damage =====

    /// Register a called-shot hit against a named system
    ///
    /// The tracker is created on first damage if the hull never listed the
    /// system. Three hits disable it, permanently. Decoupled from weapon
    /// resolution on purpose: the gunner invokes this after a successful
    /// called shot, the engine never infers it.
    pub fn apply_system_damage(
        &mut self,
        ship_id: ShipId,
        system: SystemName,
    ) -> Result<SystemStatus, EngineError> {
        let ship = self
            .ships
            .get_mut(&ship_id)
            .ok_or(EngineError::UnknownShip(ship_id))?;
        let status = ship.systems.entry(system).or_default();
        status.take_hit();
        let snapshot = *status;
        self.bus.publish(EventPayload::SystemDamaged {
            ship: ship_id,
            system,
            hits: snapshot.hits,
            disabled: snapshot.disabled,
        });
        Ok(snapshot)
    }

    /// Undo one hit of system damage; disabled systems stay down
    pub(crate) fn repair_system(
        &mut self,
        ship_id: ShipId,
        system: SystemName,
    ) -> Result<SystemStatus, EngineError> {
        let ship = self
            .ships
            .get_mut(&ship_id)
            .ok_or(EngineError::UnknownShip(ship_id))?;
        let status = ship.systems.entry(system).or_default();
        status.repair_hit();
        let snapshot = *status;
        self.bus.publish(EventPayload::SystemDamaged {
            ship: ship_id,
            system,
            hits: snapshot.hits,
            disabled: snapshot.disabled,
        });
        Ok(snapshot)
    }

    // ===== Defensive posture =====

    /// Set or clear a ship's evasive posture and announce the penalty
    /// attackers now face
    pub fn set_evasive(&mut self, ship_id: ShipId, enabled: bool) -> Result<(), EngineError> {
        let thrust = {
            let ship = self
                .ships
                .get_mut(&ship_id)
                .ok_or(EngineError::UnknownShip(ship_id))?;
            ship.evasive = enabled;
            ship.thrust
        };
        self.bus.publish(EventPayload::EvasiveAction {
            ship: ship_id,
            enabled,
            penalty: if enabled { -thrust } else { 0 },
        });
        Ok(())
    }

    /// Automated-fleet heuristic: fast ships jink at long range
    pub fn apply_tactical_stance(&mut self, faction: Faction) {
        let long = self.range.is_long();
        let changes: Vec<(ShipId, bool)> = self
            .roster
            .iter()
            .filter_map(|id| self.ships.get(id))
            .filter(|ship| ship.faction == faction && ship.is_alive())
            .filter_map(|ship| {
                let desired = long && ship.thrust >= EVASIVE_THRUST;
                (ship.evasive != desired).then_some((ship.id, desired))
            })
            .collect();
        for (id, desired) in changes {
            let _ = self.set_evasive(id, desired);
        }
    }

    /// Spend a sandcaster charge for the round
    pub fn activate_sandcaster(&mut self, ship_id: ShipId) -> Result<SandcasterResult, EngineError> {
        let ship = self
            .ships
            .get_mut(&ship_id)
            .ok_or(EngineError::UnknownShip(ship_id))?;
        if ship.sandcasters == 0 {
            return Ok(SandcasterResult {
                success: false,
                reason: Some("No sandcaster charges remaining".into()),
                remaining: 0,
            });
        }
        if ship.sandcaster_active {
            return Ok(SandcasterResult {
                success: false,
                reason: Some("Sandcaster already deployed this round".into()),
                remaining: ship.sandcasters,
            });
        }
        ship.sandcasters -= 1;
        ship.sandcaster_active = true;
        let remaining = ship.sandcasters;
        self.bus.publish(EventPayload::Sandcaster {
            ship: ship_id,
            remaining,
        });
        Ok(SandcasterResult {
            success: true,
            reason: None,
            remaining,
        })
    }

    // ===== Station support =====

    pub(crate) fn set_target_lock(&mut self, ship_id: ShipId, target: Option<ShipId>) {
        if let Some(ship) = self.ships.get_mut(&ship_id) {
            ship.target_lock = target;
        }
    }

    pub(crate) fn set_attempting_escape(&mut self, ship_id: ShipId, value: bool) {
        if let Some(ship) = self.ships.get_mut(&ship_id) {
            ship.attempting_escape = value;
        }
    }

    /// Restore power up to the ship's maximum; returns the amount restored
    pub(crate) fn restore_power(&mut self, ship_id: ShipId, amount: i32) -> i32 {
        let Some(ship) = self.ships.get_mut(&ship_id) else {
            return 0;
        };
        let restored = amount.max(0).min(ship.max_power - ship.power);
        ship.power += restored;
        restored
    }

    // ===== Victory detection =====

    /// Poll for a terminal condition; never called automatically
    ///
    /// First match wins: no living player ships, no living enemy ships,
    /// every living enemy drained to zero power.
    pub fn check_combat_end(&mut self) -> Option<CombatOutcome> {
        if !self.combat_active {
            return None;
        }
        let player_alive = self.living_count(Faction::Player);
        let enemy_alive = self.living_count(Faction::Enemy);
        let enemies_drained = enemy_alive > 0
            && self
                .ships_by_faction(Faction::Enemy)
                .iter()
                .filter(|ship| ship.is_alive())
                .all(|ship| ship.power <= 0);

        let (winner, reason) = if player_alive == 0 {
            (Faction::Enemy, "All player ships destroyed")
        } else if enemy_alive == 0 {
            (Faction::Player, "All enemy ships destroyed")
        } else if enemies_drained {
            (Faction::Player, "All enemy ships disabled")
        } else {
            return None;
        };

        self.combat_active = false;
        self.bus.publish(EventPayload::CombatEnded {
            winner,
            reason: reason.into(),
        });
        Some(CombatOutcome {
            winner,
            reason: reason.into(),
        })
    }

    // ===== Bus passthroughs =====

    pub fn subscribe(&mut self, topic: Topic, handler: Handler) -> SubscriptionId {
        self.bus.subscribe(topic, handler)
    }

    pub fn subscribe_many(
        &mut self,
        handlers: impl IntoIterator<Item = (Topic, Handler)>,
    ) -> Vec<SubscriptionId> {
        self.bus.subscribe_many(handlers)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.bus.unsubscribe(id);
    }

    pub fn replay_events(&self, from_id: u64) -> Vec<CombatEvent> {
        self.bus.replay(from_id, None)
    }

    pub fn replay_events_of(&self, from_id: u64, kind: EventKind) -> Vec<CombatEvent> {
        self.bus.replay(from_id, Some(kind))
    }
}
