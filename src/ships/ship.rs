//! Ship state
//!
//! Ships are mutable records owned by the combat engine for the duration
//! of a combat. External code may read them freely but mutates hull,
//! power, systems and flags only through engine methods, so invariants
//! hold and the matching events fire.

use crate::core::types::{Faction, ShipId};
use crate::rules::weapons::WeaponType;
use crate::ships::systems::{SystemName, SystemStatus};
use crate::ships::turret::Turret;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Crew skill referenced by station checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    Gunnery,
    Pilot,
    Electronics,
    Engineering,
    Tactics,
}

/// One vessel in the engagement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub id: ShipId,
    pub name: String,
    pub faction: Faction,

    // Combat stats
    pub hull: i32,
    pub max_hull: i32,
    pub armour: i32,
    pub power: i32,
    pub max_power: i32,
    pub thrust: i32,
    pub fire_control: i32,
    pub pilot_skill: i32,
    pub sensor_dm: i32,
    /// Penalty applied to enemy detection attempts
    pub stealth: i32,

    // Mounts and consumables
    pub turrets: Vec<Turret>,
    pub missiles: u32,
    pub sandcasters: u32,

    // Per-round and persistent flags
    pub evasive: bool,
    pub attempting_escape: bool,
    pub pd_attempts: u32,
    pub sandcaster_active: bool,
    pub destroyed: bool,
    /// Sensor lock granting +1 DM on the next attack against this target
    pub target_lock: Option<ShipId>,

    /// Damage tracker per named system
    pub systems: AHashMap<SystemName, SystemStatus>,
    /// Crew skill ratings
    pub skills: AHashMap<Skill, i32>,
}

impl Ship {
    pub fn new(name: impl Into<String>, faction: Faction) -> Self {
        Self {
            id: ShipId::new(),
            name: name.into(),
            faction,
            hull: 40,
            max_hull: 40,
            armour: 2,
            power: 60,
            max_power: 60,
            thrust: 2,
            fire_control: 0,
            pilot_skill: 1,
            sensor_dm: 0,
            stealth: 0,
            turrets: Vec::new(),
            missiles: 0,
            sandcasters: 0,
            evasive: false,
            attempting_escape: false,
            pd_attempts: 0,
            sandcaster_active: false,
            destroyed: false,
            target_lock: None,
            systems: default_systems(),
            skills: AHashMap::new(),
        }
    }

    /// Reference hull: lightly armed merchant
    pub fn free_trader(name: impl Into<String>) -> Self {
        let mut ship = Ship::new(name, Faction::Player);
        ship.hull = 40;
        ship.max_hull = 40;
        ship.armour = 2;
        ship.thrust = 1;
        ship.turrets = vec![Turret::new(vec![WeaponType::PulseLaser], 0)];
        ship.sandcasters = 3;
        ship
    }

    /// Reference hull: military patrol ship
    pub fn patrol_corvette(name: impl Into<String>) -> Self {
        let mut ship = Ship::new(name, Faction::Player);
        ship.hull = 80;
        ship.max_hull = 80;
        ship.armour = 4;
        ship.power = 90;
        ship.max_power = 90;
        ship.thrust = 4;
        ship.fire_control = 2;
        ship.pilot_skill = 2;
        ship.sensor_dm = 1;
        ship.turrets = vec![
            Turret::new(vec![WeaponType::BeamLaser, WeaponType::MissileRack], 2),
            Turret::new(vec![WeaponType::PulseLaser], 1),
        ];
        ship.missiles = 12;
        ship.skills =
            AHashMap::from_iter([(Skill::Gunnery, 2), (Skill::Pilot, 2), (Skill::Electronics, 1)]);
        ship
    }

    /// Reference hull: fast raider
    pub fn pirate_corsair(name: impl Into<String>) -> Self {
        let mut ship = Ship::new(name, Faction::Enemy);
        ship.hull = 60;
        ship.max_hull = 60;
        ship.armour = 3;
        ship.thrust = 6;
        ship.fire_control = 1;
        ship.pilot_skill = 1;
        ship.turrets = vec![
            Turret::new(vec![WeaponType::PulseLaser], 1),
            Turret::new(vec![WeaponType::MissileRack], 1),
        ];
        ship.missiles = 6;
        ship
    }

    /// Alive means hull above zero
    pub fn is_alive(&self) -> bool {
        !self.destroyed && self.hull > 0
    }

    /// Fraction of hull remaining
    pub fn hull_fraction(&self) -> f32 {
        if self.max_hull <= 0 {
            return 0.0;
        }
        self.hull as f32 / self.max_hull as f32
    }

    /// Damage state of a system, if tracked
    pub fn system(&self, name: SystemName) -> Option<&SystemStatus> {
        self.systems.get(&name)
    }

    /// A system is operational unless tracked and disabled
    pub fn system_operational(&self, name: SystemName) -> bool {
        self.system(name).map_or(true, |status| !status.disabled)
    }

    /// Crew skill rating, zero when the position is unfilled
    pub fn crew_skill(&self, skill: Skill) -> i32 {
        self.skills.get(&skill).copied().unwrap_or(0)
    }

    /// Index of the first turret able to fire this round
    pub fn ready_turret(&self) -> Option<usize> {
        self.turrets.iter().position(|turret| turret.ready())
    }

    /// Index of a laser turret usable for point defense
    pub fn point_defense_turret(&self) -> Option<usize> {
        self.turrets
            .iter()
            .position(|turret| turret.has_laser() && !turret.disabled)
    }
}

/// Fresh trackers for the systems every hull carries
pub fn default_systems() -> AHashMap<SystemName, SystemStatus> {
    SystemName::DEFAULT_TRACKED
        .iter()
        .map(|name| (*name, SystemStatus::default()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ship_tracks_default_systems() {
        let ship = Ship::new("Beowulf", Faction::Player);
        for name in SystemName::DEFAULT_TRACKED {
            assert!(ship.system(name).is_some());
            assert!(ship.system_operational(name));
        }
        assert!(ship.system(SystemName::Bridge).is_none());
        assert!(ship.system_operational(SystemName::Bridge));
    }

    #[test]
    fn test_crew_skill_defaults_to_zero() {
        let ship = Ship::new("Beowulf", Faction::Player);
        assert_eq!(ship.crew_skill(Skill::Gunnery), 0);

        let corvette = Ship::patrol_corvette("Vigilant");
        assert_eq!(corvette.crew_skill(Skill::Gunnery), 2);
    }

    #[test]
    fn test_ready_turret_skips_spent_mounts() {
        let mut ship = Ship::patrol_corvette("Vigilant");
        assert_eq!(ship.ready_turret(), Some(0));
        ship.turrets[0].used_this_round = true;
        assert_eq!(ship.ready_turret(), Some(1));
        ship.turrets[1].disabled = true;
        assert_eq!(ship.ready_turret(), None);
    }

    #[test]
    fn test_point_defense_needs_laser() {
        let mut ship = Ship::new("Hulk", Faction::Enemy);
        ship.turrets = vec![Turret::new(vec![WeaponType::MissileRack], 1)];
        assert_eq!(ship.point_defense_turret(), None);
        ship.turrets.push(Turret::new(vec![WeaponType::PulseLaser], 0));
        assert_eq!(ship.point_defense_turret(), Some(1));
    }

    #[test]
    fn test_hull_fraction() {
        let mut ship = Ship::free_trader("Marava");
        ship.hull = 10;
        assert!((ship.hull_fraction() - 0.25).abs() < f32::EPSILON);
    }
}
