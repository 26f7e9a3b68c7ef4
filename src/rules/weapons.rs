//! Weapon types and their resolution tables
//!
//! Weapons differ in three ways only: an attack DM, a damage dice count,
//! and whether they drain power instead of breaking hull. Everything else
//! is resolved by the one shared 2d6 rule.

use serde::{Deserialize, Serialize};

/// Ship-mounted weapon type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponType {
    /// Rapid-fire laser, accurate but light
    PulseLaser,
    /// Focused laser, very accurate, lightest punch
    BeamLaser,
    /// Standard missile salvo, interceptable
    MissileRack,
    /// Smart missile salvo, bigger warhead
    AdvancedMissileRack,
    /// Charged-particle stream
    ParticleBeam,
    /// Power-drain weapon, no hull damage
    IonCannon,
    /// Kinetic slug thrower
    Railgun,
}

impl WeaponType {
    /// Attack DM from the weapon's fire-control characteristics
    pub fn attack_dm(&self) -> i32 {
        match self {
            WeaponType::PulseLaser => 2,
            WeaponType::BeamLaser => 4,
            _ => 0,
        }
    }

    /// Number of d6 rolled for damage (or power drain for ion weapons)
    pub fn damage_dice(&self) -> u32 {
        match self {
            WeaponType::PulseLaser => 2,
            WeaponType::BeamLaser => 1,
            WeaponType::MissileRack => 4,
            WeaponType::AdvancedMissileRack => 5,
            WeaponType::ParticleBeam => 4,
            WeaponType::IonCannon => 7,
            WeaponType::Railgun => 2,
        }
    }

    /// Lasers double as point-defense mounts
    pub fn is_laser(&self) -> bool {
        matches!(self, WeaponType::PulseLaser | WeaponType::BeamLaser)
    }

    /// Missile attacks can be intercepted and consume ammunition
    pub fn is_missile(&self) -> bool {
        matches!(
            self,
            WeaponType::MissileRack | WeaponType::AdvancedMissileRack
        )
    }

    /// Ion weapons drain power and never touch hull
    pub fn is_ion(&self) -> bool {
        matches!(self, WeaponType::IonCannon)
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeaponType::PulseLaser => "Pulse Laser",
            WeaponType::BeamLaser => "Beam Laser",
            WeaponType::MissileRack => "Missile Rack",
            WeaponType::AdvancedMissileRack => "Advanced Missile Rack",
            WeaponType::ParticleBeam => "Particle Beam",
            WeaponType::IonCannon => "Ion Cannon",
            WeaponType::Railgun => "Railgun",
        }
    }
}
