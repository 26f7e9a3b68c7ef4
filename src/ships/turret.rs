//! Weapon mounts
//!
//! A turret carries an ordered weapon list (first entry is the primary)
//! and per-round usage flags. The flags are reset by the gunner station at
//! round start, not by the engine.

use crate::rules::weapons::WeaponType;
use serde::{Deserialize, Serialize};

/// One weapon mount on a ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turret {
    /// Mounted weapons; the first is the primary
    pub weapons: Vec<WeaponType>,
    pub gunner_skill: i32,
    pub used_this_round: bool,
    /// Dedicated to point defense this round
    pub used_for_pd: bool,
    pub disabled: bool,
    /// Damage multiplier for oversized mounts (barbettes, bays)
    pub damage_multiple: i32,
}

impl Turret {
    pub fn new(weapons: Vec<WeaponType>, gunner_skill: i32) -> Self {
        Self {
            weapons,
            gunner_skill,
            used_this_round: false,
            used_for_pd: false,
            disabled: false,
            damage_multiple: 1,
        }
    }

    /// Oversized mount dealing a damage multiple
    pub fn barbette(weapon: WeaponType, gunner_skill: i32, damage_multiple: i32) -> Self {
        Self {
            damage_multiple,
            ..Self::new(vec![weapon], gunner_skill)
        }
    }

    /// The first mounted weapon, if any
    pub fn primary_weapon(&self) -> Option<WeaponType> {
        self.weapons.first().copied()
    }

    /// Carries at least one laser
    pub fn has_laser(&self) -> bool {
        self.weapons.iter().any(|w| w.is_laser())
    }

    /// Carries at least one missile rack
    pub fn has_missile_rack(&self) -> bool {
        self.weapons.iter().any(|w| w.is_missile())
    }

    /// Able to fire an attack this round
    pub fn ready(&self) -> bool {
        !self.disabled && !self.used_this_round && !self.used_for_pd && !self.weapons.is_empty()
    }

    /// Clear the per-round usage flags
    pub fn reset_round(&mut self) {
        self.used_this_round = false;
        self.used_for_pd = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_is_first_weapon() {
        let turret = Turret::new(vec![WeaponType::PulseLaser, WeaponType::MissileRack], 2);
        assert_eq!(turret.primary_weapon(), Some(WeaponType::PulseLaser));
        assert!(turret.has_laser());
        assert!(turret.has_missile_rack());
    }

    #[test]
    fn test_empty_mount_has_no_primary() {
        let turret = Turret::new(vec![], 0);
        assert_eq!(turret.primary_weapon(), None);
        assert!(!turret.ready());
    }

    #[test]
    fn test_ready_clears_after_use() {
        let mut turret = Turret::new(vec![WeaponType::BeamLaser], 1);
        assert!(turret.ready());
        turret.used_this_round = true;
        assert!(!turret.ready());
        turret.reset_round();
        assert!(turret.ready());
    }

    #[test]
    fn test_barbette_multiplier() {
        let turret = Turret::barbette(WeaponType::ParticleBeam, 2, 3);
        assert_eq!(turret.damage_multiple, 3);
        assert_eq!(turret.primary_weapon(), Some(WeaponType::ParticleBeam));
    }
}
