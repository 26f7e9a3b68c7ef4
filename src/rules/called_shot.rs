//! Called-shot targeting policy
//!
//! A called shot is a finishing blow against a named subsystem. The policy
//! is a pure function over the defender's state: ion weapons are excluded
//! structurally (nothing physical to wreck) and the defender must already
//! be below half hull. Priority is fixed: stop an escape, starve a dying
//! power plant, otherwise cripple the drives, with a rare sensors pick for
//! variety.

use crate::rules::weapons::WeaponType;
use crate::ships::systems::{SystemName, SystemStatus};
use ahash::AHashMap;

/// Hull fraction below which called shots become worthwhile
pub const CALLED_SHOT_HULL_FRACTION: f32 = 0.5;
/// Power fraction below which the power plant becomes the priority target
pub const POWER_PRIORITY_FRACTION: f32 = 0.3;
/// Flat chance of targeting sensors when the drive fallback is unavailable
pub const SENSOR_PICK_CHANCE: f64 = 0.10;

/// Defender state consulted by the targeting policy
///
/// `sensor_roll` is a pre-rolled uniform value in [0, 1) so the policy
/// itself stays a pure function of its inputs.
#[derive(Debug, Clone)]
pub struct CalledShotContext<'a> {
    pub weapon: WeaponType,
    pub defender_hull: i32,
    pub defender_max_hull: i32,
    pub defender_power: i32,
    pub defender_max_power: i32,
    pub defender_attempting_escape: bool,
    pub defender_systems: &'a AHashMap<SystemName, SystemStatus>,
    pub sensor_roll: f64,
}

impl<'a> CalledShotContext<'a> {
    fn targetable(&self, name: SystemName) -> bool {
        self.defender_systems
            .get(&name)
            .map_or(false, |status| !status.disabled)
    }
}

/// Pick the system a called shot should target, or None to fire normally
pub fn select_called_shot_target(ctx: &CalledShotContext) -> Option<SystemName> {
    if ctx.weapon.is_ion() {
        return None;
    }
    if ctx.defender_max_hull <= 0 {
        return None;
    }
    let hull_fraction = ctx.defender_hull as f32 / ctx.defender_max_hull as f32;
    if hull_fraction >= CALLED_SHOT_HULL_FRACTION {
        return None;
    }

    // Priority 1: stop an escape attempt cold
    if ctx.defender_attempting_escape && ctx.targetable(SystemName::JDrive) {
        return Some(SystemName::JDrive);
    }

    // Priority 2: finish off a failing power plant
    if ctx.defender_max_power > 0 {
        let power_fraction = ctx.defender_power as f32 / ctx.defender_max_power as f32;
        if power_fraction < POWER_PRIORITY_FRACTION && ctx.targetable(SystemName::PowerPlant) {
            return Some(SystemName::PowerPlant);
        }
    }

    // Priority 3: the drives, the default once the hull is failing
    if ctx.targetable(SystemName::MDrive) {
        return Some(SystemName::MDrive);
    }

    // Priority 4: occasionally blind them instead
    if ctx.sensor_roll < SENSOR_PICK_CHANCE && ctx.targetable(SystemName::Sensors) {
        return Some(SystemName::Sensors);
    }

    None
}

/// Attack-roll penalty for calling a shot against a system
pub fn called_shot_penalty(system: SystemName) -> i32 {
    match system {
        SystemName::JDrive => -4,
        SystemName::PowerPlant => -4,
        SystemName::MDrive => -2,
        SystemName::Sensors => -2,
        SystemName::Bridge => -6,
        SystemName::Fuel => -2,
        SystemName::Cargo => -1,
        SystemName::Turret => -2,
        SystemName::Computer => -2,
    }
}
