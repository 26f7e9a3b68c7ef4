//! Dice service
//!
//! All randomness enters the engine through `DiceRoller`. The production
//! roller is a seeded ChaCha generator; tests inject a scripted roller so
//! every resolution is exactly reproducible.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Source of die rolls for the engine
pub trait DiceRoller {
    /// Roll a single d6 (1-6)
    fn roll_1d6(&mut self) -> i32;

    /// Uniform value in [0, 1), used for flat percentage chances
    fn roll_unit(&mut self) -> f64;

    /// Roll 2d6 and sum
    fn roll_2d6(&mut self) -> i32 {
        self.roll_1d6() + self.roll_1d6()
    }

    /// Roll N d6 and sum
    fn roll_nd6(&mut self, n: u32) -> i32 {
        (0..n).map(|_| self.roll_1d6()).sum()
    }
}

/// Seeded ChaCha-backed roller, the default dice source
pub struct ChaChaDice {
    rng: ChaCha8Rng,
}

impl ChaChaDice {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl DiceRoller for ChaChaDice {
    fn roll_1d6(&mut self) -> i32 {
        self.rng.gen_range(1..=6)
    }

    fn roll_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Scripted roller for tests: pops one queued die per `roll_1d6`
///
/// Unit rolls come from a separate queue and default to 1.0 (never
/// trigger a percentage chance) when that queue is empty.
pub struct ScriptedDice {
    dice: VecDeque<i32>,
    units: VecDeque<f64>,
}

impl ScriptedDice {
    pub fn new(rolls: impl IntoIterator<Item = i32>) -> Self {
        Self {
            dice: rolls.into_iter().collect(),
            units: VecDeque::new(),
        }
    }

    pub fn with_units(mut self, units: impl IntoIterator<Item = f64>) -> Self {
        self.units = units.into_iter().collect();
        self
    }
}

impl DiceRoller for ScriptedDice {
    fn roll_1d6(&mut self) -> i32 {
        self.dice
            .pop_front()
            .expect("scripted dice exhausted: queue more rolls")
    }

    fn roll_unit(&mut self) -> f64 {
        self.units.pop_front().unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chacha_rolls_in_range() {
        let mut dice = ChaChaDice::seeded(42);
        for _ in 0..100 {
            let roll = dice.roll_1d6();
            assert!((1..=6).contains(&roll));
        }
    }

    #[test]
    fn test_chacha_is_deterministic() {
        let mut a = ChaChaDice::seeded(7);
        let mut b = ChaChaDice::seeded(7);
        let rolls_a: Vec<i32> = (0..20).map(|_| a.roll_1d6()).collect();
        let rolls_b: Vec<i32> = (0..20).map(|_| b.roll_1d6()).collect();
        assert_eq!(rolls_a, rolls_b);
    }

    #[test]
    fn test_scripted_pops_in_order() {
        let mut dice = ScriptedDice::new([3, 4, 5]);
        assert_eq!(dice.roll_2d6(), 7);
        assert_eq!(dice.roll_1d6(), 5);
    }

    #[test]
    fn test_scripted_nd6_sums() {
        let mut dice = ScriptedDice::new([1, 2, 3, 4]);
        assert_eq!(dice.roll_nd6(4), 10);
    }

    #[test]
    fn test_scripted_unit_defaults_high() {
        let mut dice = ScriptedDice::new([]);
        assert_eq!(dice.roll_unit(), 1.0);
        let mut dice = ScriptedDice::new([]).with_units([0.05]);
        assert!(dice.roll_unit() < 0.1);
    }
}
