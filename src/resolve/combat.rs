//! Combat resolution policies.
//!
//! An attack hands the moving army count and the defending army count to a
//! `CombatPolicy`. Every policy guarantees that losses never exceed the
//! opposing side's size, so neither count goes negative, and that the
//! defender is conquered exactly when `defenders_left == 0`.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::{CombatConfig, CombatMode};

/// Survivors of one engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatOutcome {
    pub attackers_left: u32,
    pub defenders_left: u32,
}

impl CombatOutcome {
    pub const fn is_conquest(&self) -> bool {
        self.defenders_left == 0
    }
}

/// Decides how many armies each side loses in an attack.
pub trait CombatPolicy {
    fn resolve(&mut self, attackers: u32, defenders: u32) -> CombatOutcome;
}

/// Each attacking army destroys one defender with `attacker_kill_chance`,
/// each defending army destroys one attacker with `defender_kill_chance`.
#[derive(Debug, Clone)]
pub struct ProbabilisticCombat {
    rng: SmallRng,
    attacker_kill_chance: f64,
    defender_kill_chance: f64,
}

impl ProbabilisticCombat {
    pub fn new(config: &CombatConfig, rng: SmallRng) -> Self {
        ProbabilisticCombat {
            rng,
            attacker_kill_chance: config.attacker_kill_chance.clamp(0.0, 1.0),
            defender_kill_chance: config.defender_kill_chance.clamp(0.0, 1.0),
        }
    }

    fn kills(&mut self, shooters: u32, chance: f64) -> u32 {
        (0..shooters).filter(|_| self.rng.gen_bool(chance)).count() as u32
    }
}

impl CombatPolicy for ProbabilisticCombat {
    fn resolve(&mut self, attackers: u32, defenders: u32) -> CombatOutcome {
        let defenders_killed = self.kills(attackers, self.attacker_kill_chance).min(defenders);
        let attackers_killed = self.kills(defenders, self.defender_kill_chance).min(attackers);
        CombatOutcome {
            attackers_left: attackers - attackers_killed,
            defenders_left: defenders - defenders_killed,
        }
    }
}

/// Deterministic policy using rounded expected losses.
#[derive(Debug, Clone, Copy)]
pub struct ExpectedCombat {
    attacker_kill_chance: f64,
    defender_kill_chance: f64,
}

impl ExpectedCombat {
    pub fn new(config: &CombatConfig) -> Self {
        ExpectedCombat {
            attacker_kill_chance: config.attacker_kill_chance.clamp(0.0, 1.0),
            defender_kill_chance: config.defender_kill_chance.clamp(0.0, 1.0),
        }
    }
}

impl Default for ExpectedCombat {
    fn default() -> Self {
        ExpectedCombat::new(&CombatConfig::default())
    }
}

impl CombatPolicy for ExpectedCombat {
    fn resolve(&mut self, attackers: u32, defenders: u32) -> CombatOutcome {
        let expected = |n: u32, p: f64| (f64::from(n) * p).round() as u32;
        let defenders_killed = expected(attackers, self.attacker_kill_chance).min(defenders);
        let attackers_killed = expected(defenders, self.defender_kill_chance).min(attackers);
        CombatOutcome {
            attackers_left: attackers - attackers_killed,
            defenders_left: defenders - defenders_killed,
        }
    }
}

/// Builds the policy the config asks for. `seed` 0 draws from entropy.
pub fn combat_policy(config: &CombatConfig, seed: u64) -> Box<dyn CombatPolicy + Send> {
    match config.mode {
        CombatMode::Probabilistic => {
            let rng = if seed != 0 {
                SmallRng::seed_from_u64(seed)
            } else {
                SmallRng::from_entropy()
            };
            Box::new(ProbabilisticCombat::new(config, rng))
        }
        CombatMode::Expected => Box::new(ExpectedCombat::new(config)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn expected_combat_rounds_losses() {
        let mut combat = ExpectedCombat::default();
        // 4 attackers kill round(2.4) = 2, 3 defenders kill round(2.1) = 2.
        assert_eq!(
            combat.resolve(4, 3),
            CombatOutcome { attackers_left: 2, defenders_left: 1 }
        );
        // 10 attackers kill 6 > 3 defenders: capped.
        let out = combat.resolve(10, 3);
        assert!(out.is_conquest());
        assert_eq!(out.attackers_left, 8);
    }

    #[test]
    fn certain_kills_wipe_out_defenders() {
        let config = CombatConfig {
            mode: CombatMode::Probabilistic,
            attacker_kill_chance: 1.0,
            defender_kill_chance: 0.0,
        };
        let mut combat = ProbabilisticCombat::new(&config, SmallRng::seed_from_u64(1));
        assert_eq!(
            combat.resolve(4, 3),
            CombatOutcome { attackers_left: 4, defenders_left: 0 }
        );
    }

    #[test]
    fn seeded_policy_is_reproducible() {
        let config = CombatConfig::default();
        let mut a = combat_policy(&config, 99);
        let mut b = combat_policy(&config, 99);
        for n in 1..20 {
            assert_eq!(a.resolve(n, 20 - n), b.resolve(n, 20 - n));
        }
    }

    proptest! {
        #[test]
        fn losses_never_exceed_either_side(
            attackers in 0u32..200,
            defenders in 0u32..200,
            seed in 1u64..u64::MAX,
        ) {
            let mut combat = combat_policy(&CombatConfig::default(), seed);
            let out = combat.resolve(attackers, defenders);
            prop_assert!(out.attackers_left <= attackers);
            prop_assert!(out.defenders_left <= defenders);
        }
    }
}
