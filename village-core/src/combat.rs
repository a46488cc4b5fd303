//! Attack resolution and gameplay rule violations.
//!
//! An attack runs in two independent halves:
//! 1. The attacker's strike: an accuracy roll, then (on a hit) a crit roll.
//! 2. The defender's armor: a dodge roll, then a block roll.
//!
//! Monsters wear no armor, so only the first half applies when the hero
//! attacks. Both halves apply when a monster hits the hero.

use crate::dice::{self, Roll};
use crate::items::{Armor, PotionKind, Weapon};
use rand::Rng;
use std::fmt;
use thiserror::Error;

/// The numbers that drive a single strike.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeProfile {
    pub damage: u32,
    pub accuracy: f64,
    pub crit_chance: f64,
    pub crit_damage_multiplier: f64,
}

impl StrikeProfile {
    /// Roll to hit, then to crit.
    ///
    /// A roll above `accuracy` misses and skips the crit roll entirely.
    pub fn strike<R: Rng + ?Sized>(&self, multiplier: f64, rng: &mut R) -> Strike {
        let to_hit = Roll::with_rng(rng);
        if to_hit.over(self.accuracy) {
            return Strike::MISS;
        }

        let critical = Roll::with_rng(rng).under(self.crit_chance);
        let factor = if critical {
            multiplier * self.crit_damage_multiplier
        } else {
            multiplier
        };

        Strike {
            hit: true,
            critical,
            damage: dice::scale(self.damage, factor),
        }
    }
}

/// The attacker's half of an attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strike {
    pub hit: bool,
    pub critical: bool,
    pub damage: u32,
}

impl Strike {
    pub const MISS: Strike = Strike {
        hit: false,
        critical: false,
        damage: 0,
    };
}

/// What the defender's armor did to an incoming hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mitigation {
    None,
    Dodged,
    Blocked { absorbed: u32 },
}

/// A fully resolved attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackRoll {
    pub strike: Strike,
    pub mitigation: Mitigation,
    /// Damage left after armor, ready for `Combatant::take_damage`.
    pub damage: u32,
}

/// Resolve a weapon attack against optional armor.
///
/// The armor rolls happen whether or not the strike connected, and a dodge
/// zeroes the damage regardless of the strike. Nothing is applied here: the
/// caller hands `AttackRoll::damage` to `Combatant::take_damage`.
pub fn resolve_attack<R: Rng + ?Sized>(
    weapon: &Weapon,
    defender_armor: Option<&Armor>,
    multiplier: f64,
    rng: &mut R,
) -> AttackRoll {
    let strike = weapon.profile().strike(multiplier, rng);
    let (damage, mitigation) = match defender_armor {
        Some(armor) => armor.mitigate(strike.damage, rng),
        None => (strike.damage, Mitigation::None),
    };

    tracing::trace!(
        weapon = weapon.name,
        hit = strike.hit,
        critical = strike.critical,
        ?mitigation,
        damage,
        "attack resolved"
    );

    AttackRoll {
        strike,
        mitigation,
        damage,
    }
}

// ============================================================================
// Rule violations
// ============================================================================

/// A resource the hero lacked when trying to act.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Energy { required: u32, available: u32 },
    Cooldown { ability: &'static str, turns: u32 },
    Potion(PotionKind),
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Energy {
                required,
                available,
            } => write!(f, "Not enough energy (need {required}, have {available})"),
            Resource::Cooldown { ability, turns } => {
                write!(f, "{ability} is on cooldown for {turns} more turn(s)")
            }
            Resource::Potion(kind) => write!(f, "No {kind} left"),
        }
    }
}

/// Why a battle action was refused. None of these change game state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleViolation {
    #[error("Cannot {action} now: {reason}")]
    InvalidAction {
        action: &'static str,
        reason: &'static str,
    },

    #[error("{0}")]
    InsufficientResource(Resource),

    #[error("There is no monster to fight")]
    NoTarget,
}
