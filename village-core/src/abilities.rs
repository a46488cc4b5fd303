//! Hero abilities.
//!
//! An ability is a static [`AbilitySpec`] plus per-hero cooldown state. The
//! effect is a closed set of variants, so an attack ability always carries
//! attack modifiers and can only be resolved against a weapon.

use crate::combat::{Resource, RuleViolation, Strike, StrikeProfile};
use crate::dice;
use crate::items::Weapon;
use rand::Rng;
use std::fmt;

/// Modifiers an attack ability applies to the wielded weapon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackModifiers {
    pub damage_multiplier: f64,
    pub accuracy_modifier: f64,
    pub crit_chance_modifier: f64,
    pub crit_damage_modifier: f64,
}

impl AttackModifiers {
    /// The weapon's profile with accuracy and crit chance scaled (each capped
    /// at 1.0) and the crit multiplier scaled.
    pub fn profile(&self, weapon: &Weapon) -> StrikeProfile {
        let base = weapon.profile();
        StrikeProfile {
            damage: base.damage,
            accuracy: dice::clamp_probability(base.accuracy * self.accuracy_modifier),
            crit_chance: dice::clamp_probability(base.crit_chance * self.crit_chance_modifier),
            crit_damage_multiplier: base.crit_damage_multiplier * self.crit_damage_modifier,
        }
    }

    /// Strike with `weapon`. Target armor is never consulted here.
    pub fn strike<R: Rng + ?Sized>(&self, weapon: &Weapon, rng: &mut R) -> Strike {
        self.profile(weapon).strike(self.damage_multiplier, rng)
    }
}

/// What an ability does when it fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AbilityEffect {
    Attack(AttackModifiers),
    /// Reduce each of the next `duration` incoming monster attacks by
    /// `block_amount`.
    Defend { block_amount: u32, duration: u32 },
    Utility { healing: u32 },
}

/// Static definition of an ability.
#[derive(Debug, Clone, PartialEq)]
pub struct AbilitySpec {
    pub name: &'static str,
    pub description: &'static str,
    pub cooldown: u32,
    pub energy_cost: u32,
    pub effect: AbilityEffect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AbilityId {
    PowerStrike,
    Cleave,
    AimedShot,
    Fireball,
    ShieldWall,
    Parry,
    SecondWind,
    Mend,
}

impl AbilityId {
    pub const ALL: [AbilityId; 8] = [
        AbilityId::PowerStrike,
        AbilityId::Cleave,
        AbilityId::AimedShot,
        AbilityId::Fireball,
        AbilityId::ShieldWall,
        AbilityId::Parry,
        AbilityId::SecondWind,
        AbilityId::Mend,
    ];

    pub fn spec(self) -> &'static AbilitySpec {
        match self {
            AbilityId::PowerStrike => &POWER_STRIKE,
            AbilityId::Cleave => &CLEAVE,
            AbilityId::AimedShot => &AIMED_SHOT,
            AbilityId::Fireball => &FIREBALL,
            AbilityId::ShieldWall => &SHIELD_WALL,
            AbilityId::Parry => &PARRY,
            AbilityId::SecondWind => &SECOND_WIND,
            AbilityId::Mend => &MEND,
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn from_name(name: &str) -> Option<AbilityId> {
        let name_lower = name.to_lowercase();
        AbilityId::ALL
            .iter()
            .copied()
            .find(|id| id.name().to_lowercase() == name_lower)
    }
}

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

static POWER_STRIKE: AbilitySpec = AbilitySpec {
    name: "Power Strike",
    description: "A heavy swing that trades some accuracy for damage.",
    cooldown: 2,
    energy_cost: 3,
    effect: AbilityEffect::Attack(AttackModifiers {
        damage_multiplier: 1.5,
        accuracy_modifier: 0.9,
        crit_chance_modifier: 1.0,
        crit_damage_modifier: 1.0,
    }),
};
static CLEAVE: AbilitySpec = AbilitySpec {
    name: "Cleave",
    description: "A reckless blow with a high chance to crit.",
    cooldown: 3,
    energy_cost: 4,
    effect: AbilityEffect::Attack(AttackModifiers {
        damage_multiplier: 1.25,
        accuracy_modifier: 0.8,
        crit_chance_modifier: 2.5,
        crit_damage_modifier: 1.25,
    }),
};
static AIMED_SHOT: AbilitySpec = AbilitySpec {
    name: "Aimed Shot",
    description: "Take careful aim for a more accurate, more critical shot.",
    cooldown: 2,
    energy_cost: 3,
    effect: AbilityEffect::Attack(AttackModifiers {
        damage_multiplier: 1.2,
        accuracy_modifier: 1.2,
        crit_chance_modifier: 1.5,
        crit_damage_modifier: 1.0,
    }),
};
static FIREBALL: AbilitySpec = AbilitySpec {
    name: "Fireball",
    description: "Hurl a ball of flame through your focus.",
    cooldown: 3,
    energy_cost: 5,
    effect: AbilityEffect::Attack(AttackModifiers {
        damage_multiplier: 2.0,
        accuracy_modifier: 1.0,
        crit_chance_modifier: 1.0,
        crit_damage_modifier: 1.5,
    }),
};
static SHIELD_WALL: AbilitySpec = AbilitySpec {
    name: "Shield Wall",
    description: "Brace behind your guard for the next two attacks.",
    cooldown: 3,
    energy_cost: 2,
    effect: AbilityEffect::Defend {
        block_amount: 3,
        duration: 2,
    },
};
static PARRY: AbilitySpec = AbilitySpec {
    name: "Parry",
    description: "Turn aside the next attack.",
    cooldown: 1,
    energy_cost: 1,
    effect: AbilityEffect::Defend {
        block_amount: 2,
        duration: 1,
    },
};
static SECOND_WIND: AbilitySpec = AbilitySpec {
    name: "Second Wind",
    description: "Catch your breath and recover some health.",
    cooldown: 4,
    energy_cost: 3,
    effect: AbilityEffect::Utility { healing: 8 },
};
static MEND: AbilitySpec = AbilitySpec {
    name: "Mend",
    description: "Knit your wounds closed with a healing spell.",
    cooldown: 3,
    energy_cost: 4,
    effect: AbilityEffect::Utility { healing: 10 },
};

/// An ability known by a hero, with that hero's cooldown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ability {
    id: AbilityId,
    current_cooldown: u32,
}

impl Ability {
    pub fn new(id: AbilityId) -> Self {
        Self {
            id,
            current_cooldown: 0,
        }
    }

    pub fn id(&self) -> AbilityId {
        self.id
    }

    pub fn spec(&self) -> &'static AbilitySpec {
        self.id.spec()
    }

    pub fn name(&self) -> &'static str {
        self.id.name()
    }

    pub fn current_cooldown(&self) -> u32 {
        self.current_cooldown
    }

    pub fn can_use(&self) -> bool {
        self.current_cooldown == 0
    }

    /// Fire the ability: fails while on cooldown, otherwise resets the
    /// cooldown to its full length and hands back the effect.
    pub fn trigger(&mut self) -> Result<AbilityEffect, RuleViolation> {
        if !self.can_use() {
            return Err(RuleViolation::InsufficientResource(Resource::Cooldown {
                ability: self.name(),
                turns: self.current_cooldown,
            }));
        }
        let spec = self.spec();
        self.current_cooldown = spec.cooldown;
        Ok(spec.effect)
    }

    /// Count down one hero turn.
    pub fn tick(&mut self) {
        self.current_cooldown = self.current_cooldown.saturating_sub(1);
    }

    pub fn reset_cooldown(&mut self) {
        self.current_cooldown = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::WeaponId;

    #[test]
    fn test_ability_lookup() {
        assert_eq!(AbilityId::from_name("power strike"), Some(AbilityId::PowerStrike));
        assert!(AbilityId::from_name("Meteor").is_none());
    }

    #[test]
    fn test_trigger_sets_full_cooldown() {
        let mut ability = Ability::new(AbilityId::ShieldWall);
        assert!(ability.can_use());

        let effect = ability.trigger().unwrap();
        assert!(matches!(effect, AbilityEffect::Defend { block_amount: 3, duration: 2 }));
        assert_eq!(ability.current_cooldown(), 3);
        assert!(!ability.can_use());
    }

    #[test]
    fn test_trigger_on_cooldown_fails() {
        let mut ability = Ability::new(AbilityId::PowerStrike);
        ability.trigger().unwrap();
        let err = ability.trigger().unwrap_err();
        assert_eq!(
            err,
            RuleViolation::InsufficientResource(Resource::Cooldown {
                ability: "Power Strike",
                turns: 2
            })
        );
        // Failed trigger leaves the cooldown alone
        assert_eq!(ability.current_cooldown(), 2);
    }

    #[test]
    fn test_cooldown_stays_in_bounds() {
        let mut ability = Ability::new(AbilityId::Fireball);
        let full = ability.spec().cooldown;
        for round in 0..50 {
            if ability.can_use() && round % 3 == 0 {
                ability.trigger().unwrap();
            } else {
                ability.tick();
            }
            assert!(ability.current_cooldown() <= full);
        }
        for _ in 0..10 {
            ability.tick();
        }
        assert_eq!(ability.current_cooldown(), 0);
    }

    #[test]
    fn test_attack_modifiers_clamp_probabilities() {
        let AbilityEffect::Attack(mods) = AbilityId::AimedShot.spec().effect else {
            panic!("Aimed Shot should be an attack");
        };
        // 1.0 accuracy * 1.2 must cap at 1.0
        let profile = mods.profile(WeaponId::BlessedBlade.weapon());
        assert_eq!(profile.accuracy, 1.0);
        assert_eq!(profile.crit_chance, 0.0);

        let dagger = mods.profile(WeaponId::Dagger.weapon());
        assert!(dagger.accuracy <= 1.0);
        assert!((dagger.crit_chance - 0.375).abs() < 1e-9);
    }

    #[test]
    fn test_catalog_invariants() {
        for id in AbilityId::ALL {
            let spec = id.spec();
            assert!(!spec.name.is_empty());
            if let AbilityEffect::Attack(mods) = spec.effect {
                assert!(mods.damage_multiplier > 0.0, "{}", spec.name);
            }
        }
    }
}
