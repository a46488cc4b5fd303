//! The player's hero: equipment, abilities, potions, energy and leveling.

use crate::abilities::{Ability, AbilityEffect, AbilityId};
use crate::combat::{resolve_attack, Mitigation, Resource, RuleViolation, Strike};
use crate::combatant::{Combatant, Vitals};
use crate::items::{
    Armor, ArmorId, Item, PotionKind, Weapon, WeaponId, BLOCK_POTION_BONUS, DAMAGE_POTION_BONUS,
    FISTS, HEALTH_POTION_HEALING,
};
use rand::Rng;
use std::collections::BTreeMap;
use std::fmt;

/// Energy pool of a freshly created hero.
pub const BASE_ENERGY: u32 = 10;
/// Experience needed per level: level N needs `N * EXPERIENCE_PER_LEVEL`.
pub const EXPERIENCE_PER_LEVEL: u32 = 10;
/// Maximum hit points gained on each level up.
pub const HP_PER_LEVEL: u32 = 5;
/// Hit points restored by resting, per hero level.
pub const REST_HEALING_PER_LEVEL: u32 = 5;

// ============================================================================
// Classes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeroClass {
    Warrior,
    Ranger,
    Mage,
}

/// Equipment and stats a class starts with.
#[derive(Debug, Clone)]
pub struct StartingKit {
    pub max_hp: u32,
    pub weapon: WeaponId,
    pub armor: ArmorId,
    pub abilities: &'static [AbilityId],
    pub potions: &'static [(PotionKind, u32)],
    pub gold: u32,
}

impl HeroClass {
    pub const ALL: [HeroClass; 3] = [HeroClass::Warrior, HeroClass::Ranger, HeroClass::Mage];

    pub fn name(&self) -> &'static str {
        match self {
            HeroClass::Warrior => "Warrior",
            HeroClass::Ranger => "Ranger",
            HeroClass::Mage => "Mage",
        }
    }

    pub fn from_name(name: &str) -> Option<HeroClass> {
        let name_lower = name.to_lowercase();
        HeroClass::ALL
            .iter()
            .copied()
            .find(|c| c.name().to_lowercase() == name_lower)
    }

    pub fn kit(&self) -> StartingKit {
        match self {
            HeroClass::Warrior => StartingKit {
                max_hp: 30,
                weapon: WeaponId::ShortSword,
                armor: ArmorId::Chainmail,
                abilities: &[AbilityId::PowerStrike, AbilityId::ShieldWall],
                potions: &[(PotionKind::HealthPotion, 2), (PotionKind::BlockPotion, 1)],
                gold: 20,
            },
            HeroClass::Ranger => StartingKit {
                max_hp: 25,
                weapon: WeaponId::HuntingBow,
                armor: ArmorId::LeatherArmor,
                abilities: &[AbilityId::AimedShot, AbilityId::Parry],
                potions: &[(PotionKind::HealthPotion, 2), (PotionKind::DamagePotion, 1)],
                gold: 25,
            },
            HeroClass::Mage => StartingKit {
                max_hp: 20,
                weapon: WeaponId::OakStaff,
                armor: ArmorId::ClothTunic,
                abilities: &[AbilityId::Fireball, AbilityId::Mend],
                potions: &[(PotionKind::HealthPotion, 3)],
                gold: 30,
            },
        }
    }
}

impl fmt::Display for HeroClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Action results
// ============================================================================

/// A temporary guard installed by a defend ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guard {
    pub block: u32,
    /// Monster attacks left before the guard drops.
    pub remaining: u32,
}

/// Result of the hero firing an ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityOutcome {
    Strike(Strike),
    Guarded { block: u32, duration: u32 },
    Healed(u32),
}

/// Result of drinking a potion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PotionEffect {
    Healed(u32),
    DamageBonus(u32),
    BlockBonus(u32),
}

/// Result of resting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestResult {
    pub healed: u32,
    pub energy_restored: u32,
}

/// How an incoming monster attack was absorbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blow {
    pub incoming: u32,
    pub potion_block: u32,
    pub guard_block: u32,
    pub mitigation: Mitigation,
    pub taken: u32,
}

// ============================================================================
// Hero
// ============================================================================

#[derive(Debug, Clone)]
pub struct Hero {
    pub(crate) name: String,
    pub(crate) class: HeroClass,
    pub(crate) vitals: Vitals,
    pub(crate) level: u32,
    pub(crate) experience: u32,
    pub(crate) gold: u32,
    pub(crate) weapon: Option<WeaponId>,
    pub(crate) armor: Option<ArmorId>,
    pub(crate) potion_bag: BTreeMap<PotionKind, u32>,
    pub(crate) potion_damage_bonus: u32,
    pub(crate) potion_block_bonus: u32,
    pub(crate) abilities: Vec<Ability>,
    pub(crate) energy: u32,
    pub(crate) max_energy: u32,
    pub(crate) guard: Option<Guard>,
}

impl Hero {
    /// Create a level 1 hero with the class starting kit.
    pub fn new(name: impl Into<String>, class: HeroClass) -> Self {
        let kit = class.kit();
        let mut potion_bag = BTreeMap::new();
        for (kind, count) in kit.potions {
            potion_bag.insert(*kind, *count);
        }

        Self {
            name: name.into(),
            class,
            vitals: Vitals::new(kit.max_hp),
            level: 1,
            experience: 0,
            gold: kit.gold,
            weapon: Some(kit.weapon),
            armor: Some(kit.armor),
            potion_bag,
            potion_damage_bonus: 0,
            potion_block_bonus: 0,
            abilities: kit.abilities.iter().copied().map(Ability::new).collect(),
            energy: BASE_ENERGY,
            max_energy: BASE_ENERGY,
            guard: None,
        }
    }

    /// Create a level 1 hero with no equipment, potions, gold or abilities.
    pub fn unequipped(name: impl Into<String>, class: HeroClass, max_hp: u32) -> Self {
        Self {
            name: name.into(),
            class,
            vitals: Vitals::new(max_hp),
            level: 1,
            experience: 0,
            gold: 0,
            weapon: None,
            armor: None,
            potion_bag: BTreeMap::new(),
            potion_damage_bonus: 0,
            potion_block_bonus: 0,
            abilities: Vec::new(),
            energy: BASE_ENERGY,
            max_energy: BASE_ENERGY,
            guard: None,
        }
    }

    pub fn class(&self) -> HeroClass {
        self.class
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    /// Experience needed to reach the next level.
    pub fn experience_to_next_level(&self) -> u32 {
        self.level.saturating_mul(EXPERIENCE_PER_LEVEL)
    }

    pub fn gold(&self) -> u32 {
        self.gold
    }

    pub fn energy(&self) -> u32 {
        self.energy
    }

    pub fn max_energy(&self) -> u32 {
        self.max_energy
    }

    pub fn potion_damage_bonus(&self) -> u32 {
        self.potion_damage_bonus
    }

    pub fn potion_block_bonus(&self) -> u32 {
        self.potion_block_bonus
    }

    pub fn guard(&self) -> Option<Guard> {
        self.guard
    }

    // ------------------------------------------------------------------------
    // Equipment
    // ------------------------------------------------------------------------

    pub fn weapon_id(&self) -> Option<WeaponId> {
        self.weapon
    }

    pub fn armor_id(&self) -> Option<ArmorId> {
        self.armor
    }

    /// The wielded weapon, or bare fists.
    pub fn weapon(&self) -> &'static Weapon {
        self.weapon.map(WeaponId::weapon).unwrap_or(&FISTS)
    }

    pub fn armor(&self) -> Option<&'static Armor> {
        self.armor.map(ArmorId::armor)
    }

    /// Equip a weapon, returning the one it replaced.
    pub fn equip_weapon(&mut self, weapon: WeaponId) -> Option<WeaponId> {
        self.weapon.replace(weapon)
    }

    /// Equip armor, returning the piece it replaced.
    pub fn equip_armor(&mut self, armor: ArmorId) -> Option<ArmorId> {
        self.armor.replace(armor)
    }

    // ------------------------------------------------------------------------
    // Abilities
    // ------------------------------------------------------------------------

    pub fn abilities(&self) -> &[Ability] {
        &self.abilities
    }

    pub fn ability(&self, id: AbilityId) -> Option<&Ability> {
        self.abilities.iter().find(|a| a.id() == id)
    }

    /// Learn an ability. Returns false if it was already known.
    pub fn learn_ability(&mut self, id: AbilityId) -> bool {
        if self.ability(id).is_some() {
            return false;
        }
        self.abilities.push(Ability::new(id));
        true
    }

    /// Fire an ability, gated on cooldown and energy.
    ///
    /// Nothing changes unless both checks pass. On success the energy cost
    /// is paid and the cooldown reset before the effect resolves.
    pub fn use_ability<R: Rng + ?Sized>(
        &mut self,
        id: AbilityId,
        rng: &mut R,
    ) -> Result<AbilityOutcome, RuleViolation> {
        let energy = self.energy;
        let weapon = self.weapon();
        let ability = self
            .abilities
            .iter_mut()
            .find(|a| a.id() == id)
            .ok_or(RuleViolation::InvalidAction {
                action: "use ability",
                reason: "the hero does not know that ability",
            })?;

        if !ability.can_use() {
            return Err(RuleViolation::InsufficientResource(Resource::Cooldown {
                ability: ability.name(),
                turns: ability.current_cooldown(),
            }));
        }

        let cost = ability.spec().energy_cost;
        if energy < cost {
            return Err(RuleViolation::InsufficientResource(Resource::Energy {
                required: cost,
                available: energy,
            }));
        }

        let effect = ability.trigger()?;
        self.energy -= cost;

        let outcome = match effect {
            AbilityEffect::Attack(modifiers) => {
                let strike = modifiers.strike(weapon, rng);
                AbilityOutcome::Strike(self.apply_damage_bonus(strike))
            }
            AbilityEffect::Defend {
                block_amount,
                duration,
            } => {
                self.guard = Some(Guard {
                    block: block_amount,
                    remaining: duration,
                });
                AbilityOutcome::Guarded {
                    block: block_amount,
                    duration,
                }
            }
            AbilityEffect::Utility { healing } => AbilityOutcome::Healed(self.heal(healing)),
        };

        Ok(outcome)
    }

    /// Tick every ability cooldown except the one fired this turn.
    pub fn end_turn(&mut self, used: Option<AbilityId>) {
        for ability in &mut self.abilities {
            if Some(ability.id()) != used {
                ability.tick();
            }
        }
    }

    // ------------------------------------------------------------------------
    // Combat
    // ------------------------------------------------------------------------

    /// A plain weapon attack. Monsters wear no armor, so this is only the
    /// strike half of an attack.
    pub fn strike<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Strike {
        let strike = resolve_attack(self.weapon(), None, 1.0, rng).strike;
        self.apply_damage_bonus(strike)
    }

    // The damage potion bonus is spent by the next strike, hit or miss.
    fn apply_damage_bonus(&mut self, mut strike: Strike) -> Strike {
        let bonus = std::mem::take(&mut self.potion_damage_bonus);
        if strike.hit {
            strike.damage += bonus;
        }
        strike
    }

    /// Absorb a monster attack: block potion, then guard, then armor.
    pub fn receive_blow<R: Rng + ?Sized>(&mut self, damage: u32, rng: &mut R) -> Blow {
        let potion_block = std::mem::take(&mut self.potion_block_bonus).min(damage);
        let mut remaining = damage - potion_block;

        let mut guard_block = 0;
        if let Some(mut guard) = self.guard.take() {
            guard_block = guard.block.min(remaining);
            remaining -= guard_block;
            guard.remaining = guard.remaining.saturating_sub(1);
            if guard.remaining > 0 {
                self.guard = Some(guard);
            }
        }

        let (remaining, mitigation) = match self.armor() {
            Some(armor) => armor.mitigate(remaining, rng),
            None => (remaining, Mitigation::None),
        };

        let taken = self.take_damage(remaining);
        Blow {
            incoming: damage,
            potion_block,
            guard_block,
            mitigation,
            taken,
        }
    }

    // ------------------------------------------------------------------------
    // Economy
    // ------------------------------------------------------------------------

    /// Add experience, leveling up as many times as it pays for.
    /// Returns the number of levels gained.
    pub fn gain_experience(&mut self, amount: u32) -> u32 {
        self.experience = self.experience.saturating_add(amount);
        let mut levels = 0;
        while self.experience >= self.experience_to_next_level() {
            self.experience -= self.experience_to_next_level();
            self.level = self.level.saturating_add(1);
            self.vitals.raise_maximum(HP_PER_LEVEL);
            levels += 1;
        }
        if levels > 0 {
            tracing::info!(hero = %self.name, level = self.level, "Hero leveled up");
        }
        levels
    }

    pub fn add_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Spend gold. Returns false (and spends nothing) if the purse is short.
    pub fn spend_gold(&mut self, amount: u32) -> bool {
        if self.gold < amount {
            return false;
        }
        self.gold -= amount;
        true
    }

    /// Refill energy and heal `5 * level` hit points.
    pub fn rest(&mut self) -> RestResult {
        let energy_restored = self.max_energy - self.energy;
        self.energy = self.max_energy;
        let healed = self.heal(self.level.saturating_mul(REST_HEALING_PER_LEVEL));
        RestResult {
            healed,
            energy_restored,
        }
    }

    /// Fully restore hit points and energy and drop any temporary effects.
    pub fn recover(&mut self) {
        self.vitals.refill();
        self.energy = self.max_energy;
        self.guard = None;
        for ability in &mut self.abilities {
            ability.reset_cooldown();
        }
    }

    // ------------------------------------------------------------------------
    // Potions
    // ------------------------------------------------------------------------

    pub fn potion_bag(&self) -> &BTreeMap<PotionKind, u32> {
        &self.potion_bag
    }

    pub fn potion_count(&self, kind: PotionKind) -> u32 {
        self.potion_bag.get(&kind).copied().unwrap_or(0)
    }

    pub fn add_potions(&mut self, kind: PotionKind, count: u32) {
        let entry = self.potion_bag.entry(kind).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    /// Drink a potion. An empty stack changes nothing.
    pub fn use_potion(&mut self, kind: PotionKind) -> Result<PotionEffect, RuleViolation> {
        let count = self.potion_count(kind);
        if count == 0 {
            return Err(RuleViolation::InsufficientResource(Resource::Potion(kind)));
        }
        self.potion_bag.insert(kind, count - 1);

        let effect = match kind {
            PotionKind::HealthPotion => PotionEffect::Healed(self.heal(HEALTH_POTION_HEALING)),
            PotionKind::DamagePotion => {
                self.potion_damage_bonus = DAMAGE_POTION_BONUS;
                PotionEffect::DamageBonus(DAMAGE_POTION_BONUS)
            }
            PotionKind::BlockPotion => {
                self.potion_block_bonus = BLOCK_POTION_BONUS;
                PotionEffect::BlockBonus(BLOCK_POTION_BONUS)
            }
        };
        Ok(effect)
    }

    /// Hand over a quest reward.
    pub fn grant(&mut self, item: Item) {
        match item {
            Item::Weapon(id) => {
                self.equip_weapon(id);
            }
            Item::Armor(id) => {
                self.equip_armor(id);
            }
            Item::Potion(kind, count) => self.add_potions(kind, count),
            Item::Gold(amount) => self.add_gold(amount),
        }
    }
}

impl Combatant for Hero {
    fn name(&self) -> &str {
        &self.name
    }

    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }
}
