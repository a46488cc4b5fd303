//! Weapon, armor and potion catalog.
//!
//! Catalog entries are immutable statics addressed by `Copy` ids, so every
//! hero holding the same weapon shares one definition. Name lookups are
//! case insensitive and return `None` for unknown names; callers loading
//! saved data turn that into a hard error.

use crate::combat::{Mitigation, StrikeProfile};
use crate::dice;
use rand::Rng;
use std::fmt;

// ============================================================================
// Weapons
// ============================================================================

/// A weapon definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Weapon {
    pub name: &'static str,
    pub damage: u32,
    /// Probability in `[0, 1]` that an attack connects.
    pub accuracy: f64,
    /// Probability in `[0, 1]` that a connecting attack is critical.
    pub crit_chance: f64,
    /// Damage multiplier on critical hits, at least 1.
    pub crit_damage_multiplier: f64,
    pub price: u32,
}

impl Weapon {
    /// The base strike profile of this weapon.
    pub fn profile(&self) -> StrikeProfile {
        StrikeProfile {
            damage: self.damage,
            accuracy: self.accuracy,
            crit_chance: self.crit_chance,
            crit_damage_multiplier: self.crit_damage_multiplier,
        }
    }
}

/// Bare hands, used when a hero has nothing equipped.
pub static FISTS: Weapon = Weapon {
    name: "Fists",
    damage: 1,
    accuracy: 0.9,
    crit_chance: 0.0,
    crit_damage_multiplier: 1.0,
    price: 0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WeaponId {
    RustySword,
    ShortSword,
    Longsword,
    BattleAxe,
    Dagger,
    HuntingBow,
    Longbow,
    OakStaff,
    ArcaneStaff,
    BlessedBlade,
}

impl WeaponId {
    pub const ALL: [WeaponId; 10] = [
        WeaponId::RustySword,
        WeaponId::ShortSword,
        WeaponId::Longsword,
        WeaponId::BattleAxe,
        WeaponId::Dagger,
        WeaponId::HuntingBow,
        WeaponId::Longbow,
        WeaponId::OakStaff,
        WeaponId::ArcaneStaff,
        WeaponId::BlessedBlade,
    ];

    pub fn weapon(self) -> &'static Weapon {
        match self {
            WeaponId::RustySword => &RUSTY_SWORD,
            WeaponId::ShortSword => &SHORT_SWORD,
            WeaponId::Longsword => &LONGSWORD,
            WeaponId::BattleAxe => &BATTLE_AXE,
            WeaponId::Dagger => &DAGGER,
            WeaponId::HuntingBow => &HUNTING_BOW,
            WeaponId::Longbow => &LONGBOW,
            WeaponId::OakStaff => &OAK_STAFF,
            WeaponId::ArcaneStaff => &ARCANE_STAFF,
            WeaponId::BlessedBlade => &BLESSED_BLADE,
        }
    }

    pub fn name(self) -> &'static str {
        self.weapon().name
    }

    /// Look up a weapon by display name.
    pub fn from_name(name: &str) -> Option<WeaponId> {
        let name_lower = name.to_lowercase();
        WeaponId::ALL
            .iter()
            .copied()
            .find(|id| id.name().to_lowercase() == name_lower)
    }
}

impl fmt::Display for WeaponId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

static RUSTY_SWORD: Weapon = Weapon {
    name: "Rusty Sword",
    damage: 4,
    accuracy: 0.85,
    crit_chance: 0.05,
    crit_damage_multiplier: 1.5,
    price: 10,
};
static SHORT_SWORD: Weapon = Weapon {
    name: "Short Sword",
    damage: 5,
    accuracy: 0.9,
    crit_chance: 0.1,
    crit_damage_multiplier: 1.5,
    price: 25,
};
static LONGSWORD: Weapon = Weapon {
    name: "Longsword",
    damage: 7,
    accuracy: 0.85,
    crit_chance: 0.1,
    crit_damage_multiplier: 2.0,
    price: 60,
};
static BATTLE_AXE: Weapon = Weapon {
    name: "Battle Axe",
    damage: 9,
    accuracy: 0.75,
    crit_chance: 0.15,
    crit_damage_multiplier: 2.0,
    price: 90,
};
static DAGGER: Weapon = Weapon {
    name: "Dagger",
    damage: 3,
    accuracy: 0.95,
    crit_chance: 0.25,
    crit_damage_multiplier: 2.0,
    price: 20,
};
static HUNTING_BOW: Weapon = Weapon {
    name: "Hunting Bow",
    damage: 5,
    accuracy: 0.8,
    crit_chance: 0.2,
    crit_damage_multiplier: 1.75,
    price: 40,
};
static LONGBOW: Weapon = Weapon {
    name: "Longbow",
    damage: 8,
    accuracy: 0.8,
    crit_chance: 0.2,
    crit_damage_multiplier: 2.0,
    price: 85,
};
static OAK_STAFF: Weapon = Weapon {
    name: "Oak Staff",
    damage: 4,
    accuracy: 0.9,
    crit_chance: 0.05,
    crit_damage_multiplier: 1.5,
    price: 15,
};
static ARCANE_STAFF: Weapon = Weapon {
    name: "Arcane Staff",
    damage: 6,
    accuracy: 0.9,
    crit_chance: 0.15,
    crit_damage_multiplier: 2.0,
    price: 80,
};
// Never misses and never crits: damage is exactly `damage`.
static BLESSED_BLADE: Weapon = Weapon {
    name: "Blessed Blade",
    damage: 8,
    accuracy: 1.0,
    crit_chance: 0.0,
    crit_damage_multiplier: 1.0,
    price: 150,
};

// ============================================================================
// Armor
// ============================================================================

/// An armor definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Armor {
    pub name: &'static str,
    /// Flat reduction applied on a successful block.
    pub block: u32,
    pub block_chance: f64,
    pub dodge_chance: f64,
    pub price: u32,
}

impl Armor {
    /// Roll dodge, then block, against an incoming hit.
    ///
    /// A dodge zeroes the damage. Otherwise a block subtracts `block`
    /// (never below zero). Returns the damage left over.
    pub fn mitigate<R: Rng + ?Sized>(&self, damage: u32, rng: &mut R) -> (u32, Mitigation) {
        if dice::chance(rng, self.dodge_chance) {
            return (0, Mitigation::Dodged);
        }
        if dice::chance(rng, self.block_chance) {
            let absorbed = damage.min(self.block);
            return (damage - absorbed, Mitigation::Blocked { absorbed });
        }
        (damage, Mitigation::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArmorId {
    ClothTunic,
    LeatherArmor,
    Chainmail,
    PlateArmor,
    ShadowCloak,
    IronBulwark,
}

impl ArmorId {
    pub const ALL: [ArmorId; 6] = [
        ArmorId::ClothTunic,
        ArmorId::LeatherArmor,
        ArmorId::Chainmail,
        ArmorId::PlateArmor,
        ArmorId::ShadowCloak,
        ArmorId::IronBulwark,
    ];

    pub fn armor(self) -> &'static Armor {
        match self {
            ArmorId::ClothTunic => &CLOTH_TUNIC,
            ArmorId::LeatherArmor => &LEATHER_ARMOR,
            ArmorId::Chainmail => &CHAINMAIL,
            ArmorId::PlateArmor => &PLATE_ARMOR,
            ArmorId::ShadowCloak => &SHADOW_CLOAK,
            ArmorId::IronBulwark => &IRON_BULWARK,
        }
    }

    pub fn name(self) -> &'static str {
        self.armor().name
    }

    /// Look up an armor piece by display name.
    pub fn from_name(name: &str) -> Option<ArmorId> {
        let name_lower = name.to_lowercase();
        ArmorId::ALL
            .iter()
            .copied()
            .find(|id| id.name().to_lowercase() == name_lower)
    }
}

impl fmt::Display for ArmorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

static CLOTH_TUNIC: Armor = Armor {
    name: "Cloth Tunic",
    block: 0,
    block_chance: 0.0,
    dodge_chance: 0.05,
    price: 5,
};
static LEATHER_ARMOR: Armor = Armor {
    name: "Leather Armor",
    block: 1,
    block_chance: 0.3,
    dodge_chance: 0.15,
    price: 30,
};
static CHAINMAIL: Armor = Armor {
    name: "Chainmail",
    block: 2,
    block_chance: 0.5,
    dodge_chance: 0.05,
    price: 70,
};
static PLATE_ARMOR: Armor = Armor {
    name: "Plate Armor",
    block: 4,
    block_chance: 0.6,
    dodge_chance: 0.0,
    price: 150,
};
static SHADOW_CLOAK: Armor = Armor {
    name: "Shadow Cloak",
    block: 0,
    block_chance: 0.0,
    dodge_chance: 0.3,
    price: 90,
};
// Always blocks, never dodges.
static IRON_BULWARK: Armor = Armor {
    name: "Iron Bulwark",
    block: 2,
    block_chance: 1.0,
    dodge_chance: 0.0,
    price: 120,
};

// ============================================================================
// Potions
// ============================================================================

/// Hit points restored by a health potion.
pub const HEALTH_POTION_HEALING: u32 = 5;
/// One-shot damage bonus granted by a damage potion.
pub const DAMAGE_POTION_BONUS: u32 = 3;
/// One-shot block bonus granted by a block potion.
pub const BLOCK_POTION_BONUS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PotionKind {
    HealthPotion,
    DamagePotion,
    BlockPotion,
}

impl PotionKind {
    pub const ALL: [PotionKind; 3] = [
        PotionKind::HealthPotion,
        PotionKind::DamagePotion,
        PotionKind::BlockPotion,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PotionKind::HealthPotion => "Health Potion",
            PotionKind::DamagePotion => "Damage Potion",
            PotionKind::BlockPotion => "Block Potion",
        }
    }

    pub fn price(self) -> u32 {
        match self {
            PotionKind::HealthPotion => 10,
            PotionKind::DamagePotion => 15,
            PotionKind::BlockPotion => 15,
        }
    }

    pub fn from_name(name: &str) -> Option<PotionKind> {
        let name_lower = name.to_lowercase();
        PotionKind::ALL
            .iter()
            .copied()
            .find(|p| p.name().to_lowercase() == name_lower)
    }
}

impl fmt::Display for PotionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Rewards
// ============================================================================

/// Something a quest can hand to the hero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item {
    Weapon(WeaponId),
    Armor(ArmorId),
    Potion(PotionKind, u32),
    Gold(u32),
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Weapon(id) => write!(f, "{id}"),
            Item::Armor(id) => write!(f, "{id}"),
            Item::Potion(kind, 1) => write!(f, "{kind}"),
            Item::Potion(kind, count) => write!(f, "{count} x {kind}"),
            Item::Gold(amount) => write!(f, "{amount} gold"),
        }
    }
}
