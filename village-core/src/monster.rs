//! Monsters and the bestiary.

use crate::combatant::{Combatant, Vitals};
use std::fmt;

/// Stat block for a monster kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonsterStats {
    pub name: &'static str,
    pub max_hp: u32,
    pub damage: u32,
    pub gold: u32,
    /// Sprite tag handed to the renderer.
    pub image: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MonsterKind {
    Goblin,
    Wolf,
    Bandit,
    Skeleton,
    Orc,
    Troll,
}

impl MonsterKind {
    pub const ALL: [MonsterKind; 6] = [
        MonsterKind::Goblin,
        MonsterKind::Wolf,
        MonsterKind::Bandit,
        MonsterKind::Skeleton,
        MonsterKind::Orc,
        MonsterKind::Troll,
    ];

    pub fn stats(self) -> &'static MonsterStats {
        match self {
            MonsterKind::Goblin => &GOBLIN,
            MonsterKind::Wolf => &WOLF,
            MonsterKind::Bandit => &BANDIT,
            MonsterKind::Skeleton => &SKELETON,
            MonsterKind::Orc => &ORC,
            MonsterKind::Troll => &TROLL,
        }
    }

    pub fn name(self) -> &'static str {
        self.stats().name
    }

    pub fn from_name(name: &str) -> Option<MonsterKind> {
        let name_lower = name.to_lowercase();
        MonsterKind::ALL
            .iter()
            .copied()
            .find(|k| k.name().to_lowercase() == name_lower)
    }
}

impl fmt::Display for MonsterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

static GOBLIN: MonsterStats = MonsterStats {
    name: "Goblin",
    max_hp: 8,
    damage: 2,
    gold: 3,
    image: "goblin",
};
static WOLF: MonsterStats = MonsterStats {
    name: "Wolf",
    max_hp: 10,
    damage: 3,
    gold: 2,
    image: "wolf",
};
static BANDIT: MonsterStats = MonsterStats {
    name: "Bandit",
    max_hp: 12,
    damage: 3,
    gold: 6,
    image: "bandit",
};
static SKELETON: MonsterStats = MonsterStats {
    name: "Skeleton",
    max_hp: 14,
    damage: 4,
    gold: 4,
    image: "skeleton",
};
static ORC: MonsterStats = MonsterStats {
    name: "Orc",
    max_hp: 20,
    damage: 5,
    gold: 8,
    image: "orc",
};
static TROLL: MonsterStats = MonsterStats {
    name: "Troll",
    max_hp: 30,
    damage: 6,
    gold: 15,
    image: "troll",
};

/// A spawned monster. Only its hit points change after spawning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monster {
    pub(crate) kind: MonsterKind,
    pub(crate) vitals: Vitals,
    pub(crate) damage: u32,
    pub(crate) gold: u32,
    pub(crate) image: String,
}

impl Monster {
    pub fn spawn(kind: MonsterKind) -> Self {
        let stats = kind.stats();
        Self {
            kind,
            vitals: Vitals::new(stats.max_hp),
            damage: stats.damage,
            gold: stats.gold,
            image: stats.image.to_string(),
        }
    }

    /// A monster with custom stats, for scripted fights.
    pub fn custom(kind: MonsterKind, max_hp: u32, damage: u32, gold: u32) -> Self {
        Self {
            kind,
            vitals: Vitals::new(max_hp),
            damage,
            gold,
            image: kind.stats().image.to_string(),
        }
    }

    pub fn kind(&self) -> MonsterKind {
        self.kind
    }

    pub fn damage(&self) -> u32 {
        self.damage
    }

    pub fn gold(&self) -> u32 {
        self.gold
    }

    /// Experience awarded for the kill: `(max_hp + damage) / 2`.
    pub fn experience(&self) -> u32 {
        self.vitals.maximum().saturating_add(self.damage) / 2
    }

    pub fn image(&self) -> &str {
        &self.image
    }
}

impl Combatant for Monster {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }
}
