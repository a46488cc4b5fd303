//! Save files.
//!
//! Heroes, monsters and the quest board are stored as flat records that
//! refer to catalog entries by name. Names are resolved on load, and a name
//! missing from the catalog fails the whole load.

use crate::abilities::{Ability, AbilityId};
use crate::combatant::{Combatant, Vitals};
use crate::hero::{Hero, HeroClass, BASE_ENERGY};
use crate::items::{ArmorId, PotionKind, WeaponId};
use crate::monster::{Monster, MonsterKind};
use crate::quest::{quest_template, Quest, QuestBoard};
use crate::village::Village;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use thiserror::Error;
use tokio::fs;
use uuid::Uuid;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Unknown {kind} in save data: {name}")]
    MissingCatalogEntry { kind: &'static str, name: String },

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// Current save file version.
const SAVE_VERSION: u32 = 1;

fn default_energy() -> u32 {
    BASE_ENERGY
}

fn missing(kind: &'static str, name: &str) -> PersistError {
    PersistError::MissingCatalogEntry {
        kind,
        name: name.to_string(),
    }
}

// ============================================================================
// Hero
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroRecord {
    pub name: String,
    pub class: String,
    pub current_hp: u32,
    pub max_hp: u32,
    pub level: u32,
    pub experience: u32,
    pub gold: u32,
    #[serde(default)]
    pub weapon: Option<String>,
    #[serde(default)]
    pub armor: Option<String>,
    #[serde(default)]
    pub potion_bag: BTreeMap<String, u32>,
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default = "default_energy")]
    pub energy: u32,
    #[serde(default = "default_energy")]
    pub max_energy: u32,
}

impl Hero {
    /// Flatten the hero. Cooldowns, guards and potion bonuses are battle
    /// state and are not kept.
    pub fn to_record(&self) -> HeroRecord {
        HeroRecord {
            name: self.name().to_string(),
            class: self.class.name().to_string(),
            current_hp: self.current_hp(),
            max_hp: self.max_hp(),
            level: self.level,
            experience: self.experience,
            gold: self.gold,
            weapon: self.weapon.map(|w| w.name().to_string()),
            armor: self.armor.map(|a| a.name().to_string()),
            potion_bag: self
                .potion_bag
                .iter()
                .map(|(kind, count)| (kind.name().to_string(), *count))
                .collect(),
            abilities: self
                .abilities
                .iter()
                .map(|a| a.name().to_string())
                .collect(),
            energy: self.energy,
            max_energy: self.max_energy,
        }
    }

    pub fn from_record(record: &HeroRecord) -> Result<Self, PersistError> {
        let class =
            HeroClass::from_name(&record.class).ok_or_else(|| missing("class", &record.class))?;
        if record.level == 0 {
            return Err(PersistError::InvalidRecord(format!(
                "{} has level 0",
                record.name
            )));
        }

        let weapon = record
            .weapon
            .as_deref()
            .map(|name| WeaponId::from_name(name).ok_or_else(|| missing("weapon", name)))
            .transpose()?;
        let armor = record
            .armor
            .as_deref()
            .map(|name| ArmorId::from_name(name).ok_or_else(|| missing("armor", name)))
            .transpose()?;

        let mut potion_bag = BTreeMap::new();
        for (name, count) in &record.potion_bag {
            let kind = PotionKind::from_name(name).ok_or_else(|| missing("potion", name))?;
            potion_bag.insert(kind, *count);
        }

        let abilities = record
            .abilities
            .iter()
            .map(|name| {
                AbilityId::from_name(name)
                    .map(Ability::new)
                    .ok_or_else(|| missing("ability", name))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut hero = Self {
            name: record.name.clone(),
            class,
            vitals: Vitals::restore(record.current_hp, record.max_hp),
            level: record.level,
            experience: 0,
            gold: record.gold,
            weapon,
            armor,
            potion_bag,
            potion_damage_bonus: 0,
            potion_block_bonus: 0,
            abilities,
            energy: record.energy.min(record.max_energy),
            max_energy: record.max_energy,
            guard: None,
        };
        // Stored experience past the level threshold is applied as level ups
        hero.gain_experience(record.experience);
        Ok(hero)
    }
}

// ============================================================================
// Monster
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterRecord {
    pub name: String,
    pub current_hp: u32,
    pub max_hp: u32,
    pub damage: u32,
    pub gold: u32,
    #[serde(default)]
    pub image: String,
}

impl Monster {
    pub fn to_record(&self) -> MonsterRecord {
        MonsterRecord {
            name: self.name().to_string(),
            current_hp: self.current_hp(),
            max_hp: self.max_hp(),
            damage: self.damage,
            gold: self.gold,
            image: self.image.clone(),
        }
    }

    pub fn from_record(record: &MonsterRecord) -> Result<Self, PersistError> {
        let kind =
            MonsterKind::from_name(&record.name).ok_or_else(|| missing("monster", &record.name))?;
        let image = if record.image.is_empty() {
            kind.stats().image.to_string()
        } else {
            record.image.clone()
        };
        Ok(Self {
            kind,
            vitals: Vitals::restore(record.current_hp, record.max_hp),
            damage: record.damage,
            gold: record.gold,
            image,
        })
    }
}

// ============================================================================
// Quest board
// ============================================================================

/// An available quest and its progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestRecord {
    pub name: String,
    #[serde(default)]
    pub monsters_slain: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestBoardRecord {
    pub available: Vec<QuestRecord>,
    #[serde(default)]
    pub completed: Vec<String>,
    #[serde(default)]
    pub failed: Vec<String>,
}

impl QuestBoard {
    pub fn to_record(&self) -> QuestBoardRecord {
        QuestBoardRecord {
            available: self
                .available
                .iter()
                .map(|quest| QuestRecord {
                    name: quest.name().to_string(),
                    monsters_slain: quest
                        .monsters_slain()
                        .iter()
                        .map(|(kind, count)| (kind.name().to_string(), *count))
                        .collect(),
                })
                .collect(),
            completed: self.completed.iter().map(|q| q.name().to_string()).collect(),
            failed: self.failed.iter().map(|q| q.name().to_string()).collect(),
        }
    }

    /// Rebuild the board. A quest may appear in only one list, once.
    pub fn from_record(record: &QuestBoardRecord) -> Result<Self, PersistError> {
        let mut seen = HashSet::new();
        let mut resolve = |name: &str| -> Result<Quest, PersistError> {
            let quest = template(name)?;
            if !seen.insert(quest.name().to_string()) {
                return Err(PersistError::InvalidRecord(format!(
                    "quest {} is listed more than once",
                    quest.name()
                )));
            }
            Ok(quest)
        };

        let mut available = Vec::with_capacity(record.available.len());
        for entry in &record.available {
            let mut quest = resolve(entry.name.as_str())?;
            for (name, count) in &entry.monsters_slain {
                let kind = MonsterKind::from_name(name).ok_or_else(|| missing("monster", name))?;
                quest.restore_tally(kind, *count);
            }
            available.push(quest);
        }

        let mut completed = Vec::with_capacity(record.completed.len());
        for name in &record.completed {
            let mut quest = resolve(name.as_str())?;
            let requirements: Vec<_> = quest.requirements().iter().map(|(k, n)| (*k, *n)).collect();
            for (kind, required) in requirements {
                quest.restore_tally(kind, required);
            }
            completed.push(quest);
        }

        let failed = record
            .failed
            .iter()
            .map(|name| resolve(name.as_str()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            available,
            completed,
            failed,
        })
    }
}

fn template(name: &str) -> Result<Quest, PersistError> {
    quest_template(name)
        .map(Quest::reset)
        .ok_or_else(|| missing("quest", name))
}

// ============================================================================
// Save file
// ============================================================================

/// A saved playthrough.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveGame {
    /// Save format version for compatibility checking.
    pub version: u32,

    /// When the save was created.
    pub saved_at: String,

    /// Identifies the playthrough across saves.
    pub session_id: Uuid,

    pub hero: HeroRecord,

    pub village: Village,

    pub quests: QuestBoardRecord,
}

impl SaveGame {
    pub fn new(session_id: Uuid, hero: &Hero, village: &Village, quests: &QuestBoard) -> Self {
        Self {
            version: SAVE_VERSION,
            saved_at: timestamp_now(),
            session_id,
            hero: hero.to_record(),
            village: village.clone(),
            quests: quests.to_record(),
        }
    }

    /// Save to a JSON file, creating the parent directory if needed.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        tracing::info!(path = %path.display(), session = %self.session_id, "Game saved");
        Ok(())
    }

    /// Load from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        let saved: Self = serde_json::from_str(&content)?;

        if saved.version != SAVE_VERSION {
            tracing::warn!(path = %path.display(), found = saved.version, "Save version mismatch");
            return Err(PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: saved.version,
            });
        }

        Ok(saved)
    }

    /// Resolve the records back into live game state.
    pub fn restore(&self) -> Result<(Hero, Village, QuestBoard), PersistError> {
        let hero = Hero::from_record(&self.hero)?;
        let quests = QuestBoard::from_record(&self.quests)?;
        if self.village.health > self.village.max_health {
            return Err(PersistError::InvalidRecord(format!(
                "village health {} exceeds maximum {}",
                self.village.health, self.village.max_health
            )));
        }
        Ok((hero, self.village.clone(), quests))
    }
}

/// Seconds since the Unix epoch, as a string.
fn timestamp_now() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}", now.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::Item;

    #[test]
    fn test_hero_record_fields() {
        let hero = Hero::new("Aldric", HeroClass::Warrior);
        let record = hero.to_record();
        assert_eq!(record.class, "Warrior");
        assert_eq!(record.weapon.as_deref(), Some("Short Sword"));
        assert_eq!(record.armor.as_deref(), Some("Chainmail"));
        assert_eq!(record.potion_bag.get("Health Potion"), Some(&2));
        assert_eq!(record.abilities, vec!["Power Strike", "Shield Wall"]);
    }

    #[test]
    fn test_hero_round_trip() {
        let mut hero = Hero::new("Aldric", HeroClass::Ranger);
        hero.take_damage(7);
        hero.gain_experience(14);
        hero.grant(Item::Weapon(WeaponId::Longbow));

        let restored = Hero::from_record(&hero.to_record()).unwrap();
        assert_eq!(restored.to_record(), hero.to_record());
        assert_eq!(restored.level(), 2);
        assert_eq!(restored.weapon_id(), Some(WeaponId::Longbow));
    }

    #[test]
    fn test_energy_defaults_when_missing() {
        let json = r#"{
            "name": "Old Save",
            "class": "Mage",
            "current_hp": 12,
            "max_hp": 20,
            "level": 1,
            "experience": 3,
            "gold": 5
        }"#;
        let record: HeroRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.energy, 10);
        assert_eq!(record.max_energy, 10);

        let hero = Hero::from_record(&record).unwrap();
        assert!(hero.weapon_id().is_none());
        assert_eq!(hero.weapon().name, "Fists");
        assert_eq!(hero.current_hp(), 12);
    }

    #[test]
    fn test_unknown_weapon_fails_load() {
        let mut record = Hero::new("Aldric", HeroClass::Warrior).to_record();
        record.weapon = Some("Excalibur".to_string());
        match Hero::from_record(&record) {
            Err(PersistError::MissingCatalogEntry { kind, name }) => {
                assert_eq!(kind, "weapon");
                assert_eq!(name, "Excalibur");
            }
            other => panic!("expected MissingCatalogEntry, got {other:?}"),
        }
    }

    #[test]
    fn test_excess_experience_levels_up_on_load() {
        let mut record = Hero::new("Aldric", HeroClass::Warrior).to_record();
        record.experience = 65;

        let hero = Hero::from_record(&record).unwrap();
        assert_eq!(hero.level(), 4);
        assert_eq!(hero.experience(), 5);
        assert!(hero.experience() < hero.experience_to_next_level());
        assert_eq!(hero.max_hp(), 45);
    }

    #[test]
    fn test_huge_level_loads_without_overflow() {
        let mut record = Hero::new("Aldric", HeroClass::Warrior).to_record();
        record.level = 4_000_000_000;
        record.current_hp = 1;

        let mut hero = Hero::from_record(&record).unwrap();
        assert_eq!(hero.rest().healed, 29);
        assert_eq!(hero.level(), 4_000_000_000);
    }

    #[test]
    fn test_duplicate_quest_fails_load() {
        let mut record = QuestBoard::new_playthrough().to_record();
        record.failed.push("goblin trouble".to_string());
        assert!(matches!(
            QuestBoard::from_record(&record),
            Err(PersistError::InvalidRecord(_))
        ));

        let mut record = QuestBoard::new_playthrough().to_record();
        record.completed = vec!["Troll Bridge".to_string(), "Troll Bridge".to_string()];
        record.available.retain(|q| q.name != "Troll Bridge");
        assert!(matches!(
            QuestBoard::from_record(&record),
            Err(PersistError::InvalidRecord(_))
        ));
    }

    #[test]
    fn test_unknown_ability_fails_load() {
        let mut record = Hero::new("Aldric", HeroClass::Warrior).to_record();
        record.abilities.push("Meteor".to_string());
        assert!(matches!(
            Hero::from_record(&record),
            Err(PersistError::MissingCatalogEntry { kind: "ability", .. })
        ));
    }

    #[test]
    fn test_monster_round_trip() {
        let mut wolf = Monster::spawn(MonsterKind::Wolf);
        wolf.take_damage(4);
        let record = wolf.to_record();
        assert_eq!(record.name, "Wolf");
        assert_eq!(record.image, "wolf");
        assert_eq!(Monster::from_record(&record).unwrap(), wolf);
    }

    #[test]
    fn test_quest_board_round_trip() {
        let mut board = QuestBoard::new_playthrough();
        let mut village = Village::new(100, 50);
        board
            .available_mut("Goblin Trouble")
            .unwrap()
            .slay_monster(&Monster::spawn(MonsterKind::Goblin));
        board.fail("Bandit Camp", &mut village).unwrap();

        let restored = QuestBoard::from_record(&board.to_record()).unwrap();
        assert_eq!(restored, board);
    }
}
