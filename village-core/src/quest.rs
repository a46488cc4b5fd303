//! Quests, the quest catalog, and the available/completed/failed board.

use crate::combatant::Combatant;
use crate::dice;
use crate::hero::Hero;
use crate::items::{ArmorId, Item, PotionKind, WeaponId};
use crate::monster::{Monster, MonsterKind};
use crate::village::{Penalty, Village};
use rand::Rng;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestError {
    #[error("Unknown quest: {0}")]
    UnknownQuest(String),

    #[error("Quest is not available: {0}")]
    NotAvailable(String),

    #[error("Quest requirements are not met: {0}")]
    Incomplete(String),

    #[error("The encounter is still in progress")]
    EncounterUnfinished,
}

/// A named set of monster-kill requirements with a reward and a penalty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quest {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) monster_requirements: BTreeMap<MonsterKind, u32>,
    pub(crate) monsters_slain: BTreeMap<MonsterKind, u32>,
    pub(crate) reward: Item,
    pub(crate) penalty: Penalty,
}

impl Quest {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        requirements: &[(MonsterKind, u32)],
        reward: Item,
        penalty: Penalty,
    ) -> Self {
        let monster_requirements: BTreeMap<_, _> = requirements.iter().copied().collect();
        let monsters_slain = monster_requirements.keys().map(|k| (*k, 0)).collect();
        Self {
            name: name.into(),
            description: description.into(),
            monster_requirements,
            monsters_slain,
            reward,
            penalty,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn requirements(&self) -> &BTreeMap<MonsterKind, u32> {
        &self.monster_requirements
    }

    pub fn monsters_slain(&self) -> &BTreeMap<MonsterKind, u32> {
        &self.monsters_slain
    }

    pub fn slain(&self, kind: MonsterKind) -> u32 {
        self.monsters_slain.get(&kind).copied().unwrap_or(0)
    }

    pub fn reward(&self) -> &Item {
        &self.reward
    }

    pub fn penalty(&self) -> &Penalty {
        &self.penalty
    }

    /// Kinds that still need killing, in catalog order.
    pub fn remaining_kinds(&self) -> Vec<MonsterKind> {
        self.monster_requirements
            .iter()
            .filter(|(kind, required)| self.slain(**kind) < **required)
            .map(|(kind, _)| *kind)
            .collect()
    }

    /// Spawn a monster of a kind that still has a deficit, chosen uniformly.
    /// `None` once every requirement is met.
    pub fn get_monster<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Monster> {
        let remaining = self.remaining_kinds();
        dice::pick(rng, &remaining).map(|kind| Monster::spawn(*kind))
    }

    /// Count a kill. Untracked kinds and kills past the requirement are
    /// ignored. Returns whether the tally changed.
    pub fn slay_monster(&mut self, monster: &Monster) -> bool {
        let kind = monster.kind();
        let Some(required) = self.monster_requirements.get(&kind).copied() else {
            tracing::debug!(quest = %self.name, monster = monster.name(), "Kill not tracked");
            return false;
        };
        let slain = self.monsters_slain.entry(kind).or_insert(0);
        if *slain >= required {
            return false;
        }
        *slain += 1;
        true
    }

    pub fn is_complete(&self) -> bool {
        self.monster_requirements
            .iter()
            .all(|(kind, required)| self.slain(*kind) >= *required)
    }

    /// Fresh copy with every tally at zero.
    pub fn reset(&self) -> Self {
        let mut quest = self.clone();
        for slain in quest.monsters_slain.values_mut() {
            *slain = 0;
        }
        quest
    }

    pub(crate) fn restore_tally(&mut self, kind: MonsterKind, count: u32) {
        if let Some(required) = self.monster_requirements.get(&kind) {
            self.monsters_slain.insert(kind, count.min(*required));
        }
    }
}

lazy_static::lazy_static! {
    /// Every quest a playthrough starts with.
    pub static ref QUESTS: Vec<Quest> = vec![
        Quest::new(
            "Goblin Trouble",
            "Goblins have been raiding the grain stores. Drive them off.",
            &[(MonsterKind::Goblin, 3)],
            Item::Potion(PotionKind::HealthPotion, 2),
            Penalty::health(10),
        ),
        Quest::new(
            "Wolves at the Gate",
            "A pack is circling the village at night.",
            &[(MonsterKind::Wolf, 3), (MonsterKind::Goblin, 1)],
            Item::Armor(ArmorId::LeatherArmor),
            Penalty::health(10),
        ),
        Quest::new(
            "Bandit Camp",
            "Bandits are robbing the supply wagons on the east road.",
            &[(MonsterKind::Bandit, 3)],
            Item::Gold(40),
            Penalty::supplies(15),
        ),
        Quest::new(
            "Restless Dead",
            "Something stirs in the old graveyard.",
            &[(MonsterKind::Skeleton, 4)],
            Item::Weapon(WeaponId::BlessedBlade),
            Penalty::health(15),
        ),
        Quest::new(
            "Orc Warband",
            "An orc warband and its goblin scouts march on the village.",
            &[(MonsterKind::Orc, 2), (MonsterKind::Goblin, 2)],
            Item::Armor(ArmorId::Chainmail),
            Penalty::health(20),
        ),
        Quest::new(
            "Troll Bridge",
            "A troll has claimed the only bridge to the market town.",
            &[(MonsterKind::Troll, 1)],
            Item::Weapon(WeaponId::BattleAxe),
            Penalty::supplies(20),
        ),
    ];
}

/// Look up a catalog quest by name (case-insensitive).
pub fn quest_template(name: &str) -> Option<&'static Quest> {
    let name_lower = name.to_lowercase();
    QUESTS.iter().find(|q| q.name.to_lowercase() == name_lower)
}

// ============================================================================
// Quest board
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestStatus {
    Available,
    Completed,
    Failed,
}

/// How a quest left the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestResolution {
    Completed { quest: String, reward: Item },
    Failed { quest: String, penalty: Penalty },
}

/// The three quest lists of a playthrough. Quests only ever move out of
/// `available`, and each moves exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestBoard {
    pub(crate) available: Vec<Quest>,
    pub(crate) completed: Vec<Quest>,
    pub(crate) failed: Vec<Quest>,
}

impl QuestBoard {
    pub fn new(quests: Vec<Quest>) -> Self {
        Self {
            available: quests,
            completed: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Every catalog quest, tallies zeroed.
    pub fn new_playthrough() -> Self {
        Self::new(QUESTS.iter().map(Quest::reset).collect())
    }

    pub fn available(&self) -> &[Quest] {
        &self.available
    }

    pub fn completed(&self) -> &[Quest] {
        &self.completed
    }

    pub fn failed(&self) -> &[Quest] {
        &self.failed
    }

    pub fn status(&self, name: &str) -> Option<QuestStatus> {
        if find(&self.available, name).is_some() {
            Some(QuestStatus::Available)
        } else if find(&self.completed, name).is_some() {
            Some(QuestStatus::Completed)
        } else if find(&self.failed, name).is_some() {
            Some(QuestStatus::Failed)
        } else {
            None
        }
    }

    pub fn available_mut(&mut self, name: &str) -> Result<&mut Quest, QuestError> {
        match find(&self.available, name) {
            Some(index) => Ok(&mut self.available[index]),
            None => Err(self.missing(name)),
        }
    }

    /// Move a finished quest to `completed` and hand its reward to the hero.
    pub fn complete(&mut self, name: &str, hero: &mut Hero) -> Result<QuestResolution, QuestError> {
        let index = find(&self.available, name).ok_or_else(|| self.missing(name))?;
        if !self.available[index].is_complete() {
            return Err(QuestError::Incomplete(name.to_string()));
        }

        let quest = self.available.remove(index);
        let reward = quest.reward;
        hero.grant(reward);
        tracing::info!(quest = %quest.name, %reward, "Quest completed");

        let resolution = QuestResolution::Completed {
            quest: quest.name.clone(),
            reward,
        };
        self.completed.push(quest);
        Ok(resolution)
    }

    /// Move a quest to `failed` and apply its penalty to the village.
    pub fn fail(&mut self, name: &str, village: &mut Village) -> Result<QuestResolution, QuestError> {
        let index = find(&self.available, name).ok_or_else(|| self.missing(name))?;

        let quest = self.available.remove(index);
        let penalty = quest.penalty;
        village.apply_penalty(&penalty);
        tracing::info!(quest = %quest.name, ?penalty, "Quest failed");

        let resolution = QuestResolution::Failed {
            quest: quest.name.clone(),
            penalty,
        };
        self.failed.push(quest);
        Ok(resolution)
    }

    fn missing(&self, name: &str) -> QuestError {
        if self.status(name).is_some() {
            QuestError::NotAvailable(name.to_string())
        } else {
            QuestError::UnknownQuest(name.to_string())
        }
    }
}

fn find(quests: &[Quest], name: &str) -> Option<usize> {
    let name_lower = name.to_lowercase();
    quests.iter().position(|q| q.name.to_lowercase() == name_lower)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hero::HeroClass;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn goblin_quest(count: u32) -> Quest {
        Quest::new(
            "Goblin Hunt",
            "Test quest",
            &[(MonsterKind::Goblin, count)],
            Item::Gold(10),
            Penalty::health(10),
        )
    }

    #[test]
    fn test_kills_clamp_at_requirement() {
        let mut quest = goblin_quest(2);
        let goblin = Monster::spawn(MonsterKind::Goblin);

        assert!(quest.slay_monster(&goblin));
        assert!(!quest.is_complete());
        assert!(quest.slay_monster(&goblin));
        assert!(quest.is_complete());

        assert!(!quest.slay_monster(&goblin));
        assert_eq!(quest.slain(MonsterKind::Goblin), 2);
    }

    #[test]
    fn test_untracked_kill_ignored() {
        let mut quest = goblin_quest(1);
        assert!(!quest.slay_monster(&Monster::spawn(MonsterKind::Troll)));
        assert!(!quest.monsters_slain().contains_key(&MonsterKind::Troll));
    }

    #[test]
    fn test_is_complete_requires_every_kind() {
        let mut quest = quest_template("Wolves at the Gate").unwrap().reset();
        for _ in 0..3 {
            quest.slay_monster(&Monster::spawn(MonsterKind::Wolf));
        }
        assert!(!quest.is_complete());
        quest.slay_monster(&Monster::spawn(MonsterKind::Goblin));
        assert!(quest.is_complete());
    }

    #[test]
    fn test_get_monster_only_from_deficit() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut quest = quest_template("Orc Warband").unwrap().reset();
        quest.slay_monster(&Monster::spawn(MonsterKind::Orc));
        quest.slay_monster(&Monster::spawn(MonsterKind::Orc));

        for _ in 0..100 {
            let monster = quest.get_monster(&mut rng).unwrap();
            assert_eq!(monster.kind(), MonsterKind::Goblin);
        }

        quest.slay_monster(&Monster::spawn(MonsterKind::Goblin));
        quest.slay_monster(&Monster::spawn(MonsterKind::Goblin));
        assert!(quest.get_monster(&mut rng).is_none());
    }

    #[test]
    fn test_get_monster_is_uniform() {
        let mut rng = StdRng::seed_from_u64(6);
        let quest = quest_template("Orc Warband").unwrap().reset();
        let trials = 10_000;
        let orcs = (0..trials)
            .filter(|_| quest.get_monster(&mut rng).map(|m| m.kind()) == Some(MonsterKind::Orc))
            .count();
        let observed = orcs as f64 / trials as f64;
        assert!((observed - 0.5).abs() < 0.03, "observed orc rate {observed}");
    }

    #[test]
    fn test_catalog_starts_empty() {
        for quest in QUESTS.iter() {
            assert!(!quest.requirements().is_empty());
            assert!(quest.monsters_slain().values().all(|v| *v == 0));
        }
    }

    #[test]
    fn test_complete_moves_and_rewards() {
        let mut board = QuestBoard::new(vec![goblin_quest(1)]);
        let mut hero = Hero::new("Aldric", HeroClass::Warrior);

        assert_eq!(
            board.complete("Goblin Hunt", &mut hero),
            Err(QuestError::Incomplete("Goblin Hunt".to_string()))
        );

        board
            .available_mut("Goblin Hunt")
            .unwrap()
            .slay_monster(&Monster::spawn(MonsterKind::Goblin));
        let resolution = board.complete("goblin hunt", &mut hero).unwrap();
        assert!(matches!(resolution, QuestResolution::Completed { .. }));
        assert_eq!(hero.gold(), 30);
        assert_eq!(board.status("Goblin Hunt"), Some(QuestStatus::Completed));
        assert!(board.available().is_empty());
    }

    #[test]
    fn test_fail_applies_penalty_once() {
        let mut board = QuestBoard::new(vec![goblin_quest(1)]);
        let mut village = Village::new(100, 50);

        board.fail("Goblin Hunt", &mut village).unwrap();
        assert_eq!(village.health, 90);

        assert_eq!(
            board.fail("Goblin Hunt", &mut village),
            Err(QuestError::NotAvailable("Goblin Hunt".to_string()))
        );
        assert_eq!(village.health, 90);
        assert_eq!(board.failed().len(), 1);
        assert_eq!(board.status("Goblin Hunt"), Some(QuestStatus::Failed));
    }

    #[test]
    fn test_unknown_quest() {
        let mut board = QuestBoard::new_playthrough();
        assert_eq!(
            board.available_mut("Dragon Slayer").unwrap_err(),
            QuestError::UnknownQuest("Dragon Slayer".to_string())
        );
    }
}
