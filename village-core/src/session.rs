//! GameSession - the top-level API for a playthrough.
//!
//! Owns the hero, the quest board, the village and the RNG, hands out one
//! [`BattleManager`] per quest attempt, and routes each encounter's result
//! back into the quest lifecycle.

use crate::battle::{BattleManager, EncounterReport, EncounterStatus};
use crate::combatant::Combatant;
use crate::config::GameConfig;
use crate::hero::Hero;
use crate::items::{ArmorId, PotionKind, WeaponId};
use crate::persist::{PersistError, SaveGame};
use crate::quest::{QuestBoard, QuestError, QuestResolution};
use crate::shop::{Receipt, Shop, ShopError};
use crate::village::Village;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// Errors from GameSession operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    #[error("Quest error: {0}")]
    Quest(#[from] QuestError),

    #[error("Shop error: {0}")]
    Shop(#[from] ShopError),

    #[error("The village has fallen")]
    GameOver,
}

pub struct GameSession {
    config: GameConfig,
    session_id: Uuid,
    hero: Hero,
    board: QuestBoard,
    village: Village,
    shop: Shop,
    rng: StdRng,
}

impl GameSession {
    /// Start a new playthrough.
    pub fn new(config: GameConfig) -> Self {
        let hero = Hero::new(config.hero_name.clone(), config.hero_class);
        let village = Village::new(config.village_health, config.village_supplies);
        let rng = config.rng();
        let session_id = Uuid::new_v4();
        tracing::info!(
            %session_id,
            hero = %config.hero_name,
            class = %config.hero_class,
            seed = ?config.seed,
            "New game"
        );

        Self {
            config,
            session_id,
            hero,
            board: QuestBoard::new_playthrough(),
            village,
            shop: Shop::new(),
            rng,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn hero(&self) -> &Hero {
        &self.hero
    }

    pub fn hero_mut(&mut self) -> &mut Hero {
        &mut self.hero
    }

    pub fn board(&self) -> &QuestBoard {
        &self.board
    }

    pub fn village(&self) -> &Village {
        &self.village
    }

    pub fn shop(&self) -> &Shop {
        &self.shop
    }

    /// The game ends when the village falls.
    pub fn is_game_over(&self) -> bool {
        self.village.is_destroyed()
    }

    /// Begin an attempt at an available quest.
    pub fn embark(&mut self, quest_name: &str) -> Result<BattleManager<'_, StdRng>, SessionError> {
        if self.is_game_over() {
            return Err(SessionError::GameOver);
        }
        let quest = self.board.available_mut(quest_name)?;
        Ok(BattleManager::new(&mut self.hero, quest, &mut self.rng))
    }

    /// Settle a finished encounter on the quest board.
    ///
    /// A completed quest pays its reward. Fleeing or defeat fails the quest
    /// and costs the village its penalty; a defeated hero is carried home
    /// and restored to full health.
    pub fn conclude(&mut self, report: &EncounterReport) -> Result<QuestResolution, SessionError> {
        let resolution = match report.status {
            EncounterStatus::Ongoing => return Err(QuestError::EncounterUnfinished.into()),
            EncounterStatus::QuestCompleted => self.board.complete(&report.quest, &mut self.hero)?,
            EncounterStatus::Fled => self.board.fail(&report.quest, &mut self.village)?,
            EncounterStatus::HeroDefeated => {
                let resolution = self.board.fail(&report.quest, &mut self.village)?;
                self.hero.recover();
                tracing::info!(hero = self.hero.name(), "Hero carried home to recover");
                resolution
            }
        };

        if self.is_game_over() {
            tracing::warn!(session_id = %self.session_id, "The village has fallen");
        }
        Ok(resolution)
    }

    // ------------------------------------------------------------------------
    // Shop
    // ------------------------------------------------------------------------

    pub fn buy_potion(&mut self, kind: PotionKind, count: u32) -> Result<Receipt, SessionError> {
        Ok(self.shop.buy_potion(&mut self.hero, kind, count)?)
    }

    pub fn buy_weapon(&mut self, id: WeaponId) -> Result<Receipt, SessionError> {
        Ok(self.shop.buy_weapon(&mut self.hero, id)?)
    }

    pub fn buy_armor(&mut self, id: ArmorId) -> Result<Receipt, SessionError> {
        Ok(self.shop.buy_armor(&mut self.hero, id)?)
    }

    // ------------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------------

    /// Save to the configured save path. Returns the path written.
    pub async fn save(&self) -> Result<PathBuf, SessionError> {
        let path = self.config.save_path();
        self.save_to(&path).await?;
        Ok(path)
    }

    pub async fn save_to(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let saved = SaveGame::new(self.session_id, &self.hero, &self.village, &self.board);
        saved.save_json(path).await?;
        Ok(())
    }

    /// Resume a playthrough. The RNG comes from `config`, the rest from the
    /// save file.
    pub async fn load(path: impl AsRef<Path>, config: GameConfig) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let saved = match SaveGame::load_json(path).await {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to load save");
                return Err(e.into());
            }
        };
        let (hero, village, board) = saved.restore()?;
        tracing::info!(session_id = %saved.session_id, hero = hero.name(), "Game loaded");

        Ok(Self {
            rng: config.rng(),
            config,
            session_id: saved.session_id,
            hero,
            board,
            village,
            shop: Shop::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::{Action, Outcome};
    use crate::hero::HeroClass;
    use crate::quest::QuestStatus;

    fn session() -> GameSession {
        GameSession::new(GameConfig::new("Aldric").with_seed(99))
    }

    #[test]
    fn test_flee_fails_quest_once() {
        let mut session = session();
        let report = {
            let mut battle = session.embark("Goblin Trouble").unwrap();
            assert_eq!(battle.apply_action(Action::Flee), Outcome::Fled);
            battle.report()
        };

        let resolution = session.conclude(&report).unwrap();
        assert!(matches!(resolution, QuestResolution::Failed { .. }));
        assert_eq!(session.village().health, 90);
        assert_eq!(session.board().status("Goblin Trouble"), Some(QuestStatus::Failed));

        // Settling the same report again is refused and costs nothing
        assert!(matches!(
            session.conclude(&report),
            Err(SessionError::Quest(QuestError::NotAvailable(_)))
        ));
        assert_eq!(session.village().health, 90);
        assert!(matches!(
            session.embark("Goblin Trouble"),
            Err(SessionError::Quest(QuestError::NotAvailable(_)))
        ));
    }

    #[test]
    fn test_ongoing_report_is_rejected() {
        let mut session = session();
        let report = session.embark("Troll Bridge").unwrap().report();
        assert!(matches!(
            session.conclude(&report),
            Err(SessionError::Quest(QuestError::EncounterUnfinished))
        ));
        assert_eq!(session.board().status("Troll Bridge"), Some(QuestStatus::Available));
    }

    #[test]
    fn test_game_over_blocks_embark() {
        let mut session = GameSession::new(
            GameConfig::new("Aldric")
                .with_class(HeroClass::Mage)
                .with_village(10, 0)
                .with_seed(1),
        );
        let report = {
            let mut battle = session.embark("Goblin Trouble").unwrap();
            battle.apply_action(Action::Flee);
            battle.report()
        };
        session.conclude(&report).unwrap();
        assert!(session.is_game_over());
        assert!(matches!(
            session.embark("Bandit Camp"),
            Err(SessionError::GameOver)
        ));
    }

    #[test]
    fn test_shop_through_session() {
        let mut session = session();
        session.buy_potion(PotionKind::BlockPotion, 1).unwrap();
        assert_eq!(session.hero().potion_count(PotionKind::BlockPotion), 2);
        assert!(matches!(
            session.buy_armor(ArmorId::PlateArmor),
            Err(SessionError::Shop(ShopError::NotEnoughGold { .. }))
        ));
    }
}
