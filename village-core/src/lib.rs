//! Battle and quest rules for Village Defense.
//!
//! This crate provides:
//! - Turn-based hero-vs-monster combat with accuracy, crit, block and dodge rolls
//! - Abilities gated on cooldowns and energy, and one-shot potion effects
//! - The quest lifecycle: kill tallies, rewards, and penalties to the village
//! - Save files
//!
//! The crate has no rendering or input handling. A front end reads state
//! through accessors and feeds one [`Action`] at a time into a
//! [`BattleManager`].
//!
//! # Quick Start
//!
//! ```ignore
//! use village_core::{Action, GameConfig, GameSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = GameSession::new(GameConfig::new("Aldric").with_seed(7));
//!
//!     let report = {
//!         let mut battle = session.embark("Goblin Trouble")?;
//!         while !battle.is_over() {
//!             battle.apply_action(Action::Attack);
//!             battle.apply_action(Action::Continue);
//!         }
//!         battle.report()
//!     };
//!     session.conclude(&report)?;
//!
//!     session.save().await?;
//!     Ok(())
//! }
//! ```

pub mod abilities;
pub mod battle;
pub mod combat;
pub mod combatant;
pub mod config;
pub mod dice;
pub mod hero;
pub mod items;
pub mod monster;
pub mod persist;
pub mod quest;
pub mod session;
pub mod shop;
pub mod village;

// Primary public API
pub use abilities::{Ability, AbilityEffect, AbilityId};
pub use battle::{Action, BattleManager, EncounterReport, EncounterStatus, Outcome, Phase, Turn};
pub use combat::{resolve_attack, Resource, RuleViolation};
pub use combatant::Combatant;
pub use config::GameConfig;
pub use hero::{Hero, HeroClass};
pub use items::{ArmorId, Item, PotionKind, WeaponId};
pub use monster::{Monster, MonsterKind};
pub use persist::{PersistError, SaveGame};
pub use quest::{Quest, QuestBoard, QuestError, QuestResolution, QuestStatus};
pub use session::{GameSession, SessionError};
pub use shop::{Shop, ShopError};
pub use village::{Penalty, PenaltyTarget, Village};
