//! Game setup options.

use crate::hero::HeroClass;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

/// Environment variable holding a fixed RNG seed.
pub const SEED_ENV: &str = "VILLAGE_SEED";
/// Environment variable holding the save directory.
pub const SAVE_DIR_ENV: &str = "VILLAGE_SAVE_DIR";

/// Configuration for a new playthrough.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Hero name.
    pub hero_name: String,

    /// Hero class, which picks the starting kit.
    pub hero_class: HeroClass,

    /// Village health at the start of the game.
    pub village_health: u32,

    /// Village supplies at the start of the game.
    pub village_supplies: u32,

    /// Fixed RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Directory save files are written to.
    pub save_dir: PathBuf,
}

impl GameConfig {
    /// Create a config with defaults for everything but the hero name.
    pub fn new(hero_name: impl Into<String>) -> Self {
        Self {
            hero_name: hero_name.into(),
            hero_class: HeroClass::Warrior,
            village_health: 100,
            village_supplies: 50,
            seed: None,
            save_dir: PathBuf::from("saves"),
        }
    }

    /// Defaults, overlaid with `VILLAGE_SEED` and `VILLAGE_SAVE_DIR` when set.
    pub fn from_env(hero_name: impl Into<String>) -> Self {
        let mut config = Self::new(hero_name);

        if let Ok(raw) = std::env::var(SEED_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(seed) => config.seed = Some(seed),
                Err(_) => tracing::warn!(value = %raw, "Ignoring invalid {SEED_ENV}"),
            }
        }
        if let Ok(dir) = std::env::var(SAVE_DIR_ENV) {
            if dir.trim().is_empty() {
                tracing::warn!("Ignoring empty {SAVE_DIR_ENV}");
            } else {
                config.save_dir = PathBuf::from(dir);
            }
        }

        config
    }

    pub fn with_class(mut self, class: HeroClass) -> Self {
        self.hero_class = class;
        self
    }

    /// Set starting village health and supplies.
    pub fn with_village(mut self, health: u32, supplies: u32) -> Self {
        self.village_health = health;
        self.village_supplies = supplies;
        self
    }

    /// Fix the RNG seed for a reproducible game.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_save_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.save_dir = dir.as_ref().to_path_buf();
        self
    }

    /// RNG for the game: seeded if a seed is configured, else from entropy.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Path of the save file for this hero.
    pub fn save_path(&self) -> PathBuf {
        let sanitized = self
            .hero_name
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect::<String>();
        self.save_dir.join(format!("{sanitized}.json"))
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new("Hero")
    }
}
