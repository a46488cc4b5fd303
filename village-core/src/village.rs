//! The village the hero defends. Failed quests cost it health or supplies.

use serde::{Deserialize, Serialize};

/// What a quest penalty is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PenaltyTarget {
    VillageHealth,
    VillageSupplies,
}

/// A signed amount subtracted from a target when a quest fails.
/// A negative magnitude restores the target instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Penalty {
    pub target: PenaltyTarget,
    pub magnitude: i32,
}

impl Penalty {
    pub const fn health(magnitude: i32) -> Self {
        Self {
            target: PenaltyTarget::VillageHealth,
            magnitude,
        }
    }

    pub const fn supplies(magnitude: i32) -> Self {
        Self {
            target: PenaltyTarget::VillageSupplies,
            magnitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Village {
    pub health: u32,
    pub max_health: u32,
    pub supplies: u32,
}

impl Village {
    pub fn new(max_health: u32, supplies: u32) -> Self {
        Self {
            health: max_health,
            max_health,
            supplies,
        }
    }

    /// Apply a penalty, clamping the target at zero (and health at its
    /// maximum). Returns the value of the target afterwards.
    pub fn apply_penalty(&mut self, penalty: &Penalty) -> u32 {
        let applied = match penalty.target {
            PenaltyTarget::VillageHealth => {
                self.health = shift(self.health, penalty.magnitude).min(self.max_health);
                self.health
            }
            PenaltyTarget::VillageSupplies => {
                self.supplies = shift(self.supplies, penalty.magnitude);
                self.supplies
            }
        };
        tracing::info!(
            target_pool = ?penalty.target,
            magnitude = penalty.magnitude,
            remaining = applied,
            "Village penalized"
        );
        applied
    }

    pub fn is_destroyed(&self) -> bool {
        self.health == 0
    }
}

fn shift(value: u32, magnitude: i32) -> u32 {
    if magnitude >= 0 {
        value.saturating_sub(magnitude.unsigned_abs())
    } else {
        value.saturating_add(magnitude.unsigned_abs())
    }
}
