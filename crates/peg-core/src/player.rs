//! Player state: owned pegs, dice, and the running eat score.

use crate::pieces::{Color, DieId, PegId};
use serde::{Deserialize, Serialize};

/// How many pieces a newly added player receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSetup {
    /// Pegs created up front; more can be spawned later on demand
    pub pegs: usize,
    pub rain_dice: usize,
    pub food_dice: usize,
}

impl Default for PlayerSetup {
    fn default() -> Self {
        Self {
            pegs: 0,
            rain_dice: 1,
            food_dice: 6,
        }
    }
}

/// A single player's state.
///
/// The color doubles as the player's registry key; piece state itself lives
/// in the board arenas, the player holds the owning ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Unique key in the session's registry
    pub color: Color,
    /// Optional display name
    pub name: Option<String>,
    /// Pegs this player owns, on-board or pooled
    pub pegs: Vec<PegId>,
    /// Rain dice, re-rolled and re-assigned every Play phase
    pub rain_dice: Vec<DieId>,
    /// Food dice consumed (but never spent) during Eat
    pub food_dice: Vec<DieId>,
    /// Most recent Eat score
    pub eat_score: u32,
}

impl Player {
    /// Create a player with no pieces yet
    pub fn new(color: Color, name: Option<String>) -> Self {
        Self {
            color,
            name,
            pegs: Vec::new(),
            rain_dice: Vec::new(),
            food_dice: Vec::new(),
            eat_score: 0,
        }
    }

    /// All dice, rain first then food
    pub fn dice(&self) -> impl Iterator<Item = DieId> + '_ {
        self.rain_dice.iter().chain(self.food_dice.iter()).copied()
    }
}
