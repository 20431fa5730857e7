//! Playing pieces: pegs and dice, plus the shared color palette.
//!
//! Pieces are identified by opaque ids and stored in the board's arenas;
//! players and hex tiles hold ids rather than the pieces themselves. This
//! keeps ownership in one place while still letting a tile enumerate its
//! occupants and a player enumerate their pool.

use crate::hex::{HexCoord, SlotKey};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The shared color palette used for tiles, pegs, dice, and players.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Color {
    Blue,
    Orange,
    Green,
    DarkGreen,
    Grey,
    Purple,
    DarkBlue,
    Olive,
    YellowGreen,
    SeaGreen,
    Brown,
    Yellow,
}

impl Color {
    /// Every color in the palette
    pub const ALL: [Color; 12] = [
        Color::Blue,
        Color::Orange,
        Color::Green,
        Color::DarkGreen,
        Color::Grey,
        Color::Purple,
        Color::DarkBlue,
        Color::Olive,
        Color::YellowGreen,
        Color::SeaGreen,
        Color::Brown,
        Color::Yellow,
    ];

    /// Display name, matching the board-editor swatch labels
    pub fn name(&self) -> &'static str {
        match self {
            Color::Blue => "blue",
            Color::Orange => "orange",
            Color::Green => "green",
            Color::DarkGreen => "darkGreen",
            Color::Grey => "grey",
            Color::Purple => "purple",
            Color::DarkBlue => "darkBlue",
            Color::Olive => "olive",
            Color::YellowGreen => "yellowGreen",
            Color::SeaGreen => "seaGreen",
            Color::Brown => "brown",
            Color::Yellow => "yellow",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tile color that rain dice match against during the Play phase
pub const RAIN_COLOR: Color = Color::Blue;

/// Tile colors on which pegs score during the Eat phase
pub const EATABLE_COLORS: [Color; 2] = [Color::Yellow, Color::Green];

/// Standard die faces
pub const DIE_FACES: [u8; 6] = [1, 2, 3, 4, 5, 6];

/// Maximum peg size; growth doubles up to this cap
pub const MAX_PEG_SIZE: u8 = 8;

/// Opaque identifier for a peg in the board's arena
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PegId(pub(crate) u32);

impl fmt::Display for PegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peg#{}", self.0)
    }
}

/// Opaque identifier for a die in the board's arena
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct DieId(pub(crate) u32);

impl fmt::Display for DieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "die#{}", self.0)
    }
}

/// A player's peg. Size doubles during Grow phases, capped at 8.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peg {
    /// Arena id
    pub id: PegId,
    /// Owning player's color
    pub owner: Color,
    /// Power-of-two size in `[1, 8]`
    pub size: u8,
    /// Canonical slot the peg occupies, or `None` while in the pool
    pub position: Option<SlotKey>,
}

impl Peg {
    pub(crate) fn new(id: PegId, owner: Color) -> Self {
        Self {
            id,
            owner,
            size: 1,
            position: None,
        }
    }

    /// The hexes the peg currently touches (empty while off-board)
    pub fn touched_hexes(&self) -> &[HexCoord] {
        self.position.as_ref().map(SlotKey::hexes).unwrap_or(&[])
    }

    /// Whether the peg is on the board
    pub fn is_placed(&self) -> bool {
        self.position.is_some()
    }

    /// Double the size, capped at [`MAX_PEG_SIZE`]
    pub(crate) fn grow(&mut self) {
        if self.size < MAX_PEG_SIZE {
            self.size *= 2;
        }
    }
}

/// What a die is for; the shared growth die is a plain value, not a `Die`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DieKind {
    /// Re-rolled and re-assigned to a matching tile every Play phase
    Rain,
    /// Held per player; seeds scoring dice onto tiles during Eat
    Food,
}

/// A die with a color and face value.
///
/// `location` is `None` while the die sits in a pool; otherwise it names the
/// tile carrying the die.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Die {
    /// Arena id
    pub id: DieId,
    pub color: Color,
    pub value: u8,
    pub kind: DieKind,
    pub location: Option<HexCoord>,
}

impl Die {
    pub(crate) fn new(id: DieId, color: Color, value: u8, kind: DieKind) -> Self {
        Self {
            id,
            color,
            value,
            kind,
            location: None,
        }
    }

    /// The current face value
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Roll a new face from the given face set
    pub(crate) fn reroll<R: Rng + ?Sized>(&mut self, faces: &[u8], rng: &mut R) {
        if let Some(face) = faces.choose(rng) {
            tracing::debug!(die = %self.id, color = %self.color, from = self.value, to = *face, "reroll");
            self.value = *face;
        }
    }
}
