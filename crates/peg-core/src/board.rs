//! Game board: the hex lattice and all piece placement.
//!
//! The board owns three collections:
//! - `tiles`: one [`HexTile`] per coordinate inside the configured radius,
//!   keyed by [`HexCoord`] in a `BTreeMap` so iteration is always ascending
//!   `(q, r)` - the same order the build enumeration produces. Everything
//!   that says "first matching tile" means first in this order.
//! - the peg and die arenas, the single home of piece state. Tiles and
//!   players refer to pieces by id only.
//!
//! Placement keeps a bidirectional invariant: a tile's peg list contains
//! exactly the pegs whose canonical position touches that tile. Mutating
//! calls validate first and mutate second, so a rejected command never
//! leaves partial state behind.

use crate::game::GameError;
use crate::hex::{HexCoord, Orientation, SlotKey};
use crate::pieces::{Color, Die, DieId, DieKind, Peg, PegId, DIE_FACES};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default board radius (rings of hexes around the origin)
pub const DEFAULT_BOARD_RADIUS: i32 = 3;

/// Default tile palette. Yellow is reserved for dice and eat-scoring and is
/// not dealt onto tiles unless a custom palette includes it.
pub const DEFAULT_PALETTE: [Color; 11] = [
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
];

/// Board construction parameters.
///
/// Injected rather than hardcoded so boards are reproducible in tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Hex-disk radius; radius 0 is the single origin hex
    pub radius: i32,
    pub orientation: Orientation,
    /// Colors tiles are drawn from at build time
    pub palette: Vec<Color>,
    /// Face set for every die roll
    pub faces: Vec<u8>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_BOARD_RADIUS,
            orientation: Orientation::default(),
            palette: DEFAULT_PALETTE.to_vec(),
            faces: DIE_FACES.to_vec(),
        }
    }
}

/// A single hex tile on the board.
///
/// Tiles are created once at build time and never destroyed; sandbox edits
/// and phase logic only mutate their color, number, and piece lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexTile {
    /// Position on the hex grid
    pub coord: HexCoord,
    pub color: Color,
    /// Die-face number the tile answers to
    pub number: u8,
    /// Pegs whose canonical position touches this tile
    pegs: Vec<PegId>,
    /// Dice currently sitting on this tile, in arrival order
    dice: Vec<DieId>,
}

impl HexTile {
    fn new(coord: HexCoord, color: Color, number: u8) -> Self {
        Self {
            coord,
            color,
            number,
            pegs: Vec::new(),
            dice: Vec::new(),
        }
    }

    /// Pegs occupying this tile
    pub fn pegs(&self) -> &[PegId] {
        &self.pegs
    }

    /// Dice on this tile, in arrival order
    pub fn dice(&self) -> &[DieId] {
        &self.dice
    }
}

/// The complete game board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    tiles: BTreeMap<HexCoord, HexTile>,
    pegs: BTreeMap<PegId, Peg>,
    dice: BTreeMap<DieId, Die>,
    orientation: Orientation,
    radius: i32,
    faces: Vec<u8>,
    sandbox_mode: bool,
    revision: u64,
    next_peg_id: u32,
    next_die_id: u32,
}

impl Board {
    /// Build a board from configuration, using the thread RNG for tile
    /// colors and numbers
    pub fn build(config: &BoardConfig) -> Self {
        let mut rng = rand::thread_rng();
        Self::build_with_rng(config, &mut rng)
    }

    /// Build a board with a provided RNG for deterministic generation
    pub fn build_with_rng<R: Rng + ?Sized>(config: &BoardConfig, rng: &mut R) -> Self {
        assert!(config.radius >= 0, "board radius must be non-negative");
        assert!(!config.palette.is_empty(), "palette must not be empty");
        assert!(!config.faces.is_empty(), "face set must not be empty");

        let mut tiles = BTreeMap::new();
        let radius = config.radius;
        for q in -radius..=radius {
            let r1 = (-radius).max(-q - radius);
            let r2 = radius.min(-q + radius);
            for r in r1..=r2 {
                let coord = HexCoord::new(q, r);
                let color = config.palette[rng.gen_range(0..config.palette.len())];
                let number = config.faces[rng.gen_range(0..config.faces.len())];
                tiles.insert(coord, HexTile::new(coord, color, number));
            }
        }
        tracing::info!(radius, tiles = tiles.len(), "built hex grid");

        Self {
            tiles,
            pegs: BTreeMap::new(),
            dice: BTreeMap::new(),
            orientation: config.orientation,
            radius,
            faces: config.faces.clone(),
            sandbox_mode: false,
            revision: 0,
            next_peg_id: 0,
            next_die_id: 0,
        }
    }

    // ==================== Query Methods ====================

    /// Get a tile by coordinate
    pub fn tile(&self, coord: &HexCoord) -> Option<&HexTile> {
        self.tiles.get(coord)
    }

    /// All tiles in ascending `(q, r)` order
    pub fn tiles(&self) -> impl Iterator<Item = &HexTile> {
        self.tiles.values()
    }

    /// Number of tiles on the board
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Whether a coordinate is on the board
    pub fn contains(&self, coord: &HexCoord) -> bool {
        self.tiles.contains_key(coord)
    }

    /// Get a peg by id
    pub fn peg(&self, id: PegId) -> Option<&Peg> {
        self.pegs.get(&id)
    }

    /// All pegs in id order
    pub fn pegs(&self) -> impl Iterator<Item = &Peg> {
        self.pegs.values()
    }

    /// Get a die by id
    pub fn die(&self, id: DieId) -> Option<&Die> {
        self.dice.get(&id)
    }

    /// All dice in id order
    pub fn dice(&self) -> impl Iterator<Item = &Die> {
        self.dice.values()
    }

    /// Pegs occupying the given tile
    pub fn pegs_at(&self, coord: &HexCoord) -> &[PegId] {
        self.tiles.get(coord).map(|t| t.pegs.as_slice()).unwrap_or(&[])
    }

    /// All tiles a peg's canonical position touches
    pub fn hexes_touching_peg(&self, id: PegId) -> Vec<&HexTile> {
        match self.pegs.get(&id).and_then(|p| p.position.as_ref()) {
            Some(key) => key.hexes().iter().filter_map(|h| self.tiles.get(h)).collect(),
            None => Vec::new(),
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// The configured die-face set
    pub fn faces(&self) -> &[u8] {
        &self.faces
    }

    pub fn sandbox_mode(&self) -> bool {
        self.sandbox_mode
    }

    /// Monotonic change counter. Bumped by every mutating call; the
    /// presentation layer compares it against the last value it drew and
    /// performs a full redraw on change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn set_sandbox_mode(&mut self, on: bool) {
        self.sandbox_mode = on;
    }

    pub(crate) fn touch(&mut self) {
        self.revision += 1;
    }

    // ==================== Piece Lifecycle ====================

    /// Create a new size-1 peg in the off-board pool
    pub fn spawn_peg(&mut self, owner: Color) -> PegId {
        let id = PegId(self.next_peg_id);
        self.next_peg_id += 1;
        self.pegs.insert(id, Peg::new(id, owner));
        tracing::debug!(peg = %id, %owner, "spawned peg");
        self.touch();
        id
    }

    /// Create a new die in the pool
    pub fn spawn_die(&mut self, color: Color, value: u8, kind: DieKind) -> Result<DieId, GameError> {
        if !self.faces.contains(&value) {
            return Err(GameError::InvalidDieFace(value));
        }
        let id = DieId(self.next_die_id);
        self.next_die_id += 1;
        self.dice.insert(id, Die::new(id, color, value, kind));
        tracing::debug!(die = %id, %color, value, "spawned die");
        self.touch();
        Ok(id)
    }

    /// Remove a peg from the board and delete it from the arena
    pub fn despawn_peg(&mut self, id: PegId) -> Option<Peg> {
        self.remove_peg(id);
        let peg = self.pegs.remove(&id);
        if peg.is_some() {
            self.touch();
        }
        peg
    }

    /// Detach a die from its tile and delete it from the arena
    pub fn despawn_die(&mut self, id: DieId) -> Option<Die> {
        self.detach_die(id);
        let die = self.dice.remove(&id);
        if die.is_some() {
            self.touch();
        }
        die
    }

    // ==================== Placement ====================

    /// Place a peg at one of the 12 slots around `center`.
    ///
    /// The slot resolves to its canonical touched-hex key; placement fails
    /// with [`GameError::OutOfBounds`] if any touched hex is off the board,
    /// and nothing is mutated in that case. A peg already on the board is
    /// moved: its old slot is vacated first.
    pub fn place_peg(
        &mut self,
        id: PegId,
        center: HexCoord,
        slot_index: i32,
    ) -> Result<SlotKey, GameError> {
        if !self.pegs.contains_key(&id) {
            return Err(GameError::UnknownPeg(id));
        }
        let key = center.peg_slot(slot_index, self.orientation);
        for hex in key.hexes() {
            if !self.tiles.contains_key(hex) {
                return Err(GameError::OutOfBounds(*hex));
            }
        }

        self.detach_peg(id);
        for hex in key.hexes() {
            if let Some(tile) = self.tiles.get_mut(hex) {
                tile.pegs.push(id);
            }
        }
        if let Some(peg) = self.pegs.get_mut(&id) {
            peg.position = Some(key.clone());
        }
        tracing::info!(peg = %id, ?center, slot_index, slot = ?key.hexes(), "placed peg");
        self.touch();
        Ok(key)
    }

    /// Return a peg to the pool, vacating every tile it touched.
    ///
    /// Safe to call on a peg that is already off-board or unknown; removing
    /// twice leaves the board exactly as removing once did.
    pub fn remove_peg(&mut self, id: PegId) {
        if self.detach_peg(id) {
            tracing::info!(peg = %id, "removed peg");
            self.touch();
        }
    }

    fn detach_peg(&mut self, id: PegId) -> bool {
        let key = match self.pegs.get_mut(&id) {
            Some(peg) => peg.position.take(),
            None => return false,
        };
        let key = match key {
            Some(key) => key,
            None => return false,
        };
        for hex in key.hexes() {
            if let Some(tile) = self.tiles.get_mut(hex) {
                tile.pegs.retain(|p| *p != id);
            }
        }
        true
    }

    fn detach_die(&mut self, id: DieId) -> bool {
        let coord = match self.dice.get_mut(&id) {
            Some(die) => die.location.take(),
            None => return false,
        };
        let coord = match coord {
            Some(coord) => coord,
            None => return false,
        };
        if let Some(tile) = self.tiles.get_mut(&coord) {
            tile.dice.retain(|d| *d != id);
        }
        true
    }

    // ==================== Dice ====================

    /// Roll a die against the configured face set
    pub fn reroll_die<R: Rng + ?Sized>(&mut self, id: DieId, rng: &mut R) -> Result<(), GameError> {
        match self.dice.get_mut(&id) {
            Some(die) => {
                die.reroll(&self.faces, rng);
                self.touch();
                Ok(())
            }
            None => Err(GameError::UnknownDie(id)),
        }
    }

    /// Move a die onto the first tile matching its color and value.
    ///
    /// Tiles are scanned in ascending `(q, r)` order and ties go to the
    /// first match; several tiles sharing a `(color, number)` pair is a
    /// legal board, the winner is simply the lowest coordinate. With no
    /// match the die returns to the pool (`location = None`).
    pub fn assign_die_to_matching_hex(&mut self, id: DieId) -> Result<Option<HexCoord>, GameError> {
        let (color, value) = match self.dice.get(&id) {
            Some(die) => (die.color, die.value),
            None => return Err(GameError::UnknownDie(id)),
        };

        self.detach_die(id);

        let target = self
            .tiles
            .values()
            .find(|t| t.color == color && t.number == value)
            .map(|t| t.coord);

        match target {
            Some(coord) => {
                if let Some(tile) = self.tiles.get_mut(&coord) {
                    tile.dice.push(id);
                }
                if let Some(die) = self.dice.get_mut(&id) {
                    die.location = Some(coord);
                }
                tracing::info!(die = %id, %color, value, hex = ?coord, "assigned die to hex");
            }
            None => {
                tracing::info!(die = %id, %color, value, "no matching hex, die to pool");
            }
        }
        self.touch();
        Ok(target)
    }

    /// Double a peg's size, capped. Used by the Grow phase.
    pub(crate) fn grow_peg(&mut self, id: PegId) -> Result<u8, GameError> {
        let size = match self.pegs.get_mut(&id) {
            Some(peg) => {
                peg.grow();
                tracing::info!(peg = %id, owner = %peg.owner, size = peg.size, "peg grew");
                peg.size
            }
            None => return Err(GameError::UnknownPeg(id)),
        };
        self.touch();
        Ok(size)
    }

    /// Seed an eat-phase scoring die onto the first tile matching the
    /// player's color and the rolled face. Returns the tile that received
    /// it, or `None` (and spawns nothing) when no tile matches.
    pub(crate) fn place_food_die(&mut self, color: Color, face: u8) -> Option<HexCoord> {
        let target = self
            .tiles
            .values()
            .find(|t| t.color == color && t.number == face)
            .map(|t| t.coord);
        let coord = target?;

        let id = DieId(self.next_die_id);
        self.next_die_id += 1;
        let mut die = Die::new(id, color, face, DieKind::Food);
        die.location = Some(coord);
        self.dice.insert(id, die);
        if let Some(tile) = self.tiles.get_mut(&coord) {
            tile.dice.push(id);
        }
        tracing::info!(die = %id, %color, face, hex = ?coord, "food die placed");
        self.touch();
        Some(coord)
    }

    // ==================== Sandbox Edits ====================

    /// Repaint a tile. Only legal in sandbox mode.
    pub fn paint(&mut self, center: HexCoord, color: Color) -> Result<(), GameError> {
        if !self.sandbox_mode {
            return Err(GameError::NotInSandbox);
        }
        match self.tiles.get_mut(&center) {
            Some(tile) => {
                tracing::info!(hex = ?center, from = %tile.color, to = %color, "painted tile");
                tile.color = color;
                self.touch();
                Ok(())
            }
            None => Err(GameError::OutOfBounds(center)),
        }
    }

    /// Change a tile's number. Only legal in sandbox mode; the number must
    /// belong to the configured face set.
    pub fn set_number(&mut self, center: HexCoord, number: u8) -> Result<(), GameError> {
        if !self.sandbox_mode {
            return Err(GameError::NotInSandbox);
        }
        if !self.faces.contains(&number) {
            return Err(GameError::InvalidDieFace(number));
        }
        match self.tiles.get_mut(&center) {
            Some(tile) => {
                tracing::info!(hex = ?center, from = tile.number, to = number, "set tile number");
                tile.number = number;
                self.touch();
                Ok(())
            }
            None => Err(GameError::OutOfBounds(center)),
        }
    }

    // ==================== Snapshot ====================

    /// Convert to a JSON-friendly representation with arrays instead of
    /// coordinate-keyed maps. JSON does not support complex types as object
    /// keys, and the presentation layer redraws from this snapshot.
    pub fn to_json_friendly(&self) -> BoardJson {
        BoardJson {
            tiles: self
                .tiles
                .values()
                .map(|tile| TileJson {
                    q: tile.coord.q,
                    r: tile.coord.r,
                    color: tile.color,
                    number: tile.number,
                    pegs: tile.pegs.clone(),
                    dice: tile.dice.clone(),
                })
                .collect(),
            pegs: self.pegs.values().cloned().collect(),
            dice: self.dice.values().cloned().collect(),
            revision: self.revision,
        }
    }
}

/// JSON-friendly board snapshot with arrays instead of keyed maps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardJson {
    pub tiles: Vec<TileJson>,
    pub pegs: Vec<Peg>,
    pub dice: Vec<Die>,
    pub revision: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileJson {
    pub q: i32,
    pub r: i32,
    pub color: Color,
    pub number: u8,
    pub pegs: Vec<PegId>,
    pub dice: Vec<DieId>,
}
