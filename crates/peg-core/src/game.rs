//! Game session: the player registry and the phase state machine.
//!
//! A [`GameSession`] owns one [`Board`], the registered players, and the
//! random source every roll is drawn from. It is the command surface the
//! presentation layer talks to: add or remove players, place pegs, edit
//! tiles in sandbox mode, and advance the Play -> Eat -> Grow cycle. After
//! any command the board's revision counter has moved, which is the signal
//! to redraw.

use crate::board::{Board, BoardConfig, BoardJson};
use crate::hex::{HexCoord, SlotKey};
use crate::pieces::{Color, DieId, DieKind, PegId, RAIN_COLOR};
use crate::player::{Player, PlayerSetup};
use crate::rules;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Game phase.
///
/// `Play -> Eat -> Grow` cycle endlessly under caller control; `Sandbox` is
/// the initial state and an escape hatch reachable from any phase, never part
/// of the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Board editing allowed, phase advancement suspended
    Sandbox,
    /// Rain dice re-roll and land on matching tiles
    Play,
    /// Food dice seed scoring dice; pegs on eatable tiles score
    Eat,
    /// The shared growth die rolls and qualifying pegs double
    Grow,
}

/// Errors that can occur when applying commands
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("a player with color {0} is already registered")]
    DuplicateColor(Color),

    #[error("no player registered with color {0}")]
    UnknownPlayer(Color),

    #[error("hex ({}, {}) is not on the board", .0.q, .0.r)]
    OutOfBounds(HexCoord),

    #[error("board edits are only allowed in sandbox mode")]
    NotInSandbox,

    #[error("cannot advance the phase from {0:?}")]
    InvalidPhaseTransition(Phase),

    #[error("unknown {0}")]
    UnknownPeg(PegId),

    #[error("unknown {0}")]
    UnknownDie(DieId),

    #[error("{0} is not in the configured die-face set")]
    InvalidDieFace(u8),
}

/// Session construction parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub board: BoardConfig,
    /// Pieces dealt to each newly added player
    pub players: PlayerSetup,
}

/// One running game: board, players, phase, and the session RNG.
///
/// All randomness (board generation, die rolls) flows through the session's
/// seeded generator, so a session built with [`GameSession::with_seed`]
/// replays identically.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    players: BTreeMap<Color, Player>,
    setup: PlayerSetup,
    phase: Phase,
    /// Phase to restore when leaving sandbox
    resume_phase: Phase,
    round: u32,
    /// Last rolled shared growth die, `None` before the first Grow
    growth_die: Option<u8>,
    seed: u64,
    rng: StdRng,
}

impl GameSession {
    /// Create a session with a random seed
    pub fn new(config: GameConfig) -> Self {
        let seed = rand::thread_rng().gen();
        Self::with_seed(config, seed)
    }

    /// Create a fully deterministic session from a seed
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut board = Board::build_with_rng(&config.board, &mut rng);
        // the session starts in sandbox, so edits are allowed right away
        board.set_sandbox_mode(true);
        tracing::info!(seed, radius = board.radius(), "new session");
        Self {
            board,
            players: BTreeMap::new(),
            setup: config.players,
            phase: Phase::Sandbox,
            resume_phase: Phase::Play,
            round: 0,
            growth_die: None,
            seed,
            rng,
        }
    }

    // ==================== Queries ====================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Completed Play/Eat/Grow cycles
    pub fn round(&self) -> u32 {
        self.round
    }

    /// The shared growth die from the most recent Grow phase
    pub fn growth_die(&self) -> Option<u8> {
        self.growth_die
    }

    /// Seed this session was built from, for replays
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn player(&self, color: Color) -> Option<&Player> {
        self.players.get(&color)
    }

    /// Registered players in color order
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// The board's change counter; compare against the last drawn value and
    /// redraw when it moved
    pub fn revision(&self) -> u64 {
        self.board.revision()
    }

    // ==================== Player Registry ====================

    /// Register a player and deal their starting pieces.
    ///
    /// The color is the registry key: a second player with the same color is
    /// rejected with [`GameError::DuplicateColor`] and nothing changes. Rain
    /// dice are rain-colored, food dice carry the player's own color; all
    /// starting values roll from the session generator.
    pub fn add_player(&mut self, color: Color, name: Option<String>) -> Result<&Player, GameError> {
        if self.players.contains_key(&color) {
            tracing::warn!(%color, "ignoring player, color already active");
            return Err(GameError::DuplicateColor(color));
        }

        let faces = self.board.faces().to_vec();
        let mut player = Player::new(color, name);
        for _ in 0..self.setup.pegs {
            player.pegs.push(self.board.spawn_peg(color));
        }
        for _ in 0..self.setup.rain_dice {
            let value = faces[self.rng.gen_range(0..faces.len())];
            let id = self.board.spawn_die(RAIN_COLOR, value, DieKind::Rain)?;
            player.rain_dice.push(id);
        }
        for _ in 0..self.setup.food_dice {
            let value = faces[self.rng.gen_range(0..faces.len())];
            let id = self.board.spawn_die(color, value, DieKind::Food)?;
            player.food_dice.push(id);
        }

        tracing::info!(%color, name = player.name.as_deref(), "added player");
        let player = self.players.entry(color).or_insert(player);
        Ok(player)
    }

    /// Deregister a player and despawn their pieces from the board
    pub fn remove_player(&mut self, color: Color) -> Option<Player> {
        let player = self.players.remove(&color)?;
        for id in &player.pegs {
            self.board.despawn_peg(*id);
        }
        for id in player.dice() {
            self.board.despawn_die(id);
        }
        tracing::info!(%color, "removed player");
        self.board.touch();
        Some(player)
    }

    /// Create a new peg in the named player's off-board pool
    pub fn spawn_peg(&mut self, color: Color) -> Result<PegId, GameError> {
        if !self.players.contains_key(&color) {
            return Err(GameError::UnknownPlayer(color));
        }
        let id = self.board.spawn_peg(color);
        if let Some(player) = self.players.get_mut(&color) {
            player.pegs.push(id);
        }
        Ok(id)
    }

    // ==================== Phase Machine ====================

    /// Run the current phase's logic, then step to its successor.
    ///
    /// Wrapping from Grow back to Play completes a round. In sandbox the
    /// cycle is suspended and this fails with
    /// [`GameError::InvalidPhaseTransition`].
    pub fn advance_phase(&mut self) -> Result<Phase, GameError> {
        match self.phase {
            Phase::Sandbox => return Err(GameError::InvalidPhaseTransition(Phase::Sandbox)),
            Phase::Play => {
                rules::play_phase(&mut self.board, &self.players, &mut self.rng)?;
                self.phase = Phase::Eat;
            }
            Phase::Eat => {
                rules::eat_phase(&mut self.board, &mut self.players);
                self.phase = Phase::Grow;
            }
            Phase::Grow => {
                self.growth_die = Some(rules::grow_phase(&mut self.board, &mut self.rng)?);
                self.phase = Phase::Play;
                self.round += 1;
            }
        }
        tracing::info!(phase = ?self.phase, round = self.round, "advanced phase");
        self.board.touch();
        Ok(self.phase)
    }

    /// Suspend the cycle and enable board editing. Remembers the phase to
    /// come back to; entering twice changes nothing.
    pub fn enter_sandbox(&mut self) {
        if self.phase != Phase::Sandbox {
            self.resume_phase = self.phase;
            self.phase = Phase::Sandbox;
            self.board.set_sandbox_mode(true);
            tracing::info!(resume = ?self.resume_phase, "entered sandbox");
            self.board.touch();
        }
    }

    /// Leave sandbox and restore the suspended phase (Play for a fresh
    /// session). Idempotent.
    pub fn exit_sandbox(&mut self) {
        if self.phase == Phase::Sandbox {
            self.phase = self.resume_phase;
            self.board.set_sandbox_mode(false);
            tracing::info!(phase = ?self.phase, "exited sandbox");
            self.board.touch();
        }
    }

    // ==================== Delegated Board Commands ====================

    /// Place a peg at one of the 12 slots around `center`
    pub fn place_peg(
        &mut self,
        peg: PegId,
        center: HexCoord,
        slot_index: i32,
    ) -> Result<SlotKey, GameError> {
        self.board.place_peg(peg, center, slot_index)
    }

    /// Return a peg to its owner's pool
    pub fn remove_peg(&mut self, peg: PegId) {
        self.board.remove_peg(peg);
    }

    /// Repaint a tile (sandbox only)
    pub fn paint(&mut self, center: HexCoord, color: Color) -> Result<(), GameError> {
        self.board.paint(center, color)
    }

    /// Change a tile's number (sandbox only)
    pub fn set_number(&mut self, center: HexCoord, number: u8) -> Result<(), GameError> {
        self.board.set_number(center, number)
    }

    // ==================== Snapshot ====================

    /// Flatten the whole session into a JSON-friendly snapshot for the
    /// presentation layer's full redraw
    pub fn to_json_friendly(&self) -> SessionJson {
        SessionJson {
            phase: self.phase,
            round: self.round,
            growth_die: self.growth_die,
            players: self.players.values().cloned().collect(),
            board: self.board.to_json_friendly(),
        }
    }
}

/// JSON-friendly session snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionJson {
    pub phase: Phase,
    pub round: u32,
    pub growth_die: Option<u8>,
    pub players: Vec<Player>,
    pub board: BoardJson,
}
