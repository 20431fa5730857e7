//! PEG - rules core for a hex-grid Play/Eat/Grow tabletop simulator
//!
//! This crate provides the board geometry and turn rules, including:
//! - Axial hex coordinate system with canonical peg-slot identity
//! - Board representation with tiles, pegs, and dice
//! - Player registry and per-player piece pools
//! - The Play -> Eat -> Grow phase cycle with injectable randomness
//!
//! # Architecture
//!
//! The core is presentation-agnostic: a GUI, TUI, or server wraps a
//! [`GameSession`], issues commands, and redraws from a snapshot whenever
//! the session's revision counter moves. The core never converts
//! coordinates to pixels and never draws.
//!
//! # Modules
//!
//! - [`hex`]: Coordinate system and the canonical slot key
//! - [`board`]: Hex lattice, piece arenas, placement rules
//! - [`pieces`]: Pegs, dice, and the shared color palette
//! - [`player`]: Player state and starting-piece configuration
//! - [`rules`]: Play/Eat/Grow phase logic
//! - [`game`]: The session facade and its error taxonomy

pub mod board;
pub mod game;
pub mod hex;
pub mod pieces;
pub mod player;
pub mod rules;

// Re-export commonly used types
pub use board::{
    Board, BoardConfig, BoardJson, HexTile, TileJson, DEFAULT_BOARD_RADIUS, DEFAULT_PALETTE,
};
pub use game::{GameConfig, GameError, GameSession, Phase, SessionJson};
pub use hex::{HexCoord, Orientation, SlotKey};
pub use pieces::{
    Color, Die, DieId, DieKind, Peg, PegId, DIE_FACES, EATABLE_COLORS, MAX_PEG_SIZE, RAIN_COLOR,
};
pub use player::{Player, PlayerSetup};
