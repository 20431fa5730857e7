//! Hex coordinate system using axial coordinates (q, r).
//!
//! This module provides the foundational coordinate types for the hex-based
//! game board:
//! - `HexCoord`: Identifies individual hex tiles
//! - `SlotKey`: Canonical identity of one of the 12 peg slots around a hex
//!
//! Peg slots alternate vertex/edge going clockwise around a hex: even slot
//! indices are vertices (corner points shared by 3 hexes), odd indices are
//! edges (side midpoints shared by 2 hexes). The same physical slot can be
//! addressed from every hex that touches it, so a `(center, slot_index)` pair
//! is never stored as an identity - the canonical key is the sorted set of
//! touched hexes, which compares equal no matter which hex it was computed
//! from.

use serde::{Deserialize, Serialize};

/// Hex lattice orientation. Selects which axial direction table is in force.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Hexes with a corner pointing up (the simulator's default)
    #[default]
    PointyTop,
    /// Hexes with a flat side up
    FlatTop,
}

impl Orientation {
    /// The six axial neighbor offsets in slot order.
    ///
    /// Slot index `i` maps to direction `i / 2`; consecutive directions share
    /// the vertex between them.
    pub const fn directions(self) -> [HexCoord; 6] {
        match self {
            Orientation::PointyTop => [
                HexCoord::new(1, 0),  // E
                HexCoord::new(1, -1), // NE
                HexCoord::new(0, -1), // NW
                HexCoord::new(-1, 0), // W
                HexCoord::new(-1, 1), // SW
                HexCoord::new(0, 1),  // SE
            ],
            Orientation::FlatTop => [
                HexCoord::new(1, -1), // NE
                HexCoord::new(1, 0),  // E
                HexCoord::new(0, 1),  // SE
                HexCoord::new(-1, 1), // SW
                HexCoord::new(-1, 0), // W
                HexCoord::new(0, -1), // NW
            ],
        }
    }
}

/// Axial coordinate for the hex grid.
///
/// In axial coordinates:
/// - `q` increases going east (right)
/// - `r` increases going southeast
/// - The third coordinate `s` (not stored) satisfies: q + r + s = 0
///
/// The derived `Ord` is lexicographic on `(q, r)`; that ordering is what
/// makes sorted touched-hex sets a canonical key, and it matches the board's
/// build enumeration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct HexCoord {
    /// Column (increases going east)
    pub q: i32,
    /// Row (increases going southeast)
    pub r: i32,
}

impl HexCoord {
    /// Create a new hex coordinate
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// The neighbor one step away in direction `dir` (0-5, slot order)
    pub fn neighbor(&self, orientation: Orientation, dir: usize) -> HexCoord {
        let d = orientation.directions()[dir % 6];
        HexCoord::new(self.q + d.q, self.r + d.r)
    }

    /// All six neighbors in slot order
    pub fn neighbors(&self, orientation: Orientation) -> [HexCoord; 6] {
        orientation
            .directions()
            .map(|d| HexCoord::new(self.q + d.q, self.r + d.r))
    }

    /// Resolve one of the 12 peg slots around this hex to its canonical key.
    ///
    /// `slot_index` is taken modulo 12 (negative indices wrap). Odd indices
    /// are edges and touch this hex plus the neighbor in direction
    /// `slot_index / 2`; even indices are vertices and also touch the
    /// neighbor in the following direction. The parity split is derived from
    /// the index rather than kept in a 12-entry table, so vertex and edge
    /// reasoning cannot fall out of sync.
    ///
    /// The center does not need to be on any board; callers placing pieces
    /// must validate the touched hexes against their own map.
    pub fn peg_slot(&self, slot_index: i32, orientation: Orientation) -> SlotKey {
        let directions = orientation.directions();
        let i = slot_index.rem_euclid(12) as usize;
        let dir = i / 2;
        let d = directions[dir];

        let mut hexes = vec![*self, HexCoord::new(self.q + d.q, self.r + d.r)];
        if i % 2 == 0 {
            let d_next = directions[(dir + 1) % 6];
            hexes.push(HexCoord::new(self.q + d_next.q, self.r + d_next.r));
        }

        SlotKey::from_hexes(hexes)
    }
}

/// Canonical identity of a peg slot: the sorted set of hexes it touches.
///
/// Vertices touch 3 hexes, edges touch 2. Because the list is sorted, every
/// `(center, slot_index)` pair denoting the same physical point produces an
/// equal key, which makes `SlotKey` safe to use for equality, hashing, and
/// map keys. This is the only stored form of a peg position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    hexes: Vec<HexCoord>,
}

impl SlotKey {
    /// Build a key from the touched hexes, sorting into canonical order
    pub fn from_hexes(hexes: impl IntoIterator<Item = HexCoord>) -> Self {
        let mut hexes: Vec<HexCoord> = hexes.into_iter().collect();
        hexes.sort_unstable();
        Self { hexes }
    }

    /// The touched hexes in ascending `(q, r)` order
    pub fn hexes(&self) -> &[HexCoord] {
        &self.hexes
    }

    /// Whether this slot is a vertex (corner point shared by 3 hexes)
    pub fn is_vertex(&self) -> bool {
        self.hexes.len() == 3
    }

    /// Whether this slot is an edge (side midpoint shared by 2 hexes)
    pub fn is_edge(&self) -> bool {
        self.hexes.len() == 2
    }

    /// Whether the slot touches the given hex
    pub fn contains(&self, hex: &HexCoord) -> bool {
        // binary_search is valid because the list is sorted
        self.hexes.binary_search(hex).is_ok()
    }
}
