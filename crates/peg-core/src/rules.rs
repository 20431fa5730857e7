//! Phase logic for the Play -> Eat -> Grow cycle.
//!
//! Free functions over a [`Board`] and the player registry, with the random
//! source injected by the caller. [`crate::GameSession`] drives these from
//! `advance_phase`; tests drive them directly with a seeded generator.

use crate::board::Board;
use crate::game::GameError;
use crate::pieces::{Color, DieId, PegId, EATABLE_COLORS};
use crate::player::Player;
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};

/// Play phase: every rain die re-rolls and then lands on the first tile
/// matching its color and new value, or returns to the pool.
///
/// Players are visited in registry order, their rain dice in hand order.
/// Movement and placement of player pegs carries no legality checking;
/// callers place pegs directly through the board.
pub fn play_phase<R: Rng + ?Sized>(
    board: &mut Board,
    players: &BTreeMap<Color, Player>,
    rng: &mut R,
) -> Result<(), GameError> {
    tracing::info!("play phase");
    let rain: Vec<DieId> = players
        .values()
        .flat_map(|p| p.rain_dice.iter().copied())
        .collect();
    for id in rain {
        board.reroll_die(id, rng)?;
        board.assign_die_to_matching_hex(id)?;
    }
    Ok(())
}

/// Eat phase: seed scoring dice from every food pile, then score pegs on
/// eatable tiles.
///
/// Every player's score is zeroed first. Each food die's face lands a
/// scoring die on the first tile whose color is the player's own and whose
/// number equals the face; with no match nothing is placed. Then every peg
/// on a tile colored in [`EATABLE_COLORS`] earns its size once per die on
/// that tile whose value equals the tile's number.
///
/// Scored dice are never consumed, so a second Eat without an intervening
/// Play counts them again.
pub fn eat_phase(board: &mut Board, players: &mut BTreeMap<Color, Player>) {
    tracing::info!("eat phase");
    for player in players.values_mut() {
        player.eat_score = 0;
    }

    let piles: Vec<(Color, Vec<u8>)> = players
        .values()
        .map(|p| {
            let faces = p
                .food_dice
                .iter()
                .filter_map(|id| board.die(*id))
                .map(|d| d.value)
                .collect();
            (p.color, faces)
        })
        .collect();
    for (color, faces) in piles {
        for face in faces {
            board.place_food_die(color, face);
        }
    }

    let mut scores: BTreeMap<Color, u32> = BTreeMap::new();
    for tile in board.tiles() {
        if !EATABLE_COLORS.contains(&tile.color) {
            continue;
        }
        for peg_id in tile.pegs() {
            if let Some(peg) = board.peg(*peg_id) {
                for die_id in tile.dice() {
                    if board.die(*die_id).is_some_and(|d| d.value == tile.number) {
                        *scores.entry(peg.owner).or_default() += u32::from(peg.size);
                    }
                }
            }
        }
    }
    for (color, gained) in scores {
        if let Some(player) = players.get_mut(&color) {
            player.eat_score = gained;
            tracing::info!(player = %color, score = gained, "eat score");
        }
    }
}

/// Grow phase: roll the shared growth die, then double every qualifying peg.
///
/// A tile qualifies when any die value on it repeats, or any die on it
/// equals the growth die. Every peg on a qualifying tile doubles once,
/// capped at the maximum size; a peg spanning several qualifying tiles
/// still grows only once. Returns the rolled growth die.
pub fn grow_phase<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) -> Result<u8, GameError> {
    let faces = board.faces().to_vec();
    let growth_die = faces[rng.gen_range(0..faces.len())];
    tracing::info!(growth_die, "grow phase");

    let mut growers: BTreeSet<PegId> = BTreeSet::new();
    for tile in board.tiles() {
        let mut counts: BTreeMap<u8, u32> = BTreeMap::new();
        for die_id in tile.dice() {
            if let Some(die) = board.die(*die_id) {
                *counts.entry(die.value).or_default() += 1;
            }
        }
        let qualifies = counts
            .iter()
            .any(|(value, count)| *count > 1 || *value == growth_die);
        if qualifies {
            growers.extend(tile.pegs().iter().copied());
        }
    }
    for id in growers {
        board.grow_peg(id)?;
    }
    Ok(growth_die)
}
