//! Integration tests for the PEG rules core.
//!
//! These tests drive complete flows through the `GameSession` command
//! surface only, the way a presentation layer would: register players, edit
//! the board in sandbox mode, place pegs, and advance the Play/Eat/Grow
//! cycle.

use peg_core::*;

/// Deterministic session over a board whose rolls all come from `faces`
fn session_with(radius: i32, faces: Vec<u8>, seed: u64) -> GameSession {
    let config = GameConfig {
        board: BoardConfig {
            radius,
            faces,
            ..BoardConfig::default()
        },
        ..GameConfig::default()
    };
    GameSession::with_seed(config, seed)
}

/// Paint every tile `base`, then apply `(coord, color)` overrides.
///
/// Enters and leaves sandbox, so the session ends up in its resume phase.
fn repaint(session: &mut GameSession, base: Color, overrides: &[(HexCoord, Color)]) {
    session.enter_sandbox();
    let coords: Vec<HexCoord> = session.board().tiles().map(|t| t.coord).collect();
    for coord in coords {
        session.paint(coord, base).unwrap();
    }
    for (coord, color) in overrides {
        session.paint(*coord, *color).unwrap();
    }
    session.exit_sandbox();
}

#[test]
fn test_session_lifecycle_from_sandbox_to_play() {
    let mut session = session_with(2, DIE_FACES.to_vec(), 1);
    assert_eq!(session.phase(), Phase::Sandbox);

    session.add_player(Color::Orange, Some("Ada".into())).unwrap();
    session.add_player(Color::Purple, None).unwrap();
    assert_eq!(session.player_count(), 2);

    session.exit_sandbox();
    assert_eq!(session.phase(), Phase::Play);
    assert_eq!(session.round(), 0);
    assert_eq!(session.growth_die(), None);
}

#[test]
fn test_duplicate_player_color_is_rejected() {
    let mut session = session_with(1, DIE_FACES.to_vec(), 2);
    session.add_player(Color::Orange, None).unwrap();
    let revision = session.revision();

    let err = session.add_player(Color::Orange, None).unwrap_err();
    assert!(matches!(err, GameError::DuplicateColor(Color::Orange)));
    assert_eq!(session.player_count(), 1);
    assert_eq!(session.revision(), revision, "rejected command must not mutate");
}

#[test]
fn test_rain_die_lands_on_matching_tile() {
    // radius 0: a single hex, forced blue with number 3; the single-face
    // die set forces every roll to 3
    let mut session = session_with(0, vec![3], 3);
    session.add_player(Color::Orange, None).unwrap();
    repaint(&mut session, Color::Blue, &[]);

    assert_eq!(session.advance_phase().unwrap(), Phase::Eat);

    let rain_die = session.player(Color::Orange).unwrap().rain_dice[0];
    let die = session.board().die(rain_die).unwrap();
    assert_eq!(die.value, 3);
    assert_eq!(die.location, Some(HexCoord::new(0, 0)));
    assert_eq!(
        session.board().tile(&HexCoord::new(0, 0)).unwrap().dice(),
        &[rain_die]
    );
}

#[test]
fn test_rain_die_without_match_returns_to_pool() {
    let mut session = session_with(0, vec![3], 4);
    session.add_player(Color::Orange, None).unwrap();
    repaint(&mut session, Color::Grey, &[]);

    session.advance_phase().unwrap();

    let rain_die = session.player(Color::Orange).unwrap().rain_dice[0];
    assert_eq!(session.board().die(rain_die).unwrap().location, None);
}

#[test]
fn test_peg_placement_round_trip() {
    let mut session = session_with(2, DIE_FACES.to_vec(), 5);
    session.add_player(Color::Orange, None).unwrap();
    let peg = session.spawn_peg(Color::Orange).unwrap();

    let key = session.place_peg(peg, HexCoord::new(0, 0), 0).unwrap();
    assert_eq!(
        key.hexes(),
        &[HexCoord::new(0, -1), HexCoord::new(0, 0), HexCoord::new(1, 0)]
    );
    for hex in key.hexes() {
        assert!(session.board().pegs_at(hex).contains(&peg));
    }

    session.remove_peg(peg);
    session.remove_peg(peg); // idempotent
    assert!(session.board().peg(peg).unwrap().position.is_none());
    for hex in key.hexes() {
        assert!(!session.board().pegs_at(hex).contains(&peg));
    }
}

#[test]
fn test_same_physical_slot_from_two_centers() {
    let mut session = session_with(2, DIE_FACES.to_vec(), 6);
    session.add_player(Color::Orange, None).unwrap();
    session.add_player(Color::Purple, None).unwrap();
    let a = session.spawn_peg(Color::Orange).unwrap();
    let b = session.spawn_peg(Color::Purple).unwrap();

    // the edge toward (1, 0), addressed from each side of it
    let from_here = session.place_peg(a, HexCoord::new(0, 0), 1).unwrap();
    let from_there = session.place_peg(b, HexCoord::new(1, 0), 7).unwrap();
    assert_eq!(from_here, from_there, "both centers resolve to one canonical slot");
}

#[test]
fn test_sandbox_gates_board_edits() {
    let mut session = session_with(1, DIE_FACES.to_vec(), 7);
    session.exit_sandbox();

    let err = session.paint(HexCoord::new(0, 0), Color::Purple).unwrap_err();
    assert!(matches!(err, GameError::NotInSandbox));
    let err = session.set_number(HexCoord::new(0, 0), 2).unwrap_err();
    assert!(matches!(err, GameError::NotInSandbox));

    session.enter_sandbox();
    session.paint(HexCoord::new(0, 0), Color::Purple).unwrap();
    session.set_number(HexCoord::new(0, 0), 2).unwrap();
    session.exit_sandbox();

    let tile = session.board().tile(&HexCoord::new(0, 0)).unwrap();
    assert_eq!(tile.color, Color::Purple);
    assert_eq!(tile.number, 2);
}

#[test]
fn test_sandbox_suspends_the_cycle_and_resumes_it() {
    let mut session = session_with(1, DIE_FACES.to_vec(), 8);
    session.exit_sandbox();
    session.advance_phase().unwrap();
    assert_eq!(session.phase(), Phase::Eat);

    session.enter_sandbox();
    let err = session.advance_phase().unwrap_err();
    assert!(matches!(
        err,
        GameError::InvalidPhaseTransition(Phase::Sandbox)
    ));

    session.exit_sandbox();
    assert_eq!(session.phase(), Phase::Eat, "sandbox restores the suspended phase");
}

#[test]
fn test_full_cycle_counts_rounds() {
    let mut session = session_with(1, DIE_FACES.to_vec(), 9);
    session.add_player(Color::Orange, None).unwrap();
    session.exit_sandbox();

    for round in 1..=3 {
        assert_eq!(session.advance_phase().unwrap(), Phase::Eat);
        assert_eq!(session.advance_phase().unwrap(), Phase::Grow);
        assert_eq!(session.advance_phase().unwrap(), Phase::Play);
        assert_eq!(session.round(), round);
        assert!(session.growth_die().is_some());
    }
}

#[test]
fn test_eat_scoring_accumulates_because_dice_persist() {
    // single-face die set: every roll is a 4, so all six of the player's
    // food dice land on the one green tile numbered 4
    let mut session = session_with(1, vec![4], 10);
    session.add_player(Color::Green, None).unwrap();
    repaint(
        &mut session,
        Color::Grey,
        &[(HexCoord::new(0, 0), Color::Green)],
    );

    let peg = session.spawn_peg(Color::Green).unwrap();
    session.place_peg(peg, HexCoord::new(0, 0), 1).unwrap();

    session.advance_phase().unwrap(); // Play: rain die finds no blue tile
    session.advance_phase().unwrap(); // Eat
    assert_eq!(
        session.board().tile(&HexCoord::new(0, 0)).unwrap().dice().len(),
        6
    );
    assert_eq!(session.player(Color::Green).unwrap().eat_score, 6);

    // Grow doubles the peg: six dice of value 4 repeat on the tile
    session.advance_phase().unwrap();
    assert_eq!(session.board().peg(peg).unwrap().size, 2);

    // the scored dice were never consumed, so the next Eat counts the old
    // six plus six fresh ones, at the doubled size
    session.advance_phase().unwrap(); // Play
    session.advance_phase().unwrap(); // Eat
    assert_eq!(
        session.board().tile(&HexCoord::new(0, 0)).unwrap().dice().len(),
        12
    );
    assert_eq!(session.player(Color::Green).unwrap().eat_score, 24);
}

#[test]
fn test_peg_growth_caps_at_eight() {
    let mut session = session_with(1, vec![4], 11);
    session.add_player(Color::Green, None).unwrap();
    repaint(
        &mut session,
        Color::Grey,
        &[(HexCoord::new(0, 0), Color::Green)],
    );

    let peg = session.spawn_peg(Color::Green).unwrap();
    session.place_peg(peg, HexCoord::new(0, 0), 1).unwrap();

    // every round's Grow qualifies (the food dice pile up), so the peg
    // doubles each time until it hits the cap
    for _ in 0..5 {
        session.advance_phase().unwrap(); // Play
        session.advance_phase().unwrap(); // Eat
        session.advance_phase().unwrap(); // Grow
    }
    assert_eq!(session.board().peg(peg).unwrap().size, MAX_PEG_SIZE);
    assert!(session.board().peg(peg).unwrap().size.is_power_of_two());
}

#[test]
fn test_remove_player_cleans_the_board() {
    let mut session = session_with(1, DIE_FACES.to_vec(), 12);
    session.add_player(Color::Orange, None).unwrap();
    let peg = session.spawn_peg(Color::Orange).unwrap();
    session.place_peg(peg, HexCoord::new(0, 0), 1).unwrap();

    let removed = session.remove_player(Color::Orange).unwrap();
    assert_eq!(removed.color, Color::Orange);
    assert_eq!(session.board().pegs().count(), 0);
    assert_eq!(session.board().dice().count(), 0);
    for tile in session.board().tiles() {
        assert!(tile.pegs().is_empty());
        assert!(tile.dice().is_empty());
    }
}

#[test]
fn test_out_of_bounds_placement_is_atomic() {
    let mut session = session_with(0, DIE_FACES.to_vec(), 13);
    session.add_player(Color::Orange, None).unwrap();
    let peg = session.spawn_peg(Color::Orange).unwrap();
    let revision = session.revision();

    // every slot of the lone hex touches a neighbor that does not exist
    let err = session.place_peg(peg, HexCoord::new(0, 0), 0).unwrap_err();
    assert!(matches!(err, GameError::OutOfBounds(_)));
    assert!(session.board().peg(peg).unwrap().position.is_none());
    assert_eq!(session.revision(), revision);
}

#[test]
fn test_snapshot_serializes_for_redraw() {
    let mut session = session_with(1, DIE_FACES.to_vec(), 14);
    session.add_player(Color::Orange, Some("Ada".into())).unwrap();
    let peg = session.spawn_peg(Color::Orange).unwrap();
    session.place_peg(peg, HexCoord::new(0, 0), 3).unwrap();
    session.exit_sandbox();
    session.advance_phase().unwrap();

    let snapshot = session.to_json_friendly();
    let json = serde_json::to_string(&snapshot).unwrap();
    let back: SessionJson = serde_json::from_str(&json).unwrap();

    assert_eq!(back.phase, Phase::Eat);
    assert_eq!(back.players.len(), 1);
    assert_eq!(back.board.tiles.len(), session.board().tile_count());
    assert_eq!(back.board.revision, session.revision());
}

#[test]
fn test_same_seed_replays_identically() {
    let run = |seed: u64| {
        let mut session = session_with(2, DIE_FACES.to_vec(), seed);
        session.add_player(Color::Orange, None).unwrap();
        session.add_player(Color::Green, None).unwrap();
        let peg = session.spawn_peg(Color::Green).unwrap();
        session.place_peg(peg, HexCoord::new(0, 0), 2).unwrap();
        session.exit_sandbox();
        for _ in 0..6 {
            session.advance_phase().unwrap();
        }
        serde_json::to_string(&session.to_json_friendly()).unwrap()
    };

    assert_eq!(run(21), run(21));
    assert_ne!(run(21), run(22), "different seeds should diverge");
}
