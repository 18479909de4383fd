//! Move scenarios driven through the public engine API.

use game2048_engine::{Direction, Game, GameState, Position, RandomSource};

/// Replays fixed decisions; falls back to index 0 and `true`.
struct Scripted {
    indices: Vec<usize>,
    chances: Vec<bool>,
}

impl Scripted {
    fn new(indices: &[usize], chances: &[bool]) -> Self {
        Self {
            indices: indices.iter().rev().copied().collect(),
            chances: chances.iter().rev().copied().collect(),
        }
    }
}

impl RandomSource for Scripted {
    fn pick_index(&mut self, len: usize) -> usize {
        self.indices.pop().unwrap_or(0).min(len - 1)
    }

    fn chance(&mut self, _p: f64) -> bool {
        self.chances.pop().unwrap_or(true)
    }
}

fn game(values: [[u32; 4]; 4], indices: &[usize]) -> Game<Scripted> {
    Game::restore(GameState::from_values(values), Scripted::new(indices, &[]))
}

#[test]
fn test_four_twos_merge_pairwise() {
    // Empty cells after the move: (0,2), (0,3), (1,0)... index 2 spawns at (1,0).
    let mut game = game([[2, 2, 2, 2], [0; 4], [0; 4], [0; 4]], &[2]);
    let outcome = game.apply_move(Direction::Left);

    assert!(outcome.moved);
    assert_eq!(outcome.score_gained, 8);
    assert_eq!(outcome.merges, 2);
    assert_eq!(outcome.spawned, vec![Position { row: 1, col: 0 }]);
    assert_eq!(game.state().grid().values()[0], [4, 4, 0, 0]);
    assert_eq!(game.state().score(), 8);
}

#[test]
fn test_leading_pair_merges_before_trailing_tile() {
    let mut game = game([[2, 0, 2, 2], [0; 4], [0; 4], [0; 4]], &[2]);
    let outcome = game.apply_move(Direction::Left);

    assert_eq!(outcome.score_gained, 4);
    assert_eq!(game.state().grid().values()[0], [4, 2, 0, 0]);
}

#[test]
fn test_merged_tiles_are_flagged_with_fresh_ids() {
    let mut game = game([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]], &[14]);
    let old_ids: Vec<u64> = game.state().grid().tiles().map(|(_, t)| t.id).collect();
    game.apply_move(Direction::Left);

    let merged = game
        .state()
        .grid()
        .get(Position { row: 0, col: 0 })
        .copied()
        .expect("merged tile");
    assert_eq!(merged.value, 4);
    assert!(merged.merged);
    assert!(!merged.is_new);
    assert!(!old_ids.contains(&merged.id));
}

#[test]
fn test_checkerboard_has_no_moves() {
    let state = GameState::from_values([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
    assert!(!state.can_move());
}

#[test]
fn test_full_grid_with_pair_can_move() {
    let state = GameState::from_values([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 4]]);
    assert!(state.can_move());
}

#[test]
fn test_undo_on_fresh_game_is_noop() {
    let mut game = Game::seeded(11);
    let before = game.state().clone();
    assert!(!game.undo());
    assert_eq!(game.state(), &before);
}

#[test]
fn test_undo_round_trip_through_game() {
    let mut game = game([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]], &[5]);
    let before = game.state().grid().values();
    game.apply_move(Direction::Left);
    assert!(game.state().can_undo());

    assert!(game.undo());
    assert_eq!(game.state().grid().values(), before);
    assert_eq!(game.state().score(), 0);
    assert!(!game.state().can_undo());
}

#[test]
fn test_seeded_games_keep_tile_accounting() {
    let directions = [Direction::Left, Direction::Down, Direction::Right, Direction::Up];

    for seed in 0..20 {
        let mut game = Game::seeded(seed);
        for step in 0..400 {
            if game.state().game_over() {
                break;
            }
            let before = game.state().clone();
            let outcome = game.apply_move(directions[step % directions.len()]);
            let after = game.state();

            if outcome.moved {
                assert_eq!(
                    after.grid().occupied_count(),
                    before.grid().occupied_count() - outcome.merges + outcome.spawned.len()
                );
                assert_eq!(after.score(), before.score() + outcome.score_gained);
                assert!(matches!(outcome.spawned.len(), 1 | 2));
            } else {
                assert_eq!(after.grid(), before.grid());
                assert_eq!(after.history(), before.history());
            }
            assert!(after.history().len() <= 10);
            assert!(after.check_invariants().is_ok(), "seed {seed} step {step}");
        }
    }
}

#[test]
fn test_moves_ignored_after_game_over() {
    let mut game = Game::seeded(3);
    let mut guard = 0;
    while !game.state().game_over() && guard < 10_000 {
        for direction in [Direction::Up, Direction::Left, Direction::Down, Direction::Right] {
            game.apply_move(direction);
        }
        guard += 1;
    }
    assert!(game.state().game_over());

    let before = game.state().clone();
    for direction in [Direction::Up, Direction::Left, Direction::Down, Direction::Right] {
        assert!(!game.apply_move(direction).moved);
    }
    assert!(!game.undo());
    assert_eq!(game.state(), &before);
}
