use gridlock_core::{Direction, GridPos, Level, StartBlock};
use gridlock_system_verifier::{difficulty, replay_to_pattern, verify};
use gridlock_world::{query, World};

/// 5x1 board, anchored block chasing a free one; playing forward is two
/// slides east, so the recorded (reversed, negated) solution is two wests.
fn two_move_level() -> Level {
    Level::new(
        5,
        1,
        vec![
            StartBlock::new(GridPos::new(0, 0), true),
            StartBlock::new(GridPos::new(3, 0), false),
        ],
        vec![GridPos::new(3, 0), GridPos::new(4, 0)],
        vec![Direction::West, Direction::West],
    )
    .expect("valid level")
}

#[test]
fn recorded_solution_verifies() {
    assert!(verify(&two_move_level()));
}

#[test]
fn wrong_recording_fails_without_panicking() {
    let level = Level::new(
        5,
        1,
        vec![
            StartBlock::new(GridPos::new(0, 0), true),
            StartBlock::new(GridPos::new(3, 0), false),
        ],
        vec![GridPos::new(3, 0), GridPos::new(4, 0)],
        // Replays as south then east; the first move slides off the board.
        vec![Direction::West, Direction::North],
    )
    .expect("valid level");

    assert!(!verify(&level));
    assert!(difficulty(&level).is_none());
}

#[test]
fn replay_applies_moves_and_adhesion_up_to_the_solution() {
    let level = two_move_level();
    let mut world = World::from_level(&level);

    assert!(replay_to_pattern(
        &mut world,
        level.solution(),
        level.win_pattern(),
    ));

    // The first replayed move lands the anchored block against the free one
    // and adhesion captures it; the second stops as a solution before being
    // applied.
    assert_eq!(query::free_block_count(&world), 0);
    assert!(query::block_at(&world, GridPos::new(2, 0)).is_some());
    assert!(query::block_at(&world, GridPos::new(3, 0)).is_some());
}

#[test]
fn replay_fails_when_a_move_slides_off_the_board() {
    let level = two_move_level();
    let mut world = World::from_level(&level);

    assert!(!replay_to_pattern(
        &mut world,
        &[Direction::East],
        level.win_pattern(),
    ));
}

#[test]
fn difficulty_reflects_moves_and_constrained_travel() {
    // Two recorded moves at the default weight, plus travel of two cells and
    // one cell, each from a position with a single productive direction.
    assert_eq!(difficulty(&two_move_level()), Some(23));
}

#[test]
fn verify_leaves_the_level_untouched() {
    let level = two_move_level();
    let before = level.clone();

    let _ = verify(&level);

    assert_eq!(level, before);
}
