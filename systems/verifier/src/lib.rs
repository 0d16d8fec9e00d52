#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Solution verification and difficulty scoring.
//!
//! A level's solution list records the moves made while authoring it, walking
//! away from the assembled win pattern. [`verify`] replays that list in
//! reverse with every direction negated on a scratch world, so a valid level
//! plays forward from its start layout onto the pattern. [`difficulty`] runs
//! the same replay while sampling how constrained each position is.

use gridlock_core::{Command, Direction, GridOffset, GridPos, Level, MoveOutcome};
use gridlock_system_resolver::resolve;
use gridlock_world::{apply, query, World};

/// Default weight applied per solution move when scoring difficulty.
pub const DEFAULT_MOVE_WEIGHT: u32 = 10;

/// Reports whether the level's recorded solution actually reaches its win
/// pattern from the start layout.
///
/// Runs entirely on a scratch world; no live state is touched.
#[must_use]
pub fn verify(level: &Level) -> bool {
    let mut world = World::from_level(level);
    replay_to_pattern(&mut world, level.solution(), level.win_pattern())
}

/// Replays the recorded solution in reverse, negated, against `world`.
///
/// Each replayed move is resolved first: hitting a side means the recording
/// no longer matches the board and the replay fails, while hitting the
/// solution completes the level early. Every other outcome is applied,
/// followed by an adhesion pass, exactly as live play would. With the list
/// exhausted the replay succeeds only if the blocks already sit on the
/// pattern, which makes an empty solution valid precisely when the start
/// layout is the win layout.
#[must_use]
pub fn replay_to_pattern(
    world: &mut World,
    solution: &[Direction],
    win_pattern: &[GridPos],
) -> bool {
    let mut events = Vec::new();
    for &recorded in solution.iter().rev() {
        let direction = recorded.opposite();
        let outcome = resolve(
            direction,
            &query::block_view(world),
            query::occupancy_view(world),
            win_pattern,
        );
        match outcome {
            MoveOutcome::HitSide { .. } => return false,
            MoveOutcome::HitSolution { .. } => return true,
            MoveOutcome::HitBlock { distance } => {
                apply(
                    world,
                    Command::ApplyMove {
                        direction,
                        distance,
                    },
                    &mut events,
                );
                apply(world, Command::PropagateAdhesion { direction }, &mut events);
            }
        }
    }
    query::matches_pattern(world, win_pattern, GridOffset::ZERO)
}

/// Scores the level with the default per-move weight.
///
/// Returns `None` when the recorded solution does not solve the level.
#[must_use]
pub fn difficulty(level: &Level) -> Option<u32> {
    difficulty_with_weight(level, DEFAULT_MOVE_WEIGHT)
}

/// Scores the level by replaying its solution and weighing each position.
///
/// The base score is the solution length times `move_weight`. On top of that,
/// every replayed move contributes its travel distance multiplied by the
/// number of directions that would have ended in a block or solution stop
/// from the same position; positions with many productive directions demand
/// more search from a player. Returns `None` when the replay fails.
#[must_use]
pub fn difficulty_with_weight(level: &Level, move_weight: u32) -> Option<u32> {
    let mut world = World::from_level(level);
    let mut events = Vec::new();
    let mut travel = 0u32;
    let mut solved = false;

    for &recorded in level.solution().iter().rev() {
        let direction = recorded.opposite();
        let outcome = resolve(
            direction,
            &query::block_view(&world),
            query::occupancy_view(&world),
            level.win_pattern(),
        );
        if matches!(outcome, MoveOutcome::HitSide { .. }) {
            return None;
        }
        travel = travel.saturating_add(
            outcome
                .distance()
                .saturating_mul(productive_directions(&world, level.win_pattern())),
        );
        if matches!(outcome, MoveOutcome::HitSolution { .. }) {
            solved = true;
            break;
        }
        apply(
            &mut world,
            Command::ApplyMove {
                direction,
                distance: outcome.distance(),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::PropagateAdhesion { direction },
            &mut events,
        );
    }

    if !solved && !query::matches_pattern(&world, level.win_pattern(), GridOffset::ZERO) {
        return None;
    }

    let moves = u32::try_from(level.solution().len()).unwrap_or(u32::MAX);
    Some(moves.saturating_mul(move_weight).saturating_add(travel))
}

/// Counts the directions that end against a block or on the solution rather
/// than sliding off to a side.
fn productive_directions(world: &World, win_pattern: &[GridPos]) -> u32 {
    let blocks = query::block_view(world);
    let mut count = 0;
    for direction in Direction::ALL {
        let outcome = resolve(
            direction,
            &blocks,
            query::occupancy_view(world),
            win_pattern,
        );
        if !matches!(outcome, MoveOutcome::HitSide { .. }) {
            count += 1;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use gridlock_core::{Direction, GridPos, Level, StartBlock};

    use super::{difficulty_with_weight, verify};

    #[test]
    fn empty_solution_is_valid_only_from_a_solved_start() {
        let solved = Level::new(
            3,
            1,
            vec![StartBlock::new(GridPos::new(1, 0), true)],
            vec![GridPos::new(1, 0)],
            Vec::new(),
        )
        .expect("valid level");
        let unsolved = Level::new(
            3,
            1,
            vec![StartBlock::new(GridPos::new(0, 0), true)],
            vec![GridPos::new(1, 0)],
            Vec::new(),
        )
        .expect("valid level");

        assert!(verify(&solved));
        assert!(!verify(&unsolved));
    }

    #[test]
    fn difficulty_scales_with_the_move_weight() {
        let level = Level::new(
            3,
            1,
            vec![StartBlock::new(GridPos::new(0, 0), true)],
            vec![GridPos::new(1, 0)],
            vec![Direction::West],
        )
        .expect("valid level");

        let cheap = difficulty_with_weight(&level, 1).expect("solvable");
        let steep = difficulty_with_weight(&level, 100).expect("solvable");

        assert!(steep > cheap);
        assert_eq!(steep - cheap, 99);
    }
}
