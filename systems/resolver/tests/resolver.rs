use gridlock_core::{Command, Direction, GridPos, MoveOutcome, StartBlock};
use gridlock_system_resolver::resolve;
use gridlock_world::{apply, query, World};

fn resolve_on(world: &World, direction: Direction, win_pattern: &[GridPos]) -> MoveOutcome {
    resolve(
        direction,
        &query::block_view(world),
        query::occupancy_view(world),
        win_pattern,
    )
}

#[test]
fn lone_anchored_block_lands_on_the_win_pattern() {
    let world = World::from_layout(3, 1, &[StartBlock::new(GridPos::new(0, 0), true)]);
    let win_pattern = [GridPos::new(1, 0)];

    let outcome = resolve_on(&world, Direction::East, &win_pattern);

    assert_eq!(
        outcome,
        MoveOutcome::HitSolution { distance: 1 },
        "with zero free blocks the solution check decides the outcome",
    );
}

#[test]
fn block_on_the_edge_stops_immediately() {
    let world = World::from_layout(3, 1, &[StartBlock::new(GridPos::new(0, 0), true)]);
    let win_pattern = [GridPos::new(2, 0)];

    let outcome = resolve_on(&world, Direction::West, &win_pattern);

    assert_eq!(outcome, MoveOutcome::HitSide { distance: 0 });
}

#[test]
fn anchored_block_stops_one_cell_short_of_a_free_block() {
    let world = World::from_layout(
        5,
        1,
        &[
            StartBlock::new(GridPos::new(0, 0), true),
            StartBlock::new(GridPos::new(2, 0), false),
        ],
    );

    let outcome = resolve_on(&world, Direction::East, &[]);

    assert_eq!(outcome, MoveOutcome::HitBlock { distance: 1 });
}

#[test]
fn free_blocks_suppress_the_solution_outcome() {
    // A free block sits exactly on the pattern cell the anchored block would
    // reach, so the slide resolves as a collision, never a solution.
    let world = World::from_layout(
        4,
        1,
        &[
            StartBlock::new(GridPos::new(0, 0), true),
            StartBlock::new(GridPos::new(2, 0), false),
        ],
    );
    let win_pattern = [GridPos::new(1, 0), GridPos::new(2, 0)];

    let outcome = resolve_on(&world, Direction::East, &win_pattern);

    assert_eq!(outcome, MoveOutcome::HitBlock { distance: 1 });
}

#[test]
fn equal_distance_tie_prefers_the_block_collision() {
    // The rear block reaches the free block and the front block reaches the
    // east edge after the same single cell; the block outcome wins the tie.
    let world = World::from_layout(
        5,
        1,
        &[
            StartBlock::new(GridPos::new(0, 0), true),
            StartBlock::new(GridPos::new(3, 0), true),
            StartBlock::new(GridPos::new(2, 0), false),
        ],
    );

    let outcome = resolve_on(&world, Direction::East, &[]);

    assert_eq!(outcome, MoveOutcome::HitBlock { distance: 1 });
}

#[test]
fn solution_overrides_the_side_limit() {
    // The edge pass would let the pair slide three cells; landing on the
    // pattern after two takes precedence.
    let world = World::from_layout(
        5,
        1,
        &[
            StartBlock::new(GridPos::new(0, 0), true),
            StartBlock::new(GridPos::new(1, 0), true),
        ],
    );
    let win_pattern = [GridPos::new(2, 0), GridPos::new(3, 0)];

    let outcome = resolve_on(&world, Direction::East, &win_pattern);

    assert_eq!(outcome, MoveOutcome::HitSolution { distance: 2 });
}

#[test]
fn resolve_is_deterministic_for_identical_state() {
    let world = World::from_layout(
        6,
        4,
        &[
            StartBlock::new(GridPos::new(0, 1), true),
            StartBlock::new(GridPos::new(2, 1), false),
            StartBlock::new(GridPos::new(4, 3), false),
        ],
    );
    let win_pattern = [
        GridPos::new(5, 0),
        GridPos::new(5, 1),
        GridPos::new(5, 2),
    ];

    for direction in Direction::ALL {
        let first = resolve_on(&world, direction, &win_pattern);
        let second = resolve_on(&world, direction, &win_pattern);
        assert_eq!(first, second, "resolve must be a pure function of state");
    }
}

#[test]
fn resolve_never_mutates_the_world() {
    let mut world = World::from_layout(
        5,
        2,
        &[
            StartBlock::new(GridPos::new(0, 0), true),
            StartBlock::new(GridPos::new(3, 1), false),
        ],
    );
    let before = query::block_view(&world).into_vec();

    let _ = resolve_on(&world, Direction::East, &[GridPos::new(4, 0)]);

    assert_eq!(query::block_view(&world).into_vec(), before);

    // The resolved distance feeds straight into an ApplyMove command.
    let outcome = resolve_on(&world, Direction::East, &[]);
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::ApplyMove {
            direction: Direction::East,
            distance: outcome.distance(),
        },
        &mut events,
    );
    assert!(query::block_at(&world, GridPos::new(0, 0)).is_none());
}
