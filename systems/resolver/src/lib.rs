#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure move resolution for directional slides.
//!
//! Given immutable views of the board, [`resolve`] computes how far the
//! anchored block set may travel toward a direction and what stops it. The
//! system performs no mutation; callers feed the result back to the world as
//! an `ApplyMove` command.

use gridlock_core::{BlockView, Direction, GridOffset, GridPos, MoveOutcome, OccupancyView};

enum Stop {
    Block,
    Side,
}

/// Computes the outcome of sliding every anchored block toward `direction`.
///
/// Two passes over the anchored blocks: the first finds the nearest free
/// block along any anchored ray (stopping one cell short), the second finds
/// the nearest board edge, never overriding an equal-or-smaller block limit.
/// When no free blocks remain, landing the whole set exactly on
/// `win_pattern` takes precedence over both, at whatever distance achieves
/// it. With no anchored block at all the result falls back to `HitSide` at
/// the swept maximum distance.
#[must_use]
pub fn resolve(
    direction: Direction,
    blocks: &BlockView,
    occupancy: OccupancyView<'_>,
    win_pattern: &[GridPos],
) -> MoveOutcome {
    let (width, height) = occupancy.dimensions();
    let max_move = width.max(height);
    let mut limit = max_move.saturating_sub(1).max(0);
    let mut stop = Stop::Side;
    let free_blocks = blocks.free_count();
    let offset = direction.offset();

    // Block-collision pass: only the first free block along each ray counts.
    for block in blocks.iter().filter(|snapshot| snapshot.anchored) {
        for step in 1..max_move {
            let probe = block.position.translated(offset.scaled(step));
            if !occupancy.in_bounds(probe) {
                break;
            }
            let Some(occupant) = occupancy.occupant(probe) else {
                continue;
            };
            let occupant_free = blocks
                .get(occupant)
                .map_or(false, |snapshot| !snapshot.anchored);
            if occupant_free {
                if step - 1 < limit {
                    limit = step - 1;
                    stop = Stop::Block;
                }
                break;
            }
        }
    }

    // Edge-collision pass: an equal-distance tie keeps the block outcome.
    let mut has_anchored = false;
    for block in blocks.iter().filter(|snapshot| snapshot.anchored) {
        has_anchored = true;
        for step in 1..max_move {
            let probe = block.position.translated(offset.scaled(step));
            if !occupancy.in_bounds(probe) {
                if limit >= step {
                    limit = step - 1;
                    stop = Stop::Side;
                }
                break;
            }
        }
    }

    // Arriving exactly on the win pattern beats stopping at a block or a
    // side, even when the qualifying distance differs from the collision
    // limit. Only reachable once every block is anchored.
    if has_anchored && free_blocks == 0 {
        let mut solution = None;
        for step in 1..max_move {
            if pattern_complete(blocks, win_pattern, offset.scaled(step)) {
                solution = Some(step);
            }
        }
        if let Some(step) = solution {
            return MoveOutcome::HitSolution {
                distance: u32::try_from(step).unwrap_or(0),
            };
        }
    }

    let distance = u32::try_from(limit).unwrap_or(0);
    match stop {
        Stop::Block => MoveOutcome::HitBlock { distance },
        Stop::Side => MoveOutcome::HitSide { distance },
    }
}

fn pattern_complete(blocks: &BlockView, win_pattern: &[GridPos], offset: GridOffset) -> bool {
    blocks
        .iter()
        .all(|snapshot| win_pattern.contains(&snapshot.position.translated(offset)))
}

#[cfg(test)]
mod tests {
    use gridlock_core::{BlockId, BlockSnapshot, BlockView, Direction, GridPos, OccupancyView};

    use super::{pattern_complete, resolve};
    use gridlock_core::MoveOutcome;

    fn view_of(snapshots: Vec<BlockSnapshot>) -> BlockView {
        BlockView::from_snapshots(snapshots)
    }

    fn snapshot(id: u32, x: i32, y: i32, anchored: bool) -> BlockSnapshot {
        BlockSnapshot {
            id: BlockId::new(id),
            position: GridPos::new(x, y),
            anchored,
        }
    }

    fn cells_for(width: i32, height: i32, snapshots: &[BlockSnapshot]) -> Vec<Option<BlockId>> {
        let mut cells = vec![None; (width * height) as usize];
        for snapshot in snapshots {
            let index = (snapshot.position.y() * width + snapshot.position.x()) as usize;
            cells[index] = Some(snapshot.id);
        }
        cells
    }

    #[test]
    fn pattern_complete_requires_every_block_on_a_cell() {
        let blocks = view_of(vec![snapshot(0, 0, 0, true), snapshot(1, 1, 0, true)]);
        let pattern = [GridPos::new(1, 0), GridPos::new(2, 0)];

        assert!(pattern_complete(
            &blocks,
            &pattern,
            Direction::East.offset(),
        ));
        assert!(!pattern_complete(
            &blocks,
            &pattern,
            Direction::East.offset().scaled(2),
        ));
    }

    #[test]
    fn no_anchored_blocks_fall_back_to_the_swept_maximum() {
        let snapshots = vec![snapshot(0, 1, 0, false)];
        let cells = cells_for(4, 1, &snapshots);
        let blocks = view_of(snapshots);

        let outcome = resolve(
            Direction::East,
            &blocks,
            OccupancyView::new(&cells, 4, 1),
            &[],
        );

        assert_eq!(outcome, MoveOutcome::HitSide { distance: 3 });
    }

    #[test]
    fn scanning_continues_past_anchored_neighbours() {
        // Two anchored blocks in file; the rear one sees the free block
        // through its anchored companion.
        let snapshots = vec![
            snapshot(0, 0, 0, true),
            snapshot(1, 1, 0, true),
            snapshot(2, 3, 0, false),
        ];
        let cells = cells_for(6, 1, &snapshots);
        let blocks = view_of(snapshots);

        let outcome = resolve(
            Direction::East,
            &blocks,
            OccupancyView::new(&cells, 6, 1),
            &[],
        );

        assert_eq!(outcome, MoveOutcome::HitBlock { distance: 1 });
    }
}
