//! Adhesion propagation used by the world crate.
//!
//! After a slide completes, every anchored block probes the cell chain ahead
//! of it; the first free block touched becomes anchored, and anchoring then
//! spreads through the whole 4-connected cluster of free blocks. The pass
//! uses each block's transient `visited` flag, reset on entry, so dense
//! clusters with adjacency cycles terminate after touching every block once.

use gridlock_core::{BlockId, Direction, GridPos};

use super::World;

/// Upper bound on the seeding ray scan, larger than any supported board edge.
const SCAN_LIMIT: i32 = 16;

/// Anchors free blocks contacted by the completed slide and returns the
/// blocks that changed, in the order they were anchored.
pub(crate) fn propagate(world: &mut World, direction: Direction) -> Vec<(BlockId, GridPos)> {
    for block in &mut world.blocks {
        block.visited = false;
    }

    let mut anchored = Vec::new();
    let mut work = Vec::new();
    let offset = direction.offset();

    // Seeding: the scan stops at the board edge, an empty cell, or the first
    // occupied cell, and only a free occupant is converted.
    for index in 0..world.blocks.len() {
        if !world.blocks[index].anchored || world.blocks[index].visited {
            continue;
        }
        let origin = world.blocks[index].position;
        for step in 1..SCAN_LIMIT {
            let probe = origin.translated(offset.scaled(step));
            if !probe.in_bounds(world.width, world.height) {
                break;
            }
            let Some(contact) = world.block_index_at(probe) else {
                break;
            };
            if !world.blocks[contact].anchored {
                anchor(world, contact, &mut anchored, &mut work);
            }
            break;
        }
    }

    // Transitive closure over 4-adjacent free blocks.
    while let Some(index) = work.pop() {
        let position = world.blocks[index].position;
        for side in Direction::ALL {
            let neighbour_cell = position.translated(side.offset());
            if !neighbour_cell.in_bounds(world.width, world.height) {
                continue;
            }
            let Some(neighbour) = world.block_index_at(neighbour_cell) else {
                continue;
            };
            if world.blocks[neighbour].anchored || world.blocks[neighbour].visited {
                continue;
            }
            anchor(world, neighbour, &mut anchored, &mut work);
        }
    }

    anchored
}

fn anchor(
    world: &mut World,
    index: usize,
    anchored: &mut Vec<(BlockId, GridPos)>,
    work: &mut Vec<usize>,
) {
    world.blocks[index].anchored = true;
    world.blocks[index].visited = true;
    anchored.push((world.blocks[index].id, world.blocks[index].position));
    work.push(index);
}
