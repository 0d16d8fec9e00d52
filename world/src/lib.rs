#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board and block-set state for Gridlock.
//!
//! The world owns every [`Block`] instance; the board is a dense occupancy
//! grid of non-owning block identifiers. Bulk repositioning always clears the
//! grid and re-registers every block from its recorded position, so the two
//! never drift apart.

mod adhesion;

use gridlock_core::{
    BlockId, BoardError, Command, Event, GridOffset, GridPos, Level, PlacementError, StartBlock,
};

#[derive(Clone, Copy, Debug)]
struct Block {
    id: BlockId,
    position: GridPos,
    anchored: bool,
    /// Transient scratch flag owned by the adhesion pass; reset before each
    /// pass begins.
    visited: bool,
}

/// Represents the authoritative Gridlock board state.
#[derive(Clone, Debug)]
pub struct World {
    width: i32,
    height: i32,
    cells: Vec<Option<BlockId>>,
    blocks: Vec<Block>,
    next_block_id: BlockId,
}

impl World {
    /// Creates an empty world with no board configured.
    #[must_use]
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
            blocks: Vec::new(),
            next_block_id: BlockId::new(0),
        }
    }

    /// Instantiates a world holding the level's start layout.
    #[must_use]
    pub fn from_level(level: &Level) -> Self {
        Self::from_layout(level.width(), level.height(), level.start_blocks())
    }

    /// Instantiates a world from an explicit layout.
    ///
    /// Positions outside the board or already occupied are skipped, matching
    /// the placement command's rejection behaviour; validated levels never
    /// trigger either case.
    #[must_use]
    pub fn from_layout(width: i32, height: i32, layout: &[StartBlock]) -> Self {
        let mut world = Self::new();
        world.create_board(width.max(0), height.max(0));
        for start in layout {
            let _ = world.place_block(start.position(), start.anchored());
        }
        world
    }

    fn create_board(&mut self, width: i32, height: i32) {
        let capacity = usize::try_from(width).unwrap_or(0) * usize::try_from(height).unwrap_or(0);
        self.width = width;
        self.height = height;
        self.cells = vec![None; capacity];
        self.blocks.clear();
        self.next_block_id = BlockId::new(0);
    }

    fn place_block(&mut self, position: GridPos, anchored: bool) -> Result<BlockId, PlacementError> {
        let Some(index) = self.cell_index(position) else {
            return Err(PlacementError::OutOfBounds);
        };
        if self.cells[index].is_some() {
            return Err(PlacementError::Occupied);
        }

        let id = self.next_block_id;
        self.next_block_id = BlockId::new(id.get().wrapping_add(1));
        self.blocks.push(Block {
            id,
            position,
            anchored,
            visited: false,
        });
        self.cells[index] = Some(id);
        Ok(id)
    }

    /// Empties every cell without touching block identities.
    fn clear_cells(&mut self) {
        self.cells.fill(None);
    }

    /// Re-registers every block's cell from its recorded position.
    fn register_cells(&mut self) {
        for index in 0..self.blocks.len() {
            if let Some(cell) = self.cell_index(self.blocks[index].position) {
                self.cells[cell] = Some(self.blocks[index].id);
            }
        }
    }

    fn cell_index(&self, position: GridPos) -> Option<usize> {
        if !position.in_bounds(self.width, self.height) {
            return None;
        }
        let row = usize::try_from(position.y()).ok()?;
        let column = usize::try_from(position.x()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        Some(row * width + column)
    }

    fn block_index_at(&self, position: GridPos) -> Option<usize> {
        let id = self.cell_index(position).and_then(|index| self.cells[index])?;
        self.blocks.iter().position(|block| block.id == id)
    }

    fn nudge_anchored(&mut self, offset: GridOffset) -> bool {
        for index in 0..self.blocks.len() {
            if !self.blocks[index].anchored {
                continue;
            }
            let target = self.blocks[index].position.translated(offset);
            if !target.in_bounds(self.width, self.height) {
                return false;
            }
            // A free block in the way also blocks the nudge; anchored
            // occupants move along with the set.
            if let Some(occupant) = self.block_index_at(target) {
                if !self.blocks[occupant].anchored {
                    return false;
                }
            }
        }

        self.clear_cells();
        for block in &mut self.blocks {
            if block.anchored {
                block.position = block.position.translated(offset);
            }
        }
        self.register_cells();
        true
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::CreateBoard { width, height } => {
            if width <= 0 || height <= 0 {
                out_events.push(Event::BoardRejected {
                    reason: BoardError::InvalidDimensions,
                });
                return;
            }
            world.create_board(width, height);
            out_events.push(Event::BoardCreated { width, height });
        }
        Command::PlaceBlock { position, anchored } => match world.place_block(position, anchored)
        {
            Ok(block) => out_events.push(Event::BlockPlaced {
                block,
                position,
                anchored,
            }),
            Err(reason) => out_events.push(Event::PlacementRejected { position, reason }),
        },
        Command::NudgeAnchored { direction } => {
            if world.nudge_anchored(direction.offset()) {
                out_events.push(Event::BlocksMoved {
                    direction,
                    distance: 1,
                });
            } else {
                out_events.push(Event::NudgeRejected { direction });
            }
        }
        Command::ApplyMove {
            direction,
            distance,
        } => {
            let factor = i32::try_from(distance).unwrap_or(i32::MAX);
            let offset = direction.offset().scaled(factor);
            world.clear_cells();
            for block in &mut world.blocks {
                if block.anchored {
                    block.position = block.position.translated(offset);
                }
            }
            world.register_cells();
            out_events.push(Event::BlocksMoved {
                direction,
                distance,
            });
        }
        Command::PropagateAdhesion { direction } => {
            for (block, position) in adhesion::propagate(world, direction) {
                out_events.push(Event::BlockAnchored { block, position });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use gridlock_core::{
        BlockId, BlockSnapshot, BlockView, GridOffset, GridPos, HandleLookup, OccupancyView,
    };

    use super::World;

    /// Provides the board dimensions as `(width, height)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (i32, i32) {
        (world.width, world.height)
    }

    /// Reports whether the position lies on the configured board.
    #[must_use]
    pub fn in_bounds(world: &World, position: GridPos) -> bool {
        position.in_bounds(world.width, world.height)
    }

    /// Returns the block occupying the provided cell, if any.
    ///
    /// Out-of-bounds queries return `None` rather than an error.
    #[must_use]
    pub fn block_at(world: &World, position: GridPos) -> Option<BlockId> {
        world.cell_index(position).and_then(|index| world.cells[index])
    }

    /// Captures a read-only view of the blocks on the board.
    #[must_use]
    pub fn block_view(world: &World) -> BlockView {
        BlockView::from_snapshots(
            world
                .blocks
                .iter()
                .map(|block| BlockSnapshot {
                    id: block.id,
                    position: block.position,
                    anchored: block.anchored,
                })
                .collect(),
        )
    }

    /// Exposes a read-only view of the dense occupancy grid.
    #[must_use]
    pub fn occupancy_view(world: &World) -> OccupancyView<'_> {
        OccupancyView::new(&world.cells, world.width, world.height)
    }

    /// Number of blocks that are not currently anchored.
    #[must_use]
    pub fn free_block_count(world: &World) -> usize {
        world.blocks.iter().filter(|block| !block.anchored).count()
    }

    /// Reports whether every block, displaced by `offset`, sits on a pattern
    /// cell.
    ///
    /// With distinct block positions and a pattern the same size as the block
    /// set, membership of every displaced position implies an exact bijection.
    #[must_use]
    pub fn matches_pattern(world: &World, pattern: &[GridPos], offset: GridOffset) -> bool {
        world.blocks.iter().all(|block| {
            let displaced = block.position.translated(offset);
            pattern.iter().any(|&cell| cell == displaced)
        })
    }

    /// Pairs each block's current position with the host's visual handle.
    ///
    /// Blocks the host has not registered a handle for are skipped; the
    /// simulation never interprets the handle itself.
    #[must_use]
    pub fn visual_positions<'a, H>(world: &World, handles: &'a H) -> Vec<(&'a H::Handle, GridPos)>
    where
        H: HandleLookup,
    {
        world
            .blocks
            .iter()
            .filter_map(|block| {
                handles
                    .handle(block.id)
                    .map(|handle| (handle, block.position))
            })
            .collect()
    }
}
