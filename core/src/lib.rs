#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Gridlock engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for callers to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and never touch world state directly.

use std::collections::{HashMap, HashSet};
use std::{error::Error, fmt};

use serde::{Deserialize, Serialize};

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Configures the board with the provided dimensions, discarding blocks.
    CreateBoard {
        /// Number of cell columns laid out on the board.
        width: i32,
        /// Number of cell rows laid out on the board.
        height: i32,
    },
    /// Requests placement of a new block at the provided cell.
    PlaceBlock {
        /// Cell the block should occupy.
        position: GridPos,
        /// Whether the block participates in directional slides.
        anchored: bool,
    },
    /// Requests a single-cell move of all anchored blocks (editor authoring).
    NudgeAnchored {
        /// Direction of the attempted one-cell move.
        direction: Direction,
    },
    /// Translates every anchored block by `direction * distance`.
    ApplyMove {
        /// Direction the anchored blocks slide toward.
        direction: Direction,
        /// Number of cells the anchored blocks travel.
        distance: u32,
    },
    /// Anchors free blocks contacted by the anchored set after a move.
    PropagateAdhesion {
        /// Direction of the slide that just completed.
        direction: Direction,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the board was reconfigured.
    BoardCreated {
        /// Number of cell columns on the new board.
        width: i32,
        /// Number of cell rows on the new board.
        height: i32,
    },
    /// Reports that a board configuration request was rejected.
    BoardRejected {
        /// Specific reason the configuration failed.
        reason: BoardError,
    },
    /// Confirms that a block was placed on the board.
    BlockPlaced {
        /// Identifier allocated to the block by the world.
        block: BlockId,
        /// Cell the block occupies.
        position: GridPos,
        /// Whether the block was placed anchored.
        anchored: bool,
    },
    /// Reports that a block placement request was rejected.
    PlacementRejected {
        /// Cell provided in the placement request.
        position: GridPos,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that the anchored blocks translated across the board.
    BlocksMoved {
        /// Direction of the completed slide.
        direction: Direction,
        /// Number of cells the anchored blocks travelled.
        distance: u32,
    },
    /// Reports that a single-cell nudge would have left the board or run
    /// into a free block.
    NudgeRejected {
        /// Direction of the rejected nudge.
        direction: Direction,
    },
    /// Confirms that a free block became anchored through adhesion.
    BlockAnchored {
        /// Identifier of the block that became anchored.
        block: BlockId,
        /// Cell the block occupies.
        position: GridPos,
    },
}

/// Reasons a board configuration request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardError {
    /// The requested width or height was zero or negative.
    InvalidDimensions,
}

/// Reasons a block placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell lies outside the configured board bounds.
    OutOfBounds,
    /// The requested cell is already occupied by another block.
    Occupied,
}

/// Location of a single board cell expressed as signed coordinates.
///
/// Coordinates are signed so that positions stepped past the board edge
/// remain representable during ray scans; such positions always fail
/// [`GridPos::in_bounds`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridPos {
    x: i32,
    y: i32,
}

impl GridPos {
    /// Creates a new cell position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the position displaced by the provided offset.
    #[must_use]
    pub const fn translated(self, offset: GridOffset) -> Self {
        Self::new(self.x + offset.dx(), self.y + offset.dy())
    }

    /// Reports whether the position lies within a board of the given size.
    #[must_use]
    pub const fn in_bounds(self, width: i32, height: i32) -> bool {
        self.x >= 0 && self.y >= 0 && self.x < width && self.y < height
    }
}

/// Displacement between two cell positions measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridOffset {
    dx: i32,
    dy: i32,
}

impl GridOffset {
    /// The zero displacement.
    pub const ZERO: GridOffset = GridOffset::new(0, 0);

    /// Creates a new displacement from explicit components.
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Horizontal component of the displacement.
    #[must_use]
    pub const fn dx(&self) -> i32 {
        self.dx
    }

    /// Vertical component of the displacement.
    #[must_use]
    pub const fn dy(&self) -> i32 {
        self.dy
    }

    /// Returns the displacement scaled by a whole-cell factor.
    #[must_use]
    pub const fn scaled(self, factor: i32) -> Self {
        Self::new(self.dx * factor, self.dy * factor)
    }
}

/// Cardinal directions an anchored block set may slide toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing y coordinates.
    North,
    /// Movement toward increasing x coordinates.
    East,
    /// Movement toward decreasing y coordinates.
    South,
    /// Movement toward decreasing x coordinates.
    West,
}

impl Direction {
    /// All four compass directions in scanning order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit displacement associated with the direction.
    #[must_use]
    pub const fn offset(self) -> GridOffset {
        match self {
            Direction::North => GridOffset::new(0, 1),
            Direction::East => GridOffset::new(1, 0),
            Direction::South => GridOffset::new(0, -1),
            Direction::West => GridOffset::new(-1, 0),
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
}

/// Unique identifier assigned to a block by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(u32);

impl BlockId {
    /// Creates a new block identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Classifies how far a directional slide travels and what stops it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveOutcome {
    /// Sliding stopped because the anchored set reached a free block.
    HitBlock {
        /// Number of cells travelled before stopping.
        distance: u32,
    },
    /// Sliding stopped because an anchored block would leave the board.
    HitSide {
        /// Number of cells travelled before stopping.
        distance: u32,
    },
    /// Sliding this far places every block exactly on the win pattern.
    HitSolution {
        /// Number of cells travelled to land on the pattern.
        distance: u32,
    },
}

impl MoveOutcome {
    /// Number of cells the anchored set travels under this outcome.
    #[must_use]
    pub const fn distance(&self) -> u32 {
        match self {
            MoveOutcome::HitBlock { distance }
            | MoveOutcome::HitSide { distance }
            | MoveOutcome::HitSolution { distance } => *distance,
        }
    }
}

/// Initial placement of a single block within a level's start layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StartBlock {
    position: GridPos,
    anchored: bool,
}

impl StartBlock {
    /// Creates a new start-layout entry.
    #[must_use]
    pub const fn new(position: GridPos, anchored: bool) -> Self {
        Self { position, anchored }
    }

    /// Cell the block occupies when the level begins.
    #[must_use]
    pub const fn position(&self) -> GridPos {
        self.position
    }

    /// Whether the block begins the level anchored.
    #[must_use]
    pub const fn anchored(&self) -> bool {
        self.anchored
    }
}

/// Immutable definition of a playable level.
///
/// Construction validates the invariants the simulation relies on, so a
/// `Level` value in hand is always well formed. The storage format of
/// persisted levels is a host concern; this type only carries the data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    width: i32,
    height: i32,
    start_blocks: Vec<StartBlock>,
    win_pattern: Vec<GridPos>,
    solution: Vec<Direction>,
}

impl Level {
    /// Validates and constructs a level definition.
    ///
    /// Rejects non-positive dimensions, a win pattern whose size differs from
    /// the start layout, duplicate start positions or win cells, and any
    /// position outside the board.
    pub fn new(
        width: i32,
        height: i32,
        start_blocks: Vec<StartBlock>,
        win_pattern: Vec<GridPos>,
        solution: Vec<Direction>,
    ) -> Result<Self, LevelError> {
        if width <= 0 || height <= 0 {
            return Err(LevelError::InvalidDimensions { width, height });
        }
        if win_pattern.len() != start_blocks.len() {
            return Err(LevelError::PatternSizeMismatch {
                blocks: start_blocks.len(),
                pattern: win_pattern.len(),
            });
        }

        let mut seen = HashSet::new();
        for block in &start_blocks {
            if !block.position().in_bounds(width, height) {
                return Err(LevelError::StartBlockOutOfBounds(block.position()));
            }
            if !seen.insert(block.position()) {
                return Err(LevelError::DuplicateStartPosition(block.position()));
            }
        }

        seen.clear();
        for &cell in &win_pattern {
            if !cell.in_bounds(width, height) {
                return Err(LevelError::WinCellOutOfBounds(cell));
            }
            if !seen.insert(cell) {
                return Err(LevelError::DuplicateWinCell(cell));
            }
        }

        Ok(Self {
            width,
            height,
            start_blocks,
            win_pattern,
            solution,
        })
    }

    /// Number of cell columns on the board.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Number of cell rows on the board.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Initial block layout the level starts from.
    #[must_use]
    pub fn start_blocks(&self) -> &[StartBlock] {
        &self.start_blocks
    }

    /// Target cells that complete the level once exactly occupied.
    #[must_use]
    pub fn win_pattern(&self) -> &[GridPos] {
        &self.win_pattern
    }

    /// Directions recorded while authoring the level.
    ///
    /// Replaying the list in reverse with each direction negated walks the
    /// assembled pattern back to the start layout, which is how the verifier
    /// confirms solvability.
    #[must_use]
    pub fn solution(&self) -> &[Direction] {
        &self.solution
    }
}

/// Reasons a level definition fails validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelError {
    /// Width or height was zero or negative.
    InvalidDimensions {
        /// Requested board width.
        width: i32,
        /// Requested board height.
        height: i32,
    },
    /// The win pattern and the start layout have different sizes.
    PatternSizeMismatch {
        /// Number of blocks in the start layout.
        blocks: usize,
        /// Number of cells in the win pattern.
        pattern: usize,
    },
    /// Two start blocks share the same cell.
    DuplicateStartPosition(GridPos),
    /// The win pattern names the same cell twice.
    DuplicateWinCell(GridPos),
    /// A start block lies outside the board.
    StartBlockOutOfBounds(GridPos),
    /// A win cell lies outside the board.
    WinCellOutOfBounds(GridPos),
}

impl fmt::Display for LevelError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::InvalidDimensions { width, height } => {
                write!(formatter, "invalid board dimensions {width}x{height}")
            }
            LevelError::PatternSizeMismatch { blocks, pattern } => write!(
                formatter,
                "win pattern holds {pattern} cells but the layout holds {blocks} blocks",
            ),
            LevelError::DuplicateStartPosition(position) => write!(
                formatter,
                "two start blocks occupy ({}, {})",
                position.x(),
                position.y(),
            ),
            LevelError::DuplicateWinCell(position) => write!(
                formatter,
                "win cell ({}, {}) appears twice",
                position.x(),
                position.y(),
            ),
            LevelError::StartBlockOutOfBounds(position) => write!(
                formatter,
                "start block ({}, {}) lies outside the board",
                position.x(),
                position.y(),
            ),
            LevelError::WinCellOutOfBounds(position) => write!(
                formatter,
                "win cell ({}, {}) lies outside the board",
                position.x(),
                position.y(),
            ),
        }
    }
}

impl Error for LevelError {}

/// Immutable representation of a single block's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockSnapshot {
    /// Unique identifier assigned to the block.
    pub id: BlockId,
    /// Cell currently occupied by the block.
    pub position: GridPos,
    /// Whether the block currently participates in directional slides.
    pub anchored: bool,
}

/// Read-only snapshot describing all blocks on the board.
#[derive(Clone, Debug, Default)]
pub struct BlockView {
    snapshots: Vec<BlockSnapshot>,
}

impl BlockView {
    /// Creates a new block view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<BlockSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured block snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &BlockSnapshot> {
        self.snapshots.iter()
    }

    /// Retrieves the snapshot captured for the provided identifier.
    #[must_use]
    pub fn get(&self, id: BlockId) -> Option<&BlockSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Number of blocks captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Number of captured blocks that are not anchored.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.snapshots
            .iter()
            .filter(|snapshot| !snapshot.anchored)
            .count()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<BlockSnapshot> {
        self.snapshots
    }
}

/// Read-only view into the dense cell occupancy grid.
#[derive(Clone, Copy, Debug)]
pub struct OccupancyView<'a> {
    cells: &'a [Option<BlockId>],
    width: i32,
    height: i32,
}

impl<'a> OccupancyView<'a> {
    /// Captures a new occupancy view backed by the provided cell slice.
    ///
    /// The slice is row-major with `width * height` entries.
    #[must_use]
    pub fn new(cells: &'a [Option<BlockId>], width: i32, height: i32) -> Self {
        Self {
            cells,
            width,
            height,
        }
    }

    /// Returns the block occupying the provided cell, if any.
    ///
    /// Out-of-bounds queries return `None` rather than an error; ray scans
    /// rely on bounds checks being cheap and total.
    #[must_use]
    pub fn occupant(&self, position: GridPos) -> Option<BlockId> {
        self.index(position)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    /// Reports whether the cell holds no block.
    #[must_use]
    pub fn is_free(&self, position: GridPos) -> bool {
        self.occupant(position).is_none()
    }

    /// Reports whether the position lies on the board.
    #[must_use]
    pub const fn in_bounds(&self, position: GridPos) -> bool {
        position.in_bounds(self.width, self.height)
    }

    /// Provides the dimensions of the underlying board.
    #[must_use]
    pub const fn dimensions(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn index(&self, position: GridPos) -> Option<usize> {
        if !self.in_bounds(position) {
            return None;
        }
        let row = usize::try_from(position.y()).ok()?;
        let column = usize::try_from(position.x()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        Some(row * width + column)
    }
}

/// Host-supplied association between blocks and opaque visual handles.
///
/// The simulation never interprets the handle; it only pairs handles with
/// positions so a host can refresh rendered blocks after a move or an
/// adhesion pass.
pub trait HandleLookup {
    /// Opaque handle the host associates with a rendered block.
    type Handle;

    /// Retrieves the handle registered for the provided block, if any.
    fn handle(&self, block: BlockId) -> Option<&Self::Handle>;
}

impl<H> HandleLookup for HashMap<BlockId, H> {
    type Handle = H;

    fn handle(&self, block: BlockId) -> Option<&H> {
        self.get(&block)
    }
}
