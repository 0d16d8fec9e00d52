#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level-authoring session.
//!
//! Authoring runs backwards: the author lays out the win pattern, the session
//! spawns one anchored block per pattern cell, and every recorded move walks
//! the blocks *away* from the pattern. Replaying the recording in reverse
//! with each direction negated is then guaranteed to walk them back, which
//! is exactly what the verifier checks. After every edit the draft is
//! re-validated on a scratch clone and rolled back if the recording no
//! longer replays onto the pattern.

use std::error::Error;
use std::fmt;

use gridlock_core::{
    BlockView, Command, Direction, Event, GridPos, Level, LevelError, StartBlock,
};
use gridlock_system_verifier::{replay_to_pattern, verify};
use gridlock_world::{apply, query, World};

/// Result of a [`Editor::record_move`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveRecord {
    /// The move continued the current run; no new solution entry was added.
    Extended,
    /// The move started a new run and was appended to the solution.
    Recorded,
    /// The move was rolled back; the draft is unchanged.
    Rejected,
}

/// Reasons an editing operation cannot proceed.
#[derive(Debug)]
pub enum EditError {
    /// Recording cannot begin before any win cell has been placed.
    EmptyPattern,
    /// The operation requires an active recording session.
    NotRecording,
    /// The draft level failed its final verification replay.
    Unsolvable,
    /// The exported definition failed level validation.
    InvalidLevel(LevelError),
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPattern => write!(f, "win pattern is empty"),
            Self::NotRecording => write!(f, "no recording session is active"),
            Self::Unsolvable => write!(f, "recorded solution does not solve the level"),
            Self::InvalidLevel(reason) => write!(f, "exported level is invalid: {reason}"),
        }
    }
}

impl Error for EditError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidLevel(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Interactive level-authoring session over a draft world.
#[derive(Clone, Debug)]
pub struct Editor {
    width: i32,
    height: i32,
    pattern: Vec<GridPos>,
    draft: World,
    solution: Vec<Direction>,
    run: Option<Direction>,
    recording: bool,
}

impl Editor {
    /// Opens a session for a board of the given dimensions.
    pub fn new(width: i32, height: i32) -> Result<Self, LevelError> {
        if width <= 0 || height <= 0 {
            return Err(LevelError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            pattern: Vec::new(),
            draft: World::new(),
            solution: Vec::new(),
            run: None,
            recording: false,
        })
    }

    /// Adds or removes a win cell while laying out the pattern.
    ///
    /// Returns whether the pattern changed; out-of-bounds cells and calls
    /// made after recording has begun change nothing.
    pub fn toggle_pattern_cell(&mut self, cell: GridPos) -> bool {
        if self.recording || !cell.in_bounds(self.width, self.height) {
            return false;
        }
        if let Some(index) = self.pattern.iter().position(|&existing| existing == cell) {
            let _ = self.pattern.remove(index);
        } else {
            self.pattern.push(cell);
        }
        true
    }

    /// Starts (or restarts) recording from the assembled win pattern.
    ///
    /// One anchored block is spawned on every pattern cell and any previous
    /// recording is discarded.
    pub fn begin_recording(&mut self) -> Result<(), EditError> {
        if self.pattern.is_empty() {
            return Err(EditError::EmptyPattern);
        }
        let layout: Vec<StartBlock> = self
            .pattern
            .iter()
            .map(|&cell| StartBlock::new(cell, true))
            .collect();
        self.draft = World::from_layout(self.width, self.height, &layout);
        self.solution.clear();
        self.run = None;
        self.recording = true;
        Ok(())
    }

    /// Releases the anchored block on `cell`, leaving it behind as a free
    /// block for subsequent moves to collide with.
    ///
    /// At least one anchored block must remain, so the last one can never be
    /// released. Releasing a block ends the current run; the next recorded
    /// move starts a new solution entry.
    pub fn unstick_block(&mut self, cell: GridPos) -> bool {
        if !self.recording {
            return false;
        }
        let view = query::block_view(&self.draft);
        let anchored = view.iter().filter(|snapshot| snapshot.anchored).count();
        let on_cell = view
            .iter()
            .any(|snapshot| snapshot.position == cell && snapshot.anchored);
        if !on_cell || anchored <= 1 {
            return false;
        }

        let layout: Vec<StartBlock> = view
            .iter()
            .map(|snapshot| {
                StartBlock::new(
                    snapshot.position,
                    snapshot.anchored && snapshot.position != cell,
                )
            })
            .collect();
        self.draft = World::from_layout(self.width, self.height, &layout);
        self.run = None;
        true
    }

    /// Walks the anchored set one cell toward `direction` and records it.
    ///
    /// A direction matching the current run extends it without a new
    /// solution entry; any other direction appends one. The draft is then
    /// validated by replaying the recording on a scratch clone; an edit that
    /// no longer replays onto the pattern is rolled back and reported as
    /// [`MoveRecord::Rejected`].
    pub fn record_move(&mut self, direction: Direction) -> MoveRecord {
        if !self.recording {
            return MoveRecord::Rejected;
        }
        let extending = self.run == Some(direction);
        if !self.nudge(direction) {
            return MoveRecord::Rejected;
        }
        if !extending {
            self.solution.push(direction);
        }

        if self.draft_replays() {
            self.run = Some(direction);
            if extending {
                MoveRecord::Extended
            } else {
                MoveRecord::Recorded
            }
        } else {
            let _ = self.nudge(direction.opposite());
            if !extending {
                let _ = self.solution.pop();
            }
            MoveRecord::Rejected
        }
    }

    /// Exports the draft as a validated, verified [`Level`].
    ///
    /// The current block layout becomes the level's start layout; the level
    /// is verified once more before being handed out.
    pub fn finish(&self) -> Result<Level, EditError> {
        if !self.recording {
            return Err(EditError::NotRecording);
        }
        let start_blocks: Vec<StartBlock> = query::block_view(&self.draft)
            .iter()
            .map(|snapshot| StartBlock::new(snapshot.position, snapshot.anchored))
            .collect();
        let level = Level::new(
            self.width,
            self.height,
            start_blocks,
            self.pattern.clone(),
            self.solution.clone(),
        )
        .map_err(EditError::InvalidLevel)?;
        if !verify(&level) {
            return Err(EditError::Unsolvable);
        }
        Ok(level)
    }

    /// Win cells placed so far.
    #[must_use]
    pub fn pattern(&self) -> &[GridPos] {
        &self.pattern
    }

    /// Moves recorded so far, in authoring order.
    #[must_use]
    pub fn solution(&self) -> &[Direction] {
        &self.solution
    }

    /// Snapshot of the draft block layout, for host rendering.
    #[must_use]
    pub fn block_view(&self) -> BlockView {
        query::block_view(&self.draft)
    }

    fn nudge(&mut self, direction: Direction) -> bool {
        let mut events = Vec::new();
        apply(
            &mut self.draft,
            Command::NudgeAnchored { direction },
            &mut events,
        );
        !matches!(events.last(), Some(Event::NudgeRejected { .. }))
    }

    fn draft_replays(&self) -> bool {
        let mut scratch = self.draft.clone();
        replay_to_pattern(&mut scratch, &self.solution, &self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use gridlock_core::{Direction, GridPos};

    use super::{Editor, MoveRecord};

    #[test]
    fn toggling_the_same_cell_twice_clears_it() {
        let mut editor = Editor::new(4, 4).expect("valid dimensions");

        assert!(editor.toggle_pattern_cell(GridPos::new(1, 1)));
        assert!(editor.toggle_pattern_cell(GridPos::new(1, 1)));
        assert!(editor.pattern().is_empty());
    }

    #[test]
    fn toggling_out_of_bounds_changes_nothing() {
        let mut editor = Editor::new(4, 4).expect("valid dimensions");

        assert!(!editor.toggle_pattern_cell(GridPos::new(4, 0)));
        assert!(editor.pattern().is_empty());
    }

    #[test]
    fn recording_requires_a_pattern() {
        let mut editor = Editor::new(4, 4).expect("valid dimensions");

        assert!(editor.begin_recording().is_err());
    }

    #[test]
    fn same_direction_extends_the_run() {
        let mut editor = Editor::new(5, 1).expect("valid dimensions");
        assert!(editor.toggle_pattern_cell(GridPos::new(0, 0)));
        editor.begin_recording().expect("pattern placed");

        assert_eq!(editor.record_move(Direction::East), MoveRecord::Recorded);
        assert_eq!(editor.record_move(Direction::East), MoveRecord::Extended);
        assert_eq!(editor.solution(), [Direction::East]);
    }

    #[test]
    fn nudging_off_the_board_is_rejected() {
        let mut editor = Editor::new(3, 1).expect("valid dimensions");
        assert!(editor.toggle_pattern_cell(GridPos::new(0, 0)));
        editor.begin_recording().expect("pattern placed");

        assert_eq!(editor.record_move(Direction::West), MoveRecord::Rejected);
        assert!(editor.solution().is_empty());
    }

    #[test]
    fn the_last_anchored_block_cannot_be_released() {
        let mut editor = Editor::new(3, 3).expect("valid dimensions");
        assert!(editor.toggle_pattern_cell(GridPos::new(1, 1)));
        editor.begin_recording().expect("pattern placed");

        assert!(!editor.unstick_block(GridPos::new(1, 1)));
    }
}
