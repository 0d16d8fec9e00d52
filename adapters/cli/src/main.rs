#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for the Gridlock simulation core.
//!
//! Authors a bundled demo level through the editor session, verifies and
//! scores it, and replays its solution step by step. Levels can also be
//! exchanged as single-line transfer codes.

mod level_transfer;

use anyhow::{bail, ensure, Context};
use clap::{Parser, Subcommand};
use gridlock_core::{Command, Direction, Event, GridOffset, GridPos, Level, MoveOutcome};
use gridlock_system_editor::{Editor, MoveRecord};
use gridlock_system_resolver::resolve;
use gridlock_system_verifier::{difficulty_with_weight, verify, DEFAULT_MOVE_WEIGHT};
use gridlock_world::{apply, query, World};

/// Command-line interface for the Gridlock simulation core.
#[derive(Parser)]
#[command(name = "gridlock")]
struct Cli {
    #[command(subcommand)]
    action: Option<Action>,
}

#[derive(Subcommand)]
enum Action {
    /// Author the bundled demo level, verify it, and replay its solution.
    Demo {
        /// Weight applied per recorded move when scoring difficulty.
        #[arg(long, default_value_t = DEFAULT_MOVE_WEIGHT)]
        move_weight: u32,
    },
    /// Print the bundled demo level as a transfer code.
    Export,
    /// Decode a transfer code and verify the level it carries.
    Verify {
        /// Transfer code produced by `export`.
        code: String,
    },
}

/// Entry point for the Gridlock command-line interface.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.action.unwrap_or(Action::Demo {
        move_weight: DEFAULT_MOVE_WEIGHT,
    }) {
        Action::Demo { move_weight } => run_demo(move_weight),
        Action::Export => {
            let level = demo_level()?;
            println!("{}", level_transfer::encode(&level));
            Ok(())
        }
        Action::Verify { code } => {
            let level = level_transfer::decode(&code)?;
            ensure!(verify(&level), "level does not verify");
            let score = difficulty_with_weight(&level, DEFAULT_MOVE_WEIGHT)
                .context("verified level must score")?;
            println!("level verifies, difficulty {score}");
            Ok(())
        }
    }
}

fn run_demo(move_weight: u32) -> anyhow::Result<()> {
    let level = demo_level()?;
    println!(
        "demo level: {}x{} board, {} blocks, {} recorded moves",
        level.width(),
        level.height(),
        level.start_blocks().len(),
        level.solution().len(),
    );

    ensure!(verify(&level), "bundled level failed verification");
    let score =
        difficulty_with_weight(&level, move_weight).context("bundled level must score")?;
    println!("difficulty: {score}");

    replay(&level)?;
    println!("transfer code: {}", level_transfer::encode(&level));
    Ok(())
}

/// Authors the bundled level the way a user would: lay out the win pattern,
/// walk the blocks away from it, leave one behind as a free block.
fn demo_level() -> anyhow::Result<Level> {
    let mut editor = Editor::new(5, 1)?;
    ensure!(editor.toggle_pattern_cell(GridPos::new(3, 0)));
    ensure!(editor.toggle_pattern_cell(GridPos::new(4, 0)));
    editor.begin_recording()?;

    ensure!(editor.record_move(Direction::West) == MoveRecord::Recorded);
    ensure!(editor.unstick_block(GridPos::new(3, 0)));
    ensure!(editor.record_move(Direction::West) == MoveRecord::Recorded);
    ensure!(editor.record_move(Direction::West) == MoveRecord::Extended);

    Ok(editor.finish()?)
}

/// Plays the level forward from its start layout, printing every resolved
/// move and adhesion capture.
fn replay(level: &Level) -> anyhow::Result<()> {
    let mut world = World::from_level(level);
    let mut events = Vec::new();

    for (index, &recorded) in level.solution().iter().rev().enumerate() {
        let direction = recorded.opposite();
        let outcome = resolve(
            direction,
            &query::block_view(&world),
            query::occupancy_view(&world),
            level.win_pattern(),
        );
        println!("move {}: slide {direction:?} -> {outcome:?}", index + 1);

        match outcome {
            MoveOutcome::HitSide { .. } => bail!("replay slid off the board"),
            MoveOutcome::HitSolution { .. } => {
                println!("solved");
                return Ok(());
            }
            MoveOutcome::HitBlock { distance } => {
                apply(
                    &mut world,
                    Command::ApplyMove {
                        direction,
                        distance,
                    },
                    &mut events,
                );
                apply(
                    &mut world,
                    Command::PropagateAdhesion { direction },
                    &mut events,
                );
                for event in events.drain(..) {
                    if let Event::BlockAnchored { position, .. } = event {
                        println!("  adhesion anchored the block at {position:?}");
                    }
                }
            }
        }
    }

    ensure!(
        query::matches_pattern(&world, level.win_pattern(), GridOffset::ZERO),
        "replay missed the win pattern",
    );
    println!("solved");
    Ok(())
}
