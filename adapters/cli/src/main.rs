#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives headless Icebound matches.
//!
//! Everything here goes through the engine's public accessors; the board
//! is rendered from query snapshots alone.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use icebound_board::{query, Board};
use icebound_core::{ActorSlot, Flavor, GridPos, WELCOME_BANNER};
use icebound_persistence::SaveStore;
use icebound_session::{Match, MatchSetup};
use icebound_strategy::StrategyCatalog;

#[derive(Parser)]
#[command(name = "icebound", about = "Headless driver for the Icebound engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Runs a spectator match for a fixed number of ticks.
    Run {
        /// Built-in level number to play.
        #[arg(long, default_value_t = 1)]
        level: u32,
        /// Maximum ticks to simulate.
        #[arg(long, default_value_t = 400)]
        ticks: u64,
        /// Decision strategy steering the actor side.
        #[arg(long, default_value = "expert")]
        strategy: String,
        /// Seed for the match's random stream.
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Print the board every N ticks; 0 disables rendering.
        #[arg(long, default_value_t = 0)]
        render_every: u64,
    },
    /// Runs a short match, saves it, reloads it and verifies the round
    /// trip, then deletes the save.
    SaveDemo {
        /// Built-in level number to play.
        #[arg(long, default_value_t = 1)]
        level: u32,
        /// Save identifier to exercise.
        #[arg(long, default_value = "demo")]
        identifier: String,
        /// Save directory; a temp directory when unset.
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    match Cli::parse().command {
        Command::Run {
            level,
            ticks,
            strategy,
            seed,
            render_every,
        } => run(level, ticks, &strategy, seed, render_every),
        Command::SaveDemo {
            level,
            identifier,
            dir,
        } => save_demo(level, &identifier, dir),
    }
}

fn run(level: u32, ticks: u64, strategy: &str, seed: u64, render_every: u64) -> anyhow::Result<()> {
    println!("{WELCOME_BANNER}");
    let setup = MatchSetup::spectator(Flavor::Vanilla, strategy, seed);
    let mut game =
        Match::new(StrategyCatalog::standard(), setup).context("building the match")?;
    game.start_level(level).context("starting the level")?;

    let dt = Duration::from_millis(250);
    for tick in 1..=ticks {
        game.tick(dt);
        if render_every > 0 && tick % render_every == 0 {
            println!(
                "tick {tick}: score {}, {}s left",
                game.score(),
                game.remaining_time()
            );
            print!("{}", render(game.board()));
        }
        if game.state().is_terminal() {
            break;
        }
    }
    println!(
        "finished in {:?} after {} ticks (seed {}) with score {} and {}s left",
        game.state(),
        game.tick_index(),
        game.seed(),
        game.score(),
        game.remaining_time()
    );
    Ok(())
}

fn save_demo(level: u32, identifier: &str, dir: Option<PathBuf>) -> anyhow::Result<()> {
    let catalog = StrategyCatalog::standard();
    let setup = MatchSetup::spectator(Flavor::Chocolate, "hungry", 42);
    let mut game = Match::new(catalog.clone(), setup).context("building the match")?;
    game.start_level(level).context("starting the level")?;
    for _ in 0..50 {
        game.tick(Duration::from_millis(250));
        if game.state().is_terminal() {
            break;
        }
    }

    let root = dir.unwrap_or_else(|| std::env::temp_dir().join("icebound-saves"));
    let store = SaveStore::new(root);
    store.save(identifier, &game).context("saving the match")?;
    let loaded = store
        .load(identifier, &catalog)
        .context("loading the match back")?;
    anyhow::ensure!(
        loaded.snapshot() == game.snapshot(),
        "reloaded match differs from the saved one"
    );
    println!(
        "round trip verified for {identifier:?}: score {}, {}s left",
        loaded.score(),
        loaded.remaining_time()
    );
    store.delete(identifier).context("deleting the save")?;
    anyhow::ensure!(!store.exists(identifier), "save still exists after delete");
    println!("save {identifier:?} removed");
    Ok(())
}

/// Renders the board as one character per cell, top row first.
fn render(board: &Board) -> String {
    let (width, height) = query::dimensions(board);
    let mut rows = vec![vec!['.'; width.max(0) as usize]; height.max(0) as usize];
    let put = |rows: &mut Vec<Vec<char>>, pos: GridPos, glyph: char| {
        if pos.x() >= 0 && pos.x() < width && pos.y() >= 0 && pos.y() < height {
            rows[pos.y() as usize][pos.x() as usize] = glyph;
        }
    };

    for pos in query::obstacles(board) {
        put(&mut rows, *pos, '#');
    }
    for hazard in query::hazard_snapshots(board) {
        put(&mut rows, hazard.pos, if hazard.active { '~' } else { ',' });
    }
    for barrier in query::barrier_snapshots(board) {
        put(&mut rows, barrier.pos, '*');
    }
    for collectible in query::collectible_snapshots(board) {
        if !collectible.collected {
            put(&mut rows, collectible.pos, 'o');
        }
    }
    for hostile in query::hostile_snapshots(board) {
        if hostile.alive {
            put(&mut rows, hostile.pos, 'H');
        }
    }
    for actor in query::actor_snapshots(board) {
        if actor.alive {
            let glyph = match actor.slot {
                ActorSlot::Primary => 'P',
                ActorSlot::Secondary => 'S',
            };
            put(&mut rows, actor.pos, glyph);
        }
    }

    let mut out = String::new();
    for row in rows {
        out.extend(row);
        out.push('\n');
    }
    out
}
