//! Load a replay log, walk it at a fixed playback rate and print a summary.
//!
//! ```text
//! RUST_LOG=echo_replay_core=debug cargo run --example replay_summary -- match.echoreplay
//! ```

use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};
use chrono::Duration;
use echo_replay_core::{Game, Playhead, TeamColor};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let path = std::env::args()
        .nth(1)
        .context("usage: replay_summary <file.echoreplay>")?;
    let file = File::open(&path).with_context(|| format!("failed to open {path}"))?;
    let mut game = Game::from_reader(BufReader::new(file))?;
    let loaded = game.frame_count();

    let start = game.first_timestamp()?;
    let end = game.last_timestamp()?;
    let mut head = Playhead::new();
    let mut at = start;
    let mut ticks = 0usize;
    while at <= end {
        head.sample(&mut game, at)?;
        ticks += 1;
        at += Duration::milliseconds(1000 / 60);
    }

    let surviving = game.materialize_all()?;
    println!("{path}: {surviving} of {loaded} lines are arena frames");
    println!("span {} .. {} ({ticks} playback ticks at 60 Hz)", start, end);

    let last = game.get_frame(surviving - 1)?;
    println!(
        "final: {} blue {} - orange {}",
        last.game_status, last.blue_points, last.orange_points
    );
    for color in [TeamColor::Blue, TeamColor::Orange] {
        if let Some(team) = last.team(color) {
            println!("\n{}", team.team);
            if let Some(stats) = &team.stats {
                println!("{stats}");
            }
        }
    }
    Ok(())
}
