use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    replays: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Recorded replay logs listed under `replays` in `fixtures/manifest.json`.
pub mod replays {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.replays.keys().cloned().collect()
    }

    pub fn text(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.replays, "replay", name)?;
        read_to_string(rel)
    }

    pub fn lines(name: &str) -> Result<Vec<String>> {
        Ok(text(name)?.lines().map(str::to_string).collect())
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.replays, "replay", name)?;
        Ok(resolve_path(rel))
    }
}

/// Synthetic arena payloads for tests that need precise values.
pub mod arena {
    use serde_json::{json, Value as JsonValue};

    /// Payloads must be longer than this to count as arena data.
    pub const MIN_ARENA_PAYLOAD: usize = 800;

    pub fn stats(points: i64) -> JsonValue {
        json!({
            "possession_time": 0.0, "points": points, "goals": 0, "saves": 0,
            "stuns": 0, "interceptions": 0, "blocks": 0, "passes": 0,
            "catches": 0, "steals": 0, "assists": 0, "shots_taken": 0
        })
    }

    /// Player with an oriented body, oriented right hand and bare-point left hand.
    pub fn player(id: i64, name: &str, body: [f64; 3]) -> JsonValue {
        let [a, b, c] = body;
        json!({
            "playerid": id,
            "name": name,
            "userid": 4_000_000_000_i64 + id,
            "number": id,
            "level": 1,
            "ping": 30,
            "stunned": false,
            "invulnerable": false,
            "blocking": false,
            "possession": false,
            "stats": stats(0),
            "velocity": [0.0, 0.0, 0.0],
            "head": {
                "position": [a, b + 0.6, c],
                "forward": [0.0, 0.0, 1.0], "left": [1.0, 0.0, 0.0], "up": [0.0, 1.0, 0.0]
            },
            "body": {
                "position": [a, b, c],
                "forward": [0.0, 0.0, 1.0], "left": [1.0, 0.0, 0.0], "up": [0.0, 1.0, 0.0]
            },
            "rhand": {
                "pos": [a + 0.25, b, c],
                "forward": [0.0, 0.0, 1.0], "left": [1.0, 0.0, 0.0], "up": [0.0, 1.0, 0.0]
            },
            "lhand": [a - 0.25, b, c]
        })
    }

    pub fn team(name: &str, players: Vec<JsonValue>) -> JsonValue {
        json!({
            "team": name,
            "possession": false,
            "stats": stats(0),
            "players": players
        })
    }

    /// Full arena frame; `disc` and every vector are in stored axis order.
    pub fn frame(status: &str, clock: f64, disc: [f64; 3], teams: Vec<JsonValue>) -> JsonValue {
        json!({
            "disc": {
                "position": disc,
                "forward": [0.0, 0.0, 1.0], "left": [1.0, 0.0, 0.0], "up": [0.0, 1.0, 0.0],
                "velocity": [0.0, 0.0, 0.0],
                "bounce_count": 0
            },
            "sessionid": "00000000-0000-0000-0000-000000000000",
            "sessionip": "127.0.0.1",
            "game_status": status,
            "game_clock_display": format!("{clock:.2}"),
            "game_clock": clock,
            "match_type": "Echo_Arena",
            "map_name": "mpl_arena_a",
            "client_name": "fixture",
            "player": {
                "vr_left": [-1.0, 0.0, 0.0], "vr_position": [0.0, 0.0, 0.0],
                "vr_forward": [0.0, 0.0, 1.0], "vr_up": [0.0, 1.0, 0.0]
            },
            "orange_points": 0,
            "blue_points": 0,
            "private_match": false,
            "tournament_match": false,
            "blue_team_restart_request": false,
            "orange_team_restart_request": false,
            "possession": [0, 0],
            "teams": teams
        })
    }

    /// Serialize `payload` into a replay line, padding with trailing
    /// whitespace so it always clears the arena-data length filter.
    pub fn line(timestamp: &str, payload: &JsonValue) -> String {
        let json = payload.to_string();
        format!("{timestamp}\t{json:<width$}", width = MIN_ARENA_PAYLOAD + 1)
    }

    /// A non-gameplay tick that the length filter rejects.
    pub fn heartbeat_line(timestamp: &str) -> String {
        format!("{timestamp}\t{{\"err_code\":-6,\"err_description\":\"API only available during match\"}}")
    }
}
