//! Snapshot data model: one recorded tick of arena match state.
//!
//! Field names follow the recording's JSON. Every substructure that a
//! recording may omit is an `Option` so absence survives parsing and blending.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::transform::{deserialize_lenient, Transform};
use crate::vec3::Vec3;

/// Reconstructed match state at one instant.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    /// Time of this frame as written in the replay line (or the query instant
    /// for a blended snapshot).
    #[serde(skip)]
    pub timestamp: NaiveDateTime,
    /// Original JSON payload, kept for pass-through. Blended snapshots have none.
    #[serde(skip)]
    pub source: Option<Arc<str>>,

    pub disc: Option<DiscState>,
    #[serde(rename = "sessionid")]
    pub session_id: String,
    #[serde(rename = "sessionip")]
    pub session_ip: String,
    /// pre_match, round_start, playing, score, round_over, pre_sudden_death,
    /// sudden_death, post_sudden_death, post_match
    pub game_status: String,
    pub game_clock_display: String,
    /// Seconds remaining in the round.
    pub game_clock: f32,
    pub match_type: String,
    pub map_name: String,
    /// Name of the account that recorded the replay.
    pub client_name: String,
    /// Tracking space of the recording client.
    #[serde(rename = "player")]
    pub playspace: Option<Playspace>,
    pub orange_points: i32,
    pub blue_points: i32,
    #[serde(deserialize_with = "deserialize_flag")]
    pub private_match: bool,
    #[serde(deserialize_with = "deserialize_flag")]
    pub tournament_match: bool,
    #[serde(deserialize_with = "deserialize_flag")]
    pub blue_team_restart_request: bool,
    #[serde(deserialize_with = "deserialize_flag")]
    pub orange_team_restart_request: bool,
    /// `[team, player]` currently holding the disc.
    pub possession: Vec<i32>,
    pub last_score: Option<LastScore>,
    pub teams: Vec<TeamState>,
}

impl Snapshot {
    #[inline]
    pub fn source_json(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Team at the conventional position for `color`.
    #[inline]
    pub fn team(&self, color: TeamColor) -> Option<&TeamState> {
        self.teams.get(color as usize)
    }

    /// All players across all teams, in team then roster order.
    pub fn players(&self) -> impl Iterator<Item = &PlayerState> {
        self.teams
            .iter()
            .flat_map(|t| t.players.iter().flatten())
    }
}

/// Team slots in recording order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamColor {
    Blue = 0,
    Orange = 1,
    Spectator = 2,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscState {
    pub position: Option<[f32; 3]>,
    pub forward: Option<[f32; 3]>,
    pub left: Option<[f32; 3]>,
    pub up: Option<[f32; 3]>,
    pub velocity: Option<[f32; 3]>,
    pub bounce_count: i32,
}

impl DiscState {
    #[inline]
    pub fn position_vec3(&self) -> Option<Vec3> {
        self.position.map(Vec3::from_stored)
    }
}

/// VR tracking space of the recording client.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Playspace {
    pub vr_left: Option<[f32; 3]>,
    pub vr_position: Option<[f32; 3]>,
    pub vr_forward: Option<[f32; 3]>,
    pub vr_up: Option<[f32; 3]>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamState {
    /// Roster; recordings omit it for empty teams.
    pub players: Option<Vec<PlayerState>>,
    pub team: String,
    #[serde(deserialize_with = "deserialize_flag")]
    pub possession: bool,
    pub stats: Option<Stats>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerState {
    #[serde(rename = "playerid")]
    pub player_id: i32,
    pub name: String,
    #[serde(rename = "userid")]
    pub user_id: i64,
    pub number: i32,
    pub level: i32,
    pub ping: i32,
    pub stats: Option<Stats>,
    #[serde(deserialize_with = "deserialize_flag")]
    pub stunned: bool,
    #[serde(deserialize_with = "deserialize_flag")]
    pub invulnerable: bool,
    #[serde(deserialize_with = "deserialize_flag")]
    pub blocking: bool,
    #[serde(deserialize_with = "deserialize_flag")]
    pub possession: bool,

    #[serde(
        deserialize_with = "deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub head: Option<Transform>,
    #[serde(
        deserialize_with = "deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub body: Option<Transform>,
    #[serde(
        rename = "rhand",
        deserialize_with = "deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub right_hand: Option<Transform>,
    #[serde(
        rename = "lhand",
        deserialize_with = "deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub left_hand: Option<Transform>,
    pub velocity: Option<[f32; 3]>,

    // Flat head fields written by older recordings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub up: Option<[f32; 3]>,
}

impl PlayerState {
    /// Head transform, synthesized from the flat legacy fields when the
    /// recording predates the `head` object.
    pub fn head_or_legacy(&self) -> Option<Transform> {
        if let Some(head) = &self.head {
            return Some(head.clone());
        }
        let legacy = Transform {
            position: self.position,
            forward: self.forward,
            left: self.left,
            up: self.up,
        };
        if legacy.is_empty() {
            None
        } else {
            Some(legacy)
        }
    }

    /// Body position in engine space, falling back to the legacy flat position.
    pub fn position(&self) -> Option<Vec3> {
        self.body
            .as_ref()
            .and_then(Transform::position_vec3)
            .or_else(|| self.position.map(Vec3::from_stored))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub possession_time: f32,
    pub points: i32,
    pub goals: i32,
    pub saves: i32,
    pub stuns: i32,
    pub interceptions: i32,
    pub blocks: i32,
    pub passes: i32,
    pub catches: i32,
    pub steals: i32,
    pub assists: i32,
    pub shots_taken: i32,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Possession Time: {:.0}", self.possession_time)?;
        writeln!(f, "Points: {}", self.points)?;
        writeln!(f, "Goals: {}", self.goals)?;
        writeln!(f, "Saves: {}", self.saves)?;
        writeln!(f, "Stuns: {}", self.stuns)?;
        writeln!(f, "Assists: {}", self.assists)?;
        write!(f, "Shots Taken: {}", self.shots_taken)
    }
}

/// Details of the most recent goal.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LastScore {
    pub disc_speed: f32,
    pub team: String,
    pub goal_type: String,
    pub point_amount: i32,
    pub distance_thrown: f32,
    pub person_scored: String,
    pub assist_scored: String,
}

/// Flags are written as JSON booleans by current recordings and as 0/1 by
/// older ones.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFlag {
        Bool(bool),
        Int(i64),
    }

    Ok(match RawFlag::deserialize(deserializer)? {
        RawFlag::Bool(b) => b,
        RawFlag::Int(n) => n != 0,
    })
}
