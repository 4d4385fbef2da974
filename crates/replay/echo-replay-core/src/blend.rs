//! Snapshot blending: synthesize match state between two recorded ticks.
//!
//! Per-field rules:
//! - continuous numbers (game clock, every 3-vector) interpolate linearly,
//!   3-vectors through [`Vec3::from_stored`](crate::vec3::Vec3::from_stored);
//! - discrete fields (ids, names, status, flags, scores, stats) hold the
//!   `from` value;
//! - optional substructures are absent when either side is absent, except a
//!   roster missing only on `to`, which keeps `from`'s roster;
//! - teams and rosters blend by position up to the longer length, copying the
//!   side that has an entry when only one does. No identity matching: a roster
//!   reorder between two ticks blends unrelated players.

use chrono::NaiveDateTime;

use crate::model::{DiscState, Playspace, PlayerState, Snapshot, TeamState};
use crate::transform;
use crate::vec3::{lerp_f32, lerp_stored_opt};

/// Structural blend of two values of the same type at weight `t` in `[0, 1]`.
pub trait Blend: Sized {
    fn blend(from: &Self, to: &Self, t: f32) -> Self;
}

/// Discrete field: the most recent recorded value wins.
#[inline]
fn hold<T: Clone>(from: &T) -> T {
    from.clone()
}

/// Blend two optional substructures; absence on either side stays absent.
#[inline]
pub fn blend_opt<T: Blend>(from: Option<&T>, to: Option<&T>, t: f32) -> Option<T> {
    match (from, to) {
        (Some(a), Some(b)) => Some(T::blend(a, b, t)),
        _ => None,
    }
}

/// Blend two ordered collections by index up to the longer length.
pub fn blend_positional<T: Blend + Clone>(from: &[T], to: &[T], t: f32) -> Vec<T> {
    let len = from.len().max(to.len());
    let mut out = Vec::with_capacity(len);
    for idx in 0..len {
        match (from.get(idx), to.get(idx)) {
            (Some(a), Some(b)) => out.push(T::blend(a, b, t)),
            (Some(a), None) => out.push(a.clone()),
            (None, Some(b)) => out.push(b.clone()),
            (None, None) => {}
        }
    }
    out
}

fn seconds(d: chrono::Duration) -> f64 {
    match d.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => d.num_seconds() as f64,
    }
}

/// Position of `at` between `from` and `to`, clamped into `[0, 1]`.
/// Degenerate or reversed spans yield 0.
pub fn blend_ratio(from: NaiveDateTime, to: NaiveDateTime, at: NaiveDateTime) -> f32 {
    let span = seconds(to - from);
    if span <= 0.0 {
        return 0.0;
    }
    let r = seconds(at - from) / span;
    (r as f32).clamp(0.0, 1.0)
}

/// Blend two snapshots at the instant `at`.
///
/// Returns `from` when both share a timestamp, and clamps to the endpoint
/// snapshots outside `(from.timestamp, to.timestamp)`; there is no extrapolation.
pub fn blend(from: &Snapshot, to: &Snapshot, at: NaiveDateTime) -> Snapshot {
    if from.timestamp == to.timestamp {
        return from.clone();
    }
    if at <= from.timestamp {
        return from.clone();
    }
    if at >= to.timestamp {
        return to.clone();
    }

    let t = blend_ratio(from.timestamp, to.timestamp, at);

    Snapshot {
        timestamp: at,
        source: None,

        disc: blend_opt(from.disc.as_ref(), to.disc.as_ref(), t),
        session_id: hold(&from.session_id),
        session_ip: hold(&from.session_ip),
        game_status: hold(&from.game_status),
        game_clock_display: hold(&from.game_clock_display),
        game_clock: lerp_f32(from.game_clock, to.game_clock, t),
        match_type: hold(&from.match_type),
        map_name: hold(&from.map_name),
        client_name: hold(&from.client_name),
        playspace: blend_opt(from.playspace.as_ref(), to.playspace.as_ref(), t),
        orange_points: from.orange_points,
        blue_points: from.blue_points,
        private_match: from.private_match,
        tournament_match: from.tournament_match,
        blue_team_restart_request: from.blue_team_restart_request,
        orange_team_restart_request: from.orange_team_restart_request,
        possession: hold(&from.possession),
        last_score: hold(&from.last_score),
        teams: blend_positional(&from.teams, &to.teams, t),
    }
}

/// Blend two possibly-missing snapshots. A missing side yields the other one
/// unchanged (or `None` when both are missing).
pub fn blend_frames(
    from: Option<&Snapshot>,
    to: Option<&Snapshot>,
    at: NaiveDateTime,
) -> Option<Snapshot> {
    match (from, to) {
        (Some(a), Some(b)) => Some(blend(a, b, at)),
        (Some(a), None) => Some(a.clone()),
        (None, Some(b)) => Some(b.clone()),
        (None, None) => None,
    }
}

impl Blend for DiscState {
    fn blend(from: &Self, to: &Self, t: f32) -> Self {
        DiscState {
            position: lerp_stored_opt(from.position, to.position, t),
            forward: lerp_stored_opt(from.forward, to.forward, t),
            left: lerp_stored_opt(from.left, to.left, t),
            up: lerp_stored_opt(from.up, to.up, t),
            velocity: lerp_stored_opt(from.velocity, to.velocity, t),
            bounce_count: from.bounce_count,
        }
    }
}

impl Blend for Playspace {
    fn blend(from: &Self, to: &Self, t: f32) -> Self {
        Playspace {
            vr_left: lerp_stored_opt(from.vr_left, to.vr_left, t),
            vr_position: lerp_stored_opt(from.vr_position, to.vr_position, t),
            vr_forward: lerp_stored_opt(from.vr_forward, to.vr_forward, t),
            vr_up: lerp_stored_opt(from.vr_up, to.vr_up, t),
        }
    }
}

impl Blend for TeamState {
    fn blend(from: &Self, to: &Self, t: f32) -> Self {
        // A roster missing on `to` is an empty team at that tick; keep `from`'s.
        let players = match (&from.players, &to.players) {
            (Some(a), Some(b)) => Some(blend_positional(a, b, t)),
            (Some(a), None) => Some(a.clone()),
            (None, _) => None,
        };
        TeamState {
            players,
            team: hold(&from.team),
            possession: from.possession,
            stats: hold(&from.stats),
        }
    }
}

impl Blend for PlayerState {
    fn blend(from: &Self, to: &Self, t: f32) -> Self {
        PlayerState {
            player_id: from.player_id,
            name: hold(&from.name),
            user_id: from.user_id,
            number: from.number,
            level: from.level,
            ping: from.ping,
            stats: hold(&from.stats),
            stunned: from.stunned,
            invulnerable: from.invulnerable,
            blocking: from.blocking,
            possession: from.possession,

            head: transform::blend_opt(from.head.as_ref(), to.head.as_ref(), t),
            body: transform::blend_opt(from.body.as_ref(), to.body.as_ref(), t),
            right_hand: transform::blend_opt(from.right_hand.as_ref(), to.right_hand.as_ref(), t),
            left_hand: transform::blend_opt(from.left_hand.as_ref(), to.left_hand.as_ref(), t),
            velocity: lerp_stored_opt(from.velocity, to.velocity, t),

            position: lerp_stored_opt(from.position, to.position, t),
            forward: lerp_stored_opt(from.forward, to.forward, t),
            left: lerp_stored_opt(from.left, to.left, t),
            up: lerp_stored_opt(from.up, to.up, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transform;
    use chrono::NaiveDate;

    fn at(ms: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 3, 28)
            .and_then(|d| d.and_hms_opt(20, 0, 0))
            .unwrap()
            + chrono::Duration::milliseconds(ms)
    }

    fn player(id: i32, x: f32) -> PlayerState {
        PlayerState {
            player_id: id,
            body: Some(Transform::point([x, 0.0, 0.0])),
            velocity: Some([x, 0.0, 0.0]),
            ..PlayerState::default()
        }
    }

    #[test]
    fn ratio_clamps_and_handles_degenerate_spans() {
        assert_eq!(blend_ratio(at(0), at(100), at(25)), 0.25);
        assert_eq!(blend_ratio(at(0), at(100), at(-50)), 0.0);
        assert_eq!(blend_ratio(at(0), at(100), at(500)), 1.0);
        assert_eq!(blend_ratio(at(100), at(100), at(100)), 0.0);
        assert_eq!(blend_ratio(at(100), at(0), at(50)), 0.0);
    }

    #[test]
    fn positional_blend_copies_unmatched_tail() {
        let a = vec![player(0, 0.0)];
        let b = vec![player(0, 10.0), player(1, 5.0)];
        let out = blend_positional(&a, &b, 0.5);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].body.as_ref().unwrap().position, Some([5.0, 0.0, 0.0]));
        assert_eq!(out[1], b[1]);

        let out = blend_positional(&b, &a, 0.5);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1], b[1]);
    }

    #[test]
    fn player_discrete_fields_hold_from() {
        let mut a = player(7, 0.0);
        a.name = "ace".into();
        a.stunned = true;
        let mut b = player(9, 4.0);
        b.name = "deuce".into();
        let r = PlayerState::blend(&a, &b, 0.75);
        assert_eq!(r.player_id, 7);
        assert_eq!(r.name, "ace");
        assert!(r.stunned);
        assert_eq!(r.velocity, Some([3.0, 0.0, 0.0]));
    }

    #[test]
    fn missing_roster_keeps_from_side() {
        let a = TeamState {
            players: Some(vec![player(0, 0.0)]),
            ..TeamState::default()
        };
        let b = TeamState::default();
        assert_eq!(TeamState::blend(&a, &b, 0.5).players, a.players);
        assert_eq!(TeamState::blend(&b, &a, 0.5).players, None);
    }

    #[test]
    fn disc_basis_absent_when_one_side_lacks_it() {
        let a = DiscState {
            position: Some([0.0, 0.0, 0.0]),
            forward: Some([0.0, 0.0, 1.0]),
            velocity: Some([0.0, 0.0, 0.0]),
            bounce_count: 2,
            ..DiscState::default()
        };
        let b = DiscState {
            position: Some([2.0, 2.0, 2.0]),
            velocity: Some([4.0, 0.0, 0.0]),
            bounce_count: 3,
            ..DiscState::default()
        };
        let r = DiscState::blend(&a, &b, 0.5);
        assert_eq!(r.position, Some([1.0, 1.0, 1.0]));
        assert_eq!(r.forward, None);
        assert_eq!(r.velocity, Some([2.0, 0.0, 0.0]));
        assert_eq!(r.bounce_count, 2);
    }

    #[test]
    fn blend_frames_with_missing_endpoint() {
        let a = Snapshot {
            timestamp: at(0),
            ..Snapshot::default()
        };
        assert_eq!(blend_frames(Some(&a), None, at(50)), Some(a.clone()));
        assert_eq!(blend_frames(None, Some(&a), at(50)), Some(a.clone()));
        assert_eq!(blend_frames(None, None, at(50)), None);
    }

    #[test]
    fn blended_snapshot_is_stamped_with_query_time() {
        let a = Snapshot {
            timestamp: at(0),
            game_clock: 100.0,
            source: Some("{}".into()),
            ..Snapshot::default()
        };
        let b = Snapshot {
            timestamp: at(1000),
            game_clock: 99.0,
            ..Snapshot::default()
        };
        let r = blend(&a, &b, at(500));
        assert_eq!(r.timestamp, at(500));
        assert_eq!(r.game_clock, 99.5);
        assert_eq!(r.source, None);
    }
}
