use approx::assert_relative_eq;
use chrono::Duration;
use echo_replay_core::{Game, Playhead, ReplayConfig};
use echo_replay_test_fixtures::replays;

/// it should step through a recording tick by tick, discarding bad rows on the way
#[test]
fn monotonic_playback_over_recording() {
    let mut game = Game::with_config(
        replays::lines("mixed-session").unwrap(),
        ReplayConfig {
            log_discards: false,
            ..ReplayConfig::default()
        },
    );
    let start = game.first_timestamp().unwrap();
    let end = game.last_timestamp().unwrap();
    assert_eq!((end - start).num_milliseconds(), 500);

    let mut head = Playhead::new();
    let mut clocks = Vec::new();
    let mut at = start;
    while at <= end {
        let snap = head.sample(&mut game, at).unwrap();
        clocks.push(snap.game_clock);
        at += Duration::milliseconds(50);
    }
    assert_eq!(clocks.len(), 11);
    assert_eq!(game.frame_count(), 4);

    // clock never runs backwards during monotonic playback
    for w in clocks.windows(2) {
        assert!(w[1] <= w[0] + 1e-4, "{} then {}", w[0], w[1]);
    }
    assert_relative_eq!(clocks[0], 300.0, epsilon = 1e-4);
    // halfway between the 100ms and 300ms ticks
    assert_relative_eq!(clocks[2], 299.9, epsilon = 1e-3);
    assert_relative_eq!(clocks[10], 299.4, epsilon = 1e-4);
}

/// it should hold `from` status across the playing/score boundary
#[test]
fn status_switches_only_at_recorded_tick() {
    let mut game = Game::load(replays::lines("mixed-session").unwrap());
    let start = game.first_timestamp().unwrap();
    let mut head = Playhead::new();

    let before = head
        .sample(&mut game, start + Duration::milliseconds(250))
        .unwrap();
    assert_eq!(before.game_status, "playing");

    let at_score = head
        .sample(&mut game, start + Duration::milliseconds(300))
        .unwrap();
    assert_eq!(at_score.game_status, "score");
}
