use echo_replay_core::{Game, LineId, ReplayConfig, ReplayError};
use echo_replay_test_fixtures::{arena, replays};

fn quiet() -> ReplayConfig {
    ReplayConfig {
        log_discards: false,
        ..ReplayConfig::default()
    }
}

/// it should keep exactly the lines that parse, in load order
#[test]
fn mixed_session_keeps_only_parseable_lines() {
    let lines = replays::lines("mixed-session").expect("load mixed-session fixture");
    assert_eq!(lines.len(), 8);

    let mut game = Game::with_config(lines, quiet());
    assert_eq!(game.frame_count(), 8);

    let survivors = game.materialize_all().expect("fixture has valid frames");
    // heartbeat, tab-less row, truncated json and bad timestamp are discarded
    assert_eq!(survivors, 4);
    assert_eq!(game.frame_count(), 4);
    assert_eq!(game.cached_count(), 4);

    let ids: Vec<LineId> = (0..game.frame_count())
        .map(|i| game.line_id(i).unwrap())
        .collect();
    assert_eq!(ids, vec![LineId(0), LineId(2), LineId(4), LineId(7)]);

    let statuses: Vec<String> = (0..4)
        .map(|i| game.get_frame(i).unwrap().game_status.clone())
        .collect();
    assert_eq!(statuses, ["playing", "playing", "score", "score"]);

    let mut last = None;
    for i in 0..4 {
        let ts = game.get_frame(i).unwrap().timestamp;
        if let Some(prev) = last {
            assert!(ts > prev, "frame {i} out of order");
        }
        last = Some(ts);
    }
}

/// it should parse the fixed-width timestamp on the first recorded line
#[test]
fn first_line_uses_fixed_width_timestamp() {
    let mut game = Game::load(replays::lines("mixed-session").unwrap());
    let first = game.get_frame(0).unwrap();
    let expected = echo_replay_core::parse_timestamp("2021/03/28 20:14:42.100").unwrap();
    assert_eq!(first.timestamp, expected);
    assert!(first.source_json().unwrap().len() > 800);
}

/// it should renumber later indices when a line is discarded mid-traversal
#[test]
fn lookup_after_discard_refers_to_next_survivor() {
    let mut game = Game::with_config(replays::lines("mixed-session").unwrap(), quiet());
    // index 1 is the heartbeat; the lookup lands on load-time line 2
    let frame = game.get_frame(1).unwrap();
    assert_eq!(frame.game_clock, 299.8);
    assert_eq!(game.line_id(1), Some(LineId(2)));
    assert_eq!(game.frame_count(), 7);
}

/// it should return the same snapshot on repeated access
#[test]
fn populated_slot_is_memoized() {
    let mut game = Game::with_config(replays::lines("mixed-session").unwrap(), quiet());
    let a = game.get_frame(0).unwrap().clone();
    let b = game.get_frame(0).unwrap().clone();
    assert_eq!(a, b);
    assert_eq!(game.cached_count(), 1);
}

/// it should fail with NoValidFrames once every line has been discarded
#[test]
fn file_without_arena_frames_is_exhausted() {
    let mut game = Game::with_config(replays::lines("no-arena-frames").unwrap(), quiet());
    assert_eq!(game.frame_count(), 3);
    assert_eq!(game.get_frame(0), Err(ReplayError::NoValidFrames));
    assert_eq!(game.frame_count(), 0);
    assert_eq!(game.materialize_all(), Err(ReplayError::NoValidFrames));
}

/// it should never abort on malformed rows interleaved with good ones
#[test]
fn malformed_rows_between_synthetic_frames() {
    let t0 = "2021/03/28 20:00:00.000";
    let t1 = "2021/03/28 20:00:00.100";
    let lines = vec![
        "only-one-field".to_string(),
        arena::line(t0, &arena::frame("playing", 10.0, [0.0, 0.0, 0.0], vec![])),
        "a\tb\tc".to_string(),
        arena::heartbeat_line(t0),
        arena::line(t1, &arena::frame("playing", 9.9, [1.0, 0.0, 0.0], vec![])),
    ];
    let n = lines.len();
    let mut game = Game::with_config(lines, quiet());
    let survivors = game.materialize_all().unwrap();
    assert_eq!(survivors, n - 3);
    assert_eq!(game.line_id(0), Some(LineId(1)));
    assert_eq!(game.line_id(1), Some(LineId(4)));
}

/// it should load from a buffered reader over the fixture file
#[test]
fn loads_from_reader() {
    let path = replays::path("mixed-session").unwrap();
    let file = std::fs::File::open(path).unwrap();
    let mut game = Game::from_reader(std::io::BufReader::new(file)).unwrap();
    assert_eq!(game.frame_count(), 8);
    let (a, b) = game.get_frame_pair(0).unwrap();
    assert_eq!(a.game_clock, 300.0);
    assert_eq!(b.map(|b| b.game_clock), Some(299.8));
}

/// it should list every recorded replay and load each of them
#[test]
fn every_manifest_replay_loads() {
    let mut keys = replays::keys();
    keys.sort();
    assert_eq!(keys, ["mixed-session", "no-arena-frames"]);
    for key in &keys {
        let game = Game::with_config(replays::lines(key).unwrap(), quiet());
        assert!(game.frame_count() > 0, "{key} is empty");
    }
}
