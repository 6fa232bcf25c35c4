use std::time::Duration;

use snake_portal_core::{Command, PlayerInput, Speed};
use snake_portal_system_pacing::{Config, Pacing};
use snake_portal_world::{apply, query, Config as SessionConfig, Session};

#[test]
fn zero_elapsed_time_releases_nothing() {
    let mut pacing = Pacing::default();
    assert_eq!(pacing.handle(Duration::ZERO, Speed::INITIAL), 0);
    assert_eq!(pacing.handle(Duration::ZERO, Speed::MAX), 0);
}

#[test]
fn one_second_at_initial_speed_is_about_ten_ticks() {
    let mut pacing = Pacing::new(Config::new(u32::MAX));
    let mut total = 0;
    for _ in 0..100 {
        total += pacing.handle(Duration::from_millis(10), Speed::INITIAL);
    }
    assert!((9..=10).contains(&total), "released {total} ticks");
}

#[test]
fn faster_speed_releases_more_ticks() {
    let mut slow = Pacing::new(Config::new(u32::MAX));
    let mut fast = Pacing::new(Config::new(u32::MAX));
    let mut slow_total = 0;
    let mut fast_total = 0;
    for _ in 0..200 {
        slow_total += slow.handle(Duration::from_millis(10), Speed::INITIAL);
        fast_total += fast.handle(Duration::from_millis(10), Speed::MAX);
    }
    assert!(fast_total > slow_total);
}

#[test]
fn stalled_frame_is_capped() {
    let mut pacing = Pacing::default();
    assert_eq!(pacing.handle(Duration::from_secs(3), Speed::MAX), 5);
    assert_eq!(pacing.handle(Duration::ZERO, Speed::MAX), 0);
}

#[test]
fn drives_a_session_at_its_own_speed() {
    let mut session = Session::new(SessionConfig::new(42));
    let mut pacing = Pacing::default();
    let mut events = Vec::new();
    apply(
        &mut session,
        Command::Input {
            input: PlayerInput::Start,
        },
        &mut events,
    );

    let frame = Duration::from_millis(16);
    let mut frames = 0;
    while query::snapshot(&session).tick_index < 5 && frames < 1_000 {
        let due = pacing.handle(frame, query::speed(&session));
        for _ in 0..due {
            apply(&mut session, Command::Tick, &mut events);
        }
        frames += 1;
    }

    assert_eq!(query::snapshot(&session).tick_index, 5);
    assert!(frames >= 5 * 100 / 16, "ticks arrived faster than the cadence");
}
