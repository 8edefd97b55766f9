//! Tests that drive a lane follower through whole frame sequences.

use std::time::Duration;

use crossbeam_channel::Receiver;
use lane_pilot::{ChannelSink, Command, ControllerConfig, LaneFollower, LaneFrame, ManualClock, RawLaneSummary};

const FRAME: Duration = Duration::from_millis(50);

fn follower() -> (ManualClock, LaneFollower, Receiver<Command>) {
    let clock = ManualClock::new();
    let (sink, rx) = ChannelSink::pair();
    let follower = LaneFollower::new(ControllerConfig::default(), clock.clone(), sink);
    (clock, follower, rx)
}

/// Collects delivered commands until `wanted` shows up.
fn wait_for(rx: &Receiver<Command>, wanted: &Command) -> Vec<Command> {
    let mut seen = vec![];
    while let Ok(command) = rx.recv_timeout(Duration::from_secs(2)) {
        let found = command == *wanted;
        seen.push(command);
        if found {
            break;
        }
    }
    seen
}

fn count(commands: &[Command], wanted: &Command) -> usize {
    commands.iter().filter(|c| *c == wanted).count()
}

/// Test that passing a stopping zone brakes once, after the brake delay.
#[test]
fn brakes_after_passing_stopping_zone() {
    let (clock, mut follower, rx) = follower();

    for distance in [150.0, 90.0, 60.0, 95.0] {
        clock.advance(FRAME);
        follower.process(&LaneFrame::with_angle(10.0).entrance_at(distance));
    }
    assert!(follower.controller().stopping_zone_detected());

    // Brake is due 1000 ms after the 95 frame at t = 200 ms.
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(count(&rx.try_iter().collect::<Vec<_>>(), &Command::Brake), 0);

    for distance in [130.0, 180.0, 240.0] {
        clock.advance(FRAME);
        follower.process(&LaneFrame::with_angle(10.0).entrance_at(distance));
    }
    clock.advance(Duration::from_millis(850));
    follower.process(&LaneFrame::with_angle(10.0));

    let seen = wait_for(&rx, &Command::Brake);
    assert_eq!(seen.last(), Some(&Command::Brake));

    assert_eq!(follower.shutdown(), 0);
    assert_eq!(count(&rx.iter().collect::<Vec<_>>(), &Command::Brake), 0);
}

/// Test that losing the lane stops the vehicle exactly once.
#[test]
fn lost_lane_stops_once() {
    let (clock, mut follower, rx) = follower();

    clock.advance(FRAME);
    follower.process(&LaneFrame::with_angle(-8.0));
    for _ in 0..60 {
        clock.advance(FRAME);
        follower.process_raw(RawLaneSummary {
            angle: 0.0,
            distance_to_stopping_zone: -1.0,
            distance_to_stopping_zone_end: -1.0,
            ..Default::default()
        });
    }
    assert!(follower.controller().is_stopped());

    follower.shutdown();
    let commands: Vec<_> = rx.iter().collect();
    assert_eq!(count(&commands, &Command::Stop), 1);
}

/// Test that steering commands are throttled however fast frames arrive.
#[test]
fn steering_is_rate_limited() {
    let (clock, mut follower, rx) = follower();

    for i in 0..100 {
        clock.advance(Duration::from_millis(10));
        let angle = if i % 3 == 0 { 12.0 } else { -18.0 };
        follower.process(&LaneFrame::with_angle(angle));
    }
    assert_eq!(follower.frames(), 100);

    follower.shutdown();
    let commands: Vec<_> = rx.iter().collect();
    let wheel = commands
        .iter()
        .filter(|c| matches!(c, Command::SetWheel(_)))
        .count();
    assert_eq!(wheel, 10);
    assert_eq!(
        count(&commands, &Command::Log("lane controller connected".into())),
        1
    );
}

/// Test that losing the lane after passing a stopping zone still brakes.
#[test]
fn lost_lane_after_zone_delivers_brake_and_stop() {
    let (clock, mut follower, rx) = follower();

    for distance in [90.0, 60.0, 95.0] {
        clock.advance(FRAME);
        follower.process(&LaneFrame::lost().entrance_at(distance));
    }
    assert!(follower.controller().stopping_zone_detected());

    for _ in 0..30 {
        clock.advance(FRAME);
        follower.process(&LaneFrame::lost());
    }
    assert!(follower.controller().is_stopped());

    let mut seen = wait_for(&rx, &Command::Brake);
    assert_eq!(follower.shutdown(), 0);
    seen.extend(rx.iter());
    assert_eq!(count(&seen, &Command::Brake), 1);
    assert_eq!(count(&seen, &Command::Stop), 1);
}
