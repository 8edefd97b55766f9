//! The steering and stopping-zone control loop.
//!
//! A [Controller] is fed one [LaneFrame] per processed video frame together
//! with the current time, and answers with the [Action]s to carry out. It
//! never reads a clock or talks to the actuator itself, so its behaviour is
//! fully determined by the frames and timestamps it is given.

use std::time::Duration;

use smallvec::SmallVec;

pub use command::{Action, Command, TaskKey};
pub use config::ControllerConfig;
pub use frame::{LaneFrame, RawLaneSummary, StoppingZoneSighting};

mod command;
mod config;
mod frame;

/// The actions produced by a single frame.
pub type Actions = SmallVec<[Action; 4]>;

/// Text of the periodic heartbeat message.
const HEARTBEAT_MESSAGE: &str = "lane controller connected";

/// The mutable state of a [Controller].
///
/// The two latches only ever go from `false` to `true`; clearing them takes a
/// new controller.
#[derive(Clone, Debug, PartialEq)]
pub struct ControllerState {
    /// When a lane angle was last seen.
    pub last_valid_angle_at: Duration,
    /// The angle used for the previous steering command.
    pub previous_angle: Option<f64>,
    /// The closest stopping zone entrance seen so far.
    pub min_zone_entrance: Option<f64>,
    /// When the last steering command was issued.
    pub last_command_at: Duration,
    /// When the last heartbeat was issued.
    pub last_heartbeat_at: Duration,
    /// The rudder percentage of the last steering command.
    pub last_rudder: f64,
    /// Set once a brake has been scheduled for a passed stopping zone.
    pub stopping_zone_detected: bool,
    /// Set once the emergency stop has been issued.
    pub emergency_stop: bool,
}

impl ControllerState {
    /// The state of a controller started at `now`.
    pub fn new(now: Duration) -> Self {
        Self {
            last_valid_angle_at: now,
            previous_angle: None,
            min_zone_entrance: None,
            last_command_at: now,
            last_heartbeat_at: now,
            last_rudder: 0.0,
            stopping_zone_detected: false,
            emergency_stop: false,
        }
    }
}

/// Turns lane frames into steering, brake and stop commands.
#[derive(Clone, Debug)]
pub struct Controller {
    config: ControllerConfig,
    state: ControllerState,
}

impl Controller {
    /// Creates a controller started at `now`.
    pub fn new(config: ControllerConfig, now: Duration) -> Self {
        Self::with_state(config, ControllerState::new(now))
    }

    /// Creates a controller resuming from the given state.
    pub fn with_state(config: ControllerConfig, state: ControllerState) -> Self {
        Self { config, state }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Whether the emergency stop has been issued.
    pub fn is_stopped(&self) -> bool {
        self.state.emergency_stop
    }

    /// Whether a brake has been scheduled for a passed stopping zone.
    pub fn stopping_zone_detected(&self) -> bool {
        self.state.stopping_zone_detected
    }

    /// The rudder percentage of the last steering command.
    pub fn last_rudder(&self) -> f64 {
        self.state.last_rudder
    }

    /// Processes one frame observed at `now`.
    ///
    /// The heartbeat, stopping zone and lost-lane checks run on every frame.
    /// A steering command is only produced once the command interval has
    /// passed since the previous one.
    pub fn process_frame(&mut self, now: Duration, frame: &LaneFrame) -> Actions {
        let mut actions = Actions::new();
        let angle = frame.angle.filter(|angle| !angle.is_nan());

        self.heartbeat(now, &mut actions);
        if let Some(distance) = frame.stopping_zone.entrance.filter(|d| *d > 0.0) {
            self.track_stopping_zone(distance, &mut actions);
        }
        self.check_lane_signal(now, angle, &mut actions);

        if elapsed(now, self.state.last_command_at) >= self.config.command_interval() {
            let rudder = self.rudder(angle);
            log::debug!("angle {:?} -> rudder {}", angle, rudder);
            actions.push(Action::Send(Command::SetWheel(rudder)));
            self.state.last_command_at = now;
            self.state.last_rudder = rudder;
            self.state.previous_angle = angle;
        }

        actions
    }

    /// Computes the rudder percentage for a lane angle, given the previous angle.
    ///
    /// While the lane keeps bending the same way but less than before, the
    /// wheel is centred to avoid overshooting.
    pub fn rudder(&self, angle: Option<f64>) -> f64 {
        let config = &self.config;
        let current = angle.unwrap_or(0.0);
        let raw = 100.0 * (current.abs() / config.full_scale_angle) * config.steering_gain;

        if let Some(previous) = self.state.previous_angle.filter(|p| *p != 0.0) {
            let flipped = (previous < 0.0 && current > 0.0) || (previous > 0.0 && current < 0.0);
            if !flipped && current.abs() < previous.abs() {
                return 0.0;
            }
        }

        if raw > 0.0 {
            if current > 0.0 {
                -raw * config.left_gain
            } else {
                raw * config.right_gain
            }
        } else {
            raw
        }
    }

    fn heartbeat(&mut self, now: Duration, actions: &mut Actions) {
        if elapsed(now, self.state.last_heartbeat_at) >= self.config.heartbeat_interval() {
            log::info!("{}", HEARTBEAT_MESSAGE);
            actions.push(Action::Send(Command::Log(HEARTBEAT_MESSAGE.to_owned())));
            self.state.last_heartbeat_at = now;
        }
    }

    /// Brakes once the zone entrance, having come within the near field,
    /// recedes again: the vehicle has just driven past it.
    fn track_stopping_zone(&mut self, distance: f64, actions: &mut Actions) {
        let min = match self.state.min_zone_entrance {
            Some(min) if min <= distance => min,
            _ => {
                log::debug!("new minimal distance to stopping zone: {}", distance);
                self.state.min_zone_entrance = Some(distance);
                distance
            }
        };

        if min < self.config.near_field_distance
            && distance - min > self.config.recession_distance
            && !self.state.stopping_zone_detected
        {
            log::info!(
                "passed stopping zone (closest {}, now {}), braking in {:?}",
                min,
                distance,
                self.config.brake_delay()
            );
            actions.push(Action::Schedule {
                key: TaskKey::StoppingZoneBrake,
                delay: self.config.brake_delay(),
                command: Command::Brake,
            });
            self.state.stopping_zone_detected = true;
        }
    }

    fn check_lane_signal(&mut self, now: Duration, angle: Option<f64>, actions: &mut Actions) {
        if angle.is_some() {
            self.state.last_valid_angle_at = now;
            return;
        }

        let lost_for = elapsed(now, self.state.last_valid_angle_at);
        if lost_for > self.config.no_signal_timeout() && !self.state.emergency_stop {
            log::warn!("no lane found for {:?}, emergency stop", lost_for);
            actions.push(Action::Send(Command::Stop));
            self.state.emergency_stop = true;
        }
    }
}

fn elapsed(now: Duration, since: Duration) -> Duration {
    now.saturating_sub(since)
}
