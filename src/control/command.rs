use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ParseCommandError;

/// A message for the actuator side.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Turn the wheel to a signed rudder percentage. The actuator clamps it.
    SetWheel(f64),
    /// Brake after passing a stopping zone.
    Brake,
    /// Emergency stop.
    Stop,
    /// Informational message.
    Log(String),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SetWheel(percentage) => write!(f, "setwheel:{}", percentage),
            Command::Brake => f.write_str("speed:brake"),
            Command::Stop => f.write_str("speed:stop"),
            Command::Log(text) => write!(f, "log:{}", text),
        }
    }
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseCommandError(s.to_owned());
        let (tag, payload) = s.split_once(':').ok_or_else(invalid)?;
        match (tag, payload) {
            ("setwheel", pct) => pct.trim().parse().map(Command::SetWheel).map_err(|_| invalid()),
            ("speed", "brake") => Ok(Command::Brake),
            ("speed", "stop") => Ok(Command::Stop),
            ("log", text) => Ok(Command::Log(text.to_owned())),
            _ => Err(invalid()),
        }
    }
}

/// Identifies a scheduled task by the event that created it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskKey {
    /// The brake that follows passing a stopping zone.
    StoppingZoneBrake,
}

/// Something the controller wants done with a command.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Deliver as soon as possible, off the calling thread.
    Send(Command),
    /// Deliver after a delay unless cancelled first.
    Schedule {
        key: TaskKey,
        delay: Duration,
        command: Command,
    },
    /// Withdraw a scheduled command that has not fired yet.
    Cancel(TaskKey),
}
