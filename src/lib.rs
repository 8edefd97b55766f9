pub use cgmath;
pub use clock::{Clock, ManualClock, SystemClock};
pub use control::{
    Action, Command, Controller, ControllerConfig, ControllerState, LaneFrame, RawLaneSummary,
    StoppingZoneSighting, TaskKey,
};
pub use dispatch::{ChannelSink, CommandSink, Dispatcher, LogSink, WriterSink};
pub use error::{ConfigError, GeometryError, ParseCommandError, SinkError};
pub use follower::LaneFollower;
pub use schedule::{TaskId, TaskQueue};
pub use util::Interval;

pub mod clock;
pub mod control;
pub mod dispatch;
pub mod error;
mod follower;
pub mod math;
pub mod schedule;
mod util;
