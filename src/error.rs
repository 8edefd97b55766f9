//! Error types.

use thiserror::Error;

/// Which end of a line a point belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    A,
    B,
}

/// Which coordinate axis a value refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Failures of the geometry primitives.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("line endpoint {0:?} is missing")]
    MissingPoint(Endpoint),

    #[error("a line needs exactly 4 coordinates, got {0}")]
    CoordinateCount(usize),

    #[error("line has zero length")]
    DegenerateLine,

    #[error("displacement has no {0:?} component")]
    ZeroComponent(Axis),

    #[error("cannot average an empty set of lines")]
    EmptyCollection,
}

/// Failures while loading a controller configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// A wire command that could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognised command {0:?}")]
pub struct ParseCommandError(pub String);

/// Failures delivering a command to the actuator side.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("actuator channel is disconnected")]
    Disconnected,

    #[error("actuator write failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GeometryError>;
