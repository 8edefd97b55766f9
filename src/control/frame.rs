use serde::{Deserialize, Serialize};

/// Distances to a stopping zone seen in one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StoppingZoneSighting {
    /// Distance to the zone entrance, if one was detected.
    pub entrance: Option<f64>,
    /// Distance to the zone exit, if one was detected.
    pub exit: Option<f64>,
}

/// What the lane detector reported for one video frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LaneFrame {
    /// Lane angle in degrees, positive when the road bends left.
    /// `None` when no lane was found.
    pub angle: Option<f64>,
    /// Signed distance to the middle of the lane.
    pub distance_to_middle: f64,
    /// Signed distance to the left lane boundary.
    pub distance_to_left: f64,
    /// Signed distance to the right lane boundary.
    pub distance_to_right: f64,
    pub stopping_zone: StoppingZoneSighting,
}

impl LaneFrame {
    /// A frame with only a lane angle.
    pub fn with_angle(angle: f64) -> Self {
        Self {
            angle: Some(angle),
            ..Default::default()
        }
    }

    /// A frame in which no lane was found.
    pub fn lost() -> Self {
        Default::default()
    }

    /// Adds a stopping zone entrance sighting.
    pub fn entrance_at(mut self, distance: f64) -> Self {
        self.stopping_zone.entrance = Some(distance);
        self
    }
}

/// The lane detector's output in its native encoding.
///
/// An angle of exactly zero means no lane was found, and a stopping zone
/// distance of zero or less means no zone was found.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLaneSummary {
    #[serde(default)]
    pub angle: f64,
    #[serde(default)]
    pub distance_middle: f64,
    #[serde(default)]
    pub distance_left: f64,
    #[serde(default)]
    pub distance_right: f64,
    #[serde(default = "not_detected")]
    pub distance_to_stopping_zone: f64,
    #[serde(default = "not_detected")]
    pub distance_to_stopping_zone_end: f64,
}

fn not_detected() -> f64 {
    -1.0
}

fn detected(distance: f64) -> Option<f64> {
    (distance > 0.0).then_some(distance)
}

impl From<RawLaneSummary> for LaneFrame {
    fn from(raw: RawLaneSummary) -> Self {
        Self {
            angle: (raw.angle != 0.0 && !raw.angle.is_nan()).then_some(raw.angle),
            distance_to_middle: raw.distance_middle,
            distance_to_left: raw.distance_left,
            distance_to_right: raw.distance_right,
            stopping_zone: StoppingZoneSighting {
                entrance: detected(raw.distance_to_stopping_zone),
                exit: detected(raw.distance_to_stopping_zone_end),
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sentinels_become_none() {
        let frame = LaneFrame::from(RawLaneSummary {
            angle: 0.0,
            distance_middle: 3.0,
            distance_left: -20.0,
            distance_right: 26.0,
            distance_to_stopping_zone: -1.0,
            distance_to_stopping_zone_end: -1.0,
        });
        assert_eq!(frame.angle, None);
        assert_eq!(frame.stopping_zone, StoppingZoneSighting::default());
        assert_eq!(frame.distance_to_left, -20.0);
    }

    #[test]
    fn detections_are_kept() {
        let frame = LaneFrame::from(RawLaneSummary {
            angle: -12.5,
            distance_to_stopping_zone: 140.0,
            distance_to_stopping_zone_end: 310.0,
            ..Default::default()
        });
        assert_eq!(frame.angle, Some(-12.5));
        assert_eq!(frame.stopping_zone.entrance, Some(140.0));
        assert_eq!(frame.stopping_zone.exit, Some(310.0));
    }

    #[test]
    fn parses_detector_json() {
        let raw: RawLaneSummary =
            serde_json::from_str(r#"{ "angle": 7.5, "distanceToStoppingZone": 88 }"#).unwrap();
        assert_eq!(raw.distance_to_stopping_zone_end, -1.0);
        let frame = LaneFrame::from(raw);
        assert_eq!(frame.angle, Some(7.5));
        assert_eq!(frame.stopping_zone.entrance, Some(88.0));
        assert_eq!(frame.stopping_zone.exit, None);
    }
}
