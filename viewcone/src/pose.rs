use geo::geometry::Coord;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// What a pose's altitude is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AltitudeMode {
    /// Meters above the ground directly below the camera.
    #[serde(alias = "relativeToGround")]
    Relative,

    /// Meters above sea level.
    Absolute,
}

impl FromStr for AltitudeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "relative" | "relativeToGround" => Ok(Self::Relative),
            "absolute" => Ok(Self::Absolute),
            other => Err(format!("unknown altitude mode '{other}'")),
        }
    }
}

impl fmt::Display for AltitudeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relative => f.write_str("relative"),
            Self::Absolute => f.write_str("absolute"),
        }
    }
}

/// Position and orientation of the camera which took a photograph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub id: String,

    /// Degrees east.
    pub longitude: f64,

    /// Degrees north.
    pub latitude: f64,

    /// Meters, see `altitude_mode`.
    pub altitude: f64,

    /// Degrees clockwise from north.
    pub heading: f64,

    /// Degrees from nadir; 0 looks straight down, 90 at the horizon.
    pub tilt: f64,

    /// Signed offset of the left edge of the frame from `heading`.
    pub left_fov: f64,

    /// Signed offset of the right edge of the frame from `heading`.
    pub right_fov: f64,

    pub altitude_mode: AltitudeMode,
}

impl CameraPose {
    /// Returns the camera's geographic position.
    pub fn origin(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }

    /// Returns the horizontal field of view in degrees.
    pub fn fov(&self) -> f64 {
        self.left_fov.abs() + self.right_fov.abs()
    }
}

/// Rounds to 5 decimal places (about a meter in degrees).
pub(crate) fn round5(value: f64) -> f64 {
    (value * 1e5).round() / 1e5
}

#[cfg(test)]
mod tests {
    use super::{round5, AltitudeMode, CameraPose};
    use approx::assert_relative_eq;

    #[test]
    fn test_deserialize() {
        let json = r#"{
            "id": "0071824cri0001-01",
            "longitude": -43.17512,
            "latitude": -22.90395,
            "altitude": 75.5,
            "heading": 212.0,
            "tilt": 82.5,
            "left_fov": -30.0,
            "right_fov": 30.0,
            "altitude_mode": "relativeToGround"
        }"#;
        let pose: CameraPose = serde_json::from_str(json).unwrap();
        assert_eq!(pose.altitude_mode, AltitudeMode::Relative);
        assert_relative_eq!(pose.fov(), 60.0);
        assert_relative_eq!(pose.origin().x, -43.17512);
    }

    #[test]
    fn test_altitude_mode() {
        assert_eq!("absolute".parse(), Ok(AltitudeMode::Absolute));
        assert_eq!("relativeToGround".parse(), Ok(AltitudeMode::Relative));
        assert!("clampToGround".parse::<AltitudeMode>().is_err());
        assert_eq!(AltitudeMode::Relative.to_string(), "relative");
    }

    #[test]
    fn test_round5() {
        assert_relative_eq!(round5(-43.175_123_9), -43.175_12);
        assert_relative_eq!(round5(212.000_006), 212.000_01);
    }
}
