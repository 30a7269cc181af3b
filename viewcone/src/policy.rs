/// Smallest trigonometric radius estimate we trust, in meters.
pub const MIN_RADIUS_M: f64 = 400.0;

/// Radius used when no estimate is available, in meters.
pub const DEFAULT_RADIUS_M: f64 = 400.0;

/// Steeper tilts point too close to the horizon to intersect the
/// ground reliably, in degrees.
pub const MAX_TILT_DEG: f64 = 89.0;

/// Number of arc segments in a viewcone.
pub const DEFAULT_STEPS: usize = 200;

/// Most arc segments a viewcone may have.
pub const MAX_STEPS: usize = 1 << 16;

/// Terrain tile zoom used for altitude correction.
pub const ELEVATION_ZOOM: u8 = 15;

/// Attribution attached to every feature.
pub const SOURCE: &str = "Instituto Moreira Salles";

/// Tunable constants of the viewcone pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Policy {
    /// Trigonometric radius estimates below this are discarded.
    pub min_radius: f64,

    /// Radius of viewcones without an estimate.
    pub default_radius: f64,

    /// Poses tilted further than this get no trigonometric estimate.
    pub max_tilt: f64,

    /// Arc segments per viewcone.
    pub steps: usize,

    /// Value of every feature's `source` property.
    pub source: String,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            min_radius: MIN_RADIUS_M,
            default_radius: DEFAULT_RADIUS_M,
            max_tilt: MAX_TILT_DEG,
            steps: DEFAULT_STEPS,
            source: SOURCE.to_string(),
        }
    }
}
