use crate::{
    policy::{MAX_TILT_DEG, MIN_RADIUS_M},
    projection::project,
    CameraPose, SubjectId, SubjectLocator,
};
use log::{debug, warn};

/// Returns how far from the camera, in meters, the line of sight
/// through the center of the frame meets flat ground.
///
/// Yields `None` when `tilt_deg` exceeds `max_tilt_deg`, where the
/// line of sight approaches the horizon.
pub fn trigonometric_radius(tilt_deg: f64, altitude_m: f64, max_tilt_deg: f64) -> Option<f64> {
    if tilt_deg <= max_tilt_deg {
        Some(altitude_m * tilt_deg.to_radians().tan())
    } else {
        None
    }
}

/// Estimates how far a photograph sees.
pub struct RadiusEstimator<L> {
    locator: L,

    /// Trigonometric estimates below this are discarded.
    min_radius: f64,

    max_tilt: f64,
}

impl<L: SubjectLocator> RadiusEstimator<L> {
    pub fn new(locator: L) -> Self {
        Self {
            locator,
            min_radius: MIN_RADIUS_M,
            max_tilt: MAX_TILT_DEG,
        }
    }

    pub fn min_radius(mut self, meters: f64) -> Self {
        self.min_radius = meters;
        self
    }

    pub fn max_tilt(mut self, degrees: f64) -> Self {
        self.max_tilt = degrees;
        self
    }

    /// Returns the viewcone radius for `pose` in meters, or `None` if
    /// no estimate could be made and the caller should fall back to
    /// a default.
    ///
    /// When depicted `subjects` can be located the radius reaches the
    /// farthest of them. Otherwise it is derived from the camera's
    /// tilt and altitude.
    pub fn estimate(&self, pose: &CameraPose, subjects: &[SubjectId]) -> Option<f64> {
        if let Some(radius) = self.farthest_subject(pose, subjects) {
            debug!("{}: radius from subjects: {radius}", pose.id);
            return Some(radius);
        }
        let radius = trigonometric_radius(pose.tilt, pose.altitude, self.max_tilt)
            .filter(|radius| *radius >= self.min_radius);
        debug!("{}: radius from tilt: {radius:?}", pose.id);
        radius
    }
}

/// Private API.
impl<L: SubjectLocator> RadiusEstimator<L> {
    fn farthest_subject(&self, pose: &CameraPose, subjects: &[SubjectId]) -> Option<f64> {
        if subjects.is_empty() {
            return None;
        }
        let origin = match project(pose.origin()) {
            Ok(origin) => origin,
            Err(e) => {
                warn!("{}: camera position: {e}", pose.id);
                return None;
            }
        };
        subjects
            .iter()
            .filter_map(|subject| match self.locator.locate(subject) {
                Ok(Some(coord)) => Some((subject, coord)),
                Ok(None) => {
                    debug!("{}: {subject} has no location", pose.id);
                    None
                }
                Err(e) => {
                    warn!("{}: locating {subject}: {e}", pose.id);
                    None
                }
            })
            .filter_map(|(subject, coord)| match project(coord) {
                Ok(planar) => Some(planar),
                Err(e) => {
                    warn!("{}: {subject}: {e}", pose.id);
                    None
                }
            })
            .map(|planar| origin.distance(&planar))
            .fold(None, |farthest: Option<f64>, d| {
                Some(farthest.map_or(d, |f| f.max(d)))
            })
    }
}
