//! Circular sectors swept clockwise from north.

use crate::{
    policy::MAX_STEPS,
    projection::{project, unproject},
    CameraPose, GeometryError, PlanarPoint, ViewconeError,
};
use geo::geometry::{Coord, LineString, Polygon};

/// Returns the angular bounds, in degrees clockwise from north, of
/// the frame described by `heading` and its signed edge offsets.
///
/// The returned `start` never exceeds `end`; a frame straddling north
/// gets a negative `start`.
pub fn sweep(heading: f64, left_fov: f64, right_fov: f64) -> (f64, f64) {
    let mut start = heading - right_fov;
    let end = heading - left_fov;
    if start > end {
        start -= 360.0;
    }
    (start, end)
}

/// Returns the point `radius` meters from `origin` in direction
/// `angle` (degrees clockwise from north).
pub fn polar_point(origin: PlanarPoint, angle: f64, radius: f64) -> PlanarPoint {
    let (sin, cos) = angle.to_radians().sin_cos();
    PlanarPoint {
        x: origin.x + sin * radius,
        y: origin.y + cos * radius,
    }
}

/// Returns the closed ring of a sector centered on `origin`.
///
/// The ring starts and ends at `origin` and visits `steps + 1` evenly
/// spaced arc points in between, `steps + 3` points in total.
pub fn build_sector(
    origin: PlanarPoint,
    heading: f64,
    left_fov: f64,
    right_fov: f64,
    radius: f64,
    steps: usize,
) -> Result<Vec<PlanarPoint>, GeometryError> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(GeometryError::Radius(radius));
    }
    if !(1..=MAX_STEPS).contains(&steps) {
        return Err(GeometryError::Steps(steps));
    }

    let (start, end) = sweep(heading, left_fov, right_fov);
    let step = (end - start) / steps as f64;

    let mut ring = Vec::with_capacity(steps + 3);
    ring.push(origin);
    ring.push(polar_point(origin, start, radius));
    ring.extend((1..steps).map(|z| polar_point(origin, start + z as f64 * step, radius)));
    ring.push(polar_point(origin, end, radius));
    ring.push(origin);
    Ok(ring)
}

/// Returns the geographic viewcone of `pose`.
pub fn viewcone(
    pose: &CameraPose,
    radius: f64,
    steps: usize,
) -> Result<Polygon<f64>, ViewconeError> {
    let origin = project(pose.origin())?;
    let ring = build_sector(
        origin,
        pose.heading,
        pose.left_fov,
        pose.right_fov,
        radius,
        steps,
    )?;
    let exterior = ring
        .into_iter()
        .map(unproject)
        .collect::<Result<Vec<Coord<f64>>, _>>()?;
    Ok(Polygon::new(LineString::new(exterior), vec![]))
}
