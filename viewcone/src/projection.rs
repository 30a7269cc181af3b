//! WGS84 <-> UTM zone 22S (EPSG:32722).
//!
//! Transverse Mercator via Krüger's series in the third flattening,
//! truncated after the `n^3` terms (`n^4` for the latitude series).
//! Round trips are well below a millimeter inside the valid domain.
//!
//! # References
//!
//! 1. [Transverse Mercator with an accuracy of a few nanometers](https://arxiv.org/abs/1002.1417)
//! 1. [Universal Transverse Mercator](https://en.wikipedia.org/wiki/Universal_Transverse_Mercator_coordinate_system#Simplified_formulae)

use crate::ProjectionError;
use geo::geometry::Coord;

/// WGS84 semi-major axis in meters.
const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;

/// WGS84 flattening.
const FLATTENING: f64 = 1.0 / 298.257_223_563;

/// Scale factor on the central meridian.
const K0: f64 = 0.9996;

/// Zone 22 central meridian in degrees.
const CENTRAL_MERIDIAN: f64 = -51.0;

const FALSE_EASTING: f64 = 500_000.0;

/// Southern hemisphere zones always apply the false northing.
const FALSE_NORTHING: f64 = 10_000_000.0;

/// UTM's latitude band limits.
const MIN_LAT: f64 = -80.0;
const MAX_LAT: f64 = 84.0;

/// Farthest longitude from the central meridian we accept, in
/// degrees. The truncated series loses accuracy quickly beyond this.
const MAX_MERIDIAN_OFFSET: f64 = 30.0;

/// Coordinates in meters on the UTM zone 22S grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarPoint {
    /// Easting.
    pub x: f64,
    /// Northing.
    pub y: f64,
}

impl PlanarPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the euclidean distance to `other` in meters.
    pub fn distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Returns `coord` (x = longitude, y = latitude) on the UTM 22S grid.
pub fn project(coord: Coord<f64>) -> Result<PlanarPoint, ProjectionError> {
    let Coord { x: lon, y: lat } = coord;
    if !in_domain(lon, lat) {
        return Err(ProjectionError { x: lon, y: lat });
    }

    let Series {
        e, scale, alpha, ..
    } = Series::new();

    let phi = lat.to_radians();
    let lambda = (lon - CENTRAL_MERIDIAN).to_radians();

    let sin_phi = phi.sin();
    let t = (sin_phi.atanh() - e * (e * sin_phi).atanh()).sinh();
    let xi_prime = t.atan2(lambda.cos());
    let eta_prime = (lambda.sin() / (1.0 + t * t).sqrt()).atanh();

    let mut xi = xi_prime;
    let mut eta = eta_prime;
    for (j, a) in (1..).zip(alpha) {
        let k = f64::from(2 * j);
        xi += a * (k * xi_prime).sin() * (k * eta_prime).cosh();
        eta += a * (k * xi_prime).cos() * (k * eta_prime).sinh();
    }

    Ok(PlanarPoint {
        x: FALSE_EASTING + scale * eta,
        y: FALSE_NORTHING + scale * xi,
    })
}

/// Returns the geographic coordinate (x = longitude, y = latitude) of
/// `point`.
pub fn unproject(point: PlanarPoint) -> Result<Coord<f64>, ProjectionError> {
    let err = ProjectionError {
        x: point.x,
        y: point.y,
    };
    if !(point.x.is_finite() && point.y.is_finite()) {
        return Err(err);
    }

    let Series {
        scale, beta, delta, ..
    } = Series::new();

    let xi = (point.y - FALSE_NORTHING) / scale;
    let eta = (point.x - FALSE_EASTING) / scale;

    let mut xi_prime = xi;
    let mut eta_prime = eta;
    for (j, b) in (1..).zip(beta) {
        let k = f64::from(2 * j);
        xi_prime -= b * (k * xi).sin() * (k * eta).cosh();
        eta_prime -= b * (k * xi).cos() * (k * eta).sinh();
    }

    // Conformal latitude, then geodetic latitude.
    let chi = (xi_prime.sin() / eta_prime.cosh()).asin();
    let mut phi = chi;
    for (j, d) in (1..).zip(delta) {
        phi += d * (f64::from(2 * j) * chi).sin();
    }
    let lambda = eta_prime.sinh().atan2(xi_prime.cos());

    let lon = CENTRAL_MERIDIAN + lambda.to_degrees();
    let lat = phi.to_degrees();
    if in_domain(lon, lat) {
        Ok(Coord { x: lon, y: lat })
    } else {
        Err(err)
    }
}

fn in_domain(lon: f64, lat: f64) -> bool {
    lon.is_finite()
        && lat.is_finite()
        && (MIN_LAT..=MAX_LAT).contains(&lat)
        && (lon - CENTRAL_MERIDIAN).abs() <= MAX_MERIDIAN_OFFSET
}

/// Krüger series coefficients for the WGS84 ellipsoid.
struct Series {
    /// First eccentricity.
    e: f64,
    /// `k0` times the rectifying radius.
    scale: f64,
    alpha: [f64; 3],
    beta: [f64; 3],
    delta: [f64; 4],
}

impl Series {
    fn new() -> Self {
        let n = FLATTENING / (2.0 - FLATTENING);
        let (n2, n3, n4) = (n * n, n * n * n, n * n * n * n);
        let e = 2.0 * n.sqrt() / (1.0 + n);
        let rectifying_radius = SEMI_MAJOR_AXIS / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0);
        Self {
            e,
            scale: K0 * rectifying_radius,
            alpha: [
                n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0,
                13.0 * n2 / 48.0 - 3.0 * n3 / 5.0,
                61.0 * n3 / 240.0,
            ],
            beta: [
                n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0,
                n2 / 48.0 + n3 / 15.0,
                17.0 * n3 / 480.0,
            ],
            delta: [
                2.0 * n - 2.0 * n2 / 3.0 - 2.0 * n3 + 116.0 * n4 / 45.0,
                7.0 * n2 / 3.0 - 8.0 * n3 / 5.0 - 227.0 * n4 / 45.0,
                56.0 * n3 / 15.0 - 136.0 * n4 / 35.0,
                4279.0 * n4 / 630.0,
            ],
        }
    }
}
