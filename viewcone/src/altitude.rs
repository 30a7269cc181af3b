use crate::{
    policy::ELEVATION_ZOOM,
    pose::round5,
    AltitudeMode, CameraPose,
};
use geo::geometry::Coord;
use log::debug;
use terrain::{TerrainError, TileFetch, Tiles};

/// Outcome of a successful altitude correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Correction {
    /// The pose already had an absolute altitude.
    Unchanged,

    /// The terrain height in meters was added to the pose's altitude.
    Corrected { terrain_m: f64 },
}

/// Rewrites ground-relative camera altitudes as altitudes above sea
/// level.
pub struct AltitudeCorrector<F> {
    tiles: Tiles<F>,
    zoom: u8,
}

impl<F: TileFetch> AltitudeCorrector<F> {
    pub fn new(tiles: Tiles<F>) -> Self {
        Self {
            tiles,
            zoom: ELEVATION_ZOOM,
        }
    }

    /// Sets the terrain tile zoom level (defaults to 15).
    pub fn zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    /// Returns the underlying tile cache.
    pub fn tiles(&self) -> &Tiles<F> {
        &self.tiles
    }

    /// Corrects `pose` in place.
    ///
    /// On error `pose` is left untouched.
    pub fn correct(&self, pose: &mut CameraPose) -> Result<Correction, TerrainError> {
        if pose.altitude_mode == AltitudeMode::Absolute {
            return Ok(Correction::Unchanged);
        }
        let coord = Coord {
            x: round5(pose.longitude),
            y: round5(pose.latitude),
        };
        let terrain_m = self.tiles.elevation(coord, self.zoom)?;
        debug!(
            "{}: altitude {} + terrain {terrain_m}",
            pose.id, pose.altitude
        );
        pose.altitude += terrain_m;
        pose.altitude_mode = AltitudeMode::Absolute;
        Ok(Correction::Corrected { terrain_m })
    }
}

#[cfg(test)]
mod tests {
    use super::{AltitudeCorrector, Correction};
    use crate::{AltitudeMode, CameraPose};
    use approx::assert_relative_eq;
    use image::{DynamicImage, ImageOutputFormat, RgbImage};
    use std::io::Cursor;
    use terrain::{terrain_rgb::encode, TerrainError, TileFetch, TileIndex, Tiles};

    /// Serves flat tiles at a fixed height, or nothing for zoom 0.
    struct FlatFetch(f64);

    impl TileFetch for FlatFetch {
        fn fetch(&self, index: TileIndex) -> Result<Vec<u8>, TerrainError> {
            if index.z == 0 {
                return Err(TerrainError::Unavailable(index));
            }
            let mut png = Vec::new();
            DynamicImage::ImageRgb8(RgbImage::from_pixel(256, 256, encode(self.0)))
                .write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)
                .unwrap();
            Ok(png)
        }
    }

    fn pose(altitude_mode: AltitudeMode) -> CameraPose {
        CameraPose {
            id: "0071824cri0001-01".to_string(),
            longitude: -43.175_123_9,
            latitude: -22.903_951_2,
            altitude: 75.5,
            heading: 212.0,
            tilt: 82.5,
            left_fov: -30.0,
            right_fov: 30.0,
            altitude_mode,
        }
    }

    #[test]
    fn test_relative_pose() {
        let corrector = AltitudeCorrector::new(Tiles::new(FlatFetch(20.0)));
        let mut pose = pose(AltitudeMode::Relative);
        let Correction::Corrected { terrain_m } = corrector.correct(&mut pose).unwrap() else {
            panic!("relative pose was not corrected");
        };
        assert_relative_eq!(terrain_m, 20.0, epsilon = 0.05);
        assert_relative_eq!(pose.altitude, 95.5, epsilon = 0.05);
        assert_eq!(pose.altitude_mode, AltitudeMode::Absolute);
        assert_eq!(corrector.tiles().len(), 1);

        // A corrected pose is not corrected again.
        assert_eq!(corrector.correct(&mut pose).unwrap(), Correction::Unchanged);
        assert_relative_eq!(pose.altitude, 95.5, epsilon = 0.05);
    }

    #[test]
    fn test_absolute_pose() {
        let corrector = AltitudeCorrector::new(Tiles::new(FlatFetch(20.0)));
        let mut pose = pose(AltitudeMode::Absolute);
        assert_eq!(corrector.correct(&mut pose).unwrap(), Correction::Unchanged);
        assert_relative_eq!(pose.altitude, 75.5);
        assert_eq!(corrector.tiles().len(), 0);
    }

    #[test]
    fn test_failure_leaves_pose_untouched() {
        let corrector = AltitudeCorrector::new(Tiles::new(FlatFetch(20.0))).zoom(0);
        let mut pose = pose(AltitudeMode::Relative);
        let before = pose.clone();
        assert!(corrector.correct(&mut pose).is_err());
        assert_eq!(pose, before);
    }
}
