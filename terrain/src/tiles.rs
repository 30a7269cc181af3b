//! Terrain-RGB tile aggregator.

use crate::{TerrainError, TileFetch};
use dashmap::DashMap;
use geo::geometry::Coord;
use log::debug;
use std::sync::Arc;
use terrain_rgb::{Tile, TileIndex, C};

pub struct Tiles<F> {
    /// Where tiles come from.
    fetch: F,

    /// Tiles which have been loaded on demand.
    ///
    /// Failed fetches are not recorded, the next request for the same
    /// tile tries again.
    tiles: DashMap<TileIndex, Arc<Tile>>,
}

impl<F: TileFetch> Tiles<F> {
    pub fn new(fetch: F) -> Self {
        Self {
            fetch,
            tiles: DashMap::new(),
        }
    }

    /// Returns the tile at `index`.
    ///
    /// `Tiles` will attempt to fetch the tile if it doesn't already
    /// have it in memory.
    pub fn get(&self, index: TileIndex) -> Result<Arc<Tile>, TerrainError> {
        self.tiles
            .entry(index)
            .or_try_insert_with(|| self.load_tile(index).map(Arc::new))
            .map(|r| r.clone())
    }

    /// Returns the terrain height in meters above sea level at
    /// `coord`, sampled from the covering tile at `zoom`.
    pub fn elevation(&self, coord: Coord<C>, zoom: u8) -> Result<C, TerrainError> {
        let index = TileIndex::covering(coord, zoom)?;
        let tile = self.get(index)?;
        let elevation = tile.get_unchecked(coord);
        debug!("elevation; coord: {coord:?}, tile: {index}, meters: {elevation}");
        Ok(elevation)
    }

    /// Returns the number of tiles held in memory.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }
}

/// Private API.
impl<F: TileFetch> Tiles<F> {
    fn load_tile(&self, index: TileIndex) -> Result<Tile, TerrainError> {
        debug!("loading tile {index}");
        let bytes = self.fetch.fetch(index)?;
        Ok(Tile::from_png(index, &bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::{Coord, TerrainError, TileFetch, TileIndex, Tiles};
    use approx::assert_relative_eq;
    use image::{DynamicImage, ImageOutputFormat, RgbImage};
    use std::{
        io::Cursor,
        sync::atomic::{AtomicUsize, Ordering},
    };
    use terrain_rgb::encode;

    const CORCOVADO: Coord = Coord {
        x: -43.2105,
        y: -22.9519,
    };

    /// Serves flat tiles at a fixed height and counts requests.
    struct FlatFetch {
        meters: f64,
        requests: AtomicUsize,
    }

    impl FlatFetch {
        fn new(meters: f64) -> Self {
            Self {
                meters,
                requests: AtomicUsize::new(0),
            }
        }
    }

    impl TileFetch for FlatFetch {
        fn fetch(&self, _index: TileIndex) -> Result<Vec<u8>, TerrainError> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            let mut png = Vec::new();
            DynamicImage::ImageRgb8(RgbImage::from_pixel(256, 256, encode(self.meters)))
                .write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)
                .unwrap();
            Ok(png)
        }
    }

    struct DownFetch {
        requests: AtomicUsize,
    }

    impl TileFetch for DownFetch {
        fn fetch(&self, index: TileIndex) -> Result<Vec<u8>, TerrainError> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            Err(TerrainError::Unavailable(index))
        }
    }

    #[test]
    fn test_elevation() {
        let tiles = Tiles::new(FlatFetch::new(704.0));
        let elevation = tiles.elevation(CORCOVADO, 15).unwrap();
        assert_relative_eq!(elevation, 704.0, epsilon = 0.05);
    }

    #[test]
    fn test_tiles_are_cached() {
        let tiles = Tiles::new(FlatFetch::new(12.0));
        let nearby = Coord {
            x: CORCOVADO.x + 0.001,
            y: CORCOVADO.y,
        };
        let far_away = Coord { x: -43.9, y: -19.9 };
        tiles.elevation(CORCOVADO, 15).unwrap();
        tiles.elevation(nearby, 15).unwrap();
        assert_eq!(tiles.fetch.requests.load(Ordering::SeqCst), 1);
        tiles.elevation(far_away, 15).unwrap();
        assert_eq!(tiles.fetch.requests.load(Ordering::SeqCst), 2);
        assert_eq!(tiles.len(), 2);
    }

    #[test]
    fn test_failed_fetch_is_not_cached() {
        let tiles = Tiles::new(DownFetch {
            requests: AtomicUsize::new(0),
        });
        assert!(matches!(
            tiles.elevation(CORCOVADO, 15),
            Err(TerrainError::Unavailable(_))
        ));
        assert!(tiles.elevation(CORCOVADO, 15).is_err());
        assert_eq!(tiles.fetch.requests.load(Ordering::SeqCst), 2);
        assert_eq!(tiles.len(), 0);
    }

    #[test]
    fn test_invalid_coord() {
        let tiles = Tiles::new(FlatFetch::new(0.0));
        let north_pole = Coord { x: 0.0, y: 90.0 };
        assert!(matches!(
            tiles.elevation(north_pole, 15),
            Err(TerrainError::TerrainRgb(_))
        ));
        assert_eq!(tiles.fetch.requests.load(Ordering::SeqCst), 0);
    }
}
