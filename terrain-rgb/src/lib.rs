//! Terrain-RGB elevation tiles.
//!
//! Elevation is packed into the three color channels of each pixel
//! of a standard web-mercator ("slippy map") raster tile. Height in
//! meters is `-10000 + (R * 256 * 256 + G * 256 + B) * 0.1`.
//!
//! # References
//!
//! 1. [Terrain-RGB](https://docs.mapbox.com/data/tilesets/reference/mapbox-terrain-rgb-v1/)
//! 1. [Slippy map tilenames](https://wiki.openstreetmap.org/wiki/Slippy_map_tilenames)

mod error;

pub use crate::error::TerrainRgbError;
use geo::geometry::{Coord, Rect};
use image::{ImageFormat, Rgb, RgbImage};
use std::{f64::consts::PI, fmt};

/// Base floating point type used for all coordinates and calculations.
pub type C = f64;

/// Deepest zoom level we will compute tile indices for.
pub const MAX_ZOOM: u8 = 22;

/// Northern/southern limit of web-mercator tiles in degrees.
pub const MAX_LAT: C = 85.051_128_779_806_59;

/// Height represented by an all-zero pixel.
const BASE_HEIGHT_M: C = -10_000.0;

/// Meters per unit of the packed 24-bit channel value.
const HEIGHT_STEP_M: C = 0.1;

/// Returns the height in meters encoded by `pixel`.
pub fn decode(Rgb([r, g, b]): Rgb<u8>) -> C {
    let packed = u32::from(r) * 256 * 256 + u32::from(g) * 256 + u32::from(b);
    BASE_HEIGHT_M + C::from(packed) * HEIGHT_STEP_M
}

/// Returns the pixel which best represents `meters`.
///
/// Heights outside of the representable range saturate.
pub fn encode(meters: C) -> Rgb<u8> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let packed = ((meters - BASE_HEIGHT_M) / HEIGHT_STEP_M)
        .round()
        .clamp(0.0, C::from(0x00FF_FFFF)) as u32;
    let [_, r, g, b] = packed.to_be_bytes();
    Rgb([r, g, b])
}

/// Address of a tile in the slippy map scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileIndex {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileIndex {
    /// Returns the index of the tile at zoom `z` containing `coord`.
    pub fn covering(coord: Coord<C>, z: u8) -> Result<Self, TerrainRgbError> {
        if z > MAX_ZOOM {
            return Err(TerrainRgbError::Zoom(z));
        }
        let Coord { x: lon, y: lat } = coord;
        if !(lon.is_finite() && lat.is_finite())
            || lon.abs() > 180.0
            || lat.abs() > MAX_LAT
        {
            return Err(TerrainRgbError::OutOfBounds { x: lon, y: lat });
        }

        let n = C::from(1_u32 << z);
        let last = (1_u32 << z) - 1;
        let x = (lon + 180.0) / 360.0 * n;
        let y = (1.0 - lat.to_radians().tan().asinh() / PI) / 2.0 * n;

        // 180°E and the southern limit land exactly on the far edge
        // and belong to the last tile.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (x, y) = ((x.floor() as u32).min(last), (y.floor() as u32).min(last));
        Ok(Self { z, x, y })
    }

    /// Returns this tile's geographic extent in degrees.
    ///
    /// `min` is the south-west corner, `max` the north-east corner.
    pub fn bounds(&self) -> Rect<C> {
        let n = C::from(1_u32 << self.z);
        let west = C::from(self.x) / n * 360.0 - 180.0;
        let east = C::from(self.x + 1) / n * 360.0 - 180.0;
        let north = tile_y_to_lat(C::from(self.y), n);
        let south = tile_y_to_lat(C::from(self.y + 1), n);
        Rect::new(Coord { x: west, y: south }, Coord { x: east, y: north })
    }
}

impl fmt::Display for TileIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

fn tile_y_to_lat(y: C, n: C) -> C {
    (PI * (1.0 - 2.0 * y / n)).sinh().atan().to_degrees()
}

pub struct Tile {
    /// Slippy map address of this tile.
    index: TileIndex,

    /// Geographic extent, cached from `index`.
    bounds: Rect<C>,

    /// Encoded elevation samples.
    ///
    /// Row 0 is the northern edge, column 0 the western edge.
    pixels: RgbImage,
}

impl Tile {
    /// Returns a Tile decoded from PNG encoded bytes.
    pub fn from_png(index: TileIndex, bytes: &[u8]) -> Result<Self, TerrainRgbError> {
        let pixels = image::load_from_memory_with_format(bytes, ImageFormat::Png)?.into_rgb8();
        Self::from_image(index, pixels)
    }

    /// Returns a Tile backed by already decoded pixels.
    pub fn from_image(index: TileIndex, pixels: RgbImage) -> Result<Self, TerrainRgbError> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(TerrainRgbError::Empty(index));
        }
        Ok(Self {
            index,
            bounds: index.bounds(),
            pixels,
        })
    }

    pub fn index(&self) -> TileIndex {
        self.index
    }

    pub fn bounds(&self) -> Rect<C> {
        self.bounds
    }

    /// Returns (width, height) in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Returns the elevation at the given geo coordinates, or `None`
    /// if `coord` lies outside of this tile.
    pub fn get(&self, coord: Coord<C>) -> Option<C> {
        let (min, max) = (self.bounds.min(), self.bounds.max());
        if min.x <= coord.x && coord.x <= max.x && min.y <= coord.y && coord.y <= max.y {
            Some(self.get_unchecked(coord))
        } else {
            None
        }
    }

    /// Returns the elevation at the given geo coordinates.
    ///
    /// Coordinates outside of this tile are clamped to its edge.
    pub fn get_unchecked(&self, coord: Coord<C>) -> C {
        let (col, row) = self.coord_to_xy(coord);
        decode(*self.pixels.get_pixel(col, row))
    }
}

/// Private API
impl Tile {
    /// Linearly interpolates `coord` into (column, row) pixel space.
    ///
    /// Rows grow southward, so latitude is interpolated onto an
    /// inverted axis.
    fn coord_to_xy(&self, coord: Coord<C>) -> (u32, u32) {
        let (width, height) = self.pixels.dimensions();
        let (min, max) = (self.bounds.min(), self.bounds.max());
        let col = (coord.x - min.x) / (max.x - min.x) * C::from(width);
        let row = (max.y - coord.y) / (max.y - min.y) * C::from(height);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let xy = (
            (col.max(0.0) as u32).min(width - 1),
            (row.max(0.0) as u32).min(height - 1),
        );
        xy
    }
}
