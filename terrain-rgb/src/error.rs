use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerrainRgbError {
    #[error("{0}")]
    Image(#[from] image::ImageError),

    #[error("zoom level {0} exceeds maximum of {max}", max = crate::MAX_ZOOM)]
    Zoom(u8),

    #[error("coordinate ({x}, {y}) is outside of the tiled world")]
    OutOfBounds { x: f64, y: f64 },

    #[error("tile {0} has no pixels")]
    Empty(crate::TileIndex),
}
