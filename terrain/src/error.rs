use terrain_rgb::{TerrainRgbError, TileIndex};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerrainError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    TerrainRgb(#[from] TerrainRgbError),

    /// The source answered but has no data for this tile.
    #[error("tile {0} is unavailable")]
    Unavailable(TileIndex),
}
