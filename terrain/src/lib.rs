mod error;
mod fetch;
mod tiles;

pub use crate::{
    error::TerrainError,
    fetch::{HttpTileFetch, TileFetch, MAPBOX_TERRAIN_RGB},
    tiles::Tiles,
};
pub use geo;
pub use terrain_rgb::{self, Tile, TileIndex};
