use clap::{Args, Parser};
use std::path::PathBuf;
use viewcone::{
    policy::{DEFAULT_RADIUS_M, DEFAULT_STEPS, ELEVATION_ZOOM, MAX_TILT_DEG, MIN_RADIUS_M, SOURCE},
    terrain::MAPBOX_TERRAIN_RGB,
    WIKIDATA_SPARQL,
};

/// Viewcone polygons and absolute altitudes for georeferenced
/// photographs.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub enum Cli {
    /// Rewrite ground-relative camera altitudes as altitudes above
    /// sea level.
    Correct(Correct),

    /// Correct altitudes, build viewcones, and merge them into a
    /// GeoJSON feature collection.
    Run(Run),
}

#[derive(Debug, Clone, Args)]
pub struct Terrain {
    /// Terrain-RGB tile URL with `{z}`, `{x}`, `{y}` and `{token}`
    /// placeholders.
    #[arg(long, default_value = MAPBOX_TERRAIN_RGB)]
    pub tile_url: String,

    /// Substituted for `{token}` in the tile URL.
    #[arg(long, env = "MAPBOX_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Terrain tile zoom level.
    #[arg(short, long, default_value_t = ELEVATION_ZOOM)]
    pub zoom: u8,
}

#[derive(Debug, Clone, Args)]
pub struct Network {
    /// Seconds before a network request is abandoned.
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Additional attempts after a failed network request.
    #[arg(long, default_value_t = 1)]
    pub retries: u32,
}

#[derive(Debug, Clone, Args)]
pub struct Correct {
    #[command(flatten)]
    pub terrain: Terrain,

    #[command(flatten)]
    pub network: Network,

    /// Corrected poses are written here instead of stdout.
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// JSON array of camera poses.
    pub poses: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct Run {
    #[command(flatten)]
    pub terrain: Terrain,

    #[command(flatten)]
    pub network: Network,

    /// Keep altitudes as they are.
    #[arg(long)]
    pub skip_altitude: bool,

    /// Don't query the knowledge base for depicted subjects.
    #[arg(long)]
    pub offline: bool,

    /// Knowledge base SPARQL endpoint.
    #[arg(long, default_value = WIKIDATA_SPARQL)]
    pub wikidata: String,

    /// Smallest trusted trigonometric radius in meters.
    #[arg(long, default_value_t = MIN_RADIUS_M)]
    pub min_radius: f64,

    /// Radius in meters of viewcones without an estimate.
    #[arg(long, default_value_t = DEFAULT_RADIUS_M)]
    pub default_radius: f64,

    /// Poses tilted further than this (degrees) get no trigonometric
    /// radius.
    #[arg(long, default_value_t = MAX_TILT_DEG)]
    pub max_tilt: f64,

    /// Arc segments per viewcone.
    #[arg(long, default_value_t = DEFAULT_STEPS)]
    pub steps: usize,

    /// Attribution attached to every feature.
    #[arg(long, default_value = SOURCE)]
    pub source: String,

    /// JSON array of catalog records.
    #[arg(short, long)]
    pub metadata: PathBuf,

    /// GeoJSON feature collection to merge into, created if missing.
    #[arg(short, long)]
    pub collection: PathBuf,

    /// JSON array of camera poses.
    pub poses: PathBuf,
}
