use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("coordinate ({x}, {y}) is outside of the projection's domain")]
pub struct ProjectionError {
    pub x: f64,
    pub y: f64,
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GeometryError {
    #[error("sector radius must be positive, got {0}")]
    Radius(f64),

    #[error(
        "sector needs between 1 and {max} steps, got {0}",
        max = crate::policy::MAX_STEPS
    )]
    Steps(usize),
}

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid subject identifier '{0}'")]
    SubjectId(String),

    #[error("invalid WKT point '{0}'")]
    Wkt(String),
}

/// Reasons a single photograph produces no feature.
#[derive(Error, Debug)]
pub enum ViewconeError {
    #[error("{0}")]
    Projection(#[from] ProjectionError),

    #[error("{0}")]
    Geometry(#[from] GeometryError),

    #[error("no metadata for '{0}'")]
    MissingMetadata(String),
}

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    GeoJson(#[from] geojson::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0} does not contain a feature collection")]
    NotACollection(PathBuf),
}
