//! # Viewcones
//!
//! `viewcone` approximates the ground area visible in a georeferenced
//! photograph as a circular sector swept from the camera position,
//! and rewrites camera altitudes recorded relative to the ground as
//! altitudes above sea level.

mod altitude;
pub mod batch;
pub mod collection;
mod error;
mod feature;
mod metadata;
pub mod policy;
mod pose;
pub mod projection;
mod radius;
pub mod sector;
mod subject;
mod wikidata;

pub use crate::{
    altitude::{AltitudeCorrector, Correction},
    error::{CollectionError, GeometryError, LookupError, ProjectionError, ViewconeError},
    feature::{Feature, FeatureAssembler},
    metadata::{normalize_id, Metadata, MetadataIndex},
    policy::Policy,
    pose::{AltitudeMode, CameraPose},
    projection::PlanarPoint,
    radius::{trigonometric_radius, RadiusEstimator},
    subject::{parse_depicts, Offline, SubjectId, SubjectLocator},
    wikidata::{Wikidata, WIKIDATA_SPARQL},
};
pub use {geo, geojson, terrain};
