use crate::{
    pose::round5, sector::viewcone, CameraPose, Metadata, Policy, RadiusEstimator, SubjectId,
    SubjectLocator, ViewconeError,
};
use geo::geometry::Polygon;
use log::debug;
use serde_json::{Map, Value};

/// A photograph's viewcone and descriptive properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: String,
    pub geometry: Polygon<f64>,
    pub properties: Map<String, Value>,
}

impl From<Feature> for geojson::Feature {
    fn from(feature: Feature) -> Self {
        geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::from(
                &feature.geometry,
            ))),
            id: Some(geojson::feature::Id::String(feature.id)),
            properties: Some(feature.properties),
            foreign_members: None,
        }
    }
}

/// Builds features from poses and their catalog records.
pub struct FeatureAssembler<L> {
    estimator: RadiusEstimator<L>,
    policy: Policy,
}

impl<L: SubjectLocator> FeatureAssembler<L> {
    pub fn new(locator: L, policy: Policy) -> Self {
        let estimator = RadiusEstimator::new(locator)
            .min_radius(policy.min_radius)
            .max_tilt(policy.max_tilt);
        Self { estimator, policy }
    }

    /// Returns the feature of the photograph taken from `pose`.
    pub fn assemble(
        &self,
        pose: &CameraPose,
        metadata: &Metadata,
        subjects: &[SubjectId],
    ) -> Result<Feature, ViewconeError> {
        let radius = self
            .estimator
            .estimate(pose, subjects)
            .unwrap_or(self.policy.default_radius);
        debug!("{}: radius {radius}", pose.id);
        let geometry = viewcone(pose, radius, self.policy.steps)?;
        Ok(Feature {
            id: metadata.id.clone(),
            geometry,
            properties: self.properties(pose, metadata),
        })
    }
}

/// Private API.
impl<L> FeatureAssembler<L> {
    fn properties(&self, pose: &CameraPose, metadata: &Metadata) -> Map<String, Value> {
        fn text(value: &Option<String>) -> Value {
            Value::from(value.as_deref().unwrap_or_default())
        }

        fn year(value: Option<i32>) -> Value {
            Value::from(value.map(|year| year.to_string()).unwrap_or_default())
        }

        let mut properties = Map::new();
        properties.insert("id".into(), Value::from(metadata.id.as_str()));
        properties.insert("title".into(), text(&metadata.title));
        properties.insert("description".into(), text(&metadata.description));
        properties.insert("creator".into(), text(&metadata.creator));
        properties.insert("first_year".into(), year(metadata.first_year));
        properties.insert("last_year".into(), year(metadata.last_year));
        properties.insert("source".into(), Value::from(self.policy.source.as_str()));
        properties.insert("longitude".into(), Value::from(round5(pose.longitude)));
        properties.insert("latitude".into(), Value::from(round5(pose.latitude)));
        properties.insert("altitude".into(), Value::from(round5(pose.altitude)));
        properties.insert("heading".into(), Value::from(round5(pose.heading)));
        properties.insert("tilt".into(), Value::from(round5(pose.tilt)));
        properties.insert("fov".into(), Value::from(round5(pose.fov())));
        match metadata.date_created.as_deref().filter(|date| !date.is_empty()) {
            Some(date) => properties.insert("date_created".into(), Value::from(date)),
            None => properties.insert("date_circa".into(), text(&metadata.date_circa)),
        };
        properties
    }
}
