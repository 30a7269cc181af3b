//! Merging features into a GeoJSON feature collection on disk.

use crate::{CollectionError, Feature};
use geojson::{FeatureCollection, GeoJson};
use log::info;
use std::{
    fs::{self, File},
    io::{BufWriter, ErrorKind, Write},
    path::Path,
};

/// Adds `features` to `collection`.
///
/// A feature replaces the entry whose `id` property equals its own,
/// otherwise it is appended.
pub fn merge(collection: &mut FeatureCollection, features: impl IntoIterator<Item = Feature>) {
    for feature in features {
        let id = feature.id.clone();
        let feature = geojson::Feature::from(feature);
        match collection
            .features
            .iter()
            .position(|existing| property_id(existing) == Some(id.as_str()))
        {
            Some(idx) => {
                info!("{id}: updated");
                collection.features[idx] = feature;
            }
            None => {
                info!("{id}: appended");
                collection.features.push(feature);
            }
        }
    }
}

/// Reads the feature collection at `path`.
///
/// A missing file reads as an empty collection.
pub fn read_collection(path: &Path) -> Result<FeatureCollection, CollectionError> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("{} does not exist, starting empty", path.display());
            return Ok(empty());
        }
        Err(e) => return Err(e.into()),
    };
    match json.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        _ => Err(CollectionError::NotACollection(path.to_path_buf())),
    }
}

/// Writes `collection` to `path`, replacing it only once fully
/// written.
pub fn write_collection(path: &Path, collection: &FeatureCollection) -> Result<(), CollectionError> {
    let tmp_path = {
        let mut p = path.to_path_buf();
        p.set_extension("tmp");
        p
    };
    let mut wtr = BufWriter::new(File::create(&tmp_path)?);
    serde_json::to_writer(&mut wtr, collection)?;
    wtr.flush()?;
    drop(wtr);
    fs::rename(tmp_path, path)?;
    Ok(())
}

fn empty() -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: vec![],
        foreign_members: None,
    }
}

fn property_id(feature: &geojson::Feature) -> Option<&str> {
    feature.property("id").and_then(|id| id.as_str())
}

#[cfg(test)]
mod tests {
    use super::{merge, property_id, read_collection, write_collection};
    use crate::{CollectionError, Feature};
    use geo::{coord, geometry::Polygon, LineString};
    use serde_json::{Map, Value};
    use std::fs;

    fn feature(id: &str, title: &str) -> Feature {
        let mut properties = Map::new();
        properties.insert("id".into(), Value::from(id));
        properties.insert("title".into(), Value::from(title));
        Feature {
            id: id.to_string(),
            geometry: Polygon::new(
                LineString::new(vec![
                    coord! { x: -43.2, y: -22.9 },
                    coord! { x: -43.19, y: -22.89 },
                    coord! { x: -43.18, y: -22.9 },
                    coord! { x: -43.2, y: -22.9 },
                ]),
                vec![],
            ),
            properties,
        }
    }

    fn titles(collection: &geojson::FeatureCollection) -> Vec<(String, String)> {
        collection
            .features
            .iter()
            .map(|f| {
                (
                    property_id(f).unwrap().to_string(),
                    f.property("title").unwrap().as_str().unwrap().to_string(),
                )
            })
            .collect()
    }

    #[test]
    fn test_merge() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewcones.geojson");

        let mut collection = read_collection(&path).unwrap();
        assert!(collection.features.is_empty());
        merge(&mut collection, [feature("a", "first"), feature("b", "second")]);
        write_collection(&path, &collection).unwrap();

        let mut collection = read_collection(&path).unwrap();
        merge(&mut collection, [feature("a", "again"), feature("c", "third")]);
        assert_eq!(
            titles(&collection),
            [
                ("a".to_string(), "again".to_string()),
                ("b".to_string(), "second".to_string()),
                ("c".to_string(), "third".to_string()),
            ]
        );
    }

    #[test]
    fn test_merge_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewcones.geojson");
        for _ in 0..2 {
            let mut collection = read_collection(&path).unwrap();
            merge(&mut collection, [feature("a", "first")]);
            write_collection(&path, &collection).unwrap();
        }
        let collection = read_collection(&path).unwrap();
        assert_eq!(collection.features.len(), 1);
        assert!(!dir.path().join("viewcones.tmp").exists());
    }

    #[test]
    fn test_not_a_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("point.geojson");
        fs::write(&path, r#"{"type": "Point", "coordinates": [-43.2, -22.9]}"#).unwrap();
        assert!(matches!(
            read_collection(&path),
            Err(CollectionError::NotACollection(_))
        ));
        fs::write(&path, "not json").unwrap();
        assert!(read_collection(&path).is_err());
    }
}
