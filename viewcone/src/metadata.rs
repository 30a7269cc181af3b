use crate::{parse_depicts, SubjectId};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Returns the key under which poses and metadata are joined.
///
/// Photograph ids are cased inconsistently between the pose files and
/// the catalog, so both sides are trimmed and uppercased.
pub fn normalize_id(id: &str) -> String {
    id.trim().to_uppercase()
}

/// Descriptive catalog record of a photograph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub creator: Option<String>,
    #[serde(default, deserialize_with = "year")]
    pub first_year: Option<i32>,
    #[serde(default, deserialize_with = "year")]
    pub last_year: Option<i32>,

    /// Precise date, when known.
    pub date_created: Option<String>,

    /// Approximate year, e.g. "c. 1920".
    pub date_circa: Option<String>,

    /// `||` separated knowledge-base entities shown in the photograph.
    #[serde(alias = "wikidata_depict")]
    pub depicts: Option<String>,
}

impl Metadata {
    /// Returns the depicted subjects.
    pub fn subjects(&self) -> Vec<SubjectId> {
        self.depicts
            .as_deref()
            .map(parse_depicts)
            .unwrap_or_default()
    }
}

/// Catalog exports write years as integers, floats (`1885.0`) or
/// strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawYear {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Reads a year in any of the catalog's spellings.
///
/// Values which are not a whole year read as absent rather than
/// failing the record.
fn year<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    fn whole(value: f64) -> Option<i32> {
        #[allow(clippy::cast_possible_truncation)]
        let year = (value.fract() == 0.0 && value.abs() <= f64::from(i32::MAX))
            .then_some(value as i32);
        year
    }

    let Some(raw) = Option::<RawYear>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let year = match &raw {
        RawYear::Int(value) => i32::try_from(*value).ok(),
        RawYear::Float(value) => whole(*value),
        RawYear::Text(text) if text.trim().is_empty() => return Ok(None),
        RawYear::Text(text) => text.trim().parse::<f64>().ok().and_then(whole),
    };
    if year.is_none() {
        warn!("ignoring year {raw:?}");
    }
    Ok(year)
}

/// Metadata records keyed by normalized id.
#[derive(Debug, Clone, Default)]
pub struct MetadataIndex(HashMap<String, Metadata>);

impl MetadataIndex {
    /// Returns the record for `id`, regardless of its casing.
    pub fn get(&self, id: &str) -> Option<&Metadata> {
        self.0.get(&normalize_id(id))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Metadata> for MetadataIndex {
    /// Later records win over earlier ones with the same id.
    fn from_iter<I: IntoIterator<Item = Metadata>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|record| (normalize_id(&record.id), record))
                .collect(),
        )
    }
}
