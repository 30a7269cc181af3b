use crate::LookupError;
use geo::geometry::Coord;
use log::warn;
use std::{fmt, str::FromStr};

/// A knowledge-base entity, such as `Q1049640`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for SubjectId {
    type Err = LookupError;

    /// Accepts bare identifiers as well as entity URIs like
    /// `http://www.wikidata.org/entity/Q1049640`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let candidate = s.rsplit('/').next().unwrap_or(s);
        match candidate.strip_prefix('Q') {
            Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
                Ok(Self(candidate.to_string()))
            }
            _ => Err(LookupError::SubjectId(s.to_string())),
        }
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the valid subjects of a `||` separated list of entities.
pub fn parse_depicts(field: &str) -> Vec<SubjectId> {
    field
        .split("||")
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.parse() {
            Ok(subject) => Some(subject),
            Err(e) => {
                warn!("ignoring depicted subject: {e}");
                None
            }
        })
        .collect()
}

/// Resolves depicted subjects to where they are.
pub trait SubjectLocator {
    /// Returns the subject's coordinate (x = longitude, y = latitude),
    /// or `None` if the knowledge base doesn't know it.
    fn locate(&self, subject: &SubjectId) -> Result<Option<Coord<f64>>, LookupError>;
}

impl<T: SubjectLocator + ?Sized> SubjectLocator for Box<T> {
    fn locate(&self, subject: &SubjectId) -> Result<Option<Coord<f64>>, LookupError> {
        (**self).locate(subject)
    }
}

/// A locator which knows nothing, forcing the trigonometric
/// estimate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl SubjectLocator for Offline {
    fn locate(&self, _subject: &SubjectId) -> Result<Option<Coord<f64>>, LookupError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_depicts, SubjectId};

    #[test]
    fn test_parse_subject_id() {
        assert_eq!(
            "Q1049640".parse::<SubjectId>().unwrap().as_str(),
            "Q1049640"
        );
        assert_eq!(
            "http://www.wikidata.org/entity/Q1049640"
                .parse::<SubjectId>()
                .unwrap()
                .to_string(),
            "Q1049640"
        );
        assert!("P625".parse::<SubjectId>().is_err());
        assert!("Q".parse::<SubjectId>().is_err());
        assert!("Q12a".parse::<SubjectId>().is_err());
        assert!("".parse::<SubjectId>().is_err());
    }

    #[test]
    fn test_parse_depicts() {
        let subjects = parse_depicts(
            "http://www.wikidata.org/entity/Q1049640||Q79961 || not-an-entity||",
        );
        assert_eq!(
            subjects
                .iter()
                .map(SubjectId::as_str)
                .collect::<Vec<_>>(),
            vec!["Q1049640", "Q79961"]
        );
        assert!(parse_depicts("").is_empty());
    }
}
