//! Subject coordinates from Wikidata.

use crate::{LookupError, SubjectId, SubjectLocator};
use dashmap::DashMap;
use geo::geometry::Coord;
use log::debug;
use reqwest::{blocking::Client, header::ACCEPT};
use serde::Deserialize;
use std::time::Duration;

/// Public Wikidata SPARQL endpoint.
pub const WIKIDATA_SPARQL: &str = "https://query.wikidata.org/sparql";

/// Looks up subjects' coordinate location (`P625`).
pub struct Wikidata {
    client: Client,

    endpoint: String,

    /// Additional attempts after a failed request.
    retries: u32,

    /// Answers already received, including "no coordinate".
    cache: DashMap<SubjectId, Option<Coord<f64>>>,
}

impl Wikidata {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(
                "viewcone/",
                env!("CARGO_PKG_VERSION"),
                " (https://github.com/imaginerio/viewcone)"
            ))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            retries: 1,
            cache: DashMap::new(),
        })
    }

    /// Sets how many times a failed request is repeated (defaults
    /// to 1).
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }
}

/// Private API.
impl Wikidata {
    fn query(subject: &SubjectId) -> String {
        format!("SELECT ?coordinate WHERE {{ wd:{subject} wdt:P625 ?coordinate . }}")
    }

    fn try_locate(&self, subject: &SubjectId) -> Result<Option<Coord<f64>>, LookupError> {
        let response: SparqlResponse = self
            .client
            .get(&self.endpoint)
            .query(&[("query", Self::query(subject))])
            .header(ACCEPT, "application/sparql-results+json")
            .send()?
            .error_for_status()?
            .json()?;
        first_coordinate(response)
    }
}

impl SubjectLocator for Wikidata {
    fn locate(&self, subject: &SubjectId) -> Result<Option<Coord<f64>>, LookupError> {
        if let Some(hit) = self.cache.get(subject) {
            return Ok(*hit);
        }
        let mut attempt = 0;
        let located = loop {
            match self.try_locate(subject) {
                Ok(located) => break located,
                Err(e @ LookupError::Http(_)) if attempt < self.retries => {
                    attempt += 1;
                    debug!("locating {subject} failed, retrying; attempt: {attempt}, err: {e}");
                }
                Err(e) => return Err(e),
            }
        };
        debug!("located {subject}: {located:?}");
        self.cache.insert(subject.clone(), located);
        Ok(located)
    }
}

#[derive(Debug, Deserialize)]
struct SparqlResponse {
    results: SparqlResults,
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    bindings: Vec<Binding>,
}

#[derive(Debug, Deserialize)]
struct Binding {
    coordinate: Option<Literal>,
}

#[derive(Debug, Deserialize)]
struct Literal {
    value: String,
}

/// Entities may carry several coordinates, we use the first.
fn first_coordinate(response: SparqlResponse) -> Result<Option<Coord<f64>>, LookupError> {
    response
        .results
        .bindings
        .into_iter()
        .find_map(|binding| binding.coordinate)
        .map(|literal| parse_wkt_point(&literal.value))
        .transpose()
}

/// Parses a WKT literal such as `Point(-43.2105 -22.9519)`.
fn parse_wkt_point(wkt: &str) -> Result<Coord<f64>, LookupError> {
    let mk_err = || LookupError::Wkt(wkt.to_string());
    let inner = wkt
        .trim()
        .strip_prefix("Point(")
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(mk_err)?;
    let mut parts = inner.split_whitespace();
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(mk_err());
    };
    let x = x.parse::<f64>().map_err(|_| mk_err())?;
    let y = y.parse::<f64>().map_err(|_| mk_err())?;
    Ok(Coord { x, y })
}
