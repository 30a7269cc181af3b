//! Terrain tile retrieval.

use crate::TerrainError;
use log::debug;
use reqwest::blocking::Client;
use std::time::Duration;
use terrain_rgb::TileIndex;

/// Mapbox's Terrain-RGB tileset.
pub const MAPBOX_TERRAIN_RGB: &str =
    "https://api.mapbox.com/v4/mapbox.terrain-rgb/{z}/{x}/{y}.pngraw?access_token={token}";

/// Something which can produce the encoded (PNG) bytes of a tile.
pub trait TileFetch {
    fn fetch(&self, index: TileIndex) -> Result<Vec<u8>, TerrainError>;
}

/// Fetches tiles over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTileFetch {
    client: Client,

    /// URL with `{z}`, `{x}`, `{y}`, and optionally `{token}`
    /// placeholders.
    url_template: String,

    /// Substituted for `{token}`.
    access_token: Option<String>,

    /// Additional attempts after a failed request.
    retries: u32,
}

impl HttpTileFetch {
    pub fn new(
        url_template: impl Into<String>,
        access_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, TerrainError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("viewcone/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url_template: url_template.into(),
            access_token,
            retries: 1,
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
impl HttpTileFetch {
    fn url(&self, TileIndex { z, x, y }: TileIndex) -> String {
        self.url_template
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
            .replace("{token}", self.access_token.as_deref().unwrap_or_default())
    }

    fn try_fetch(&self, index: TileIndex, url: &str) -> Result<Vec<u8>, TerrainError> {
        let bytes = self.client.get(url).send()?.error_for_status()?.bytes()?;
        if bytes.is_empty() {
            return Err(TerrainError::Unavailable(index));
        }
        Ok(bytes.to_vec())
    }
}

impl TileFetch for HttpTileFetch {
    fn fetch(&self, index: TileIndex) -> Result<Vec<u8>, TerrainError> {
        // Never log the URL, it carries the access token.
        let url = self.url(index);
        let mut attempt = 0;
        loop {
            match self.try_fetch(index, &url) {
                Ok(bytes) => {
                    debug!("fetched tile {index}; bytes: {}", bytes.len());
                    return Ok(bytes);
                }
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    debug!("fetching tile {index} failed, retrying; attempt: {attempt}, err: {e}");
                }
                Err(e) => return Err(e),
            }
        }
    }
}
