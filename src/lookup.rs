// Metadata lookup: a small blocking HTTP client for the OMDb API.
// The controller only sees the `MetadataLookup` trait, so tests can hand
// it a fake instead of talking to the network.

use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::LookupError;
use crate::movie::{validate_rating, Movie};

/// Anything that can turn a title into a canonical catalog record.
pub trait MetadataLookup {
    fn fetch(&self, title: &str) -> Result<Movie, LookupError>;
}

/// OMDb client holding a reqwest blocking client, the API URL and the key.
#[derive(Clone)]
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

/// The subset of the OMDb title response we use. OMDb capitalises its keys
/// and reports failures in-band through `Response`/`Error`.
#[derive(Deserialize, Debug)]
pub struct OmdbResponse {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "Poster")]
    pub poster: Option<String>,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

impl OmdbClient {
    /// Build a client for `base_url` authenticating with `api_key`.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self, LookupError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(OmdbClient {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Create a client from the session configuration. Returns `None` when
    /// no API key is configured, which turns the lookup off.
    pub fn from_config(config: &Config) -> Result<Option<Self>, LookupError> {
        match &config.omdb_api_key {
            Some(key) if !key.trim().is_empty() => {
                let client = Self::new(config.omdb_url.clone(), key.clone(), config.timeout())?;
                Ok(Some(client))
            }
            _ => Ok(None),
        }
    }
}

impl MetadataLookup for OmdbClient {
    #[instrument(skip(self))]
    fn fetch(&self, title: &str) -> Result<Movie, LookupError> {
        let res = self
            .client
            .get(&self.base_url)
            .query(&[("t", title), ("apikey", self.api_key.as_str())])
            .send()?;
        if !res.status().is_success() {
            return Err(LookupError::Status(res.status()));
        }
        let body: OmdbResponse = res
            .json()
            .map_err(|e| LookupError::BadResponse(format!("could not decode body: {e}")))?;
        debug!(response = %body.response, "OMDb answered");
        into_movie(title, body)
    }
}

/// Convert an OMDb answer into a record, rejecting answers that do not
/// carry a usable year and rating.
pub fn into_movie(requested: &str, body: OmdbResponse) -> Result<Movie, LookupError> {
    if body.response.eq_ignore_ascii_case("false") {
        return Err(LookupError::NotFound {
            title: requested.to_string(),
            message: body.error.unwrap_or_else(|| "no details given".into()),
        });
    }

    let title = body
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| LookupError::BadResponse("missing Title".into()))?;
    let year = parse_year(body.year.as_deref().unwrap_or_default())?;
    let rating = body
        .imdb_rating
        .as_deref()
        .unwrap_or("N/A")
        .trim()
        .parse::<f64>()
        .ok()
        .and_then(|r| validate_rating(r).ok())
        .ok_or_else(|| {
            LookupError::BadResponse(format!(
                "no usable rating for '{title}' ({})",
                body.imdb_rating.as_deref().unwrap_or("missing")
            ))
        })?;
    let poster = body.poster.unwrap_or_default();

    Ok(Movie::new(title, year, rating, poster))
}

// OMDb years can be ranges like "2010–2012"; the first four digits are the
// release year.
fn parse_year(raw: &str) -> Result<i32, LookupError> {
    let digits: String = raw.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.len() < 4 {
        return Err(LookupError::BadResponse(format!("unusable Year '{raw}'")));
    }
    digits[..4]
        .parse()
        .map_err(|_| LookupError::BadResponse(format!("unusable Year '{raw}'")))
}
