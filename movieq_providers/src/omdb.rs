use anyhow::Context;
use async_trait::async_trait;
use movieq_core::{LookupCriteria, MovieLookup, MovieRecord};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::retry::{RetryPolicy, retry_with_backoff};

/// Marker OMDb uses for fields it has no value for.
const NOT_AVAILABLE: &str = "N/A";

/// Movie catalogue backed by the OMDb HTTP API.
pub struct OmdbProvider {
    client: Client,
    api_key: String,
    base_url: String,
    retry: RetryPolicy,
}

impl OmdbProvider {
    pub fn new(api_key: String, timeout: Duration) -> anyhow::Result<Self> {
        info!("Creating OmdbProvider");
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: "http://www.omdbapi.com/".to_string(),
            retry: RetryPolicy::default(),
        })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Request URL for `criteria`, with the API key appended.
    fn request_url(&self, criteria: &LookupCriteria) -> anyhow::Result<Url> {
        Url::parse_with_params(
            &self.base_url,
            criteria.iter().chain([("apikey", self.api_key.as_str())]),
        )
        .context("Invalid OMDb base URL")
    }

    /// Helper method to send a single request.
    ///
    /// URLs are stripped from errors since they carry the API key.
    async fn try_send(&self, criteria: &LookupCriteria) -> anyhow::Result<serde_json::Value> {
        let url = self.request_url(criteria)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(reqwest::Error::without_url)?
            .json::<serde_json::Value>()
            .await
            .map_err(reqwest::Error::without_url)?;

        Ok(response)
    }

    /// Query OMDb, retrying transport failures.
    ///
    /// `Ok(None)` means OMDb answered but has no matching movie.
    pub async fn fetch(&self, criteria: &LookupCriteria) -> anyhow::Result<Option<MovieRecord>> {
        debug!("Querying OMDb: {:?}", criteria);

        let response = retry_with_backoff(|| self.try_send(criteria), &self.retry).await?;

        debug!("OMDb response: {}", response);
        parse_response(response)
    }
}

#[async_trait]
impl MovieLookup for OmdbProvider {
    async fn lookup(&self, criteria: &LookupCriteria) -> Option<MovieRecord> {
        match self.fetch(criteria).await {
            Ok(record) => record,
            Err(e) => {
                warn!("OMDb lookup failed: {e:#}");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Payload {
    response: String,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    year: Option<String>,
    #[serde(default)]
    director: Option<String>,
    #[serde(default)]
    actors: Option<String>,
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SearchHit {
    title: String,
    #[serde(default)]
    year: Option<String>,
}

/// Convert an OMDb JSON body into a record.
///
/// Title lookups carry the movie at the top level; searches carry a
/// `Search` list whose first entry is taken. `Response: "False"` and an
/// empty search yield `None`.
pub fn parse_response(value: serde_json::Value) -> anyhow::Result<Option<MovieRecord>> {
    let payload: Payload =
        serde_json::from_value(value).context("Unexpected OMDb response format")?;

    if payload.response != "True" {
        debug!(
            "OMDb reported no result: {}",
            payload.error.as_deref().unwrap_or("unknown reason")
        );
        return Ok(None);
    }

    if let Some(title) = payload.title {
        return Ok(Some(MovieRecord {
            title,
            year: payload.year.as_deref().and_then(parse_year),
            director: available(payload.director).unwrap_or_default(),
            actors: available(payload.actors)
                .map(|actors| actors.split(", ").map(str::to_string).collect())
                .unwrap_or_default(),
        }));
    }

    Ok(payload.search.into_iter().next().map(|hit| MovieRecord {
        title: hit.title,
        year: hit.year.as_deref().and_then(parse_year),
        ..MovieRecord::default()
    }))
}

fn available(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty() && value != NOT_AVAILABLE)
}

/// Leading four digits of an OMDb year, so `"2008–2013"` reads as 2008.
fn parse_year(raw: &str) -> Option<u16> {
    raw.get(..4)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_year_handles_ranges_and_missing_values() {
        assert_eq!(parse_year("1999"), Some(1999));
        assert_eq!(parse_year("2008–2013"), Some(2008));
        assert_eq!(parse_year("N/A"), None);
        assert_eq!(parse_year(""), None);
    }

    fn provider(base_url: &str) -> OmdbProvider {
        OmdbProvider::new("secret".to_string(), Duration::from_secs(1))
            .unwrap()
            .with_base_url(base_url.to_string())
    }

    #[test]
    fn title_url_carries_encoded_title_and_key() {
        let url = provider("http://www.omdbapi.com/")
            .request_url(&LookupCriteria::by_title("the dark knight"))
            .unwrap();

        assert_eq!(url.host_str(), Some("www.omdbapi.com"));
        assert_eq!(url.path(), "/");
        assert_eq!(url.query(), Some("t=the+dark+knight&apikey=secret"));
    }

    #[test]
    fn search_and_year_urls_restrict_to_movies() {
        let omdb = provider("http://www.omdbapi.com/");

        let url = omdb
            .request_url(&LookupCriteria::search("tom hanks"))
            .unwrap();
        assert_eq!(url.query(), Some("s=tom+hanks&type=movie&apikey=secret"));

        let url = omdb
            .request_url(&LookupCriteria::released_in(1999))
            .unwrap();
        assert_eq!(url.query(), Some("type=movie&y=1999&apikey=secret"));
    }

    #[test]
    fn request_url_encodes_reserved_characters() {
        let url = provider("http://www.omdbapi.com/")
            .request_url(&LookupCriteria::by_title("fast & furious"))
            .unwrap();

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("t".to_string(), "fast & furious".to_string()),
                ("apikey".to_string(), "secret".to_string()),
            ]
        );
    }

    #[test]
    fn request_url_rejects_invalid_base() {
        assert!(
            provider("not a url")
                .request_url(&LookupCriteria::by_title("alien"))
                .is_err()
        );
    }

    #[test]
    fn available_filters_placeholders() {
        assert_eq!(available(Some("N/A".to_string())), None);
        assert_eq!(available(Some(String::new())), None);
        assert_eq!(available(None), None);
        assert_eq!(
            available(Some("Ridley Scott".to_string())),
            Some("Ridley Scott".to_string())
        );
    }
}
