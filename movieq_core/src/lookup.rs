//! The movie catalogue seen from the question handlers.

use async_trait::async_trait;
use std::collections::BTreeMap;

/// A single movie as reported by the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MovieRecord {
    pub title: String,
    /// Release year, absent when the catalogue reports something unparsable.
    pub year: Option<u16>,
    pub director: String,
    pub actors: Vec<String>,
}

/// Keyed query parameters for one catalogue request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LookupCriteria {
    params: BTreeMap<&'static str, String>,
}

impl LookupCriteria {
    pub const TITLE: &'static str = "t";
    pub const SEARCH: &'static str = "s";
    pub const YEAR: &'static str = "y";
    pub const KIND: &'static str = "type";

    /// Exact title lookup.
    #[must_use]
    pub fn by_title(title: impl Into<String>) -> Self {
        Self::default().with(Self::TITLE, title)
    }

    /// Free text search, used for people's names.
    #[must_use]
    pub fn search(text: impl Into<String>) -> Self {
        Self::default().with(Self::SEARCH, text).movies_only()
    }

    /// Any movie released in `year`.
    #[must_use]
    pub fn released_in(year: i32) -> Self {
        Self::default()
            .with(Self::YEAR, year.to_string())
            .movies_only()
    }

    #[must_use]
    pub fn movies_only(self) -> Self {
        self.with(Self::KIND, "movie")
    }

    #[must_use]
    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.params.insert(key, value.into());
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.params.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// Source of movie records.
///
/// Implementations report every failure (missing data, transport errors,
/// undecodable payloads) as `None`; callers never see an error.
#[async_trait]
pub trait MovieLookup: Send + Sync {
    async fn lookup(&self, criteria: &LookupCriteria) -> Option<MovieRecord>;
}
