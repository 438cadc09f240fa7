use async_trait::async_trait;
use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::debug;

use crate::lookup::{LookupCriteria, MovieLookup};
use crate::registry::{Action, Outcome};

/// Which years a year question covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearSpan {
    /// `... made in _`
    Exact,
    /// `... made between _ and _`, both ends included.
    Between,
    /// `... made before _`, from the earliest year up to the year before.
    Before,
    /// `... made after _`, from the year after up to the latest year.
    After,
}

impl YearSpan {
    const fn action_name(self) -> &'static str {
        match self {
            Self::Exact => "title_by_year",
            Self::Between => "title_by_year_range",
            Self::Before => "title_before_year",
            Self::After => "title_after_year",
        }
    }

    /// Years to look up, or `None` when a capture is not a year.
    ///
    /// Ranges are clamped to `bounds`; an exact year is taken as given.
    fn years(self, captures: &[String], bounds: YearBounds) -> Option<RangeInclusive<i32>> {
        let year = |index: usize| captures.get(index)?.parse::<i32>().ok();

        let range = match self {
            Self::Exact => {
                let year = year(0)?;
                return Some(year..=year);
            }
            Self::Between => year(0)?..=year(1)?,
            Self::Before => bounds.earliest..=year(0)?.saturating_sub(1),
            Self::After => year(0)?.saturating_add(1)..=bounds.latest,
        };

        Some(bounds.clamp(range))
    }
}

/// Inclusive year window for open-ended year questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearBounds {
    pub earliest: i32,
    pub latest: i32,
}

impl YearBounds {
    #[must_use]
    pub const fn new(earliest: i32, latest: i32) -> Self {
        Self { earliest, latest }
    }

    fn clamp(self, range: RangeInclusive<i32>) -> RangeInclusive<i32> {
        (*range.start()).max(self.earliest)..=(*range.end()).min(self.latest)
    }
}

/// Lists one movie title per year in the span.
pub struct YearQuery {
    lookup: Arc<dyn MovieLookup>,
    span: YearSpan,
    bounds: YearBounds,
}

impl YearQuery {
    #[must_use]
    pub fn new(lookup: Arc<dyn MovieLookup>, span: YearSpan, bounds: YearBounds) -> Self {
        Self {
            lookup,
            span,
            bounds,
        }
    }
}

#[async_trait]
impl Action for YearQuery {
    fn name(&self) -> &str {
        self.span.action_name()
    }

    async fn run(&self, captures: &[String]) -> Outcome {
        let Some(years) = self.span.years(captures, self.bounds) else {
            debug!("{}: not a year in {:?}", self.name(), captures);
            return Outcome::Answers(Vec::new());
        };

        let mut titles = Vec::new();
        for year in years {
            if let Some(record) = self.lookup.lookup(&LookupCriteria::released_in(year)).await {
                titles.push(record.title);
            }
        }

        Outcome::Answers(titles)
    }
}
