//! Movie question handlers and the rule set that routes questions to them.

mod search;
mod title;
mod year;

use async_trait::async_trait;
use std::sync::Arc;

use crate::lookup::MovieLookup;
use crate::pattern::PatternError;
use crate::registry::{Action, Outcome, RuleRegistry};

pub use search::SearchQuery;
pub use title::{TitleField, TitleQuery};
pub use year::{YearBounds, YearQuery, YearSpan};

/// Ends the question session.
#[derive(Debug, Clone, Copy, Default)]
pub struct Farewell;

#[async_trait]
impl Action for Farewell {
    fn name(&self) -> &str {
        "bye"
    }

    async fn run(&self, _captures: &[String]) -> Outcome {
        Outcome::Terminate
    }
}

/// Build the movie rule set, in matching order.
pub fn movie_registry(
    lookup: &Arc<dyn MovieLookup>,
    bounds: YearBounds,
) -> Result<RuleRegistry, PatternError> {
    let year = |span| Arc::new(YearQuery::new(lookup.clone(), span, bounds));
    let title = |field| Arc::new(TitleQuery::new(lookup.clone(), field));

    let mut registry = RuleRegistry::new();
    registry.register("what movies were made in _", year(YearSpan::Exact))?;
    registry.register("what movies were made between _ and _", year(YearSpan::Between))?;
    registry.register("what movies were made before _", year(YearSpan::Before))?;
    registry.register("what movies were made after _", year(YearSpan::After))?;
    registry.register("who directed %", title(TitleField::Director))?;
    registry.register(
        "what movies were directed by %",
        Arc::new(SearchQuery::new(lookup.clone(), "title_by_director")),
    )?;
    registry.register("who acted in %", title(TitleField::Actors))?;
    registry.register("when was % made", title(TitleField::Year))?;
    registry.register(
        "in what movies did % appear",
        Arc::new(SearchQuery::new(lookup.clone(), "title_by_actor")),
    )?;
    registry.register("bye", Arc::new(Farewell))?;

    Ok(registry)
}
