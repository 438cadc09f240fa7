use async_trait::async_trait;
use std::sync::Arc;

use crate::lookup::{LookupCriteria, MovieLookup};
use crate::registry::{Action, Outcome};

/// Searches the catalogue for a person's name and reports the title of the
/// best hit.
pub struct SearchQuery {
    lookup: Arc<dyn MovieLookup>,
    name: &'static str,
}

impl SearchQuery {
    #[must_use]
    pub fn new(lookup: Arc<dyn MovieLookup>, name: &'static str) -> Self {
        Self { lookup, name }
    }
}

#[async_trait]
impl Action for SearchQuery {
    fn name(&self) -> &str {
        self.name
    }

    async fn run(&self, captures: &[String]) -> Outcome {
        let person = captures.join(" ");
        let titles = self
            .lookup
            .lookup(&LookupCriteria::search(person))
            .await
            .map(|record| record.title)
            .into_iter()
            .collect();

        Outcome::Answers(titles)
    }
}
