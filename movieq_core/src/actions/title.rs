use async_trait::async_trait;
use std::sync::Arc;

use crate::lookup::{LookupCriteria, MovieLookup, MovieRecord};
use crate::registry::{Action, Outcome};

/// The detail a title question asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleField {
    Director,
    Actors,
    Year,
}

impl TitleField {
    const fn action_name(self) -> &'static str {
        match self {
            Self::Director => "director_by_title",
            Self::Actors => "actors_by_title",
            Self::Year => "year_by_title",
        }
    }

    fn answers(self, record: MovieRecord) -> Vec<String> {
        match self {
            Self::Director => Some(record.director)
                .filter(|d| !d.is_empty())
                .into_iter()
                .collect(),
            Self::Actors => record.actors,
            Self::Year => record.year.map(|y| y.to_string()).into_iter().collect(),
        }
    }
}

/// Looks a movie up by its exact title and reports one detail of it.
pub struct TitleQuery {
    lookup: Arc<dyn MovieLookup>,
    field: TitleField,
}

impl TitleQuery {
    #[must_use]
    pub fn new(lookup: Arc<dyn MovieLookup>, field: TitleField) -> Self {
        Self { lookup, field }
    }
}

#[async_trait]
impl Action for TitleQuery {
    fn name(&self) -> &str {
        self.field.action_name()
    }

    async fn run(&self, captures: &[String]) -> Outcome {
        let title = captures.join(" ");
        let answers = self
            .lookup
            .lookup(&LookupCriteria::by_title(title))
            .await
            .map(|record| self.field.answers(record))
            .unwrap_or_default();

        Outcome::Answers(answers)
    }
}
