#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Pattern-driven question answering over a movie catalogue.
//!
//! A question is normalized into tokens, matched against an ordered list of
//! rules, and the first matching rule's action turns the captured words into
//! answer lines.

pub mod actions;
pub mod lookup;
pub mod normalize;
pub mod pattern;
pub mod registry;

pub use actions::{movie_registry, Farewell, SearchQuery, TitleField, TitleQuery, YearBounds, YearQuery, YearSpan};
pub use lookup::{LookupCriteria, MovieLookup, MovieRecord};
pub use normalize::tokenize;
pub use pattern::{Element, Pattern, PatternError};
pub use registry::{Action, Dispatch, NOT_UNDERSTOOD, NO_ANSWERS, Outcome, Rule, RuleRegistry};
