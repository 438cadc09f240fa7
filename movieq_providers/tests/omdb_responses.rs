//! Decoding of OMDb response bodies and failure handling of the provider.

use movieq_core::{LookupCriteria, MovieLookup, MovieRecord};
use movieq_providers::{OmdbProvider, RetryPolicy, parse_response};
use serde_json::json;
use std::time::Duration;

#[test]
fn title_response_becomes_record() {
    let body = json!({
        "Title": "Alien",
        "Year": "1979",
        "Rated": "R",
        "Director": "Ridley Scott",
        "Actors": "Sigourney Weaver, Tom Skerritt, John Hurt",
        "Type": "movie",
        "Response": "True"
    });

    let record = parse_response(body).unwrap().unwrap();

    assert_eq!(
        record,
        MovieRecord {
            title: "Alien".to_string(),
            year: Some(1979),
            director: "Ridley Scott".to_string(),
            actors: vec![
                "Sigourney Weaver".to_string(),
                "Tom Skerritt".to_string(),
                "John Hurt".to_string(),
            ],
        }
    );
}

#[test]
fn placeholder_fields_are_left_empty() {
    let body = json!({
        "Title": "Some Short",
        "Year": "N/A",
        "Director": "N/A",
        "Actors": "N/A",
        "Response": "True"
    });

    let record = parse_response(body).unwrap().unwrap();

    assert_eq!(record.title, "Some Short");
    assert_eq!(record.year, None);
    assert!(record.director.is_empty());
    assert!(record.actors.is_empty());
}

#[test]
fn search_response_takes_first_hit() {
    let body = json!({
        "Search": [
            { "Title": "Forrest Gump", "Year": "1994", "imdbID": "tt0109830", "Type": "movie" },
            { "Title": "Cast Away", "Year": "2000", "imdbID": "tt0162222", "Type": "movie" }
        ],
        "totalResults": "2",
        "Response": "True"
    });

    let record = parse_response(body).unwrap().unwrap();

    assert_eq!(record.title, "Forrest Gump");
    assert_eq!(record.year, Some(1994));
    assert!(record.director.is_empty());
}

#[test]
fn negative_response_is_absent() {
    let body = json!({ "Response": "False", "Error": "Movie not found!" });
    assert_eq!(parse_response(body).unwrap(), None);

    let body = json!({ "Search": [], "Response": "True" });
    assert_eq!(parse_response(body).unwrap(), None);
}

#[test]
fn unrecognized_body_is_an_error() {
    assert!(parse_response(json!({ "status": "ok" })).is_err());
    assert!(parse_response(json!(["Response", "True"])).is_err());
}

#[tokio::test]
async fn unreachable_service_reads_as_absent() {
    // Nothing listens on the discard port locally.
    let provider = OmdbProvider::new("key".to_string(), Duration::from_secs(2))
        .unwrap()
        .with_base_url("http://127.0.0.1:9/".to_string())
        .with_retry(RetryPolicy::none());

    assert!(provider.fetch(&LookupCriteria::by_title("alien")).await.is_err());
    assert_eq!(provider.lookup(&LookupCriteria::by_title("alien")).await, None);
}
