/// Turn a raw question into match tokens.
///
/// Question marks are dropped, the text is lower-cased and split on
/// whitespace.
#[must_use]
pub fn tokenize(input: &str) -> Vec<String> {
    input
        .replace('?', "")
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
