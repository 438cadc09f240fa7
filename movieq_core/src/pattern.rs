//! Token patterns with single (`_`) and greedy (`%`) wildcards.
//!
//! Matching walks the pattern and the source side by side and never
//! backtracks: a greedy wildcard that is followed by a literal stops at the
//! first source token equal to that literal, and that boundary is final even
//! when the rest of the pattern then fails to line up.

use std::fmt;

use thiserror::Error;

/// One unit of a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Element {
    /// Must equal the source token at the same position.
    Literal(String),
    /// Matches exactly one source token.
    Single,
    /// Matches a run of source tokens, bounded by the next literal or by
    /// the end of the source when it closes the pattern.
    Greedy,
}

impl Element {
    pub const SINGLE_MARKER: &'static str = "_";
    pub const GREEDY_MARKER: &'static str = "%";

    fn from_word(word: &str) -> Self {
        match word {
            Self::SINGLE_MARKER => Self::Single,
            Self::GREEDY_MARKER => Self::Greedy,
            literal => Self::Literal(literal.to_string()),
        }
    }

    #[must_use]
    pub const fn is_wildcard(&self) -> bool {
        !matches!(self, Self::Literal(_))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(word) => f.write_str(word),
            Self::Single => f.write_str(Self::SINGLE_MARKER),
            Self::Greedy => f.write_str(Self::GREEDY_MARKER),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern has no elements")]
    Empty,

    #[error(
        "greedy wildcard at position {position} must be followed by a literal or end the pattern"
    )]
    GreedyWithoutDelimiter { position: usize },
}

/// A validated, non-empty sequence of pattern elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    elements: Vec<Element>,
}

impl Pattern {
    /// Build a pattern from elements.
    ///
    /// Rejects empty patterns and greedy wildcards directly followed by
    /// another wildcard, since such a greedy run has no delimiter to stop at.
    pub fn new(elements: Vec<Element>) -> Result<Self, PatternError> {
        if elements.is_empty() {
            return Err(PatternError::Empty);
        }

        if let Some(position) = elements
            .windows(2)
            .position(|pair| pair[0] == Element::Greedy && pair[1].is_wildcard())
        {
            return Err(PatternError::GreedyWithoutDelimiter { position });
        }

        Ok(Self { elements })
    }

    /// Parse a whitespace separated pattern such as `"who directed %"`.
    pub fn parse(text: &str) -> Result<Self, PatternError> {
        Self::new(text.split_whitespace().map(Element::from_word).collect())
    }

    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    #[must_use]
    pub fn wildcard_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_wildcard()).count()
    }

    /// Align `source` against this pattern.
    ///
    /// Returns the captured text of every wildcard in pattern order, or
    /// `None` when no alignment exists.
    #[must_use]
    pub fn matches<S: AsRef<str>>(&self, source: &[S]) -> Option<Vec<String>> {
        let pattern = self.elements.as_slice();
        let mut captures = Vec::with_capacity(self.wildcard_count());
        let mut p = 0;
        let mut s = 0;

        while p < pattern.len() || s < source.len() {
            // Pattern exhausted with source tokens left over.
            let element = pattern.get(p)?;

            match element {
                Element::Greedy => {
                    let Some(next) = pattern.get(p + 1) else {
                        captures.push(join_tokens(&source[s..]));
                        return Some(captures);
                    };
                    let Element::Literal(delimiter) = next else {
                        return None;
                    };

                    let run = source[s..]
                        .iter()
                        .position(|token| token.as_ref() == delimiter)?;
                    captures.push(join_tokens(&source[s..s + run]).trim().to_string());
                    s += run;
                    // The delimiter itself is matched on the next iteration.
                    p += 1;
                }
                _ if s >= source.len() => return None,
                Element::Single => {
                    captures.push(source[s].as_ref().trim().to_string());
                    p += 1;
                    s += 1;
                }
                Element::Literal(word) if word == source[s].as_ref() => {
                    p += 1;
                    s += 1;
                }
                Element::Literal(_) => return None,
            }
        }

        Some(captures)
    }
}

fn join_tokens<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{element}")?;
        }
        Ok(())
    }
}
