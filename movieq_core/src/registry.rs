use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::pattern::{Pattern, PatternError};

/// Answer given when a rule matched but produced nothing.
pub const NO_ANSWERS: &str = "No answers";

/// Answer given when no rule matched the question.
pub const NOT_UNDERSTOOD: &str = "I don't understand";

/// What an action asks the caller to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Answers(Vec<String>),
    Terminate,
}

/// Result of dispatching one question.
///
/// `Answers` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Answers(Vec<String>),
    Terminate,
}

/// Handler bound to a pattern; receives the wildcard captures in pattern
/// order.
#[async_trait]
pub trait Action: Send + Sync {
    fn name(&self) -> &str;
    async fn run(&self, captures: &[String]) -> Outcome;
}

#[derive(Clone)]
pub struct Rule {
    pub pattern: Pattern,
    pub action: Arc<dyn Action>,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("pattern", &self.pattern.to_string())
            .field("action", &self.action.name())
            .finish()
    }
}

/// Ordered rule list. Earlier rules shadow later ones.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
}

impl RuleRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule after every rule registered so far.
    pub fn register(&mut self, pattern: &str, action: Arc<dyn Action>) -> Result<(), PatternError> {
        let pattern = Pattern::parse(pattern)?;
        info!("Registering rule: {} -> {}", pattern, action.name());
        self.rules.push(Rule { pattern, action });
        Ok(())
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule whose pattern aligns with `source`, with its captures.
    #[must_use]
    pub fn find<S: AsRef<str>>(&self, source: &[S]) -> Option<(&Rule, Vec<String>)> {
        self.rules
            .iter()
            .find_map(|rule| rule.pattern.matches(source).map(|captures| (rule, captures)))
    }

    /// Answer `source` with the first matching rule.
    pub async fn dispatch<S: AsRef<str> + Sync>(&self, source: &[S]) -> Dispatch {
        let Some((rule, captures)) = self.find(source) else {
            debug!("No rule matched {} tokens", source.len());
            return Dispatch::Answers(vec![NOT_UNDERSTOOD.to_string()]);
        };

        debug!(
            "Matched rule '{}' -> {} with captures {:?}",
            rule.pattern,
            rule.action.name(),
            captures
        );

        match rule.action.run(&captures).await {
            Outcome::Terminate => Dispatch::Terminate,
            Outcome::Answers(answers) if answers.is_empty() => {
                Dispatch::Answers(vec![NO_ANSWERS.to_string()])
            }
            Outcome::Answers(answers) => Dispatch::Answers(answers),
        }
    }
}
