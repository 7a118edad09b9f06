//! Column search-term filters.
//!
//! A [`Filter`] decides whether a raw search term is acceptable for its
//! column. Rejected terms are dropped from the request state silently; they
//! never produce an error.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::Deserialize;

use crate::error::{DataTableError, Result};

/// Validity predicate for one column's search terms.
pub trait Filter: Send + Sync {
    /// Returns `true` if `value` may be used to filter the column.
    fn is_valid_value(&self, value: &str) -> bool;
}

impl<F> Filter for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_valid_value(&self, value: &str) -> bool {
        self(value)
    }
}

/// Shared handle to a filter, as stored on a column.
pub type SharedFilter = Arc<dyn Filter>;

/// Free-text filter; accepts every term.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFilter;

impl Filter for TextFilter {
    fn is_valid_value(&self, _value: &str) -> bool {
        true
    }
}

/// Accepts only terms that are one of the configured choices.
#[derive(Debug, Clone, Default)]
pub struct ChoiceFilter {
    choices: Vec<String>,
}

impl ChoiceFilter {
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }
}

impl Filter for ChoiceFilter {
    fn is_valid_value(&self, value: &str) -> bool {
        self.choices.iter().any(|choice| choice == value)
    }
}

/// Accepts terms matching a regular expression.
#[derive(Debug, Clone)]
pub struct PatternFilter {
    regex: Regex,
}

impl PatternFilter {
    /// Compiles the pattern. An invalid pattern is a configuration error.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|err| {
            DataTableError::configuration(format!("invalid filter pattern '{}': {}", pattern, err))
        })?;
        Ok(Self { regex })
    }
}

impl Filter for PatternFilter {
    fn is_valid_value(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

/// Serializable filter description, used by JSON column options.
///
/// ```json
/// {"type": "choice", "choices": ["open", "closed"]}
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FilterSpec {
    Text,
    Choice { choices: Vec<String> },
    Pattern { pattern: String },
}

impl FilterSpec {
    pub fn build(&self) -> Result<SharedFilter> {
        let filter: SharedFilter = match self {
            FilterSpec::Text => Arc::new(TextFilter),
            FilterSpec::Choice { choices } => Arc::new(ChoiceFilter::new(choices.clone())),
            FilterSpec::Pattern { pattern } => Arc::new(PatternFilter::new(pattern)?),
        };
        Ok(filter)
    }
}

/// Debug stand-in for opaque filters.
pub(crate) struct FilterDebug;

impl fmt::Debug for FilterDebug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<filter>")
    }
}
