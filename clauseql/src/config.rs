use crate::error::Error;
use serde::{Deserialize, Serialize};

/// How `between` treats a clause whose upper bound precedes its lower bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetweenPolicy {
    /// The range is empty and the clause never matches
    #[default]
    Empty,
    /// The bounds are swapped before comparing
    Swap,
}

/// Options for compiling a clause set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Separates a structured field's base name from its sub-key, as in `BOD_P1`
    pub path_separator: char,
    pub between: BetweenPolicy,
}

impl Default for FilterConfig {
    fn default() -> Self { Self { path_separator: '_', between: BetweenPolicy::Empty } }
}

impl FilterConfig {
    pub fn from_json(json: &str) -> Result<Self, Error> { Ok(serde_json::from_str(json)?) }

    pub fn with_between(mut self, between: BetweenPolicy) -> Self {
        self.between = between;
        self
    }

    pub fn with_path_separator(mut self, separator: char) -> Self {
        self.path_separator = separator;
        self
    }
}
