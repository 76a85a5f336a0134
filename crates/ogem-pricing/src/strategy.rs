use std::fmt;

use indexmap::IndexMap;

use crate::types::ModelPrice;

/// Ways of obtaining a provider's prices, in waterfall order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Render the page in a headless browser
    Browser,
    /// Fetch the page over plain HTTP
    Http,
    /// Use the built-in price table
    Fallback,
}

impl Strategy {
    /// Every strategy, in the order they are tried
    pub const WATERFALL: [Self; 3] = [Self::Browser, Self::Http, Self::Fallback];
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Browser => "browser",
            Self::Http => "http",
            Self::Fallback => "fallback",
        };

        f.write_str(name)
    }
}

/// Result of trying one strategy
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyOutcome {
    /// Prices were found
    Found(IndexMap<String, ModelPrice>),
    /// The strategy could not run here, e.g. no browser installed
    Skipped(String),
    /// The strategy ran and produced nothing usable
    Failed(String),
}

impl StrategyOutcome {
    /// Wrap parsed models, treating an empty parse as a failure
    pub fn from_parsed(models: IndexMap<String, ModelPrice>) -> Self {
        if models.is_empty() {
            Self::Failed("no pricing rows found on page".to_owned())
        } else {
            Self::Found(models)
        }
    }
}
