//! Demo configuration, read from the environment.

use anyhow::{Context, Result};

/// Environment variable holding the number of arm segments.
pub const SEGMENTS_ENV: &str = "ENGINE_DEMO_SEGMENTS";

/// Environment variable holding the number of root moves.
pub const STEPS_ENV: &str = "ENGINE_DEMO_STEPS";

/// Configuration for the hierarchy demo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// Number of segments chained below the root.
    pub segments: usize,
    /// Number of times the root is moved before teardown.
    pub steps: usize,
}

impl DemoConfig {
    /// Read the configuration from `ENGINE_DEMO_SEGMENTS` and
    /// `ENGINE_DEMO_STEPS`, falling back to the defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            segments: parse_or(&lookup, SEGMENTS_ENV, defaults.segments)?,
            steps: parse_or(&lookup, STEPS_ENV, defaults.steps)?,
        })
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            segments: 3,
            steps: 4,
        }
    }
}

fn parse_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: usize) -> Result<usize> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a non-negative integer, got `{raw}`")),
        None => Ok(default),
    }
}
