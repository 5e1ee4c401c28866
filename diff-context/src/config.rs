//! Context window configuration.
//!
//! Values can come from code ([`ExtendConfig::default`]), from a serialized
//! config (all fields are optional thanks to `#[serde(default)]`), or from
//! environment variables via [`ExtendConfig::from_env`].

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, DiffResult};

/// Upper bound for any single context window.
pub const MAX_CONTEXT_LINES: usize = 500;

const ENV_LINES_BEFORE: &str = "DIFF_CONTEXT_LINES_BEFORE";
const ENV_LINES_AFTER: &str = "DIFF_CONTEXT_LINES_AFTER";
const ENV_LINES_BEFORE_DYNAMIC: &str = "DIFF_CONTEXT_LINES_BEFORE_DYNAMIC";
const ENV_DYNAMIC: &str = "DIFF_CONTEXT_DYNAMIC";

/// How many lines of surrounding file content are pulled into each hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtendConfig {
    /// Static leading window (lines above the hunk).
    pub lines_before: usize,
    /// Trailing window (lines below the hunk).
    pub lines_after: usize,
    /// Larger leading window searched for the section header when the new
    /// file content is available.
    pub lines_before_dynamic: usize,
    /// Snap the leading window to the section header when it is found.
    pub allow_dynamic_context: bool,
}

impl Default for ExtendConfig {
    fn default() -> Self {
        Self {
            lines_before: 7,
            lines_after: 7,
            lines_before_dynamic: 10,
            allow_dynamic_context: true,
        }
    }
}

impl ExtendConfig {
    /// Config that leaves every hunk at its original bounds.
    pub fn without_context() -> Self {
        Self {
            lines_before: 0,
            lines_after: 0,
            lines_before_dynamic: 0,
            allow_dynamic_context: false,
        }
    }

    /// Load from process environment, falling back to defaults for unset vars.
    pub fn from_env() -> DiffResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ExtendConfig::from_env`] but with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> DiffResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let cfg = Self {
            lines_before: read_usize(&lookup, ENV_LINES_BEFORE)?.unwrap_or(defaults.lines_before),
            lines_after: read_usize(&lookup, ENV_LINES_AFTER)?.unwrap_or(defaults.lines_after),
            lines_before_dynamic: read_usize(&lookup, ENV_LINES_BEFORE_DYNAMIC)?
                .unwrap_or(defaults.lines_before_dynamic),
            allow_dynamic_context: read_bool(&lookup, ENV_DYNAMIC)?
                .unwrap_or(defaults.allow_dynamic_context),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject absurd window sizes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let windows = [
            ("lines_before", self.lines_before),
            ("lines_after", self.lines_after),
            ("lines_before_dynamic", self.lines_before_dynamic),
        ];
        for (key, value) in windows {
            if value > MAX_CONTEXT_LINES {
                return Err(ConfigError::TooLarge {
                    key,
                    value,
                    max: MAX_CONTEXT_LINES,
                });
            }
        }
        Ok(())
    }

    /// True when at least one side gets extra lines.
    pub fn extends(&self) -> bool {
        self.lines_before > 0 || self.lines_after > 0
    }
}

fn read_usize<F>(lookup: &F, key: &'static str) -> Result<Option<usize>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<usize>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidValue { key, value: raw })
}

fn read_bool<F>(lookup: &F, key: &'static str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidValue { key, value: raw }),
    }
}
