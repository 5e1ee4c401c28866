//! Input/output data model shared by the expander and the numberer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of change a provider reports for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditType {
    Added,
    Modified,
    Deleted,
    Renamed,
    Unknown,
}

impl EditType {
    /// Accepts provider codes (`A`, `M`, `D`, `R`) and full words, case-insensitive.
    /// Anything unrecognized maps to [`EditType::Unknown`].
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "added" => EditType::Added,
            "m" | "modified" => EditType::Modified,
            "d" | "deleted" => EditType::Deleted,
            "r" | "renamed" => EditType::Renamed,
            _ => EditType::Unknown,
        }
    }

    pub fn is_deleted(self) -> bool {
        self == EditType::Deleted
    }
}

impl FromStr for EditType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(EditType::parse(s))
    }
}

/// Parsed `@@ -start1,size1 +start2,size2 @@ section_header` line.
///
/// `start*` are 1-based; `0` is used by diff tools for "no content on this side".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HunkHeader {
    pub start1: usize,
    pub size1: usize,
    pub start2: usize,
    pub size2: usize,
    pub section_header: String,
}

impl fmt::Display for HunkHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "@@ -{},{} +{},{} @@ {}",
            self.start1, self.size1, self.start2, self.size2, self.section_header
        )
    }
}

/// A single file change as handed over by the provider layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileDiff {
    pub path: String,
    pub edit_type: EditType,
    /// Full pre-change content.
    pub original: String,
    /// Full post-change content; empty when unavailable.
    #[serde(default)]
    pub new: String,
    /// Unified diff, hunks only.
    pub patch: String,
}
