//! Hunk header lexer.
//!
//! Grammar: `@@ -<start1>[,<size1>] +<start2>[,<size2>] @@[ ]<section header>`.
//! Omitted counters default to `0`.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::errors::ExpansionError;
use crate::types::HunkHeader;

static HUNK_HEADER_RE: OnceLock<Regex> = OnceLock::new();

fn hunk_header_re() -> &'static Regex {
    HUNK_HEADER_RE.get_or_init(|| {
        Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@[ ]?(.*)$")
            .unwrap_or_else(|e| unreachable!("static hunk header regex: {e}"))
    })
}

/// True for every line the scanners treat as a header candidate.
pub fn is_header_candidate(line: &str) -> bool {
    line.starts_with("@@")
}

/// Parses a header line.
///
/// Returns `Ok(None)` when the line does not follow the grammar and
/// `Err` when a counter does not fit into `usize`.
pub fn parse_hunk_header(line: &str) -> Result<Option<HunkHeader>, ExpansionError> {
    let Some(caps) = hunk_header_re().captures(line) else {
        return Ok(None);
    };
    let number = |idx: usize| -> Result<usize, ExpansionError> {
        read_counter(&caps, idx, line)
    };
    Ok(Some(HunkHeader {
        start1: number(1)?,
        size1: number(2)?,
        start2: number(3)?,
        size2: number(4)?,
        section_header: caps
            .get(5)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
    }))
}

/// Lenient variant for the numbering pass: unrepresentable counters become `0`.
pub fn parse_hunk_header_lenient(line: &str) -> Option<HunkHeader> {
    let caps = hunk_header_re().captures(line)?;
    let number = |idx: usize| read_counter(&caps, idx, line).unwrap_or(0);
    Some(HunkHeader {
        start1: number(1),
        size1: number(2),
        start2: number(3),
        size2: number(4),
        section_header: caps
            .get(5)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
    })
}

fn read_counter(caps: &Captures<'_>, idx: usize, line: &str) -> Result<usize, ExpansionError> {
    match caps.get(idx) {
        None => Ok(0),
        Some(m) => m
            .as_str()
            .parse::<usize>()
            .map_err(|_| ExpansionError::InvalidHunkHeader(line.to_string())),
    }
}
