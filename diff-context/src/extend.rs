//! Context expansion for unified-diff hunks.
//!
//! Each hunk of a patch is widened with unchanged lines taken from the
//! original file: a leading window above the hunk and a trailing window below
//! it. When the new file content is available, the leading window is first
//! searched (over a larger range) for the hunk's section header so that the
//! context starts exactly at the enclosing signature ("dynamic anchor").
//!
//! Hunks whose header does not agree with the original file are passed
//! through untouched. Any hard failure makes
//! [`extend_patch_or_original`] return the input patch verbatim.

use tracing::{debug, info, warn};

use crate::config::ExtendConfig;
use crate::encoding::detect_alternate_encoding;
use crate::errors::{DiffResult, ExpansionError};
use crate::header::{is_header_candidate, parse_hunk_header};
use crate::types::HunkHeader;

/// Extends every valid hunk of `patch` with context from `original`.
///
/// `new` may be empty when the post-change file is not available; dynamic
/// anchoring and the old/new leading-context comparison are then skipped.
pub fn extend_patch(
    patch: &str,
    original: &str,
    new: &str,
    cfg: &ExtendConfig,
) -> DiffResult<String> {
    ContextExpander::new(original, new, cfg).run(patch)
}

/// Best-effort wrapper around [`extend_patch`]: on error the input patch is
/// returned unchanged.
pub fn extend_patch_or_original(
    patch: &str,
    original: &str,
    new: &str,
    cfg: &ExtendConfig,
) -> String {
    match extend_patch(patch, original, new, cfg) {
        Ok(extended) => extended,
        Err(e) => {
            warn!(error = %e, "failed to extend patch, using it unmodified");
            patch.to_string()
        }
    }
}

/// Scanner state; the transition trigger is a line matching the header grammar.
enum ScanState {
    BeforeFirstHunk,
    InHunkBody(OpenHunk),
}

/// What still has to be appended once the body of the current hunk ends.
#[derive(Debug, Clone, Copy)]
struct OpenHunk {
    /// 0-based index of the first original line after the hunk span.
    body_end: usize,
    /// Number of trailing context lines to append.
    trailing: usize,
}

impl OpenHunk {
    fn without_trailing() -> Self {
        Self {
            body_end: 0,
            trailing: 0,
        }
    }
}

/// Resolved bounds of one hunk.
#[derive(Debug, Clone)]
struct HunkWindow {
    header: HunkHeader,
    before: usize,
    trailing: usize,
    /// 0-based index of the first original line after the hunk span.
    body_end: usize,
}

impl HunkWindow {
    fn unextended(header: HunkHeader) -> Self {
        Self {
            header,
            before: 0,
            trailing: 0,
            body_end: 0,
        }
    }

    /// Header with the extended bounds.
    fn extended_header(&self) -> Result<HunkHeader, ExpansionError> {
        let extra = self.before + self.trailing;
        let grow = |size: usize| size.checked_add(extra).ok_or(ExpansionError::Overflow);
        Ok(HunkHeader {
            start1: self.header.start1 - self.before,
            size1: grow(self.header.size1)?,
            start2: self.header.start2 - self.before,
            size2: grow(self.header.size2)?,
            section_header: self.header.section_header.clone(),
        })
    }

    /// 0-based index of the first leading context line.
    fn leading_start(&self) -> usize {
        self.header.start1 - 1 - self.before
    }
}

#[derive(Debug, Default)]
struct ExpandStats {
    hunks: usize,
    extended: usize,
    passed_through: usize,
}

struct ContextExpander<'a> {
    original: Vec<&'a str>,
    new: Vec<&'a str>,
    cfg: &'a ExtendConfig,
}

impl<'a> ContextExpander<'a> {
    fn new(original: &'a str, new: &'a str, cfg: &'a ExtendConfig) -> Self {
        Self {
            original: original.lines().collect(),
            new: new.lines().collect(),
            cfg,
        }
    }

    fn run(&self, patch: &str) -> DiffResult<String> {
        let patch_lines: Vec<&str> = patch.lines().collect();
        let mut out: Vec<String> = Vec::with_capacity(patch_lines.len());
        let mut state = ScanState::BeforeFirstHunk;
        let mut stats = ExpandStats::default();

        for (i, line) in patch_lines.iter().enumerate() {
            if is_header_candidate(line) {
                if let Some(header) = parse_hunk_header(line)? {
                    if let ScanState::InHunkBody(open) = state {
                        self.push_trailing(open, &mut out)?;
                    }
                    let next = patch_lines.get(i + 1).copied();
                    let open = self.open_hunk(line, header, next, &mut out, &mut stats)?;
                    state = ScanState::InHunkBody(open);
                    continue;
                }
            }
            out.push((*line).to_string());
        }

        if let ScanState::InHunkBody(open) = state {
            self.push_trailing(open, &mut out)?;
        }

        debug!(
            hunks = stats.hunks,
            extended = stats.extended,
            passed_through = stats.passed_through,
            "patch context extended"
        );
        Ok(out.join("\n"))
    }

    /// Emits the separator, header and leading context of a new hunk.
    fn open_hunk(
        &self,
        raw_header: &str,
        header: HunkHeader,
        next_line: Option<&str>,
        out: &mut Vec<String>,
        stats: &mut ExpandStats,
    ) -> Result<OpenHunk, ExpansionError> {
        stats.hunks += 1;
        out.push(String::new());

        if !self.is_valid_hunk(&header, next_line) {
            stats.passed_through += 1;
            out.push(raw_header.to_string());
            return Ok(OpenHunk::without_trailing());
        }

        let window = self.resolve_window(header)?;
        if window.before > 0 || window.trailing > 0 {
            stats.extended += 1;
        }

        out.push(window.extended_header()?.to_string());
        if window.before > 0 {
            for l in self.original_range(window.leading_start(), window.before)? {
                out.push(format!(" {l}"));
            }
        }

        Ok(OpenHunk {
            body_end: window.body_end,
            trailing: window.trailing,
        })
    }

    fn push_trailing(&self, open: OpenHunk, out: &mut Vec<String>) -> Result<(), ExpansionError> {
        if open.trailing == 0 {
            return Ok(());
        }
        for l in self.original_range(open.body_end, open.trailing)? {
            out.push(format!(" {l}"));
        }
        Ok(())
    }

    /// A hunk is valid when the first context/removed line after its header
    /// matches the original file at `start1` (modulo surrounding whitespace).
    fn is_valid_hunk(&self, header: &HunkHeader, next_line: Option<&str>) -> bool {
        let Some(next) = next_line else {
            return true;
        };
        let Some(content) = next.strip_prefix(' ').or_else(|| next.strip_prefix('-')) else {
            return true;
        };

        let Some(original_line) = header
            .start1
            .checked_sub(1)
            .and_then(|idx| self.original.get(idx))
        else {
            info!(
                line = header.start1,
                len = self.original.len(),
                "invalid hunk in patch, header line is outside the original file"
            );
            return false;
        };

        if content.trim() == original_line.trim() {
            return true;
        }

        // Mirrors the provider-side check; a line that round-trips is already
        // equal above, so this only changes which message is logged.
        if let Some(encoding) = detect_alternate_encoding(original_line, content) {
            debug!(
                line = header.start1,
                encoding, "hunk header line matches the original under a different encoding"
            );
            return false;
        }

        info!(
            line = header.start1,
            "invalid hunk in patch, header line doesn't match the original file content"
        );
        false
    }

    /// Computes leading/trailing counts for a valid hunk.
    fn resolve_window(&self, mut header: HunkHeader) -> Result<HunkWindow, ExpansionError> {
        if !self.cfg.extends() || header.start1 == 0 || header.start2 == 0 {
            return Ok(HunkWindow::unextended(header));
        }

        let start_idx = header.start1 - 1;
        if start_idx > self.original.len() {
            debug!(
                line = header.start1,
                len = self.original.len(),
                "hunk starts past the end of the original file, not extending"
            );
            return Ok(HunkWindow::unextended(header));
        }

        let body_end = start_idx
            .checked_add(header.size1)
            .ok_or(ExpansionError::Overflow)?;
        let trailing = self
            .cfg
            .lines_after
            .min(self.original.len().saturating_sub(body_end));
        let max_before = start_idx.min(header.start2 - 1);

        let mut anchored: Option<usize> = None;
        if self.cfg.allow_dynamic_context && !self.new.is_empty() {
            let n = self.cfg.lines_before_dynamic.min(max_before);
            match self.unchanged_leading(&header, n)? {
                Some(lines) => {
                    if let Some(i) = find_section_header(lines, &header.section_header) {
                        debug!(
                            line = header.start1,
                            offset = i,
                            section = %header.section_header,
                            "dynamic anchor found in leading context"
                        );
                        header.section_header.clear();
                        anchored = Some(n - i);
                    }
                }
                None => debug!(
                    line = header.start1,
                    window = n,
                    "extra lines before hunk differ in original and new file (dynamic context)"
                ),
            }
        }

        let before = match anchored {
            Some(before) => before,
            None => {
                let n = self.cfg.lines_before.min(max_before);
                if !self.new.is_empty() && self.unchanged_leading(&header, n)?.is_none() {
                    debug!(
                        line = header.start1,
                        window = n,
                        "extra lines before hunk differ in original and new file"
                    );
                    return Ok(HunkWindow::unextended(header));
                }
                if !self.cfg.allow_dynamic_context {
                    let leading = self.original_range(start_idx - n, n)?;
                    if find_section_header(leading, &header.section_header).is_some() {
                        header.section_header.clear();
                    }
                }
                n
            }
        };

        Ok(HunkWindow {
            header,
            before,
            trailing,
            body_end,
        })
    }

    /// Original lines in the `n`-line window above the hunk, or `None` when the
    /// same window in the new file differs (an earlier hunk touched it).
    fn unchanged_leading(
        &self,
        header: &HunkHeader,
        n: usize,
    ) -> Result<Option<&[&'a str]>, ExpansionError> {
        let start_idx = header.start1 - 1;
        let original = self.original_range(start_idx - n, n)?;
        let new_end = header.start2 - 1;
        let new = self.new.get(new_end - n..new_end);
        Ok(new.filter(|new| *new == original).map(|_| original))
    }

    fn original_range(&self, start: usize, len: usize) -> Result<&[&'a str], ExpansionError> {
        let end = start.checked_add(len).ok_or(ExpansionError::Overflow)?;
        self.original
            .get(start..end)
            .ok_or(ExpansionError::OutOfBounds {
                line: end,
                len: self.original.len(),
            })
    }
}

/// Offset of the first line containing a non-empty section header.
fn find_section_header(lines: &[&str], section_header: &str) -> Option<usize> {
    if section_header.is_empty() {
        return None;
    }
    lines.iter().position(|l| l.contains(section_header))
}
