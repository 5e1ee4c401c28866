//! Hunk renumbering for LLM consumption.
//!
//! Converts a (possibly context-extended) patch into `__new hunk__` /
//! `__old hunk__` blocks. Only the new side carries absolute line numbers:
//!
//! ```text
//! ## File: 'src/file.ts'
//!
//! @@ -5,2 +5,3 @@ void foo()
//! __new hunk__
//! 5  a
//! 6 +c
//! 7 +d
//! __old hunk__
//!  a
//! -b
//! ```

use tracing::debug;

use crate::header::{is_header_candidate, parse_hunk_header_lenient};

const NEW_HUNK_MARKER: &str = "__new hunk__";
const OLD_HUNK_MARKER: &str = "__old hunk__";
const NO_NEWLINE_MARKER: &str = "no newline at end of file";

/// Renders `patch` as numbered hunks for `file_path`.
///
/// Deleted files short-circuit to a one-line notice.
pub fn annotate_hunks(patch: &str, file_path: &str, is_deleted: bool) -> String {
    let file_path = file_path.trim();
    if is_deleted {
        return format!("\n\nFile '{file_path}' was deleted\n");
    }

    let mut out = format!("\n\n## File: '{file_path}'\n");
    let lines: Vec<&str> = patch.lines().collect();
    let mut current: Option<HunkAccumulator<'_>> = None;
    let mut flushed = 0usize;

    for (i, line) in lines.iter().copied().enumerate() {
        if contains_ignore_ascii_case(line, NO_NEWLINE_MARKER) {
            continue;
        }

        if is_header_candidate(line) {
            // Lines that don't follow the header grammar are dropped.
            let Some(header) = parse_hunk_header_lenient(line) else {
                continue;
            };
            if let Some(prev) = current.take() {
                if !prev.is_empty() {
                    prev.flush(&mut out);
                    flushed += 1;
                }
            }
            current = Some(HunkAccumulator::new(line, header.start2));
            continue;
        }

        // Anything before the first header is a file-level prelude.
        let Some(acc) = current.as_mut() else {
            continue;
        };

        if line.starts_with('+') {
            acc.new_lines.push(line);
        } else if line.starts_with('-') {
            acc.old_lines.push(line);
        } else {
            if line.is_empty() && i > 0 && is_separator_position(&lines, i) {
                continue;
            }
            acc.new_lines.push(line);
            acc.old_lines.push(line);
        }
    }

    if let Some(last) = current {
        if !last.new_lines.is_empty() {
            last.flush(&mut out);
            flushed += 1;
        }
    }

    debug!(file = file_path, hunks = flushed, "hunks annotated with line numbers");
    out.truncate(out.trim_end().len());
    out
}

fn contains_ignore_ascii_case(line: &str, needle: &str) -> bool {
    let needle = needle.as_bytes();
    line.as_bytes()
        .windows(needle.len())
        .any(|w| w.eq_ignore_ascii_case(needle))
}

/// A blank line right before the next header, or the last line of input.
fn is_separator_position(lines: &[&str], i: usize) -> bool {
    match lines.get(i + 1) {
        Some(next) => is_header_candidate(next),
        None => true,
    }
}

/// Lines collected for one hunk, reset at every header boundary.
struct HunkAccumulator<'a> {
    header_line: &'a str,
    start2: usize,
    /// Context + added lines, i.e. the new-file view.
    new_lines: Vec<&'a str>,
    /// Context + removed lines, i.e. the old-file view.
    old_lines: Vec<&'a str>,
}

impl<'a> HunkAccumulator<'a> {
    fn new(header_line: &'a str, start2: usize) -> Self {
        Self {
            header_line,
            start2,
            new_lines: Vec::new(),
            old_lines: Vec::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.new_lines.is_empty() && self.old_lines.is_empty()
    }

    fn flush(&self, out: &mut String) {
        out.push('\n');
        out.push_str(self.header_line);
        out.push('\n');

        let has_added = self.new_lines.iter().any(|l| l.starts_with('+'));
        let has_removed = self.old_lines.iter().any(|l| l.starts_with('-'));

        // Context-only hunks keep their header but get no blocks.
        if has_added || has_removed {
            push_marker(out, NEW_HUNK_MARKER);
            for (offset, l) in self.new_lines.iter().enumerate() {
                // Clamp at usize::MAX: the lenient lexer accepts any counter.
                out.push_str(&format!("{} {l}\n", self.start2.saturating_add(offset)));
            }
        }
        if has_removed {
            push_marker(out, OLD_HUNK_MARKER);
            for l in &self.old_lines {
                out.push_str(l);
                out.push('\n');
            }
        }
    }
}

fn push_marker(out: &mut String, marker: &str) {
    out.truncate(out.trim_end().len());
    out.push('\n');
    out.push_str(marker);
    out.push('\n');
}
