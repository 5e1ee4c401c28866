//! Diff post-processing for review prompts.
//!
//! Two passes applied in sequence to a provider patch:
//!
//! 1) **Context expansion** ([`extend`])
//!    - Widen each hunk with unchanged lines from the original file
//!    - Snap the leading window to the hunk's section header when possible
//!    - Pass hunks whose header disagrees with the file through untouched
//!
//! 2) **Renumbering** ([`numbering`])
//!    - Emit `__new hunk__` blocks with absolute new-file line numbers
//!    - Emit `__old hunk__` blocks (no numbers) when lines were removed
//!
//! Both passes are synchronous and keep no state between calls. Expansion is
//! best-effort: on failure the unmodified patch is renumbered instead.

pub mod config;
pub mod encoding;
pub mod errors;
pub mod extend;
pub mod header;
pub mod numbering;
pub mod telemetry;
pub mod types;

pub use config::ExtendConfig;
pub use errors::{DiffResult, Error};
pub use types::{EditType, FileDiff, HunkHeader};

use tracing::debug;

/// Extends `patch` with context and renders it with new-file line numbers,
/// using the default context windows.
pub fn extend_and_annotate_diff(
    original_file_content: &str,
    new_file_content: &str,
    patch: &str,
    file_path: &str,
    edit_type: EditType,
) -> String {
    extend_and_annotate_diff_with(
        original_file_content,
        new_file_content,
        patch,
        file_path,
        edit_type,
        &ExtendConfig::default(),
    )
}

/// Same as [`extend_and_annotate_diff`] with explicit context windows.
pub fn extend_and_annotate_diff_with(
    original_file_content: &str,
    new_file_content: &str,
    patch: &str,
    file_path: &str,
    edit_type: EditType,
    cfg: &ExtendConfig,
) -> String {
    if edit_type.is_deleted() {
        debug!(file = file_path.trim(), "file deleted, skipping hunk processing");
        return numbering::annotate_hunks(patch, file_path, true);
    }

    let extended = extend::extend_patch_or_original(
        patch,
        original_file_content,
        new_file_content,
        cfg,
    );
    numbering::annotate_hunks(&extended, file_path, false)
}

impl FileDiff {
    /// Runs both passes over this file change.
    pub fn render(&self, cfg: &ExtendConfig) -> String {
        extend_and_annotate_diff_with(
            &self.original,
            &self.new,
            &self.patch,
            &self.path,
            self.edit_type,
            cfg,
        )
    }
}
