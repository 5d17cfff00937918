//! File load and save.
//!
//! Documents are stored newline-terminated: save joins the lines with `\n`
//! and appends a final one, load strips exactly one trailing `\n` before
//! splitting, so load-save round-trips byte for byte and interior blank
//! lines survive.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Read `path` into lines. A missing file starts an empty document; any
/// other read failure surfaces.
pub fn load_lines(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        debug!(target: "io", path = %path.display(), "file_absent_starting_empty");
        return Ok(Vec::new());
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    debug!(
        target: "io",
        path = %path.display(),
        size_bytes = content.len(),
        "file_read_ok"
    );
    Ok(split_lines(&content))
}

/// Write lines back to `path`, optionally copying the previous content to
/// `<path>.bak` first. The backup is best effort; a failed copy is logged
/// and the save proceeds.
///
/// The content goes to a sibling temporary file first and is renamed over
/// the target, so a failure mid-write cannot truncate the original.
pub fn save_lines(path: &Path, lines: &[String], backup: bool) -> Result<()> {
    if backup && path.exists() {
        let bak = sibling(path, ".bak");
        if let Err(error) = fs::copy(path, &bak) {
            warn!(target: "io", path = %bak.display(), %error, "backup_failed");
        }
    }
    let mut content = lines.join("\n");
    content.push('\n');
    let tmp = sibling(path, ".tmp");
    fs::write(&tmp, &content).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("rename over {}", path.display()))?;
    debug!(
        target: "io",
        path = %path.display(),
        line_count = lines.len(),
        "file_write_ok"
    );
    Ok(())
}

fn split_lines(content: &str) -> Vec<String> {
    content
        .strip_suffix('\n')
        .unwrap_or(content)
        .split('\n')
        .map(str::to_string)
        .collect()
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}
