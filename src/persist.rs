//! Autosaved draft of the pasted blocks, so an interrupted session can pick up where it
//! left off.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::ProfileInputs;

const CACHE_DIR: &str = "match_profiler";
const DRAFT_FILE: &str = "draft.json";
const DRAFT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DraftFile {
    version: u32,
    saved_at: i64,
    inputs: ProfileInputs,
}

pub fn app_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

pub fn default_draft_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join(DRAFT_FILE))
}

/// Written to a sibling temp file first, then renamed over the draft.
pub fn save_draft(path: &Path, inputs: &ProfileInputs) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed creating draft dir {}", dir.display()))?;
    }
    let draft = DraftFile {
        version: DRAFT_VERSION,
        saved_at: chrono::Utc::now().timestamp(),
        inputs: inputs.clone(),
    };
    let json = serde_json::to_string(&draft).context("failed encoding draft")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("failed writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("failed replacing {}", path.display()))?;
    Ok(())
}

/// `None` when there is no draft, or it is unreadable or from another version.
pub fn load_draft(path: &Path) -> Option<ProfileInputs> {
    let raw = fs::read_to_string(path).ok()?;
    let draft = match serde_json::from_str::<DraftFile>(&raw) {
        Ok(draft) => draft,
        Err(err) => {
            debug!(path = %path.display(), %err, "ignoring unreadable draft");
            return None;
        }
    };
    if draft.version != DRAFT_VERSION {
        return None;
    }
    Some(draft.inputs)
}

pub fn clear_draft(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).with_context(|| format!("failed removing {}", path.display())),
    }
}
