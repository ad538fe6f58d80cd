use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$FINMATE_HOME`, or `~/.finmate` when unset.
pub fn finmate_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("FINMATE_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".finmate"))
}

pub fn ensure_finmate_home() -> Result<PathBuf> {
    let dir = finmate_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
