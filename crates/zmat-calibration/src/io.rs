//! Profile persistence.
//!
//! Profiles live in `$XDG_CONFIG_HOME/zmat/` (or `~/.config/zmat/`), with a
//! dot-file in the working directory as fallback.

use std::path::{Path, PathBuf};

use crate::profile::{self, CalibrationProfile};

const PROFILE_FILENAME: &str = "zmat_calibration.json";
const CONFIG_DIR_NAME: &str = "zmat";

/// Why a stored profile was not used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Version,
    Thresholds,
    Cpu,
}

/// Load the first readable profile from the standard locations.
#[must_use]
pub fn load_profile() -> Option<CalibrationProfile> {
    candidate_paths()
        .into_iter()
        .filter(|p| p.exists())
        .find_map(|p| load_from_path(&p))
}

/// Check a loaded profile against this build and this machine.
pub fn validate(p: &CalibrationProfile) -> Result<(), Rejection> {
    if !p.is_compatible() {
        return Err(Rejection::Version);
    }
    if !p.is_valid() {
        return Err(Rejection::Thresholds);
    }
    if !p.matches_cpu(&profile::cpu_fingerprint()) {
        return Err(Rejection::Cpu);
    }
    Ok(())
}

/// Load a profile and drop it if it does not validate.
#[must_use]
pub fn load_validated_profile() -> Option<CalibrationProfile> {
    let p = load_profile()?;
    match validate(&p) {
        Ok(()) => Some(p),
        Err(reason) => {
            tracing::info!(?reason, "ignoring cached calibration profile");
            None
        }
    }
}

/// Save to the config directory, or the working directory if there is none.
pub fn save_profile(p: &CalibrationProfile) -> std::io::Result<PathBuf> {
    let path = match xdg_profile_path() {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            path
        }
        None => cwd_profile_path(),
    };
    save_to_path(p, &path)?;
    Ok(path)
}

pub fn save_to_path(p: &CalibrationProfile, path: &Path) -> std::io::Result<()> {
    let content = serde_json::to_string_pretty(p).map_err(std::io::Error::other)?;
    std::fs::write(path, content)
}

/// Read a profile, treating unreadable or malformed files as absent.
#[must_use]
pub fn load_from_path(path: &Path) -> Option<CalibrationProfile> {
    let content = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(p) => Some(p),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "malformed calibration profile");
            None
        }
    }
}

/// Delete the first saved profile found. Returns whether one existed.
pub fn delete_profile() -> std::io::Result<bool> {
    for path in candidate_paths() {
        if path.exists() {
            std::fs::remove_file(&path)?;
            return Ok(true);
        }
    }
    Ok(false)
}

fn candidate_paths() -> Vec<PathBuf> {
    xdg_profile_path()
        .into_iter()
        .chain(std::iter::once(cwd_profile_path()))
        .collect()
}

fn xdg_profile_path() -> Option<PathBuf> {
    let config_dir = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(config_dir.join(CONFIG_DIR_NAME).join(PROFILE_FILENAME))
}

fn cwd_profile_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(format!(".{PROFILE_FILENAME}"))
}
