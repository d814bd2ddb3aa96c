//! Configuration layering for the generate and browse commands.
//!
//! Precedence per field: CLI flag > environment variable > config file > default.
//!
//! Config file lookup: `./second-brain.toml`, then
//! `<config dir>/second-brain/config.toml`. Relative paths inside a config
//! file resolve against the file's own directory.

use crate::{BrainConfig, BrainError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "second-brain.toml";

pub const ENV_WORKSPACE: &str = "SECOND_BRAIN_WORKSPACE";
pub const ENV_NOTES_DIR: &str = "SECOND_BRAIN_NOTES_DIR";
pub const ENV_TRANSCRIPTS_DIR: &str = "SECOND_BRAIN_TRANSCRIPTS_DIR";
pub const ENV_LOGS_DIR: &str = "SECOND_BRAIN_LOGS_DIR";
pub const ENV_EXTRACTION_DIR: &str = "SECOND_BRAIN_EXTRACTION_DIR";
pub const ENV_OUT_DIR: &str = "SECOND_BRAIN_OUT_DIR";

/// On-disk config file. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub workspace_root: Option<PathBuf>,
    pub notes_dir: Option<PathBuf>,
    pub transcripts_dir: Option<PathBuf>,
    pub logs_dir: Option<PathBuf>,
    pub extraction_dir: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
}

impl ConfigFile {
    /// Parse a config file, resolving relative paths against `base`.
    pub fn parse(content: &str, base: &Path) -> Result<Self> {
        let mut file: ConfigFile =
            toml::from_str(content).map_err(|e| BrainError::Config(e.to_string()))?;
        for slot in [
            &mut file.workspace_root,
            &mut file.notes_dir,
            &mut file.transcripts_dir,
            &mut file.logs_dir,
            &mut file.extraction_dir,
            &mut file.out_dir,
        ] {
            if let Some(path) = slot.as_mut() {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        }
        Ok(file)
    }

    /// Load the first config file found, or an empty one.
    pub async fn discover(cwd: &Path) -> Result<Self> {
        let mut candidates = vec![cwd.join(CONFIG_FILE_NAME)];
        if let Some(dir) = dirs::config_dir() {
            candidates.push(dir.join("second-brain").join("config.toml"));
        }

        for path in candidates {
            if !path.exists() {
                continue;
            }
            let content = tokio::fs::read_to_string(&path).await?;
            let base = path.parent().unwrap_or(cwd);
            debug!("Using config file {:?}", path);
            return Self::parse(&content, base);
        }

        Ok(Self::default())
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub workspace_root: Option<PathBuf>,
    pub notes_dir: Option<PathBuf>,
    pub transcripts_dir: Option<PathBuf>,
    pub logs_dir: Option<PathBuf>,
    pub extraction_dir: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
}

/// Merge CLI overrides, environment and config file into a `BrainConfig`.
///
/// `env` is the variable lookup (normally `std::env::var`).
pub fn resolve<F>(cwd: &Path, cli: ConfigOverrides, file: ConfigFile, env: F) -> BrainConfig
where
    F: Fn(&str) -> Option<String>,
{
    let pick = |flag: Option<PathBuf>, var: &str, from_file: Option<PathBuf>| {
        flag.or_else(|| env(var).filter(|v| !v.is_empty()).map(PathBuf::from))
            .or(from_file)
            .map(|p| if p.is_relative() { cwd.join(p) } else { p })
    };

    let workspace_root = pick(cli.workspace_root, ENV_WORKSPACE, file.workspace_root)
        .unwrap_or_else(|| cwd.parent().unwrap_or(cwd).to_path_buf());
    let out_dir = pick(cli.out_dir, ENV_OUT_DIR, file.out_dir)
        .unwrap_or_else(|| cwd.join("public").join("data"));

    let mut config = BrainConfig::new(workspace_root, out_dir);
    if let Some(path) = pick(cli.notes_dir, ENV_NOTES_DIR, file.notes_dir) {
        config = config.with_notes_dir(path);
    }
    if let Some(path) = pick(cli.transcripts_dir, ENV_TRANSCRIPTS_DIR, file.transcripts_dir) {
        config = config.with_transcripts_dir(path);
    }
    if let Some(path) = pick(cli.logs_dir, ENV_LOGS_DIR, file.logs_dir) {
        config = config.with_logs_dir(path);
    }
    if let Some(path) = pick(cli.extraction_dir, ENV_EXTRACTION_DIR, file.extraction_dir) {
        config = config.with_extraction_dir(path);
    }
    config
}
