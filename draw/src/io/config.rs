//! Draw configuration stored in `draw.toml`.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::types::Prize;
use crate::seed::default_prizes;

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "draw.toml";

/// Draw configuration (TOML).
///
/// This file is edited by humans before the event. Missing fields fall back
/// to the built-in prize catalog and a mock roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DrawConfig {
    /// Fixed seed for the authoritative draw RNG. Unset means entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Minimum time between spin frames.
    pub tick_interval_ms: u64,

    /// How long `draw run` spins before stopping each draw.
    pub spin_duration_ms: u64,

    /// Winner export destination. `.csv` writes CSV, anything else xlsx.
    pub export_path: PathBuf,

    /// Size of the generated roster used when `roster_path` is unset.
    pub mock_participants: u32,

    /// Spreadsheet (`.xlsx`, `.xls`, `.csv`) to import at session start.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roster_path: Option<PathBuf>,

    /// Prize catalog, in draw/export order.
    pub prizes: Vec<Prize>,

    /// Prize id to designated participant ids, in priority order.
    pub rigging: BTreeMap<String, Vec<String>>,

    pub audio: AudioConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct AudioConfig {
    /// Cue played when a spin starts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spin: Option<PathBuf>,
    /// Cue played when a winner is revealed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub win: Option<PathBuf>,
    pub muted: bool,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tick_interval_ms: 50,
            spin_duration_ms: 1_500,
            export_path: PathBuf::from("中奖名单.xlsx"),
            mock_participants: 50,
            roster_path: None,
            prizes: default_prizes(),
            rigging: BTreeMap::new(),
            audio: AudioConfig::default(),
        }
    }
}

impl DrawConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(anyhow!("tick_interval_ms must be > 0"));
        }
        if self.export_path.as_os_str().is_empty() {
            return Err(anyhow!("export_path must be non-empty"));
        }
        let mut ids = HashSet::new();
        for prize in &self.prizes {
            if prize.count == 0 {
                return Err(anyhow!("prize '{}' count must be >= 1", prize.id));
            }
            if !ids.insert(prize.id.as_str()) {
                return Err(anyhow!("duplicate prize id '{}'", prize.id));
            }
        }
        for prize_id in self.rigging.keys() {
            if !ids.contains(prize_id.as_str()) {
                return Err(anyhow!("rigging references unknown prize '{}'", prize_id));
            }
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn spin_duration(&self) -> Duration {
        Duration::from_millis(self.spin_duration_ms)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `DrawConfig::default()`.
pub fn load_config(path: &Path) -> Result<DrawConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config missing, using defaults");
        let cfg = DrawConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: DrawConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &DrawConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, DrawConfig::default());
        assert_eq!(cfg.prizes.len(), 5);
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("draw.toml");
        let mut cfg = DrawConfig {
            seed: Some(7),
            ..DrawConfig::default()
        };
        cfg.rigging
            .insert("p1".to_string(), vec!["u3".to_string(), "u9".to_string()]);

        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");

        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("draw.toml");
        fs::write(
            &path,
            "seed = 3\n\n[[prizes]]\nid = \"a\"\nname = \"Mug\"\ncount = 2\nlevel = 1\n",
        )
        .expect("write");

        let cfg = load_config(&path).expect("load");

        assert_eq!(cfg.seed, Some(3));
        assert_eq!(cfg.prizes.len(), 1);
        assert_eq!(cfg.prizes[0].image, None);
        assert_eq!(cfg.tick_interval_ms, 50);
    }

    #[test]
    fn rejects_zero_count_prize() {
        let cfg = DrawConfig {
            prizes: vec![Prize {
                id: "p".to_string(),
                name: "P".to_string(),
                count: 0,
                level: 1,
                image: None,
            }],
            ..DrawConfig::default()
        };
        let err = cfg.validate().expect_err("invalid");
        assert!(err.to_string().contains("count must be >= 1"));
    }

    #[test]
    fn rejects_rigging_for_unknown_prize() {
        let mut cfg = DrawConfig::default();
        cfg.rigging.insert("ghost".to_string(), vec!["u1".to_string()]);
        let err = cfg.validate().expect_err("invalid");
        assert!(err.to_string().contains("unknown prize 'ghost'"));
    }
}
