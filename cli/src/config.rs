//! CLI Configuration

use anyhow::Context;
use serde::{Deserialize, Serialize};
use slotdesk_core::GateConfig;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub tenant_id: Option<String>,
    pub default_format: Option<String>,
    #[serde(default)]
    pub gate: GateConfig,
}

impl Config {
    pub fn load(profile: Option<&str>) -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path(profile)?)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, profile: Option<&str>) -> anyhow::Result<PathBuf> {
        let path = Self::config_path(profile)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn config_path(profile: Option<&str>) -> anyhow::Result<PathBuf> {
        let home = dirs::home_dir().context("Cannot find home directory")?;
        let filename = match profile {
            Some(p) => format!("config.{}.toml", p),
            None => "config.toml".to_string(),
        };
        Ok(home.join(".slotdesk").join(filename))
    }
}

/// Mask all but the first eight characters of a key
pub fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(8).collect();
    format!("{}****", visible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotdesk_core::SearchPolicy;

    #[test]
    fn test_round_trip_with_gate_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.tenant_id = Some("seller-1".into());
        config.gate.search_policy = SearchPolicy::Enforce;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.tenant_id.as_deref(), Some("seller-1"));
        assert_eq!(loaded.gate.search_policy, SearchPolicy::Enforce);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(loaded.api_key.is_none());
        assert_eq!(loaded.gate.full_set_page_size, 100);
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("sd_live_abcdef"), "sd_live_****");
        assert_eq!(mask_key("abc"), "abc****");
    }
}
