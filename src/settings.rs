use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const KEY_REST_AUTO_START: &str = "rest_auto_start";
pub const KEY_REST_DEFAULT_SECS: &str = "rest_default_secs";
pub const KEY_WEIGHT_UNIT: &str = "weight_unit";

/// Key-value user preferences, persisted as a flat TOML table. Read at
/// startup, written on change. Not part of the core decision logic except
/// as inputs to the rest timer and weight display.
#[derive(Debug, Default, Clone)]
pub struct Settings {
    pub map: BTreeMap<String, String>,
}

impl Settings {
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join("gymsprout").join("config"))
            .context("could not determine config directory")
    }

    /// A missing file is an empty config, not an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let map: BTreeMap<String, String> = toml::from_str(&content)
            .with_context(|| format!("invalid config file: {}", path.display()))?;

        Ok(Self { map })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let content = toml::to_string(&self.map)?;
        fs::write(path, content)
            .with_context(|| format!("failed to write config: {}", path.display()))
    }

    /// Whether the rest timer auto-starts after a logged set.
    pub fn rest_auto_start(&self) -> bool {
        self.map
            .get(KEY_REST_AUTO_START)
            .map(|v| v != "false")
            .unwrap_or(true)
    }

    /// Fallback rest seconds when no goal-specific default applies.
    pub fn rest_default_secs(&self) -> u32 {
        self.map
            .get(KEY_REST_DEFAULT_SECS)
            .and_then(|v| v.parse().ok())
            .unwrap_or(60)
    }

    /// Display unit only; weights are stored as entered.
    pub fn weight_unit(&self) -> &str {
        self.map
            .get(KEY_WEIGHT_UNIT)
            .map(String::as_str)
            .unwrap_or("kg")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_any_keys() {
        let s = Settings::default();
        assert!(s.rest_auto_start());
        assert_eq!(s.rest_default_secs(), 60);
        assert_eq!(s.weight_unit(), "kg");
    }

    #[test]
    fn typed_accessors_read_the_map() {
        let mut s = Settings::default();
        s.map.insert(KEY_REST_AUTO_START.into(), "false".into());
        s.map.insert(KEY_REST_DEFAULT_SECS.into(), "90".into());
        s.map.insert(KEY_WEIGHT_UNIT.into(), "lb".into());

        assert!(!s.rest_auto_start());
        assert_eq!(s.rest_default_secs(), 90);
        assert_eq!(s.weight_unit(), "lb");
    }

    #[test]
    fn garbage_values_fall_back() {
        let mut s = Settings::default();
        s.map.insert(KEY_REST_DEFAULT_SECS.into(), "soon".into());
        assert_eq!(s.rest_default_secs(), 60);
    }
}
