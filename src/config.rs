// ============================================================================
// CONFIGURATION - optional config.toml, every field has a default
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::theme::{Palette, Theme, builtin_palette};

pub const APP_DIR: &str = "household-ledger";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Offset used to decide what "today" is.
    pub utc_offset_hours: i32,
    pub data_dir: Option<PathBuf>,
    pub log_level: String,
    /// Cells kept free between the date popover and the terminal edge.
    pub popover_margin: u16,
    pub page_size: usize,
    /// Rows from the bottom of the list that trigger loading the next page.
    pub scroll_threshold: usize,
    pub swipe_threshold: u16,
    pub max_swipe: u16,
    pub profile: String,
    pub shared: bool,
    pub palettes: BTreeMap<String, Palette>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: 9,
            data_dir: None,
            log_level: "info".to_string(),
            popover_margin: 1,
            page_size: 15,
            scroll_threshold: 3,
            swipe_threshold: 7,
            max_swipe: 9,
            profile: "default".to_string(),
            shared: false,
            palettes: BTreeMap::new(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
        .ok_or_else(|| anyhow!("Could not determine config directory"))
}

/// Reads the user's config. A missing file is not an error.
pub fn load_config() -> Result<AppConfig> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: AppConfig =
        toml::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

impl AppConfig {
    fn validate(&self) -> Result<()> {
        if !(-12..=14).contains(&self.utc_offset_hours) {
            return Err(anyhow!(
                "utc_offset_hours must be between -12 and 14, got {}",
                self.utc_offset_hours
            ));
        }
        if self.page_size == 0 {
            return Err(anyhow!("page_size must be at least 1"));
        }
        if self.swipe_threshold > self.max_swipe {
            return Err(anyhow!("swipe_threshold cannot exceed max_swipe"));
        }
        self.theme()?;
        Ok(())
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| anyhow!("Could not determine data directory"))
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }

    /// Shared (group) ledgers always use the group palette.
    pub fn theme(&self) -> Result<Theme> {
        let name = if self.shared { "group" } else { self.profile.as_str() };
        let palette = self
            .palettes
            .get(name)
            .cloned()
            .or_else(|| builtin_palette(name))
            .or_else(|| builtin_palette("default"))
            .ok_or_else(|| anyhow!("no palette named '{name}'"))?;
        Theme::from_palette(&palette).with_context(|| format!("palette '{name}'"))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use ratatui::style::Color;

    use super::*;

    fn write_config(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_file_gives_defaults() {
        let file = write_config("");
        assert_eq!(load_config_from(file.path()).unwrap(), AppConfig::default());
    }

    #[test]
    fn overrides_and_custom_palette() {
        let file = write_config(
            r##"
utc_offset_hours = 0
page_size = 20
profile = "mint"
log_level = "debug"

[palettes.mint]
main = "#3eb489"
hover = "#2e9c74"
"##,
        );
        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.utc_offset_hours, 0);
        assert_eq!(config.page_size, 20);
        assert_eq!(config.log_level(), log::LevelFilter::Debug);
        assert_eq!(config.theme().unwrap().main, Color::Rgb(0x3e, 0xb4, 0x89));
    }

    #[test]
    fn shared_ledger_uses_group_palette() {
        let config = AppConfig {
            shared: true,
            profile: "rose".into(),
            ..AppConfig::default()
        };
        assert_eq!(config.theme().unwrap().main, Color::Rgb(0xff, 0xd9, 0x66));
    }

    #[test]
    fn unknown_profile_falls_back_to_default() {
        let config = AppConfig {
            profile: "nobody".into(),
            ..AppConfig::default()
        };
        assert_eq!(config.theme().unwrap(), Theme::default());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(load_config_from(write_config("page_size = 0").path()).is_err());
        assert!(load_config_from(write_config("utc_offset_hours = 30").path()).is_err());
        assert!(load_config_from(write_config("page_size = \"many\"").path()).is_err());
        let bad_color = "profile = \"x\"\n[palettes.x]\nmain = \"red\"\nhover = \"#000000\"\n";
        assert!(load_config_from(write_config(bad_color).path()).is_err());
    }
}
