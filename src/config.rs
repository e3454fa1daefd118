use anyhow::Result;
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::path::PathBuf;

use crate::theme::ThemeSpec;

/// Options recognized at picker construction. Everything is optional;
/// `Default` gives a full-size picker on today's date with the default
/// theme.
#[derive(Debug, Clone, Default)]
pub struct PickerOpts {
    /// Stacking order when several pickers overlap in one host.
    pub z_index: Option<u16>,
    /// Hides the large display-date label.
    pub compact_mode: bool,
    /// Hides the calendar/time view toggle.
    pub disable_time_section: bool,
    /// Initial selection; defaults to now.
    pub selected_date: Option<NaiveDateTime>,
    pub theme: Option<ThemeSpec>,
}

/// Demo-app configuration, read from `<config dir>/daypick/config.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    pub picker: Option<PickerSection>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PickerSection {
    pub z_index:              Option<u16>,
    pub compact_mode:         Option<bool>,
    pub disable_time_section: Option<bool>,
    pub theme:                Option<ThemeSpec>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let path = config_dir().join("config.toml");
        if path.exists() {
            Ok(toml::from_str(&std::fs::read_to_string(&path)?)?)
        } else {
            Ok(AppConfig::default())
        }
    }

    pub fn picker_opts(&self) -> PickerOpts {
        let section = self.picker.as_ref();
        PickerOpts {
            z_index:              section.and_then(|s| s.z_index),
            compact_mode:         section.and_then(|s| s.compact_mode).unwrap_or(false),
            disable_time_section: section.and_then(|s| s.disable_time_section).unwrap_or(false),
            selected_date:        None,
            theme:                section.and_then(|s| s.theme.clone()),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("daypick")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picker_section_parses_named_and_custom_themes() {
        let cfg: AppConfig = toml::from_str(
            "[picker]\nz_index = 40\ntheme = \"light\"\n",
        )
        .unwrap();
        let opts = cfg.picker_opts();
        assert_eq!(opts.z_index, Some(40));
        assert_eq!(opts.theme, Some(ThemeSpec::Named("light".into())));

        let cfg: AppConfig = toml::from_str(
            "[picker]\ncompact_mode = true\n[picker.theme]\nbg = \"#101010\"\n",
        )
        .unwrap();
        let opts = cfg.picker_opts();
        assert!(opts.compact_mode);
        match opts.theme {
            Some(ThemeSpec::Custom(vars)) => assert_eq!(vars["bg"], "#101010"),
            other => panic!("expected custom theme, got {other:?}"),
        }
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let cfg = AppConfig::default();
        let opts = cfg.picker_opts();
        assert_eq!(opts.z_index, None);
        assert!(!opts.compact_mode);
        assert!(!opts.disable_time_section);
        assert!(opts.theme.is_none());
    }
}
