use std::{
    fs::{self, create_dir_all, File},
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};

use crate::{APP_NAME, APP_VERSION};

use super::VoltraySettings;

const SETTINGS_FILE: &str = "settings.ron";
const STYLESHEET_FILE: &str = "style.css";
const DEFAULT_STYLESHEET: &str = include_str!("../../assets/style.css");

fn settings_dir() -> Result<PathBuf> {
    std::env::var("VOLTRAY_CONFIG_DIR")
        .map(PathBuf::from)
        .ok()
        .or_else(dirs::config_dir)
        .map(|dir| dir.join(APP_NAME))
        .context("Could not resolve config dir")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistentSettings {
    version: String,
    settings: VoltraySettings,
}

impl PersistentSettings {
    fn from_settings(settings: VoltraySettings) -> Self {
        Self {
            version: APP_VERSION.to_string(),
            settings,
        }
    }

    fn into_settings(self) -> VoltraySettings {
        self.settings
    }

    fn save(&self, dir: &Path) -> Result<()> {
        create_dir_all(dir).context("Failed to create voltray config dir")?;
        let settings_file =
            File::create(dir.join(SETTINGS_FILE)).context("Failed to create settings file")?;
        ron::ser::to_writer_pretty(settings_file, self, PrettyConfig::new())
            .context("Failed to serialize settings")
    }

    fn load(dir: &Path) -> Result<Option<Self>> {
        let settings_file = match File::open(dir.join(SETTINGS_FILE)) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err).context("Failed to open settings file"),
        };
        ron::de::from_reader(settings_file)
            .map(Some)
            .context("Failed to deserialize settings")
    }
}

/// Loads the settings file, writing one with the defaults if there is none yet.
pub fn load_or_create() -> Result<VoltraySettings> {
    load_or_create_in(&settings_dir()?)
}

fn load_or_create_in(dir: &Path) -> Result<VoltraySettings> {
    if let Some(persistent_settings) = PersistentSettings::load(dir)? {
        debug!("Loaded settings from {}", dir.display());
        return Ok(persistent_settings.into_settings());
    }

    let settings = VoltraySettings::default();
    info!("Writing default settings to {}", dir.display());
    PersistentSettings::from_settings(settings.clone()).save(dir)?;
    Ok(settings)
}

/// The built-in stylesheet, followed by the user's `style.css` from the config dir if present.
pub fn stylesheet() -> String {
    match settings_dir() {
        Ok(dir) => stylesheet_in(&dir),
        Err(err) => {
            warn!("Not loading a custom stylesheet: {err:#}");
            DEFAULT_STYLESHEET.to_owned()
        }
    }
}

fn stylesheet_in(dir: &Path) -> String {
    let mut css = DEFAULT_STYLESHEET.to_owned();
    match fs::read_to_string(dir.join(STYLESHEET_FILE)) {
        Ok(custom) => {
            css.push('\n');
            css.push_str(&custom);
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => warn!("Failed to read custom stylesheet: {err}"),
    }
    css
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_creates_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_or_create_in(dir.path()).unwrap();
        assert_eq!(settings, VoltraySettings::default());
        assert!(dir.path().join(SETTINGS_FILE).exists());
    }

    #[test]
    fn saved_settings_are_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let settings = VoltraySettings {
            poll_interval_ms: 1000,
            pactl_program: "/usr/local/bin/pactl".to_owned(),
            start_hidden: true,
            ..Default::default()
        };
        PersistentSettings::from_settings(settings.clone())
            .save(dir.path())
            .unwrap();

        assert_eq!(load_or_create_in(dir.path()).unwrap(), settings);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"(version: "0.0.1", settings: (key_step: 20))"#,
        )
        .unwrap();

        let settings = load_or_create_in(dir.path()).unwrap();
        assert_eq!(settings.key_step, 20);
        assert_eq!(settings.scroll_step, 5);
        assert_eq!(settings.poll_interval_ms, 300);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "not ron at all").unwrap();
        assert!(load_or_create_in(dir.path()).is_err());
    }

    #[test]
    fn custom_stylesheet_follows_the_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(stylesheet_in(dir.path()), DEFAULT_STYLESHEET);

        fs::write(dir.path().join(STYLESHEET_FILE), "label { color: red; }").unwrap();
        let css = stylesheet_in(dir.path());
        assert!(css.starts_with(DEFAULT_STYLESHEET));
        assert!(css.ends_with("label { color: red; }"));
    }
}
