use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ZettelError};
use zettel_core::note::DEFAULT_TITLE_TEMPLATE;
use zettel_core::GestureConfig;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub notes: NotesConfig,
    #[serde(default)]
    pub tags: TagsConfig,
    #[serde(default)]
    pub gesture: GestureTuning,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NotesConfig {
    /// Directory holding the current draft and the archive. Empty means the
    /// platform data directory.
    #[serde(default)]
    pub dir: String,
    #[serde(default = "default_title_template")]
    pub title_template: String,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            dir: String::new(),
            title_template: default_title_template(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TagsConfig {
    /// Debounce window between an edit and the tag-index recompute.
    #[serde(default = "default_update_delay_ms")]
    pub update_delay_ms: u64,
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self {
            update_delay_ms: default_update_delay_ms(),
        }
    }
}

/// Gesture tuning knobs. Defaults mirror `GestureConfig::default`.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GestureTuning {
    #[serde(default = "default_activation_distance")]
    pub activation_distance: f32,
    #[serde(default = "default_tear_threshold")]
    pub tear_threshold: f32,
    #[serde(default = "default_completion_ratio")]
    pub completion_ratio: f32,
    #[serde(default = "default_velocity_threshold")]
    pub velocity_threshold: f32,
}

impl Default for GestureTuning {
    fn default() -> Self {
        Self {
            activation_distance: default_activation_distance(),
            tear_threshold: default_tear_threshold(),
            completion_ratio: default_completion_ratio(),
            velocity_threshold: default_velocity_threshold(),
        }
    }
}

fn default_title_template() -> String {
    DEFAULT_TITLE_TEMPLATE.into()
}

fn default_update_delay_ms() -> u64 {
    300
}

fn default_activation_distance() -> f32 {
    GestureConfig::default().activation_distance
}

fn default_tear_threshold() -> f32 {
    GestureConfig::default().tear_threshold
}

fn default_completion_ratio() -> f32 {
    GestureConfig::default().completion_ratio
}

fn default_velocity_threshold() -> f32 {
    GestureConfig::default().velocity_threshold
}

impl AppConfig {
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        let config: AppConfig = Figment::new()
            .merge(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("ZETTEL_").split("_").lowercase(false))
            .extract()
            .map_err(|e| ZettelError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.notes.title_template.trim().is_empty() {
            return Err(ZettelError::Config(
                "notes.title_template must not be empty".into(),
            ));
        }
        if self.gesture.activation_distance <= 0.0 {
            return Err(ZettelError::Config(
                "gesture.activation_distance must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.gesture.tear_threshold)
            || self.gesture.tear_threshold == 0.0
        {
            return Err(ZettelError::Config(
                "gesture.tear_threshold must be in (0, 1]".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.gesture.completion_ratio)
            || self.gesture.completion_ratio == 0.0
        {
            return Err(ZettelError::Config(
                "gesture.completion_ratio must be in (0, 1)".into(),
            ));
        }
        if self.gesture.velocity_threshold <= 0.0 {
            return Err(ZettelError::Config(
                "gesture.velocity_threshold must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn gesture_config(&self) -> GestureConfig {
        GestureConfig {
            activation_distance: self.gesture.activation_distance,
            tear_threshold: self.gesture.tear_threshold,
            completion_ratio: self.gesture.completion_ratio,
            velocity_threshold: self.gesture.velocity_threshold,
            ..GestureConfig::default()
        }
    }

    /// The notes directory, resolved against the platform data dir when the
    /// config leaves it empty.
    pub fn notes_dir(&self) -> PathBuf {
        if !self.notes.dir.is_empty() {
            return PathBuf::from(&self.notes.dir);
        }
        std::env::var("XDG_DATA_HOME")
            .ok()
            .map(|xdg| PathBuf::from(xdg).join("zettel"))
            .or_else(|| {
                directories::BaseDirs::new()
                    .map(|dirs| dirs.home_dir().join(".local").join("share").join("zettel"))
            })
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn config_dir() -> Option<PathBuf> {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(|xdg| PathBuf::from(xdg).join("zettel"))
            .or_else(|| {
                directories::BaseDirs::new()
                    .map(|dirs| dirs.home_dir().join(".config").join("zettel"))
            })
    }

    pub fn write_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = r#"[notes]
# dir = "~/notes"  # empty means the platform data directory
title_template = "{{date}} - {{time}}"

[tags]
update_delay_ms = 300

[gesture]
activation_distance = 12.0
tear_threshold = 0.95
completion_ratio = 0.28
velocity_threshold = 520.0
"#;

        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            notes: NotesConfig::default(),
            tags: TagsConfig::default(),
            gesture: GestureTuning::default(),
        }
    }
}
