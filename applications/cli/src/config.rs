/// Trainer configuration
///
/// Layered lowest to highest: built-in defaults, `ear-trainer.toml` (or the
/// file passed with `--config`), `EAR_*` environment variables, command-line
/// flags.
use crate::error::{AppError, Result};
use ear_core::{Key, ProgressionCatalog};
use ear_playback::{EndBehavior, PlaybackMode, SchedulerConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "ear-trainer.toml";

const TEMPO_RANGE: std::ops::RangeInclusive<u32> = 20..=400;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_tempo_bpm")]
    pub tempo_bpm: u32,

    /// How long an audiation answer stays up
    #[serde(default = "default_reveal_hold_ms")]
    pub reveal_hold_ms: u64,

    #[serde(default)]
    pub end_behavior: EndBehavior,

    #[serde(default)]
    pub playback_mode: PlaybackMode,

    #[serde(default)]
    pub no_voice: bool,

    /// Chords only, no melody tone
    #[serde(default)]
    pub harmony_only: bool,

    /// Fixed key such as `Am`; random when unset
    #[serde(default)]
    pub key: Option<String>,

    /// JSON catalog replacing the built-in progressions
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub tempo_bpm: Option<u32>,
    pub end_behavior: Option<EndBehavior>,
    pub playback_mode: Option<PlaybackMode>,
    pub no_voice: bool,
    pub harmony_only: bool,
    pub key: Option<String>,
    pub catalog_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tempo_bpm: default_tempo_bpm(),
            reveal_hold_ms: default_reveal_hold_ms(),
            end_behavior: EndBehavior::default(),
            playback_mode: PlaybackMode::default(),
            no_voice: false,
            harmony_only: false,
            key: None,
            catalog_path: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from(path, None)
    }

    /// Load with an explicit environment map instead of the process
    /// environment
    pub fn load_from(
        path: Option<&Path>,
        environment: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let mut settings = config::Config::builder();

        settings = match path {
            Some(path) => settings.add_source(config::File::from(path).required(true)),
            None => {
                settings.add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false))
            }
        };

        // Override with environment variables (prefixed with EAR_)
        settings = settings.add_source(
            config::Environment::with_prefix("EAR")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(environment),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Apply command-line values on top of the loaded layers
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(tempo_bpm) = overrides.tempo_bpm {
            self.tempo_bpm = tempo_bpm;
        }
        if let Some(end_behavior) = overrides.end_behavior {
            self.end_behavior = end_behavior;
        }
        if let Some(playback_mode) = overrides.playback_mode {
            self.playback_mode = playback_mode;
        }
        if overrides.no_voice {
            self.no_voice = true;
        }
        if overrides.harmony_only {
            self.harmony_only = true;
        }
        if overrides.key.is_some() {
            self.key = overrides.key;
        }
        if overrides.catalog_path.is_some() {
            self.catalog_path = overrides.catalog_path;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !TEMPO_RANGE.contains(&self.tempo_bpm) {
            return Err(AppError::Config(format!(
                "tempo_bpm must be within {}..={} (got {})",
                TEMPO_RANGE.start(),
                TEMPO_RANGE.end(),
                self.tempo_bpm
            )));
        }

        if let Some(key) = &self.key {
            Key::parse(key).map_err(|e| AppError::Config(e.to_string()))?;
        }

        if let Some(path) = &self.catalog_path {
            if !path.exists() {
                return Err(AppError::Config(format!(
                    "Catalog not found at {:?}",
                    path
                )));
            }
        }

        Ok(())
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            tempo_bpm: self.tempo_bpm,
            reveal_hold: Duration::from_millis(self.reveal_hold_ms),
            end_behavior: self.end_behavior,
            harmony_only: self.harmony_only,
        }
    }

    /// The fixed key, if one is configured
    pub fn fixed_key(&self) -> Result<Option<Key>> {
        self.key
            .as_deref()
            .map(Key::parse)
            .transpose()
            .map_err(AppError::from)
    }

    /// Built-in catalog, or the configured catalog file
    pub fn load_catalog(&self) -> Result<ProgressionCatalog> {
        match &self.catalog_path {
            None => Ok(ProgressionCatalog::builtin()),
            Some(path) => {
                let json = std::fs::read_to_string(path)?;
                let catalog = ProgressionCatalog::from_json(&json)?;
                tracing::info!(
                    "Loaded {} progressions from {:?} ({} rejected)",
                    catalog.len(),
                    path,
                    catalog.rejected().len()
                );
                Ok(catalog)
            }
        }
    }
}

// Default values
fn default_tempo_bpm() -> u32 {
    120
}

fn default_reveal_hold_ms() -> u64 {
    3000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_trainer() {
        let config = AppConfig::default();
        assert_eq!(config.tempo_bpm, 120);
        assert_eq!(config.reveal_hold_ms, 3000);
        assert_eq!(config.end_behavior, EndBehavior::Loop);
        assert_eq!(config.playback_mode, PlaybackMode::Recognition);
        assert!(!config.harmony_only);
        assert!(config.validate().is_ok());
        assert_eq!(config.scheduler_config(), SchedulerConfig::default());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = AppConfig {
            tempo_bpm: 10,
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));

        config.tempo_bpm = 90;
        config.key = Some("H minor".to_string());
        assert!(config.validate().is_err());

        config.key = Some("F#m".to_string());
        assert!(config.validate().is_ok());
        assert_eq!(config.fixed_key().unwrap().map(|k| k.to_string()).as_deref(), Some("F# minor"));
    }

    #[test]
    fn overrides_win() {
        let mut config = AppConfig {
            no_voice: true,
            ..AppConfig::default()
        };
        config.apply(Overrides {
            tempo_bpm: Some(90),
            playback_mode: Some(PlaybackMode::Audiation),
            ..Overrides::default()
        });

        assert_eq!(config.tempo_bpm, 90);
        assert_eq!(config.playback_mode, PlaybackMode::Audiation);
        // Absent flags leave lower layers alone
        assert!(config.no_voice);
        assert_eq!(config.end_behavior, EndBehavior::Loop);
    }
}
