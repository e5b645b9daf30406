//! Progression catalog
//!
//! Read-only registry of named progressions, built once at startup and shared
//! (behind an `Arc`) with every playback session.
//!
//! # Catalog file format
//!
//! ```json
//! {
//!   "minor_swing": {
//!     "display_name": "Minor Swing",
//!     "mode": "minor",
//!     "slots": ["i", "iv", { "numeral": "V7", "beats": 8 }, "i"]
//!   }
//! }
//! ```
//!
//! Entries that fail to parse or validate are disabled and reported through
//! [`ProgressionCatalog::rejected`]; the rest of the catalog stays usable.
//! Looking up a disabled id returns the error that disabled it.

use crate::error::{CoreError, Result};
use crate::types::{ChordSlot, Mode, ProgressionTemplate};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Built-in progressions: (id, display name, mode, numerals)
const BUILTIN: &[(&str, &str, Mode, &[&str])] = &[
    (
        "minor_swing",
        "Minor Swing",
        Mode::Minor,
        &[
            "i", "i", "iv", "iv", "i", "i", "V7", "V7", "iv", "iv", "i", "i", "V7", "V7", "i",
            "V7",
        ],
    ),
    (
        "dark_eyes",
        "Dark Eyes",
        Mode::Minor,
        &["V7", "i", "V7", "VI", "iv", "i", "V7", "i"],
    ),
    (
        "major_cadence",
        "Major Cadence",
        Mode::Major,
        &["I", "IV", "V", "I"],
    ),
    (
        "minor_cadence",
        "Minor Cadence",
        Mode::Minor,
        &["i", "iv", "v", "i"],
    ),
];

/// Registry of progression templates keyed by id
#[derive(Debug, Clone, Default)]
pub struct ProgressionCatalog {
    templates: BTreeMap<String, ProgressionTemplate>,
    rejected: BTreeMap<String, CoreError>,
}

#[derive(Debug, Deserialize)]
struct RawTemplate {
    display_name: String,
    #[serde(default)]
    mode: Option<Mode>,
    slots: Vec<RawSlot>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSlot {
    Numeral(String),
    Detailed {
        numeral: String,
        #[serde(default)]
        beats: Option<u32>,
    },
}

impl RawTemplate {
    fn into_template(self, id: &str) -> Result<ProgressionTemplate> {
        let slots = self
            .slots
            .into_iter()
            .map(|raw| match raw {
                RawSlot::Numeral(numeral) => ChordSlot::parse(&numeral),
                RawSlot::Detailed { numeral, beats } => {
                    let slot = ChordSlot::parse(&numeral)?;
                    Ok(match beats {
                        Some(beats) => slot.with_beats(beats),
                        None => slot,
                    })
                }
            })
            .collect::<Result<Vec<_>>>()
            .map_err(|e| CoreError::invalid_template(id, e.to_string()))?;

        let template = ProgressionTemplate {
            id: id.to_string(),
            display_name: self.display_name,
            mode: self.mode,
            slots,
        };
        template.validate()?;
        Ok(template)
    }
}

impl ProgressionCatalog {
    /// Build a catalog from templates, skipping (and recording) invalid ones
    pub fn new(templates: impl IntoIterator<Item = ProgressionTemplate>) -> Self {
        let mut catalog = Self::default();
        for template in templates {
            match template.validate() {
                Ok(()) => catalog.insert(template),
                Err(e) => catalog.reject(template.id, e),
            }
        }
        catalog
    }

    /// The progressions shipped with the trainer
    pub fn builtin() -> Self {
        let mut catalog = Self::default();
        for (id, name, mode, numerals) in BUILTIN {
            match ProgressionTemplate::from_numerals(*id, *name, Some(*mode), numerals) {
                Ok(template) => catalog.insert(template),
                Err(e) => catalog.reject((*id).to_string(), e),
            }
        }
        catalog
    }

    /// Load a catalog from its JSON representation
    ///
    /// Fails only if the document is not a JSON object; malformed entries are
    /// rejected individually.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: BTreeMap<String, serde_json::Value> = serde_json::from_str(json)?;

        let mut catalog = Self::default();
        for (id, value) in entries {
            let parsed = serde_json::from_value::<RawTemplate>(value)
                .map_err(|e| CoreError::invalid_template(&id, e.to_string()))
                .and_then(|raw| raw.into_template(&id));
            match parsed {
                Ok(template) => catalog.insert(template),
                Err(e) => catalog.reject(id, e),
            }
        }

        tracing::debug!(
            "Loaded catalog: {} progressions, {} rejected",
            catalog.len(),
            catalog.rejected.len()
        );
        Ok(catalog)
    }

    fn insert(&mut self, template: ProgressionTemplate) {
        self.rejected.remove(&template.id);
        self.templates.insert(template.id.clone(), template);
    }

    fn reject(&mut self, id: String, error: CoreError) {
        tracing::warn!("Skipping catalog entry: {}", error);
        self.templates.remove(&id);
        self.rejected.insert(id, error);
    }

    /// Look up a progression by id
    ///
    /// A rejected entry yields the error it was rejected with, anything else
    /// unregistered is `UnknownProgressionId`.
    pub fn lookup(&self, id: &str) -> Result<&ProgressionTemplate> {
        if let Some(template) = self.templates.get(id) {
            return Ok(template);
        }
        Err(self
            .rejected
            .get(id)
            .cloned()
            .unwrap_or_else(|| CoreError::UnknownProgressionId(id.to_string())))
    }

    /// All registered ids, sorted
    pub fn list_ids(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    /// Templates in id order
    pub fn iter(&self) -> impl Iterator<Item = &ProgressionTemplate> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Entries that were skipped while building the catalog, by id
    pub fn rejected(&self) -> &BTreeMap<String, CoreError> {
        &self.rejected
    }
}
