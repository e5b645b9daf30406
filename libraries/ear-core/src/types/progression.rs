/// Progression templates
use super::chord::ChordSlot;
use super::key::Mode;
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// A named, key-independent chord progression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionTemplate {
    /// Unique catalog identifier
    pub id: String,

    pub display_name: String,

    /// Mode the progression is written for (None = playable in any mode)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,

    pub slots: Vec<ChordSlot>,
}

impl ProgressionTemplate {
    /// Build a template from roman numerals
    pub fn from_numerals(
        id: impl Into<String>,
        display_name: impl Into<String>,
        mode: Option<Mode>,
        numerals: &[&str],
    ) -> Result<Self> {
        let id = id.into();
        let slots = numerals
            .iter()
            .map(|numeral| ChordSlot::parse(numeral))
            .collect::<Result<Vec<_>>>()
            .map_err(|e| CoreError::invalid_template(id.clone(), e.to_string()))?;

        let template = Self {
            id,
            display_name: display_name.into(),
            mode,
            slots,
        };
        template.validate()?;
        Ok(template)
    }

    /// Modes a key may be chosen from for this progression
    pub fn allowed_modes(&self) -> Vec<Mode> {
        match self.mode {
            Some(mode) => vec![mode],
            None => Mode::ALL.to_vec(),
        }
    }

    /// Check every slot is within the supported set
    pub fn validate(&self) -> Result<()> {
        if self.slots.is_empty() {
            return Err(CoreError::invalid_template(&self.id, "no chord slots"));
        }

        for (index, slot) in self.slots.iter().enumerate() {
            if !(1..=7).contains(&slot.degree) {
                return Err(CoreError::invalid_template(
                    &self.id,
                    format!("slot {}: degree {} is outside 1..=7", index, slot.degree),
                ));
            }
            if !(-1..=1).contains(&slot.alteration) {
                return Err(CoreError::invalid_template(
                    &self.id,
                    format!(
                        "slot {}: alteration {} is outside -1..=1",
                        index, slot.alteration
                    ),
                ));
            }
            if slot.beats == 0 {
                return Err(CoreError::invalid_template(
                    &self.id,
                    format!("slot {}: duration weight must be at least 1 beat", index),
                ));
            }
        }

        Ok(())
    }
}
