//! Age-based visual decay states.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DecayTableError;

/// A named decay level reached once an artifact is `threshold` days old.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecayState {
    pub threshold: i64,
    pub name: String,
}

/// Ordered threshold table, strictly ascending and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecayTable {
    states: Vec<DecayState>,
}

impl DecayTable {
    pub fn new<I, S>(entries: I) -> Result<Self, DecayTableError>
    where
        I: IntoIterator<Item = (i64, S)>,
        S: Into<String>,
    {
        let states: Vec<DecayState> = entries
            .into_iter()
            .map(|(threshold, name)| DecayState {
                threshold,
                name: name.into(),
            })
            .collect();

        if states.is_empty() {
            return Err(DecayTableError::Empty);
        }
        for pair in states.windows(2) {
            if pair[1].threshold <= pair[0].threshold {
                return Err(DecayTableError::NotAscending {
                    previous: pair[0].threshold,
                    next: pair[1].threshold,
                });
            }
        }

        Ok(Self { states })
    }

    /// State with the greatest threshold `<= age_days`, or the first state
    /// when the age is below every threshold.
    pub fn classify(&self, age_days: i64) -> &DecayState {
        let reached = self.states.partition_point(|s| s.threshold <= age_days);
        &self.states[reached.saturating_sub(1)]
    }

    pub fn states(&self) -> &[DecayState] {
        &self.states
    }
}

impl Default for DecayTable {
    fn default() -> Self {
        Self {
            states: [
                (0, "crisp"),
                (1, "slight-blur"),
                (3, "more-blur"),
                (5, "heavy-blur"),
                (7, "pixelated"),
            ]
            .into_iter()
            .map(|(threshold, name)| DecayState {
                threshold,
                name: name.to_string(),
            })
            .collect(),
        }
    }
}

/// Parses `"0:crisp,1:slight-blur,3:more-blur"`.
impl FromStr for DecayTable {
    type Err = DecayTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut entries = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (days, name) = part
                .split_once(':')
                .ok_or_else(|| DecayTableError::InvalidEntry(part.to_string()))?;
            let days: i64 = days
                .trim()
                .parse()
                .map_err(|_| DecayTableError::InvalidEntry(part.to_string()))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(DecayTableError::InvalidEntry(part.to_string()));
            }
            entries.push((days, name.to_string()));
        }
        Self::new(entries)
    }
}
