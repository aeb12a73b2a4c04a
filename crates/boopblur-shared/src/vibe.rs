//! Built-in vibe packs and per-day spark line selection.

use serde::{Deserialize, Serialize};

use crate::temporal::content_hash;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VibePack {
    pub id: String,
    pub name: String,
    pub spark_lines: Vec<String>,
}

impl VibePack {
    pub fn new(id: &str, name: &str, lines: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            spark_lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }
}

/// A resolved spark line, i.e. the pair stored on an artifact plus its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SparkLine {
    pub pack_id: String,
    pub index: u32,
    pub text: String,
}

/// Catalog of vibe packs. Always holds at least one pack; the first one is
/// the fallback for unknown pack ids.
#[derive(Debug, Clone)]
pub struct VibeCatalog {
    packs: Vec<VibePack>,
}

impl VibeCatalog {
    /// Returns `None` for an empty pack list.
    pub fn new(packs: Vec<VibePack>) -> Option<Self> {
        if packs.is_empty() {
            None
        } else {
            Some(Self { packs })
        }
    }

    pub fn builtin() -> Self {
        Self {
            packs: vec![
                VibePack::new(
                    "zen-but-dumb",
                    "Zen but dumb",
                    &[
                        "breathe in. boop. breathe out.",
                        "the pixel you capture today is the blur of tomorrow",
                        "nothing is permanent, especially this photo",
                        "be like water. or a potato. either works.",
                        "today happened. here is proof.",
                        "inner peace, outer boop",
                        "the lens sees all. the lens understands nothing.",
                    ],
                ),
                VibePack::new(
                    "gremlin-hours",
                    "Gremlin hours",
                    &[
                        "document the chaos",
                        "evidence for later",
                        "snack-adjacent moment detected",
                        "it's giving goblin",
                        "proof of life, barely",
                    ],
                ),
                VibePack::new(
                    "soft-launch",
                    "Soft launch",
                    &[
                        "a little glimpse",
                        "no context, just vibes",
                        "if you know, you know",
                        "main character energy, low resolution",
                    ],
                ),
            ],
        }
    }

    pub fn packs(&self) -> &[VibePack] {
        &self.packs
    }

    pub fn get(&self, id: &str) -> Option<&VibePack> {
        self.packs.iter().find(|p| p.id == id)
    }

    /// Pack `id`, or the fallback pack when `id` is unknown.
    pub fn resolve(&self, id: &str) -> &VibePack {
        self.get(id).unwrap_or(&self.packs[0])
    }

    /// Stable spark line for a calendar day: the same `(pack, iso_date)`
    /// always yields the same line.
    pub fn spark_for(&self, pack_id: &str, iso_date: &str) -> Option<SparkLine> {
        let pack = self.resolve(pack_id);
        let len = u32::try_from(pack.spark_lines.len()).ok().filter(|n| *n > 0)?;
        let index = content_hash(iso_date) % len;
        Some(SparkLine {
            pack_id: pack.id.clone(),
            index,
            text: pack.spark_lines[index as usize].clone(),
        })
    }

    /// Text behind a stored `(pack, index)` reference, if it still exists.
    pub fn line(&self, pack_id: &str, index: u32) -> Option<&str> {
        self.get(pack_id)?
            .spark_lines
            .get(index as usize)
            .map(String::as_str)
    }
}

impl Default for VibeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
