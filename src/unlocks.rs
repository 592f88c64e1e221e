//! Playable fighters and the unlock list
//!
//! One fighter is available from the start; each boss unlocks the fighter
//! that shares its identity. The list is loaded once and saved only when it
//! changes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::persistence::{StoreError, UnlockStore};

/// Playable character roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum CharacterId {
    #[default]
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "camel")]
    Camel,
    #[serde(rename = "2pac")]
    TwoPac,
    #[serde(rename = "biggie")]
    Biggie,
    #[serde(rename = "postmalone")]
    PostMalone,
    #[serde(rename = "slimshady")]
    SlimShady,
    #[serde(rename = "lilwayne")]
    LilWayne,
}

impl CharacterId {
    pub const ALL: [CharacterId; 7] = [
        CharacterId::Default,
        CharacterId::Camel,
        CharacterId::TwoPac,
        CharacterId::Biggie,
        CharacterId::PostMalone,
        CharacterId::SlimShady,
        CharacterId::LilWayne,
    ];

    /// Storage id
    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterId::Default => "default",
            CharacterId::Camel => "camel",
            CharacterId::TwoPac => "2pac",
            CharacterId::Biggie => "biggie",
            CharacterId::PostMalone => "postmalone",
            CharacterId::SlimShady => "slimshady",
            CharacterId::LilWayne => "lilwayne",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    /// Name shown on the select screen and in boss banners
    pub fn display_name(&self) -> &'static str {
        match self {
            CharacterId::Default => "DKAY",
            CharacterId::Camel => "EVIL CAMEL",
            CharacterId::TwoPac => "2PAC",
            CharacterId::Biggie => "BIGGIE",
            CharacterId::PostMalone => "POST MALONE",
            CharacterId::SlimShady => "SLIM SHADY",
            CharacterId::LilWayne => "LIL WAYNE",
        }
    }

    /// Placeholder colour when the sprite is not loaded (0xRRGGBB)
    pub fn color(&self) -> u32 {
        match self {
            CharacterId::Default => 0x0284c7,
            CharacterId::Camel => 0x581c87,
            CharacterId::TwoPac => 0xfbbf24,
            CharacterId::Biggie => 0xef4444,
            CharacterId::PostMalone => 0xffffff,
            CharacterId::SlimShady => 0xcccccc,
            CharacterId::LilWayne => 0xa855f7,
        }
    }
}

/// Set of unlocked fighters; always contains `CharacterId::Default`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unlocks {
    unlocked: BTreeSet<CharacterId>,
}

impl Default for Unlocks {
    fn default() -> Self {
        Self {
            unlocked: BTreeSet::from([CharacterId::Default]),
        }
    }
}

impl Unlocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a stored payload. Unknown ids are skipped.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let ids: Vec<String> =
            serde_json::from_str(json).map_err(|e| StoreError::Malformed(e.to_string()))?;
        let mut unlocks = Self::default();
        for id in ids {
            match CharacterId::from_str(&id) {
                Some(c) => {
                    unlocks.unlocked.insert(c);
                }
                None => log::warn!("Ignoring unknown fighter id {:?} in unlock data", id),
            }
        }
        Ok(unlocks)
    }

    pub fn to_json(&self) -> String {
        let ids: Vec<&str> = self.unlocked.iter().map(|c| c.as_str()).collect();
        // A list of plain strings always serializes
        serde_json::to_string(&ids).unwrap_or_else(|_| "[\"default\"]".to_string())
    }

    /// Load from storage, falling back to the default set on any failure
    pub fn load(store: &dyn UnlockStore) -> Self {
        match store.read().and_then(|p| p.map(|json| Self::from_json(&json)).transpose()) {
            Ok(Some(unlocks)) => {
                log::info!("Loaded {} unlocked fighters", unlocks.len());
                unlocks
            }
            Ok(None) => {
                log::info!("No unlock data found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("{e}; using default fighter only");
                Self::default()
            }
        }
    }

    /// Write the current set; failures are logged and otherwise ignored
    pub fn save(&self, store: &mut dyn UnlockStore) {
        match store.write(&self.to_json()) {
            Ok(()) => log::info!("Unlocks saved ({} fighters)", self.len()),
            Err(e) => log::warn!("{e}"),
        }
    }

    pub fn is_unlocked(&self, id: CharacterId) -> bool {
        self.unlocked.contains(&id)
    }

    /// Returns true if `id` was newly unlocked
    pub fn unlock(&mut self, id: CharacterId) -> bool {
        self.unlocked.insert(id)
    }

    /// Unlock the whole roster; returns true if anything changed
    pub fn unlock_all(&mut self) -> bool {
        let before = self.unlocked.len();
        self.unlocked.extend(CharacterId::ALL);
        self.unlocked.len() != before
    }

    pub fn len(&self) -> usize {
        self.unlocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unlocked.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = CharacterId> + '_ {
        self.unlocked.iter().copied()
    }
}
