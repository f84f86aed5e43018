//! Card-level domain: energy types and canonical card records.
//!
//! Card identities reaching the engine are already resolved by the deck import
//! collaborator; nothing here parses deck-list text.

use std::collections::BTreeMap;

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::ids::CardName;

/// Energy types. Declaration order is the canonical tie-break order
/// whenever a "most frequent type" must be chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyType {
    Grass,
    Fire,
    Water,
    Lightning,
    Psychic,
    Fighting,
    Darkness,
    Metal,
    Dragon,
    Fairy,
    Colorless,
}

impl EnergyType {
    pub const ALL: [EnergyType; 11] = [
        EnergyType::Grass,
        EnergyType::Fire,
        EnergyType::Water,
        EnergyType::Lightning,
        EnergyType::Psychic,
        EnergyType::Fighting,
        EnergyType::Darkness,
        EnergyType::Metal,
        EnergyType::Dragon,
        EnergyType::Fairy,
        EnergyType::Colorless,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EnergyType::Grass => "grass",
            EnergyType::Fire => "fire",
            EnergyType::Water => "water",
            EnergyType::Lightning => "lightning",
            EnergyType::Psychic => "psychic",
            EnergyType::Fighting => "fighting",
            EnergyType::Darkness => "darkness",
            EnergyType::Metal => "metal",
            EnergyType::Dragon => "dragon",
            EnergyType::Fairy => "fairy",
            EnergyType::Colorless => "colorless",
        }
    }

    /// Display label for report/suggestion copy ("Fire", "Lightning", ...).
    pub fn label(self) -> &'static str {
        match self {
            EnergyType::Grass => "Grass",
            EnergyType::Fire => "Fire",
            EnergyType::Water => "Water",
            EnergyType::Lightning => "Lightning",
            EnergyType::Psychic => "Psychic",
            EnergyType::Fighting => "Fighting",
            EnergyType::Darkness => "Darkness",
            EnergyType::Metal => "Metal",
            EnergyType::Dragon => "Dragon",
            EnergyType::Fairy => "Fairy",
            EnergyType::Colorless => "Colorless",
        }
    }
}

impl fmt::Display for EnergyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnergyType {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        EnergyType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == wanted)
            .ok_or(CoreError::InvalidToken)
    }
}

/// Canonical card record (name, energy type, weakness, resistance).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    pub name: CardName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_type: Option<EnergyType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weakness: Option<EnergyType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resistance: Option<EnergyType>,
}

impl CardRecord {
    /// Record with no type data (trainers, energies, unknown cards).
    pub fn untyped(name: CardName) -> Self {
        Self { name, energy_type: None, weakness: None, resistance: None }
    }
}

/// Card records keyed by canonical name.
pub type CardCatalog = BTreeMap<CardName, CardRecord>;

/// One line of a candidate deck: the resolved record and its copy count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEntry {
    pub record: CardRecord,
    pub quantity: u32,
}
