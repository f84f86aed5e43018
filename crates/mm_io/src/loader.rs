//! Loader: read local JSON inputs (snapshot → candidate → params), validate
//! them against the embedded Draft 7 schemas, normalize ordering, and return
//! typed values for the pipeline. No network I/O.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use mm_core::{
    cards::{CardEntry, CardRecord, EnergyType},
    determinism::sort_decks_canonical,
    entities::{CandidateDeck, MetaSnapshot},
    ids::CardName,
    variables::{self, Params},
};

use crate::schema::{self, SchemaKind};
use crate::{looks_like_url_strict, IoError};

/// Hard cap on any single input document.
pub const MAX_INPUT_BYTES: u64 = 8 * 1024 * 1024;

/// Everything the pipeline needs, validated and normalized.
#[derive(Debug, Clone)]
pub struct LoadedInputs {
    pub snapshot: MetaSnapshot,
    pub candidate: CandidateDeck,
    pub params: Params,
}

// ----------------------------- Orchestration -----------------------------

/// Load snapshot, candidate and (optional) params. A missing params path
/// means the built-in defaults.
pub fn load_all(
    snapshot: &Path,
    candidate: &Path,
    params: Option<&Path>,
) -> Result<LoadedInputs, IoError> {
    let snapshot = load_snapshot(snapshot)?;
    let candidate = load_candidate(candidate)?;
    let params = match params {
        Some(p) => load_params(p)?,
        None => Params::default(),
    };
    Ok(LoadedInputs { snapshot, candidate, params })
}

// ----------------------------- Targeted loaders -----------------------------

pub fn load_snapshot(path: &Path) -> Result<MetaSnapshot, IoError> {
    let v = read_json_value_with_limits(path)?;
    snapshot_from_value(v)
}

pub fn load_candidate(path: &Path) -> Result<CandidateDeck, IoError> {
    let v = read_json_value_with_limits(path)?;
    candidate_from_value(v)
}

pub fn load_params(path: &Path) -> Result<Params, IoError> {
    let v = read_json_value_with_limits(path)?;
    schema::validate_value(SchemaKind::Params, &v)?;
    let ps: Params = serde_json::from_value(v)
        .map_err(|e| IoError::Json { pointer: "/".into(), msg: e.to_string() })?;
    variables::validate_domains(&ps)
        .map_err(|e| IoError::Invalid(format!("parameter domain error: {e}")))?;
    Ok(ps)
}

// ----------------------------- Value → domain -----------------------------

/// Schema-check, decode and normalize a snapshot document.
pub fn snapshot_from_value(v: Value) -> Result<MetaSnapshot, IoError> {
    schema::validate_value(SchemaKind::MetaSnapshot, &v)?;
    let mut snap: MetaSnapshot = serde_json::from_value(v)
        .map_err(|e| IoError::Json { pointer: "/".into(), msg: e.to_string() })?;

    for (key, rec) in &snap.cards {
        if key != &rec.name {
            return Err(IoError::Invalid(format!(
                "card catalog key '{key}' does not match record name '{}'",
                rec.name
            )));
        }
    }
    normalize_snapshot(&mut snap);
    Ok(snap)
}

/// Decks ↑ (rank, meta_share ↓, archetype).
pub fn normalize_snapshot(snap: &mut MetaSnapshot) {
    sort_decks_canonical(&mut snap.decks);
}

#[derive(Deserialize)]
struct RawCard {
    name: CardName,
    quantity: u32,
    #[serde(default)]
    energy_type: Option<EnergyType>,
    #[serde(default)]
    weakness: Option<EnergyType>,
    #[serde(default)]
    resistance: Option<EnergyType>,
}

#[derive(Deserialize)]
struct RawCandidate {
    #[serde(default)]
    archetype: Option<String>,
    cards: Vec<RawCard>,
}

/// Schema-check and decode a candidate deck. Repeated lines for the same
/// card are merged with their quantities summed.
pub fn candidate_from_value(v: Value) -> Result<CandidateDeck, IoError> {
    schema::validate_value(SchemaKind::CandidateDeck, &v)?;
    let raw: RawCandidate = serde_json::from_value(v)
        .map_err(|e| IoError::Json { pointer: "/".into(), msg: e.to_string() })?;

    let mut cards: BTreeMap<CardName, CardEntry> = BTreeMap::new();
    for (idx, rc) in raw.cards.into_iter().enumerate() {
        let record = CardRecord {
            name: rc.name.clone(),
            energy_type: rc.energy_type,
            weakness: rc.weakness,
            resistance: rc.resistance,
        };
        match cards.get_mut(&rc.name) {
            None => {
                cards.insert(rc.name, CardEntry { record, quantity: rc.quantity });
            }
            Some(entry) => {
                merge_record(&mut entry.record, &record).map_err(|field| {
                    IoError::Invalid(format!(
                        "/cards/{idx}: conflicting {field} for repeated card '{}'",
                        rc.name
                    ))
                })?;
                entry.quantity = entry.quantity.checked_add(rc.quantity).ok_or_else(|| {
                    IoError::Invalid(format!("/cards/{idx}: quantity overflow for '{}'", rc.name))
                })?;
            }
        }
    }

    let archetype = raw
        .archetype
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty());

    Ok(CandidateDeck { cards, archetype })
}

/// Fill gaps in `into` from `from`; disagreeing values are an error naming the field.
fn merge_record(into: &mut CardRecord, from: &CardRecord) -> Result<(), &'static str> {
    fn merge(
        slot: &mut Option<EnergyType>,
        other: Option<EnergyType>,
        field: &'static str,
    ) -> Result<(), &'static str> {
        match (*slot, other) {
            (Some(a), Some(b)) if a != b => Err(field),
            (None, Some(b)) => {
                *slot = Some(b);
                Ok(())
            }
            _ => Ok(()),
        }
    }
    merge(&mut into.energy_type, from.energy_type, "energy_type")?;
    merge(&mut into.weakness, from.weakness, "weakness")?;
    merge(&mut into.resistance, from.resistance, "resistance")
}

// ----------------------------- Bounded reading -----------------------------

/// Read a local JSON file with a size cap. URLs are rejected outright.
pub fn read_json_value_with_limits(path: &Path) -> Result<Value, IoError> {
    let shown = path.display().to_string();
    if looks_like_url_strict(&shown) {
        return Err(IoError::Path(format!("{shown}: only local files are accepted")));
    }

    let f = File::open(path).map_err(|e| IoError::Path(format!("{shown}: {e}")))?;
    if let Ok(meta) = f.metadata() {
        if meta.len() > MAX_INPUT_BYTES {
            return Err(IoError::Limit(format!(
                "{shown}: {} bytes exceeds {MAX_INPUT_BYTES}",
                meta.len()
            )));
        }
    }

    let mut buf = Vec::new();
    f.take(MAX_INPUT_BYTES + 1)
        .read_to_end(&mut buf)
        .map_err(|e| IoError::Path(format!("{shown}: {e}")))?;
    if buf.len() as u64 > MAX_INPUT_BYTES {
        return Err(IoError::Limit(format!("{shown}: exceeds {MAX_INPUT_BYTES} bytes")));
    }

    serde_json::from_slice(&buf).map_err(|e| IoError::Json {
        pointer: "/".into(),
        msg: format!("{shown}: line {} column {}: {e}", e.line(), e.column()),
    })
}
