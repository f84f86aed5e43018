//! Embedded JSON Schemas (Draft 7) for the three input documents and a
//! validation entry point that reports the first failing instance path.
//!
//! Structural shape only. Semantic invariants (unique archetypes, share sums,
//! self-matchups) belong to the pipeline's validation stage.

use jsonschema::{Draft, JSONSchema};
use serde_json::{json, Value};

use crate::IoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    MetaSnapshot,
    CandidateDeck,
    Params,
}

impl SchemaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaKind::MetaSnapshot => "meta_snapshot",
            SchemaKind::CandidateDeck => "candidate_deck",
            SchemaKind::Params => "params",
        }
    }
}

const ENERGY_TOKENS: [&str; 11] = [
    "grass", "fire", "water", "lightning", "psychic", "fighting",
    "darkness", "metal", "dragon", "fairy", "colorless",
];

fn name_schema() -> Value {
    json!({ "type": "string", "minLength": 1, "maxLength": 128 })
}

fn energy_schema() -> Value {
    json!({ "type": ["string", "null"], "enum": [
        "grass", "fire", "water", "lightning", "psychic", "fighting",
        "darkness", "metal", "dragon", "fairy", "colorless", null
    ] })
}

fn card_record_schema() -> Value {
    json!({
        "type": "object",
        "required": ["name"],
        "properties": {
            "name": name_schema(),
            "energy_type": energy_schema(),
            "weakness": energy_schema(),
            "resistance": energy_schema()
        },
        "additionalProperties": false
    })
}

/// Schema source for a document kind.
pub fn schema_for(kind: SchemaKind) -> Value {
    match kind {
        SchemaKind::MetaSnapshot => json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "title": "MetaSnapshot",
            "type": "object",
            "required": ["id", "captured_on", "total_players", "decks"],
            "properties": {
                "id": name_schema(),
                "captured_on": { "type": "string", "pattern": "^[0-9]{4}-[0-9]{2}-[0-9]{2}$" },
                "source": { "type": ["string", "null"] },
                "total_players": { "type": "integer", "minimum": 0 },
                "decks": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["archetype", "rank", "meta_share"],
                        "properties": {
                            "archetype": name_schema(),
                            "rank": { "type": "integer", "minimum": 0 },
                            "meta_share": { "type": "number" },
                            "play_rate": { "type": ["number", "null"] },
                            "win_rate": { "type": ["number", "null"] },
                            "matchups": {
                                "type": "object",
                                "additionalProperties": { "type": "number" }
                            },
                            "core_cards": { "type": "array", "items": name_schema() }
                        },
                        "additionalProperties": false
                    }
                },
                "cards": {
                    "type": "object",
                    "additionalProperties": card_record_schema()
                }
            },
            "additionalProperties": false
        }),
        SchemaKind::CandidateDeck => json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "title": "CandidateDeck",
            "type": "object",
            "required": ["cards"],
            "properties": {
                "archetype": { "type": ["string", "null"] },
                "cards": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["name", "quantity"],
                        "properties": {
                            "name": name_schema(),
                            "quantity": { "type": "integer", "minimum": 0 },
                            "energy_type": energy_schema(),
                            "weakness": energy_schema(),
                            "resistance": energy_schema()
                        },
                        "additionalProperties": false
                    }
                }
            },
            "additionalProperties": false
        }),
        SchemaKind::Params => json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "title": "Params",
            "type": "object",
            "properties": {
                "similarity_threshold": { "type": "number", "minimum": 0, "maximum": 1 },
                "strength_threshold": { "type": "number", "minimum": 0, "maximum": 1 },
                "weakness_threshold": { "type": "number", "minimum": 0, "maximum": 1 },
                "insight_cap": { "type": "integer", "minimum": 1 },
                "share_tolerance": { "type": "number", "minimum": 0, "maximum": 1 },
                "max_workers": { "type": "integer", "minimum": 1 }
            },
            "additionalProperties": false
        }),
    }
}

/// Validate `instance` against the embedded schema for `kind`.
/// Errors carry the first failing instance path (JSON Pointer).
pub fn validate_value(kind: SchemaKind, instance: &Value) -> Result<(), IoError> {
    let schema = schema_for(kind);
    let compiled = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&schema)
        .map_err(|e| IoError::Schema {
            pointer: "#".into(),
            msg: format!("{} schema does not compile: {e}", kind.as_str()),
        })?;

    if let Err(mut errors) = compiled.validate(instance) {
        if let Some(first) = errors.next() {
            let pointer = first.instance_path.to_string();
            return Err(IoError::Schema {
                pointer: if pointer.is_empty() { "/".into() } else { pointer },
                msg: format!("{}: {first}", kind.as_str()),
            });
        }
    }
    Ok(())
}

/// Energy tokens accepted on the wire (mirrors `mm_core::cards::EnergyType`).
pub fn energy_tokens() -> &'static [&'static str] {
    &ENERGY_TOKENS
}
