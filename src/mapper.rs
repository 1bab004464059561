//! Normalizes API payloads into card-ready view models.
//!
//! The list endpoint has answered with bare arrays, paginated envelopes and
//! reference-only `{ name, url }` entries over time. Everything here is
//! total: malformed entries degrade to defaults instead of failing.

use pokedex_schema::{DetailPayload, TypeRef};
use serde_json::Value;

use crate::errors::{FetchError, FetchResult};

pub type PokemonId = u32;

/// Id used when an entry carries neither an id nor a parseable url.
pub const FALLBACK_ID: PokemonId = 1;

const SPRITE_BASE: &str = "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";

/// Conventional front sprite location for an id.
pub fn default_sprite_url(id: PokemonId) -> String {
    format!("{}/{}.png", SPRITE_BASE, id)
}

/// A result card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PokemonSummary {
    pub id: PokemonId,
    pub name: String,
    pub types: Vec<String>,
    pub sprite_url: Option<String>,
}

/// One page of normalized list results plus the envelope metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub results: Vec<PokemonSummary>,
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatLine {
    pub name: String,
    pub base_stat: u32,
}

/// Everything the detail view shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PokemonDetail {
    pub id: PokemonId,
    pub name: String,
    pub sprite_url: Option<String>,
    pub types: Vec<String>,
    pub stats: Vec<StatLine>,
    pub abilities: Vec<String>,
    pub height: Option<u32>,
    pub weight: Option<u32>,
}

impl From<DetailPayload> for PokemonDetail {
    fn from(payload: DetailPayload) -> Self {
        Self {
            id: payload.id,
            name: payload.name,
            sprite_url: payload
                .sprites
                .and_then(|sprites| sprites.front_default)
                .filter(|url| !url.is_empty()),
            types: payload.types.iter().map(|t| t.name().to_string()).collect(),
            stats: payload
                .stats
                .into_iter()
                .map(|entry| StatLine {
                    name: entry.stat.name,
                    base_stat: entry.base_stat,
                })
                .collect(),
            abilities: payload
                .abilities
                .into_iter()
                .map(|entry| entry.ability.name)
                .collect(),
            height: payload.height,
            weight: payload.weight,
        }
    }
}

/// Maps a list/search response body of any known shape.
pub fn map_list_payload(payload: &Value) -> ListPage {
    match payload {
        Value::Array(entries) => ListPage {
            results: entries.iter().map(map_summary).collect(),
            count: entries.len() as u64,
            next: None,
            previous: None,
        },
        Value::Object(envelope) => {
            let results: Vec<PokemonSummary> = envelope
                .get("results")
                .and_then(Value::as_array)
                .map(|entries| entries.iter().map(map_summary).collect())
                .unwrap_or_default();
            let count = envelope
                .get("count")
                .and_then(Value::as_u64)
                .unwrap_or(results.len() as u64);
            ListPage {
                count,
                next: link(envelope.get("next")),
                previous: link(envelope.get("previous")),
                results,
            }
        }
        _ => ListPage::default(),
    }
}

fn link(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Normalizes one list entry.
pub fn map_summary(entry: &Value) -> PokemonSummary {
    let id = entry
        .get("id")
        .and_then(parse_id)
        .or_else(|| entry.get("url").and_then(Value::as_str).and_then(id_from_url))
        .unwrap_or(FALLBACK_ID);

    let name = entry
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let types = entry
        .get("types")
        .and_then(Value::as_array)
        .map(|types| types.iter().filter_map(type_name).collect())
        .unwrap_or_default();

    // An explicit sprites object is kept even without a front sprite; only
    // entries that never had one get the conventional url.
    let sprite_url = match entry.get("sprites") {
        Some(Value::Object(sprites)) => sprites
            .get("front_default")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(str::to_string),
        _ => Some(default_sprite_url(id)),
    };

    PokemonSummary {
        id,
        name,
        types,
        sprite_url,
    }
}

/// Maps the types endpoint: a list of names or `{ name }` objects.
pub fn map_type_names(payload: &Value) -> Vec<String> {
    payload
        .as_array()
        .map(|entries| entries.iter().filter_map(type_name).collect())
        .unwrap_or_default()
}

pub fn map_detail_payload(payload: Value) -> FetchResult<PokemonDetail> {
    serde_json::from_value::<DetailPayload>(payload)
        .map(PokemonDetail::from)
        .map_err(|e| FetchError::Decode(e.to_string()))
}

fn parse_id(value: &Value) -> Option<PokemonId> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| PokemonId::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Trailing numeric path segment, e.g. `.../pokemon/25/` -> 25.
pub fn id_from_url(url: &str) -> Option<PokemonId> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
}

fn type_name(value: &Value) -> Option<String> {
    serde_json::from_value::<TypeRef>(value.clone())
        .ok()
        .map(|t| t.name().to_string())
        .filter(|name| !name.is_empty())
}
