use serde::{Deserialize, Serialize};

/// A `{ name, url }` reference as the API nests them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpritesPayload {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub front_shiny: Option<String>,
}

/// A type reference. The backend sends either a bare name, a `{ name }`
/// object, or the upstream `{ slot, type: { name } }` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeRef {
    Name(String),
    Slotted {
        #[serde(default)]
        slot: Option<u8>,
        #[serde(rename = "type")]
        type_: NamedRef,
    },
    Named(NamedRef),
}

impl TypeRef {
    pub fn name(&self) -> &str {
        match self {
            TypeRef::Name(name) => name,
            TypeRef::Slotted { type_, .. } => &type_.name,
            TypeRef::Named(named) => &named.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatEntry {
    pub base_stat: u32,
    #[serde(default)]
    pub effort: Option<u32>,
    pub stat: NamedRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityEntry {
    pub ability: NamedRef,
    #[serde(default)]
    pub is_hidden: bool,
}

/// Body of `GET /pokemon/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailPayload {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub weight: Option<u32>,
    #[serde(default)]
    pub base_experience: Option<u32>,
    #[serde(default)]
    pub sprites: Option<SpritesPayload>,
    #[serde(default)]
    pub types: Vec<TypeRef>,
    #[serde(default)]
    pub stats: Vec<StatEntry>,
    #[serde(default)]
    pub abilities: Vec<AbilityEntry>,
}

/// Error body the backend attaches to non-2xx responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub detail: Option<String>,
}
