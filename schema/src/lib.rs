// Pokedex Schema - Wire payload definitions
// This crate contains the payload shapes returned by the catalog REST API and
// the canonical set of stat names used in filtering, shared between the
// browser engine and anything else that speaks to the same API.

// Re-export the main types
pub use detail_payload::*;
pub use stat_names::*;

pub mod detail_payload;
pub mod stat_names;
