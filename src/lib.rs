// In: src/lib.rs

//! Pokedex Browser Engine
//!
//! The client-side engine behind a browsable, filterable Pokemon catalog:
//! filter state, query building, pagination, request supersession and
//! response normalization against a REST backend. Rendering is left to the
//! caller; the bundled `pokedex` binary renders to the terminal.

// --- MODULE DECLARATIONS ---
// This declares the module hierarchy for the crate.
pub mod client;
pub mod commands;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod display;
pub mod errors;
pub mod filters;
pub mod mapper;
pub mod orchestrator;
pub mod pagination;
pub mod query;
pub mod transport;

// --- PUBLIC API RE-EXPORTS ---
// This section defines the public-facing API of the `pokedex-browser` crate,
// making it easy for users to import the most important types directly.

// --- From the `schema` crate ---
// Re-export the wire payloads and the stat name enum.
pub use pokedex_schema::{DetailPayload, ErrorPayload, StatName};

// --- From this crate's modules (`src/`) ---

// The controller and its render-ready views.
pub use controller::{BrowserController, BrowserEvent, DetailStatus, DetailView, ListStatus, ListView};

// State the controller owns.
pub use filters::{FilterState, FilterStore, MatchMode, StatRange};
pub use pagination::PaginationState;

// Requests and their lifecycle.
pub use client::PokedexClient;
pub use orchestrator::{ErrorInfo, RequestState, Slot};
pub use query::{build_list_request, RequestDescriptor};
pub use transport::{HttpResponse, HttpTransport, Transport, TransportError};

// Normalized view models.
pub use mapper::{ListPage, PokemonDetail, PokemonId, PokemonSummary};

pub use config::BrowserConfig;

// Crate-specific error and result types.
pub use errors::{
    CommandError, CommandResult, ConfigError, ConfigResult, ErrorKind, FetchError, FetchResult,
};
