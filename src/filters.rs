//! Filter state: search text, up to two selected types, and per-stat ranges.

use pokedex_schema::StatName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Inclusive lower bound of a stat slider.
pub const STAT_FLOOR: u8 = 5;
/// Inclusive upper bound of a stat slider.
pub const STAT_CEILING: u8 = 255;
/// Maximum number of types that can be selected at once.
pub const MAX_SELECTED_TYPES: usize = 2;

/// How multiple selected types combine on the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// A Pokemon must have every selected type (AND)
    #[default]
    All,
    /// A Pokemon may have any of the selected types (OR)
    Any,
}

impl MatchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchMode::All => "all",
            MatchMode::Any => "any",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "and" => Ok(MatchMode::All),
            "any" | "or" => Ok(MatchMode::Any),
            other => Err(format!("unknown match mode '{}', expected 'all' or 'any'", other)),
        }
    }
}

/// An inclusive `[min, max]` range over a base stat, always within
/// `[STAT_FLOOR, STAT_CEILING]` with `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatRange {
    min: u8,
    max: u8,
}

impl Default for StatRange {
    fn default() -> Self {
        Self {
            min: STAT_FLOOR,
            max: STAT_CEILING,
        }
    }
}

impl StatRange {
    /// Builds a range from arbitrary bounds. When they cross, `max` is raised
    /// to `min`.
    pub fn new(min: i64, max: i64) -> Self {
        Self::resolve(Self::default(), min, max)
    }

    /// Clamps the requested bounds and un-crosses them relative to
    /// `previous`: if `min` was the bound that moved, `max` is pulled up to
    /// it, otherwise `min` is pulled down to `max`.
    pub fn resolve(previous: StatRange, min: i64, max: i64) -> Self {
        let mut min = clamp_stat(min);
        let mut max = clamp_stat(max);
        if min > max {
            if min != previous.min {
                max = min;
            } else {
                min = max;
            }
        }
        Self { min, max }
    }

    pub fn min(&self) -> u8 {
        self.min
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    /// A full-width range filters nothing and is left out of queries.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for StatRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

fn clamp_stat(value: i64) -> u8 {
    // Clamped into u8 range first, so the cast cannot truncate.
    value.clamp(i64::from(STAT_FLOOR), i64::from(STAT_CEILING)) as u8
}

/// The complete set of user-chosen filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    search: String,
    types: Vec<String>,
    stats: BTreeMap<StatName, StatRange>,
    match_mode: MatchMode,
}

impl FilterState {
    /// The raw search text as typed.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Search text as it is sent to the server; `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        let trimmed = self.search.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Selected types, oldest selection first.
    pub fn types(&self) -> &[String] {
        &self.types
    }

    /// Active (non-default) stat ranges in canonical stat order.
    pub fn stats(&self) -> &BTreeMap<StatName, StatRange> {
        &self.stats
    }

    /// Current range for a stat, the default if it is inactive.
    pub fn stat_range(&self, stat: StatName) -> StatRange {
        self.stats.get(&stat).copied().unwrap_or_default()
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    pub fn is_active(&self) -> bool {
        self.search_term().is_some() || !self.types.is_empty() || !self.stats.is_empty()
    }
}

/// Owns a `FilterState` and applies user edits to it.
///
/// Every mutation returns `true` only when the state actually changed, so
/// callers can skip re-querying on no-op edits.
#[derive(Debug, Clone, Default)]
pub struct FilterStore {
    state: FilterState,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_match_mode(match_mode: MatchMode) -> Self {
        Self {
            state: FilterState {
                match_mode,
                ..FilterState::default()
            },
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn set_search(&mut self, text: &str) -> bool {
        if self.state.search == text {
            return false;
        }
        self.state.search = text.to_string();
        true
    }

    /// Selects or deselects a type. A third selection evicts the oldest one.
    pub fn toggle_type(&mut self, type_name: &str) -> bool {
        let type_name = type_name.trim().to_lowercase();
        if type_name.is_empty() {
            return false;
        }

        let types = &mut self.state.types;
        if let Some(index) = types.iter().position(|t| *t == type_name) {
            types.remove(index);
        } else {
            if types.len() >= MAX_SELECTED_TYPES {
                types.remove(0);
            }
            types.push(type_name);
        }
        true
    }

    pub fn set_match_mode(&mut self, mode: MatchMode) -> bool {
        if self.state.match_mode == mode {
            return false;
        }
        self.state.match_mode = mode;
        true
    }

    /// Sets both bounds of a stat filter. See [`StatRange::resolve`] for how
    /// out-of-range and crossed bounds are handled.
    pub fn set_stat_range(&mut self, stat: StatName, min: i64, max: i64) -> bool {
        let previous = self.state.stat_range(stat);
        let next = StatRange::resolve(previous, min, max);
        if next == previous {
            return false;
        }
        if next.is_default() {
            self.state.stats.remove(&stat);
        } else {
            self.state.stats.insert(stat, next);
        }
        true
    }

    pub fn set_stat_min(&mut self, stat: StatName, min: i64) -> bool {
        let current = self.state.stat_range(stat);
        self.set_stat_range(stat, min, i64::from(current.max))
    }

    pub fn set_stat_max(&mut self, stat: StatName, max: i64) -> bool {
        let current = self.state.stat_range(stat);
        self.set_stat_range(stat, i64::from(current.min), max)
    }

    pub fn clear_stats(&mut self) -> bool {
        if self.state.stats.is_empty() {
            return false;
        }
        self.state.stats.clear();
        true
    }

    /// Resets search, types and stats. The match mode is a preference and is kept.
    pub fn clear(&mut self) -> bool {
        if !self.state.is_active() && self.state.search.is_empty() {
            return false;
        }
        self.state.search.clear();
        self.state.types.clear();
        self.state.stats.clear();
        true
    }
}
