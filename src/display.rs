//! Plain-text rendering of the controller's views.

use std::fmt;
use std::str::FromStr;

use pokedex_schema::StatName;

use crate::controller::{DetailStatus, DetailView, ListStatus, ListView};
use crate::filters::FilterState;
use crate::mapper::{PokemonDetail, PokemonSummary};
use crate::orchestrator::RequestState;

const LABEL_WIDTH: usize = 12;
const RULE: &str = "--------------------";

/// Uppercases the first letter of each hyphen-separated word: "mr-mime" -> "Mr-Mime".
pub fn capitalize(name: &str) -> String {
    name.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join("-")
}

/// One result card, e.g. `#025 Pikachu [electric]`.
pub fn display_card(card: &PokemonSummary) -> String {
    let name = if card.name.is_empty() {
        "(unnamed)".to_string()
    } else {
        capitalize(&card.name)
    };
    if card.types.is_empty() {
        format!("#{:03} {}", card.id, name)
    } else {
        format!("#{:03} {} [{}]", card.id, name, card.types.join(", "))
    }
}

/// A one-line summary of the active filters.
pub fn display_filters(filters: &FilterState) -> String {
    let mut parts = Vec::new();
    if let Some(term) = filters.search_term() {
        parts.push(format!("search '{}'", term));
    }
    if !filters.types().is_empty() {
        parts.push(format!(
            "types {} ({})",
            filters.types().join("/"),
            filters.match_mode()
        ));
    }
    for (stat, range) in filters.stats() {
        parts.push(format!("{} {}-{}", stat.label(), range.min(), range.max()));
    }

    if parts.is_empty() {
        "Filters: none".to_string()
    } else {
        format!("Filters: {}", parts.join(", "))
    }
}

pub fn display_type_options(types: &RequestState<Vec<String>>) -> String {
    match types {
        RequestState::Idle => "Types not loaded yet.".to_string(),
        RequestState::Loading => "Loading types...".to_string(),
        RequestState::Success(types) if types.is_empty() => "No types available.".to_string(),
        RequestState::Success(types) => format!("Types: {}", types.join(", ")),
        RequestState::Error(info) => format!("Could not load types: {}", info.message),
    }
}

impl fmt::Display for ListView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            ListStatus::Idle => return write!(f, "Nothing loaded yet."),
            ListStatus::Loading => return write!(f, "Loading Pokemon..."),
            ListStatus::Error(info) => {
                write!(f, "Error: {}", info.message)?;
                if self.show_retry {
                    write!(f, "\nType 'retry' to try again.")?;
                }
                return Ok(());
            }
            ListStatus::Empty => {
                return write!(f, "{}", self.empty_message().unwrap_or("No Pokemon found."));
            }
            ListStatus::Ready => {}
        }

        for card in self.cards {
            writeln!(f, "{}", display_card(card))?;
        }
        write!(
            f,
            "{} \u{2022} {} Pokemon",
            self.pagination.page_label(),
            self.pagination.summary()
        )?;
        if self.show_pagination() {
            let previous = if self.can_go_previous { "prev" } else { "-" };
            let next = if self.can_go_next { "next" } else { "-" };
            write!(f, "\n[{}] [{}]", previous, next)?;
        }
        Ok(())
    }
}

/// Label for an API stat name, falling back to the capitalized name.
fn stat_label(name: &str) -> String {
    StatName::from_str(name)
        .map(|stat| stat.label().to_string())
        .unwrap_or_else(|_| capitalize(name))
}

/// Writes the full detail block for one Pokemon.
pub fn display_detail(detail: &PokemonDetail, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    // --- 1. Name and Pokedex Number ---
    writeln!(f, "{} (#{:03})", capitalize(&detail.name), detail.id)?;
    writeln!(f, "{}", RULE)?;

    // --- 2. Sprite, Types and Size ---
    if let Some(sprite) = &detail.sprite_url {
        writeln!(f, "Sprite: {}", sprite)?;
    }
    let type_names: Vec<String> = detail.types.iter().map(|t| capitalize(t)).collect();
    writeln!(f, "Type(s): {}", type_names.join(" / "))?;
    // Height comes in decimetres, weight in hectograms.
    if let Some(height) = detail.height {
        writeln!(f, "Height: {:.1} m", f64::from(height) / 10.0)?;
    }
    if let Some(weight) = detail.weight {
        writeln!(f, "Weight: {:.1} kg", f64::from(weight) / 10.0)?;
    }
    writeln!(f, "{}", RULE)?;

    // --- 3. Base Stats ---
    writeln!(f, "Base Stats:")?;
    for stat in &detail.stats {
        writeln!(f, "{:<LABEL_WIDTH$} : {}", stat_label(&stat.name), stat.base_stat)?;
    }
    writeln!(f, "{}", RULE)?;

    // --- 4. Abilities ---
    let abilities: Vec<String> = detail.abilities.iter().map(|a| capitalize(a)).collect();
    if abilities.is_empty() {
        write!(f, "Abilities: none")
    } else {
        write!(f, "Abilities: {}", abilities.join(", "))
    }
}

impl fmt::Display for DetailView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.status, self.id) {
            (DetailStatus::Closed, _) => write!(f, "No Pokemon selected."),
            (DetailStatus::Loading, Some(id)) => write!(f, "Loading Pokemon #{}...", id),
            (DetailStatus::Loading, None) => write!(f, "Loading Pokemon..."),
            (DetailStatus::Ready(detail), _) => display_detail(detail, f),
            (DetailStatus::Error(info), _) => {
                write!(f, "Error: {}", info.message)?;
                if self.show_retry {
                    write!(f, "\nType 'retry' to try again.")
                } else {
                    write!(f, "\nType 'back' to return to the list.")
                }
            }
        }
    }
}
