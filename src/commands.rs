//! Interactive text commands for the terminal front end.
//!
//! Each command maps onto one controller action. [`execute`] applies it,
//! settles the controller and returns the text to show.

use std::str::FromStr;

use pokedex_schema::StatName;
use tracing::debug;

use crate::config::MAX_PAGE_SIZE;
use crate::controller::BrowserController;
use crate::display::{display_filters, display_type_options};
use crate::errors::{CommandError, CommandResult};
use crate::filters::MatchMode;
use crate::mapper::PokemonId;
use crate::orchestrator::RequestState;
use crate::transport::Transport;

pub const HELP_TEXT: &str = "\
Commands:
  search <text>             search by name (server side)
  clear-search              drop the search term
  type <name>               toggle a type filter (at most two)
  match all|any             how two types combine
  stat <stat> <min> <max>   set a stat range, e.g. 'stat attack 70 255'
  min <stat> <value>        set a stat's lower bound
  max <stat> <value>        set a stat's upper bound
  clear-stats               reset every stat range
  clear                     reset search, types and stats
  next / prev               change page
  page-size <n>             results per page (1-100)
  retry                     re-run the failed request
  show <id>                 open a Pokemon's details
  back                      return to the list
  types                     list the known types
  health                    ping the backend
  help                      show this text
  quit                      exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    ClearSearch,
    Type(String),
    Match(MatchMode),
    Stat { stat: StatName, min: i64, max: i64 },
    Min { stat: StatName, value: i64 },
    Max { stat: StatName, value: i64 },
    ClearStats,
    Clear,
    Next,
    Prev,
    PageSize(u64),
    Retry,
    Show(PokemonId),
    Back,
    Types,
    Health,
    Help,
    Quit,
}

fn parse_stat(value: Option<&str>) -> CommandResult<StatName> {
    let value = value.ok_or(CommandError::MissingArgument("stat name"))?;
    StatName::from_str(value).map_err(|_| CommandError::InvalidArgument {
        what: "stat",
        value: value.to_string(),
    })
}

fn parse_bound(value: Option<&str>) -> CommandResult<i64> {
    let value = value.ok_or(CommandError::MissingArgument("stat value"))?;
    value.parse().map_err(|_| CommandError::InvalidArgument {
        what: "stat value",
        value: value.to_string(),
    })
}

/// Parses one input line. Surrounding whitespace is ignored; the search
/// text keeps its inner spacing.
pub fn parse_command(line: &str) -> CommandResult<Command> {
    let line = line.trim();
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map(|(verb, rest)| (verb, rest.trim()))
        .unwrap_or((line, ""));
    let mut args = rest.split_whitespace();

    let command = match verb.to_lowercase().as_str() {
        "" => return Err(CommandError::MissingArgument("command")),
        "search" | "find" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument("search text"));
            }
            Command::Search(rest.to_string())
        }
        "clear-search" => Command::ClearSearch,
        "type" => Command::Type(
            args.next()
                .ok_or(CommandError::MissingArgument("type name"))?
                .to_string(),
        ),
        "match" => {
            let value = args.next().ok_or(CommandError::MissingArgument("match mode"))?;
            let mode = MatchMode::from_str(value).map_err(|_| CommandError::InvalidArgument {
                what: "match mode",
                value: value.to_string(),
            })?;
            Command::Match(mode)
        }
        "stat" => Command::Stat {
            stat: parse_stat(args.next())?,
            min: parse_bound(args.next())?,
            max: parse_bound(args.next())?,
        },
        "min" => Command::Min {
            stat: parse_stat(args.next())?,
            value: parse_bound(args.next())?,
        },
        "max" => Command::Max {
            stat: parse_stat(args.next())?,
            value: parse_bound(args.next())?,
        },
        "clear-stats" => Command::ClearStats,
        "clear" | "reset" => Command::Clear,
        "next" | "n" => Command::Next,
        "prev" | "previous" | "p" => Command::Prev,
        "page-size" | "limit" => {
            let value = args.next().ok_or(CommandError::MissingArgument("page size"))?;
            let size = value
                .parse::<u64>()
                .ok()
                .filter(|size| (1..=MAX_PAGE_SIZE).contains(size))
                .ok_or_else(|| CommandError::InvalidArgument {
                    what: "page size",
                    value: value.to_string(),
                })?;
            Command::PageSize(size)
        }
        "retry" => Command::Retry,
        "show" | "detail" => {
            let value = args.next().ok_or(CommandError::MissingArgument("pokemon id"))?;
            let id = value
                .trim_start_matches('#')
                .parse()
                .map_err(|_| CommandError::InvalidArgument {
                    what: "pokemon id",
                    value: value.to_string(),
                })?;
            Command::Show(id)
        }
        "back" => Command::Back,
        "types" => Command::Types,
        "health" => Command::Health,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::UnknownCommand(other.to_string())),
    };
    Ok(command)
}

fn render_list<T: Transport>(controller: &BrowserController<T>) -> String {
    format!(
        "{}\n{}",
        display_filters(controller.filters()),
        controller.list_view()
    )
}

fn render_current<T: Transport>(controller: &BrowserController<T>) -> String {
    if controller.detail_view().id.is_some() {
        controller.detail_view().to_string()
    } else {
        render_list(controller)
    }
}

/// Applies `command`, waits for the resulting requests and returns the text
/// to show. `None` means the session should end.
pub async fn execute<T: Transport>(
    controller: &mut BrowserController<T>,
    command: Command,
) -> Option<String> {
    debug!("executing {:?}", command);

    // List commands act on the list page.
    let list_command = !matches!(
        command,
        Command::Retry | Command::Show(_) | Command::Types | Command::Health | Command::Help | Command::Quit
    );
    if list_command {
        controller.close_detail();
    }

    match command {
        Command::Quit => {
            controller.shutdown();
            return None;
        }
        Command::Help => return Some(HELP_TEXT.to_string()),
        Command::Health => {
            let text = match controller.client().check_health().await {
                Ok(()) => format!("Backend at {} is healthy.", controller.client().api_base()),
                Err(e) => format!("Backend at {} is unavailable: {}", controller.client().api_base(), e),
            };
            return Some(text);
        }
        Command::Types => {
            if matches!(controller.types_state(), RequestState::Idle | RequestState::Error(_)) {
                controller.reload_types();
            }
            controller.settle().await;
            return Some(display_type_options(controller.types_state()));
        }
        Command::Search(text) => {
            controller.set_search(&text);
        }
        Command::ClearSearch => {
            controller.clear_search();
        }
        Command::Type(name) => {
            controller.toggle_type(&name);
        }
        Command::Match(mode) => {
            controller.set_match_mode(mode);
        }
        Command::Stat { stat, min, max } => {
            controller.set_stat_range(stat, min, max);
        }
        Command::Min { stat, value } => {
            controller.set_stat_min(stat, value);
        }
        Command::Max { stat, value } => {
            controller.set_stat_max(stat, value);
        }
        Command::ClearStats => {
            controller.clear_stats();
        }
        Command::Clear => {
            controller.clear();
        }
        Command::Next => {
            if !controller.next_page() {
                return Some("There is no next page.".to_string());
            }
        }
        Command::Prev => {
            if !controller.previous_page() {
                return Some("Already on the first page.".to_string());
            }
        }
        Command::PageSize(size) => {
            controller.set_page_size(size);
        }
        Command::Retry => {
            let detail = controller.detail_view();
            match (detail.id, detail.show_retry) {
                (Some(_), true) => {
                    controller.retry_detail();
                }
                // A missing Pokemon stays missing.
                (Some(_), false) => {}
                (None, _) => controller.retry(),
            }
        }
        Command::Show(id) => controller.open_detail(id),
        Command::Back => {}
    }

    controller.settle().await;
    Some(render_current(controller))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::tests::common::{controller_with, entry, envelope, FakeTransport};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parses_simple_verbs() {
        assert_eq!(parse_command("next"), Ok(Command::Next));
        assert_eq!(parse_command("  PREV "), Ok(Command::Prev));
        assert_eq!(parse_command("clear-stats"), Ok(Command::ClearStats));
        assert_eq!(parse_command("quit"), Ok(Command::Quit));
    }

    #[test]
    fn test_search_keeps_inner_spacing() {
        assert_eq!(
            parse_command("search  mr mime "),
            Ok(Command::Search("mr mime".to_string()))
        );
        assert_eq!(
            parse_command("search"),
            Err(CommandError::MissingArgument("search text"))
        );
    }

    #[test]
    fn test_parses_stat_commands() {
        assert_eq!(
            parse_command("stat sp-atk 70 120"),
            Ok(Command::Stat {
                stat: StatName::SpecialAttack,
                min: 70,
                max: 120
            })
        );
        assert_eq!(
            parse_command("min speed 90"),
            Ok(Command::Min {
                stat: StatName::Speed,
                value: 90
            })
        );
        assert_eq!(
            parse_command("max luck 5"),
            Err(CommandError::InvalidArgument {
                what: "stat",
                value: "luck".to_string()
            })
        );
        assert_eq!(
            parse_command("max hp lots"),
            Err(CommandError::InvalidArgument {
                what: "stat value",
                value: "lots".to_string()
            })
        );
    }

    #[test]
    fn test_parses_show_and_match() {
        assert_eq!(parse_command("show #25"), Ok(Command::Show(25)));
        assert_eq!(parse_command("match or"), Ok(Command::Match(MatchMode::Any)));
        assert!(matches!(
            parse_command("show pikachu"),
            Err(CommandError::InvalidArgument { what: "pokemon id", .. })
        ));
    }

    #[test]
    fn test_parses_page_size_within_bounds() {
        assert_eq!(parse_command("page-size 50"), Ok(Command::PageSize(50)));
        assert_eq!(
            parse_command("page-size 500"),
            Err(CommandError::InvalidArgument {
                what: "page size",
                value: "500".to_string()
            })
        );
        assert!(parse_command("page-size 0").is_err());
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_command("dance").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown command: dance. Type 'help' for a list of commands."
        );
        assert_eq!(parse_command("   "), Err(CommandError::MissingArgument("command")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_renders_list_and_detail() {
        let fake = FakeTransport::new();
        fake.respond_json("/pokemon", envelope(vec![entry(25, "pikachu", &["electric"])], 1, 0, 20));
        fake.respond_json(
            "/pokemon/25",
            json!({ "id": 25, "name": "pikachu", "types": ["electric"], "stats": [], "abilities": [] }),
        );
        let mut controller = controller_with(&fake);

        let text = execute(&mut controller, Command::Search("pika".to_string())).await;
        assert_eq!(
            text.as_deref(),
            Some("Filters: search 'pika'\n#025 Pikachu [electric]\nPage 1 of 1 \u{2022} Showing 1-1 of 1 Pokemon")
        );

        let text = execute(&mut controller, Command::Show(25)).await.unwrap_or_default();
        assert!(text.starts_with("Pikachu (#025)"));

        let text = execute(&mut controller, Command::Back).await.unwrap_or_default();
        assert!(text.starts_with("Filters: search 'pika'"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_paging_past_end_is_reported() {
        let fake = FakeTransport::new();
        fake.respond_json("/pokemon", envelope(vec![entry(1, "bulbasaur", &["grass"])], 1, 0, 20));
        let mut controller = controller_with(&fake);
        controller.start();
        controller.settle().await;

        let text = execute(&mut controller, Command::Next).await;
        assert_eq!(text.as_deref(), Some("There is no next page."));
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_health_and_quit() {
        let fake = FakeTransport::new();
        fake.respond_json("/health", json!({ "status": "ok" }));
        let mut controller = controller_with(&fake);

        let text = execute(&mut controller, Command::Health).await;
        assert_eq!(text.as_deref(), Some("Backend at http://api.test is healthy."));
        assert_eq!(execute(&mut controller, Command::Quit).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_does_not_refetch_missing_pokemon() {
        let fake = FakeTransport::new();
        let mut controller = controller_with(&fake);

        let text = execute(&mut controller, Command::Show(9999)).await.unwrap_or_default();
        assert!(text.starts_with("Error: Pokemon with ID 9999 not found."));
        assert_eq!(fake.requests_to("/pokemon/9999").len(), 1);

        let text = execute(&mut controller, Command::Retry).await.unwrap_or_default();
        assert!(text.ends_with("Type 'back' to return to the list."));
        assert_eq!(fake.requests_to("/pokemon/9999").len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_refetches_failed_detail() {
        let fake = FakeTransport::new();
        fake.respond("/pokemon/7", 500, "");
        let mut controller = controller_with(&fake);

        execute(&mut controller, Command::Show(7)).await;
        execute(&mut controller, Command::Retry).await;
        assert_eq!(fake.requests_to("/pokemon/7").len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_types_loads_on_demand() {
        let fake = FakeTransport::new();
        let mut controller = controller_with(&fake);

        let text = execute(&mut controller, Command::Types).await;
        assert_eq!(text.as_deref(), Some("Types: grass, poison, fire, electric"));
    }
}
