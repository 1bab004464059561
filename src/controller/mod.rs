//! The top-level view controller.
//!
//! `BrowserController` owns the filter and pagination state and is the only
//! writer of either. User actions mutate them and issue requests through the
//! [`Orchestrator`]; [`BrowserController::next_event`] folds completions and
//! debounce deadlines back in. Everything runs on one logical thread of
//! control: the controller is only ever driven through `&mut self`.

use pokedex_schema::StatName;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::client::PokedexClient;
use crate::config::BrowserConfig;
use crate::debounce::Debouncer;
use crate::errors::ErrorKind;
use crate::filters::{FilterState, FilterStore, MatchMode};
use crate::mapper::{ListPage, PokemonDetail, PokemonId, PokemonSummary};
use crate::orchestrator::{Completion, ErrorInfo, Orchestrator, RequestState, Slot};
use crate::pagination::PaginationState;
use crate::query::{build_list_request, RequestDescriptor};
use crate::transport::Transport;

/// What `next_event` applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserEvent {
    /// A response committed to this slot
    Committed(Slot),
    /// The stat debounce window elapsed and a results request went out
    DebounceFired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    Idle,
    Loading,
    Ready,
    Empty,
    Error(ErrorInfo),
}

/// Render-ready snapshot of the results pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView<'a> {
    pub status: ListStatus,
    pub cards: &'a [PokemonSummary],
    pub pagination: &'a PaginationState,
    pub search_mode: bool,
    pub show_retry: bool,
    pub can_go_next: bool,
    pub can_go_previous: bool,
}

impl ListView<'_> {
    pub fn empty_message(&self) -> Option<&'static str> {
        if self.status != ListStatus::Empty {
            return None;
        }
        Some(if self.search_mode {
            "No Pokemon found matching your search."
        } else {
            "No Pokemon found."
        })
    }

    /// Pagination controls are only worth showing when there is more than one page.
    pub fn show_pagination(&self) -> bool {
        self.pagination.count() > self.pagination.limit()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailStatus<'a> {
    Closed,
    Loading,
    Ready(&'a PokemonDetail),
    Error(ErrorInfo),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView<'a> {
    pub id: Option<PokemonId>,
    pub status: DetailStatus<'a>,
    pub show_retry: bool,
}

enum Wake {
    Completion(Option<Completion>),
    Deadline,
}

pub struct BrowserController<T> {
    filters: FilterStore,
    pagination: PaginationState,
    orchestrator: Orchestrator<T>,
    debouncer: Debouncer,
    last_results_request: Option<(Slot, RequestDescriptor)>,
    detail_id: Option<PokemonId>,
}

impl<T: Transport> BrowserController<T> {
    pub fn new(client: PokedexClient<T>, config: &BrowserConfig) -> Self {
        Self {
            filters: FilterStore::with_match_mode(config.match_mode),
            pagination: PaginationState::new(config.page_size),
            orchestrator: Orchestrator::new(client),
            debouncer: Debouncer::new(config.debounce()),
            last_results_request: None,
            detail_id: None,
        }
    }

    pub fn client(&self) -> &PokedexClient<T> {
        self.orchestrator.client()
    }

    /// Loads the type chips and the first page.
    pub fn start(&mut self) {
        info!("starting browser against {}", self.client().api_base());
        self.orchestrator.issue_types();
        self.refresh_results(false);
    }

    pub fn filters(&self) -> &FilterState {
        self.filters.state()
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    /// `Search` while a search term is set, `List` otherwise.
    pub fn results_slot(&self) -> Slot {
        if self.filters.state().search_term().is_some() {
            Slot::Search
        } else {
            Slot::List
        }
    }

    pub fn set_search(&mut self, text: &str) -> bool {
        let changed = self.filters.set_search(text);
        if changed {
            self.on_filters_changed();
        }
        changed
    }

    pub fn clear_search(&mut self) -> bool {
        self.set_search("")
    }

    pub fn toggle_type(&mut self, type_name: &str) -> bool {
        let changed = self.filters.toggle_type(type_name);
        if changed {
            self.on_filters_changed();
        }
        changed
    }

    pub fn set_match_mode(&mut self, mode: MatchMode) -> bool {
        let changed = self.filters.set_match_mode(mode);
        if changed {
            self.on_filters_changed();
        }
        changed
    }

    pub fn set_stat_range(&mut self, stat: StatName, min: i64, max: i64) -> bool {
        let changed = self.filters.set_stat_range(stat, min, max);
        if changed {
            self.on_stats_edited();
        }
        changed
    }

    pub fn set_stat_min(&mut self, stat: StatName, min: i64) -> bool {
        let changed = self.filters.set_stat_min(stat, min);
        if changed {
            self.on_stats_edited();
        }
        changed
    }

    pub fn set_stat_max(&mut self, stat: StatName, max: i64) -> bool {
        let changed = self.filters.set_stat_max(stat, max);
        if changed {
            self.on_stats_edited();
        }
        changed
    }

    pub fn clear_stats(&mut self) -> bool {
        let changed = self.filters.clear_stats();
        if changed {
            self.on_filters_changed();
        }
        changed
    }

    /// Resets search, types and stats in one step.
    pub fn clear(&mut self) -> bool {
        let changed = self.filters.clear();
        if changed {
            self.on_filters_changed();
        }
        changed
    }

    /// Disabled while the current page is still loading or a stat edit is
    /// waiting to go out, since the links belong to the previous query.
    pub fn next_page(&mut self) -> bool {
        if self.navigation_blocked() || !self.pagination.next_page() {
            return false;
        }
        self.refresh_results(false);
        true
    }

    pub fn previous_page(&mut self) -> bool {
        if self.navigation_blocked() || !self.pagination.previous_page() {
            return false;
        }
        self.refresh_results(false);
        true
    }

    fn navigation_blocked(&self) -> bool {
        self.results_state().is_loading() || self.debouncer.is_pending()
    }

    /// Changes how many results a page holds and reloads from the first page.
    pub fn set_page_size(&mut self, limit: u64) -> bool {
        if limit.max(1) == self.pagination.limit() {
            return false;
        }
        self.pagination.set_limit(limit);
        self.debouncer.cancel();
        self.refresh_results(false);
        true
    }

    /// Re-issues the current results request, even if it already succeeded.
    pub fn retry(&mut self) {
        self.refresh_results(true);
    }

    pub fn open_detail(&mut self, id: PokemonId) {
        self.detail_id = Some(id);
        self.orchestrator.issue_detail(id);
    }

    pub fn retry_detail(&mut self) -> bool {
        match self.detail_id {
            Some(id) => {
                self.orchestrator.issue_detail(id);
                true
            }
            None => false,
        }
    }

    pub fn close_detail(&mut self) {
        self.detail_id = None;
        self.orchestrator.cancel(Slot::Detail);
    }

    pub fn reload_types(&mut self) {
        self.orchestrator.issue_types();
    }

    pub fn types_state(&self) -> &RequestState<Vec<String>> {
        self.orchestrator.types_state()
    }

    /// Known type names, empty until the types request succeeds.
    pub fn type_options(&self) -> &[String] {
        self.types_state().data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn results_state(&self) -> &RequestState<ListPage> {
        self.orchestrator.page_state(self.results_slot())
    }

    pub fn list_view(&self) -> ListView<'_> {
        let search_mode = self.results_slot() == Slot::Search;
        let state = self.results_state();
        let status = match state {
            RequestState::Idle => ListStatus::Idle,
            RequestState::Loading => ListStatus::Loading,
            RequestState::Success(page) if page.results.is_empty() => ListStatus::Empty,
            RequestState::Success(_) => ListStatus::Ready,
            RequestState::Error(info) => ListStatus::Error(info.clone()),
        };
        let blocked = self.navigation_blocked();
        ListView {
            show_retry: matches!(status, ListStatus::Error(_)) && !search_mode,
            status,
            cards: state.data().map(|page| page.results.as_slice()).unwrap_or(&[]),
            pagination: &self.pagination,
            search_mode,
            can_go_next: self.pagination.has_next() && !blocked,
            can_go_previous: self.pagination.has_previous() && !blocked,
        }
    }

    pub fn detail_view(&self) -> DetailView<'_> {
        let status = match (self.detail_id, self.orchestrator.detail_state()) {
            (None, _) | (_, RequestState::Idle) => DetailStatus::Closed,
            (_, RequestState::Loading) => DetailStatus::Loading,
            (_, RequestState::Success(detail)) => DetailStatus::Ready(detail),
            (_, RequestState::Error(info)) => DetailStatus::Error(info.clone()),
        };
        let show_retry = matches!(&status, DetailStatus::Error(info) if info.kind != ErrorKind::NotFound);
        DetailView {
            id: self.detail_id,
            status,
            show_retry,
        }
    }

    /// True while a request is in flight or a debounced refresh is pending.
    pub fn is_busy(&self) -> bool {
        self.orchestrator.any_in_flight() || self.debouncer.is_pending()
    }

    /// Waits for the next completion or debounce deadline and applies it.
    /// Stale completions are absorbed silently. Returns `None` only if the
    /// completion channel closed.
    pub async fn next_event(&mut self) -> Option<BrowserEvent> {
        loop {
            let deadline = self.debouncer.deadline();
            let wake = tokio::select! {
                completion = self.orchestrator.next_completion() => Wake::Completion(completion),
                _ = wait_until(deadline) => Wake::Deadline,
            };

            match wake {
                Wake::Completion(None) => return None,
                Wake::Completion(Some(completion)) => {
                    if let Some(slot) = self.orchestrator.commit(completion) {
                        self.after_commit(slot);
                        return Some(BrowserEvent::Committed(slot));
                    }
                }
                Wake::Deadline => {
                    if self.debouncer.fire_if_due(Instant::now()) {
                        debug!("stat debounce elapsed");
                        self.refresh_results(false);
                        return Some(BrowserEvent::DebounceFired);
                    }
                }
            }
        }
    }

    /// Drives events until nothing is in flight and nothing is pending.
    pub async fn settle(&mut self) {
        while self.is_busy() {
            if self.next_event().await.is_none() {
                break;
            }
        }
    }

    /// Cancels every pending request and the debounce timer.
    pub fn shutdown(&mut self) {
        self.debouncer.cancel();
        self.orchestrator.cancel_all();
    }

    fn on_filters_changed(&mut self) {
        self.pagination.reset_offset();
        // Any pending stat edit is folded into this request.
        self.debouncer.cancel();
        self.refresh_results(false);
    }

    fn on_stats_edited(&mut self) {
        self.pagination.reset_offset();
        self.debouncer.schedule(Instant::now());
    }

    fn refresh_results(&mut self, force: bool) {
        let slot = self.results_slot();
        let request = build_list_request(self.filters.state(), &self.pagination);

        if !force {
            if let Some((last_slot, last_request)) = &self.last_results_request {
                let state = self.orchestrator.page_state(slot);
                let settled_or_pending = state.is_loading() || state.data().is_some();
                if *last_slot == slot && *last_request == request && settled_or_pending {
                    debug!("skipping duplicate {:?} request", slot);
                    return;
                }
            }
        }

        let other = match slot {
            Slot::Search => Slot::List,
            _ => Slot::Search,
        };
        self.orchestrator.cancel(other);
        self.orchestrator.issue_page(slot, request.clone());
        self.last_results_request = Some((slot, request));
    }

    fn after_commit(&mut self, slot: Slot) {
        if slot != self.results_slot() {
            return;
        }
        match self.orchestrator.page_state(slot) {
            RequestState::Success(page) => {
                self.pagination
                    .apply_page(page.count, page.next.clone(), page.previous.clone());
            }
            // A failed query has no totals or links of its own.
            RequestState::Error(_) => self.pagination.apply_page(0, None, None),
            RequestState::Idle | RequestState::Loading => {}
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
pub(crate) mod tests;
