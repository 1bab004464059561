//! Request lifecycle per logical query slot.
//!
//! Each slot (list, search, types, detail) holds one [`RequestState`]. The
//! fetches themselves run as tokio tasks and report back over a channel; a
//! completion only commits if it carries the slot's current generation, so
//! a slow, superseded response can never overwrite newer state.

use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

use crate::client::PokedexClient;
use crate::errors::{ErrorKind, FetchError, FetchResult};
use crate::mapper::{ListPage, PokemonDetail, PokemonId};
use crate::query::RequestDescriptor;
use crate::transport::Transport;

/// A named category of request; only the newest request in a slot is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    List,
    Search,
    Types,
    Detail,
}

/// A failure as the view sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub message: String,
    pub kind: ErrorKind,
}

impl From<FetchError> for ErrorInfo {
    fn from(err: FetchError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestState<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Error(ErrorInfo),
}

impl<T> RequestState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            RequestState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        match self {
            RequestState::Error(info) => Some(info),
            _ => None,
        }
    }
}

/// Identifies the request a completion belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub slot: Slot,
    pub generation: u64,
}

#[derive(Debug)]
pub enum Outcome {
    Page(FetchResult<ListPage>),
    Types(FetchResult<Vec<String>>),
    Detail(FetchResult<PokemonDetail>),
}

#[derive(Debug)]
pub struct Completion {
    pub ticket: Ticket,
    pub outcome: Outcome,
}

#[derive(Debug)]
struct SlotState<D> {
    generation: u64,
    state: RequestState<D>,
    in_flight: Option<AbortHandle>,
}

impl<D> Default for SlotState<D> {
    fn default() -> Self {
        Self {
            generation: 0,
            state: RequestState::Idle,
            in_flight: None,
        }
    }
}

impl<D> SlotState<D> {
    /// Supersedes whatever is in flight and returns the new generation.
    fn begin(&mut self) -> u64 {
        self.abort();
        self.generation += 1;
        self.state = RequestState::Loading;
        self.generation
    }

    fn abort(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }

    fn cancel(&mut self) {
        self.abort();
        // Late completions of the cancelled request must not match.
        self.generation += 1;
        self.state = RequestState::Idle;
    }

    fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }
}

impl<D: PartialEq> SlotState<D> {
    fn commit(&mut self, slot: Slot, generation: u64, result: FetchResult<D>) -> bool {
        if generation != self.generation {
            debug!(
                "dropping stale {:?} completion (generation {}, current {})",
                slot, generation, self.generation
            );
            return false;
        }
        self.in_flight = None;
        let next = match result {
            Ok(data) => RequestState::Success(data),
            Err(err) => {
                warn!("{:?} request failed: {}", slot, err);
                RequestState::Error(err.into())
            }
        };
        if self.state != next {
            self.state = next;
        }
        true
    }
}

pub struct Orchestrator<T> {
    client: PokedexClient<T>,
    sender: mpsc::UnboundedSender<Completion>,
    receiver: mpsc::UnboundedReceiver<Completion>,
    list: SlotState<ListPage>,
    search: SlotState<ListPage>,
    types: SlotState<Vec<String>>,
    detail: SlotState<PokemonDetail>,
}

impl<T: Transport> Orchestrator<T> {
    pub fn new(client: PokedexClient<T>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            client,
            sender,
            receiver,
            list: SlotState::default(),
            search: SlotState::default(),
            types: SlotState::default(),
            detail: SlotState::default(),
        }
    }

    pub fn client(&self) -> &PokedexClient<T> {
        &self.client
    }

    /// Issues a list or search request. `slot` must be `List` or `Search`.
    pub fn issue_page(&mut self, slot: Slot, request: RequestDescriptor) -> Ticket {
        let state = match slot {
            Slot::Search => &mut self.search,
            _ => &mut self.list,
        };
        let ticket = Ticket {
            slot: if slot == Slot::Search { Slot::Search } else { Slot::List },
            generation: state.begin(),
        };
        debug!("issuing {:?} #{}: {}", ticket.slot, ticket.generation, request.query_string());

        let client = self.client.clone();
        let sender = self.sender.clone();
        let task = tokio::spawn(async move {
            let result = client.fetch_list(&request).await;
            let _ = sender.send(Completion {
                ticket,
                outcome: Outcome::Page(result),
            });
        });
        state.in_flight = Some(task.abort_handle());
        ticket
    }

    pub fn issue_types(&mut self) -> Ticket {
        let ticket = Ticket {
            slot: Slot::Types,
            generation: self.types.begin(),
        };
        debug!("issuing Types #{}", ticket.generation);

        let client = self.client.clone();
        let sender = self.sender.clone();
        let task = tokio::spawn(async move {
            let result = client.fetch_types().await;
            let _ = sender.send(Completion {
                ticket,
                outcome: Outcome::Types(result),
            });
        });
        self.types.in_flight = Some(task.abort_handle());
        ticket
    }

    pub fn issue_detail(&mut self, id: PokemonId) -> Ticket {
        let ticket = Ticket {
            slot: Slot::Detail,
            generation: self.detail.begin(),
        };
        debug!("issuing Detail #{} for id {}", ticket.generation, id);

        let client = self.client.clone();
        let sender = self.sender.clone();
        let task = tokio::spawn(async move {
            let result = client.fetch_detail(id).await;
            let _ = sender.send(Completion {
                ticket,
                outcome: Outcome::Detail(result),
            });
        });
        self.detail.in_flight = Some(task.abort_handle());
        ticket
    }

    /// Waits for the next completion from any slot.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        self.receiver.recv().await
    }

    /// Applies a completion. Returns the slot that changed, or `None` if the
    /// completion was stale and dropped.
    pub fn commit(&mut self, completion: Completion) -> Option<Slot> {
        let Ticket { slot, generation } = completion.ticket;
        let committed = match (slot, completion.outcome) {
            (Slot::List, Outcome::Page(result)) => self.list.commit(slot, generation, result),
            (Slot::Search, Outcome::Page(result)) => self.search.commit(slot, generation, result),
            (Slot::Types, Outcome::Types(result)) => self.types.commit(slot, generation, result),
            (Slot::Detail, Outcome::Detail(result)) => self.detail.commit(slot, generation, result),
            (slot, outcome) => {
                warn!("mismatched completion for {:?}: {:?}", slot, outcome);
                false
            }
        };
        committed.then_some(slot)
    }

    pub fn cancel(&mut self, slot: Slot) {
        match slot {
            Slot::List => self.list.cancel(),
            Slot::Search => self.search.cancel(),
            Slot::Types => self.types.cancel(),
            Slot::Detail => self.detail.cancel(),
        }
    }

    pub fn cancel_all(&mut self) {
        for slot in [Slot::List, Slot::Search, Slot::Types, Slot::Detail] {
            self.cancel(slot);
        }
    }

    pub fn is_in_flight(&self, slot: Slot) -> bool {
        match slot {
            Slot::List => self.list.is_in_flight(),
            Slot::Search => self.search.is_in_flight(),
            Slot::Types => self.types.is_in_flight(),
            Slot::Detail => self.detail.is_in_flight(),
        }
    }

    pub fn any_in_flight(&self) -> bool {
        [Slot::List, Slot::Search, Slot::Types, Slot::Detail]
            .into_iter()
            .any(|slot| self.is_in_flight(slot))
    }

    /// State of a list-shaped slot (`List` or `Search`).
    pub fn page_state(&self, slot: Slot) -> &RequestState<ListPage> {
        match slot {
            Slot::Search => &self.search.state,
            _ => &self.list.state,
        }
    }

    pub fn types_state(&self) -> &RequestState<Vec<String>> {
        &self.types.state
    }

    pub fn detail_state(&self) -> &RequestState<PokemonDetail> {
        &self.detail.state
    }
}

impl<T> Drop for Orchestrator<T> {
    fn drop(&mut self) {
        self.list.abort();
        self.search.abort();
        self.types.abort();
        self.detail.abort();
    }
}
