//! Explicit per-view listing state.
//!
//! A view owns the criteria currently applied to it and the result of the
//! latest fetch. Fetches are tracked with monotonically increasing
//! [`RequestTicket`]s: a result is applied only if its ticket is the most
//! recently issued one, so an older request resolving after a newer one can
//! never overwrite fresher data.

/// Client-perceived load state of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState<T> {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The latest request succeeded.
    Loaded(Vec<T>),
    /// The latest request failed. Stays failed until a new request is issued.
    Failed(String),
}

impl<T> LoadState<T> {
    /// Records to display; empty unless loaded.
    #[must_use]
    pub fn records(&self) -> &[T] {
        match self {
            Self::Loaded(records) => records,
            _ => &[],
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The failure message, if the latest request failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    /// Rebuild a ticket from a sequence number echoed back by a client.
    #[must_use]
    pub const fn from_seq(seq: u64) -> Self {
        Self(seq)
    }

    #[must_use]
    pub const fn seq(self) -> u64 {
        self.0
    }
}

/// Outcome of completing a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result was applied to the view.
    Applied,
    /// A newer request has been issued; the result was discarded.
    Stale,
}

/// State of a single listing view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState<Q, T> {
    query: Q,
    state: LoadState<T>,
    latest: u64,
}

impl<Q: Default, T> Default for ViewState<Q, T> {
    fn default() -> Self {
        Self::new(Q::default())
    }
}

impl<Q, T> ViewState<Q, T> {
    /// Create an idle view with the given initial query.
    #[must_use]
    pub const fn new(query: Q) -> Self {
        Self {
            query,
            state: LoadState::Idle,
            latest: 0,
        }
    }

    /// The query currently applied.
    #[must_use]
    pub const fn query(&self) -> &Q {
        &self.query
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState<T> {
        &self.state
    }

    /// Start a new request for `query`, superseding any request in flight.
    pub fn begin(&mut self, query: Q) -> RequestTicket {
        self.latest += 1;
        self.query = query;
        self.state = LoadState::Loading;
        RequestTicket(self.latest)
    }

    /// Whether `ticket` belongs to the most recently issued request.
    #[must_use]
    pub const fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Resolve the request identified by `ticket`.
    ///
    /// Results for superseded tickets are dropped and leave the view as is.
    pub fn complete<E: std::fmt::Display>(
        &mut self,
        ticket: RequestTicket,
        result: Result<Vec<T>, E>,
    ) -> Completion {
        if !self.is_current(ticket) {
            return Completion::Stale;
        }
        self.state = match result {
            Ok(records) => LoadState::Loaded(records),
            Err(e) => LoadState::Failed(e.to_string()),
        };
        Completion::Applied
    }

    /// Consume the view, returning its query and state.
    #[must_use]
    pub fn into_parts(self) -> (Q, LoadState<T>) {
        (self.query, self.state)
    }
}
