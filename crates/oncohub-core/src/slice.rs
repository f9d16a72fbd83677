// ── Resource slices ──
//
// One remote collection or document as a three-state asynchronous value.
// All mutation goes through the slice's `watch::Sender`, so transitions
// are applied one at a time and every subscriber sees whole snapshots.
//
// Each operation takes a `Ticket` when it is dispatched. Under
// `ResponseOrdering::LatestRequest` only the newest ticket of a kind may
// write back; older responses are dropped on arrival.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumString};
use tokio::sync::watch;
use tracing::debug;

/// Snapshot of a slice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SliceState<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
    /// Success notice of the last mutating operation, if it sets one.
    pub notice: Option<String>,
}

/// Operation kinds that are sequenced independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumCount)]
#[strum(serialize_all = "kebab-case")]
pub enum OperationKind {
    FetchAll,
    FetchOne,
    Create,
    Update,
    Delete,
    Submit,
}

impl OperationKind {
    fn index(self) -> usize {
        match self {
            Self::FetchAll => 0,
            Self::FetchOne => 1,
            Self::Create => 2,
            Self::Update => 3,
            Self::Delete => 4,
            Self::Submit => 5,
        }
    }
}

/// How overlapping responses of the same kind are reconciled.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ResponseOrdering {
    /// Only the most recently issued request may update state.
    #[default]
    LatestRequest,
    /// Whichever response resolves last wins, regardless of issue order.
    LastResolution,
}

/// Proof that an operation was dispatched; required to write its result.
#[derive(Debug)]
#[must_use = "a ticket must be settled with fulfill or reject"]
pub struct Ticket {
    kind: OperationKind,
    seq: u64,
}

impl Ticket {
    pub fn kind(&self) -> OperationKind {
        self.kind
    }
}

pub struct Slice<T> {
    name: &'static str,
    ordering: ResponseOrdering,
    state: watch::Sender<SliceState<T>>,
    latest: [AtomicU64; OperationKind::COUNT],
}

impl<T: Clone + Default> Slice<T> {
    pub fn new(name: &'static str, ordering: ResponseOrdering) -> Self {
        let (state, _) = watch::channel(SliceState::default());
        Self {
            name,
            ordering,
            state,
            latest: Default::default(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ordering(&self) -> ResponseOrdering {
        self.ordering
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> SliceState<T> {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SliceState<T>> {
        self.state.subscribe()
    }

    /// Idle → Pending: set `loading`, clear `error` and `notice`.
    pub fn begin(&self, kind: OperationKind) -> Ticket {
        self.begin_with(kind, |_| {})
    }

    /// Like [`begin`](Self::begin), also applying `prepare` to the state in
    /// the same transition.
    pub fn begin_with(&self, kind: OperationKind, prepare: impl FnOnce(&mut SliceState<T>)) -> Ticket {
        let seq = self.latest[kind.index()].fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
            s.notice = None;
            prepare(s);
        });
        debug!(slice = self.name, %kind, seq, "pending");
        Ticket { kind, seq }
    }

    /// Pending → Fulfilled. Returns `false` if the response was superseded
    /// and discarded.
    pub fn fulfill(&self, ticket: Ticket, apply: impl FnOnce(&mut SliceState<T>)) -> bool {
        if !self.accepts(&ticket) {
            return false;
        }
        self.state.send_modify(|s| {
            s.loading = false;
            apply(s);
        });
        debug!(slice = self.name, kind = %ticket.kind, seq = ticket.seq, "fulfilled");
        true
    }

    /// Pending → Rejected. `data` is left untouched.
    pub fn reject(&self, ticket: Ticket, message: String) -> bool {
        if !self.accepts(&ticket) {
            return false;
        }
        debug!(slice = self.name, kind = %ticket.kind, seq = ticket.seq, %message, "rejected");
        self.state.send_modify(|s| {
            s.loading = false;
            s.error = Some(message);
        });
        true
    }

    /// Record an error that was detected before anything was dispatched.
    pub fn fail(&self, message: impl Into<String>) {
        let message = message.into();
        self.state.send_modify(|s| {
            s.loading = false;
            s.error = Some(message);
        });
    }

    /// Back to the initial state. Responses still in flight become stale.
    pub fn reset(&self) {
        for seq in &self.latest {
            seq.fetch_add(1, Ordering::SeqCst);
        }
        self.state.send_replace(SliceState::default());
        debug!(slice = self.name, "reset");
    }

    fn accepts(&self, ticket: &Ticket) -> bool {
        let latest = self.latest[ticket.kind.index()].load(Ordering::SeqCst);
        if self.ordering == ResponseOrdering::LastResolution || ticket.seq == latest {
            return true;
        }
        debug!(
            slice = self.name,
            kind = %ticket.kind,
            seq = ticket.seq,
            latest,
            "discarding superseded response"
        );
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn slice(ordering: ResponseOrdering) -> Slice<Vec<u32>> {
        Slice::new("numbers", ordering)
    }

    #[test]
    fn begin_sets_loading_and_clears_error() {
        let s = slice(ResponseOrdering::LatestRequest);
        s.fail("old failure");
        let _ticket = s.begin(OperationKind::FetchAll);
        let snap = s.snapshot();
        assert!(snap.loading);
        assert_eq!(snap.error, None);
    }

    #[test]
    fn reject_keeps_previous_data() {
        let s = slice(ResponseOrdering::LatestRequest);
        let t = s.begin(OperationKind::FetchAll);
        s.fulfill(t, |st| st.data = vec![1, 2, 3]);

        let t = s.begin(OperationKind::FetchAll);
        s.reject(t, "Failed to fetch patients.".into());

        let snap = s.snapshot();
        assert_eq!(snap.data, vec![1, 2, 3]);
        assert!(!snap.loading);
        assert_eq!(snap.error.as_deref(), Some("Failed to fetch patients."));
    }

    #[test]
    fn latest_request_discards_superseded_response() {
        let s = slice(ResponseOrdering::LatestRequest);
        let first = s.begin(OperationKind::FetchAll);
        let second = s.begin(OperationKind::FetchAll);

        // Second issued, resolves first.
        assert!(s.fulfill(second, |st| st.data = vec![2]));
        // First issued, resolves last: stale.
        assert!(!s.fulfill(first, |st| st.data = vec![1]));

        assert_eq!(s.snapshot().data, vec![2]);
    }

    #[test]
    fn last_resolution_lets_late_response_win() {
        let s = slice(ResponseOrdering::LastResolution);
        let first = s.begin(OperationKind::FetchAll);
        let second = s.begin(OperationKind::FetchAll);

        assert!(s.fulfill(second, |st| st.data = vec![2]));
        assert!(s.fulfill(first, |st| st.data = vec![1]));

        assert_eq!(s.snapshot().data, vec![1]);
    }

    #[test]
    fn kinds_are_sequenced_independently() {
        let s = slice(ResponseOrdering::LatestRequest);
        let fetch = s.begin(OperationKind::FetchAll);
        let delete = s.begin(OperationKind::Delete);
        assert!(s.fulfill(fetch, |st| st.data = vec![1, 2]));
        assert!(s.fulfill(delete, |st| st.data.retain(|n| *n != 1)));
        assert_eq!(s.snapshot().data, vec![2]);
    }

    #[test]
    fn reset_makes_in_flight_responses_stale() {
        let s = slice(ResponseOrdering::LatestRequest);
        let t = s.begin(OperationKind::FetchAll);
        s.reset();
        assert!(!s.fulfill(t, |st| st.data = vec![9]));
        assert_eq!(s.snapshot(), SliceState::default());
    }

    #[test]
    fn subscribers_see_transitions() {
        let s = slice(ResponseOrdering::LatestRequest);
        let mut rx = s.subscribe();
        let t = s.begin(OperationKind::FetchOne);
        assert!(rx.has_changed().unwrap_or(false));
        assert!(rx.borrow_and_update().loading);
        s.fulfill(t, |st| st.data = vec![4]);
        assert_eq!(rx.borrow_and_update().data, vec![4]);
    }
}
