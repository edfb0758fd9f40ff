//! Bookkeeping for the two asynchronous AI calls a session can have in flight.

use serde::Serialize;
use uuid::Uuid;

/// Lifecycle of one kind of async request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestState {
    #[default]
    Idle,
    InFlight,
    Settled,
}

impl RequestState {
    /// Moves to `InFlight`. Returns false, without changing state, if already there.
    pub fn begin(&mut self) -> bool {
        if *self == RequestState::InFlight {
            return false;
        }
        *self = RequestState::InFlight;
        true
    }

    pub fn settle(&mut self) {
        *self = RequestState::Settled;
    }

    pub fn is_in_flight(&self) -> bool {
        *self == RequestState::InFlight
    }
}

/// The content version an apply-suggestion request was issued against.
///
/// A response is applied only if the workspace still carries the same tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestTicket {
    pub epoch: Uuid,
    pub revision: u64,
    pub suggestion: usize,
}
