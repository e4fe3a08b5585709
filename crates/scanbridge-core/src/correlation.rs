//! Correlation ids, the pending-call registry and reply handles
//!
//! Every command that expects an acknowledgement is keyed by a caller-side
//! [`CorrelationId`]. The [`PendingCalls`] registry maps each outstanding id
//! to a single-use completion slot; routing a reply removes the entry, so a
//! second reply with the same id is a miss and is dropped.
//!
//! One id is reserved rather than generated: the profile-list query. The
//! vendor service answers that query without echoing any caller-supplied
//! identifier, so its reply can only be matched by message shape. At most one
//! profile-list call may be outstanding at a time; this is a protocol-level
//! limitation, not an implementation detail.

use crate::{ScanBridgeError, ScanBridgeResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tracing::warn;
use uuid::Uuid;

// ----------------------------------------------------------------------------
// Correlation Id
// ----------------------------------------------------------------------------

/// Reserved id for the profile-list query, whose replies carry no echoed
/// identifier on the wire.
const PROFILE_LIST_ID: &str = "profile-list";

/// Caller-generated token linking a request to its asynchronous reply
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// A fresh random id for a new command
    pub fn fresh() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The single well-known id in the correlation-id space
    pub fn profile_list() -> Self {
        Self(PROFILE_LIST_ID.to_string())
    }

    pub fn is_profile_list(&self) -> bool {
        self.0 == PROFILE_LIST_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CorrelationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CorrelationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ----------------------------------------------------------------------------
// Reply Values
// ----------------------------------------------------------------------------

/// Tagged reply payload so one registry can hold heterogeneous call types
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyValue {
    /// Acknowledgement outcome for a command
    Outcome(bool),
    /// Profile names answering the well-known profile-list query
    Profiles(Vec<String>),
}

impl ReplyValue {
    fn kind(&self) -> &'static str {
        match self {
            ReplyValue::Outcome(_) => "outcome",
            ReplyValue::Profiles(_) => "profiles",
        }
    }
}

impl TryFrom<ReplyValue> for bool {
    type Error = ScanBridgeError;

    fn try_from(value: ReplyValue) -> Result<Self, Self::Error> {
        match value {
            ReplyValue::Outcome(accepted) => Ok(accepted),
            other => Err(ScanBridgeError::ReplyType {
                expected: "outcome",
                got: other.kind(),
            }),
        }
    }
}

impl TryFrom<ReplyValue> for Vec<String> {
    type Error = ScanBridgeError;

    fn try_from(value: ReplyValue) -> Result<Self, Self::Error> {
        match value {
            ReplyValue::Profiles(names) => Ok(names),
            other => Err(ScanBridgeError::ReplyType {
                expected: "profiles",
                got: other.kind(),
            }),
        }
    }
}

/// Single-use completion slot held by the registry for one pending call
pub type ReplySlot = oneshot::Sender<ScanBridgeResult<ReplyValue>>;

// ----------------------------------------------------------------------------
// Pending-Call Registry
// ----------------------------------------------------------------------------

#[derive(Debug)]
struct PendingEntry {
    slot: ReplySlot,
    seq: u64,
}

/// Registry of outstanding calls, each awaiting exactly one reply
///
/// Mutated only from the dispatcher's single execution context; no internal
/// locking is needed or provided.
#[derive(Debug, Default)]
pub struct PendingCalls {
    slots: HashMap<CorrelationId, PendingEntry>,
    next_seq: u64,
}

impl PendingCalls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a completion slot under `id`, returning its generation sequence
    ///
    /// Last write wins: a slot already registered under `id` is displaced and
    /// dropped, which resolves its caller with a cancellation. The generation
    /// sequence lets a reply timeout for a reused id (the well-known one)
    /// recognise that a newer call has taken its place.
    pub fn register(&mut self, id: CorrelationId, slot: ReplySlot) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;
        if self
            .slots
            .insert(id.clone(), PendingEntry { slot, seq })
            .is_some()
        {
            warn!(%id, "pending call replaced; previous caller cancelled");
        }
        seq
    }

    /// Remove and resolve the call registered under `id`
    ///
    /// Returns false on a miss (unexpected or already-consumed reply); the
    /// value is dropped in that case.
    pub fn complete(&mut self, id: &CorrelationId, value: ScanBridgeResult<ReplyValue>) -> bool {
        match self.slots.remove(id) {
            Some(entry) => {
                // The receiver may have been dropped; nothing to do then.
                let _ = entry.slot.send(value);
                true
            }
            None => false,
        }
    }

    /// Complete only if the entry still belongs to generation `seq`
    pub fn complete_if_current(
        &mut self,
        id: &CorrelationId,
        seq: u64,
        value: ScanBridgeResult<ReplyValue>,
    ) -> bool {
        match self.slots.get(id) {
            Some(entry) if entry.seq == seq => self.complete(id, value),
            _ => false,
        }
    }

    /// Generation sequence of the call currently registered under `id`
    pub fn generation(&self, id: &CorrelationId) -> Option<u64> {
        self.slots.get(id).map(|entry| entry.seq)
    }

    pub fn is_registered(&self, id: &CorrelationId) -> bool {
        self.slots.contains_key(id)
    }

    /// Drop every outstanding call, resolving each with a reset error
    pub fn clear(&mut self) {
        for (_, entry) in self.slots.drain() {
            let _ = entry.slot.send(Err(ScanBridgeError::SessionReset));
        }
    }
}

// ----------------------------------------------------------------------------
// Pending Reply Handle
// ----------------------------------------------------------------------------

/// Future-like handle for a single asynchronous reply
///
/// States: pending → resolved(value) | resolved(error). Resolution happens
/// exactly once; the registry enforces this by removing the slot when it
/// completes.
#[derive(Debug)]
pub struct PendingReply<T> {
    rx: oneshot::Receiver<ScanBridgeResult<ReplyValue>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PendingReply<T> {
    /// Create a slot/handle pair for a call about to be registered
    pub fn channel() -> (ReplySlot, Self) {
        let (tx, rx) = oneshot::channel();
        (
            tx,
            Self {
                rx,
                _marker: PhantomData,
            },
        )
    }

    /// Handle that is already resolved, for commands that expect no reply
    pub fn resolved(value: ReplyValue) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(Ok(value));
        Self {
            rx,
            _marker: PhantomData,
        }
    }
}

impl<T> Future for PendingReply<T>
where
    T: TryFrom<ReplyValue, Error = ScanBridgeError>,
{
    type Output = ScanBridgeResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(Ok(value))) => Poll::Ready(T::try_from(value)),
            Poll::Ready(Ok(Err(error))) => Poll::Ready(Err(error)),
            // Slot dropped without resolution: session reset or teardown.
            Poll::Ready(Err(_)) => Poll::Ready(Err(ScanBridgeError::SessionReset)),
            Poll::Pending => Poll::Pending,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
