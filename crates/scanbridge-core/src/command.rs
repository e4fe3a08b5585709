//! Outbound command model
//!
//! A [`Command`] is an immutable outbound message: an action name, an opaque
//! key/value payload, an optional correlation id and a flag telling the
//! dispatcher whether an asynchronous acknowledgement is expected. The
//! payload mirrors the small set of shapes vendor broadcast envelopes carry
//! in practice: strings, flags, lists and nested tables.

use crate::correlation::CorrelationId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ----------------------------------------------------------------------------
// Payload Values
// ----------------------------------------------------------------------------

/// A single payload entry value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Str(String),
    List(Vec<Value>),
    Table(Payload),
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Payload> for Value {
    fn from(value: Payload) -> Self {
        Value::Table(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Value::List(value.into_iter().map(Value::Str).collect())
    }
}

// ----------------------------------------------------------------------------
// Payload
// ----------------------------------------------------------------------------

/// Opaque key/value structure attached to a command
///
/// Entries are kept in key order so payloads compare and render
/// deterministically. A platform binding serializes this tree into whatever
/// envelope its transport needs (an Android Bundle in the original setting).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    entries: BTreeMap<String, Value>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Convenience accessor for string-typed entries
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(Value::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Convenience accessor for nested tables
    pub fn get_table(&self, key: &str) -> Option<&Payload> {
        match self.entries.get(key) {
            Some(Value::Table(t)) => Some(t),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }
}

// ----------------------------------------------------------------------------
// Command
// ----------------------------------------------------------------------------

/// An outbound message awaiting transmission
///
/// Immutable once constructed; the dispatcher attaches a fresh correlation id
/// to acknowledged commands via [`Command::correlated`] before queueing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    action: String,
    payload: Payload,
    correlation: Option<CorrelationId>,
    expects_reply: bool,
}

impl Command {
    /// Command whose receiver is expected to answer with an acknowledgement
    pub fn expecting_reply(action: impl Into<String>, payload: Payload) -> Self {
        Self {
            action: action.into(),
            payload,
            correlation: None,
            expects_reply: true,
        }
    }

    /// One-way command; nothing will ever answer it
    pub fn fire_and_forget(action: impl Into<String>, payload: Payload) -> Self {
        Self {
            action: action.into(),
            payload,
            correlation: None,
            expects_reply: false,
        }
    }

    /// Returns the command with a correlation id attached
    pub fn correlated(mut self, id: CorrelationId) -> Self {
        self.correlation = Some(id);
        self
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn correlation(&self) -> Option<&CorrelationId> {
        self.correlation.as_ref()
    }

    pub fn expects_reply(&self) -> bool {
        self.expects_reply
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
