//! Inbound reply messages and the routing vocabulary
//!
//! A transport binding parses whatever envelope its platform delivers into a
//! [`ReplyMessage`] before handing it to the dispatcher. The
//! [`ReplyVocabulary`] names which echoed actions count as command
//! acknowledgements and which status literal marks success; vendor crates
//! provide the concrete values.

use crate::correlation::CorrelationId;
use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// Reply Message
// ----------------------------------------------------------------------------

/// One inbound reply, already parsed out of its transport envelope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplyMessage {
    /// Action name the remote service echoes back for acknowledgements
    pub command: Option<String>,
    /// Correlation id the remote service echoes back, when it does
    pub correlation: Option<CorrelationId>,
    /// Vendor status literal, e.g. "SUCCESS"
    pub status: Option<String>,
    /// Marker payload identifying the profile-list reply; these replies carry
    /// no echoed correlation id
    pub profile_names: Option<Vec<String>>,
}

impl ReplyMessage {
    /// Acknowledgement for an identified command
    pub fn ack(
        command: impl Into<String>,
        correlation: CorrelationId,
        status: impl Into<String>,
    ) -> Self {
        Self {
            command: Some(command.into()),
            correlation: Some(correlation),
            status: Some(status.into()),
            profile_names: None,
        }
    }

    /// The well-known profile-list reply
    pub fn profile_list(names: Vec<String>) -> Self {
        Self {
            command: None,
            correlation: None,
            status: None,
            profile_names: Some(names),
        }
    }
}

// ----------------------------------------------------------------------------
// Reply Vocabulary
// ----------------------------------------------------------------------------

/// Which echoed actions are acknowledgements, and what literal means success
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplyVocabulary {
    ack_actions: Vec<String>,
    success_marker: String,
}

impl ReplyVocabulary {
    pub fn new(ack_actions: Vec<String>, success_marker: impl Into<String>) -> Self {
        Self {
            ack_actions,
            success_marker: success_marker.into(),
        }
    }

    /// Whether `command` belongs to the fixed acknowledgement set
    pub fn is_ack(&self, command: &str) -> bool {
        // The set is small and fixed; a linear scan beats a hash set here.
        self.ack_actions.iter().any(|action| action == command)
    }

    /// Whether `status` is the literal success marker
    pub fn is_success(&self, status: &str) -> bool {
        status == self.success_marker
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
