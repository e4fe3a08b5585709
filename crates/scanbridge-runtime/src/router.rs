//! Reply routing policy
//!
//! Decides which pending call an inbound reply answers, in priority order:
//!
//! 1. A message carrying the profile-list marker answers the single
//!    well-known call, regardless of any id field it may also carry. At most
//!    one profile-list call may be outstanding at a time; concurrent
//!    duplicates are unsupported (protocol limitation).
//! 2. A message whose echoed action is in the acknowledgement set routes to
//!    the call named by its correlation id, with the boolean result of
//!    comparing the status field against the success marker.
//! 3. Anything else is unmatched and dropped after a trace.
//!
//! A message lacking a parseable id where one is required falls through to
//! unmatched, which the dispatcher treats as a silent registry miss.

use scanbridge_core::{CorrelationId, ReplyMessage, ReplyVocabulary};

// ----------------------------------------------------------------------------
// Routing Outcome
// ----------------------------------------------------------------------------

/// Result of inspecting one inbound reply message
#[derive(Debug, Clone, PartialEq)]
pub enum RoutedReply {
    /// Answer to the well-known profile-list call
    ProfileList(Vec<String>),
    /// Acknowledgement for an identified command
    Ack { id: CorrelationId, accepted: bool },
    /// Nothing recognisable; no state change
    Unmatched,
}

/// Apply the routing policy to one message
pub fn route(message: &ReplyMessage, vocabulary: &ReplyVocabulary) -> RoutedReply {
    if let Some(names) = &message.profile_names {
        return RoutedReply::ProfileList(names.clone());
    }

    if let (Some(command), Some(id)) = (&message.command, &message.correlation) {
        if vocabulary.is_ack(command) {
            let accepted = message
                .status
                .as_deref()
                .map(|status| vocabulary.is_success(status))
                .unwrap_or(false);
            return RoutedReply::Ack {
                id: id.clone(),
                accepted,
            };
        }
    }

    RoutedReply::Unmatched
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
