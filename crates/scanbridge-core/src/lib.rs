//! ScanBridge Core Protocol Implementation
//!
//! This crate provides the foundational types for bridging applications to
//! vendor barcode-scanner subsystems that speak over one-way broadcast
//! messages: outbound commands, correlation ids, the pending-call registry,
//! inbound reply messages and the transport seam. The runtime engine that
//! wires these together lives in `scanbridge-runtime`.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod channel;
pub mod command;
pub mod config;
pub mod correlation;
pub mod reply;
pub mod transport;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use channel::{Effect, ScanResult, ScannerEvent};
pub use command::{Command, Payload, Value};
pub use config::{ChannelConfig, SessionConfig};
pub use correlation::{CorrelationId, PendingCalls, PendingReply, ReplySlot, ReplyValue};
pub use reply::{ReplyMessage, ReplyVocabulary};
pub use transport::IntentTransport;

// ----------------------------------------------------------------------------
// Error Types
// ----------------------------------------------------------------------------

/// Core error types for the scanner bridge
#[derive(Debug, thiserror::Error)]
pub enum ScanBridgeError {
    #[error("Channel failure: {reason}")]
    Channel { reason: String },

    #[error("Session was reset before a reply arrived")]
    SessionReset,

    #[error("No reply for command {id} within {waited_ms}ms")]
    ReplyTimeout {
        id: correlation::CorrelationId,
        waited_ms: u64,
    },

    #[error("Reply carried {got} where {expected} was expected")]
    ReplyType {
        expected: &'static str,
        got: &'static str,
    },

    #[error("Invalid configuration: {reason}")]
    Configuration { reason: String },

    #[error("Transport failure: {reason}")]
    Transport { reason: String },
}

pub type ScanBridgeResult<T> = std::result::Result<T, ScanBridgeError>;
