//! Channel types connecting the dispatcher to its collaborators
//!
//! Commands flow one way (dispatcher → transport, as [`Effect`]s) and replies
//! flow one way (transport → dispatcher, as [`ScannerEvent`]s), forming a
//! closed request/response loop over an inherently unordered channel.
//! Decoded scan data rides the same inbound event stream and is forwarded to
//! the application on its own channel.

use crate::command::Command;
use crate::config::ChannelConfig;
use crate::reply::ReplyMessage;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

// ----------------------------------------------------------------------------
// Effect: Dispatcher → Transport
// ----------------------------------------------------------------------------

/// Side effects the dispatcher asks the transport to perform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Effect {
    /// Fire one one-way message; any response arrives later as an event
    Transmit(Command),
}

// ----------------------------------------------------------------------------
// ScannerEvent: Transport → Dispatcher
// ----------------------------------------------------------------------------

/// Everything a transport can push back into the dispatcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScannerEvent {
    /// Asynchronous reply to an earlier command
    CommandResult(ReplyMessage),
    /// Decoded barcode delivered by the scanner subsystem
    Scan(ScanResult),
    /// Transport-level fault report
    Fault { reason: String },
}

/// One decoded barcode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub data: String,
}

impl ScanResult {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

// ----------------------------------------------------------------------------
// Channel Aliases and Constructors
// ----------------------------------------------------------------------------

pub type EffectSender = mpsc::UnboundedSender<Effect>;
pub type EffectReceiver = mpsc::UnboundedReceiver<Effect>;
pub type EventSender = mpsc::Sender<ScannerEvent>;
pub type EventReceiver = mpsc::Receiver<ScannerEvent>;
pub type ScanSender = mpsc::Sender<ScanResult>;
pub type ScanReceiver = mpsc::Receiver<ScanResult>;

/// Create the effect channel (Dispatcher → Transport)
///
/// Unbounded: transmission must never block the dispatcher, whose loop also
/// services the inbound replies that release the in-flight gate.
pub fn create_effect_channel() -> (EffectSender, EffectReceiver) {
    mpsc::unbounded_channel()
}

/// Create the bounded event channel (Transport → Dispatcher)
pub fn create_event_channel(config: &ChannelConfig) -> (EventSender, EventReceiver) {
    mpsc::channel(config.event_buffer_size)
}

/// Create the bounded scan channel (Dispatcher → Application)
pub fn create_scan_channel(config: &ChannelConfig) -> (ScanSender, ScanReceiver) {
    mpsc::channel(config.scan_buffer_size)
}
