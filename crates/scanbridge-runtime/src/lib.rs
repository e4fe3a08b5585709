//! ScanBridge Runtime Engine
//!
//! This crate contains the session runtime for the scanner bridge:
//! - `ScannerSession`: the owner that wires channels and manages task lifecycles
//! - `DispatchTask`: the single-consumer actor holding the command queue,
//!   in-flight gate, pending-call registry and reply router
//! - `SessionHandle`: the caller-facing API, including the sequential
//!   configuration-chain runner
//!
//! `scanbridge-core` provides the stable type definitions; this is the engine
//! that enforces the protocol invariants: FIFO transmission, one command in
//! flight at a time, and exactly-once completion of each pending call.

pub mod dispatch;
pub mod handle;
pub mod queue;
pub mod router;
pub mod session;
pub mod testing;

pub use dispatch::DispatchTask;
pub use handle::SessionHandle;
pub use session::ScannerSession;

// Re-export core types for convenience
pub use scanbridge_core::{
    channel::{
        create_effect_channel, create_event_channel, create_scan_channel, EffectReceiver,
        EffectSender, EventReceiver, EventSender, ScanReceiver, ScanSender,
    },
    ChannelConfig, Command, CorrelationId, Effect, IntentTransport, Payload, PendingReply,
    ReplyMessage, ReplyValue, ReplyVocabulary, ScanBridgeError, ScanBridgeResult, ScanResult,
    ScannerEvent, SessionConfig, Value,
};
