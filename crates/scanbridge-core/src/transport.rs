//! Transport Seam
//!
//! Defines the interface a platform binding implements to carry commands to
//! the vendor scanner subsystem and replies back. The original setting is
//! Android broadcast intents; nothing here depends on that. Concrete
//! implementations live outside this workspace (platform bindings) or in
//! `scanbridge-runtime::testing` for tests.

use crate::channel::{EffectReceiver, EventSender};
use crate::ScanBridgeResult;

// ----------------------------------------------------------------------------
// Intent Transport Trait
// ----------------------------------------------------------------------------

/// Common interface for broadcast-style transports
///
/// A transport:
/// - Receives [`crate::Effect::Transmit`] effects and fires each command as a
///   one-way message, without blocking or acknowledging
/// - Pushes any asynchronous response back as a [`crate::ScannerEvent`], with
///   no ordering or delivery guarantee beyond "if it arrives, it arrives once"
/// - Runs as an independent async task whose lifecycle `ScannerSession`
///   manages (spawning and aborting)
#[async_trait::async_trait]
pub trait IntentTransport: Send + Sync {
    /// Attach the channels created by the session
    ///
    /// Implementations must store these handles internally and use them for
    /// all communication with the dispatcher.
    fn attach_channels(
        &mut self,
        event_sender: EventSender,
        effect_receiver: EffectReceiver,
    ) -> ScanBridgeResult<()>;

    /// Run the transport's main event loop
    ///
    /// Should run until the session is shut down; the session spawns this as
    /// a task and aborts it on stop.
    async fn run(&mut self) -> ScanBridgeResult<()>;

    /// Short identifier used in logs
    fn name(&self) -> &'static str;
}
