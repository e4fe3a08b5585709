//! Stub transport for deterministic tests
//!
//! Exposes the wire to the test: every transmitted command pops out of the
//! harness, and the test injects replies and scans as it sees fit. No timing,
//! no hardware.

use async_trait::async_trait;
use scanbridge_core::{
    channel::{EffectReceiver, EventSender},
    Command, Effect, IntentTransport, ScanBridgeError, ScanBridgeResult, ScannerEvent,
};
use tokio::sync::mpsc;

// ----------------------------------------------------------------------------
// Stub Transport
// ----------------------------------------------------------------------------

/// Test-side view of the stub transport's wire
pub struct StubTransportHarness {
    /// Commands the dispatcher transmitted, in order
    pub transmitted: mpsc::UnboundedReceiver<Command>,
    /// Injects replies and scans as if the vendor service sent them
    pub events: mpsc::UnboundedSender<ScannerEvent>,
}

/// Transport that forwards both directions to a [`StubTransportHarness`]
pub struct StubTransport {
    outbox: mpsc::UnboundedSender<Command>,
    inject: Option<mpsc::UnboundedReceiver<ScannerEvent>>,
    channels: Option<(EventSender, EffectReceiver)>,
}

impl StubTransport {
    pub fn new() -> (Self, StubTransportHarness) {
        let (outbox, transmitted) = mpsc::unbounded_channel();
        let (events, inject) = mpsc::unbounded_channel();
        (
            Self {
                outbox,
                inject: Some(inject),
                channels: None,
            },
            StubTransportHarness {
                transmitted,
                events,
            },
        )
    }
}

#[async_trait]
impl IntentTransport for StubTransport {
    fn attach_channels(
        &mut self,
        event_sender: EventSender,
        effect_receiver: EffectReceiver,
    ) -> ScanBridgeResult<()> {
        self.channels = Some((event_sender, effect_receiver));
        Ok(())
    }

    async fn run(&mut self) -> ScanBridgeResult<()> {
        let (event_sender, mut effect_receiver) =
            self.channels
                .take()
                .ok_or_else(|| ScanBridgeError::Configuration {
                    reason: "channels not attached".to_string(),
                })?;
        let mut inject = self
            .inject
            .take()
            .ok_or_else(|| ScanBridgeError::Configuration {
                reason: "stub transport already ran".to_string(),
            })?;

        loop {
            tokio::select! {
                effect = effect_receiver.recv() => {
                    match effect {
                        Some(Effect::Transmit(command)) => {
                            if self.outbox.send(command).is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                event = inject.recv() => {
                    match event {
                        Some(event) => {
                            if event_sender.send(event).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

// ----------------------------------------------------------------------------
// Test Helpers
// ----------------------------------------------------------------------------

/// Acknowledgement event for a transmitted command, echoing its action and
/// correlation id the way vendor services do
pub fn ack_for(command: &Command, status: impl Into<String>) -> ScannerEvent {
    ScannerEvent::CommandResult(scanbridge_core::ReplyMessage {
        command: Some(command.action().to_string()),
        correlation: command.correlation().cloned(),
        status: Some(status.into()),
        profile_names: None,
    })
}
