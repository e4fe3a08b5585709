//! Dispatcher actor
//!
//! All queue, gate and registry mutation funnels through this single task's
//! `select!` loop, so the protocol invariants hold without locks: commands
//! transmit FIFO, at most one is in flight, and each pending call resolves
//! exactly once. Callers talk to the actor through [`crate::SessionHandle`];
//! the transport talks to it through the event channel.

use crate::queue::CommandQueue;
use crate::router::{route, RoutedReply};
use scanbridge_core::{
    channel::{EffectSender, EventReceiver, ScanSender},
    Command, CorrelationId, Effect, PendingCalls, ReplySlot, ReplyValue, ScanBridgeError,
    ScanBridgeResult, ScannerEvent, SessionConfig,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

// ----------------------------------------------------------------------------
// Session Operations
// ----------------------------------------------------------------------------

/// What kind of completion a dispatched command carries
#[derive(Debug)]
pub(crate) enum ReplyKind {
    /// Acknowledgement under a fresh correlation id
    Ack(ReplySlot),
    /// Profile list under the well-known id; the command itself carries none
    ProfileList(ReplySlot),
    /// Nothing will answer; transmission alone completes it
    None,
}

/// Operations accepted by the dispatcher
#[derive(Debug)]
pub(crate) enum SessionOp {
    /// Queue a command for transmission
    Dispatch {
        command: Command,
        reply: ReplyKind,
    },
    /// Clear queue, gate and registry
    Reset,
    /// Internal: a reply timer elapsed for generation `seq` of `id`
    ReplyExpired { id: CorrelationId, seq: u64 },
}

pub(crate) type OpSender = mpsc::Sender<SessionOp>;
pub(crate) type OpReceiver = mpsc::Receiver<SessionOp>;

// ----------------------------------------------------------------------------
// Dispatch Task
// ----------------------------------------------------------------------------

/// The actor owning all per-session protocol state
pub struct DispatchTask {
    config: SessionConfig,
    /// Operations from session handles
    op_receiver: OpReceiver,
    /// Clone handed to reply-timeout timers
    op_sender: OpSender,
    /// Replies and scans from the transport
    event_receiver: EventReceiver,
    /// Outbound commands to the transport
    effect_sender: EffectSender,
    /// Decoded scans forwarded to the application
    scan_sender: ScanSender,
    queue: CommandQueue,
    pending: PendingCalls,
    /// Correlation key of the command between transmission and reply
    in_flight: Option<CorrelationId>,
    running: bool,
}

impl DispatchTask {
    pub(crate) fn new(
        config: SessionConfig,
        op_receiver: OpReceiver,
        op_sender: OpSender,
        event_receiver: EventReceiver,
        effect_sender: EffectSender,
        scan_sender: ScanSender,
    ) -> Self {
        Self {
            config,
            op_receiver,
            op_sender,
            event_receiver,
            effect_sender,
            scan_sender,
            queue: CommandQueue::new(),
            pending: PendingCalls::new(),
            in_flight: None,
            running: true,
        }
    }

    /// Run the dispatcher loop until both inbound channels close
    pub async fn run(&mut self) -> ScanBridgeResult<()> {
        info!("dispatch task starting");

        while self.running {
            tokio::select! {
                op = self.op_receiver.recv() => {
                    match op {
                        Some(op) => self.process_op(op),
                        None => {
                            info!("op channel closed, shutting down");
                            break;
                        }
                    }
                }

                event = self.event_receiver.recv() => {
                    match event {
                        Some(event) => self.process_event(event).await,
                        None => {
                            info!("transport event channel closed, shutting down");
                            break;
                        }
                    }
                }
            }
        }

        // Outstanding callers resolve with a reset rather than hanging.
        self.pending.clear();
        info!("dispatch task stopped");
        Ok(())
    }

    fn process_op(&mut self, op: SessionOp) {
        match op {
            SessionOp::Dispatch { command, reply } => self.dispatch(command, reply),
            SessionOp::Reset => self.reset(),
            SessionOp::ReplyExpired { id, seq } => self.expire(id, seq),
        }
    }

    /// Register the completion handle (if any), queue the command and pump
    fn dispatch(&mut self, command: Command, reply: ReplyKind) {
        let command = match reply {
            ReplyKind::Ack(slot) => {
                let id = CorrelationId::fresh();
                self.pending.register(id.clone(), slot);
                debug!(%id, action = command.action(), "queued command awaiting acknowledgement");
                command.correlated(id)
            }
            ReplyKind::ProfileList(slot) => {
                self.pending.register(CorrelationId::profile_list(), slot);
                debug!(action = command.action(), "queued profile-list query");
                command
            }
            ReplyKind::None => {
                debug!(action = command.action(), "queued one-way command");
                command
            }
        };

        self.queue.push(command);
        self.pump();
    }

    /// Transmit queued commands until one that awaits a reply holds the gate
    fn pump(&mut self) {
        while self.in_flight.is_none() {
            let Some(command) = self.queue.advance() else {
                break;
            };

            // Acknowledged commands wait under their attached id; the
            // profile-list query waits under the well-known id.
            let correlation_key = if command.expects_reply() {
                Some(
                    command
                        .correlation()
                        .cloned()
                        .unwrap_or_else(CorrelationId::profile_list),
                )
            } else {
                None
            };

            debug!(action = command.action(), "transmitting command");
            if self.effect_sender.send(Effect::Transmit(command)).is_err() {
                error!("transport effect channel closed, dropping command");
                if let Some(key) = &correlation_key {
                    self.pending.complete(
                        key,
                        Err(ScanBridgeError::Transport {
                            reason: "transport effect channel closed".to_string(),
                        }),
                    );
                }
                self.queue.release();
                continue;
            }

            match correlation_key {
                // Hold the gate only while something can still release it.
                Some(key) if self.pending.is_registered(&key) => {
                    self.arm_reply_timeout(&key);
                    self.in_flight = Some(key);
                }
                Some(key) => {
                    // The call was completed (prematurely) or displaced
                    // before transmission; there is nothing left to wait for.
                    debug!(%key, "pending call already consumed, not holding the gate");
                    self.queue.release();
                }
                None => {
                    // Nothing will answer; transmission releases the gate.
                    self.queue.release();
                }
            }
        }
    }

    /// Spawn a timer that expires the pending call for `key`, if configured
    fn arm_reply_timeout(&self, key: &CorrelationId) {
        let Some(timeout) = self.config.reply_timeout else {
            return;
        };
        // The generation guards against a stale timer cancelling a newer
        // call registered under the same (well-known) id.
        let Some(seq) = self.pending.generation(key) else {
            return;
        };
        let ops = self.op_sender.clone();
        let id = key.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            let _ = ops.send(SessionOp::ReplyExpired { id, seq }).await;
        });
    }

    async fn process_event(&mut self, event: ScannerEvent) {
        match event {
            ScannerEvent::CommandResult(message) => {
                match route(&message, &self.config.vocabulary) {
                    RoutedReply::ProfileList(names) => {
                        self.complete(CorrelationId::profile_list(), ReplyValue::Profiles(names));
                    }
                    RoutedReply::Ack { id, accepted } => {
                        self.complete(id, ReplyValue::Outcome(accepted));
                    }
                    RoutedReply::Unmatched => {
                        debug!(?message, "unmatched reply dropped");
                    }
                }
            }
            ScannerEvent::Scan(result) => {
                debug!(data = %result.data, "scan received");
                if self.scan_sender.send(result).await.is_err() {
                    warn!("scan receiver dropped, discarding scan");
                }
            }
            ScannerEvent::Fault { reason } => {
                warn!(reason, "transport fault");
            }
        }
    }

    /// Resolve a routed reply and, when it answers the in-flight command,
    /// release the gate and advance the queue
    ///
    /// Gate release is keyed on identity alone — the payload's semantic
    /// success flag never matters here. A premature reply for a command
    /// still queued completes its pending call but leaves the gate held by
    /// the actual in-flight command.
    fn complete(&mut self, id: CorrelationId, value: ReplyValue) {
        if !self.pending.complete(&id, Ok(value)) {
            debug!(%id, "reply for unknown or already-completed call dropped");
            return;
        }
        if self.in_flight.as_ref() == Some(&id) {
            self.in_flight = None;
            self.queue.release();
            self.pump();
        }
    }

    /// A reply timer elapsed; fail the call if that generation still waits
    fn expire(&mut self, id: CorrelationId, seq: u64) {
        let waited_ms = self
            .config
            .reply_timeout
            .map(|timeout| timeout.as_millis() as u64)
            .unwrap_or_default();
        let expired = self.pending.complete_if_current(
            &id,
            seq,
            Err(ScanBridgeError::ReplyTimeout {
                id: id.clone(),
                waited_ms,
            }),
        );
        if !expired {
            return;
        }
        warn!(%id, waited_ms, "reply timed out");
        if self.in_flight.as_ref() == Some(&id) {
            self.in_flight = None;
            self.queue.release();
            self.pump();
        }
    }

    /// Teardown: discard the queue, idle the gate, cancel pending calls
    fn reset(&mut self) {
        info!(queued = self.queue.len(), "session reset");
        self.queue.clear();
        self.in_flight = None;
        self.pending.clear();
    }
}
