//! Caller-facing session handle
//!
//! Cheap to clone; every method forwards to the dispatcher actor and returns
//! without waiting for the transport. The returned [`PendingReply`] resolves
//! when the correlated reply is routed (or the call times out or the session
//! resets).

use crate::dispatch::{OpSender, ReplyKind, SessionOp};
use scanbridge_core::{
    Command, PendingReply, ReplyValue, ScanBridgeError, ScanBridgeResult,
};

// ----------------------------------------------------------------------------
// Session Handle
// ----------------------------------------------------------------------------

/// Handle for submitting commands to a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    ops: OpSender,
}

impl SessionHandle {
    pub(crate) fn new(ops: OpSender) -> Self {
        Self { ops }
    }

    /// Queue a command and receive a handle for its acknowledgement
    ///
    /// Commands that expect a reply get a fresh correlation id and resolve
    /// when the matching acknowledgement is routed. Fire-and-forget commands
    /// are queued for in-order transmission and the returned handle is
    /// already resolved with `true`.
    pub async fn submit(&self, command: Command) -> ScanBridgeResult<PendingReply<bool>> {
        if !command.expects_reply() {
            self.send_op(SessionOp::Dispatch {
                command,
                reply: ReplyKind::None,
            })
            .await?;
            return Ok(PendingReply::resolved(ReplyValue::Outcome(true)));
        }

        let (slot, reply) = PendingReply::channel();
        self.send_op(SessionOp::Dispatch {
            command,
            reply: ReplyKind::Ack(slot),
        })
        .await?;
        Ok(reply)
    }

    /// Queue the profile-list query, which waits under the well-known id
    ///
    /// At most one such call may be outstanding at a time; submitting a
    /// second displaces the first (its handle resolves with a reset error).
    pub async fn submit_query(
        &self,
        command: Command,
    ) -> ScanBridgeResult<PendingReply<Vec<String>>> {
        let (slot, reply) = PendingReply::channel();
        self.send_op(SessionOp::Dispatch {
            command,
            reply: ReplyKind::ProfileList(slot),
        })
        .await?;
        Ok(reply)
    }

    /// Run a sequence of dependent acknowledged commands
    ///
    /// Each step must be acknowledged with success before the next is
    /// issued; the first `false` aborts the remainder and yields `false`.
    /// No partial-failure detail is preserved — a failed step and a step
    /// never attempted are indistinguishable downstream.
    pub async fn run_chain(&self, steps: Vec<Command>) -> ScanBridgeResult<bool> {
        for step in steps {
            let accepted = self.submit(step).await?.await?;
            if !accepted {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Clear the queue, gate and registry
    ///
    /// Anything still queued is discarded; outstanding callers resolve with
    /// [`ScanBridgeError::SessionReset`].
    pub async fn reset(&self) -> ScanBridgeResult<()> {
        self.send_op(SessionOp::Reset).await
    }

    async fn send_op(&self, op: SessionOp) -> ScanBridgeResult<()> {
        self.ops
            .send(op)
            .await
            .map_err(|_| ScanBridgeError::Channel {
                reason: "dispatch task stopped".to_string(),
            })
    }
}
