//! FIFO command queue with a single-in-flight gate
//!
//! Commands transmit in strict submission order, one at a time. The gate is
//! marked busy when a command is handed out for transmission and is released
//! only when that command's reply has been routed (or its timeout fired) —
//! never by transmission itself. This enforces backpressure over a one-way,
//! non-blocking transport.

use scanbridge_core::Command;
use std::collections::VecDeque;

// ----------------------------------------------------------------------------
// Command Queue
// ----------------------------------------------------------------------------

/// Ordered queue of not-yet-sent commands plus the in-flight gate
#[derive(Debug, Default)]
pub struct CommandQueue {
    waiting: VecDeque<Command>,
    busy: bool,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command at the tail
    pub fn push(&mut self, command: Command) {
        self.waiting.push_back(command);
    }

    /// Pop the head for transmission, marking the gate busy
    ///
    /// Returns `None` while a command is already in flight or nothing is
    /// queued.
    pub fn advance(&mut self) -> Option<Command> {
        if self.busy || self.waiting.is_empty() {
            return None;
        }
        self.busy = true;
        self.waiting.pop_front()
    }

    /// Release the gate once the in-flight command's reply has been routed
    pub fn release(&mut self) {
        self.busy = false;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }

    /// Discard everything queued and idle the gate
    pub fn clear(&mut self) {
        self.waiting.clear();
        self.busy = false;
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use scanbridge_core::Payload;

    fn command(action: &str) -> Command {
        Command::expecting_reply(action, Payload::new())
    }

    #[test]
    fn advances_in_submission_order() {
        let mut queue = CommandQueue::new();
        queue.push(command("a"));
        queue.push(command("b"));

        let first = queue.advance().unwrap();
        assert_eq!(first.action(), "a");

        // Gate is busy: nothing more comes out until release.
        assert!(queue.advance().is_none());
        assert!(queue.is_busy());

        queue.release();
        let second = queue.advance().unwrap();
        assert_eq!(second.action(), "b");
    }

    #[test]
    fn advance_on_empty_queue_is_a_noop() {
        let mut queue = CommandQueue::new();
        assert!(queue.advance().is_none());
        assert!(!queue.is_busy());
    }

    #[test]
    fn clear_discards_and_idles() {
        let mut queue = CommandQueue::new();
        queue.push(command("a"));
        queue.push(command("b"));
        let _ = queue.advance();

        queue.clear();
        assert!(queue.is_empty());
        assert!(!queue.is_busy());
        assert!(queue.advance().is_none());
    }
}
