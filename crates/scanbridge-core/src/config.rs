//! Session configuration

use crate::reply::ReplyVocabulary;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ----------------------------------------------------------------------------
// Channel Configuration
// ----------------------------------------------------------------------------

/// Buffer sizes for the session's bounded channels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Buffer size for the op channel (Application → Dispatcher)
    pub op_buffer_size: usize,
    /// Buffer size for the event channel (Transport → Dispatcher)
    pub event_buffer_size: usize,
    /// Buffer size for the scan channel (Dispatcher → Application)
    pub scan_buffer_size: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            op_buffer_size: 32,     // API calls are infrequent
            event_buffer_size: 128, // scan bursts can be rapid
            scan_buffer_size: 64,
        }
    }
}

// ----------------------------------------------------------------------------
// Session Configuration
// ----------------------------------------------------------------------------

/// Configuration for one scanner session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub channels: ChannelConfig,
    /// How long to wait for a reply before failing the pending call and
    /// releasing the in-flight gate. `None` waits forever, which reproduces
    /// the behavior of vendor services that always answer — and stalls the
    /// queue when one does not.
    pub reply_timeout: Option<Duration>,
    /// Which echoed actions acknowledge commands, and the success literal
    pub vocabulary: ReplyVocabulary,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            channels: ChannelConfig::default(),
            reply_timeout: Some(Duration::from_secs(10)),
            vocabulary: ReplyVocabulary::default(),
        }
    }
}

impl SessionConfig {
    /// Configuration for deterministic tests: small buffers, no timeout
    pub fn testing() -> Self {
        Self {
            channels: ChannelConfig {
                op_buffer_size: 8,
                event_buffer_size: 8,
                scan_buffer_size: 8,
            },
            reply_timeout: None,
            vocabulary: ReplyVocabulary::default(),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.channels.op_buffer_size == 0 {
            return Err("op_buffer_size must be greater than zero".to_string());
        }
        if self.channels.event_buffer_size == 0 {
            return Err("event_buffer_size must be greater than zero".to_string());
        }
        if self.channels.scan_buffer_size == 0 {
            return Err("scan_buffer_size must be greater than zero".to_string());
        }
        if let Some(timeout) = self.reply_timeout {
            if timeout.is_zero() {
                return Err("reply_timeout must be greater than zero".to_string());
            }
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
