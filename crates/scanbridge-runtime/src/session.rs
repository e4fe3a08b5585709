//! Scanner Session
//!
//! Owns the session lifecycle: wires the channels, spawns the dispatcher and
//! the registered transport, and tears both down on stop. One session drives
//! one scanner device — the queue, gate and registry live for exactly as long
//! as the session runs.
//!
//! ```rust,no_run
//! use scanbridge_core::SessionConfig;
//! use scanbridge_runtime::{testing::StubTransport, ScannerSession};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (transport, _harness) = StubTransport::new();
//!
//! let mut session = ScannerSession::new(SessionConfig::default());
//! session.set_transport(transport)?;
//! session.start().await?;
//!
//! let handle = session.handle().expect("session is running");
//! let mut scans = session.take_scan_receiver().expect("scan receiver");
//! # let _ = (handle, scans.recv().await);
//! session.stop().await?;
//! # Ok(())
//! # }
//! ```

use crate::dispatch::DispatchTask;
use crate::handle::SessionHandle;
use scanbridge_core::{
    channel::{create_effect_channel, create_event_channel, create_scan_channel, ScanReceiver},
    IntentTransport, ScanBridgeError, ScanBridgeResult, SessionConfig,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

// ----------------------------------------------------------------------------
// Scanner Session
// ----------------------------------------------------------------------------

/// Runtime owner coordinating the dispatcher and the transport
pub struct ScannerSession {
    config: SessionConfig,
    /// Registered transport (before start)
    transport: Option<Box<dyn IntentTransport>>,
    /// Running dispatcher task handle (after start)
    dispatch_handle: Option<JoinHandle<ScanBridgeResult<()>>>,
    /// Running transport task handle (after start)
    transport_handle: Option<JoinHandle<ScanBridgeResult<()>>>,
    /// Command submission handle for external use
    handle: Option<SessionHandle>,
    /// Decoded-scan receiver for external use
    scan_receiver: Option<ScanReceiver>,
    running: bool,
}

impl ScannerSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            transport: None,
            dispatch_handle: None,
            transport_handle: None,
            handle: None,
            scan_receiver: None,
            running: false,
        }
    }

    /// Register the transport; exactly one must be set before `start()`
    pub fn set_transport<T: IntentTransport + 'static>(
        &mut self,
        transport: T,
    ) -> ScanBridgeResult<()> {
        if self.running {
            return Err(ScanBridgeError::Configuration {
                reason: "cannot set a transport on a running session".to_string(),
            });
        }
        if self.transport.is_some() {
            return Err(ScanBridgeError::Configuration {
                reason: "a transport is already registered".to_string(),
            });
        }
        self.transport = Some(Box::new(transport));
        Ok(())
    }

    /// Start the session: wire channels, spawn dispatcher and transport
    pub async fn start(&mut self) -> ScanBridgeResult<()> {
        if self.running {
            return Err(ScanBridgeError::Configuration {
                reason: "session already running".to_string(),
            });
        }

        let mut transport = self
            .transport
            .take()
            .ok_or_else(|| ScanBridgeError::Configuration {
                reason: "no transport registered; use set_transport() first".to_string(),
            })?;

        self.config
            .validate()
            .map_err(|reason| ScanBridgeError::Configuration { reason })?;

        let (op_sender, op_receiver) = mpsc::channel(self.config.channels.op_buffer_size);
        let (event_sender, event_receiver) = create_event_channel(&self.config.channels);
        let (effect_sender, effect_receiver) = create_effect_channel();
        let (scan_sender, scan_receiver) = create_scan_channel(&self.config.channels);

        let mut dispatch = DispatchTask::new(
            self.config.clone(),
            op_receiver,
            op_sender.clone(),
            event_receiver,
            effect_sender,
            scan_sender,
        );
        self.dispatch_handle = Some(tokio::spawn(async move { dispatch.run().await }));

        debug!(transport = transport.name(), "starting transport task");
        transport.attach_channels(event_sender, effect_receiver)?;
        self.transport_handle = Some(tokio::spawn(async move { transport.run().await }));

        self.handle = Some(SessionHandle::new(op_sender));
        self.scan_receiver = Some(scan_receiver);
        self.running = true;

        info!("scanner session started");
        Ok(())
    }

    /// Stop the session, aborting both tasks and dropping all channels
    pub async fn stop(&mut self) -> ScanBridgeResult<()> {
        if !self.running {
            return Ok(());
        }
        self.running = false;

        if let Some(handle) = self.transport_handle.take() {
            handle.abort();
        }
        if let Some(handle) = self.dispatch_handle.take() {
            handle.abort();
        }
        self.handle = None;
        self.scan_receiver = None;

        info!("scanner session stopped");
        Ok(())
    }

    /// Command submission handle, while running
    pub fn handle(&self) -> Option<SessionHandle> {
        self.handle.clone()
    }

    /// Take the decoded-scan receiver for the application to consume
    pub fn take_scan_receiver(&mut self) -> Option<ScanReceiver> {
        self.scan_receiver.take()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

impl Drop for ScannerSession {
    fn drop(&mut self) {
        if self.running {
            if let Some(handle) = &self.transport_handle {
                handle.abort();
            }
            if let Some(handle) = &self.dispatch_handle {
                handle.abort();
            }
        }
    }
}
