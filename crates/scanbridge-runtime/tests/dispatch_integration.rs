//! Integration tests for the dispatcher's correlation and queueing protocol
//!
//! Every test drives a full session (dispatcher + stub transport) through the
//! public handle and observes the wire through the stub harness. The stub
//! never replies on its own, so each test controls exactly when the in-flight
//! gate releases.

use scanbridge_core::{
    Command, CorrelationId, Payload, ReplyMessage, ReplyVocabulary, ScanBridgeError, ScanResult,
    ScannerEvent, SessionConfig,
};
use scanbridge_runtime::testing::{ack_for, StubTransport, StubTransportHarness};
use scanbridge_runtime::{ScannerSession, SessionHandle};
use std::time::Duration;
use tokio::time::timeout;

// ----------------------------------------------------------------------------
// Test Utilities
// ----------------------------------------------------------------------------

const ACK_ACTION: &str = "vendor.api.SET_CONFIG";
const SUCCESS: &str = "SUCCESS";

fn test_config() -> SessionConfig {
    let mut config = SessionConfig::testing();
    config.vocabulary = ReplyVocabulary::new(vec![ACK_ACTION.to_string()], SUCCESS);
    config
}

async fn start_session(config: SessionConfig) -> (ScannerSession, SessionHandle, StubTransportHarness) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let (transport, harness) = StubTransport::new();
    let mut session = ScannerSession::new(config);
    session.set_transport(transport).unwrap();
    session.start().await.unwrap();
    let handle = session.handle().expect("running session has a handle");
    (session, handle, harness)
}

fn ack_command(tag: &str) -> Command {
    Command::expecting_reply(ACK_ACTION, Payload::new().with("tag", tag))
}

async fn next_transmission(harness: &mut StubTransportHarness) -> Command {
    timeout(Duration::from_millis(500), harness.transmitted.recv())
        .await
        .expect("a command should be transmitted within the timeout")
        .expect("stub transport is still running")
}

async fn assert_no_transmission(harness: &mut StubTransportHarness) {
    let outcome = timeout(Duration::from_millis(100), harness.transmitted.recv()).await;
    assert!(outcome.is_err(), "no command should have been transmitted");
}

// ----------------------------------------------------------------------------
// FIFO and In-Flight Gate
// ----------------------------------------------------------------------------

#[tokio::test]
async fn commands_transmit_fifo_one_at_a_time() {
    let (_session, handle, mut harness) = start_session(test_config()).await;

    let reply_a = handle.submit(ack_command("a")).await.unwrap();
    let reply_b = handle.submit(ack_command("b")).await.unwrap();
    let reply_c = handle.submit(ack_command("c")).await.unwrap();

    // Only the head of the queue goes out.
    let sent_a = next_transmission(&mut harness).await;
    assert_eq!(sent_a.payload().get_str("tag"), Some("a"));
    assert_no_transmission(&mut harness).await;

    // Routing A's reply releases the gate; B goes out.
    harness.events.send(ack_for(&sent_a, SUCCESS)).unwrap();
    assert!(reply_a.await.unwrap());

    let sent_b = next_transmission(&mut harness).await;
    assert_eq!(sent_b.payload().get_str("tag"), Some("b"));
    assert_no_transmission(&mut harness).await;

    harness.events.send(ack_for(&sent_b, SUCCESS)).unwrap();
    assert!(reply_b.await.unwrap());

    let sent_c = next_transmission(&mut harness).await;
    assert_eq!(sent_c.payload().get_str("tag"), Some("c"));

    harness.events.send(ack_for(&sent_c, "FAILURE")).unwrap();
    // A semantically failed reply still resolves the handle (with false).
    assert!(!reply_c.await.unwrap());
}

#[tokio::test]
async fn gate_releases_on_identity_not_success() {
    let (_session, handle, mut harness) = start_session(test_config()).await;

    let reply_a = handle.submit(ack_command("a")).await.unwrap();
    let _reply_b = handle.submit(ack_command("b")).await.unwrap();

    let sent_a = next_transmission(&mut harness).await;
    harness.events.send(ack_for(&sent_a, "FAILURE")).unwrap();
    assert!(!reply_a.await.unwrap());

    // The failed reply still released the gate: B transmits.
    let sent_b = next_transmission(&mut harness).await;
    assert_eq!(sent_b.payload().get_str("tag"), Some("b"));
}

#[tokio::test]
async fn unmatched_reply_neither_resolves_nor_releases() {
    let (_session, handle, mut harness) = start_session(test_config()).await;

    let reply_a = handle.submit(ack_command("a")).await.unwrap();
    let _reply_b = handle.submit(ack_command("b")).await.unwrap();

    let sent_a = next_transmission(&mut harness).await;

    // A reply for an id nobody registered is dropped silently and the gate
    // stays held by A.
    let unrelated = ReplyMessage::ack(ACK_ACTION, CorrelationId::fresh(), SUCCESS);
    harness
        .events
        .send(ScannerEvent::CommandResult(unrelated))
        .unwrap();
    assert_no_transmission(&mut harness).await;

    // Only A's own reply releases the gate.
    harness.events.send(ack_for(&sent_a, SUCCESS)).unwrap();
    assert!(reply_a.await.unwrap());
    let sent_b = next_transmission(&mut harness).await;
    assert_eq!(sent_b.payload().get_str("tag"), Some("b"));
}

#[tokio::test]
async fn premature_reply_completes_call_but_holds_gate() {
    let (_session, handle, mut harness) = start_session(test_config()).await;

    // A holds the gate; the profile-list query sits behind it in the queue
    // with its pending call already registered under the well-known id.
    let reply_a = handle.submit(ack_command("a")).await.unwrap();
    let query = handle
        .submit_query(Command::expecting_reply(
            "vendor.api.GET_PROFILES",
            Payload::new(),
        ))
        .await
        .unwrap();

    let sent_a = next_transmission(&mut harness).await;

    // A premature profile-list reply arrives before the query transmits.
    // It completes the registered pending call ...
    harness
        .events
        .send(ScannerEvent::CommandResult(ReplyMessage::profile_list(
            vec!["Default".to_string()],
        )))
        .unwrap();
    assert_eq!(query.await.unwrap(), vec!["Default".to_string()]);

    // ... but the gate stays held by A: nothing else transmits yet.
    assert_no_transmission(&mut harness).await;

    harness.events.send(ack_for(&sent_a, SUCCESS)).unwrap();
    assert!(reply_a.await.unwrap());

    // Now the queue advances and the query itself finally transmits; its
    // eventual real reply would be a registry miss.
    let sent_query = next_transmission(&mut harness).await;
    assert_eq!(sent_query.action(), "vendor.api.GET_PROFILES");
}

#[tokio::test]
async fn duplicate_reply_is_a_registry_miss() {
    let (_session, handle, mut harness) = start_session(test_config()).await;

    let reply_a = handle.submit(ack_command("a")).await.unwrap();
    let sent_a = next_transmission(&mut harness).await;

    harness.events.send(ack_for(&sent_a, SUCCESS)).unwrap();
    assert!(reply_a.await.unwrap());

    // The second reply finds no pending call and changes nothing.
    harness.events.send(ack_for(&sent_a, "FAILURE")).unwrap();
    assert_no_transmission(&mut harness).await;
}

// ----------------------------------------------------------------------------
// Fire-and-Forget Commands
// ----------------------------------------------------------------------------

#[tokio::test]
async fn one_way_commands_do_not_hold_the_gate() {
    let (_session, handle, mut harness) = start_session(test_config()).await;

    let first = handle
        .submit(Command::fire_and_forget(
            "vendor.api.SETUP",
            Payload::new().with("tag", "setup"),
        ))
        .await
        .unwrap();
    // Already resolved: nothing will ever answer.
    assert!(first.await.unwrap());

    let reply = handle.submit(ack_command("a")).await.unwrap();

    // Both transmit back to back; the one-way command released the gate at
    // transmission.
    let sent_setup = next_transmission(&mut harness).await;
    assert_eq!(sent_setup.payload().get_str("tag"), Some("setup"));
    assert!(sent_setup.correlation().is_none());

    let sent_a = next_transmission(&mut harness).await;
    harness.events.send(ack_for(&sent_a, SUCCESS)).unwrap();
    assert!(reply.await.unwrap());
}

// ----------------------------------------------------------------------------
// Well-Known Profile-List Routing
// ----------------------------------------------------------------------------

#[tokio::test]
async fn profile_list_routes_by_marker_alone() {
    let (_session, handle, mut harness) = start_session(test_config()).await;

    let query = Command::expecting_reply("vendor.api.GET_PROFILES", Payload::new());
    let reply = handle.submit_query(query).await.unwrap();

    let sent = next_transmission(&mut harness).await;
    // The well-known call attaches no id to the outbound command.
    assert!(sent.correlation().is_none());

    // The reply carries the marker payload plus an unrelated id field, which
    // must be ignored.
    let mut message = ReplyMessage::profile_list(vec!["Default".to_string(), "Kiosk".to_string()]);
    message.correlation = Some(CorrelationId::fresh());
    harness
        .events
        .send(ScannerEvent::CommandResult(message))
        .unwrap();

    assert_eq!(
        reply.await.unwrap(),
        vec!["Default".to_string(), "Kiosk".to_string()]
    );
}

#[tokio::test]
async fn duplicate_profile_list_call_displaces_the_first() {
    let (_session, handle, mut harness) = start_session(test_config()).await;

    let first = handle
        .submit_query(Command::expecting_reply("vendor.api.GET_PROFILES", Payload::new()))
        .await
        .unwrap();
    let second = handle
        .submit_query(Command::expecting_reply("vendor.api.GET_PROFILES", Payload::new()))
        .await
        .unwrap();

    // Documented limitation: the well-known id admits one outstanding call.
    assert!(matches!(first.await, Err(ScanBridgeError::SessionReset)));

    let _sent_first = next_transmission(&mut harness).await;
    harness
        .events
        .send(ScannerEvent::CommandResult(ReplyMessage::profile_list(
            vec!["Default".to_string()],
        )))
        .unwrap();
    assert_eq!(second.await.unwrap(), vec!["Default".to_string()]);
}

// ----------------------------------------------------------------------------
// Reset
// ----------------------------------------------------------------------------

#[tokio::test]
async fn reset_clears_queue_gate_and_registry() {
    let (_session, handle, mut harness) = start_session(test_config()).await;

    let reply_a = handle.submit(ack_command("a")).await.unwrap();
    let reply_b = handle.submit(ack_command("b")).await.unwrap();
    let sent_a = next_transmission(&mut harness).await;

    handle.reset().await.unwrap();

    // Outstanding callers resolve with the reset error instead of hanging.
    assert!(matches!(reply_a.await, Err(ScanBridgeError::SessionReset)));
    assert!(matches!(reply_b.await, Err(ScanBridgeError::SessionReset)));

    // A late reply for the old in-flight command routes as unmatched.
    harness.events.send(ack_for(&sent_a, SUCCESS)).unwrap();
    assert_no_transmission(&mut harness).await;

    // The gate is idle again: a new command transmits immediately.
    let reply_c = handle.submit(ack_command("c")).await.unwrap();
    let sent_c = next_transmission(&mut harness).await;
    assert_eq!(sent_c.payload().get_str("tag"), Some("c"));
    harness.events.send(ack_for(&sent_c, SUCCESS)).unwrap();
    assert!(reply_c.await.unwrap());
}

// ----------------------------------------------------------------------------
// Reply Timeout
// ----------------------------------------------------------------------------

#[tokio::test]
async fn lost_reply_times_out_and_releases_the_gate() {
    let mut config = test_config();
    config.reply_timeout = Some(Duration::from_millis(50));
    let (_session, handle, mut harness) = start_session(config).await;

    let reply_a = handle.submit(ack_command("a")).await.unwrap();
    let reply_b = handle.submit(ack_command("b")).await.unwrap();

    let _sent_a = next_transmission(&mut harness).await;
    // Never reply to A; its timer must fail the call and free the queue.
    assert!(matches!(
        reply_a.await,
        Err(ScanBridgeError::ReplyTimeout { .. })
    ));

    let sent_b = next_transmission(&mut harness).await;
    assert_eq!(sent_b.payload().get_str("tag"), Some("b"));
    harness.events.send(ack_for(&sent_b, SUCCESS)).unwrap();
    assert!(reply_b.await.unwrap());
}

#[tokio::test]
async fn reply_beats_timer_without_side_effects() {
    let mut config = test_config();
    config.reply_timeout = Some(Duration::from_millis(200));
    let (_session, handle, mut harness) = start_session(config).await;

    let reply_a = handle.submit(ack_command("a")).await.unwrap();
    let sent_a = next_transmission(&mut harness).await;
    harness.events.send(ack_for(&sent_a, SUCCESS)).unwrap();
    assert!(reply_a.await.unwrap());

    // Let the stale timer fire against a completed call; nothing happens.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_no_transmission(&mut harness).await;
}

// ----------------------------------------------------------------------------
// Chains
// ----------------------------------------------------------------------------

/// Reply to the next `count` transmissions with the given outcomes
async fn answer_steps(harness: &mut StubTransportHarness, outcomes: &[bool]) -> usize {
    let mut answered = 0;
    for accepted in outcomes {
        let sent = match timeout(Duration::from_millis(200), harness.transmitted.recv()).await {
            Ok(Some(command)) => command,
            _ => break,
        };
        let status = if *accepted { SUCCESS } else { "FAILURE" };
        harness.events.send(ack_for(&sent, status)).unwrap();
        answered += 1;
    }
    answered
}

#[tokio::test]
async fn chain_short_circuits_on_first_failure() {
    let (_session, handle, mut harness) = start_session(test_config()).await;

    let steps = vec![
        ack_command("1"),
        ack_command("2"),
        ack_command("3"),
        ack_command("4"),
    ];
    let chain = tokio::spawn({
        let handle = handle.clone();
        async move { handle.run_chain(steps).await }
    });

    // Steps answer [true, true, false]; the fourth must never transmit.
    let answered = answer_steps(&mut harness, &[true, true, false]).await;
    assert_eq!(answered, 3);

    assert!(!chain.await.unwrap().unwrap());
    assert_no_transmission(&mut harness).await;
}

#[tokio::test]
async fn chain_of_successes_dispatches_every_step_in_order() {
    let (_session, handle, mut harness) = start_session(test_config()).await;

    let steps = vec![
        ack_command("1"),
        ack_command("2"),
        ack_command("3"),
        ack_command("4"),
    ];
    let chain = tokio::spawn({
        let handle = handle.clone();
        async move { handle.run_chain(steps).await }
    });

    let mut seen = Vec::new();
    for _ in 0..4 {
        let sent = next_transmission(&mut harness).await;
        seen.push(sent.payload().get_str("tag").unwrap().to_string());
        harness.events.send(ack_for(&sent, SUCCESS)).unwrap();
    }
    assert_eq!(seen, vec!["1", "2", "3", "4"]);

    assert!(chain.await.unwrap().unwrap());
    assert_no_transmission(&mut harness).await;
}

// ----------------------------------------------------------------------------
// Scan Forwarding and Session Lifecycle
// ----------------------------------------------------------------------------

#[tokio::test]
async fn scans_are_forwarded_to_the_application() {
    let (mut session, _handle, harness) = start_session(test_config()).await;
    let mut scans = session.take_scan_receiver().expect("scan receiver");

    harness
        .events
        .send(ScannerEvent::Scan(ScanResult::new("0123456789012")))
        .unwrap();

    let scan = timeout(Duration::from_millis(500), scans.recv())
        .await
        .expect("scan should be forwarded")
        .expect("scan channel open");
    assert_eq!(scan.data, "0123456789012");
}

#[tokio::test]
async fn session_lifecycle() {
    let (transport, _harness) = StubTransport::new();
    let mut session = ScannerSession::new(test_config());

    assert!(!session.is_running());
    assert!(session.handle().is_none());

    // Starting without a transport is a configuration error.
    assert!(matches!(
        session.start().await,
        Err(ScanBridgeError::Configuration { .. })
    ));

    session.set_transport(transport).unwrap();
    session.start().await.unwrap();
    assert!(session.is_running());
    assert!(session.handle().is_some());

    // A second transport cannot be registered while running.
    let (another, _h) = StubTransport::new();
    assert!(session.set_transport(another).is_err());

    session.stop().await.unwrap();
    assert!(!session.is_running());
    assert!(session.handle().is_none());
}
