//! Unitech ScanService Command Vocabulary
//!
//! Action names and payload builders for Unitech's ScanService broadcast
//! API. Unlike DataWedge, the service never acknowledges a command, so
//! everything here is fire-and-forget: transmission alone completes the
//! call and the dispatcher's gate releases immediately.
//!
//! Decoded scans arrive under [`SCAN_DATA_ACTION`] with the data in the
//! `"text"` extra, or under [`DECODE_DATA_ACTION`] with the data in the
//! `"barcode_string"` extra; a platform binding listens for both.

use scanbridge_core::{Command, Payload};

// ----------------------------------------------------------------------------
// Broadcast Actions
// ----------------------------------------------------------------------------

/// Start the scan service
pub const ACTION_START: &str = "unitech.scanservice.start";
/// Initialize the scan service
pub const ACTION_INIT: &str = "unitech.scanservice.init";
/// Close the scan service
pub const ACTION_CLOSE: &str = "unitech.scanservice.close";
/// Toggle scan-to-keyboard output
pub const ACTION_SCAN2KEY_SETTING: &str = "unitech.scanservice.scan2key_setting";
/// Software scan key press/release
pub const ACTION_SOFTWARE_SCANKEY: &str = "unitech.scanservice.software_scankey";

/// Scan broadcast carrying decoded data in the `"text"` extra
pub const SCAN_DATA_ACTION: &str = "unitech.scanservice.data";
/// Alternate scan broadcast carrying data in the `"barcode_string"` extra
pub const DECODE_DATA_ACTION: &str = "android.intent.ACTION_DECODE_DATA";

/// Data extra under [`SCAN_DATA_ACTION`]
pub const SCAN_DATA_EXTRA: &str = "text";
/// Data extra under [`DECODE_DATA_ACTION`]
pub const DECODE_DATA_EXTRA: &str = "barcode_string";

// ----------------------------------------------------------------------------
// Commands
// ----------------------------------------------------------------------------

/// Route decoded data to keyboard emulation (or away from it)
pub fn scan_to_key(enabled: bool) -> Command {
    Command::fire_and_forget(
        ACTION_SCAN2KEY_SETTING,
        Payload::new().with("scan2key", enabled),
    )
}

/// Initialize the service
pub fn service_init(enabled: bool) -> Command {
    Command::fire_and_forget(ACTION_INIT, Payload::new().with("enabled", enabled))
}

/// Start the service
///
/// The service reads a `"close"` flag on its start action; a quirk of the
/// vendor API, preserved as-is.
pub fn service_start(close: bool) -> Command {
    Command::fire_and_forget(ACTION_START, Payload::new().with("close", close))
}

/// Shut the service down
pub fn service_close() -> Command {
    Command::fire_and_forget(ACTION_CLOSE, Payload::new().with("close", true))
}

/// Press or release the software scan key
pub fn software_scan_key(pressed: bool) -> Command {
    Command::fire_and_forget(
        ACTION_SOFTWARE_SCANKEY,
        Payload::new().with("scan", pressed),
    )
}

// ----------------------------------------------------------------------------
// Sequences
// ----------------------------------------------------------------------------

/// The startup sequence: keyboard output off, then init, then start
pub fn setup() -> Vec<Command> {
    vec![scan_to_key(false), service_init(true), service_start(true)]
}

/// The teardown sequence
pub fn shutdown() -> Vec<Command> {
    vec![service_close()]
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use scanbridge_core::Value;

    #[test]
    fn every_command_is_one_way() {
        for command in setup().into_iter().chain(shutdown()) {
            assert!(!command.expects_reply());
            assert!(command.correlation().is_none());
        }
        assert!(!software_scan_key(true).expects_reply());
    }

    #[test]
    fn setup_sequence_order_and_flags() {
        let sequence = setup();
        assert_eq!(sequence.len(), 3);

        assert_eq!(sequence[0].action(), ACTION_SCAN2KEY_SETTING);
        assert_eq!(sequence[0].payload().get("scan2key"), Some(&Value::Bool(false)));

        assert_eq!(sequence[1].action(), ACTION_INIT);
        assert_eq!(sequence[1].payload().get("enabled"), Some(&Value::Bool(true)));

        assert_eq!(sequence[2].action(), ACTION_START);
        assert_eq!(sequence[2].payload().get("close"), Some(&Value::Bool(true)));
    }

    #[test]
    fn scan_key_press_and_release() {
        let press = software_scan_key(true);
        assert_eq!(press.action(), ACTION_SOFTWARE_SCANKEY);
        assert_eq!(press.payload().get("scan"), Some(&Value::Bool(true)));

        let release = software_scan_key(false);
        assert_eq!(release.payload().get("scan"), Some(&Value::Bool(false)));
    }

    #[test]
    fn shutdown_closes_the_service() {
        let sequence = shutdown();
        assert_eq!(sequence.len(), 1);
        assert_eq!(sequence[0].action(), ACTION_CLOSE);
        assert_eq!(sequence[0].payload().get("close"), Some(&Value::Bool(true)));
    }
}
