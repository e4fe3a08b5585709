//! Zebra DataWedge Command Vocabulary
//!
//! Action names, extra keys and payload builders for driving the DataWedge
//! scanner service over its broadcast API. This crate produces and inspects
//! [`scanbridge_core`] commands only — the Android binding that turns a
//! command into an actual broadcast intent lives outside this workspace.
//!
//! Binding responsibilities, for reference: every command here is broadcast
//! under [`COMMAND_ACTION`] with one extra per payload entry; commands that
//! expect a reply additionally get `SEND_RESULT = "true"` and their
//! correlation id under [`EXTRA_COMMAND_IDENTIFIER`]. Replies arrive under
//! [`RESULT_ACTION`], echoing the operation in [`EXTRA_COMMAND`], the id in
//! [`EXTRA_COMMAND_IDENTIFIER`] and the status in [`EXTRA_RESULT`].

pub mod profile;
pub mod symbology;

pub use profile::{profile_chain, update_chain, ProfileSpec};
pub use symbology::Symbology;

use scanbridge_core::{Command, Payload, ReplyVocabulary};

// ----------------------------------------------------------------------------
// Broadcast Actions and Extra Keys
// ----------------------------------------------------------------------------

/// Intent action every command is broadcast under
pub const COMMAND_ACTION: &str = "com.symbol.datawedge.api.ACTION";
/// Intent action command results arrive under
pub const RESULT_ACTION: &str = "com.symbol.datawedge.api.RESULT_ACTION";
/// Intent action asynchronous service notifications arrive under
pub const NOTIFICATION_ACTION: &str = "com.symbol.datawedge.api.NOTIFICATION_ACTION";

/// Operation: query the list of configured profiles
pub const ACTION_GET_PROFILES: &str = "com.symbol.datawedge.api.GET_PROFILES_LIST";
/// Operation: create a named profile
pub const ACTION_CREATE_PROFILE: &str = "com.symbol.datawedge.api.CREATE_PROFILE";
/// Operation: update a profile's plugin configuration
pub const ACTION_SET_CONFIG: &str = "com.symbol.datawedge.api.SET_CONFIG";
/// Operation: software scan trigger
pub const ACTION_SOFT_SCAN_TRIGGER: &str = "com.symbol.datawedge.api.SOFT_SCAN_TRIGGER";

/// Reply extra holding the profile names; its presence marks the
/// profile-list reply, which echoes no correlation id
pub const EXTRA_PROFILE_NAMES: &str = "com.symbol.datawedge.api.RESULT_GET_PROFILES_LIST";
/// Reply extra echoing the executed operation
pub const EXTRA_COMMAND: &str = "COMMAND";
/// Extra carrying the correlation id in both directions
pub const EXTRA_COMMAND_IDENTIFIER: &str = "COMMAND_IDENTIFIER";
/// Reply extra carrying the status literal
pub const EXTRA_RESULT: &str = "RESULT";
/// Outbound extra requesting an acknowledgement
pub const EXTRA_SEND_RESULT: &str = "SEND_RESULT";

/// Status literal marking a successful acknowledgement
pub const RESULT_SUCCESS: &str = "SUCCESS";

/// Scan-broadcast extra holding the decoded data string
pub const SCAN_DATA_EXTRA: &str = "com.symbol.datawedge.data_string";

// ----------------------------------------------------------------------------
// Routing Vocabulary
// ----------------------------------------------------------------------------

/// The acknowledgement set and success marker DataWedge replies use
pub fn vocabulary() -> ReplyVocabulary {
    ReplyVocabulary::new(
        vec![
            ACTION_CREATE_PROFILE.to_string(),
            ACTION_SET_CONFIG.to_string(),
            ACTION_SOFT_SCAN_TRIGGER.to_string(),
        ],
        RESULT_SUCCESS,
    )
}

// ----------------------------------------------------------------------------
// Simple Commands
// ----------------------------------------------------------------------------

/// The profile-list query; submit via `SessionHandle::submit_query`, since
/// its reply is matched by marker rather than by echoed id
pub fn profile_list_query() -> Command {
    Command::expecting_reply(
        ACTION_GET_PROFILES,
        Payload::new().with(ACTION_GET_PROFILES, ""),
    )
}

/// Software scan trigger: start or stop the scanner beam
pub fn soft_scan_trigger(start: bool) -> Command {
    let parameter = if start { "START_SCANNING" } else { "STOP_SCANNING" };
    Command::expecting_reply(
        ACTION_SOFT_SCAN_TRIGGER,
        Payload::new().with(ACTION_SOFT_SCAN_TRIGGER, parameter),
    )
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
