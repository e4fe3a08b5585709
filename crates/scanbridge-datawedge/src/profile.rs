//! Profile configuration payloads
//!
//! Building a usable DataWedge profile takes four acknowledged steps, each
//! gated on the previous one succeeding: create the profile, configure the
//! barcode plugin's decoders, silence the keystroke plugin, and route decoded
//! data out as broadcast intents. [`profile_chain`] yields those steps in
//! order for `SessionHandle::run_chain`; [`update_chain`] skips creation for
//! profiles that already exist.
//!
//! All values are the string literals the service parses ("true", "false",
//! "2"), not native types.

use crate::symbology::Symbology;
use crate::{ACTION_CREATE_PROFILE, ACTION_SET_CONFIG};
use scanbridge_core::{Command, Payload, Value};
use std::collections::BTreeSet;

/// Intent action scan broadcasts are delivered under when a profile names none
pub const DEFAULT_SCAN_ACTION: &str = "com.scanbridge.SCAN";

// ----------------------------------------------------------------------------
// Profile Specification
// ----------------------------------------------------------------------------

/// Everything needed to materialize a scanning profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSpec {
    /// Profile name; doubles as the CREATE_PROFILE argument
    pub name: String,
    /// Decoders to enable; every other decoder is explicitly disabled
    pub symbologies: BTreeSet<Symbology>,
    /// Application package the profile is associated with
    pub package: String,
    /// Intent action decoded scans are broadcast under
    pub scan_action: String,
}

impl ProfileSpec {
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbologies: BTreeSet::new(),
            package: package.into(),
            scan_action: DEFAULT_SCAN_ACTION.to_string(),
        }
    }

    /// Builder-style decoder enable
    pub fn with_symbology(mut self, symbology: Symbology) -> Self {
        self.symbologies.insert(symbology);
        self
    }

    pub fn with_scan_action(mut self, action: impl Into<String>) -> Self {
        self.scan_action = action.into();
        self
    }
}

// ----------------------------------------------------------------------------
// Configuration Steps
// ----------------------------------------------------------------------------

/// Step 1: create the named profile
pub fn create_profile_command(spec: &ProfileSpec) -> Command {
    Command::expecting_reply(
        ACTION_CREATE_PROFILE,
        Payload::new().with(ACTION_CREATE_PROFILE, spec.name.as_str()),
    )
}

/// Step 2: configure the barcode plugin's decoder set
///
/// `RESET_CONFIG` plus the full decoder table means the profile ends up with
/// exactly the requested symbologies regardless of its previous state.
pub fn barcode_config_command(spec: &ProfileSpec) -> Command {
    let mut params = Payload::new()
        .with("scanner_input_enabled", "true")
        .with("scanner_selection_by_identifier", "INTERNAL_IMAGER");
    for &symbology in Symbology::ALL {
        let enabled = spec.symbologies.contains(&symbology);
        params.insert(symbology.decoder_name(), if enabled { "true" } else { "false" });
    }

    let plugin = Payload::new()
        .with("PLUGIN_NAME", "BARCODE")
        .with("RESET_CONFIG", "true")
        .with("PARAM_LIST", params);

    let app = Payload::new()
        .with("PACKAGE_NAME", spec.package.as_str())
        .with("ACTIVITY_LIST", vec!["*".to_string()]);

    let config = profile_header(spec)
        .with("PLUGIN_CONFIG", plugin)
        .with("APP_LIST", vec![Value::Table(app)]);

    Command::expecting_reply(ACTION_SET_CONFIG, Payload::new().with(ACTION_SET_CONFIG, config))
}

/// Step 3: keep the keystroke plugin from typing scans into focused fields
pub fn keystroke_disable_command(spec: &ProfileSpec) -> Command {
    let plugin = Payload::new()
        .with("PLUGIN_NAME", "KEYSTROKE")
        .with("PARAM_LIST", Payload::new().with("keystroke_output_enabled", "false"));

    let config = profile_header(spec).with("PLUGIN_CONFIG", plugin);

    Command::expecting_reply(ACTION_SET_CONFIG, Payload::new().with(ACTION_SET_CONFIG, config))
}

/// Step 4: deliver decoded data as broadcast intents under the profile's action
///
/// `intent_delivery` of "2" selects broadcast delivery.
pub fn intent_output_command(spec: &ProfileSpec) -> Command {
    let params = Payload::new()
        .with("intent_output_enabled", "true")
        .with("intent_action", spec.scan_action.as_str())
        .with("intent_delivery", "2");

    let plugin = Payload::new()
        .with("PLUGIN_NAME", "INTENT")
        .with("RESET_CONFIG", "true")
        .with("PARAM_LIST", params);

    let config = profile_header(spec).with("PLUGIN_CONFIG", plugin);

    Command::expecting_reply(ACTION_SET_CONFIG, Payload::new().with(ACTION_SET_CONFIG, config))
}

fn profile_header(spec: &ProfileSpec) -> Payload {
    Payload::new()
        .with("PROFILE_NAME", spec.name.as_str())
        .with("PROFILE_ENABLED", "true")
        .with("CONFIG_MODE", "UPDATE")
}

// ----------------------------------------------------------------------------
// Chains
// ----------------------------------------------------------------------------

/// The full four-step sequence for a profile that does not exist yet
pub fn profile_chain(spec: &ProfileSpec) -> Vec<Command> {
    vec![
        create_profile_command(spec),
        barcode_config_command(spec),
        keystroke_disable_command(spec),
        intent_output_command(spec),
    ]
}

/// Reconfiguration of an existing profile; creation is skipped
pub fn update_chain(spec: &ProfileSpec) -> Vec<Command> {
    vec![
        barcode_config_command(spec),
        keystroke_disable_command(spec),
        intent_output_command(spec),
    ]
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary;

    fn spec() -> ProfileSpec {
        ProfileSpec::new("warehouse", "com.example.app")
            .with_symbology(Symbology::Code128)
            .with_symbology(Symbology::QrCode)
    }

    #[test]
    fn create_profile_carries_the_name() {
        let command = create_profile_command(&spec());
        assert!(command.expects_reply());
        assert_eq!(
            command.payload().get_str(ACTION_CREATE_PROFILE),
            Some("warehouse")
        );
    }

    #[test]
    fn barcode_config_flags_every_decoder() {
        let command = barcode_config_command(&spec());
        let config = command.payload().get_table(ACTION_SET_CONFIG).unwrap();
        assert_eq!(config.get_str("PROFILE_NAME"), Some("warehouse"));
        assert_eq!(config.get_str("PROFILE_ENABLED"), Some("true"));
        assert_eq!(config.get_str("CONFIG_MODE"), Some("UPDATE"));

        let plugin = config.get_table("PLUGIN_CONFIG").unwrap();
        assert_eq!(plugin.get_str("PLUGIN_NAME"), Some("BARCODE"));
        assert_eq!(plugin.get_str("RESET_CONFIG"), Some("true"));

        let params = plugin.get_table("PARAM_LIST").unwrap();
        assert_eq!(params.get_str("scanner_input_enabled"), Some("true"));
        assert_eq!(params.get_str("decoder_code128"), Some("true"));
        assert_eq!(params.get_str("decoder_qrcode"), Some("true"));
        assert_eq!(params.get_str("decoder_ean13"), Some("false"));
        // 51 decoder flags + the two scanner parameters
        assert_eq!(params.len(), Symbology::ALL.len() + 2);

        let Some(Value::List(apps)) = config.get("APP_LIST") else {
            panic!("APP_LIST missing");
        };
        let Value::Table(app) = &apps[0] else {
            panic!("APP_LIST entry is not a table");
        };
        assert_eq!(app.get_str("PACKAGE_NAME"), Some("com.example.app"));
    }

    #[test]
    fn keystroke_output_is_disabled() {
        let command = keystroke_disable_command(&spec());
        let config = command.payload().get_table(ACTION_SET_CONFIG).unwrap();
        let plugin = config.get_table("PLUGIN_CONFIG").unwrap();
        assert_eq!(plugin.get_str("PLUGIN_NAME"), Some("KEYSTROKE"));
        let params = plugin.get_table("PARAM_LIST").unwrap();
        assert_eq!(params.get_str("keystroke_output_enabled"), Some("false"));
    }

    #[test]
    fn intent_output_broadcasts_under_the_scan_action() {
        let command = intent_output_command(&spec().with_scan_action("com.example.SCAN"));
        let config = command.payload().get_table(ACTION_SET_CONFIG).unwrap();
        let plugin = config.get_table("PLUGIN_CONFIG").unwrap();
        assert_eq!(plugin.get_str("PLUGIN_NAME"), Some("INTENT"));
        let params = plugin.get_table("PARAM_LIST").unwrap();
        assert_eq!(params.get_str("intent_action"), Some("com.example.SCAN"));
        assert_eq!(params.get_str("intent_delivery"), Some("2"));
    }

    #[test]
    fn chains_are_ordered_and_acknowledged() {
        let vocabulary = vocabulary();

        let full = profile_chain(&spec());
        assert_eq!(full.len(), 4);
        assert_eq!(full[0].action(), ACTION_CREATE_PROFILE);
        for command in &full {
            assert!(command.expects_reply());
            assert!(vocabulary.is_ack(command.action()));
        }

        let update = update_chain(&spec());
        assert_eq!(update.len(), 3);
        assert_eq!(update[0].action(), ACTION_SET_CONFIG);
    }
}
