use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Info.plist key holding the App Tracking Transparency prompt text.
pub const USER_TRACKING_USAGE_DESCRIPTION_KEY: &str = "NSUserTrackingUsageDescription";

/// Companion plugin that wires App Tracking Transparency into the native project.
pub const TRACKING_TRANSPARENCY_PLUGIN: &str = "expo-tracking-transparency";

const USER_TRACKING_PERMISSION_OPTION: &str = "userTrackingPermission";

/// A build plugin attached to the app, with its string options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct PluginEntry {
    /// Package name of the plugin
    pub name: String,
    /// Options passed to the plugin
    #[serde(default)]
    pub options: HashMap<String, String>,
}

/// Sets the tracking usage description unless a non-empty one is already present.
pub(super) fn ensure_tracking_description(
    info_plist: &mut HashMap<String, String>,
    description: &str,
) -> bool {
    let present = info_plist
        .get(USER_TRACKING_USAGE_DESCRIPTION_KEY)
        .is_some_and(|value| !value.is_empty());
    if present {
        return false;
    }

    info_plist.insert(
        USER_TRACKING_USAGE_DESCRIPTION_KEY.to_string(),
        description.to_string(),
    );
    true
}

/// Attaches the tracking transparency plugin unless it is already in the list.
pub(super) fn ensure_tracking_plugin(plugins: &mut Vec<PluginEntry>, description: &str) -> bool {
    if plugins
        .iter()
        .any(|plugin| plugin.name == TRACKING_TRANSPARENCY_PLUGIN)
    {
        return false;
    }

    plugins.push(PluginEntry {
        name: TRACKING_TRANSPARENCY_PLUGIN.to_string(),
        options: HashMap::from([(
            USER_TRACKING_PERMISSION_OPTION.to_string(),
            description.to_string(),
        )]),
    });
    true
}
