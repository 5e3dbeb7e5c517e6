//! Flash plugin detection.
//!
//! No single host API exposes Flash everywhere, so detection walks a priority chain and
//! only evaluates the first branch whose precondition holds:
//!
//! 1. IE below 11: instantiate the ActiveX control and ask it for `$version`.
//! 2. A plugin list was captured: look up the `Shockwave Flash` plugin.
//! 3. A MIME list was captured: look up `application/x-shockwave-flash`.
//! 4. Otherwise: not detected.

use tracing::{debug, trace};
use crate::host::{HostContextSnapshot, HostEnvironment};
use crate::user_agent::{detect_internet_explorer, BrowserDetection};
use crate::version::VersionTriple;

pub const FLASH_PROG_ID: &str = "ShockwaveFlash.ShockwaveFlash";
pub const FLASH_PLUGIN_NAME: &str = "Shockwave Flash";
pub const FLASH_MIME_TYPE: &str = "application/x-shockwave-flash";
const FLASH_VERSION_VARIABLE: &str = "$version";

/// Plugin presence and version. Same invariant as [`BrowserDetection`]: a version is only
/// carried by a positive detection.
pub type PluginDetection = BrowserDetection;

/// Resolves Flash presence and version.
pub fn detect_flash<H: HostEnvironment + ?Sized>(
    host: &H,
    snapshot: &HostContextSnapshot,
) -> PluginDetection {
    let ie = detect_internet_explorer(snapshot.user_agent().unwrap_or_default());
    let legacy_ie = ie.is_detected() && ie.version().map_or(true, |v| v.major < 11);

    if legacy_ie {
        detect_via_legacy_object(host)
    } else if snapshot.plugins().is_some() {
        detect_via_plugin_list(host)
    } else if snapshot.mime_types().is_some() {
        detect_via_mime_types(host)
    } else {
        trace!("no plugin or MIME list, Flash not detected");
        PluginDetection::not_detected()
    }
}

fn detect_via_legacy_object<H: HostEnvironment + ?Sized>(host: &H) -> PluginDetection {
    let object = match host.instantiate_legacy_plugin(FLASH_PROG_ID) {
        Ok(object) => object,
        Err(err) => {
            debug!(error = %err, "Flash ActiveX control not available");
            return PluginDetection::not_detected();
        }
    };

    let version = match object.get_variable(FLASH_VERSION_VARIABLE) {
        Ok(descriptor) => descriptor
            .as_deref()
            .and_then(VersionTriple::parse_description),
        Err(err) => {
            debug!(error = %err, "Flash ActiveX control did not report a version");
            None
        }
    };
    PluginDetection::detected(version)
}

fn detect_via_plugin_list<H: HostEnvironment + ?Sized>(host: &H) -> PluginDetection {
    let plugins = host.plugins().unwrap_or_default();
    let Some(flash) = plugins.iter().find(|plugin| plugin.name == FLASH_PLUGIN_NAME) else {
        return PluginDetection::not_detected();
    };

    let version = match (non_empty(&flash.version), non_empty(&flash.description)) {
        (Some(version), _) => VersionTriple::parse_dotted(version),
        (None, Some(description)) => VersionTriple::parse_description(description),
        (None, None) => None,
    };
    PluginDetection::detected(version)
}

fn detect_via_mime_types<H: HostEnvironment + ?Sized>(host: &H) -> PluginDetection {
    let mime_types = host.mime_types().unwrap_or_default();
    let enabled_plugin = mime_types
        .iter()
        .find(|entry| entry.mime_type == FLASH_MIME_TYPE)
        .and_then(|entry| entry.enabled_plugin.as_ref());

    match enabled_plugin {
        Some(plugin) => PluginDetection::detected(
            non_empty(&plugin.description).and_then(VersionTriple::parse_description),
        ),
        None => PluginDetection::not_detected(),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
