//! Static host descriptions.
//!
//! A [`HostProfile`] answers every host call from plain data. It is what the CLI loads from
//! JSON, and what the tests use as fixtures.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::error::{host_threw, host_unavailable, HostResult, ProfileError};
use crate::media::{Confidence, MediaKind};
use super::{
    Canvas2d, HostEnvironment, HostScope, LegacyPluginObject, MimeTypeInfo, PluginInfo, Probe,
    StorageArea,
};

const DEFAULT_COMPOSITE_OPERATION: &str = "source-over";

/// How the Web Storage globals behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBehavior {
    /// Both storage areas are defined.
    Available,
    /// Storage is not exposed.
    #[default]
    Missing,
    /// Touching storage throws (disabled cookies, sandboxed frames).
    Throws,
}

/// Canvas behaviour of a profiled host.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasProfile {
    /// The 2D context exposes `fillText`.
    pub fill_text: bool,
    /// Composite operations the 2D context retains when assigned.
    pub blend_modes: BTreeSet<String>,
    /// Context ids for which `getContext` returns a context.
    pub contexts: BTreeSet<String>,
    /// Context ids for which `getContext` throws.
    pub throwing_contexts: BTreeSet<String>,
}

/// A legacy plugin object the profiled host can instantiate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyPluginProfile {
    pub prog_id: String,
    /// Values returned by `GetVariable`.
    pub variables: BTreeMap<String, String>,
    /// `GetVariable` throws instead of answering.
    pub get_variable_throws: bool,
}

/// A host described entirely by data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostProfile {
    pub user_agent: Option<String>,
    pub plugins: Option<Vec<PluginInfo>>,
    pub mime_types: Option<Vec<MimeTypeInfo>>,
    pub standalone: Option<bool>,
    /// `<video>` exposes `canPlayType`.
    pub video_element: bool,
    /// `<audio>` exposes `canPlayType`.
    pub audio_element: bool,
    /// `canPlayType` answers keyed by the exact MIME string; unlisted types answer `""`.
    pub can_play: BTreeMap<String, Confidence>,
    pub window: BTreeSet<String>,
    pub navigator: BTreeSet<String>,
    pub document_element: BTreeSet<String>,
    pub storage: StorageBehavior,
    /// `None` when `<canvas>` has no `getContext`.
    pub canvas: Option<CanvasProfile>,
    pub legacy_plugins: Vec<LegacyPluginProfile>,
    #[serde(skip)]
    legacy_instantiations: Cell<usize>,
}

impl HostProfile {
    pub fn builder() -> HostProfileBuilder {
        HostProfileBuilder::default()
    }

    /// Parses a profile from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ProfileError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON profile file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded host profile");
        Self::from_json_str(&json)
    }

    /// Number of legacy plugin instantiations attempted so far.
    pub fn legacy_instantiations(&self) -> usize {
        self.legacy_instantiations.get()
    }

    fn scope(&self, scope: HostScope) -> &BTreeSet<String> {
        match scope {
            HostScope::Window => &self.window,
            HostScope::Navigator => &self.navigator,
            HostScope::DocumentElement => &self.document_element,
        }
    }
}

impl HostEnvironment for HostProfile {
    fn user_agent(&self) -> Option<String> {
        self.user_agent.clone()
    }

    fn plugins(&self) -> Option<Vec<PluginInfo>> {
        self.plugins.clone()
    }

    fn mime_types(&self) -> Option<Vec<MimeTypeInfo>> {
        self.mime_types.clone()
    }

    fn standalone(&self) -> Option<bool> {
        self.standalone
    }

    fn has_media_element(&self, kind: MediaKind) -> bool {
        match kind {
            MediaKind::Audio => self.audio_element,
            MediaKind::Video => self.video_element,
        }
    }

    fn can_play_type(&self, kind: MediaKind, mime: &str) -> Option<Confidence> {
        if !self.has_media_element(kind) {
            return None;
        }
        Some(self.can_play.get(mime).copied().unwrap_or(Confidence::Empty))
    }

    fn probe(&self, scope: HostScope, name: &str) -> Probe {
        Probe::from_presence(self.scope(scope).contains(name))
    }

    fn storage(&self, area: StorageArea) -> HostResult<bool> {
        match self.storage {
            StorageBehavior::Available => Ok(true),
            StorageBehavior::Missing => Ok(false),
            StorageBehavior::Throws => Err(host_threw(area.global_name(), "SecurityError")),
        }
    }

    fn has_canvas(&self) -> bool {
        self.canvas.is_some()
    }

    fn canvas_2d(&self) -> HostResult<Option<Box<dyn Canvas2d + '_>>> {
        let canvas = self.canvas.as_ref().ok_or_else(|| host_unavailable("getContext"))?;
        if canvas.throwing_contexts.contains("2d") {
            return Err(host_threw("getContext", "2d context creation failed"));
        }
        Ok(Some(Box::new(ProfileCanvas2d {
            profile: canvas,
            composite: RefCell::new(DEFAULT_COMPOSITE_OPERATION.to_string()),
        })))
    }

    fn canvas_context(&self, context_id: &str) -> HostResult<bool> {
        let canvas = self.canvas.as_ref().ok_or_else(|| host_unavailable("getContext"))?;
        if canvas.throwing_contexts.contains(context_id) {
            return Err(host_threw("getContext", format!("{} context creation failed", context_id)));
        }
        Ok(canvas.contexts.contains(context_id))
    }

    fn instantiate_legacy_plugin(
        &self,
        prog_id: &str,
    ) -> HostResult<Box<dyn LegacyPluginObject + '_>> {
        self.legacy_instantiations.set(self.legacy_instantiations.get() + 1);
        match self.legacy_plugins.iter().find(|plugin| plugin.prog_id == prog_id) {
            Some(plugin) => Ok(Box::new(ProfileLegacyPlugin { profile: plugin })),
            None => Err(host_threw("ActiveXObject", "Automation server can't create object")),
        }
    }
}

struct ProfileCanvas2d<'a> {
    profile: &'a CanvasProfile,
    composite: RefCell<String>,
}

impl Canvas2d for ProfileCanvas2d<'_> {
    fn has_fill_text(&self) -> bool {
        self.profile.fill_text
    }

    fn global_composite_operation(&self) -> HostResult<String> {
        Ok(self.composite.borrow().clone())
    }

    fn set_global_composite_operation(&self, operation: &str) -> HostResult<()> {
        let retained = operation == DEFAULT_COMPOSITE_OPERATION
            || self.profile.blend_modes.contains(operation);
        if retained {
            *self.composite.borrow_mut() = operation.to_string();
        }
        Ok(())
    }
}

struct ProfileLegacyPlugin<'a> {
    profile: &'a LegacyPluginProfile,
}

impl LegacyPluginObject for ProfileLegacyPlugin<'_> {
    fn get_variable(&self, name: &str) -> HostResult<Option<String>> {
        if self.profile.get_variable_throws {
            return Err(host_threw("GetVariable", format!("{} is not readable", name)));
        }
        Ok(self.profile.variables.get(name).cloned())
    }
}

/// Builder for [`HostProfile`].
#[derive(Debug, Default)]
pub struct HostProfileBuilder {
    profile: HostProfile,
}

impl HostProfileBuilder {
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.profile.user_agent = Some(user_agent.into());
        self
    }

    pub fn plugins(mut self, plugins: Vec<PluginInfo>) -> Self {
        self.profile.plugins = Some(plugins);
        self
    }

    /// Appends one plugin to the plugin list.
    pub fn plugin(mut self, plugin: PluginInfo) -> Self {
        self.profile.plugins.get_or_insert_with(Vec::new).push(plugin);
        self
    }

    pub fn mime_types(mut self, mime_types: Vec<MimeTypeInfo>) -> Self {
        self.profile.mime_types = Some(mime_types);
        self
    }

    /// Appends one entry to the MIME type list.
    pub fn mime_type(mut self, mime_type: MimeTypeInfo) -> Self {
        self.profile.mime_types.get_or_insert_with(Vec::new).push(mime_type);
        self
    }

    pub fn standalone(mut self, standalone: bool) -> Self {
        self.profile.standalone = Some(standalone);
        self
    }

    pub fn video_element(mut self, present: bool) -> Self {
        self.profile.video_element = present;
        self
    }

    pub fn audio_element(mut self, present: bool) -> Self {
        self.profile.audio_element = present;
        self
    }

    pub fn can_play(mut self, mime: impl Into<String>, confidence: Confidence) -> Self {
        self.profile.can_play.insert(mime.into(), confidence);
        self
    }

    pub fn global(mut self, scope: HostScope, name: impl Into<String>) -> Self {
        let name = name.into();
        match scope {
            HostScope::Window => self.profile.window.insert(name),
            HostScope::Navigator => self.profile.navigator.insert(name),
            HostScope::DocumentElement => self.profile.document_element.insert(name),
        };
        self
    }

    pub fn storage(mut self, storage: StorageBehavior) -> Self {
        self.profile.storage = storage;
        self
    }

    pub fn canvas(mut self, canvas: CanvasProfile) -> Self {
        self.profile.canvas = Some(canvas);
        self
    }

    pub fn legacy_plugin(mut self, plugin: LegacyPluginProfile) -> Self {
        self.profile.legacy_plugins.push(plugin);
        self
    }

    pub fn build(self) -> HostProfile {
        self.profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_profile_from_json() {
        let json = r#"{
            "user_agent": "Mozilla/5.0 (iPad; CPU OS 7_0_4 like Mac OS X)",
            "video_element": true,
            "can_play": { "application/vnd.apple.mpegurl": "maybe" },
            "window": ["MediaSource"],
            "storage": "throws",
            "plugins": [{ "name": "Shockwave Flash", "version": "17.0.0.134" }],
            "mime_types": [{ "type": "application/x-shockwave-flash" }]
        }"#;

        let profile = HostProfile::from_json_str(json).unwrap();
        assert!(profile.has_media_element(MediaKind::Video));
        assert!(!profile.has_media_element(MediaKind::Audio));
        assert_eq!(
            profile.can_play_type(MediaKind::Video, "application/vnd.apple.mpegurl"),
            Some(Confidence::Maybe)
        );
        assert_eq!(profile.can_play_type(MediaKind::Video, "video/mp4"), Some(Confidence::Empty));
        assert_eq!(profile.can_play_type(MediaKind::Audio, "audio/mpeg"), None);
        assert!(profile.probe(HostScope::Window, "MediaSource").is_supported());
        assert!(profile.storage(StorageArea::Local).is_err());
        assert_eq!(profile.mime_types.as_ref().map(|m| m[0].enabled_plugin.is_none()), Some(true));
    }

    #[test]
    fn test_profile_rejects_malformed_json() {
        let err = HostProfile::from_json_str(r#"{ "storage": "sometimes" }"#).unwrap_err();
        assert!(matches!(err, ProfileError::Json { .. }));
    }

    #[test]
    fn test_profile_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "user_agent": "Mozilla/5.0", "audio_element": true }}"#).unwrap();

        let profile = HostProfile::load(file.path()).unwrap();
        assert_eq!(profile.user_agent(), Some("Mozilla/5.0".to_string()));
        assert!(profile.audio_element);

        let missing = HostProfile::load(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(ProfileError::Io { .. })));
    }

    #[test]
    fn test_canvas_composite_retention() {
        let mut canvas = CanvasProfile::default();
        canvas.blend_modes.insert("screen".to_string());
        let host = HostProfile::builder().canvas(canvas).build();

        let context = host.canvas_2d().unwrap().unwrap();
        context.set_global_composite_operation("multiply").unwrap();
        assert_eq!(context.global_composite_operation().unwrap(), "source-over");
        context.set_global_composite_operation("screen").unwrap();
        assert_eq!(context.global_composite_operation().unwrap(), "screen");
    }

    #[test]
    fn test_legacy_plugin_instantiation() {
        let mut variables = BTreeMap::new();
        variables.insert("$version".to_string(), "WIN 11,2,202,235".to_string());
        let host = HostProfile::builder()
            .legacy_plugin(LegacyPluginProfile {
                prog_id: "ShockwaveFlash.ShockwaveFlash".to_string(),
                variables,
                get_variable_throws: false,
            })
            .build();

        let plugin = host.instantiate_legacy_plugin("ShockwaveFlash.ShockwaveFlash").unwrap();
        assert_eq!(plugin.get_variable("$version").unwrap().as_deref(), Some("WIN 11,2,202,235"));
        assert!(host.instantiate_legacy_plugin("Unknown.Plugin").is_err());
        assert_eq!(host.legacy_instantiations(), 2);
    }
}
