//! The host abstraction.
//!
//! Everything the detector knows about its environment comes through [`HostEnvironment`]:
//! navigator data, presence checks on globals, the media elements' `canPlayType` oracle,
//! storage, canvas and the legacy plugin object. Implementations report failures as
//! [`HostError`](crate::error::HostError); the detector never lets them escape.

mod profile;
mod snapshot;

pub use profile::{
    CanvasProfile, HostProfile, HostProfileBuilder, LegacyPluginProfile, StorageBehavior,
};
pub use snapshot::HostContextSnapshot;

use std::fmt;
use serde::{Deserialize, Serialize};
use crate::error::HostResult;
use crate::media::{Confidence, MediaKind};

/// Where a global capability is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HostScope {
    /// The global object (`window`).
    Window,
    /// `navigator`.
    Navigator,
    /// `document.documentElement`.
    DocumentElement,
}

impl fmt::Display for HostScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostScope::Window => write!(f, "window"),
            HostScope::Navigator => write!(f, "navigator"),
            HostScope::DocumentElement => write!(f, "document.documentElement"),
        }
    }
}

/// Answer of one presence probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Probe {
    Supported,
    Unsupported,
    /// The host could not tell (e.g. the lookup itself threw).
    Indeterminate,
}

impl Probe {
    /// Collapses the probe to a boolean; indeterminate counts as unsupported.
    pub fn is_supported(self) -> bool {
        matches!(self, Probe::Supported)
    }

    pub fn from_presence(present: bool) -> Self {
        if present {
            Probe::Supported
        } else {
            Probe::Unsupported
        }
    }
}

/// One entry of `navigator.plugins`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PluginInfo {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl PluginInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One entry of `navigator.mimeTypes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MimeTypeInfo {
    #[serde(rename = "type")]
    pub mime_type: String,
    #[serde(default)]
    pub enabled_plugin: Option<PluginInfo>,
}

impl MimeTypeInfo {
    pub fn new(mime_type: impl Into<String>, enabled_plugin: Option<PluginInfo>) -> Self {
        Self {
            mime_type: mime_type.into(),
            enabled_plugin,
        }
    }
}

/// Which Web Storage area to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageArea {
    Local,
    Session,
}

impl StorageArea {
    pub fn global_name(&self) -> &'static str {
        match self {
            StorageArea::Local => "localStorage",
            StorageArea::Session => "sessionStorage",
        }
    }
}

/// A 2D canvas rendering context.
pub trait Canvas2d {
    /// Whether the context exposes a callable `fillText`.
    fn has_fill_text(&self) -> bool;

    fn global_composite_operation(&self) -> HostResult<String>;

    /// Assigns `globalCompositeOperation`. Hosts silently ignore values they do not support.
    fn set_global_composite_operation(&self, operation: &str) -> HostResult<()>;
}

/// An instantiated legacy (ActiveX-style) plugin object.
pub trait LegacyPluginObject {
    /// Calls `GetVariable(name)` on the object.
    fn get_variable(&self, name: &str) -> HostResult<Option<String>>;
}

/// The environment a [`FeatureDetector`](crate::FeatureDetector) classifies.
///
/// Implementations should answer immediately; none of these calls may block.
pub trait HostEnvironment {
    /// `navigator.userAgent`.
    fn user_agent(&self) -> Option<String>;

    /// `navigator.plugins`, in host order.
    fn plugins(&self) -> Option<Vec<PluginInfo>>;

    /// `navigator.mimeTypes`, in host order.
    fn mime_types(&self) -> Option<Vec<MimeTypeInfo>>;

    /// `navigator.standalone` (iOS home-screen apps).
    fn standalone(&self) -> Option<bool>;

    /// Whether a freshly created element of this kind exposes `canPlayType`.
    fn has_media_element(&self, kind: MediaKind) -> bool;

    /// The element's `canPlayType(mime)` answer, or `None` if the element has no oracle.
    fn can_play_type(&self, kind: MediaKind, mime: &str) -> Option<Confidence>;

    /// Whether `name` is present and truthy on `scope`.
    fn probe(&self, scope: HostScope, name: &str) -> Probe;

    /// Whether the storage area is defined and non-null. Hosts with storage disabled may
    /// throw here.
    fn storage(&self, area: StorageArea) -> HostResult<bool>;

    /// Whether a `<canvas>` element exposes `getContext`.
    fn has_canvas(&self) -> bool;

    /// `canvas.getContext('2d')`.
    fn canvas_2d(&self) -> HostResult<Option<Box<dyn Canvas2d + '_>>>;

    /// `canvas.getContext(context_id)`; `Ok(true)` when a non-null context was returned.
    fn canvas_context(&self, context_id: &str) -> HostResult<bool>;

    /// `new ActiveXObject(prog_id)`.
    fn instantiate_legacy_plugin(
        &self,
        prog_id: &str,
    ) -> HostResult<Box<dyn LegacyPluginObject + '_>>;

    /// Probes several vendor-prefixed names, supported if any of them is.
    fn probe_any(&self, scope: HostScope, names: &[&str]) -> Probe {
        let mut answer = Probe::Unsupported;
        for name in names {
            match self.probe(scope, name) {
                Probe::Supported => return Probe::Supported,
                Probe::Indeterminate => answer = Probe::Indeterminate,
                Probe::Unsupported => {}
            }
        }
        answer
    }
}

impl<T: HostEnvironment + ?Sized> HostEnvironment for &T {
    fn user_agent(&self) -> Option<String> {
        (**self).user_agent()
    }

    fn plugins(&self) -> Option<Vec<PluginInfo>> {
        (**self).plugins()
    }

    fn mime_types(&self) -> Option<Vec<MimeTypeInfo>> {
        (**self).mime_types()
    }

    fn standalone(&self) -> Option<bool> {
        (**self).standalone()
    }

    fn has_media_element(&self, kind: MediaKind) -> bool {
        (**self).has_media_element(kind)
    }

    fn can_play_type(&self, kind: MediaKind, mime: &str) -> Option<Confidence> {
        (**self).can_play_type(kind, mime)
    }

    fn probe(&self, scope: HostScope, name: &str) -> Probe {
        (**self).probe(scope, name)
    }

    fn storage(&self, area: StorageArea) -> HostResult<bool> {
        (**self).storage(area)
    }

    fn has_canvas(&self) -> bool {
        (**self).has_canvas()
    }

    fn canvas_2d(&self) -> HostResult<Option<Box<dyn Canvas2d + '_>>> {
        (**self).canvas_2d()
    }

    fn canvas_context(&self, context_id: &str) -> HostResult<bool> {
        (**self).canvas_context(context_id)
    }

    fn instantiate_legacy_plugin(
        &self,
        prog_id: &str,
    ) -> HostResult<Box<dyn LegacyPluginObject + '_>> {
        (**self).instantiate_legacy_plugin(prog_id)
    }
}
