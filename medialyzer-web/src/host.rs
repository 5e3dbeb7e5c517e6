//! [`HostEnvironment`] over the browser's `window`, `navigator` and `document`.
//!
//! JS exceptions are turned into [`HostError`] here and never reach the detector's callers.

use js_sys::{Array, Function, Object, Reflect};
use medialyzer_core::error::{host_threw, host_unavailable, HostResult};
use medialyzer_core::host::{Canvas2d, LegacyPluginObject, MimeTypeInfo, PluginInfo, StorageArea};
use medialyzer_core::{Confidence, HostEnvironment, HostError, HostScope, MediaKind, Probe};
use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlCanvasElement, HtmlMediaElement, Navigator, Window};

/// The current browsing context.
///
/// One `<audio>`, `<video>` and `<canvas>` element is created up front and reused by every
/// probe; none of them is attached to the document.
pub struct WebHost {
    window: Window,
    navigator: Navigator,
    document: Option<Document>,
    audio: Option<HtmlMediaElement>,
    video: Option<HtmlMediaElement>,
    canvas: Option<HtmlCanvasElement>,
}

impl WebHost {
    /// Binds to the global `window`. Fails outside a window context (workers, Node).
    pub fn new() -> Result<Self, HostError> {
        let window = web_sys::window().ok_or_else(|| host_unavailable("window"))?;
        let navigator = window.navigator();
        let document = window.document();

        let create = |tag: &str| -> Option<web_sys::Element> {
            let document = document.as_ref()?;
            match document.create_element(tag) {
                Ok(element) => Some(element),
                Err(err) => {
                    debug!(tag, error = %js_message(&err), "element creation failed");
                    None
                }
            }
        };

        let audio = create("audio").and_then(|el| el.dyn_into::<HtmlMediaElement>().ok());
        let video = create("video").and_then(|el| el.dyn_into::<HtmlMediaElement>().ok());
        let canvas = create("canvas").and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());

        Ok(Self {
            window,
            navigator,
            document,
            audio,
            video,
            canvas,
        })
    }

    fn media_element(&self, kind: MediaKind) -> Option<&HtmlMediaElement> {
        match kind {
            MediaKind::Audio => self.audio.as_ref(),
            MediaKind::Video => self.video.as_ref(),
        }
    }

    fn scope_object(&self, scope: HostScope) -> Option<JsValue> {
        match scope {
            HostScope::Window => Some(self.window.clone().into()),
            HostScope::Navigator => Some(self.navigator.clone().into()),
            HostScope::DocumentElement => self
                .document
                .as_ref()
                .and_then(Document::document_element)
                .map(Into::into),
        }
    }
}

impl HostEnvironment for WebHost {
    fn user_agent(&self) -> Option<String> {
        self.navigator.user_agent().ok().filter(|ua| !ua.is_empty())
    }

    fn plugins(&self) -> Option<Vec<PluginInfo>> {
        let list = member(&self.navigator, "plugins")?;
        Some(array_like(&list).iter().map(plugin_info).collect())
    }

    fn mime_types(&self) -> Option<Vec<MimeTypeInfo>> {
        let list = member(&self.navigator, "mimeTypes")?;
        let entries = array_like(&list)
            .iter()
            .map(|entry| {
                let enabled_plugin =
                    member(entry, "enabledPlugin").map(|plugin| plugin_info(&plugin));
                MimeTypeInfo::new(string_member(entry, "type").unwrap_or_default(), enabled_plugin)
            })
            .collect();
        Some(entries)
    }

    fn standalone(&self) -> Option<bool> {
        member(&self.navigator, "standalone").map(|value| value.is_truthy())
    }

    fn has_media_element(&self, kind: MediaKind) -> bool {
        self.media_element(kind)
            .map_or(false, |element| truthy_member(element, "canPlayType").is_supported())
    }

    fn can_play_type(&self, kind: MediaKind, mime: &str) -> Option<Confidence> {
        if !self.has_media_element(kind) {
            return None;
        }
        let element = self.media_element(kind)?;
        Some(Confidence::from_host_str(&element.can_play_type(mime)))
    }

    fn probe(&self, scope: HostScope, name: &str) -> Probe {
        match self.scope_object(scope) {
            Some(target) => truthy_member(&target, name),
            None => Probe::Unsupported,
        }
    }

    fn storage(&self, area: StorageArea) -> HostResult<bool> {
        storage_global(&self.window, area)
    }

    fn has_canvas(&self) -> bool {
        self.canvas
            .as_ref()
            .map_or(false, |canvas| truthy_member(canvas, "getContext").is_supported())
    }

    fn canvas_2d(&self) -> HostResult<Option<Box<dyn Canvas2d + '_>>> {
        let canvas = self.canvas.as_ref().ok_or_else(|| host_unavailable("getContext"))?;
        let context = canvas
            .get_context("2d")
            .map_err(|err| host_threw("getContext", js_message(&err)))?;
        Ok(context.map(|context| Box::new(WebCanvas2d { context }) as Box<dyn Canvas2d>))
    }

    fn canvas_context(&self, context_id: &str) -> HostResult<bool> {
        let canvas = self.canvas.as_ref().ok_or_else(|| host_unavailable("getContext"))?;
        canvas
            .get_context(context_id)
            .map(|context| context.is_some())
            .map_err(|err| host_threw("getContext", js_message(&err)))
    }

    fn instantiate_legacy_plugin(
        &self,
        prog_id: &str,
    ) -> HostResult<Box<dyn LegacyPluginObject + '_>> {
        let constructor = Reflect::get(&self.window, &JsValue::from_str("ActiveXObject"))
            .map_err(|err| host_threw("ActiveXObject", js_message(&err)))?;
        if !constructor.is_function() {
            return Err(host_unavailable("ActiveXObject"));
        }
        let constructor: Function = constructor.unchecked_into();
        let object = Reflect::construct(&constructor, &Array::of1(&JsValue::from_str(prog_id)))
            .map_err(|err| host_threw("ActiveXObject", js_message(&err)))?;
        Ok(Box::new(WebLegacyPlugin { object }))
    }
}

struct WebCanvas2d {
    context: Object,
}

impl Canvas2d for WebCanvas2d {
    fn has_fill_text(&self) -> bool {
        Reflect::get(&self.context, &JsValue::from_str("fillText"))
            .map_or(false, |fill_text| fill_text.is_function())
    }

    fn global_composite_operation(&self) -> HostResult<String> {
        Reflect::get(&self.context, &JsValue::from_str("globalCompositeOperation"))
            .map(|value| value.as_string().unwrap_or_default())
            .map_err(|err| host_threw("globalCompositeOperation", js_message(&err)))
    }

    fn set_global_composite_operation(&self, operation: &str) -> HostResult<()> {
        Reflect::set(
            &self.context,
            &JsValue::from_str("globalCompositeOperation"),
            &JsValue::from_str(operation),
        )
        .map(|_| ())
        .map_err(|err| host_threw("globalCompositeOperation", js_message(&err)))
    }
}

struct WebLegacyPlugin {
    object: JsValue,
}

impl LegacyPluginObject for WebLegacyPlugin {
    fn get_variable(&self, name: &str) -> HostResult<Option<String>> {
        let method = Reflect::get(&self.object, &JsValue::from_str("GetVariable"))
            .map_err(|err| host_threw("GetVariable", js_message(&err)))?;
        if !method.is_function() {
            return Err(host_unavailable("GetVariable"));
        }
        let method: Function = method.unchecked_into();
        method
            .call1(&self.object, &JsValue::from_str(name))
            .map(|value| value.as_string())
            .map_err(|err| host_threw("GetVariable", js_message(&err)))
    }
}

/// Reads `target[name]`, treating `undefined`, `null` and thrown lookups as absent.
fn member(target: &JsValue, name: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

fn string_member(target: &JsValue, name: &str) -> Option<String> {
    member(target, name).and_then(|value| value.as_string())
}

fn truthy_member(target: &JsValue, name: &str) -> Probe {
    match Reflect::get(target, &JsValue::from_str(name)) {
        Ok(value) => Probe::from_presence(value.is_truthy()),
        Err(_) => Probe::Indeterminate,
    }
}

/// `localStorage` must be a non-null object; `sessionStorage` only has to be defined.
fn storage_global(target: &JsValue, area: StorageArea) -> HostResult<bool> {
    let value = Reflect::get(target, &JsValue::from_str(area.global_name()))
        .map_err(|err| host_threw(area.global_name(), js_message(&err)))?;
    Ok(match area {
        StorageArea::Local => !value.is_undefined() && !value.is_null(),
        StorageArea::Session => !value.is_undefined(),
    })
}

/// Collects the indexed entries of an array-like host object (`PluginArray`,
/// `MimeTypeArray`).
fn array_like(list: &JsValue) -> Vec<JsValue> {
    let length = member(list, "length").and_then(|len| len.as_f64()).unwrap_or(0.0) as u32;
    (0..length)
        .filter_map(|index| Reflect::get_u32(list, index).ok())
        .filter(|entry| !entry.is_undefined() && !entry.is_null())
        .collect()
}

fn plugin_info(plugin: &JsValue) -> PluginInfo {
    PluginInfo {
        name: string_member(plugin, "name").unwrap_or_default(),
        version: string_member(plugin, "version"),
        description: string_member(plugin, "description"),
    }
}

fn js_message(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| string_member(err, "message"))
        .unwrap_or_else(|| format!("{:?}", err))
}
