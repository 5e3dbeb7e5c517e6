//! # MediaLyzer for the browser
//!
//! Binds [`medialyzer_core::FeatureDetector`] to the live browsing context and exposes it to
//! JavaScript as the `MediaLyzer` class.
//!
//! ```js
//! import init, { MediaLyzer } from "medialyzer_web";
//!
//! await init();
//! const lyzer = new MediaLyzer();
//! if (lyzer.dash264()) { /* pick the DASH/H.264 rendition */ }
//! const [hasFlash, flashVersion] = lyzer.flash();
//! ```
//!
//! The host context (user agent, plugin list, MIME list, standalone flag) is read once in the
//! constructor. Every other method re-probes the browser on each call.

mod host;

pub use host::WebHost;

use js_sys::Array;
use medialyzer_core::{BrowserDetection, FeatureDetector, H264Profile};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Browser capability detector.
#[wasm_bindgen]
pub struct MediaLyzer {
    detector: FeatureDetector<WebHost>,
}

#[wasm_bindgen]
impl MediaLyzer {
    /// Captures the host context. Throws outside a window context.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<MediaLyzer, JsValue> {
        let host = WebHost::new().map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(Self {
            detector: FeatureDetector::new(host),
        })
    }

    #[wasm_bindgen(js_name = getUserAgent)]
    pub fn user_agent(&self) -> Option<String> {
        self.detector.user_agent().map(str::to_string)
    }

    /// Plugin list captured at construction, or `null` when empty or unavailable.
    #[wasm_bindgen(js_name = getPlugins)]
    pub fn plugins(&self) -> Result<JsValue, JsValue> {
        to_js(&self.detector.plugins())
    }

    #[wasm_bindgen(js_name = getMimeTypes)]
    pub fn mime_types(&self) -> Result<JsValue, JsValue> {
        to_js(&self.detector.mime_types())
    }

    /// `true` when launched from the iOS home screen, `null` otherwise.
    #[wasm_bindgen(js_name = getStandaloneMode)]
    pub fn standalone_mode(&self) -> Option<bool> {
        self.detector.standalone_mode()
    }

    #[wasm_bindgen(js_name = video5)]
    pub fn video_element(&self) -> bool {
        self.detector.video_element()
    }

    #[wasm_bindgen(js_name = audio5)]
    pub fn audio_element(&self) -> bool {
        self.detector.audio_element()
    }

    /// `profile` is one of `baseline`, `main30`, `high30`, `high40`, `high50`. Anything else
    /// probes Baseline.
    #[wasm_bindgen(js_name = mp4H264AAC)]
    pub fn mp4_h264_aac(&self, profile: Option<String>) -> bool {
        let profile = profile.as_deref().map(H264Profile::from_name);
        self.detector.mp4_h264_aac(profile)
    }

    #[wasm_bindgen(js_name = webmVP8Vorbis)]
    pub fn webm_vp8_vorbis(&self) -> bool {
        self.detector.webm_vp8_vorbis()
    }

    #[wasm_bindgen(js_name = webmVP9Opus)]
    pub fn webm_vp9_opus(&self) -> bool {
        self.detector.webm_vp9_opus()
    }

    #[wasm_bindgen(js_name = oggTheoraVorbis)]
    pub fn ogg_theora_vorbis(&self) -> bool {
        self.detector.ogg_theora_vorbis()
    }

    #[wasm_bindgen(js_name = nativeFS)]
    pub fn native_fullscreen(&self) -> bool {
        self.detector.native_fullscreen()
    }

    #[wasm_bindgen(js_name = m4aAAC)]
    pub fn m4a_aac(&self) -> bool {
        self.detector.m4a_aac()
    }

    pub fn mp3(&self) -> bool {
        self.detector.mp3()
    }

    #[wasm_bindgen(js_name = oggVorbis)]
    pub fn ogg_vorbis(&self) -> bool {
        self.detector.ogg_vorbis()
    }

    #[wasm_bindgen(js_name = webmOpus)]
    pub fn webm_opus(&self) -> bool {
        self.detector.webm_opus()
    }

    #[wasm_bindgen(js_name = wavPCM)]
    pub fn wav_pcm(&self) -> bool {
        self.detector.wav_pcm()
    }

    #[wasm_bindgen(js_name = webAudio)]
    pub fn web_audio(&self) -> bool {
        self.detector.web_audio()
    }

    pub fn mse(&self) -> bool {
        self.detector.media_source_extensions()
    }

    pub fn eme(&self) -> bool {
        self.detector.encrypted_media_extensions()
    }

    #[wasm_bindgen(js_name = getUserMedia)]
    pub fn get_user_media(&self) -> bool {
        self.detector.get_user_media()
    }

    #[wasm_bindgen(js_name = rtcPeerConnection)]
    pub fn rtc_peer_connection(&self) -> bool {
        self.detector.rtc_peer_connection()
    }

    #[wasm_bindgen(js_name = rtcSessionDescription)]
    pub fn rtc_session_description(&self) -> bool {
        self.detector.rtc_session_description()
    }

    #[wasm_bindgen(js_name = webSocket)]
    pub fn web_socket(&self) -> bool {
        self.detector.web_socket()
    }

    #[wasm_bindgen(js_name = webWorker)]
    pub fn web_worker(&self) -> bool {
        self.detector.web_worker()
    }

    #[wasm_bindgen(js_name = webStorage)]
    pub fn web_storage(&self) -> bool {
        self.detector.web_storage()
    }

    pub fn canvas(&self) -> bool {
        self.detector.canvas()
    }

    #[wasm_bindgen(js_name = canvasText)]
    pub fn canvas_text(&self) -> bool {
        self.detector.canvas_text()
    }

    #[wasm_bindgen(js_name = canvasBlending)]
    pub fn canvas_blending(&self) -> bool {
        self.detector.canvas_blending()
    }

    #[wasm_bindgen(js_name = canvasWebGL)]
    pub fn canvas_webgl(&self) -> bool {
        self.detector.canvas_webgl()
    }

    /// `[detected, [major, minor, patch] | null]`
    pub fn flash(&self) -> Array {
        detection_pair(&self.detector.flash())
    }

    #[wasm_bindgen(js_name = hlsVideo)]
    pub fn hls_video(&self) -> bool {
        self.detector.supports_hls_video()
    }

    #[wasm_bindgen(js_name = hlsAudio)]
    pub fn hls_audio(&self) -> bool {
        self.detector.supports_hls_audio()
    }

    #[wasm_bindgen(js_name = dash264)]
    pub fn dash_h264(&self) -> bool {
        self.detector.supports_dash_h264()
    }

    #[wasm_bindgen(js_name = dashWebM)]
    pub fn dash_webm(&self) -> bool {
        self.detector.supports_dash_webm()
    }

    #[wasm_bindgen(js_name = isAndroid)]
    pub fn android(&self) -> Array {
        detection_pair(&self.detector.android())
    }

    #[wasm_bindgen(js_name = isIOS)]
    pub fn ios(&self) -> Array {
        detection_pair(&self.detector.ios())
    }

    #[wasm_bindgen(js_name = isIE)]
    pub fn internet_explorer(&self) -> Array {
        detection_pair(&self.detector.internet_explorer())
    }

    #[wasm_bindgen(js_name = isChrome)]
    pub fn chrome(&self) -> Array {
        detection_pair(&self.detector.chrome())
    }

    #[wasm_bindgen(js_name = isOpera)]
    pub fn opera(&self) -> Array {
        detection_pair(&self.detector.opera())
    }

    /// Every query above in one object.
    pub fn report(&self) -> Result<JsValue, JsValue> {
        to_js(&self.detector.report())
    }
}

fn detection_pair(detection: &BrowserDetection) -> Array {
    let version = match detection.version() {
        Some(version) => Array::of3(
            &JsValue::from(version.major),
            &JsValue::from(version.minor),
            &JsValue::from(version.patch),
        )
        .into(),
        None => JsValue::NULL,
    };
    Array::of2(&JsValue::from_bool(detection.is_detected()), &version)
}

/// Goes through JSON text so the object shape matches the serde field names exactly.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(value).map_err(|err| JsValue::from_str(&err.to_string()))?;
    js_sys::JSON::parse(&json)
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use medialyzer_core::VersionTriple;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_detection_pair_with_version() {
        let flash = BrowserDetection::detected(Some(VersionTriple::new(17, 0, 134)));
        let pair = detection_pair(&flash);
        assert_eq!(pair.length(), 2);
        assert_eq!(pair.get(0).as_bool(), Some(true));

        let version = Array::from(&pair.get(1));
        assert_eq!(version.length(), 3);
        assert_eq!(version.get(0).as_f64(), Some(17.0));
        assert_eq!(version.get(1).as_f64(), Some(0.0));
        assert_eq!(version.get(2).as_f64(), Some(134.0));
    }

    #[wasm_bindgen_test]
    fn test_detection_pair_without_version() {
        let pair = detection_pair(&BrowserDetection::detected(None));
        assert_eq!(pair.get(0).as_bool(), Some(true));
        assert!(pair.get(1).is_null());

        let pair = detection_pair(&BrowserDetection::not_detected());
        assert_eq!(pair.length(), 2);
        assert_eq!(pair.get(0).as_bool(), Some(false));
        assert!(pair.get(1).is_null());
    }

    #[wasm_bindgen_test]
    fn test_report_is_a_plain_object() {
        let lyzer = MediaLyzer::new().unwrap();
        let report = lyzer.report().unwrap();
        let streaming = js_sys::Reflect::get(&report, &JsValue::from_str("streaming")).unwrap();
        let dash_webm = js_sys::Reflect::get(&streaming, &JsValue::from_str("dash_webm")).unwrap();
        assert!(dash_webm.as_bool().is_some());
        assert_eq!(lyzer.flash().length(), 2);
    }
}
