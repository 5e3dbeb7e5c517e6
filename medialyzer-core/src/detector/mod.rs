//! The public detection surface.
//!
//! A [`FeatureDetector`] captures a [`HostContextSnapshot`] once and answers every query on
//! demand from that snapshot plus live host reads. Nothing derived is cached, so a polyfill
//! or a slow plugin that shows up later is picked up by the next call.

mod report;
mod streaming;

pub use report::{CapabilityReport, ContextSummary, FeatureFlags, MediaFormats, StreamingSupport};

use tracing::{debug, trace};
use crate::host::{
    HostContextSnapshot, HostEnvironment, HostScope, MimeTypeInfo, PluginInfo, StorageArea,
};
use crate::media::{self, Confidence, H264Profile, MediaKind, MediaProbe};
use crate::plugin::{self, PluginDetection};
use crate::user_agent::{self, BrowserDetection, UserAgentClassification};

const BLEND_PROBE_OPERATION: &str = "screen";
const WEBGL_CONTEXT_IDS: [&str; 2] = ["webgl", "experimental-webgl"];

const FULLSCREEN_METHODS: [&str; 4] = [
    "requestFullscreen",
    "mozRequestFullScreen",
    "webkitRequestFullscreen",
    "msRequestFullscreen",
];
const AUDIO_CONTEXT_CONSTRUCTORS: [&str; 4] = [
    "AudioContext",
    "webkitAudioContext",
    "mozAudioContext",
    "msAudioContext",
];
const MEDIA_SOURCE_CONSTRUCTORS: [&str; 2] = ["MediaSource", "WebKitMediaSource"];
const MEDIA_KEYS_CONSTRUCTORS: [&str; 3] = ["MediaKeys", "WebKitMediaKeys", "MSMediaKeys"];
const GET_USER_MEDIA_METHODS: [&str; 4] = [
    "getUserMedia",
    "webkitGetUserMedia",
    "mozGetUserMedia",
    "msGetUserMedia",
];
const PEER_CONNECTION_CONSTRUCTORS: [&str; 4] = [
    "RTCPeerConnection",
    "mozRTCPeerConnection",
    "webkitRTCPeerConnection",
    "msRTCPeerConnection",
];
const SESSION_DESCRIPTION_CONSTRUCTORS: [&str; 4] = [
    "RTCSessionDescription",
    "mozRTCSessionDescription",
    "webkitRTCSessionDescription",
    "msRTCSessionDescription",
];
const WEB_SOCKET_CONSTRUCTORS: [&str; 2] = ["WebSocket", "MozWebSocket"];
const CHROME_GLOBAL: &str = "chrome";

/// Browser capability detector over a host.
pub struct FeatureDetector<H: HostEnvironment> {
    host: H,
    snapshot: HostContextSnapshot,
}

impl<H: HostEnvironment> FeatureDetector<H> {
    /// Captures the host context and builds the detector.
    pub fn new(host: H) -> Self {
        let snapshot = HostContextSnapshot::capture(&host);
        debug!(user_agent = ?snapshot.user_agent(), "captured host context");
        Self { host, snapshot }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn snapshot(&self) -> &HostContextSnapshot {
        &self.snapshot
    }

    // Context getters

    pub fn user_agent(&self) -> Option<&str> {
        self.snapshot.user_agent()
    }

    pub fn plugins(&self) -> Option<&[PluginInfo]> {
        self.snapshot.plugins()
    }

    pub fn mime_types(&self) -> Option<&[MimeTypeInfo]> {
        self.snapshot.mime_types()
    }

    pub fn standalone_mode(&self) -> Option<bool> {
        self.snapshot.standalone()
    }

    // User-agent detection

    fn ua(&self) -> &str {
        self.snapshot.user_agent().unwrap_or_default()
    }

    pub fn android(&self) -> BrowserDetection {
        user_agent::detect_android(self.ua())
    }

    pub fn ios(&self) -> BrowserDetection {
        user_agent::detect_ios(self.ua())
    }

    pub fn internet_explorer(&self) -> BrowserDetection {
        user_agent::detect_internet_explorer(self.ua())
    }

    /// Chrome detection; reads the live `window.chrome` marker.
    pub fn chrome(&self) -> BrowserDetection {
        user_agent::detect_chrome(self.ua(), self.has_chrome_global())
    }

    pub fn opera(&self) -> BrowserDetection {
        user_agent::detect_opera(self.ua())
    }

    pub fn classification(&self) -> UserAgentClassification {
        user_agent::classify(self.ua(), self.has_chrome_global())
    }

    fn has_chrome_global(&self) -> bool {
        self.host.probe(HostScope::Window, CHROME_GLOBAL).is_supported()
    }

    // Media element formats

    fn media(&self) -> MediaProbe<'_, H> {
        MediaProbe::new(&self.host)
    }

    /// `<video>` with `canPlayType`.
    pub fn video_element(&self) -> bool {
        self.host.has_media_element(MediaKind::Video)
    }

    /// `<audio>` with `canPlayType`.
    pub fn audio_element(&self) -> bool {
        self.host.has_media_element(MediaKind::Audio)
    }

    /// MP4 with H.264 video and AAC-LC audio; baseline profile when `profile` is `None`.
    pub fn mp4_h264_aac(&self, profile: Option<H264Profile>) -> bool {
        let mime = profile.unwrap_or_default().mp4_mime();
        self.media().can_play_exactly(&mime, Confidence::Probably)
    }

    pub fn webm_vp8_vorbis(&self) -> bool {
        self.media().can_play_exactly(media::MIME_WEBM_VP8_VORBIS, Confidence::Probably)
    }

    pub fn webm_vp9_opus(&self) -> bool {
        self.media().can_play_exactly(media::MIME_WEBM_VP9_OPUS, Confidence::Probably)
    }

    pub fn ogg_theora_vorbis(&self) -> bool {
        self.media().can_play_exactly(media::MIME_OGG_THEORA_VORBIS, Confidence::Probably)
    }

    pub fn m4a_aac(&self) -> bool {
        self.media().can_play_exactly(media::MIME_M4A_AAC, Confidence::Probably)
    }

    pub fn mp3(&self) -> bool {
        self.media().can_play(media::MIME_MP3)
    }

    pub fn ogg_vorbis(&self) -> bool {
        self.media().can_play_exactly(media::MIME_OGG_VORBIS, Confidence::Probably)
    }

    pub fn webm_opus(&self) -> bool {
        self.media().can_play_exactly(media::MIME_WEBM_OPUS, Confidence::Probably)
    }

    pub fn wav_pcm(&self) -> bool {
        self.media().can_play(media::MIME_WAV_PCM)
    }

    // Host capabilities

    pub fn native_fullscreen(&self) -> bool {
        self.probe_any(HostScope::DocumentElement, &FULLSCREEN_METHODS)
    }

    pub fn web_audio(&self) -> bool {
        self.probe_any(HostScope::Window, &AUDIO_CONTEXT_CONSTRUCTORS)
    }

    /// Media Source Extensions, required for MPEG-DASH.
    pub fn media_source_extensions(&self) -> bool {
        self.probe_any(HostScope::Window, &MEDIA_SOURCE_CONSTRUCTORS)
    }

    /// Encrypted Media Extensions, required for DRM.
    pub fn encrypted_media_extensions(&self) -> bool {
        self.probe_any(HostScope::Window, &MEDIA_KEYS_CONSTRUCTORS)
    }

    pub fn get_user_media(&self) -> bool {
        self.probe_any(HostScope::Navigator, &GET_USER_MEDIA_METHODS)
    }

    pub fn rtc_peer_connection(&self) -> bool {
        self.probe_any(HostScope::Window, &PEER_CONNECTION_CONSTRUCTORS)
    }

    pub fn rtc_session_description(&self) -> bool {
        self.probe_any(HostScope::Window, &SESSION_DESCRIPTION_CONSTRUCTORS)
    }

    pub fn web_socket(&self) -> bool {
        self.probe_any(HostScope::Window, &WEB_SOCKET_CONSTRUCTORS)
    }

    pub fn web_worker(&self) -> bool {
        self.host.probe(HostScope::Window, "Worker").is_supported()
    }

    /// Both `localStorage` and `sessionStorage`. Hosts that throw on access (older Firefox
    /// with cookies disabled) report false.
    pub fn web_storage(&self) -> bool {
        let check = |area: StorageArea| match self.host.storage(area) {
            Ok(present) => present,
            Err(err) => {
                debug!(error = %err, "storage access failed");
                false
            }
        };
        check(StorageArea::Local) && check(StorageArea::Session)
    }

    pub fn canvas(&self) -> bool {
        self.host.has_canvas()
    }

    pub fn canvas_text(&self) -> bool {
        if !self.canvas() {
            return false;
        }
        match self.host.canvas_2d() {
            Ok(Some(context)) => context.has_fill_text(),
            Ok(None) => false,
            Err(err) => {
                debug!(error = %err, "2d context unavailable");
                false
            }
        }
    }

    /// Assigns a blend mode and checks the context kept it; unsupported values are silently
    /// dropped by the canvas API.
    pub fn canvas_blending(&self) -> bool {
        if !self.canvas() {
            return false;
        }
        let context = match self.host.canvas_2d() {
            Ok(Some(context)) => context,
            Ok(None) => return false,
            Err(err) => {
                debug!(error = %err, "2d context unavailable");
                return false;
            }
        };
        let retained = context
            .set_global_composite_operation(BLEND_PROBE_OPERATION)
            .and_then(|_| context.global_composite_operation());
        match retained {
            Ok(operation) => operation == BLEND_PROBE_OPERATION,
            Err(err) => {
                debug!(error = %err, "globalCompositeOperation probe failed");
                false
            }
        }
    }

    /// Tries the standard WebGL context id, then the legacy experimental one.
    pub fn canvas_webgl(&self) -> bool {
        if !self.canvas() {
            return false;
        }
        for context_id in WEBGL_CONTEXT_IDS {
            match self.host.canvas_context(context_id) {
                Ok(true) => return true,
                Ok(false) => trace!(context_id, "no WebGL context"),
                Err(err) => debug!(context_id, error = %err, "WebGL context acquisition failed"),
            }
        }
        false
    }

    // Plugins

    pub fn flash(&self) -> PluginDetection {
        plugin::detect_flash(&self.host, &self.snapshot)
    }

    fn probe_any(&self, scope: HostScope, names: &[&str]) -> bool {
        let probe = self.host.probe_any(scope, names);
        trace!(%scope, ?names, ?probe, "capability probe");
        probe.is_supported()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{CanvasProfile, HostProfile, StorageBehavior};

    fn canvas_with(contexts: &[&str], throwing: &[&str]) -> CanvasProfile {
        CanvasProfile {
            fill_text: true,
            blend_modes: ["screen".to_string()].into_iter().collect(),
            contexts: contexts.iter().map(|s| s.to_string()).collect(),
            throwing_contexts: throwing.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_context_getters() {
        let host = HostProfile::builder()
            .user_agent("Mozilla/5.0 (iPhone; CPU iPhone OS 8_1 like Mac OS X)")
            .standalone(true)
            .build();
        let detector = FeatureDetector::new(host);

        assert_eq!(
            detector.user_agent(),
            Some("Mozilla/5.0 (iPhone; CPU iPhone OS 8_1 like Mac OS X)")
        );
        assert!(detector.plugins().is_none());
        assert!(detector.mime_types().is_none());
        assert_eq!(detector.standalone_mode(), Some(true));
    }

    #[test]
    fn test_absent_user_agent_detects_nothing() {
        let host = HostProfile::builder().global(HostScope::Window, "chrome").build();
        let detector = FeatureDetector::new(host);
        assert_eq!(detector.user_agent(), None);
        assert!(!detector.android().is_detected());
        assert!(!detector.ios().is_detected());
        assert!(!detector.internet_explorer().is_detected());
        assert!(!detector.chrome().is_detected());
        assert!(!detector.opera().is_detected());
    }

    #[test]
    fn test_mp4_profile_selection() {
        let host = HostProfile::builder()
            .video_element(true)
            .can_play("video/mp4; codecs=\"avc1.640028,mp4a.40.2\"", Confidence::Probably)
            .can_play("video/mp4; codecs=\"avc1.4D401E,mp4a.40.2\"", Confidence::Maybe)
            .build();
        let detector = FeatureDetector::new(host);

        assert!(detector.mp4_h264_aac(Some(H264Profile::High40)));
        assert!(!detector.mp4_h264_aac(Some(H264Profile::Main30)));
        assert!(!detector.mp4_h264_aac(None));
        assert!(!detector.mp4_h264_aac(Some(H264Profile::from_name("high99"))));
    }

    #[test]
    fn test_audio_formats() {
        let host = HostProfile::builder()
            .audio_element(true)
            .can_play(media::MIME_MP3, Confidence::Maybe)
            .can_play(media::MIME_WAV_PCM, Confidence::Maybe)
            .can_play(media::MIME_OGG_VORBIS, Confidence::Maybe)
            .can_play(media::MIME_WEBM_OPUS, Confidence::Probably)
            .can_play(media::MIME_M4A_AAC, Confidence::Probably)
            .build();
        let detector = FeatureDetector::new(host);

        assert!(detector.audio_element());
        assert!(!detector.video_element());
        assert!(detector.mp3());
        assert!(detector.wav_pcm());
        assert!(!detector.ogg_vorbis());
        assert!(detector.webm_opus());
        assert!(detector.m4a_aac());
    }

    #[test]
    fn test_video_formats() {
        let host = HostProfile::builder()
            .video_element(true)
            .can_play(media::MIME_WEBM_VP8_VORBIS, Confidence::Probably)
            .can_play(media::MIME_WEBM_VP9_OPUS, Confidence::Maybe)
            .can_play(media::MIME_OGG_THEORA_VORBIS, Confidence::Probably)
            .build();
        let detector = FeatureDetector::new(host);

        assert!(detector.webm_vp8_vorbis());
        assert!(!detector.webm_vp9_opus());
        assert!(detector.ogg_theora_vorbis());
    }

    #[test]
    fn test_prefixed_globals() {
        let host = HostProfile::builder()
            .global(HostScope::DocumentElement, "webkitRequestFullscreen")
            .global(HostScope::Window, "webkitAudioContext")
            .global(HostScope::Window, "WebKitMediaSource")
            .global(HostScope::Window, "MSMediaKeys")
            .global(HostScope::Navigator, "mozGetUserMedia")
            .global(HostScope::Window, "webkitRTCPeerConnection")
            .global(HostScope::Window, "MozWebSocket")
            .build();
        let detector = FeatureDetector::new(host);

        assert!(detector.native_fullscreen());
        assert!(detector.web_audio());
        assert!(detector.media_source_extensions());
        assert!(detector.encrypted_media_extensions());
        assert!(detector.get_user_media());
        assert!(detector.rtc_peer_connection());
        assert!(!detector.rtc_session_description());
        assert!(detector.web_socket());
        assert!(!detector.web_worker());
    }

    #[test]
    fn test_globals_checked_on_the_wrong_scope_are_absent() {
        let host = HostProfile::builder()
            .global(HostScope::Window, "getUserMedia")
            .global(HostScope::Navigator, "requestFullscreen")
            .build();
        let detector = FeatureDetector::new(host);
        assert!(!detector.get_user_media());
        assert!(!detector.native_fullscreen());
    }

    #[test]
    fn test_web_storage_failures_are_contained() {
        let host = HostProfile::builder().storage(StorageBehavior::Available).build();
        let available = FeatureDetector::new(host);
        assert!(available.web_storage());

        let missing =
            FeatureDetector::new(HostProfile::builder().storage(StorageBehavior::Missing).build());
        assert!(!missing.web_storage());

        let throwing =
            FeatureDetector::new(HostProfile::builder().storage(StorageBehavior::Throws).build());
        assert!(!throwing.web_storage());
    }

    #[test]
    fn test_canvas_features() {
        let none = FeatureDetector::new(HostProfile::default());
        assert!(!none.canvas());
        assert!(!none.canvas_text());
        assert!(!none.canvas_blending());
        assert!(!none.canvas_webgl());

        let host = HostProfile::builder().canvas(canvas_with(&["webgl"], &[])).build();
        let full = FeatureDetector::new(host);
        assert!(full.canvas());
        assert!(full.canvas_text());
        assert!(full.canvas_blending());
        assert!(full.canvas_webgl());

        let no_blend = FeatureDetector::new(
            HostProfile::builder()
                .canvas(CanvasProfile { fill_text: false, ..CanvasProfile::default() })
                .build(),
        );
        assert!(no_blend.canvas());
        assert!(!no_blend.canvas_text());
        assert!(!no_blend.canvas_blending());
    }

    #[test]
    fn test_webgl_falls_back_to_experimental_id() {
        let experimental = FeatureDetector::new(
            HostProfile::builder()
                .canvas(canvas_with(&["experimental-webgl"], &["webgl"]))
                .build(),
        );
        assert!(experimental.canvas_webgl());

        let broken = FeatureDetector::new(
            HostProfile::builder()
                .canvas(canvas_with(&[], &["webgl", "experimental-webgl"]))
                .build(),
        );
        assert!(!broken.canvas_webgl());

        let throwing_2d = FeatureDetector::new(
            HostProfile::builder().canvas(canvas_with(&["webgl"], &["2d"])).build(),
        );
        assert!(!throwing_2d.canvas_text());
        assert!(!throwing_2d.canvas_blending());
        assert!(throwing_2d.canvas_webgl());
    }

    #[test]
    fn test_chrome_marker_is_read_live() {
        let ua = "Mozilla/5.0 (Windows NT 6.1) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/41.0.2272.101 Safari/537.36";
        let with_marker = FeatureDetector::new(
            HostProfile::builder().user_agent(ua).global(HostScope::Window, "chrome").build(),
        );
        assert!(with_marker.chrome().is_detected());

        let without_marker = FeatureDetector::new(HostProfile::builder().user_agent(ua).build());
        assert!(!without_marker.chrome().is_detected());
        assert_eq!(without_marker.chrome().version(), None);
    }

    #[test]
    fn test_queries_are_idempotent() {
        let host = HostProfile::builder()
            .user_agent("Mozilla/5.0 (Linux; Android 4.4.2; Nexus 5) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/34.0.1847.114")
            .video_element(true)
            .storage(StorageBehavior::Throws)
            .canvas(canvas_with(&["webgl"], &[]))
            .global(HostScope::Window, "chrome")
            .build();
        let detector = FeatureDetector::new(host);

        assert_eq!(detector.report(), detector.report());
        assert_eq!(detector.flash(), detector.flash());
        assert_eq!(detector.canvas_blending(), detector.canvas_blending());
    }
}
