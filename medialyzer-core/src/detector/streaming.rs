//! Adaptive streaming support in real-world conditions.
//!
//! Feature probing alone misreports HLS and DASH on some browser/OS combinations. UA checks
//! are layered on top of the probes: they either add a known-good positive or carve out a
//! known-bad exclusion, never replace the probe.

use tracing::trace;
use crate::host::HostEnvironment;
use crate::media;
use super::FeatureDetector;

/// Android from which native HLS works.
const HLS_ANDROID_MAJOR: u32 = 4;
/// Android + Chrome combination known to play DASH/H.264 even where MSE probing under-reports.
const DASH_ANDROID_VERSION: (u32, u32) = (4, 2);
const DASH_CHROME_MAJOR: u32 = 34;

impl<H: HostEnvironment> FeatureDetector<H> {
    /// Apple HTTP Live Streaming video (`.m3u8`).
    pub fn supports_hls_video(&self) -> bool {
        if !self.video_element() {
            return false;
        }
        self.hls_by_user_agent() || self.media().can_play(media::MIME_HLS_VIDEO)
    }

    /// Apple HTTP Live Streaming audio (`.m3u`).
    pub fn supports_hls_audio(&self) -> bool {
        if !self.audio_element() {
            return false;
        }
        self.hls_by_user_agent() || self.media().can_play(media::MIME_HLS_AUDIO)
    }

    /// MPEG-DASH with H.264 video (`.mpd`).
    pub fn supports_dash_h264(&self) -> bool {
        if !self.video_element() {
            return false;
        }
        // Opera only plays WebM DASH
        if self.opera().is_detected() {
            trace!("Opera detected, DASH/H.264 excluded");
            return false;
        }
        let (android_major, android_minor) = DASH_ANDROID_VERSION;
        if self.android().version_at_least(android_major, android_minor)
            && self.chrome().major_at_least(DASH_CHROME_MAJOR)
        {
            return true;
        }
        self.media_source_extensions() && self.mp4_h264_aac(None)
    }

    /// MPEG-DASH with WebM video (`.mpd`).
    pub fn supports_dash_webm(&self) -> bool {
        if !self.video_element() || !self.media_source_extensions() {
            return false;
        }
        self.webm_vp9_opus() || self.webm_vp8_vorbis()
    }

    /// iOS and Android 4+ are known to play HLS natively.
    fn hls_by_user_agent(&self) -> bool {
        self.ios().is_detected() || self.android().major_at_least(HLS_ANDROID_MAJOR)
    }
}

#[cfg(test)]
mod tests {
    use crate::host::{HostProfile, HostProfileBuilder, HostScope};
    use crate::media::{
        Confidence, H264Profile, MIME_HLS_AUDIO, MIME_HLS_VIDEO, MIME_WEBM_VP8_VORBIS,
        MIME_WEBM_VP9_OPUS,
    };
    use crate::FeatureDetector;

    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 8_1 like Mac OS X) AppleWebKit/600.1.4 (KHTML, like Gecko) Version/8.0 Mobile/12B411 Safari/600.1.4";
    const ANDROID_23: &str = "Mozilla/5.0 (Linux; U; Android 2.3.6; en-us; Nexus S Build/GRK39F) AppleWebKit/533.1 (KHTML, like Gecko) Version/4.0 Mobile Safari/533.1";
    const ANDROID_44_CHROME: &str = "Mozilla/5.0 (Linux; Android 4.4.2; Nexus 5 Build/KOT49H) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/34.0.1847.114 Mobile Safari/537.36";
    const ANDROID_41_CHROME: &str = "Mozilla/5.0 (Linux; Android 4.1.2; GT-I9300 Build/JZO54K) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/38.0.2125.102 Mobile Safari/537.36";
    const ANDROID_50_CHROME: &str = "Mozilla/5.0 (Linux; Android 5.0; Nexus 5 Build/LRX21O) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/39.0.2171.93 Mobile Safari/537.36";
    const OPERA: &str = "Mozilla/5.0 (Windows NT 6.1) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/40.0.2214.115 Safari/537.36 OPR/27.0.1689.76";
    const FIREFOX: &str = "Mozilla/5.0 (Windows NT 6.1; rv:36.0) Gecko/20100101 Firefox/36.0";

    fn video_host(ua: &str) -> HostProfileBuilder {
        HostProfile::builder().user_agent(ua).video_element(true)
    }

    #[test]
    fn test_hls_video_signals() {
        assert!(FeatureDetector::new(video_host(IPHONE).build()).supports_hls_video());
        assert!(FeatureDetector::new(video_host(ANDROID_44_CHROME).build()).supports_hls_video());
        assert!(!FeatureDetector::new(video_host(ANDROID_23).build()).supports_hls_video());
        assert!(!FeatureDetector::new(video_host(FIREFOX).build()).supports_hls_video());

        let probed = video_host(FIREFOX).can_play(MIME_HLS_VIDEO, Confidence::Maybe).build();
        assert!(FeatureDetector::new(probed).supports_hls_video());
    }

    #[test]
    fn test_hls_requires_element() {
        let host = HostProfile::builder().user_agent(IPHONE).audio_element(true).build();
        let detector = FeatureDetector::new(host);
        assert!(!detector.supports_hls_video());
        assert!(detector.supports_hls_audio());
    }

    #[test]
    fn test_hls_audio_probe() {
        let host = HostProfile::builder()
            .user_agent(FIREFOX)
            .audio_element(true)
            .can_play(MIME_HLS_AUDIO, Confidence::Maybe)
            .build();
        assert!(FeatureDetector::new(host).supports_hls_audio());

        let host = HostProfile::builder()
            .user_agent(FIREFOX)
            .audio_element(true)
            .can_play(MIME_HLS_VIDEO, Confidence::Probably)
            .build();
        assert!(!FeatureDetector::new(host).supports_hls_audio());
    }

    #[test]
    fn test_dash_h264_opera_exclusion() {
        let host = video_host(OPERA)
            .global(HostScope::Window, "chrome")
            .global(HostScope::Window, "MediaSource")
            .can_play(H264Profile::Baseline.mp4_mime(), Confidence::Probably)
            .build();
        let detector = FeatureDetector::new(host);
        assert!(detector.media_source_extensions());
        assert!(detector.mp4_h264_aac(None));
        assert!(!detector.supports_dash_h264());
    }

    #[test]
    fn test_dash_h264_android_chrome_override() {
        let chrome_host = |ua: &str| video_host(ua).global(HostScope::Window, "chrome").build();

        assert!(FeatureDetector::new(chrome_host(ANDROID_44_CHROME)).supports_dash_h264());
        assert!(FeatureDetector::new(chrome_host(ANDROID_50_CHROME)).supports_dash_h264());
        assert!(!FeatureDetector::new(chrome_host(ANDROID_41_CHROME)).supports_dash_h264());

        // Without the marker it is not Chrome, and the generic probes decide
        let no_marker = video_host(ANDROID_44_CHROME).build();
        assert!(!FeatureDetector::new(no_marker).supports_dash_h264());
    }

    #[test]
    fn test_dash_h264_generic_detection() {
        let host = video_host(FIREFOX)
            .global(HostScope::Window, "MediaSource")
            .can_play(H264Profile::Baseline.mp4_mime(), Confidence::Probably)
            .build();
        assert!(FeatureDetector::new(host).supports_dash_h264());

        let no_mse = video_host(FIREFOX)
            .can_play(H264Profile::Baseline.mp4_mime(), Confidence::Probably)
            .build();
        assert!(!FeatureDetector::new(no_mse).supports_dash_h264());

        let maybe_only = video_host(FIREFOX)
            .global(HostScope::Window, "MediaSource")
            .can_play(H264Profile::Baseline.mp4_mime(), Confidence::Maybe)
            .build();
        assert!(!FeatureDetector::new(maybe_only).supports_dash_h264());
    }

    #[test]
    fn test_dash_webm() {
        let vp9 = video_host(OPERA)
            .global(HostScope::Window, "MediaSource")
            .can_play(MIME_WEBM_VP9_OPUS, Confidence::Probably)
            .build();
        assert!(FeatureDetector::new(vp9).supports_dash_webm());

        let vp8 = video_host(FIREFOX)
            .global(HostScope::Window, "WebKitMediaSource")
            .can_play(MIME_WEBM_VP8_VORBIS, Confidence::Probably)
            .build();
        assert!(FeatureDetector::new(vp8).supports_dash_webm());

        let no_mse = video_host(FIREFOX)
            .can_play(MIME_WEBM_VP9_OPUS, Confidence::Probably)
            .build();
        assert!(!FeatureDetector::new(no_mse).supports_dash_webm());
    }
}
