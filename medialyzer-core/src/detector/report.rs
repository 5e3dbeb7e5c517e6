//! Full capability report, one snapshot of every public query.

use std::collections::BTreeMap;
use serde::Serialize;
use crate::host::HostEnvironment;
use crate::media::H264Profile;
use crate::plugin::PluginDetection;
use crate::user_agent::UserAgentClassification;
use super::FeatureDetector;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextSummary {
    pub user_agent: Option<String>,
    pub plugin_count: Option<usize>,
    pub mime_type_count: Option<usize>,
    pub standalone: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaFormats {
    pub video_element: bool,
    pub audio_element: bool,
    /// MP4/H.264/AAC support keyed by H.264 profile name.
    pub mp4_h264_aac: BTreeMap<String, bool>,
    pub webm_vp8_vorbis: bool,
    pub webm_vp9_opus: bool,
    pub ogg_theora_vorbis: bool,
    pub m4a_aac: bool,
    pub mp3: bool,
    pub ogg_vorbis: bool,
    pub webm_opus: bool,
    pub wav_pcm: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureFlags {
    pub native_fullscreen: bool,
    pub web_audio: bool,
    pub media_source_extensions: bool,
    pub encrypted_media_extensions: bool,
    pub get_user_media: bool,
    pub rtc_peer_connection: bool,
    pub rtc_session_description: bool,
    pub web_socket: bool,
    pub web_worker: bool,
    pub web_storage: bool,
    pub canvas: bool,
    pub canvas_text: bool,
    pub canvas_blending: bool,
    pub canvas_webgl: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamingSupport {
    pub hls_video: bool,
    pub hls_audio: bool,
    pub dash_h264: bool,
    pub dash_webm: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityReport {
    pub context: ContextSummary,
    pub user_agent: UserAgentClassification,
    pub media: MediaFormats,
    pub features: FeatureFlags,
    pub streaming: StreamingSupport,
    pub flash: PluginDetection,
}

impl<H: HostEnvironment> FeatureDetector<H> {
    /// Evaluates every query once.
    pub fn report(&self) -> CapabilityReport {
        CapabilityReport {
            context: ContextSummary {
                user_agent: self.user_agent().map(str::to_string),
                plugin_count: self.plugins().map(<[_]>::len),
                mime_type_count: self.mime_types().map(<[_]>::len),
                standalone: self.standalone_mode(),
            },
            user_agent: self.classification(),
            media: MediaFormats {
                video_element: self.video_element(),
                audio_element: self.audio_element(),
                mp4_h264_aac: H264Profile::ALL
                    .iter()
                    .map(|profile| (profile.name().to_string(), self.mp4_h264_aac(Some(*profile))))
                    .collect(),
                webm_vp8_vorbis: self.webm_vp8_vorbis(),
                webm_vp9_opus: self.webm_vp9_opus(),
                ogg_theora_vorbis: self.ogg_theora_vorbis(),
                m4a_aac: self.m4a_aac(),
                mp3: self.mp3(),
                ogg_vorbis: self.ogg_vorbis(),
                webm_opus: self.webm_opus(),
                wav_pcm: self.wav_pcm(),
            },
            features: FeatureFlags {
                native_fullscreen: self.native_fullscreen(),
                web_audio: self.web_audio(),
                media_source_extensions: self.media_source_extensions(),
                encrypted_media_extensions: self.encrypted_media_extensions(),
                get_user_media: self.get_user_media(),
                rtc_peer_connection: self.rtc_peer_connection(),
                rtc_session_description: self.rtc_session_description(),
                web_socket: self.web_socket(),
                web_worker: self.web_worker(),
                web_storage: self.web_storage(),
                canvas: self.canvas(),
                canvas_text: self.canvas_text(),
                canvas_blending: self.canvas_blending(),
                canvas_webgl: self.canvas_webgl(),
            },
            streaming: StreamingSupport {
                hls_video: self.supports_hls_video(),
                hls_audio: self.supports_hls_audio(),
                dash_h264: self.supports_dash_h264(),
                dash_webm: self.supports_dash_webm(),
            },
            flash: self.flash(),
        }
    }
}
