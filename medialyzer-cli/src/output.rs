use std::io::{self, Write};

use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use medialyzer_core::detector::{FeatureFlags, MediaFormats, StreamingSupport};
use medialyzer_core::{BrowserDetection, CapabilityReport, UserAgentClassification};

const BOX_WIDTH: usize = 50;

/// One line of a box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub label: String,
    pub value: String,
    pub supported: bool,
}

impl Row {
    fn flag(label: &str, supported: bool) -> Self {
        Self {
            label: label.to_string(),
            value: if supported { "yes" } else { "no" }.to_string(),
            supported,
        }
    }

    fn detection(label: &str, detection: &BrowserDetection) -> Self {
        let value = match (detection.is_detected(), detection.version()) {
            (false, _) => "not detected".to_string(),
            (true, Some(version)) => version.to_string(),
            (true, None) => "detected (version unknown)".to_string(),
        };
        Self {
            label: label.to_string(),
            value,
            supported: detection.is_detected(),
        }
    }

    fn text(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
            supported: true,
        }
    }
}

pub struct Section {
    pub title: &'static str,
    pub rows: Vec<Row>,
}

pub fn classification_rows(classification: &UserAgentClassification) -> Vec<Row> {
    let family = match classification.family_version() {
        Some(version) => format!("{} {}", classification.family, version),
        None => classification.family.to_string(),
    };
    vec![
        Row::text("Family", family),
        Row::detection("Android", &classification.android),
        Row::detection("iOS", &classification.ios),
        Row::detection("Internet Explorer", &classification.internet_explorer),
        Row::detection("Chrome", &classification.chrome),
        Row::detection("Opera", &classification.opera),
    ]
}

pub fn report_sections(report: &CapabilityReport) -> Vec<Section> {
    let context = &report.context;
    let context_rows = vec![
        Row::text("User agent", context.user_agent.clone().unwrap_or_else(|| "none".to_string())),
        Row::text("Plugins", count(context.plugin_count)),
        Row::text("MIME types", count(context.mime_type_count)),
        Row::flag("Standalone", context.standalone == Some(true)),
    ];

    vec![
        Section { title: "Host Context", rows: context_rows },
        Section { title: "User Agent", rows: classification_rows(&report.user_agent) },
        Section { title: "Media Formats", rows: media_rows(&report.media) },
        Section { title: "Host Features", rows: feature_rows(&report.features) },
        Section { title: "Streaming", rows: streaming_rows(&report.streaming) },
        Section { title: "Plugins", rows: vec![Row::detection("Flash", &report.flash)] },
    ]
}

fn media_rows(media: &MediaFormats) -> Vec<Row> {
    let mut rows = vec![
        Row::flag("<video>", media.video_element),
        Row::flag("<audio>", media.audio_element),
    ];
    rows.extend(media.mp4_h264_aac.iter().map(|(profile, supported)| {
        Row::flag(&format!("MP4 H.264/AAC {}", profile), *supported)
    }));
    rows.extend([
        Row::flag("WebM VP8/Vorbis", media.webm_vp8_vorbis),
        Row::flag("WebM VP9/Opus", media.webm_vp9_opus),
        Row::flag("Ogg Theora/Vorbis", media.ogg_theora_vorbis),
        Row::flag("M4A AAC", media.m4a_aac),
        Row::flag("MP3", media.mp3),
        Row::flag("Ogg Vorbis", media.ogg_vorbis),
        Row::flag("WebM Opus", media.webm_opus),
        Row::flag("WAV PCM", media.wav_pcm),
    ]);
    rows
}

fn feature_rows(features: &FeatureFlags) -> Vec<Row> {
    vec![
        Row::flag("Native fullscreen", features.native_fullscreen),
        Row::flag("Web Audio", features.web_audio),
        Row::flag("Media Source", features.media_source_extensions),
        Row::flag("Encrypted Media", features.encrypted_media_extensions),
        Row::flag("getUserMedia", features.get_user_media),
        Row::flag("RTCPeerConnection", features.rtc_peer_connection),
        Row::flag("RTCSessionDescription", features.rtc_session_description),
        Row::flag("WebSocket", features.web_socket),
        Row::flag("Web Worker", features.web_worker),
        Row::flag("Web Storage", features.web_storage),
        Row::flag("Canvas", features.canvas),
        Row::flag("Canvas text", features.canvas_text),
        Row::flag("Canvas blending", features.canvas_blending),
        Row::flag("WebGL", features.canvas_webgl),
    ]
}

fn streaming_rows(streaming: &StreamingSupport) -> Vec<Row> {
    vec![
        Row::flag("HLS video", streaming.hls_video),
        Row::flag("HLS audio", streaming.hls_audio),
        Row::flag("DASH H.264", streaming.dash_h264),
        Row::flag("DASH WebM", streaming.dash_webm),
    ]
}

fn count(value: Option<usize>) -> String {
    value.map_or_else(|| "none".to_string(), |n| n.to_string())
}

pub fn print_colored<W: Write>(out: &mut W, text: &str, color: Color) -> io::Result<()> {
    queue!(out, SetForegroundColor(color), Print(text), ResetColor)?;
    out.flush()
}

pub fn print_box<W: Write>(out: &mut W, title: &str, rows: &[Row]) -> io::Result<()> {
    let rule = "─".repeat(BOX_WIDTH.saturating_sub(title.chars().count() + 4));
    queue!(out, SetForegroundColor(Color::Cyan), Print(format!("┌─ {} {}\n", title, rule)))?;

    for row in rows {
        let (marker, color) = if row.supported {
            ("✅ ", Color::Green)
        } else {
            ("⚠️  ", Color::Yellow)
        };
        queue!(
            out,
            SetForegroundColor(Color::White),
            Print("│ "),
            SetForegroundColor(color),
            Print(marker),
            SetForegroundColor(Color::White),
            Print(format!("{}: ", row.label)),
            SetForegroundColor(Color::Cyan),
            Print(format!("{}\n", row.value)),
        )?;
    }

    queue!(
        out,
        SetForegroundColor(Color::Cyan),
        Print(format!("└{}\n", "─".repeat(BOX_WIDTH))),
        ResetColor
    )?;
    out.flush()
}
