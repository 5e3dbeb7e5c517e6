//! Wrapper over the host media elements' `canPlayType` oracle, and the MIME/codec strings
//! probed through it.
//!
//! Codec identifiers are standardized externally; the strings below are passed to the host
//! byte-for-byte.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use tracing::trace;
use crate::host::HostEnvironment;

pub const MIME_WEBM_VP8_VORBIS: &str = "video/webm; codecs=\"vp8, vorbis\"";
pub const MIME_WEBM_VP9_OPUS: &str = "video/webm; codecs=\"vp9, opus\"";
pub const MIME_OGG_THEORA_VORBIS: &str = "video/ogg; codecs=\"theora, vorbis\"";
pub const MIME_M4A_AAC: &str = "audio/mp4; codecs=\"mp4a.40.2\"";
pub const MIME_MP3: &str = "audio/mpeg";
pub const MIME_OGG_VORBIS: &str = "audio/ogg; codecs=\"vorbis\"";
pub const MIME_WEBM_OPUS: &str = "audio/webm; codecs=\"opus\"";
pub const MIME_WAV_PCM: &str = "audio/wav";
pub const MIME_HLS_VIDEO: &str = "application/vnd.apple.mpegurl";
pub const MIME_HLS_AUDIO: &str = "audio/mpegurl";

const AAC_LC_CODEC: &str = "mp4a.40.2";

/// Which media element answers a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    /// `audio/*` types go to the audio element, everything else to the video element.
    pub fn for_mime(mime: &str) -> Self {
        if mime.starts_with("audio/") {
            MediaKind::Audio
        } else {
            MediaKind::Video
        }
    }

    pub fn tag_name(&self) -> &'static str {
        match self {
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
        }
    }
}

/// The three-valued answer of `canPlayType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Confidence {
    #[default]
    #[serde(rename = "")]
    Empty,
    #[serde(rename = "maybe")]
    Maybe,
    #[serde(rename = "probably")]
    Probably,
}

impl Confidence {
    /// Maps a raw host answer. Anything unrecognised counts as no support.
    pub fn from_host_str(answer: &str) -> Self {
        match answer {
            "probably" => Confidence::Probably,
            "maybe" => Confidence::Maybe,
            _ => Confidence::Empty,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Empty => "",
            Confidence::Maybe => "maybe",
            Confidence::Probably => "probably",
        }
    }

    /// Any non-empty answer.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Confidence::Empty)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// H.264 profiles selectable for the MP4/H.264/AAC probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum H264Profile {
    #[default]
    Baseline,
    Main30,
    High30,
    High40,
    High50,
}

impl H264Profile {
    pub const ALL: [H264Profile; 5] = [
        H264Profile::Baseline,
        H264Profile::Main30,
        H264Profile::High30,
        H264Profile::High40,
        H264Profile::High50,
    ];

    /// Resolves a profile name; unrecognised names fall back to baseline.
    pub fn from_name(name: &str) -> Self {
        match name {
            "main30" => H264Profile::Main30,
            "high30" => H264Profile::High30,
            "high40" => H264Profile::High40,
            "high50" => H264Profile::High50,
            _ => H264Profile::Baseline,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            H264Profile::Baseline => "baseline",
            H264Profile::Main30 => "main30",
            H264Profile::High30 => "high30",
            H264Profile::High40 => "high40",
            H264Profile::High50 => "high50",
        }
    }

    /// RFC 6381 codec identifier of the profile.
    pub fn codec(&self) -> &'static str {
        match self {
            H264Profile::Baseline => "avc1.42E01E",
            H264Profile::Main30 => "avc1.4D401E",
            H264Profile::High30 => "avc1.64001E",
            H264Profile::High40 => "avc1.640028",
            H264Profile::High50 => "avc1.640032",
        }
    }

    /// MP4 MIME type with this profile and AAC-LC audio.
    pub fn mp4_mime(&self) -> String {
        format!("video/mp4; codecs=\"{},{}\"", self.codec(), AAC_LC_CODEC)
    }
}

impl FromStr for H264Profile {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl fmt::Display for H264Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Uniform two-mode contract over the host's `canPlayType`.
pub struct MediaProbe<'h, H: ?Sized> {
    host: &'h H,
}

impl<'h, H: HostEnvironment + ?Sized> MediaProbe<'h, H> {
    pub fn new(host: &'h H) -> Self {
        Self { host }
    }

    /// Loose mode: any non-empty confidence.
    pub fn can_play(&self, mime: &str) -> bool {
        self.answer(mime).map_or(false, |confidence| confidence.is_truthy())
    }

    /// Strict mode: the host must answer exactly `expected`.
    pub fn can_play_exactly(&self, mime: &str, expected: Confidence) -> bool {
        self.answer(mime).map_or(false, |confidence| {
            confidence.is_truthy() && confidence == expected
        })
    }

    /// Dispatches to [`can_play`](Self::can_play) or
    /// [`can_play_exactly`](Self::can_play_exactly).
    pub fn check(&self, mime: &str, exactly: Option<Confidence>) -> bool {
        match exactly {
            Some(expected) => self.can_play_exactly(mime, expected),
            None => self.can_play(mime),
        }
    }

    fn answer(&self, mime: &str) -> Option<Confidence> {
        let kind = MediaKind::for_mime(mime);
        let answer = self.host.can_play_type(kind, mime);
        trace!(element = kind.tag_name(), mime, answer = ?answer, "canPlayType");
        answer
    }
}
