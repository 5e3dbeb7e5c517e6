//! # MediaLyzer Core
//!
//! The core library for MediaLyzer - a browser capability detector that tells a media
//! player which playback strategy the current host can actually use.
//!
//! ## Overview
//!
//! MediaLyzer answers questions such as:
//!
//! - Can this browser play H.264/AAC in MP4, and at which profile?
//! - Is Flash installed, and which version?
//! - Does this device support HLS or MPEG-DASH in real-world conditions?
//!
//! Answers are derived from the user-agent string, a handful of presence checks on host
//! globals, and the host media element's `canPlayType` oracle. Every query is total: host
//! failures degrade to a "not supported" answer instead of an error.
//!
//! ## Basic Usage
//!
//! ```rust
//! use medialyzer_core::{FeatureDetector, HostProfile};
//!
//! let host = HostProfile::builder()
//!     .user_agent("Mozilla/5.0 (iPhone; CPU iPhone OS 8_1 like Mac OS X) AppleWebKit/600.1.4")
//!     .video_element(true)
//!     .build();
//!
//! let detector = FeatureDetector::new(host);
//! assert!(detector.supports_hls_video());
//! assert_eq!(detector.ios().version().map(|v| v.major), Some(8));
//! ```
//!
//! ## Architecture
//!
//! - [`version`]: version triples and the version-string parsers
//! - [`user_agent`]: user-agent classification (Android, iOS, IE, Chrome, Opera)
//! - [`host`]: the host abstraction, the construction-time snapshot and static host profiles
//! - [`media`]: the `canPlayType` wrapper and the MIME/codec strings it probes
//! - [`plugin`]: Flash detection over the legacy object, plugin list and MIME list
//! - [`detector`]: the public [`FeatureDetector`] surface, streaming predicates and reports
//! - [`error`]: error types for host failures and profile loading
//!
//! ## Platform Support
//!
//! Browser hosts are provided by the `medialyzer-web` crate; `medialyzer-cli` renders reports
//! for JSON host profiles.

pub mod error;
pub mod version;
pub mod user_agent;
pub mod host;
pub mod media;
pub mod plugin;
pub mod detector;

pub use detector::{CapabilityReport, FeatureDetector};
pub use error::{HostError, ProfileError};
pub use host::{HostContextSnapshot, HostEnvironment, HostProfile, HostScope, Probe};
pub use media::{Confidence, H264Profile, MediaKind};
pub use user_agent::{BrowserDetection, BrowserFamily, UserAgentClassification};
pub use plugin::PluginDetection;
pub use version::VersionTriple;
