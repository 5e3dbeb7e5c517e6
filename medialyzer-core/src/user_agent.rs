//! User-agent classification.
//!
//! Several engines share UA substrings (Opera carries `Chrome/`, Android WebViews carry
//! `AppleWebKit` and `Android`), so the exclusions are explicit preconditions rather than
//! one combined pattern. Every function re-derives its answer from the string it is given.

use std::fmt;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::trace;
use crate::version::VersionTriple;

macro_rules! ua_pattern {
    ($name:ident, $re:expr) => {
        static $name: Lazy<Regex> =
            Lazy::new(|| Regex::new($re).expect("valid user-agent pattern"));
    };
}

ua_pattern!(ANDROID, r"(?i)android");
ua_pattern!(ANDROID_VERSION, r"(?i)android\s([0-9]+)\.([0-9]+)\.?([0-9]+)?");
ua_pattern!(IOS, r"(?i)(ipad|iphone|ipod|apple tv)");
ua_pattern!(IOS_VERSION, r"(?i)os\s([0-9]+)_([0-9]+)_?([0-9]+)?");
ua_pattern!(IE, r"(?i)(msie|trident)");
ua_pattern!(MSIE, r"(?i)msie");
// Extraction is case-sensitive; a lowercase "msie" still detects IE but yields no version.
ua_pattern!(MSIE_VERSION, r"MSIE ([0-9]+)[.0-9]*");
ua_pattern!(WEBKIT_MOZILLA, r"(?i)mozilla/5\.0");
ua_pattern!(WEBKIT, r"(?i)applewebkit");
ua_pattern!(CHROME, r"(?i)chrome");
ua_pattern!(CHROME_IMPERSONATOR, r"(?i)(opr|opera)");
ua_pattern!(CHROME_VERSION, r"(?i)chrome/([0-9]+)\.([0-9]+)\.?([0-9]+)?");
ua_pattern!(OPERA, r"(?i)(opr|opios)");
ua_pattern!(OPERA_VERSION, r"(?i)opr/([0-9]+)\.([0-9]+)\.?([0-9]+)?");

/// Version reported for IE when only the `Trident` token is present (IE11 dropped `MSIE`).
const IE11_VERSION: VersionTriple = VersionTriple::new(11, 0, 0);

/// Outcome of one browser/OS detector.
///
/// A version is only ever carried by a positive detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BrowserDetection {
    detected: bool,
    version: Option<VersionTriple>,
}

impl BrowserDetection {
    pub const fn not_detected() -> Self {
        Self { detected: false, version: None }
    }

    pub const fn detected(version: Option<VersionTriple>) -> Self {
        Self { detected: true, version }
    }

    pub fn is_detected(&self) -> bool {
        self.detected
    }

    pub fn version(&self) -> Option<VersionTriple> {
        self.version
    }

    /// True when detected with a known major version of at least `major`.
    pub fn major_at_least(&self, major: u32) -> bool {
        self.version.map_or(false, |v| v.major >= major)
    }

    /// True when detected with a known version of at least `major.minor`.
    pub fn version_at_least(&self, major: u32, minor: u32) -> bool {
        self.version.map_or(false, |v| v.at_least(major, minor))
    }
}

/// Detects Android and its version from `android X.Y[.Z]`.
pub fn detect_android(ua: &str) -> BrowserDetection {
    if !ANDROID.is_match(ua) {
        return BrowserDetection::not_detected();
    }
    let version = ANDROID_VERSION
        .captures(ua)
        .and_then(|caps| VersionTriple::from_captures(&caps));
    BrowserDetection::detected(version)
}

/// Detects iOS devices (including Apple TV). Apple writes the version with underscores,
/// e.g. `OS 8_1_2`.
pub fn detect_ios(ua: &str) -> BrowserDetection {
    if !IOS.is_match(ua) {
        return BrowserDetection::not_detected();
    }
    let version = IOS_VERSION
        .captures(ua)
        .and_then(|caps| VersionTriple::from_captures(&caps));
    BrowserDetection::detected(version)
}

/// Detects Internet Explorer.
///
/// The `MSIE` version is read as a float and floor-truncated, so minor and patch are always
/// 0. A UA with `Trident` but no `MSIE` is IE11.
pub fn detect_internet_explorer(ua: &str) -> BrowserDetection {
    if !IE.is_match(ua) {
        return BrowserDetection::not_detected();
    }
    if !MSIE.is_match(ua) {
        return BrowserDetection::detected(Some(IE11_VERSION));
    }
    let version = MSIE_VERSION
        .captures(ua)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .map(|major| VersionTriple::new(major, 0, 0));
    BrowserDetection::detected(version)
}

/// Detects the stock Android browser / WebView: an Android WebKit UA without a `Chrome`
/// token.
pub fn is_native_android_browser(ua: &str) -> bool {
    detect_android(ua).is_detected()
        && WEBKIT_MOZILLA.is_match(ua)
        && WEBKIT.is_match(ua)
        && !CHROME.is_match(ua)
}

/// Detects Chrome.
///
/// Needs both a `Chrome` token and the host's `window.chrome` marker (`has_chrome_global`).
/// Opera sets the same marker, so an `OPR`/`Opera` token vetoes the detection.
pub fn detect_chrome(ua: &str, has_chrome_global: bool) -> BrowserDetection {
    if is_native_android_browser(ua) {
        trace!("native Android browser, not Chrome");
        return BrowserDetection::not_detected();
    }
    if !has_chrome_global || !CHROME.is_match(ua) || CHROME_IMPERSONATOR.is_match(ua) {
        return BrowserDetection::not_detected();
    }
    let version = CHROME_VERSION
        .captures(ua)
        .and_then(|caps| VersionTriple::from_captures(&caps));
    BrowserDetection::detected(version)
}

/// Detects Opera 15+ on desktop (`OPR`) and on iOS (`OPiOS`). iOS builds usually carry no
/// `OPR/` version.
pub fn detect_opera(ua: &str) -> BrowserDetection {
    if !OPERA.is_match(ua) {
        return BrowserDetection::not_detected();
    }
    let version = OPERA_VERSION
        .captures(ua)
        .and_then(|caps| VersionTriple::from_captures(&caps));
    BrowserDetection::detected(version)
}

/// Primary browser family of a UA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BrowserFamily {
    Opera,
    Chrome,
    InternetExplorer,
    Ios,
    Android,
    Unknown,
}

impl fmt::Display for BrowserFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserFamily::Opera => write!(f, "Opera"),
            BrowserFamily::Chrome => write!(f, "Chrome"),
            BrowserFamily::InternetExplorer => write!(f, "Internet Explorer"),
            BrowserFamily::Ios => write!(f, "iOS"),
            BrowserFamily::Android => write!(f, "Android"),
            BrowserFamily::Unknown => write!(f, "Unknown"),
        }
    }
}

/// All detector outcomes for one UA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UserAgentClassification {
    pub family: BrowserFamily,
    pub android: BrowserDetection,
    pub ios: BrowserDetection,
    pub internet_explorer: BrowserDetection,
    pub chrome: BrowserDetection,
    pub opera: BrowserDetection,
}

impl UserAgentClassification {
    /// Version of the primary family, if known.
    pub fn family_version(&self) -> Option<VersionTriple> {
        match self.family {
            BrowserFamily::Opera => self.opera.version(),
            BrowserFamily::Chrome => self.chrome.version(),
            BrowserFamily::InternetExplorer => self.internet_explorer.version(),
            BrowserFamily::Ios => self.ios.version(),
            BrowserFamily::Android => self.android.version(),
            BrowserFamily::Unknown => None,
        }
    }
}

/// Runs every detector and picks the primary family.
///
/// Browsers win over operating systems, and Opera is checked before Chrome because it
/// impersonates Chrome.
pub fn classify(ua: &str, has_chrome_global: bool) -> UserAgentClassification {
    let android = detect_android(ua);
    let ios = detect_ios(ua);
    let internet_explorer = detect_internet_explorer(ua);
    let chrome = detect_chrome(ua, has_chrome_global);
    let opera = detect_opera(ua);

    let family = if opera.is_detected() {
        BrowserFamily::Opera
    } else if chrome.is_detected() {
        BrowserFamily::Chrome
    } else if internet_explorer.is_detected() {
        BrowserFamily::InternetExplorer
    } else if ios.is_detected() {
        BrowserFamily::Ios
    } else if android.is_detected() {
        BrowserFamily::Android
    } else {
        BrowserFamily::Unknown
    };

    UserAgentClassification {
        family,
        android,
        ios,
        internet_explorer,
        chrome,
        opera,
    }
}
