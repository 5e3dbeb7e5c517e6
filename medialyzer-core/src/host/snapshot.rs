//! Construction-time capture of the host's navigator data.

use serde::Serialize;
use super::{HostEnvironment, MimeTypeInfo, PluginInfo};

/// Navigator data captured once when a detector is built and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct HostContextSnapshot {
    user_agent: Option<String>,
    plugins: Option<Vec<PluginInfo>>,
    mime_types: Option<Vec<MimeTypeInfo>>,
    standalone: Option<bool>,
}

impl HostContextSnapshot {
    /// Reads the host.
    ///
    /// Empty plugin and MIME lists are recorded as absent, and `standalone` is only
    /// recorded when the host reports it as set.
    pub fn capture<H: HostEnvironment + ?Sized>(host: &H) -> Self {
        Self {
            user_agent: host.user_agent(),
            plugins: host.plugins().filter(|list| !list.is_empty()),
            mime_types: host.mime_types().filter(|list| !list.is_empty()),
            standalone: host.standalone().filter(|standalone| *standalone),
        }
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    pub fn plugins(&self) -> Option<&[PluginInfo]> {
        self.plugins.as_deref()
    }

    pub fn mime_types(&self) -> Option<&[MimeTypeInfo]> {
        self.mime_types.as_deref()
    }

    pub fn standalone(&self) -> Option<bool> {
        self.standalone
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostProfile;

    #[test]
    fn test_capture_normalizes_empty_lists() {
        let host = HostProfile::builder()
            .user_agent("Mozilla/5.0")
            .plugins(Vec::new())
            .mime_types(Vec::new())
            .standalone(false)
            .build();

        let snapshot = HostContextSnapshot::capture(&host);
        assert_eq!(snapshot.user_agent(), Some("Mozilla/5.0"));
        assert!(snapshot.plugins().is_none());
        assert!(snapshot.mime_types().is_none());
        assert_eq!(snapshot.standalone(), None);
    }

    #[test]
    fn test_capture_keeps_populated_lists() {
        let host = HostProfile::builder()
            .plugin(PluginInfo::new("Shockwave Flash"))
            .mime_type(MimeTypeInfo::new("application/x-shockwave-flash", None))
            .standalone(true)
            .build();

        let snapshot = HostContextSnapshot::capture(&host);
        assert_eq!(snapshot.user_agent(), None);
        assert_eq!(snapshot.plugins().map(|p| p.len()), Some(1));
        assert_eq!(snapshot.mime_types().map(|m| m.len()), Some(1));
        assert_eq!(snapshot.standalone(), Some(true));
    }
}
