//! Session descriptor: what kind of session this window shows, who the
//! target is, and the per-session configuration the user can edit.

use serde::{Deserialize, Serialize};

use crate::capability::{Features, VideoEncoding};

// ── SessionType ──────────────────────────────────────────────────

/// Whether the local user may control the remote side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    /// Full control: input and clipboard are forwarded.
    Manage,
    /// Watch only.
    View,
}

impl SessionType {
    /// Human-readable label used in the window title.
    pub fn label(self) -> &'static str {
        match self {
            SessionType::Manage => "Desktop Manage",
            SessionType::View => "Desktop View",
        }
    }
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionType::Manage => write!(f, "manage"),
            SessionType::View => write!(f, "view"),
        }
    }
}

// ── SessionConfig ────────────────────────────────────────────────

/// User-editable session settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Encoding the user wants the host to use.
    pub video_encoding: VideoEncoding,
    /// Features the user wants enabled.
    pub features: Features,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            video_encoding: VideoEncoding::default(),
            features: Features::CLIPBOARD | Features::CURSOR_SHAPE,
        }
    }
}

// ── SessionDescriptor ────────────────────────────────────────────

/// The session the controller is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    pub session_type: SessionType,
    /// Friendly name of the target computer; may be empty.
    pub name: String,
    /// Network address of the target computer.
    pub address: String,
    pub config: SessionConfig,
}

impl SessionDescriptor {
    pub fn new(
        session_type: SessionType,
        name: impl Into<String>,
        address: impl Into<String>,
        config: SessionConfig,
    ) -> Self {
        Self {
            session_type,
            name: name.into(),
            address: address.into(),
            config,
        }
    }

    /// The name to show the user, falling back to the address.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.address
        } else {
            &self.name
        }
    }

    /// `"<display name> - Desktop Manage"` and friends.
    pub fn window_title(&self) -> String {
        format!("{} - {}", self.display_name(), self.session_type.label())
    }

    pub fn is_manage(&self) -> bool {
        self.session_type == SessionType::Manage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_address() {
        let mut desc = SessionDescriptor::new(
            SessionType::View,
            "",
            "10.0.0.7",
            SessionConfig::default(),
        );
        assert_eq!(desc.display_name(), "10.0.0.7");

        desc.name = "build-box".into();
        assert_eq!(desc.display_name(), "build-box");
    }

    #[test]
    fn window_title_names_session_type() {
        let desc = SessionDescriptor::new(
            SessionType::Manage,
            "office",
            "10.0.0.7",
            SessionConfig::default(),
        );
        assert_eq!(desc.window_title(), "office - Desktop Manage");
    }

    #[test]
    fn default_config_requests_clipboard() {
        let cfg = SessionConfig::default();
        assert!(cfg.features.contains(Features::CLIPBOARD));
        assert_eq!(cfg.video_encoding, VideoEncoding::Vp8);
    }
}
