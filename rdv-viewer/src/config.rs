//! Viewer configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use rdv_core::{
    Features, KeySequence, Rect, SessionConfig, SessionDescriptor, SessionType, Size,
    VideoEncoding,
};

/// Top-level configuration for the headless viewer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Which session to attach to.
    pub session: SessionSection,
    /// Simulated screen and window chrome.
    pub display: DisplaySection,
    /// Input forwarding settings.
    pub input: InputSection,
    /// How the simulated settings dialog answers.
    pub dialog: DialogSection,
    /// Logging.
    pub logging: LoggingSection,
}

/// Session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// "manage" or "view".
    pub session_type: SessionType,
    /// Friendly computer name; the address is shown when empty.
    pub name: String,
    /// Computer address.
    pub address: String,
    /// Initial session configuration.
    pub config: SessionConfig,
}

/// Display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    /// Usable screen width (task bars excluded).
    pub screen_width: i32,
    /// Usable screen height.
    pub screen_height: i32,
    /// Initial client area width.
    pub window_width: i32,
    /// Initial client area height.
    pub window_height: i32,
    /// Horizontal decoration (both borders together).
    pub frame_width: i32,
    /// Vertical decoration (title bar plus bottom border).
    pub frame_height: i32,
    /// Control panel width.
    pub panel_width: i32,
    /// Control panel height.
    pub panel_height: i32,
}

/// Input forwarding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSection {
    /// Forward pointer and wheel events.
    pub forward_pointer: bool,
    /// Forward keyboard events.
    pub forward_keyboard: bool,
    /// Chord sent by the panel's key-sequence button, e.g. "ctrl+alt+delete".
    pub key_sequence: String,
}

/// Settings dialog behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogSection {
    /// Accept (true) or cancel (false) every dialog.
    pub accept: bool,
    /// Encoding the user picks, if any.
    pub video_encoding: Option<VideoEncoding>,
    /// Feature set the user picks, if any.
    pub features: Option<Features>,
}

/// Logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level.
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            session_type: SessionType::Manage,
            name: String::new(),
            address: "127.0.0.1".into(),
            config: SessionConfig::default(),
        }
    }
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            screen_width: 1920,
            screen_height: 1040,
            window_width: 800,
            window_height: 600,
            frame_width: 16,
            frame_height: 39,
            panel_width: 320,
            panel_height: 32,
        }
    }
}

impl Default for InputSection {
    fn default() -> Self {
        Self {
            forward_pointer: true,
            forward_keyboard: true,
            key_sequence: "ctrl+alt+delete".into(),
        }
    }
}

impl Default for DialogSection {
    fn default() -> Self {
        Self {
            accept: true,
            video_encoding: None,
            features: None,
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

// ── Derived values ───────────────────────────────────────────────

impl SessionSection {
    pub fn descriptor(&self) -> SessionDescriptor {
        SessionDescriptor::new(
            self.session_type,
            self.name.clone(),
            self.address.clone(),
            self.config.clone(),
        )
    }
}

impl DisplaySection {
    pub fn available(&self) -> Rect {
        Rect::new(0, 0, self.screen_width, self.screen_height)
    }

    pub fn window_size(&self) -> Size {
        Size::new(self.window_width, self.window_height)
    }

    pub fn frame_overhead(&self) -> Size {
        Size::new(self.frame_width, self.frame_height)
    }

    pub fn panel_size(&self) -> Size {
        Size::new(self.panel_width, self.panel_height)
    }
}

impl InputSection {
    /// The configured chord, or Ctrl+Alt+Delete when it does not parse.
    pub fn key_sequence(&self) -> KeySequence {
        self.key_sequence.parse().unwrap_or_else(|e| {
            tracing::warn!("{e}; using ctrl+alt+delete");
            KeySequence::default()
        })
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl ViewerConfig {
    /// Load from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => {
                tracing::info!("no config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Default configuration as pretty TOML.
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&Self::default())
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let text = ViewerConfig::default_toml().unwrap();
        assert!(text.contains("[session]"));
        assert!(text.contains("screen_width"));
        assert!(text.contains("key_sequence"));
    }

    #[test]
    fn roundtrip_config() {
        let text = ViewerConfig::default_toml().unwrap();
        let parsed: ViewerConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.display.screen_width, 1920);
        assert_eq!(parsed.session.session_type, SessionType::Manage);
        assert_eq!(parsed.session.config, SessionConfig::default());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let parsed: ViewerConfig = toml::from_str(
            r#"
            [session]
            session_type = "view"
            name = "lab-7"

            [dialog]
            accept = false
            video_encoding = "zlib"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.session.session_type, SessionType::View);
        assert_eq!(parsed.session.address, "127.0.0.1");
        assert!(!parsed.dialog.accept);
        assert_eq!(parsed.dialog.video_encoding, Some(VideoEncoding::Zlib));
        assert_eq!(parsed.logging.level, "info");
        assert_eq!(parsed.session.descriptor().window_title(), "lab-7 - Desktop View");
    }

    #[test]
    fn bad_key_sequence_falls_back() {
        let input = InputSection {
            key_sequence: "ctrl+nope".into(),
            ..Default::default()
        };
        assert_eq!(input.key_sequence(), KeySequence::ctrl_alt_delete());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let cfg = ViewerConfig::load(Path::new("/nonexistent/rdv-viewer.toml"));
        assert_eq!(cfg.display.window_size(), Size::new(800, 600));
    }
}
