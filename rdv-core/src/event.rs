//! Domain events exchanged with the session layer.
//!
//! # Outbound
//! ```text
//! Controller ──[Pointer]────────► Session    position + button mask
//! Controller ──[Key]────────────► Session    key code, modifiers, press/release
//! Controller ──[Clipboard]──────► Session    local clipboard payload
//! Controller ──[ConfigChanged]──► Session    full updated SessionConfig
//! Controller ──[WindowClosed]───► Session    once, before the window goes away
//! ```
//!
//! Inbound payloads (clipboard, cursor shape) reuse the same value types.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::RdvError;
use crate::geometry::Point;
use crate::session::SessionConfig;

// ── Pointer ──────────────────────────────────────────────────────

bitflags! {
    /// Button/wheel mask carried by every pointer event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct PointerButtons: u32 {
        const LEFT       = 0x01;
        const MIDDLE     = 0x02;
        const RIGHT      = 0x04;
        const WHEEL_UP   = 0x08;
        const WHEEL_DOWN = 0x10;
    }
}

impl PointerButtons {
    /// The mask with wheel bits removed.
    pub fn without_wheel(self) -> Self {
        self - (PointerButtons::WHEEL_UP | PointerButtons::WHEEL_DOWN)
    }
}

// ── Keyboard ─────────────────────────────────────────────────────

/// A key identified by its USB HID usage (page 0x07).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const ESCAPE: KeyCode = KeyCode(0x07_0029);
    pub const TAB: KeyCode = KeyCode(0x07_002B);
    pub const PRINT_SCREEN: KeyCode = KeyCode(0x07_0046);
    pub const DELETE: KeyCode = KeyCode(0x07_004C);
    pub const LEFT_CTRL: KeyCode = KeyCode(0x07_00E0);
    pub const LEFT_SHIFT: KeyCode = KeyCode(0x07_00E1);
    pub const LEFT_ALT: KeyCode = KeyCode(0x07_00E2);
    pub const LEFT_META: KeyCode = KeyCode(0x07_00E3);
    pub const RIGHT_CTRL: KeyCode = KeyCode(0x07_00E4);
    pub const RIGHT_SHIFT: KeyCode = KeyCode(0x07_00E5);
    pub const RIGHT_ALT: KeyCode = KeyCode(0x07_00E6);
    pub const RIGHT_META: KeyCode = KeyCode(0x07_00E7);

    /// Resolve a key name as used in config files (`"ctrl"`, `"delete"`, `"0x07002b"`).
    pub fn from_name(name: &str) -> Option<KeyCode> {
        let lower = name.trim().to_ascii_lowercase();
        let code = match lower.as_str() {
            "esc" | "escape" => Self::ESCAPE,
            "tab" => Self::TAB,
            "print" | "printscreen" | "print_screen" => Self::PRINT_SCREEN,
            "del" | "delete" => Self::DELETE,
            "ctrl" | "control" | "left_ctrl" => Self::LEFT_CTRL,
            "shift" | "left_shift" => Self::LEFT_SHIFT,
            "alt" | "left_alt" => Self::LEFT_ALT,
            "meta" | "win" | "super" | "left_meta" => Self::LEFT_META,
            "right_ctrl" => Self::RIGHT_CTRL,
            "right_shift" => Self::RIGHT_SHIFT,
            "right_alt" => Self::RIGHT_ALT,
            "right_meta" => Self::RIGHT_META,
            other => {
                let hex = other.strip_prefix("0x")?;
                return u32::from_str_radix(hex, 16).ok().map(KeyCode);
            }
        };
        Some(code)
    }

    /// The modifier this key contributes while held, if any.
    pub fn modifier(self) -> Modifiers {
        match self {
            Self::LEFT_CTRL | Self::RIGHT_CTRL => Modifiers::CTRL,
            Self::LEFT_SHIFT | Self::RIGHT_SHIFT => Modifiers::SHIFT,
            Self::LEFT_ALT | Self::RIGHT_ALT => Modifiers::ALT,
            Self::LEFT_META | Self::RIGHT_META => Modifiers::META,
            _ => Modifiers::empty(),
        }
    }
}

bitflags! {
    /// Modifier keys held at the time of a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Modifiers: u8 {
        const SHIFT = 0x01;
        const CTRL  = 0x02;
        const ALT   = 0x04;
        const META  = 0x08;
    }
}

/// Key action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    Press,
    Release,
}

/// A key transition forwarded to the remote side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: KeyCode,
    pub modifiers: Modifiers,
    pub action: KeyAction,
}

impl KeyEvent {
    /// Create a key press event.
    pub fn press(key: KeyCode, modifiers: Modifiers) -> Self {
        Self {
            key,
            modifiers,
            action: KeyAction::Press,
        }
    }

    /// Create a key release event.
    pub fn release(key: KeyCode, modifiers: Modifiers) -> Self {
        Self {
            key,
            modifiers,
            action: KeyAction::Release,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.action == KeyAction::Press
    }
}

// ── Clipboard ────────────────────────────────────────────────────

/// A clipboard payload, in either direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardEvent {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ClipboardEvent {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// A `text/plain; charset=UTF-8` payload.
    pub fn text(text: &str) -> Self {
        Self::new("text/plain; charset=UTF-8", text.as_bytes().to_vec())
    }
}

// ── Cursor ───────────────────────────────────────────────────────

/// A remote cursor image (BGRA, `width * height * 4` bytes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorShape {
    pub width: u32,
    pub height: u32,
    pub hotspot: Point,
    pub data: Vec<u8>,
}

// ── OutboundEvent ────────────────────────────────────────────────

/// Everything the controller sends to the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum OutboundEvent {
    Pointer {
        position: Point,
        buttons: PointerButtons,
    },
    Key(KeyEvent),
    Clipboard(ClipboardEvent),
    ConfigChanged(SessionConfig),
    WindowClosed,
}

impl OutboundEvent {
    /// Serialize as a single JSON line.
    pub fn to_json(&self) -> Result<String, RdvError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON.
    pub fn from_json(text: &str) -> Result<Self, RdvError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_names_resolve() {
        assert_eq!(KeyCode::from_name("Ctrl"), Some(KeyCode::LEFT_CTRL));
        assert_eq!(KeyCode::from_name(" delete "), Some(KeyCode::DELETE));
        assert_eq!(KeyCode::from_name("0x07002b"), Some(KeyCode::TAB));
        assert_eq!(KeyCode::from_name("hyper"), None);
        assert_eq!(KeyCode::from_name("0xzz"), None);
    }

    #[test]
    fn modifier_keys_map_to_flags() {
        assert_eq!(KeyCode::RIGHT_ALT.modifier(), Modifiers::ALT);
        assert_eq!(KeyCode::LEFT_META.modifier(), Modifiers::META);
        assert!(KeyCode::DELETE.modifier().is_empty());
    }

    #[test]
    fn wheel_bits_strip() {
        let mask = PointerButtons::LEFT | PointerButtons::WHEEL_DOWN;
        assert_eq!(mask.without_wheel(), PointerButtons::LEFT);
    }

    #[test]
    fn outbound_json_is_tagged() {
        let ev = OutboundEvent::WindowClosed;
        assert_eq!(ev.to_json().unwrap(), r#"{"event":"window_closed"}"#);

        let ev = OutboundEvent::Key(KeyEvent::press(KeyCode::TAB, Modifiers::empty()));
        let text = ev.to_json().unwrap();
        assert!(text.contains(r#""event":"key""#));
        assert_eq!(OutboundEvent::from_json(&text).unwrap(), ev);
    }

    #[test]
    fn key_event_release() {
        let event = KeyEvent::release(KeyCode::ESCAPE, Modifiers::empty());
        assert_eq!(event.action, KeyAction::Release);
        assert!(!event.is_pressed());
    }
}
