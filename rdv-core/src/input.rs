//! Local input routing.
//!
//! Every raw event that reaches the viewport or the scroll container's
//! inner viewport is classified by `(source, kind)` into a
//! [`RouteDecision`]. The decision says whether the event is forwarded to
//! the remote side, converted first, or left to the toolkit, and whether
//! the toolkit's own handling must be suppressed.
//!
//! | source          | kind            | decision              |
//! |-----------------|-----------------|-----------------------|
//! | viewport        | pointer         | forward as-is         |
//! | viewport        | key (Tab)       | suppress and redirect |
//! | viewport        | key (other)     | forward as-is         |
//! | scroll viewport | wheel           | forward transformed   |
//! | anything else   |                 | pass through          |

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RdvError;
use crate::event::{KeyCode, KeyEvent, Modifiers, PointerButtons};
use crate::geometry::Point;
use crate::scroll::ScrollArea;

/// Angle delta of one wheel notch.
pub const WHEEL_DELTA_PER_STEP: i32 = 120;

/// Most pointer events a single wheel event expands into.
pub const MAX_WHEEL_STEPS: u32 = 32;

// ── Classification ───────────────────────────────────────────────

/// Where a raw event was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSource {
    /// The widget showing the remote surface.
    Viewport,
    /// The scroll container's inner viewport around it.
    ScrollViewport,
}

/// Raw local input, as the toolkit reports it.
///
/// Pointer positions are in the source's own coordinates: content
/// coordinates for [`InputSource::Viewport`], container coordinates for
/// [`InputSource::ScrollViewport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawInput {
    PointerMove {
        position: Point,
        buttons: PointerButtons,
    },
    PointerPress {
        position: Point,
        buttons: PointerButtons,
    },
    PointerRelease {
        position: Point,
        buttons: PointerButtons,
    },
    Wheel {
        position: Point,
        buttons: PointerButtons,
        angle_delta: Point,
    },
    Key {
        key: KeyCode,
        modifiers: Modifiers,
        pressed: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    PointerMove,
    PointerPress,
    PointerRelease,
    Wheel,
    KeyPress,
    KeyRelease,
}

impl RawInput {
    pub fn kind(&self) -> InputKind {
        match self {
            RawInput::PointerMove { .. } => InputKind::PointerMove,
            RawInput::PointerPress { .. } => InputKind::PointerPress,
            RawInput::PointerRelease { .. } => InputKind::PointerRelease,
            RawInput::Wheel { .. } => InputKind::Wheel,
            RawInput::Key { pressed: true, .. } => InputKind::KeyPress,
            RawInput::Key { pressed: false, .. } => InputKind::KeyRelease,
        }
    }
}

/// What happens to a raw event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Forward unchanged; toolkit handling continues.
    ForwardAsIs,
    /// Convert, forward, and suppress the toolkit's handling.
    ForwardTransformed,
    /// Suppress the toolkit's handling and send through the viewport's
    /// synthetic path instead.
    SuppressAndRedirect,
    /// Not ours: leave to the toolkit.
    PassThrough,
}

impl RouteDecision {
    /// Whether the toolkit must not process the event further.
    pub fn consumes(self) -> bool {
        matches!(
            self,
            RouteDecision::ForwardTransformed | RouteDecision::SuppressAndRedirect
        )
    }
}

const ROUTES: &[(InputSource, InputKind, RouteDecision)] = &[
    (InputSource::Viewport, InputKind::PointerMove, RouteDecision::ForwardAsIs),
    (InputSource::Viewport, InputKind::PointerPress, RouteDecision::ForwardAsIs),
    (InputSource::Viewport, InputKind::PointerRelease, RouteDecision::ForwardAsIs),
    (InputSource::Viewport, InputKind::KeyPress, RouteDecision::ForwardAsIs),
    (InputSource::Viewport, InputKind::KeyRelease, RouteDecision::ForwardAsIs),
    (InputSource::ScrollViewport, InputKind::Wheel, RouteDecision::ForwardTransformed),
];

/// Keys on the viewport whose toolkit handling (focus traversal) must not run.
const KEY_OVERRIDES: &[(KeyCode, RouteDecision)] =
    &[(KeyCode::TAB, RouteDecision::SuppressAndRedirect)];

/// Look up the decision for an event.
pub fn classify(source: InputSource, input: &RawInput) -> RouteDecision {
    let kind = input.kind();
    let base = ROUTES
        .iter()
        .find(|(s, k, _)| *s == source && *k == kind)
        .map(|(_, _, d)| *d)
        .unwrap_or(RouteDecision::PassThrough);

    match (source, input) {
        (InputSource::Viewport, RawInput::Key { key, .. }) => KEY_OVERRIDES
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, d)| *d)
            .unwrap_or(base),
        _ => base,
    }
}

// ── Routing output ───────────────────────────────────────────────

/// An event to send to the remote side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forward {
    /// Pointer event; `position` in content coordinates.
    Pointer {
        position: Point,
        buttons: PointerButtons,
    },
    Key(KeyEvent),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routing {
    pub decision: RouteDecision,
    pub forwards: Vec<Forward>,
}

impl Routing {
    fn pass_through() -> Self {
        Self {
            decision: RouteDecision::PassThrough,
            forwards: Vec::new(),
        }
    }

    /// Whether the toolkit must stop processing the event.
    pub fn consumed(&self) -> bool {
        self.decision.consumes()
    }
}

// ── Key sequences ────────────────────────────────────────────────

/// A chord sent as one unit, e.g. Ctrl+Alt+Delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeySequence(pub Vec<KeyCode>);

impl KeySequence {
    pub fn ctrl_alt_delete() -> Self {
        Self(vec![KeyCode::LEFT_CTRL, KeyCode::LEFT_ALT, KeyCode::DELETE])
    }
}

/// Parses `"ctrl+alt+delete"`-style names.
impl FromStr for KeySequence {
    type Err = RdvError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        text.split('+')
            .map(|name| {
                KeyCode::from_name(name)
                    .ok_or_else(|| RdvError::Config(format!("unknown key `{}`", name.trim())))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl Default for KeySequence {
    fn default() -> Self {
        Self::ctrl_alt_delete()
    }
}

// ── InputEventRouter ─────────────────────────────────────────────

/// Converts raw events into remote events and tracks held keys.
#[derive(Debug, Default)]
pub struct InputEventRouter {
    held_keys: BTreeSet<KeyCode>,
}

impl InputEventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route one raw event. `area` maps scroll-container positions into
    /// content coordinates for wheel events.
    pub fn route(&mut self, source: InputSource, input: RawInput, area: &ScrollArea) -> Routing {
        let decision = classify(source, &input);
        if decision == RouteDecision::PassThrough {
            return Routing::pass_through();
        }

        let forwards = match input {
            RawInput::PointerMove { position, buttons }
            | RawInput::PointerPress { position, buttons }
            | RawInput::PointerRelease { position, buttons } => vec![Forward::Pointer {
                position,
                buttons: buttons.without_wheel(),
            }],
            RawInput::Wheel {
                position,
                buttons,
                angle_delta,
            } => wheel_to_pointer(area.map_from_container(position), buttons, angle_delta),
            RawInput::Key {
                key,
                modifiers,
                pressed,
            } => {
                let event = if pressed {
                    self.held_keys.insert(key);
                    KeyEvent::press(key, modifiers)
                } else {
                    self.held_keys.remove(&key);
                    KeyEvent::release(key, modifiers)
                };
                vec![Forward::Key(event)]
            }
        };

        Routing { decision, forwards }
    }

    /// Expand a chord: press in order, release in reverse.
    pub fn key_sequence(&self, sequence: &KeySequence) -> Vec<KeyEvent> {
        let mut events = Vec::with_capacity(sequence.0.len() * 2);
        let mut modifiers = Modifiers::empty();

        for key in &sequence.0 {
            modifiers |= key.modifier();
            events.push(KeyEvent::press(*key, modifiers));
        }
        for key in sequence.0.iter().rev() {
            modifiers -= key.modifier();
            events.push(KeyEvent::release(*key, modifiers));
        }
        events
    }

    /// Focus left the viewport: release every held key on the remote side.
    pub fn release_all(&mut self) -> Vec<KeyEvent> {
        std::mem::take(&mut self.held_keys)
            .into_iter()
            .map(|key| KeyEvent::release(key, Modifiers::empty()))
            .collect()
    }
}

/// One pointer event per wheel notch (at least one, at most
/// `MAX_WHEEL_STEPS`), carrying the wheel direction bit.
fn wheel_to_pointer(position: Point, buttons: PointerButtons, angle_delta: Point) -> Vec<Forward> {
    let wheel = if angle_delta.y < 0 {
        PointerButtons::WHEEL_DOWN
    } else {
        PointerButtons::WHEEL_UP
    };
    let steps =
        (angle_delta.y.unsigned_abs() / WHEEL_DELTA_PER_STEP as u32).clamp(1, MAX_WHEEL_STEPS);
    let buttons = buttons.without_wheel() | wheel;

    (0..steps)
        .map(|_| Forward::Pointer { position, buttons })
        .collect()
}

// ── Tests ────────────────────────────────────────────────────────
