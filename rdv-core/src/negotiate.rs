//! Feature negotiation.
//!
//! Reconciles what the host announced with what the session config asks
//! for. Clipboard sync is the only feature with a live resource behind
//! it: every negotiation pass tears the bridge down first and then builds
//! a fresh one only when both sides want it.

use tracing::{debug, info, warn};

use crate::capability::{CapabilitySet, Features};
use crate::clipboard::ClipboardBridge;
use crate::collab::{ClipboardService, ConfigDialog, DialogOutcome, Notifier};
use crate::session::{SessionConfig, SessionDescriptor};

/// Result of a configuration change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOutcome {
    Accepted,
    Rejected,
}

/// Collaborators a negotiation pass may need.
pub struct NegotiationContext<'a> {
    pub dialog: &'a mut dyn ConfigDialog,
    pub notifier: &'a mut dyn Notifier,
    pub clipboard: &'a mut dyn ClipboardService,
}

#[derive(Default)]
pub struct FeatureNegotiator {
    capabilities: CapabilitySet,
    clipboard: Option<ClipboardBridge>,
}

impl FeatureNegotiator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    pub fn has_clipboard(&self) -> bool {
        self.clipboard.is_some()
    }

    pub fn clipboard_mut(&mut self) -> Option<&mut ClipboardBridge> {
        self.clipboard.as_mut()
    }

    /// Record a host announcement and renegotiate.
    pub fn announce(
        &mut self,
        capabilities: CapabilitySet,
        session: &SessionDescriptor,
        service: &mut dyn ClipboardService,
    ) {
        info!(
            encodings = ?capabilities.supported_video_encodings,
            features = ?capabilities.supported_features,
            "host capabilities"
        );
        self.capabilities = capabilities;
        self.reevaluate(session, service);
    }

    /// Rebuild the clipboard bridge from the current capabilities and the
    /// session's active config.
    pub fn reevaluate(&mut self, session: &SessionDescriptor, service: &mut dyn ClipboardService) {
        if !session.is_manage() {
            debug_assert!(
                self.clipboard.is_none(),
                "clipboard bridge on a view-only session"
            );
            return;
        }

        // Always drop the old bridge before deciding on a new one.
        self.clipboard = None;

        let active = self.capabilities.negotiate(session.config.features);
        if active.contains(Features::CLIPBOARD) {
            self.clipboard = Some(ClipboardBridge::open(service));
            debug!("clipboard bridge opened");
        } else {
            debug!("clipboard bridge disabled");
        }
    }

    /// Warning text when `config` selects an encoding the host lacks.
    pub fn encoding_warning(&self, config: &SessionConfig) -> Option<String> {
        if self.capabilities.supports_encoding(config.video_encoding) {
            None
        } else {
            Some(format!(
                "The current video encoding ({}) is not supported by the host. \
                 Please specify a different video encoding.",
                config.video_encoding
            ))
        }
    }

    /// The session layer asks for a (possibly different) config.
    ///
    /// An unsupported encoding only produces a warning; the dialog still
    /// opens and may be accepted. On acceptance the edited config becomes
    /// both `candidate` and the session's active config.
    pub fn request_config_change(
        &mut self,
        candidate: &mut SessionConfig,
        session: &mut SessionDescriptor,
        ctx: NegotiationContext<'_>,
    ) -> ConfigOutcome {
        if let Some(message) = self.encoding_warning(candidate) {
            warn!(encoding = %candidate.video_encoding, "requested encoding unsupported by host");
            ctx.notifier.warn("Warning", &message);
        }

        let mut working = candidate.clone();
        if ctx.dialog.exec(&mut working, &self.capabilities) != DialogOutcome::Accepted {
            debug!("config change rejected");
            return ConfigOutcome::Rejected;
        }

        *candidate = working.clone();
        session.config = working;
        self.reevaluate(session, ctx.clipboard);
        ConfigOutcome::Accepted
    }

    /// The user opened the settings dialog from the panel. Returns the
    /// updated config when accepted.
    pub fn change_settings(
        &mut self,
        session: &mut SessionDescriptor,
        dialog: &mut dyn ConfigDialog,
        service: &mut dyn ClipboardService,
    ) -> Option<SessionConfig> {
        let mut working = session.config.clone();
        if dialog.exec(&mut working, &self.capabilities) != DialogOutcome::Accepted {
            return None;
        }

        session.config = working;
        self.reevaluate(session, service);
        info!(encoding = %session.config.video_encoding, "settings changed");
        Some(session.config.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::capability::{VideoEncoding, VideoEncodings};
    use crate::collab::ClipboardSubscription;
    use crate::event::ClipboardEvent;
    use crate::session::SessionType;

    /// Counts live subscriptions so tests can see teardown.
    #[derive(Default)]
    struct Service {
        live: Rc<Cell<i32>>,
        opened: u32,
    }

    struct Sub(Rc<Cell<i32>>);

    impl ClipboardSubscription for Sub {
        fn set_local(&mut self, _event: &ClipboardEvent) {}
    }

    impl Drop for Sub {
        fn drop(&mut self) {
            self.0.set(self.0.get() - 1);
        }
    }

    impl ClipboardService for Service {
        fn subscribe(&mut self) -> Box<dyn ClipboardSubscription> {
            // The previous subscription is gone before a new one opens.
            assert_eq!(self.live.get(), 0);
            self.opened += 1;
            self.live.set(self.live.get() + 1);
            Box::new(Sub(self.live.clone()))
        }
    }

    struct Dialog {
        outcome: DialogOutcome,
        set_features: Option<Features>,
        runs: u32,
    }

    impl Dialog {
        fn accepting() -> Self {
            Self {
                outcome: DialogOutcome::Accepted,
                set_features: None,
                runs: 0,
            }
        }

        fn rejecting() -> Self {
            Self {
                outcome: DialogOutcome::Rejected,
                ..Self::accepting()
            }
        }
    }

    impl ConfigDialog for Dialog {
        fn exec(&mut self, config: &mut SessionConfig, _caps: &CapabilitySet) -> DialogOutcome {
            self.runs += 1;
            if let Some(features) = self.set_features {
                config.features = features;
            }
            self.outcome
        }
    }

    #[derive(Default)]
    struct Warnings(Vec<String>);

    impl Notifier for Warnings {
        fn warn(&mut self, _title: &str, message: &str) {
            self.0.push(message.to_string());
        }
    }

    fn session(kind: SessionType, features: Features) -> SessionDescriptor {
        SessionDescriptor::new(
            kind,
            "host",
            "10.0.0.2",
            SessionConfig {
                video_encoding: VideoEncoding::Vp8,
                features,
            },
        )
    }

    fn caps(features: Features) -> CapabilitySet {
        CapabilitySet::new(VideoEncodings::ZLIB | VideoEncodings::VP8, features)
    }

    #[test]
    fn bridge_needs_host_and_config() {
        let cases = [
            (Features::CLIPBOARD, Features::CLIPBOARD, true),
            (Features::CLIPBOARD, Features::empty(), false),
            (Features::empty(), Features::CLIPBOARD, false),
            (Features::CURSOR_SHAPE, Features::all(), false),
        ];

        for (host, local, expected) in cases {
            let mut service = Service::default();
            let mut neg = FeatureNegotiator::new();
            let desc = session(SessionType::Manage, local);
            neg.announce(caps(host), &desc, &mut service);
            assert_eq!(neg.has_clipboard(), expected, "host={host:?} local={local:?}");
        }
    }

    #[test]
    fn view_session_never_bridges() {
        let mut service = Service::default();
        let mut neg = FeatureNegotiator::new();
        let desc = session(SessionType::View, Features::CLIPBOARD);
        neg.announce(caps(Features::CLIPBOARD), &desc, &mut service);
        assert!(!neg.has_clipboard());
        assert_eq!(service.opened, 0);
    }

    #[test]
    fn every_pass_replaces_the_bridge() {
        let mut service = Service::default();
        let mut neg = FeatureNegotiator::new();
        let desc = session(SessionType::Manage, Features::CLIPBOARD);

        neg.announce(caps(Features::CLIPBOARD), &desc, &mut service);
        neg.announce(caps(Features::CLIPBOARD), &desc, &mut service);
        assert_eq!(service.opened, 2);
        assert_eq!(service.live.get(), 1);

        neg.announce(caps(Features::empty()), &desc, &mut service);
        assert_eq!(service.live.get(), 0);
        assert!(!neg.has_clipboard());
    }

    #[test]
    fn unsupported_encoding_warns_but_accepts() {
        let mut service = Service::default();
        let mut dialog = Dialog::accepting();
        let mut notes = Warnings::default();
        let mut neg = FeatureNegotiator::new();
        let mut desc = session(SessionType::Manage, Features::CLIPBOARD);
        neg.announce(caps(Features::CLIPBOARD), &desc, &mut service);

        let mut candidate = SessionConfig {
            video_encoding: VideoEncoding::Vp9,
            features: Features::CLIPBOARD,
        };
        let outcome = neg.request_config_change(
            &mut candidate,
            &mut desc,
            NegotiationContext {
                dialog: &mut dialog,
                notifier: &mut notes,
                clipboard: &mut service,
            },
        );

        assert_eq!(outcome, ConfigOutcome::Accepted);
        assert_eq!(notes.0.len(), 1);
        assert!(notes.0[0].contains("vp9"));
        assert_eq!(dialog.runs, 1);
        assert_eq!(desc.config.video_encoding, VideoEncoding::Vp9);
    }

    #[test]
    fn supported_encoding_does_not_warn() {
        let mut service = Service::default();
        let mut dialog = Dialog::accepting();
        let mut notes = Warnings::default();
        let mut neg = FeatureNegotiator::new();
        let mut desc = session(SessionType::Manage, Features::CLIPBOARD);
        neg.announce(caps(Features::CLIPBOARD), &desc, &mut service);

        let mut candidate = desc.config.clone();
        neg.request_config_change(
            &mut candidate,
            &mut desc,
            NegotiationContext {
                dialog: &mut dialog,
                notifier: &mut notes,
                clipboard: &mut service,
            },
        );
        assert!(notes.0.is_empty());
    }

    #[test]
    fn rejected_change_mutates_nothing() {
        let mut service = Service::default();
        let mut dialog = Dialog {
            set_features: Some(Features::empty()),
            ..Dialog::rejecting()
        };
        let mut notes = Warnings::default();
        let mut neg = FeatureNegotiator::new();
        let mut desc = session(SessionType::Manage, Features::CLIPBOARD);
        neg.announce(caps(Features::CLIPBOARD), &desc, &mut service);
        let before = desc.clone();

        let mut candidate = desc.config.clone();
        let outcome = neg.request_config_change(
            &mut candidate,
            &mut desc,
            NegotiationContext {
                dialog: &mut dialog,
                notifier: &mut notes,
                clipboard: &mut service,
            },
        );

        assert_eq!(outcome, ConfigOutcome::Rejected);
        assert_eq!(desc, before);
        assert_eq!(candidate, before.config);
        assert!(neg.has_clipboard());
        assert_eq!(service.opened, 1);
    }

    #[test]
    fn accepted_change_renegotiates_clipboard() {
        let mut service = Service::default();
        let mut dialog = Dialog {
            set_features: Some(Features::empty()),
            ..Dialog::accepting()
        };
        let mut notes = Warnings::default();
        let mut neg = FeatureNegotiator::new();
        let mut desc = session(SessionType::Manage, Features::CLIPBOARD);
        neg.announce(caps(Features::CLIPBOARD), &desc, &mut service);
        assert!(neg.has_clipboard());

        let mut candidate = desc.config.clone();
        neg.request_config_change(
            &mut candidate,
            &mut desc,
            NegotiationContext {
                dialog: &mut dialog,
                notifier: &mut notes,
                clipboard: &mut service,
            },
        );
        assert!(!neg.has_clipboard());
        assert!(candidate.features.is_empty());
    }

    #[test]
    fn change_settings_returns_updated_config() {
        let mut service = Service::default();
        let mut neg = FeatureNegotiator::new();
        let mut desc = session(SessionType::Manage, Features::empty());
        neg.announce(caps(Features::CLIPBOARD), &desc, &mut service);
        assert!(!neg.has_clipboard());

        let mut dialog = Dialog {
            set_features: Some(Features::CLIPBOARD),
            ..Dialog::accepting()
        };
        let updated = neg.change_settings(&mut desc, &mut dialog, &mut service);
        assert_eq!(updated.map(|c| c.features), Some(Features::CLIPBOARD));
        assert!(neg.has_clipboard());

        let mut dialog = Dialog::rejecting();
        assert_eq!(neg.change_settings(&mut desc, &mut dialog, &mut service), None);
    }
}
