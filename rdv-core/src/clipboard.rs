//! Clipboard bridge between the local clipboard and the remote session.
//!
//! A bridge only exists while clipboard sync is negotiated on. It wraps
//! the live OS subscription and remembers the last payload it wrote
//! locally so that payload is not echoed straight back to the host.

use tracing::trace;

use crate::collab::{ClipboardService, ClipboardSubscription};
use crate::event::ClipboardEvent;

pub struct ClipboardBridge {
    subscription: Box<dyn ClipboardSubscription>,
    last_injected: Option<ClipboardEvent>,
}

impl ClipboardBridge {
    /// Open a subscription on `service`.
    pub fn open(service: &mut dyn ClipboardService) -> Self {
        Self {
            subscription: service.subscribe(),
            last_injected: None,
        }
    }

    /// Remote payload: write it to the local clipboard.
    pub fn inject(&mut self, event: ClipboardEvent) {
        trace!(mime = %event.mime_type, len = event.data.len(), "clipboard from remote");
        self.subscription.set_local(&event);
        self.last_injected = Some(event);
    }

    /// Local clipboard changed. Returns the payload to forward, or
    /// `None` when it is the one just injected from the remote side.
    pub fn local_changed(&mut self, event: ClipboardEvent) -> Option<ClipboardEvent> {
        if self.last_injected.as_ref() == Some(&event) {
            trace!("clipboard echo suppressed");
            return None;
        }
        self.last_injected = None;
        Some(event)
    }
}
