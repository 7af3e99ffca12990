//! Outbound session channel over a tokio mpsc.

use tokio::sync::mpsc;

use rdv_core::{OutboundEvent, RdvError, SessionChannel};

/// Hands outbound events to the driver loop.
pub struct ChannelSession {
    tx: mpsc::UnboundedSender<OutboundEvent>,
}

impl ChannelSession {
    pub fn new(tx: mpsc::UnboundedSender<OutboundEvent>) -> Self {
        Self { tx }
    }

    /// Create a channel plus the receiver the driver drains.
    pub fn pair() -> (Self, mpsc::UnboundedReceiver<OutboundEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl SessionChannel for ChannelSession {
    fn send(&mut self, event: OutboundEvent) -> Result<(), RdvError> {
        self.tx.send(event)?;
        Ok(())
    }
}
