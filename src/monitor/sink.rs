//! Trade event consumers.

use tokio::sync::mpsc;

use crate::watcher::TradeEvent;

/// Consumer of detected trade events.
///
/// `on_trade` is called synchronously from the monitor task, so
/// implementations must not block indefinitely; anything slow (UI
/// updates, audio) belongs behind a channel.
pub trait TradeSink: Send + Sync {
    /// Handle one detected trade request.
    fn on_trade(&self, event: TradeEvent);
}

/// Sink that forwards events over an unbounded channel.
///
/// The non-blocking bridge for hosts that consume events on another
/// task. Events sent after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<TradeEvent>,
}

impl ChannelSink {
    /// Create a sink together with the receiving half.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TradeEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl TradeSink for ChannelSink {
    fn on_trade(&self, event: TradeEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("Trade receiver dropped, discarding event");
        }
    }
}
