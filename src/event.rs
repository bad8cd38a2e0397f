use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;
use tracing::error;

use crate::error::Result;
use crate::session::{SearchResult, TransferUpdate};

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// A key press event.
    Key(KeyEvent),
    /// A periodic tick for status expiry.
    Tick,
    /// Terminal resize event.
    Resize(u16, u16),
    /// One peer's response to a search.
    SearchResult(SearchResult),
    /// Download progress.
    Transfer(TransferUpdate),
}

/// Single-consumer event queue. The terminal reader is one producer; the
/// session hands out clones of [`EventHandler::sender`] to its tasks.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler {
    /// Create an empty queue. Nothing reads the terminal until [`listen`](Self::listen).
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { rx, tx }
    }

    /// Start forwarding terminal input, sending a tick whenever `tick_rate`
    /// passes without any.
    pub fn listen(&self, tick_rate: Duration) {
        let event_tx = self.sender();

        tokio::spawn(async move {
            loop {
                let event = match event::poll(tick_rate) {
                    Ok(true) => match event::read() {
                        Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                            Event::Key(key)
                        }
                        Ok(CrosstermEvent::Resize(w, h)) => Event::Resize(w, h),
                        Ok(_) => continue,
                        Err(e) => {
                            error!(error = %e, "terminal read failed");
                            break;
                        }
                    },
                    Ok(false) => Event::Tick,
                    Err(e) => {
                        error!(error = %e, "terminal poll failed");
                        break;
                    }
                };
                if event_tx.send(event).is_err() {
                    break;
                }
            }
        });
    }

    /// Get a sender clone for session tasks.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Receive the next event (blocks until available).
    pub async fn next(&mut self) -> Result<Event> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| crate::error::AppError::Terminal("Event channel closed".into()))
    }

    /// Take an already queued event without waiting.
    pub fn try_next(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_arrive_in_order() {
        let mut events = EventHandler::new();
        let tx = events.sender();
        tx.send(Event::Tick).expect("send");
        tx.send(Event::Resize(80, 24)).expect("send");

        assert!(matches!(events.next().await, Ok(Event::Tick)));
        assert!(matches!(events.next().await, Ok(Event::Resize(80, 24))));
    }

    #[tokio::test]
    async fn try_next_drains_without_blocking() {
        let mut events = EventHandler::new();
        assert!(events.try_next().is_none());

        events.sender().send(Event::Tick).expect("send");
        assert!(matches!(events.try_next(), Some(Event::Tick)));
        assert!(events.try_next().is_none());
    }
}
