//! Shared application state.

use crate::config::Config;
use crate::presentation::PresentationHub;
use crate::transport::WsTransport;
use std::sync::Arc;
use tokio::sync::broadcast;
use trainerd_core::{Console, ConsoleHandle};
use trainerd_types::PresentationEvent;

/// Shared application state.
///
/// Must be created inside a Tokio runtime: the console actor is spawned here.
pub struct AppState {
    pub console: ConsoleHandle,
    pub transport: Arc<WsTransport>,
    pub events: broadcast::Sender<PresentationEvent>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let transport = Arc::new(WsTransport::new(
            config.reliable_queue_depth,
            config.unreliable_queue_depth,
        ));
        let (events, _) = broadcast::channel(config.presentation_channel_capacity.max(1));
        let hub = PresentationHub::new(events.clone());

        let console = Console::new(transport.clone(), hub).spawn(config.event_queue_capacity.max(1));

        Self {
            console,
            transport,
            events,
            config,
        }
    }

    /// Subscribe to presentation events.
    pub fn subscribe(&self) -> broadcast::Receiver<PresentationEvent> {
        self.events.subscribe()
    }
}
