//! Console actor owning all session state.
//!
//! Transport tasks and operator requests never touch the registry directly.
//! Everything is funneled through one bounded queue and applied by a single
//! task, so frames of one connection are handled in arrival order and no
//! locking is needed around the registry.

use crate::{
    resolve_operator_command, Catalogs, CommandDispatcher, ConsoleError, DispatchReport,
    MessageRouter, Presentation, Result, SessionRegistry, SessionSummary, SessionView, Transport,
    TransportEvent,
};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, trace, warn};
use trainerd_types::{Command, OperatorCommand, SlotId, Target};

/// Registry, router, dispatcher and detail-view selection.
pub struct Console<P> {
    registry: SessionRegistry,
    router: MessageRouter,
    dispatcher: CommandDispatcher,
    presentation: P,
}

impl<P: Presentation> Console<P> {
    pub fn new(transport: Arc<dyn Transport>, presentation: P) -> Self {
        Self {
            registry: SessionRegistry::new(),
            router: MessageRouter::new(),
            dispatcher: CommandDispatcher::new(transport),
            presentation,
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn catalogs(&self) -> &Catalogs {
        self.router.catalogs()
    }

    pub fn selected(&self) -> Option<SlotId> {
        self.router.detail_view()
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    /// Apply one transport event. Failures are logged and never stop the console.
    pub fn handle_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Connected(connection) => {
                // Duplicate registrations are logged by the registry.
                let _ = self.registry.create_session(connection, &mut self.presentation);
            }
            TransportEvent::Disconnected(connection) => {
                if let Ok(session) = self.registry.destroy_session(connection, &mut self.presentation) {
                    if self.router.detail_view() == Some(session.slot) {
                        debug!(target: "trainerd::session", "Selected session {} disconnected, closing detail view", connection);
                        self.router.set_detail_view(None);
                    }
                }
            }
            TransportEvent::Frame { connection, data } => {
                match self
                    .router
                    .route(connection, &data, &mut self.registry, &mut self.presentation)
                {
                    Ok(outcome) => {
                        trace!(target: "trainerd::router", "{} frame {:?}: {:?}", connection, data, outcome);
                    }
                    Err(ConsoleError::SessionNotFound(_)) => {
                        warn!(target: "trainerd::router", "Dropping frame from unknown {}: {:?}", connection, data);
                    }
                    Err(e) => {
                        warn!(target: "trainerd::router", "Discarding frame from {}: {}", connection, e);
                    }
                }
            }
        }
        self.registry.log_state();
    }

    /// Open the detail view for `slot`.
    ///
    /// Clears the session's attention flag and turns its watch indicator on.
    pub fn select(&mut self, slot: SlotId) -> Result<SessionView> {
        if let Some(current) = self.router.detail_view() {
            return Err(ConsoleError::AlreadySelected(current));
        }
        let session = self
            .registry
            .find_by_slot_mut(slot)
            .ok_or(ConsoleError::SlotNotFound(slot))?;

        session.attention_requested = false;
        if let Err(e) = self.dispatcher.send(session, &Command::Watch(true)) {
            warn!(target: "trainerd::dispatch", "Watch indicator not sent to {}: {}", session.connection, e);
        }
        self.router.set_detail_view(Some(slot));

        info!(target: "trainerd::session", "Detail view opened for {}", slot);
        Ok(session.view())
    }

    /// Close the detail view, turning the watch indicator off.
    pub fn deselect(&mut self) {
        let Some(slot) = self.router.detail_view() else {
            return;
        };
        self.router.set_detail_view(None);
        if let Some(session) = self.registry.find_by_slot_mut(slot) {
            if let Err(e) = self.dispatcher.send(session, &Command::Watch(false)) {
                warn!(target: "trainerd::dispatch", "Watch indicator not cleared on {}: {}", session.connection, e);
            }
        }
        info!(target: "trainerd::session", "Detail view closed for {}", slot);
    }

    /// Resolve and dispatch an operator command.
    pub fn execute(&mut self, target: Target, command: OperatorCommand) -> Result<DispatchReport> {
        let Some(command) = resolve_operator_command(command)? else {
            return Ok(DispatchReport::default());
        };
        self.dispatcher
            .dispatch(&mut self.registry, self.router.detail_view(), target, &command)
    }

    pub fn session_view(&self, slot: SlotId) -> Result<SessionView> {
        self.registry
            .find_by_slot(slot)
            .map(|s| s.view())
            .ok_or(ConsoleError::SlotNotFound(slot))
    }

    pub fn list_sessions(&self) -> Vec<SessionSummary> {
        self.registry.iter().map(|s| s.summary()).collect()
    }

    fn handle_message(&mut self, message: ConsoleMessage) {
        match message {
            ConsoleMessage::Transport(event) => self.handle_event(event),
            ConsoleMessage::ListSessions { reply } => {
                let _ = reply.send(self.list_sessions());
            }
            ConsoleMessage::GetSession { slot, reply } => {
                let _ = reply.send(self.session_view(slot));
            }
            ConsoleMessage::Select { slot, reply } => {
                let _ = reply.send(self.select(slot));
            }
            ConsoleMessage::Deselect { reply } => {
                self.deselect();
                let _ = reply.send(());
            }
            ConsoleMessage::Execute { target, command, reply } => {
                let result = self.execute(target, command);
                if let Err(e) = &result {
                    debug!(target: "trainerd::dispatch", "Operator command failed: {}", e);
                }
                let _ = reply.send(result);
            }
            ConsoleMessage::Catalogs { reply } => {
                let _ = reply.send(self.catalogs().clone());
            }
        }
    }
}

impl<P: Presentation + 'static> Console<P> {
    /// Run the console on its own task and return a handle to it.
    pub fn spawn(mut self, capacity: usize) -> ConsoleHandle {
        let (tx, mut rx) = mpsc::channel(capacity);

        tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                self.handle_message(message);
            }
            info!(target: "trainerd::session", "Console stopped, {} sessions dropped", self.registry.len());
        });

        ConsoleHandle { tx }
    }
}

enum ConsoleMessage {
    Transport(TransportEvent),
    ListSessions {
        reply: oneshot::Sender<Vec<SessionSummary>>,
    },
    GetSession {
        slot: SlotId,
        reply: oneshot::Sender<Result<SessionView>>,
    },
    Select {
        slot: SlotId,
        reply: oneshot::Sender<Result<SessionView>>,
    },
    Deselect {
        reply: oneshot::Sender<()>,
    },
    Execute {
        target: Target,
        command: OperatorCommand,
        reply: oneshot::Sender<Result<DispatchReport>>,
    },
    Catalogs {
        reply: oneshot::Sender<Catalogs>,
    },
}

/// Cloneable handle to a running console.
#[derive(Clone)]
pub struct ConsoleHandle {
    tx: mpsc::Sender<ConsoleMessage>,
}

impl ConsoleHandle {
    /// Queue a transport event.
    pub async fn transport_event(&self, event: TransportEvent) -> Result<()> {
        self.tx
            .send(ConsoleMessage::Transport(event))
            .await
            .map_err(|_| ConsoleError::ChannelSendError)
    }

    pub async fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        self.call(|reply| ConsoleMessage::ListSessions { reply }).await
    }

    pub async fn session(&self, slot: SlotId) -> Result<SessionView> {
        self.call(|reply| ConsoleMessage::GetSession { slot, reply }).await?
    }

    pub async fn select(&self, slot: SlotId) -> Result<SessionView> {
        self.call(|reply| ConsoleMessage::Select { slot, reply }).await?
    }

    pub async fn deselect(&self) -> Result<()> {
        self.call(|reply| ConsoleMessage::Deselect { reply }).await
    }

    pub async fn execute(&self, target: Target, command: OperatorCommand) -> Result<DispatchReport> {
        self.call(|reply| ConsoleMessage::Execute { target, command, reply })
            .await?
    }

    pub async fn catalogs(&self) -> Result<Catalogs> {
        self.call(|reply| ConsoleMessage::Catalogs { reply }).await
    }

    async fn call<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> ConsoleMessage) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| ConsoleError::ChannelSendError)?;
        rx.await.map_err(|_| ConsoleError::ChannelSendError)
    }
}
