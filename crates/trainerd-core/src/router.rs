//! Routing of inbound device frames to session state and presentation.

use crate::{ConsoleError, Presentation, Result, SessionRegistry};
use serde::Serialize;
use tracing::{debug, trace};
use trainerd_types::{ConnectionId, InboundFrame, SlotId, StatusLabel};

/// Outcome of routing one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Session state or catalogs changed.
    Applied,
    /// Frame was valid but intentionally had no effect.
    Ignored,
}

/// Catalogs advertised by devices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Catalogs {
    /// `None` until the first scenario list arrives.
    pub scenarios: Option<Vec<String>>,
    pub languages: Vec<String>,
}

/// Decodes device frames and applies them.
#[derive(Debug, Default)]
pub struct MessageRouter {
    catalogs: Catalogs,
    /// Slot shown in the detail view; the only one whose debug readout is presented.
    detail_view: Option<SlotId>,
}

impl MessageRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    pub fn detail_view(&self) -> Option<SlotId> {
        self.detail_view
    }

    pub fn set_detail_view(&mut self, slot: Option<SlotId>) {
        self.detail_view = slot;
    }

    /// Route one frame received from `connection`.
    ///
    /// Frames from connections without a session are dropped; they are
    /// expected when a frame races its connection's disconnect.
    pub fn route<P>(
        &mut self,
        connection: ConnectionId,
        data: &str,
        registry: &mut SessionRegistry,
        presentation: &mut P,
    ) -> Result<RouteOutcome>
    where
        P: Presentation + ?Sized,
    {
        let Some(session) = registry.find_mut(connection) else {
            return Err(ConsoleError::SessionNotFound(connection));
        };
        let slot = session.slot;

        let frame = InboundFrame::decode(data)?;
        trace!(target: "trainerd::router", "{} -> {:?}", connection, frame);

        match frame {
            InboundFrame::Finished => {
                session.next_module_available = true;
                presentation.on_next_module_available(slot);
            }
            InboundFrame::AttentionRequest => {
                session.attention_requested = true;
                presentation.on_attention_requested(slot);
            }
            InboundFrame::Scenarios(names) => {
                if self.catalogs.scenarios.is_some() {
                    trace!(target: "trainerd::router", "Scenario catalog already populated, ignoring list from {}", connection);
                    return Ok(RouteOutcome::Ignored);
                }
                debug!(target: "trainerd::router", "Scenario catalog populated from {}: {} entries", connection, names.len());
                presentation.on_scenario_catalog_populated(&names);
                self.catalogs.scenarios = Some(names);
            }
            InboundFrame::Debug { field: Some(field), value, .. } => {
                session.debug.set(field, value.as_str());
                if self.detail_view != Some(slot) {
                    trace!(target: "trainerd::router", "Stored {:?} for {} outside the detail view", field, slot);
                    return Ok(RouteOutcome::Applied);
                }
                presentation.on_debug_field_updated(slot, field, &value);
            }
            InboundFrame::Debug { field: None, code, .. } => {
                trace!(target: "trainerd::router", "Unknown debug code {:?} from {}", code, connection);
                return Ok(RouteOutcome::Ignored);
            }
            InboundFrame::Languages(names) => {
                debug!(target: "trainerd::router", "Language catalog from {}: {} entries", connection, names.len());
                presentation.on_language_catalog_populated(&names);
                self.catalogs.languages = names;
            }
            InboundFrame::Status(label) => {
                session.labels.apply(&label);
                match &label {
                    StatusLabel::Module(text) => presentation.on_module_label_changed(slot, text),
                    StatusLabel::Scenario(text) => presentation.on_scenario_label_changed(slot, text),
                    StatusLabel::Step(text) => presentation.on_step_label_changed(slot, text),
                }
            }
            InboundFrame::Unclassified(text) => {
                debug!(target: "trainerd::router", "Unclassified frame from {}: {:?}", connection, text);
                return Ok(RouteOutcome::Ignored);
            }
        }

        Ok(RouteOutcome::Applied)
    }
}
