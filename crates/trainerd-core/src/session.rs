//! Session records kept by the registry.

use crate::ClientState;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use trainerd_types::{ConnectionId, DebugField, SlotId, StatusLabel};

/// Last module/scenario/step text a device reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusLabels {
    pub module: Option<String>,
    pub scenario: Option<String>,
    pub step: Option<String>,
}

impl StatusLabels {
    pub fn apply(&mut self, label: &StatusLabel) {
        match label {
            StatusLabel::Module(text) => self.module = Some(text.clone()),
            StatusLabel::Scenario(text) => self.scenario = Some(text.clone()),
            StatusLabel::Step(text) => self.step = Some(text.clone()),
        }
    }
}

/// Latest value per debug field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DebugReadout(BTreeMap<DebugField, String>);

impl DebugReadout {
    pub fn get(&self, field: DebugField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn set(&mut self, field: DebugField, value: impl Into<String>) {
        self.0.insert(field, value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One connected device.
#[derive(Debug, Clone)]
pub struct Session {
    pub connection: ConnectionId,
    pub slot: SlotId,
    pub state: ClientState,
    pub labels: StatusLabels,
    pub attention_requested: bool,
    pub next_module_available: bool,
    pub debug: DebugReadout,
    pub connected_at: DateTime<Utc>,
}

impl Session {
    pub(crate) fn new(connection: ConnectionId, slot: SlotId) -> Self {
        Self {
            connection,
            slot,
            state: ClientState::default(),
            labels: StatusLabels::default(),
            attention_requested: false,
            next_module_available: false,
            debug: DebugReadout::default(),
            connected_at: Utc::now(),
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            connection: self.connection,
            slot: self.slot,
            labels: self.labels.clone(),
            attention_requested: self.attention_requested,
            next_module_available: self.next_module_available,
            connected_at: self.connected_at,
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            summary: self.summary(),
            state: self.state.clone(),
            debug: self.debug.clone(),
        }
    }
}

/// Grid-level view of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub connection: ConnectionId,
    pub slot: SlotId,
    pub labels: StatusLabels,
    pub attention_requested: bool,
    pub next_module_available: bool,
    pub connected_at: DateTime<Utc>,
}

/// Detail view of a session, used to seed the operator's fullscreen panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub summary: SessionSummary,
    pub state: ClientState,
    pub debug: DebugReadout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_apply() {
        let mut labels = StatusLabels::default();
        labels.apply(&StatusLabel::Module("3".into()));
        labels.apply(&StatusLabel::Step("Final".into()));
        assert_eq!(labels.module.as_deref(), Some("3"));
        assert_eq!(labels.scenario, None);
        assert_eq!(labels.step.as_deref(), Some("Final"));
    }

    #[test]
    fn test_debug_readout() {
        let mut debug = DebugReadout::default();
        assert!(debug.is_empty());
        debug.set(DebugField::FrameRate, "60");
        debug.set(DebugField::FrameRate, "72");
        assert_eq!(debug.get(DebugField::FrameRate), Some("72"));
        assert_eq!(debug.get(DebugField::NetworkName), None);
    }
}
