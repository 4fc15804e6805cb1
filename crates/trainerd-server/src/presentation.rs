//! Presentation hub publishing console changes to observers.

use std::collections::BTreeSet;
use tokio::sync::broadcast;
use trainerd_core::Presentation;
use trainerd_types::{ConnectionId, DebugField, PresentationEvent, SlotId};

/// Allocates grid slots and republishes every presentation callback as a
/// [`PresentationEvent`].
///
/// Slots are handed out lowest-free-first, so a disconnected device's slot is
/// reused by the next device that connects.
pub struct PresentationHub {
    events: broadcast::Sender<PresentationEvent>,
    used: BTreeSet<u32>,
}

impl PresentationHub {
    pub fn new(events: broadcast::Sender<PresentationEvent>) -> Self {
        Self {
            events,
            used: BTreeSet::new(),
        }
    }

    fn publish(&self, event: PresentationEvent) {
        // No observers connected is fine.
        let _ = self.events.send(event);
    }
}

impl Presentation for PresentationHub {
    fn on_session_created(&mut self, connection: ConnectionId) -> SlotId {
        let index = (0..).find(|i| !self.used.contains(i)).unwrap_or(u32::MAX);
        self.used.insert(index);
        let slot = SlotId(index);
        self.publish(PresentationEvent::SessionCreated { slot, connection });
        slot
    }

    fn on_session_destroyed(&mut self, slot: SlotId) {
        self.used.remove(&slot.0);
        self.publish(PresentationEvent::SessionDestroyed { slot });
    }

    fn on_module_label_changed(&mut self, slot: SlotId, text: &str) {
        self.publish(PresentationEvent::ModuleLabelChanged { slot, text: text.to_string() });
    }

    fn on_scenario_label_changed(&mut self, slot: SlotId, text: &str) {
        self.publish(PresentationEvent::ScenarioLabelChanged { slot, text: text.to_string() });
    }

    fn on_step_label_changed(&mut self, slot: SlotId, text: &str) {
        self.publish(PresentationEvent::StepLabelChanged { slot, text: text.to_string() });
    }

    fn on_attention_requested(&mut self, slot: SlotId) {
        self.publish(PresentationEvent::AttentionRequested { slot });
    }

    fn on_next_module_available(&mut self, slot: SlotId) {
        self.publish(PresentationEvent::NextModuleAvailable { slot });
    }

    fn on_debug_field_updated(&mut self, slot: SlotId, field: DebugField, text: &str) {
        self.publish(PresentationEvent::DebugFieldUpdated { slot, field, text: text.to_string() });
    }

    fn on_scenario_catalog_populated(&mut self, names: &[String]) {
        self.publish(PresentationEvent::ScenarioCatalogPopulated { names: names.to_vec() });
    }

    fn on_language_catalog_populated(&mut self, names: &[String]) {
        self.publish(PresentationEvent::LanguageCatalogPopulated { names: names.to_vec() });
    }
}
