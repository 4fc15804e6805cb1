//! Callbacks into the presentation layer.

use trainerd_types::{ConnectionId, DebugField, SlotId};

/// Presentation collaborator observing session changes.
///
/// Only slot allocation returns a value; every other callback is a
/// notification and cannot fail from the console's point of view.
pub trait Presentation: Send {
    /// Allocate a display slot for a newly connected device.
    fn on_session_created(&mut self, connection: ConnectionId) -> SlotId;
    /// Release the slot of a disconnected device.
    fn on_session_destroyed(&mut self, slot: SlotId);
    fn on_module_label_changed(&mut self, slot: SlotId, text: &str);
    fn on_scenario_label_changed(&mut self, slot: SlotId, text: &str);
    fn on_step_label_changed(&mut self, slot: SlotId, text: &str);
    fn on_attention_requested(&mut self, slot: SlotId);
    fn on_next_module_available(&mut self, slot: SlotId);
    fn on_debug_field_updated(&mut self, slot: SlotId, field: DebugField, text: &str);
    fn on_scenario_catalog_populated(&mut self, names: &[String]);
    fn on_language_catalog_populated(&mut self, names: &[String]);
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use trainerd_types::PresentationEvent;

    /// Records every callback as a [`PresentationEvent`] and hands out slots
    /// lowest-free-first.
    #[derive(Debug, Default)]
    pub struct RecordingPresentation {
        pub events: Vec<PresentationEvent>,
        used: Vec<SlotId>,
    }

    impl RecordingPresentation {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn take(&mut self) -> Vec<PresentationEvent> {
            std::mem::take(&mut self.events)
        }
    }

    impl Presentation for RecordingPresentation {
        fn on_session_created(&mut self, connection: ConnectionId) -> SlotId {
            let slot = (0..)
                .map(SlotId)
                .find(|s| !self.used.contains(s))
                .unwrap_or(SlotId(0));
            self.used.push(slot);
            self.events.push(PresentationEvent::SessionCreated { slot, connection });
            slot
        }

        fn on_session_destroyed(&mut self, slot: SlotId) {
            self.used.retain(|s| *s != slot);
            self.events.push(PresentationEvent::SessionDestroyed { slot });
        }

        fn on_module_label_changed(&mut self, slot: SlotId, text: &str) {
            self.events.push(PresentationEvent::ModuleLabelChanged { slot, text: text.to_string() });
        }

        fn on_scenario_label_changed(&mut self, slot: SlotId, text: &str) {
            self.events.push(PresentationEvent::ScenarioLabelChanged { slot, text: text.to_string() });
        }

        fn on_step_label_changed(&mut self, slot: SlotId, text: &str) {
            self.events.push(PresentationEvent::StepLabelChanged { slot, text: text.to_string() });
        }

        fn on_attention_requested(&mut self, slot: SlotId) {
            self.events.push(PresentationEvent::AttentionRequested { slot });
        }

        fn on_next_module_available(&mut self, slot: SlotId) {
            self.events.push(PresentationEvent::NextModuleAvailable { slot });
        }

        fn on_debug_field_updated(&mut self, slot: SlotId, field: DebugField, text: &str) {
            self.events.push(PresentationEvent::DebugFieldUpdated { slot, field, text: text.to_string() });
        }

        fn on_scenario_catalog_populated(&mut self, names: &[String]) {
            self.events.push(PresentationEvent::ScenarioCatalogPopulated { names: names.to_vec() });
        }

        fn on_language_catalog_populated(&mut self, names: &[String]) {
            self.events.push(PresentationEvent::LanguageCatalogPopulated { names: names.to_vec() });
        }
    }
}
