//! Events published to presentation observers.

use crate::{ConnectionId, DebugField, SlotId};
use serde::{Deserialize, Serialize};

/// Presentation-facing event stream, one message per state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PresentationEvent {
    SessionCreated { slot: SlotId, connection: ConnectionId },
    SessionDestroyed { slot: SlotId },
    ModuleLabelChanged { slot: SlotId, text: String },
    ScenarioLabelChanged { slot: SlotId, text: String },
    StepLabelChanged { slot: SlotId, text: String },
    AttentionRequested { slot: SlotId },
    NextModuleAvailable { slot: SlotId },
    DebugFieldUpdated { slot: SlotId, field: DebugField, text: String },
    ScenarioCatalogPopulated { names: Vec<String> },
    LanguageCatalogPopulated { names: Vec<String> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let event = PresentationEvent::DebugFieldUpdated {
            slot: SlotId(1),
            field: DebugField::FrameRate,
            text: "60".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "debug_field_updated");
        assert_eq!(json["slot"], 1);
        assert_eq!(json["field"], "frame_rate");
        assert_eq!(json["text"], "60");
    }
}
