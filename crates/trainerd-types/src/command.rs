//! Outbound control commands and operator requests.

use crate::{ConnectionId, SlotId};
use serde::{Deserialize, Serialize};

/// Transport delivery mode for an outbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendMode {
    /// Ordered and guaranteed while the connection lives.
    Reliable,
    /// Best effort; may be dropped.
    Unreliable,
}

/// A control command sent to a device.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    NextModule,
    RunModule(i32),
    RunScenario(i32),
    RunNamedScenario(String),
    RunStep(i32),
    Message(String),
    Watch(bool),
    ResetPilot,
    Language(String),
    PilotId(String),
    ToggleHints { category: usize, enabled: bool },
    LectorVolume(f32),
    TrackerThreshold(f32),
}

impl Command {
    /// Encode the command as a single text frame.
    pub fn encode(&self) -> String {
        match self {
            Command::NextModule => "next".to_string(),
            Command::RunModule(n) => format!("module{}", n),
            Command::RunScenario(n) => format!("scenario{}", n),
            Command::RunNamedScenario(name) => format!("runScenario{}", name),
            Command::RunStep(n) => format!("step{}", n),
            Command::Message(text) => format!("message\n{}", text),
            Command::Watch(true) => "watch".to_string(),
            Command::Watch(false) => "stop".to_string(),
            Command::ResetPilot => "resetpilot\n".to_string(),
            Command::Language(name) => format!("language:{}", name),
            Command::PilotId(id) => format!("pilotID:{}", id),
            Command::ToggleHints { category, enabled } => {
                format!("toggleHints:{}:{}", category, bool_literal(*enabled))
            }
            Command::LectorVolume(volume) => format!("lectorVolume:{}", volume),
            Command::TrackerThreshold(level) => format!("tracker:{}", level),
        }
    }

    /// Delivery mode the frame is sent with.
    ///
    /// Indicator-style commands the operator can simply resend go unreliable;
    /// anything that changes scenario flow or device settings goes reliable.
    pub fn send_mode(&self) -> SendMode {
        match self {
            Command::NextModule
            | Command::Message(_)
            | Command::Watch(_)
            | Command::ResetPilot => SendMode::Unreliable,
            _ => SendMode::Reliable,
        }
    }
}

// Devices parse booleans with capitalized literals.
fn bool_literal(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// Who an operator command is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Target {
    /// Every registered session.
    All,
    /// The session currently open in the detail view.
    Selected,
    /// The session shown in a presentation slot.
    Slot(SlotId),
    /// A specific connection.
    Connection(ConnectionId),
}

/// Operator request, carrying operator-entered text as-is.
///
/// Numeric fields are free-form text; they are parsed when the request is
/// turned into a [`Command`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OperatorCommand {
    NextModule,
    RunModule { input: String },
    RunScenario { input: String },
    RunNamedScenario { name: String },
    /// Run the scenario named by a catalog entry such as `"12: Fire drill"`.
    RunScenarioOption { option: String },
    RunStep { input: String },
    Message { text: String },
    Watch { on: bool },
    ResetPilot,
    SetLanguage { name: String },
    SetPilotId { id: String },
    ToggleHint { category: usize, enabled: bool },
    SetLectorVolume { volume: f32 },
    SetTrackerThreshold { input: String },
}
