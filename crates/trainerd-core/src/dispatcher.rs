//! Outbound command dispatch.

use crate::{ConsoleError, Result, Session, SessionRegistry, Transport};
use std::sync::Arc;
use tracing::{debug, trace, warn};
use trainerd_types::{Command, HintCategory, OperatorCommand, SlotId, Target};

/// Result of a dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Frames handed to the transport.
    pub sent: usize,
}

/// Sends commands to one, the selected, or every session.
#[derive(Clone)]
pub struct CommandDispatcher {
    transport: Arc<dyn Transport>,
}

impl CommandDispatcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Send `command` to every session `target` resolves to.
    ///
    /// `Target::Selected` with nothing selected sends nothing. A broadcast
    /// skips sessions whose send fails; a unicast reports the failure.
    pub fn dispatch(
        &self,
        registry: &mut SessionRegistry,
        selected: Option<SlotId>,
        target: Target,
        command: &Command,
    ) -> Result<DispatchReport> {
        let mut report = DispatchReport::default();

        match target {
            Target::All => {
                for connection in registry.connections() {
                    let Some(session) = registry.find_mut(connection) else {
                        continue;
                    };
                    match self.send(session, command) {
                        Ok(()) => report.sent += 1,
                        Err(e) => {
                            warn!(target: "trainerd::dispatch", "Broadcast to {} failed: {}", connection, e);
                        }
                    }
                }
                debug!(target: "trainerd::dispatch", "Broadcast {:?} to {} sessions", command, report.sent);
            }
            Target::Selected => {
                let Some(slot) = selected else {
                    trace!(target: "trainerd::dispatch", "Nothing selected, dropping {:?}", command);
                    return Ok(report);
                };
                let Some(session) = registry.find_by_slot_mut(slot) else {
                    trace!(target: "trainerd::dispatch", "Selected {} has no session, dropping {:?}", slot, command);
                    return Ok(report);
                };
                self.send(session, command)?;
                report.sent = 1;
            }
            Target::Slot(slot) => {
                let session = registry.find_by_slot_mut(slot).ok_or_else(|| {
                    warn!(target: "trainerd::dispatch", "No session in {} for {:?}", slot, command);
                    ConsoleError::SlotNotFound(slot)
                })?;
                self.send(session, command)?;
                report.sent = 1;
            }
            Target::Connection(connection) => {
                let session = registry.find_mut(connection).ok_or_else(|| {
                    warn!(target: "trainerd::dispatch", "Session not found for {} ({:?})", connection, command);
                    ConsoleError::SessionNotFound(connection)
                })?;
                self.send(session, command)?;
                report.sent = 1;
            }
        }

        Ok(report)
    }

    /// Send to one session and record the operator-side effect on success.
    pub fn send(&self, session: &mut Session, command: &Command) -> Result<()> {
        let frame = command.encode();
        self.transport
            .send(session.connection, &frame, command.send_mode())?;
        trace!(target: "trainerd::dispatch", "{} <- {:?}", session.connection, frame);
        apply_local(session, command);
        Ok(())
    }
}

fn apply_local(session: &mut Session, command: &Command) {
    match command {
        Command::NextModule => session.next_module_available = false,
        Command::ToggleHints { category, enabled } => {
            if let Err(e) = session.state.set_hint(*category, *enabled) {
                warn!(target: "trainerd::dispatch", "Hint not recorded for {}: {}", session.connection, e);
            }
        }
        Command::LectorVolume(volume) => session.state.set_lector_volume(*volume),
        Command::Language(name) => session.state.language = Some(name.clone()),
        Command::PilotId(id) => session.state.pilot_id = Some(id.clone()),
        _ => {}
    }
}

/// Turn an operator request into a wire command.
///
/// Malformed numeric input fails only this request. The tracker threshold is
/// the exception: unparseable input yields `Ok(None)` and nothing is sent.
pub fn resolve_operator_command(request: OperatorCommand) -> Result<Option<Command>> {
    let command = match request {
        OperatorCommand::NextModule => Command::NextModule,
        OperatorCommand::RunModule { input } => Command::RunModule(parse_int("module", &input)?),
        OperatorCommand::RunScenario { input } => Command::RunScenario(parse_int("scenario", &input)?),
        OperatorCommand::RunNamedScenario { name } => Command::RunNamedScenario(name),
        OperatorCommand::RunScenarioOption { option } => {
            let id = scenario_id_from_option(&option).ok_or(ConsoleError::InvalidOperatorInput {
                field: "scenario option",
                input: option.clone(),
            })?;
            Command::RunNamedScenario(id.to_string())
        }
        OperatorCommand::RunStep { input } => Command::RunStep(parse_int("step", &input)?),
        OperatorCommand::Message { text } => Command::Message(text),
        OperatorCommand::Watch { on } => Command::Watch(on),
        OperatorCommand::ResetPilot => Command::ResetPilot,
        OperatorCommand::SetLanguage { name } => Command::Language(name),
        OperatorCommand::SetPilotId { id } => Command::PilotId(id),
        OperatorCommand::ToggleHint { category, enabled } => {
            if HintCategory::from_index(category).is_none() {
                return Err(ConsoleError::HintCategoryOutOfRange(category));
            }
            Command::ToggleHints { category, enabled }
        }
        OperatorCommand::SetLectorVolume { volume } => {
            if volume.is_nan() {
                return Err(ConsoleError::InvalidOperatorInput {
                    field: "lector volume",
                    input: volume.to_string(),
                });
            }
            Command::LectorVolume(volume)
        }
        OperatorCommand::SetTrackerThreshold { input } => match parse_tracker_threshold(&input) {
            Some(level) => Command::TrackerThreshold(level),
            None => {
                debug!(target: "trainerd::dispatch", "Ignoring tracker threshold input {:?}", input);
                return Ok(None);
            }
        },
    };
    Ok(Some(command))
}

/// Scenario id from a catalog entry label: the text before the first space,
/// with surrounding `:` removed (`"12: Fire drill"` -> `"12"`).
pub fn scenario_id_from_option(option: &str) -> Option<&str> {
    let id = option.split(' ').next()?.trim_matches(':');
    (!id.is_empty()).then_some(id)
}

fn parse_int(field: &'static str, input: &str) -> Result<i32> {
    input
        .trim()
        .parse()
        .map_err(|_| ConsoleError::InvalidOperatorInput {
            field,
            input: input.to_string(),
        })
}

fn parse_tracker_threshold(input: &str) -> Option<f32> {
    let level: f32 = input.trim().parse().ok()?;
    if level.is_nan() {
        return None;
    }
    Some(level.clamp(0.0, 100.0))
}
