//! Inbound text frames sent by devices.
//!
//! Devices speak a prefix-multiplexed text protocol. Frames are decoded once,
//! at the transport boundary, into [`InboundFrame`]; prefixes are tried in a
//! fixed priority order and the first match wins, so a payload that happens to
//! contain another prefix further in never changes the classification.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const FINISHED_PREFIX: &str = "finished";
const REQUEST_PREFIX: &str = "request";
const SCENARIOS_PREFIX: &str = "scenarios";
const SCENARIOS_MARKER: &str = "scenarios,";
const DEBUG_PREFIX: &str = "debug";
const LANGUAGES_PREFIX: &str = "languages";

/// Errors raised while decoding a device frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Malformed debug frame: {0:?}")]
    MalformedDebug(String),

    #[error("Malformed language list: {0:?}")]
    MalformedLanguages(String),
}

/// Debug readout fields reported by a device, keyed by numeric wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebugField {
    /// Code 20.
    NetworkName,
    /// Code 21.
    SignalStrength,
    /// Code 22.
    FrameRate,
    /// Code 23.
    BatteryStatus,
    /// Code 24.
    HardwareAddress,
}

impl DebugField {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "20" => Some(DebugField::NetworkName),
            "21" => Some(DebugField::SignalStrength),
            "22" => Some(DebugField::FrameRate),
            "23" => Some(DebugField::BatteryStatus),
            "24" => Some(DebugField::HardwareAddress),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            DebugField::NetworkName => 20,
            DebugField::SignalStrength => 21,
            DebugField::FrameRate => 22,
            DebugField::BatteryStatus => 23,
            DebugField::HardwareAddress => 24,
        }
    }
}

/// Label update carried by a free-form status frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum StatusLabel {
    Module(String),
    Scenario(String),
    Step(String),
}

/// A decoded device frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    /// Device finished its module; the operator may advance it.
    Finished,
    /// Trainee asked for the operator's attention.
    AttentionRequest,
    /// Scenario catalog advertised by the device.
    Scenarios(Vec<String>),
    /// One debug readout value. `field` is `None` for codes outside the known set.
    Debug {
        field: Option<DebugField>,
        code: String,
        value: String,
    },
    /// Language catalog advertised by the device.
    Languages(Vec<String>),
    /// Module/scenario/step label update.
    Status(StatusLabel),
    /// Free-form text that matched nothing.
    Unclassified(String),
}

impl InboundFrame {
    /// Decode one frame.
    pub fn decode(data: &str) -> Result<Self, ProtocolError> {
        if data.starts_with(FINISHED_PREFIX) {
            return Ok(InboundFrame::Finished);
        }
        if data.starts_with(REQUEST_PREFIX) {
            return Ok(InboundFrame::AttentionRequest);
        }
        if data.starts_with(SCENARIOS_PREFIX) {
            return Ok(InboundFrame::Scenarios(parse_scenarios(data)));
        }
        if data.starts_with(DEBUG_PREFIX) {
            return parse_debug(data);
        }
        if data.starts_with(LANGUAGES_PREFIX) {
            return parse_languages(data).map(InboundFrame::Languages);
        }
        Ok(parse_status(data))
    }
}

// Every `scenarios,` marker is removed, wherever it appears.
fn parse_scenarios(data: &str) -> Vec<String> {
    let payload = data.replace(SCENARIOS_MARKER, "");
    let payload = payload.trim();
    if payload.is_empty() {
        return Vec::new();
    }
    payload.split(',').map(str::to_string).collect()
}

fn parse_debug(data: &str) -> Result<InboundFrame, ProtocolError> {
    let mut parts = data.split(',').skip(1);
    match (parts.next(), parts.next()) {
        (Some(code), Some(value)) => Ok(InboundFrame::Debug {
            field: DebugField::from_code(code),
            code: code.to_string(),
            value: value.to_string(),
        }),
        _ => Err(ProtocolError::MalformedDebug(data.to_string())),
    }
}

fn parse_languages(data: &str) -> Result<Vec<String>, ProtocolError> {
    let parts: Vec<&str> = data.split(',').collect();
    if parts.len() < 2 {
        return Err(ProtocolError::MalformedLanguages(data.to_string()));
    }
    // First token is the marker, last is a trailing sentinel.
    Ok(parts[1..parts.len() - 1]
        .iter()
        .map(|s| s.to_string())
        .collect())
}

fn parse_status(data: &str) -> InboundFrame {
    if data.contains("module") {
        InboundFrame::Status(StatusLabel::Module(data.replace("module", "")))
    } else if data.contains("scenario") {
        InboundFrame::Status(StatusLabel::Scenario(data.replace("scenario", "")))
    } else if data.contains("step") {
        InboundFrame::Status(StatusLabel::Step(data.replace("step", "")))
    } else {
        InboundFrame::Unclassified(data.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_simple_prefixes() {
        assert_eq!(InboundFrame::decode("finished").unwrap(), InboundFrame::Finished);
        assert_eq!(InboundFrame::decode("finished module 3").unwrap(), InboundFrame::Finished);
        assert_eq!(InboundFrame::decode("request").unwrap(), InboundFrame::AttentionRequest);
    }

    #[test]
    fn test_decode_scenarios() {
        let frame = InboundFrame::decode("scenarios,A,B,C").unwrap();
        assert_eq!(
            frame,
            InboundFrame::Scenarios(vec!["A".into(), "B".into(), "C".into()])
        );

        // Surrounding whitespace on the payload is trimmed
        let frame = InboundFrame::decode("scenarios,1: Fire,2: Flood \n").unwrap();
        assert_eq!(
            frame,
            InboundFrame::Scenarios(vec!["1: Fire".into(), "2: Flood".into()])
        );

        assert_eq!(
            InboundFrame::decode("scenarios,").unwrap(),
            InboundFrame::Scenarios(vec![])
        );
    }

    #[test]
    fn test_decode_scenarios_strips_every_marker() {
        assert_eq!(
            InboundFrame::decode("scenarios,A,scenarios,B").unwrap(),
            InboundFrame::Scenarios(vec!["A".into(), "B".into()])
        );
        // Without the comma the prefix is kept as part of the first entry
        assert_eq!(
            InboundFrame::decode("scenariosX,Y").unwrap(),
            InboundFrame::Scenarios(vec!["scenariosX".into(), "Y".into()])
        );
    }

    #[test]
    fn test_decode_debug() {
        let frame = InboundFrame::decode("debug,22,60").unwrap();
        assert_eq!(
            frame,
            InboundFrame::Debug {
                field: Some(DebugField::FrameRate),
                code: "22".into(),
                value: "60".into(),
            }
        );

        let frame = InboundFrame::decode("debug,99,val").unwrap();
        assert!(matches!(frame, InboundFrame::Debug { field: None, .. }));

        assert!(matches!(
            InboundFrame::decode("debug,22"),
            Err(ProtocolError::MalformedDebug(_))
        ));
    }

    #[test]
    fn test_decode_languages_drops_marker_and_sentinel() {
        let frame = InboundFrame::decode("languages,English,Polski,end").unwrap();
        assert_eq!(
            frame,
            InboundFrame::Languages(vec!["English".into(), "Polski".into()])
        );

        assert_eq!(
            InboundFrame::decode("languages,").unwrap(),
            InboundFrame::Languages(vec![])
        );
        assert!(InboundFrame::decode("languages").is_err());
    }

    #[test]
    fn test_decode_status_labels() {
        assert_eq!(
            InboundFrame::decode("module3").unwrap(),
            InboundFrame::Status(StatusLabel::Module("3".into()))
        );
        assert_eq!(
            InboundFrame::decode("scenario12").unwrap(),
            InboundFrame::Status(StatusLabel::Scenario("12".into()))
        );
        assert_eq!(
            InboundFrame::decode("stepFinal").unwrap(),
            InboundFrame::Status(StatusLabel::Step("Final".into()))
        );
        // module is checked before step
        assert_eq!(
            InboundFrame::decode("step module2").unwrap(),
            InboundFrame::Status(StatusLabel::Module("step 2".into()))
        );
        assert_eq!(
            InboundFrame::decode("hello").unwrap(),
            InboundFrame::Unclassified("hello".into())
        );
    }

    #[test]
    fn test_prefix_priority() {
        // A scenario list whose ids look like other prefixes stays a scenario list
        let frame = InboundFrame::decode("scenarios,debug,finished").unwrap();
        assert_eq!(
            frame,
            InboundFrame::Scenarios(vec!["debug".into(), "finished".into()])
        );
        // "requested module" starts with "request"
        assert_eq!(
            InboundFrame::decode("requested module").unwrap(),
            InboundFrame::AttentionRequest
        );
    }

    #[test]
    fn test_debug_field_codes() {
        for code in 20..=24u8 {
            let field = DebugField::from_code(&code.to_string()).unwrap();
            assert_eq!(field.code(), code);
        }
        assert_eq!(DebugField::from_code("19"), None);
    }
}
