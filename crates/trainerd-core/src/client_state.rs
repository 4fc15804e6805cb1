//! Operator-controlled settings of one device.

use crate::{ConsoleError, Result};
use serde::Serialize;
use trainerd_types::HintCategory;

/// Settings the operator pushed to a device.
///
/// Always created fresh with its session, so a presentation slot reused by a
/// new device never inherits the previous device's hints or volume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientState {
    /// Lector volume in `[0.0, 1.0]`.
    pub lector_volume: f32,
    /// One entry per [`HintCategory`], in wire-index order.
    pub hints: Vec<bool>,
    /// Last language sent to the device.
    pub language: Option<String>,
    /// Last pendant pairing id sent to the device.
    pub pilot_id: Option<String>,
}

impl Default for ClientState {
    fn default() -> Self {
        Self::with_categories(HintCategory::COUNT)
    }
}

impl ClientState {
    /// Build a state with an explicit hint table size.
    pub fn with_categories(count: usize) -> Self {
        if count == 0 {
            tracing::warn!(target: "trainerd::session", "Client state created with zero hint categories");
        }
        Self {
            lector_volume: 1.0,
            hints: vec![false; count],
            language: None,
            pilot_id: None,
        }
    }

    pub fn hint(&self, category: HintCategory) -> bool {
        self.hints.get(category.index()).copied().unwrap_or(false)
    }

    pub fn set_hint(&mut self, index: usize, enabled: bool) -> Result<()> {
        let slot = self
            .hints
            .get_mut(index)
            .ok_or(ConsoleError::HintCategoryOutOfRange(index))?;
        *slot = enabled;
        Ok(())
    }

    /// Store a volume, clamped into `[0.0, 1.0]`. NaN is treated as silence.
    pub fn set_lector_volume(&mut self, volume: f32) {
        self.lector_volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
    }
}
