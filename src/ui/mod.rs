pub mod debug_panel;
pub mod morph_panel;

use crate::assets::AssetId;
use crate::world::StageEvent;

pub use debug_panel::show_debug_panel;
pub use morph_panel::{MorphControl, MorphFolder, MorphPanel};

/// Widget state that outlives a single frame.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub selected_asset: AssetId,
    /// The asset actually on stage; the picker falls back to it on failure.
    pub displayed_asset: Option<AssetId>,
    pub error_message: Option<String>,
}

impl UiState {
    pub fn new(initial: AssetId) -> Self {
        Self {
            selected_asset: initial,
            displayed_asset: None,
            error_message: None,
        }
    }

    pub fn apply_event(&mut self, event: &StageEvent) {
        match event {
            StageEvent::Installed(report) => {
                self.displayed_asset = Some(report.asset);
                self.error_message = None;
            }
            StageEvent::Failed(err) => {
                self.error_message = Some(err.to_string());
                if let Some(displayed) = self.displayed_asset {
                    self.selected_asset = displayed;
                }
            }
            StageEvent::Discarded { .. } => {}
        }
    }
}
