use crate::assets::{AssetId, LoadError, RequestToken};
use std::time::SystemTime;

/// Outcome of a successful swap.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapReport {
    pub asset: AssetId,
    pub previous: Option<AssetId>,
    pub released_resources: usize,
    pub released_meshes: usize,
    pub uploaded_resources: usize,
    pub clip: Option<String>,
    pub morph_controls: usize,
    pub timestamp: SystemTime,
}

/// What happened when a load completion was applied.
#[derive(Debug, Clone)]
pub enum StageEvent {
    Installed(SwapReport),
    Discarded { asset: AssetId, token: RequestToken },
    Failed(LoadError),
}

impl StageEvent {
    pub fn is_installed(&self) -> bool {
        matches!(self, StageEvent::Installed(_))
    }
}
