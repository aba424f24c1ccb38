use super::scene::node::ReleasableResource;
use std::collections::HashSet;
use tracing::{debug, warn};

/// The renderer side of resource ownership: everything uploaded must
/// eventually be released exactly once.
pub trait GraphicsResources {
    fn upload(&mut self, resource: &ReleasableResource);
    fn release(&mut self, resource: &ReleasableResource);
}

/// Tracks live GPU resources so leaks across swaps are observable.
#[derive(Debug, Default)]
pub struct ResourceLedger {
    live: HashSet<ReleasableResource>,
    uploads: u64,
    releases: u64,
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, resource: &ReleasableResource) -> bool {
        self.live.contains(resource)
    }

    pub fn uploads(&self) -> u64 {
        self.uploads
    }

    pub fn releases(&self) -> u64 {
        self.releases
    }
}

impl GraphicsResources for ResourceLedger {
    fn upload(&mut self, resource: &ReleasableResource) {
        self.uploads += 1;
        if !self.live.insert(*resource) {
            warn!("Resource {:?} uploaded twice", resource);
        }
    }

    fn release(&mut self, resource: &ReleasableResource) {
        self.releases += 1;
        if self.live.remove(resource) {
            debug!("Released {:?}", resource);
        } else {
            warn!("Released {:?} which was not live", resource);
        }
    }
}
