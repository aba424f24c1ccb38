use super::bundle::AssetBundle;
use super::manager::AssetLoader;
use super::{AssetId, AssetPaths};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, error};

/// Identifies one `load_asset` request. Issued in strictly increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(pub u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    #[error("failed to load {asset} from {}: {reason}", .path.display())]
    Failed {
        asset: AssetId,
        path: PathBuf,
        reason: String,
    },
}

impl LoadError {
    pub fn asset(&self) -> AssetId {
        match self {
            LoadError::Failed { asset, .. } => *asset,
        }
    }
}

#[derive(Debug)]
pub struct LoadCompletion {
    pub token: RequestToken,
    pub asset: AssetId,
    pub result: Result<AssetBundle, LoadError>,
}

pub type BundleLoader = Arc<dyn AssetLoader<AssetBundle>>;

/// Runs bundle loads on the tokio runtime and hands the results back to the
/// frame thread in completion order. Loads are never cancelled.
pub struct LoadQueue {
    loader: BundleLoader,
    runtime: Handle,
    paths: AssetPaths,
    next_token: u64,
    tx: Sender<LoadCompletion>,
    rx: Receiver<LoadCompletion>,
}

impl LoadQueue {
    pub fn new(loader: BundleLoader, runtime: Handle, paths: AssetPaths) -> Self {
        let (tx, rx) = unbounded();
        Self {
            loader,
            runtime,
            paths,
            next_token: 0,
            tx,
            rx,
        }
    }

    pub fn paths(&self) -> &AssetPaths {
        &self.paths
    }

    pub fn request(&mut self, asset: AssetId) -> RequestToken {
        self.next_token += 1;
        let token = RequestToken(self.next_token);
        let path = self.paths.resolve(asset);
        let loader = Arc::clone(&self.loader);
        let tx = self.tx.clone();

        debug!("Load {} requested for {} at {:?}", token, asset, path);
        self.runtime.spawn(async move {
            let result = loader.load(&path).await.map_err(|e| LoadError::Failed {
                asset,
                path: path.clone(),
                reason: format!("{:#}", e),
            });
            if tx.send(LoadCompletion { token, asset, result }).is_err() {
                error!("Load {} for {} finished after the queue was dropped", token, asset);
            }
        });
        token
    }

    /// Every completion that has arrived so far, oldest first.
    pub fn drain(&self) -> Vec<LoadCompletion> {
        self.rx.try_iter().collect()
    }

    /// Blocks until the next completion arrives.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<LoadCompletion> {
        match self.rx.recv_timeout(timeout) {
            Ok(completion) => Some(completion),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
