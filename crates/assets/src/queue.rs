use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crate::loader::{AssetError, AssetLoader, AssetRequest};
use crate::scene::SceneMutation;

/// Outcome of one background load, delivered to the frame tick.
#[derive(Debug)]
pub struct AssetCompletion {
    pub request: AssetRequest,
    pub result: Result<SceneMutation, AssetError>,
}

/// Fire-and-forget background asset loading.
///
/// Each request runs on its own thread; completions are posted over a
/// channel and only become visible when the frame tick calls [`poll`].
/// The scene graph therefore keeps a single writer. Failed loads are not
/// retried.
///
/// [`poll`]: AssetQueue::poll
pub struct AssetQueue {
    loader: Arc<dyn AssetLoader>,
    tx: Sender<AssetCompletion>,
    rx: Receiver<AssetCompletion>,
    in_flight: usize,
}

impl AssetQueue {
    pub fn new(loader: Arc<dyn AssetLoader>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            loader,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Number of requests whose completion has not been polled yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Start loading `request` in the background.
    pub fn request(&mut self, request: AssetRequest) {
        tracing::info!(url = %request.url, kind = ?request.kind, "asset load requested");
        let loader = Arc::clone(&self.loader);
        let tx = self.tx.clone();
        self.in_flight += 1;

        let spawned = thread::Builder::new()
            .name(format!("asset-load:{}", request.url))
            .spawn({
                let request = request.clone();
                move || {
                    let result = loader
                        .load(&request)
                        .map(|asset| asset.into_mutation(&request));
                    // The queue may have been dropped mid-load; nothing to do then.
                    let _ = tx.send(AssetCompletion { request, result });
                }
            });

        if let Err(e) = spawned {
            tracing::error!(url = %request.url, "failed to spawn loader thread: {e}");
            let url = request.url.clone();
            let _ = self.tx.send(AssetCompletion {
                request,
                result: Err(AssetError::Disconnected(url)),
            });
        }
    }

    /// Drain every completion that has arrived, without blocking.
    pub fn poll(&mut self) -> Vec<AssetCompletion> {
        let done: Vec<AssetCompletion> = self.rx.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(done.len());
        done
    }

    /// Block until every in-flight request completed or `timeout` elapsed.
    /// Returns the completions collected while waiting.
    pub fn wait_idle(&mut self, timeout: Duration) -> Vec<AssetCompletion> {
        let deadline = Instant::now() + timeout;
        let mut done = Vec::new();
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(c) => {
                    self.in_flight -= 1;
                    done.push(c);
                }
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        done
    }
}

impl std::fmt::Debug for AssetQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetQueue")
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::tests::hdr_bytes;
    use crate::loader::{FsLoader, LoadedAsset};
    use gazewalk_common::Transform;

    struct FailingLoader;

    impl AssetLoader for FailingLoader {
        fn load(&self, request: &AssetRequest) -> Result<LoadedAsset, AssetError> {
            Err(AssetError::UnsupportedFormat(request.url.clone()))
        }
    }

    #[test]
    fn completion_arrives_via_poll() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("env.hdr"), hdr_bytes(4, 2)).unwrap();
        let mut queue = AssetQueue::new(Arc::new(FsLoader::new(dir.path())));

        queue.request(AssetRequest::environment("env.hdr"));
        assert_eq!(queue.in_flight(), 1);

        let done = queue.wait_idle(Duration::from_secs(5));
        assert_eq!(done.len(), 1);
        assert_eq!(queue.in_flight(), 0);
        assert!(matches!(
            done[0].result,
            Ok(SceneMutation::SetEnvironment(ref e)) if e.width == 4
        ));
    }

    #[test]
    fn failure_is_reported_once() {
        let mut queue = AssetQueue::new(Arc::new(FailingLoader));
        queue.request(AssetRequest::model("scene.glb", Transform::default()));

        let done = queue.wait_idle(Duration::from_secs(5));
        assert_eq!(done.len(), 1);
        assert!(done[0].result.is_err());
        assert!(queue.poll().is_empty());
    }

    #[test]
    fn poll_without_requests_is_empty() {
        let mut queue = AssetQueue::new(Arc::new(FailingLoader));
        assert!(queue.poll().is_empty());
        assert!(queue.wait_idle(Duration::from_millis(1)).is_empty());
    }
}
