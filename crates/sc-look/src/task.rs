use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, info, warn};
use sc_outline::{CancelToken, Outline, OutlineConfig, build_outline};

use crate::provider::ImageProvider;

/// Decodes `path` and builds its outline.
///
/// Every failure collapses to `None`: the look simply has no collision shape
/// until a later run succeeds. Cancellation is logged at debug level only.
pub fn compute_outline(
    provider: &dyn ImageProvider,
    path: &Path,
    cfg: &OutlineConfig,
    cancel: &CancelToken,
) -> Option<Outline> {
    let mask = match provider.load_mask(path) {
        Ok(mask) => mask,
        Err(e) => {
            warn!("no outline for {}: {e}", path.display());
            return None;
        }
    };

    match build_outline(&mask, cfg, cancel) {
        Ok(outline) => Some(outline),
        Err(e) if e.is_cancelled() => {
            debug!("{}: {e}", path.display());
            None
        }
        Err(e) => {
            warn!("no outline for {}: {e}", path.display());
            None
        }
    }
}

/// Outline computation running on its own thread with a private cancel flag.
#[derive(Debug)]
pub struct OutlineTask {
    path: PathBuf,
    cancel: CancelToken,
    handle: Option<JoinHandle<Option<Outline>>>,
}

impl OutlineTask {
    pub fn spawn(provider: Arc<dyn ImageProvider>, path: PathBuf, cfg: OutlineConfig) -> Self {
        let cancel = CancelToken::new();
        let worker_cancel = cancel.clone();
        let worker_path = path.clone();

        let handle = thread::Builder::new()
            .name(format!("outline:{}", path.display()))
            .spawn(move || compute_outline(provider.as_ref(), &worker_path, &cfg, &worker_cancel));
        let handle = match handle {
            Ok(h) => {
                info!("started outline task for {}", path.display());
                Some(h)
            }
            Err(e) => {
                warn!("cannot start outline task for {}: {e}", path.display());
                None
            }
        };

        Self {
            path,
            cancel,
            handle,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Asks the worker to stop at its next checkpoint.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Waits for the worker. A cancelled, failed or panicked task yields `None`.
    pub fn join(mut self) -> Option<Outline> {
        let handle = self.handle.take()?;
        match handle.join() {
            Ok(outline) => {
                debug!(
                    "outline task for {} finished: {}",
                    self.path.display(),
                    if outline.is_some() { "ok" } else { "no result" }
                );
                outline.filter(|_| !self.cancel.is_cancelled())
            }
            Err(_) => {
                warn!("outline task for {} panicked", self.path.display());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Barrier};

    use sc_core::Image;
    use sc_outline::OutlineConfig;

    use super::{OutlineTask, compute_outline};
    use crate::error::ImageError;
    use crate::provider::ImageProvider;

    struct Solid;

    impl ImageProvider for Solid {
        fn load_mask(&self, _path: &Path) -> Result<Image<u8>, ImageError> {
            Ok(Image::new_fill(20, 20, 255))
        }
    }

    struct Undecodable;

    impl ImageProvider for Undecodable {
        fn load_mask(&self, path: &Path) -> Result<Image<u8>, ImageError> {
            Err(ImageError::Decode {
                path: path.to_path_buf(),
                source: image::ImageError::IoError(std::io::Error::other("corrupt")),
            })
        }
    }

    /// Blocks inside `load_mask` until the test releases it.
    struct Gated(Arc<Barrier>, Arc<Barrier>);

    impl ImageProvider for Gated {
        fn load_mask(&self, _path: &Path) -> Result<Image<u8>, ImageError> {
            self.0.wait();
            self.1.wait();
            Ok(Image::new_fill(20, 20, 255))
        }
    }

    #[test]
    fn task_returns_the_outline() {
        let task = OutlineTask::spawn(
            Arc::new(Solid),
            PathBuf::from("a.png"),
            OutlineConfig::default(),
        );
        let outline = task.join().expect("outline");
        assert_eq!(outline.polygons.len(), 1);
        assert_eq!(outline.polygons[0].len(), 4);
    }

    #[test]
    fn decode_failure_is_no_outline() {
        let _ = env_logger::builder().is_test(true).try_init();
        let out = compute_outline(
            &Undecodable,
            Path::new("broken.png"),
            &OutlineConfig::default(),
            &sc_outline::CancelToken::new(),
        );
        assert!(out.is_none());
    }

    #[test]
    fn cancelled_task_yields_nothing() {
        let started = Arc::new(Barrier::new(2));
        let release = Arc::new(Barrier::new(2));
        let task = OutlineTask::spawn(
            Arc::new(Gated(started.clone(), release.clone())),
            PathBuf::from("slow.png"),
            OutlineConfig::default(),
        );

        started.wait();
        task.cancel();
        release.wait();

        assert!(task.is_cancelled());
        assert!(task.join().is_none());
    }
}
