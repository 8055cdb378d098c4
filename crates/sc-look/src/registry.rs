use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};
use sc_outline::{CancelToken, Outline, OutlineConfig, decode, encode};

use crate::provider::ImageProvider;
use crate::store::MetadataStore;
use crate::task::{OutlineTask, compute_outline};

/// Metadata key under which outlines are persisted.
pub const COLLISION_METADATA_KEY: &str = "CollisionPolygonVertices";

#[derive(Debug, Clone, PartialEq)]
pub struct GatherConfig {
    pub metadata_key: String,
    pub outline: OutlineConfig,
    /// Write outlines that had to be computed back to the store.
    pub persist_computed: bool,
}

impl Default for GatherConfig {
    fn default() -> Self {
        Self {
            metadata_key: COLLISION_METADATA_KEY.to_owned(),
            outline: OutlineConfig::default(),
            persist_computed: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LookId(usize);

impl LookId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Where a look's outline came from during the last gather.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineSource {
    Persisted,
    Background,
    Synchronous,
    Missing,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GatherReport {
    pub persisted: usize,
    pub background: usize,
    pub synchronous: usize,
    pub missing: usize,
}

impl GatherReport {
    pub fn total(&self) -> usize {
        self.persisted + self.background + self.synchronous + self.missing
    }

    fn record(&mut self, source: OutlineSource) {
        match source {
            OutlineSource::Persisted => self.persisted += 1,
            OutlineSource::Background => self.background += 1,
            OutlineSource::Synchronous => self.synchronous += 1,
            OutlineSource::Missing => self.missing += 1,
        }
    }
}

#[derive(Debug)]
struct LookEntry {
    name: String,
    path: PathBuf,
    task: Option<OutlineTask>,
    outline: Option<Outline>,
    source: Option<OutlineSource>,
}

/// Looks of one project together with their collision outlines.
///
/// Owns the image provider and metadata store; there is no global project
/// state. Background tasks are started per look and consulted only after
/// [`CollisionRegistry::gather`] has joined all of them.
pub struct CollisionRegistry {
    provider: Arc<dyn ImageProvider>,
    store: Arc<dyn MetadataStore>,
    config: GatherConfig,
    looks: Vec<LookEntry>,
    /// Cancelled tasks replaced by a restart, joined on the next gather.
    superseded: Vec<OutlineTask>,
}

impl CollisionRegistry {
    pub fn new(
        provider: Arc<dyn ImageProvider>,
        store: Arc<dyn MetadataStore>,
        config: GatherConfig,
    ) -> Self {
        Self {
            provider,
            store,
            config,
            looks: Vec::new(),
            superseded: Vec::new(),
        }
    }

    pub fn config(&self) -> &GatherConfig {
        &self.config
    }

    pub fn add_look(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> LookId {
        self.looks.push(LookEntry {
            name: name.into(),
            path: path.into(),
            task: None,
            outline: None,
            source: None,
        });
        LookId(self.looks.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.looks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.looks.is_empty()
    }

    pub fn name(&self, id: LookId) -> Option<&str> {
        self.looks.get(id.0).map(|l| l.name.as_str())
    }

    pub fn path(&self, id: LookId) -> Option<&Path> {
        self.looks.get(id.0).map(|l| l.path.as_path())
    }

    /// Starts a background computation for `id`.
    ///
    /// An earlier task of the same look is cancelled and kept until the next
    /// [`CollisionRegistry::gather`] joins it; its result is never used.
    pub fn start(&mut self, id: LookId) {
        let provider = Arc::clone(&self.provider);
        let cfg = self.config.outline.clone();
        let Some(look) = self.looks.get_mut(id.0) else {
            return;
        };
        if let Some(previous) = look.task.take() {
            previous.cancel();
            self.superseded.push(previous);
        }
        look.task = Some(OutlineTask::spawn(provider, look.path.clone(), cfg));
    }

    pub fn start_all(&mut self) {
        for i in 0..self.looks.len() {
            self.start(LookId(i));
        }
    }

    /// Requests cancellation of the look's running task; its result is discarded.
    pub fn cancel(&mut self, id: LookId) {
        if let Some(task) = self.looks.get(id.0).and_then(|l| l.task.as_ref()) {
            task.cancel();
        }
    }

    pub fn cancel_all(&mut self) {
        for task in self.looks.iter().filter_map(|l| l.task.as_ref()) {
            task.cancel();
        }
        for task in &self.superseded {
            task.cancel();
        }
    }

    /// Joins every in-flight task, then resolves each look's outline.
    ///
    /// Per look, in order: a decodable persisted outline, the background
    /// task's result, a synchronous computation. Outlines that had to be
    /// computed are persisted when configured. Looks without any outline
    /// are reported as missing.
    pub fn gather(&mut self) -> GatherReport {
        info!("waiting for {} outline tasks", self.running_tasks());
        for task in self.superseded.drain(..) {
            task.join();
        }
        let results = self
            .looks
            .iter_mut()
            .map(|l| l.task.take().and_then(OutlineTask::join))
            .collect::<Vec<_>>();
        debug!("all outline tasks finished");

        let mut report = GatherReport::default();
        for (i, background) in results.into_iter().enumerate() {
            let (outline, source) = self.resolve(i, background);
            report.record(source);
            let look = &mut self.looks[i];
            look.outline = outline;
            look.source = Some(source);
        }

        info!(
            "gathered {} outlines: {} persisted, {} background, {} synchronous, {} missing",
            report.total(),
            report.persisted,
            report.background,
            report.synchronous,
            report.missing
        );
        report
    }

    pub fn outline(&self, id: LookId) -> Option<&Outline> {
        self.looks.get(id.0).and_then(|l| l.outline.as_ref())
    }

    pub fn source(&self, id: LookId) -> Option<OutlineSource> {
        self.looks.get(id.0).and_then(|l| l.source)
    }

    pub fn ids(&self) -> impl Iterator<Item = LookId> + '_ {
        (0..self.looks.len()).map(LookId)
    }

    fn running_tasks(&self) -> usize {
        self.looks.iter().filter(|l| l.task.is_some()).count() + self.superseded.len()
    }

    fn resolve(&self, i: usize, background: Option<Outline>) -> (Option<Outline>, OutlineSource) {
        let look = &self.looks[i];
        if let Some(outline) = self.load_persisted(&look.path) {
            return (Some(outline), OutlineSource::Persisted);
        }

        let (outline, source) = match background {
            Some(outline) => (Some(outline), OutlineSource::Background),
            None => {
                let computed = compute_outline(
                    self.provider.as_ref(),
                    &look.path,
                    &self.config.outline,
                    &CancelToken::new(),
                );
                (computed, OutlineSource::Synchronous)
            }
        };

        match outline {
            Some(outline) => {
                if self.config.persist_computed {
                    self.persist(&look.path, &outline);
                }
                (Some(outline), source)
            }
            None => (None, OutlineSource::Missing),
        }
    }

    fn load_persisted(&self, path: &Path) -> Option<Outline> {
        let text = match self.store.read(path, &self.config.metadata_key) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                warn!("ignoring stored outline: {e}");
                return None;
            }
        };
        match decode(&text) {
            Ok(outline) => Some(outline),
            Err(e) => {
                warn!("ignoring stored outline of {}: {e}", path.display());
                None
            }
        }
    }

    fn persist(&self, path: &Path, outline: &Outline) {
        if let Err(e) = self
            .store
            .write(path, &self.config.metadata_key, &encode(outline))
        {
            warn!("cannot persist outline of {}: {e}", path.display());
        }
    }
}

impl Drop for CollisionRegistry {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
