//! Per-look outline computation and persistence.
//!
//! [`CollisionRegistry`] holds the looks of one project. Each look can run
//! an [`OutlineTask`] on its own thread; [`CollisionRegistry::gather`] joins
//! them all and then resolves every look from its persisted metadata, the
//! task result, or a synchronous run, in that order.
//!
//! Images come from an [`ImageProvider`] and persisted outlines live in a
//! [`MetadataStore`] under [`COLLISION_METADATA_KEY`].

mod error;
mod provider;
mod registry;
mod store;
mod task;

pub use error::{ImageError, StoreError};
pub use provider::{FsImageProvider, ImageProvider};
pub use registry::{
    COLLISION_METADATA_KEY, CollisionRegistry, GatherConfig, GatherReport, LookId, OutlineSource,
};
pub use store::{MemoryMetadataStore, MetadataStore, SidecarMetadataStore};
pub use task::{OutlineTask, compute_outline};
