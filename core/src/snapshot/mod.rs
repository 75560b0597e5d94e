//! The `snapshot` namespace.

pub mod cleanup_repository;
pub mod stats_summary;
pub mod status;

pub use cleanup_repository::{
    CleanupRepositoryRequest, CleanupRepositoryRequestBuilder, CleanupRepositoryResponse,
    CleanupRepositoryResults,
};
pub use stats_summary::{SnapshotShardsStatsSummaryItem, SnapshotShardsStatsSummaryItemBuilder};
pub use status::{
    ShardsStats, SnapshotIndexStats, SnapshotStats, SnapshotStatus, SnapshotStatusRequest,
    SnapshotStatusRequestBuilder, SnapshotStatusResponse,
};
