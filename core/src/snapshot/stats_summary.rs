//! Per-snapshot file count and byte size summary.

use serde::{Deserialize, Serialize};

use crate::builder::{require, SingleUse};
use crate::error::BuildError;

const TYPE_NAME: &str = "SnapshotShardsStatsSummaryItem";

/// File count and byte size of one slice of a snapshot's shard data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotShardsStatsSummaryItem {
    file_count: u64,
    size_in_bytes: u64,
}

impl SnapshotShardsStatsSummaryItem {
    pub fn builder() -> SnapshotShardsStatsSummaryItemBuilder {
        SnapshotShardsStatsSummaryItemBuilder::default()
    }

    pub fn of(
        f: impl FnOnce(&mut SnapshotShardsStatsSummaryItemBuilder) -> &mut SnapshotShardsStatsSummaryItemBuilder,
    ) -> Result<Self, BuildError> {
        f(&mut Self::builder()).build()
    }

    pub fn file_count(&self) -> u64 {
        self.file_count
    }

    pub fn size_in_bytes(&self) -> u64 {
        self.size_in_bytes
    }

    pub fn to_builder(&self) -> SnapshotShardsStatsSummaryItemBuilder {
        SnapshotShardsStatsSummaryItemBuilder {
            file_count: Some(self.file_count),
            size_in_bytes: Some(self.size_in_bytes),
            guard: SingleUse::default(),
        }
    }
}

#[derive(Debug, Default)]
pub struct SnapshotShardsStatsSummaryItemBuilder {
    file_count: Option<u64>,
    size_in_bytes: Option<u64>,
    guard: SingleUse,
}

impl SnapshotShardsStatsSummaryItemBuilder {
    /// Required.
    pub fn file_count(&mut self, value: u64) -> &mut Self {
        self.file_count = Some(value);
        self
    }

    /// Required.
    pub fn size_in_bytes(&mut self, value: u64) -> &mut Self {
        self.size_in_bytes = Some(value);
        self
    }

    pub fn copy(&self) -> Self {
        Self {
            file_count: self.file_count,
            size_in_bytes: self.size_in_bytes,
            guard: SingleUse::default(),
        }
    }

    pub fn build(&mut self) -> Result<SnapshotShardsStatsSummaryItem, BuildError> {
        self.guard.check(TYPE_NAME)?;
        let file_count = require(self.file_count.take(), TYPE_NAME, "file_count")?;
        let size_in_bytes = require(self.size_in_bytes.take(), TYPE_NAME, "size_in_bytes")?;
        Ok(SnapshotShardsStatsSummaryItem {
            file_count,
            size_in_bytes,
        })
    }
}
