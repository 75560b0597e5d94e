//! The `indices` namespace.

pub mod clone;
pub mod close;
pub mod flush;
pub mod open;
pub mod refresh;

use std::collections::BTreeMap;

use crate::types::{join_list, ExpandWildcard};

pub use clone::{Alias, CloneIndexRequest, CloneIndexRequestBuilder, CloneIndexResponse};
pub use close::{CloseIndexRequest, CloseIndexRequestBuilder, CloseIndexResponse, CloseIndexResult};
pub use flush::{FlushRequest, FlushRequestBuilder, FlushResponse};
pub use open::{OpenRequest, OpenRequestBuilder, OpenResponse};
pub use refresh::{RefreshRequest, RefreshRequestBuilder, RefreshResponse};

/// Wildcard-resolution parameters shared by multi-index operations.
pub(crate) fn insert_index_options(
    params: &mut BTreeMap<String, String>,
    allow_no_indices: Option<bool>,
    expand_wildcards: &[ExpandWildcard],
    ignore_unavailable: Option<bool>,
) {
    if let Some(value) = allow_no_indices {
        params.insert("allow_no_indices".to_string(), value.to_string());
    }
    if !expand_wildcards.is_empty() {
        params.insert("expand_wildcards".to_string(), join_list(expand_wildcards));
    }
    if let Some(value) = ignore_unavailable {
        params.insert("ignore_unavailable".to_string(), value.to_string());
    }
}
