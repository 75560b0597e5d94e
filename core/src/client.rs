//! Namespaced client surface over the invokers.
//!
//! `SearchClient` and `AsyncSearchClient` expose the same operations; the
//! only difference is whether the call blocks or returns a future. Every
//! operation comes in two forms: one taking a built request, and a `*_with`
//! form taking a builder closure. The `*_with` form validates required fields
//! before the transport is touched.

use crate::error::ApiError;
use crate::indices::{
    CloneIndexRequest, CloneIndexRequestBuilder, CloneIndexResponse, CloseIndexRequest, CloseIndexRequestBuilder,
    CloseIndexResponse, FlushRequest, FlushRequestBuilder, FlushResponse, OpenRequest, OpenRequestBuilder,
    OpenResponse, RefreshRequest, RefreshRequestBuilder, RefreshResponse,
};
use crate::ml::{UndeployModelRequest, UndeployModelRequestBuilder, UndeployModelResponse};
use crate::snapshot::{
    CleanupRepositoryRequest, CleanupRepositoryRequestBuilder, CleanupRepositoryResponse, SnapshotStatusRequest,
    SnapshotStatusRequestBuilder, SnapshotStatusResponse,
};
use crate::transport::{AsyncInvoker, AsyncTransport, Invoker, Transport, TransportOptions};

/// Blocking client.
#[derive(Debug, Clone)]
pub struct SearchClient<T> {
    invoker: Invoker<T>,
}

impl<T: Transport> SearchClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            invoker: Invoker::new(transport),
        }
    }

    pub fn invoker(&self) -> &Invoker<T> {
        &self.invoker
    }

    /// A client sharing this transport that sends every call with `options`.
    pub fn with_transport_options(&self, options: TransportOptions) -> Self
    where
        T: Clone,
    {
        Self {
            invoker: self.invoker.with_options(options),
        }
    }

    pub fn snapshot(&self) -> SnapshotClient<'_, T> {
        SnapshotClient { invoker: &self.invoker }
    }

    pub fn indices(&self) -> IndicesClient<'_, T> {
        IndicesClient { invoker: &self.invoker }
    }

    pub fn ml(&self) -> MlClient<'_, T> {
        MlClient { invoker: &self.invoker }
    }
}

#[derive(Debug)]
pub struct SnapshotClient<'a, T> {
    invoker: &'a Invoker<T>,
}

impl<T: Transport> SnapshotClient<'_, T> {
    /// Remove stale data from a snapshot repository.
    pub fn cleanup_repository(
        &self,
        request: &CleanupRepositoryRequest,
    ) -> Result<CleanupRepositoryResponse, ApiError> {
        self.invoker.send(request)
    }

    pub fn cleanup_repository_with(
        &self,
        f: impl FnOnce(&mut CleanupRepositoryRequestBuilder) -> &mut CleanupRepositoryRequestBuilder,
    ) -> Result<CleanupRepositoryResponse, ApiError> {
        self.cleanup_repository(&CleanupRepositoryRequest::of(f)?)
    }

    pub fn status(&self, request: &SnapshotStatusRequest) -> Result<SnapshotStatusResponse, ApiError> {
        self.invoker.send(request)
    }

    pub fn status_with(
        &self,
        f: impl FnOnce(&mut SnapshotStatusRequestBuilder) -> &mut SnapshotStatusRequestBuilder,
    ) -> Result<SnapshotStatusResponse, ApiError> {
        self.status(&SnapshotStatusRequest::of(f)?)
    }
}

#[derive(Debug)]
pub struct IndicesClient<'a, T> {
    invoker: &'a Invoker<T>,
}

impl<T: Transport> IndicesClient<'_, T> {
    pub fn clone(&self, request: &CloneIndexRequest) -> Result<CloneIndexResponse, ApiError> {
        self.invoker.send(request)
    }

    pub fn clone_with(
        &self,
        f: impl FnOnce(&mut CloneIndexRequestBuilder) -> &mut CloneIndexRequestBuilder,
    ) -> Result<CloneIndexResponse, ApiError> {
        self.clone(&CloneIndexRequest::of(f)?)
    }

    pub fn close(&self, request: &CloseIndexRequest) -> Result<CloseIndexResponse, ApiError> {
        self.invoker.send(request)
    }

    pub fn close_with(
        &self,
        f: impl FnOnce(&mut CloseIndexRequestBuilder) -> &mut CloseIndexRequestBuilder,
    ) -> Result<CloseIndexResponse, ApiError> {
        self.close(&CloseIndexRequest::of(f)?)
    }

    pub fn flush(&self, request: &FlushRequest) -> Result<FlushResponse, ApiError> {
        self.invoker.send(request)
    }

    pub fn flush_with(
        &self,
        f: impl FnOnce(&mut FlushRequestBuilder) -> &mut FlushRequestBuilder,
    ) -> Result<FlushResponse, ApiError> {
        self.flush(&FlushRequest::of(f)?)
    }

    /// Flush every index.
    pub fn flush_all(&self) -> Result<FlushResponse, ApiError> {
        self.flush(&FlushRequest::default())
    }

    pub fn open(&self, request: &OpenRequest) -> Result<OpenResponse, ApiError> {
        self.invoker.send(request)
    }

    pub fn open_with(
        &self,
        f: impl FnOnce(&mut OpenRequestBuilder) -> &mut OpenRequestBuilder,
    ) -> Result<OpenResponse, ApiError> {
        self.open(&OpenRequest::of(f)?)
    }

    pub fn refresh(&self, request: &RefreshRequest) -> Result<RefreshResponse, ApiError> {
        self.invoker.send(request)
    }

    pub fn refresh_with(
        &self,
        f: impl FnOnce(&mut RefreshRequestBuilder) -> &mut RefreshRequestBuilder,
    ) -> Result<RefreshResponse, ApiError> {
        self.refresh(&RefreshRequest::of(f)?)
    }

    /// Refresh every index.
    pub fn refresh_all(&self) -> Result<RefreshResponse, ApiError> {
        self.refresh(&RefreshRequest::default())
    }
}

#[derive(Debug)]
pub struct MlClient<'a, T> {
    invoker: &'a Invoker<T>,
}

impl<T: Transport> MlClient<'_, T> {
    pub fn undeploy_model(&self, request: &UndeployModelRequest) -> Result<UndeployModelResponse, ApiError> {
        self.invoker.send(request)
    }

    pub fn undeploy_model_with(
        &self,
        f: impl FnOnce(&mut UndeployModelRequestBuilder) -> &mut UndeployModelRequestBuilder,
    ) -> Result<UndeployModelResponse, ApiError> {
        self.undeploy_model(&UndeployModelRequest::of(f)?)
    }
}

/// Future-returning client.
#[derive(Debug, Clone)]
pub struct AsyncSearchClient<T> {
    invoker: AsyncInvoker<T>,
}

impl<T: AsyncTransport> AsyncSearchClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            invoker: AsyncInvoker::new(transport),
        }
    }

    pub fn invoker(&self) -> &AsyncInvoker<T> {
        &self.invoker
    }

    pub fn with_transport_options(&self, options: TransportOptions) -> Self
    where
        T: Clone,
    {
        Self {
            invoker: self.invoker.with_options(options),
        }
    }

    pub fn snapshot(&self) -> AsyncSnapshotClient<'_, T> {
        AsyncSnapshotClient { invoker: &self.invoker }
    }

    pub fn indices(&self) -> AsyncIndicesClient<'_, T> {
        AsyncIndicesClient { invoker: &self.invoker }
    }

    pub fn ml(&self) -> AsyncMlClient<'_, T> {
        AsyncMlClient { invoker: &self.invoker }
    }
}

#[derive(Debug)]
pub struct AsyncSnapshotClient<'a, T> {
    invoker: &'a AsyncInvoker<T>,
}

impl<T: AsyncTransport> AsyncSnapshotClient<'_, T> {
    /// Remove stale data from a snapshot repository.
    pub async fn cleanup_repository(
        &self,
        request: &CleanupRepositoryRequest,
    ) -> Result<CleanupRepositoryResponse, ApiError> {
        self.invoker.send(request).await
    }

    pub async fn cleanup_repository_with(
        &self,
        f: impl FnOnce(&mut CleanupRepositoryRequestBuilder) -> &mut CleanupRepositoryRequestBuilder,
    ) -> Result<CleanupRepositoryResponse, ApiError> {
        let request = CleanupRepositoryRequest::of(f)?;
        self.cleanup_repository(&request).await
    }

    pub async fn status(&self, request: &SnapshotStatusRequest) -> Result<SnapshotStatusResponse, ApiError> {
        self.invoker.send(request).await
    }

    pub async fn status_with(
        &self,
        f: impl FnOnce(&mut SnapshotStatusRequestBuilder) -> &mut SnapshotStatusRequestBuilder,
    ) -> Result<SnapshotStatusResponse, ApiError> {
        let request = SnapshotStatusRequest::of(f)?;
        self.status(&request).await
    }
}

#[derive(Debug)]
pub struct AsyncIndicesClient<'a, T> {
    invoker: &'a AsyncInvoker<T>,
}

impl<T: AsyncTransport> AsyncIndicesClient<'_, T> {
    pub async fn clone(&self, request: &CloneIndexRequest) -> Result<CloneIndexResponse, ApiError> {
        self.invoker.send(request).await
    }

    pub async fn clone_with(
        &self,
        f: impl FnOnce(&mut CloneIndexRequestBuilder) -> &mut CloneIndexRequestBuilder,
    ) -> Result<CloneIndexResponse, ApiError> {
        let request = CloneIndexRequest::of(f)?;
        self.clone(&request).await
    }

    pub async fn close(&self, request: &CloseIndexRequest) -> Result<CloseIndexResponse, ApiError> {
        self.invoker.send(request).await
    }

    pub async fn close_with(
        &self,
        f: impl FnOnce(&mut CloseIndexRequestBuilder) -> &mut CloseIndexRequestBuilder,
    ) -> Result<CloseIndexResponse, ApiError> {
        let request = CloseIndexRequest::of(f)?;
        self.close(&request).await
    }

    pub async fn flush(&self, request: &FlushRequest) -> Result<FlushResponse, ApiError> {
        self.invoker.send(request).await
    }

    pub async fn flush_with(
        &self,
        f: impl FnOnce(&mut FlushRequestBuilder) -> &mut FlushRequestBuilder,
    ) -> Result<FlushResponse, ApiError> {
        let request = FlushRequest::of(f)?;
        self.flush(&request).await
    }

    pub async fn flush_all(&self) -> Result<FlushResponse, ApiError> {
        self.flush(&FlushRequest::default()).await
    }

    pub async fn open(&self, request: &OpenRequest) -> Result<OpenResponse, ApiError> {
        self.invoker.send(request).await
    }

    pub async fn open_with(
        &self,
        f: impl FnOnce(&mut OpenRequestBuilder) -> &mut OpenRequestBuilder,
    ) -> Result<OpenResponse, ApiError> {
        let request = OpenRequest::of(f)?;
        self.open(&request).await
    }

    pub async fn refresh(&self, request: &RefreshRequest) -> Result<RefreshResponse, ApiError> {
        self.invoker.send(request).await
    }

    pub async fn refresh_with(
        &self,
        f: impl FnOnce(&mut RefreshRequestBuilder) -> &mut RefreshRequestBuilder,
    ) -> Result<RefreshResponse, ApiError> {
        let request = RefreshRequest::of(f)?;
        self.refresh(&request).await
    }

    pub async fn refresh_all(&self) -> Result<RefreshResponse, ApiError> {
        self.refresh(&RefreshRequest::default()).await
    }
}

#[derive(Debug)]
pub struct AsyncMlClient<'a, T> {
    invoker: &'a AsyncInvoker<T>,
}

impl<T: AsyncTransport> AsyncMlClient<'_, T> {
    pub async fn undeploy_model(&self, request: &UndeployModelRequest) -> Result<UndeployModelResponse, ApiError> {
        self.invoker.send(request).await
    }

    pub async fn undeploy_model_with(
        &self,
        f: impl FnOnce(&mut UndeployModelRequestBuilder) -> &mut UndeployModelRequestBuilder,
    ) -> Result<UndeployModelResponse, ApiError> {
        let request = UndeployModelRequest::of(f)?;
        self.undeploy_model(&request).await
    }
}
