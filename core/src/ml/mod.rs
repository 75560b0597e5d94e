//! The `ml` plugin namespace.

pub mod undeploy_model;

pub use undeploy_model::{
    UndeployModelNode, UndeployModelNodeBuilder, UndeployModelRequest, UndeployModelRequestBuilder,
    UndeployModelResponse,
};
