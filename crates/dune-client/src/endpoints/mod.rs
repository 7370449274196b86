//! Typed endpoint groups layered on the [`Router`]
//!
//! Each group is a thin pass-through: it picks the route and payload shape
//! and propagates router errors unchanged.

pub mod execution;
pub mod query;
pub mod table;

use crate::router::Router;
use std::sync::Arc;

/// Base trait for endpoint implementations
///
/// Provides common functionality needed by all endpoint modules
pub trait EndpointBase {
  /// Get a reference to the request router
  fn router(&self) -> &Arc<Router>;
}

/// Macro to implement the EndpointBase trait for endpoint structs
macro_rules! impl_endpoint_base {
  ($struct_name:ident) => {
    impl EndpointBase for $struct_name {
      fn router(&self) -> &Arc<Router> {
        &self.router
      }
    }
  };
}

pub(crate) use impl_endpoint_base;
