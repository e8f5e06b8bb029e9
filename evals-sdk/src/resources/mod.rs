//! SDK resource modules
//!
//! Each client formats resource paths and dispatches to the shared
//! [`Transport`](crate::transport::Transport). Responses are returned as-is.

pub mod evals;
pub mod output_items;
pub mod runs;

pub use evals::EvalsClient;
pub use output_items::OutputItemsClient;
pub use runs::RunsClient;

use crate::client::ListParams;
use crate::error::SdkResult;
use serde::Serialize;
use serde_json::Value;

/// Convert caller parameters into the JSON value handed to the transport
pub(crate) fn to_params<P: Serialize + ?Sized>(parameters: &P) -> SdkResult<Value> {
    Ok(serde_json::to_value(parameters)?)
}

pub(crate) fn list_query(params: Option<ListParams>) -> SdkResult<Option<Value>> {
    params.as_ref().map(to_params).transpose()
}
