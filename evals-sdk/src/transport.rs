//! Transport contract consumed by the resource clients
//!
//! Resource clients only format paths and pick a verb; everything about the
//! wire (auth, encoding, status classification) lives behind this trait.

use crate::error::SdkResult;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

/// The four verbs every resource client dispatches through.
///
/// `path` already has all identifiers interpolated and is relative to the
/// transport's base URL. Implementations return the decoded response body
/// unmodified, or an error for any non-success outcome.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// GET with `query` sent as query-string parameters
    async fn get(&self, path: &str, query: Option<&Value>) -> SdkResult<Value>;

    /// POST used for trigger calls; `body` is usually `None`
    async fn post(&self, path: &str, body: Option<&Value>) -> SdkResult<Value>;

    /// POST carrying a JSON body (create/update)
    async fn json_post(&self, path: &str, body: Option<&Value>) -> SdkResult<Value>;

    /// DELETE with optional query-string parameters
    async fn delete(&self, path: &str, params: Option<&Value>) -> SdkResult<Value>;
}
