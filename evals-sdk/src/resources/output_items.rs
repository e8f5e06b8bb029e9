//! Run output items resource client (read-only)

use super::list_query;
use crate::client::ListParams;
use crate::error::SdkResult;
use crate::transport::Transport;
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

/// Client for `/evals/{eval_id}/runs/{run_id}/output_items`
#[derive(Debug, Clone)]
pub struct OutputItemsClient {
    client: Arc<dyn Transport>,
}

impl OutputItemsClient {
    /// Create a new output items client
    pub fn new(client: Arc<dyn Transport>) -> Self {
        Self { client }
    }

    /// List the output items produced by a run
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        eval_id: &str,
        run_id: &str,
        params: Option<ListParams>,
    ) -> SdkResult<Value> {
        let query = list_query(params)?;
        self.client
            .get(
                &format!("/evals/{}/runs/{}/output_items", eval_id, run_id),
                query.as_ref(),
            )
            .await
    }

    /// Get a single output item
    #[instrument(skip(self))]
    pub async fn retrieve(&self, eval_id: &str, run_id: &str, id: &str) -> SdkResult<Value> {
        self.client
            .get(
                &format!("/evals/{}/runs/{}/output_items/{}", eval_id, run_id, id),
                None,
            )
            .await
    }
}
