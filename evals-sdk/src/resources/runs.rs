//! Eval runs resource client

use super::{list_query, to_params, OutputItemsClient};
use crate::client::ListParams;
use crate::error::SdkResult;
use crate::transport::Transport;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

/// Client for run operations under `/evals/{eval_id}/runs`.
///
/// One instance serves every parent eval, so `eval_id` is passed on each call.
#[derive(Debug, Clone)]
pub struct RunsClient {
    client: Arc<dyn Transport>,
    output_items: OutputItemsClient,
}

impl RunsClient {
    /// Create a new runs client
    pub fn new(client: Arc<dyn Transport>) -> Self {
        Self {
            output_items: OutputItemsClient::new(Arc::clone(&client)),
            client,
        }
    }

    /// Start a run of an eval
    #[instrument(skip(self, parameters))]
    pub async fn create<P: Serialize + ?Sized>(
        &self,
        eval_id: &str,
        parameters: &P,
    ) -> SdkResult<Value> {
        let body = to_params(parameters)?;
        self.client
            .json_post(&format!("/evals/{}/runs", eval_id), Some(&body))
            .await
    }

    /// Get a run by ID
    #[instrument(skip(self))]
    pub async fn retrieve(&self, eval_id: &str, id: &str) -> SdkResult<Value> {
        self.client
            .get(&format!("/evals/{}/runs/{}", eval_id, id), None)
            .await
    }

    /// List runs for an eval
    #[instrument(skip(self))]
    pub async fn list(&self, eval_id: &str, params: Option<ListParams>) -> SdkResult<Value> {
        let query = list_query(params)?;
        self.client
            .get(&format!("/evals/{}/runs", eval_id), query.as_ref())
            .await
    }

    /// Ask the server to cancel a run
    #[instrument(skip(self))]
    pub async fn cancel(&self, eval_id: &str, id: &str) -> SdkResult<Value> {
        self.client
            .post(&format!("/evals/{}/runs/{}/cancel", eval_id, id), None)
            .await
    }

    /// Delete a run. An in-progress run may need to be canceled first.
    #[instrument(skip(self))]
    pub async fn delete(&self, eval_id: &str, id: &str) -> SdkResult<Value> {
        self.client
            .delete(&format!("/evals/{}/runs/{}", eval_id, id), None)
            .await
    }

    /// The output items client bound to the same transport
    pub fn output_items(&self) -> &OutputItemsClient {
        &self.output_items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::testing::{RecordedCall, RecordingTransport};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_run_operations() {
        let transport = Arc::new(RecordingTransport::new(json!({"object": "eval.run"})));
        let runs = RunsClient::new(transport.clone());
        let run_params = json!({"name": "Run 1", "data_source": {"type": "completions"}});

        runs.create("eval_1", &run_params).await.unwrap();
        runs.retrieve("eval_1", "run_1").await.unwrap();
        runs.list("eval_1", Some(ListParams::new().with_status("completed")))
            .await
            .unwrap();
        runs.cancel("eval_1", "run_1").await.unwrap();
        runs.delete("eval_1", "run_1").await.unwrap();

        assert_eq!(
            transport.calls(),
            vec![
                RecordedCall {
                    verb: "json_post",
                    path: "/evals/eval_1/runs".to_string(),
                    params: Some(run_params),
                },
                RecordedCall {
                    verb: "get",
                    path: "/evals/eval_1/runs/run_1".to_string(),
                    params: None,
                },
                RecordedCall {
                    verb: "get",
                    path: "/evals/eval_1/runs".to_string(),
                    params: Some(json!({"status": "completed"})),
                },
                RecordedCall {
                    verb: "post",
                    path: "/evals/eval_1/runs/run_1/cancel".to_string(),
                    params: None,
                },
                RecordedCall {
                    verb: "delete",
                    path: "/evals/eval_1/runs/run_1".to_string(),
                    params: None,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_same_client_serves_many_evals() {
        let transport = Arc::new(RecordingTransport::new(json!({})));
        let runs = RunsClient::new(transport.clone());

        runs.retrieve("eval_a", "run_1").await.unwrap();
        runs.retrieve("eval_b", "run_1").await.unwrap();

        let paths: Vec<String> = transport.calls().into_iter().map(|c| c.path).collect();
        assert_eq!(
            paths,
            vec!["/evals/eval_a/runs/run_1", "/evals/eval_b/runs/run_1"]
        );
    }

    #[test]
    fn test_output_items_accessor_is_stable() {
        let runs = RunsClient::new(Arc::new(RecordingTransport::new(json!({}))));
        assert!(std::ptr::eq(runs.output_items(), runs.output_items()));
    }
}
