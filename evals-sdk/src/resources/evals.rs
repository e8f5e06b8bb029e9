//! Evals resource client
//!
//! CRUD and list over `/evals`. Runs are reached through [`EvalsClient::runs`].

use super::{list_query, to_params, RunsClient};
use crate::client::ListParams;
use crate::error::SdkResult;
use crate::transport::Transport;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

/// Client for eval operations
#[derive(Debug, Clone)]
pub struct EvalsClient {
    client: Arc<dyn Transport>,
    runs: RunsClient,
}

impl EvalsClient {
    /// Create a new evals client. The nested runs client shares the transport.
    pub fn new(client: Arc<dyn Transport>) -> Self {
        Self {
            runs: RunsClient::new(Arc::clone(&client)),
            client,
        }
    }

    /// Create a new eval.
    ///
    /// `parameters` is sent as the JSON body without any client-side checks.
    #[instrument(skip_all)]
    pub async fn create<P: Serialize + ?Sized>(&self, parameters: &P) -> SdkResult<Value> {
        let body = to_params(parameters)?;
        self.client.json_post("/evals", Some(&body)).await
    }

    /// Get an eval by ID
    #[instrument(skip(self))]
    pub async fn retrieve(&self, id: &str) -> SdkResult<Value> {
        self.client.get(&format!("/evals/{}", id), None).await
    }

    /// Update an eval
    #[instrument(skip(self, parameters))]
    pub async fn update<P: Serialize + ?Sized>(&self, id: &str, parameters: &P) -> SdkResult<Value> {
        let body = to_params(parameters)?;
        self.client
            .json_post(&format!("/evals/{}", id), Some(&body))
            .await
    }

    /// Delete an eval
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> SdkResult<Value> {
        self.client.delete(&format!("/evals/{}", id), None).await
    }

    /// List evals, one page at a time
    #[instrument(skip(self))]
    pub async fn list(&self, params: Option<ListParams>) -> SdkResult<Value> {
        let query = list_query(params)?;
        self.client.get("/evals", query.as_ref()).await
    }

    /// The runs client bound to the same transport
    pub fn runs(&self) -> &RunsClient {
        &self.runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::testing::RecordingTransport;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn client(response: Value) -> (Arc<RecordingTransport>, EvalsClient) {
        let transport = Arc::new(RecordingTransport::new(response));
        let evals = EvalsClient::new(transport.clone());
        (transport, evals)
    }

    #[tokio::test]
    async fn test_create_posts_json_body() {
        let (transport, evals) = client(json!({"id": "eval_1", "object": "eval"}));
        let params = json!({"name": "Sentiment Analysis", "metadata": {"team": "qa"}});

        let response = evals.create(&params).await.unwrap();

        assert_eq!(response["object"], "eval");
        let call = transport.last();
        assert_eq!(call.verb, "json_post");
        assert_eq!(call.path, "/evals");
        assert_eq!(call.params, Some(params));
    }

    #[tokio::test]
    async fn test_retrieve_update_delete_paths() {
        let (transport, evals) = client(json!({}));

        evals.retrieve("eval_1").await.unwrap();
        evals
            .update("eval_1", &json!({"metadata": {"modified": "true"}}))
            .await
            .unwrap();
        evals.delete("eval_1").await.unwrap();

        let calls: Vec<(&str, String)> = transport
            .calls()
            .into_iter()
            .map(|c| (c.verb, c.path))
            .collect();
        assert_eq!(
            calls,
            vec![
                ("get", "/evals/eval_1".to_string()),
                ("json_post", "/evals/eval_1".to_string()),
                ("delete", "/evals/eval_1".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_forwards_query() {
        let (transport, evals) = client(json!({"object": "list", "data": []}));

        evals.list(None).await.unwrap();
        assert_eq!(transport.last().params, None);

        evals
            .list(Some(ListParams::new().with_limit(2).with_after("eval_0")))
            .await
            .unwrap();
        let call = transport.last();
        assert_eq!(call.verb, "get");
        assert_eq!(call.path, "/evals");
        assert_eq!(call.params, Some(json!({"limit": 2, "after": "eval_0"})));
    }

    #[tokio::test]
    async fn test_ids_are_not_escaped() {
        let (transport, evals) = client(json!({}));

        evals.retrieve("abc/def").await.unwrap();

        assert_eq!(transport.last().path, "/evals/abc/def");
    }

    #[test]
    fn test_runs_accessor_is_stable() {
        let (_, evals) = client(json!({}));
        assert!(std::ptr::eq(evals.runs(), evals.runs()));
    }
}
