//! Typed views over API responses
//!
//! Resource clients return raw [`Value`]s. These structs name the fields
//! callers most often read and keep everything else in `extra`, so converting
//! never drops data. No field is required.

use crate::error::SdkResult;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Convert a response value into one of the typed views
pub fn from_value<T: DeserializeOwned>(value: Value) -> SdkResult<T> {
    Ok(serde_json::from_value(value)?)
}

/// An eval definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Eval {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub data_source_config: Option<Value>,
    #[serde(default)]
    pub testing_criteria: Vec<Value>,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Sample tallies reported for a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultCounts {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub passed: u64,
    #[serde(default)]
    pub failed: u64,
    #[serde(default)]
    pub errored: u64,
}

/// One run of an eval
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvalRun {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub eval_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub report_url: Option<String>,
    #[serde(default)]
    pub result_counts: Option<ResultCounts>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EvalRun {
    /// Whether the server reports the run as finished
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status.as_deref(),
            Some("completed") | Some("failed") | Some("canceled")
        )
    }
}

/// A per-sample result produced by a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub eval_id: String,
    #[serde(default)]
    pub run_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub datasource_item_id: Option<u64>,
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A cursor-paginated list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPage<T> {
    #[serde(default)]
    pub object: String,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub first_id: Option<String>,
    #[serde(default)]
    pub last_id: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

/// Confirmation returned by delete calls
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeletionStatus {
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub deleted: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DeletionStatus {
    /// ID of the deleted resource, whichever key the server used for it
    pub fn deleted_id(&self) -> Option<&str> {
        ["id", "eval_id", "run_id"]
            .iter()
            .find_map(|key| self.extra.get(*key).and_then(Value::as_str))
    }
}
