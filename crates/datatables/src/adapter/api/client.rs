use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use super::Query;
use crate::error::BoxError;

/// One page of results from a list endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResultSet {
    pub total_records: u64,
    pub data: Vec<Json>,
}

impl ApiResultSet {
    pub fn new(total_records: u64, data: Vec<Json>) -> Self {
        Self {
            total_records,
            data,
        }
    }
}

/// Executes a built [`Query`] against a remote list endpoint.
///
/// Transport, authentication and timeouts are the client's business.
/// Closures with the matching signature are clients.
pub trait ApiClient: Send + Sync {
    fn list(&self, query: &Query) -> Result<ApiResultSet, BoxError>;
}

impl<F> ApiClient for F
where
    F: Fn(&Query) -> Result<ApiResultSet, BoxError> + Send + Sync,
{
    fn list(&self, query: &Query) -> Result<ApiResultSet, BoxError> {
        self(query)
    }
}
