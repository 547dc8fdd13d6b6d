use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of GET /loki/api/v1/query_range
///
/// Example:
/// {
///   "status": "success",
///   "data": {
///     "resultType": "streams",
///     "result": [
///       {
///         "stream": { "app": "shop" },
///         "values": [["1704067200000000000", "GET /cart 200"]]
///       }
///     ],
///     "stats": { ... }
///   }
/// }
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct QueryRangeResponse {
    pub status: String,
    pub data: QueryRangeData,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct QueryRangeData {
    #[serde(rename = "resultType")]
    pub result_type: ResultType,
    /// Shape depends on `result_type`, see [`QueryRangeData::streams`] and
    /// [`QueryRangeData::matrix`]
    pub result: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Value>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    Streams,
    Matrix,
    Vector,
    Scalar,
}

/// A log stream: its label set and `[timestamp_ns, line]` entries
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Stream {
    pub stream: HashMap<String, String>,
    pub values: Vec<(String, String)>,
}

/// A metric series: its label set and `[unix_seconds, value]` samples
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct MatrixSeries {
    pub metric: HashMap<String, String>,
    pub values: Vec<(f64, String)>,
}

impl QueryRangeData {
    /// Decode `result` as log streams. Empty for any other result type.
    pub fn streams(&self) -> Result<Vec<Stream>, serde_json::Error> {
        self.decode_result(ResultType::Streams)
    }

    /// Decode `result` as metric series. Empty for any other result type.
    pub fn matrix(&self) -> Result<Vec<MatrixSeries>, serde_json::Error> {
        self.decode_result(ResultType::Matrix)
    }

    fn decode_result<T: serde::de::DeserializeOwned>(
        &self,
        expected: ResultType,
    ) -> Result<Vec<T>, serde_json::Error> {
        if self.result_type != expected {
            return Ok(Vec::new());
        }
        Vec::<T>::deserialize(&self.result)
    }
}
