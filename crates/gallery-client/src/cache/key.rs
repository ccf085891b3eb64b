//! Request fingerprints used as cache keys

use reqwest::Method;
use serde_json::{Map, Value};

use crate::transport::Params;

/// Deterministic cache key for a request.
///
/// Format is `METHOD:path:{canonical params}` where params are serialized as
/// compact JSON with keys in sorted order, so insertion order never matters.
pub fn fingerprint(method: &Method, path: &str, params: &Params) -> String {
    let canonical: Map<String, Value> = params
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    format!("{}:{}:{}", method.as_str(), path, Value::Object(canonical))
}
