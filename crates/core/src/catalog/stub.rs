//! In-process transport for gateway tests.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use super::{CatalogError, CatalogTransport, Query};

/// Canned response per path; unknown paths answer HTTP 404.
#[derive(Default)]
pub(crate) struct StubTransport {
    responses: HashMap<String, Result<Value, u16>>,
    calls: Mutex<Vec<(String, Query)>>,
}

impl StubTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_json(mut self, path: &str, body: Value) -> Self {
        self.responses.insert(path.to_string(), Ok(body));
        self
    }

    pub(crate) fn with_status(mut self, path: &str, status: u16) -> Self {
        self.responses.insert(path.to_string(), Err(status));
        self
    }

    pub(crate) fn calls(&self) -> Vec<(String, Query)> {
        self.calls.lock().clone()
    }

    /// Query of the first recorded call to `path`.
    pub(crate) fn query_for(&self, path: &str) -> Option<Query> {
        self.calls
            .lock()
            .iter()
            .find(|(called, _)| called == path)
            .map(|(_, query)| query.clone())
    }
}

#[async_trait]
impl CatalogTransport for StubTransport {
    async fn get_json(&self, path: &str, query: &Query) -> Result<Value, CatalogError> {
        self.calls.lock().push((path.to_string(), query.clone()));
        match self.responses.get(path) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(CatalogError::Status {
                status: *status,
                path: path.to_string(),
            }),
            None => Err(CatalogError::Status {
                status: 404,
                path: path.to_string(),
            }),
        }
    }
}

/// Build a list envelope of `count` scored games with descending scores.
pub(crate) fn scored_page(count: usize, next: bool) -> Value {
    let results: Vec<Value> = (0..count)
        .map(|idx| {
            json!({
                "id": 1000 + idx,
                "name": format!("Game {idx}"),
                "metacritic": 99 - (idx as i64 % 50),
                "released": "2015-06-01",
                "platforms": [{"platform": {"id": 4, "name": "PC"}}],
                "genres": [{"id": 4, "name": "Action"}]
            })
        })
        .collect();
    json!({
        "count": count,
        "next": if next { json!("https://api.example.test/games?page=2") } else { Value::Null },
        "results": results,
    })
}

/// Look up a query parameter by name.
pub(crate) fn param<'a>(query: &'a Query, name: &str) -> Option<&'a str> {
    query
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.as_str())
}
