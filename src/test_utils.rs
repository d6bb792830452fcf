// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use bytes::Bytes;
use http::{Request, Response};
use http_body_util::BodyExt;
use k8s_openapi::serde::de::DeserializeOwned;
use kube::client::Body;
use kube::Client;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

type ResponseQueue = VecDeque<(u16, String)>;

/// A request seen by the mock service
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub body: Bytes,
}

impl RecordedRequest {
    /// Deserialize the request body
    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("request body is not valid JSON")
    }
}

/// A mock HTTP service that returns predefined responses based on request paths.
///
/// GET requests carrying `watch=true` are keyed and recorded as `WATCH`, so list
/// and watch responses for the same path queue separately. Responses registered for the same method and path are served in order; the
/// last one keeps being served once the others are used up. Unregistered POST
/// and PUT requests echo their body back, everything else answers 404.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), ResponseQueue>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a response for requests with the given method and exact path
    pub fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back((status, body.to_string()));
        self
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Add a response for watch requests matching the exact path
    pub fn on_watch(self, path: &str, status: u16, body: &str) -> Self {
        self.on("WATCH", path, status, body)
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    /// All requests seen so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests seen so far with the given method
    pub fn requests_for(&self, method: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let mut responses = self.responses.lock().unwrap();
        let queue = responses.get_mut(&(method.to_string(), path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let path = req.uri().path().to_string();
        let query = req.uri().query().unwrap_or_default().to_string();
        let method = if query.split('&').any(|p| p == "watch=true") {
            "WATCH".to_string()
        } else {
            req.method().to_string()
        };

        let response = self.find_response(&method, &path);
        let requests = self.requests.clone();

        Box::pin(async move {
            let body = req.into_body().collect().await?.to_bytes();
            requests.lock().unwrap().push(RecordedRequest {
                method: method.clone(),
                path,
                query,
                body: body.clone(),
            });

            let (status, body) = match response {
                Some((status, body)) => (status, body.into_bytes()),
                None if method == "POST" => (201, body.to_vec()),
                None if method == "PUT" => (200, body.to_vec()),
                None => (404, not_found_json("resource", "unknown").into_bytes()),
            };

            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap())
        })
    }
}

/// Create a mock namespace JSON object
pub fn namespace_value(name: &str) -> serde_json::Value {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "uid": format!("uid-{}", name)
        }
    })
}

/// Create a mock namespace list JSON response
pub fn namespace_list_json(names: &[&str]) -> String {
    list_json(
        "NamespaceList",
        "1",
        names.iter().map(|n| namespace_value(n)).collect(),
    )
}

/// Create a mock list JSON response at the given resource version
pub fn list_json(kind: &str, resource_version: &str, items: Vec<serde_json::Value>) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": kind,
        "metadata": { "resourceVersion": resource_version },
        "items": items
    })
    .to_string()
}

/// Create a mock secret JSON object. Data is always `token: s3cr3t`.
pub fn secret_value(
    name: &str,
    namespace: &str,
    labels: &[(&str, &str)],
    annotations: &[(&str, &str)],
    resource_version: &str,
) -> serde_json::Value {
    let to_map = |pairs: &[(&str, &str)]| {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::from(*v)))
            .collect::<serde_json::Map<_, _>>()
    };
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Secret",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "resourceVersion": resource_version,
            "uid": format!("uid-{}-{}", namespace, name),
            "labels": to_map(labels),
            "annotations": to_map(annotations)
        },
        "data": { "token": "czNjcjN0" },
        "type": "Opaque"
    })
}

/// Create a mock secret JSON response
pub fn secret_json(
    name: &str,
    namespace: &str,
    labels: &[(&str, &str)],
    annotations: &[(&str, &str)],
    resource_version: &str,
) -> String {
    secret_value(name, namespace, labels, annotations, resource_version).to_string()
}

/// Create a newline-delimited watch response body
pub fn watch_body(events: &[(&str, serde_json::Value)]) -> String {
    events
        .iter()
        .map(|(kind, object)| {
            let mut line = serde_json::json!({ "type": kind, "object": object }).to_string();
            line.push('\n');
            line
        })
        .collect()
}

/// Create a failure status object, as sent in watch `ERROR` events
pub fn status_value(code: u16, reason: &str) -> serde_json::Value {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("request failed: {}", reason),
        "reason": reason,
        "code": code
    })
}

/// Create a failure status response
pub fn status_json(code: u16, reason: &str) -> String {
    status_value(code, reason).to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}
