#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use bytes::Bytes;
use http::{Request, Response, StatusCode};

use client::{ApiClient, ApiError, MemoryStore, SessionStore, Transport};

pub const BASE_URL: &str = "http://api.test";

/// A credential whose payload is `payload`, unsigned.
pub fn token(payload: &str) -> String {
    format!(
        "eyJhbGciOiJIUzI1NiJ9.{}.signature",
        URL_SAFE_NO_PAD.encode(payload)
    )
}

pub fn teacher_token() -> String {
    token(r#"{"sub":"tina","role":"TEACHER"}"#)
}

pub fn student_token() -> String {
    token(r#"{"sub":"sam","role":"STUDENT"}"#)
}

/// What the fake transport saw.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: http::Method,
    pub uri: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl Recorded {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

#[derive(Default)]
struct FakeState {
    calls: Vec<Recorded>,
    responses: VecDeque<Result<Response<Bytes>, ApiError>>,
}

/// Scripted transport. Unscripted calls answer `200 []`.
#[derive(Clone, Default)]
pub struct FakeTransport {
    state: Arc<Mutex<FakeState>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: StatusCode, body: &str) -> &Self {
        let response = Response::builder()
            .status(status)
            .header("content-type", "application/json")
            .body(Bytes::copy_from_slice(body.as_bytes()))
            .unwrap();
        self.state.lock().unwrap().responses.push_back(Ok(response));
        self
    }

    pub fn fail(&self, error: ApiError) -> &Self {
        self.state.lock().unwrap().responses.push_back(Err(error));
        self
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }
}

impl Transport for FakeTransport {
    async fn send(&self, request: Request<Bytes>) -> Result<Response<Bytes>, ApiError> {
        let header = |name: http::header::HeaderName| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        let recorded = Recorded {
            method: request.method().clone(),
            uri: request.uri().to_string(),
            authorization: header(http::header::AUTHORIZATION),
            content_type: header(http::header::CONTENT_TYPE),
            body: request.body().clone(),
        };

        let mut state = self.state.lock().unwrap();
        state.calls.push(recorded);
        state.responses.pop_front().unwrap_or_else(|| {
            Ok(Response::builder()
                .status(StatusCode::OK)
                .body(Bytes::from_static(b"[]"))
                .unwrap())
        })
    }
}

/// Client wired to a fake transport and an in-memory store.
pub fn fake_client(store: Arc<MemoryStore>) -> (ApiClient<FakeTransport>, FakeTransport) {
    let transport = FakeTransport::new();
    let store: Arc<dyn SessionStore> = store;
    (ApiClient::new(BASE_URL, transport.clone(), store), transport)
}
