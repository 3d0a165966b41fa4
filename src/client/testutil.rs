//! Scripted transport stub shared by the unit tests in this module tree.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Method;

use crate::client::transport::Transport;

/// One request as seen by the stub.
#[derive(Clone, Debug)]
pub(crate) struct CapturedRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

/// A [`Transport`] that counts calls, captures the last request, and
/// replays canned responses: first the script in order, then the fallback
/// forever.
#[derive(Debug)]
pub(crate) struct StubTransport {
    calls: AtomicUsize,
    script: Mutex<VecDeque<(u16, String)>>,
    fallback: (u16, String),
    last: Mutex<Option<CapturedRequest>>,
}

impl StubTransport {
    pub(crate) fn always(status: u16, body: &str) -> Arc<Self> {
        Self::scripted(vec![], (status, body))
    }

    pub(crate) fn scripted(script: Vec<(u16, &str)>, fallback: (u16, &str)) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            script: Mutex::new(
                script
                    .into_iter()
                    .map(|(status, body)| (status, body.to_string()))
                    .collect(),
            ),
            fallback: (fallback.0, fallback.1.to_string()),
            last: Mutex::new(None),
        })
    }

    /// Number of requests the stub has received.
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent request; panics if none was made.
    pub(crate) fn last_request(&self) -> CapturedRequest {
        self.last.lock().unwrap().clone().expect("no request made")
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn execute(
        &self,
        request: reqwest::Request,
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(CapturedRequest {
            method: request.method().clone(),
            url: request.url().to_string(),
            headers: request.headers().clone(),
            body: request
                .body()
                .and_then(reqwest::Body::as_bytes)
                .map(<[u8]>::to_vec),
        });
        let (status, body) = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        let response = http::Response::builder().status(status).body(body).unwrap();
        Ok(reqwest::Response::from(response))
    }
}
