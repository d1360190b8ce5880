//! Scripted `HttpClient` for tests.
//!
//! Records every request it receives so tests can assert on paths, query
//! strings and request counts without a network.

use std::collections::VecDeque;
use std::sync::Mutex;

use ds_api::{HttpClient, HttpMethod, Query};
use ds_error::HttpError;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Query,
    pub body: Option<Value>,
}

type Responder = Box<dyn Fn(&RecordedRequest) -> Result<Value, HttpError> + Send + Sync>;

pub struct MockHttpClient {
    responder: Responder,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockHttpClient {
    /// Answer every request with `responder`.
    pub fn new(
        responder: impl Fn(&RecordedRequest) -> Result<Value, HttpError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer requests with `responses` in order; extra requests fail.
    pub fn with_responses(responses: Vec<Result<Value, HttpError>>) -> Self {
        let queue = Mutex::new(VecDeque::from(responses));
        Self::new(move |request| {
            queue
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .pop_front()
                .unwrap_or_else(|| {
                    Err(HttpError::Transport(format!(
                        "no scripted response for {} {}",
                        request.method, request.path
                    )))
                })
        })
    }

    /// Serve `pages[n - 1]` for `?page=n`; requests without a page get page 1.
    pub fn paged(pages: Vec<Value>) -> Self {
        Self::new(move |request| {
            let page = request
                .query
                .get("page")
                .and_then(|p| p.parse::<usize>().ok())
                .unwrap_or(1);
            pages.get(page.saturating_sub(1)).cloned().ok_or_else(|| HttpError::Status {
                status: 404,
                message: format!("no page {page}"),
            })
        })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait::async_trait]
impl HttpClient for MockHttpClient {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        query: &Query,
        body: Option<&Value>,
    ) -> Result<Value, HttpError> {
        let request = RecordedRequest {
            method,
            path: path.to_string(),
            query: query.clone(),
            body: body.cloned(),
        };
        let response = (self.responder)(&request);
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);
        response
    }
}
