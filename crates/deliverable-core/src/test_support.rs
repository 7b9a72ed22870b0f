use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::{Map, Value};

use crate::http_client::{HttpClient, HttpError, HttpFuture, HttpRequest, HttpResponse};

/// Transport double that replays scripted responses and records every request.
#[derive(Debug)]
pub(crate) struct RecordingHttpClient {
    script: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    fallback: Option<Result<HttpResponse, HttpError>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingHttpClient {
    pub(crate) fn always(response: HttpResponse) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Some(Ok(response)),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn scripted(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            fallback: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn recorded_requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .clone()
    }

    pub(crate) fn recorded_urls(&self) -> Vec<String> {
        self.recorded_requests()
            .into_iter()
            .map(|request| request.url)
            .collect()
    }
}

impl HttpClient for RecordingHttpClient {
    fn execute<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .push(request);
        let response = self
            .script
            .lock()
            .expect("script should not be poisoned")
            .pop_front()
            .or_else(|| self.fallback.clone())
            .unwrap_or_else(|| Err(HttpError::new("no scripted response left")));
        Box::pin(async move { response })
    }
}

pub(crate) fn json_ok(value: Value) -> Result<HttpResponse, HttpError> {
    Ok(HttpResponse::ok_json(value.to_string()))
}

pub(crate) fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected JSON object, got {other}"),
    }
}
