//! Per-query vendor session.
//!
//! A [`VendorSession`] is opened by an adapter at the start of a single
//! deliverability check and dropped when that check returns, on success or
//! failure. Nothing about a session (cookies, context tokens) outlives it or is
//! shared with another query.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::http_client::{HttpClient, HttpError, HttpRequest, HttpResponse};

pub struct VendorSession {
    vendor: String,
    transport: Arc<dyn HttpClient>,
    default_headers: BTreeMap<String, String>,
    fixed_headers: BTreeMap<String, String>,
    cookies: BTreeMap<String, String>,
    timeout_ms: Option<u64>,
}

impl VendorSession {
    pub fn open(vendor: impl Into<String>, transport: Arc<dyn HttpClient>) -> Self {
        let vendor = vendor.into();
        debug!(vendor = %vendor, "vendor session opened");
        Self {
            vendor,
            transport,
            default_headers: BTreeMap::new(),
            fixed_headers: BTreeMap::new(),
            cookies: BTreeMap::new(),
            timeout_ms: None,
        }
    }

    /// Header sent on every call unless the caller supplies the same key.
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Header sent on every call, replacing any caller-supplied value.
    pub fn with_fixed_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fixed_headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: Option<u64>) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn set_cookie(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(name.into(), value.into());
    }

    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let request = self.prepare(request);
        debug!(vendor = %self.vendor, url = %request.url, "sending vendor request");
        self.transport.execute(request).await
    }

    fn prepare(&self, mut request: HttpRequest) -> HttpRequest {
        for (name, value) in &self.default_headers {
            request
                .headers
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
        for (name, value) in &self.fixed_headers {
            request.headers.insert(name.clone(), value.clone());
        }
        if request.timeout_ms.is_none() {
            request.timeout_ms = self.timeout_ms;
        }
        if self.cookies.is_empty() {
            return request;
        }

        let jar = self
            .cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        request.with_cookie(&jar)
    }
}

impl Drop for VendorSession {
    fn drop(&mut self) {
        self.cookies.clear();
        debug!(vendor = %self.vendor, "vendor session closed");
    }
}
