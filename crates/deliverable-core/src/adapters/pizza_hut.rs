use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::{read_json, AdapterOptions};
use crate::http_client::{HttpClient, HttpRequest};
use crate::session::VendorSession;
use crate::vendor::{Postcode, Vendor, VendorError, VendorFuture, VendorId};

pub const PIZZA_HUT_BASE_URL: &str = "https://api.pizzahut.io";

/// Existence-based adapter: any hut listed for the postcode means delivery.
pub struct PizzaHutAdapter {
    postcode: Postcode,
    http_client: Arc<dyn HttpClient>,
    options: AdapterOptions,
}

impl PizzaHutAdapter {
    pub fn new(postcode: Postcode, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            postcode,
            http_client,
            options: AdapterOptions::new(PIZZA_HUT_BASE_URL),
        }
    }

    pub fn with_options(mut self, options: AdapterOptions) -> Self {
        self.options = options;
        self
    }

    fn open_session(&self) -> VendorSession {
        VendorSession::open(self.name(), Arc::clone(&self.http_client))
            .with_default_header("user-agent", &self.options.user_agent)
            .with_default_header("content-type", "application/json")
            .with_timeout_ms(self.options.timeout_ms)
    }

    async fn fetch_huts(&self, session: &VendorSession) -> Result<Vec<Value>, VendorError> {
        let request = HttpRequest::get(self.options.url("/v1/huts"))
            .with_query("postcode", self.postcode.as_str());
        let response = session
            .send(request)
            .await
            .map_err(|error| VendorError::transport(session.vendor(), &error))?;

        match read_json(session.vendor(), &response)? {
            Value::Array(huts) => Ok(huts),
            other => Err(VendorError::malformed(format!(
                "expected a list of huts, got {}",
                json_kind(&other)
            ))),
        }
    }
}

impl Vendor for PizzaHutAdapter {
    fn name(&self) -> String {
        VendorId::PizzaHut.display_name().to_owned()
    }

    fn can_deliver(&self) -> VendorFuture<'_, bool> {
        Box::pin(async move {
            let session = self.open_session();
            let huts = self.fetch_huts(&session).await?;
            debug!(postcode = %self.postcode, huts = huts.len(), "pizza hut locations resolved");
            Ok(!huts.is_empty())
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
