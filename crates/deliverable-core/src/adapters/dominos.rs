use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use super::{read_json, AdapterOptions};
use crate::http_client::{HttpClient, HttpRequest};
use crate::session::VendorSession;
use crate::vendor::{Postcode, Vendor, VendorError, VendorFuture, VendorId};

pub const DOMINOS_BASE_URL: &str = "https://www.dominos.co.uk";

const STORE_SEARCH_RADIUS: &str = "30";
const STORE_SEARCH_LIMIT: &str = "10";
const SERVICEABLE_REASON: &str = "None";

/// Reason-based adapter: the nearest store reports why it cannot deliver,
/// and the literal reason `"None"` means it can.
pub struct DominosAdapter {
    postcode: Postcode,
    http_client: Arc<dyn HttpClient>,
    options: AdapterOptions,
}

impl DominosAdapter {
    pub fn new(postcode: Postcode, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            postcode,
            http_client,
            options: AdapterOptions::new(DOMINOS_BASE_URL),
        }
    }

    pub fn with_options(mut self, options: AdapterOptions) -> Self {
        self.options = options;
        self
    }

    fn location_token(&self) -> String {
        format!("UK-PC:{}", json!({ "postCode": self.postcode.as_str() }))
    }

    async fn store_lookup(&self, session: &VendorSession) -> Result<Option<Value>, VendorError> {
        let request = HttpRequest::get(self.options.url("/api/stores/v1/stores"))
            .with_query("locationToken", self.location_token())
            .with_query("radius", STORE_SEARCH_RADIUS)
            .with_query("limit", STORE_SEARCH_LIMIT);
        let response = session
            .send(request)
            .await
            .map_err(|error| VendorError::transport(session.vendor(), &error))?;

        if response.is_not_found() {
            return Ok(None);
        }
        read_json(session.vendor(), &response).map(Some)
    }
}

impl Vendor for DominosAdapter {
    fn name(&self) -> String {
        VendorId::Dominos.display_name().to_owned()
    }

    fn can_deliver(&self) -> VendorFuture<'_, bool> {
        Box::pin(async move {
            let session = VendorSession::open(self.name(), Arc::clone(&self.http_client))
                .with_default_header("user-agent", &self.options.user_agent)
                .with_default_header("content-type", "application/json")
                .with_timeout_ms(self.options.timeout_ms);

            let Some(payload) = self.store_lookup(&session).await? else {
                debug!(postcode = %self.postcode, "dominos has no store for postcode");
                return Ok(false);
            };

            let reason = payload
                .pointer("/data/localStore/catchmentServiceability/reason")
                .and_then(Value::as_str);
            debug!(postcode = %self.postcode, reason = ?reason, "dominos serviceability resolved");
            Ok(reason == Some(SERVICEABLE_REASON))
        })
    }
}
