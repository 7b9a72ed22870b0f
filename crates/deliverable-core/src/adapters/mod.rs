mod dominos;
mod pizza_hut;
mod uber_eats;

pub use dominos::{DominosAdapter, DOMINOS_BASE_URL};
pub use pizza_hut::{PizzaHutAdapter, PIZZA_HUT_BASE_URL};
pub use uber_eats::{
    UberEatsAdapter, UberEatsBrand, LOCATION_COOKIE, UBER_EATS_BASE_URL, UBER_EATS_CSRF_TOKEN,
};

use serde_json::Value;

use crate::http_client::HttpResponse;
use crate::vendor::VendorError;

/// Browser-like User-Agent; several vendors reject obvious bots.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/115.0";

/// Connection options shared by every adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterOptions {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_ms: Option<u64>,
}

impl AdapterOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            user_agent: String::from(DEFAULT_USER_AGENT),
            timeout_ms: None,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: Option<u64>) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Decode a 2xx body as JSON; anything else is a vendor fault.
pub(crate) fn read_json(vendor: &str, response: &HttpResponse) -> Result<Value, VendorError> {
    if !response.is_success() {
        return Err(VendorError::status(vendor, response.status));
    }

    response.json().map_err(|error| {
        VendorError::malformed(format!("failed to parse {vendor} response: {error}"))
    })
}
