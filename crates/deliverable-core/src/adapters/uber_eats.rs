//! Uber Eats brand family.
//!
//! Every brand shares one protocol and differs only by its search term:
//! resolve the postcode to a delivery location (cached), attach it to the
//! session as the `uev2.loc` cookie, then scan search suggestions for a store
//! whose title contains the brand term.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use super::{read_json, AdapterOptions};
use crate::http_client::{HttpClient, HttpRequest, HttpResponse};
use crate::location_store::LocationStore;
use crate::session::VendorSession;
use crate::vendor::{Postcode, Vendor, VendorError, VendorFuture, VendorId};

pub const UBER_EATS_BASE_URL: &str = "https://www.ubereats.com";
pub const LOCATION_COOKIE: &str = "uev2.loc";
pub const UBER_EATS_CSRF_TOKEN: &str = "x";

const LOCALE_CODE: &str = "gb";
const DEFAULT_PLACE_PROVIDER: &str = "google_places";
const PLACE_SOURCE: &str = "manual_auto_complete";
const STORE_ITEM_TYPE: &str = "store";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UberEatsBrand {
    McDonalds,
    Kfc,
    BurgerKing,
}

impl UberEatsBrand {
    pub const ALL: [Self; 3] = [Self::McDonalds, Self::Kfc, Self::BurgerKing];

    /// Lowercase fragment a matching store title must contain.
    pub const fn search_term(self) -> &'static str {
        match self {
            Self::McDonalds => "mcdonald",
            Self::Kfc => "kfc",
            Self::BurgerKing => "burger king",
        }
    }

    pub const fn vendor_id(self) -> VendorId {
        match self {
            Self::McDonalds => VendorId::McDonalds,
            Self::Kfc => VendorId::Kfc,
            Self::BurgerKing => VendorId::BurgerKing,
        }
    }
}

pub struct UberEatsAdapter {
    brand: UberEatsBrand,
    postcode: Postcode,
    http_client: Arc<dyn HttpClient>,
    locations: Arc<dyn LocationStore>,
    options: AdapterOptions,
    confirm_location: bool,
}

impl UberEatsAdapter {
    pub fn new(
        brand: UberEatsBrand,
        postcode: Postcode,
        http_client: Arc<dyn HttpClient>,
        locations: Arc<dyn LocationStore>,
    ) -> Self {
        Self {
            brand,
            postcode,
            http_client,
            locations,
            options: AdapterOptions::new(UBER_EATS_BASE_URL),
            confirm_location: false,
        }
    }

    pub fn with_options(mut self, options: AdapterOptions) -> Self {
        self.options = options;
        self
    }

    /// Require the vendor to acknowledge the session location before searching.
    pub fn with_location_confirmation(mut self, confirm_location: bool) -> Self {
        self.confirm_location = confirm_location;
        self
    }

    fn open_session(&self) -> VendorSession {
        VendorSession::open(self.name(), Arc::clone(&self.http_client))
            .with_default_header("user-agent", &self.options.user_agent)
            .with_fixed_header("x-csrf-token", UBER_EATS_CSRF_TOKEN)
            .with_timeout_ms(self.options.timeout_ms)
    }

    fn endpoint(&self, path: &str) -> HttpRequest {
        HttpRequest::post(self.options.url(path)).with_query("localeCode", LOCALE_CODE)
    }

    async fn call(
        &self,
        session: &VendorSession,
        request: HttpRequest,
    ) -> Result<HttpResponse, VendorError> {
        session
            .send(request)
            .await
            .map_err(|error| VendorError::transport(session.vendor(), &error))
    }

    /// Cached location, or a freshly resolved one written back to the cache.
    /// `None` when the postcode matches no address.
    async fn resolve_location(
        &self,
        session: &VendorSession,
    ) -> Result<Option<Map<String, Value>>, VendorError> {
        let postcode = self.postcode.as_str();
        let cached = self
            .locations
            .get(postcode)
            .await
            .map_err(|error| VendorError::cache(error.to_string()))?;
        if let Some(location) = cached {
            debug!(postcode, "location cache hit");
            return Ok(Some(location));
        }

        debug!(postcode, "location cache miss");
        let Some(candidate) = self.first_address_candidate(session).await? else {
            return Ok(None);
        };
        let location = self.location_details(session, &candidate).await?;
        self.locations
            .set(postcode, location.clone())
            .await
            .map_err(|error| VendorError::cache(error.to_string()))?;

        Ok(Some(location))
    }

    async fn first_address_candidate(
        &self,
        session: &VendorSession,
    ) -> Result<Option<Map<String, Value>>, VendorError> {
        let request = self
            .endpoint("/api/getLocationAutocompleteV1")
            .with_form_body(&[("query", self.postcode.as_str())]);
        let payload = read_json(session.vendor(), &self.call(session, request).await?)?;

        let candidate = payload
            .get("data")
            .and_then(Value::as_array)
            .and_then(|candidates| candidates.first().cloned());
        match candidate {
            None => {
                debug!(postcode = %self.postcode, "no address candidates");
                Ok(None)
            }
            Some(Value::Object(candidate)) => Ok(Some(candidate)),
            Some(_) => Err(VendorError::malformed("address candidate is not an object")),
        }
    }

    async fn location_details(
        &self,
        session: &VendorSession,
        candidate: &Map<String, Value>,
    ) -> Result<Map<String, Value>, VendorError> {
        let place_id = candidate
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| VendorError::malformed("address candidate has no id"))?;
        let provider = candidate
            .get("provider")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_PLACE_PROVIDER);

        let request = self.endpoint("/_p/api/getDeliveryLocationV1").with_json_body(&json!({
            "placeId": place_id,
            "provider": provider,
            "source": PLACE_SOURCE,
        }));
        let payload = read_json(session.vendor(), &self.call(session, request).await?)?;

        match payload.get("data") {
            Some(Value::Object(location)) => Ok(location.clone()),
            _ => Err(VendorError::malformed("delivery location response has no data object")),
        }
    }

    async fn confirm_target_location(
        &self,
        session: &VendorSession,
        location: &Map<String, Value>,
    ) -> Result<(), VendorError> {
        let request = self
            .endpoint("/api/setTargetLocationV1")
            .with_json_body(&Value::Object(location.clone()));
        let response = self.call(session, request).await?;
        let status = response
            .json::<Value>()
            .ok()
            .and_then(|body| body.get("status").and_then(Value::as_str).map(str::to_owned));

        if response.is_success() && status.as_deref() == Some("success") {
            return Ok(());
        }

        warn!(
            vendor = %session.vendor(),
            postcode = %self.postcode,
            http_status = response.status,
            "target location was not acknowledged"
        );
        Err(VendorError::location_unconfirmed(format!(
            "{} did not confirm the target location for {}",
            session.vendor(),
            self.postcode
        )))
    }

    async fn search_for_store(&self, session: &VendorSession) -> Result<bool, VendorError> {
        let term = self.brand.search_term();
        let request = self.endpoint("/api/getSearchSuggestionsV1").with_form_body(&[
            ("userQuery", term),
            ("date", ""),
            ("startTime", "0"),
            ("endTime", "0"),
            ("vertical", "ALL"),
        ]);
        let payload = read_json(session.vendor(), &self.call(session, request).await?)?;

        let Some(items) = payload.get("data").and_then(Value::as_array) else {
            return Ok(false);
        };
        let matched = items.iter().find(|item| is_matching_store(item, term));
        if let Some(item) = matched {
            let title = item
                .pointer("/store/title")
                .and_then(Value::as_str)
                .unwrap_or_default();
            debug!(postcode = %self.postcode, title, "matching store found");
        }

        Ok(matched.is_some())
    }
}

fn is_matching_store(item: &Value, term: &str) -> bool {
    if item.get("type").and_then(Value::as_str) != Some(STORE_ITEM_TYPE) {
        return false;
    }
    item.pointer("/store/title")
        .and_then(Value::as_str)
        .is_some_and(|title| title.to_lowercase().contains(&term.to_lowercase()))
}

impl Vendor for UberEatsAdapter {
    fn name(&self) -> String {
        self.brand.vendor_id().display_name().to_owned()
    }

    fn can_deliver(&self) -> VendorFuture<'_, bool> {
        Box::pin(async move {
            let mut session = self.open_session();

            let Some(location) = self.resolve_location(&session).await? else {
                return Ok(false);
            };
            session.set_cookie(LOCATION_COOKIE, Value::Object(location.clone()).to_string());

            if self.confirm_location {
                self.confirm_target_location(&session, &location).await?;
            }

            self.search_for_store(&session).await
        })
    }
}
