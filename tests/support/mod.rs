//! Shared doubles for the behaviour suites.

use std::collections::HashMap;
use std::sync::Mutex;

use deliverable_core::{HttpClient, HttpError, HttpFuture, HttpRequest, HttpResponse};
use serde_json::Value;

pub const PIZZA_HUT_HUTS: &str = "https://api.pizzahut.io/v1/huts";
pub const DOMINOS_STORES: &str = "https://www.dominos.co.uk/api/stores/v1/stores";
pub const UE_AUTOCOMPLETE: &str = "https://www.ubereats.com/api/getLocationAutocompleteV1";
pub const UE_LOCATION: &str = "https://www.ubereats.com/_p/api/getDeliveryLocationV1";
pub const UE_CONFIRM: &str = "https://www.ubereats.com/api/setTargetLocationV1";
pub const UE_SEARCH: &str = "https://www.ubereats.com/api/getSearchSuggestionsV1";

/// Transport double answering by exact URL and recording every request.
#[derive(Debug, Default)]
pub struct RoutedHttpClient {
    routes: HashMap<String, Result<HttpResponse, HttpError>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RoutedHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json(mut self, url: &str, body: Value) -> Self {
        self.routes
            .insert(url.to_owned(), Ok(HttpResponse::ok_json(body.to_string())));
        self
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.routes
            .insert(url.to_owned(), Ok(HttpResponse::new(status, "")));
        self
    }

    pub fn unreachable(mut self, url: &str) -> Self {
        self.routes
            .insert(url.to_owned(), Err(HttpError::new("connection refused")));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .expect("request log should not be poisoned")
            .clone()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.requests()
            .iter()
            .filter(|request| request.url == url)
            .count()
    }
}

impl HttpClient for RoutedHttpClient {
    fn execute<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a> {
        let response = self
            .routes
            .get(&request.url)
            .cloned()
            .unwrap_or_else(|| Err(HttpError::new(format!("no route for {}", request.url))));
        self.requests
            .lock()
            .expect("request log should not be poisoned")
            .push(request);
        Box::pin(async move { response })
    }
}

/// Location payload as returned by the delivery-location endpoint.
pub fn sample_location() -> Value {
    serde_json::json!({
        "address": {"address1": "1 High Street", "title": "1 High Street"},
        "latitude": 51.5072,
        "longitude": -0.1276,
        "reference": "place-1",
        "referenceType": "google_places"
    })
}

/// Search suggestions listing one store per given title.
pub fn suggestions(titles: &[&str]) -> Value {
    let items: Vec<Value> = titles
        .iter()
        .map(|title| serde_json::json!({"type": "store", "store": {"title": title}}))
        .collect();
    serde_json::json!({ "data": items })
}

/// Routes for a fully healthy Uber Eats flow.
pub fn with_uber_eats(client: RoutedHttpClient, store_titles: &[&str]) -> RoutedHttpClient {
    client
        .json(
            UE_AUTOCOMPLETE,
            serde_json::json!({"data": [{"id": "place-1", "provider": "google_places"}]}),
        )
        .json(UE_LOCATION, serde_json::json!({"data": sample_location()}))
        .json(UE_SEARCH, suggestions(store_titles))
}
