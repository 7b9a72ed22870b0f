//! Behavior-driven tests for the built-in vendors.
//!
//! Every vendor is wired through the real catalog against a routed transport,
//! so these tests exercise the same request shapes the binaries send.

use std::sync::Arc;
use std::time::Duration;

use deliverable_core::{
    Aggregator, LocationFuture, LocationStore, MemoryLocationStore, Postcode, VendorCatalog,
    VendorErrorKind, VendorSettings,
};
use deliverable_tests::support::{
    sample_location, with_uber_eats, RoutedHttpClient, DOMINOS_STORES, PIZZA_HUT_HUTS,
    UE_AUTOCOMPLETE, UE_CONFIRM, UE_LOCATION, UE_SEARCH,
};
use serde_json::{json, Map, Value};

fn aggregator_over(
    client: &Arc<RoutedHttpClient>,
    locations: &Arc<MemoryLocationStore>,
    settings: VendorSettings,
) -> Aggregator {
    Aggregator::new(
        VendorCatalog::builder()
            .with_http_client(client.clone())
            .with_location_store(locations.clone())
            .with_settings(settings)
            .with_builtin_vendors()
            .build(),
    )
}

fn healthy_vendors() -> RoutedHttpClient {
    let client = RoutedHttpClient::new()
        .json(PIZZA_HUT_HUTS, json!([{"id": "501", "name": "Kingsbury"}]))
        .json(
            DOMINOS_STORES,
            json!({"data": {"localStore": {"catchmentServiceability": {"reason": "None"}}}}),
        );
    with_uber_eats(client, &["McDonald's Kingsbury", "KFC Kingsbury"])
}

/// Store whose every read takes a fixed time without blocking the task.
struct SlowLocationStore {
    inner: MemoryLocationStore,
    delay: Duration,
}

impl LocationStore for SlowLocationStore {
    fn get<'a>(&'a self, postcode: &'a str) -> LocationFuture<'a, Option<Map<String, Value>>> {
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            self.inner.get(postcode).await
        })
    }

    fn set<'a>(
        &'a self,
        postcode: &'a str,
        location: Map<String, Value>,
    ) -> LocationFuture<'a, ()> {
        self.inner.set(postcode, location)
    }
}

// =============================================================================
// Vendors: Full Report
// =============================================================================

#[tokio::test]
async fn when_every_vendor_answers_report_lists_each_by_display_name() {
    // Given: All five built-in vendors with healthy upstreams
    let client = Arc::new(healthy_vendors());
    let locations = Arc::new(MemoryLocationStore::new());
    let aggregator = aggregator_over(&client, &locations, VendorSettings::default());

    // When: The report for a postcode is requested
    let report = aggregator.resolve_all(&Postcode::new("NW9 9ED")).await;

    // Then: Every vendor has a record and only Burger King has no matching store
    assert_eq!(
        serde_json::to_value(&report).expect("serialise"),
        json!({
            "Dominos": {"can_deliver": true},
            "Pizza Hut": {"can_deliver": true},
            "Uber Eats Burger King": {"can_deliver": false},
            "Uber Eats KFC": {"can_deliver": true},
            "Uber Eats McDonalds": {"can_deliver": true}
        })
    );
    assert!(locations.get("NW9 9ED").await.expect("store").is_some());
}

#[tokio::test]
async fn when_one_vendor_is_unreachable_others_still_answer() {
    // Given: Pizza Hut refuses connections
    let client = Arc::new(healthy_vendors().unreachable(PIZZA_HUT_HUTS));
    let locations = Arc::new(MemoryLocationStore::new());
    let aggregator = aggregator_over(&client, &locations, VendorSettings::default());

    // When: The report is requested
    let report = aggregator.resolve_all(&Postcode::new("NW9 9ED")).await;

    // Then: Pizza Hut carries an error entry and the rest are unaffected
    assert_eq!(report.len(), 5);
    assert_eq!(report.failures(), 1);
    let pizza_hut = serde_json::to_value(report.get("Pizza Hut").expect("entry")).expect("json");
    assert_eq!(pizza_hut["error"]["code"], "vendor.unavailable");
    assert_eq!(
        report.get("Dominos").and_then(|outcome| outcome.can_deliver()),
        Some(true)
    );
}

// =============================================================================
// Vendors: Definitive Negatives
// =============================================================================

#[tokio::test]
async fn when_dominos_reports_not_found_answer_is_false_not_an_error() {
    // Given: Dominos has no store record for the postcode
    let client = Arc::new(RoutedHttpClient::new().status(DOMINOS_STORES, 404));
    let locations = Arc::new(MemoryLocationStore::new());
    let aggregator = aggregator_over(&client, &locations, VendorSettings::default());

    // When: Dominos alone is asked
    let (name, record) = aggregator
        .resolve_one("dominos", &Postcode::new("ZZ99 9ZZ"))
        .await
        .expect("404 is a definitive negative");

    // Then: The answer is a plain false
    assert_eq!(name, "Dominos");
    assert!(!record.can_deliver);
}

#[tokio::test]
async fn when_dominos_store_is_too_far_answer_is_false() {
    // Given: Dominos names a restriction reason
    let client = Arc::new(RoutedHttpClient::new().json(
        DOMINOS_STORES,
        json!({"data": {"localStore": {"catchmentServiceability": {"reason": "TooFar"}}}}),
    ));
    let locations = Arc::new(MemoryLocationStore::new());
    let aggregator = aggregator_over(&client, &locations, VendorSettings::default());

    // When / Then
    let (_, record) = aggregator
        .resolve_one("dominos", &Postcode::new("NW9 9ED"))
        .await
        .expect("answer");
    assert!(!record.can_deliver);
}

#[tokio::test]
async fn when_pizza_hut_lists_no_huts_answer_is_false() {
    // Given: Pizza Hut returns an empty hut list
    let client = Arc::new(RoutedHttpClient::new().json(PIZZA_HUT_HUTS, json!([])));
    let locations = Arc::new(MemoryLocationStore::new());
    let aggregator = aggregator_over(&client, &locations, VendorSettings::default());

    // When / Then
    let (_, record) = aggregator
        .resolve_one("PizzaHut", &Postcode::new("NW9 9ED"))
        .await
        .expect("answer");
    assert!(!record.can_deliver);
}

#[tokio::test]
async fn when_no_address_matches_uber_eats_answers_false_without_caching() {
    // Given: Autocomplete yields no candidates
    let client = Arc::new(RoutedHttpClient::new().json(UE_AUTOCOMPLETE, json!({"data": []})));
    let locations = Arc::new(MemoryLocationStore::new());
    let aggregator = aggregator_over(&client, &locations, VendorSettings::default());

    // When: McDonalds is asked
    let (_, record) = aggregator
        .resolve_one("mcdonalds", &Postcode::new("XX1 1XX"))
        .await
        .expect("no candidates is a definitive negative");

    // Then: False, nothing cached, no further calls
    assert!(!record.can_deliver);
    assert!(locations.is_empty());
    assert_eq!(client.calls_to(UE_LOCATION), 0);
    assert_eq!(client.calls_to(UE_SEARCH), 0);
}

// =============================================================================
// Vendors: Session Context
// =============================================================================

#[tokio::test]
async fn uber_eats_search_carries_location_cookie_and_csrf_header() {
    // Given: A healthy Uber Eats flow
    let client = Arc::new(with_uber_eats(RoutedHttpClient::new(), &["KFC Camden"]));
    let locations = Arc::new(MemoryLocationStore::new());
    let aggregator = aggregator_over(&client, &locations, VendorSettings::default());

    // When: KFC is asked
    let (_, record) = aggregator
        .resolve_one("kfc", &Postcode::new("NW1 8QL"))
        .await
        .expect("answer");

    // Then: The search call carries the resolved location as uev2.loc
    assert!(record.can_deliver);
    let requests = client.requests();
    let search = requests
        .iter()
        .find(|request| request.url == UE_SEARCH)
        .expect("search call");
    let cookie = search.headers.get("cookie").expect("cookie header");
    let location_json = cookie.strip_prefix("uev2.loc=").expect("location cookie");
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(location_json).expect("json"),
        sample_location()
    );
    assert!(requests
        .iter()
        .all(|request| request.headers.get("x-csrf-token").map(String::as_str) == Some("x")));
}

#[tokio::test]
async fn unacknowledged_target_location_surfaces_as_fatal_fault() {
    // Given: Confirmation is enabled and Uber Eats rejects the location
    let client = Arc::new(
        with_uber_eats(RoutedHttpClient::new(), &["McDonald's"])
            .json(UE_CONFIRM, json!({"status": "failure"})),
    );
    let locations = Arc::new(MemoryLocationStore::new());
    let settings = VendorSettings {
        confirm_uber_eats_location: true,
        ..VendorSettings::default()
    };
    let aggregator = aggregator_over(&client, &locations, settings);

    // When: McDonalds is asked
    let error = aggregator
        .resolve_one("mcdonalds", &Postcode::new("NW9 9ED"))
        .await
        .expect_err("unconfirmed location must not produce an answer");

    // Then: The fault is surfaced with its own kind and search never runs
    let vendor_error = error.vendor_error().expect("vendor failure");
    assert_eq!(vendor_error.kind(), VendorErrorKind::LocationUnconfirmed);
    assert_eq!(client.calls_to(UE_SEARCH), 0);
}

// =============================================================================
// Vendors: Location Store Latency
// =============================================================================

#[tokio::test(start_paused = true)]
async fn slow_location_reads_overlap_across_uber_eats_brands() {
    // Given: A location store that takes 300ms per read behind all five vendors
    let client = Arc::new(healthy_vendors());
    let aggregator = Aggregator::new(
        VendorCatalog::builder()
            .with_http_client(client.clone())
            .with_location_store(Arc::new(SlowLocationStore {
                inner: MemoryLocationStore::new(),
                delay: Duration::from_millis(300),
            }))
            .with_builtin_vendors()
            .build(),
    );

    // When: The full report is requested
    let started = tokio::time::Instant::now();
    let report = aggregator.resolve_all(&Postcode::new("NW9 9ED")).await;

    // Then: The three brand reads ran together rather than one after another
    assert_eq!(report.len(), 5);
    assert_eq!(report.failures(), 0);
    assert!(started.elapsed() < Duration::from_millis(600));
}
