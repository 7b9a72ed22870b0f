//! Registry of vendor factories.
//!
//! [`VendorCatalogBuilder`] wires the built-in vendors to a shared transport
//! and location store. Each query then asks the catalog for fresh adapters, so
//! no adapter state crosses queries.

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::adapters::{
    AdapterOptions, DominosAdapter, PizzaHutAdapter, UberEatsAdapter, UberEatsBrand,
    DEFAULT_USER_AGENT, DOMINOS_BASE_URL, PIZZA_HUT_BASE_URL, UBER_EATS_BASE_URL,
};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::location_store::{LocationStore, MemoryLocationStore};
use crate::vendor::{Postcode, Vendor, VendorFactory, VendorId};

/// Connection settings applied to every built-in adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorSettings {
    pub pizza_hut_base_url: String,
    pub dominos_base_url: String,
    pub uber_eats_base_url: String,
    pub user_agent: String,
    /// Per-call timeout; `None` leaves vendor calls unbounded.
    pub timeout_ms: Option<u64>,
    pub confirm_uber_eats_location: bool,
}

impl Default for VendorSettings {
    fn default() -> Self {
        Self {
            pizza_hut_base_url: String::from(PIZZA_HUT_BASE_URL),
            dominos_base_url: String::from(DOMINOS_BASE_URL),
            uber_eats_base_url: String::from(UBER_EATS_BASE_URL),
            user_agent: String::from(DEFAULT_USER_AGENT),
            timeout_ms: None,
            confirm_uber_eats_location: false,
        }
    }
}

impl VendorSettings {
    /// Point every vendor family at one base URL, e.g. a local stub server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.pizza_hut_base_url = base_url.clone();
        self.dominos_base_url = base_url.clone();
        self.uber_eats_base_url = base_url;
        self
    }

    fn options(&self, base_url: &str) -> AdapterOptions {
        AdapterOptions::new(base_url)
            .with_user_agent(self.user_agent.clone())
            .with_timeout_ms(self.timeout_ms)
    }
}

/// Factory for one of the built-in vendors.
struct BuiltinVendor {
    id: VendorId,
    settings: Arc<VendorSettings>,
    http_client: Arc<dyn HttpClient>,
    locations: Arc<dyn LocationStore>,
}

impl BuiltinVendor {
    fn uber_eats(&self, brand: UberEatsBrand, postcode: Postcode) -> Box<dyn Vendor> {
        Box::new(
            UberEatsAdapter::new(
                brand,
                postcode,
                Arc::clone(&self.http_client),
                Arc::clone(&self.locations),
            )
            .with_options(self.settings.options(&self.settings.uber_eats_base_url))
            .with_location_confirmation(self.settings.confirm_uber_eats_location),
        )
    }
}

impl VendorFactory for BuiltinVendor {
    fn slug(&self) -> &str {
        self.id.slug()
    }

    fn name(&self) -> String {
        self.id.display_name().to_owned()
    }

    fn create(&self, postcode: Postcode) -> Box<dyn Vendor> {
        match self.id {
            VendorId::PizzaHut => Box::new(
                PizzaHutAdapter::new(postcode, Arc::clone(&self.http_client))
                    .with_options(self.settings.options(&self.settings.pizza_hut_base_url)),
            ),
            VendorId::Dominos => Box::new(
                DominosAdapter::new(postcode, Arc::clone(&self.http_client))
                    .with_options(self.settings.options(&self.settings.dominos_base_url)),
            ),
            VendorId::McDonalds => self.uber_eats(UberEatsBrand::McDonalds, postcode),
            VendorId::Kfc => self.uber_eats(UberEatsBrand::Kfc, postcode),
            VendorId::BurgerKing => self.uber_eats(UberEatsBrand::BurgerKing, postcode),
        }
    }
}

/// Ordered set of vendor factories keyed by slug.
#[derive(Clone, Default)]
pub struct VendorCatalog {
    factories: Vec<Arc<dyn VendorFactory>>,
}

impl Debug for VendorCatalog {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.factories.iter().map(|factory| factory.slug()))
            .finish()
    }
}

impl VendorCatalog {
    pub fn builder() -> VendorCatalogBuilder {
        VendorCatalogBuilder::new()
    }

    /// Case-insensitive slug lookup.
    pub fn get(&self, slug: &str) -> Option<&Arc<dyn VendorFactory>> {
        let slug = slug.trim();
        self.factories
            .iter()
            .find(|factory| factory.slug().eq_ignore_ascii_case(slug))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn VendorFactory>> {
        self.factories.iter()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    fn register(&mut self, factory: Arc<dyn VendorFactory>) {
        let position = self
            .factories
            .iter()
            .position(|existing| existing.slug().eq_ignore_ascii_case(factory.slug()));
        match position {
            Some(index) => self.factories[index] = factory,
            None => self.factories.push(factory),
        }
    }
}

/// Builder for a [`VendorCatalog`].
///
/// ```rust,ignore
/// let catalog = VendorCatalog::builder()
///     .with_location_store(Arc::new(cache))
///     .with_settings(settings)
///     .with_builtin_vendors()
///     .build();
/// ```
#[derive(Default)]
pub struct VendorCatalogBuilder {
    http_client: Option<Arc<dyn HttpClient>>,
    locations: Option<Arc<dyn LocationStore>>,
    settings: VendorSettings,
    include_builtins: bool,
    extra: Vec<Arc<dyn VendorFactory>>,
}

impl VendorCatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport shared by built-in vendors. Defaults to [`ReqwestHttpClient`].
    pub fn with_http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Location store for the Uber Eats family. Defaults to an in-memory store.
    pub fn with_location_store(mut self, locations: Arc<dyn LocationStore>) -> Self {
        self.locations = Some(locations);
        self
    }

    pub fn with_settings(mut self, settings: VendorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Register the five built-in vendors ahead of any custom ones.
    pub fn with_builtin_vendors(mut self) -> Self {
        self.include_builtins = true;
        self
    }

    /// Register a custom factory. A slug already present is replaced in place.
    pub fn with_vendor(mut self, factory: Arc<dyn VendorFactory>) -> Self {
        self.extra.push(factory);
        self
    }

    pub fn build(self) -> VendorCatalog {
        let mut catalog = VendorCatalog::default();

        if self.include_builtins {
            let settings = Arc::new(self.settings);
            let http_client: Arc<dyn HttpClient> = match self.http_client {
                Some(http_client) => http_client,
                None => Arc::new(ReqwestHttpClient::new()),
            };
            let locations: Arc<dyn LocationStore> = match self.locations {
                Some(locations) => locations,
                None => Arc::new(MemoryLocationStore::new()),
            };

            for id in VendorId::ALL {
                catalog.register(Arc::new(BuiltinVendor {
                    id,
                    settings: Arc::clone(&settings),
                    http_client: Arc::clone(&http_client),
                    locations: Arc::clone(&locations),
                }));
            }
        }

        for factory in self.extra {
            catalog.register(factory);
        }
        catalog
    }
}
