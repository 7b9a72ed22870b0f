//! Concurrent fan-out over every registered vendor.

use std::collections::BTreeMap;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::VendorCatalog;
use crate::error::DeliveryError;
use crate::vendor::{CanDeliver, Postcode, VendorError};

/// Failure recorded in place of one vendor's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeError {
    pub code: String,
    pub message: String,
}

impl From<&VendorError> for OutcomeError {
    fn from(error: &VendorError) -> Self {
        Self {
            code: error.code().to_owned(),
            message: error.message().to_owned(),
        }
    }
}

/// One vendor's entry in a [`DeliveryReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VendorOutcome {
    Resolved(CanDeliver),
    Failed { error: OutcomeError },
}

impl VendorOutcome {
    pub fn can_deliver(&self) -> Option<bool> {
        match self {
            Self::Resolved(record) => Some(record.can_deliver),
            Self::Failed { .. } => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Per-vendor outcomes keyed by vendor display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliveryReport {
    entries: BTreeMap<String, VendorOutcome>,
}

impl DeliveryReport {
    pub fn get(&self, vendor: &str) -> Option<&VendorOutcome> {
        self.entries.get(vendor)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VendorOutcome)> {
        self.entries
            .iter()
            .map(|(name, outcome)| (name.as_str(), outcome))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn failures(&self) -> usize {
        self.entries
            .values()
            .filter(|outcome| outcome.is_failure())
            .count()
    }
}

impl FromIterator<(String, VendorOutcome)> for DeliveryReport {
    fn from_iter<I: IntoIterator<Item = (String, VendorOutcome)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Slug and display name of a registered vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorSummary {
    pub slug: String,
    pub name: String,
}

/// Answers deliverability queries against a [`VendorCatalog`].
#[derive(Debug, Clone)]
pub struct Aggregator {
    catalog: VendorCatalog,
}

impl Aggregator {
    pub fn new(catalog: VendorCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &VendorCatalog {
        &self.catalog
    }

    pub fn vendors(&self) -> Vec<VendorSummary> {
        self.catalog
            .iter()
            .map(|factory| VendorSummary {
                slug: factory.slug().to_owned(),
                name: factory.name(),
            })
            .collect()
    }

    /// Ask every vendor at once and wait for all of them.
    ///
    /// A failing vendor is logged and recorded in its own entry; it never
    /// affects the others or the report as a whole.
    pub async fn resolve_all(&self, postcode: &Postcode) -> DeliveryReport {
        let checks = self.catalog.iter().map(|factory| {
            let vendor = factory.create(postcode.clone());
            async move {
                let name = vendor.name();
                let outcome = match vendor.can_deliver().await {
                    Ok(can_deliver) => VendorOutcome::Resolved(CanDeliver::from(can_deliver)),
                    Err(error) => {
                        warn!(
                            vendor = %name,
                            postcode = %postcode,
                            code = error.code(),
                            retryable = error.retryable(),
                            error = %error.message(),
                            "vendor check failed"
                        );
                        VendorOutcome::Failed {
                            error: OutcomeError::from(&error),
                        }
                    }
                };
                (name, outcome)
            }
        });

        let report: DeliveryReport = join_all(checks).await.into_iter().collect();
        debug!(
            postcode = %postcode,
            vendors = report.len(),
            failures = report.failures(),
            "delivery report resolved"
        );
        report
    }

    /// Ask a single vendor, looked up by slug.
    ///
    /// # Errors
    ///
    /// [`DeliveryError::UnknownVendor`] when no vendor has the slug and
    /// [`DeliveryError::Vendor`] when the vendor's own check fails.
    pub async fn resolve_one(
        &self,
        slug: &str,
        postcode: &Postcode,
    ) -> Result<(String, CanDeliver), DeliveryError> {
        let factory = self
            .catalog
            .get(slug)
            .ok_or_else(|| DeliveryError::UnknownVendor {
                vendor: slug.to_owned(),
            })?;

        let vendor = factory.create(postcode.clone());
        let name = vendor.name();
        match vendor.can_deliver().await {
            Ok(can_deliver) => Ok((name, CanDeliver::from(can_deliver))),
            Err(source) => {
                warn!(
                    vendor = %name,
                    postcode = %postcode,
                    code = source.code(),
                    retryable = source.retryable(),
                    error = %source.message(),
                    "vendor check failed"
                );
                Err(DeliveryError::Vendor {
                    vendor: name,
                    source,
                })
            }
        }
    }
}
