use thiserror::Error;

use crate::vendor::VendorError;

/// Failures surfaced by the aggregator's single-vendor path.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The supplied identifier matches no registered vendor.
    #[error("could not find delivery service backend for {vendor}")]
    UnknownVendor { vendor: String },

    /// The vendor's own check failed.
    #[error("{vendor} could not determine deliverability: {source}")]
    Vendor { vendor: String, source: VendorError },
}

impl DeliveryError {
    pub fn vendor_error(&self) -> Option<&VendorError> {
        match self {
            Self::UnknownVendor { .. } => None,
            Self::Vendor { source, .. } => Some(source),
        }
    }
}

/// Invalid process configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{variable} must be a valid {expected}, got '{value}'")]
    InvalidValue {
        variable: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("DELIVERABLE_HOST must parse to an IPv4 or IPv6 address, got '{0}'")]
    InvalidHost(String),
}
