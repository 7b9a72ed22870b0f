use deliverable_core::{CacheError, ConfigError, DeliveryError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Delivery(DeliveryError::UnknownVendor { .. }) => 2,
            Self::Delivery(DeliveryError::Vendor { .. }) => 3,
            Self::Serialization(_) => 4,
            Self::Config(_) | Self::Cache(_) | Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deliverable_core::VendorError;

    #[test]
    fn unknown_vendor_is_a_usage_failure() {
        let error = CliError::from(DeliveryError::UnknownVendor {
            vendor: String::from("notfound"),
        });

        assert_eq!(error.exit_code(), 2);
        assert_eq!(
            error.to_string(),
            "could not find delivery service backend for notfound"
        );
    }

    #[test]
    fn vendor_failure_and_config_errors_have_distinct_codes() {
        let vendor = CliError::from(DeliveryError::Vendor {
            vendor: String::from("Dominos"),
            source: VendorError::unavailable("timeout"),
        });
        let config = CliError::from(ConfigError::InvalidHost(String::from("nowhere")));

        assert_eq!(vendor.exit_code(), 3);
        assert_eq!(config.exit_code(), 10);
    }
}
