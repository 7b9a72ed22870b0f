//! Vendor adapter contract and the types shared by every adapter.
//!
//! # Contract
//!
//! | Item | Description |
//! |------|-------------|
//! | [`Vendor`] | One deliverability check for one postcode |
//! | [`VendorFactory`] | Builds a fresh [`Vendor`] per query |
//! | [`VendorError`] | Structured adapter failure |
//! | [`CanDeliver`] | Serialisable yes/no record |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DeliveryError;
use crate::http_client::HttpError;

/// Caller-supplied postcode, used verbatim as cache key and query value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Postcode(String);

impl Postcode {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Postcode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Postcode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Postcode {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Built-in vendor identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorId {
    PizzaHut,
    Dominos,
    McDonalds,
    Kfc,
    BurgerKing,
}

impl VendorId {
    pub const ALL: [Self; 5] = [
        Self::PizzaHut,
        Self::Dominos,
        Self::McDonalds,
        Self::Kfc,
        Self::BurgerKing,
    ];

    /// Stable lookup key, as used in front-door paths.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::PizzaHut => "pizzahut",
            Self::Dominos => "dominos",
            Self::McDonalds => "mcdonalds",
            Self::Kfc => "kfc",
            Self::BurgerKing => "burgerking",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::PizzaHut => "Pizza Hut",
            Self::Dominos => "Dominos",
            Self::McDonalds => "Uber Eats McDonalds",
            Self::Kfc => "Uber Eats KFC",
            Self::BurgerKing => "Uber Eats Burger King",
        }
    }
}

impl Display for VendorId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for VendorId {
    type Err = DeliveryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.slug().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| DeliveryError::UnknownVendor {
                vendor: value.to_owned(),
            })
    }
}

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorErrorKind {
    /// Transport failure or an unrecognised non-2xx status.
    Unavailable,
    /// A structurally required value was missing from the vendor payload.
    Malformed,
    /// The vendor did not acknowledge the session's target location.
    LocationUnconfirmed,
    /// The location cache could not be read or written.
    Cache,
}

/// Structured adapter failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorError {
    kind: VendorErrorKind,
    message: String,
}

impl VendorError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: VendorErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: VendorErrorKind::Malformed,
            message: message.into(),
        }
    }

    pub fn location_unconfirmed(message: impl Into<String>) -> Self {
        Self {
            kind: VendorErrorKind::LocationUnconfirmed,
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self {
            kind: VendorErrorKind::Cache,
            message: message.into(),
        }
    }

    /// Transport failure while talking to `vendor`.
    pub fn transport(vendor: &str, error: &HttpError) -> Self {
        Self::unavailable(format!("{vendor} transport error: {}", error.message()))
    }

    /// Non-2xx status that is not a recognised negative answer.
    pub fn status(vendor: &str, status: u16) -> Self {
        Self::unavailable(format!("{vendor} upstream returned status {status}"))
    }

    pub const fn kind(&self) -> VendorErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether a later attempt could plausibly succeed. Informational only.
    pub const fn retryable(&self) -> bool {
        matches!(self.kind, VendorErrorKind::Unavailable)
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            VendorErrorKind::Unavailable => "vendor.unavailable",
            VendorErrorKind::Malformed => "vendor.malformed",
            VendorErrorKind::LocationUnconfirmed => "vendor.location_unconfirmed",
            VendorErrorKind::Cache => "vendor.cache",
        }
    }
}

impl Display for VendorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for VendorError {}

/// Serialisable deliverability record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanDeliver {
    pub can_deliver: bool,
}

impl From<bool> for CanDeliver {
    fn from(can_deliver: bool) -> Self {
        Self { can_deliver }
    }
}

pub type VendorFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, VendorError>> + Send + 'a>>;

/// One vendor's answer to "can you deliver to this postcode?".
///
/// Instances are built for a single postcode and discarded after one check.
/// Any session an implementation needs is opened inside
/// [`can_deliver`](Vendor::can_deliver) and released before it returns.
pub trait Vendor: Send + Sync {
    /// Stable display name, unique across registered vendors.
    fn name(&self) -> String;

    /// Ask the vendor whether it currently delivers to the postcode.
    ///
    /// # Errors
    ///
    /// Returns [`VendorError`] when a call cannot be completed, the vendor
    /// answers with an unexpected status or shape, or the session location
    /// cannot be confirmed. Definitive negatives are `Ok(false)`.
    fn can_deliver(&self) -> VendorFuture<'_, bool>;
}

/// Registry entry that builds per-query [`Vendor`] instances.
pub trait VendorFactory: Send + Sync {
    /// Lookup key used by the single-vendor path.
    fn slug(&self) -> &str;

    fn name(&self) -> String;

    fn create(&self, postcode: Postcode) -> Box<dyn Vendor>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_id_parses_slugs_case_insensitively() {
        assert_eq!("pizzahut".parse::<VendorId>().expect("slug"), VendorId::PizzaHut);
        assert_eq!("BurgerKing".parse::<VendorId>().expect("slug"), VendorId::BurgerKing);
    }

    #[test]
    fn unknown_vendor_id_names_the_identifier() {
        let error = "notfound".parse::<VendorId>().expect_err("unknown");
        assert_eq!(
            error.to_string(),
            "could not find delivery service backend for notfound"
        );
    }

    #[test]
    fn can_deliver_serialises_as_single_field_record() {
        let json = serde_json::to_value(CanDeliver::from(true)).expect("serialise");
        assert_eq!(json, serde_json::json!({"can_deliver": true}));
    }

    #[test]
    fn only_unavailable_errors_are_retryable() {
        assert!(VendorError::unavailable("x").retryable());
        assert!(!VendorError::location_unconfirmed("x").retryable());
        assert_eq!(
            VendorError::location_unconfirmed("x").code(),
            "vendor.location_unconfirmed"
        );
    }
}
