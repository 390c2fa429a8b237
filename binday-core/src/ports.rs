//! Trait describing provider capabilities and the shared error taxonomy.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;
use reqwest::StatusCode;

use crate::model::{CouncilMeta, LookupRequest, LookupResult};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while navigating a council portal.
pub enum LookupError {
    /// The portal answered a request with a non-success status.
    #[error("HTTP {status} from {url}")]
    Http {
        /// Status returned by the portal.
        status: StatusCode,
        /// URL of the failed request.
        url: String,
    },
    /// Network layer failed.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// A form action or landing URL could not be resolved.
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl {
        /// The offending URL or fragment.
        url: String,
        /// Parser message.
        reason: String,
    },
    /// The provider configuration cannot be turned into an HTTP client.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// The page contains no form to submit.
    #[error("No <form> found on page")]
    NoFormFound,
    /// An expected form control is absent; the portal markup has probably changed.
    #[error("Unsupported page shape: {0}")]
    UnsupportedPageShape(String),
    /// No address list could be located.
    #[error("Could not locate an address list")]
    NoAddressList,
    /// The address list offers nothing selectable.
    #[error("No suitable address option found")]
    NoSelectableAddress,
    /// Street search returned no street list.
    #[error("Street search did not return any street list to select from")]
    NoStreetList,
    /// The street list offers nothing selectable.
    #[error("Could not select a street option")]
    NoSelectableStreet,
    /// The final page has no bin details panel.
    #[error("Bin details panel not found in response")]
    ResultsPanelMissing,
    /// The request carries no postcode.
    #[error("Missing required field: postcode")]
    MissingPostcode,
    /// A failure with the lookup's debug trace attached.
    #[error("{source}\n--- debug trace ---\n{trace}")]
    Traced {
        /// The original failure.
        source: Box<LookupError>,
        /// Most recent trace lines, oldest first.
        trace: String,
    },
}

impl LookupError {
    /// The failure without any attached trace.
    #[must_use]
    pub fn root(&self) -> &LookupError {
        match self {
            LookupError::Traced { source, .. } => source.root(),
            other => other,
        }
    }
}

#[async_trait]
/// Trait for council-specific bin collection backends.
pub trait CollectionPort: Send + Sync {
    /// Metadata describing the council handled by this port.
    fn council(&self) -> &CouncilMeta;

    /// Resolve the request to an address and fetch its collection schedule.
    ///
    /// # Errors
    ///
    /// Returns a [`LookupError`] when a request fails or the portal pages do not have
    /// the expected shape.
    async fn lookup(&self, request: &LookupRequest) -> Result<LookupResult, LookupError>;
}
