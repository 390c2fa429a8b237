//! Connection settings for the portal.

use std::time::Duration;

use binday_core::LookupError;
use reqwest::Url;

/// Landing page of the Belfast bin collection lookup.
pub const BASE_URL: &str = "https://online.belfastcity.gov.uk/find-bin-collection-day/Default.aspx";

// The portal serves different markup to clients it does not recognise as browsers.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0 Safari/537.36";
const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-GB,en;q=0.9";

#[derive(Debug, Clone)]
/// Where the portal lives and how the session presents itself to it.
pub struct PortalConfig {
    /// Landing page holding the postcode form.
    pub base_url: String,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
    /// `Accept` sent with every request.
    pub accept: String,
    /// `Accept-Language` sent with every request.
    pub accept_language: String,
    /// Optional limit for each individual request.
    pub timeout: Option<Duration>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_owned(),
            user_agent: USER_AGENT.to_owned(),
            accept: ACCEPT.to_owned(),
            accept_language: ACCEPT_LANGUAGE.to_owned(),
            timeout: None,
        }
    }
}

impl PortalConfig {
    /// Use a different landing page, e.g. a local mock of the portal.
    #[must_use]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Limit the duration of each request.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub(crate) fn landing_url(&self) -> Result<Url, LookupError> {
        Url::parse(&self.base_url).map_err(|err| LookupError::InvalidUrl {
            url: self.base_url.clone(),
            reason: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_the_council_portal() {
        let config = PortalConfig::default();
        let url = config.landing_url().expect("valid default url");

        assert_eq!(url.host_str(), Some("online.belfastcity.gov.uk"));
        assert!(config.timeout.is_none());
    }

    #[test]
    fn malformed_base_url_is_reported() {
        let config = PortalConfig::default().with_base_url("not a url");

        assert!(matches!(
            config.landing_url(),
            Err(LookupError::InvalidUrl { .. })
        ));
    }
}
