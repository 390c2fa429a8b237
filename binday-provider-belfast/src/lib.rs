//! Provider implementation for Belfast City Council's bin collection portal.
//!
//! The portal has no API. It is an ASP.NET form that is driven through a chain of
//! postbacks: search by postcode, pick an address, read the schedule. When the
//! postcode results offer no usable address list the lookup searches by street instead.

mod address;
mod config;
mod controls;
mod details;
mod flow;
mod form;
mod options;
mod postcode;
mod session;
mod street;

use std::sync::Arc;

use async_trait::async_trait;
use binday_core::{
    model::{CouncilId, CouncilMeta, LookupRequest, LookupResult},
    ports::{CollectionPort, LookupError},
    trace::LookupTrace,
};

pub use crate::config::{BASE_URL, PortalConfig};
use crate::flow::LookupFlow;
use crate::session::PortalSession;

/// Bin collection lookups against the Belfast portal.
pub struct BelfastPort {
    config: PortalConfig,
    meta: CouncilMeta,
}

impl BelfastPort {
    /// Create a new port using the given portal settings.
    #[must_use]
    pub fn new(config: PortalConfig) -> Self {
        Self {
            config,
            meta: council_meta(),
        }
    }

    async fn run(
        &self,
        request: &LookupRequest,
        trace: &mut LookupTrace,
    ) -> Result<LookupResult, LookupError> {
        let landing = self.config.landing_url()?;
        // Each lookup gets its own cookie jar; the portal keys its state to it.
        let session = PortalSession::new(&self.config)?;

        LookupFlow::new(&session, &landing, request, trace)
            .run()
            .await
    }
}

#[async_trait]
impl CollectionPort for BelfastPort {
    fn council(&self) -> &CouncilMeta {
        &self.meta
    }

    async fn lookup(&self, request: &LookupRequest) -> Result<LookupResult, LookupError> {
        let mut trace = LookupTrace::new(request.debug);
        tracing::debug!(postcode = %request.postcode, "starting lookup");

        self.run(request, &mut trace)
            .await
            .map_err(|error| trace.attach(error))
    }
}

/// Build the port for the Belfast provider.
#[must_use]
pub fn provider(config: PortalConfig) -> Arc<dyn CollectionPort> {
    Arc::new(BelfastPort::new(config))
}

fn council_meta() -> CouncilMeta {
    CouncilMeta {
        id: CouncilId(String::from("belfast")),
        name: String::from("Belfast City Council"),
        portal: String::from("online.belfastcity.gov.uk/find-bin-collection-day"),
    }
}
