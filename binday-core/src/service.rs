//! High-level service facade over a council provider.

use std::sync::Arc;

use crate::model::{CouncilMeta, LookupRequest, LookupResult};
use crate::ports::{CollectionPort, LookupError};

/// Public entry point for bin collection lookups.
pub struct BinDayService {
    port: Arc<dyn CollectionPort>,
}

impl BinDayService {
    /// Create a new service bound to the provided port.
    #[must_use]
    pub fn new(port: Arc<dyn CollectionPort>) -> Self {
        Self { port }
    }

    /// Metadata of the council this service talks to.
    #[must_use]
    pub fn council(&self) -> &CouncilMeta {
        self.port.council()
    }

    /// Look up the collection schedule for a postcode and optional address hint.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::MissingPostcode`] for a blank postcode, otherwise any
    /// failure of the provider.
    pub async fn lookup(&self, request: LookupRequest) -> Result<LookupResult, LookupError> {
        let request = normalize(request)?;
        self.port.lookup(&request).await
    }
}

fn normalize(request: LookupRequest) -> Result<LookupRequest, LookupError> {
    let postcode = request.postcode.trim();
    if postcode.is_empty() {
        return Err(LookupError::MissingPostcode);
    }

    let address_hint = request
        .address_hint
        .as_deref()
        .map(str::trim)
        .filter(|hint| !hint.is_empty())
        .map(str::to_owned);

    Ok(LookupRequest {
        postcode: postcode.to_owned(),
        address_hint,
        debug: request.debug,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::model::CouncilId;

    struct RecordingPort {
        meta: CouncilMeta,
        seen: Mutex<Vec<LookupRequest>>,
    }

    #[async_trait]
    impl CollectionPort for RecordingPort {
        fn council(&self) -> &CouncilMeta {
            &self.meta
        }

        async fn lookup(&self, request: &LookupRequest) -> Result<LookupResult, LookupError> {
            self.seen.lock().expect("lock").push(request.clone());
            Ok(LookupResult {
                address: "1 Main Road".to_owned(),
                collections: Vec::new(),
            })
        }
    }

    fn port() -> Arc<RecordingPort> {
        Arc::new(RecordingPort {
            meta: CouncilMeta {
                id: CouncilId("test".to_owned()),
                name: "Test".to_owned(),
                portal: "example.org".to_owned(),
            },
            seen: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn blank_postcode_is_rejected_before_the_port() {
        let port = port();
        let service = BinDayService::new(Arc::clone(&port) as Arc<dyn CollectionPort>);

        let result = service.lookup(LookupRequest::new("   ", None::<String>)).await;

        assert!(matches!(result, Err(LookupError::MissingPostcode)));
        assert!(port.seen.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn input_is_trimmed_and_blank_hint_dropped() {
        let port = port();
        let service = BinDayService::new(Arc::clone(&port) as Arc<dyn CollectionPort>);

        service
            .lookup(LookupRequest::new(" BT1 1AA ", Some("  ")).with_debug(true))
            .await
            .expect("lookup succeeds");

        let seen = port.seen.lock().expect("lock");
        let request = seen.first().expect("one request");
        assert_eq!(request.postcode, "BT1 1AA");
        assert_eq!(request.address_hint, None);
        assert!(request.debug);
    }
}
