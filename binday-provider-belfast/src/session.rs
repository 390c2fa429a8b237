//! HTTP session backing one lookup: cookie jar, browser-like headers, and form posts.

use std::collections::BTreeMap;

use binday_core::LookupError;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, ORIGIN, REFERER};
use reqwest::{Client, Response, Url};
use scraper::Html;

use crate::config::PortalConfig;

/// A fetched portal page.
#[derive(Debug, Clone)]
pub(crate) struct Page {
    /// Final URL after redirects; relative form actions resolve against it.
    pub(crate) url: Url,
    pub(crate) body: String,
}

impl Page {
    pub(crate) fn document(&self) -> Html {
        Html::parse_document(&self.body)
    }
}

/// A form ready to be posted.
#[derive(Debug, Clone)]
pub(crate) struct Submission {
    pub(crate) url: Url,
    pub(crate) fields: BTreeMap<String, String>,
}

/// Cookie-keeping client owned by exactly one lookup.
pub(crate) struct PortalSession {
    client: Client,
}

impl PortalSession {
    pub(crate) fn new(config: &PortalConfig) -> Result<Self, LookupError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, header_value(&config.accept)?);
        headers.insert(ACCEPT_LANGUAGE, header_value(&config.accept_language)?);

        let mut builder = Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent.as_str())
            .default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    pub(crate) async fn get(&self, url: &Url) -> Result<Page, LookupError> {
        let response = self.client.get(url.clone()).send().await?;
        into_page(response).await
    }

    /// Post a form the way a browser would after a click on `current`.
    pub(crate) async fn submit(
        &self,
        current: &Url,
        submission: Submission,
    ) -> Result<Page, LookupError> {
        let response = self
            .client
            .post(submission.url)
            .header(REFERER, current.as_str())
            .header(ORIGIN, current.origin().ascii_serialization())
            .form(&submission.fields)
            .send()
            .await?;
        into_page(response).await
    }
}

fn header_value(value: &str) -> Result<HeaderValue, LookupError> {
    HeaderValue::from_str(value)
        .map_err(|err| LookupError::InvalidConfig(format!("header value {value:?}: {err}")))
}

async fn into_page(response: Response) -> Result<Page, LookupError> {
    let status = response.status();
    let url = response.url().clone();
    if !status.is_success() {
        return Err(LookupError::Http {
            status,
            url: url.to_string(),
        });
    }

    let body = response.text().await?;
    Ok(Page { url, body })
}
