use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::config::{Config, SIGNALS_PATH};
use crate::payload::SignalsPayload;

/// Anything that can produce the latest signals payload.
#[async_trait]
pub trait SignalSource: Send + Sync {
    fn describe(&self) -> String;
    async fn fetch_signals(&self) -> Result<SignalsPayload>;
}

/// Fetches the payload over HTTP.
///
/// HTTP error statuses, bodies that are not JSON and JSON without the two
/// expected keys all surface as errors; callers do not tell them apart.
pub struct HttpSignalSource {
    client: Client,
    url: Url,
}

impl HttpSignalSource {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let url = signals_url(base_url)?;
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("building http client")?;
        Ok(Self { client, url })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(&cfg.base_url, cfg.fetch_timeout())
    }
}

#[async_trait]
impl SignalSource for HttpSignalSource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn fetch_signals(&self) -> Result<SignalsPayload> {
        let resp = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .with_context(|| format!("GET {}", self.url))?;
        let resp = resp
            .error_for_status()
            .with_context(|| format!("GET {}", self.url))?;
        let body = resp.text().await.context("reading response body")?;
        SignalsPayload::from_json(&body).context("decoding signals payload")
    }
}

/// Resolves the fixed signals path against the base URL.
pub fn signals_url(base_url: &str) -> Result<Url> {
    let base = Url::parse(base_url).with_context(|| format!("invalid base url {:?}", base_url))?;
    base.join(SIGNALS_PATH)
        .with_context(|| format!("joining {} onto {}", SIGNALS_PATH, base_url))
}
