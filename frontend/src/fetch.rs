use anyhow::{ensure, Context};
use futures_util::future::join;
use models::routes;
use serde_json::Value;

use crate::helpers::temperature_text;

/// The two reads a fetch cycle performs.
#[allow(async_fn_in_trait)]
pub trait DataSource {
    async fn temperature(&self) -> anyhow::Result<String>;
    async fn payload(&self) -> anyhow::Result<Value>;
}

pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpSource {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn get(&self, path: &str) -> anyhow::Result<reqwest::Response> {
        let url = routes::join(&self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;

        ensure!(
            response.status().is_success(),
            "GET {url}: status {}",
            response.status()
        );
        Ok(response)
    }
}

impl DataSource for HttpSource {
    async fn temperature(&self) -> anyhow::Result<String> {
        let body = self
            .get(routes::TEMPERATURE)
            .await?
            .text()
            .await
            .context("reading temperature body")?;
        Ok(temperature_text(body))
    }

    async fn payload(&self) -> anyhow::Result<Value> {
        self.get(routes::DATA)
            .await?
            .json()
            .await
            .context("decoding data body")
    }
}

/// Issues both reads at once and hands each success to its setter as soon as it lands.
/// Failures are logged and returned; the matching setter is never called.
pub async fn fetch_cycle(
    source: &impl DataSource,
    set_temperature: impl FnOnce(String),
    set_payload: impl FnOnce(Value),
) -> Vec<anyhow::Error> {
    let temperature = async {
        match source.temperature().await {
            Ok(temperature) => {
                set_temperature(temperature);
                None
            }
            Err(e) => {
                log::error!("temperature request failed: {e:#}");
                Some(e)
            }
        }
    };

    let payload = async {
        match source.payload().await {
            Ok(payload) => {
                set_payload(payload);
                None
            }
            Err(e) => {
                log::error!("data request failed: {e:#}");
                Some(e)
            }
        }
    };

    let (temperature, payload) = join(temperature, payload).await;
    temperature.into_iter().chain(payload).collect()
}
