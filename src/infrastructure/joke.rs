//! # Joke Provider
//!
//! Fetches a random dad joke over HTTP (icanhazdadjoke-compatible API).

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::config::JokeConfig;
use crate::domain::traits::JokeProvider;

#[derive(Debug, Deserialize)]
struct JokeResponse {
    joke: String,
}

pub struct HttpJokeProvider {
    client: Client,
    endpoint: String,
}

impl HttpJokeProvider {
    pub fn new(config: &JokeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("awesomo/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl JokeProvider for HttpJokeProvider {
    async fn random_joke(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("Request to {} failed", self.endpoint))?
            .error_for_status()?;

        let body: JokeResponse = response.json().await.context("Unexpected joke payload")?;
        Ok(body.joke.trim().to_string())
    }
}
