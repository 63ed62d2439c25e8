use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use super::{check_table_name, StoreError, WaitlistStore};
use crate::domain::WaitlistEmail;

#[derive(Serialize)]
struct NewEntry<'a> {
    email: &'a str,
}

/// Error payload returned by the table API when it refuses a row.
#[derive(Deserialize)]
struct RejectionBody {
    code: Option<String>,
    message: Option<String>,
}

/// Client for a hosted Postgres table exposed over a PostgREST-style API.
#[derive(Debug)]
pub struct RestWaitlistStore {
    client: Client,
    endpoint: Url,
    api_key: Secret<String>,
}

impl RestWaitlistStore {
    pub fn new(
        base_url: &str,
        table: &str,
        api_key: Secret<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, anyhow::Error> {
        check_table_name(table).map_err(anyhow::Error::msg)?;
        let endpoint = Url::parse(&format!(
            "{}/rest/v1/{}",
            base_url.trim_end_matches('/'),
            table
        ))?;
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl WaitlistStore for RestWaitlistStore {
    #[tracing::instrument(
        name = "Inserting a waitlist entry through the table API",
        skip(self, email),
        fields(endpoint = %self.endpoint)
    )]
    async fn insert_waitlist_entry(&self, email: &WaitlistEmail) -> Result<(), StoreError> {
        let request_body = [NewEntry {
            email: email.as_ref(),
        }];
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("apikey", self.api_key.expose_secret())
            .bearer_auth(self.api_key.expose_secret())
            .header("Prefer", "return=minimal")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.into()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let fallback_code = status.as_u16().to_string();
        let err = match response.json::<RejectionBody>().await {
            Ok(body) => StoreError::rejected(
                body.code.unwrap_or(fallback_code),
                body.message.unwrap_or_default(),
            ),
            Err(_) => StoreError::rejected(fallback_code, status.to_string()),
        };
        tracing::warn!("The table API refused the entry: {}", err);
        Err(err)
    }
}
