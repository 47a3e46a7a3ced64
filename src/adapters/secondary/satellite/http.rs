/*
Copyright 2024 San Francisco Compute Company

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! HTTP client for the Satellite 6 REST API

use crate::domain::ApiError;
use crate::ports::SatelliteApi;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::time::Duration;

/// Page size large enough to fetch every record in one request
pub const PER_PAGE: u32 = 99999;

/// Satellite API client authenticating with HTTP Basic auth
pub struct SatelliteHttpClient {
    client: Client,
    base_url: Url,
    login: String,
    password: String,
}

impl SatelliteHttpClient {
    /// Create a new Satellite API client
    ///
    /// # Arguments
    /// * `base_url` - Scheme and host, e.g. `https://satellite.example.com`
    /// * `login` - Satellite user
    /// * `password` - Password for `login`
    /// * `timeout` - Per-request timeout
    /// * `skip_tls_verify` - Whether to skip TLS certificate verification
    pub fn new(
        base_url: &str,
        login: &str,
        password: &str,
        timeout: Duration,
        skip_tls_verify: bool,
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::ClientSetup(format!("invalid base URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::ClientSetup(format!(
                "{} cannot be used as a base URL",
                base_url
            )));
        }

        if skip_tls_verify {
            log::warn!("TLS certificate verification is disabled");
        }

        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(skip_tls_verify)
            .build()
            .map_err(|e| ApiError::ClientSetup(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            login: login.to_string(),
            password: password.to_string(),
        })
    }

    /// Base URL with `segments` appended and `query` encoded
    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::ClientSetup(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    pub fn systems_url(&self, orgid: &str) -> Result<Url, ApiError> {
        let per_page = PER_PAGE.to_string();
        self.endpoint(
            &["katello", "api", "v2", "systems"],
            &[("organization_id", orgid), ("per_page", per_page.as_str())],
        )
    }

    pub fn system_detail_url(&self, uuid: &str) -> Result<Url, ApiError> {
        self.endpoint(
            &["katello", "api", "v2", "systems", uuid],
            &[("fields", "full")],
        )
    }

    pub fn subscriptions_url(&self, uuid: &str) -> Result<Url, ApiError> {
        self.endpoint(&["katello", "api", "v2", "systems", uuid, "subscriptions"], &[])
    }

    pub fn facts_url(&self, hostname: &str) -> Result<Url, ApiError> {
        let per_page = PER_PAGE.to_string();
        self.endpoint(
            &["api", "v2", "hosts", hostname, "facts"],
            &[("per_page", per_page.as_str())],
        )
    }

    /// Authenticated GET returning the decoded JSON body
    async fn get_json(&self, url: Url) -> Result<Value, ApiError> {
        log::info!("Connecting to -> {}", url);
        let url_text = url.to_string();

        let response = self
            .client
            .get(url)
            .basic_auth(&self.login, Some(&self.password))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ApiError::Connection {
                url: url_text.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Authentication {
                url: url_text,
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Status {
                url: url_text,
                status: status.as_u16(),
                body,
            });
        }

        response.json::<Value>().await.map_err(|e| ApiError::Decode {
            resource: url_text,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl SatelliteApi for SatelliteHttpClient {
    async fn list_systems(&self, orgid: &str) -> Result<Value, ApiError> {
        self.get_json(self.systems_url(orgid)?).await
    }

    async fn get_system_detail(&self, uuid: &str) -> Result<Value, ApiError> {
        self.get_json(self.system_detail_url(uuid)?).await
    }

    async fn get_subscriptions(&self, uuid: &str) -> Result<Value, ApiError> {
        self.get_json(self.subscriptions_url(uuid)?).await
    }

    async fn get_facts(&self, hostname: &str) -> Result<Value, ApiError> {
        self.get_json(self.facts_url(hostname)?).await
    }
}
