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

//! Dependency injection container for inventory reporting services

use crate::adapters::{CsvReportSink, FileSystemRepository, SatelliteHttpClient};
use crate::config::Settings;
use crate::domain::{ApiError, InventoryCollectionService, PublishError, ReportConfig};
use crate::ports::{InventoryReportingService, PayloadRepository, SatelliteApi};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the dependency injection container
#[derive(Clone)]
pub struct ContainerConfig {
    /// Scheme and host of the Satellite server
    pub base_url: String,
    /// Satellite user
    pub login: String,
    /// Password for `login`
    pub password: String,
    /// HTTP timeout per request
    pub http_timeout: Duration,
    /// Skip TLS certificate verification
    pub skip_tls_verify: bool,
    /// Directory for the CSV report and debug dumps
    pub output_dir: PathBuf,
    /// Write raw API payloads next to the report
    pub debug_dumps: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            login: String::new(),
            password: String::new(),
            http_timeout: Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS),
            skip_tls_verify: false,
            output_dir: PathBuf::from("."),
            debug_dumps: false,
        }
    }
}

impl std::fmt::Debug for ContainerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerConfig")
            .field("base_url", &self.base_url)
            .field("login", &self.login)
            .field("http_timeout", &self.http_timeout)
            .field("skip_tls_verify", &self.skip_tls_verify)
            .field("output_dir", &self.output_dir)
            .field("debug_dumps", &self.debug_dumps)
            .finish_non_exhaustive()
    }
}

/// Dependency injection container
pub struct ServiceContainer {
    config: ContainerConfig,
}

impl ServiceContainer {
    /// Create a new service container with configuration
    pub fn new(config: ContainerConfig) -> Self {
        Self { config }
    }

    /// Create a container from resolved settings and a known password
    pub fn from_settings(settings: &Settings, password: &str, debug_dumps: bool) -> Self {
        Self::new(
            ContainerConfigBuilder::new()
                .base_url(&settings.base_url())
                .credentials(&settings.login, password)
                .http_timeout(settings.timeout)
                .skip_tls_verify(settings.insecure_tls)
                .output_dir(settings.output_dir.clone())
                .debug_dumps(debug_dumps)
                .build(),
        )
    }

    /// Create the Satellite API client
    pub fn create_satellite_api(&self) -> Result<Arc<dyn SatelliteApi>, ApiError> {
        let client = SatelliteHttpClient::new(
            &self.config.base_url,
            &self.config.login,
            &self.config.password,
            self.config.http_timeout,
            self.config.skip_tls_verify,
        )?;

        Ok(Arc::new(client))
    }

    /// Create the payload repository when debug dumps are enabled
    pub fn create_payload_repository(&self) -> Option<Arc<dyn PayloadRepository>> {
        if !self.config.debug_dumps {
            return None;
        }
        Some(Arc::new(FileSystemRepository::new(
            self.config.output_dir.clone(),
        )))
    }

    /// Path of the CSV report for an organization
    pub fn report_path(&self, report_config: &ReportConfig) -> PathBuf {
        self.config
            .output_dir
            .join(report_config.report_file_name())
    }

    /// Create the CSV sink for an organization's report
    pub fn create_report_sink(
        &self,
        report_config: &ReportConfig,
    ) -> Result<CsvReportSink<File>, PublishError> {
        std::fs::create_dir_all(&self.config.output_dir).map_err(|e| PublishError::Io {
            path: self.config.output_dir.display().to_string(),
            message: e.to_string(),
        })?;
        CsvReportSink::create(&self.report_path(report_config))
    }

    /// Create the complete inventory reporting service
    pub fn create_inventory_reporting_service(
        &self,
    ) -> Result<Arc<dyn InventoryReportingService>, ApiError> {
        let api = self.create_satellite_api()?;
        let payloads = self.create_payload_repository();

        Ok(Arc::new(InventoryCollectionService::new(api, payloads)))
    }
}

/// Builder pattern for container configuration
pub struct ContainerConfigBuilder {
    config: ContainerConfig,
}

impl ContainerConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self {
            config: ContainerConfig::default(),
        }
    }

    /// Set the Satellite base URL
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = base_url.to_string();
        self
    }

    /// Set login and password
    pub fn credentials(mut self, login: &str, password: &str) -> Self {
        self.config.login = login.to_string();
        self.config.password = password.to_string();
        self
    }

    /// Set HTTP timeout
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.config.http_timeout = timeout;
        self
    }

    /// Skip TLS verification
    pub fn skip_tls_verify(mut self, skip: bool) -> Self {
        self.config.skip_tls_verify = skip;
        self
    }

    /// Set the output directory
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    /// Enable raw payload dumps
    pub fn debug_dumps(mut self, enabled: bool) -> Self {
        self.config.debug_dumps = enabled;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ContainerConfig {
        self.config
    }
}

impl Default for ContainerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
