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

//! Satellite 6 Inventory Library
//!
//! This library inventories the systems registered in a Satellite/Katello
//! server: for every system of an organization it joins the subscription
//! entitlements with the host's hardware facts, writes one CSV row per
//! (system, entitlement) pair and accumulates subscription usage and
//! compliance summaries. It uses a Ports and Adapters (Hexagonal)
//! architecture for maintainability and testability.
//!
//! # Architecture
//!
//! - **Domain**: Entities, fact extraction, entitlement joining, aggregation
//! - **Ports**: Interfaces for the Satellite API, report sinks and debug dumps
//! - **Adapters**: reqwest client, CSV writer, JSON dump files
//!
//! # Usage
//!
//! ```rust,no_run
//! use sat6_inventory::{ContainerConfigBuilder, InventoryReportingService, ReportConfig, ServiceContainer};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let container = ServiceContainer::new(
//!         ContainerConfigBuilder::new()
//!             .base_url("https://satellite.example.com")
//!             .credentials("admin", "changeme")
//!             .build(),
//!     );
//!     let service = container.create_inventory_reporting_service()?;
//!
//!     let config = ReportConfig {
//!         orgid: "ACME_Corporation".to_string(),
//!         ..ReportConfig::default()
//!     };
//!     let mut sink = container.create_report_sink(&config)?;
//!     let report = service.generate_report(&config, &mut sink).await?;
//!
//!     println!("{} rows for {} systems", report.rows_written, report.systems_seen);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod config;
pub mod container;
pub mod domain;
pub mod ports;
pub mod ui;

pub use adapters::{CsvReportSink, FileSystemRepository, SatelliteHttpClient};
pub use config::{PartialSettings, Settings};
pub use container::{ContainerConfig, ContainerConfigBuilder, ServiceContainer};
pub use domain::{
    ApiError, InventoryReport, PublishError, ReportConfig, ReportError, ReportRow,
};
pub use ports::{InventoryReportingService, PayloadRepository, ReportSink, SatelliteApi};
