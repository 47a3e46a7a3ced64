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

use crate::domain::parsers::{extract_facts, join_system};
use crate::domain::{
    ApiError, EnrichmentFailure, EnrichmentStage, Entitlement, FactsPayload, InventoryReport,
    NormalizedFacts, ReportConfig, ReportError, ReportRow, SubscriptionList, System, SystemDetail,
    SystemList,
};
use crate::ports::{InventoryReportingService, PayloadRepository, ReportSink, SatelliteApi};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Domain service that implements inventory report generation
///
/// Systems are processed one at a time: detail, subscriptions and facts are
/// fetched, joined into rows, folded into the running summaries and written to
/// the sink before the next system is touched.
pub struct InventoryCollectionService {
    /// Satellite REST API
    api: Arc<dyn SatelliteApi>,
    /// Raw payload storage, used when debug dumps are requested
    payloads: Option<Arc<dyn PayloadRepository>>,
}

impl InventoryCollectionService {
    /// Create a new inventory collection service
    ///
    /// # Arguments
    /// * `api` - Satellite API client
    /// * `payloads` - Repository for debug dumps, if any
    pub fn new(api: Arc<dyn SatelliteApi>, payloads: Option<Arc<dyn PayloadRepository>>) -> Self {
        Self { api, payloads }
    }

    /// Save a raw payload, logging instead of failing
    async fn dump(&self, file_name: &str, payload: &Value) {
        let Some(repository) = &self.payloads else {
            return;
        };
        match repository.save_payload(file_name, payload).await {
            Ok(path) => log::debug!("Payload written to -> {}", path.display()),
            Err(e) => log::warn!("Could not write debug dump {}: {}", file_name, e),
        }
    }

    /// Dump a fetched payload if requested, then decode it
    async fn decode<T: DeserializeOwned>(
        &self,
        config: &ReportConfig,
        fetched: Result<Value, ApiError>,
        source: &str,
        dump_name: String,
    ) -> Result<T, ApiError> {
        let payload = fetched?;
        if config.debug_dumps {
            self.dump(&dump_name, &payload).await;
        }
        serde_json::from_value(payload).map_err(|e| ApiError::Decode {
            resource: source.to_string(),
            message: e.to_string(),
        })
    }

    /// Fetch everything known about one system and join it into rows
    ///
    /// A failed subscriptions fetch skips the system, while a single malformed
    /// entitlement only skips itself. A failed detail or facts fetch leaves
    /// that resource empty so the rows degrade to `NA`. Every failure is
    /// recorded on the report.
    async fn collect_system(
        &self,
        config: &ReportConfig,
        system: &System,
        report: &mut InventoryReport,
    ) -> Vec<ReportRow> {
        let detail: SystemDetail = match self
            .decode(
                config,
                self.api.get_system_detail(&system.uuid).await,
                "system detail",
                format!("{}_{}_system-output.json", config.orgid, system.uuid),
            )
            .await
        {
            Ok(detail) => detail,
            Err(e) => {
                record_failure(report, system, EnrichmentStage::Detail, &e);
                SystemDetail::default()
            }
        };

        let listed = match self
            .decode::<SubscriptionList>(
                config,
                self.api.get_subscriptions(&system.uuid).await,
                "subscriptions",
                format!("{}_{}_subscription-output.json", config.orgid, system.uuid),
            )
            .await
        {
            Ok(list) => list.results,
            Err(e) => {
                record_failure(report, system, EnrichmentStage::Subscriptions, &e);
                return Vec::new();
            }
        };

        let mut entitlements: Vec<Entitlement> = Vec::with_capacity(listed.len());
        for (index, entry) in listed.into_iter().enumerate() {
            match serde_json::from_value(entry) {
                Ok(entitlement) => entitlements.push(entitlement),
                Err(e) => {
                    let err = ApiError::Decode {
                        resource: format!("subscription #{}", index),
                        message: e.to_string(),
                    };
                    record_failure(report, system, EnrichmentStage::Subscriptions, &err);
                }
            }
        }

        let facts = match self
            .decode::<FactsPayload>(
                config,
                self.api.get_facts(&system.name).await,
                "facts",
                format!("{}_{}_system-facts.json", config.orgid, system.uuid),
            )
            .await
        {
            Ok(payload) => extract_facts(&payload, &system.name),
            Err(e) => {
                record_failure(report, system, EnrichmentStage::Facts, &e);
                NormalizedFacts::default()
            }
        };

        if entitlements.is_empty() {
            log::info!("{} ({}) has no entitlements", system.name, system.uuid);
        }

        join_system(
            system,
            &entitlements,
            &detail,
            &facts,
            &mut report.incompliant,
        )
    }
}

fn record_failure(
    report: &mut InventoryReport,
    system: &System,
    stage: EnrichmentStage,
    err: &ApiError,
) {
    log::warn!(
        "Failed to fetch {} for {} ({}): {}",
        stage,
        system.name,
        system.uuid,
        err
    );
    report.failures.push(EnrichmentFailure {
        uuid: system.uuid.clone(),
        name: system.name.clone(),
        stage,
        message: err.to_string(),
    });
}

fn log_row(row: &ReportRow) {
    for (label, value) in row.describe() {
        log::info!("\t{} - {}", label, value);
    }
    log::info!("{}", "=".repeat(80));
}

#[async_trait]
impl InventoryReportingService for InventoryCollectionService {
    async fn generate_report(
        &self,
        config: &ReportConfig,
        sink: &mut dyn ReportSink,
    ) -> Result<InventoryReport, ReportError> {
        let listing: SystemList = self
            .decode(
                config,
                self.api.list_systems(&config.orgid).await,
                "systems listing",
                format!("{}_all_systems-output.json", config.orgid),
            )
            .await?;

        let mut report = InventoryReport {
            systems_seen: listing.results.len(),
            ..InventoryReport::default()
        };
        log::info!(
            "Found {} systems in organization {}",
            report.systems_seen,
            config.orgid
        );

        for system in &listing.results {
            let rows = self.collect_system(config, system, &mut report).await;

            for row in rows {
                report.subscriptions.accumulate(&row);
                if config.verbose {
                    log_row(&row);
                }
                sink.write_row(&row)?;
                report.rows_written += 1;
            }
        }

        sink.finish()?;

        Ok(report)
    }
}
