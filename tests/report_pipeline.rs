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

use assert_fs::prelude::*;
use async_trait::async_trait;
use predicates::prelude::*;
use sat6_inventory::domain::InventoryCollectionService;
use sat6_inventory::{
    ApiError, CsvReportSink, FileSystemRepository, InventoryReportingService, PayloadRepository,
    ReportConfig, SatelliteApi,
};
use serde_json::{json, Value};
use std::sync::Arc;

/// Two hosts: a hypervisor with guests and an incompliant guest
struct StaticSatellite;

#[async_trait]
impl SatelliteApi for StaticSatellite {
    async fn list_systems(&self, _orgid: &str) -> Result<Value, ApiError> {
        Ok(json!({"total": 2, "results": [
            {"uuid": "hv-uuid", "name": "hv1.example.com"},
            {"uuid": "guest-uuid", "name": "guest1.example.com"}
        ]}))
    }

    async fn get_system_detail(&self, uuid: &str) -> Result<Value, ApiError> {
        Ok(match uuid {
            "hv-uuid" => json!({
                "compliance": {"compliant": true},
                "virtual_guests": [{"uuid": "guest-uuid"}]
            }),
            _ => json!({"compliance": {"compliant": false}, "virtual_guests": []}),
        })
    }

    async fn get_subscriptions(&self, uuid: &str) -> Result<Value, ApiError> {
        Ok(match uuid {
            "hv-uuid" => json!({"results": [{
                "product_name": "Red Hat Enterprise Linux for Virtual Datacenters",
                "amount": 1,
                "account_number": 5555,
                "contract_number": "10001",
                "start_date": "2015-01-01",
                "end_date": "2016-01-01"
            }]}),
            _ => json!({"results": [{
                "product_name": "Red Hat Enterprise Linux for Virtual Datacenters",
                "amount": 1,
                "account_number": 5555,
                "contract_number": "10001",
                "start_date": "2015-01-01",
                "end_date": "2016-01-01",
                "host": {"id": "hv-uuid"}
            }]}),
        })
    }

    async fn get_facts(&self, hostname: &str) -> Result<Value, ApiError> {
        Ok(json!({
            "subtotal": 1,
            "results": {hostname: {
                "bios_vendor": "Dell Inc.",
                "physicalprocessorcount": 2,
                "processorcount": 16,
                "osfamily": "RedHat",
                "operatingsystem": "RedHat"
            }}
        }))
    }
}

#[tokio::test]
async fn test_report_file_and_dumps() {
    let temp = assert_fs::TempDir::new().unwrap();
    let report_file = temp.child("ACME_inventory_report.csv");

    let repository: Arc<dyn PayloadRepository> = Arc::new(FileSystemRepository::new(temp.path()));
    let service = InventoryCollectionService::new(Arc::new(StaticSatellite), Some(repository));
    let config = ReportConfig {
        orgid: "ACME".to_string(),
        debug_dumps: true,
        verbose: true,
    };

    let mut sink = CsvReportSink::create(report_file.path()).unwrap();
    let report = service.generate_report(&config, &mut sink).await.unwrap();
    drop(sink);

    assert_eq!(report.systems_seen, 2);
    assert_eq!(report.rows_written, 2);
    assert_eq!(
        report.subscriptions.total_for(
            "Red Hat Enterprise Linux for Virtual Datacenters",
            "hypervisor"
        ),
        Some(1)
    );
    assert_eq!(
        report
            .subscriptions
            .total_for("Red Hat Enterprise Linux for Virtual Datacenters", "virtual"),
        Some(1)
    );
    assert_eq!(report.incompliant.get("guest-uuid"), Some("guest1.example.com"));
    assert!(report.failures.is_empty());

    let contents = std::fs::read_to_string(report_file.path()).unwrap();
    assert!(contents.starts_with("\"UUID\",\"Name\",\"Compliant\""));
    assert_eq!(contents.lines().count(), 3);
    report_file.assert(predicate::str::contains(
        "\"hv-uuid\",\"hv1.example.com\",\"true\"",
    ));
    report_file.assert(predicate::str::contains(
        "\"guest-uuid\",\"guest1.example.com\",\"false\"",
    ));
    report_file.assert(predicate::str::contains(
        "\"2\",\"16\",\"virtual\",\"hv-uuid\",\"RedHat\",\"RedHat\",\"Dell Inc.\"",
    ));

    temp.child("ACME_all_systems-output.json")
        .assert(predicate::path::exists());
    temp.child("ACME_hv-uuid_system-output.json")
        .assert(predicate::path::exists());
    temp.child("ACME_guest-uuid_subscription-output.json")
        .assert(predicate::path::exists());
    temp.child("ACME_guest-uuid_system-facts.json")
        .assert(predicate::str::contains("guest1.example.com"));

    temp.close().unwrap();
}

#[tokio::test]
async fn test_empty_organization_leaves_header_only() {
    struct EmptySatellite;

    #[async_trait]
    impl SatelliteApi for EmptySatellite {
        async fn list_systems(&self, _orgid: &str) -> Result<Value, ApiError> {
            Ok(json!({"results": []}))
        }
        async fn get_system_detail(&self, _uuid: &str) -> Result<Value, ApiError> {
            unreachable!()
        }
        async fn get_subscriptions(&self, _uuid: &str) -> Result<Value, ApiError> {
            unreachable!()
        }
        async fn get_facts(&self, _hostname: &str) -> Result<Value, ApiError> {
            unreachable!()
        }
    }

    let temp = assert_fs::TempDir::new().unwrap();
    let report_file = temp.child("EMPTY_inventory_report.csv");
    let service = InventoryCollectionService::new(Arc::new(EmptySatellite), None);
    let config = ReportConfig {
        orgid: "EMPTY".to_string(),
        ..ReportConfig::default()
    };

    let mut sink = CsvReportSink::create(report_file.path()).unwrap();
    let report = service.generate_report(&config, &mut sink).await.unwrap();
    drop(sink);

    assert_eq!(report.rows_written, 0);
    assert!(report.subscriptions.is_empty());
    report_file.assert(predicate::str::contains("Chassis Product Name"));
    let contents = std::fs::read_to_string(report_file.path()).unwrap();
    assert_eq!(contents.lines().count(), 1);
}
