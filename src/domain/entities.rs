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

use crate::domain::services::aggregation::{IncompliantSet, SubscriptionSummary};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Sentinel written for every field the API did not provide
pub const NOT_AVAILABLE: &str = "NA";

/// Response of `GET /katello/api/v2/systems`
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SystemList {
    #[serde(default)]
    pub results: Vec<System>,
}

/// A content host registered in Satellite
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct System {
    /// Katello consumer UUID
    pub uuid: String,
    /// Host name, also the key into the facts payload
    pub name: String,
}

/// Response of `GET /katello/api/v2/systems/{uuid}?fields=full`
///
/// Only the two attributes the report needs are kept; everything else in the
/// payload is ignored.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SystemDetail {
    #[serde(default)]
    pub compliance: Option<ComplianceInfo>,
    #[serde(default)]
    pub virtual_guests: Option<Vec<Value>>,
}

impl SystemDetail {
    /// True when the system reports at least one guest
    pub fn is_hypervisor(&self) -> bool {
        self.virtual_guests
            .as_ref()
            .is_some_and(|guests| !guests.is_empty())
    }
}

/// Subscription status block of a system detail
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ComplianceInfo {
    #[serde(default)]
    pub compliant: Option<bool>,
}

/// Response of `GET /katello/api/v2/systems/{uuid}/subscriptions`
///
/// Entries stay raw so each one is decoded into an [`Entitlement`] on its
/// own and a malformed entry cannot take its siblings down with it.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SubscriptionList {
    #[serde(default)]
    pub results: Vec<Value>,
}

/// A subscription attached to a system
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Entitlement {
    #[serde(default)]
    pub product_name: Option<Value>,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub account_number: Option<Value>,
    #[serde(default)]
    pub contract_number: Option<Value>,
    #[serde(default)]
    pub start_date: Option<Value>,
    #[serde(default)]
    pub end_date: Option<Value>,
    /// Present when the entitlement is derived from a hypervisor
    #[serde(default)]
    pub host: Option<EntitlementHost>,
}

impl Entitlement {
    /// Consumed quantity; integers and numeric strings count, anything else is 0
    pub fn quantity(&self) -> i64 {
        match &self.amount {
            Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }
}

/// Hypervisor reference carried by guest entitlements
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct EntitlementHost {
    #[serde(default)]
    pub id: Option<Value>,
}

/// Response of `GET /api/v2/hosts/{name}/facts`
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct FactsPayload {
    #[serde(default)]
    pub subtotal: u64,
    /// Host name -> fact name -> value
    #[serde(default)]
    pub results: Value,
}

/// Hardware facts flattened into report columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedFacts {
    pub bios_vendor: String,
    pub bios_version: String,
    pub bios_release_date: String,
    pub manufacturer: String,
    pub product_name: String,
    pub serial_number: String,
    pub uuid: String,
    pub board_manufacturer: String,
    pub chassis_type: String,
    pub board_serial_number: String,
    pub board_product_name: String,
    pub physical_processor_count: String,
    pub cores: String,
    pub memory_size: String,
    pub ip_address: String,
    /// Virtualization type as reported by facter, e.g. "kvm" or "physical"
    pub virtual_type: Option<String>,
    pub os_family: String,
    pub operating_system: String,
}

impl Default for NormalizedFacts {
    fn default() -> Self {
        let na = || NOT_AVAILABLE.to_string();
        Self {
            bios_vendor: na(),
            bios_version: na(),
            bios_release_date: na(),
            manufacturer: na(),
            product_name: na(),
            serial_number: na(),
            uuid: na(),
            board_manufacturer: na(),
            chassis_type: na(),
            board_serial_number: na(),
            board_product_name: na(),
            physical_processor_count: na(),
            cores: na(),
            memory_size: na(),
            ip_address: na(),
            virtual_type: None,
            os_family: na(),
            operating_system: na(),
        }
    }
}

/// Virtualization class of a report row
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VirtualClass {
    /// Nothing known, treated as physical
    NotApplicable,
    /// Guest consuming a hypervisor-derived entitlement
    Guest,
    /// Host with at least one virtual guest
    Hypervisor,
    /// Type reported by the host's facts
    Reported(String),
}

impl fmt::Display for VirtualClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VirtualClass::NotApplicable => write!(f, "{}", NOT_AVAILABLE),
            VirtualClass::Guest => write!(f, "virtual"),
            VirtualClass::Hypervisor => write!(f, "hypervisor"),
            VirtualClass::Reported(kind) => write!(f, "{}", kind),
        }
    }
}

/// Compliance flag of a system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compliance {
    /// The detail payload carried no compliance block
    Unknown,
    Known(bool),
}

impl Compliance {
    pub fn is_incompliant(&self) -> bool {
        matches!(self, Compliance::Known(false))
    }
}

impl fmt::Display for Compliance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compliance::Unknown => write!(f, "{}", NOT_AVAILABLE),
            Compliance::Known(flag) => write!(f, "{}", flag),
        }
    }
}

/// One line of the inventory report: a system joined with one entitlement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub system_uuid: String,
    pub system_name: String,
    pub compliant: Compliance,
    pub subscription_name: String,
    pub amount: i64,
    pub account_number: String,
    pub contract_number: String,
    pub start_date: String,
    pub end_date: String,
    pub virtual_class: VirtualClass,
    pub hypervisor: String,
    pub facts: NormalizedFacts,
}

impl ReportRow {
    /// CSV title row
    pub const HEADERS: [&'static str; 26] = [
        "UUID",
        "Name",
        "Compliant",
        "Subscription Name",
        "Amount",
        "Account #",
        "Contract #",
        "Start Date",
        "End Date",
        "Phys CPU Count",
        "Cores",
        "Virtual",
        "Hypervisor",
        "OS Family",
        "Operating System",
        "BIOS Vendor",
        "BIOS Version",
        "BIOS Release Date",
        "System Manufacturer",
        "System Product Name",
        "Serial Number",
        "Board UUID",
        "Chassis Manufacturer",
        "Type",
        "Chassis Serial #",
        "Chassis Product Name",
    ];

    /// Field values in `HEADERS` order
    pub fn to_record(&self) -> [String; 26] {
        let facts = &self.facts;
        [
            self.system_uuid.clone(),
            self.system_name.clone(),
            self.compliant.to_string(),
            self.subscription_name.clone(),
            self.amount.to_string(),
            self.account_number.clone(),
            self.contract_number.clone(),
            self.start_date.clone(),
            self.end_date.clone(),
            facts.physical_processor_count.clone(),
            facts.cores.clone(),
            self.virtual_class.to_string(),
            self.hypervisor.clone(),
            facts.os_family.clone(),
            facts.operating_system.clone(),
            facts.bios_vendor.clone(),
            facts.bios_version.clone(),
            facts.bios_release_date.clone(),
            facts.manufacturer.clone(),
            facts.product_name.clone(),
            facts.serial_number.clone(),
            facts.uuid.clone(),
            facts.board_manufacturer.clone(),
            facts.chassis_type.clone(),
            facts.board_serial_number.clone(),
            facts.board_product_name.clone(),
        ]
    }

    /// Labelled fields for the verbose console dump
    ///
    /// Includes memory size and IP address, which are collected but not part
    /// of the CSV layout.
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        let mut lines: Vec<(&'static str, String)> = Self::HEADERS
            .iter()
            .copied()
            .zip(self.to_record())
            .collect();
        lines.push(("Memory Size", self.facts.memory_size.clone()));
        lines.push(("IP Address", self.facts.ip_address.clone()));
        lines
    }
}

/// Per-system fetch that failed during enrichment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentStage {
    Detail,
    Subscriptions,
    Facts,
}

impl fmt::Display for EnrichmentStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnrichmentStage::Detail => write!(f, "system detail"),
            EnrichmentStage::Subscriptions => write!(f, "subscriptions"),
            EnrichmentStage::Facts => write!(f, "facts"),
        }
    }
}

/// A system that could not be fully enriched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentFailure {
    pub uuid: String,
    pub name: String,
    pub stage: EnrichmentStage,
    pub message: String,
}

/// Configuration for inventory report generation
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Organization label, used to scope the listing and name output files
    pub orgid: String,
    /// Dump every raw API payload as JSON
    pub debug_dumps: bool,
    /// Log every row's fields as it is produced
    pub verbose: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            orgid: String::new(),
            debug_dumps: false,
            verbose: false,
        }
    }
}

impl ReportConfig {
    /// File name of the CSV report for this organization
    pub fn report_file_name(&self) -> String {
        format!("{}_inventory_report.csv", self.orgid)
    }
}

/// Result of a complete inventory run
#[derive(Debug, Clone, Default)]
pub struct InventoryReport {
    /// Systems returned by the listing
    pub systems_seen: usize,
    /// Rows handed to the sink
    pub rows_written: usize,
    /// Subscription usage by virtualization class
    pub subscriptions: SubscriptionSummary,
    /// Systems with at least one incompliant entitlement
    pub incompliant: IncompliantSet,
    /// Systems whose per-system fetches failed
    pub failures: Vec<EnrichmentFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_headers_match_record_width() {
        let row = ReportRow {
            system_uuid: "u1".to_string(),
            system_name: "host1".to_string(),
            compliant: Compliance::Known(false),
            subscription_name: "RHEL Server".to_string(),
            amount: 2,
            account_number: "A1".to_string(),
            contract_number: "C1".to_string(),
            start_date: "2020-01-01".to_string(),
            end_date: "2021-01-01".to_string(),
            virtual_class: VirtualClass::Hypervisor,
            hypervisor: NOT_AVAILABLE.to_string(),
            facts: NormalizedFacts::default(),
        };

        let record = row.to_record();
        assert_eq!(record.len(), ReportRow::HEADERS.len());
        assert_eq!(record[2], "false");
        assert_eq!(record[11], "hypervisor");
        assert_eq!(row.describe().len(), 28);
    }

    #[test]
    fn test_system_detail_tolerates_null_guests() {
        let detail: SystemDetail =
            serde_json::from_value(json!({"virtual_guests": null, "name": "x"})).unwrap();
        assert!(!detail.is_hypervisor());
        assert!(detail.compliance.is_none());

        let detail: SystemDetail =
            serde_json::from_value(json!({"virtual_guests": [{"uuid": "g1"}]})).unwrap();
        assert!(detail.is_hypervisor());
    }

    #[test]
    fn test_entitlement_fields_are_optional() {
        let ent: Entitlement = serde_json::from_value(json!({"product_name": "RHEL"})).unwrap();
        assert!(ent.amount.is_none());
        assert_eq!(ent.quantity(), 0);
        assert!(ent.host.is_none());

        let ent: Entitlement =
            serde_json::from_value(json!({"host": {"name": "hv1"}})).unwrap();
        assert!(ent.host.is_some_and(|host| host.id.is_none()));
    }

    #[test]
    fn test_entitlement_quantity() {
        let quantity = |amount: Value| {
            serde_json::from_value::<Entitlement>(json!({"amount": amount}))
                .unwrap()
                .quantity()
        };
        assert_eq!(quantity(json!(3)), 3);
        assert_eq!(quantity(json!("4")), 4);
        assert_eq!(quantity(json!("unlimited")), 0);
        assert_eq!(quantity(json!(1.5)), 0);
        assert_eq!(quantity(Value::Null), 0);
    }

    #[test]
    fn test_virtual_class_display() {
        assert_eq!(VirtualClass::NotApplicable.to_string(), "NA");
        assert_eq!(VirtualClass::Guest.to_string(), "virtual");
        assert_eq!(VirtualClass::Hypervisor.to_string(), "hypervisor");
        assert_eq!(VirtualClass::Reported("kvm".to_string()).to_string(), "kvm");
    }
}
