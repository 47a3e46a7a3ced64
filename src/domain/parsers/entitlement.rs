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

//! Joining a system's entitlements with its detail and facts

use super::common::text_or_na;
use crate::domain::entities::{
    Compliance, Entitlement, NormalizedFacts, ReportRow, System, SystemDetail, VirtualClass,
    NOT_AVAILABLE,
};
use crate::domain::services::aggregation::IncompliantSet;

/// Resolve the virtualization class and hypervisor reference of a row
///
/// Later rules override earlier ones: a hypervisor-derived entitlement marks
/// the row `virtual`, a facter `virtual` fact replaces that, and a system with
/// guests is always `hypervisor`. The hypervisor id only comes from the
/// entitlement.
pub fn classify_virtualization(
    entitlement: &Entitlement,
    detail: &SystemDetail,
    facts: &NormalizedFacts,
) -> (VirtualClass, String) {
    let mut class = VirtualClass::NotApplicable;
    let mut hypervisor = NOT_AVAILABLE.to_string();

    if let Some(host) = &entitlement.host {
        class = VirtualClass::Guest;
        hypervisor = text_or_na(host.id.as_ref());
    }

    if let Some(kind) = &facts.virtual_type {
        class = VirtualClass::Reported(kind.clone());
    }

    if detail.is_hypervisor() {
        class = VirtualClass::Hypervisor;
    }

    (class, hypervisor)
}

/// Compliance flag from the system detail
pub fn compliance_of(detail: &SystemDetail) -> Compliance {
    detail
        .compliance
        .as_ref()
        .and_then(|c| c.compliant)
        .map_or(Compliance::Unknown, Compliance::Known)
}

/// Build the report row for one (system, entitlement) pair
///
/// Records the system in `incompliant` when its compliance flag is false.
///
/// # Arguments
/// * `system` - Entry from the system listing
/// * `entitlement` - One of the system's subscriptions
/// * `detail` - The system's full detail payload
/// * `facts` - Facts extracted for the system's host name
/// * `incompliant` - Running set of incompliant systems
pub fn join_entitlement(
    system: &System,
    entitlement: &Entitlement,
    detail: &SystemDetail,
    facts: &NormalizedFacts,
    incompliant: &mut IncompliantSet,
) -> ReportRow {
    let (virtual_class, hypervisor) = classify_virtualization(entitlement, detail, facts);

    let compliant = compliance_of(detail);
    if compliant.is_incompliant() {
        incompliant.insert(&system.uuid, &system.name);
    }

    ReportRow {
        system_uuid: system.uuid.clone(),
        system_name: system.name.clone(),
        compliant,
        subscription_name: text_or_na(entitlement.product_name.as_ref()),
        amount: entitlement.quantity(),
        account_number: text_or_na(entitlement.account_number.as_ref()),
        contract_number: text_or_na(entitlement.contract_number.as_ref()),
        start_date: text_or_na(entitlement.start_date.as_ref()),
        end_date: text_or_na(entitlement.end_date.as_ref()),
        virtual_class,
        hypervisor,
        facts: facts.clone(),
    }
}

/// Build every row for a system, one per entitlement
///
/// A system without entitlements produces no rows.
pub fn join_system(
    system: &System,
    entitlements: &[Entitlement],
    detail: &SystemDetail,
    facts: &NormalizedFacts,
    incompliant: &mut IncompliantSet,
) -> Vec<ReportRow> {
    entitlements
        .iter()
        .map(|entitlement| join_entitlement(system, entitlement, detail, facts, incompliant))
        .collect()
}
