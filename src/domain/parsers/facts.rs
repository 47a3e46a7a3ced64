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

//! Hardware fact extraction from the Foreman host facts endpoint

use super::common::render_value;
use crate::domain::entities::{FactsPayload, NormalizedFacts};

/// Report column fed by a fact, if any
fn column_mut<'a>(facts: &'a mut NormalizedFacts, fact: &str) -> Option<&'a mut String> {
    let column = match fact {
        "bios_vendor" => &mut facts.bios_vendor,
        "bios_version" => &mut facts.bios_version,
        "bios_release_date" => &mut facts.bios_release_date,
        "manufacturer" => &mut facts.manufacturer,
        "productname" => &mut facts.product_name,
        "serialnumber" => &mut facts.serial_number,
        "uuid" => &mut facts.uuid,
        "boardmanufacturer" => &mut facts.board_manufacturer,
        "type" => &mut facts.chassis_type,
        "boardserialnumber" => &mut facts.board_serial_number,
        "boardproductname" => &mut facts.board_product_name,
        "physicalprocessorcount" => &mut facts.physical_processor_count,
        "processorcount" => &mut facts.cores,
        "memorysize" => &mut facts.memory_size,
        "ipaddress" => &mut facts.ip_address,
        "osfamily" => &mut facts.os_family,
        "operatingsystem" => &mut facts.operating_system,
        _ => return None,
    };
    Some(column)
}

/// Extract the report's hardware columns for one host
///
/// The facts endpoint keys its results by host name, so `hostname` must match
/// the system name exactly. When the payload is empty or the host is missing
/// every column stays `NA`.
///
/// # Arguments
/// * `payload` - Decoded response of `/api/v2/hosts/{name}/facts`
/// * `hostname` - Name of the system the facts were requested for
pub fn extract_facts(payload: &FactsPayload, hostname: &str) -> NormalizedFacts {
    let mut facts = NormalizedFacts::default();

    if payload.subtotal == 0 {
        return facts;
    }

    let Some(host_facts) = payload.results.get(hostname).and_then(|v| v.as_object()) else {
        log::warn!(
            "Facts for {} reported {} entries but none keyed by that host name",
            hostname,
            payload.subtotal
        );
        return facts;
    };

    for (key, value) in host_facts {
        if let Some(text) = render_value(value) {
            if let Some(column) = column_mut(&mut facts, key) {
                *column = text;
            }
        }
    }

    facts.virtual_type = host_facts.get("virtual").and_then(render_value);

    facts
}
