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

//! Console rendering of the end-of-run summaries

use crate::domain::{EnrichmentFailure, IncompliantSet, SubscriptionSummary};
use console::style;

/// Subscription usage grouped by subscription, then virtualization class
pub fn render_subscription_summary(summary: &SubscriptionSummary) -> String {
    let mut out = format!("\n{}\n", style("Subscription Usage Summary:").bold());
    for (subscription, classes) in summary.iter() {
        out.push_str(&format!("{} -->\n", subscription));
        for (class, amount) in classes {
            out.push_str(&format!("\t{}\t- {}\n", class, amount));
        }
    }
    out
}

/// Incompliant systems as uuid / name lines; empty when there are none
pub fn render_incompliant(incompliant: &IncompliantSet) -> String {
    if incompliant.is_empty() {
        return String::new();
    }

    let mut out = format!(
        "\n{}\n\t\tUUID\t\t\t\tName\n",
        style(format!(
            "There are {} incompliant systems:",
            incompliant.len()
        ))
        .red()
        .bold()
    );
    for (uuid, name) in incompliant.iter() {
        out.push_str(&format!("{}\t- {}\n", uuid, name));
    }
    out
}

/// Systems whose per-system fetches failed; empty when there are none
pub fn render_failures(failures: &[EnrichmentFailure]) -> String {
    if failures.is_empty() {
        return String::new();
    }

    let mut out = format!(
        "\n{}\n",
        style(format!(
            "{} systems could not be fully enriched:",
            failures.len()
        ))
        .yellow()
        .bold()
    );
    for failure in failures {
        out.push_str(&format!(
            "{}\t- {} ({}): {}\n",
            failure.uuid, failure.name, failure.stage, failure.message
        ));
    }
    out
}

pub fn print_success(message: &str) {
    println!("{} {}", style("✔").green(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", style("✖").red(), message);
}
